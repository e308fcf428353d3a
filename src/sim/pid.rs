//! PID frequency controller.

use serde::{Deserialize, Serialize};

use super::NOMINAL_FREQUENCY_HZ;

/// Integral magnitude is clamped so `ki × integral` cannot exceed this
/// contribution (anti-windup).
const MAX_INTEGRAL_CONTRIBUTION: f64 = 100.0;

/// Closed-loop frequency controller for dispatchable generation.
///
/// The correction is expressed as a percentage applied to dispatchable
/// capacity. All state is plain serializable data so a suspended run can
/// resume bit-for-bit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PidController {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain.
    pub ki: f64,
    /// Derivative gain.
    pub kd: f64,
    /// Accumulated error, clamped by the anti-windup bound.
    pub integral: f64,
    /// Error observed on the previous tick; `None` before the first tick
    /// and after a gain change, giving a zero derivative on the next tick.
    pub last_error: Option<f64>,
}

impl PidController {
    /// Creates a controller with zeroed accumulated state.
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            integral: 0.0,
            last_error: None,
        }
    }

    /// Advances the controller one tick and returns the dispatch correction
    /// in percent.
    ///
    /// A positive error (frequency above nominal) yields a negative
    /// correction so dispatch backs off. With `ki == 0` the anti-windup
    /// bound is undefined, so the integral accumulates unclamped; its term
    /// is zero regardless.
    pub fn update(&mut self, frequency_hz: f64) -> f64 {
        let error = frequency_hz - NOMINAL_FREQUENCY_HZ;
        let previous_error = self.last_error.unwrap_or(error);

        let mut integral = self.integral + error;
        if self.ki != 0.0 {
            let max_integral = MAX_INTEGRAL_CONTRIBUTION / self.ki.abs();
            integral = integral.clamp(-max_integral, max_integral);
        }

        let proportional = self.kp * error;
        let integral_term = self.ki * integral;
        let derivative = self.kd * (error - previous_error);

        self.integral = integral;
        self.last_error = Some(error);

        -(proportional + integral_term + derivative)
    }

    /// Replaces the gains and resets accumulated state.
    ///
    /// A gain change is a state-machine transition: the old integral and
    /// error history have no meaning under new gains.
    pub fn set_gains(&mut self, kp: f64, ki: f64, kd: f64) {
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
        self.integral = 0.0;
        self.last_error = None;
    }
}
