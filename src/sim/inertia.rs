//! System inertia estimation.

use crate::assets::Generator;

/// Capacity-weighted average inertia constant over all owned generators.
///
/// `H_total = Σ(H_i × capacity_i) / Σ(capacity_i)`. Every owned unit
/// counts regardless of its instantaneous output; inertia is a property of
/// installed spinning mass. Returns 0 when no capacity is present, the
/// sentinel for "no physical inertia".
pub fn system_inertia_s(generators: &[Generator]) -> f64 {
    let total_capacity_mw: f64 = generators.iter().map(|g| g.capacity_mw).sum();
    if total_capacity_mw == 0.0 {
        return 0.0;
    }

    let weighted_sum: f64 = generators
        .iter()
        .map(|g| g.kind.inertia_constant_s() * g.capacity_mw)
        .sum();

    weighted_sum / total_capacity_mw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::GeneratorType;

    #[test]
    fn empty_fleet_has_zero_inertia() {
        assert_eq!(system_inertia_s(&[]), 0.0);
    }

    #[test]
    fn single_unit_reports_its_own_constant() {
        let fleet = [Generator::new(1, GeneratorType::Nuclear)];
        assert_eq!(system_inertia_s(&fleet), 6.5);
    }

    #[test]
    fn average_is_capacity_weighted() {
        // nuclear 1000 MW × 6.5 s, solar 100 MW × 0.0 s
        let fleet = [
            Generator::new(1, GeneratorType::Nuclear),
            Generator::new(2, GeneratorType::Solar),
        ];
        let expected = (6.5 * 1000.0) / 1100.0;
        assert!((system_inertia_s(&fleet) - expected).abs() < 1e-12);
    }

    #[test]
    fn idle_units_still_contribute() {
        let mut coal = Generator::new(1, GeneratorType::Coal);
        coal.current_output_mw = 0.0;
        assert_eq!(system_inertia_s(&[coal]), 4.0);
    }
}
