//! CSV export for simulation tick results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::state::TickResult;

/// Schema v1 column header for CSV telemetry export.
const HEADER: &str = "tick,date,hour,frequency_hz,load_mw,supply_mw,\
                      battery_mw,battery_charge_mwh,price_per_mwh,\
                      net_income,balance,emissions_kg,renewable_pct,market_data";

/// Exports tick results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per tick using the schema
/// v1 column layout. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(results: &[TickResult], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(results, buf)
}

/// Writes tick results as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(results: &[TickResult], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    // Data rows
    for r in results {
        wtr.write_record(&[
            r.tick.to_string(),
            r.date.to_string(),
            r.hour.to_string(),
            format!("{:.4}", r.frequency_hz),
            format!("{:.4}", r.load_mw),
            format!("{:.4}", r.supply_mw),
            format!("{:.4}", r.battery_power_mw),
            format!("{:.4}", r.battery_charge_mwh),
            format!("{:.4}", r.price_per_mwh),
            format!("{:.4}", r.net_income),
            format!("{:.4}", r.balance),
            format!("{:.4}", r.emissions_kg),
            format!("{:.4}", r.renewable_pct),
            r.had_market_data.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
