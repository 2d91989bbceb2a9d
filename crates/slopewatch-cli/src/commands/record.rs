//! Record command implementation.

use crate::cli::RecordArgs;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::Formatter;
use slopewatch_domain::{BlobStore, Clock, Reading};
use slopewatch_monitor::{parse_measurement, Measurement, MonitoringService};

/// Execute the record command.
pub fn execute_record<B: BlobStore, C: Clock>(
    args: RecordArgs,
    service: &MonitoringService<B, C>,
    formatter: &Formatter,
) -> Result<()> {
    let reading = record(args, service)?;
    let level = service.classify(&reading);

    if formatter.format() == OutputFormat::Table {
        println!("{}", formatter.reading_recorded(&reading, level));
        if level.requires_mitigation() {
            println!(
                "{}",
                formatter.warning("Run `slopewatch risk` for mitigation actions")
            );
        }
    } else {
        println!("{}", formatter.format_reading(&reading, level)?);
    }

    Ok(())
}

/// Parse the raw arguments and store the reading.
fn record<B: BlobStore, C: Clock>(
    args: RecordArgs,
    service: &MonitoringService<B, C>,
) -> Result<Reading> {
    let moisture = parse_measurement(Measurement::SoilMoisture, &args.moisture)?;
    let angle = parse_measurement(Measurement::SlopeAngle, &args.angle)?;
    Ok(service.record_reading(moisture, angle, args.note)?)
}
