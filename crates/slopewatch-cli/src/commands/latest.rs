//! Latest command implementation.

use crate::error::Result;
use crate::output::Formatter;
use slopewatch_domain::{BlobStore, Clock};
use slopewatch_monitor::MonitoringService;

/// Execute the latest command.
pub fn execute_latest<B: BlobStore, C: Clock>(
    service: &MonitoringService<B, C>,
    formatter: &Formatter,
) -> Result<()> {
    println!("{}", render_latest(service, formatter)?);
    Ok(())
}

fn render_latest<B: BlobStore, C: Clock>(
    service: &MonitoringService<B, C>,
    formatter: &Formatter,
) -> Result<String> {
    let latest: Vec<_> = service
        .latest_reading()?
        .into_iter()
        .map(|reading| {
            let level = service.classify(&reading);
            (reading, level)
        })
        .collect();

    formatter.format_readings(&latest)
}
