//! Risk command implementation.

use crate::error::Result;
use crate::output::Formatter;
use slopewatch_domain::{BlobStore, Clock};
use slopewatch_monitor::MonitoringService;

/// Execute the risk command.
pub fn execute_risk<B: BlobStore, C: Clock>(
    service: &MonitoringService<B, C>,
    formatter: &Formatter,
) -> Result<()> {
    println!("{}", render_risk(service, formatter)?);
    Ok(())
}

fn render_risk<B: BlobStore, C: Clock>(
    service: &MonitoringService<B, C>,
    formatter: &Formatter,
) -> Result<String> {
    let summary = service.risk_summary()?;
    formatter.format_risk(summary.as_ref())
}
