//! History command implementation.

use crate::cli::HistoryArgs;
use crate::error::Result;
use crate::output::Formatter;
use slopewatch_domain::{BlobStore, Clock};
use slopewatch_monitor::MonitoringService;

/// Execute the history command.
pub fn execute_history<B: BlobStore, C: Clock>(
    args: HistoryArgs,
    service: &MonitoringService<B, C>,
    formatter: &Formatter,
) -> Result<()> {
    let mut readings = service.history_with_risk()?;
    keep_most_recent(&mut readings, args.limit);

    println!("{}", formatter.format_readings(&readings)?);
    Ok(())
}

/// Drop all but the last `limit` entries, preserving order.
fn keep_most_recent<T>(entries: &mut Vec<T>, limit: Option<usize>) {
    if let Some(limit) = limit {
        let excess = entries.len().saturating_sub(limit);
        entries.drain(..excess);
    }
}
