//! Clear command implementation.

use crate::cli::ClearArgs;
use crate::error::Result;
use crate::output::Formatter;
use slopewatch_domain::{BlobStore, Clock};
use slopewatch_monitor::MonitoringService;
use std::io::{self, Write};

/// Execute the clear command.
pub fn execute_clear<B: BlobStore, C: Clock>(
    args: ClearArgs,
    service: &MonitoringService<B, C>,
    formatter: &Formatter,
) -> Result<()> {
    let count = service.history()?.len();
    if count == 0 {
        println!("{}", formatter.info("No readings to delete"));
        return Ok(());
    }

    // Confirm deletion unless --yes is specified
    if !args.yes {
        print!("About to delete {} reading(s). Continue? [y/N] ", count);
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;

        if !confirmed(&response) {
            println!("{}", formatter.info("Operation cancelled"));
            return Ok(());
        }
    }

    service.clear_history()?;
    println!(
        "{}",
        formatter.success(&format!("Deleted {} reading(s)", count))
    );
    Ok(())
}

fn confirmed(response: &str) -> bool {
    let response = response.trim();
    response.eq_ignore_ascii_case("y") || response.eq_ignore_ascii_case("yes")
}
