//! SlopeWatch CLI - record slope readings and assess landslide risk.

use clap::Parser;
use slopewatch_cli::commands;
use slopewatch_cli::{logging, Cli, Command, Config, Formatter};
use slopewatch_monitor::MonitoringService;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> slopewatch_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    let service = MonitoringService::from_config(&config.monitor)?;

    match cli.command {
        Command::Record(args) => commands::execute_record(args, &service, &formatter)?,
        Command::Latest => commands::execute_latest(&service, &formatter)?,
        Command::Risk => commands::execute_risk(&service, &formatter)?,
        Command::History(args) => commands::execute_history(args, &service, &formatter)?,
        Command::Clear(args) => commands::execute_clear(args, &service, &formatter)?,
    }

    Ok(())
}
