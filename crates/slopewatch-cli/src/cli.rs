//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// SlopeWatch - Record slope readings and assess landslide risk.
#[derive(Debug, Parser)]
#[command(name = "slopewatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SLOPEWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs and levels only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a new reading
    Record(RecordArgs),

    /// Show the most recent reading
    Latest,

    /// Show the current risk level and mitigation actions
    Risk,

    /// List every reading with its risk level
    History(HistoryArgs),

    /// Delete every reading
    Clear(ClearArgs),
}

/// Arguments for the record command.
#[derive(Debug, Parser)]
pub struct RecordArgs {
    /// Soil moisture in percent (0-100)
    #[arg(short, long, allow_hyphen_values = true)]
    pub moisture: String,

    /// Slope angle in degrees (0-90)
    #[arg(short, long, allow_hyphen_values = true)]
    pub angle: String,

    /// Free-text observation
    #[arg(short, long)]
    pub note: Option<String>,
}

/// Arguments for the history command.
#[derive(Debug, Parser)]
pub struct HistoryArgs {
    /// Show only the most recent N readings
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the clear command.
#[derive(Debug, Parser)]
pub struct ClearArgs {
    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_record() {
        let cli = Cli::try_parse_from([
            "slopewatch", "record", "--moisture", "55", "--angle", "12.5", "--note", "wet",
        ])
        .unwrap();

        match cli.command {
            Command::Record(args) => {
                assert_eq!(args.moisture, "55");
                assert_eq!(args.angle, "12.5");
                assert_eq!(args.note.as_deref(), Some("wet"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_negative_values_reach_validation() {
        let cli = Cli::try_parse_from(["slopewatch", "record", "-m", "-1", "-a", "10"]).unwrap();
        assert!(matches!(cli.command, Command::Record(ref args) if args.moisture == "-1"));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["slopewatch", "-vv", "history", "--format", "json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
    }
}
