use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod formatters;

#[derive(Parser, Debug)]
#[command(name = "portefeuille")]
#[command(version, about = "Monthly portfolio report from broker exports")]
#[command(
    long_about = "Merge monthly holdings exports and the cash account statement into a yearly spreadsheet report with deposits, profit/loss, dividends, costs and benchmark comparison."
)]
pub struct Cli {
    /// Configuration file (default: ./portefeuille.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Build the spreadsheet report (default)
    Report {
        /// Output workbook, overrides the configured path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the positions of the latest snapshot
    Holdings {
        /// Use the last snapshot of this year instead
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Show totals, deposits and returns per snapshot
    Overview,

    /// Show deposits and the snapshot each one counts towards
    Deposits,

    /// Detect the kind of an export file and list its columns
    Inspect {
        /// Path to the CSV or Excel file
        file: PathBuf,
    },
}

impl Cli {
    /// The subcommand to run, `report` when none was given
    pub fn command_or_default(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Report { output: None })
    }
}
