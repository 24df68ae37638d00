use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use portefeuille::cli::Cli;
use portefeuille::dispatcher::dispatch_command;

fn init_logging(ansi: bool) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(ansi))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let command = cli.command_or_default();
    dispatch_command(command, cli.config.as_deref(), cli.json)
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_logging(!cli.no_color);

    if let Err(err) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        std::process::exit(1);
    }
}
