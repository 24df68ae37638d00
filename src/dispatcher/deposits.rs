use anyhow::Result;

use crate::cli::formatters;
use crate::config::ResolvedConfig;
use crate::portfolio::Portfolio;

pub fn dispatch_deposits(config: &ResolvedConfig, json_output: bool) -> Result<()> {
    tracing::info!("Showing deposits");

    let portfolio = Portfolio::load(config)?;

    if json_output {
        println!("{}", formatters::to_json(&portfolio.deposits));
    } else {
        print!("{}", formatters::format_deposits_table(&portfolio.deposits));
    }

    Ok(())
}
