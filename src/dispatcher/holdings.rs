use anyhow::{anyhow, Result};

use crate::cli::formatters;
use crate::config::ResolvedConfig;
use crate::portfolio::Portfolio;

pub fn dispatch_holdings(config: &ResolvedConfig, year: Option<i32>, json_output: bool) -> Result<()> {
    tracing::info!("Showing holdings");

    let portfolio = Portfolio::load(config)?;
    let years = portfolio.years();

    let table = match year {
        Some(y) => {
            let view = years.get(&y).ok_or_else(|| {
                let known: Vec<String> = years.keys().map(|k| k.to_string()).collect();
                anyhow!("No snapshots in {} (available: {})", y, known.join(", "))
            })?;
            &view.holdings
        }
        None => &portfolio.holdings,
    };

    let Some(&date) = table.dates.last() else {
        return Err(anyhow!("No snapshot dates available"));
    };
    let positions = table.latest_positions();

    if json_output {
        println!("{}", formatters::format_holdings_json(date, &positions));
    } else {
        print!("{}", formatters::format_holdings_table(date, &positions));
    }

    Ok(())
}
