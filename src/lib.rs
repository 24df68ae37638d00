//! Portefeuille - monthly portfolio report from broker exports
//!
//! This library merges monthly holdings snapshots and the cash account
//! statement of a broker into a per-year view of the portfolio: value per
//! security, deposits, profit/loss and returns, plus dividend, cost and
//! benchmark summaries. The result is rendered as an `.xlsx` workbook.

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod importers;
pub mod portfolio;
pub mod reports;
pub mod utils;
pub mod workbook;
