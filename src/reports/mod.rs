// Reports module - summaries derived from the ledger and benchmark prices

pub mod benchmarks;
pub mod costs;
pub mod dividends;

pub use benchmarks::{compare_all, fill_daily, BenchmarkComparison, BenchmarkPoint};
pub use costs::{costs_per_year, YearCosts};
pub use dividends::{dividends_by_product, quarterly_dividends, ProductDividends, QuarterDividends};
