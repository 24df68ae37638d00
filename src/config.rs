//! TOML configuration: where the exports live and how ledger rows are read.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ReportError;

pub const CONFIG_FILENAME: &str = "portefeuille.toml";

/// Input file locations. Relative paths resolve against the config file's directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory with one holdings snapshot per month (`YYYY-MM-DD.csv`)
    pub exports_dir: PathBuf,

    /// Cash account statement (`Account.csv`)
    pub account_file: PathBuf,

    /// Directory with benchmark price files (`<name>.csv`). Optional.
    pub benchmarks_dir: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            exports_dir: PathBuf::from("data").join("exports"),
            account_file: PathBuf::from("data").join("deposits").join("Account.csv"),
            benchmarks_dir: PathBuf::from("data").join("benchmarks"),
        }
    }
}

/// How account ledger descriptions are classified.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Exact descriptions (case-insensitive) of incoming deposits
    pub deposit_descriptions: Vec<String>,

    /// Exact descriptions of withdrawals, recorded as negative deposits
    pub withdrawal_descriptions: Vec<String>,

    /// Exact descriptions of gross dividend payments
    pub dividend_descriptions: Vec<String>,

    /// Exact descriptions of withheld dividend tax
    pub dividend_tax_descriptions: Vec<String>,

    /// Substrings marking a cost line (transaction fees, connection fees)
    pub cost_keywords: Vec<String>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            deposit_descriptions: vec!["iDEAL Deposit".to_string(), "iDEAL storting".to_string()],
            withdrawal_descriptions: vec!["Terugstorting".to_string(), "Withdrawal".to_string()],
            dividend_descriptions: vec!["Dividend".to_string()],
            dividend_tax_descriptions: vec![
                "Dividendbelasting".to_string(),
                "Dividend Tax".to_string(),
            ],
            cost_keywords: vec!["kosten".to_string(), "fee".to_string(), "costs".to_string()],
        }
    }
}

/// Holdings snapshot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldingsConfig {
    /// Product name of the broker's cash line
    pub cash_product: String,

    /// Label the cash line is renamed to
    pub cash_label: String,
}

impl Default for HoldingsConfig {
    fn default() -> Self {
        Self {
            cash_product: "CASH & CASH FUND & FTX CASH(EUR)".to_string(),
            cash_label: "VRIJE RUIMTE".to_string(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base directory for relative input paths. Defaults to the config file's directory.
    pub data_root: Option<PathBuf>,

    /// Workbook written by `report` (relative to `data_root`)
    pub output: Option<PathBuf>,

    pub input: InputConfig,
    pub ledger: LedgerConfig,
    pub holdings: HoldingsConfig,
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ReportError::Config(e.to_string()))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }
}

/// Configuration with every path made absolute.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub exports_dir: PathBuf,
    pub account_file: PathBuf,
    pub benchmarks_dir: PathBuf,
    pub output: PathBuf,
    pub ledger: LedgerConfig,
    pub holdings: HoldingsConfig,
}

impl ResolvedConfig {
    /// Resolve `config` against `base_dir`.
    pub fn from_config(config: Config, base_dir: &Path) -> Self {
        let root = match &config.data_root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => base_dir.join(root),
            None => base_dir.to_path_buf(),
        };
        let resolve = |p: &Path| if p.is_absolute() { p.to_path_buf() } else { root.join(p) };

        let output = config
            .output
            .as_deref()
            .map(resolve)
            .unwrap_or_else(|| root.join("results").join("portefeuille.xlsx"));

        Self {
            exports_dir: resolve(&config.input.exports_dir),
            account_file: resolve(&config.input.account_file),
            benchmarks_dir: resolve(&config.input.benchmarks_dir),
            output,
            ledger: config.ledger,
            holdings: config.holdings,
        }
    }

    /// Load the config at `path`, or resolve defaults against the working
    /// directory when there is no config file at all.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match path {
            Some(p) if !p.exists() => return Err(ReportError::FileNotFound(p.to_path_buf()).into()),
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };

        match config_path {
            Some(config_path) => {
                debug!("Loading config from {}", config_path.display());
                let config = Config::load(&config_path)?;
                let config_path = config_path
                    .canonicalize()
                    .with_context(|| format!("Config file not found: {}", config_path.display()))?;
                let base_dir = config_path
                    .parent()
                    .context("Config file has no parent directory")?;
                Ok(Self::from_config(config, base_dir))
            }
            None => {
                debug!("No config file, using defaults relative to {}", cwd.display());
                Ok(Self::from_config(Config::default(), &cwd))
            }
        }
    }
}

/// Returns the config file to use when none was given on the command line.
///
/// Resolution order:
/// 1. `./portefeuille.toml` if it exists in the current directory
/// 2. `<config_home>/portefeuille/portefeuille.toml`
pub fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.exists() {
        return Some(local);
    }

    dir_spec::config_home()
        .map(|dir| dir.join("portefeuille").join(CONFIG_FILENAME))
        .filter(|p| p.exists())
}
