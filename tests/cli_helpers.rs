#![allow(dead_code)]

use anyhow::{bail, Result};
use assert_cmd::cargo;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const HOLDINGS_HEADER: &str = "Product,Symbool/ISIN,Aantal,Slotkoers,Lokale waarde,,Waarde in EUR\n";

/// Three monthly exports across a year boundary. ASML is sold before January.
pub const SNAPSHOTS: &[(&str, &str)] = &[
    (
        "2021-11-01.csv",
        "VANGUARD FTSE ALL-WORLD,IE00B3RBWM25,10,\"95,00\",EUR,\"950,00\",\"950,00\"\n\
         ASML HOLDING,NL0010273215,1,\"600,00\",EUR,\"600,00\",\"600,00\"\n\
         CASH & CASH FUND & FTX CASH(EUR),,,,EUR,\"50,00\",\"50,00\"\n",
    ),
    (
        "2021-12-01.csv",
        "VANGUARD FTSE ALL-WORLD,IE00B3RBWM25,15,\"96,67\",EUR,\"1450,00\",\"1450,00\"\n\
         ASML HOLDING,NL0010273215,1,\"650,00\",EUR,\"650,00\",\"650,00\"\n\
         CASH & CASH FUND & FTX CASH(EUR),,,,EUR,\"50,00\",\"50,00\"\n",
    ),
    (
        "2022-01-01.csv",
        "VANGUARD FTSE ALL-WORLD,IE00B3RBWM25,15,\"100,00\",EUR,\"1500,00\",\"1500,00\"\n\
         CASH & CASH FUND & FTX CASH(EUR),,,,EUR,\"710,00\",\"710,00\"\n",
    ),
];

/// Statement lines, newest first like the broker writes them
pub const ACCOUNT: &str = "Datum,Tijd,Valutadatum,Product,ISIN,Omschrijving,FX,Mutatie,,Saldo,,Order Id\n\
10-01-2022,09:00,10-01-2022,,,iDEAL storting,,EUR,\"100,00\",EUR,\"810,00\",\n\
20-12-2021,10:12,20-12-2021,ASML HOLDING,NL0010273215,Verkoop 1 @ 660 EUR,,EUR,\"660,00\",EUR,\"710,00\",abc\n\
15-12-2021,07:30,14-12-2021,VANGUARD FTSE ALL-WORLD,IE00B3RBWM25,Dividend,,EUR,\"3,50\",EUR,\"53,50\",\n\
15-12-2021,07:30,14-12-2021,VANGUARD FTSE ALL-WORLD,IE00B3RBWM25,Dividendbelasting,,EUR,\"-0,53\",EUR,\"50,00\",\n\
20-11-2021,12:00,20-11-2021,,,iDEAL storting,,EUR,\"500,00\",EUR,\"550,00\",\n\
02-11-2021,09:00,02-11-2021,,,DEGIRO Transactiekosten en/of kosten van derden,,EUR,\"-2,00\",EUR,\"50,00\",\n\
25-10-2021,12:00,25-10-2021,,,iDEAL storting,,EUR,\"1600,00\",EUR,\"1600,00\",\n";

pub const BENCHMARK: &str = "Date,Open,High,Low,Close,Adj Close,Volume\n\
2021-10-29,99.5,100.5,99.0,100.0,100.0,1000\n\
2021-12-01,104.0,105.5,103.5,105.0,105.0,1000\n\
2021-12-31,109.0,110.5,108.5,110.0,110.0,1000\n\
2022-01-03,111.0,112.5,110.5,112.0,112.0,1000\n";

/// Lay out exports, statement, benchmark and a config file in `root`.
/// Returns the config path.
pub fn write_fixtures(root: &Path) -> PathBuf {
    let exports = root.join("exports");
    std::fs::create_dir_all(&exports).expect("failed to create exports dir");
    for (name, body) in SNAPSHOTS {
        std::fs::write(exports.join(name), format!("{HOLDINGS_HEADER}{body}"))
            .expect("failed to write snapshot");
    }

    std::fs::write(root.join("Account.csv"), ACCOUNT).expect("failed to write statement");

    let benchmarks = root.join("benchmarks");
    std::fs::create_dir_all(&benchmarks).expect("failed to create benchmarks dir");
    std::fs::write(benchmarks.join("MSCI_World.csv"), BENCHMARK).expect("failed to write benchmark");

    let config = root.join("portefeuille.toml");
    std::fs::write(
        &config,
        "output = \"results/rapport.xlsx\"\n\n\
         [input]\n\
         exports_dir = \"exports\"\n\
         account_file = \"Account.csv\"\n\
         benchmarks_dir = \"benchmarks\"\n",
    )
    .expect("failed to write config");
    config
}

pub fn base_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("portefeuille"));
    cmd.current_dir(dir.path());
    cmd.env("XDG_CONFIG_HOME", dir.path().join(".config"));
    cmd.env_remove("RUST_LOG");
    cmd.arg("--no-color");
    cmd
}

pub fn run_cmd(dir: &TempDir, args: &[&str]) -> Result<Output> {
    let mut cmd = base_cmd(dir);
    cmd.args(args);
    let output = cmd.output()?;
    if !output.status.success() {
        bail!(
            "command failed: {:?}\nstdout: {}\nstderr: {}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(output)
}

pub fn run_cmd_json(dir: &TempDir, args: &[&str]) -> Result<Value> {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let output = run_cmd(dir, &full)?;
    let stdout = String::from_utf8(output.stdout)?;
    Ok(serde_json::from_str(&stdout)?)
}
