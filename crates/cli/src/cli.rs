use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

use backoffice_core::AccountId;

/// Check stored account balances against their movement history.
#[derive(Debug, Parser)]
#[command(name = "reconcile", version)]
pub struct Cli {
    /// Ledger snapshot (JSON). Defaults to $BACKOFFICE_LEDGER_PATH or ./ledger.json.
    #[arg(long, global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Largest absolute difference accepted as balanced. Defaults to exact comparison.
    #[arg(long, global = true, value_name = "DECIMAL", value_parser = parse_tolerance_arg)]
    pub tolerance: Option<Decimal>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reconcile a single account.
    Account {
        id: AccountId,

        /// Also print the running-balance trail, oldest movement first.
        #[arg(long)]
        trail: bool,
    },
    /// Reconcile every account in the snapshot.
    All {
        #[arg(long)]
        include_inactive: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn parse_tolerance_arg(value: &str) -> Result<Decimal, String> {
    backoffice_infra::config::parse_tolerance(value)
}
