//! Command execution, independent of process setup.

use std::io::Write;

use anyhow::Context;
use rust_decimal::Decimal;

use backoffice_infra::{
    JsonSnapshotSource, LedgerSource, ReconcileConfig, RunError, RunOptions, account_trail,
    reconcile_account, reconcile_all,
};

use crate::cli::{Cli, Command, OutputFormat};
use crate::{dto, render};

/// How a completed command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every reconciled account is within tolerance.
    Clean,
    /// Drift beyond tolerance, or an account whose data could not be reconciled.
    Discrepancy,
}

/// Load the snapshot named by the CLI (or config) and run the command.
pub fn execute(
    cli: &Cli,
    config: &ReconcileConfig,
    out: &mut impl Write,
) -> anyhow::Result<Outcome> {
    let path = cli.data.clone().unwrap_or_else(|| config.ledger_path.clone());
    let source = JsonSnapshotSource::open(&path)
        .with_context(|| format!("loading ledger snapshot {}", path.display()))?;
    tracing::debug!("using ledger snapshot {}", path.display());

    execute_with(cli, config, &source, out)
}

/// Run the command against an already opened source.
pub fn execute_with<S>(
    cli: &Cli,
    config: &ReconcileConfig,
    source: &S,
    out: &mut impl Write,
) -> anyhow::Result<Outcome>
where
    S: LedgerSource + ?Sized,
{
    let tolerance = effective_tolerance(cli, config);

    match &cli.command {
        Command::Account { id, trail } => {
            let result = match reconcile_account(source, *id) {
                Ok(r) => r,
                Err(RunError::Account { id, source: error }) => {
                    write_failure(cli.format, &id.to_string(), &error.to_string(), out)?;
                    return Ok(Outcome::Discrepancy);
                }
                Err(RunError::Source(e)) => return Err(e).context("reading ledger source"),
            };

            let lines = if *trail {
                Some(account_trail(source, *id).context("building audit trail")?)
            } else {
                None
            };

            match cli.format {
                OutputFormat::Text => {
                    write!(out, "{}", render::account(&result, tolerance))?;
                    if let Some(lines) = &lines {
                        writeln!(out)?;
                        write!(out, "{}", render::trail(lines))?;
                    }
                }
                OutputFormat::Json => {
                    let mut doc = dto::reconciliation_to_json(&result, tolerance);
                    if let Some(lines) = &lines {
                        doc["trail"] = lines.iter().map(dto::trail_line_to_json).collect();
                    }
                    writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
                }
            }

            Ok(outcome(result.reconciliation.within(tolerance)))
        }
        Command::All { include_inactive } => {
            let options = RunOptions {
                include_inactive: *include_inactive,
            };
            let report = reconcile_all(source, options).context("reading ledger source")?;

            match cli.format {
                OutputFormat::Text => write!(out, "{}", render::report(&report, tolerance))?,
                OutputFormat::Json => writeln!(
                    out,
                    "{}",
                    serde_json::to_string_pretty(&dto::report_to_json(&report, tolerance))?
                )?,
            }

            Ok(outcome(report.is_clean(tolerance)))
        }
    }
}

fn outcome(clean: bool) -> Outcome {
    if clean {
        Outcome::Clean
    } else {
        Outcome::Discrepancy
    }
}

fn write_failure(
    format: OutputFormat,
    id: &str,
    error: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "FAILED  {id}: {error}")?,
        OutputFormat::Json => writeln!(
            out,
            "{}",
            serde_json::json!({ "account_id": id, "error": error })
        )?,
    }
    Ok(())
}

/// Command-line tolerance wins over the configured one.
fn effective_tolerance(cli: &Cli, config: &ReconcileConfig) -> Decimal {
    cli.tolerance.unwrap_or(config.tolerance)
}
