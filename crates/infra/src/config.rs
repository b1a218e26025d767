//! Configuration loading and representation.

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;

use backoffice_observability::LogFormat;

pub const LEDGER_PATH_VAR: &str = "BACKOFFICE_LEDGER_PATH";
pub const TOLERANCE_VAR: &str = "BACKOFFICE_TOLERANCE";
pub const LOG_FORMAT_VAR: &str = "BACKOFFICE_LOG_FORMAT";

const DEFAULT_LEDGER_PATH: &str = "ledger.json";

/// Settings for a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// Snapshot file to read accounts and movements from.
    pub ledger_path: PathBuf,
    /// Largest absolute difference still reported as balanced. Zero means exact.
    pub tolerance: Decimal,
    pub log_format: LogFormat,
    /// Invalid values that were replaced by defaults, kept until logging is up.
    pub warnings: Vec<String>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            tolerance: Decimal::ZERO,
            log_format: LogFormat::default(),
            warnings: Vec::new(),
        }
    }
}

impl ReconcileConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Invalid values are replaced by the default and noted in `warnings`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(LEDGER_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            config.ledger_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(TOLERANCE_VAR) {
            match parse_tolerance(&raw) {
                Ok(tolerance) => config.tolerance = tolerance,
                Err(e) => config
                    .warnings
                    .push(format!("{TOLERANCE_VAR}: {e}; using exact comparison")),
            }
        }

        if let Some(raw) = lookup(LOG_FORMAT_VAR) {
            match raw.parse::<LogFormat>() {
                Ok(format) => config.log_format = format,
                Err(e) => config.warnings.push(format!("{LOG_FORMAT_VAR}: {e}; using text")),
            }
        }

        config
    }

    /// Emit the collected `warnings`; call once tracing is initialized.
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            tracing::warn!("{warning}");
        }
    }
}

/// Parse a non-negative decimal tolerance such as `0.01`.
pub fn parse_tolerance(raw: &str) -> Result<Decimal, String> {
    let value =
        Decimal::from_str(raw.trim()).map_err(|e| format!("invalid tolerance '{raw}': {e}"))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(format!("tolerance must not be negative (got {value})"));
    }
    Ok(value)
}
