//! Ledger Configuration
//!
//! Holding-period threshold used to split consumed shares into long- and short-term.

use crate::error::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};

/// Default long-term holding threshold (US rules, one year)
pub const DEFAULT_TAX_THRESHOLD_DAYS: u32 = 365;

/// Environment variable overriding the holding threshold
pub const THRESHOLD_ENV_VAR: &str = "LEDGER_TAX_THRESHOLD_DAYS";

/// Configuration for a [`Ledger`](crate::Ledger)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// A lot is long-term once the sell date is strictly more than this many days after the buy date
    pub tax_threshold_days: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            tax_threshold_days: DEFAULT_TAX_THRESHOLD_DAYS,
        }
    }
}

impl LedgerConfig {
    /// Build the configuration from the environment, falling back to defaults
    pub fn from_env() -> LedgerResult<Self> {
        match std::env::var(THRESHOLD_ENV_VAR) {
            Ok(raw) => Self::parse_threshold(&raw),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn with_threshold_days(mut self, days: u32) -> Self {
        self.tax_threshold_days = days;
        self
    }

    fn parse_threshold(raw: &str) -> LedgerResult<Self> {
        let days = raw.trim().parse::<u32>().map_err(|e| {
            LedgerError::InvalidConfig(format!("{THRESHOLD_ENV_VAR}='{raw}': {e}"))
        })?;
        Ok(Self::default().with_threshold_days(days))
    }
}
