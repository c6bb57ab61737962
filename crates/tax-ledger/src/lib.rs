//! Tax Ledger
//!
//! Per-asset lot tracking for trading simulations. Each time step records
//! net buys and sells; sales consume the oldest lots first and are split
//! into long-term and short-term shares by a holding-period threshold.

pub mod config;
pub mod date;
pub mod error;
pub mod ledger;
pub mod lot;


pub use config::{LedgerConfig, DEFAULT_TAX_THRESHOLD_DAYS};
pub use date::{canonical_date_string, parse_date, DateInput};
pub use error::{LedgerError, LedgerResult};
pub use ledger::Ledger;
pub use lot::{longterm_cutoff, HoldingPeriod, LotRecord, TaxLotSplit};
