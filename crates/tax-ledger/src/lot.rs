//! Tax Lots
//!
//! Per-date lot records and the long/short classification of consumed shares.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Quantities closer than this are treated as equal
pub(crate) const QUANTITY_EPSILON: f64 = 1e-9;

/// Latest buy date excluded from long-term treatment as of `as_of`.
///
/// Lots bought strictly before the cutoff are long-term. `None` when the
/// threshold reaches past the earliest representable date, in which case no
/// lot can be long-term.
pub fn longterm_cutoff(as_of: NaiveDate, threshold_days: u32) -> Option<NaiveDate> {
    as_of.checked_sub_days(Days::new(threshold_days as u64))
}

/// Holding period classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldingPeriod {
    ShortTerm,
    LongTerm,
}

impl HoldingPeriod {
    /// Classify a lot bought on `lot_date` and sold on `sell_date`.
    ///
    /// Long-term requires the lot to be held for strictly more than
    /// `threshold_days`; a lot held exactly the threshold is short-term.
    pub fn classify(lot_date: NaiveDate, sell_date: NaiveDate, threshold_days: u32) -> Self {
        match longterm_cutoff(sell_date, threshold_days) {
            Some(cutoff) if cutoff > lot_date => HoldingPeriod::LongTerm,
            _ => HoldingPeriod::ShortTerm,
        }
    }

    pub fn is_long_term(&self) -> bool {
        matches!(self, HoldingPeriod::LongTerm)
    }
}

impl std::fmt::Display for HoldingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HoldingPeriod::ShortTerm => write!(f, "short_term"),
            HoldingPeriod::LongTerm => write!(f, "long_term"),
        }
    }
}

/// Buy/sell activity for one asset on one date
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LotRecord {
    /// Shares acquired on this date (the lot)
    pub buys: f64,
    /// Shares sold on this date, informational only
    pub sells: f64,
    /// Portion of `buys` already attributed to later sales
    pub tax_used: f64,
}

impl LotRecord {
    /// Split a signed net transaction into its buy and sell sides
    pub fn from_net(quantity: f64) -> Self {
        Self {
            buys: quantity.max(0.0),
            sells: (-quantity).max(0.0),
            tax_used: 0.0,
        }
    }

    /// Shares of this lot not yet consumed
    pub fn available(&self) -> f64 {
        (self.buys - self.tax_used).max(0.0)
    }

    pub fn is_exhausted(&self) -> bool {
        self.available() <= QUANTITY_EPSILON
    }

    /// Consume up to `wanted` shares, returning how many were taken.
    ///
    /// `tax_used` accumulates and never exceeds `buys`.
    pub(crate) fn consume(&mut self, wanted: f64) -> f64 {
        let taken = self.available().min(wanted);
        self.tax_used = (self.tax_used + taken).min(self.buys);
        taken
    }
}

/// Classification of the shares sold for one asset on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLotSplit {
    /// Asset identifier
    pub asset: String,
    /// Shares drawn from lots held longer than the threshold
    pub long_term_shares: f64,
    /// Shares drawn from lots held within the threshold
    pub short_term_shares: f64,
}

impl TaxLotSplit {
    pub fn new(asset: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            long_term_shares: 0.0,
            short_term_shares: 0.0,
        }
    }

    pub(crate) fn add(&mut self, period: HoldingPeriod, shares: f64) {
        match period {
            HoldingPeriod::LongTerm => self.long_term_shares += shares,
            HoldingPeriod::ShortTerm => self.short_term_shares += shares,
        }
    }

    /// Total shares classified, equal to the quantity sold
    pub fn total(&self) -> f64 {
        self.long_term_shares + self.short_term_shares
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_holding_period_boundary() {
        let sell = ymd(2021, 1, 1);

        // Exactly 365 days - short term
        let exact = sell - Duration::days(365);
        assert_eq!(HoldingPeriod::classify(exact, sell, 365), HoldingPeriod::ShortTerm);

        // One more day - long term
        let older = exact - Duration::days(1);
        assert_eq!(HoldingPeriod::classify(older, sell, 365), HoldingPeriod::LongTerm);
    }

    #[test]
    fn test_zero_threshold() {
        let day = ymd(2020, 3, 1);
        assert_eq!(HoldingPeriod::classify(day, day, 0), HoldingPeriod::ShortTerm);
        assert_eq!(
            HoldingPeriod::classify(day - Duration::days(1), day, 0),
            HoldingPeriod::LongTerm
        );
    }

    #[test]
    fn test_threshold_beyond_calendar_range() {
        let sell = ymd(2020, 1, 2);
        assert_eq!(longterm_cutoff(sell, 100_000_000), None);
        assert_eq!(
            HoldingPeriod::classify(ymd(2020, 1, 1), sell, 100_000_000),
            HoldingPeriod::ShortTerm
        );
        assert_eq!(
            HoldingPeriod::classify(NaiveDate::MIN, sell, u32::MAX),
            HoldingPeriod::ShortTerm
        );
    }

    #[test]
    fn test_lot_from_net() {
        assert_eq!(
            LotRecord::from_net(100.0),
            LotRecord { buys: 100.0, sells: 0.0, tax_used: 0.0 }
        );
        assert_eq!(
            LotRecord::from_net(-40.0),
            LotRecord { buys: 0.0, sells: 40.0, tax_used: 0.0 }
        );
        assert_eq!(LotRecord::from_net(0.0), LotRecord::default());
    }

    #[test]
    fn test_consume_accumulates() {
        let mut lot = LotRecord::from_net(100.0);

        assert_eq!(lot.consume(30.0), 30.0);
        assert_eq!(lot.consume(50.0), 50.0);
        assert_eq!(lot.tax_used, 80.0);
        assert_eq!(lot.available(), 20.0);

        // Only what remains can be taken
        assert_eq!(lot.consume(50.0), 20.0);
        assert_eq!(lot.tax_used, 100.0);
        assert!(lot.is_exhausted());
    }

    #[test]
    fn test_split_total() {
        let mut split = TaxLotSplit::new("X");
        split.add(HoldingPeriod::LongTerm, 100.0);
        split.add(HoldingPeriod::ShortTerm, 20.0);
        assert_eq!(split.long_term_shares, 100.0);
        assert_eq!(split.short_term_shares, 20.0);
        assert_eq!(split.total(), 120.0);
    }

    #[test]
    fn test_split_serializes_three_keys() {
        let split = TaxLotSplit::new("X");
        let value = serde_json::to_value(&split).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["asset", "long_term_shares", "short_term_shares"]);
    }
}
