//! Lot Ledger
//!
//! Records per-asset buy/sell activity one date at a time and classifies
//! every sale as long- or short-term by consuming the oldest lots first.

use crate::config::LedgerConfig;
use crate::date::DateInput;
use crate::error::{LedgerError, LedgerResult};
use crate::lot::{self, HoldingPeriod, LotRecord, TaxLotSplit, QUANTITY_EPSILON};
use chrono::NaiveDate;
use std::collections::BTreeMap;

type LotMap = BTreeMap<NaiveDate, LotRecord>;

/// Per-asset lot history for one simulation run.
///
/// Call [`log_date`](Ledger::log_date) at most once per date. Dates may
/// arrive out of order, but every date is recorded only once; re-logging a
/// date is rejected rather than resetting the lots it already touched.
///
/// The ledger is not synchronised. Callers sharing it across threads must
/// serialise access themselves.
#[derive(Debug, Clone)]
pub struct Ledger {
    assets: Vec<String>,
    config: LedgerConfig,
    /// Dates in the order they were first logged
    dates: Vec<NaiveDate>,
    /// Lots per asset, indexed like `assets`
    records: Vec<LotMap>,
}

impl Ledger {
    /// Create a ledger over a fixed asset universe
    pub fn new<I, S>(assets: I, config: LedgerConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let assets: Vec<String> = assets.into_iter().map(Into::into).collect();
        let records = vec![LotMap::new(); assets.len()];

        tracing::info!(
            "Ledger created for {} assets (long-term threshold: {} days)",
            assets.len(),
            config.tax_threshold_days
        );

        Self {
            assets,
            config,
            dates: Vec::new(),
            records,
        }
    }

    /// Create a ledger with a custom holding threshold
    pub fn with_threshold_days<I, S>(assets: I, tax_threshold_days: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            assets,
            LedgerConfig::default().with_threshold_days(tax_threshold_days),
        )
    }

    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn tax_threshold_days(&self) -> u32 {
        self.config.tax_threshold_days
    }

    /// Logged dates, in the order they were first seen
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Latest logged calendar date
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.dates.iter().max().copied()
    }

    /// Position of an asset in the universe
    pub fn asset_index(&self, asset: &str) -> LedgerResult<usize> {
        self.assets
            .iter()
            .position(|a| a == asset)
            .ok_or_else(|| LedgerError::UnknownAsset(asset.to_string()))
    }

    /// All lots for an asset, oldest first
    pub fn lots(&self, index: usize) -> Option<&BTreeMap<NaiveDate, LotRecord>> {
        self.records.get(index)
    }

    pub fn lot(&self, index: usize, date: NaiveDate) -> Option<&LotRecord> {
        self.records.get(index)?.get(&date)
    }

    /// Unconsumed shares across every lot of an asset
    pub fn available_shares(&self, index: usize) -> Option<f64> {
        self.records
            .get(index)
            .map(|lots| lots.values().map(LotRecord::available).sum())
    }

    /// Record one time step of net transactions.
    ///
    /// `transactions[i]` is the net quantity for `assets()[i]`: positive
    /// buys, negative sells. Every asset with a sale gets a [`TaxLotSplit`]
    /// keyed by its index; assets without a sale are omitted.
    ///
    /// All inputs are validated, including lot coverage for every sale,
    /// before anything is written. On error the ledger is unchanged.
    pub fn log_date<'a>(
        &mut self,
        date: impl Into<DateInput<'a>>,
        transactions: &[f64],
    ) -> LedgerResult<BTreeMap<usize, TaxLotSplit>> {
        let date = date.into().resolve()?;

        if transactions.len() != self.assets.len() {
            return Err(LedgerError::LengthMismatch {
                expected: self.assets.len(),
                actual: transactions.len(),
            });
        }
        if let Some((asset, &value)) = self
            .assets
            .iter()
            .zip(transactions)
            .find(|(_, t)| !t.is_finite())
        {
            return Err(LedgerError::InvalidQuantity {
                asset: asset.clone(),
                value,
            });
        }
        if self.dates.contains(&date) {
            return Err(LedgerError::DuplicateDate(date));
        }

        // Consume against working copies so a failed sale commits nothing
        let mut staged: BTreeMap<usize, (LotMap, TaxLotSplit)> = BTreeMap::new();
        for (index, &quantity) in transactions.iter().enumerate() {
            let record = LotRecord::from_net(quantity);
            if record.sells > 0.0 {
                let (mut lots, split) = self.consume_lots(index, record.sells, date)?;
                lots.insert(date, record);
                staged.insert(index, (lots, split));
            }
        }

        if let Some(latest) = self.latest_date() {
            if date < latest {
                tracing::warn!("Logging {} before latest recorded date {}", date, latest);
            }
        }
        self.dates.push(date);

        let mut splits = BTreeMap::new();
        for (index, &quantity) in transactions.iter().enumerate() {
            match staged.remove(&index) {
                Some((lots, split)) => {
                    self.records[index] = lots;
                    splits.insert(index, split);
                }
                None => {
                    self.records[index].insert(date, LotRecord::from_net(quantity));
                }
            }
        }

        Ok(splits)
    }

    /// FIFO consumption of `sells` shares of one asset on `sell_date`.
    ///
    /// Returns the updated lots without committing them.
    fn consume_lots(
        &self,
        index: usize,
        sells: f64,
        sell_date: NaiveDate,
    ) -> LedgerResult<(LotMap, TaxLotSplit)> {
        let asset = &self.assets[index];
        let mut lots = self.records[index].clone();

        let available: f64 = lots.values().map(LotRecord::available).sum();
        if available + QUANTITY_EPSILON < sells {
            tracing::warn!(
                "Rejected sale of {} {} on {}: only {} available",
                sells,
                asset,
                sell_date,
                available
            );
            return Err(LedgerError::InsufficientLots {
                asset: asset.clone(),
                date: sell_date,
                requested: sells,
                available,
            });
        }

        let mut split = TaxLotSplit::new(asset.as_str());
        let mut remaining = sells;

        for (lot_date, lot) in lots.iter_mut() {
            if remaining <= QUANTITY_EPSILON {
                break;
            }
            // Sub-epsilon residue is part of the coverage sum above
            if lot.available() <= 0.0 {
                continue;
            }

            let period =
                HoldingPeriod::classify(*lot_date, sell_date, self.config.tax_threshold_days);
            let taken = lot.consume(remaining);
            remaining -= taken;
            split.add(period, taken);

            tracing::debug!(
                "{}: consumed {} from lot {} ({}), {} left in lot",
                asset,
                taken,
                lot_date,
                period,
                lot.available()
            );
        }

        Ok((lots, split))
    }

    /// Lots dated strictly before the returned date are long-term.
    /// `None` when the threshold reaches past the calendar range.
    fn longterm_cutoff(&self) -> LedgerResult<Option<NaiveDate>> {
        let latest = self.latest_date().ok_or(LedgerError::NoDates)?;
        Ok(lot::longterm_cutoff(latest, self.config.tax_threshold_days))
    }

    /// Unconsumed shares per asset from lots older than the holding
    /// threshold, as of the latest logged date
    pub fn get_longterm_holdings(&self) -> LedgerResult<Vec<f64>> {
        let Some(cutoff) = self.longterm_cutoff()? else {
            return Ok(vec![0.0; self.assets.len()]);
        };
        Ok(self
            .records
            .iter()
            .map(|lots| lots.range(..cutoff).map(|(_, lot)| lot.available()).sum::<f64>())
            .collect())
    }

    /// Unconsumed shares per asset still inside the holding threshold
    pub fn get_shortterm_holdings(&self) -> LedgerResult<Vec<f64>> {
        let cutoff = self.longterm_cutoff()?.unwrap_or(NaiveDate::MIN);
        Ok(self
            .records
            .iter()
            .map(|lots| lots.range(cutoff..).map(|(_, lot)| lot.available()).sum::<f64>())
            .collect())
    }
}
