//! Date Input
//!
//! Accepts calendar dates either as `NaiveDate` values or as strings and
//! normalises them to a single calendar day.

use crate::error::{LedgerError, LedgerResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// A date as supplied by the caller of [`Ledger::log_date`](crate::Ledger::log_date)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput<'a> {
    Date(NaiveDate),
    Text(&'a str),
}

impl From<NaiveDate> for DateInput<'_> {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(s: &'a str) -> Self {
        DateInput::Text(s)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(s: &'a String) -> Self {
        DateInput::Text(s.as_str())
    }
}

impl DateInput<'_> {
    /// Resolve to a calendar day
    pub fn resolve(&self) -> LedgerResult<NaiveDate> {
        match self {
            DateInput::Date(d) => Ok(*d),
            DateInput::Text(s) => parse_date(s),
        }
    }
}

/// Parse a string as a calendar date. Date-times keep only their day.
pub fn parse_date(s: &str) -> LedgerResult<NaiveDate> {
    let trimmed = s.trim();

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive());
    }

    Err(LedgerError::InvalidDate(s.to_string()))
}

/// Canonical `YYYY-MM-DD` form used at the API boundary
pub fn canonical_date_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso() {
        assert_eq!(parse_date("2020-01-01").unwrap(), ymd(2020, 1, 1));
        assert_eq!(parse_date("  2021-02-01\n").unwrap(), ymd(2021, 2, 1));
    }

    #[test]
    fn test_parse_alternate_formats() {
        assert_eq!(parse_date("2020/06/01").unwrap(), ymd(2020, 6, 1));
        assert_eq!(parse_date("20200601").unwrap(), ymd(2020, 6, 1));
        assert_eq!(parse_date("06/01/2020").unwrap(), ymd(2020, 6, 1));
    }

    #[test]
    fn test_parse_datetime_keeps_day() {
        assert_eq!(parse_date("2020-06-01 15:30:00").unwrap(), ymd(2020, 6, 1));
        assert_eq!(parse_date("2020-06-01T09:00:00").unwrap(), ymd(2020, 6, 1));
        assert_eq!(
            parse_date("2020-06-01T23:59:59+00:00").unwrap(),
            ymd(2020, 6, 1)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            parse_date("not a date"),
            Err(LedgerError::InvalidDate("not a date".to_string()))
        );
        assert!(parse_date("2020-13-01").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_canonical_string() {
        let d = parse_date("2020/6/1").unwrap();
        assert_eq!(canonical_date_string(d), "2020-06-01");
    }

    #[test]
    fn test_date_input_resolve() {
        let date = ymd(2020, 1, 1);
        assert_eq!(DateInput::from(date).resolve().unwrap(), date);
        assert_eq!(DateInput::from("2020-01-01").resolve().unwrap(), date);
        let owned = String::from("2020-01-01");
        assert_eq!(DateInput::from(&owned).resolve().unwrap(), date);
    }
}
