//! Rotating imagery date for layers without a fixed date.

use chrono::{NaiveDate, Utc};

/// Default first date handed out by a fresh [`DateCursor`].
pub const DEFAULT_DATE_EPOCH: &str = "2019-01-01";

/// Date format used in remote tile URLs.
pub const URL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, TimeParseError> {
    NaiveDate::parse_from_str(s.trim(), URL_DATE_FORMAT)
        .map_err(|_| TimeParseError::InvalidFormat(s.to_string()))
}

/// Format a date the way remote tile URLs expect it.
pub fn format_date(date: &NaiveDate) -> String {
    date.format(URL_DATE_FORMAT).to_string()
}

/// Today's calendar date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// The epoch used when none is configured.
pub fn default_epoch() -> NaiveDate {
    parse_date(DEFAULT_DATE_EPOCH).unwrap_or_default()
}

/// A calendar cursor stepping one day per resolution.
///
/// All date-less layers share a single cursor. Callers serialize access;
/// the cursor itself is a plain value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateCursor {
    epoch: NaiveDate,
    current: NaiveDate,
}

impl DateCursor {
    /// A fresh cursor positioned at `epoch`.
    pub fn new(epoch: NaiveDate) -> Self {
        Self {
            epoch,
            current: epoch,
        }
    }

    pub fn epoch(&self) -> NaiveDate {
        self.epoch
    }

    pub fn current(&self) -> NaiveDate {
        self.current
    }

    /// Step forward one day and return the new position.
    ///
    /// The candidate day is compared with `today` before the cursor moves:
    /// if it would land after `today` the cursor wraps back to the epoch
    /// instead, so a date later than `today` is never returned.
    pub fn advance(&mut self, today: NaiveDate) -> NaiveDate {
        self.current = match self.current.succ_opt() {
            Some(next) if next <= today => next,
            _ => self.epoch,
        };
        self.current
    }
}

impl Default for DateCursor {
    fn default() -> Self {
        Self::new(default_epoch())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid date format: {0}. Expected YYYY-MM-DD")]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_advance_steps_one_day() {
        let mut cursor = DateCursor::new(date("2019-01-01"));
        let today = date("2024-06-01");
        assert_eq!(cursor.advance(today), date("2019-01-02"));
        assert_eq!(cursor.advance(today), date("2019-01-03"));
        assert_eq!(cursor.current(), date("2019-01-03"));
    }

    #[test]
    fn test_advance_crosses_month_and_year() {
        let mut cursor = DateCursor::new(date("2019-12-31"));
        assert_eq!(cursor.advance(date("2024-06-01")), date("2020-01-01"));
    }

    #[test]
    fn test_advance_reaches_today_then_wraps() {
        let today = date("2019-01-03");
        let mut cursor = DateCursor::new(date("2019-01-01"));
        assert_eq!(cursor.advance(today), date("2019-01-02"));
        assert_eq!(cursor.advance(today), date("2019-01-03"));
        // never hands out a future date
        assert_eq!(cursor.advance(today), date("2019-01-01"));
        assert_eq!(cursor.advance(today), date("2019-01-02"));
    }

    #[test]
    fn test_advance_never_passes_today() {
        let today = date("2019-02-10");
        let mut cursor = DateCursor::new(date("2019-01-01"));
        let mut wraps = 0;

        for _ in 0..200 {
            let next = cursor.advance(today);
            assert!(next <= today, "{} is after {}", next, today);
            if next == cursor.epoch() {
                wraps += 1;
            }
        }
        assert!(wraps > 0);
    }

    #[test]
    fn test_epoch_after_today_stays_at_epoch() {
        let mut cursor = DateCursor::new(date("2030-01-01"));
        assert_eq!(cursor.advance(date("2024-01-01")), date("2030-01-01"));
    }

    #[test]
    fn test_format_and_parse() {
        assert_eq!(format_date(&date("2019-03-07")), "2019-03-07");
        assert!(parse_date("07/03/2019").is_err());
        assert_eq!(default_epoch(), date(DEFAULT_DATE_EPOCH));
    }
}
