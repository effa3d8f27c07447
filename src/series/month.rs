//! Calendar month keys and lenient date parsing.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A calendar month, ordered chronologically and rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// Derive the month of a date-like string.
    ///
    /// Full dates and date-times are tried first. Failing that, the first two
    /// `-`-separated parts are read as year and month (so `2024-03` or
    /// `2024-03-xx` still land in March 2024). Anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        parse_full_date(raw)
            .map(Self::from_date)
            .or_else(|| parse_year_month_prefix(raw))
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_year_month_prefix(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid month key '{raw}'")))
    }
}

fn parse_full_date(raw: &str) -> Option<NaiveDate> {
    const DATE_FMTS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
    const DATETIME_FMTS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive())
}

fn parse_year_month_prefix(raw: &str) -> Option<MonthKey> {
    let mut parts = raw.trim().split('-');
    let year = parts.next()?.trim().parse::<i32>().ok()?;
    let month = parts.next()?.trim().parse::<u32>().ok()?;
    MonthKey::new(year, month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(y: i32, m: u32) -> MonthKey {
        MonthKey::new(y, m).unwrap()
    }

    #[test]
    fn parses_full_dates_and_datetimes() {
        assert_eq!(MonthKey::parse("2024-01-31"), Some(key(2024, 1)));
        assert_eq!(MonthKey::parse("2024/02/29"), Some(key(2024, 2)));
        assert_eq!(MonthKey::parse("2024-03-31 00:00:00"), Some(key(2024, 3)));
        assert_eq!(MonthKey::parse("2024-04-30T12:00:00"), Some(key(2024, 4)));
        assert_eq!(MonthKey::parse("2024-05-01T00:00:00Z"), Some(key(2024, 5)));
    }

    #[test]
    fn falls_back_to_year_month_prefix() {
        assert_eq!(MonthKey::parse("2024-06"), Some(key(2024, 6)));
        assert_eq!(MonthKey::parse("2024-07-99"), Some(key(2024, 7)));
        assert_eq!(MonthKey::parse("2024-7"), Some(key(2024, 7)));
    }

    #[test]
    fn rejects_unparseable_values() {
        assert_eq!(MonthKey::parse(""), None);
        assert_eq!(MonthKey::parse("last week"), None);
        assert_eq!(MonthKey::parse("2024"), None);
        assert_eq!(MonthKey::parse("2024-13"), None);
    }

    #[test]
    fn display_and_ordering_are_chronological() {
        let mut keys = vec![key(2024, 10), key(2023, 12), key(2024, 2)];
        keys.sort();
        let labels: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(labels, vec!["2023-12", "2024-02", "2024-10"]);

        let mut lexical = labels.clone();
        lexical.sort();
        assert_eq!(lexical, labels);
    }

    #[test]
    fn serde_uses_label_form() {
        let json = serde_json::to_string(&key(2024, 3)).unwrap();
        assert_eq!(json, "\"2024-03\"");
        let back: MonthKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key(2024, 3));
    }
}
