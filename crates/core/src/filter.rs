//! Named listing criteria sent alongside the page window.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

const QUERY_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Opaque set of criteria (`user_id`, `chat_id`, `start_date`, ...).
///
/// Blank values are never stored, so an empty form field never reaches the
/// backend as `key=`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter {
    criteria: BTreeMap<String, String>,
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `key=value`, or drops `key` when `value` is blank.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Like [`Filter::with`] for optional form values.
    #[must_use]
    pub fn with_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.criteria.remove(&key);
        } else {
            self.criteria.insert(key, trimmed.to_owned());
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.criteria.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.criteria.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.criteria.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Criteria as owned query pairs, in key order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.criteria.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Single-day criterion in `YYYY-MM-DD` form (the logs `date` parameter).
    #[must_use]
    pub fn with_date(self, key: impl Into<String>, date: Option<NaiveDate>) -> Self {
        self.with_opt(key, date.map(|d| d.format("%Y-%m-%d").to_string()))
    }

    /// Adds `start_date`/`end_date` covering whole local days: the start of
    /// `start` and the last second of `end`, both sent as UTC.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidDateRange` when `start` is after `end`.
    pub fn with_date_range(self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        self.with_date_range_in(start, end, &Local)
    }

    /// [`Self::with_date_range`] with the days taken in `tz`.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidDateRange` when `start` is after `end`.
    pub fn with_date_range_in<Tz: TimeZone>(
        self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        tz: &Tz,
    ) -> Result<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(CoreError::InvalidDateRange { start: s.to_string(), end: e.to_string() });
            }
        }
        let start_value = start.and_then(|d| d.and_hms_opt(0, 0, 0)).and_then(|dt| utc_bound(dt, tz));
        let end_value = end.and_then(|d| d.and_hms_opt(23, 59, 59)).and_then(|dt| utc_bound(dt, tz));
        Ok(self.with_opt("start_date", start_value).with_opt("end_date", end_value))
    }
}

/// Wall-clock time in `tz` as a UTC query value. A time skipped by a DST
/// jump moves forward by the gap, one hour at most.
fn utc_bound<Tz: TimeZone>(local: NaiveDateTime, tz: &Tz) -> Option<String> {
    let resolved = tz
        .from_local_datetime(&local)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(local + TimeDelta::hours(1))).earliest())?;
    Some(resolved.with_timezone(&Utc).format(QUERY_DATETIME_FORMAT).to_string())
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Filter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filter = Self::new();
        for (k, v) in iter {
            filter.set(k, v);
        }
        filter
    }
}

/// Parses a date typed as `YYYY-MM-DD` or as the dashboard's `DD.MM.YYYY`.
///
/// # Errors
/// Returns `CoreError::InvalidDate` for anything else.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d.%m.%Y"))
        .map_err(|_| CoreError::InvalidDate { value: raw.to_owned() })
}
