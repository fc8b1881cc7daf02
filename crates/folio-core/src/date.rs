use crate::{Error, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A month-resolution calendar date.
///
/// Stored as the first day of the month so day arithmetic (color cooldowns) and month arithmetic
/// (durations, nearby windows) both fall out of the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    /// Inverse of [`YearMonth::epoch_month`].
    pub fn from_epoch_month(epoch_month: i64) -> Option<Self> {
        let year = i32::try_from(epoch_month.div_euclid(12)).ok()?;
        let month = u32::try_from(epoch_month.rem_euclid(12) + 1).ok()?;
        Self::new(year, month)
    }

    /// The current month in the local timezone.
    pub fn today() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Months since year zero (`year * 12 + month - 1`).
    pub fn epoch_month(self) -> i64 {
        i64::from(self.year()) * 12 + i64::from(self.month()) - 1
    }

    pub fn first_day(self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match CalendarDate::parse(s)? {
            CalendarDate::YearMonth(ym) => Ok(ym),
            CalendarDate::Full(d) => Ok(Self::from_date(d)),
        }
    }
}

/// A date as it arrives from the content service: either coarse (`2023-03`) or a full date
/// (`2023-03-15`, possibly with a time component that is discarded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarDate {
    YearMonth(YearMonth),
    Full(NaiveDate),
}

impl CalendarDate {
    pub fn parse(raw: &str) -> Result<Self> {
        let s = raw.trim();
        let invalid = || Error::InvalidDate {
            value: raw.to_string(),
        };
        if s.is_empty() {
            return Err(invalid());
        }

        if let Some(ym) = parse_year_month(s) {
            return Ok(Self::YearMonth(ym));
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self::Full(d));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::Full(dt.date_naive()));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(Self::Full(dt.date()));
        }
        Err(invalid())
    }

    pub fn year_month(self) -> YearMonth {
        match self {
            Self::YearMonth(ym) => ym,
            Self::Full(d) => YearMonth::from_date(d),
        }
    }

    pub fn epoch_month(self) -> i64 {
        self.year_month().epoch_month()
    }

    /// The day this date denotes; coarse dates resolve to the first of their month.
    pub fn first_day(self) -> NaiveDate {
        match self {
            Self::YearMonth(ym) => ym.first_day(),
            Self::Full(d) => d,
        }
    }

    fn precision_rank(self) -> u8 {
        match self {
            Self::YearMonth(_) => 0,
            Self::Full(_) => 1,
        }
    }
}

/// `YYYY-MM` with a four digit year and a one or two digit month.
fn parse_year_month(s: &str) -> Option<YearMonth> {
    let (year, month) = s.split_once('-')?;
    if year.len() != 4 || month.is_empty() || month.len() > 2 {
        return None;
    }
    if !year.bytes().all(|b| b.is_ascii_digit()) || !month.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    YearMonth::new(year.parse().ok()?, month.parse().ok()?)
}

impl Ord for CalendarDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.first_day()
            .cmp(&other.first_day())
            .then_with(|| self.precision_rank().cmp(&other.precision_rank()))
    }
}

impl PartialOrd for CalendarDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<YearMonth> for CalendarDate {
    fn from(value: YearMonth) -> Self {
        Self::YearMonth(value)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::YearMonth(ym) => ym.fmt(f),
            Self::Full(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl FromStr for CalendarDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
