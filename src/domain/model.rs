use chrono::{DateTime, NaiveDate, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::error::{BookingError, Result};

/// A calendar day with no time-of-day, already truncated in the checker's
/// reference timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateOnly(NaiveDate);

impl DateOnly {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DateOnly {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateOnly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Occupied range `[start, end)`: the checkout day itself is free.
///
/// `start < end` always holds; the only ways to obtain an `Interval` are
/// [`Interval::new`] and deserialization, and both go through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IntervalParts", into = "IntervalParts")]
pub struct Interval {
    start: DateOnly,
    end: DateOnly,
}

#[derive(Serialize, Deserialize)]
struct IntervalParts {
    check_in: DateOnly,
    check_out: DateOnly,
}

impl Interval {
    pub fn new(start: DateOnly, end: DateOnly) -> Result<Self> {
        if start >= end {
            return Err(BookingError::InvalidInterval {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateOnly {
        self.start
    }

    pub fn end(&self) -> DateOnly {
        self.end
    }

    /// Number of occupied days.
    pub fn nights(&self) -> i64 {
        (self.end.0 - self.start.0).num_days()
    }

    pub fn contains(&self, day: DateOnly) -> bool {
        self.start <= day && day < self.end
    }

    /// Half-open overlap: each range starts before the other ends.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl TryFrom<IntervalParts> for Interval {
    type Error = BookingError;

    fn try_from(parts: IntervalParts) -> Result<Self> {
        Interval::new(parts.check_in, parts.check_out)
    }
}

impl From<Interval> for IntervalParts {
    fn from(interval: Interval) -> Self {
        Self {
            check_in: interval.start,
            check_out: interval.end,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Any date-like input accepted by the checker's `normalize`.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDate {
    Text(String),
    Timestamp(DateTime<chrono::FixedOffset>),
    UnixMillis(i64),
    Date(NaiveDate),
    Day(DateOnly),
}

impl RawDate {
    /// 錯誤訊息用的原始輸入
    pub fn describe(&self) -> String {
        match self {
            RawDate::Text(text) => text.clone(),
            RawDate::Timestamp(ts) => ts.to_rfc3339(),
            RawDate::UnixMillis(ms) => ms.to_string(),
            RawDate::Date(date) => date.to_string(),
            RawDate::Day(day) => day.to_string(),
        }
    }
}

impl From<&str> for RawDate {
    fn from(text: &str) -> Self {
        RawDate::Text(text.to_string())
    }
}

impl From<String> for RawDate {
    fn from(text: String) -> Self {
        RawDate::Text(text)
    }
}

impl From<NaiveDate> for RawDate {
    fn from(date: NaiveDate) -> Self {
        RawDate::Date(date)
    }
}

impl From<DateOnly> for RawDate {
    fn from(day: DateOnly) -> Self {
        RawDate::Day(day)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for RawDate {
    fn from(ts: DateTime<Tz>) -> Self {
        let offset = ts.offset().fix();
        RawDate::Timestamp(ts.with_timezone(&offset))
    }
}

/// Anything that occupies a resource for an [`Interval`].
pub trait Occupancy {
    fn interval(&self) -> &Interval;
}

impl Occupancy for Interval {
    fn interval(&self) -> &Interval {
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub resource_id: String,
    #[serde(flatten)]
    pub interval: Interval,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(resource_id: impl Into<String>, interval: Interval, guest: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            resource_id: resource_id.into(),
            interval,
            guest,
            created_at: Utc::now(),
        }
    }
}

impl Occupancy for Reservation {
    fn interval(&self) -> &Interval {
        &self.interval
    }
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.id, self.resource_id, self.interval)?;
        if let Some(guest) = &self.guest {
            write!(f, " ({})", guest)?;
        }
        Ok(())
    }
}
