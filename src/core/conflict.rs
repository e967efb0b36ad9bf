use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

use crate::domain::model::{DateOnly, Interval, Occupancy, RawDate};
use crate::utils::error::{BookingError, Result};

// 分鐘精度、帶時區的 ISO 字串，RFC 3339 不接受
const OFFSET_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M%#z", "%Y-%m-%d %H:%M%#z"];

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Pure date-range conflict checks for a single resource.
///
/// The only state is the reference timezone used to decide which calendar
/// day an instant falls on. It defaults to UTC and never follows the host's
/// local zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalConflictChecker {
    reference: FixedOffset,
}

impl Default for IntervalConflictChecker {
    fn default() -> Self {
        Self {
            reference: Utc.fix(),
        }
    }
}

impl IntervalConflictChecker {
    pub fn new(reference: FixedOffset) -> Self {
        Self { reference }
    }

    pub fn with_utc_offset_minutes(minutes: i32) -> Result<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
            .ok_or_else(|| BookingError::InvalidConfigValue {
                field: "utc_offset_minutes".to_string(),
                value: minutes.to_string(),
                reason: "Offset must be less than 24 hours".to_string(),
            })
    }

    pub fn reference_offset(&self) -> FixedOffset {
        self.reference
    }

    /// Truncate any date-like input to its calendar day in the reference zone.
    pub fn normalize(&self, raw: impl Into<RawDate>) -> Result<DateOnly> {
        let raw = raw.into();
        match raw {
            RawDate::Day(day) => Ok(day),
            RawDate::Date(date) => Ok(DateOnly::from(date)),
            RawDate::Timestamp(ts) => Ok(self.truncate(ts)),
            RawDate::UnixMillis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .map(|ts| self.truncate(ts))
                .ok_or_else(|| BookingError::InvalidDate {
                    input: ms.to_string(),
                    reason: "Timestamp out of range".to_string(),
                }),
            RawDate::Text(text) => self.parse_text(&text),
        }
    }

    /// Normalize both ends and build a validated interval.
    pub fn interval(
        &self,
        check_in: impl Into<RawDate>,
        check_out: impl Into<RawDate>,
    ) -> Result<Interval> {
        let start = self.normalize(check_in)?;
        let end = self.normalize(check_out)?;
        Interval::new(start, end)
    }

    pub fn overlaps(&self, candidate: &Interval, existing: &Interval) -> bool {
        candidate.overlaps(existing)
    }

    /// First item in `existing` that overlaps `candidate`, scanning in order.
    pub fn find_conflict<'a, T, I>(&self, candidate: &Interval, existing: I) -> Option<&'a T>
    where
        T: Occupancy + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        existing
            .into_iter()
            .find(|item| self.overlaps(candidate, item.interval()))
    }

    pub fn has_conflict<'a, T, I>(&self, candidate: &Interval, existing: I) -> bool
    where
        T: Occupancy + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        self.find_conflict(candidate, existing).is_some()
    }

    /// Every overlapping item, in sequence order.
    pub fn conflicts<'a, T, I>(&self, candidate: &Interval, existing: I) -> Vec<&'a T>
    where
        T: Occupancy + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        existing
            .into_iter()
            .filter(|item| self.overlaps(candidate, item.interval()))
            .collect()
    }

    fn truncate<Tz: TimeZone>(&self, ts: DateTime<Tz>) -> DateOnly {
        DateOnly::from(ts.with_timezone(&self.reference).date_naive())
    }

    fn parse_text(&self, text: &str) -> Result<DateOnly> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(BookingError::InvalidDate {
                input: text.to_string(),
                reason: "Empty input".to_string(),
            });
        }

        if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(self.truncate(ts));
        }

        for format in OFFSET_DATETIME_FORMATS {
            if let Ok(ts) = DateTime::parse_from_str(trimmed, format) {
                return Ok(self.truncate(ts));
            }
        }

        // 沒有時區的時間視為參考時區的當地時間
        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(DateOnly::from(naive.date()));
            }
        }

        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(DateOnly::from)
            .map_err(|e| BookingError::InvalidDate {
                input: text.to_string(),
                reason: format!("Expected YYYY-MM-DD or an RFC 3339 timestamp ({})", e),
            })
    }
}

/// A candidate interval together with the existing occupancy of one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictQuery<T = Interval> {
    pub candidate: Interval,
    pub existing: Vec<T>,
}

impl<T: Occupancy> ConflictQuery<T> {
    pub fn new(candidate: Interval, existing: Vec<T>) -> Self {
        Self {
            candidate,
            existing,
        }
    }

    pub fn find_conflict(&self, checker: &IntervalConflictChecker) -> Option<&T> {
        checker.find_conflict(&self.candidate, &self.existing)
    }

    pub fn has_conflict(&self, checker: &IntervalConflictChecker) -> bool {
        checker.has_conflict(&self.candidate, &self.existing)
    }

    pub fn conflicts(&self, checker: &IntervalConflictChecker) -> Vec<&T> {
        checker.conflicts(&self.candidate, &self.existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> IntervalConflictChecker {
        IntervalConflictChecker::default()
    }

    fn iv(start: &str, end: &str) -> Interval {
        checker().interval(start, end).unwrap()
    }

    #[test]
    fn test_touching_boundary_is_not_a_conflict() {
        let candidate = iv("2024-01-10", "2024-01-15");
        let existing = iv("2024-01-15", "2024-01-20");
        assert!(!checker().overlaps(&candidate, &existing));
        assert!(!checker().overlaps(&existing, &candidate));
    }

    #[test]
    fn test_partial_overlap() {
        let candidate = iv("2024-01-10", "2024-01-15");
        let existing = iv("2024-01-14", "2024-01-20");
        assert!(checker().overlaps(&candidate, &existing));
    }

    #[test]
    fn test_disjoint_months() {
        let candidate = iv("2024-01-01", "2024-01-05");
        let existing = iv("2024-02-01", "2024-02-05");
        assert!(!checker().overlaps(&candidate, &existing));
    }

    #[test]
    fn test_containment_overlaps_both_ways() {
        let outer = iv("2024-03-01", "2024-03-31");
        let inner = iv("2024-03-10", "2024-03-12");
        assert!(checker().overlaps(&outer, &inner));
        assert!(checker().overlaps(&inner, &outer));
    }

    #[test]
    fn test_self_overlap() {
        let stay = iv("2024-01-10", "2024-01-11");
        assert!(checker().overlaps(&stay, &stay));
    }

    #[test]
    fn test_zero_length_candidate_is_invalid_interval() {
        let err = checker().interval("2024-01-10", "2024-01-10").unwrap_err();
        assert!(matches!(err, BookingError::InvalidInterval { .. }));
    }

    #[test]
    fn test_find_conflict_on_empty_set() {
        let existing: Vec<Interval> = Vec::new();
        assert!(checker()
            .find_conflict(&iv("2024-01-10", "2024-01-15"), &existing)
            .is_none());
    }

    #[test]
    fn test_find_conflict_returns_first_in_order() {
        let existing = vec![
            iv("2024-01-01", "2024-01-03"),
            iv("2024-01-12", "2024-01-13"),
            iv("2024-01-14", "2024-01-18"),
        ];
        let candidate = iv("2024-01-10", "2024-01-15");
        let found = checker().find_conflict(&candidate, &existing);
        assert_eq!(found, Some(&existing[1]));
        assert_eq!(checker().conflicts(&candidate, &existing).len(), 2);
    }

    #[test]
    fn test_conflict_query_helpers() {
        let query = ConflictQuery::new(
            iv("2024-05-01", "2024-05-04"),
            vec![iv("2024-04-28", "2024-05-01"), iv("2024-05-04", "2024-05-06")],
        );
        assert!(!query.has_conflict(&checker()));
        assert!(query.find_conflict(&checker()).is_none());
        assert!(query.conflicts(&checker()).is_empty());
    }

    #[test]
    fn test_normalize_truncates_in_utc() {
        let c = checker();
        assert_eq!(
            c.normalize("2024-01-10T23:30:00-05:00").unwrap().to_string(),
            "2024-01-11"
        );
        assert_eq!(
            c.normalize("2024-01-10T00:30:00+02:00").unwrap().to_string(),
            "2024-01-09"
        );
        assert_eq!(c.normalize("2024-01-10T10:00:00Z").unwrap().to_string(), "2024-01-10");
    }

    #[test]
    fn test_normalize_with_reference_offset() {
        let c = IntervalConflictChecker::with_utc_offset_minutes(120).unwrap();
        assert_eq!(
            c.normalize("2024-01-10T00:30:00+02:00").unwrap().to_string(),
            "2024-01-10"
        );
    }

    #[test]
    fn test_normalize_minute_precision_with_offset() {
        let c = checker();
        assert_eq!(c.normalize("2024-01-10T10:00Z").unwrap().to_string(), "2024-01-10");
        assert_eq!(
            c.normalize("2024-01-10T23:30-05:00").unwrap().to_string(),
            "2024-01-11"
        );
        assert_eq!(
            c.normalize("2024-01-10T00:30+0200").unwrap().to_string(),
            "2024-01-09"
        );
    }

    #[test]
    fn test_normalize_naive_forms() {
        let c = checker();
        for input in [
            "2024-01-10",
            " 2024-01-10 ",
            "2024-01-10T18:45:00",
            "2024-01-10 18:45:00.250",
            "2024-01-10T18:45",
        ] {
            assert_eq!(c.normalize(input).unwrap().to_string(), "2024-01-10", "{}", input);
        }
    }

    #[test]
    fn test_normalize_unix_millis_and_chrono_values() {
        let c = checker();
        // 2024-01-10T12:00:00Z
        assert_eq!(
            c.normalize(RawDate::UnixMillis(1_704_888_000_000)).unwrap().to_string(),
            "2024-01-10"
        );
        let ts = Utc.with_ymd_and_hms(2024, 1, 10, 23, 59, 59).unwrap();
        assert_eq!(c.normalize(ts).unwrap().to_string(), "2024-01-10");
        assert!(c.normalize(RawDate::UnixMillis(i64::MAX)).is_err());
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        let c = checker();
        for input in ["not a date", "2024-13-01", "", "   "] {
            let err = c.normalize(input).unwrap_err();
            assert!(matches!(err, BookingError::InvalidDate { .. }), "{}", input);
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let c = checker();
        for input in ["2024-02-29", "2024-01-10T23:30:00-05:00", "2023-12-31T23:59:59"] {
            let once = c.normalize(input).unwrap();
            assert_eq!(c.normalize(once).unwrap(), once);
            assert_eq!(c.normalize(once.to_string()).unwrap(), once);
        }
    }

    #[test]
    fn test_offset_out_of_range_rejected() {
        assert!(IntervalConflictChecker::with_utc_offset_minutes(24 * 60).is_err());
    }
}
