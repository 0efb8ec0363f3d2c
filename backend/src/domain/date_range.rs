//! Closed time windows used to filter measurement cohorts.
//!
//! Measurement dates and query bounds are free-form strings. They are read as
//! RFC 3339 instants when they carry an offset; naive timestamps and bare
//! calendar days are read in the supplied time zone (the server's local zone
//! in production). Query bounds denote their own instant, so a bare day used
//! as the upper bound of a history window stops at that day's midnight.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use thiserror::Error;

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// A timestamp literal before it is anchored to a time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimestampLiteral {
    Instant(DateTime<Utc>),
    Local(NaiveDateTime),
    Day(NaiveDate),
}

impl TimestampLiteral {
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(Self::Instant(instant.with_timezone(&Utc)));
        }
        if let Some(naive) = NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        {
            return Some(Self::Local(naive));
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .map(Self::Day)
    }

    /// Earliest instant the literal denotes.
    pub(crate) fn first_instant<Tz: TimeZone>(self, tz: &Tz) -> Option<DateTime<Utc>> {
        match self {
            Self::Instant(instant) => Some(instant),
            Self::Local(naive) => resolve_local(tz, naive),
            Self::Day(day) => resolve_local(tz, day.and_time(NaiveTime::MIN)),
        }
    }

    /// Latest instant the literal denotes; a bare day runs to its last
    /// nanosecond.
    pub(crate) fn last_instant<Tz: TimeZone>(self, tz: &Tz) -> Option<DateTime<Utc>> {
        match self {
            Self::Day(day) => {
                let next = day.succ_opt()?;
                resolve_local(tz, next.and_time(NaiveTime::MIN))
                    .map(|start| start - TimeDelta::nanoseconds(1))
            }
            other => other.first_instant(tz),
        }
    }
}

/// Anchor a wall-clock time in `tz`, stepping past a DST gap if needed.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(naive + TimeDelta::hours(1)))
                .earliest()
        })
        .map(|resolved| resolved.with_timezone(&Utc))
}

/// Errors raised while building a window from query bounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateRangeError {
    /// The lower bound is not a recognised date or timestamp.
    #[error("startDate is not a valid date: {value}")]
    InvalidStart { value: String },
    /// The upper bound is not a recognised date or timestamp.
    #[error("endDate is not a valid date: {value}")]
    InvalidEnd { value: String },
}

/// Closed interval `[start, end]` of instants.
///
/// # Examples
/// ```
/// use bp_backend::domain::DateRange;
/// use chrono::{TimeZone, Utc};
///
/// let range = DateRange::from_query_bounds(Some("2023-11-01"), None, &Utc)
///     .expect("bounds parse");
/// assert!(range.is_none(), "a single bound applies no filtering");
///
/// let range = DateRange::from_query_bounds(Some("2023-11-01"), Some("2023-11-30"), &Utc)
///     .expect("bounds parse")
///     .expect("both bounds present");
/// let midnight = Utc.with_ymd_and_hms(2023, 11, 30, 0, 0, 0).unwrap();
/// let last_evening = Utc.with_ymd_and_hms(2023, 11, 30, 21, 0, 0).unwrap();
/// assert!(range.contains(midnight));
/// assert!(!range.contains(last_evening));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    /// Build a window from explicit instants.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Build a window from the optional `startDate`/`endDate` query values.
    ///
    /// Filtering applies only when both bounds are present and non-empty;
    /// with a single bound the history is returned unfiltered, matching the
    /// behaviour clients already rely on. Each bound is the first instant it
    /// denotes, so the window is exactly `[startDate, endDate]`.
    ///
    /// # Errors
    /// Returns [`DateRangeError`] when both bounds are present but one of them
    /// cannot be interpreted.
    pub fn from_query_bounds<Tz: TimeZone>(
        start: Option<&str>,
        end: Option<&str>,
        tz: &Tz,
    ) -> Result<Option<Self>, DateRangeError> {
        let (Some(start), Some(end)) = (non_empty(start), non_empty(end)) else {
            return Ok(None);
        };
        let start_instant = TimestampLiteral::parse(start)
            .and_then(|literal| literal.first_instant(tz))
            .ok_or_else(|| DateRangeError::InvalidStart {
                value: start.to_owned(),
            })?;
        let end_instant = TimestampLiteral::parse(end)
            .and_then(|literal| literal.first_instant(tz))
            .ok_or_else(|| DateRangeError::InvalidEnd {
                value: end.to_owned(),
            })?;
        Ok(Some(Self::new(start_instant, end_instant)))
    }

    /// Window covering a calendar month in `tz`, from the first instant of its
    /// first day to the last instant of its last day.
    pub fn calendar_month<Tz: TimeZone>(month: YearMonth, tz: &Tz) -> Option<Self> {
        let first_day = NaiveDate::from_ymd_opt(month.year, month.month, 1)?;
        let last_day = month.next().first_day()?.pred_opt()?;
        let start = TimestampLiteral::Day(first_day).first_instant(tz)?;
        let end = TimestampLiteral::Day(last_day).last_instant(tz)?;
        Some(Self::new(start, end))
    }

    /// Inclusive lower bound.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Inclusive upper bound.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether `instant` lies in the closed interval.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|raw| !raw.trim().is_empty())
}

/// Errors raised when parsing a `YYYY-MM` month.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum YearMonthParseError {
    /// The value does not follow the `YYYY-MM` shape.
    #[error("month must use the YYYY-MM format")]
    Format,
    /// The month component lies outside 1 to 12.
    #[error("month must be between 01 and 12, got {month}")]
    MonthOutOfRange { month: u32 },
}

/// Calendar month parsed from a `YYYY-MM` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Construct a month, validating the month number.
    ///
    /// # Errors
    /// Returns [`YearMonthParseError::MonthOutOfRange`] for months outside
    /// 1 to 12.
    pub fn new(year: i32, month: u32) -> Result<Self, YearMonthParseError> {
        if !(1..=12).contains(&month) {
            return Err(YearMonthParseError::MonthOutOfRange { month });
        }
        Ok(Self { year, month })
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month number, 1 to 12.
    pub fn month(&self) -> u32 {
        self.month
    }

    fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl FromStr for YearMonth {
    type Err = YearMonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s.trim().split_once('-').ok_or(YearMonthParseError::Format)?;
        let is_digits = |part: &str, len: usize| {
            part.len() == len && part.chars().all(|c| c.is_ascii_digit())
        };
        if !is_digits(year, 4) || !is_digits(month, 2) {
            return Err(YearMonthParseError::Format);
        }
        let year = year.parse().map_err(|_| YearMonthParseError::Format)?;
        let month = month.parse().map_err(|_| YearMonthParseError::Format)?;
        Self::new(year, month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
