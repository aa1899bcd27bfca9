//! Aggregate figures for summary cards
//!
//! Aggregates are computed over the full fetched collection with their own
//! predicate and time window. They never see the list's search, filters or
//! page, so a summary card shows the same figure whatever the table shows.

use crate::core::record::Record;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::Serialize;

/// Count, sum and average of a numeric field over a subset of records
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    /// Records that matched the predicate and window
    pub count: usize,
    /// Sum of the field over matching records; missing values add nothing
    pub sum: f64,
    /// `sum / count`, or 0 when nothing matched
    pub average: f64,
}

/// Time condition applied to `Record::timestamp`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeWindow {
    /// No time condition
    All,
    /// At or after the instant
    Since(DateTime<Utc>),
    /// Within `[from, until)`
    Between {
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    },
}

impl TimeWindow {
    /// From the first day of `now`'s calendar month (in `offset`) onwards
    pub fn current_month(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        TimeWindow::Since(start_of_month(now, offset))
    }

    /// Whether a record timestamp falls in the window; records without one
    /// only match [`TimeWindow::All`]
    pub fn contains(&self, timestamp: Option<DateTime<Utc>>) -> bool {
        match (self, timestamp) {
            (TimeWindow::All, _) => true,
            (_, None) => false,
            (TimeWindow::Since(from), Some(ts)) => ts >= *from,
            (TimeWindow::Between { from, until }, Some(ts)) => ts >= *from && ts < *until,
        }
    }
}

/// Midnight of the first day of `now`'s month, in `offset`
pub fn start_of_month(now: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    let local = now.with_timezone(&offset);
    let first = NaiveDate::from_ymd_opt(local.year(), local.month(), 1)
        .unwrap_or_else(|| local.date_naive());
    let midnight = first.and_time(chrono::NaiveTime::MIN);
    offset
        .from_local_datetime(&midnight)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

/// Summarize `field` over the records matching `predicate` inside `window`
pub fn summarize<R, P>(records: &[R], predicate: P, window: TimeWindow, field: &str) -> Summary
where
    R: Record,
    P: Fn(&R) -> bool,
{
    let mut count = 0usize;
    let mut sum = 0.0;

    for record in records {
        if !predicate(record) || !window.contains(record.timestamp()) {
            continue;
        }
        count += 1;
        if let Some(value) = record.field_value(field).and_then(|v| v.as_f64()) {
            sum += value;
        }
    }

    Summary {
        count,
        sum,
        average: if count > 0 { sum / count as f64 } else { 0.0 },
    }
}

/// Count the records matching `predicate` inside `window`
pub fn count_where<R, P>(records: &[R], predicate: P, window: TimeWindow) -> usize
where
    R: Record,
    P: Fn(&R) -> bool,
{
    records
        .iter()
        .filter(|r| predicate(r) && window.contains(r.timestamp()))
        .count()
}
