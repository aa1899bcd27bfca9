//! The list query pipeline
//!
//! Every admin list page runs the same fixed sequence over its fetched
//! collection:
//!
//! ```text
//! records ──▶ text search ──▶ categorical filters ──▶ date range ──▶ sort ──▶ page slice
//! ```
//!
//! The order matters: each step only sees what the previous one kept, and
//! sorting must happen before the page slice. No step ever fails; malformed
//! values simply do not match the filters that need them.

use crate::core::descriptor::{FieldKind, ListDescriptor};
use crate::core::field::{FieldValue, locale_compare};
use crate::core::query::{DateRange, PageResult, PaginationMeta, QueryState, Selection, SortDirection, SortSpec};
use crate::core::record::Record;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use std::cmp::Ordering;

/// Filter/sort/paginate engine configured for one list page
#[derive(Debug, Clone)]
pub struct ListPipeline {
    descriptor: ListDescriptor,
    utc_offset: FixedOffset,
}

impl ListPipeline {
    /// Create a pipeline; day boundaries are computed in UTC until
    /// [`with_utc_offset`](Self::with_utc_offset) says otherwise.
    pub fn new(descriptor: ListDescriptor) -> Self {
        Self {
            descriptor,
            utc_offset: Utc.fix(),
        }
    }

    /// Interpret date-range days in the given offset (the host's local time)
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn descriptor(&self) -> &ListDescriptor {
        &self.descriptor
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    /// Run the whole pipeline and return the requested page
    pub fn apply<R: Record>(&self, records: &[R], state: &QueryState) -> PageResult<R> {
        let filtered = self.filtered_refs(records, state);
        let meta = PaginationMeta::new(state.page(), state.page_size(), filtered.len());
        let data: Vec<R> = paginate(&filtered, meta.page, meta.page_size)
            .iter()
            .map(|r| (*r).clone())
            .collect();

        tracing::debug!(
            collection = R::collection_name(),
            total = records.len(),
            filtered = meta.total,
            page = meta.page,
            page_len = data.len(),
            "list pipeline applied"
        );

        PageResult {
            data,
            pagination: meta,
        }
    }

    /// Search, filter and sort, without pagination
    ///
    /// This is the sequence exports operate on.
    pub fn filtered<R: Record>(&self, records: &[R], state: &QueryState) -> Vec<R> {
        self.filtered_refs(records, state)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Number of records that survive the search and filters
    pub fn count<R: Record>(&self, records: &[R], state: &QueryState) -> usize {
        records.iter().filter(|r| self.matches(*r, state)).count()
    }

    fn filtered_refs<'a, R: Record>(&self, records: &'a [R], state: &QueryState) -> Vec<&'a R> {
        let kept = self.apply_filters(records.iter().collect(), state);
        self.apply_sort(kept, state.sort.as_ref())
    }

    /// Apply search, categorical and date-range filters, preserving order
    pub fn apply_filters<'a, R: Record>(&self, data: Vec<&'a R>, state: &QueryState) -> Vec<&'a R> {
        data.into_iter().filter(|r| self.matches(*r, state)).collect()
    }

    /// Stable sort by the given key; unknown keys leave the order untouched
    pub fn apply_sort<'a, R: Record>(&self, data: Vec<&'a R>, sort: Option<&SortSpec>) -> Vec<&'a R> {
        let Some(sort) = sort else {
            return data;
        };

        let Some(field) = self.descriptor.sortable_field(&sort.field) else {
            tracing::debug!(field = %sort.field, "ignoring sort on undeclared field");
            return data;
        };

        let mut keyed: Vec<(SortKey, &'a R)> = data
            .into_iter()
            .map(|r| (SortKey::extract(r.field_value(&field.name), field.kind), r))
            .collect();

        keyed.sort_by(|(a, _), (b, _)| {
            let ordering = a.compare(b);
            match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        keyed.into_iter().map(|(_, r)| r).collect()
    }

    fn matches<R: Record>(&self, record: &R, state: &QueryState) -> bool {
        self.matches_search(record, state)
            && self.matches_categories(record, state)
            && self.matches_date_range(record, &state.date_range)
    }

    fn matches_search<R: Record>(&self, record: &R, state: &QueryState) -> bool {
        if state.search.is_empty() {
            return true;
        }

        let needle = state.search.to_lowercase();
        let restricted = state
            .search_field
            .as_deref()
            .filter(|f| self.descriptor.is_searchable(f));

        let mut fields = self.descriptor.searchable.iter().map(String::as_str);
        let check = |name: &str| {
            match record.field_value(name) {
                None | Some(FieldValue::Null) => false,
                Some(value) => value.to_display().to_lowercase().contains(&needle),
            }
        };

        match restricted {
            Some(field) => check(field),
            None => fields.any(check),
        }
    }

    fn matches_categories<R: Record>(&self, record: &R, state: &QueryState) -> bool {
        self.descriptor.categorical.iter().all(|field| {
            let Some(Selection::Only(wanted)) = state.filters.get(&field.name) else {
                return true;
            };

            let Some(value) = record.field_value(&field.name) else {
                return false;
            };
            let Some(actual) = value.as_string() else {
                return false;
            };

            if field.case_insensitive {
                actual.to_lowercase() == wanted.to_lowercase()
            } else {
                actual == wanted
            }
        })
    }

    fn matches_date_range<R: Record>(&self, record: &R, range: &DateRange) -> bool {
        if range.is_unbounded() {
            return true;
        }

        let timestamp = match &self.descriptor.date_field {
            Some(name) => record.field_value(name).and_then(|v| v.as_datetime()),
            None => record.timestamp(),
        };
        // Unparseable dates cannot satisfy a bound
        let Some(timestamp) = timestamp else {
            return false;
        };

        if let Some(start) = range.start {
            if timestamp < self.start_of_day(start) {
                return false;
            }
        }

        if let Some(end) = range.end {
            if timestamp > self.end_of_day(end) {
                return false;
            }
        }

        true
    }

    /// 00:00:00.000 of `day` in the configured offset
    pub fn start_of_day(&self, day: NaiveDate) -> DateTime<Utc> {
        let midnight = day.and_time(NaiveTime::MIN);
        self.utc_offset
            .from_local_datetime(&midnight)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| midnight.and_utc())
    }

    /// 23:59:59.999 of `day` in the configured offset
    pub fn end_of_day(&self, day: NaiveDate) -> DateTime<Utc> {
        self.start_of_day(day) + Duration::milliseconds(86_400_000 - 1)
    }
}

/// Slice `[(page-1)*page_size, page*page_size)`; out-of-range pages are empty
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = (page.max(1) - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Pre-extracted comparison key; `None` sorts before any value
#[derive(Debug)]
enum SortKey {
    Text(Option<String>),
    Numeric(Option<f64>),
    Date(Option<DateTime<Utc>>),
}

impl SortKey {
    fn extract(value: Option<FieldValue>, kind: FieldKind) -> Self {
        let value = value.filter(|v| !v.is_null());
        match kind {
            FieldKind::Text => SortKey::Text(value.map(|v| v.to_display())),
            FieldKind::Numeric => SortKey::Numeric(value.and_then(|v| v.as_f64())),
            FieldKind::Date => SortKey::Date(value.and_then(|v| v.as_datetime())),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => compare_options(a, b, |x, y| locale_compare(x, y)),
            (SortKey::Numeric(a), SortKey::Numeric(b)) => compare_options(a, b, |x, y| x.total_cmp(y)),
            (SortKey::Date(a), SortKey::Date(b)) => compare_options(a, b, |x, y| x.cmp(y)),
            // Keys of one sort always share a kind
            _ => Ordering::Equal,
        }
    }
}

fn compare_options<T>(a: &Option<T>, b: &Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
