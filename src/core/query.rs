//! Query state and pagination utilities

use crate::core::descriptor::ListDescriptor;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sentinel selection value meaning "no constraint"
pub const ALL: &str = "all";

/// Parameters governing one run of the list pipeline
///
/// All parameters have sensible defaults: empty search, every filter on
/// `all`, no date bounds, page 1.
///
/// # Example
/// ```rust,ignore
/// let state = QueryState::for_descriptor(&descriptor)
///     .with_search("smith")
///     .with_filter("status", "approved")
///     .with_sort(SortSpec::parse("createdAt:desc").unwrap())
///     .with_page(2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryState {
    /// Free-text search term (case-insensitive substring)
    pub search: String,

    /// Restrict the search to one searchable field; `None` searches all of them
    pub search_field: Option<String>,

    /// Categorical field name -> selected value
    pub filters: IndexMap<String, Selection>,

    /// Inclusive day bounds on the record date
    pub date_range: DateRange,

    /// Sort key and direction; `None` keeps the fetched order
    pub sort: Option<SortSpec>,

    /// Page number (starts at 1)
    pub page: usize,

    /// Number of records per page
    pub page_size: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search: String::new(),
            search_field: None,
            filters: IndexMap::new(),
            date_range: DateRange::default(),
            sort: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryState {
    /// Default state for a list page: empty search, `all` filters, initial sort, page 1
    pub fn for_descriptor(descriptor: &ListDescriptor) -> Self {
        Self {
            filters: descriptor
                .categorical
                .iter()
                .map(|f| (f.name.clone(), Selection::All))
                .collect(),
            sort: descriptor.initial_sort(),
            ..Self::default()
        }
    }

    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get page size, ensuring minimum of 1
    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_search_field(mut self, field: impl Into<String>) -> Self {
        self.search_field = Some(field.into());
        self
    }

    pub fn with_filter(mut self, field: impl Into<String>, selection: impl Into<Selection>) -> Self {
        self.filters.insert(field.into(), selection.into());
        self
    }

    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.date_range = DateRange { start, end };
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn without_sort(mut self) -> Self {
        self.sort = None;
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Selected value of a categorical filter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    /// No constraint
    #[default]
    All,
    /// Only records whose field equals this value
    Only(String),
}

impl Selection {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Selection::All => None,
            Selection::Only(v) => Some(v),
        }
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        if value == ALL {
            Selection::All
        } else {
            Selection::Only(value)
        }
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        Selection::from(value.to_string())
    }
}

impl From<Selection> for String {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::All => ALL.to_string(),
            Selection::Only(v) => v,
        }
    }
}

/// Inclusive day bounds; either side may be open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Whether neither bound is set
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// The opposite direction
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Sort field and direction
///
/// # Format
/// - `field:asc` or `field` (ascending)
/// - `field:desc` (descending)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Parse a `field[:asc|:desc]` expression
    pub fn parse(expr: &str) -> Option<Self> {
        let (field, direction) = match expr.split_once(':') {
            Some((field, "asc")) => (field, SortDirection::Ascending),
            Some((field, "desc")) => (field, SortDirection::Descending),
            Some(_) => return None,
            None => (expr, SortDirection::Ascending),
        };

        if field.is_empty() {
            return None;
        }

        Some(Self::new(field, direction))
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Ascending => write!(f, "{}:asc", self.field),
            SortDirection::Descending => write!(f, "{}:desc", self.field),
        }
    }
}

/// One page of pipeline output
///
/// This structure wraps the page's records with metadata about pagination state.
#[derive(Debug, Clone, Serialize)]
pub struct PageResult<T> {
    /// The records on this page
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

impl<T> PageResult<T> {
    /// Number of records that survived filtering (before pagination)
    pub fn total_filtered(&self) -> usize {
        self.pagination.total
    }

    /// Number of pages, never less than 1
    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Requested page number (starts at 1, not clamped)
    pub page: usize,

    /// Number of records per page
    pub page_size: usize,

    /// Total number of records (after filters)
    pub total: usize,

    /// Total number of pages, at least 1
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, page_size: usize, total: usize) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total_pages = total_pages(total, page_size);
        let start = (page - 1).saturating_mul(page_size);

        Self {
            page,
            page_size,
            total,
            total_pages,
            has_next: start.saturating_add(page_size) < total,
            has_prev: page > 1,
        }
    }
}

/// `max(1, ceil(total / page_size))`
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Clamp `page` into `1..=total_pages(total, page_size)`
pub fn clamp_page(page: usize, total: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(total, page_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::descriptor::FieldKind;

    #[test]
    fn test_query_state_defaults() {
        let state = QueryState::default();
        assert_eq!(state.page(), 1);
        assert_eq!(state.page_size(), 10);
        assert!(state.search.is_empty());
        assert!(state.date_range.is_unbounded());
    }

    #[test]
    fn test_zero_page_and_size_are_floored() {
        let state = QueryState::default().with_page(0).with_page_size(0);
        assert_eq!(state.page(), 1);
        assert_eq!(state.page_size(), 1);
    }

    #[test]
    fn test_for_descriptor_resets_filters_to_all() {
        let descriptor = ListDescriptor::new()
            .categorical("status")
            .categorical("role")
            .sortable("name", FieldKind::Text);
        let state = QueryState::for_descriptor(&descriptor);

        assert_eq!(state.filters.len(), 2);
        assert!(state.filters.values().all(Selection::is_all));
        assert_eq!(state.sort, Some(SortSpec::new("name", SortDirection::Ascending)));
    }

    #[test]
    fn test_selection_from_strings() {
        assert_eq!(Selection::from("all"), Selection::All);
        assert_eq!(Selection::from("read"), Selection::Only("read".to_string()));
        assert_eq!(String::from(Selection::All), "all");
        assert_eq!(Selection::Only("new".to_string()).value(), Some("new"));
    }

    #[test]
    fn test_selection_serde_uses_plain_strings() {
        let state = QueryState::default().with_filter("status", "new");
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["filters"]["status"], "new");

        let parsed: QueryState =
            serde_json::from_str(r#"{"filters": {"status": "all"}, "page": 3}"#).unwrap();
        assert_eq!(parsed.filters["status"], Selection::All);
        assert_eq!(parsed.page, 3);
        assert_eq!(parsed.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_sort_spec_parse() {
        assert_eq!(
            SortSpec::parse("amount:desc"),
            Some(SortSpec::new("amount", SortDirection::Descending))
        );
        assert_eq!(
            SortSpec::parse("createdAt"),
            Some(SortSpec::new("createdAt", SortDirection::Ascending))
        );
        assert_eq!(SortSpec::parse("amount:sideways"), None);
        assert_eq!(SortSpec::parse(":desc"), None);
        assert_eq!(SortSpec::new("name", SortDirection::Descending).to_string(), "name:desc");
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 20, 145);
        assert_eq!(meta.total, 145);
        assert_eq!(meta.total_pages, 8);
        assert!(!meta.has_prev);
        assert!(meta.has_next);
    }

    #[test]
    fn test_pagination_meta_empty_has_one_page() {
        let meta = PaginationMeta::new(1, 10, 0);
        assert_eq!(meta.total_pages, 1);
        assert!(!meta.has_next);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 25, 10), 1);
        assert_eq!(clamp_page(2, 25, 10), 2);
        assert_eq!(clamp_page(9, 25, 10), 3);
        assert_eq!(clamp_page(4, 0, 10), 1);
    }
}
