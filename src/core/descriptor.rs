//! Declarative field roles for a list page
//!
//! A [`ListDescriptor`] tells the pipeline which record fields are
//! searchable, which are categorical filters, which one carries the date used
//! by the date-range filter, and which can be sorted (and how).

use crate::core::query::{SortDirection, SortSpec};
use serde::{Deserialize, Serialize};

/// How a sortable field compares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Locale-aware string ordering
    Text,
    /// Numeric ordering
    Numeric,
    /// Chronological ordering of parsed timestamps
    Date,
}

/// A field that can be constrained to a single value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalField {
    pub name: String,
    #[serde(default)]
    pub case_insensitive: bool,
}

/// A field that can be used as a sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortableField {
    pub name: String,
    pub kind: FieldKind,
}

/// Field-role configuration for one list page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListDescriptor {
    /// Fields matched by the free-text search
    pub searchable: Vec<String>,

    /// Fields offered as categorical filters
    pub categorical: Vec<CategoricalField>,

    /// Field used by the date-range filter; falls back to `Record::timestamp`
    pub date_field: Option<String>,

    /// Fields that can be sorted on
    pub sortable: Vec<SortableField>,

    /// Sort applied when the query state is reset
    pub default_sort: Option<SortSpec>,
}

impl ListDescriptor {
    /// Create an empty descriptor
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the searchable fields
    pub fn searchable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Declare a case-sensitive categorical field
    pub fn categorical(mut self, name: impl Into<String>) -> Self {
        self.categorical.push(CategoricalField {
            name: name.into(),
            case_insensitive: false,
        });
        self
    }

    /// Declare a categorical field compared without regard to case
    pub fn categorical_ignore_case(mut self, name: impl Into<String>) -> Self {
        self.categorical.push(CategoricalField {
            name: name.into(),
            case_insensitive: true,
        });
        self
    }

    /// Declare the date field; it also becomes sortable by date
    pub fn date_field(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if self.sortable_field(&name).is_none() {
            self.sortable.push(SortableField {
                name: name.clone(),
                kind: FieldKind::Date,
            });
        }
        self.date_field = Some(name);
        self
    }

    /// Declare a sortable field
    pub fn sortable(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.sortable.push(SortableField {
            name: name.into(),
            kind,
        });
        self
    }

    /// Set the default sort
    pub fn default_sort(mut self, name: impl Into<String>, direction: SortDirection) -> Self {
        self.default_sort = Some(SortSpec::new(name, direction));
        self
    }

    /// Look up a sortable field by name
    pub fn sortable_field(&self, name: &str) -> Option<&SortableField> {
        self.sortable.iter().find(|f| f.name == name)
    }

    /// Look up a categorical field by name
    pub fn categorical_field(&self, name: &str) -> Option<&CategoricalField> {
        self.categorical.iter().find(|f| f.name == name)
    }

    /// Whether `name` is a searchable field
    pub fn is_searchable(&self, name: &str) -> bool {
        self.searchable.iter().any(|f| f == name)
    }

    /// The sort used on reset: the declared default, else the first sortable field ascending
    pub fn initial_sort(&self) -> Option<SortSpec> {
        self.default_sort.clone().or_else(|| {
            self.sortable
                .first()
                .map(|f| SortSpec::new(f.name.clone(), SortDirection::Ascending))
        })
    }
}
