//! Configuration loading and management
//!
//! ```yaml
//! timezone_offset_minutes: 330
//! access: authenticated
//! lists:
//!   donations:
//!     page_size: 10
//!     page_size_options: [10, 25, 50]
//!     bulk:
//!       mode: sequential
//!       on_failure: continue_on_error
//!     export_file_name: donations.csv
//! ```

use crate::core::bulk::BulkPolicy;
use crate::core::error::ConfigError;
use crate::core::query::DEFAULT_PAGE_SIZE;
use crate::core::session::AccessPolicy;
use chrono::{FixedOffset, Offset, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest accepted UTC offset, in minutes
const MAX_OFFSET_MINUTES: i32 = 23 * 60 + 59;

/// Per-list settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Initial page size
    pub page_size: usize,

    /// Page sizes offered to the user; empty means any
    pub page_size_options: Vec<usize>,

    /// How bulk actions are dispatched
    pub bulk: BulkPolicy,

    /// File name for CSV exports; defaults to `<collection>.csv`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_file_name: Option<String>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: vec![10, 25, 50],
            bulk: BulkPolicy::default(),
            export_file_name: None,
        }
    }
}

impl ListConfig {
    /// Export file name, falling back to `<collection>.csv`
    pub fn export_file_name(&self, collection: &str) -> String {
        self.export_file_name
            .clone()
            .unwrap_or_else(|| format!("{collection}.csv"))
    }

    /// Whether `size` may be selected
    pub fn allows_page_size(&self, size: usize) -> bool {
        size > 0 && (self.page_size_options.is_empty() || self.page_size_options.contains(&size))
    }
}

/// Complete dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Offset of the admin's local time from UTC, used for date-range days
    pub timezone_offset_minutes: i32,

    /// Access policy for list pages (`public`, `authenticated`, `role:<name>`)
    pub access: String,

    /// Settings keyed by collection name
    pub lists: IndexMap<String, ListConfig>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            timezone_offset_minutes: 0,
            access: "authenticated".to_string(),
            lists: IndexMap::new(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::ParseError {
                file: path.display().to_string(),
                message: e.to_string(),
            },
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;

        tracing::info!(path = %path.display(), lists = config.lists.len(), "dashboard config loaded");
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Settings for a collection, or the defaults when it is not configured
    pub fn list(&self, collection: &str) -> ListConfig {
        self.lists.get(collection).cloned().unwrap_or_default()
    }

    /// The configured offset; UTC when out of range
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.timezone_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    pub fn access_policy(&self) -> AccessPolicy {
        AccessPolicy::parse_policy(&self.access)
    }

    /// Reject settings the list views cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timezone_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ConfigError::InvalidValue {
                field: "timezone_offset_minutes".to_string(),
                value: self.timezone_offset_minutes.to_string(),
                message: format!("must be within ±{MAX_OFFSET_MINUTES}"),
            });
        }

        for (name, list) in &self.lists {
            if !list.allows_page_size(list.page_size) {
                return Err(ConfigError::InvalidValue {
                    field: format!("lists.{name}.page_size"),
                    value: list.page_size.to_string(),
                    message: "must be positive and one of page_size_options".to_string(),
                });
            }

            if list.page_size_options.contains(&0) {
                return Err(ConfigError::InvalidValue {
                    field: format!("lists.{name}.page_size_options"),
                    value: "0".to_string(),
                    message: "page sizes must be positive".to_string(),
                });
            }

            if !list.bulk.can_abort() {
                return Err(ConfigError::InvalidValue {
                    field: format!("lists.{name}.bulk.on_failure"),
                    value: "abort_on_first_error".to_string(),
                    message: "concurrent dispatch cannot abort calls already in flight".to_string(),
                });
            }

            if let Some(file_name) = &list.export_file_name {
                if file_name.is_empty() || file_name.contains(['/', '\\']) {
                    return Err(ConfigError::InvalidValue {
                        field: format!("lists.{name}.export_file_name"),
                        value: file_name.clone(),
                        message: "must be a plain file name".to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Configuration matching the stock dashboard pages
    pub fn default_config() -> Self {
        let standard = ListConfig::default();
        let mut lists = IndexMap::new();

        lists.insert("users".to_string(), standard.clone());
        lists.insert("donations".to_string(), ListConfig {
            export_file_name: Some("donations.csv".to_string()),
            ..standard.clone()
        });
        lists.insert("volunteers".to_string(), ListConfig {
            page_size: 12,
            page_size_options: vec![12],
            export_file_name: Some("volunteers.csv".to_string()),
            ..standard.clone()
        });
        lists.insert("contacts".to_string(), ListConfig {
            export_file_name: Some("contacts.csv".to_string()),
            ..standard.clone()
        });
        lists.insert("events".to_string(), standard);

        Self {
            lists,
            ..Self::default()
        }
    }
}
