//! Typed error handling for the admin dashboard
//!
//! Services return `anyhow::Result` at their seams; the list view classifies
//! failures into [`DashboardError`] before turning them into notifications, so
//! callers can match on the category instead of parsing messages.
//!
//! # Error Categories
//!
//! - [`FetchError`]: loading a collection from its source failed
//! - [`MutationError`]: a create/update/delete/transition was rejected
//! - [`ValidationError`]: a record failed validation before being sent
//! - [`ConfigError`]: configuration parsing and validation
//! - [`ExportError`]: an export artifact could not be delivered
//! - [`RequestError`]: the session is not allowed to perform the request
//!
//! # Example
//!
//! ```rust,ignore
//! match view.refresh().await {
//!     Ok(()) => {}
//!     Err(DashboardError::Request(RequestError::Unauthorized { .. })) => redirect_to_login(),
//!     Err(e) => eprintln!("{}: {}", e.error_code(), e),
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

/// The main error type for the dashboard
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Request(#[from] RequestError),
}

impl DashboardError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DashboardError::Fetch(e) => e.error_code(),
            DashboardError::Mutation(e) => e.error_code(),
            DashboardError::Validation(_) => "VALIDATION_ERROR",
            DashboardError::Config(_) => "CONFIG_ERROR",
            DashboardError::Export(e) => e.error_code(),
            DashboardError::Request(e) => e.error_code(),
        }
    }

    /// Field-level details, when the error carries any
    pub fn field_errors(&self) -> &[FieldValidationError] {
        match self {
            DashboardError::Validation(ValidationError::FieldErrors(errors)) => errors,
            _ => &[],
        }
    }
}

/// Convenience alias used by dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;

// =============================================================================
// Fetch Errors
// =============================================================================

/// Errors raised while loading a collection
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source returned an error
    #[error("Failed to fetch {collection}: {message}")]
    Failed { collection: String, message: String },
}

impl FetchError {
    pub fn error_code(&self) -> &'static str {
        match self {
            FetchError::Failed { .. } => "FETCH_FAILED",
        }
    }
}

// =============================================================================
// Mutation Errors
// =============================================================================

/// Errors raised by single-record mutations
#[derive(Debug, Error)]
pub enum MutationError {
    /// The sink rejected the operation
    #[error("Failed to {operation} {record_type}{}: {message}", .id.as_ref().map(|id| format!(" '{id}'")).unwrap_or_default())]
    Failed {
        record_type: String,
        id: Option<String>,
        operation: String,
        message: String,
    },

    /// The record type has no such status change
    #[error("{record_type} does not support '{transition}'")]
    UnsupportedTransition {
        record_type: String,
        transition: String,
    },
}

impl MutationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            MutationError::Failed { .. } => "MUTATION_FAILED",
            MutationError::UnsupportedTransition { .. } => "UNSUPPORTED_TRANSITION",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Single field validation error
    #[error("Validation error for field '{field}': {message}")]
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    #[error("Validation errors: {}", join_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file
    #[error("Failed to parse config file '{file}': {message}")]
    ParseError { file: String, message: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors raised while delivering an export artifact
#[derive(Debug, Error)]
pub enum ExportError {
    /// The sink could not write the artifact
    #[error("Failed to export '{file_name}': {message}")]
    WriteFailed { file_name: String, message: String },
}

impl ExportError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ExportError::WriteFailed { .. } => "EXPORT_FAILED",
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to the caller's session
#[derive(Debug, Error)]
pub enum RequestError {
    /// No authenticated admin
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Authenticated, but without the required role
    #[error("Forbidden: {message}")]
    Forbidden { message: String },
}

impl RequestError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
            RequestError::Forbidden { .. } => "FORBIDDEN",
        }
    }
}
