//! Error handling for SolarKit
//!
//! Provides the error types of the layout engine:
//! - Layout errors (invalid input at a mutation boundary, unknown panels)
//! - Map errors (collaborator unavailable)
//!
//! Nothing in the layout engine is fatal. Callers that must report a
//! rejection to the user receive a `LayoutError`; stale panel references
//! are normally swallowed before they ever become an error.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Layout error type
///
/// Represents rejections raised by the panel layout engine and its
/// calculators.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// A numeric input was rejected; the prior value is retained
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidInput {
        /// Name of the rejected field.
        field: String,
        /// The rejected value.
        value: f64,
        /// Why the value was rejected.
        reason: String,
    },

    /// No panel with this id exists
    #[error("Panel {id} not found")]
    PanelNotFound {
        /// The unknown panel id.
        id: u64,
    },

    /// No active map view is available
    #[error("Map unavailable: {reason}")]
    MapUnavailable {
        /// Why the map cannot be used.
        reason: String,
    },
}

impl LayoutError {
    /// Rejection of a value that must be strictly positive and finite.
    pub fn not_positive(field: impl Into<String>, value: f64) -> Self {
        LayoutError::InvalidInput {
            field: field.into(),
            value,
            reason: "must be a positive number".to_string(),
        }
    }
}
