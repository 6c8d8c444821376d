//! # Error Types
//!
//! Domain-specific error types for kasir-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kasir-core errors (this file)                                         │
//! │  ├── CoreError        - Checkout failures (tender, empty cart)         │
//! │  ├── CatalogError     - Backend product records that cannot be mapped  │
//! │  └── ValidationError  - Single-field validation failures               │
//! │                                                                         │
//! │  kasir-register errors (app)                                           │
//! │  └── RegisterError    - Config, I/O, bad command lines                 │
//! │                                                                         │
//! │  Flow: ValidationError → CatalogError ─┐                              │
//! │        CoreError ──────────────────────┴─► RegisterError              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart engine itself has no error type: every cart operation clamps
//! instead of failing.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Checkout errors.
///
/// These are the only failures a cashier can see while ringing up a sale.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Cash handed over does not cover the total.
    ///
    /// ## User Workflow
    /// ```text
    /// Total: 60500
    ///      │
    ///      ▼
    /// Cashier enters tendered: 50000
    ///      │
    ///      ▼
    /// InsufficientTender { total: 60500, tendered: 50000 }
    ///      │
    ///      ▼
    /// Screen shows: "Insufficient tendered amount"
    /// ```
    #[error("Insufficient tendered amount: total {total}, tendered {tendered}")]
    InsufficientTender { total: Money, tendered: Money },

    /// Checkout attempted with no lines in the cart.
    #[error("Cannot check out an empty cart")]
    EmptyCart,
}

// =============================================================================
// Catalog Error
// =============================================================================

/// Errors raised while mapping backend product records into `Product`.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A record failed field validation.
    ///
    /// `index` is the record's position in the backend payload when the
    /// record came from a list.
    #[error("{}: {source}", record_label(.index))]
    Validation {
        index: Option<usize>,
        #[source]
        source: ValidationError,
    },

    /// Two records share one product identifier.
    #[error("Duplicate product id '{0}'")]
    DuplicateId(String),

    /// The payload is not a list of product records.
    #[error("Malformed catalog payload: {0}")]
    Malformed(String),
}

fn record_label(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!("Invalid product record #{}", i),
        None => "Invalid product record".to_string(),
    }
}

impl CatalogError {
    /// Tags a validation failure with the record's position in the payload.
    pub fn at_index(self, index: usize) -> Self {
        match self {
            CatalogError::Validation { source, .. } => CatalogError::Validation {
                index: Some(index),
                source,
            },
            other => other,
        }
    }
}

impl From<ValidationError> for CatalogError {
    fn from(source: ValidationError) -> Self {
        CatalogError::Validation {
            index: None,
            source,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Numeric value has a fractional part.
    #[error("{field} must be a whole number")]
    MustBeInteger { field: String },

    /// Value has the wrong shape (e.g. text where a number belongs).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for Results with CatalogError.
pub type CatalogResult<T> = Result<T, CatalogError>;

// =============================================================================
// Unit Tests
// =============================================================================
