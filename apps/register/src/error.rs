//! # Register Error Type
//!
//! Unified error type for the register binary.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Register                           │
//! │                                                                         │
//! │  Startup                          Command loop                          │
//! │  ───────                          ────────────                          │
//! │                                                                         │
//! │  Io / ConfigParse /               Command / NotFound / Core            │
//! │  InvalidConfig / Catalog                 │                              │
//! │         │                                ▼                              │
//! │         ▼                         printed as "error: ...",             │
//! │  logged, exit code 1              loop continues                        │
//! │                                                                         │
//! │  Io during the loop (stdout closed) is fatal as well.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use kasir_core::{CatalogError, CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for register operations.
pub type RegisterResult<T> = Result<T, RegisterError>;

/// Everything that can go wrong in the register.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// Reading a file or the terminal failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// register.toml is not valid TOML or has wrong field types.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config values parsed but make no sense.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Catalog file could not be mapped into products.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Checkout was rejected.
    #[error("{0}")]
    Core(#[from] CoreError),

    /// Input field failed validation (e.g. negative tendered amount).
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Product id typed at the prompt is not in the catalog.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// Input line could not be understood.
    #[error("{0}")]
    Command(String),

    /// Receipt could not be serialized.
    #[error("Failed to encode receipt: {0}")]
    Encode(#[from] serde_json::Error),
}

impl RegisterError {
    /// Creates a command error.
    pub fn command(message: impl Into<String>) -> Self {
        RegisterError::Command(message.into())
    }

    /// Whether the command loop has to stop.
    ///
    /// Bad input and rejected checkouts are reported to the cashier; broken
    /// I/O and startup failures end the process.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            RegisterError::Command(_)
                | RegisterError::NotFound(_)
                | RegisterError::Core(_)
                | RegisterError::Validation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kasir_core::Money;

    #[test]
    fn test_user_errors_are_not_fatal() {
        assert!(!RegisterError::command("unknown command 'x'").is_fatal());
        assert!(!RegisterError::NotFound("9".to_string()).is_fatal());
        assert!(!RegisterError::Core(CoreError::EmptyCart).is_fatal());

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        assert!(RegisterError::from(io).is_fatal());
        assert!(RegisterError::InvalidConfig("x".to_string()).is_fatal());
    }

    #[test]
    fn test_messages() {
        let err = RegisterError::from(CoreError::InsufficientTender {
            total: Money::from_minor(60500),
            tendered: Money::from_minor(50000),
        });
        assert_eq!(
            err.to_string(),
            "Insufficient tendered amount: total 60500, tendered 50000"
        );
        assert_eq!(
            RegisterError::NotFound("42".to_string()).to_string(),
            "Product not found: 42"
        );
    }

    #[test]
    fn test_catalog_failure_is_fatal_catalog_error() {
        let payload = r#"[
            { "id": 1, "name": "Kopi", "price": 25000 },
            { "id": 1, "name": "Teh", "price": 15000 }
        ]"#;
        let err = RegisterError::from(kasir_core::Catalog::from_json_str(payload).unwrap_err());
        assert!(matches!(err, RegisterError::Catalog(CatalogError::DuplicateId(_))));
        assert!(err.is_fatal());
    }
}
