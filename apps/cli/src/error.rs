//! # CLI Error Type
//!
//! Unified error type for every command.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in ShopEase                               │
//! │                                                                         │
//! │  $ shopease stock out TS-BLK-M 40                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Handler                                                 │  │
//! │  │  CliResult<()>                                                   │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Store Error? ──── StoreError::InsufficientStock ──┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Core Error?  ──── CoreError::QuantityTooLarge ── CliError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: error[INSUFFICIENT_STOCK]: Insufficient stock for TS-BLK-M:   │
//! │          12 available, 40 requested                                     │
//! │  exit status 1                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! With `--json` the same error is printed as
//! `{"code": "INSUFFICIENT_STOCK", "message": "..."}`.

use serde::Serialize;
use shopease_core::{CoreError, ValidationError};
use shopease_store::StoreError;
use thiserror::Error;

/// Error returned from every command.
#[derive(Debug, Clone, Serialize, Error)]
#[error("error[{code}]: {message}")]
pub struct CliError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message for the operator
    pub message: String,
}

pub type CliResult<T> = Result<T, CliError>;

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Record not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// A stock decrement would go below zero
    InsufficientStock,

    /// Cart or customer selection rejected at checkout
    CartError,

    /// Login failed
    InvalidCredentials,

    /// Store file unreadable, corrupted or not writable
    StorageError,

    /// Config file or environment is invalid
    ConfigError,

    /// Anything else
    Internal,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorCode::CartError => "CART_ERROR",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        CliError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ConfigError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }
}

fn insufficient_stock(sku: &str, available: i64, requested: i64) -> CliError {
    CliError::new(
        ErrorCode::InsufficientStock,
        format!(
            "Insufficient stock for {}: {} available, {} requested",
            sku, available, requested
        ),
    )
}

/// Converts store errors to CLI errors.
impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => CliError::not_found(&entity, id),
            StoreError::Validation(e) => CliError::from(e),
            StoreError::InsufficientStock {
                sku,
                available,
                requested,
            } => insufficient_stock(&sku, available, requested),
            StoreError::EmptyCart => CliError::new(ErrorCode::CartError, "Cart is empty"),
            StoreError::InvalidCustomer(reason) => {
                CliError::new(ErrorCode::CartError, format!("Invalid customer: {}", reason))
            }
            StoreError::Parse(reason) => {
                CliError::validation(format!("Snapshot is not valid JSON: {}", reason))
            }
            StoreError::Corrupted(reason) => {
                tracing::error!("Stored document is corrupted: {}", reason);
                CliError::new(
                    ErrorCode::StorageError,
                    "Stored data is corrupted; export what you can, then run `data clear --yes`",
                )
            }
            StoreError::InvalidCredentials => {
                CliError::new(ErrorCode::InvalidCredentials, "Invalid username or password")
            }
            StoreError::Io(e) => {
                tracing::error!("Store I/O failed: {}", e);
                CliError::new(ErrorCode::StorageError, format!("Storage failure: {}", e))
            }
            StoreError::Serialization(e) => {
                tracing::error!("Serialization failed: {}", e);
                CliError::internal("Could not serialize the document")
            }
        }
    }
}

/// Converts core errors to CLI errors.
impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => CliError::not_found("Product", id),
            CoreError::InsufficientStock {
                sku,
                available,
                requested,
            } => insufficient_stock(&sku, available, requested),
            CoreError::EmptyCart => CliError::new(ErrorCode::CartError, "Cart is empty"),
            CoreError::InvalidCustomer(reason) => {
                CliError::new(ErrorCode::CartError, format!("Invalid customer: {}", reason))
            }
            CoreError::CartTooLarge { max } => CliError::new(
                ErrorCode::CartError,
                format!("Cart cannot have more than {} items", max),
            ),
            CoreError::QuantityTooLarge { requested, max } => CliError::validation(format!(
                "Quantity {} exceeds maximum allowed ({})",
                requested, max
            )),
            CoreError::Validation(e) => CliError::from(e),
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::validation(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::new(ErrorCode::StorageError, err.to_string())
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::config(format!("Invalid config file: {}", err))
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        CliError::config(format!("Could not write config: {}", err))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON output failed: {}", err);
        CliError::internal("Could not render JSON output")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message_names_everything() {
        let err = CliError::from(StoreError::InsufficientStock {
            sku: "A1".to_string(),
            available: 2,
            requested: 5,
        });
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.message, "Insufficient stock for A1: 2 available, 5 requested");
    }

    #[test]
    fn test_codes_serialize_screaming() {
        let err = CliError::not_found("Product", 7);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: 7");
        assert_eq!(err.to_string(), "error[NOT_FOUND]: Product not found: 7");
    }

    #[test]
    fn test_core_and_validation_mapping() {
        let err = CliError::from(CoreError::QuantityTooLarge {
            requested: 1000,
            max: 999,
        });
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = CliError::from(StoreError::Validation(ValidationError::Required {
            field: "name".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(
            CliError::from(StoreError::InvalidCredentials).code,
            ErrorCode::InvalidCredentials
        );
        assert_eq!(CliError::from(StoreError::EmptyCart).code, ErrorCode::CartError);
    }
}
