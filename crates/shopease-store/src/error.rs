//! # Store Error Types
//!
//! Error types for document and collection operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  io::Error / serde_json::Error / CoreError                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CliError (in the app) ← Error code + operator message                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed transaction writes nothing, so every variant below leaves the
//! stored document as it was.

use shopease_core::{CoreError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Record not found in its collection.
    ///
    /// ## When This Occurs
    /// - `get` / `update` with an unknown id
    /// - Ledger or checkout naming a product that was deleted
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A record or snapshot failed validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A stock decrement would take a product below zero.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid customer: {0}")]
    InvalidCustomer(String),

    /// Imported bytes are not JSON at all.
    #[error("Snapshot is not valid JSON: {0}")]
    Parse(String),

    /// The stored document exists but cannot be read back.
    ///
    /// ## Recovery
    /// `DocumentStore::clear()` wipes the slot and starts fresh.
    #[error("Stored document is corrupted: {0}")]
    Corrupted(String),

    /// Unknown username or wrong password (deliberately indistinguishable).
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

/// Convert core errors variant by variant.
///
/// ## Error Mapping
/// ```text
/// CoreError::ProductNotFound(id)   → StoreError::NotFound { "Product", id }
/// CoreError::InsufficientStock     → StoreError::InsufficientStock
/// CoreError::EmptyCart             → StoreError::EmptyCart
/// CoreError::InvalidCustomer       → StoreError::InvalidCustomer
/// CoreError::CartTooLarge          → StoreError::Validation(OutOfRange)
/// CoreError::QuantityTooLarge      → StoreError::Validation(OutOfRange)
/// CoreError::Validation(v)         → StoreError::Validation(v)
/// ```
impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => StoreError::not_found("Product", id),
            CoreError::InsufficientStock {
                sku,
                available,
                requested,
            } => StoreError::InsufficientStock {
                sku,
                available,
                requested,
            },
            CoreError::EmptyCart => StoreError::EmptyCart,
            CoreError::InvalidCustomer(reason) => StoreError::InvalidCustomer(reason),
            CoreError::CartTooLarge { max } => StoreError::Validation(ValidationError::OutOfRange {
                field: "cart items".to_string(),
                min: 0,
                max: max as i64,
            }),
            CoreError::QuantityTooLarge { max, .. } => {
                StoreError::Validation(ValidationError::OutOfRange {
                    field: "quantity".to_string(),
                    min: 1,
                    max,
                })
            }
            CoreError::Validation(v) => StoreError::Validation(v),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_by_variant() {
        let err: StoreError = CoreError::ProductNotFound(42).into();
        assert!(matches!(err, StoreError::NotFound { ref entity, ref id } if entity == "Product" && id == "42"));

        let err: StoreError = CoreError::InsufficientStock {
            sku: "A1".to_string(),
            available: 2,
            requested: 3,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Insufficient stock for A1: available 2, requested 3"
        );

        let err: StoreError = CoreError::EmptyCart.into();
        assert!(matches!(err, StoreError::EmptyCart));
    }
}
