//! # Error Types
//!
//! Domain-specific error types for shopease-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shopease-core errors (this file)                                      │
//! │  ├── CoreError        - Cart and domain rule failures                  │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  shopease-store errors (separate crate)                                │
//! │  └── StoreError       - Document / collection failures                 │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → CliError → Operator  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Product id is not in the catalog (or not in the cart).
    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    /// Requested quantity exceeds what is on hand.
    ///
    /// ## User Workflow
    /// ```text
    /// Add to Cart (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { sku: "TS-BLK-M", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// Operator sees: "Only 3 TS-BLK-M in stock"
    /// ```
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// Checkout attempted with no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// No usable customer selection at checkout.
    #[error("Invalid customer: {0}")]
    InvalidCustomer(String),

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any state changes, both for operator input and for
/// snapshots being imported.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
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

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (bad SKU characters, malformed amount, bad token).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate SKU or username).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// A snapshot is missing a required collection, or it is not an array.
    #[error("collection '{collection}' is missing or is not an array")]
    MissingCollection { collection: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            sku: "TS-BLK-M".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for TS-BLK-M: available 3, requested 5"
        );
        assert_eq!(CoreError::EmptyCart.to_string(), "Cart is empty");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "sku".to_string(),
        };
        assert_eq!(err.to_string(), "sku is required");

        let err = ValidationError::MissingCollection {
            collection: "stockMovements".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "collection 'stockMovements' is missing or is not an array"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
