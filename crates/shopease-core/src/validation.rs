//! # Validation Module
//!
//! Input validation for ShopEase POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI (clap)                                                   │
//! │  ├── Argument types (integers, decimal money)                          │
//! │  └── Immediate operator feedback                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Record rules (shopease-store::Record::check)                 │
//! │  └── THIS MODULE: field checks + uniqueness                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Ledger guards                                                │
//! │  └── quantity never drops below zero                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shopease_core::validation::{validate_sku, validate_quantity};
//!
//! validate_sku("TS-BLK-M").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn require_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use shopease_core::validation::validate_sku;
///
/// assert!(validate_sku("TS-BLK-M").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    require_text("sku", sku, 50)?;

    if !sku
        .trim()
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name (1-200 characters).
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    require_text("name", name, 200)
}

/// Validates a product category (1-100 characters).
pub fn validate_category(category: &str) -> ValidationResult<()> {
    require_text("category", category, 100)
}

/// Validates a person's name: employee, customer or user display name.
pub fn validate_person_name(name: &str) -> ValidationResult<()> {
    require_text("name", name, 100)
}

/// Validates a login username.
///
/// ## Rules
/// - 1-50 characters
/// - No whitespace
pub fn validate_username(username: &str) -> ValidationResult<()> {
    require_text("username", username, 50)?;

    if username.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must not contain spaces".to_string(),
        });
    }

    Ok(())
}

/// Validates an optional phone number.
///
/// Digits plus `+`, `-`, spaces and parentheses; at least 7 digits.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: 20,
        });
    }

    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
    let digits = phone.chars().filter(char::is_ascii_digit).count();

    if !allowed || digits < 7 {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must be a phone number with at least 7 digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart or movement quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart: Add Item                                                         │
/// │                                                                         │
/// │  Operator enters quantity: 5                                           │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → Proceed with add_product                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a stock movement quantity: positive, no upper cap.
///
/// Receiving a bulk delivery may exceed the per-cart cap.
pub fn validate_movement_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates on-hand stock: zero is fine, negative never is.
pub fn validate_stock_level(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a price. Zero is allowed (free items), negative is not.
///
/// ## Example
/// ```rust
/// use shopease_core::money::Money;
/// use shopease_core::validation::validate_price;
///
/// assert!(validate_price("sell_price", Money::from_minor(1099)).is_ok());
/// assert!(validate_price("sell_price", Money::zero()).is_ok());
/// assert!(validate_price("sell_price", Money::from_minor(-100)).is_err());
/// ```
pub fn validate_price(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a monthly salary (non-negative).
pub fn validate_salary(salary: Money) -> ValidationResult<()> {
    validate_price("salary", salary)
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size before adding a new line.
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Token Validators
// =============================================================================

/// Validates a session token (UUID format).
///
/// ## Example
/// ```rust
/// use shopease_core::validation::validate_token;
///
/// assert!(validate_token("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_token("not-a-uuid").is_err());
/// ```
pub fn validate_token(token: &str) -> ValidationResult<uuid::Uuid> {
    if token.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "token".to_string(),
        });
    }

    uuid::Uuid::parse_str(token.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: "token".to_string(),
        reason: "must be a valid UUID".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("TS-BLK-M").is_ok());
        assert!(validate_sku("JEANS32").is_ok());
        assert!(validate_sku("scarf_red").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_names() {
        assert!(validate_product_name("Denim Jacket").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
        assert!(validate_category("Outerwear").is_ok());
        assert!(validate_category(" ").is_err());
        assert!(validate_person_name("Ayesha Khan").is_ok());
        assert!(validate_person_name("").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("cashier").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("two words").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("0300-1234567").is_ok());
        assert!(validate_phone("+92 (300) 1234567").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_movement_quantity() {
        assert!(validate_movement_quantity(1).is_ok());
        assert!(validate_movement_quantity(5000).is_ok());
        assert!(validate_movement_quantity(0).is_err());
        assert!(validate_movement_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_stock_level() {
        assert!(validate_stock_level(0).is_ok());
        assert!(validate_stock_level(5000).is_ok());
        assert!(validate_stock_level(-1).is_err());
    }

    #[test]
    fn test_validate_prices() {
        assert!(validate_price("cost_price", Money::zero()).is_ok());
        assert!(validate_price("cost_price", Money::from_minor(-1)).is_err());
        assert!(validate_salary(Money::from_minor(3_000_000)).is_ok());
        assert!(validate_salary(Money::from_minor(-1)).is_err());
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(0).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS - 1).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS).is_err());
    }

    #[test]
    fn test_validate_token() {
        assert!(validate_token("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_token("").is_err());
        assert!(validate_token("123").is_err());
    }
}
