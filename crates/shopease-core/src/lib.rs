//! # shopease-core: Pure Business Logic for ShopEase POS
//!
//! This crate holds the business rules of the shop as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ShopEase POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    shopease CLI (apps/cli)                      │   │
//! │  │    product ──► stock ──► sale checkout ──► report              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ shopease-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ │   │
//! │  │   │  types  │ │  money  │ │  cart   │ │validation│ │ reports │ │   │
//! │  │   │ Product │ │  Money  │ │  Cart   │ │  rules   │ │Dashboard│ │   │
//! │  │   │  Sale   │ │         │ │CartLine │ │  checks  │ │ Finance │ │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └─────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 shopease-store (Document Layer)                 │   │
//! │  │        JSON document slot, collections, ledger, checkout        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, StockMovement, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`cart`] - Cart accumulation and totals
//! - [`reports`] - Dashboard and finance aggregation
//!
//! ## Example Usage
//!
//! ```rust
//! use shopease_core::money::Money;
//!
//! let price: Money = "8.00".parse().unwrap();
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.minor_units(), 2400);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod reports;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine, CustomerSelection, Receipt, ReceiptLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Version string written into `metadata.version` of a fresh document.
pub const DOCUMENT_VERSION: &str = "1.0.0";

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single product in a cart.
///
/// Guards against typing 1000 instead of 10 at the till.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Display name recorded on sales made without a customer record.
pub const WALK_IN_CUSTOMER: &str = "Walk-in Customer";

/// Display name recorded when a selected customer id no longer resolves.
pub const UNKNOWN_CUSTOMER: &str = "Unknown Customer";

/// Category label used in breakdowns when a sold product was since deleted.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// How many products the finance report ranks.
pub const TOP_PRODUCTS_LIMIT: usize = 5;

/// Longest daily trend window (one year, leap day included).
pub const MAX_TREND_DAYS: u32 = 366;

/// Longest monthly trend window (ten years).
pub const MAX_TREND_MONTHS: u32 = 120;

/// Products below this on-hand quantity are flagged as low stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Lifetime of a login session.
pub const SESSION_TTL_HOURS: i64 = 24;
