//! # Persisted Document
//!
//! The single JSON document that holds the whole dataset.
//!
//! ## Layout
//! ```text
//! {
//!   "products":       [ Product, ... ],
//!   "sales":          [ Sale, ... ],
//!   "employees":      [ Employee, ... ],
//!   "customers":      [ Customer, ... ],
//!   "attendance":     [ AttendanceRecord, ... ],
//!   "stockMovements": [ StockMovement, ... ],
//!   "users":          [ User, ... ],
//!   "metadata":       { "version": "1.0.0", "lastModified": "..." }
//! }
//! ```
//!
//! Loading is lenient (absent collections default to empty). Imports are
//! strict: see [`validate_structure`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shopease_core::validation::ValidationResult;
use shopease_core::{
    AttendanceRecord, Customer, Employee, Product, Role, Sale, StockMovement, User,
    ValidationError, DOCUMENT_VERSION,
};

/// Top-level keys an imported snapshot must carry as arrays.
pub const REQUIRED_COLLECTIONS: [&str; 7] = [
    "products",
    "sales",
    "employees",
    "customers",
    "attendance",
    "stockMovements",
    "users",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub version: String,
    #[serde(rename = "lastModified", default)]
    pub last_modified: Option<DateTime<Utc>>,
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata {
            version: DOCUMENT_VERSION.to_string(),
            last_modified: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub sales: Vec<Sale>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
    #[serde(rename = "stockMovements", default)]
    pub stock_movements: Vec<StockMovement>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    /// An empty document with current metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces an empty user list with the two built-in accounts.
    ///
    /// Returns true when users were added.
    pub fn seed_default_users(&mut self) -> bool {
        if !self.users.is_empty() {
            return false;
        }
        self.users = default_users();
        true
    }
}

/// The accounts a fresh store starts with.
///
/// | username | password    | role    | name          |
/// |----------|-------------|---------|---------------|
/// | admin    | admin123    | admin   | Administrator |
/// | cashier  | cashier123  | cashier | Cashier User  |
pub fn default_users() -> Vec<User> {
    let mut admin = User::new("admin", "admin123", Role::Admin, "Administrator");
    admin.id = 1;
    let mut cashier = User::new("cashier", "cashier123", Role::Cashier, "Cashier User");
    cashier.id = 2;
    vec![admin, cashier]
}

/// Checks the top-level shape of a snapshot before it replaces the store.
///
/// Every name in [`REQUIRED_COLLECTIONS`] must be present and be an array.
/// Field-level shape is checked afterwards by deserialization.
pub fn validate_structure(value: &Value) -> ValidationResult<()> {
    let object = value
        .as_object()
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "snapshot".to_string(),
            reason: "top level must be an object".to_string(),
        })?;

    for name in REQUIRED_COLLECTIONS {
        if !object.get(name).is_some_and(Value::is_array) {
            return Err(ValidationError::MissingCollection {
                collection: name.to_string(),
            });
        }
    }

    Ok(())
}

/// Validates and decodes a snapshot value.
pub fn from_snapshot(value: Value) -> ValidationResult<Document> {
    validate_structure(&value)?;
    serde_json::from_value(value).map_err(|err| ValidationError::InvalidFormat {
        field: "snapshot".to_string(),
        reason: err.to_string(),
    })
}
