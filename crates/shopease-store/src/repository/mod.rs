//! # Repository Module
//!
//! Typed access to the collections inside the document.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  CLI command                                                           │
//! │       │                                                                 │
//! │       │  store.products().get_by_sku("SH-LIN-M")                       │
//! │       ▼                                                                 │
//! │  Collection<Product>                                                   │
//! │  ├── list / get / count / find_where                                   │
//! │  ├── add / bulk_add          (id = max + 1, Record::check)             │
//! │  ├── update(id, |p| ...)     (closure merge, id pinned)                │
//! │  └── delete / bulk_delete                                              │
//! │       │                                                                 │
//! │       │  Record::all / all_mut pick the typed Vec                       │
//! │       ▼                                                                 │
//! │  Document { products: Vec<Product>, ... }                              │
//! │                                                                         │
//! │  Each entity implements Record once; Collection<T> does the rest.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`collection::Collection`] - Generic CRUD over any [`Record`]
//! - [`product::ProductRepository`] - Adds SKU lookup
//! - [`user::UserRepository`] - Adds username lookup and authentication

pub mod collection;
pub mod product;
pub mod user;

use shopease_core::validation::{
    validate_category, validate_movement_quantity, validate_person_name, validate_phone,
    validate_price, validate_product_name, validate_salary, validate_sku,
    validate_stock_level, validate_username, ValidationResult,
};
use shopease_core::{
    AttendanceRecord, Customer, Employee, Product, Sale, StockMovement, User, ValidationError,
};

use crate::document::Document;

/// An entity stored in one of the document's collections.
///
/// `check` sees the whole collection; records sharing `self`'s id are
/// ignored, so the same rule works for add and for update.
pub trait Record: Clone + Send + Sync + 'static {
    /// Entity name used in errors and logs.
    const ENTITY: &'static str;

    fn id(&self) -> u64;

    fn set_id(&mut self, id: u64);

    fn all(document: &Document) -> &Vec<Self>;

    fn all_mut(document: &mut Document) -> &mut Vec<Self>;

    /// Record rules. Default: none.
    fn check(&self, _existing: &[Self]) -> ValidationResult<()> {
        Ok(())
    }
}

// =============================================================================
// Record Implementations
// =============================================================================

impl Record for Product {
    const ENTITY: &'static str = "Product";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn all(document: &Document) -> &Vec<Self> {
        &document.products
    }

    fn all_mut(document: &mut Document) -> &mut Vec<Self> {
        &mut document.products
    }

    fn check(&self, existing: &[Self]) -> ValidationResult<()> {
        validate_sku(&self.sku)?;
        validate_product_name(&self.name)?;
        validate_category(&self.category)?;
        validate_price("cost_price", self.cost_price)?;
        validate_price("sell_price", self.sell_price)?;
        validate_stock_level(self.quantity)?;

        let sku = self.sku.trim();
        if existing
            .iter()
            .any(|p| p.id != self.id && p.sku.trim().eq_ignore_ascii_case(sku))
        {
            return Err(ValidationError::Duplicate {
                field: "sku".to_string(),
                value: sku.to_string(),
            });
        }

        Ok(())
    }
}

impl Record for Sale {
    const ENTITY: &'static str = "Sale";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn all(document: &Document) -> &Vec<Self> {
        &document.sales
    }

    fn all_mut(document: &mut Document) -> &mut Vec<Self> {
        &mut document.sales
    }

    fn check(&self, _existing: &[Self]) -> ValidationResult<()> {
        if self.items.is_empty() {
            return Err(ValidationError::Required {
                field: "items".to_string(),
            });
        }
        if !self.is_consistent() {
            return Err(ValidationError::InvalidFormat {
                field: "sale".to_string(),
                reason: "totals do not match line items".to_string(),
            });
        }
        Ok(())
    }
}

impl Record for StockMovement {
    const ENTITY: &'static str = "StockMovement";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn all(document: &Document) -> &Vec<Self> {
        &document.stock_movements
    }

    fn all_mut(document: &mut Document) -> &mut Vec<Self> {
        &mut document.stock_movements
    }

    fn check(&self, _existing: &[Self]) -> ValidationResult<()> {
        validate_movement_quantity(self.quantity)
    }
}

impl Record for Employee {
    const ENTITY: &'static str = "Employee";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn all(document: &Document) -> &Vec<Self> {
        &document.employees
    }

    fn all_mut(document: &mut Document) -> &mut Vec<Self> {
        &mut document.employees
    }

    fn check(&self, _existing: &[Self]) -> ValidationResult<()> {
        validate_person_name(&self.name)?;
        validate_salary(self.salary)
    }
}

impl Record for AttendanceRecord {
    const ENTITY: &'static str = "Attendance";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn all(document: &Document) -> &Vec<Self> {
        &document.attendance
    }

    fn all_mut(document: &mut Document) -> &mut Vec<Self> {
        &mut document.attendance
    }

    /// One record per employee per day.
    fn check(&self, existing: &[Self]) -> ValidationResult<()> {
        if existing
            .iter()
            .any(|r| r.id != self.id && r.employee_id == self.employee_id && r.date == self.date)
        {
            return Err(ValidationError::Duplicate {
                field: "attendance".to_string(),
                value: format!("employee {} on {}", self.employee_id, self.date),
            });
        }
        Ok(())
    }
}

impl Record for Customer {
    const ENTITY: &'static str = "Customer";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn all(document: &Document) -> &Vec<Self> {
        &document.customers
    }

    fn all_mut(document: &mut Document) -> &mut Vec<Self> {
        &mut document.customers
    }

    fn check(&self, _existing: &[Self]) -> ValidationResult<()> {
        validate_person_name(&self.name)?;
        match self.phone.as_deref().map(str::trim) {
            Some(phone) if !phone.is_empty() => validate_phone(phone),
            _ => Ok(()),
        }
    }
}

impl Record for User {
    const ENTITY: &'static str = "User";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn all(document: &Document) -> &Vec<Self> {
        &document.users
    }

    fn all_mut(document: &mut Document) -> &mut Vec<Self> {
        &mut document.users
    }

    fn check(&self, existing: &[Self]) -> ValidationResult<()> {
        validate_username(&self.username)?;
        validate_person_name(&self.name)?;

        if self.password.is_empty() {
            return Err(ValidationError::Required {
                field: "password".to_string(),
            });
        }

        if existing
            .iter()
            .any(|u| u.id != self.id && u.username == self.username)
        {
            return Err(ValidationError::Duplicate {
                field: "username".to_string(),
                value: self.username.clone(),
            });
        }

        Ok(())
    }
}
