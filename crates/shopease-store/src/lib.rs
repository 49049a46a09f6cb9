//! # shopease-store: Document Store for ShopEase POS
//!
//! The whole dataset lives in one versioned JSON document held in one
//! storage slot. This crate loads it, mutates it and writes it back.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ShopEase POS Data Flow                             │
//! │                                                                         │
//! │  CLI command (sale checkout)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  shopease-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ DocumentStore │    │  Collections  │    │   Services   │  │   │
//! │  │   │  (store.rs)   │    │ (repository/) │    │              │  │   │
//! │  │   │               │    │               │    │ Ledger       │  │   │
//! │  │   │ Mutex<Slot>   │◄───│ Collection<T> │◄───│ Checkout     │  │   │
//! │  │   │ transact/read │    │ Product, User │    │ Reports      │  │   │
//! │  │   │ import/export │    │ ...           │    │ Staff        │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                shopease.json (one document)                     │   │
//! │  │   ~/.local/share/pos/shopease.json                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The storage slot and load/save/transact
//! - [`document`] - The persisted document layout
//! - [`error`] - Store error types
//! - [`repository`] - Typed collections (product, user, ...)
//! - [`ledger`] - Guarded stock movements
//! - [`checkout`] - Cart to sale, atomically
//! - [`reports`] - Dashboard and finance queries
//! - [`staff`] - Employees and attendance
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shopease_store::{DocumentStore, StoreConfig};
//!
//! let store = DocumentStore::open(StoreConfig::new("./shopease.json")).await?;
//!
//! let products = store.products().list().await?;
//! let stats = store.reports().dashboard().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod document;
pub mod error;
pub mod ledger;
pub mod reports;
pub mod repository;
pub mod staff;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::CheckoutService;
pub use document::{Document, Metadata};
pub use error::{StoreError, StoreResult};
pub use ledger::Ledger;
pub use reports::ReportService;
pub use staff::StaffService;
pub use store::{DocumentStore, StoreConfig};

// Repository re-exports for convenience
pub use repository::collection::Collection;
pub use repository::product::ProductRepository;
pub use repository::user::UserRepository;
pub use repository::Record;
