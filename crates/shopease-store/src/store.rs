//! # Document Store
//!
//! The storage slot and the load → mutate → save cycle around it.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Document Store                                  │
//! │                                                                         │
//! │  CLI startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreConfig::new(path) ← or StoreConfig::in_memory() for tests        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DocumentStore::open(config).await ← create slot + initialize          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │         tokio::sync::Mutex<Slot>        │                           │
//! │  │                                         │                           │
//! │  │   transact(f):  lock                    │                           │
//! │  │                 load document           │                           │
//! │  │                 f(&mut document)?       │ ← error: nothing written  │
//! │  │                 save document           │                           │
//! │  │                 unlock                  │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Slot::File   → shopease.json (temp file + rename)                     │
//! │  Slot::Memory → bytes held in the process                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation re-reads the slot while holding the lock, so two
//! handles on the same store never overwrite each other's changes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::Value;
use shopease_core::{AttendanceRecord, Customer, Employee, Product, Sale, StockMovement, User};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::checkout::CheckoutService;
use crate::document::{self, Document};
use crate::error::{StoreError, StoreResult};
use crate::ledger::Ledger;
use crate::reports::ReportService;
use crate::repository::collection::Collection;
use crate::staff::StaffService;

// =============================================================================
// Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Backend {
    File(PathBuf),
    Memory,
}

/// Store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("/path/to/shopease.json").pretty(false);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    backend: Backend,

    /// Indent the stored JSON. Default: true
    pub pretty: bool,
}

impl StoreConfig {
    /// A file-backed slot. The file and its directory are created on first
    /// write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            backend: Backend::File(path.into()),
            pretty: true,
        }
    }

    /// An in-memory slot (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let store = DocumentStore::open(StoreConfig::in_memory()).await?;
    /// // Isolated, gone when the store is dropped
    /// ```
    pub fn in_memory() -> Self {
        StoreConfig {
            backend: Backend::Memory,
            pretty: false,
        }
    }

    /// Sets whether the stored JSON is indented.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Path of a file-backed slot.
    pub fn path(&self) -> Option<&Path> {
        match &self.backend {
            Backend::File(path) => Some(path),
            Backend::Memory => None,
        }
    }
}

// =============================================================================
// Storage Slot
// =============================================================================

#[derive(Debug)]
enum Slot {
    File(PathBuf),
    Memory(Option<Vec<u8>>),
}

impl Slot {
    async fn read(&self) -> StoreResult<Option<Vec<u8>>> {
        match self {
            Slot::Memory(bytes) => Ok(bytes.clone()),
            Slot::File(path) => match tokio::fs::read(path).await {
                Ok(bytes) if bytes.is_empty() => Ok(None),
                Ok(bytes) => Ok(Some(bytes)),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err.into()),
            },
        }
    }

    async fn write(&mut self, bytes: Vec<u8>) -> StoreResult<()> {
        match self {
            Slot::Memory(slot) => {
                *slot = Some(bytes);
                Ok(())
            }
            Slot::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await?;
                }
                // Readers only ever see the old or the new document
                let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
                tmp_name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
                let tmp = path.with_file_name(tmp_name);

                tokio::fs::write(&tmp, &bytes).await?;
                if let Err(err) = tokio::fs::rename(&tmp, &*path).await {
                    let _ = tokio::fs::remove_file(&tmp).await;
                    return Err(err.into());
                }
                Ok(())
            }
        }
    }

    async fn remove(&mut self) -> StoreResult<()> {
        match self {
            Slot::Memory(slot) => {
                *slot = None;
                Ok(())
            }
            Slot::File(path) => match tokio::fs::remove_file(&*path).await {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(err) => Err(err.into()),
            },
        }
    }
}

// =============================================================================
// Document Store
// =============================================================================

#[derive(Debug)]
struct Inner {
    slot: Mutex<Slot>,
    pretty: bool,
    location: String,
}

/// Handle to the document store.
///
/// Cheap to clone: clones share one slot and one lock. Repositories and
/// services each hold a clone.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    inner: Arc<Inner>,
}

impl DocumentStore {
    /// Creates a handle without touching the slot.
    ///
    /// Use this for recovery (`clear`) when `open` fails on a corrupted
    /// document.
    pub fn new(config: StoreConfig) -> Self {
        let (slot, location) = match config.backend {
            Backend::File(path) => {
                let location = path.display().to_string();
                (Slot::File(path), location)
            }
            Backend::Memory => (Slot::Memory(None), ":memory:".to_string()),
        };

        DocumentStore {
            inner: Arc::new(Inner {
                slot: Mutex::new(slot),
                pretty: config.pretty,
                location,
            }),
        }
    }

    /// Creates a handle and initializes the slot.
    ///
    /// ## What This Does
    /// 1. Writes an empty document with the default users if the slot is empty
    /// 2. Reseeds the default users if the users collection is empty
    /// 3. Fails with `Corrupted` if the stored document cannot be read
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        let store = Self::new(config);
        info!(location = %store.location(), "Opening document store");
        store.initialize().await?;
        Ok(store)
    }

    /// Where the document lives (a path, or `:memory:`).
    pub fn location(&self) -> &str {
        &self.inner.location
    }

    // -------------------------------------------------------------------------
    // Slot primitives (caller holds the lock)
    // -------------------------------------------------------------------------

    async fn load_locked(slot: &Slot) -> StoreResult<Option<Document>> {
        match slot.read().await? {
            None => Ok(None),
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|err| StoreError::Corrupted(err.to_string())),
        }
    }

    async fn write_locked(&self, slot: &mut Slot, document: &Document) -> StoreResult<()> {
        let bytes = if self.inner.pretty {
            serde_json::to_vec_pretty(document)?
        } else {
            serde_json::to_vec(document)?
        };
        debug!(bytes = bytes.len(), "Writing document");
        slot.write(bytes).await
    }

    async fn save_locked(&self, slot: &mut Slot, document: &mut Document) -> StoreResult<()> {
        document.metadata.last_modified = Some(Utc::now());
        self.write_locked(slot, document).await
    }

    async fn initialize_locked(&self, slot: &mut Slot) -> StoreResult<bool> {
        match Self::load_locked(slot).await? {
            None => {
                let mut document = Document::new();
                document.seed_default_users();
                self.save_locked(slot, &mut document).await?;
                info!(location = %self.location(), "Initialized empty store");
                Ok(true)
            }
            Some(mut document) => {
                if document.seed_default_users() {
                    self.save_locked(slot, &mut document).await?;
                    warn!("Users collection was empty; default users reseeded");
                }
                Ok(false)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Document operations
    // -------------------------------------------------------------------------

    /// Reads the stored document. `None` when the slot was never initialized.
    pub async fn load(&self) -> StoreResult<Option<Document>> {
        let slot = self.inner.slot.lock().await;
        Self::load_locked(&slot).await
    }

    /// Stamps `metadata.lastModified` and rewrites the whole document.
    pub async fn save(&self, mut document: Document) -> StoreResult<Document> {
        let mut slot = self.inner.slot.lock().await;
        self.save_locked(&mut slot, &mut document).await?;
        Ok(document)
    }

    /// Ensures the slot holds a usable document.
    ///
    /// Returns true when a fresh document was created.
    pub async fn initialize(&self) -> StoreResult<bool> {
        let mut slot = self.inner.slot.lock().await;
        self.initialize_locked(&mut slot).await
    }

    /// Runs `f` against the document inside the store lock and saves the
    /// result.
    ///
    /// ## Atomicity
    /// If `f` returns an error the document is not written, so every change
    /// `f` made is discarded.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let renamed = store.transact(|doc| {
    ///     let product = doc.products.first_mut().ok_or(StoreError::not_found("Product", 1))?;
    ///     product.name = "Linen Shirt".to_string();
    ///     Ok(product.clone())
    /// }).await?;
    /// ```
    pub async fn transact<R>(
        &self,
        f: impl FnOnce(&mut Document) -> StoreResult<R>,
    ) -> StoreResult<R> {
        let mut slot = self.inner.slot.lock().await;
        let mut document = match Self::load_locked(&slot).await? {
            Some(document) => document,
            None => {
                let mut document = Document::new();
                document.seed_default_users();
                document
            }
        };

        let result = f(&mut document)?;
        self.save_locked(&mut slot, &mut document).await?;
        Ok(result)
    }

    /// Runs `f` against the document inside the store lock without writing.
    pub async fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> StoreResult<R> {
        let slot = self.inner.slot.lock().await;
        let document = Self::load_locked(&slot).await?.unwrap_or_default();
        Ok(f(&document))
    }

    // -------------------------------------------------------------------------
    // Snapshots
    // -------------------------------------------------------------------------

    /// Pretty-printed JSON of the whole document.
    pub async fn export_snapshot(&self) -> StoreResult<Vec<u8>> {
        let slot = self.inner.slot.lock().await;
        let document = Self::load_locked(&slot).await?.unwrap_or_default();
        let bytes = serde_json::to_vec_pretty(&document)?;
        info!(bytes = bytes.len(), "Exported snapshot");
        Ok(bytes)
    }

    /// `shopease-backup-YYYY-MM-DD.json`
    pub fn snapshot_file_name(date: NaiveDate) -> String {
        format!("shopease-backup-{}.json", date.format("%Y-%m-%d"))
    }

    /// Replaces the whole document with a snapshot.
    ///
    /// ## Checks (in order)
    /// 1. Bytes parse as JSON, else `Parse`
    /// 2. Every required collection is present and an array, else `Validation`
    /// 3. Every record matches its entity shape, else `Validation`
    ///
    /// The snapshot's metadata is kept verbatim, so importing an export
    /// reproduces the exported document exactly. On any failure the current
    /// document is untouched.
    pub async fn import_snapshot(&self, bytes: &[u8]) -> StoreResult<Document> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|err| StoreError::Parse(err.to_string()))?;
        let document = document::from_snapshot(value)?;

        let mut slot = self.inner.slot.lock().await;
        self.write_locked(&mut slot, &document).await?;

        info!(
            products = document.products.len(),
            sales = document.sales.len(),
            users = document.users.len(),
            "Imported snapshot"
        );
        Ok(document)
    }

    /// Deletes the slot and re-initializes it.
    pub async fn clear(&self) -> StoreResult<()> {
        let mut slot = self.inner.slot.lock().await;
        slot.remove().await?;
        warn!(location = %self.location(), "Store cleared");
        self.initialize_locked(&mut slot).await?;
        Ok(())
    }

    /// Byte size of the stored document, 0 if none.
    pub async fn storage_size(&self) -> StoreResult<u64> {
        let slot = self.inner.slot.lock().await;
        Ok(slot.read().await?.map_or(0, |bytes| bytes.len() as u64))
    }

    // -------------------------------------------------------------------------
    // Repositories & services
    // -------------------------------------------------------------------------

    /// Returns the product repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let shirt = store.products().get_by_sku("SH-LIN-M").await?;
    /// ```
    pub fn products(&self) -> Collection<Product> {
        Collection::new(self.clone())
    }

    pub fn sales(&self) -> Collection<Sale> {
        Collection::new(self.clone())
    }

    pub fn employees(&self) -> Collection<Employee> {
        Collection::new(self.clone())
    }

    pub fn customers(&self) -> Collection<Customer> {
        Collection::new(self.clone())
    }

    pub fn attendance(&self) -> Collection<AttendanceRecord> {
        Collection::new(self.clone())
    }

    pub fn stock_movements(&self) -> Collection<StockMovement> {
        Collection::new(self.clone())
    }

    pub fn users(&self) -> Collection<User> {
        Collection::new(self.clone())
    }

    pub fn ledger(&self) -> Ledger {
        Ledger::new(self.clone())
    }

    pub fn checkout(&self) -> CheckoutService {
        CheckoutService::new(self.clone())
    }

    pub fn reports(&self) -> ReportService {
        ReportService::new(self.clone())
    }

    pub fn staff(&self) -> StaffService {
        StaffService::new(self.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use shopease_core::{Money, ValidationError};

    fn shirt() -> Product {
        Product::new(
            "Linen Shirt",
            "SH-LIN-M",
            "Tops",
            Money::from_minor(1800),
            Money::from_minor(3200),
            12,
        )
        .with_size("M")
    }

    #[tokio::test]
    async fn test_open_seeds_default_users() {
        let store = DocumentStore::open(StoreConfig::in_memory()).await.unwrap();
        let doc = store.load().await.unwrap().unwrap();

        assert_eq!(doc.users.len(), 2);
        assert_eq!(doc.users[0].username, "admin");
        assert_eq!(doc.users[1].username, "cashier");
        assert_eq!(doc.metadata.version, "1.0.0");
        assert!(doc.metadata.last_modified.is_some());
        assert!(doc.products.is_empty());
    }

    #[tokio::test]
    async fn test_load_before_initialize_is_none() {
        let store = DocumentStore::new(StoreConfig::in_memory());
        assert!(store.load().await.unwrap().is_none());
        assert_eq!(store.storage_size().await.unwrap(), 0);

        assert!(store.initialize().await.unwrap());
        assert!(!store.initialize().await.unwrap());
        assert!(store.storage_size().await.unwrap() > 0);
    }

    #[tokio::test]
    async fn test_initialize_reseeds_empty_users() {
        let store = DocumentStore::open(StoreConfig::in_memory()).await.unwrap();
        store
            .transact(|doc| {
                doc.users.clear();
                Ok(())
            })
            .await
            .unwrap();

        store.initialize().await.unwrap();
        let users = store.users().list().await.unwrap();
        assert_eq!(users.len(), 2);
    }

    #[tokio::test]
    async fn test_save_stamps_last_modified() {
        let store = DocumentStore::open(StoreConfig::in_memory()).await.unwrap();
        let mut doc = store.load().await.unwrap().unwrap();
        doc.metadata.last_modified = None;

        let saved = store.save(doc).await.unwrap();
        assert!(saved.metadata.last_modified.is_some());
        assert_eq!(store.load().await.unwrap().unwrap(), saved);
    }

    #[tokio::test]
    async fn test_failed_transaction_writes_nothing() {
        let store = DocumentStore::open(StoreConfig::in_memory()).await.unwrap();
        let before = store.load().await.unwrap();

        let result: StoreResult<()> = store
            .transact(|doc| {
                doc.products.push(shirt());
                Err(StoreError::EmptyCart)
            })
            .await;

        assert!(matches!(result, Err(StoreError::EmptyCart)));
        assert_eq!(store.load().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let store = DocumentStore::open(StoreConfig::in_memory()).await.unwrap();
        store.products().add(shirt()).await.unwrap();
        let exported_doc = store.load().await.unwrap().unwrap();

        let bytes = store.export_snapshot().await.unwrap();
        // Pretty-printed with indentation
        assert!(String::from_utf8(bytes.clone()).unwrap().contains("\n  "));

        let other = DocumentStore::open(StoreConfig::in_memory()).await.unwrap();
        let imported = other.import_snapshot(&bytes).await.unwrap();

        assert_eq!(imported, exported_doc);
        assert_eq!(other.load().await.unwrap().unwrap(), exported_doc);
    }

    #[tokio::test]
    async fn test_import_rejects_invalid_json() {
        let store = DocumentStore::open(StoreConfig::in_memory()).await.unwrap();
        let before = store.load().await.unwrap();

        let err = store.import_snapshot(b"{ not json").await.unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
        assert_eq!(store.load().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_import_rejects_missing_collection() {
        let store = DocumentStore::open(StoreConfig::in_memory()).await.unwrap();
        let before = store.load().await.unwrap();

        let snapshot = br#"{"products": [], "sales": [], "employees": [],
            "customers": [], "attendance": [], "users": []}"#;
        let err = store.import_snapshot(snapshot).await.unwrap_err();

        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::MissingCollection { ref collection })
                if collection == "stockMovements"
        ));
        assert_eq!(store.load().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_clear_resets_to_fresh_document() {
        let store = DocumentStore::open(StoreConfig::in_memory()).await.unwrap();
        store.products().add(shirt()).await.unwrap();

        store.clear().await.unwrap();
        let doc = store.load().await.unwrap().unwrap();
        assert!(doc.products.is_empty());
        assert_eq!(doc.users.len(), 2);
    }

    #[tokio::test]
    async fn test_snapshot_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(
            DocumentStore::snapshot_file_name(date),
            "shopease-backup-2024-03-05.json"
        );
    }

    #[tokio::test]
    async fn test_file_slot_persists_across_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("shopease.json");

        let store = DocumentStore::open(StoreConfig::new(&path)).await.unwrap();
        store.products().add(shirt()).await.unwrap();
        assert!(path.exists());

        let reopened = DocumentStore::open(StoreConfig::new(&path)).await.unwrap();
        let products = reopened.products().list().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].sku, "SH-LIN-M");

        // No temp files left behind
        let leftovers = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[tokio::test]
    async fn test_corrupted_file_and_recovery() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shopease.json");
        std::fs::write(&path, b"{\"products\": 42").unwrap();

        let err = DocumentStore::open(StoreConfig::new(&path)).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupted(_)));

        let store = DocumentStore::new(StoreConfig::new(&path));
        store.clear().await.unwrap();
        assert_eq!(store.users().count().await.unwrap(), 2);
    }
}
