//! # Collection Repository
//!
//! Generic CRUD over one typed collection of the document.
//!
//! ## Id Assignment
//! ```text
//! existing ids: [1, 2, 5]
//!
//! add(x)              → x.id = 6            (max + 1)
//! bulk_add([a, b, c]) → 6, 7, 8             (max computed once)
//! delete(6); add(y)   → y.id = 6            (max + 1 again)
//! ```
//!
//! Every write goes through [`DocumentStore::transact`], so a failing
//! record check leaves the document untouched.

use std::fmt;
use std::marker::PhantomData;

use tracing::debug;

use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::repository::Record;
use crate::store::DocumentStore;

// =============================================================================
// Document-level helpers
// =============================================================================
//
// Services that touch several collections in one transaction use these
// directly on the `&mut Document` they are handed.

/// `max(existing ids, 0) + 1`
pub(crate) fn next_id<T: Record>(items: &[T]) -> u64 {
    items.iter().map(Record::id).max().unwrap_or(0) + 1
}

/// Assigns the next id, checks record rules and appends.
pub(crate) fn insert<T: Record>(document: &mut Document, mut item: T) -> StoreResult<T> {
    let items = T::all_mut(document);
    item.set_id(next_id(items));
    item.check(items)?;
    items.push(item.clone());
    Ok(item)
}

pub(crate) fn find<T: Record>(document: &Document, id: u64) -> StoreResult<&T> {
    T::all(document)
        .iter()
        .find(|item| item.id() == id)
        .ok_or_else(|| StoreError::not_found(T::ENTITY, id))
}

/// Applies `f` to a copy of the record, pins the id, re-checks, then
/// stores the copy.
pub(crate) fn modify<T: Record>(
    document: &mut Document,
    id: u64,
    f: impl FnOnce(&mut T),
) -> StoreResult<T> {
    let items = T::all_mut(document);
    let index = items
        .iter()
        .position(|item| item.id() == id)
        .ok_or_else(|| StoreError::not_found(T::ENTITY, id))?;

    let mut updated = items[index].clone();
    f(&mut updated);
    updated.set_id(id);
    updated.check(items)?;

    items[index] = updated.clone();
    Ok(updated)
}

// =============================================================================
// Collection
// =============================================================================

/// Repository over the collection holding `T`.
///
/// ## Usage
/// ```rust,ignore
/// let customers = store.customers();
///
/// let added = customers.add(Customer::new("Ayesha", None)).await?;
/// let renamed = customers.update(added.id, |c| c.name = "Ayesha Khan".into()).await?;
/// let regulars = customers.find_where(|c| c.phone.is_some()).await?;
/// ```
pub struct Collection<T> {
    store: DocumentStore,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Collection {
            store: self.store.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("entity", &T::ENTITY)
            .field("store", &self.store.location())
            .finish()
    }
}

impl<T: Record> Collection<T> {
    /// Creates a new Collection.
    pub fn new(store: DocumentStore) -> Self {
        Collection {
            store,
            _record: PhantomData,
        }
    }

    pub(crate) fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// All records, in stored order.
    pub async fn list(&self) -> StoreResult<Vec<T>> {
        self.store.read(|doc| T::all(doc).clone()).await
    }

    /// The record with `id`, or `NotFound`.
    pub async fn get(&self, id: u64) -> StoreResult<T> {
        debug!(entity = T::ENTITY, id, "Fetching record");
        self.store
            .read(|doc| find::<T>(doc, id).cloned())
            .await?
    }

    pub async fn count(&self) -> StoreResult<usize> {
        self.store.read(|doc| T::all(doc).len()).await
    }

    /// Linear-scan filter.
    pub async fn find_where<P>(&self, predicate: P) -> StoreResult<Vec<T>>
    where
        P: Fn(&T) -> bool,
    {
        self.store
            .read(|doc| {
                T::all(doc)
                    .iter()
                    .filter(|item| predicate(*item))
                    .cloned()
                    .collect()
            })
            .await
    }

    /// Assigns `max + 1`, checks, appends, persists. Returns the stored record.
    pub async fn add(&self, item: T) -> StoreResult<T> {
        let added = self.store.transact(|doc| insert(doc, item)).await?;
        debug!(entity = T::ENTITY, id = added.id(), "Record added");
        Ok(added)
    }

    /// Adds a batch in one write, assigning `base + 1, base + 2, ...` where
    /// `base` is the max id before the batch.
    pub async fn bulk_add(&self, items: Vec<T>) -> StoreResult<Vec<T>> {
        let added = self
            .store
            .transact(|doc| {
                let existing = T::all_mut(doc);
                let base = next_id(existing) - 1;
                let mut added = Vec::with_capacity(items.len());

                for (offset, mut item) in (1u64..).zip(items) {
                    item.set_id(base + offset);
                    item.check(existing)?;
                    existing.push(item.clone());
                    added.push(item);
                }
                Ok(added)
            })
            .await?;

        debug!(entity = T::ENTITY, count = added.len(), "Records bulk added");
        Ok(added)
    }

    /// Merges changes into the record with `id`.
    ///
    /// The closure sees the current record; whatever it sets is kept, except
    /// the id. Record rules are re-checked before the write.
    pub async fn update<F>(&self, id: u64, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut T),
    {
        debug!(entity = T::ENTITY, id, "Updating record");
        self.store.transact(|doc| modify(doc, id, f)).await
    }

    /// Removes the record with `id`. A missing id is not an error.
    pub async fn delete(&self, id: u64) -> StoreResult<bool> {
        let removed = self
            .store
            .transact(|doc| {
                let items = T::all_mut(doc);
                let before = items.len();
                items.retain(|item| item.id() != id);
                Ok(items.len() != before)
            })
            .await?;

        debug!(entity = T::ENTITY, id, removed, "Delete record");
        Ok(removed)
    }

    /// Removes every record whose id is listed. Returns how many went.
    pub async fn bulk_delete(&self, ids: &[u64]) -> StoreResult<usize> {
        let removed = self
            .store
            .transact(|doc| {
                let items = T::all_mut(doc);
                let before = items.len();
                items.retain(|item| !ids.contains(&item.id()));
                Ok(before - items.len())
            })
            .await?;

        debug!(entity = T::ENTITY, removed, "Bulk delete");
        Ok(removed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
