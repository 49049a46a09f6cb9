//! # Inventory Ledger
//!
//! Guarded stock adjustments.
//!
//! ## Movement Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  apply_movement(product_id, Out, 4, "damaged")                          │
//! │       │                                                                 │
//! │       ├── quantity <= 0?          → Validation                          │
//! │       ├── product missing?        → NotFound                            │
//! │       ├── on_hand - 4 < 0?        → InsufficientStock (nothing written) │
//! │       ├── on_hand ± 4 overflows?  → Validation (OutOfRange)             │
//! │       │                                                                 │
//! │       ▼  one transaction                                                │
//! │  product.quantity -= 4                                                  │
//! │  stockMovements.push({ type: "out", quantity: 4, notes: "damaged" })   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use shopease_core::validation::validate_movement_quantity;
use shopease_core::{MovementType, Product, StockMovement, ValidationError};
use tracing::{debug, info};

use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::repository::collection::insert;
use crate::store::DocumentStore;

/// Applies a signed delta to a product, refusing to go below zero.
///
/// Shared by the ledger and by checkout so both use the same rule.
pub(crate) fn adjust_stock(
    document: &mut Document,
    product_id: u64,
    delta: i64,
) -> StoreResult<Product> {
    let product = document
        .products
        .iter_mut()
        .find(|p| p.id == product_id)
        .ok_or_else(|| StoreError::not_found("Product", product_id))?;

    let new_quantity = product
        .quantity
        .checked_add(delta)
        .ok_or_else(|| ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        })?;
    if new_quantity < 0 {
        return Err(StoreError::InsufficientStock {
            sku: product.sku.clone(),
            available: product.quantity,
            requested: -delta,
        });
    }

    debug!(product_id, sku = %product.sku, delta, new_quantity, "Adjusting stock");
    product.quantity = new_quantity;
    Ok(product.clone())
}

/// The inventory ledger.
#[derive(Debug, Clone)]
pub struct Ledger {
    store: DocumentStore,
}

impl Ledger {
    pub fn new(store: DocumentStore) -> Self {
        Ledger { store }
    }

    /// Moves stock in or out and records the movement, in one write.
    ///
    /// ## Returns
    /// The updated product and the recorded movement.
    pub async fn apply_movement(
        &self,
        product_id: u64,
        direction: MovementType,
        quantity: i64,
        notes: impl Into<String>,
    ) -> StoreResult<(Product, StockMovement)> {
        validate_movement_quantity(quantity)?;
        let notes = notes.into();

        let (product, movement) = self
            .store
            .transact(|doc| {
                let product = adjust_stock(doc, product_id, direction.signed(quantity))?;
                let movement = insert(
                    doc,
                    StockMovement {
                        id: 0,
                        product_id,
                        date: Utc::now(),
                        movement_type: direction,
                        quantity,
                        notes,
                    },
                )?;
                Ok((product, movement))
            })
            .await?;

        info!(
            sku = %product.sku,
            direction = direction.as_str(),
            quantity,
            on_hand = product.quantity,
            "Stock movement recorded"
        );
        Ok((product, movement))
    }

    /// Recorded movements, newest first. Optionally for one product.
    pub async fn movements(&self, product_id: Option<u64>) -> StoreResult<Vec<StockMovement>> {
        self.store
            .read(|doc| {
                let mut movements: Vec<StockMovement> = doc
                    .stock_movements
                    .iter()
                    .filter(|m| product_id.map_or(true, |id| m.product_id == id))
                    .cloned()
                    .collect();
                movements.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
                movements
            })
            .await
    }

    /// Products with `quantity < threshold`.
    pub async fn low_stock(&self, threshold: i64) -> StoreResult<Vec<Product>> {
        self.store
            .read(|doc| {
                doc.products
                    .iter()
                    .filter(|p| p.is_low_stock(threshold))
                    .cloned()
                    .collect()
            })
            .await
    }
}
