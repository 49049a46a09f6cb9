//! # Product Repository
//!
//! Catalog lookups on top of the generic collection.
//!
//! ## Search
//! ```text
//! Operator types: "denim"
//!      │
//!      ▼
//! case-insensitive match on name, sku, category
//!      │
//!      ▼
//! ┌──────────────────────────────────────────────┐
//! │ JK-DEN-M  │ Denim Jacket  │ Outerwear        │ ← MATCH
//! │ JN-DEN-32 │ Slim Jeans    │ Denim            │ ← MATCH
//! │ TS-BLK-M  │ Black Tee     │ Tops             │
//! └──────────────────────────────────────────────┘
//! ```

use shopease_core::Product;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::repository::collection::Collection;

/// Repository for products.
pub type ProductRepository = Collection<Product>;

impl Collection<Product> {
    /// Looks a product up by SKU (case-insensitive).
    ///
    /// ## Returns
    /// * `Ok(Product)` - Product found
    /// * `Err(StoreError::NotFound)` - No product with that SKU
    pub async fn get_by_sku(&self, sku: &str) -> StoreResult<Product> {
        let sku = sku.trim();
        debug!(sku = %sku, "Fetching product by SKU");

        self.store()
            .read(|doc| {
                doc.products
                    .iter()
                    .find(|p| p.sku.eq_ignore_ascii_case(sku))
                    .cloned()
            })
            .await?
            .ok_or_else(|| StoreError::not_found("Product", sku))
    }

    /// Products whose name, SKU or category contains `query`.
    ///
    /// An empty query returns the whole catalog.
    pub async fn search(&self, query: &str) -> StoreResult<Vec<Product>> {
        let needle = query.trim().to_lowercase();
        debug!(query = %needle, "Searching products");

        if needle.is_empty() {
            return self.list().await;
        }

        self.find_where(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.sku.to_lowercase().contains(&needle)
                || p.category.to_lowercase().contains(&needle)
        })
        .await
    }
}
