//! # Checkout
//!
//! Turns a cart into a persisted sale.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        checkout(cart, customer)                         │
//! │                                                                         │
//! │  cart empty? ───────────────► EmptyCart                                │
//! │  no customer selected? ─────► InvalidCustomer                          │
//! │       │                                                                 │
//! │       ▼  ── one transaction ───────────────────────────────────────    │
//! │  resolve customer name (Walk-in / typed / record / Unknown)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each line: stored quantity >= line quantity?                      │
//! │       ├── product gone ─────► NotFound           ┐                     │
//! │       └── short ────────────► InsufficientStock  ├─ nothing written    │
//! │       │                                          ┘                     │
//! │       ▼                                                                 │
//! │  sales.push(Sale { lines frozen at cart time })                        │
//! │  products[i].quantity -= line.quantity                                 │
//! │       │                                                                 │
//! │       ▼  ── commit ──────────────────────────────────────────────     │
//! │  Sale                                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stock check here runs against the stored quantity at commit time,
//! using the same guarded rule as the ledger. The cart's own check only
//! saw the quantity known when the product was added.

use chrono::Utc;
use shopease_core::{Cart, CustomerSelection, Sale};
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::ledger::adjust_stock;
use crate::repository::collection::insert;
use crate::store::DocumentStore;

#[derive(Debug, Clone)]
pub struct CheckoutService {
    store: DocumentStore,
}

impl CheckoutService {
    pub fn new(store: DocumentStore) -> Self {
        CheckoutService { store }
    }

    /// Commits the cart as one sale and decrements stock for every line.
    ///
    /// Either the sale and all decrements are written, or nothing is.
    pub async fn checkout(
        &self,
        cart: &Cart,
        customer: Option<&CustomerSelection>,
    ) -> StoreResult<Sale> {
        if cart.is_empty() {
            return Err(StoreError::EmptyCart);
        }
        let selection = customer.ok_or_else(|| {
            StoreError::InvalidCustomer("select a customer or walk-in".to_string())
        })?;

        let sale = self
            .store
            .transact(|doc| {
                let customer = selection.resolve(&doc.customers)?;
                let draft = cart.to_sale(Utc::now(), &customer)?;

                for line in &cart.lines {
                    adjust_stock(doc, line.product_id, -line.quantity)?;
                }

                insert(doc, draft)
            })
            .await?;

        info!(
            sale_id = sale.id,
            customer = %sale.customer_name,
            lines = sale.items.len(),
            total = %sale.total,
            "Sale committed"
        );
        Ok(sale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreConfig;
    use shopease_core::{
        Customer, Money, Product, Receipt, UNKNOWN_CUSTOMER, WALK_IN_CUSTOMER,
    };

    async fn store() -> DocumentStore {
        DocumentStore::open(StoreConfig::in_memory()).await.unwrap()
    }

    async fn add_product(store: &DocumentStore, sku: &str, qty: i64, cost: i64, price: i64) -> Product {
        store
            .products()
            .add(Product::new(
                format!("Item {sku}"),
                sku,
                "Tops",
                Money::from_minor(cost),
                Money::from_minor(price),
                qty,
            ))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_checkout_decrements_and_records_sale() {
        let store = store().await;
        // cost 5.00, price 8.00, 10 on hand
        let a1 = add_product(&store, "A1", 10, 500, 800).await;

        let mut cart = Cart::new();
        cart.add_product(&a1, 3).unwrap();

        let sale = store
            .checkout()
            .checkout(&cart, Some(&CustomerSelection::WalkIn))
            .await
            .unwrap();

        assert_eq!(store.products().get(a1.id).await.unwrap().quantity, 7);
        assert_eq!(sale.total, Money::from_minor(2400));
        assert_eq!(sale.cost, Money::from_minor(1500));
        assert_eq!(sale.profit, Money::from_minor(900));
        assert_eq!(sale.customer_name, WALK_IN_CUSTOMER);
        assert_eq!(sale.customer_id, None);
        assert!(sale.is_consistent());

        let stored = store.sales().get(sale.id).await.unwrap();
        assert_eq!(stored, sale);

        let receipt = Receipt::from_sale(&sale);
        assert_eq!(receipt.total, Money::from_minor(2400));
    }

    #[tokio::test]
    async fn test_empty_cart_and_missing_customer() {
        let store = store().await;
        let a1 = add_product(&store, "A1", 10, 500, 800).await;

        let err = store
            .checkout()
            .checkout(&Cart::new(), Some(&CustomerSelection::WalkIn))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::EmptyCart));

        let mut cart = Cart::new();
        cart.add_product(&a1, 1).unwrap();
        let err = store.checkout().checkout(&cart, None).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidCustomer(_)));

        let err = store
            .checkout()
            .checkout(&cart, Some(&CustomerSelection::Named("   ".to_string())))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidCustomer(_)));

        assert_eq!(store.sales().count().await.unwrap(), 0);
        assert_eq!(store.products().get(a1.id).await.unwrap().quantity, 10);
    }

    #[tokio::test]
    async fn test_short_line_at_commit_aborts_everything() {
        let store = store().await;
        let a1 = add_product(&store, "A1", 10, 500, 800).await;
        let b2 = add_product(&store, "B2", 5, 300, 600).await;

        let mut cart = Cart::new();
        cart.add_product(&a1, 4).unwrap();
        cart.add_product(&b2, 5).unwrap();

        // Another till sells B2 stock after it went into this cart
        store
            .products()
            .update(b2.id, |p| p.quantity = 2)
            .await
            .unwrap();

        let err = store
            .checkout()
            .checkout(&cart, Some(&CustomerSelection::WalkIn))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::InsufficientStock { ref sku, available: 2, requested: 5 } if sku == "B2"
        ));
        assert_eq!(store.products().get(a1.id).await.unwrap().quantity, 10);
        assert_eq!(store.products().get(b2.id).await.unwrap().quantity, 2);
        assert_eq!(store.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_deleted_product_aborts_checkout() {
        let store = store().await;
        let a1 = add_product(&store, "A1", 10, 500, 800).await;

        let mut cart = Cart::new();
        cart.add_product(&a1, 1).unwrap();
        store.products().delete(a1.id).await.unwrap();

        let err = store
            .checkout()
            .checkout(&cart, Some(&CustomerSelection::WalkIn))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(store.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_customer_names() {
        let store = store().await;
        let a1 = add_product(&store, "A1", 10, 500, 800).await;
        let ayesha = store
            .customers()
            .add(Customer::new("Ayesha", None))
            .await
            .unwrap();

        let mut cart = Cart::new();
        cart.add_product(&a1, 1).unwrap();
        let checkout = store.checkout();

        let known = checkout
            .checkout(&cart, Some(&CustomerSelection::Existing(ayesha.id)))
            .await
            .unwrap();
        assert_eq!(known.customer_name, "Ayesha");
        assert_eq!(known.customer_id, Some(ayesha.id));

        let typed = checkout
            .checkout(&cart, Some(&CustomerSelection::Named(" Bilal ".to_string())))
            .await
            .unwrap();
        assert_eq!(typed.customer_name, "Bilal");

        let gone = checkout
            .checkout(&cart, Some(&CustomerSelection::Existing(404)))
            .await
            .unwrap();
        assert_eq!(gone.customer_name, UNKNOWN_CUSTOMER);
        assert_eq!(gone.customer_id, Some(404));

        assert_eq!(store.products().get(a1.id).await.unwrap().quantity, 7);
        let ids: Vec<u64> = store.sales().list().await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_frozen_snapshot_survives_catalog_edit() {
        let store = store().await;
        let a1 = add_product(&store, "A1", 10, 500, 800).await;

        let mut cart = Cart::new();
        cart.add_product(&a1, 2).unwrap();
        let sale = store
            .checkout()
            .checkout(&cart, Some(&CustomerSelection::WalkIn))
            .await
            .unwrap();

        store
            .products()
            .update(a1.id, |p| {
                p.name = "Renamed".to_string();
                p.sell_price = Money::from_minor(9900);
            })
            .await
            .unwrap();

        let stored = store.sales().get(sale.id).await.unwrap();
        assert_eq!(stored.items[0].name, "Item A1");
        assert_eq!(stored.items[0].price, Money::from_minor(800));
    }
}
