//! # Cart
//!
//! Accumulates products and quantities before checkout, and turns them into
//! a sale draft.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Operations                                   │
//! │                                                                         │
//! │  Operator Action          Cart Method            State Change           │
//! │  ───────────────          ───────────            ────────────           │
//! │                                                                         │
//! │  Scan / pick product ────► add_product() ──────► merge or push line    │
//! │                                                                         │
//! │  Change quantity ────────► update_quantity() ──► line.qty = n (0 drops)│
//! │                                                                         │
//! │  Remove line ────────────► remove() ───────────► lines.retain(..)      │
//! │                                                                         │
//! │  Checkout ───────────────► to_sale() ──────────► Sale draft (id 0)     │
//! │                                                                         │
//! │  NOTE: stock checks here use the quantity known when the product was   │
//! │        added. The store re-checks against stored stock at commit.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Customer, Product, Sale, SaleLineItem};
use crate::validation::{validate_cart_size, validate_quantity};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, UNKNOWN_CUSTOMER, WALK_IN_CUSTOMER};

// =============================================================================
// Cart Line
// =============================================================================

/// A line in the cart.
///
/// Name, price and cost are frozen when the product is first added. If the
/// catalog changes afterwards, the cart (and the sale it becomes) keeps the
/// original values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub product_id: u64,
    pub sku: String,
    pub name: String,
    pub price: Money,
    pub cost: Money,
    pub quantity: i64,
    /// On-hand quantity last seen for this product.
    pub available: i64,
}

impl CartLine {
    fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            product_id: product.id,
            sku: product.sku.clone(),
            name: product.name.clone(),
            price: product.sell_price,
            cost: product.cost_price,
            quantity,
            available: product.quantity,
        }
    }

    /// `price × quantity`
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }

    /// `cost × quantity`
    pub fn line_cost(&self) -> Money {
        self.cost.multiply_quantity(self.quantity)
    }

    fn check_quantity(&self, quantity: i64) -> CoreResult<()> {
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
        if quantity > self.available {
            return Err(CoreError::InsufficientStock {
                sku: self.sku.clone(),
                available: self.available,
                requested: quantity,
            });
        }
        Ok(())
    }
}

fn amount_out_of_range(field: &str) -> CoreError {
    CoreError::Validation(ValidationError::OutOfRange {
        field: field.to_string(),
        min: i64::MIN,
        max: i64::MAX,
    })
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product merges)
/// - Every line has quantity > 0
/// - At most `MAX_CART_ITEMS` lines and `MAX_ITEM_QUANTITY` per line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product or increases its quantity if already present.
    ///
    /// The last-known quantity on hand is refreshed from `product`, then the
    /// merged quantity is checked against it.
    pub fn add_product(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(index) = self.lines.iter().position(|l| l.product_id == product.id) {
            let line = &mut self.lines[index];
            let merged = line.quantity.saturating_add(quantity);
            line.available = product.quantity;
            line.check_quantity(merged)?;
            return self.set_line_quantity(index, merged);
        }

        validate_cart_size(self.lines.len()).map_err(|_| CoreError::CartTooLarge {
            max: MAX_CART_ITEMS,
        })?;

        let line = CartLine::from_product(product, quantity);
        line.check_quantity(quantity)?;
        self.lines.push(line);
        if let Err(err) = self.checked_totals() {
            self.lines.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Sets a line's quantity. Zero removes the line.
    pub fn update_quantity(&mut self, product_id: u64, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove(product_id);
        }
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
        validate_quantity(quantity)?;

        let index = self
            .lines
            .iter()
            .position(|l| l.product_id == product_id)
            .ok_or(CoreError::ProductNotFound(product_id))?;
        self.lines[index].check_quantity(quantity)?;
        self.set_line_quantity(index, quantity)
    }

    /// Sets a line's quantity, rolling back if the cart totals would no
    /// longer fit in an i64.
    fn set_line_quantity(&mut self, index: usize, quantity: i64) -> CoreResult<()> {
        let previous = self.lines[index].quantity;
        self.lines[index].quantity = quantity;
        if let Err(err) = self.checked_totals() {
            self.lines[index].quantity = previous;
            return Err(err);
        }
        Ok(())
    }

    /// `(total, cost)`, failing with `OutOfRange` on overflow.
    ///
    /// Every mutation runs this, so the infallible `total`/`cost`/`profit`
    /// accessors stay in range.
    pub fn checked_totals(&self) -> CoreResult<(Money, Money)> {
        let mut total = Money::zero();
        let mut cost = Money::zero();
        for line in &self.lines {
            total = line
                .price
                .checked_mul_quantity(line.quantity)
                .and_then(|amount| total.checked_add(amount))
                .ok_or_else(|| amount_out_of_range("total"))?;
            cost = line
                .cost
                .checked_mul_quantity(line.quantity)
                .and_then(|amount| cost.checked_add(amount))
                .ok_or_else(|| amount_out_of_range("cost"))?;
        }
        total
            .checked_sub(cost)
            .ok_or_else(|| amount_out_of_range("profit"))?;
        Ok((total, cost))
    }

    /// Removes a line by product id.
    pub fn remove(&mut self, product_id: u64) -> CoreResult<()> {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        if self.lines.len() == before {
            Err(CoreError::ProductNotFound(product_id))
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Σ price × quantity
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Σ cost × quantity
    pub fn cost(&self) -> Money {
        self.lines.iter().map(CartLine::line_cost).sum()
    }

    pub fn profit(&self) -> Money {
        self.total() - self.cost()
    }

    /// Builds an unsaved sale (id 0) from the cart.
    ///
    /// Fails with `EmptyCart` when there is nothing to sell.
    pub fn to_sale(&self, date: DateTime<Utc>, customer: &ResolvedCustomer) -> CoreResult<Sale> {
        if self.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let items = self
            .lines
            .iter()
            .map(|line| SaleLineItem {
                product_id: line.product_id,
                name: line.name.clone(),
                quantity: line.quantity,
                price: line.price,
                cost: line.cost,
            })
            .collect();

        let (total, cost) = self.checked_totals()?;

        Ok(Sale {
            id: 0,
            date,
            customer_id: customer.id,
            customer_name: customer.name.clone(),
            total,
            cost,
            profit: total - cost,
            items,
        })
    }
}

// =============================================================================
// Customer Selection
// =============================================================================

/// Who the sale is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CustomerSelection {
    /// Anonymous counter sale.
    WalkIn,
    /// A typed-in name with no customer record.
    Named(String),
    /// An existing customer record.
    Existing(u64),
}

/// The customer fields a sale records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCustomer {
    pub id: Option<u64>,
    pub name: String,
}

impl CustomerSelection {
    /// Resolves the selection against the customer list.
    ///
    /// ## Rules
    /// - `WalkIn` → "Walk-in Customer", no id
    /// - `Named(text)` → trimmed text; empty text is `InvalidCustomer`
    /// - `Existing(id)` → the customer's name, or "Unknown Customer" when
    ///   the id no longer resolves (the id is kept either way)
    pub fn resolve(&self, customers: &[Customer]) -> CoreResult<ResolvedCustomer> {
        match self {
            CustomerSelection::WalkIn => Ok(ResolvedCustomer {
                id: None,
                name: WALK_IN_CUSTOMER.to_string(),
            }),
            CustomerSelection::Named(text) => {
                let name = text.trim();
                if name.is_empty() {
                    return Err(CoreError::InvalidCustomer(
                        "customer name must not be empty".to_string(),
                    ));
                }
                Ok(ResolvedCustomer {
                    id: None,
                    name: name.to_string(),
                })
            }
            CustomerSelection::Existing(id) => {
                let name = customers
                    .iter()
                    .find(|c| c.id == *id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string());
                Ok(ResolvedCustomer { id: Some(*id), name })
            }
        }
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// A printable receipt line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

/// What the operator hands to the customer after checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Receipt {
    pub sale_id: u64,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub customer_name: String,
    pub lines: Vec<ReceiptLine>,
    pub units: i64,
    pub total: Money,
}

impl Receipt {
    pub fn from_sale(sale: &Sale) -> Self {
        Receipt {
            sale_id: sale.id,
            date: sale.date,
            customer_name: sale.customer_name.clone(),
            lines: sale
                .items
                .iter()
                .map(|item| ReceiptLine {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    unit_price: item.price,
                    line_total: item.line_total(),
                })
                .collect(),
            units: sale.units(),
            total: sale.total,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u64, sell: i64, cost: i64, qty: i64) -> Product {
        let mut p = Product::new(
            format!("Product {id}"),
            format!("SKU-{id}"),
            "Tops",
            Money::from_minor(cost),
            Money::from_minor(sell),
            qty,
        );
        p.id = id;
        p
    }

    #[test]
    fn test_add_and_totals() {
        let mut cart = Cart::new();
        // Scenario: 3 × (sell 8.00, cost 5.00)
        cart.add_product(&product(1, 800, 500, 10), 3).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total(), Money::from_minor(2400));
        assert_eq!(cart.cost(), Money::from_minor(1500));
        assert_eq!(cart.profit(), Money::from_minor(900));
    }

    #[test]
    fn test_add_same_product_merges() {
        let mut cart = Cart::new();
        let p = product(1, 999, 500, 10);

        cart.add_product(&p, 2).unwrap();
        cart.add_product(&p, 3).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_add_beyond_stock_rejected() {
        let mut cart = Cart::new();
        let p = product(1, 999, 500, 4);

        cart.add_product(&p, 3).unwrap();
        let err = cart.add_product(&p, 2).unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientStock {
                sku: "SKU-1".to_string(),
                available: 4,
                requested: 5,
            }
        );
        // Line unchanged after the rejected add
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_product(&product(1, 100, 50, 10), 0),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_quantity_cap() {
        let mut cart = Cart::new();
        let p = product(1, 100, 50, 5000);
        cart.add_product(&p, 999).unwrap();
        assert!(matches!(
            cart.add_product(&p, 1),
            Err(CoreError::QuantityTooLarge { requested: 1000, .. })
        ));
        assert!(matches!(
            cart.update_quantity(1, 1000),
            Err(CoreError::QuantityTooLarge { .. })
        ));
    }

    #[test]
    fn test_cart_line_cap() {
        let mut cart = Cart::new();
        for id in 1..=MAX_CART_ITEMS as u64 {
            cart.add_product(&product(id, 100, 50, 10), 1).unwrap();
        }
        let extra = product(MAX_CART_ITEMS as u64 + 1, 100, 50, 10);
        assert_eq!(
            cart.add_product(&extra, 1),
            Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS
            })
        );
    }

    #[test]
    fn test_update_quantity_and_remove() {
        let mut cart = Cart::new();
        cart.add_product(&product(1, 100, 50, 10), 2).unwrap();
        cart.add_product(&product(2, 200, 80, 10), 1).unwrap();

        cart.update_quantity(1, 7).unwrap();
        assert_eq!(cart.total_quantity(), 8);

        assert!(matches!(
            cart.update_quantity(1, 11),
            Err(CoreError::InsufficientStock { .. })
        ));

        cart.update_quantity(2, 0).unwrap();
        assert_eq!(cart.line_count(), 1);

        assert_eq!(cart.remove(99), Err(CoreError::ProductNotFound(99)));
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_frozen_prices() {
        let mut cart = Cart::new();
        let mut p = product(1, 800, 500, 10);
        cart.add_product(&p, 1).unwrap();

        p.sell_price = Money::from_minor(9999);
        cart.add_product(&p, 1).unwrap();

        assert_eq!(cart.total(), Money::from_minor(1600));
    }

    #[test]
    fn test_resolve_customer() {
        let mut known = Customer::new("Ayesha", None);
        known.id = 4;
        let customers = vec![known];

        let walk_in = CustomerSelection::WalkIn.resolve(&customers).unwrap();
        assert_eq!(walk_in.name, WALK_IN_CUSTOMER);
        assert_eq!(walk_in.id, None);

        let named = CustomerSelection::Named("  Bilal ".to_string())
            .resolve(&customers)
            .unwrap();
        assert_eq!(named.name, "Bilal");

        assert!(matches!(
            CustomerSelection::Named("   ".to_string()).resolve(&customers),
            Err(CoreError::InvalidCustomer(_))
        ));

        let existing = CustomerSelection::Existing(4).resolve(&customers).unwrap();
        assert_eq!(existing.name, "Ayesha");
        assert_eq!(existing.id, Some(4));

        let gone = CustomerSelection::Existing(77).resolve(&customers).unwrap();
        assert_eq!(gone.name, UNKNOWN_CUSTOMER);
        assert_eq!(gone.id, Some(77));
    }

    #[test]
    fn test_to_sale_and_receipt() {
        let mut cart = Cart::new();
        cart.add_product(&product(1, 800, 500, 10), 3).unwrap();
        cart.add_product(&product(2, 1500, 900, 10), 1).unwrap();

        let customer = CustomerSelection::WalkIn.resolve(&[]).unwrap();
        let sale = cart.to_sale(Utc::now(), &customer).unwrap();

        assert_eq!(sale.id, 0);
        assert_eq!(sale.total, Money::from_minor(3900));
        assert_eq!(sale.cost, Money::from_minor(2400));
        assert_eq!(sale.profit, Money::from_minor(1500));
        assert!(sale.is_consistent());

        let receipt = Receipt::from_sale(&sale);
        assert_eq!(receipt.lines.len(), 2);
        assert_eq!(receipt.lines[0].line_total, Money::from_minor(2400));
        assert_eq!(receipt.units, 4);
        assert_eq!(receipt.customer_name, WALK_IN_CUSTOMER);
    }

    #[test]
    fn test_empty_cart_cannot_become_sale() {
        let customer = CustomerSelection::WalkIn.resolve(&[]).unwrap();
        assert_eq!(
            Cart::new().to_sale(Utc::now(), &customer),
            Err(CoreError::EmptyCart)
        );
    }

    #[test]
    fn test_totals_that_overflow_are_rejected() {
        let mut cart = Cart::new();
        let pricey = product(1, i64::MAX / 2, 0, 10);

        let err = cart.add_product(&pricey, 3).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { .. })
        ));
        assert!(cart.is_empty());

        cart.add_product(&pricey, 1).unwrap();
        let err = cart.add_product(&pricey, 2).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(cart.total_quantity(), 1);

        let err = cart.update_quantity(1, 3).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(cart.total(), Money::from_minor(i64::MAX / 2));
    }

    #[test]
    fn test_overflow_across_lines() {
        let mut cart = Cart::new();
        cart.add_product(&product(1, i64::MAX / 2 + 1, 0, 10), 1).unwrap();
        let err = cart
            .add_product(&product(2, i64::MAX / 2 + 1, 0, 10), 1)
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(cart.line_count(), 1);

        let customer = CustomerSelection::WalkIn.resolve(&[]).unwrap();
        let sale = cart.to_sale(Utc::now(), &customer).unwrap();
        assert_eq!(sale.total, Money::from_minor(i64::MAX / 2 + 1));
    }
}
