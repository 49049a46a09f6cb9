//! # Sale Commands
//!
//! Ringing up a sale and browsing past ones.
//!
//! ## Checkout From the Command Line
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  shopease sale checkout --item TS-BLK-M:2 --item CAP-1:1 --name Bilal   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  for each --item: get_by_sku → cart.add_product(product, qty)           │
//! │         │        (quantity cap, on-hand check, line merge)              │
//! │         ▼                                                               │
//! │  CheckoutService::checkout(cart, Named("Bilal"))                        │
//! │         │        (stock re-checked at commit, one write)                │
//! │         ▼                                                               │
//! │  Receipt                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Omitting all of `--walk-in`, `--name` and `--customer-id` is rejected at
//! checkout, the same as an operator not choosing a customer.

use clap::{Args, Subcommand};
use shopease_core::{Cart, CustomerSelection, Receipt, Sale, ValidationError};
use std::str::FromStr;

use crate::commands::Context;
use crate::error::CliResult;

#[derive(Debug, Subcommand)]
pub enum SaleCommand {
    /// Sell the listed items
    Checkout(CheckoutArgs),
    /// Past sales, newest first
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// `SKU:QTY` (QTY defaults to 1); repeat for more lines
    #[arg(long = "item", required = true)]
    pub items: Vec<ItemSpec>,

    /// Anonymous counter sale
    #[arg(long, conflicts_with_all = ["name", "customer_id"])]
    pub walk_in: bool,

    /// Typed-in customer name with no customer record
    #[arg(long, conflicts_with = "customer_id")]
    pub name: Option<String>,

    /// Existing customer record
    #[arg(long)]
    pub customer_id: Option<u64>,
}

impl CheckoutArgs {
    fn selection(&self) -> Option<CustomerSelection> {
        if self.walk_in {
            Some(CustomerSelection::WalkIn)
        } else if let Some(name) = &self.name {
            Some(CustomerSelection::Named(name.clone()))
        } else {
            self.customer_id.map(CustomerSelection::Existing)
        }
    }
}

/// One `--item SKU:QTY` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub sku: String,
    pub quantity: i64,
}

impl FromStr for ItemSpec {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sku, quantity) = match s.rsplit_once(':') {
            Some((sku, qty)) => {
                let quantity = qty.trim().parse::<i64>().map_err(|_| {
                    ValidationError::InvalidFormat {
                        field: "item".to_string(),
                        reason: format!("'{}' is not a whole quantity", qty),
                    }
                })?;
                (sku, quantity)
            }
            None => (s, 1),
        };

        let sku = sku.trim();
        if sku.is_empty() {
            return Err(ValidationError::Required {
                field: "item SKU".to_string(),
            });
        }
        Ok(ItemSpec {
            sku: sku.to_string(),
            quantity,
        })
    }
}

pub async fn handle(ctx: &Context, cmd: SaleCommand) -> CliResult<()> {
    match cmd {
        SaleCommand::Checkout(args) => {
            let products = ctx.store.products();
            let mut cart = Cart::new();
            for item in &args.items {
                let product = products.get_by_sku(&item.sku).await?;
                cart.add_product(&product, item.quantity)?;
            }

            let selection = args.selection();
            let sale = ctx
                .store
                .checkout()
                .checkout(&cart, selection.as_ref())
                .await?;

            let receipt = Receipt::from_sale(&sale);
            ctx.emit(&receipt, |ctx, r| print_receipt(ctx, r))
        }
        SaleCommand::List { limit } => {
            let mut sales = ctx.store.sales().list().await?;
            sales.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
            sales.truncate(limit);
            ctx.emit(&sales, |ctx, sales| print_sales(ctx, sales))
        }
    }
}

fn print_receipt(ctx: &Context, r: &Receipt) {
    let rule = "─".repeat(44);
    ctx.line(ctx.config.shop.name.clone());
    ctx.line(format!(
        "Sale #{}  {}",
        r.sale_id,
        r.date.format("%Y-%m-%d %H:%M UTC")
    ));
    ctx.line(format!("Customer: {}", r.customer_name));
    ctx.line(rule.clone());
    for line in &r.lines {
        ctx.line(format!(
            "{:<24} {:>3} × {:>8} {:>10}",
            line.name,
            line.quantity,
            line.unit_price.to_string(),
            ctx.money(line.line_total)
        ));
    }
    ctx.line(rule);
    ctx.line(format!("{:<24} {:>3} {:>21}", "TOTAL", r.units, ctx.money(r.total)));
}

fn print_sales(ctx: &Context, sales: &[Sale]) {
    if sales.is_empty() {
        ctx.line("No sales.");
        return;
    }
    ctx.line(format!(
        "{:>5}  {:<16}  {:<20} {:>5} {:>12} {:>12}",
        "ID", "DATE", "CUSTOMER", "UNITS", "TOTAL", "PROFIT"
    ));
    for s in sales {
        ctx.line(format!(
            "{:>5}  {:<16}  {:<20} {:>5} {:>12} {:>12}",
            s.id,
            s.date.format("%Y-%m-%d %H:%M"),
            s.customer_name,
            s.units(),
            ctx.money(s.total),
            ctx.money(s.profit)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{context, joined, run};
    use crate::error::ErrorCode;
    use shopease_core::{Customer, Money, Product, WALK_IN_CUSTOMER};

    async fn ctx_with_catalog() -> Context {
        let ctx = context().await;
        ctx.store
            .products()
            .bulk_add(vec![
                Product::new("Black Tee", "A1", "Tops", Money::from_minor(500), Money::from_minor(800), 10),
                Product::new("Cap", "B2", "Accessories", Money::from_minor(300), Money::from_minor(600), 5),
            ])
            .await
            .unwrap();
        ctx
    }

    #[test]
    fn test_item_spec_parsing() {
        assert_eq!(
            "A1:3".parse::<ItemSpec>().unwrap(),
            ItemSpec { sku: "A1".to_string(), quantity: 3 }
        );
        assert_eq!("B2".parse::<ItemSpec>().unwrap().quantity, 1);
        assert!("A1:x".parse::<ItemSpec>().is_err());
        assert!(":2".parse::<ItemSpec>().is_err());
    }

    #[tokio::test]
    async fn test_walk_in_checkout() {
        let ctx = ctx_with_catalog().await;
        run(&ctx, &["sale", "checkout", "--item", "A1:3", "--walk-in"]).await.unwrap();

        let sale = ctx.store.sales().get(1).await.unwrap();
        assert_eq!(sale.total, Money::from_minor(2400));
        assert_eq!(sale.profit, Money::from_minor(900));
        assert_eq!(sale.customer_name, WALK_IN_CUSTOMER);
        assert_eq!(ctx.store.products().get(1).await.unwrap().quantity, 7);

        let out = joined(&ctx);
        assert!(out.contains("Customer: Walk-in Customer"));
        assert!(out.contains("Rs 24.00"));
    }

    #[tokio::test]
    async fn test_existing_customer_and_merge() {
        let ctx = ctx_with_catalog().await;
        ctx.store
            .customers()
            .add(Customer::new("Ayesha", None))
            .await
            .unwrap();

        run(
            &ctx,
            &["sale", "checkout", "--item", "A1:1", "--item", "B2:2", "--item", "A1:1", "--customer-id", "1"],
        )
        .await
        .unwrap();

        let sale = ctx.store.sales().get(1).await.unwrap();
        assert_eq!(sale.customer_name, "Ayesha");
        assert_eq!(sale.items.len(), 2);
        assert_eq!(sale.items[0].quantity, 2);
        assert_eq!(ctx.store.products().get(2).await.unwrap().quantity, 3);
    }

    #[tokio::test]
    async fn test_no_customer_is_rejected() {
        let ctx = ctx_with_catalog().await;
        let err = run(&ctx, &["sale", "checkout", "--item", "A1:1"]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
        assert_eq!(ctx.store.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_more_than_on_hand_is_rejected_before_commit() {
        let ctx = ctx_with_catalog().await;
        let err = run(&ctx, &["sale", "checkout", "--item", "B2:6", "--walk-in"])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(ctx.store.products().get(2).await.unwrap().quantity, 5);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let ctx = ctx_with_catalog().await;
        run(&ctx, &["sale", "checkout", "--item", "A1", "--walk-in"]).await.unwrap();
        run(&ctx, &["sale", "checkout", "--item", "B2", "--name", "Bilal"]).await.unwrap();

        let ctx_json = crate::commands::Context::capturing(
            ctx.store.clone(),
            ctx.config.clone(),
            true,
        );
        run(&ctx_json, &["sale", "list"]).await.unwrap();
        let sales: Vec<Sale> = serde_json::from_str(&joined(&ctx_json)).unwrap();
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].customer_name, "Bilal");
    }
}
