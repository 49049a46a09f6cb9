//! # Stock Commands
//!
//! Inventory ledger from the command line.
//!
//! ```text
//! shopease stock in  TS-BLK-M 24 --notes "supplier delivery"
//! shopease stock out TS-BLK-M 2  --notes "damaged"
//! shopease stock history [TS-BLK-M] [--limit 20]
//! shopease stock low [--threshold 3]
//! ```

use clap::Subcommand;
use serde::Serialize;
use shopease_core::{MovementType, Product, StockMovement};

use crate::commands::Context;
use crate::error::CliResult;

#[derive(Debug, Subcommand)]
pub enum StockCommand {
    /// Receive stock
    In {
        sku: String,
        quantity: i64,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Remove stock (damage, returns to supplier, shrinkage)
    Out {
        sku: String,
        quantity: i64,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Recorded movements, newest first
    History {
        sku: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Products below the low-stock threshold
    Low {
        /// Defaults to shop.low_stock_threshold
        #[arg(long)]
        threshold: Option<i64>,
    },
}

#[derive(Debug, Serialize)]
struct MovementResult {
    product: Product,
    movement: StockMovement,
}

/// A movement with the SKU it applies to, when the product still exists.
#[derive(Debug, Serialize)]
struct HistoryRow {
    #[serde(flatten)]
    movement: StockMovement,
    sku: Option<String>,
}

pub async fn handle(ctx: &Context, cmd: StockCommand) -> CliResult<()> {
    match cmd {
        StockCommand::In {
            sku,
            quantity,
            notes,
        } => apply(ctx, &sku, MovementType::In, quantity, notes).await,
        StockCommand::Out {
            sku,
            quantity,
            notes,
        } => apply(ctx, &sku, MovementType::Out, quantity, notes).await,
        StockCommand::History { sku, limit } => {
            let product_id = match &sku {
                Some(sku) => Some(ctx.store.products().get_by_sku(sku).await?.id),
                None => None,
            };
            let products = ctx.store.products().list().await?;
            let rows: Vec<HistoryRow> = ctx
                .store
                .ledger()
                .movements(product_id)
                .await?
                .into_iter()
                .take(limit)
                .map(|movement| HistoryRow {
                    sku: products
                        .iter()
                        .find(|p| p.id == movement.product_id)
                        .map(|p| p.sku.clone()),
                    movement,
                })
                .collect();

            ctx.emit(&rows, |ctx, rows| {
                if rows.is_empty() {
                    ctx.line("No stock movements.");
                    return;
                }
                for row in rows {
                    let m = &row.movement;
                    ctx.line(format!(
                        "{}  {:<3} {:>5}  {:<14} {}",
                        m.date.format("%Y-%m-%d %H:%M"),
                        m.movement_type.as_str(),
                        m.quantity,
                        row.sku.as_deref().unwrap_or("(deleted)"),
                        m.notes
                    ));
                }
            })
        }
        StockCommand::Low { threshold } => {
            let threshold = threshold.unwrap_or(ctx.config.shop.low_stock_threshold);
            let low = ctx.store.ledger().low_stock(threshold).await?;
            ctx.emit(&low, |ctx, low| {
                if low.is_empty() {
                    ctx.line(format!("No products below {}.", threshold));
                    return;
                }
                ctx.line(format!("{} products below {}:", low.len(), threshold));
                for p in low {
                    ctx.line(format!("  ⚠ {:<14} {:<28} {:>4}", p.sku, p.name, p.quantity));
                }
            })
        }
    }
}

async fn apply(
    ctx: &Context,
    sku: &str,
    direction: MovementType,
    quantity: i64,
    notes: String,
) -> CliResult<()> {
    let product = ctx.store.products().get_by_sku(sku).await?;
    let (product, movement) = ctx
        .store
        .ledger()
        .apply_movement(product.id, direction, quantity, notes)
        .await?;

    ctx.emit(&MovementResult { product, movement }, |ctx, r| {
        let verb = match r.movement.movement_type {
            MovementType::In => "Received",
            MovementType::Out => "Removed",
        };
        ctx.line(format!(
            "✓ {} {} × {}; on hand now {}",
            verb, r.movement.quantity, r.product.sku, r.product.quantity
        ));
    })
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{context, joined, run};
    use crate::error::ErrorCode;
    use shopease_core::{Money, Product};

    async fn ctx_with_tee(quantity: i64) -> crate::commands::Context {
        let ctx = context().await;
        ctx.store
            .products()
            .add(Product::new("Black Tee", "A1", "Tops", Money::from_minor(500), Money::from_minor(800), quantity))
            .await
            .unwrap();
        ctx
    }

    #[tokio::test]
    async fn test_in_and_out() {
        let ctx = ctx_with_tee(10).await;
        run(&ctx, &["stock", "in", "A1", "5", "--notes", "delivery"]).await.unwrap();
        run(&ctx, &["stock", "out", "a1", "3"]).await.unwrap();

        assert_eq!(ctx.store.products().get(1).await.unwrap().quantity, 12);
        let out = joined(&ctx);
        assert!(out.contains("✓ Received 5 × A1; on hand now 15"));
        assert!(out.contains("✓ Removed 3 × A1; on hand now 12"));
    }

    #[tokio::test]
    async fn test_out_beyond_stock() {
        let ctx = ctx_with_tee(10).await;
        let err = run(&ctx, &["stock", "out", "A1", "100"]).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.message, "Insufficient stock for A1: 10 available, 100 requested");
        assert_eq!(ctx.store.products().get(1).await.unwrap().quantity, 10);
        assert_eq!(ctx.store.stock_movements().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_in_beyond_i64_is_a_validation_error() {
        let ctx = ctx_with_tee(10).await;
        let err = run(&ctx, &["stock", "in", "A1", "9223372036854775807"])
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(ctx.store.products().get(1).await.unwrap().quantity, 10);
    }

    #[tokio::test]
    async fn test_history_marks_deleted_products() {
        let ctx = ctx_with_tee(10).await;
        run(&ctx, &["stock", "in", "A1", "1", "--notes", "first"]).await.unwrap();
        ctx.store.products().delete(1).await.unwrap();
        run(&ctx, &["stock", "history"]).await.unwrap();

        let out = joined(&ctx);
        assert!(out.contains("(deleted)"));
        assert!(out.contains("first"));
    }

    #[tokio::test]
    async fn test_low_uses_config_threshold() {
        let ctx = ctx_with_tee(4).await;
        run(&ctx, &["stock", "low"]).await.unwrap();
        run(&ctx, &["stock", "low", "--threshold", "4"]).await.unwrap();

        let out = ctx.output();
        assert!(out.contains(&"1 products below 5:".to_string()));
        assert!(out.contains(&"No products below 4.".to_string()));
    }
}
