//! # Product Commands
//!
//! Catalog maintenance. Products are addressed by SKU on the command line.
//!
//! ```text
//! shopease product add --name "Black Tee" --sku TS-BLK-M --category Tops \
//!                      --cost 5 --price 8 --quantity 25 --size M --color Black
//! shopease product list [--search denim]
//! shopease product show TS-BLK-M
//! shopease product update TS-BLK-M --price 8.50
//! shopease product delete TS-BLK-M
//! ```

use clap::{Args, Subcommand};
use shopease_core::{Money, Product};
use tracing::debug;

use crate::commands::Context;
use crate::error::CliResult;

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    /// Add a product to the catalog
    Add(ProductAddArgs),
    /// List products, optionally filtered
    List {
        /// Match against name, SKU or category
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one product
    Show { sku: String },
    /// Change fields of a product
    Update(ProductUpdateArgs),
    /// Remove a product (past sales keep their snapshot)
    Delete { sku: String },
}

#[derive(Debug, Args)]
pub struct ProductAddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub sku: String,
    #[arg(long)]
    pub category: String,
    /// Unit cost, e.g. 5.00
    #[arg(long)]
    pub cost: Money,
    /// Unit sell price, e.g. 8.50
    #[arg(long)]
    pub price: Money,
    /// Opening stock
    #[arg(long, default_value_t = 0)]
    pub quantity: i64,
    #[arg(long)]
    pub size: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(Debug, Args)]
pub struct ProductUpdateArgs {
    /// Current SKU of the product
    pub sku: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub new_sku: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub cost: Option<Money>,
    #[arg(long)]
    pub price: Option<Money>,
    /// Overwrite the on-hand count (prefer `stock in/out`)
    #[arg(long)]
    pub quantity: Option<i64>,
    #[arg(long)]
    pub size: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
}

pub async fn handle(ctx: &Context, cmd: ProductCommand) -> CliResult<()> {
    let products = ctx.store.products();

    match cmd {
        ProductCommand::Add(args) => {
            let mut product = Product::new(
                args.name.trim(),
                args.sku.trim(),
                args.category.trim(),
                args.cost,
                args.price,
                args.quantity,
            );
            product.size = args.size.filter(|s| !s.trim().is_empty());
            product.color = args.color.filter(|c| !c.trim().is_empty());

            let added = products.add(product).await?;
            ctx.emit(&added, |ctx, p| {
                ctx.line(format!("✓ Added product #{} {} ({})", p.id, p.name, p.sku));
                ctx.line(format!(
                    "  cost {}  price {}  on hand {}",
                    ctx.money(p.cost_price),
                    ctx.money(p.sell_price),
                    p.quantity
                ));
            })
        }
        ProductCommand::List { search } => {
            let list = products.search(search.as_deref().unwrap_or("")).await?;
            ctx.emit(&list, |ctx, list| print_table(ctx, list))
        }
        ProductCommand::Show { sku } => {
            let product = products.get_by_sku(&sku).await?;
            ctx.emit(&product, |ctx, p| print_detail(ctx, p))
        }
        ProductCommand::Update(args) => {
            let current = products.get_by_sku(&args.sku).await?;
            debug!(id = current.id, sku = %current.sku, "Updating product");

            let updated = products
                .update(current.id, |p| {
                    if let Some(name) = args.name {
                        p.name = name.trim().to_string();
                    }
                    if let Some(sku) = args.new_sku {
                        p.sku = sku.trim().to_string();
                    }
                    if let Some(category) = args.category {
                        p.category = category.trim().to_string();
                    }
                    if let Some(cost) = args.cost {
                        p.cost_price = cost;
                    }
                    if let Some(price) = args.price {
                        p.sell_price = price;
                    }
                    if let Some(quantity) = args.quantity {
                        p.quantity = quantity;
                    }
                    if let Some(size) = args.size {
                        p.size = Some(size).filter(|s| !s.trim().is_empty());
                    }
                    if let Some(color) = args.color {
                        p.color = Some(color).filter(|c| !c.trim().is_empty());
                    }
                })
                .await?;

            ctx.emit(&updated, |ctx, p| {
                ctx.line(format!("✓ Updated product #{}", p.id));
                print_detail(ctx, p);
            })
        }
        ProductCommand::Delete { sku } => {
            let product = products.get_by_sku(&sku).await?;
            products.delete(product.id).await?;
            ctx.emit(&product, |ctx, p| {
                ctx.line(format!("✓ Deleted product #{} {} ({})", p.id, p.name, p.sku))
            })
        }
    }
}

fn print_table(ctx: &Context, products: &[Product]) {
    if products.is_empty() {
        ctx.line("No products.");
        return;
    }
    ctx.line(format!(
        "{:>4}  {:<14} {:<28} {:<14} {:>12} {:>6}",
        "ID", "SKU", "NAME", "CATEGORY", "PRICE", "QTY"
    ));
    for p in products {
        let low = if p.is_low_stock(ctx.config.shop.low_stock_threshold) {
            "  ⚠ low"
        } else {
            ""
        };
        ctx.line(format!(
            "{:>4}  {:<14} {:<28} {:<14} {:>12} {:>6}{}",
            p.id,
            p.sku,
            p.name,
            p.category,
            ctx.money(p.sell_price),
            p.quantity,
            low
        ));
    }
}

fn print_detail(ctx: &Context, p: &Product) {
    ctx.line(format!("#{} {}", p.id, p.name));
    ctx.line(format!("  SKU:      {}", p.sku));
    ctx.line(format!("  Category: {}", p.category));
    if let Some(size) = &p.size {
        ctx.line(format!("  Size:     {}", size));
    }
    if let Some(color) = &p.color {
        ctx.line(format!("  Color:    {}", color));
    }
    ctx.line(format!("  Cost:     {}", ctx.money(p.cost_price)));
    ctx.line(format!("  Price:    {}", ctx.money(p.sell_price)));
    ctx.line(format!("  Margin:   {}", ctx.money(p.unit_margin())));
    ctx.line(format!("  On hand:  {}", p.quantity));
}
