//! # Seed Data Generator
//!
//! Fills a store file with a demo clothing catalog, staff and customers.
//!
//! ## Usage
//! ```bash
//! # Seed ./shopease_dev.json (default)
//! cargo run -p shopease-store --bin seed
//!
//! # Seed a specific file with 3 size variants per style
//! cargo run -p shopease-store --bin seed -- --db ./data/shop.json --sizes 3
//! ```
//!
//! ## Generated Catalog
//! Styles across categories (Tops, Bottoms, Outerwear, Accessories), each
//! in up to five sizes and a rotating color:
//! - SKU: `{CATEGORY}-{STYLE}-{SIZE}`
//! - Sell price: 8.00 - 79.00, cost 55-75% of it
//! - Stock: 0 - 40 (some land below the low-stock threshold on purpose)

use std::env;

use shopease_core::{Customer, Employee, Money, Product};
use shopease_store::{DocumentStore, StoreConfig};

/// (category code, category name, [(style, base price in minor units)])
const CATALOG: &[(&str, &str, &[(&str, i64)])] = &[
    (
        "TOP",
        "Tops",
        &[
            ("Crew Neck Tee", 800),
            ("V-Neck Tee", 850),
            ("Polo Shirt", 1800),
            ("Oxford Shirt", 2900),
            ("Linen Kurta", 3500),
            ("Hoodie", 3900),
        ],
    ),
    (
        "BTM",
        "Bottoms",
        &[
            ("Slim Jeans", 3500),
            ("Chinos", 3200),
            ("Cargo Shorts", 2200),
            ("Shalwar", 1500),
            ("Joggers", 2500),
        ],
    ),
    (
        "OUT",
        "Outerwear",
        &[
            ("Denim Jacket", 6500),
            ("Bomber Jacket", 7900),
            ("Wool Waistcoat", 4500),
        ],
    ),
    (
        "ACC",
        "Accessories",
        &[
            ("Leather Belt", 1200),
            ("Cotton Scarf", 900),
            ("Baseball Cap", 1000),
        ],
    ),
];

const SIZES: &[&str] = &["S", "M", "L", "XL", "XXL"];

const COLORS: &[&str] = &["Black", "Navy", "White", "Olive", "Maroon"];

const EMPLOYEES: &[(&str, i64)] = &[
    ("Hamid Raza", 3_500_000),
    ("Sana Iqbal", 3_000_000),
    ("Omar Farooq", 2_800_000),
];

const CUSTOMERS: &[(&str, Option<&str>)] = &[
    ("Ayesha Khan", Some("+92 300 1234567")),
    ("Bilal Ahmed", Some("0321-7654321")),
    ("Fatima Noor", None),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./shopease_dev.json");
    let mut sizes: usize = SIZES.len();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--sizes" | "-s" => {
                if i + 1 < args.len() {
                    sizes = args[i + 1].parse().unwrap_or(SIZES.len()).clamp(1, SIZES.len());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("ShopEase Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Store file path (default: ./shopease_dev.json)");
                println!("  -s, --sizes <N>    Size variants per style, 1-5 (default: 5)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 ShopEase Seed Data Generator");
    println!("===============================");
    println!("Store: {}", db_path);
    println!("Sizes per style: {}", sizes);
    println!();

    let store = DocumentStore::open(StoreConfig::new(&db_path)).await?;
    println!("✓ Opened store (default users present)");

    let existing = store.products().count().await?;
    if existing > 0 {
        println!("⚠ Store already has {} products", existing);
        println!("  Skipping seed to avoid duplicate SKUs.");
        println!("  Run `shopease data clear --yes` or delete the file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating catalog...");
    let start = std::time::Instant::now();

    let mut catalog = Vec::new();
    let mut style_index = 0usize;
    for (code, category, styles) in CATALOG {
        for (style, base_price) in styles.iter() {
            for size_index in 0..sizes {
                catalog.push(generate_product(
                    code,
                    category,
                    style,
                    *base_price,
                    style_index,
                    size_index,
                ));
            }
            style_index += 1;
        }
    }

    let added = store.products().bulk_add(catalog).await?;
    println!("✓ Added {} products in {:?}", added.len(), start.elapsed());

    let staff = store.staff();
    for (name, salary) in EMPLOYEES {
        staff
            .hire(Employee::new(*name, Money::from_minor(*salary)))
            .await?;
    }
    println!("✓ Hired {} employees", EMPLOYEES.len());

    let customers: Vec<Customer> = CUSTOMERS
        .iter()
        .map(|(name, phone)| Customer::new(*name, phone.map(str::to_string)))
        .collect();
    let customers = store.customers().bulk_add(customers).await?;
    println!("✓ Added {} customers", customers.len());

    println!();
    let low = store.ledger().low_stock(shopease_core::DEFAULT_LOW_STOCK_THRESHOLD).await?;
    println!("  Low stock: {} products", low.len());
    println!("  Search 'jacket': {} results", store.products().search("jacket").await?.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one size variant of a style.
fn generate_product(
    code: &str,
    category: &str,
    style: &str,
    base_price: i64,
    style_index: usize,
    size_index: usize,
) -> Product {
    let size = SIZES[size_index];
    let seed = style_index * SIZES.len() + size_index;

    let initials: String = style
        .split(|c: char| c == ' ' || c == '-')
        .filter_map(|word| word.chars().next())
        .collect::<String>()
        .to_uppercase();
    let sku = format!("{}-{}{:02}-{}", code, initials, style_index, size);

    // Larger sizes cost a little more
    let size_addon = size_index as i64 * 50;
    let sell = base_price + size_addon;

    // Cost is 55-75% of the sell price
    let cost_pct = 55 + (seed * 7 % 21) as i64;
    let cost = sell * cost_pct / 100;

    let quantity = (seed * 13 % 41) as i64;
    let color = COLORS[seed % COLORS.len()];

    Product::new(
        format!("{} {}", color, style),
        sku,
        category,
        Money::from_minor(cost),
        Money::from_minor(sell),
        quantity,
    )
    .with_size(size)
    .with_color(color)
}
