//! # Seed Data Generator
//!
//! Populates the database with demo catalog, sales and expenses so the
//! analytics reports have something to chew on during development.
//!
//! ## Usage
//! ```bash
//! # Seed the default dev database
//! cargo run -p mercato-db --bin seed
//!
//! # Specify database path and history depth
//! cargo run -p mercato-db --bin seed -- --db ./data/mercato.db --days 120
//! ```

use chrono::{Duration, Utc};
use std::env;

use mercato_core::{NewExpense, NewProduct, SALE_TIMESTAMP_FORMAT};
use mercato_db::{Database, DbConfig};

/// Demo catalog: (category, [(name, cost, price, stock)])
const CATALOG: &[(&str, &[(&str, f64, f64, i64)])] = &[
    (
        "Beverages",
        &[
            ("Cola 330ml", 0.45, 1.20, 120),
            ("Orange Juice 1L", 1.10, 2.80, 40),
            ("Sparkling Water 500ml", 0.30, 0.90, 80),
            ("Iced Tea 500ml", 0.60, 1.50, 60),
            ("Espresso Beans 1kg", 9.50, 19.90, 25),
        ],
    ),
    (
        "Snacks",
        &[
            ("Potato Chips 150g", 0.80, 2.10, 90),
            ("Salted Peanuts 200g", 1.20, 2.60, 45),
            ("Chocolate Bar 90g", 0.95, 2.40, 110),
            ("Granola Bar", 0.50, 1.30, 70),
        ],
    ),
    (
        "Household",
        &[
            ("Dish Soap 500ml", 0.90, 2.20, 35),
            ("Paper Towels 2pk", 1.40, 3.10, 50),
            ("Trash Bags 30ct", 1.80, 3.90, 28),
            ("Sponge 3pk", 0.60, 1.60, 65),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./mercato_dev.db");
    let mut days: i64 = 90;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--days" => {
                if i + 1 < args.len() {
                    days = args[i + 1].parse().unwrap_or(90);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Mercato Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./mercato_dev.db)");
                println!("      --days <N>     Days of sales history to generate (default: 90)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Mercato Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!("History:  {} days", days);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    if db.products().count().await? > 0 {
        println!("⚠ Database already has products; skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Catalog
    let mut product_ids = Vec::new();
    for (category_name, items) in CATALOG {
        let category = db.categories().insert(category_name, None).await?;
        for (name, cost, price, stock) in *items {
            let product = db
                .products()
                .insert(&NewProduct {
                    name: name.to_string(),
                    description: None,
                    category_id: Some(category.id),
                    cost_price: *cost,
                    sale_price: *price,
                    stock: *stock,
                    min_stock: 10,
                    image_path: None,
                })
                .await?;
            product_ids.push(product.id);
        }
    }
    println!("✓ Seeded {} products", product_ids.len());

    // Sales history: deterministic pseudo-random spread over the window.
    // Timestamps are inserted directly so sales land on past days.
    let now = Utc::now();
    let mut sales = 0usize;
    for day in 0..days {
        let date = now - Duration::days(day);
        // Busier on recent days and weekends
        let per_day = 3 + ((day * 7 + 3) % 5) as usize;
        for slot in 0..per_day {
            let idx = ((day as usize * 13 + slot * 5) % product_ids.len()) as usize;
            let product_id = product_ids[idx];
            let quantity = 1 + ((day as usize + slot) % 4) as i64;

            let product = db
                .products()
                .get_by_id(product_id)
                .await?
                .expect("seeded product");
            if product.stock < quantity {
                continue;
            }

            let sold_at = date
                .with_time(
                    chrono::NaiveTime::from_hms_opt(8 + (slot as u32 * 3) % 12, 15, 0)
                        .expect("valid time"),
                )
                .unwrap()
                .format(SALE_TIMESTAMP_FORMAT)
                .to_string();

            sqlx::query(
                r#"
                INSERT INTO sales (product_id, quantity, unit_price, total, sold_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(product_id)
            .bind(quantity)
            .bind(product.sale_price)
            .bind(quantity as f64 * product.sale_price)
            .bind(&sold_at)
            .execute(db.pool())
            .await?;

            db.products().adjust_stock(product_id, -quantity).await?;
            sales += 1;
        }
    }
    println!("✓ Seeded {} sales", sales);

    // Monthly fixed expenses
    let mut expenses = 0usize;
    for month_back in 0..(days / 30).max(1) {
        let date = (now - Duration::days(month_back * 30)).date_naive();
        for (description, amount) in [("Rent", 800.0), ("Electricity", 140.0), ("Internet", 45.0)]
        {
            db.expenses()
                .insert(&NewExpense {
                    description: description.to_string(),
                    amount,
                    category: Some("Fixed".to_string()),
                    expense_date: date,
                    notes: None,
                })
                .await?;
            expenses += 1;
        }
    }
    println!("✓ Seeded {} expenses", expenses);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
