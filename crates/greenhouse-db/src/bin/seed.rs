//! # Seed Data Generator
//!
//! Creates (or opens) a greenhouse database and fills it with the demo catalog.
//!
//! ## Usage
//! ```bash
//! # Seed ./greenhouse_dev.db (default)
//! cargo run -p greenhouse-db --bin seed
//!
//! # Specify database path
//! cargo run -p greenhouse-db --bin seed -- --db ./data/greenhouse.db
//! ```
//!
//! ## Generated Data
//! - 8 flowers (roses, tulips, lily, chrysanthemum, gerbera, eucalyptus)
//! - 4 compositions with their flower breakdowns
//! - 5 customers
//! - 12 April 2025 orders covering every urgency tier
//!
//! An existing catalog is never touched; delete the file to regenerate.

use greenhouse_db::{seed_demo_data, Database, DbConfig};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./greenhouse_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Greenhouse Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./greenhouse_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("🌱 Greenhouse Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::open(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let report = seed_demo_data(&db).await?;
    if report.is_empty() {
        println!("⚠ Database already has a catalog");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("✓ Flowers:      {}", report.flowers);
    println!("✓ Compositions: {}", report.compositions);
    println!("✓ Customers:    {}", report.customers);
    println!("✓ Orders:       {}", report.orders);

    println!();
    println!("Row counts:");
    for (table, count) in db.table_counts().await? {
        println!("  {:<20} {}", table, count);
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
