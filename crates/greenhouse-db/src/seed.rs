//! # Demo Data
//!
//! A small greenhouse catalog used by the `seed` binary, by the console on
//! first start, and by tests.
//!
//! ## Contents
//! ```text
//! Flowers       8   roses, tulips, lily, chrysanthemum, gerbera, eucalyptus
//! Compositions  4   each with a flower breakdown
//! Customers     5   including "user", the demo login's customer record
//! Orders       12   April 2025, mixed lead times (all urgency tiers)
//! ```
//!
//! Seeding is skipped when the store already holds flowers.

use tracing::info;

use crate::error::DbResult;
use crate::pool::Database;
use greenhouse_core::NewOrder;

/// (name, variety, price in cents)
const FLOWERS: &[(&str, &str, i64)] = &[
    ("Rose", "Red Naomi", 250),
    ("Rose", "Avalanche", 270),
    ("Tulip", "Strong Gold", 120),
    ("Tulip", "Queen of Night", 140),
    ("Lily", "Stargazer", 450),
    ("Chrysanthemum", "Baltica", 180),
    ("Gerbera", "Pink Power", 160),
    ("Eucalyptus", "Cinerea", 90),
];

/// (name, description, [(flower index, stems)])
const COMPOSITIONS: &[(&str, &str, &[(usize, i64)])] = &[
    (
        "Classic Romance",
        "A dozen red roses with eucalyptus",
        &[(0, 12), (7, 5)],
    ),
    (
        "Spring Morning",
        "Gold and dark tulips",
        &[(2, 7), (3, 6), (7, 3)],
    ),
    (
        "Sunny Day",
        "Gerberas, chrysanthemums and tulips",
        &[(6, 5), (5, 4), (2, 3)],
    ),
    (
        "White Elegance",
        "White roses with stargazer lilies",
        &[(1, 9), (4, 3), (7, 4)],
    ),
];

/// (name, phone, email)
const CUSTOMERS: &[(&str, &str, &str)] = &[
    ("Olena Shevchenko", "+380501112233", "olena@example.com"),
    ("Taras Bondarenko", "+380672223344", "taras@example.com"),
    ("Iryna Melnyk", "+380633334455", "iryna@example.com"),
    ("Andrii Koval", "+380994445566", "andrii@example.com"),
    ("user", "", "user@greenhouse.local"),
];

/// (customer index, composition index, order date, fulfillment date, quantity)
const ORDERS: &[(usize, usize, &str, &str, i64)] = &[
    (0, 0, "2025-04-01", "2025-04-01", 1),
    (1, 1, "2025-04-02", "2025-04-03", 2),
    (2, 2, "2025-04-03", "2025-04-05", 1),
    (3, 3, "2025-04-05", "2025-04-12", 1),
    (4, 0, "2025-04-07", "2025-04-10", 1),
    (0, 1, "2025-04-10", "2025-04-10", 3),
    (1, 0, "2025-04-12", "2025-04-14", 1),
    (2, 3, "2025-04-14", "2025-04-20", 2),
    (3, 2, "2025-04-18", "2025-04-19", 1),
    (4, 1, "2025-04-21", "2025-04-28", 1),
    (0, 0, "2025-04-25", "2025-04-27", 2),
    (1, 2, "2025-04-30", "2025-05-02", 1),
];

/// Row counts written by [`seed_demo_data`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub flowers: usize,
    pub compositions: usize,
    pub customers: usize,
    pub orders: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        *self == SeedReport::default()
    }
}

/// Fills an empty store with the demo catalog.
///
/// ## Returns
/// * `Ok(report)` - What was inserted (all zero if the store already had flowers)
pub async fn seed_demo_data(db: &Database) -> DbResult<SeedReport> {
    let pool = db.pool()?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Flowers")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        info!(existing, "Store already has flowers, skipping demo data");
        return Ok(SeedReport::default());
    }

    let mut tx = pool.begin().await?;

    let mut flower_ids = Vec::with_capacity(FLOWERS.len());
    for &(name, variety, price) in FLOWERS {
        let id = sqlx::query("INSERT INTO Flowers (FlowerName, Variety, Price) VALUES (?1, ?2, ?3)")
            .bind(name)
            .bind(variety)
            .bind(price)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();
        flower_ids.push(id);
    }

    let mut composition_ids = Vec::with_capacity(COMPOSITIONS.len());
    for &(name, description, lines) in COMPOSITIONS {
        let id = sqlx::query(
            "INSERT INTO Compositions (CompositionName, Description) VALUES (?1, ?2)",
        )
        .bind(name)
        .bind(description)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for &(flower, stems) in lines {
            sqlx::query(
                "INSERT INTO CompositionFlowers (CompositionID, FlowerID, Quantity) VALUES (?1, ?2, ?3)",
            )
            .bind(id)
            .bind(flower_ids[flower])
            .bind(stems)
            .execute(&mut *tx)
            .await?;
        }
        composition_ids.push(id);
    }

    let mut customer_ids = Vec::with_capacity(CUSTOMERS.len());
    for &(name, phone, email) in CUSTOMERS {
        let id = sqlx::query(
            "INSERT INTO Customers (CustomerName, PhoneNumber, Email) VALUES (?1, ?2, ?3)",
        )
        .bind(name)
        .bind(phone)
        .bind(email)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        customer_ids.push(id);
    }

    tx.commit().await?;

    // Orders go through the repository so the store prices them
    let orders = db.orders()?;
    for &(customer, composition, date, due, quantity) in ORDERS {
        orders
            .create_order(&NewOrder {
                customer_id: customer_ids[customer],
                composition_id: composition_ids[composition],
                order_date: date.to_string(),
                fulfillment_date: due.to_string(),
                quantity,
            })
            .await?;
    }

    let report = SeedReport {
        flowers: FLOWERS.len(),
        compositions: COMPOSITIONS.len(),
        customers: CUSTOMERS.len(),
        orders: ORDERS.len(),
    };
    info!(?report, "Demo data seeded");
    Ok(report)
}
