//! # Order Repository
//!
//! Order creation and all order-derived reports.
//!
//! ## Order Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Order Lifecycle                                  │
//! │                                                                         │
//! │  create_order(NewOrder)                                                │
//! │       │  INSERT INTO Orders (..., UrgencyRate = 0)                     │
//! │       ▼                                                                 │
//! │  trg_orders_pricing (AFTER INSERT, owned by the store)                 │
//! │       ├── UrgencyRate ← lead time (25% / 15% / 10% / 0)                │
//! │       └── OrderSummary ← base, fee, total                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Reports read Orders + OrderSummary; nothing here writes OrderSummary │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Date Ranges
//! Ranges are inclusive on both ends and compare `YYYY-MM-DD` text, so
//! callers must pass zero-padded ISO dates.

use sqlx::SqlitePool;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::error::DbResult;
use greenhouse_core::{
    CompositionSales, Money, NewOrder, Order, OrderSummary, UrgencyBucket, UrgencyRate,
};

const ORDER_COLUMNS: &str = r#"
    OrderID AS id,
    CustomerID AS customer_id,
    CompositionID AS composition_id,
    OrderDate AS order_date,
    FulfillmentDate AS fulfillment_date,
    Quantity AS quantity,
    UrgencyRate AS urgency_rate
"#;

/// Repository for orders and reports.
///
/// ## Usage
/// ```rust,ignore
/// let orders = db.orders()?;
///
/// let id = orders.create_order(&new_order).await?;
/// let summary = orders.get_order_summary(id).await?;
/// let revenue = orders.get_total_revenue("2025-04-01", "2025-04-30").await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order and returns its id.
    ///
    /// The urgency rate is always inserted as zero; the store derives the
    /// real rate and the order summary. Dates are stored as given.
    ///
    /// ## Returns
    /// * `Ok(id)` - Order created
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown customer or composition
    /// * `Err(DbError::QueryFailed)` - e.g. quantity not positive
    pub async fn create_order(&self, order: &NewOrder) -> DbResult<i64> {
        debug!(
            customer_id = order.customer_id,
            composition_id = order.composition_id,
            quantity = order.quantity,
            "Creating order"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO Orders (
                CustomerID, CompositionID, OrderDate, FulfillmentDate, Quantity, UrgencyRate
            ) VALUES (?1, ?2, ?3, ?4, ?5, 0)
            "#,
        )
        .bind(order.customer_id)
        .bind(order.composition_id)
        .bind(&order.order_date)
        .bind(&order.fulfillment_date)
        .bind(order.quantity)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => {
                let id = done.last_insert_rowid();
                info!(order_id = id, "Order created");
                Ok(id)
            }
            Err(e) => {
                warn!(error = %e, "Order insert failed");
                Err(e.into())
            }
        }
    }

    /// Gets one order by id.
    pub async fn get_order_by_id(&self, id: i64) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {} FROM Orders WHERE OrderID = ?1", ORDER_COLUMNS);
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Orders whose order date is exactly `date`.
    pub async fn get_orders_by_date(&self, date: &str) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM Orders WHERE OrderDate = ?1 ORDER BY OrderID",
            ORDER_COLUMNS
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;

        debug!(date, count = orders.len(), "Orders by date");
        Ok(orders)
    }

    /// Orders with `start <= OrderDate <= end`.
    pub async fn get_orders_by_date_range(&self, start: &str, end: &str) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM Orders WHERE OrderDate BETWEEN ?1 AND ?2 ORDER BY OrderDate, OrderID",
            ORDER_COLUMNS
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        debug!(start, end, count = orders.len(), "Orders by date range");
        Ok(orders)
    }

    /// All orders of one customer, oldest first.
    pub async fn get_orders_by_customer(&self, customer_id: i64) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM Orders WHERE CustomerID = ?1 ORDER BY OrderDate, OrderID",
            ORDER_COLUMNS
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// The store-derived pricing of one order.
    ///
    /// ## Returns
    /// * `Ok(Some(OrderSummary))` - Order exists
    /// * `Ok(None)` - No such order
    pub async fn get_order_summary(&self, order_id: i64) -> DbResult<Option<OrderSummary>> {
        let summary = sqlx::query_as::<_, OrderSummary>(
            r#"
            SELECT
                OrderID AS order_id,
                BasePrice AS base_price,
                UrgencyFee AS urgency_fee,
                TotalPrice AS total_price
            FROM OrderSummary
            WHERE OrderID = ?1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(summary)
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Sum of order totals for orders dated within `[start, end]`; zero when none.
    pub async fn get_total_revenue(&self, start: &str, end: &str) -> DbResult<Money> {
        let total: Money = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(os.TotalPrice), 0)
            FROM OrderSummary os
            INNER JOIN Orders o ON o.OrderID = os.OrderID
            WHERE o.OrderDate BETWEEN ?1 AND ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        debug!(start, end, total = %total, "Total revenue");
        Ok(total)
    }

    /// Order counts per exact urgency rate, lowest rate first.
    ///
    /// Each distinct stored rate is its own bucket, even when two rates
    /// truncate to the same whole percent.
    pub async fn get_orders_by_urgency(&self) -> DbResult<Vec<UrgencyBucket>> {
        let rows: Vec<(UrgencyRate, i64)> = sqlx::query_as(
            r#"
            SELECT UrgencyRate, COUNT(OrderID)
            FROM Orders
            GROUP BY UrgencyRate
            ORDER BY UrgencyRate
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(rate, order_count)| UrgencyBucket {
                percent: rate.percent(),
                order_count,
            })
            .collect())
    }

    /// Stems used per flower name and variety by orders dated within `[start, end]`.
    ///
    /// A stem count is composition quantity × order quantity.
    pub async fn get_flower_usage_by_period(
        &self,
        start: &str,
        end: &str,
    ) -> DbResult<BTreeMap<String, BTreeMap<String, i64>>> {
        let rows: Vec<(String, String, i64)> = sqlx::query_as(
            r#"
            SELECT f.FlowerName, f.Variety, SUM(cf.Quantity * o.Quantity)
            FROM Orders o
            INNER JOIN CompositionFlowers cf ON cf.CompositionID = o.CompositionID
            INNER JOIN Flowers f ON f.FlowerID = cf.FlowerID
            WHERE o.OrderDate BETWEEN ?1 AND ?2
            GROUP BY f.FlowerName, f.Variety
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let mut usage: BTreeMap<String, BTreeMap<String, i64>> = BTreeMap::new();
        for (name, variety, used) in rows {
            usage.entry(name).or_default().insert(variety, used);
        }

        Ok(usage)
    }

    /// Order count and revenue per composition name, for compositions with orders.
    pub async fn get_composition_sales_summary(&self) -> DbResult<BTreeMap<String, CompositionSales>> {
        let rows: Vec<(String, i64, Money)> = sqlx::query_as(
            r#"
            SELECT c.CompositionName, COUNT(o.OrderID), COALESCE(SUM(os.TotalPrice), 0)
            FROM Compositions c
            INNER JOIN Orders o ON o.CompositionID = c.CompositionID
            INNER JOIN OrderSummary os ON os.OrderID = o.OrderID
            GROUP BY c.CompositionName
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(name, order_count, revenue)| {
                (
                    name,
                    CompositionSales {
                        order_count,
                        revenue,
                    },
                )
            })
            .collect())
    }

    /// Number of orders (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::seed::seed_demo_data;
    use crate::{Database, DbConfig};

    /// One customer, Rose $2.50 and Fern $0.80, "Spring" = 5 roses + 3 ferns ($14.90).
    async fn small_shop() -> Database {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();
        db.execute(
            r#"
            INSERT INTO Customers (CustomerName, PhoneNumber, Email)
                VALUES ('Ada Lovelace', '555-0100', 'ada@example.com');
            INSERT INTO Flowers (FlowerName, Variety, Price) VALUES ('Rose', 'Red Naomi', 250);
            INSERT INTO Flowers (FlowerName, Variety, Price) VALUES ('Fern', 'Leatherleaf', 80);
            INSERT INTO Compositions (CompositionName, Description) VALUES ('Spring', 'Roses and ferns');
            INSERT INTO Compositions (CompositionName, Description) VALUES ('Bare', 'Nothing yet');
            INSERT INTO CompositionFlowers (CompositionID, FlowerID, Quantity) VALUES (1, 1, 5);
            INSERT INTO CompositionFlowers (CompositionID, FlowerID, Quantity) VALUES (1, 2, 3);
            "#,
        )
        .await
        .unwrap();
        db
    }

    fn order(date: &str, due: &str, composition_id: i64, quantity: i64) -> NewOrder {
        NewOrder {
            customer_id: 1,
            composition_id,
            order_date: date.to_string(),
            fulfillment_date: due.to_string(),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_create_then_find_by_date() {
        let db = small_shop().await;
        let orders = db.orders().unwrap();

        let id = orders
            .create_order(&order("2025-04-10", "2025-04-20", 1, 2))
            .await
            .unwrap();

        let found = orders.get_orders_by_date("2025-04-10").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);
        assert_eq!(found[0].customer_id, 1);
        assert_eq!(found[0].composition_id, 1);
        assert_eq!(found[0].quantity, 2);

        assert!(orders.get_orders_by_date("2025-04-11").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_order_rejects_unknown_references() {
        let db = small_shop().await;
        let orders = db.orders().unwrap();

        let mut bad_customer = order("2025-04-10", "2025-04-20", 1, 1);
        bad_customer.customer_id = 42;
        assert!(matches!(
            orders.create_order(&bad_customer).await,
            Err(DbError::ForeignKeyViolation { .. })
        ));

        assert!(matches!(
            orders.create_order(&order("2025-04-10", "2025-04-20", 99, 1)).await,
            Err(DbError::ForeignKeyViolation { .. })
        ));

        assert!(orders.create_order(&order("2025-04-10", "2025-04-20", 1, 0)).await.is_err());
        assert_eq!(orders.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_summary_without_urgency() {
        let db = small_shop().await;
        let orders = db.orders().unwrap();

        let id = orders
            .create_order(&order("2025-04-01", "2025-04-10", 1, 2))
            .await
            .unwrap();

        let stored = orders.get_order_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.urgency_rate, UrgencyRate::zero());

        let summary = orders.get_order_summary(id).await.unwrap().unwrap();
        assert_eq!(summary.base_price, Money::from_cents(2980));
        assert_eq!(summary.urgency_fee, Money::zero());
        assert_eq!(summary.total_price, Money::from_cents(2980));
    }

    #[tokio::test]
    async fn test_urgency_tiers_from_lead_time() {
        let db = small_shop().await;
        let orders = db.orders().unwrap();

        let cases = [
            ("2025-04-01", 2500, 373),  // same day: 14.90 × 25% = 3.725 → 3.73
            ("2025-04-02", 1500, 224),  // 1 day: 2.235 → 2.24
            ("2025-04-03", 1000, 149),  // 2 days
            ("2025-04-04", 0, 0),       // 3 days
            ("not a date", 0, 0),
        ];

        for (due, bps, fee_cents) in cases {
            let id = orders
                .create_order(&order("2025-04-01", due, 1, 1))
                .await
                .unwrap();

            let stored = orders.get_order_by_id(id).await.unwrap().unwrap();
            assert_eq!(stored.urgency_rate, UrgencyRate::from_bps(bps), "due {}", due);

            let summary = orders.get_order_summary(id).await.unwrap().unwrap();
            assert_eq!(summary.base_price, Money::from_cents(1490));
            assert_eq!(summary.urgency_fee, Money::from_cents(fee_cents), "due {}", due);
            assert_eq!(summary.total_price, summary.base_price + summary.urgency_fee);
        }
    }

    #[tokio::test]
    async fn test_summary_for_empty_composition_is_zero() {
        let db = small_shop().await;
        let orders = db.orders().unwrap();

        let id = orders
            .create_order(&order("2025-04-01", "2025-04-01", 2, 3))
            .await
            .unwrap();
        let summary = orders.get_order_summary(id).await.unwrap().unwrap();

        assert_eq!(summary.base_price, Money::zero());
        assert_eq!(summary.total_price, Money::zero());
    }

    #[tokio::test]
    async fn test_summary_is_snapshot() {
        let db = small_shop().await;
        let orders = db.orders().unwrap();

        let id = orders
            .create_order(&order("2025-04-01", "2025-04-09", 1, 1))
            .await
            .unwrap();
        db.catalog()
            .unwrap()
            .update_flower_price(1, Money::from_cents(275))
            .await
            .unwrap();

        let summary = orders.get_order_summary(id).await.unwrap().unwrap();
        assert_eq!(summary.total_price, Money::from_cents(1490));
    }

    #[tokio::test]
    async fn test_missing_summary_is_none() {
        let db = small_shop().await;
        assert_eq!(db.orders().unwrap().get_order_summary(7).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_store_reports() {
        let db = small_shop().await;
        let orders = db.orders().unwrap();

        assert!(orders.get_orders_by_urgency().await.unwrap().is_empty());
        assert_eq!(
            orders.get_total_revenue("0000-01-01", "9999-12-31").await.unwrap(),
            Money::zero()
        );
        assert!(orders
            .get_flower_usage_by_period("2025-01-01", "2025-12-31")
            .await
            .unwrap()
            .is_empty());
        assert!(orders.get_composition_sales_summary().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_date_range_is_inclusive() {
        let db = small_shop().await;
        let orders = db.orders().unwrap();

        for date in ["2025-03-31", "2025-04-01", "2025-04-15", "2025-04-30", "2025-05-01"] {
            orders.create_order(&order(date, "2025-06-01", 1, 1)).await.unwrap();
        }

        let april = orders
            .get_orders_by_date_range("2025-04-01", "2025-04-30")
            .await
            .unwrap();
        let dates: Vec<&str> = april.iter().map(|o| o.order_date.as_str()).collect();
        assert_eq!(dates, ["2025-04-01", "2025-04-15", "2025-04-30"]);
    }

    #[tokio::test]
    async fn test_revenue_matches_sum_of_summaries() {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();
        seed_demo_data(&db).await.unwrap();
        let orders = db.orders().unwrap();

        for (start, end) in [
            ("2025-04-01", "2025-04-30"),
            ("2025-04-10", "2025-04-20"),
            ("2025-05-01", "2025-05-31"),
        ] {
            let mut expected = Money::zero();
            for o in orders.get_orders_by_date_range(start, end).await.unwrap() {
                expected += orders.get_order_summary(o.id).await.unwrap().unwrap().total_price;
            }
            assert_eq!(orders.get_total_revenue(start, end).await.unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn test_orders_by_urgency_keeps_exact_rates_apart() {
        let db = small_shop().await;
        let orders = db.orders().unwrap();

        orders.create_order(&order("2025-04-01", "2025-04-01", 1, 1)).await.unwrap();
        orders.create_order(&order("2025-04-02", "2025-04-02", 1, 1)).await.unwrap();
        orders.create_order(&order("2025-04-01", "2025-04-20", 1, 1)).await.unwrap();

        // Hand-edited rates that truncate to the same percent
        db.execute("INSERT INTO Orders (CustomerID, CompositionID, OrderDate, FulfillmentDate, Quantity) VALUES (1, 1, '2025-04-05', '2025-04-30', 1)")
            .await
            .unwrap();
        db.execute("INSERT INTO Orders (CustomerID, CompositionID, OrderDate, FulfillmentDate, Quantity) VALUES (1, 1, '2025-04-06', '2025-04-30', 1)")
            .await
            .unwrap();
        db.execute("UPDATE Orders SET UrgencyRate = 1050 WHERE OrderDate = '2025-04-05'")
            .await
            .unwrap();
        db.execute("UPDATE Orders SET UrgencyRate = 1075 WHERE OrderDate = '2025-04-06'")
            .await
            .unwrap();

        let buckets = orders.get_orders_by_urgency().await.unwrap();
        assert_eq!(
            buckets,
            vec![
                UrgencyBucket { percent: 0, order_count: 1 },
                UrgencyBucket { percent: 10, order_count: 1 },
                UrgencyBucket { percent: 10, order_count: 1 },
                UrgencyBucket { percent: 25, order_count: 2 },
            ]
        );
    }

    #[tokio::test]
    async fn test_flower_usage_multiplies_quantities() {
        let db = small_shop().await;
        let orders = db.orders().unwrap();

        orders.create_order(&order("2025-04-02", "2025-04-09", 1, 2)).await.unwrap();
        orders.create_order(&order("2025-04-03", "2025-04-09", 1, 1)).await.unwrap();
        orders.create_order(&order("2025-05-03", "2025-05-09", 1, 10)).await.unwrap();

        let usage = orders
            .get_flower_usage_by_period("2025-04-01", "2025-04-30")
            .await
            .unwrap();

        assert_eq!(usage["Rose"]["Red Naomi"], 15);
        assert_eq!(usage["Fern"]["Leatherleaf"], 9);
        assert_eq!(usage.len(), 2);
    }

    #[tokio::test]
    async fn test_composition_sales_summary() {
        let db = small_shop().await;
        let orders = db.orders().unwrap();

        orders.create_order(&order("2025-04-02", "2025-04-09", 1, 1)).await.unwrap();
        orders.create_order(&order("2025-04-02", "2025-04-09", 1, 2)).await.unwrap();

        let summary = orders.get_composition_sales_summary().await.unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(
            summary["Spring"],
            CompositionSales {
                order_count: 2,
                revenue: Money::from_cents(1490 * 3),
            }
        );
    }

    #[tokio::test]
    async fn test_orders_by_customer() {
        let db = small_shop().await;
        db.execute("INSERT INTO Customers (CustomerName) VALUES ('Grace Hopper')")
            .await
            .unwrap();
        let orders = db.orders().unwrap();

        orders.create_order(&order("2025-04-09", "2025-04-20", 1, 1)).await.unwrap();
        orders.create_order(&order("2025-04-02", "2025-04-20", 1, 1)).await.unwrap();

        let mine = orders.get_orders_by_customer(1).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].order_date, "2025-04-02");
        assert!(orders.get_orders_by_customer(2).await.unwrap().is_empty());
    }
}
