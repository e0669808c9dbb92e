//! # Catalog Repository
//!
//! Database operations for flowers and compositions.
//!
//! ## Key Operations
//! - Flower listing and the guarded price update
//! - Composition listing and flower breakdown
//! - Popularity ranking by order count
//!
//! ## Guarded Price Update
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    update_flower_price(id, new)                         │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    SELECT Price ──► none? ──────────────────► NotFound, rollback       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │    check_price_change(current, new) ──fail──► Rejected, rollback       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │    UPDATE ... WHERE FlowerID = ? AND Price = current                   │
//! │       │                                                                 │
//! │       ├── 0 rows ───────────────────────────► Conflict, rollback       │
//! │       ▼                                                                 │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! The compare-and-set on `Price` means a concurrent writer can never slip
//! a price past the cap between the read and the write.

use sqlx::SqlitePool;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use greenhouse_core::validation::check_price_change;
use greenhouse_core::{Composition, CompositionLine, Flower, Money};

/// Repository for flowers and compositions.
///
/// ## Usage
/// ```rust,ignore
/// let catalog = db.catalog()?;
///
/// let flowers = catalog.list_flowers().await?;
/// catalog.update_flower_price(1, Money::from_cents(1100)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    // =========================================================================
    // Flowers
    // =========================================================================

    /// Lists all flowers ordered by id.
    pub async fn list_flowers(&self) -> DbResult<Vec<Flower>> {
        let flowers = sqlx::query_as::<_, Flower>(
            r#"
            SELECT
                FlowerID AS id,
                FlowerName AS name,
                Variety AS variety,
                Price AS price
            FROM Flowers
            ORDER BY FlowerID
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = flowers.len(), "Listed flowers");
        Ok(flowers)
    }

    /// Gets a flower by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Flower))` - Flower found
    /// * `Ok(None)` - Flower not found
    pub async fn get_flower_by_id(&self, id: i64) -> DbResult<Option<Flower>> {
        let flower = sqlx::query_as::<_, Flower>(
            r#"
            SELECT
                FlowerID AS id,
                FlowerName AS name,
                Variety AS variety,
                Price AS price
            FROM Flowers
            WHERE FlowerID = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(flower)
    }

    /// Changes a flower's price, enforcing the 10% increase cap.
    ///
    /// ## Returns
    /// * `Ok(())` - Price updated
    /// * `Err(DbError::NotFound)` - No flower with this id (nothing changed)
    /// * `Err(DbError::Rejected)` - Cap exceeded or price not positive (nothing changed)
    /// * `Err(DbError::Conflict)` - Price changed underneath us (nothing changed)
    pub async fn update_flower_price(&self, id: i64, new_price: Money) -> DbResult<()> {
        debug!(id, new_price = %new_price, "Updating flower price");

        let mut tx = self.pool.begin().await?;

        let current: Option<Money> =
            sqlx::query_scalar("SELECT Price FROM Flowers WHERE FlowerID = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let current = current.ok_or_else(|| DbError::not_found("Flower", id))?;

        check_price_change(current, new_price)?;

        let result = sqlx::query("UPDATE Flowers SET Price = ?1 WHERE FlowerID = ?2 AND Price = ?3")
            .bind(new_price)
            .bind(id)
            .bind(current)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::conflict("Flower", id));
        }

        tx.commit().await?;

        info!(id, old = %current, new = %new_price, "Flower price updated");
        Ok(())
    }

    // =========================================================================
    // Compositions
    // =========================================================================

    /// Lists all compositions ordered by id.
    pub async fn list_compositions(&self) -> DbResult<Vec<Composition>> {
        let compositions = sqlx::query_as::<_, Composition>(
            r#"
            SELECT
                CompositionID AS id,
                CompositionName AS name,
                Description AS description
            FROM Compositions
            ORDER BY CompositionID
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(compositions)
    }

    /// Gets a composition by its ID.
    pub async fn get_composition_by_id(&self, id: i64) -> DbResult<Option<Composition>> {
        let composition = sqlx::query_as::<_, Composition>(
            r#"
            SELECT
                CompositionID AS id,
                CompositionName AS name,
                Description AS description
            FROM Compositions
            WHERE CompositionID = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(composition)
    }

    /// Flower id → stems per unit for one composition.
    ///
    /// Empty when the composition has no flowers or does not exist.
    pub async fn get_composition_flowers(&self, composition_id: i64) -> DbResult<BTreeMap<i64, i64>> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT FlowerID, Quantity
            FROM CompositionFlowers
            WHERE CompositionID = ?1
            "#,
        )
        .bind(composition_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// The composition's flowers joined with their names, ordered by flower id.
    pub async fn get_composition_breakdown(
        &self,
        composition_id: i64,
    ) -> DbResult<Vec<CompositionLine>> {
        let lines = sqlx::query_as::<_, CompositionLine>(
            r#"
            SELECT
                f.FlowerID AS flower_id,
                f.FlowerName AS flower_name,
                f.Variety AS variety,
                cf.Quantity AS quantity
            FROM CompositionFlowers cf
            INNER JOIN Flowers f ON f.FlowerID = cf.FlowerID
            WHERE cf.CompositionID = ?1
            ORDER BY f.FlowerID
            "#,
        )
        .bind(composition_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// The composition with the most orders.
    ///
    /// Ties go to the lowest composition id. `None` when there are no orders.
    pub async fn get_most_popular_composition(&self) -> DbResult<Option<Composition>> {
        let composition = sqlx::query_as::<_, Composition>(
            r#"
            SELECT
                c.CompositionID AS id,
                c.CompositionName AS name,
                c.Description AS description
            FROM Compositions c
            INNER JOIN Orders o ON o.CompositionID = c.CompositionID
            GROUP BY c.CompositionID
            ORDER BY COUNT(o.OrderID) DESC, c.CompositionID ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(composition)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
