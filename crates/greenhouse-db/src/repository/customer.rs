//! # Customer Repository
//!
//! Read-only access to customers. Customers are managed outside the
//! application (seed data or direct SQL).

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use greenhouse_core::Customer;

/// Repository for customer lookups.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists all customers ordered by id.
    pub async fn list_customers(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT
                CustomerID AS id,
                CustomerName AS name,
                PhoneNumber AS phone,
                Email AS email
            FROM Customers
            ORDER BY CustomerID
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = customers.len(), "Listed customers");
        Ok(customers)
    }

    /// Gets a customer by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Customer))` - Customer found
    /// * `Ok(None)` - No such customer
    pub async fn get_customer_by_id(&self, id: i64) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT
                CustomerID AS id,
                CustomerName AS name,
                PhoneNumber AS phone,
                Email AS email
            FROM Customers
            WHERE CustomerID = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Gets a customer by exact name. If several share the name, the lowest id wins.
    pub async fn get_customer_by_name(&self, name: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT
                CustomerID AS id,
                CustomerName AS name,
                PhoneNumber AS phone,
                Email AS email
            FROM Customers
            WHERE CustomerName = ?1
            ORDER BY CustomerID
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }
}

#[cfg(test)]
mod tests {
    use crate::seed::seed_demo_data;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_customer_lookups() {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();
        seed_demo_data(&db).await.unwrap();
        let customers = db.customers().unwrap();

        let all = customers.list_customers().await.unwrap();
        assert!(!all.is_empty());

        let first = customers.get_customer_by_id(all[0].id).await.unwrap().unwrap();
        assert_eq!(first, all[0]);

        let by_name = customers
            .get_customer_by_name(&first.name)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_name.id, first.id);
    }

    #[tokio::test]
    async fn test_missing_customer_is_none() {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();
        let customers = db.customers().unwrap();

        assert!(customers.list_customers().await.unwrap().is_empty());
        assert_eq!(customers.get_customer_by_id(404).await.unwrap(), None);
        assert_eq!(customers.get_customer_by_name("Nobody").await.unwrap(), None);
    }
}
