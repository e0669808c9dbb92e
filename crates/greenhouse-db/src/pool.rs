//! # Store Connection
//!
//! Connection lifecycle and raw statement access for the SQLite store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Store Connection                                   │
//! │                                                                         │
//! │  Console startup                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure pool settings                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config)      ← Disconnected handle                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.connect().await         ← Open file + run migrations               │
//! │       │                        (no-op when already connected)          │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐                                 │  one logical session,     │
//! │  │  │Conn1│ ...                             │  calls are sequential     │
//! │  │  └─────┘                                 │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ├── db.catalog()?    → CatalogRepository                         │
//! │       ├── db.customers()?  → CustomerRepository                        │
//! │       ├── db.orders()?     → OrderRepository                           │
//! │       └── db.execute(..) / db.query(..) → raw statements               │
//! │                                                                         │
//! │  db.disconnect().await      ← Safe to call twice                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pragmas
//! Every connection enables `foreign_keys`, so orders can only reference
//! existing customers and compositions. File-backed stores use WAL with
//! NORMAL synchronous.

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Row, SqlitePool};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::catalog::CatalogRepository;
use crate::repository::customer::CustomerRepository;
use crate::repository::order::OrderRepository;

/// Path marker for a private in-memory store.
const IN_MEMORY_PATH: &str = ":memory:";

/// Tables reported by [`Database::table_counts`].
const TABLES: [&str; 6] = [
    "Flowers",
    "Compositions",
    "CompositionFlowers",
    "Customers",
    "Orders",
    "OrderSummary",
];

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust
/// use greenhouse_db::DbConfig;
///
/// let config = DbConfig::new("/path/to/greenhouse.db")
///     .max_connections(2)
///     .run_migrations(true);
/// assert_eq!(config.max_connections, 2);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 2 (one interactive session)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection. `None` keeps connections forever.
    /// Default: 10 minutes
    pub idle_timeout: Option<Duration>,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created on connect if it doesn't exist; its directory must.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 2,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// An in-memory SQLite database lives and dies with its connection, so
    /// the pool is pinned to one connection that is never recycled.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    /// True for `:memory:` stores.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
        };

        // SQLite has them disabled by default for backwards compatibility
        Ok(options.foreign_keys(true))
    }
}

// =============================================================================
// Database
// =============================================================================

/// The store connection: owns the pool and hands out repositories.
///
/// ## Lifecycle
/// ```text
///   Disconnected ──connect()──► Connected ──disconnect()──► Disconnected
///        │  ▲                      │  ▲
///        └──┘ disconnect() no-op   └──┘ connect() no-op
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    config: DbConfig,
    pool: Option<SqlitePool>,
}

impl Database {
    /// Creates a disconnected handle. Nothing is opened until [`Database::connect`].
    pub fn new(config: DbConfig) -> Self {
        Database { config, pool: None }
    }

    /// Creates a handle and connects it.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let db = Database::open(DbConfig::new("./greenhouse.db")).await?;
    /// let flowers = db.catalog()?.list_flowers().await?;
    /// ```
    pub async fn open(config: DbConfig) -> DbResult<Self> {
        let mut db = Database::new(config);
        db.connect().await?;
        Ok(db)
    }

    /// Opens the store at the configured path.
    ///
    /// ## What This Does
    /// 1. Returns immediately if already connected
    /// 2. Opens the file (creating it if missing) with foreign keys on
    /// 3. Runs migrations (if enabled)
    ///
    /// ## Returns
    /// * `Ok(())` - Connected
    /// * `Err(DbError::ConnectionFailed)` - The path cannot be opened
    /// * `Err(DbError::MigrationFailed)` - Schema could not be applied
    pub async fn connect(&mut self) -> DbResult<()> {
        if self.pool.is_some() {
            debug!("Database already connected");
            return Ok(());
        }

        info!(
            path = %self.config.database_path.display(),
            "Opening database"
        );

        let connect_options = self.config.connect_options()?;

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(self.config.max_connections)
            .min_connections(self.config.min_connections)
            .acquire_timeout(self.config.connect_timeout)
            .idle_timeout(self.config.idle_timeout);

        if self.config.is_in_memory() {
            pool_options = pool_options.max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = self.config.max_connections,
            "Database pool created"
        );

        if self.config.run_migrations {
            info!("Running database migrations");
            if let Err(e) = migrations::run_migrations(&pool).await {
                pool.close().await;
                return Err(e);
            }
        }

        self.pool = Some(pool);
        Ok(())
    }

    /// Closes the store. Safe to call when already disconnected.
    pub async fn disconnect(&mut self) {
        if let Some(pool) = self.pool.take() {
            info!("Closing database connection pool");
            pool.close().await;
        }
    }

    /// Whether the store is currently open.
    pub fn is_connected(&self) -> bool {
        self.pool.is_some()
    }

    /// The configuration this handle was created with.
    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Returns the connection pool, or `NotConnected`.
    ///
    /// ## Usage
    /// For advanced queries not covered by repositories.
    pub fn pool(&self) -> DbResult<&SqlitePool> {
        self.pool.as_ref().ok_or(DbError::NotConnected)
    }

    /// Runs a mutating statement and returns the number of affected rows.
    ///
    /// Failures are logged with the store's diagnostic and returned.
    pub async fn execute(&self, sql: &str) -> DbResult<u64> {
        let pool = self.pool()?;

        match sqlx::query(sql).execute(pool).await {
            Ok(result) => Ok(result.rows_affected()),
            Err(e) => {
                let err = DbError::from(e);
                warn!(error = %err, statement = %sql, "Statement failed");
                Err(err)
            }
        }
    }

    /// Runs a read statement and returns every row as text.
    ///
    /// Each row has one entry per result column; SQL NULL becomes `"NULL"`.
    /// Row order is whatever the statement specifies (or the store's default).
    pub async fn query(&self, sql: &str) -> DbResult<Vec<Vec<String>>> {
        let pool = self.pool()?;

        let rows = match sqlx::query(sql).fetch_all(pool).await {
            Ok(rows) => rows,
            Err(e) => {
                let err = DbError::from(e);
                warn!(error = %err, statement = %sql, "Query failed");
                return Err(err);
            }
        };

        debug!(rows = rows.len(), "Query returned rows");
        rows.iter().map(row_to_strings).collect()
    }

    /// Returns the catalog (flowers and compositions) repository.
    pub fn catalog(&self) -> DbResult<CatalogRepository> {
        Ok(CatalogRepository::new(self.pool()?.clone()))
    }

    /// Returns the customer repository.
    pub fn customers(&self) -> DbResult<CustomerRepository> {
        Ok(CustomerRepository::new(self.pool()?.clone()))
    }

    /// Returns the order and reporting repository.
    pub fn orders(&self) -> DbResult<OrderRepository> {
        Ok(OrderRepository::new(self.pool()?.clone()))
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        match &self.pool {
            Some(pool) => sqlx::query("SELECT 1").execute(pool).await.is_ok(),
            None => false,
        }
    }

    /// Row counts of every greenhouse table, in schema order (for diagnostics).
    pub async fn table_counts(&self) -> DbResult<Vec<(&'static str, i64)>> {
        let pool = self.pool()?;
        let mut counts = Vec::with_capacity(TABLES.len());

        for table in TABLES {
            // Table names come from the constant list above, never from input
            let sql = format!("SELECT COUNT(*) FROM {}", table);
            let count: i64 = sqlx::query_scalar(&sql).fetch_one(pool).await?;
            counts.push((table, count));
        }

        Ok(counts)
    }

    /// Migration progress as (total, applied).
    pub async fn migration_status(&self) -> DbResult<(usize, usize)> {
        migrations::migration_status(self.pool()?).await
    }
}

fn row_to_strings(row: &SqliteRow) -> DbResult<Vec<String>> {
    (0..row.columns().len())
        .map(|i| -> DbResult<String> {
            // SQLite converts INTEGER/REAL to text on request
            let value: Option<String> = row.try_get_unchecked(i)?;
            Ok(value.unwrap_or_else(|| "NULL".to_string()))
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    async fn connected() -> Database {
        Database::open(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = connected().await;

        assert!(db.is_connected());
        assert!(db.health_check().await);
        assert_eq!(db.migration_status().await.unwrap(), (2, 2));
    }

    #[tokio::test]
    async fn test_connect_is_idempotent() {
        let mut db = connected().await;
        db.execute("INSERT INTO Customers (CustomerName) VALUES ('Ada')")
            .await
            .unwrap();

        // A second connect must not replace (and so wipe) the in-memory store
        db.connect().await.unwrap();
        let rows = db.query("SELECT COUNT(*) FROM Customers").await.unwrap();
        assert_eq!(rows, vec![vec!["1".to_string()]]);
    }

    #[tokio::test]
    async fn test_disconnect_twice_is_noop() {
        let mut db = connected().await;

        db.disconnect().await;
        assert!(!db.is_connected());
        db.disconnect().await;
        assert!(!db.is_connected());
        assert!(!db.health_check().await);
    }

    #[tokio::test]
    async fn test_operations_require_connection() {
        let db = Database::new(DbConfig::in_memory());

        assert!(!db.is_connected());
        assert!(matches!(db.execute("SELECT 1").await, Err(DbError::NotConnected)));
        assert!(matches!(db.query("SELECT 1").await, Err(DbError::NotConnected)));
        assert!(matches!(db.catalog(), Err(DbError::NotConnected)));
        assert!(matches!(db.orders(), Err(DbError::NotConnected)));
    }

    #[tokio::test]
    async fn test_query_returns_text_rows() {
        let db = connected().await;
        db.execute(
            "INSERT INTO Flowers (FlowerName, Variety, Price) VALUES ('Rose', 'Red Naomi', 250)",
        )
        .await
        .unwrap();

        let rows = db
            .query("SELECT FlowerID, FlowerName, Price, NULL FROM Flowers")
            .await
            .unwrap();

        assert_eq!(
            rows,
            vec![vec![
                "1".to_string(),
                "Rose".to_string(),
                "250".to_string(),
                "NULL".to_string()
            ]]
        );
    }

    #[tokio::test]
    async fn test_execute_reports_store_errors() {
        let db = connected().await;

        assert!(matches!(
            db.execute("INSERT INTO Nowhere VALUES (1)").await,
            Err(DbError::QueryFailed(_))
        ));
        // CHECK (Price > 0)
        assert!(matches!(
            db.execute("INSERT INTO Flowers (FlowerName, Price) VALUES ('Weed', 0)").await,
            Err(DbError::QueryFailed(_))
        ));
        assert_eq!(db.execute("DELETE FROM Flowers").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_table_counts_on_empty_store() {
        let db = connected().await;
        let counts = db.table_counts().await.unwrap();

        assert_eq!(counts.len(), 6);
        assert!(counts.iter().all(|(_, n)| *n == 0));
        assert_eq!(counts[0].0, "Flowers");
    }

    #[tokio::test]
    async fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("greenhouse.db");

        let mut db = Database::open(DbConfig::new(&path)).await.unwrap();
        db.execute("INSERT INTO Customers (CustomerName) VALUES ('Grace')")
            .await
            .unwrap();
        db.disconnect().await;

        let db = Database::open(DbConfig::new(&path)).await.unwrap();
        let rows = db.query("SELECT CustomerName FROM Customers").await.unwrap();
        assert_eq!(rows, vec![vec!["Grace".to_string()]]);
    }

    #[tokio::test]
    async fn test_connect_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("greenhouse.db");

        let mut db = Database::new(DbConfig::new(path).connect_timeout(Duration::from_secs(2)));
        assert!(matches!(
            db.connect().await,
            Err(DbError::ConnectionFailed(_))
        ));
        assert!(!db.is_connected());
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }
}
