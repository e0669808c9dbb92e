//! # greenhouse-db: Database Layer for the Greenhouse
//!
//! This crate provides database access for the greenhouse catalog, orders
//! and reports. It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Greenhouse Data Flow                             │
//! │                                                                         │
//! │  Console action ("Update Flower Price")                                │
//! │       │  session.has_capability(UpdateFlowerPrice)?                    │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   greenhouse-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │  │   │
//! │  │   │               │    │ CatalogRepo    │   │ 001_schema   │  │   │
//! │  │   │ connect()     │◄───│ CustomerRepo   │   │ 002_pricing  │  │   │
//! │  │   │ execute/query │    │ OrderRepo      │   │              │  │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   Flowers, Compositions, Customers, Orders, OrderSummary       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Store connection lifecycle and raw statements
//! - [`migrations`] - Embedded database migrations (schema + pricing trigger)
//! - [`error`] - Database error types
//! - [`repository`] - Catalog, customer and order repositories
//! - [`seed`] - Demo catalog for first start and tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use greenhouse_db::{Database, DbConfig};
//!
//! let db = Database::open(DbConfig::new("greenhouse.db")).await?;
//!
//! let flowers = db.catalog()?.list_flowers().await?;
//! let revenue = db.orders()?.get_total_revenue("2025-04-01", "2025-04-30").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use seed::{seed_demo_data, SeedReport};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::customer::CustomerRepository;
pub use repository::order::OrderRepository;
