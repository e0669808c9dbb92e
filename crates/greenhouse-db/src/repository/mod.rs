//! # Repository Module
//!
//! Database repository implementations for the greenhouse.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Console screen                                                        │
//! │       │                                                                 │
//! │       │  db.catalog()?.update_flower_price(1, price)                   │
//! │       ▼                                                                 │
//! │  CatalogRepository / CustomerRepository / OrderRepository              │
//! │       │                                                                 │
//! │       │  Bound SQL (never interpolated)                                │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Each repository holds a cloned SqlitePool handle; creating one is    │
//! │  cheap, so screens ask the Database for a fresh one per action.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`catalog::CatalogRepository`] - Flowers, compositions, guarded price updates
//! - [`customer::CustomerRepository`] - Customer lookups
//! - [`order::OrderRepository`] - Order creation and reports

pub mod catalog;
pub mod customer;
pub mod order;
