//! # greenhouse-core: Pure Business Logic for the Greenhouse
//!
//! This crate holds the domain model of the flower greenhouse: flowers,
//! compositions (bouquets), customers, orders and their derived pricing,
//! plus the session/permission model that gates what a user may do.
//! Everything here is pure; the database lives in `greenhouse-db`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Greenhouse Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Console (menus, report screens)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Session::has_capability(..)            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ greenhouse-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  session  │  │ validation│  │   │
//! │  │   │  Flower   │  │   Money   │  │   Role    │  │ price cap │  │   │
//! │  │   │  Order    │  │           │  │ Capability│  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO TERMINAL • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                greenhouse-db (Database Layer)                   │   │
//! │  │        SQLite queries, migrations, repositories, reports        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Flower, Composition, Order, reports)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation, including the price cap
//! - [`session`] - Users, roles, capabilities and the login session
//!
//! ## Example Usage
//!
//! ```rust
//! use greenhouse_core::money::Money;
//! use greenhouse_core::validation::check_price_change;
//!
//! let current = Money::from_cents(1000); // $10.00
//!
//! // Up to +10% is accepted
//! assert!(check_price_change(current, Money::from_cents(1100)).is_ok());
//!
//! // One cent more is rejected
//! assert!(check_price_change(current, Money::from_cents(1101)).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use session::{Capability, Role, Session, UserDirectory};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest allowed price increase in a single update, in percent.
///
/// ## Business Reason
/// Protects customers from sudden price jumps. Decreases are unrestricted.
pub const MAX_PRICE_INCREASE_PERCENT: i64 = 10;

/// Maximum quantity of a single composition in one order.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// Enforced by the console, not by the store.
pub const MAX_ORDER_QUANTITY: i64 = 999;
