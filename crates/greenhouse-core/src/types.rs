//! # Domain Types
//!
//! Core domain types used throughout the greenhouse.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │    Flower       │   │   Composition    │   │    Customer     │      │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │      │
//! │  │  id             │◄──│  id              │   │  id             │      │
//! │  │  name, variety  │ N:M  name            │   │  name           │      │
//! │  │  price (Money)  │   │  description     │   │  phone, email   │      │
//! │  └─────────────────┘   └────────▲─────────┘   └────────▲────────┘      │
//! │                                 │                      │               │
//! │                        ┌────────┴──────────────────────┴──┐            │
//! │                        │             Order                │            │
//! │                        │  order_date, fulfillment_date    │            │
//! │                        │  quantity, urgency_rate          │            │
//! │                        └────────────────┬─────────────────┘            │
//! │                                         │ 1:1 (store-derived)          │
//! │                        ┌────────────────▼─────────────────┐            │
//! │                        │          OrderSummary            │            │
//! │                        │  base_price + urgency_fee        │            │
//! │                        │  = total_price                   │            │
//! │                        └──────────────────────────────────┘            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! All identifiers are positive integers assigned by the store.
//! Dates are ISO `YYYY-MM-DD` text, compared lexicographically by the store.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Urgency Rate
// =============================================================================

/// Urgency surcharge represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 2500 bps = 25% surcharge on the order's base price.
///
/// Two different rates can share an integer percent (1050 and 1075 bps are
/// both "10%"); they are still distinct rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct UrgencyRate(u32);

impl UrgencyRate {
    /// Creates an urgency rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        UrgencyRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Integer percent, truncated (1075 bps → 10).
    #[inline]
    pub const fn percent(&self) -> u32 {
        self.0 / 100
    }

    /// Returns the rate as a fraction (for display only).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10000.0
    }

    /// No surcharge.
    #[inline]
    pub const fn zero() -> Self {
        UrgencyRate(0)
    }
}

impl Default for UrgencyRate {
    fn default() -> Self {
        UrgencyRate::zero()
    }
}

impl fmt::Display for UrgencyRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
        }
    }
}

// =============================================================================
// Flower
// =============================================================================

/// A flower grown in the greenhouse.
///
/// Only `price` is mutable, and only through the guarded price update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Flower {
    pub id: i64,
    pub name: String,
    pub variety: String,
    /// Price per stem, always positive.
    pub price: Money,
}

// =============================================================================
// Composition
// =============================================================================

/// A named bouquet recipe: a fixed set of flower-quantity pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Composition {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// One flower line of a composition, joined with the flower's details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CompositionLine {
    pub flower_id: i64,
    pub flower_name: String,
    pub variety: String,
    /// Stems of this flower per unit of the composition.
    pub quantity: i64,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer of the greenhouse. Read-only from the application's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
}

// =============================================================================
// Order
// =============================================================================

/// An order for some quantity of one composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub composition_id: i64,
    /// `YYYY-MM-DD` as entered; not validated by the store.
    pub order_date: String,
    pub fulfillment_date: String,
    pub quantity: i64,
    /// Inserted as zero; the store derives the real rate from the lead time.
    pub urgency_rate: UrgencyRate,
}

/// Input for creating an order.
///
/// No validation happens here: the store enforces foreign keys and
/// `Quantity > 0`, everything else is accepted as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_id: i64,
    pub composition_id: i64,
    pub order_date: String,
    pub fulfillment_date: String,
    pub quantity: i64,
}

/// Store-derived pricing of one order.
///
/// ## Invariant
/// `total_price == base_price + urgency_fee`, maintained by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderSummary {
    pub order_id: i64,
    pub base_price: Money,
    pub urgency_fee: Money,
    pub total_price: Money,
}

// =============================================================================
// Report Types
// =============================================================================

/// Orders sharing one exact urgency rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencyBucket {
    /// The rate as an integer percent (truncated).
    pub percent: u32,
    pub order_count: i64,
}

/// Sales of one composition across all orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionSales {
    pub order_count: i64,
    pub revenue: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
