//! # Validation Module
//!
//! Business rules and input validation for the greenhouse.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Console                                                       │
//! │  ├── Numeric parsing, re-prompt on garbage                             │
//! │  └── Hints (e.g. "date should look like 2025-04-21")                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  └── The price cap: a price may rise by at most 10% per update         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (Price > 0), CHECK (Quantity > 0)                           │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use greenhouse_core::money::Money;
//! use greenhouse_core::validation::{check_price_change, validate_quantity};
//!
//! check_price_change(Money::from_cents(1000), Money::from_cents(900)).unwrap();
//! validate_quantity(5).unwrap();
//! ```

use chrono::NaiveDate;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::{MAX_ORDER_QUANTITY, MAX_PRICE_INCREASE_PERCENT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Price Cap
// =============================================================================

/// Checks a proposed flower price against the current persisted price.
///
/// ## Rules
/// - The new price must be positive
/// - It may not exceed the current price by more than 10%
/// - Decreases of any size are allowed
///
/// ## Exact Arithmetic
/// `proposed > current × 1.1` is evaluated as
/// `proposed × 100 > current × 110` on integer cents, so $10.00 → $11.00 is
/// accepted and $10.00 → $11.01 is not, with no float rounding involved.
///
/// ## Example
/// ```rust
/// use greenhouse_core::money::Money;
/// use greenhouse_core::validation::check_price_change;
///
/// let current = Money::from_cents(1100);
/// assert!(check_price_change(current, Money::from_cents(1210)).is_ok());
/// assert!(check_price_change(current, Money::from_cents(1211)).is_err());
/// assert!(check_price_change(current, Money::from_cents(0)).is_err());
/// ```
pub fn check_price_change(current: Money, proposed: Money) -> CoreResult<()> {
    if !proposed.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        }
        .into());
    }

    let limit = current.cents() as i128 * (100 + MAX_PRICE_INCREASE_PERCENT) as i128;
    if proposed.cents() as i128 * 100 > limit {
        return Err(CoreError::PriceIncreaseTooLarge {
            current_cents: current.cents(),
            proposed_cents: proposed.cents(),
            max_percent: MAX_PRICE_INCREASE_PERCENT,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an order quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ORDER_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ORDER_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ORDER_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Checks that a date is a real calendar date in `YYYY-MM-DD` form.
///
/// The store accepts any text; the console only uses this to warn the
/// operator, since range queries compare dates as strings and only
/// zero-padded ISO dates sort correctly.
///
/// ## Example
/// ```rust
/// use greenhouse_core::validation::validate_date_text;
///
/// assert!(validate_date_text("order date", "2025-04-21").is_ok());
/// assert!(validate_date_text("order date", "2025-4-21").is_err());
/// assert!(validate_date_text("order date", "2025-02-30").is_err());
/// ```
pub fn validate_date_text(field: &str, text: &str) -> ValidationResult<NaiveDate> {
    let text = text.trim();

    if text.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    // chrono accepts "2025-4-21"; lexicographic comparison does not
    if text.len() != 10 {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        });
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

// =============================================================================
// Account Validators
// =============================================================================

/// Validates a username for registration.
///
/// ## Rules
/// - Not empty after trimming
/// - At most 50 characters
/// - No whitespace inside
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 50,
        });
    }

    if username.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must not contain spaces".to_string(),
        });
    }

    Ok(())
}

/// Validates a password for registration.
///
/// ## Rules
/// - At least 6 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() < 6 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_cap_boundary() {
        let current = Money::from_cents(1000);

        assert!(check_price_change(current, Money::from_cents(1100)).is_ok());
        assert!(matches!(
            check_price_change(current, Money::from_cents(1101)),
            Err(CoreError::PriceIncreaseTooLarge {
                current_cents: 1000,
                proposed_cents: 1101,
                max_percent: 10
            })
        ));
    }

    #[test]
    fn test_price_cap_allows_decreases() {
        let current = Money::from_cents(1100);
        assert!(check_price_change(current, Money::from_cents(1)).is_ok());
        assert!(check_price_change(current, current).is_ok());
    }

    #[test]
    fn test_price_must_be_positive() {
        let current = Money::from_cents(1000);
        assert!(matches!(
            check_price_change(current, Money::zero()),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
        assert!(check_price_change(current, Money::from_cents(-5)).is_err());
    }

    #[test]
    fn test_price_cap_on_odd_amounts() {
        // $0.99 × 1.1 = $1.089 → $1.08 is fine, $1.09 is over
        let current = Money::from_cents(99);
        assert!(check_price_change(current, Money::from_cents(108)).is_ok());
        assert!(check_price_change(current, Money::from_cents(109)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_date_text() {
        assert_eq!(
            validate_date_text("order date", " 2025-04-21 ").unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 21).unwrap()
        );
        assert!(validate_date_text("order date", "").is_err());
        assert!(validate_date_text("order date", "21.04.2025").is_err());
        assert!(validate_date_text("order date", "2025-4-1").is_err());
        assert!(validate_date_text("order date", "2025-13-01").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("florist").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("two words").is_err());
        assert!(validate_username(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password("abc").is_err());
    }
}
