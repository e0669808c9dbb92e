//! # Error Types
//!
//! Domain-specific error types for greenhouse-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  greenhouse-core errors (this file)                                    │
//! │  ├── CoreError        - Business rules, sessions                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  greenhouse-db errors (separate crate)                                 │
//! │  └── DbError          - Store failures; wraps CoreError as Rejected    │
//! │                                                                         │
//! │  Console errors (in app)                                               │
//! │  └── ConsoleError     - Turned into a plain message for the user       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ConsoleError → screen   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A price update would raise the price by more than the allowed cap.
    ///
    /// ## User Workflow
    /// ```text
    /// Current price: $10.00
    ///      │
    ///      ▼
    /// Admin enters $11.01
    ///      │
    ///      ▼
    /// PriceIncreaseTooLarge { current_cents: 1000, proposed_cents: 1101, max_percent: 10 }
    ///      │
    ///      ▼
    /// Console shows: "Price increase cannot exceed 10%"
    /// ```
    #[error("Price increase cannot exceed {max_percent}% (current {current_cents} cents, proposed {proposed_cents} cents)")]
    PriceIncreaseTooLarge {
        current_cents: i64,
        proposed_cents: i64,
        max_percent: i64,
    },

    /// Role name is not one of the known roles.
    #[error("Unknown role: {0}")]
    InvalidRole(String),

    /// Username is already registered.
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Username/password pair did not match.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid date, malformed amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
