//! # Session Module
//!
//! Users, roles, capabilities and the login session.
//!
//! ## Permission Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Role → Capability Table                             │
//! │                                                                         │
//! │  Capability            admin   user                                     │
//! │  ───────────────────   ─────   ────                                     │
//! │  view_flowers            ✓       ✓                                      │
//! │  update_flower_price     ✓                                              │
//! │  view_compositions       ✓       ✓                                      │
//! │  view_orders             ✓                                              │
//! │  view_own_orders                 ✓                                      │
//! │  create_order            ✓       ✓                                      │
//! │  view_reports            ✓                                              │
//! │                                                                         │
//! │  Logged out → no capabilities at all                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Credentials
//! Passwords are never kept in plain text. The directory stores an argon2
//! PHC string per user and verifies logins against it.
//!
//! ## Usage
//! ```rust
//! use greenhouse_core::session::{Capability, Session, UserDirectory};
//!
//! let users = UserDirectory::with_default_users().unwrap();
//! let mut session = Session::new();
//!
//! session.login(&users, "user", "user123").unwrap();
//! assert!(session.has_capability(Capability::CreateOrder));
//! assert!(!session.has_capability(Capability::ViewReports));
//! ```

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Role
// =============================================================================

/// The two roles a user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Capabilities granted by this role.
    pub const fn capabilities(&self) -> &'static [Capability] {
        match self {
            Role::Admin => &[
                Capability::ViewFlowers,
                Capability::UpdateFlowerPrice,
                Capability::ViewCompositions,
                Capability::ViewOrders,
                Capability::CreateOrder,
                Capability::ViewReports,
            ],
            Role::User => &[
                Capability::ViewFlowers,
                Capability::ViewCompositions,
                Capability::ViewOwnOrders,
                Capability::CreateOrder,
            ],
        }
    }

    pub fn grants(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Only the exact names `admin` and `user` are roles.
impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(CoreError::InvalidRole(other.to_string())),
        }
    }
}

// =============================================================================
// Capability
// =============================================================================

/// A named permission checked before every console action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ViewFlowers,
    UpdateFlowerPrice,
    ViewCompositions,
    ViewOrders,
    ViewOwnOrders,
    CreateOrder,
    ViewReports,
}

impl Capability {
    pub const ALL: [Capability; 7] = [
        Capability::ViewFlowers,
        Capability::UpdateFlowerPrice,
        Capability::ViewCompositions,
        Capability::ViewOrders,
        Capability::ViewOwnOrders,
        Capability::CreateOrder,
        Capability::ViewReports,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Capability::ViewFlowers => "view_flowers",
            Capability::UpdateFlowerPrice => "update_flower_price",
            Capability::ViewCompositions => "view_compositions",
            Capability::ViewOrders => "view_orders",
            Capability::ViewOwnOrders => "view_own_orders",
            Capability::CreateOrder => "create_order",
            Capability::ViewReports => "view_reports",
        }
    }

    /// Looks a capability up by its name; unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Capability> {
        Capability::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// User Directory
// =============================================================================

#[derive(Debug, Clone)]
struct UserRecord {
    password_hash: String,
    role: Role,
}

/// In-memory table of known users.
///
/// Registration only lives as long as the process; users are not persisted.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: HashMap<String, UserRecord>,
}

impl UserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory holding the two built-in accounts:
    /// `admin`/`admin123` (admin) and `user`/`user123` (user).
    pub fn with_default_users() -> CoreResult<Self> {
        let mut dir = Self::new();
        dir.register("admin", "admin123", Role::Admin)?;
        dir.register("user", "user123", Role::User)?;
        Ok(dir)
    }

    /// Adds a user. Fails if the username is already taken.
    pub fn register(&mut self, username: &str, password: &str, role: Role) -> CoreResult<()> {
        if self.users.contains_key(username) {
            return Err(CoreError::UserExists(username.to_string()));
        }

        let password_hash = hash_password(password)?;
        self.users.insert(
            username.to_string(),
            UserRecord {
                password_hash,
                role,
            },
        );
        Ok(())
    }

    /// Returns the user's role if the password matches.
    pub fn authenticate(&self, username: &str, password: &str) -> CoreResult<Role> {
        let record = self
            .users
            .get(username)
            .ok_or(CoreError::InvalidCredentials)?;

        if verify_password(password, &record.password_hash) {
            Ok(record.role)
        } else {
            Err(CoreError::InvalidCredentials)
        }
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn role_of(&self, username: &str) -> Option<Role> {
        self.users.get(username).map(|r| r.role)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

fn hash_password(password: &str) -> CoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CoreError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Session
// =============================================================================

/// The current login state of one console.
///
/// ## State Machine
/// ```text
///   LoggedOut ──login ok──► LoggedIn(user, role)
///       ▲                        │
///       └────────logout──────────┘
///
///   login failure always ends in LoggedOut
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    current: Option<(String, Role)>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts a login. Any previous login is dropped first.
    pub fn login(&mut self, users: &UserDirectory, username: &str, password: &str) -> CoreResult<()> {
        self.current = None;
        let role = users.authenticate(username, password)?;
        self.current = Some((username.to_string(), role));
        Ok(())
    }

    pub fn logout(&mut self) {
        self.current = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current.as_ref().map(|(name, _)| name.as_str())
    }

    pub fn current_role(&self) -> Option<Role> {
        self.current.as_ref().map(|(_, role)| *role)
    }

    /// True only when logged in with a role that grants `capability`.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.current_role()
            .map(|role| role.grants(capability))
            .unwrap_or(false)
    }

    /// Same as [`Session::has_capability`], by name. Unknown names are never granted.
    pub fn has_capability_named(&self, name: &str) -> bool {
        Capability::from_name(name)
            .map(|c| self.has_capability(c))
            .unwrap_or(false)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
