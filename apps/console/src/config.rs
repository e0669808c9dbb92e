//! # Console Configuration
//!
//! Settings loaded once at startup and read-only afterwards.
//!
//! ## Configuration Sources (later overrides earlier)
//! 1. Defaults (this file)
//! 2. `greenhouse.toml` in the working directory (if present)
//! 3. File given with `--config <file>` (must exist)
//! 4. Environment variables (`GREENHOUSE_*`, e.g. `GREENHOUSE_DATABASE_PATH`)
//! 5. Command line flags (`--db`, `--no-seed`), applied by the caller
//!
//! ## Example `greenhouse.toml`
//! ```toml
//! database_path = "/var/lib/greenhouse/greenhouse.db"
//! log_filter = "info,sqlx=warn"
//! currency_symbol = "₴"
//! seed_demo_data = false
//! ```

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConsoleResult;
use greenhouse_core::Money;

/// Base name of the optional configuration file in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "greenhouse";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "GREENHOUSE";
/// Log filter used when neither `RUST_LOG` nor the configuration sets one.
pub const DEFAULT_LOG_FILTER: &str = "warn,greenhouse=info,sqlx=warn";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite database file.
    /// Default: platform data directory, file `greenhouse.db`
    pub database_path: PathBuf,

    /// `tracing` filter directive (ignored when `RUST_LOG` is set)
    pub log_filter: String,

    /// Currency symbol for display
    pub currency_symbol: String,

    /// Fill an empty store with the demo catalog on startup
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    /// ## Default Values
    /// - Database: platform data dir (see [`default_database_path`])
    /// - Logging: `warn,greenhouse=info,sqlx=warn`
    /// - Currency: `$`
    /// - Demo data: seeded
    fn default() -> Self {
        AppConfig {
            database_path: default_database_path(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            currency_symbol: "$".to_string(),
            seed_demo_data: true,
        }
    }
}

impl AppConfig {
    /// Loads configuration from files and environment.
    ///
    /// ## Returns
    /// * `Ok(config)` - Merged configuration
    /// * `Err(ConsoleError::Config)` - `path` missing or any source malformed
    pub fn load(path: Option<&Path>) -> ConsoleResult<Self> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false));

        if let Some(config_path) = path {
            let name = config_path.to_string_lossy();
            builder = builder.add_source(File::new(&name, FileFormat::Toml).required(true));
        }

        let config = builder
            .add_source(Environment::with_prefix(CONFIG_ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        Ok(config)
    }

    /// Formats an amount with the configured currency symbol.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_money(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        format!(
            "{}{}{}.{:02}",
            if amount.cents() < 0 { "-" } else { "" },
            self.currency_symbol,
            amount.dollars().abs(),
            amount.cents_part()
        )
    }
}

/// Determines the default database file location.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.greenhouse.console/greenhouse.db`
/// - **Windows**: `%APPDATA%\greenhouse\console\data\greenhouse.db`
/// - **Linux**: `~/.local/share/console/greenhouse.db`
///
/// Falls back to `./greenhouse.db` when no home directory is known.
pub fn default_database_path() -> PathBuf {
    ProjectDirs::from("com", "greenhouse", "console")
        .map(|dirs| dirs.data_dir().join("greenhouse.db"))
        .unwrap_or_else(|| PathBuf::from("greenhouse.db"))
}

/// Creates the directory that will hold the database file.
pub fn ensure_parent_dir(db_path: &Path) -> ConsoleResult<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert!(config.seed_demo_data);
        assert!(config.database_path.ends_with("greenhouse.db"));
    }

    #[test]
    fn test_format_money() {
        let config = AppConfig::default();
        assert_eq!(config.format_money(Money::from_cents(1234)), "$12.34");
        assert_eq!(config.format_money(Money::from_cents(5)), "$0.05");
        assert_eq!(config.format_money(Money::zero()), "$0.00");
        assert_eq!(config.format_money(Money::from_cents(-1234)), "-$12.34");

        let hryvnia = AppConfig {
            currency_symbol: "₴".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(hryvnia.format_money(Money::from_cents(1490)), "₴14.90");
    }

    #[test]
    fn test_load_explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "database_path = \"/tmp/flowers.db\"").unwrap();
        writeln!(file, "seed_demo_data = false").unwrap();
        drop(file);

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/flowers.db"));
        assert!(!config.seed_demo_data);
        // Untouched fields keep their defaults
        assert_eq!(config.currency_symbol, "$");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_ensure_parent_dir_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("a").join("b").join("greenhouse.db");

        ensure_parent_dir(&db_path).unwrap();
        assert!(db_path.parent().unwrap().is_dir());

        // Bare file names need no directory
        ensure_parent_dir(Path::new("greenhouse.db")).unwrap();
    }
}
