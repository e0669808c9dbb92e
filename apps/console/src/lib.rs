//! # Greenhouse Console Library
//!
//! Terminal front end for the flower greenhouse.
//!
//! ## Module Organization
//! ```text
//! greenhouse_console/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── cli.rs          ◄─── Command line flags
//! ├── config.rs       ◄─── AppConfig (files, env, defaults)
//! ├── error.rs        ◄─── ConsoleError, user-facing messages
//! ├── io.rs           ◄─── InputSource / OutputSink
//! └── console/
//!     ├── mod.rs      ◄─── Start screen, role menus, prompts
//!     ├── catalog.rs  ◄─── Flowers and compositions
//!     ├── orders.rs   ◄─── Create order, orders by date, my orders
//!     └── reports.rs  ◄─── Revenue, urgency, flower usage, sales
//! ```

pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod io;

pub use cli::Cli;
pub use crate::config::AppConfig;
pub use console::Console;
pub use error::{ConsoleError, ConsoleResult};

use tracing::info;
use tracing_subscriber::EnvFilter;

use greenhouse_core::UserDirectory;
use greenhouse_db::{seed_demo_data, Database, DbConfig};
use crate::io::{StdinInput, StdoutOutput};

/// Runs the console on the terminal.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Console Startup                                   │
/// │                                                                         │
/// │  1. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults, greenhouse.toml, --config, GREENHOUSE_* env, flags      │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • RUST_LOG, else log_filter; written to stderr                      │
/// │                                                                         │
/// │  3. Open Database ────────────────────────────────────────────────────► │
/// │     • create data directory, SQLite WAL, run migrations                 │
/// │     • seed demo data into an empty store (unless disabled)              │
/// │                                                                         │
/// │  4. Run Menus ────────────────────────────────────────────────────────► │
/// │     • stdin / stdout until Exit or end of input                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> ConsoleResult<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);

    init_tracing(&config.log_filter);
    info!(db_path = ?config.database_path, "Starting greenhouse console");

    crate::config::ensure_parent_dir(&config.database_path)?;
    let db = Database::open(DbConfig::new(config.database_path.clone())).await?;
    info!("Database connected and migrations applied");

    if config.seed_demo_data {
        let report = seed_demo_data(&db).await?;
        if !report.is_empty() {
            info!(?report, "Empty store filled with demo data");
        }
    }

    let users = UserDirectory::with_default_users()?;

    let mut console = Console::new(db, users, config, StdinInput, StdoutOutput);
    let outcome = console.run().await;
    console.shutdown().await;
    outcome
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=greenhouse=trace` - Show trace for greenhouse crates only
/// - Default: `filter` from configuration
fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
