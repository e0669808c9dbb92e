//! Command line flags. Flags override the loaded configuration.

use clap::Parser;
use std::path::PathBuf;

use crate::config::AppConfig;

/// Flower greenhouse console.
#[derive(Debug, Parser)]
#[command(name = "greenhouse", version, about)]
pub struct Cli {
    /// SQLite database file (overrides `database_path`)
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Extra TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Do not fill an empty store with demo data
    #[arg(long)]
    pub no_seed: bool,
}

impl Cli {
    /// Applies flags on top of `config`.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(db) = &self.db {
            config.database_path = db.clone();
        }
        if self.no_seed {
            config.seed_demo_data = false;
        }
    }
}
