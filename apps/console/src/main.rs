//! # Greenhouse Console Entry Point
//!
//! ## Startup Sequence
//! 1. Parse command line flags
//! 2. Load configuration and initialize logging
//! 3. Open the database (migrations, demo data)
//! 4. Run the menus until Exit or end of input
//!
//! The actual setup lives in the library for testability.

use anyhow::Context;
use clap::Parser;
use greenhouse_console::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    greenhouse_console::run(cli)
        .await
        .context("greenhouse console stopped with an error")?;
    Ok(())
}
