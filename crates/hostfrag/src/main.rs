//! hostfrag
//!
//! Dynamic inventory script: assembles JSON group and host fragments into an
//! inventory document on stdout. Logs and errors go to stderr.

use std::io::{self, Write};

use color_eyre::Result;
use hostfrag_inventory::{DirectoryStore, InventoryBuilder};
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

mod cli;
mod config;

use cli::Args;
use config::Config;

fn main() -> Result<()> {
    color_eyre::install()?;

    let parsed = match Args::parse_lenient(std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(e) => e.exit(),
    };
    let args = parsed.args;

    let mut config = Config::resolve(args.config.as_deref())?;
    args.apply(&mut config);

    init_tracing(&config.log.level);

    if let Some(reason) = parsed.rejected {
        warn!(%reason, "unrecognized arguments, listing full inventory");
    }

    let query = args.query();
    let builder = InventoryBuilder::new(DirectoryStore::new(config.layout));
    debug!(?query, layout = ?builder.store().layout(), "answering inventory query");

    let output = builder.answer(&query).inspect_err(|e| {
        error!(error = %e, path = ?e.path(), "inventory assembly failed");
    })?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
