//! Command-line arguments and mode selection

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;
use hostfrag_inventory::Query;

use crate::config::Config;

/// Dynamic inventory from a tree of JSON group and host fragments
#[derive(Parser, Debug, Default, PartialEq)]
#[command(name = "hostfrag", version, long_about = None)]
pub struct Args {
    /// Print the variables of a single host and exit
    #[arg(long, value_name = "NAME", conflicts_with = "list")]
    pub host: Option<String>,

    /// Print the full inventory (the default)
    #[arg(long)]
    pub list: bool,

    /// Base inventory directory
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Environment directory below the base directory
    #[arg(long, value_name = "NAME")]
    pub environment: Option<String>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level, overridden by RUST_LOG
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

/// Outcome of lenient argument parsing
#[derive(Debug)]
pub struct Parsed {
    /// Arguments to run with
    pub args: Args,
    /// Why the given arguments were replaced by defaults, if they were
    pub rejected: Option<String>,
}

impl Args {
    /// Parse arguments, falling back to a full listing on unrecognized input
    ///
    /// Inventory consumers may call with argument shapes this tool does not
    /// know; those run the default listing instead of failing.
    ///
    /// # Errors
    /// Returns the clap error for `--help` and `--version` so the caller can
    /// print it and exit.
    pub fn parse_lenient<I, T>(itr: I) -> Result<Parsed, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Self::try_parse_from(itr) {
            Ok(args) => Ok(Parsed {
                args,
                rejected: None,
            }),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                Err(e)
            }
            Err(e) => Ok(Parsed {
                args: Args::default(),
                rejected: Some(e.kind().as_str().unwrap_or("unrecognized arguments").to_string()),
            }),
        }
    }

    /// Query selected by the arguments
    #[must_use]
    pub fn query(&self) -> Query {
        match &self.host {
            Some(name) => Query::Host(name.clone()),
            None => Query::List,
        }
    }

    /// Apply command-line overrides on top of loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.data_dir {
            config.layout.data_dir.clone_from(dir);
        }
        if let Some(env) = &self.environment {
            config.layout.environment.clone_from(env);
        }
        if let Some(level) = &self.log_level {
            config.log.level.clone_from(level);
        }
    }
}
