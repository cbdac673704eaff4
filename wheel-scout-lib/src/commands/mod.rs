//! Command-line interface and orchestration for wheel-scout
//!
//! # Implementation Model
//!
//! ## Commands
//!
//! - **scan**: Load the configuration, run the selected probes through the
//!   [`Aggregator`](crate::sources::Aggregator), save the catalog, and print a summary
//! - **csv**: Flatten a saved catalog into one CSV row per wheel
//! - **stats**: Compute aggregate statistics over a saved catalog
//! - **init**: Write the default configuration file
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments with clap, sets up logging, and
//! routes to the command handler. All output goes through the [`Host`] so commands can
//! be exercised in tests without touching the process streams.
//!
//! Configuration is a TOML file (`wheel-scout.toml`) whose defaults are embedded from
//! `default_config.toml`. Individual values can be overridden on the command line.

mod common;
mod config;
mod export;
mod host;
mod init;
mod run;
mod scan;

#[cfg(debug_assertions)]
pub use config::Config;

pub use export::{CsvArgs, StatsArgs, export_csv, export_stats};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
pub use scan::{ScanArgs, scan};
