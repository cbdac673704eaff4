//! Reports derived from a catalog
//!
//! Three generators consume a [`Catalog`](crate::artifacts::Catalog), the sole contract
//! between discovery and reporting:
//! - **CSV**: one row per wheel, with a synthesized installation command
//! - **Stats**: totals, per-source-type tallies, and interpreter/platform frequency tables
//! - **Console**: a human-readable summary of every source and its files
//!
//! Installation commands and per-file descriptions are shared through the `common` module.

mod common;
mod console;
mod csv;
mod stats;

pub use console::{ConsoleOptions, generate as generate_console};
pub use csv::generate as generate_csv;
pub use stats::{Stats, generate as generate_stats};
