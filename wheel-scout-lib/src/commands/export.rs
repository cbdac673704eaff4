use super::Host;
use crate::Result;
use crate::artifacts::{Catalog, write_atomically};
use crate::reports::{Stats, generate_csv, generate_stats};
use camino::Utf8PathBuf;
use chrono::Utc;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct CsvArgs {
    /// Catalog written by `scan`
    #[arg(long, value_name = "PATH", default_value = "data/wheels.json")]
    pub input: Utf8PathBuf,

    /// Where to write the CSV file
    #[arg(long, value_name = "PATH", default_value = "data/wheels.csv")]
    pub output: Utf8PathBuf,
}

#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Catalog written by `scan`
    #[arg(long, value_name = "PATH", default_value = "data/wheels.json")]
    pub input: Utf8PathBuf,

    /// Where to write the statistics file
    #[arg(long, value_name = "PATH", default_value = "data/stats.json")]
    pub output: Utf8PathBuf,
}

pub fn export_csv<H: Host>(host: &mut H, args: &CsvArgs) -> Result<()> {
    let catalog = Catalog::load(&args.input)?;

    let mut csv_output = Vec::new();
    let rows = generate_csv(&catalog, &mut csv_output)?;
    write_atomically(&args.output, &csv_output)?;

    let _ = writeln!(host.output(), "Generated CSV with {rows} wheel entries");
    Ok(())
}

pub fn export_stats<H: Host>(host: &mut H, args: &StatsArgs) -> Result<()> {
    let catalog = Catalog::load(&args.input)?;
    let stats = Stats::compute(&catalog, Utc::now());

    let mut json_output = String::new();
    generate_stats(&stats, &mut json_output)?;
    write_atomically(&args.output, json_output.as_bytes())?;

    let _ = writeln!(
        host.output(),
        "Generated stats: {} wheels from {} sources",
        stats.total_wheels,
        stats.total_sources
    );
    Ok(())
}
