//! Command dispatch logic for wheel-scout

use super::common::{ColorMode, LogLevel, init_logging};
use super::{CsvArgs, InitArgs, ScanArgs, StatsArgs, export_csv, export_stats, init_config, scan};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "wheel-scout", version, author, long_about = None)]
#[command(about = "Discover and catalog published Python wheels")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    log_level: LogLevel,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto", global = true)]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe the configured sources and write a catalog of everything found
    Scan(Box<ScanArgs>),
    /// Flatten a catalog's wheels into a CSV file
    Csv(CsvArgs),
    /// Compute aggregate statistics over a catalog
    Stats(StatsArgs),
    /// Generate a default configuration file
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Errors
///
/// Returns an error if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = Cli::parse_from(args);
    init_logging(cli.log_level);

    match &cli.command {
        Command::Scan(scan_args) => scan(host, scan_args, cli.color).await,
        Command::Csv(csv_args) => export_csv(host, csv_args),
        Command::Stats(stats_args) => export_stats(host, stats_args),
        Command::Init(init_args) => init_config(host, init_args),
    }
}
