use super::Host;
use super::common::ColorMode;
use super::config::Config;
use crate::Result;
use crate::artifacts::Catalog;
use crate::reports::{ConsoleOptions, generate_console};
use crate::sources::{Aggregator, ScanPlan};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
#[expect(clippy::struct_excessive_bools, reason = "mirrors independent command-line switches")]
pub struct ScanArgs {
    /// Path to configuration file (default is `wheel-scout.toml` in the current directory)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Root of the wheel index server
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Where to write the catalog
    #[arg(long, short = 'o', value_name = "PATH", default_value = "data/wheels.json")]
    pub output: Utf8PathBuf,

    /// Scan only this commit
    #[arg(long, value_name = "HASH")]
    pub commit: Option<String>,

    /// Scan wheels attached to GitHub releases
    #[arg(long, help_heading = "Sources")]
    pub github_releases: bool,

    /// Scan nightly wheels
    #[arg(long, help_heading = "Sources")]
    pub nightly: bool,

    /// Scan the index server for each version published on the registry
    #[arg(long, help_heading = "Sources")]
    pub release_versions: bool,

    /// Scan commits, releases, nightly wheels, and release versions
    #[arg(long, help_heading = "Sources")]
    pub all_sources: bool,

    /// Use package-based discovery for servers laid out like a plain package index
    #[arg(long, help_heading = "Sources")]
    pub legacy_mode: bool,

    /// Discover commits through the GitHub API instead of the index listing
    #[arg(long, help_heading = "Sources")]
    pub use_github: bool,

    /// Keep only wheel files, dropping source archives and unrecognized files
    #[arg(long)]
    pub wheels_only: bool,

    /// Show only the latest version of each package in legacy mode
    #[arg(long)]
    pub latest_only: bool,

    /// Maximum number of commits to scan
    #[arg(long, value_name = "N")]
    pub max_commits: Option<usize>,

    /// Maximum number of releases to scan
    #[arg(long, value_name = "N")]
    pub max_releases: Option<usize>,

    /// Maximum number of registry versions to scan
    #[arg(long, value_name = "N")]
    pub max_versions: Option<usize>,

    /// Show URLs and sizes in the summary
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,
}

impl ScanArgs {
    fn plan(&self, config: &Config) -> ScanPlan {
        ScanPlan {
            legacy_mode: self.legacy_mode,
            github_releases: self.github_releases,
            nightly: self.nightly,
            release_versions: self.release_versions,
            all_sources: self.all_sources,
            commit: self.commit.clone(),
            use_github: self.use_github,
            wheels_only: self.wheels_only,
            max_commits: self.max_commits.unwrap_or(config.max_commits),
            max_releases: self.max_releases.unwrap_or(config.max_releases),
            max_versions: self.max_versions.unwrap_or(config.max_versions),
        }
    }
}

pub async fn scan<H: Host>(host: &mut H, args: &ScanArgs, color: ColorMode) -> Result<()> {
    let mut config = Config::load(Utf8Path::new("."), args.config.as_ref())?;
    if let Some(base_url) = &args.base_url {
        config.base_url.clone_from(base_url);
    }

    let plan = args.plan(&config);
    config.max_commits = plan.max_commits;
    config.max_releases = plan.max_releases;
    config.max_versions = plan.max_versions;
    config.validate()?;

    let aggregator = Aggregator::new(config.probe_settings()?, args.github_token.as_deref())?;
    let results = aggregator.run(&plan).await?;
    if results.is_empty() {
        let _ = writeln!(host.error(), "No artifacts found");
    }

    let catalog = Catalog::new(Utc::now(), aggregator.settings().base_url.as_str(), plan.mode(), results);
    catalog.save(&args.output)?;

    let options = ConsoleOptions {
        verbose: args.verbose,
        latest_only: args.latest_only,
        use_colors: color.use_colors(&*host),
    };

    let mut summary = String::new();
    generate_console(&catalog, &options, &mut summary)?;
    let _ = write!(host.output(), "{summary}");
    let _ = writeln!(host.output(), "\nResults saved to {}", args.output);

    Ok(())
}
