use super::{CommitDiscovery, CommitProbe, Fetcher, GithubClient, LegacyProbe, NightlyProbe, ProbeSettings, PypiClient, ReleaseProbe, VersionProbe};
use crate::Result;
use crate::artifacts::{ArtifactRecord, Provenance, ResultSet, ScanMode};
use ohno::app_err;

const LOG_TARGET: &str = "aggregator";

/// Which probes run, and how much each may fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
#[expect(clippy::struct_excessive_bools, reason = "mirrors independent command-line switches")]
pub struct ScanPlan {
    pub legacy_mode: bool,
    pub github_releases: bool,
    pub nightly: bool,
    pub release_versions: bool,
    pub all_sources: bool,

    /// Probe only this commit instead of discovering commits.
    pub commit: Option<String>,

    /// Discover commits through GitHub rather than the index listing.
    pub use_github: bool,

    /// Drop everything that is not a wheel.
    pub wheels_only: bool,

    pub max_commits: usize,
    pub max_releases: usize,
    pub max_versions: usize,
}

impl Default for ScanPlan {
    fn default() -> Self {
        Self {
            legacy_mode: false,
            github_releases: false,
            nightly: false,
            release_versions: false,
            all_sources: false,
            commit: None,
            use_github: false,
            wheels_only: false,
            max_commits: 50,
            max_releases: 20,
            max_versions: 20,
        }
    }
}

impl ScanPlan {
    #[must_use]
    pub const fn runs_releases(&self) -> bool {
        self.github_releases || self.all_sources
    }

    #[must_use]
    pub const fn runs_nightly(&self) -> bool {
        self.nightly || self.all_sources
    }

    #[must_use]
    pub const fn runs_versions(&self) -> bool {
        self.release_versions || self.all_sources
    }

    /// Commits are scanned by default, unless legacy discovery or another single source was
    /// asked for. Asking for all sources always includes them.
    #[must_use]
    pub const fn runs_commits(&self) -> bool {
        (!self.legacy_mode && !(self.github_releases || self.nightly)) || self.all_sources
    }

    /// How the resulting catalog describes this scan.
    #[must_use]
    pub const fn mode(&self) -> ScanMode {
        if self.commit.is_some() {
            ScanMode::SingleCommit
        } else if self.github_releases && !self.all_sources {
            ScanMode::GithubReleases
        } else if self.nightly && !self.all_sources {
            ScanMode::Nightly
        } else if self.legacy_mode {
            ScanMode::Legacy
        } else {
            ScanMode::MultiSource
        }
    }
}

/// Runs the probes a [`ScanPlan`] selects and merges their output into one [`ResultSet`].
#[derive(Debug)]
pub struct Aggregator {
    settings: ProbeSettings,
    fetcher: Fetcher,
    github: GithubClient,
    pypi: PypiClient,
}

impl Aggregator {
    /// Create an aggregator, sending `github_token` with GitHub API requests when given.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP clients cannot be created
    pub fn new(settings: ProbeSettings, github_token: Option<&str>) -> Result<Self> {
        let fetcher = Fetcher::new(&settings.user_agent, settings.request_timeout)?;
        let github = GithubClient::new(&settings, github_token)?;
        let pypi = PypiClient::new(fetcher.clone(), &settings);

        Ok(Self {
            settings,
            fetcher,
            github,
            pypi,
        })
    }

    #[must_use]
    pub const fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    /// Run every selected probe in turn: legacy, releases, nightly, versions, then commits.
    ///
    /// # Errors
    ///
    /// Returns an error if legacy discovery finds no packages at all. Every other failure only
    /// reduces what is found.
    pub async fn run(&self, plan: &ScanPlan) -> Result<ResultSet> {
        let mut results = ResultSet::new();

        if plan.legacy_mode {
            self.scan_legacy(plan, &mut results).await?;
        }

        if plan.runs_releases() {
            for (tag, records) in ReleaseProbe::new(&self.github).scan(plan.max_releases).await {
                insert(&mut results, &Provenance::GithubRelease(tag), records, plan.wheels_only);
            }
        }

        if plan.runs_nightly() {
            let records = NightlyProbe::new(&self.fetcher, &self.settings).scan().await;
            insert(&mut results, &Provenance::Nightly, records, plan.wheels_only);
        }

        if plan.runs_versions() {
            let versions = self.pypi.versions(&self.settings.package_name, plan.max_versions).await;
            let probe = VersionProbe::new(&self.fetcher, &self.settings);
            for version in versions {
                let records = probe.scan(&version).await;
                insert(&mut results, &Provenance::ReleaseVersion(version), records, plan.wheels_only);
            }
        }

        if plan.runs_commits() {
            self.scan_commits(plan, &mut results).await;
        }

        log::info!(
            target: LOG_TARGET,
            "Collected {} files ({} wheels) from {} sources",
            results.total_files(),
            results.total_wheels(),
            results.len()
        );

        Ok(results)
    }

    async fn scan_legacy(&self, plan: &ScanPlan, results: &mut ResultSet) -> Result<()> {
        let probe = LegacyProbe::new(&self.fetcher, &self.settings);

        let packages = probe.discover_packages().await;
        if packages.is_empty() {
            return Err(app_err!("no packages found at {}", self.settings.base_url));
        }

        log::info!(target: LOG_TARGET, "Found {} packages: {}", packages.len(), packages.join(", "));

        for package in packages {
            let records = probe.scan(&package).await;
            insert(results, &Provenance::Package(package), records, plan.wheels_only);
        }

        Ok(())
    }

    async fn scan_commits(&self, plan: &ScanPlan, results: &mut ResultSet) {
        let probe = CommitProbe::new(&self.fetcher, &self.github, &self.settings);

        let mut discovery = if let Some(commit) = &plan.commit {
            let mut discovery = CommitDiscovery::default();
            discovery.commits.push(commit.clone());
            discovery
        } else if plan.use_github {
            probe.discover_from_github(plan.max_commits).await
        } else {
            probe.discover(plan.max_commits).await
        };

        if discovery.commits.is_empty() {
            log::warn!(target: LOG_TARGET, "No commits found");
            return;
        }

        let total = discovery.commits.len();
        for (i, commit) in discovery.commits.iter().enumerate() {
            log::info!(target: LOG_TARGET, "Scanning commit {}/{total}: {}", i + 1, commit.get(..8).unwrap_or(commit));

            let records = match discovery.scanned.remove(commit) {
                Some(records) => records,
                None => probe.scan(commit).await,
            };

            insert(results, &Provenance::Commit(commit.clone()), records, plan.wheels_only);
        }
    }
}

/// Store `records` under the key for `provenance`, unless nothing is left after filtering.
fn insert(results: &mut ResultSet, provenance: &Provenance, mut records: Vec<ArtifactRecord>, wheels_only: bool) {
    if wheels_only {
        records.retain(ArtifactRecord::is_wheel);
    }

    if records.is_empty() {
        log::debug!(target: LOG_TARGET, "Nothing to record for {provenance}");
        return;
    }

    log::debug!(target: LOG_TARGET, "Recording {} files for {provenance}", records.len());
    results.insert(provenance.key(), records);
}
