//! Content-addressed build directories, one per commit.

use super::{Fetcher, GithubClient, Listing, ProbeSettings, extract_links};
use crate::artifacts::{ArtifactRecord, Provenance};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use url::Url;

const LOG_TARGET: &str = "   commits";

/// A full, lowercase commit hash, optionally with the trailing slash of a directory link.
static COMMIT_LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new("^[a-f0-9]{40}/?$").expect("invalid regex"));

/// Commits known to have build directories, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct CommitDiscovery {
    pub commits: Vec<String>,

    /// Files already found while confirming commits, so they need not be fetched again.
    pub scanned: HashMap<String, Vec<ArtifactRecord>>,
}

impl CommitDiscovery {
    /// Append `commit` unless already present.
    fn push(&mut self, commit: String) -> bool {
        if self.commits.contains(&commit) {
            return false;
        }
        self.commits.push(commit);
        true
    }

    /// Drop everything past the first `max` commits.
    pub fn truncate(&mut self, max: usize) {
        for dropped in self.commits.drain(max.min(self.commits.len())..) {
            let _ = self.scanned.remove(&dropped);
        }
    }
}

#[derive(Debug)]
pub struct CommitProbe<'a> {
    fetcher: &'a Fetcher,
    github: &'a GithubClient,
    settings: &'a ProbeSettings,
}

impl<'a> CommitProbe<'a> {
    #[must_use]
    pub const fn new(fetcher: &'a Fetcher, github: &'a GithubClient, settings: &'a ProbeSettings) -> Self {
        Self { fetcher, github, settings }
    }

    /// Find at most `max_commits` commits with build directories.
    ///
    /// Commits are read from the index root. When the root lists fewer commits than the
    /// configured threshold, recent commits from GitHub are probed one by one and those
    /// whose directories hold files are appended. Probing stops as soon as `max_commits`
    /// commits are known.
    pub async fn discover(&self, max_commits: usize) -> CommitDiscovery {
        let mut discovery = CommitDiscovery::default();
        if max_commits == 0 {
            return discovery;
        }

        log::info!(target: LOG_TARGET, "Discovering commits from {}", self.settings.base_url);

        for commit in self.listed_commits().await {
            let _ = discovery.push(commit);
        }

        log::info!(target: LOG_TARGET, "Found {} commits on the index server", discovery.commits.len());

        if discovery.commits.len() > max_commits {
            log::info!(target: LOG_TARGET, "Limiting to the {max_commits} most recent commits");
            discovery.truncate(max_commits);
        }

        if discovery.commits.len() < self.settings.commit_fallback_threshold && discovery.commits.len() < max_commits {
            log::info!(target: LOG_TARGET, "Few commits listed, falling back to GitHub");

            let candidates = self.github.recent_commits(self.settings.fallback_probe_limit).await;
            self.confirm(candidates, &mut discovery, max_commits).await;

            log::info!(target: LOG_TARGET, "Total commits with files: {}", discovery.commits.len());
        }

        discovery
    }

    /// Find at most `max_commits` commits with build directories using only GitHub's commit list.
    pub async fn discover_from_github(&self, max_commits: usize) -> CommitDiscovery {
        let mut discovery = CommitDiscovery::default();
        if max_commits == 0 {
            return discovery;
        }

        let candidates = self.github.recent_commits(max_commits).await;
        self.confirm(candidates, &mut discovery, max_commits).await;
        discovery
    }

    /// Commit hashes linked from the index root, in page order.
    pub async fn listed_commits(&self) -> Vec<String> {
        let Some(root) = self.settings.index_url("") else {
            return Vec::new();
        };

        let Some(body) = self.fetcher.get_text(&root).await else {
            log::warn!(target: LOG_TARGET, "Could not fetch the root index");
            return Vec::new();
        };

        extract_links(&body)
            .into_iter()
            .filter(|link| COMMIT_LINK_REGEX.is_match(link))
            .map(|link| link.trim_end_matches('/').to_string())
            .collect()
    }

    /// Keep the candidates whose build directories hold at least one file, until `max_commits` are known.
    async fn confirm(&self, candidates: Vec<String>, discovery: &mut CommitDiscovery, max_commits: usize) {
        let mut probed = 0_usize;
        for commit in candidates {
            if discovery.commits.len() >= max_commits {
                break;
            }

            if discovery.commits.contains(&commit) {
                continue;
            }

            if probed > 0 {
                tokio::time::sleep(self.settings.probe_delay).await;
            }
            probed += 1;

            let files = self.scan(&commit).await;
            let short = commit.get(..8).unwrap_or(&commit);
            if files.is_empty() {
                log::debug!(target: LOG_TARGET, "No files for commit {short}");
            } else {
                log::debug!(target: LOG_TARGET, "Found files for commit {short}");
                let _ = discovery.scanned.insert(commit.clone(), files);
                let _ = discovery.push(commit);
            }
        }
    }

    /// Every file in the build directory of `commit`.
    ///
    /// Both `{commit}/` and `{commit}/{nested}/` are listed, and each subdirectory they link
    /// to is listed once more. Subdirectories are not descended any further.
    pub async fn scan(&self, commit: &str) -> Vec<ArtifactRecord> {
        let provenance = Provenance::Commit(commit.to_string());
        let candidates: Vec<Url> = [format!("{commit}/"), format!("{commit}/{}/", self.settings.nested_subpath)]
            .iter()
            .filter_map(|path| self.settings.index_url(path))
            .collect();

        let mut visited: HashSet<Url> = candidates.iter().cloned().collect();
        let mut records = Vec::new();

        for candidate in &candidates {
            let listing = Listing::fetch(self.fetcher, candidate).await;
            let subdirectories = listing.directories.clone();
            records.extend(listing.into_records(&provenance));

            for subdirectory in subdirectories {
                if !visited.insert(subdirectory.clone()) {
                    continue;
                }

                log::debug!(target: LOG_TARGET, "Descending into {subdirectory}");
                records.extend(Listing::fetch(self.fetcher, &subdirectory).await.into_records(&provenance));
            }
        }

        records
    }
}
