//! Build directories named after published versions.

use super::{Fetcher, Listing, ProbeSettings};
use crate::artifacts::{ArtifactRecord, Provenance};

const LOG_TARGET: &str = "  versions";

#[derive(Debug)]
pub struct VersionProbe<'a> {
    fetcher: &'a Fetcher,
    settings: &'a ProbeSettings,
}

impl<'a> VersionProbe<'a> {
    #[must_use]
    pub const fn new(fetcher: &'a Fetcher, settings: &'a ProbeSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Directory layouts tried for a version, in order.
    #[must_use]
    pub fn candidate_paths(&self, version: &str) -> [String; 4] {
        let nested = &self.settings.nested_subpath;
        [
            format!("{version}/"),
            format!("{version}/{nested}/"),
            format!("v{version}/"),
            format!("v{version}/{nested}/"),
        ]
    }

    /// Files for `version` from the first candidate directory that has any.
    pub async fn scan(&self, version: &str) -> Vec<ArtifactRecord> {
        let provenance = Provenance::ReleaseVersion(version.to_string());

        for path in self.candidate_paths(version) {
            let Some(url) = self.settings.index_url(&path) else {
                continue;
            };

            let listing = Listing::fetch(self.fetcher, &url).await;
            if listing.has_files() {
                log::info!(target: LOG_TARGET, "Found {} files for version {version} at {url}", listing.files.len());
                return listing.into_records(&provenance);
            }

            log::debug!(target: LOG_TARGET, "No files for version {version} at {url}");
        }

        log::info!(target: LOG_TARGET, "No files found for version {version}");
        Vec::new()
    }
}
