//! The rolling nightly build.

use super::{Fetcher, Listing, ProbeSettings};
use crate::artifacts::{ArtifactRecord, Provenance};

const LOG_TARGET: &str = "   nightly";

#[derive(Debug)]
pub struct NightlyProbe<'a> {
    fetcher: &'a Fetcher,
    settings: &'a ProbeSettings,
}

impl<'a> NightlyProbe<'a> {
    #[must_use]
    pub const fn new(fetcher: &'a Fetcher, settings: &'a ProbeSettings) -> Self {
        Self { fetcher, settings }
    }

    #[must_use]
    pub fn candidate_paths(&self) -> [String; 3] {
        let nested = &self.settings.nested_subpath;
        ["nightly/".to_string(), format!("nightly/{nested}/"), format!("nightly/simple/{nested}/")]
    }

    /// Files from the first candidate directory that has any.
    pub async fn scan(&self) -> Vec<ArtifactRecord> {
        log::info!(target: LOG_TARGET, "Scanning nightly builds");

        for path in self.candidate_paths() {
            let Some(url) = self.settings.index_url(&path) else {
                continue;
            };

            let listing = Listing::fetch(self.fetcher, &url).await;
            if listing.has_files() {
                log::info!(target: LOG_TARGET, "Found {} nightly files at {url}", listing.files.len());
                return listing.into_records(&Provenance::Nightly);
            }

            log::debug!(target: LOG_TARGET, "No nightly files at {url}");
        }

        log::info!(target: LOG_TARGET, "No nightly files found");
        Vec::new()
    }
}
