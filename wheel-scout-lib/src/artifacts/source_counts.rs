use super::{ResultSet, SourceType};
use serde::{Deserialize, Serialize};

/// Number of result set keys per source category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCounts {
    pub commits: usize,
    pub github_releases: usize,
    pub nightly: usize,
    pub release_versions: usize,
}

impl SourceCounts {
    #[must_use]
    pub fn from_results(results: &ResultSet) -> Self {
        let mut counts = Self::default();
        for key in results.keys() {
            counts.add(SourceType::from_key(key));
        }
        counts
    }

    pub const fn add(&mut self, source_type: SourceType) {
        match source_type {
            SourceType::Commit => self.commits += 1,
            SourceType::GithubRelease => self.github_releases += 1,
            SourceType::ReleaseVersion => self.release_versions += 1,
            SourceType::Nightly => self.nightly += 1,
        }
    }

    #[must_use]
    pub const fn get(&self, source_type: SourceType) -> usize {
        match source_type {
            SourceType::Commit => self.commits,
            SourceType::GithubRelease => self.github_releases,
            SourceType::ReleaseVersion => self.release_versions,
            SourceType::Nightly => self.nightly,
        }
    }
}
