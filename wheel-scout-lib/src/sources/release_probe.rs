//! Wheels attached to tagged GitHub releases.

use super::{GithubClient, Release};
use crate::artifacts::{Artifact, ArtifactRecord, Provenance, WHEEL_EXTENSION, WheelName};

const LOG_TARGET: &str = "  releases";

#[derive(Debug)]
pub struct ReleaseProbe<'a> {
    github: &'a GithubClient,
}

impl<'a> ReleaseProbe<'a> {
    #[must_use]
    pub const fn new(github: &'a GithubClient) -> Self {
        Self { github }
    }

    /// Wheels of each of the `max_releases` most recent releases, paired with the release tag.
    ///
    /// Releases without any wheel are left out.
    pub async fn scan(&self, max_releases: usize) -> Vec<(String, Vec<ArtifactRecord>)> {
        let releases = self.github.releases(max_releases).await;

        let scanned: Vec<_> = releases
            .iter()
            .filter_map(|release| {
                log::info!(
                    target: LOG_TARGET,
                    "Release {} ({}), published {}, prerelease: {}",
                    release.tag_name,
                    release.name.as_deref().unwrap_or("unnamed"),
                    release.published_at.map_or_else(|| "unknown".to_string(), |t| t.to_rfc3339()),
                    release.prerelease
                );

                let records = release_records(release);
                if records.is_empty() {
                    log::debug!(target: LOG_TARGET, "No wheels attached to {}", release.tag_name);
                    None
                } else {
                    log::info!(target: LOG_TARGET, "Found {} wheels in {}", records.len(), release.tag_name);
                    Some((release.tag_name.clone(), records))
                }
            })
            .collect();

        log::info!(target: LOG_TARGET, "Found {} releases with wheels", scanned.len());
        scanned
    }
}

/// Records for a release's wheel assets.
///
/// Assets that are not wheels, or whose names do not follow the wheel naming grammar, are skipped.
#[must_use]
pub fn release_records(release: &Release) -> Vec<ArtifactRecord> {
    let provenance = Provenance::GithubRelease(release.tag_name.clone());

    release
        .assets
        .iter()
        .filter(|asset| asset.name.ends_with(WHEEL_EXTENSION))
        .filter_map(|asset| {
            let wheel = WheelName::parse(&asset.name)?;
            let mut record = ArtifactRecord::new(Artifact::Wheel(wheel), asset.browser_download_url.clone(), provenance.clone());
            record.size = asset.size;
            record.created_at = asset.created_at;
            Some(record)
        })
        .collect()
}
