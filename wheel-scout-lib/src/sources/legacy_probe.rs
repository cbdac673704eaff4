//! Package-oriented discovery for servers laid out like a plain package index.

use super::{Fetcher, Listing, ProbeSettings, extract_links};
use crate::artifacts::{ArtifactRecord, Provenance, SOURCE_ARCHIVE_EXTENSIONS, WHEEL_EXTENSION};

const LOG_TARGET: &str = "    legacy";

/// Index roots searched for package links.
const INDEX_PATHS: &[&str] = &["", "simple/", "nightly/", "cu118/", "cu121/", "cu124/", "cu126/", "cpu/"];

#[derive(Debug)]
pub struct LegacyProbe<'a> {
    fetcher: &'a Fetcher,
    settings: &'a ProbeSettings,
}

impl<'a> LegacyProbe<'a> {
    #[must_use]
    pub const fn new(fetcher: &'a Fetcher, settings: &'a ProbeSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Names of all packages linked from any of the known index roots, in first-seen order.
    pub async fn discover_packages(&self) -> Vec<String> {
        log::info!(target: LOG_TARGET, "Discovering packages from {}", self.settings.base_url);

        let mut packages: Vec<String> = Vec::new();
        for path in INDEX_PATHS {
            let Some(url) = self.settings.index_url(path) else {
                continue;
            };

            let Some(body) = self.fetcher.get_text(&url).await else {
                continue;
            };

            let found: Vec<_> = extract_links(&body).iter().filter_map(|link| package_name(link)).collect();
            if !found.is_empty() {
                log::info!(target: LOG_TARGET, "Found {} packages in {url}", found.len());
            }

            for name in found {
                if !packages.contains(&name) {
                    packages.push(name);
                }
            }
        }

        packages
    }

    /// Candidate directory layouts for a package, in order.
    #[must_use]
    pub fn candidate_paths(package: &str) -> [String; 5] {
        [
            format!("simple/{package}/"),
            format!("nightly/{package}/"),
            format!("{package}/"),
            format!("simple/{package}"),
            format!("nightly/{package}"),
        ]
    }

    /// Files for `package` from the first candidate location that has any.
    pub async fn scan(&self, package: &str) -> Vec<ArtifactRecord> {
        let provenance = Provenance::Package(package.to_string());

        for path in Self::candidate_paths(package) {
            let Some(url) = self.settings.index_url(&path) else {
                continue;
            };

            let listing = Listing::fetch(self.fetcher, &url).await;
            if listing.has_files() {
                log::info!(target: LOG_TARGET, "Found {} files for {package}", listing.files.len());
                return listing.into_records(&provenance);
            }
        }

        log::debug!(target: LOG_TARGET, "No files found for {package}");
        Vec::new()
    }
}

/// The package a link on an index page names, if it names one.
fn package_name(link: &str) -> Option<String> {
    if link.ends_with(WHEEL_EXTENSION) || SOURCE_ARCHIVE_EXTENSIONS.iter().any(|ext| link.ends_with(ext)) {
        return None;
    }

    let name = link.trim_end_matches('/');
    if name.is_empty() || name == "." || name == ".." || name.starts_with(['?', '#']) || name.starts_with("http") {
        return None;
    }

    Some(name.to_string())
}
