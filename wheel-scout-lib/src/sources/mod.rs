//! Discovery of artifacts across the index server, GitHub, and the package registry.
//!
//! # Overview
//!
//! Every source is reached through a [`Fetcher`], which performs single-shot GET requests
//! and turns any failure into "no data". On top of it sit:
//!
//! - [`Listing`], which reads a directory-index page into file and subdirectory links,
//! - [`GithubClient`] and [`PypiClient`], which read the commit, release and version lists,
//! - one probe per discovery channel ([`CommitProbe`], [`ReleaseProbe`], [`VersionProbe`],
//!   [`NightlyProbe`], [`LegacyProbe`]), each trying its fixed candidate locations in order,
//! - the [`Aggregator`], which runs the probes selected by a [`ScanPlan`] one after another
//!   and merges what they return into a single [`ResultSet`](crate::artifacts::ResultSet).
//!
//! Requests are made sequentially. Nothing is retried: redundancy comes only from probes
//! trying several candidate locations.

mod aggregator;
mod commit_probe;
mod fetcher;
mod github;
mod legacy_probe;
mod listing;
mod nightly_probe;
mod pypi;
mod release_probe;
mod settings;
mod version_probe;

pub use aggregator::{Aggregator, ScanPlan};
pub use commit_probe::{CommitDiscovery, CommitProbe};
pub use fetcher::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT, Fetcher};
pub use github::{GithubClient, Release};
pub use legacy_probe::LegacyProbe;
pub use listing::{Listing, extract_links};
pub use nightly_probe::NightlyProbe;
pub use pypi::{PypiClient, natural_cmp};
pub use release_probe::ReleaseProbe;
pub use settings::{
    DEFAULT_COMMIT_FALLBACK_THRESHOLD, DEFAULT_FALLBACK_PROBE_LIMIT, DEFAULT_GITHUB_REPO, DEFAULT_NESTED_SUBPATH, DEFAULT_PACKAGE_NAME,
    DEFAULT_PROBE_DELAY, ProbeSettings, with_trailing_slash,
};
pub use version_probe::VersionProbe;
