use super::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT};
use core::time::Duration;
use url::Url;

const LOG_TARGET: &str = "  settings";

pub const DEFAULT_GITHUB_REPO: &str = "vllm-project/vllm";
pub const DEFAULT_PACKAGE_NAME: &str = "vllm";
pub const DEFAULT_PROBE_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_COMMIT_FALLBACK_THRESHOLD: usize = 10;
pub const DEFAULT_FALLBACK_PROBE_LIMIT: usize = 50;
pub const DEFAULT_NESTED_SUBPATH: &str = "vllm";

/// Where the probes look and how hard they try.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// Root of the directory-index server. Always ends with `/`.
    pub base_url: Url,
    pub github_api_url: Url,
    /// `owner/name` of the repository whose commits and releases are probed.
    pub github_repo: String,
    pub pypi_url: Url,
    pub package_name: String,
    pub user_agent: String,
    pub request_timeout: Duration,

    /// Pause between consecutive commit confirmation probes.
    pub probe_delay: Duration,

    /// Fewer listed commits than this triggers the GitHub fallback.
    pub commit_fallback_threshold: usize,

    /// Most GitHub commits confirmed during the fallback.
    pub fallback_probe_limit: usize,

    /// Directory name under which the server sometimes nests a build's files.
    pub nested_subpath: String,
}

impl ProbeSettings {
    /// Settings for the given servers with every other value at its default.
    #[must_use]
    pub fn new(base_url: Url, github_api_url: Url, pypi_url: Url) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
            github_api_url,
            github_repo: DEFAULT_GITHUB_REPO.to_string(),
            pypi_url,
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            probe_delay: DEFAULT_PROBE_DELAY,
            commit_fallback_threshold: DEFAULT_COMMIT_FALLBACK_THRESHOLD,
            fallback_probe_limit: DEFAULT_FALLBACK_PROBE_LIMIT,
            nested_subpath: DEFAULT_NESTED_SUBPATH.to_string(),
        }
    }

    /// Resolve `path` against the index server root.
    #[must_use]
    pub fn index_url(&self, path: &str) -> Option<Url> {
        match self.base_url.join(path) {
            Ok(url) => Some(url),
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Unable to form a URL for '{path}' under {}: {e}", self.base_url);
                None
            }
        }
    }
}

/// Make `url` usable as a directory base for relative joins.
#[must_use]
pub fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
