//! GitHub REST API client
//!
//! Only the two listings the probes need: recent commits and recent releases.

use super::{Fetcher, ProbeSettings};
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use url::Url;

const LOG_TARGET: &str = "    github";

/// GitHub caps every page of results at this many entries.
pub const MAX_PER_PAGE: usize = 100;

const API_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// A commit, reduced to its hash.
#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub sha: String,
}

/// A tagged release and its attached files.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A file attached to a release.
#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: Url,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct GithubClient {
    fetcher: Fetcher,
    api_url: String,
    repo: String,
}

impl GithubClient {
    /// Create a client for the repository named in `settings`, authenticating with `token` when given.
    pub fn new(settings: &ProbeSettings, token: Option<&str>) -> crate::Result<Self> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(ACCEPT, HeaderValue::from_static(API_MEDIA_TYPE));

        if let Some(t) = token {
            let mut auth_val = HeaderValue::from_str(&format!("token {t}"))?;
            auth_val.set_sensitive(true);
            let _ = headers.insert(AUTHORIZATION, auth_val);
        }

        Ok(Self {
            fetcher: Fetcher::with_default_headers(&settings.user_agent, settings.request_timeout, headers)?,
            api_url: settings.github_api_url.as_str().trim_end_matches('/').to_string(),
            repo: settings.github_repo.clone(),
        })
    }

    /// Hashes of the most recent commits, newest first, at most `max` of them.
    ///
    /// A failed request yields no commits.
    pub async fn recent_commits(&self, max: usize) -> Vec<String> {
        log::info!(target: LOG_TARGET, "Fetching recent commits for {}", self.repo);

        let Some(url) = self.endpoint("commits", max) else {
            return Vec::new();
        };

        let commits: Vec<Commit> = self.fetcher.get_json(&url).await.unwrap_or_default();
        let commits: Vec<_> = commits.into_iter().take(max).map(|c| c.sha).collect();

        log::info!(target: LOG_TARGET, "Found {} commits on GitHub", commits.len());
        commits
    }

    /// The most recent releases, newest first, at most `max` of them.
    ///
    /// A failed request yields no releases.
    pub async fn releases(&self, max: usize) -> Vec<Release> {
        log::info!(target: LOG_TARGET, "Fetching releases for {}", self.repo);

        let Some(url) = self.endpoint("releases", max) else {
            return Vec::new();
        };

        let mut releases: Vec<Release> = self.fetcher.get_json(&url).await.unwrap_or_default();
        releases.truncate(max);

        log::info!(target: LOG_TARGET, "Found {} releases on GitHub", releases.len());
        releases
    }

    fn endpoint(&self, resource: &str, max: usize) -> Option<Url> {
        let url = format!("{}/repos/{}/{resource}?per_page={}", self.api_url, self.repo, max.min(MAX_PER_PAGE));
        match Url::parse(&url) {
            Ok(url) => Some(url),
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Invalid GitHub API URL '{url}': {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ProbeSettings {
        ProbeSettings::new(
            Url::parse("https://wheels.example.com").unwrap(),
            Url::parse("https://api.github.com/").unwrap(),
            Url::parse("https://pypi.org").unwrap(),
        )
    }

    #[test]
    fn test_endpoint_caps_page_size() {
        let client = GithubClient::new(&settings(), None).unwrap();
        assert_eq!(
            client.endpoint("commits", 500).unwrap().as_str(),
            "https://api.github.com/repos/vllm-project/vllm/commits?per_page=100"
        );
        assert_eq!(
            client.endpoint("releases", 20).unwrap().as_str(),
            "https://api.github.com/repos/vllm-project/vllm/releases?per_page=20"
        );
    }

    #[test]
    fn test_new_rejects_unprintable_token() {
        assert!(GithubClient::new(&settings(), Some("bad\ntoken")).is_err());
    }

    #[test]
    fn test_release_deserialize() {
        let json = r#"{
            "tag_name": "v0.5.0",
            "name": "vLLM v0.5.0",
            "published_at": "2024-06-11T18:00:00Z",
            "prerelease": false,
            "assets": [{
                "name": "vllm-0.5.0-cp38-abi3-manylinux1_x86_64.whl",
                "browser_download_url": "https://github.com/vllm-project/vllm/releases/download/v0.5.0/vllm-0.5.0-cp38-abi3-manylinux1_x86_64.whl",
                "size": 123456,
                "created_at": "2024-06-11T17:00:00Z",
                "download_count": 42
            }],
            "body": "notes"
        }"#;

        let release: Release = serde_json::from_str(json).unwrap();
        assert_eq!(release.tag_name, "v0.5.0");
        assert_eq!(release.name.as_deref(), Some("vLLM v0.5.0"));
        assert!(!release.prerelease);
        assert_eq!(release.assets.len(), 1);
        assert_eq!(release.assets[0].size, Some(123_456));
        assert!(release.assets[0].created_at.is_some());
    }

    #[test]
    fn test_release_deserialize_minimal() {
        let release: Release = serde_json::from_str(r#"{"tag_name": "v1", "name": null}"#).unwrap();
        assert_eq!(release.tag_name, "v1");
        assert!(release.name.is_none());
        assert!(release.published_at.is_none());
        assert!(release.assets.is_empty());
    }

    #[test]
    fn test_commit_deserialize() {
        let commits: Vec<Commit> =
            serde_json::from_str(r#"[{"sha": "33f460b17a54acb3b6cc0b03f4a17876cff5eafd", "commit": {"message": "x"}}]"#).unwrap();
        assert_eq!(commits[0].sha, "33f460b17a54acb3b6cc0b03f4a17876cff5eafd");
    }
}
