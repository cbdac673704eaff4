use crate::Result;
use crate::sources::ProbeSettings;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked for in the working directory.
pub const CONFIG_FILE_NAME: &str = "wheel-scout.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root of the wheel index server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// GitHub REST API root
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    /// Repository (`owner/name`) whose commits and releases are probed
    #[serde(default = "default_github_repo")]
    pub github_repo: String,

    /// Package registry root
    #[serde(default = "default_pypi_url")]
    pub pypi_url: String,

    /// Package whose published versions are probed
    #[serde(default = "default_package_name")]
    pub package_name: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Upper bound on a single request
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Pause between consecutive commit confirmation probes
    #[serde(default = "default_probe_delay", with = "humantime_serde")]
    pub probe_delay: Duration,

    /// Fewer listed commits than this triggers the GitHub fallback
    #[serde(default = "default_commit_fallback_threshold")]
    pub commit_fallback_threshold: usize,

    /// Most GitHub commits probed by the fallback
    #[serde(default = "default_fallback_probe_limit")]
    pub fallback_probe_limit: usize,

    /// Directory name under which a build's files are sometimes nested
    #[serde(default = "default_nested_subpath")]
    pub nested_subpath: String,

    #[serde(default = "default_max_commits")]
    pub max_commits: usize,

    #[serde(default = "default_max_releases")]
    pub max_releases: usize,

    #[serde(default = "default_max_versions")]
    pub max_versions: usize,
}

fn default_base_url() -> String {
    "https://wheels.vllm.ai/".to_string()
}

fn default_github_api_url() -> String {
    "https://api.github.com/".to_string()
}

fn default_github_repo() -> String {
    crate::sources::DEFAULT_GITHUB_REPO.to_string()
}

fn default_pypi_url() -> String {
    "https://pypi.org/".to_string()
}

fn default_package_name() -> String {
    crate::sources::DEFAULT_PACKAGE_NAME.to_string()
}

fn default_user_agent() -> String {
    crate::sources::DEFAULT_USER_AGENT.to_string()
}

const fn default_request_timeout() -> Duration {
    crate::sources::DEFAULT_REQUEST_TIMEOUT
}

const fn default_probe_delay() -> Duration {
    crate::sources::DEFAULT_PROBE_DELAY
}

const fn default_commit_fallback_threshold() -> usize {
    crate::sources::DEFAULT_COMMIT_FALLBACK_THRESHOLD
}

const fn default_fallback_probe_limit() -> usize {
    crate::sources::DEFAULT_FALLBACK_PROBE_LIMIT
}

fn default_nested_subpath() -> String {
    crate::sources::DEFAULT_NESTED_SUBPATH.to_string()
}

const fn default_max_commits() -> usize {
    50
}

const fn default_max_releases() -> usize {
    20
}

const fn default_max_versions() -> usize {
    20
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit `config_path`, `wheel-scout.toml` in `dir` is used when it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated
    pub fn load(dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading wheel-scout configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
                Err(e) => return Err(e).into_app_err_with(|| format!("reading wheel-scout configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        crate::artifacts::write_atomically(output_path, DEFAULT_CONFIG_TOML.as_bytes())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a URL does not parse or a value is out of range
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("base_url", &self.base_url),
            ("github_api_url", &self.github_api_url),
            ("pypi_url", &self.pypi_url),
        ] {
            let _ = parse_url(key, value)?;
        }

        for (key, value) in [
            ("github_repo", &self.github_repo),
            ("package_name", &self.package_name),
            ("nested_subpath", &self.nested_subpath),
        ] {
            if value.trim().is_empty() {
                return Err(app_err!("{key} must not be empty"));
            }
        }

        if self.request_timeout.is_zero() {
            return Err(app_err!("request_timeout must be greater than zero"));
        }

        if self.max_releases == 0 {
            return Err(app_err!("max_releases must be at least 1"));
        }

        Ok(())
    }

    /// Translate into the settings the probes run with.
    ///
    /// # Errors
    ///
    /// Returns an error if a URL does not parse
    pub fn probe_settings(&self) -> Result<ProbeSettings> {
        let mut settings = ProbeSettings::new(
            parse_url("base_url", &self.base_url)?,
            parse_url("github_api_url", &self.github_api_url)?,
            parse_url("pypi_url", &self.pypi_url)?,
        );

        settings.github_repo.clone_from(&self.github_repo);
        settings.package_name.clone_from(&self.package_name);
        settings.user_agent.clone_from(&self.user_agent);
        settings.request_timeout = self.request_timeout;
        settings.probe_delay = self.probe_delay;
        settings.commit_fallback_threshold = self.commit_fallback_threshold;
        settings.fallback_probe_limit = self.fallback_probe_limit;
        settings.nested_subpath.clone_from(&self.nested_subpath);

        Ok(settings)
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value).into_app_err_with(|| format!("{key} '{value}' is not a valid URL"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(app_err!("{key} '{value}' must be an http or https URL"));
    }
    Ok(url)
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
