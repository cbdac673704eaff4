use super::{ResultSet, SourceCounts};
use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};
use std::fs;
use strum::{Display, EnumString};

/// How a run decided which sources to probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ScanMode {
    Legacy,
    MultiSource,
    SingleCommit,
    GithubReleases,
    Nightly,
}

/// The persisted result of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub scrape_time: DateTime<Utc>,
    pub base_url: String,
    pub mode: ScanMode,
    pub sources: SourceCounts,
    pub results: ResultSet,
}

impl Catalog {
    #[must_use]
    pub fn new(scrape_time: DateTime<Utc>, base_url: impl Into<String>, mode: ScanMode, results: ResultSet) -> Self {
        Self {
            scrape_time,
            base_url: base_url.into(),
            mode,
            sources: SourceCounts::from_results(&results),
            results,
        }
    }

    /// Read a catalog previously written by [`Catalog::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid catalog
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path).into_app_err_with(|| format!("reading catalog '{path}'"))?;
        serde_json::from_str(&text).into_app_err_with(|| format!("parsing catalog '{path}'"))
    }

    /// Write the catalog as pretty-printed JSON.
    ///
    /// The file is written next to its destination and renamed into place, so an
    /// interrupted write never leaves a truncated catalog behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).into_app_err("serializing catalog")?;
        write_atomically(path, json.as_bytes())
    }
}

/// Write `contents` to `path` via a sibling temporary file and a rename.
pub(crate) fn write_atomically(path: &Utf8Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        fs::create_dir_all(parent).into_app_err_with(|| format!("creating directory '{parent}'"))?;
    }

    let tmp_path = Utf8PathBuf::from(format!("{path}.tmp"));
    fs::write(&tmp_path, contents).into_app_err_with(|| format!("writing '{tmp_path}'"))?;
    fs::rename(&tmp_path, path).into_app_err_with(|| format!("moving '{tmp_path}' to '{path}'"))?;
    Ok(())
}
