use strum::{Display, EnumIter, IntoStaticStr};

const RELEASE_PREFIX: &str = "release_";
const VERSION_PREFIX: &str = "version_";
const NIGHTLY_KEY: &str = "nightly";

/// Coarse source category of a result set key.
///
/// Inferred purely from the key's shape, so any key that is not a release, version,
/// or nightly key counts as a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum SourceType {
    Commit,
    GithubRelease,
    ReleaseVersion,
    Nightly,
}

impl SourceType {
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        if key.starts_with(RELEASE_PREFIX) {
            Self::GithubRelease
        } else if key.starts_with(VERSION_PREFIX) {
            Self::ReleaseVersion
        } else if key == NIGHTLY_KEY {
            Self::Nightly
        } else {
            Self::Commit
        }
    }

    /// The identifying part of a key: the tag, the version, the hash, or `nightly`.
    #[must_use]
    pub fn source_info(key: &str) -> &str {
        match Self::from_key(key) {
            Self::GithubRelease => key.strip_prefix(RELEASE_PREFIX).unwrap_or(key),
            Self::ReleaseVersion => key.strip_prefix(VERSION_PREFIX).unwrap_or(key),
            Self::Nightly | Self::Commit => key,
        }
    }
}
