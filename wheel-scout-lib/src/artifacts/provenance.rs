use core::fmt::{self, Display, Formatter};

/// The discovery channel an artifact came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// A content-addressed build directory on the index server, named by commit hash.
    Commit(String),

    /// An asset attached to a tagged GitHub release.
    GithubRelease(String),

    /// A published registry version mirrored on the index server.
    ReleaseVersion(String),

    /// The rolling nightly build.
    Nightly,

    /// A package found by legacy package-based discovery.
    Package(String),
}

impl Provenance {
    /// The key under which records with this provenance are stored in a [`super::ResultSet`].
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Commit(hash) => hash.clone(),
            Self::GithubRelease(tag) => format!("release_{tag}"),
            Self::ReleaseVersion(version) => format!("version_{version}"),
            Self::Nightly => "nightly".to_string(),
            Self::Package(name) => name.clone(),
        }
    }
}

impl Display for Provenance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commit(hash) => write!(f, "commit {}", hash.get(..8).unwrap_or(hash)),
            Self::GithubRelease(tag) => write!(f, "release {tag}"),
            Self::ReleaseVersion(version) => write!(f, "version {version}"),
            Self::Nightly => write!(f, "nightly"),
            Self::Package(name) => write!(f, "package {name}"),
        }
    }
}
