use super::WheelName;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// File extension of a wheel archive.
pub const WHEEL_EXTENSION: &str = ".whl";

/// File extensions recognized as source archives.
pub const SOURCE_ARCHIVE_EXTENSIONS: &[&str] = &[".tar.gz", ".zip"];

/// Classification of an artifact filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Wheel,
    Source,
    Unknown,
}

/// A downloadable file, with whatever structure its name reveals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// A wheel whose filename follows the wheel grammar.
    Wheel(WheelName),

    /// A `.tar.gz` or `.zip` source archive.
    SourceArchive { filename: String },

    /// A file that claims to be an artifact but could not be parsed.
    Unknown { filename: String },
}

impl Artifact {
    /// Classify a wheel filename.
    ///
    /// Never fails: a name that does not follow the grammar yields [`Artifact::Unknown`].
    #[must_use]
    pub fn from_wheel_filename(filename: &str) -> Self {
        WheelName::parse(filename).map_or_else(
            || Self::Unknown {
                filename: filename.to_string(),
            },
            Self::Wheel,
        )
    }

    /// Classify any filename found in a directory listing.
    ///
    /// Returns `None` for files that are neither wheels nor source archives.
    #[must_use]
    pub fn from_listing_filename(filename: &str) -> Option<Self> {
        if filename.ends_with(WHEEL_EXTENSION) {
            Some(Self::from_wheel_filename(filename))
        } else if SOURCE_ARCHIVE_EXTENSIONS.iter().any(|ext| filename.ends_with(ext)) {
            Some(Self::SourceArchive {
                filename: filename.to_string(),
            })
        } else {
            None
        }
    }

    #[must_use]
    pub fn filename(&self) -> String {
        match self {
            Self::Wheel(wheel) => wheel.to_string(),
            Self::SourceArchive { filename } | Self::Unknown { filename } => filename.clone(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ArtifactKind {
        match self {
            Self::Wheel(_) => ArtifactKind::Wheel,
            Self::SourceArchive { .. } => ArtifactKind::Source,
            Self::Unknown { .. } => ArtifactKind::Unknown,
        }
    }

    #[must_use]
    pub const fn as_wheel(&self) -> Option<&WheelName> {
        match self {
            Self::Wheel(wheel) => Some(wheel),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_wheel(&self) -> bool {
        matches!(self, Self::Wheel(_))
    }
}
