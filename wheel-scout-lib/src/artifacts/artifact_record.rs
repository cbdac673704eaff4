use super::{Artifact, ArtifactKind, Provenance, WheelName};
use chrono::{DateTime, Utc};
use ohno::app_err;
use serde::{Deserialize, Serialize};
use url::Url;

const SOURCE_GITHUB_RELEASE: &str = "github_release";
const SOURCE_RELEASE_VERSION: &str = "release_version";
const SOURCE_NIGHTLY: &str = "nightly";

/// One discovered file together with where it lives and how it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RecordWire", try_from = "RecordWire")]
pub struct ArtifactRecord {
    pub artifact: Artifact,
    pub url: Url,
    pub provenance: Provenance,
    pub size: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl ArtifactRecord {
    #[must_use]
    pub const fn new(artifact: Artifact, url: Url, provenance: Provenance) -> Self {
        Self {
            artifact,
            url,
            provenance,
            size: None,
            created_at: None,
        }
    }

    #[must_use]
    pub fn filename(&self) -> String {
        self.artifact.filename()
    }

    #[must_use]
    pub const fn kind(&self) -> ArtifactKind {
        self.artifact.kind()
    }

    #[must_use]
    pub const fn wheel(&self) -> Option<&WheelName> {
        self.artifact.as_wheel()
    }

    #[must_use]
    pub const fn is_wheel(&self) -> bool {
        self.artifact.is_wheel()
    }
}

/// Flat JSON shape of a record, with fields present only when relevant.
#[derive(Debug, Serialize, Deserialize)]
struct RecordWire {
    filename: String,
    #[serde(rename = "type")]
    kind: ArtifactKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    // `Some(None)` serializes as an explicit `null` for wheels without a build tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    build_tag: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    python_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    abi_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    platform_tag: Option<String>,
    url: Url,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    commit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    release_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version_directory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl From<ArtifactRecord> for RecordWire {
    fn from(record: ArtifactRecord) -> Self {
        let mut wire = Self {
            filename: record.artifact.filename(),
            kind: record.artifact.kind(),
            name: None,
            version: None,
            build_tag: None,
            python_tag: None,
            abi_tag: None,
            platform_tag: None,
            url: record.url,
            commit: None,
            source: None,
            release_tag: None,
            version_directory: None,
            package: None,
            size: record.size,
            created_at: record.created_at,
        };

        if let Artifact::Wheel(wheel) = record.artifact {
            wire.name = Some(wheel.name);
            wire.version = Some(wheel.version);
            wire.build_tag = Some(wheel.build_tag);
            wire.python_tag = Some(wheel.python_tag);
            wire.abi_tag = Some(wheel.abi_tag);
            wire.platform_tag = Some(wheel.platform_tag);
        }

        match record.provenance {
            Provenance::Commit(hash) => wire.commit = Some(hash),
            Provenance::GithubRelease(tag) => {
                wire.source = Some(SOURCE_GITHUB_RELEASE.to_string());
                wire.release_tag = Some(tag);
            }
            Provenance::ReleaseVersion(version) => {
                wire.source = Some(SOURCE_RELEASE_VERSION.to_string());
                wire.version_directory = Some(version);
            }
            Provenance::Nightly => wire.source = Some(SOURCE_NIGHTLY.to_string()),
            Provenance::Package(name) => wire.package = Some(name),
        }

        wire
    }
}

impl TryFrom<RecordWire> for ArtifactRecord {
    type Error = ohno::AppError;

    fn try_from(wire: RecordWire) -> Result<Self, Self::Error> {
        let provenance = if let Some(hash) = wire.commit {
            Provenance::Commit(hash)
        } else if let Some(name) = wire.package {
            Provenance::Package(name)
        } else {
            match wire.source.as_deref() {
                Some(SOURCE_GITHUB_RELEASE) => Provenance::GithubRelease(
                    wire.release_tag
                        .ok_or_else(|| app_err!("release record '{}' has no release_tag", wire.filename))?,
                ),
                Some(SOURCE_RELEASE_VERSION) => Provenance::ReleaseVersion(
                    wire.version_directory
                        .ok_or_else(|| app_err!("version record '{}' has no version_directory", wire.filename))?,
                ),
                Some(SOURCE_NIGHTLY) => Provenance::Nightly,
                Some(other) => return Err(app_err!("record '{}' has unrecognized source '{other}'", wire.filename)),
                None => return Err(app_err!("record '{}' has no provenance", wire.filename)),
            }
        };

        let artifact = match wire.kind {
            ArtifactKind::Wheel => {
                let missing = |field: &str| app_err!("wheel record '{}' is missing '{field}'", wire.filename);
                Artifact::Wheel(WheelName {
                    name: wire.name.clone().ok_or_else(|| missing("name"))?,
                    version: wire.version.clone().ok_or_else(|| missing("version"))?,
                    build_tag: wire.build_tag.clone().flatten(),
                    python_tag: wire.python_tag.clone().ok_or_else(|| missing("python_tag"))?,
                    abi_tag: wire.abi_tag.clone().ok_or_else(|| missing("abi_tag"))?,
                    platform_tag: wire.platform_tag.clone().ok_or_else(|| missing("platform_tag"))?,
                })
            }
            ArtifactKind::Source => Artifact::SourceArchive { filename: wire.filename },
            ArtifactKind::Unknown => Artifact::Unknown { filename: wire.filename },
        };

        Ok(Self {
            artifact,
            url: wire.url,
            provenance,
            size: wire.size,
            created_at: wire.created_at,
        })
    }
}
