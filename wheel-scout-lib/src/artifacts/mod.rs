//! Artifact metadata and the catalog data model
//!
//! This module defines everything the discovery pipeline produces and the report
//! generators consume. Nothing in here performs I/O beyond reading and writing a
//! catalog file.
//!
//! # Implementation Model
//!
//! - [`WheelName`] parses a wheel filename with the fixed positional grammar
//!   `{name}-{version}(-{build})?-{python}-{abi}-{platform}.whl`.
//! - [`Artifact`] classifies a filename as a wheel, a source archive, or unknown.
//! - [`ArtifactRecord`] pairs an artifact with its resolved download URL and its
//!   [`Provenance`], the channel through which it was discovered.
//! - [`ResultSet`] maps provenance keys to the records found for them, preserving
//!   insertion order.
//! - [`SourceType`] infers a coarse source category from a key's shape, and
//!   [`SourceCounts`] tallies keys per category.
//! - [`Catalog`] is the envelope persisted at the end of a run and the sole input
//!   for downstream reports.

mod artifact;
mod artifact_record;
mod catalog;
mod provenance;
mod result_set;
mod source_counts;
mod source_type;
mod wheel_name;

pub use artifact::{Artifact, ArtifactKind, SOURCE_ARCHIVE_EXTENSIONS, WHEEL_EXTENSION};
pub use artifact_record::ArtifactRecord;
pub use catalog::{Catalog, ScanMode};
pub(crate) use catalog::write_atomically;
pub use provenance::Provenance;
pub use result_set::ResultSet;
pub use source_counts::SourceCounts;
pub use source_type::SourceType;
pub use wheel_name::WheelName;
