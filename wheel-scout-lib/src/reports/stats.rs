use crate::Result;
use crate::artifacts::{ArtifactRecord, Catalog, SourceCounts, SourceType};
use chrono::{DateTime, Utc};
use core::fmt::Write;
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate figures over every record in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub last_updated: DateTime<Utc>,
    pub total_sources: usize,
    pub total_files: usize,
    pub total_wheels: usize,
    pub source_counts: SourceCounts,

    /// Wheels per interpreter tag.
    pub python_versions: BTreeMap<String, usize>,

    /// Wheels per platform tag.
    pub platforms: BTreeMap<String, usize>,
}

impl Stats {
    #[must_use]
    pub fn compute(catalog: &Catalog, now: DateTime<Utc>) -> Self {
        let mut stats = Self {
            last_updated: now,
            total_sources: catalog.results.len(),
            total_files: catalog.results.total_files(),
            total_wheels: 0,
            source_counts: SourceCounts::default(),
            python_versions: BTreeMap::new(),
            platforms: BTreeMap::new(),
        };

        for (key, records) in catalog.results.iter() {
            stats.source_counts.add(SourceType::from_key(key));

            for wheel in records.iter().filter_map(ArtifactRecord::wheel) {
                stats.total_wheels += 1;
                *stats.python_versions.entry(wheel.python_tag.clone()).or_default() += 1;
                *stats.platforms.entry(wheel.platform_tag.clone()).or_default() += 1;
            }
        }

        stats
    }
}

/// Write `stats` as pretty-printed JSON.
pub fn generate<W: Write>(stats: &Stats, writer: &mut W) -> Result<()> {
    let json = serde_json::to_string_pretty(stats).into_app_err("serializing statistics")?;
    writeln!(writer, "{json}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{Artifact, Provenance, ResultSet, ScanMode};
    use url::Url;

    fn record(filename: &str, provenance: Provenance) -> ArtifactRecord {
        let artifact = Artifact::from_listing_filename(filename).unwrap();
        ArtifactRecord::new(artifact, Url::parse("https://wheels.example.com/f").unwrap(), provenance)
    }

    fn catalog() -> Catalog {
        let hash = "33f460b17a54acb3b6cc0b03f4a17876cff5eafd";
        let mut results = ResultSet::new();
        results.insert(
            hash,
            vec![
                record("vllm-0.5.0-cp310-cp310-manylinux1_x86_64.whl", Provenance::Commit(hash.into())),
                record("vllm-0.5.0-cp311-cp311-manylinux1_x86_64.whl", Provenance::Commit(hash.into())),
                record("vllm-0.5.0.tar.gz", Provenance::Commit(hash.into())),
            ],
        );
        results.insert("nightly", vec![record("vllm-0.6.0-cp310-cp310-manylinux2014_aarch64.whl", Provenance::Nightly)]);

        Catalog::new(Utc::now(), "https://wheels.example.com/", ScanMode::MultiSource, results)
    }

    #[test]
    fn test_compute() {
        let now = "2024-01-15T10:30:00Z".parse().unwrap();
        let stats = Stats::compute(&catalog(), now);

        assert_eq!(stats.last_updated, now);
        assert_eq!(stats.total_sources, 2);
        assert_eq!(stats.total_files, 4);
        assert_eq!(stats.total_wheels, 3);
        assert_eq!(stats.source_counts.commits, 1);
        assert_eq!(stats.source_counts.nightly, 1);
        assert_eq!(stats.python_versions.get("cp310"), Some(&2));
        assert_eq!(stats.python_versions.get("cp311"), Some(&1));
        assert_eq!(stats.platforms.get("manylinux1_x86_64"), Some(&2));
        assert_eq!(stats.platforms.get("manylinux2014_aarch64"), Some(&1));
    }

    #[test]
    fn test_generate_shape() {
        let stats = Stats::compute(&catalog(), Utc::now());
        let mut output = String::new();
        generate(&stats, &mut output).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        for key in ["last_updated", "total_sources", "total_files", "total_wheels", "source_counts", "python_versions", "platforms"] {
            assert!(value.get(key).is_some(), "missing '{key}'");
        }
        assert_eq!(value["source_counts"]["github_releases"], 0);
    }
}
