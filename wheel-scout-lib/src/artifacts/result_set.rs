use super::ArtifactRecord;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Provenance-keyed artifact records, in insertion order.
///
/// Serializes as a JSON object whose keys appear in the order they were inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    entries: IndexMap<String, Vec<ArtifactRecord>>,
}

impl ResultSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the records for `key`.
    ///
    /// Re-inserting an existing key replaces its records but keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, records: Vec<ArtifactRecord>) {
        let _ = self.entries.insert(key.into(), records);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[ArtifactRecord]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ArtifactRecord])> {
        self.entries.iter().map(|(k, records)| (k.as_str(), records.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of records across all keys.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Number of wheel records across all keys.
    #[must_use]
    pub fn total_wheels(&self) -> usize {
        self.entries.values().flatten().filter(|r| r.is_wheel()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{Artifact, Provenance};
    use url::Url;

    fn record(filename: &str, provenance: Provenance) -> ArtifactRecord {
        let url = Url::parse("https://wheels.example.com/").unwrap().join(filename).unwrap();
        let artifact = Artifact::from_listing_filename(filename).unwrap();
        ArtifactRecord::new(artifact, url, provenance)
    }

    #[test]
    fn test_insert_preserves_order() {
        let mut set = ResultSet::new();
        set.insert("release_v1", vec![record("a-1-py3-none-any.whl", Provenance::GithubRelease("v1".into()))]);
        set.insert("nightly", vec![record("b-1-py3-none-any.whl", Provenance::Nightly)]);
        set.insert("abc", vec![record("c-1.tar.gz", Provenance::Commit("abc".into()))]);

        let keys: Vec<_> = set.keys().collect();
        assert_eq!(keys, ["release_v1", "nightly", "abc"]);
        assert_eq!(set.total_files(), 3);
        assert_eq!(set.total_wheels(), 2);
    }

    #[test]
    fn test_reinsert_replaces_in_place() {
        let mut set = ResultSet::new();
        set.insert("first", vec![]);
        set.insert("second", vec![]);
        set.insert("first", vec![record("x-1-py3-none-any.whl", Provenance::Nightly)]);

        let keys: Vec<_> = set.keys().collect();
        assert_eq!(keys, ["first", "second"]);
        assert_eq!(set.get("first").unwrap().len(), 1);
    }

    #[test]
    fn test_serialized_key_order_follows_insertion() {
        let mut set = ResultSet::new();
        set.insert("zeta", vec![]);
        set.insert("alpha", vec![]);

        let text = serde_json::to_string(&set).unwrap();
        assert_eq!(text, r#"{"zeta":[],"alpha":[]}"#);

        let back: ResultSet = serde_json::from_str(&text).unwrap();
        assert_eq!(back.keys().collect::<Vec<_>>(), ["zeta", "alpha"]);
    }

    #[test]
    fn test_missing_key() {
        let set = ResultSet::new();
        assert!(set.get("nightly").is_none());
        assert!(!set.contains_key("nightly"));
        assert!(set.is_empty());
    }
}
