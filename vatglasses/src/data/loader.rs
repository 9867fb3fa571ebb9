//! Loading CountryGroup documents into a [`DataStore`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use xxhash_rust::xxh3::Xxh3;

use super::{AirportDefinition, CountryGroup, CountryGroupDocument, Position};

/// Errors raised while loading static configuration.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("data directory not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse country group '{group}': {source}")]
    Json {
        group: String,
        source: serde_json::Error,
    },
    #[error("country group '{0}' defined twice")]
    DuplicateGroup(String),
}

/// All loaded CountryGroups in config order plus a data-version token.
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    groups: Vec<CountryGroup>,
    index: HashMap<String, usize>,
    version: String,
}

impl DataStore {
    /// An empty store: nothing is configured, so nothing can be active.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every `*.json` file in `dir`, sorted by file name.
    ///
    /// The file stem becomes the CountryGroup identifier.
    pub fn from_directory<P: AsRef<Path>>(dir: P) -> Result<Self, DataError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(DataError::NotFound(dir.to_path_buf()));
        }

        let entries = fs::read_dir(dir).map_err(|source| DataError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        let mut documents = Vec::with_capacity(files.len());
        for path in files {
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };
            let text = fs::read_to_string(&path).map_err(|source| DataError::Io {
                path: path.clone(),
                source,
            })?;
            documents.push((stem, text));
        }

        let store = Self::from_documents(documents.iter().map(|(id, text)| (id.as_str(), text.as_str())))?;
        tracing::info!(
            directory = %dir.display(),
            groups = store.groups.len(),
            version = %store.version,
            "Loaded airspace data"
        );
        Ok(store)
    }

    /// Build a store from `(group_id, json)` pairs, in the given order.
    pub fn from_documents<'a, I>(documents: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut store = Self::empty();
        let mut hasher = Xxh3::new();

        for (id, text) in documents {
            if store.index.contains_key(id) {
                return Err(DataError::DuplicateGroup(id.to_string()));
            }
            let document: CountryGroupDocument =
                serde_json::from_str(text).map_err(|source| DataError::Json {
                    group: id.to_string(),
                    source,
                })?;

            hasher.update(id.as_bytes());
            hasher.update(&[0]);
            hasher.update(text.as_bytes());

            store.index.insert(id.to_string(), store.groups.len());
            store.groups.push(document.into_group(id));
        }

        store.version = format!("{:016x}", hasher.digest());
        Ok(store)
    }

    /// Wrap in an `Arc` for sharing with the engine.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// All groups in config order.
    pub fn groups(&self) -> &[CountryGroup] {
        &self.groups
    }

    /// Look up a group by identifier.
    pub fn group(&self, id: &str) -> Option<&CountryGroup> {
        self.index.get(id).map(|&i| &self.groups[i])
    }

    /// Look up a position by group and identifier.
    pub fn position(&self, group: &str, id: &str) -> Option<&Position> {
        self.group(group)?.position(id)
    }

    /// Find an airport definition in any group (first group wins).
    pub fn airport(&self, icao: &str) -> Option<&AirportDefinition> {
        let upper = icao.to_uppercase();
        self.groups
            .iter()
            .find_map(|g| g.airports.get(icao).or_else(|| g.airports.get(&upper)))
    }

    /// Data-version token used to validate snapshots.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// True when no group is loaded.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ED: &str = r#"{
        "positions": { "ALB": { "pre": ["EDMM"], "type": "CTR", "frequency": "132.555" } },
        "airspace": [ { "id": "ALB", "owner": ["ALB"], "sectors": [
            { "min": 0, "max": 245, "points": [["480000", "0110000"], ["480000", "0120000"], ["490000", "0120000"]] }
        ] } ],
        "airports": { "EDDM": { "runways": ["26R", "26L", "08R", "08L"] } }
    }"#;

    #[test]
    fn test_from_documents_indexes_groups() {
        let store = DataStore::from_documents([("ed", ED)]).unwrap();
        assert_eq!(store.groups().len(), 1);
        assert!(store.group("ed").is_some());
        assert!(store.group("lo").is_none());
        assert_eq!(store.position("ed", "ALB").unwrap().kind, "CTR");
        assert_eq!(store.airport("EDDM").unwrap().runways[0], "26R");
    }

    #[test]
    fn test_dms_points_are_converted() {
        let store = DataStore::from_documents([("ed", ED)]).unwrap();
        let sector = &store.group("ed").unwrap().airspace[0].sectors[0];
        assert!((sector.points[0].lat - 48.0).abs() < 1e-9);
        assert!((sector.points[1].lon - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_group_rejected() {
        let result = DataStore::from_documents([("ed", ED), ("ed", ED)]);
        assert!(matches!(result, Err(DataError::DuplicateGroup(_))));
    }

    #[test]
    fn test_invalid_json_names_group() {
        let err = DataStore::from_documents([("lo", "{ not json")]).unwrap_err();
        assert!(err.to_string().contains("'lo'"));
    }

    #[test]
    fn test_version_changes_with_content() {
        let a = DataStore::from_documents([("ed", ED)]).unwrap();
        let b = DataStore::from_documents([("ed", "{}")]).unwrap();
        let c = DataStore::from_documents([("ed", ED)]).unwrap();
        assert_ne!(a.version(), b.version());
        assert_eq!(a.version(), c.version());
        assert_eq!(a.version().len(), 16);
    }

    #[test]
    fn test_from_directory_sorted_by_file_name() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::write(temp.path().join("lo.json"), "{}").unwrap();
        fs::write(temp.path().join("ed.json"), ED).unwrap();
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let store = DataStore::from_directory(temp.path()).unwrap();
        let ids: Vec<_> = store.groups().iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["ed", "lo"]);
    }

    #[test]
    fn test_from_directory_missing() {
        let result = DataStore::from_directory("/nonexistent/vatglasses/data");
        assert!(matches!(result, Err(DataError::NotFound(_))));
    }

    #[test]
    fn test_empty_store() {
        let store = DataStore::empty();
        assert!(store.is_empty());
        assert!(store.airport("EDDM").is_none());
    }
}
