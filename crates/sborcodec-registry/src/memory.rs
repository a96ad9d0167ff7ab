//! In-memory `SchemaRegistry` implementation.
//!
//! Suitable for testing, CLI use, and embedded deployments.
//! Thread-safe via `Arc<RwLock<Inner>>`.

use sborcodec_core::{
    definition::{SchemaDefinition, SchemaRegistry},
    error::RegistryError,
};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use tracing::{debug, info};

use crate::definition::DefinitionParser;

/// Key for definition lookup by name + version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct NameVersion(String, u32);

#[derive(Default)]
struct Inner {
    /// (name, version) → definition
    by_name_version: HashMap<NameVersion, SchemaDefinition>,
    /// name → sorted list of versions (ascending)
    versions: HashMap<String, Vec<u32>>,
}

impl Inner {
    fn insert(&mut self, definition: SchemaDefinition) {
        let versions = self.versions.entry(definition.name.clone()).or_default();
        if !versions.contains(&definition.version) {
            versions.push(definition.version);
            versions.sort_unstable();
        }
        self.by_name_version
            .insert(NameVersion(definition.name.clone(), definition.version), definition);
    }

    fn latest_version(&self, name: &str) -> Option<u32> {
        self.versions
            .get(name)?
            .iter()
            .rev()
            .find(|&&v| {
                self.by_name_version
                    .get(&NameVersion(name.to_string(), v))
                    .map(|d| !d.deprecated)
                    .unwrap_or(false)
            })
            .copied()
    }
}

/// Thread-safe in-memory schema registry.
#[derive(Clone, Default)]
pub struct MemoryRegistry {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // The map is never left half-updated, so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Add a definition. A second definition with the same name and version
    /// is rejected.
    pub fn add(&self, definition: SchemaDefinition) -> Result<(), RegistryError> {
        let mut inner = self.write();
        let key = NameVersion(definition.name.clone(), definition.version);
        if inner.by_name_version.contains_key(&key) {
            return Err(RegistryError::AlreadyExists {
                name: definition.name,
                version: definition.version,
            });
        }
        debug!(name = %definition.name, version = definition.version, "schema registered");
        inner.insert(definition);
        Ok(())
    }

    /// Load all `.yaml` / `.yml` files from a directory recursively.
    ///
    /// Each file may contain multiple definitions (separated by `---`).
    /// Returns the total number of definitions loaded.
    pub fn load_directory(&self, dir: &Path) -> Result<usize, RegistryError> {
        let mut count = 0;
        for path in definition_files(dir)? {
            count += self.load_documents(&path)?;
        }
        info!(dir = %dir.display(), count, "schema directory loaded");
        Ok(count)
    }

    /// Load a single definition file. Returns the count of definitions loaded.
    pub fn load_file(&self, path: &Path) -> Result<usize, RegistryError> {
        let count = self.load_documents(path)?;
        if count == 0 {
            return Err(RegistryError::ParseError(format!(
                "{}: empty schema definition file",
                path.display()
            )));
        }
        Ok(count)
    }

    fn load_documents(&self, path: &Path) -> Result<usize, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        let definitions = DefinitionParser::parse_all(&content).map_err(|e| match e {
            RegistryError::ParseError(msg) => RegistryError::ParseError(format!("{}: {msg}", path.display())),
            other => other,
        })?;
        let count = definitions.len();
        for definition in definitions {
            self.add(definition)?;
        }
        debug!(file = %path.display(), count, "definition file loaded");
        Ok(count)
    }

    /// Returns the total number of definition versions stored.
    pub fn len(&self) -> usize {
        self.read().by_name_version.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Latest non-deprecated version of every definition, sorted by name.
    pub fn all_latest(&self) -> Vec<SchemaDefinition> {
        let inner = self.read();
        let mut definitions: Vec<SchemaDefinition> = inner
            .versions
            .keys()
            .filter_map(|name| {
                let v = inner.latest_version(name)?;
                inner.by_name_version.get(&NameVersion(name.clone(), v)).cloned()
            })
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }
}

impl SchemaRegistry for MemoryRegistry {
    fn get(&self, name: &str, version: Option<u32>) -> Option<SchemaDefinition> {
        let inner = self.read();
        let v = match version {
            Some(v) => v,
            None => inner.latest_version(name)?,
        };
        inner
            .by_name_version
            .get(&NameVersion(name.to_string(), v))
            .cloned()
    }

    fn history(&self, name: &str) -> Vec<SchemaDefinition> {
        let inner = self.read();
        let Some(versions) = inner.versions.get(name) else {
            return Vec::new();
        };
        versions
            .iter()
            .filter_map(|&v| {
                inner
                    .by_name_version
                    .get(&NameVersion(name.to_string(), v))
                    .cloned()
            })
            .collect()
    }

    fn all_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().versions.keys().cloned().collect();
        names.sort();
        names
    }
}

fn is_definition_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

/// Collect definition files under `dir` recursively, in a stable order.
fn definition_files(dir: &Path) -> Result<Vec<PathBuf>, RegistryError> {
    if !dir.is_dir() {
        return Err(RegistryError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        )));
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            files.extend(definition_files(&path)?);
        } else if is_definition_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sborcodec_core::types::SchemaType;

    fn make(name: &str, version: u32) -> SchemaDefinition {
        SchemaDefinition::new(name, version, SchemaType::Bool)
    }

    #[test]
    fn add_and_lookup() {
        let reg = MemoryRegistry::new();
        reg.add(make("Flag", 1)).unwrap();
        assert_eq!(reg.get("Flag", None).unwrap().version, 1);
        assert_eq!(reg.get("Flag", Some(1)).unwrap().name, "Flag");
        assert!(reg.get("Flag", Some(2)).is_none());
        assert!(reg.get("Other", None).is_none());
    }

    #[test]
    fn duplicate_rejected() {
        let reg = MemoryRegistry::new();
        reg.add(make("Flag", 1)).unwrap();
        let err = reg.add(make("Flag", 1)).unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyExists { version: 1, .. }));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn latest_version_skips_deprecated() {
        let reg = MemoryRegistry::new();
        let mut v3 = make("Foo", 3);
        v3.deprecated = true;
        reg.add(make("Foo", 1)).unwrap();
        reg.add(v3).unwrap();
        reg.add(make("Foo", 2)).unwrap();

        assert_eq!(reg.get("Foo", None).unwrap().version, 2);
        assert_eq!(reg.get("Foo", Some(3)).unwrap().version, 3);
        let history: Vec<u32> = reg.history("Foo").iter().map(|d| d.version).collect();
        assert_eq!(history, vec![1, 2, 3]);
    }

    #[test]
    fn all_deprecated_means_no_default() {
        let reg = MemoryRegistry::new();
        let mut only = make("Old", 1);
        only.deprecated = true;
        reg.add(only).unwrap();
        assert!(reg.get("Old", None).is_none());
        assert!(reg.all_latest().is_empty());
        assert_eq!(reg.all_names(), vec!["Old"]);
    }
}
