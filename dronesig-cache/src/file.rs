//! On-disk cache, one JSON document per key

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use dronesig_core::ExpectedSignature;
use tempfile::NamedTempFile;

use crate::{CacheError, CacheKey, ResultCache};

const ENTRY_EXTENSION: &str = "json";

/// Directory of `<key>.json` files
///
/// Each write goes to its own uniquely named temporary file in the cache
/// directory and is renamed into place, so concurrent writers never share a
/// staging file and a reader sees either the old entry, a new one, or nothing.
#[derive(Debug, Clone)]
pub struct FileCache {
    directory: PathBuf,
}

impl FileCache {
    /// Open `directory`, creating it if needed
    pub fn open(directory: impl AsRef<Path>) -> Result<Self, CacheError> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory)?;
        log::debug!("File cache opened at {}", directory.display());
        Ok(Self { directory })
    }

    /// Cache directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path holding the entry for `key`
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.directory.join(format!("{}.{}", key, ENTRY_EXTENSION))
    }

    fn read_entry(&self, path: &Path) -> Result<ExpectedSignature, CacheError> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl ResultCache for FileCache {
    fn lookup(&self, key: &CacheKey) -> Option<ExpectedSignature> {
        let path = self.entry_path(key);
        match self.read_entry(&path) {
            Ok(value) => Some(value),
            Err(CacheError::Io(error)) if error.kind() == io::ErrorKind::NotFound => None,
            Err(error) => {
                log::warn!("Ignoring unreadable cache entry {}: {}", path.display(), error);
                None
            }
        }
    }

    fn store(&self, key: &CacheKey, value: &ExpectedSignature) -> Result<(), CacheError> {
        let path = self.entry_path(key);

        let mut staging = NamedTempFile::new_in(&self.directory)?;
        serde_json::to_writer(staging.as_file_mut(), value)?;
        staging.as_file_mut().flush()?;
        staging.persist(&path).map_err(|error| error.error)?;

        log::trace!("Stored cache entry {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dronesig_core::{DroneScenario, EstimatorConfig, ScenarioRequest};
    use tempfile::TempDir;

    fn key() -> CacheKey {
        let drone = DroneScenario::new(5000.0, 2.0, 0.3, 70.0, 0.4);
        let request = ScenarioRequest::drone(drone, Some(3));
        CacheKey::for_request(&EstimatorConfig::quick(), &request).unwrap()
    }

    fn signature() -> ExpectedSignature {
        ExpectedSignature {
            values: vec![1.0, 0.125, -3.5, 0.0, 2.0, 0.0, 1.0],
            n_reflections: 10,
            truncation_level: 2,
            stream_width: 2,
        }
    }

    #[test]
    fn test_entries_survive_reopen() {
        let dir = TempDir::new().unwrap();
        FileCache::open(dir.path()).unwrap().store(&key(), &signature()).unwrap();

        let reopened = FileCache::open(dir.path()).unwrap();
        assert_eq!(reopened.lookup(&key()), Some(signature()));
        assert!(reopened.entry_path(&key()).exists());
    }

    #[test]
    fn test_missing_entry_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::open(dir.path().join("nested").join("cache")).unwrap();
        assert!(cache.directory().is_dir());
        assert!(cache.lookup(&key()).is_none());
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::open(dir.path()).unwrap();
        fs::write(cache.entry_path(&key()), b"{ not json").unwrap();

        assert!(cache.lookup(&key()).is_none());

        // A later store repairs the entry
        cache.store(&key(), &signature()).unwrap();
        assert_eq!(cache.lookup(&key()), Some(signature()));
    }

    #[test]
    fn test_concurrent_stores_leave_one_valid_entry() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::open(dir.path()).unwrap();

        std::thread::scope(|scope| {
            for writer in 0..8 {
                let cache = &cache;
                scope.spawn(move || {
                    let mut value = signature();
                    value.n_reflections = writer;
                    for _ in 0..20 {
                        cache.store(&key(), &value).unwrap();
                    }
                });
            }
        });

        let stored = cache.lookup(&key()).expect("entry readable after concurrent writes");
        assert_eq!(stored.values, signature().values);
        assert!(stored.n_reflections < 8);

        let files = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 1, "staging files left behind");
    }
}
