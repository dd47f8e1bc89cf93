//! In-process cache

use std::collections::HashMap;
use std::sync::Mutex;

use dronesig_core::ExpectedSignature;

use crate::{CacheError, CacheKey, ResultCache};

/// Expected signatures held in a `HashMap` for the life of the process
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, ExpectedSignature>>,
}

impl MemoryCache {
    /// Empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry
    pub fn clear(&self) -> Result<(), CacheError> {
        self.entries.lock().map_err(|_| CacheError::Poisoned)?.clear();
        Ok(())
    }
}

impl ResultCache for MemoryCache {
    fn lookup(&self, key: &CacheKey) -> Option<ExpectedSignature> {
        match self.entries.lock() {
            Ok(entries) => entries.get(key).cloned(),
            Err(_) => {
                log::warn!("Memory cache lock poisoned, treating {} as a miss", key);
                None
            }
        }
    }

    fn store(&self, key: &CacheKey, value: &ExpectedSignature) -> Result<(), CacheError> {
        self.entries
            .lock()
            .map_err(|_| CacheError::Poisoned)?
            .insert(key.clone(), value.clone());
        Ok(())
    }
}
