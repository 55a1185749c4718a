use std::collections::BTreeMap;

use super::{entry_size, KeyValueStorage};
use crate::{FolioError, Result};

/// In-memory storage with an optional byte quota.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    label: String,
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            entries: BTreeMap::new(),
            quota: None,
        }
    }

    pub fn with_quota(label: impl Into<String>, quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::new(label)
        }
    }

    /// Total bytes held, counting keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|(k, v)| entry_size(k, v))
            .sum()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn label(&self) -> &str {
        &self.label
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota {
            let replaced = self
                .entries
                .get(key)
                .map_or(0, |old| entry_size(key, old));
            let needed = self.used_bytes() - replaced + entry_size(key, value);
            if needed > quota {
                log::error!(
                    "[storage] {} quota of {} bytes exceeded by {}",
                    self.label,
                    quota,
                    key
                );
                return Err(FolioError::QuotaExceeded { needed, quota });
            }
        }
        self.entries
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
