use std::fs;
use std::path::{Path, PathBuf};

use super::{entry_size, KeyValueStorage};
use crate::atomic::{self, AtomicFile};
use crate::{FolioError, Result};

const LOG_PREFIX: &str = "[storage]";

/// Directory-backed storage. Every key lives in its own versioned
/// [`AtomicFile`], so a failed write never leaves a half-written value.
pub struct FileStorage {
    log_prefix: String,
    label: String,
    root: PathBuf,
    quota: Option<usize>,
}

impl FileStorage {
    /// Create a new file storage with a diagnostic label and root directory
    pub fn new(label: impl Into<String>, root: &Path) -> Result<Self> {
        let label = label.into();
        fs::create_dir_all(root)?;
        Ok(Self {
            log_prefix: format!("{} {}", LOG_PREFIX, label),
            label,
            root: root.to_path_buf(),
            quota: None,
        })
    }

    pub fn with_quota(mut self, quota: Option<usize>) -> Self {
        self.quota = quota;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry(&self, key: &str) -> Result<AtomicFile> {
        self.verify_key(key)?;
        Ok(AtomicFile::new(self.root.join(key))?)
    }

    fn verify_key(&self, key: &str) -> Result<()> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "_.-".contains(c));
        if valid && key != "." && key != ".." {
            Ok(())
        } else {
            Err(FolioError::Storage(
                self.label.clone(),
                format!("invalid key {:?}", key),
            ))
        }
    }

    /// Bytes held by every key other than `except`.
    fn used_bytes_except(&self, except: &str) -> Result<usize> {
        let mut used = 0;
        for entry in fs::read_dir(&self.root)?.flatten() {
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name();
            let Some(key) = name.to_str() else {
                continue;
            };
            if key == except {
                continue;
            }
            let file = AtomicFile::new(entry.path())?;
            if let Some(data) = atomic::read_latest(&file)? {
                used += key.len() + data.len();
            }
        }
        Ok(used)
    }
}

impl KeyValueStorage for FileStorage {
    fn label(&self) -> &str {
        &self.label
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.verify_key(key)?;
        let path = self.root.join(key);
        if !path.exists() {
            return Ok(None);
        }
        let file = AtomicFile::new(path)?;
        match atomic::read_latest(&file)? {
            Some(data) => Ok(Some(String::from_utf8(data).map_err(|_| {
                FolioError::Storage(
                    self.label.clone(),
                    format!("value of {} is not UTF-8", key),
                )
            })?)),
            None => Ok(None),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.verify_key(key)?;
        if let Some(quota) = self.quota {
            let needed = self.used_bytes_except(key)? + entry_size(key, value);
            if needed > quota {
                log::error!(
                    "{} quota of {} bytes exceeded by {}",
                    self.log_prefix,
                    quota,
                    key
                );
                return Err(FolioError::QuotaExceeded { needed, quota });
            }
        }
        let file = self.entry(key)?;
        atomic::replace(&file, value.as_bytes())?;
        log::debug!(
            "{} {} bytes written to {}",
            self.log_prefix,
            value.len(),
            key
        );
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.verify_key(key)?;
        AtomicFile {
            directory: self.root.join(key),
            prefix: format!("{}.", key),
        }
        .erase()?;
        log::debug!("{} {} removed", self.log_prefix, key);
        Ok(())
    }
}
