use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::export::Exporter;
use crate::gate::AccessGate;
use crate::ingest::Ingestor;
use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage};
use crate::store::ProfileStore;
use crate::{FolioError, Result};

pub const DEFAULT_STORAGE_KEY: &str = "pt_portfolio_data";
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_PASSCODE: &str = "0723";

/// Settings of a content store instance, persisted as TOML.
///
/// Missing keys take their default, so a file only needs the values it
/// changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name of the persisted entry.
    pub storage_key: String,
    /// Directory of the file storage. In-memory storage when unset.
    pub storage_dir: Option<PathBuf>,
    pub storage_quota_bytes: Option<usize>,
    pub max_image_width: u32,
    /// Lossy quality factor in (0, 1].
    pub image_quality: f64,
    pub export_ceiling_mb: f64,
    pub passcode: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            storage_dir: None,
            storage_quota_bytes: Some(DEFAULT_QUOTA_BYTES),
            max_image_width: crate::ingest::DEFAULT_MAX_WIDTH,
            image_quality: 0.7,
            export_ceiling_mb: crate::export::DEFAULT_CEILING_MB,
            passcode: DEFAULT_PASSCODE.to_owned(),
        }
    }
}

impl Settings {
    /// Loads the settings from `path`. If the file does not exist, returns
    /// the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).with_context(|| {
            format!("Failed to read settings file: {}", path.display())
        })?;
        let settings: Settings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Saves the settings to `path`, creating the directory if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| {
                format!(
                    "Failed to create settings directory: {}",
                    dir.display()
                )
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| {
            format!("Failed to write settings file: {}", path.display())
        })?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage_key.is_empty() {
            return Err(FolioError::Config("storage_key is empty".to_owned()));
        }
        if self.max_image_width == 0 {
            return Err(FolioError::Config(
                "max_image_width must be positive".to_owned(),
            ));
        }
        if !(self.image_quality > 0.0 && self.image_quality <= 1.0) {
            return Err(FolioError::Config(format!(
                "image_quality {} is outside (0, 1]",
                self.image_quality
            )));
        }
        if !(self.export_ceiling_mb > 0.0) {
            return Err(FolioError::Config(format!(
                "export_ceiling_mb {} must be positive",
                self.export_ceiling_mb
            )));
        }
        Ok(())
    }

    pub fn ceiling_bytes(&self) -> usize {
        (self.export_ceiling_mb * 1024.0 * 1024.0) as usize
    }

    /// Quality on the JPEG encoder scale.
    pub fn jpeg_quality(&self) -> u8 {
        (self.image_quality * 100.0).round().clamp(1.0, 100.0) as u8
    }

    pub fn ingestor(&self) -> Ingestor {
        Ingestor::new(self.max_image_width, self.jpeg_quality())
    }

    pub fn exporter(&self) -> Exporter {
        Exporter::new(self.ceiling_bytes())
    }

    pub fn gate(&self) -> AccessGate {
        AccessGate::new(self.passcode.clone())
    }

    /// A store on the configured storage backend. The snapshot is not
    /// loaded yet.
    pub fn open_store(&self) -> Result<ProfileStore<Box<dyn KeyValueStorage>>> {
        let storage: Box<dyn KeyValueStorage> = match &self.storage_dir {
            Some(dir) => Box::new(
                FileStorage::new("profile", dir)?
                    .with_quota(self.storage_quota_bytes),
            ),
            None => Box::new(match self.storage_quota_bytes {
                Some(quota) => MemoryStorage::with_quota("profile", quota),
                None => MemoryStorage::new("profile"),
            }),
        };
        Ok(ProfileStore::open(storage, self.storage_key.clone()))
    }
}
