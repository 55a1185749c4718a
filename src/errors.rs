use std::str::Utf8Error;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FolioError>;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parsing error")]
    Parse,
    #[error("Storage error: {0} {1}")]
    Storage(String, String),
    #[error("Storage quota exceeded: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error(
        "Payload of {size} bytes exceeds the export ceiling of {ceiling} bytes"
    )]
    SizeExceeded { size: usize, ceiling: usize },
    #[error("Clipboard error: {0}")]
    Clipboard(String),
    #[error("Image decode error: {0}")]
    Decode(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<Utf8Error> for FolioError {
    fn from(_: Utf8Error) -> Self {
        Self::Parse
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(_: serde_json::Error) -> Self {
        Self::Parse
    }
}

impl From<image::ImageError> for FolioError {
    fn from(e: image::ImageError) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<toml::de::Error> for FolioError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for FolioError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<tokio::task::JoinError> for FolioError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Other(anyhow::anyhow!(e.to_string()))
    }
}
