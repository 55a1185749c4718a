//! Image ingestion: decode, downsample, re-encode as JPEG, embed inline.

use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, GenericImageView};

use crate::model::InlineImage;
use crate::Result;

const LOG_PREFIX: &str = "[ingest]";

pub const DEFAULT_MAX_WIDTH: u32 = 1200;
pub const DEFAULT_QUALITY: u8 = 70;
const OUTPUT_MIME: &str = "image/jpeg";

/// An uploaded file before decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(path.display().to_string(), bytes))
    }
}

/// A file of a batch that produced no image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestFailure {
    /// Position of the file in the submitted batch.
    pub index: usize,
    pub name: String,
    pub reason: String,
}

/// Outcome of a batch: the images that made it, in submission order, and
/// the files that were dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub images: Vec<InlineImage>,
    pub failures: Vec<IngestFailure>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ingestor {
    max_width: u32,
    quality: u8,
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WIDTH, DEFAULT_QUALITY)
    }
}

/// Target dimensions: width capped at `max_width`, height scaled to keep
/// the aspect ratio. Never upscales.
pub fn target_dimensions(
    width: u32,
    height: u32,
    max_width: u32,
) -> (u32, u32) {
    if width <= max_width {
        return (width, height);
    }
    let scaled = (height as f64 * max_width as f64 / width as f64).round();
    (max_width, (scaled as u32).max(1))
}

impl Ingestor {
    /// `quality` is clamped to the JPEG range 1..=100.
    pub fn new(max_width: u32, quality: u8) -> Self {
        Self {
            max_width: max_width.max(1),
            quality: quality.clamp(1, 100),
        }
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Ingest one file synchronously.
    pub fn ingest_bytes(&self, bytes: &[u8]) -> Result<InlineImage> {
        let decoded = image::load_from_memory(bytes)?;
        let (width, height) = decoded.dimensions();
        let (new_width, new_height) =
            target_dimensions(width, height, self.max_width);
        let resized = if (new_width, new_height) != (width, height) {
            log::trace!(
                "{} downsampling {}x{} to {}x{}",
                LOG_PREFIX,
                width,
                height,
                new_width,
                new_height
            );
            decoded.resize_exact(new_width, new_height, FilterType::Triangle)
        } else {
            decoded
        };
        let encoded = self.encode(&resized)?;
        Ok(InlineImage::from_bytes(OUTPUT_MIME, &encoded))
    }

    fn encode(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        // JPEG has no alpha channel.
        let rgb = image.to_rgb8();
        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, self.quality).encode(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ColorType::Rgb8,
        )?;
        Ok(buf)
    }

    /// Ingest every file on the blocking pool and collect the results in
    /// submission order. A file that fails is logged and dropped; the
    /// others still come through.
    pub async fn ingest_batch(&self, files: Vec<RawFile>) -> BatchReport {
        let handles: Vec<_> = files
            .into_iter()
            .map(|file| {
                let ingestor = *self;
                let name = file.name.clone();
                let handle = tokio::task::spawn_blocking(move || {
                    ingestor.ingest_bytes(&file.bytes)
                });
                (name, handle)
            })
            .collect();

        let mut report = BatchReport::default();
        for (index, (name, handle)) in handles.into_iter().enumerate() {
            let outcome = match handle.await {
                Ok(result) => result,
                Err(e) => Err(e.into()),
            };
            match outcome {
                Ok(image) => report.images.push(image),
                Err(e) => {
                    log::warn!("{} dropping {}: {}", LOG_PREFIX, name, e);
                    report.failures.push(IngestFailure {
                        index,
                        name,
                        reason: e.to_string(),
                    });
                }
            }
        }
        log::debug!(
            "{} batch done, {} ingested, {} dropped",
            LOG_PREFIX,
            report.images.len(),
            report.failures.len()
        );
        report
    }

    /// Read and ingest files from disk. Unreadable files are reported the
    /// same way as undecodable ones.
    pub async fn ingest_paths(&self, paths: &[PathBuf]) -> BatchReport {
        let mut files = Vec::with_capacity(paths.len());
        let mut unreadable = Vec::new();
        for (index, path) in paths.iter().enumerate() {
            match RawFile::from_path(path).await {
                Ok(file) => files.push((index, file)),
                Err(e) => {
                    log::warn!(
                        "{} cannot read {}: {}",
                        LOG_PREFIX,
                        path.display(),
                        e
                    );
                    unreadable.push(IngestFailure {
                        index,
                        name: path.display().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        let (positions, files): (Vec<_>, Vec<_>) = files.into_iter().unzip();
        let mut report = self.ingest_batch(files).await;
        for failure in report.failures.iter_mut() {
            failure.index = positions[failure.index];
        }
        report.failures.extend(unreadable);
        report.failures.sort_by_key(|failure| failure.index);
        report
    }

    /// [`Ingestor::ingest_batch`] for callers outside a runtime.
    pub fn ingest_batch_sync(
        &self,
        files: Vec<RawFile>,
    ) -> Result<BatchReport> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(runtime.block_on(self.ingest_batch(files)))
    }
}
