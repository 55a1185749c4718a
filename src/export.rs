//! Publishing: render a snapshot as the source literal of the site's
//! default data and hand it to a clipboard.

use crate::model::ProfileSnapshot;
use crate::{FolioError, Result};

const LOG_PREFIX: &str = "[export]";

const HEADER: &str = "import { ProfileData } from './types';\n\n\
                      export const INITIAL_DATA: ProfileData = ";

pub const DEFAULT_CEILING_MB: f64 = 15.0;

/// Destination of exported text.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// In-process clipboard, optionally refusing every write.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
    deny: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that rejects writes, like a browser without permission.
    pub fn denied() -> Self {
        Self {
            contents: None,
            deny: true,
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.deny {
            return Err(FolioError::Clipboard("permission denied".to_owned()));
        }
        self.contents = Some(text.to_owned());
        Ok(())
    }
}

#[cfg(feature = "system-clipboard")]
pub use system::SystemClipboard;

#[cfg(feature = "system-clipboard")]
mod system {
    use super::Clipboard;
    use crate::{FolioError, Result};

    /// The desktop clipboard.
    pub struct SystemClipboard {
        inner: arboard::Clipboard,
    }

    impl SystemClipboard {
        pub fn new() -> Result<Self> {
            let inner = arboard::Clipboard::new().map_err(|e| {
                FolioError::Clipboard(format!(
                    "Failed to access clipboard: {}",
                    e
                ))
            })?;
            Ok(Self { inner })
        }
    }

    impl Clipboard for SystemClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            self.inner.set_text(text).map_err(|e| {
                FolioError::Clipboard(format!("Failed to copy: {}", e))
            })
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Exporter {
    ceiling: usize,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::from_mb(DEFAULT_CEILING_MB)
    }
}

impl Exporter {
    /// `ceiling` in bytes of the compact JSON form of a snapshot, the same
    /// measure [`WorkingCopy::payload_report`] shows while editing.
    ///
    /// The rendered text is pretty printed and carries the declaration
    /// header, so it is longer than the measured size: a snapshot just
    /// under the ceiling yields text somewhat over it.
    ///
    /// [`WorkingCopy::payload_report`]:
    ///     crate::editor::WorkingCopy::payload_report
    pub fn new(ceiling: usize) -> Self {
        Self { ceiling }
    }

    pub fn from_mb(mb: f64) -> Self {
        Self::new((mb * 1024.0 * 1024.0) as usize)
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Compact JSON size of `snapshot`, or [`FolioError::SizeExceeded`]
    /// when it is over the ceiling.
    pub fn check_size(&self, snapshot: &ProfileSnapshot) -> Result<usize> {
        let size = snapshot.serialized_size()?;
        if size > self.ceiling {
            log::warn!(
                "{} refused, {} bytes over the {} byte ceiling",
                LOG_PREFIX,
                size,
                self.ceiling
            );
            return Err(FolioError::SizeExceeded {
                size,
                ceiling: self.ceiling,
            });
        }
        Ok(size)
    }

    /// Source text defining the default snapshot constant.
    pub fn render(&self, snapshot: &ProfileSnapshot) -> Result<String> {
        self.check_size(snapshot)?;
        let body = serde_json::to_string_pretty(snapshot)?;
        Ok(format!("{}{};", HEADER, body))
    }

    /// Render and place the text on `clipboard`. Returns the text that was
    /// copied.
    pub fn publish(
        &self,
        snapshot: &ProfileSnapshot,
        clipboard: &mut impl Clipboard,
    ) -> Result<String> {
        let text = self.render(snapshot)?;
        clipboard.set_text(&text)?;
        log::info!("{} {} bytes copied", LOG_PREFIX, text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_snapshot;
    use crate::model::{ImageSource, InlineImage};

    fn with_payload(bytes: usize) -> ProfileSnapshot {
        let mut snapshot = default_snapshot();
        snapshot
            .certification_images
            .push(ImageSource::from(InlineImage::from_bytes(
                "image/jpeg",
                &vec![7u8; bytes],
            )));
        snapshot
    }

    #[test]
    fn render_is_a_literal_assignment() {
        let snapshot = default_snapshot();
        let text = Exporter::default().render(&snapshot).unwrap();
        assert!(text.starts_with(
            "import { ProfileData } from './types';\n\n\
             export const INITIAL_DATA: ProfileData = {\n  \"name\": "
        ));
        assert!(text.ends_with("};"));
        assert!(text.contains("\"profileImageUrl\": \"./profile.jpg\""));

        let body = text
            .strip_prefix(HEADER)
            .and_then(|rest| rest.strip_suffix(';'))
            .unwrap();
        assert_eq!(ProfileSnapshot::from_json(body).unwrap(), snapshot);
    }

    #[test]
    fn size_at_the_ceiling_passes() {
        let snapshot = with_payload(4096);
        let size = snapshot.serialized_size().unwrap();
        let text = Exporter::new(size).render(&snapshot).unwrap();
        // The ceiling bounds the compact form, not the pretty text.
        assert!(text.len() > size);
        assert_eq!(
            Exporter::new(size + 1).check_size(&snapshot).unwrap(),
            size
        );
    }

    #[test]
    fn oversized_export_is_refused() {
        let snapshot = with_payload(4096);
        let size = snapshot.serialized_size().unwrap();
        let mut clipboard = MemoryClipboard::new();
        let err = Exporter::new(size - 1)
            .publish(&snapshot, &mut clipboard)
            .unwrap_err();
        match err {
            FolioError::SizeExceeded {
                size: measured,
                ceiling,
            } => {
                assert_eq!(measured, size);
                assert_eq!(ceiling, size - 1);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(clipboard.contents(), None);
    }

    #[test]
    fn clipboard_failure_is_reported_separately() {
        let snapshot = default_snapshot();
        let mut clipboard = MemoryClipboard::denied();
        let err = Exporter::default()
            .publish(&snapshot, &mut clipboard)
            .unwrap_err();
        assert!(matches!(err, FolioError::Clipboard(_)));
    }

    #[test]
    fn publish_copies_the_rendered_text() {
        let snapshot = default_snapshot();
        let mut clipboard = MemoryClipboard::new();
        let exporter = Exporter::default();
        let text = exporter.publish(&snapshot, &mut clipboard).unwrap();
        assert_eq!(clipboard.contents(), Some(text.as_str()));
        assert_eq!(exporter.ceiling(), 15 * 1024 * 1024);
    }
}
