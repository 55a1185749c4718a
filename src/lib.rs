//! Profile content store: the editing and persistence core of a static
//! portfolio site.
//!
//! A [`ProfileStore`] resolves the canonical [`ProfileSnapshot`] from a
//! [`KeyValueStorage`], falling back to the built-in default. Editing
//! happens on a [`WorkingCopy`]; images go through the [`Ingestor`] before
//! they land in it. The result is either committed back to the store or
//! rendered by the [`Exporter`] as source text for redeployment.

use std::sync::Once;

pub mod atomic;
pub mod config;
pub mod defaults;
pub mod editor;
mod errors;
pub mod export;
pub mod gate;
pub mod id;
pub mod ingest;
pub mod model;
pub mod storage;
pub mod store;

pub use config::Settings;
pub use editor::{
    Confirm, EditOutcome, FieldUpdate, ImageTarget, RecordSection, Section,
    WorkingCopy,
};
pub use errors::{FolioError, Result};
pub use export::{Clipboard, Exporter, MemoryClipboard};
pub use gate::AccessGate;
pub use id::RecordId;
pub use ingest::{BatchReport, Ingestor, RawFile};
pub use model::{ImageSource, InlineImage, ProfileSnapshot};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{LoadOrigin, Presenter, ProfileStore};

static INIT: Once = Once::new();

/// Install the logger. Safe to call more than once.
pub fn initialize() {
    INIT.call_once(|| {
        let _ = env_logger::try_init();
        log::debug!("folio store initialized");
    });
}
