//! Canonical profile snapshot and its persisted form.

use std::fmt;

use crate::defaults::default_snapshot;
use crate::editor::WorkingCopy;
use crate::model::ProfileSnapshot;
use crate::storage::KeyValueStorage;
use crate::Result;

const LOG_PREFIX: &str = "[store]";

/// Receives every snapshot the store resolves or commits, so rendered
/// content follows without a reload.
pub trait Presenter {
    fn present(&mut self, snapshot: &ProfileSnapshot);
}

impl<F> Presenter for F
where
    F: FnMut(&ProfileSnapshot),
{
    fn present(&mut self, snapshot: &ProfileSnapshot) {
        self(snapshot)
    }
}

/// Where a loaded snapshot came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOrigin {
    Persisted,
    /// The built-in default, with the reason the persisted entry was not
    /// used.
    Fallback(FallbackReason),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    Absent,
    /// The entry exists but does not parse as the current snapshot shape.
    /// Entries written by older layouts land here too; they are not
    /// migrated.
    Unparseable,
    Unreadable(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Absent => f.write_str("no persisted entry"),
            FallbackReason::Unparseable => {
                f.write_str("persisted entry does not parse")
            }
            FallbackReason::Unreadable(e) => {
                write!(f, "persisted entry unreadable: {}", e)
            }
        }
    }
}

/// Owns the canonical snapshot. Callers never reach the storage directly;
/// every write goes through [`ProfileStore::commit`].
pub struct ProfileStore<S: KeyValueStorage> {
    storage: S,
    key: String,
    current: ProfileSnapshot,
    presenters: Vec<Box<dyn Presenter>>,
}

impl<S: KeyValueStorage> ProfileStore<S> {
    /// The store starts on the built-in default until [`load`] is called.
    ///
    /// [`load`]: ProfileStore::load
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            current: default_snapshot(),
            presenters: vec![],
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn current(&self) -> &ProfileSnapshot {
        &self.current
    }

    pub fn subscribe(&mut self, presenter: Box<dyn Presenter>) {
        self.presenters.push(presenter);
    }

    /// Resolve the snapshot from storage, falling back to the default.
    pub fn load(&mut self) -> ProfileSnapshot {
        self.load_with_origin().0
    }

    pub fn load_with_origin(&mut self) -> (ProfileSnapshot, LoadOrigin) {
        let (snapshot, origin) = match self.read_persisted() {
            Ok(snapshot) => (snapshot, LoadOrigin::Persisted),
            Err(reason) => {
                log::warn!(
                    "{} {}, using the built-in default",
                    LOG_PREFIX,
                    reason
                );
                (default_snapshot(), LoadOrigin::Fallback(reason))
            }
        };
        if origin == LoadOrigin::Persisted {
            log::info!(
                "{} loaded {} from {}",
                LOG_PREFIX,
                self.key,
                self.storage.label()
            );
        }
        self.current = snapshot.clone();
        self.notify();
        (snapshot, origin)
    }

    fn read_persisted(
        &self,
    ) -> std::result::Result<ProfileSnapshot, FallbackReason> {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Err(FallbackReason::Absent),
            Err(e) => return Err(FallbackReason::Unreadable(e.to_string())),
        };
        ProfileSnapshot::from_json(&raw)
            .map_err(|_| FallbackReason::Unparseable)
    }

    /// Start an editing session on a deep copy of the current snapshot.
    pub fn begin_editing(&self) -> WorkingCopy {
        WorkingCopy::open(&self.current)
    }

    /// Persist `snapshot` as the whole stored value, then make it current.
    ///
    /// On failure neither the stored value nor the current snapshot
    /// changes and presenters are not notified.
    pub fn commit(&mut self, snapshot: ProfileSnapshot) -> Result<()> {
        let json = snapshot.to_json()?;
        if let Err(e) = self.storage.set_item(&self.key, &json) {
            log::error!(
                "{} commit of {} bytes to {} failed: {}",
                LOG_PREFIX,
                json.len(),
                self.storage.label(),
                e
            );
            return Err(e);
        }
        log::info!(
            "{} committed {} bytes to {}",
            LOG_PREFIX,
            json.len(),
            self.storage.label()
        );
        self.current = snapshot;
        self.notify();
        Ok(())
    }

    /// Drop the persisted entry. The current snapshot is kept.
    pub fn forget(&mut self) -> Result<()> {
        self.storage.remove_item(&self.key)?;
        log::info!("{} removed {}", LOG_PREFIX, self.key);
        Ok(())
    }

    fn notify(&mut self) {
        for presenter in self.presenters.iter_mut() {
            presenter.present(&self.current);
        }
    }
}
