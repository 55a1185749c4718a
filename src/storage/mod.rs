pub mod file_storage;
pub mod memory_storage;

pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

use crate::Result;

/// String key-value storage with browser local-storage semantics.
///
/// `set_item` either stores the whole value or fails leaving the previous
/// value in place.
pub trait KeyValueStorage {
    /// Diagnostic label used in logs and errors.
    fn label(&self) -> &str;

    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove_item(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn label(&self) -> &str {
        (**self).label()
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

/// Bytes an entry occupies against a quota.
pub(crate) fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}
