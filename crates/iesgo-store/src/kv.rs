//! The key-value storage seam.
//!
//! Session state is mirrored into a flat string-to-string store, one entry
//! per entity. Any backend that can do that implements [`KvStore`].

use crate::error::Result;

pub trait KvStore: Send + Sync {
    /// Read a value. Missing keys are `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite a value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key. Returns `true` if it existed.
    fn remove(&self, key: &str) -> Result<bool>;

    /// Delete several keys, ignoring the ones that are absent.
    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }

    /// Delete every key, including ones this application did not write.
    fn clear(&self) -> Result<()>;

    /// All keys currently stored, sorted.
    fn keys(&self) -> Result<Vec<String>>;
}
