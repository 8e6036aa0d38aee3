//! Key-value persistence behind the repositories.
//!
//! A [`KeyValueStore`] is the only thing the domain needs from a backend:
//! string values under string keys, overwritten whole. [`PersistentCollection`]
//! layers the versioned load/save/reset algorithm on top of it.

mod collection;
mod file;
mod memory;
mod schema;

pub use collection::{
    Inspection, KeepEmptyCollections, PersistentCollection, RecoveryPolicy, ReseedOnCorruption,
    ResetReason, StoreNamespace,
};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use schema::{AthleteSchema, CompetitionSchema, ProductSchema, RecordSchema};

use crate::error::Result;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
