use std::marker::PhantomData;

use serde_json::Value;
use tracing::{debug, warn};

use super::{KeyValueStore, RecordSchema};
use crate::error::Result;

/// Where a collection lives in the store and which schema version it expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreNamespace {
    pub storage_key: String,
    pub reset_key: String,
    pub reset_version: String,
}

impl StoreNamespace {
    pub fn new(
        storage_key: impl Into<String>,
        reset_key: impl Into<String>,
        reset_version: impl Into<String>,
    ) -> Self {
        Self {
            storage_key: storage_key.into(),
            reset_key: reset_key.into(),
            reset_version: reset_version.into(),
        }
    }

    pub fn competitions() -> Self {
        Self::new(
            "reppi_competitions_v1",
            "reppi_competitions_reset_version",
            "2026-02-27-competition-model-reset",
        )
    }

    pub fn products() -> Self {
        Self::new(
            "reppi_inventory",
            "reppi_inventory_reset_version",
            "2026-02-27-inventory-split",
        )
    }

    pub fn athletes() -> Self {
        Self::new(
            "reppi_athletes_v1",
            "reppi_athletes_reset_version",
            "2026-02-27-athlete-roster",
        )
    }
}

/// Why stored data cannot be used as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetReason {
    /// Version marker absent or different from the expected one
    VersionMismatch { found: Option<String> },
    /// Marker is current but the collection itself is absent
    Missing,
    /// Collection is not a JSON array
    Malformed,
    /// Every stored record was dropped by sanitization
    Empty,
}

impl ResetReason {
    /// A schema change can never be kept, whatever the policy says
    pub fn forces_reseed(&self) -> bool {
        matches!(self, ResetReason::VersionMismatch { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inspection<T> {
    Healthy(Vec<T>),
    NeedsReset(ResetReason),
}

/// Decides whether a non-healthy collection is replaced by the seed
pub trait RecoveryPolicy {
    fn should_reseed(&self, reason: &ResetReason) -> bool;
}

/// Any problem reseeds. The store can never end up unusable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReseedOnCorruption;

impl RecoveryPolicy for ReseedOnCorruption {
    fn should_reseed(&self, _reason: &ResetReason) -> bool {
        true
    }
}

/// Keeps a well-formed collection that sanitized down to nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepEmptyCollections;

impl RecoveryPolicy for KeepEmptyCollections {
    fn should_reseed(&self, reason: &ResetReason) -> bool {
        !matches!(reason, ResetReason::Empty)
    }
}

/// Versioned collection of `R::Record` persisted as a JSON array.
pub struct PersistentCollection<S, R> {
    store: S,
    namespace: StoreNamespace,
    policy: Box<dyn RecoveryPolicy>,
    _schema: PhantomData<fn() -> R>,
}

impl<S: KeyValueStore, R: RecordSchema> PersistentCollection<S, R> {
    pub fn new(store: S, namespace: StoreNamespace) -> Self {
        Self::with_policy(store, namespace, ReseedOnCorruption)
    }

    pub fn with_policy(
        store: S,
        namespace: StoreNamespace,
        policy: impl RecoveryPolicy + 'static,
    ) -> Self {
        Self {
            store,
            namespace,
            policy: Box::new(policy),
            _schema: PhantomData,
        }
    }

    /// Reads and sanitizes the stored collection without writing anything
    pub fn inspect(&self) -> Result<Inspection<R::Record>> {
        let version = self.store.get(&self.namespace.reset_key)?;
        if version.as_deref() != Some(self.namespace.reset_version.as_str()) {
            return Ok(Inspection::NeedsReset(ResetReason::VersionMismatch {
                found: version,
            }));
        }

        let raw = match self.store.get(&self.namespace.storage_key)? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(Inspection::NeedsReset(ResetReason::Missing)),
        };

        let parsed = match serde_json::from_str::<Value>(&raw) {
            Ok(parsed) if parsed.is_array() => parsed,
            _ => return Ok(Inspection::NeedsReset(ResetReason::Malformed)),
        };

        let records = R::sanitize(&parsed);
        if records.is_empty() {
            return Ok(Inspection::NeedsReset(ResetReason::Empty));
        }

        Ok(Inspection::Healthy(records))
    }

    /// Loads the collection, replacing unusable data with the seed.
    ///
    /// Corruption and schema changes are never reported as errors; only
    /// failures of the backend itself are.
    pub fn load(&mut self) -> Result<Vec<R::Record>> {
        match self.inspect()? {
            Inspection::Healthy(records) => {
                debug!(
                    collection = R::LABEL,
                    count = records.len(),
                    "Loaded stored collection"
                );
                Ok(records)
            }
            Inspection::NeedsReset(reason) => {
                if reason.forces_reseed() || self.policy.should_reseed(&reason) {
                    warn!(collection = R::LABEL, ?reason, "Resetting storage to seed data");
                    self.reset()
                } else {
                    debug!(collection = R::LABEL, ?reason, "Keeping empty collection");
                    Ok(Vec::new())
                }
            }
        }
    }

    /// Blind overwrite of the whole collection
    pub fn save(&mut self, records: &[R::Record]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.store.set(&self.namespace.storage_key, &json)
    }

    /// Writes the seed and the current version marker
    pub fn reset(&mut self) -> Result<Vec<R::Record>> {
        let seeded = R::seed();
        self.save(&seeded)?;
        self.store
            .set(&self.namespace.reset_key, &self.namespace.reset_version)?;
        Ok(seeded)
    }
}
