use std::collections::HashSet;

use log::{info, warn};

use crate::error::{StorageError, StorageResult};
use crate::models::Task;
use crate::store::kv::KeyValueStore;

/// Key of the serialized task collection.
pub const TASKS_KEY: &str = "study-tasks";
/// Where an unreadable task blob is copied before it gets overwritten.
pub const CORRUPT_TASKS_KEY: &str = "study-tasks-corrupt";
/// Key of the monotonic completion counter used by lifetime awards.
pub const LIFETIME_COMPLETED_KEY: &str = "study-lifetime-completed";

/// Load/save of the whole task collection as one JSON blob.
pub struct TaskStorage<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> TaskStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Read and decode the collection, reporting any failure.
    #[cfg(test)]
    pub fn try_load(&self) -> StorageResult<Vec<Task>> {
        match self.store.get(TASKS_KEY)? {
            None => Ok(Vec::new()),
            Some(raw) => decode_tasks(&raw),
        }
    }

    /// Load the collection, falling back to an empty one on any failure.
    ///
    /// A blob that exists but cannot be decoded is copied to
    /// `CORRUPT_TASKS_KEY` first so the next save does not destroy it.
    pub fn load(&mut self) -> Vec<Task> {
        let raw = match self.store.get(TASKS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("event=tasks_load status=empty");
                return Vec::new();
            }
            Err(e) => {
                warn!("event=tasks_load status=read_failed error={}", e);
                return Vec::new();
            }
        };

        match decode_tasks(&raw) {
            Ok(tasks) => {
                info!("event=tasks_load status=ok count={}", tasks.len());
                tasks
            }
            Err(e) => {
                warn!("event=tasks_load status=corrupt error={}", e);
                if let Err(e) = self.store.set(CORRUPT_TASKS_KEY, &raw) {
                    warn!("event=tasks_quarantine status=failed error={}", e);
                }
                Vec::new()
            }
        }
    }

    /// Overwrite the stored blob with the full collection.
    pub fn save(&mut self, tasks: &[Task]) -> StorageResult<()> {
        let json = serde_json::to_string(tasks)?;
        self.store.set(TASKS_KEY, &json)
    }

    /// Lifetime completion counter; `None` when it was never written or
    /// cannot be read.
    pub fn load_lifetime_completed(&self) -> Option<u64> {
        match self.store.get(LIFETIME_COMPLETED_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(count) => Some(count),
                Err(e) => {
                    warn!("event=lifetime_load status=corrupt error={}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("event=lifetime_load status=read_failed error={}", e);
                None
            }
        }
    }

    pub fn save_lifetime_completed(&mut self, count: u64) -> StorageResult<()> {
        self.store.set(LIFETIME_COMPLETED_KEY, &count.to_string())
    }
}

/// Decode a stored blob. Records with a blank title or a repeated id break
/// collection invariants and are dropped.
fn decode_tasks(raw: &str) -> StorageResult<Vec<Task>> {
    let parsed: Vec<Task> = serde_json::from_str(raw).map_err(|e| StorageError::Corrupt {
        key: TASKS_KEY.to_string(),
        reason: e.to_string(),
    })?;

    let total = parsed.len();
    let mut seen = HashSet::new();
    let tasks: Vec<Task> = parsed
        .into_iter()
        .filter(|t| !t.title.trim().is_empty())
        .filter(|t| seen.insert(t.id.clone()))
        .collect();

    if tasks.len() != total {
        warn!(
            "event=tasks_load status=sanitized dropped={}",
            total - tasks.len()
        );
    }
    Ok(tasks)
}
