//! Keyed per-issue mutual exclusion.
//!
//! Each issue gets its own async mutex, created on first use and dropped
//! once nobody holds or waits for it. Operations on different issues never
//! contend. Map entries for dropped mutexes are swept in batches, once the
//! map has doubled since the previous sweep.

use crate::issue::domain::IssueId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Pool of per-issue locks.
#[derive(Debug, Default)]
pub struct IssueLocks {
    table: Mutex<SlotTable>,
}

#[derive(Debug)]
struct SlotTable {
    slots: HashMap<IssueId, Weak<AsyncMutex<()>>>,
    sweep_at: usize,
}

impl Default for SlotTable {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            sweep_at: IssueLocks::SWEEP_FLOOR,
        }
    }
}

/// Exclusive hold on one issue, released on drop.
#[derive(Debug)]
pub struct IssueLockGuard {
    issue_id: IssueId,
    _guard: OwnedMutexGuard<()>,
}

impl IssueLockGuard {
    /// Returns the issue this guard serializes.
    #[must_use]
    pub const fn issue_id(&self) -> IssueId {
        self.issue_id
    }
}

impl IssueLocks {
    /// Smallest map size that triggers a sweep of dropped slots.
    pub(crate) const SWEEP_FLOOR: usize = 64;

    /// Creates an empty lock pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `issue_id`.
    pub async fn acquire(&self, issue_id: IssueId) -> IssueLockGuard {
        let slot = self.slot_for(issue_id);
        IssueLockGuard {
            issue_id,
            _guard: slot.lock_owned().await,
        }
    }

    /// Returns how many issues currently have a live lock slot.
    #[must_use]
    pub fn tracked(&self) -> usize {
        let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table
            .slots
            .values()
            .filter(|slot| slot.strong_count() > 0)
            .count()
    }

    /// Returns how many entries the map holds, live or not.
    #[cfg(test)]
    pub(crate) fn retained(&self) -> usize {
        let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table.slots.len()
    }

    fn slot_for(&self, issue_id: IssueId) -> Arc<AsyncMutex<()>> {
        // The map only holds plain data, so a poisoned lock is still usable.
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = table.slots.get(&issue_id).and_then(Weak::upgrade) {
            return existing;
        }
        if table.slots.len() >= table.sweep_at {
            table.slots.retain(|_, slot| slot.strong_count() > 0);
            table.sweep_at = table.slots.len().saturating_mul(2).max(Self::SWEEP_FLOOR);
        }
        let slot = Arc::new(AsyncMutex::new(()));
        // Replaces any dropped slot left under the same key.
        table.slots.insert(issue_id, Arc::downgrade(&slot));
        slot
    }
}
