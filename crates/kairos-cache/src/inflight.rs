//! Registry of fetches currently in progress, one slot per key.

use std::sync::{Arc, OnceLock};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use kairos_core::errors::FetchError;
use kairos_core::models::ResultRecord;

use crate::key::CacheKey;

pub(crate) type SharedResult = Result<Arc<Vec<ResultRecord>>, FetchError>;

/// Completion cell shared by the leader and every caller collapsed onto it.
pub(crate) type Slot = Arc<OnceLock<SharedResult>>;

#[derive(Default)]
pub(crate) struct InFlight {
    slots: DashMap<CacheKey, Slot>,
}

impl InFlight {
    /// Join the in-flight fetch for `key`, registering a new one if none is
    /// running. The returned guard unregisters the slot when dropped, even if
    /// the fetch panics.
    pub fn join<'a>(&'a self, key: &'a CacheKey) -> SlotGuard<'a> {
        let slot = match self.slots.entry(key.clone()) {
            Entry::Occupied(e) => Arc::clone(e.get()),
            Entry::Vacant(v) => {
                let slot: Slot = Arc::new(OnceLock::new());
                v.insert(Arc::clone(&slot));
                slot
            }
        };
        SlotGuard {
            registry: self,
            key,
            slot,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
}

pub(crate) struct SlotGuard<'a> {
    registry: &'a InFlight,
    key: &'a CacheKey,
    slot: Slot,
}

impl SlotGuard<'_> {
    /// Run `init` unless another caller already did, returning the shared
    /// result and whether `init` ran here.
    ///
    /// The slot is unregistered before its result is published, so a caller
    /// arriving after this point registers a new fetch instead of picking up
    /// a finished one.
    pub fn resolve(&self, init: impl FnOnce() -> SharedResult) -> (SharedResult, bool) {
        let mut ran = false;
        let result = self
            .slot
            .get_or_init(|| {
                ran = true;
                let result = init();
                self.unregister();
                result
            })
            .clone();
        (result, ran)
    }

    /// Only removes our own generation; a later fetch for the same key may
    /// already have registered a fresh slot.
    fn unregister(&self) {
        let slot = &self.slot;
        self.registry
            .slots
            .remove_if(self.key, |_, current| Arc::ptr_eq(current, slot));
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.unregister();
    }
}
