use alloc::string::String;
use core::marker::PhantomData;

use crate::location::nav_key;
use crate::snapshot::{ScrollSnapshot, SnapshotStore};

/// Leave/enter workflow around a [`SnapshotStore`].
///
/// Keys are canonical location keys (see
/// [`crate::canonical_location_key`]), optionally made reload-robust with a
/// navigation-index token: when an index is available the snapshot is saved
/// and looked up under the nav key first, with the plain location key as
/// fallback.
///
/// A snapshot is single-writer-single-reader: leaving the same location twice
/// before restoring overwrites the entry; [`Navigator::take`] consumes it
/// exactly once.
#[derive(Clone, Debug)]
pub struct Navigator<K, S> {
    store: S,
    _marker: PhantomData<K>,
}

impl<K, S: SnapshotStore<K>> Navigator<K, S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Records a snapshot on navigation-away.
    pub fn leave(
        &mut self,
        location_key: &str,
        nav_index: Option<u64>,
        snapshot: ScrollSnapshot<K>,
    ) {
        let key = match nav_index {
            Some(index) => nav_key(index, location_key),
            None => String::from(location_key),
        };
        fdebug!(key = %key, "Navigator::leave");
        self.store.set(key, snapshot);
    }

    /// Looks up the snapshot for a location without consuming it. The nav
    /// key is tried first, then the plain location key.
    pub fn peek(&self, location_key: &str, nav_index: Option<u64>) -> Option<&ScrollSnapshot<K>> {
        if let Some(index) = nav_index {
            if let Some(s) = self.store.get(&nav_key(index, location_key)) {
                return Some(s);
            }
        }
        self.store.get(location_key)
    }

    /// Consumes the snapshot for a location on re-entry.
    ///
    /// The caller owns the restoration episode from here: switch the active
    /// feed root to `snapshot.root_id` if it differs, re-apply the location's
    /// query parameters, then drive a
    /// [`crate::RestoreController`] until it finishes.
    pub fn take(&mut self, location_key: &str, nav_index: Option<u64>) -> Option<ScrollSnapshot<K>> {
        if let Some(index) = nav_index {
            if let Some(s) = self.store.remove(&nav_key(index, location_key)) {
                fdebug!(key = %location_key, nav = index, "Navigator::take (nav key)");
                return Some(s);
            }
        }
        let taken = self.store.remove(location_key);
        if taken.is_some() {
            fdebug!(key = %location_key, "Navigator::take");
        }
        taken
    }
}
