use alloc::collections::VecDeque;
use alloc::string::String;

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

#[cfg(feature = "std")]
type EntryMap<V> = HashMap<String, V>;
#[cfg(not(feature = "std"))]
type EntryMap<V> = BTreeMap<String, V>;

/// Restoration metadata captured when leaving a feed view.
///
/// `offset_px` is the anchor item's rendered offset from the host's reference
/// point (e.g. viewport top); `loaded_until` is how deep the list was loaded,
/// driving the catch-up fetch loop on re-entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollSnapshot<K> {
    pub root_id: K,
    pub anchor_id: K,
    pub offset_px: i64,
    pub loaded_until: usize,
}

/// Keyed snapshot storage with last-write-wins semantics per key.
///
/// Injected rather than ambient so hosts can swap the in-memory default for
/// a bounded store in long-running processes.
pub trait SnapshotStore<K> {
    fn get(&self, key: &str) -> Option<&ScrollSnapshot<K>>;
    fn set(&mut self, key: String, snapshot: ScrollSnapshot<K>);
    fn remove(&mut self, key: &str) -> Option<ScrollSnapshot<K>>;
}

/// In-memory snapshot store, optionally capacity-bounded.
///
/// With a capacity, inserting a new key past the bound evicts the
/// oldest-inserted entry.
#[derive(Clone, Debug)]
pub struct MemorySnapshotStore<K> {
    entries: EntryMap<ScrollSnapshot<K>>,
    order: VecDeque<String>,
    capacity: Option<usize>,
}

impl<K> Default for MemorySnapshotStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> MemorySnapshotStore<K> {
    pub fn new() -> Self {
        Self {
            entries: EntryMap::new(),
            order: VecDeque::new(),
            capacity: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: EntryMap::new(),
            order: VecDeque::new(),
            capacity: Some(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K> SnapshotStore<K> for MemorySnapshotStore<K> {
    fn get(&self, key: &str) -> Option<&ScrollSnapshot<K>> {
        self.entries.get(key)
    }

    fn set(&mut self, key: String, snapshot: ScrollSnapshot<K>) {
        if self.entries.insert(key.clone(), snapshot).is_none() {
            if let Some(cap) = self.capacity {
                while self.order.len() >= cap {
                    let Some(oldest) = self.order.pop_front() else {
                        break;
                    };
                    self.entries.remove(&oldest);
                }
            }
            self.order.push_back(key);
        }
    }

    fn remove(&mut self, key: &str) -> Option<ScrollSnapshot<K>> {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        self.entries.remove(key)
    }
}
