use alloc::vec::Vec;

use crate::key::{FeedKey, KeySet};
use crate::{AuthorKey, FeedItem, ViewMode};

/// Session-scoped reordering policy that keeps the local user's own fresh
/// items pinned above a non-chronological ranking.
///
/// Applies only in [`ViewMode::Ranked`]; chronological and chat views pass
/// through. When the local identity is unavailable, pinning is disabled
/// rather than failing.
///
/// Lifetime: one viewing session of a `(view id, feed root)` pair. Reset on
/// either changing.
#[derive(Clone, Debug)]
pub struct PinReconciler<K> {
    mode: ViewMode,
    local_author: Option<AuthorKey>,
    session_start_at: u64,
    seen: KeySet<K>,
    pinned: Vec<K>,
    pinned_set: KeySet<K>,
    hydrated: bool,
}

impl<K: FeedKey> PinReconciler<K> {
    pub fn new(mode: ViewMode, local_author: Option<AuthorKey>, session_start_at: u64) -> Self {
        Self {
            mode,
            local_author,
            session_start_at,
            seen: KeySet::new(),
            pinned: Vec::new(),
            pinned_set: KeySet::new(),
            hydrated: false,
        }
    }

    /// Whether merges reorder anything at all.
    pub fn is_pass_through(&self) -> bool {
        self.mode != ViewMode::Ranked || self.local_author.is_none()
    }

    pub fn pinned_len(&self) -> usize {
        self.pinned.len()
    }

    pub fn is_pinned(&self, id: &K) -> bool {
        self.pinned_set.contains(id)
    }

    /// Clears all session state for a view-id or feed-root change.
    pub fn reset(&mut self, mode: ViewMode, session_start_at: u64) {
        fdebug!(pinned = self.pinned.len(), "PinReconciler::reset");
        self.mode = mode;
        self.session_start_at = session_start_at;
        self.seen.clear();
        self.pinned.clear();
        self.pinned_set.clear();
        self.hydrated = false;
    }

    /// Classifies every not-yet-seen item id exactly once.
    ///
    /// The first merge is the hydration pass: it marks everything seen and
    /// pins nothing, so pre-existing historical items never pin on first
    /// load. Re-merging the same result set is a no-op.
    pub fn merge(&mut self, items: &[FeedItem<K>]) {
        if self.is_pass_through() {
            return;
        }
        if !self.hydrated {
            for item in items {
                self.seen.insert(item.id.clone());
            }
            self.hydrated = true;
            ftrace!(seen = self.seen.len(), "PinReconciler: hydrated");
            return;
        }

        let local = self.local_author.as_deref();
        for item in items {
            if self.seen.contains(&item.id) {
                continue;
            }
            self.seen.insert(item.id.clone());
            if local != Some(item.author.as_slice()) {
                continue;
            }
            if item.created_at < self.session_start_at {
                continue;
            }
            ftrace!("PinReconciler: pinning fresh local item");
            self.pinned.push(item.id.clone());
            self.pinned_set.insert(item.id.clone());
        }
    }

    /// Emits the reconciled order as indexes into `items`: pinned ids in
    /// encounter order first, then the remaining items in source order.
    ///
    /// Pinned ids absent from `items` (truncated away) are skipped.
    pub fn for_each_ordered_index(&self, items: &[FeedItem<K>], mut emit: impl FnMut(usize)) {
        if self.is_pass_through() || self.pinned.is_empty() {
            for i in 0..items.len() {
                emit(i);
            }
            return;
        }
        for id in &self.pinned {
            if let Some(i) = items.iter().position(|it| &it.id == id) {
                emit(i);
            }
        }
        for (i, item) in items.iter().enumerate() {
            if !self.pinned_set.contains(&item.id) {
                emit(i);
            }
        }
    }

    /// Collects the reconciled order into `out` (clears `out` first).
    pub fn collect_order(&self, items: &[FeedItem<K>], out: &mut Vec<usize>) {
        out.clear();
        self.for_each_ordered_index(items, |i| out.push(i));
    }
}
