use alloc::vec::Vec;

use crate::key::{FeedKey, KeySet};
use crate::{GateOptions, HiddenWindow};

/// Reveal phase. At most one deadline pair is live at a time; every
/// transition out of `Pending` cancels both deadlines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GatePhase {
    Idle,
    Pending {
        debounce_deadline_ms: u64,
        max_deadline_ms: u64,
    },
}

/// Hides newly-appeared head/tail items from the rendered view until their
/// content finishes loading or a timeout elapses.
///
/// The gate is driven by three entry points, all synchronous:
/// - [`RevealGate::on_list_changed`] with the current ordered id list,
/// - [`RevealGate::acknowledge`] when an item's content finished loading,
/// - [`RevealGate::tick`] once per host frame/timer tick.
///
/// Hidden counts are measured against the committed anchor pair (the list
/// ends at the last reveal) and recomputed on every list change. A list that
/// reordered under the anchors resets the window instead of diffing.
#[derive(Clone, Debug)]
pub struct RevealGate<K> {
    options: GateOptions,
    /// First/last ids of the most recently fully revealed list state.
    committed: Option<(K, K)>,
    /// Ends of the list as of the last `on_list_changed`.
    current_ends: Option<(K, K)>,
    current_len: usize,
    pending: KeySet<K>,
    loaded: KeySet<K>,
    window: HiddenWindow,
    phase: GatePhase,
}

impl<K: FeedKey> RevealGate<K> {
    pub fn new(options: GateOptions) -> Self {
        Self {
            options,
            committed: None,
            current_ends: None,
            current_len: 0,
            pending: KeySet::new(),
            loaded: KeySet::new(),
            window: HiddenWindow::default(),
            phase: GatePhase::Idle,
        }
    }

    pub fn options(&self) -> &GateOptions {
        &self.options
    }

    pub fn window(&self) -> HiddenWindow {
        self.window
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Whether any head/tail items are currently hidden.
    pub fn is_gating(&self) -> bool {
        !self.window.is_empty()
    }

    /// Whether the item at `index` of the current list is hidden.
    pub fn is_hidden(&self, index: usize) -> bool {
        self.window.is_hidden(index, self.current_len)
    }

    pub fn committed_anchors(&self) -> Option<(&K, &K)> {
        self.committed.as_ref().map(|(f, l)| (f, l))
    }

    /// Clears anchors, window, pending/loaded sets and deadlines atomically.
    /// Call on view-id or feed-root change and on teardown.
    pub fn reset(&mut self) {
        fdebug!(pending = self.pending.len(), "RevealGate::reset");
        self.committed = None;
        self.current_ends = None;
        self.current_len = 0;
        self.pending.clear();
        self.loaded.clear();
        self.window = HiddenWindow::default();
        self.phase = GatePhase::Idle;
    }

    /// Recomputes the hidden window against the new ordered id list.
    ///
    /// Returns the new window. `ids` is the full rendered order (post
    /// pinning), not just the visible slice.
    pub fn on_list_changed(&mut self, ids: &[K], now_ms: u64) -> HiddenWindow {
        self.current_len = ids.len();
        self.current_ends = match (ids.first(), ids.last()) {
            (Some(first), Some(last)) => Some((first.clone(), last.clone())),
            _ => None,
        };

        if ids.is_empty() {
            // Lost all overlap with whatever was committed.
            self.committed = None;
            self.pending.clear();
            self.window = HiddenWindow::default();
            self.phase = GatePhase::Idle;
            return self.window;
        }

        let Some((first, last)) = self.committed.clone() else {
            // First non-empty render: the entire list is head-hidden.
            self.window = HiddenWindow {
                head: ids.len(),
                tail: 0,
            };
            self.mark_pending(ids.iter());
            if self.phase == GatePhase::Idle {
                self.arm(now_ms);
            }
            ftrace!(
                len = ids.len(),
                pending = self.pending.len(),
                "RevealGate: initial gating"
            );
            return self.window;
        };

        let idx_first = ids.iter().position(|id| *id == first);
        let idx_last = ids.iter().rposition(|id| *id == last);
        let (head, tail) = match (idx_first, idx_last) {
            (Some(f), Some(l)) if f <= l => (f, ids.len() - 1 - l),
            _ => {
                // Anchor missing or inverted: the ranking changed under us.
                // Reset to the new ends rather than diffing across a reorder.
                fdebug!(len = ids.len(), "RevealGate: anchors lost, resetting window");
                self.committed = self.current_ends.clone();
                self.pending.clear();
                self.window = HiddenWindow::default();
                self.phase = GatePhase::Idle;
                return self.window;
            }
        };

        if head == 0 && tail == 0 {
            // Nothing entered at the edges; clear any leftover state.
            self.pending.clear();
            self.window = HiddenWindow::default();
            self.phase = GatePhase::Idle;
            return self.window;
        }

        self.window = HiddenWindow { head, tail };
        self.mark_pending(ids[..head].iter());
        self.mark_pending(ids[ids.len() - tail..].iter());
        if self.phase == GatePhase::Idle {
            self.arm(now_ms);
        }
        ftrace!(
            head,
            tail,
            pending = self.pending.len(),
            "RevealGate: gating edges"
        );
        self.window
    }

    /// Records a per-item content-loaded acknowledgment.
    ///
    /// Returns `true` when this acknowledgment emptied the pending set and
    /// the reveal fired immediately.
    pub fn acknowledge(&mut self, id: &K, _now_ms: u64) -> bool {
        self.loaded.insert(id.clone());
        if !self.pending.remove(id) {
            return false;
        }
        if self.pending.is_empty() && self.phase != GatePhase::Idle {
            self.reveal();
            return true;
        }
        false
    }

    /// Advances the deadline machinery. Returns `true` when a reveal fired.
    ///
    /// The max-wait deadline reveals unconditionally (an item that never
    /// acknowledges must not block forever); the debounce deadline reveals
    /// only with zero still-pending items.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let GatePhase::Pending {
            debounce_deadline_ms,
            max_deadline_ms,
        } = self.phase
        else {
            return false;
        };
        if now_ms >= max_deadline_ms {
            fdebug!(
                pending = self.pending.len(),
                "RevealGate: max-wait elapsed, revealing"
            );
            self.reveal();
            return true;
        }
        if now_ms >= debounce_deadline_ms && self.pending.is_empty() {
            self.reveal();
            return true;
        }
        false
    }

    fn mark_pending<'a>(&mut self, ids: impl Iterator<Item = &'a K>)
    where
        K: 'a,
    {
        for id in ids {
            if self.loaded.contains(id) {
                continue;
            }
            self.pending.insert(id.clone());
        }
    }

    fn arm(&mut self, now_ms: u64) {
        self.phase = GatePhase::Pending {
            debounce_deadline_ms: now_ms.saturating_add(self.options.debounce_ms),
            max_deadline_ms: now_ms.saturating_add(self.options.max_wait_ms),
        };
    }

    /// Commits anchors to the current list ends and clears the window.
    fn reveal(&mut self) {
        let revealed = self.window.hidden_len();
        self.committed = self.current_ends.clone();
        self.window = HiddenWindow::default();
        self.pending.clear();
        self.phase = GatePhase::Idle;
        fdebug!(revealed, "RevealGate: reveal");
        if let Some(cb) = &self.options.on_reveal {
            cb(revealed);
        }
    }

    /// Ids currently awaiting acknowledgment, in no particular order.
    pub fn collect_pending(&self, out: &mut Vec<K>) {
        out.clear();
        out.extend(self.pending.iter().cloned());
    }
}
