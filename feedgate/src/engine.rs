use alloc::string::String;
use alloc::vec::Vec;

use crate::chat::line_kinds;
use crate::key::FeedKey;
use crate::pinning::PinReconciler;
use crate::{
    EngineOptions, FeedItem, HiddenWindow, LineKind, RevealGate, ViewMode,
};

/// The reconciliation engine for one `(view id, feed root)` pair.
///
/// Composes the pinning reconciler and the reveal gate over the item list
/// owned by a pagination source. The engine never holds items itself; hosts
/// pass the source's current slice into [`FeedEngine::on_items_changed`] and
/// read back the reconciled order plus the hidden window.
///
/// Everything is synchronous and tick-driven: re-render the list through
/// `on_items_changed`, acknowledge content loads through `on_item_loaded`,
/// and call `tick(now_ms)` once per host frame.
#[derive(Clone, Debug)]
pub struct FeedEngine<K> {
    options: EngineOptions<K>,
    pinning: PinReconciler<K>,
    gate: RevealGate<K>,
    /// Iterator id of the source state the derived state was built from.
    iterator_id: Option<u64>,
    order: Vec<usize>,
    ordered_ids: Vec<K>,
}

impl<K: FeedKey> FeedEngine<K> {
    pub fn new(options: EngineOptions<K>) -> Self {
        fdebug!(view_id = %options.view_id, "FeedEngine::new");
        let pinning = PinReconciler::new(
            options.mode,
            options.local_author.clone(),
            options.session_start_at,
        );
        let gate = RevealGate::new(options.gate.clone());
        Self {
            options,
            pinning,
            gate,
            iterator_id: None,
            order: Vec::new(),
            ordered_ids: Vec::new(),
        }
    }

    pub fn options(&self) -> &EngineOptions<K> {
        &self.options
    }

    pub fn view_id(&self) -> &str {
        &self.options.view_id
    }

    pub fn root(&self) -> &K {
        &self.options.root
    }

    pub fn mode(&self) -> ViewMode {
        self.options.mode
    }

    pub fn pinning(&self) -> &PinReconciler<K> {
        &self.pinning
    }

    pub fn gate(&self) -> &RevealGate<K> {
        &self.gate
    }

    /// Switches the active view and/or feed root, atomically resetting all
    /// derived state (pins, window, pending sets, deadlines).
    pub fn set_view(
        &mut self,
        view_id: impl Into<String>,
        root: K,
        mode: ViewMode,
        session_start_at: u64,
    ) {
        self.options.view_id = view_id.into();
        self.options.root = root;
        self.options.mode = mode;
        self.options.session_start_at = session_start_at;
        self.pinning.reset(mode, session_start_at);
        self.gate.reset();
        self.iterator_id = None;
        self.order.clear();
        self.ordered_ids.clear();
        fdebug!(view_id = %self.options.view_id, "FeedEngine::set_view");
    }

    /// Reconciles a new list state from the source.
    ///
    /// An `iterator_id` change means the underlying query/session was
    /// replaced: all derived state resets before the merge, and anything
    /// built against the previous id is discarded.
    pub fn on_items_changed(
        &mut self,
        items: &[FeedItem<K>],
        iterator_id: u64,
        now_ms: u64,
    ) -> HiddenWindow {
        if self.iterator_id != Some(iterator_id) {
            if self.iterator_id.is_some() {
                fdebug!(iterator_id, "FeedEngine: iterator replaced, resetting");
                self.pinning
                    .reset(self.options.mode, self.options.session_start_at);
                self.gate.reset();
            }
            self.iterator_id = Some(iterator_id);
        }

        self.pinning.merge(items);
        self.pinning.collect_order(items, &mut self.order);
        self.ordered_ids.clear();
        self.ordered_ids
            .extend(self.order.iter().map(|&i| items[i].id.clone()));
        self.gate.on_list_changed(&self.ordered_ids, now_ms)
    }

    /// Records a content-loaded acknowledgment from the rendering layer.
    /// Returns `true` when it triggered an immediate reveal.
    pub fn on_item_loaded(&mut self, id: &K, now_ms: u64) -> bool {
        self.gate.acknowledge(id, now_ms)
    }

    /// Advances the reveal deadlines. Returns `true` when a reveal fired.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.gate.tick(now_ms)
    }

    pub fn window(&self) -> HiddenWindow {
        self.gate.window()
    }

    /// Number of items in the reconciled order (the restoration depth to
    /// record in a scroll snapshot).
    pub fn loaded_len(&self) -> usize {
        self.ordered_ids.len()
    }

    /// The reconciled order as ids: pinned items first, then source order.
    pub fn ordered_ids(&self) -> &[K] {
        &self.ordered_ids
    }

    /// Emits the reconciled order as indexes into the last `items` slice
    /// passed to [`FeedEngine::on_items_changed`], hidden items included.
    pub fn for_each_ordered_index(&self, mut emit: impl FnMut(usize)) {
        for &i in &self.order {
            emit(i);
        }
    }

    /// Same as [`FeedEngine::for_each_ordered_index`] but skips items hidden
    /// by the reveal gate.
    pub fn for_each_visible_index(&self, mut emit: impl FnMut(usize)) {
        for (pos, &i) in self.order.iter().enumerate() {
            if !self.gate.is_hidden(pos) {
                emit(i);
            }
        }
    }

    /// Whether the item is present in the reconciled order and not hidden by
    /// the gate. Drives scroll-correction readiness.
    pub fn is_id_visible(&self, id: &K) -> bool {
        match self.ordered_ids.iter().position(|k| k == id) {
            Some(pos) => !self.gate.is_hidden(pos),
            None => false,
        }
    }

    /// Fetch in flight OR a nonzero hidden window: the renderer should keep
    /// its loading affordance up in either case.
    pub fn is_loading_anything(&self, source_loading: bool) -> bool {
        source_loading || self.gate.is_gating()
    }

    /// Thread-line tags for chat rendering. `None` unless the view is in
    /// [`ViewMode::Chat`].
    pub fn line_kinds(&self, items: &[FeedItem<K>]) -> Option<Vec<LineKind>> {
        if self.options.mode != ViewMode::Chat {
            return None;
        }
        Some(line_kinds(&self.options.root, items))
    }
}
