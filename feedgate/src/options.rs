use alloc::string::String;
use alloc::sync::Arc;

use crate::{AuthorKey, ViewMode};

/// A callback fired when the reveal gate commits a reveal.
///
/// The argument is the number of items that were hidden until this reveal.
pub type OnRevealCallback = Arc<dyn Fn(usize) + Send + Sync>;

/// Configuration for [`crate::RevealGate`].
///
/// The timing constants are tunables, not semantics: hosts with different
/// content-load characteristics should adjust them.
#[derive(Clone)]
pub struct GateOptions {
    /// Reveal this long after gating starts, provided nothing is still
    /// pending an acknowledgment.
    pub debounce_ms: u64,
    /// Hard ceiling: reveal unconditionally this long after gating starts,
    /// even with unacknowledged items, to guarantee forward progress.
    pub max_wait_ms: u64,
    /// Optional callback fired when a reveal commits.
    pub on_reveal: Option<OnRevealCallback>,
}

impl GateOptions {
    pub fn new() -> Self {
        Self {
            debounce_ms: 5_000,
            max_wait_ms: 10_000,
            on_reveal: None,
        }
    }

    /// Sets the debounce and keeps the max-wait at twice the debounce.
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self.max_wait_ms = debounce_ms.saturating_mul(2);
        self
    }

    pub fn with_max_wait_ms(mut self, max_wait_ms: u64) -> Self {
        self.max_wait_ms = max_wait_ms;
        self
    }

    pub fn with_on_reveal(
        mut self,
        on_reveal: Option<impl Fn(usize) + Send + Sync + 'static>,
    ) -> Self {
        self.on_reveal = on_reveal.map(|f| Arc::new(f) as _);
        self
    }
}

impl Default for GateOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for GateOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GateOptions")
            .field("debounce_ms", &self.debounce_ms)
            .field("max_wait_ms", &self.max_wait_ms)
            .finish_non_exhaustive()
    }
}

/// Configuration for [`crate::FeedEngine`].
///
/// One engine instance owns the derived state of one `(view id, feed root)`
/// pair; switching either goes through `FeedEngine::set_view`.
#[derive(Clone, Debug)]
pub struct EngineOptions<K> {
    pub view_id: String,
    pub root: K,
    pub mode: ViewMode,
    /// The local identity's author key, for pinning attribution. Absence
    /// disables pinning.
    pub local_author: Option<AuthorKey>,
    /// Start of the current viewing session in milliseconds. Items created
    /// before this are never pinned.
    pub session_start_at: u64,
    pub gate: GateOptions,
}

impl<K> EngineOptions<K> {
    pub fn new(view_id: impl Into<String>, root: K, mode: ViewMode) -> Self {
        Self {
            view_id: view_id.into(),
            root,
            mode,
            local_author: None,
            session_start_at: 0,
            gate: GateOptions::new(),
        }
    }

    pub fn with_local_author(mut self, local_author: Option<AuthorKey>) -> Self {
        self.local_author = local_author;
        self
    }

    pub fn with_session_start_at(mut self, session_start_at: u64) -> Self {
        self.session_start_at = session_start_at;
        self
    }

    pub fn with_gate(mut self, gate: GateOptions) -> Self {
        self.gate = gate;
        self
    }
}
