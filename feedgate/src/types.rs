use alloc::vec::Vec;

/// Opaque identity bytes for an item author (e.g. a public key).
pub type AuthorKey = Vec<u8>;

/// One item of the feed, as observed from the pagination source.
///
/// Items are immutable once observed; identity is `id`. `parent_path` lists
/// ancestor ids from the feed root down to the direct parent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeedItem<K> {
    pub id: K,
    pub parent_path: Vec<K>,
    pub author: AuthorKey,
    /// Creation time in milliseconds.
    pub created_at: u64,
}

impl<K> FeedItem<K> {
    /// The direct parent id, if any.
    pub fn parent(&self) -> Option<&K> {
        self.parent_path.last()
    }

    /// Whether this item is a direct child of `root`.
    pub fn is_child_of(&self, root: &K) -> bool
    where
        K: PartialEq,
    {
        self.parent() == Some(root)
    }
}

/// How the active view orders items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ViewMode {
    /// Non-chronological ranking ("best"). Session pinning applies.
    Ranked,
    /// Chronological ("new"/"recent"). Pinning is pass-through.
    Chronological,
    /// Chat-style rendering. Pinning is pass-through; line kinds apply.
    Chat,
}

/// Counts of currently hidden items at the edges of the rendered list.
///
/// Measured against the committed anchor pair and recomputed on every list
/// change, never accumulated. Invariant: `head + tail <= len`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HiddenWindow {
    pub head: usize,
    pub tail: usize,
}

impl HiddenWindow {
    pub fn is_empty(&self) -> bool {
        self.head == 0 && self.tail == 0
    }

    pub fn hidden_len(&self) -> usize {
        self.head.saturating_add(self.tail)
    }

    /// Whether the item at `index` of a list of `len` items is hidden.
    pub fn is_hidden(&self, index: usize, len: usize) -> bool {
        index < self.head || index >= len.saturating_sub(self.tail)
    }
}

/// Visual thread-line tag for chat-mode rendering, per adjacent-pair
/// classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineKind {
    /// A root-level item whose next item replies to it.
    Start,
    /// A reply continued by the next item.
    Middle,
    /// A reply not continued by the next item.
    End,
    /// A reply that closes one branch while the next item opens a sibling
    /// branch under the same parent.
    EndAndStart,
    /// A root-level item with no reply following it.
    None,
}
