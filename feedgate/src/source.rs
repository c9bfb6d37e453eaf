use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::FeedItem;
use crate::key::{FeedKey, KeySet};

/// Why a fetch or injection attempt failed.
///
/// Errors are never fatal to the engine: they are logged and treated as
/// "no growth". The type exists so sources can say why and hosts can surface
/// it (see [`LiveMerge::last_error`]).
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("fetch failed: {reason}")]
    Fetch { reason: String },
    #[error("late-result injection failed: {reason}")]
    Inject { reason: String },
    #[error("source exhausted")]
    Exhausted,
}

/// The pagination boundary consumed by the engine.
///
/// Implementations own the item list; the engine only reads it. `load_more`
/// must swallow its own failures and report them as no growth.
pub trait FeedSource<K> {
    fn items(&self) -> &[FeedItem<K>];

    /// Whether a fetch is currently in flight.
    fn is_loading(&self) -> bool;

    /// Whether more items may still be fetched.
    fn has_more(&self) -> bool;

    /// Fetches up to `n` more items. Returns whether the list grew.
    fn load_more(&mut self, n: usize) -> bool;

    /// Changes whenever the underlying query/session is replaced. Async
    /// continuations must compare this against the value they captured and
    /// discard themselves on mismatch.
    fn iterator_id(&self) -> u64;
}

/// Where late results are spliced into the live list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InjectPosition {
    Head,
    Tail,
    /// Insert each item where it belongs in a newest-first list. Falls back
    /// to a near-head insert when the list is not actually sorted.
    SortedByCreatedAt,
}

/// A batch of items the source discovered out of normal fetch order (e.g. a
/// reply arriving after its position was already rendered).
#[derive(Clone, Debug)]
pub struct LateResults<K> {
    pub items: Vec<FeedItem<K>>,
    pub position: InjectPosition,
}

/// Page fetcher driving a [`LiveMerge`]. Called with the requested item
/// count; an empty page marks the source exhausted.
pub type FetchPage<K> =
    Box<dyn FnMut(usize) -> Result<Vec<FeedItem<K>>, SourceError> + Send>;

/// An in-memory pagination source with live-merge support.
///
/// Wraps a synchronous page fetcher and maintains the merged, deduplicated
/// item list. Late results are spliced in via [`LiveMerge::inject`] without a
/// refetch. Fetch errors are logged and reported as no growth.
pub struct LiveMerge<K> {
    fetch: FetchPage<K>,
    items: Vec<FeedItem<K>>,
    ids: KeySet<K>,
    iterator_id: u64,
    exhausted: bool,
    loading: bool,
    last_error: Option<SourceError>,
}

impl<K> core::fmt::Debug for LiveMerge<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LiveMerge")
            .field("len", &self.items.len())
            .field("iterator_id", &self.iterator_id)
            .field("exhausted", &self.exhausted)
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}

impl<K: FeedKey> LiveMerge<K> {
    pub fn new(
        fetch: impl FnMut(usize) -> Result<Vec<FeedItem<K>>, SourceError> + Send + 'static,
    ) -> Self {
        Self {
            fetch: Box::new(fetch),
            items: Vec::new(),
            ids: KeySet::new(),
            iterator_id: 0,
            exhausted: false,
            loading: false,
            last_error: None,
        }
    }

    /// Replaces the underlying query: clears the list, resets exhaustion and
    /// bumps the iterator id so stale continuations can detect the swap.
    pub fn replace_query(
        &mut self,
        fetch: impl FnMut(usize) -> Result<Vec<FeedItem<K>>, SourceError> + Send + 'static,
    ) {
        self.fetch = Box::new(fetch);
        self.items.clear();
        self.ids.clear();
        self.exhausted = false;
        self.loading = false;
        self.last_error = None;
        self.iterator_id = self.iterator_id.wrapping_add(1);
        fdebug!(iterator_id = self.iterator_id, "LiveMerge::replace_query");
    }

    /// The last swallowed fetch/injection error, if any.
    pub fn last_error(&self) -> Option<&SourceError> {
        self.last_error.as_ref()
    }

    /// For hosts that fetch asynchronously and feed pages in externally.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Fetches up to `n` more items even when the source looks exhausted
    /// (late-result catch-up may know better than the exhaustion flag).
    pub fn force_load_more(&mut self, n: usize) -> bool {
        let grew = self.fetch_page(n);
        if grew {
            self.exhausted = false;
        }
        grew
    }

    /// Splices late results into the live list without a refetch. Duplicate
    /// ids are dropped. Returns how many items were inserted.
    pub fn inject(&mut self, items: Vec<FeedItem<K>>, position: InjectPosition) -> usize {
        let mut fresh: Vec<FeedItem<K>> = Vec::with_capacity(items.len());
        for item in items {
            if self.ids.contains(&item.id) {
                continue;
            }
            self.ids.insert(item.id.clone());
            fresh.push(item);
        }
        if fresh.is_empty() {
            return 0;
        }
        let n = fresh.len();
        ftrace!(inserted = n, "LiveMerge::inject");
        match position {
            InjectPosition::Head => {
                for (i, item) in fresh.into_iter().enumerate() {
                    self.items.insert(i, item);
                }
            }
            InjectPosition::Tail => {
                self.items.extend(fresh);
            }
            InjectPosition::SortedByCreatedAt => {
                for item in fresh {
                    let at = self
                        .items
                        .iter()
                        .position(|it| it.created_at < item.created_at)
                        .unwrap_or(self.items.len());
                    self.items.insert(at, item);
                }
            }
        }
        n
    }

    /// Routes a push-style late-result event through [`LiveMerge::inject`].
    pub fn deliver_late(&mut self, event: LateResults<K>) -> usize {
        self.inject(event.items, event.position)
    }

    fn fetch_page(&mut self, n: usize) -> bool {
        let page = match (self.fetch)(n) {
            Ok(page) => page,
            Err(err) => {
                fwarn!(error = %err, "LiveMerge: fetch failed, treating as no growth");
                self.last_error = Some(err);
                return false;
            }
        };
        if page.is_empty() {
            self.exhausted = true;
            return false;
        }
        let before = self.items.len();
        for item in page {
            if self.ids.contains(&item.id) {
                continue;
            }
            self.ids.insert(item.id.clone());
            self.items.push(item);
        }
        self.items.len() > before
    }
}

impl<K: FeedKey> FeedSource<K> for LiveMerge<K> {
    fn items(&self) -> &[FeedItem<K>] {
        &self.items
    }

    fn is_loading(&self) -> bool {
        self.loading
    }

    fn has_more(&self) -> bool {
        !self.exhausted
    }

    fn load_more(&mut self, n: usize) -> bool {
        if self.exhausted {
            return false;
        }
        self.fetch_page(n)
    }

    fn iterator_id(&self) -> u64 {
        self.iterator_id
    }
}
