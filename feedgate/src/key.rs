#[cfg(not(feature = "std"))]
use alloc::collections::BTreeSet;
#[cfg(feature = "std")]
use std::collections::HashSet;

#[cfg(feature = "std")]
pub(crate) type KeySet<K> = HashSet<K>;
#[cfg(not(feature = "std"))]
pub(crate) type KeySet<K> = BTreeSet<K>;

/// Bound for item identity keys.
///
/// With `std`, identity sets are hash-based; without it, ordered sets.
#[cfg(feature = "std")]
pub trait FeedKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> FeedKey for K {}

#[cfg(not(feature = "std"))]
pub trait FeedKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> FeedKey for K {}
