use alloc::vec::Vec;

use crate::{FeedItem, LineKind};

/// Classifies the thread line of each item against its successor.
///
/// Pure function over adjacent pairs, O(n). Intended for chat-mode rendering
/// of a chronological list:
/// - a direct child of `root` starts a new visual thread: [`LineKind::Start`]
///   when the next item replies to it, else [`LineKind::None`];
/// - a deeper item is [`LineKind::Middle`] when the next item continues the
///   chain through it, [`LineKind::EndAndStart`] when the next item opens a
///   sibling branch under the same parent, else [`LineKind::End`].
pub fn for_each_line_kind<K: PartialEq>(
    root: &K,
    items: &[FeedItem<K>],
    mut emit: impl FnMut(usize, LineKind),
) {
    for (i, item) in items.iter().enumerate() {
        let next = items.get(i + 1);
        emit(i, classify(root, item, next));
    }
}

/// Collects line kinds for every item (see [`for_each_line_kind`]).
pub fn line_kinds<K: PartialEq>(root: &K, items: &[FeedItem<K>]) -> Vec<LineKind> {
    let mut out = Vec::with_capacity(items.len());
    for_each_line_kind(root, items, |_, kind| out.push(kind));
    out
}

fn classify<K: PartialEq>(
    root: &K,
    item: &FeedItem<K>,
    next: Option<&FeedItem<K>>,
) -> LineKind {
    if item.is_child_of(root) {
        return match next {
            Some(n) if n.parent() == Some(&item.id) => LineKind::Start,
            _ => LineKind::None,
        };
    }
    match next {
        Some(n) if n.parent() == Some(&item.id) => LineKind::Middle,
        Some(n) if n.parent().is_some() && n.parent() == item.parent() => LineKind::EndAndStart,
        _ => LineKind::End,
    }
}
