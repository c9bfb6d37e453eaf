// Example: keeping your own fresh post above a "best" ranking.
use feedgate::{FeedItem, PinReconciler, ViewMode};

fn note(id: u64, author: u8, created_at: u64) -> FeedItem<u64> {
    FeedItem {
        id,
        parent_path: vec![0],
        author: vec![author],
        created_at,
    }
}

fn main() {
    let me = 7u8;
    let session_start = 1_000;
    let mut pins = PinReconciler::new(ViewMode::Ranked, Some(vec![me]), session_start);

    // Initial hydration: nothing pins, even our own older posts.
    let initial = [note(1, 9, 500), note(2, me, 600), note(3, 9, 700)];
    pins.merge(&initial);
    println!("after hydration: pinned={}", pins.pinned_len());

    // We post id 42; the ranking source returns it below higher-scored items.
    let merged = [
        note(1, 9, 500),
        note(2, me, 600),
        note(3, 9, 700),
        note(42, me, 5_000),
    ];
    pins.merge(&merged);

    let mut order = Vec::new();
    pins.collect_order(&merged, &mut order);
    let ids: Vec<u64> = order.iter().map(|&i| merged[i].id).collect();
    println!("rendered order: {ids:?}"); // 42 first, then source order

    // A view switch starts a fresh session: 42 ranks normally again.
    pins.reset(ViewMode::Ranked, 9_000);
    pins.merge(&merged);
    println!("after view switch: pinned={}", pins.pinned_len());
}
