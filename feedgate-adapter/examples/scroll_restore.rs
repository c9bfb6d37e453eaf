// Example: leave a feed, come back, and restore scroll depth + position.
//
// The host flow is:
// 1) on navigation-away, record {anchor item, pixel offset, loaded depth}
// 2) on re-entry, take the snapshot and begin a restoration episode
// 3) each frame, describe what you observe and apply the returned command
use feedgate::{FeedItem, FeedSource, LiveMerge};
use feedgate_adapter::{
    MemorySnapshotStore, Navigator, RestoreCommand, RestoreController, RestoreOptions,
    RestoreView, ScrollSnapshot, canonical_location_key,
};

fn note(id: u64) -> FeedItem<u64> {
    FeedItem {
        id,
        parent_path: vec![0],
        author: vec![9],
        created_at: 1_000_000 - id,
    }
}

fn main() {
    let mut next_id = 0u64;
    let mut src = LiveMerge::new(move |n| {
        let page: Vec<_> = (0..n)
            .map(|_| {
                next_id += 1;
                note(next_id)
            })
            .collect();
        Ok(page)
    });

    // The user had scrolled 60 items deep, anchored on item 55.
    let key = canonical_location_key("/feed", &[("t", "7d")], &[]);
    let mut nav = Navigator::new(MemorySnapshotStore::new());
    nav.leave(
        &key,
        None,
        ScrollSnapshot {
            root_id: 0u64,
            anchor_id: 55,
            offset_px: 120,
            loaded_until: 60,
        },
    );

    // Re-entry: only the first page is loaded so far.
    src.load_more(10);
    let snapshot = nav.take(&key, None).expect("snapshot saved on leave");
    let mut restore = RestoreController::new(RestoreOptions::new());
    restore.begin(snapshot.clone(), src.iterator_id(), 0);

    let mut now = 0u64;
    let mut scroll_px = 0i64;
    while restore.is_restoring() {
        now += 16; // one frame
        let anchor_present = src.items().iter().any(|it| it.id == snapshot.anchor_id);
        let view = RestoreView {
            item_count: src.items().len(),
            anchor_present,
            anchor_visible: anchor_present,
            // A real host measures the rendered element; we fake convergence.
            anchor_offset_px: anchor_present.then_some(snapshot.offset_px + 300 - scroll_px),
            iterator_id: src.iterator_id(),
        };
        match restore.tick(&view, now) {
            RestoreCommand::Wait => {}
            RestoreCommand::LoadMore(n) => {
                println!("t={now}ms load_more({n})");
                let grew = src.load_more(n);
                restore.on_load_result(grew);
            }
            RestoreCommand::ScrollBy(delta) => {
                println!("t={now}ms scroll_by({delta}px)");
                scroll_px += delta;
            }
            RestoreCommand::Finish => {
                println!("t={now}ms restored: {} items, scroll {scroll_px}px", src.items().len());
            }
        }
    }
}
