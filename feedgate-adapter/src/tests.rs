use crate::*;

use alloc::string::String;
use alloc::vec::Vec;

fn snap(anchor_id: u64, offset_px: i64, loaded_until: usize) -> ScrollSnapshot<u64> {
    ScrollSnapshot {
        root_id: 0,
        anchor_id,
        offset_px,
        loaded_until,
    }
}

fn view(item_count: usize, anchor_present: bool) -> RestoreView {
    RestoreView {
        item_count,
        anchor_present,
        anchor_visible: false,
        anchor_offset_px: None,
        iterator_id: 0,
    }
}

fn visible_at(item_count: usize, offset_px: i64) -> RestoreView {
    RestoreView {
        item_count,
        anchor_present: true,
        anchor_visible: true,
        anchor_offset_px: Some(offset_px),
        iterator_id: 0,
    }
}

// ---- location keys ----

#[test]
fn query_order_does_not_change_the_key() {
    let a = canonical_location_key("/feed", &[("t", "7d"), ("kind", "note")], &[]);
    let b = canonical_location_key("/feed", &[("kind", "note"), ("t", "7d")], &[]);
    assert_eq!(a, b);
    assert_eq!(a, "/feed?kind=note&t=7d");
}

#[test]
fn default_valued_params_normalize_to_absent() {
    let defaults = &[("sort", "best")];
    let a = canonical_location_key("/feed", &[("sort", "best")], defaults);
    let b = canonical_location_key("/feed", &[], defaults);
    assert_eq!(a, b);
    assert_eq!(a, "/feed");

    // A non-default value survives.
    let c = canonical_location_key("/feed", &[("sort", "new")], defaults);
    assert_eq!(c, "/feed?sort=new");
}

#[test]
fn empty_values_are_dropped() {
    let a = canonical_location_key("/feed", &[("q", "")], &[]);
    assert_eq!(a, "/feed");
}

#[test]
fn nav_key_prefixes_the_location_key() {
    assert_eq!(nav_key(3, "/feed?t=7d"), "nav:3:/feed?t=7d");
}

// ---- snapshot store + navigator ----

#[test]
fn snapshot_round_trips_and_is_consumed_once() {
    let mut store = MemorySnapshotStore::new();
    store.set(String::from("/feed"), snap(42, 100, 30));
    assert_eq!(store.get("/feed"), Some(&snap(42, 100, 30)));

    assert_eq!(store.remove("/feed"), Some(snap(42, 100, 30)));
    assert_eq!(store.get("/feed"), None);
    assert_eq!(store.remove("/feed"), None);
}

#[test]
fn leaving_twice_overwrites_the_entry() {
    let mut nav = Navigator::new(MemorySnapshotStore::new());
    nav.leave("/feed", None, snap(1, 0, 10));
    nav.leave("/feed", None, snap(2, 50, 20));
    assert_eq!(nav.take("/feed", None), Some(snap(2, 50, 20)));
}

#[test]
fn nav_index_key_is_tried_before_the_location_key() {
    let mut nav = Navigator::new(MemorySnapshotStore::new());
    nav.leave("/feed", Some(3), snap(1, 0, 10));
    nav.leave("/feed", None, snap(2, 0, 10));

    // Same location, matching nav index: the nav-keyed entry wins.
    assert_eq!(nav.peek("/feed", Some(3)), Some(&snap(1, 0, 10)));
    assert_eq!(nav.take("/feed", Some(3)), Some(snap(1, 0, 10)));

    // Nav entry gone; the index falls back to the URL-derived key.
    assert_eq!(nav.take("/feed", Some(3)), Some(snap(2, 0, 10)));
    assert_eq!(nav.take("/feed", Some(3)), None);
}

#[test]
fn bounded_store_evicts_oldest_insertion() {
    let mut store = MemorySnapshotStore::with_capacity(2);
    store.set(String::from("a"), snap(1, 0, 1));
    store.set(String::from("b"), snap(2, 0, 2));
    store.set(String::from("c"), snap(3, 0, 3));
    assert_eq!(store.len(), 2);
    assert_eq!(store.get("a"), None);
    assert!(store.get("b").is_some());
    assert!(store.get("c").is_some());
}

#[test]
fn zero_capacity_store_stays_bounded() {
    // The degenerate bound must not wedge the eviction loop.
    let mut store = MemorySnapshotStore::with_capacity(0);
    store.set(String::from("a"), snap(1, 0, 1));
    store.set(String::from("b"), snap(2, 0, 2));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("a"), None);
    assert!(store.get("b").is_some());

    // Overwriting the surviving key does not grow the store either.
    store.set(String::from("b"), snap(3, 0, 3));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("b"), Some(&snap(3, 0, 3)));
}

// ---- restore controller: catch-up ----

#[test]
fn catch_up_requests_the_remaining_gap() {
    let mut r = RestoreController::new(RestoreOptions::new());
    r.begin(snap(42, 0, 50), 0, 0);

    assert_eq!(r.tick(&view(10, false), 0), RestoreCommand::LoadMore(40));
    assert!(r.is_restoring());
}

#[test]
fn catch_up_falls_back_to_a_fixed_batch_once_the_gap_closes() {
    let mut r = RestoreController::new(RestoreOptions::new().with_fallback_batch(7));
    r.begin(snap(42, 0, 10), 0, 0);

    assert_eq!(r.tick(&view(10, false), 0), RestoreCommand::LoadMore(7));
}

#[test]
fn exhausted_source_terminates_within_one_iteration() {
    let mut r = RestoreController::new(RestoreOptions::new());
    r.begin(snap(42, 0, 50), 0, 0);

    assert_eq!(r.tick(&view(10, false), 0), RestoreCommand::LoadMore(40));
    r.on_load_result(false); // load_more returned false: exhaustion
    assert_eq!(r.tick(&view(10, false), 16), RestoreCommand::Finish);
    assert!(r.is_done());
}

#[test]
fn catch_up_waits_for_growth_between_fetches() {
    let mut r = RestoreController::new(RestoreOptions::new());
    r.begin(snap(42, 0, 50), 0, 0);

    assert_eq!(r.tick(&view(10, false), 0), RestoreCommand::LoadMore(40));
    // No growth yet and no result reported: keep waiting, frame by frame.
    assert_eq!(r.tick(&view(10, false), 16), RestoreCommand::Wait);
    assert_eq!(r.tick(&view(10, false), 32), RestoreCommand::Wait);
    // The list grew: issue the next fetch for the remaining gap.
    assert_eq!(r.tick(&view(30, false), 48), RestoreCommand::LoadMore(20));
}

#[test]
fn growth_timeout_finalizes_the_episode() {
    let mut r = RestoreController::new(RestoreOptions::new().with_growth_timeout_ms(5_000));
    r.begin(snap(42, 0, 50), 0, 0);

    assert_eq!(r.tick(&view(10, false), 0), RestoreCommand::LoadMore(40));
    assert_eq!(r.tick(&view(10, false), 4_999), RestoreCommand::Wait);
    assert_eq!(r.tick(&view(10, false), 5_000), RestoreCommand::Finish);
}

#[test]
fn iteration_ceiling_bounds_the_loop() {
    let mut r = RestoreController::new(RestoreOptions::new().with_max_iterations(3));
    r.begin(snap(42, 0, 1_000), 0, 0);

    let mut count = 10;
    let mut now = 0;
    for _ in 0..3 {
        assert!(matches!(
            r.tick(&view(count, false), now),
            RestoreCommand::LoadMore(_)
        ));
        r.on_load_result(true);
        count += 10;
        now += 16;
    }
    assert_eq!(r.tick(&view(count, false), now), RestoreCommand::Finish);
}

#[test]
fn stale_iterator_id_cancels_the_episode() {
    let mut r = RestoreController::new(RestoreOptions::new());
    r.begin(snap(42, 0, 50), 7, 0);

    let stale = RestoreView {
        iterator_id: 8,
        ..view(10, false)
    };
    assert_eq!(r.tick(&stale, 16), RestoreCommand::Finish);
    assert!(r.is_done());
}

#[test]
fn global_ceiling_finalizes_even_mid_correction() {
    let mut r = RestoreController::new(RestoreOptions::new().with_max_total_ms(30_000));
    r.begin(snap(42, 100, 10), 0, 0);

    // Anchor present and rendered, but never converging.
    assert_eq!(
        r.tick(&visible_at(10, 500), 16),
        RestoreCommand::ScrollBy(400)
    );
    assert_eq!(r.tick(&visible_at(10, 500), 30_000), RestoreCommand::Finish);
}

#[test]
fn cancel_makes_late_ticks_no_ops() {
    let mut r = RestoreController::new(RestoreOptions::new());
    r.begin(snap(42, 0, 50), 0, 0);
    r.cancel();
    assert_eq!(r.tick(&view(10, false), 16), RestoreCommand::Wait);
    assert!(!r.is_restoring());
}

// ---- restore controller: scroll correction ----

#[test]
fn correction_waits_until_the_gate_reveals_the_anchor() {
    let mut r = RestoreController::new(RestoreOptions::new());
    r.begin(snap(42, 100, 10), 0, 0);

    // Present but still hidden by the reveal gate.
    let hidden = RestoreView {
        anchor_visible: false,
        ..visible_at(10, 100)
    };
    assert_eq!(r.tick(&hidden, 16), RestoreCommand::Wait);
    assert!(r.is_restoring());
}

#[test]
fn correction_converges_within_tolerance_over_two_frames() {
    let opts = RestoreOptions::new()
        .with_pixel_tolerance(50)
        .with_settle_frames(2);
    let mut r = RestoreController::new(opts);
    r.begin(snap(42, 100, 10), 0, 0);

    // 180px off: scroll forward by the delta.
    assert_eq!(
        r.tick(&visible_at(10, 280), 16),
        RestoreCommand::ScrollBy(180)
    );
    // Host applied it imperfectly; still outside tolerance.
    assert_eq!(
        r.tick(&visible_at(10, 170), 32),
        RestoreCommand::ScrollBy(70)
    );
    // Within tolerance: two consecutive settled frames finalize.
    assert_eq!(r.tick(&visible_at(10, 110), 48), RestoreCommand::Wait);
    assert_eq!(r.tick(&visible_at(10, 110), 64), RestoreCommand::Finish);
    assert!(r.is_done());

    // Late frame after finalization: no-op.
    assert_eq!(r.tick(&visible_at(10, 900), 80), RestoreCommand::Wait);
}

#[test]
fn a_jump_mid_settle_restarts_the_settle_count() {
    let opts = RestoreOptions::new()
        .with_pixel_tolerance(50)
        .with_settle_frames(2);
    let mut r = RestoreController::new(opts);
    r.begin(snap(42, 100, 10), 0, 0);

    assert_eq!(r.tick(&visible_at(10, 120), 16), RestoreCommand::Wait);
    // Content shifted under us: correct again, settle count restarts.
    assert_eq!(
        r.tick(&visible_at(10, 400), 32),
        RestoreCommand::ScrollBy(300)
    );
    assert_eq!(r.tick(&visible_at(10, 110), 48), RestoreCommand::Wait);
    assert_eq!(r.tick(&visible_at(10, 110), 64), RestoreCommand::Finish);
}

#[test]
fn anchor_vanishing_mid_correction_finalizes() {
    let mut r = RestoreController::new(RestoreOptions::new());
    r.begin(snap(42, 100, 10), 0, 0);

    assert_eq!(
        r.tick(&visible_at(10, 280), 16),
        RestoreCommand::ScrollBy(180)
    );
    // Reordering under restoration dropped the anchor from the list.
    assert_eq!(r.tick(&view(10, false), 32), RestoreCommand::Finish);
}

// ---- end to end with a feedgate source ----

#[test]
fn full_episode_against_a_live_merge_source() {
    use feedgate::{FeedItem, FeedSource, LiveMerge};

    fn note(id: u64, created_at: u64) -> FeedItem<u64> {
        FeedItem {
            id,
            parent_path: alloc::vec![0],
            author: alloc::vec![9],
            created_at,
        }
    }

    // Sequential pager; the anchor (id 25) arrives with the catch-up fetch.
    let mut next_id = 0u64;
    let mut src = LiveMerge::new(move |n| {
        let page: Vec<_> = (0..n)
            .map(|_| {
                next_id += 1;
                note(next_id, 1_000 - next_id)
            })
            .collect();
        Ok(page)
    });

    let mut nav = Navigator::new(MemorySnapshotStore::new());
    nav.leave("/feed", None, snap(25, 40, 30));

    let taken = nav.take("/feed", None).unwrap();
    let mut r = RestoreController::new(RestoreOptions::new());
    r.begin(taken.clone(), src.iterator_id(), 0);

    let mut now = 0u64;
    let mut scrolled = 0i64;
    let mut finished = false;
    for _ in 0..64 {
        now += 16;
        let items = src.items();
        let anchor_present = items.iter().any(|it| it.id == taken.anchor_id);
        let view = RestoreView {
            item_count: items.len(),
            anchor_present,
            anchor_visible: anchor_present,
            // Converge after one corrective scroll.
            anchor_offset_px: anchor_present.then_some(if scrolled == 0 { 240 } else { 40 }),
            iterator_id: src.iterator_id(),
        };
        match r.tick(&view, now) {
            RestoreCommand::Wait => {}
            RestoreCommand::LoadMore(n) => {
                let grew = src.load_more(n);
                r.on_load_result(grew);
            }
            RestoreCommand::ScrollBy(delta) => scrolled += delta,
            RestoreCommand::Finish => {
                finished = true;
                break;
            }
        }
    }

    assert!(finished);
    assert_eq!(scrolled, 200);
    assert!(src.items().len() >= 30);
    assert!(src.items().iter().any(|it| it.id == 25));
    // Snapshot was consumed exactly once.
    assert_eq!(nav.take("/feed", None), None);
}
