// Example: gating head/tail items until their content loads.
use feedgate::{GateOptions, RevealGate};

fn main() {
    let mut gate = RevealGate::new(GateOptions::new().with_debounce_ms(5_000));

    // First render: the whole list is head-hidden until content loads.
    let w = gate.on_list_changed(&[1u64, 2, 3], 0);
    println!("first render: window={w:?} pending={}", gate.pending_len());

    gate.acknowledge(&1, 100);
    gate.acknowledge(&2, 150);
    println!("two acks in: window={:?}", gate.window());

    // Item 3 never acknowledges; the max-wait deadline (2x debounce)
    // reveals anyway so the feed cannot hang on one broken item.
    let revealed = gate.tick(10_000);
    println!("max-wait tick: revealed={revealed} window={:?}", gate.window());

    // Incremental growth gates only the items that entered at the edges.
    let w = gate.on_list_changed(&[0, 1, 2, 3, 4], 10_100);
    println!("after growth: window={w:?} pending={}", gate.pending_len());
    gate.acknowledge(&0, 10_200);
    gate.acknowledge(&4, 10_250);
    println!("edges loaded: window={:?}", gate.window());
}
