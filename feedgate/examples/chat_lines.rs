// Example: thread-line tags for chat-mode rendering.
use feedgate::{FeedItem, line_kinds};

fn msg(id: u64, parent_path: &[u64]) -> FeedItem<u64> {
    FeedItem {
        id,
        parent_path: parent_path.to_vec(),
        author: vec![9],
        created_at: id,
    }
}

fn main() {
    let root = 0u64;
    let items = [
        msg(1, &[0]),       // root child, replied to below
        msg(2, &[0, 1]),    // reply, continued
        msg(3, &[0, 1, 2]), // deeper reply, then a sibling branch
        msg(4, &[0, 1, 2]), // sibling under the same parent
        msg(5, &[0]),       // standalone root child
    ];

    for (item, kind) in items.iter().zip(line_kinds(&root, &items)) {
        println!("item {} -> {kind:?}", item.id);
    }
}
