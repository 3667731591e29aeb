//! Block moves: relocate several items at once and observe that rendering
//! roots survive the reorder untouched.
//!
//! Run with: `cargo run -p granule-adapter --example reorder`

use granule::{Scope, ScopeItem};
use granule_adapter::{MemoryHost, MountTracker};

fn main() {
    let initial: Vec<ScopeItem<String, usize>> =
        (1..=5).map(|i| ScopeItem::new(format!("row-{i}"), i)).collect();
    let ids: Vec<String> = initial.iter().map(|item| item.id.clone()).collect();

    let mut scope: Scope<String, usize, MemoryHost<String, usize>> =
        Scope::new(MemoryHost::new(), initial);
    let mut tracker = MountTracker::attach(&scope, &ids);
    scope.flush();
    println!("mount batch: {:?}", tracker.stats());
    tracker.dispose();

    let renders_before = scope.host().renders().len();

    // Pull rows 1 and 3 in front of row 5, as one block.
    scope
        .move_items(&["row-1".into(), "row-3".into()], Some(&"row-5".into()))
        .unwrap();
    println!("after move: {:?}", scope.host().attached_ids());

    // Send row 2 to the end.
    scope.move_items(&["row-2".into()], None).unwrap();
    println!("after move: {:?}", scope.host().attached_ids());

    scope.flush();
    let host = scope.host();
    println!(
        "re-renders caused by moves: {}",
        host.renders().len() - renders_before
    );
    println!("live roots: {}", host.live_roots());
}
