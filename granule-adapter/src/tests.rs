use crate::*;

use granule::{Scope, ScopeItem};

fn scope_of(ids: &[&'static str]) -> Scope<&'static str, u32, MemoryHost<&'static str, u32>> {
    let items = ids
        .iter()
        .enumerate()
        .map(|(i, id)| ScopeItem::new(*id, i as u32))
        .collect();
    Scope::new(MemoryHost::new(), items)
}

#[test]
fn batch_mount_attaches_everything_in_one_mutation() {
    let scope = scope_of(&["a", "b", "c", "d"]);
    let host = scope.host();

    assert_eq!(host.attached_ids(), vec!["a", "b", "c", "d"]);
    assert_eq!(host.structural_ops(), 1);
    assert_eq!(host.live_roots(), 4);
    assert_eq!(host.renders().len(), 4);
}

#[test]
fn end_to_end_mutations_keep_host_in_lockstep() {
    let mut scope = scope_of(&["a", "b", "c"]);
    scope.flush();

    scope.insert("x", 9, Some("b")).unwrap();
    assert_eq!(scope.host().attached_ids(), vec!["a", "x", "b", "c"]);

    scope.move_items(&["c", "a"], Some(&"x")).unwrap();
    assert_eq!(scope.host().attached_ids(), vec!["a", "c", "x", "b"]);

    scope.delete(&"x");
    scope.flush();
    let host = scope.host();
    assert_eq!(host.attached_ids(), vec!["a", "c", "b"]);
    assert_eq!(host.live_roots(), 3);
    assert_eq!(host.destroyed_roots(), 1);
}

#[test]
fn update_re_renders_in_place() {
    let mut scope = scope_of(&["a", "b"]);
    scope.flush();
    assert_eq!(scope.host().render_count(&"a"), 1);

    scope.update(&"a", 42).unwrap();
    scope.update(&"a", 43).unwrap();
    let host = scope.host();
    assert_eq!(host.render_count(&"a"), 3);
    assert_eq!(host.render_count(&"b"), 1);
    assert_eq!(host.renders().last(), Some(&("a", 43)));
    // No structural churn for updates.
    assert_eq!(host.structural_ops(), 1);
}

#[test]
fn detached_node_degrades_without_breaking_the_collection() {
    let mut scope = scope_of(&["a", "b", "c"]);
    scope.flush();

    assert!(scope.host_mut().detach_node(&"b"));
    assert!(!scope.host_mut().detach_node(&"b"));
    assert!(!scope.host().is_attached(&"b"));

    // The collection still knows "b"; the host just lost its node. A move
    // touching "b" skips the missing anchor and relocates the rest.
    scope.move_items(&["b", "c"], Some(&"a")).unwrap();
    assert_eq!(
        scope.state().iter().map(|i| i.id).collect::<Vec<_>>(),
        vec!["b", "c", "a"]
    );
    assert_eq!(scope.host().attached_ids(), vec!["c", "a"]);
}

#[test]
fn mount_tracker_observes_a_full_batch() {
    let mut scope = scope_of(&["a", "b", "c"]);
    let mut tracker = MountTracker::attach(&scope, &["a", "b", "c"]);
    assert!(!tracker.is_complete());

    scope.flush();
    assert!(tracker.is_complete());
    let stats = tracker.stats();
    assert_eq!(stats.expected, 3);
    assert_eq!(stats.mounted, 3);
    assert!(stats.first_ms <= stats.total_ms);
    assert!(stats.average_ms <= stats.total_ms);

    tracker.dispose();
    scope.insert("a2", 9, None).unwrap();
    scope.flush();
    assert_eq!(tracker.stats().mounted, 3);
}

#[test]
fn tracker_ignores_mounts_for_deleted_items() {
    let mut scope = scope_of(&[]);
    scope.insert("a", 1, None).unwrap();
    let tracker = MountTracker::attach(&scope, &["a"]);

    scope.delete(&"a");
    scope.flush();
    assert!(!tracker.is_complete());
    assert_eq!(tracker.stats().mounted, 0);
}
