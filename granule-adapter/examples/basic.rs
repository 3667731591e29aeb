//! Minimal tour: build a scope over an in-memory host, mutate it, and watch
//! the events.
//!
//! Run with: `cargo run -p granule-adapter --example basic`

use std::cell::RefCell;
use std::rc::Rc;

use granule::{Scope, ScopeItem};
use granule_adapter::MemoryHost;

fn main() {
    let initial = vec![
        ScopeItem::new("alpha", 1u32),
        ScopeItem::new("beta", 2),
        ScopeItem::new("gamma", 3),
    ];
    let mut scope: Scope<&str, u32, MemoryHost<&str, u32>> =
        Scope::new(MemoryHost::new(), initial);

    let log = Rc::new(RefCell::new(Vec::new()));
    let log_insert = Rc::clone(&log);
    let log_delete = Rc::clone(&log);
    let mut subs = vec![
        scope.on_insert(move |payload| {
            log_insert
                .borrow_mut()
                .push(format!("insert {} before {:?}", payload.id, payload.before_id));
        }),
        scope.on_delete(move |id| {
            log_delete.borrow_mut().push(format!("delete {id}"));
        }),
    ];

    // Mount notifications are deferred; a host drives flush() from its
    // microtask or frame loop.
    scope.flush();

    scope.insert("delta", 4, Some("beta")).unwrap();
    scope.update(&"alpha", 10).unwrap();
    scope.delete(&"gamma");
    scope.flush();

    println!("events:");
    for line in log.borrow().iter() {
        println!("  {line}");
    }
    println!("collection:");
    for item in scope.state() {
        println!("  {} = {}", item.id, item.state);
    }
    println!("host order: {:?}", scope.host().attached_ids());

    for sub in &mut subs {
        sub.dispose();
    }
}
