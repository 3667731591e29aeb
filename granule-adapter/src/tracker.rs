use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use granule::{HostTree, Scope, ScopeKey, Subscription};

/// Aggregate timing of one batch of expected mounts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MountStats {
    pub expected: usize,
    pub mounted: usize,
    /// Milliseconds from attach to the first mount notification.
    pub first_ms: f64,
    /// Milliseconds from attach to the latest mount notification.
    pub total_ms: f64,
    pub average_ms: f64,
}

struct TrackerState {
    expected: usize,
    mounted: usize,
    started: Instant,
    first: Option<f64>,
    last: Option<f64>,
}

/// Subscribes to the mount notifications of a set of ids and aggregates how
/// long the batch took to come up. Instrumentation only; disposing the
/// tracker (or dropping the scope) ends the measurement.
pub struct MountTracker {
    state: Rc<RefCell<TrackerState>>,
    subs: Vec<Subscription>,
}

impl MountTracker {
    /// Starts the clock now and watches one mount per id.
    pub fn attach<K, V, H, U>(scope: &Scope<K, V, H, U>, ids: &[K]) -> Self
    where
        K: ScopeKey + 'static,
        V: Clone + 'static,
        H: HostTree<K, V>,
        U: 'static,
    {
        let state = Rc::new(RefCell::new(TrackerState {
            expected: ids.len(),
            mounted: 0,
            started: Instant::now(),
            first: None,
            last: None,
        }));
        let subs = ids
            .iter()
            .map(|id| {
                let state = Rc::clone(&state);
                scope.on_item_mount(id.clone(), move |_| {
                    let mut s = state.borrow_mut();
                    let elapsed_ms = s.started.elapsed().as_secs_f64() * 1000.0;
                    if s.first.is_none() {
                        s.first = Some(elapsed_ms);
                    }
                    s.last = Some(elapsed_ms);
                    s.mounted += 1;
                    if s.mounted == s.expected {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(
                            target: "granule",
                            expected = s.expected,
                            total_ms = elapsed_ms,
                            "mount batch complete"
                        );
                    }
                })
            })
            .collect();
        Self { state, subs }
    }

    pub fn is_complete(&self) -> bool {
        let s = self.state.borrow();
        s.mounted >= s.expected
    }

    pub fn stats(&self) -> MountStats {
        let s = self.state.borrow();
        let total_ms = s.last.unwrap_or(0.0);
        MountStats {
            expected: s.expected,
            mounted: s.mounted,
            first_ms: s.first.unwrap_or(0.0),
            total_ms,
            average_ms: if s.mounted == 0 {
                0.0
            } else {
                total_ms / s.mounted as f64
            },
        }
    }

    /// Stops watching. Idempotent.
    pub fn dispose(&mut self) {
        for sub in &mut self.subs {
            sub.dispose();
        }
    }
}
