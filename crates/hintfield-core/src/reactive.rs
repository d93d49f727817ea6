use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

pub type SignalId = usize;
pub type ObserverId = usize;

thread_local! {
    static CURRENT_OBSERVER: RefCell<Option<ObserverId>> = const { RefCell::new(None) };
    static GRAPH: RefCell<DepGraph> = RefCell::new(DepGraph::default());
}

#[derive(Default)]
struct DepGraph {
    next_observer: ObserverId,
    // signal_id -> observers that depend on it
    edges: HashMap<SignalId, HashSet<ObserverId>>,
    // observer_id -> signals it depends on
    back: HashMap<ObserverId, HashSet<SignalId>>,
    // recompute closures
    observers: HashMap<ObserverId, Rc<dyn Fn()>>,
    running: HashSet<ObserverId>,
}

impl DepGraph {
    fn remove_all_edges_for(&mut self, obs: ObserverId) {
        if let Some(signals) = self.back.remove(&obs) {
            for s in signals {
                if let Some(set) = self.edges.get_mut(&s) {
                    set.remove(&obs);
                    if set.is_empty() {
                        self.edges.remove(&s);
                    }
                }
            }
        }
    }
    fn remove_observer(&mut self, obs: ObserverId) {
        self.observers.remove(&obs);
        self.remove_all_edges_for(obs);
        self.running.remove(&obs);
    }
}

pub fn register_signal_read(sig: SignalId) {
    CURRENT_OBSERVER.with(|co| {
        if let Some(obs) = *co.borrow() {
            GRAPH.with(|g| {
                let mut g = g.borrow_mut();
                g.edges.entry(sig).or_default().insert(obs);
                g.back.entry(obs).or_default().insert(sig);
            });
        }
    });
}

/// Run `f` with `obs` as the current observer so signal reads become its dependencies.
pub fn run_tracked<R>(obs: ObserverId, f: impl FnOnce() -> R) -> R {
    struct Restore(Option<ObserverId>);
    impl Drop for Restore {
        fn drop(&mut self) {
            let prev = self.0;
            CURRENT_OBSERVER.with(|co| *co.borrow_mut() = prev);
        }
    }
    let prev = CURRENT_OBSERVER.with(|co| co.borrow_mut().replace(obs));
    let _restore = Restore(prev);
    f()
}

fn rerun(obs: ObserverId) {
    // Clone the closure out so it runs without the graph borrowed.
    let f = GRAPH.with(|g| {
        let mut g = g.borrow_mut();
        g.remove_all_edges_for(obs);
        g.observers.get(&obs).cloned()
    });
    if let Some(f) = f {
        run_tracked(obs, || f());
    }
}

pub fn signal_changed(sig: SignalId) {
    let mut queue: VecDeque<ObserverId> = GRAPH.with(|g| {
        g.borrow()
            .edges
            .get(&sig)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    });
    while let Some(obs) = queue.pop_front() {
        let already = GRAPH.with(|g| !g.borrow_mut().running.insert(obs));
        if already {
            continue;
        }
        rerun(obs);
        GRAPH.with(|g| {
            g.borrow_mut().running.remove(&obs);
        });
    }
}

pub fn new_observer(f: impl Fn() + 'static) -> ObserverId {
    GRAPH.with(|g| {
        let mut g = g.borrow_mut();
        let id = g.next_observer;
        g.next_observer += 1;
        g.observers.insert(id, Rc::new(f));
        id
    })
}

/// Remove an observer and all of its dependency edges. A no-op once the
/// thread's graph has been torn down.
pub fn remove_observer(id: ObserverId) {
    let _ = GRAPH.try_with(|g| {
        g.borrow_mut().remove_observer(id);
    });
}

pub fn run_observer_now(id: ObserverId) {
    rerun(id);
}

/// Number of live observers on this thread.
pub fn observer_count() -> usize {
    GRAPH.with(|g| g.borrow().observers.len())
}

/// Signals with at least one observer on this thread.
pub fn tracked_signal_count() -> usize {
    GRAPH.with(|g| g.borrow().edges.len())
}

/// Signals `obs` currently depends on.
pub fn dependencies_of(obs: ObserverId) -> HashSet<SignalId> {
    GRAPH.with(|g| g.borrow().back.get(&obs).cloned().unwrap_or_default())
}
