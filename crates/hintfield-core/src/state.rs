use crate::reactive::{self, ObserverId};
use crate::{Signal, signal};

/// Read-only value recomputed whenever a signal it read changes.
///
/// Dropping the handle removes the underlying observer, so a derived value
/// held in a `remember` slot stops tracking once its call site unmounts.
pub struct Derived<T: Clone + PartialEq + 'static> {
    value: Signal<T>,
    observer: ObserverId,
}

impl<T: Clone + PartialEq + 'static> Derived<T> {
    /// Tracked read.
    pub fn get(&self) -> T {
        self.value.get()
    }

    pub fn peek(&self) -> T {
        self.value.peek()
    }

    /// The backing signal, for subscribing to changes.
    pub fn signal(&self) -> &Signal<T> {
        &self.value
    }

    pub fn observer_id(&self) -> ObserverId {
        self.observer
    }
}

impl<T: Clone + PartialEq + 'static> Drop for Derived<T> {
    fn drop(&mut self) {
        reactive::remove_observer(self.observer);
    }
}

/// Derive a value from other signals. Recomputes synchronously on writes and
/// only notifies downstream when the result actually changes.
pub fn derived_state_of<T: Clone + PartialEq + 'static>(
    compute: impl Fn() -> T + 'static,
) -> Derived<T> {
    let value = signal(compute());
    let weak = value.downgrade();
    let observer = reactive::new_observer(move || {
        if let Some(out) = weak.upgrade() {
            let next = compute();
            if out.peek() != next {
                out.set(next);
            }
        }
    });
    // Second run establishes dependencies.
    reactive::run_observer_now(observer);
    Derived { value, observer }
}
