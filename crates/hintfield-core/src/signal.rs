use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::reactive::{self, SignalId};

pub type SubId = usize;

thread_local! {
    static NEXT_SIGNAL: Cell<SignalId> = const { Cell::new(0) };
}

pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

impl<T: 'static> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

/// Non-owning handle, used by observers that must not keep their output alive.
pub struct WeakSignal<T: 'static>(Weak<RefCell<Inner<T>>>);

struct Inner<T> {
    id: SignalId,
    value: T,
    subs: Vec<Box<dyn Fn(&T)>>,
}

impl<T: 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        let id = NEXT_SIGNAL.with(|n| {
            let id = n.get();
            n.set(id + 1);
            id
        });
        Self(Rc::new(RefCell::new(Inner {
            id,
            value,
            subs: Vec::new(),
        })))
    }

    pub fn id(&self) -> SignalId {
        self.0.borrow().id
    }

    /// Tracked read: the running observer (if any) will recompute on the next write.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        let inner = self.0.borrow();
        reactive::register_signal_read(inner.id);
        inner.value.clone()
    }

    /// Untracked read.
    pub fn peek(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().value.clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let inner = self.0.borrow();
        reactive::register_signal_read(inner.id);
        f(&inner.value)
    }

    pub fn set(&self, v: T) {
        let id = {
            let mut inner = self.0.borrow_mut();
            inner.value = v;
            let vref = &inner.value;
            for s in &inner.subs {
                s(vref);
            }
            inner.id
        };
        reactive::signal_changed(id);
    }

    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        let id = {
            let mut inner = self.0.borrow_mut();
            f(&mut inner.value);
            let vref = &inner.value;
            for s in &inner.subs {
                s(vref);
            }
            inner.id
        };
        reactive::signal_changed(id);
    }

    /// Subscribers run synchronously inside `set`; they must not write back to this signal.
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        let mut inner = self.0.borrow_mut();
        inner.subs.push(Box::new(f));
        inner.subs.len() - 1
    }

    pub fn downgrade(&self) -> WeakSignal<T> {
        WeakSignal(Rc::downgrade(&self.0))
    }
}

impl<T: 'static> WeakSignal<T> {
    pub fn upgrade(&self) -> Option<Signal<T>> {
        self.0.upgrade().map(Signal)
    }
}

pub fn signal<T: 'static>(t: T) -> Signal<T> {
    Signal::new(t)
}
