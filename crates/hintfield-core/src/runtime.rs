use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::view::{FocusCallback, TextCallback};
use crate::{Rect, Scene, UiResult, View, ViewId, semantics::Role};

thread_local! {
    pub static COMPOSER: RefCell<Composer> = RefCell::new(Composer::default());
    static NEXT_INSTANCE: Cell<u64> = const { Cell::new(1) };
}

#[derive(Default)]
pub struct Composer {
    pub slots: Vec<Box<dyn Any>>,
    pub cursor: usize,
    pub keyed_slots: HashMap<String, Box<dyn Any>>,
    touched: HashSet<String>,
    composing: bool,
}

impl Composer {
    /// Drop every slot the finished frame did not reach.
    fn end_frame(&mut self) -> (Vec<Box<dyn Any>>, Vec<Box<dyn Any>>) {
        let positional = self.slots.split_off(self.cursor.min(self.slots.len()));
        let touched = std::mem::take(&mut self.touched);
        let stale: Vec<String> = self
            .keyed_slots
            .keys()
            .filter(|k| !touched.contains(*k))
            .cloned()
            .collect();
        let keyed = stale
            .into_iter()
            .filter_map(|k| self.keyed_slots.remove(&k))
            .collect();
        self.composing = false;
        (positional, keyed)
    }
}

/// Marks one composition pass. Slots not reached before the guard drops are unmounted.
pub struct ComposeGuard {
    _private: (),
}

impl ComposeGuard {
    pub fn begin() -> Self {
        COMPOSER.with(|c| {
            let mut c = c.borrow_mut();
            c.cursor = 0;
            c.touched.clear();
            c.composing = true;
        });
        ComposeGuard { _private: () }
    }
}

impl Drop for ComposeGuard {
    fn drop(&mut self) {
        let (positional, keyed) = COMPOSER.with(|c| c.borrow_mut().end_frame());
        if !positional.is_empty() || !keyed.is_empty() {
            log::debug!(
                "unmounted {} positional and {} keyed slots",
                positional.len(),
                keyed.len()
            );
        }
        // Dropped here, outside the composer borrow: slot destructors may touch the runtime.
        drop(positional);
        drop(keyed);
    }
}

/// Slot-based remember (sequential composition only)
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    let existing = COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let cursor = c.cursor;
        c.cursor += 1;
        match c.slots.get(cursor) {
            Some(slot) => match slot.downcast_ref::<Rc<T>>() {
                Some(rc) => Ok(rc.clone()),
                None => {
                    log::warn!(
                        "remember: slot {} type changed; replacing. \
                         If this is due to conditional composition, prefer remember_with_key.",
                        cursor
                    );
                    Err(Some(cursor))
                }
            },
            None => Err(None),
        }
    });
    match existing {
        Ok(rc) => rc,
        Err(replace) => {
            // init may itself remember; run it without the composer borrowed.
            let rc: Rc<T> = Rc::new(init());
            COMPOSER.with(|c| {
                let mut c = c.borrow_mut();
                match replace {
                    Some(i) => c.slots[i] = Box::new(rc.clone()),
                    None => c.slots.push(Box::new(rc.clone())),
                }
            });
            rc
        }
    }
}

/// Key-based remember
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    let key = key.into();
    let existing = COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        if c.composing {
            c.touched.insert(key.clone());
        }
        let existing = c.keyed_slots.get(&key)?;
        match existing.downcast_ref::<Rc<T>>() {
            Some(rc) => Some(rc.clone()),
            None => {
                log::warn!(
                    "remember_with_key: key '{}' reused with a different type; replacing.",
                    key
                );
                None
            }
        }
    });
    if let Some(rc) = existing {
        return rc;
    }
    let rc: Rc<T> = Rc::new(init());
    let old = COMPOSER.with(|c| {
        c.borrow_mut()
            .keyed_slots
            .insert(key, Box::new(rc.clone()))
    });
    drop(old);
    rc
}

pub fn remember_state<T: 'static>(init: impl FnOnce() -> T) -> Rc<RefCell<T>> {
    remember(|| RefCell::new(init()))
}

/// Fresh id for a widget instance; remember it to keep it stable.
pub fn next_instance_id() -> u64 {
    NEXT_INSTANCE.with(|n| {
        let id = n.get();
        n.set(id + 1);
        id
    })
}

/// Text input as seen by the platform after layout.
#[derive(Clone)]
pub struct InputRegion {
    /// Stable across frames; the platform keys editing state and focus by it.
    pub state_key: ViewId,
    pub rect: Rect,
    pub value: String,
    pub focused: bool,
    pub on_change: Option<TextCallback>,
    pub on_focus_change: Option<FocusCallback>,
}

impl std::fmt::Debug for InputRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputRegion")
            .field("state_key", &self.state_key)
            .field("rect", &self.rect)
            .field("value", &self.value)
            .field("focused", &self.focused)
            .finish()
    }
}

/// Flattened semantics node produced by layout.
#[derive(Clone, Debug, PartialEq)]
pub struct SemNode {
    pub id: u64,
    pub role: Role,
    pub label: Option<String>,
    pub rect: Rect,
    pub focused: bool,
    pub enabled: bool,
}

/// Animated bounds of a shared element at paint time.
#[derive(Clone, Debug, PartialEq)]
pub struct SharedBounds {
    pub key: String,
    pub rect: Rect,
    pub target: Rect,
}

/// Frame: output of composition for a tick.
pub struct Frame {
    pub root: View,
    pub scene: Scene,
    pub inputs: Vec<InputRegion>,
    pub semantics_nodes: Vec<SemNode>,
    pub shared: Vec<SharedBounds>,
    pub focus_chain: Vec<ViewId>,
}

impl Frame {
    pub fn input(&self, state_key: ViewId) -> Option<&InputRegion> {
        self.inputs.iter().find(|i| i.state_key == state_key)
    }

    pub fn shared_bounds(&self, key: &str) -> Option<&SharedBounds> {
        self.shared.iter().find(|s| s.key == key)
    }
}

/// What layout hands back to the scheduler.
pub struct Painted {
    pub scene: Scene,
    pub inputs: Vec<InputRegion>,
    pub semantics_nodes: Vec<SemNode>,
    pub shared: Vec<SharedBounds>,
}

pub struct Scheduler {
    pub focused: Option<ViewId>,
    pub size: (u32, u32),
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            focused: None,
            size: (1280, 800),
        }
    }

    pub fn compose_frame<F>(
        &mut self,
        mut build_root: F,
        layout_paint: impl FnOnce(&View, (u32, u32)) -> UiResult<Painted>,
    ) -> UiResult<Frame>
    where
        F: FnMut(&mut Scheduler) -> View,
    {
        let root = {
            let _guard = ComposeGuard::begin();
            build_root(self)
        };
        let painted = layout_paint(&root, self.size)?;
        let focus_chain = painted.inputs.iter().map(|i| i.state_key).collect();

        Ok(Frame {
            root,
            scene: painted.scene,
            inputs: painted.inputs,
            semantics_nodes: painted.semantics_nodes,
            shared: painted.shared,
            focus_chain,
        })
    }
}
