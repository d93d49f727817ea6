//! Shared-element transitions.
//!
//! A node tagged with `Modifier::shared_bounds` / `Modifier::shared_element`
//! keeps its identity across frames through its key. When the key's layout
//! bounds change between two frames, the node is painted along a spring from
//! where it was to where it now belongs, instead of jumping.
//!
//! `SharedTransitionLayout` namespaces keys so two widget instances never
//! animate each other's nodes; `AnimatedContent` swaps between mutually
//! exclusive branches with no enter/exit fade, leaving all motion to the
//! shared nodes.

use std::collections::HashMap;
use std::fmt::Debug;

use hintfield_core::animation::{Interpolate, Spring, SpringSpec};
use hintfield_core::*;

/// Key namespace handed to content composed inside a `SharedTransitionLayout`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharedTransitionScope {
    prefix: String,
}

impl SharedTransitionScope {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Fully qualified key for a shared node named `name`.
    pub fn key(&self, name: &str) -> String {
        format!("{}/{}", self.prefix, name)
    }
}

pub fn SharedTransitionLayout(
    key: impl Into<String>,
    content: impl FnOnce(&SharedTransitionScope) -> View,
) -> View {
    let scope = SharedTransitionScope::new(key);
    content(&scope)
}

/// Composes only the branch for `target`. The previous branch disappears at
/// once; shared nodes present in both carry the motion.
pub fn AnimatedContent<T: Clone + PartialEq + Debug + 'static>(
    label: &str,
    target: T,
    content: impl FnOnce(T) -> View,
) -> View {
    let last = remember_state(|| None::<T>);
    {
        let mut last = last.borrow_mut();
        if let Some(prev) = last.as_ref()
            && *prev != target
        {
            log::debug!("{label}: {prev:?} -> {target:?}");
        }
        *last = Some(target.clone());
    }
    content(target)
}

/// Font size and color a shared text node is painted with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextLook {
    pub size_px: f32,
    pub color: Color,
}

impl Interpolate for TextLook {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        TextLook {
            size_px: self.size_px.interpolate(&other.size_px, t).max(0.0),
            color: self.color.interpolate(&other.color, t),
        }
    }
}

/// Where a shared node sits after this frame's layout.
#[derive(Clone, Debug, PartialEq)]
pub struct SharedTarget {
    pub key: String,
    pub rect: Rect,
    pub look: Option<TextLook>,
    pub spec: SpringSpec,
}

/// Paint-time state of one shared node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimatedShared {
    pub rect: Rect,
    pub look: Option<TextLook>,
    pub target: Rect,
}

struct Track {
    from: Rect,
    to: Rect,
    from_look: Option<TextLook>,
    to_look: Option<TextLook>,
    progress: Spring,
}

impl Track {
    fn at_rest(target: &SharedTarget) -> Self {
        Track {
            from: target.rect,
            to: target.rect,
            from_look: target.look,
            to_look: target.look,
            progress: Spring::new(target.spec, 1.0),
        }
    }

    fn rect(&self) -> Rect {
        self.from.interpolate(&self.to, self.progress.value())
    }

    fn look(&self) -> Option<TextLook> {
        match (self.from_look, self.to_look) {
            (Some(a), Some(b)) => Some(a.interpolate(&b, self.progress.value().clamp(0.0, 1.0))),
            (_, b) => b,
        }
    }

    fn retarget(&mut self, target: &SharedTarget) {
        self.from = self.rect();
        self.from_look = self.look().or(target.look);
        self.to = target.rect;
        self.to_look = target.look;
        self.progress = Spring::new(target.spec, 0.0);
        self.progress.set_target(1.0);
    }
}

// Sub-pixel layout jitter is not a move.
const MOVE_EPSILON: f32 = 0.01;

/// Identity map from shared key to its running bounds animation. Owned by the
/// platform and fed once per frame.
#[derive(Default)]
pub struct SharedTransitions {
    tracks: HashMap<String, Track>,
}

impl SharedTransitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register this frame's targets. Unknown keys snap into place, moved keys
    /// start a spring from their current animated bounds, and keys missing from
    /// `targets` are dropped.
    pub fn update(&mut self, targets: &[SharedTarget]) {
        for t in targets {
            match self.tracks.get_mut(&t.key) {
                None => {
                    self.tracks.insert(t.key.clone(), Track::at_rest(t));
                }
                Some(track) => {
                    let moved = !track.to.approx_eq(&t.rect, MOVE_EPSILON);
                    if moved || track.to_look != t.look {
                        log::debug!(
                            "shared '{}' -> ({:.1}, {:.1}) stiffness {}",
                            t.key,
                            t.rect.x,
                            t.rect.y,
                            t.spec.stiffness
                        );
                        track.retarget(t);
                    }
                }
            }
        }
        let before = self.tracks.len();
        self.tracks
            .retain(|k, _| targets.iter().any(|t| &t.key == k));
        if self.tracks.len() != before {
            log::trace!("evicted {} shared keys", before - self.tracks.len());
        }
    }

    /// Advance every spring by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        for track in self.tracks.values_mut() {
            track.progress.step(dt);
        }
    }

    pub fn get(&self, key: &str) -> Option<AnimatedShared> {
        self.tracks.get(key).map(|t| AnimatedShared {
            rect: t.rect(),
            look: t.look(),
            target: t.to,
        })
    }

    /// Current animated bounds of `key`.
    pub fn bounds(&self, key: &str) -> Option<Rect> {
        self.tracks.get(key).map(Track::rect)
    }

    /// Spring driving `key`'s current transition.
    pub fn spec(&self, key: &str) -> Option<SpringSpec> {
        self.tracks.get(key).map(|t| t.progress.spec())
    }

    pub fn is_animating(&self) -> bool {
        self.tracks.values().any(|t| !t.progress.is_settled())
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
