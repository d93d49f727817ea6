//! Headless host.
//!
//! Owns everything that outlives a frame on the platform side: the scheduler
//! and focus, the editing state of every text input, the shared-transition
//! registry, and the last painted frame. Input is delivered as `InputEvent`s
//! and routed to the focused input's callbacks.

mod focus;

use std::collections::{HashMap, HashSet};

use anyhow::Context;
use hintfield_core::animation;
use hintfield_core::*;
use hintfield_ui::{SharedTransitions, TextFieldState, layout_and_paint};
use web_time::{Duration, Instant};

pub type RootFn = Box<dyn FnMut(&mut Scheduler) -> View>;

pub struct HeadlessHost {
    sched: Scheduler,
    root: RootFn,
    textfield_states: HashMap<ViewId, TextFieldState>,
    transitions: SharedTransitions,
    frame_cache: Option<Frame>,
    last_tick: Option<Instant>,
    density: Density,
    text_scale: TextScale,
}

impl HeadlessHost {
    pub fn new(root: impl FnMut(&mut Scheduler) -> View + 'static) -> Self {
        Self {
            sched: Scheduler::new(),
            root: Box::new(root),
            textfield_states: HashMap::new(),
            transitions: SharedTransitions::new(),
            frame_cache: None,
            last_tick: None,
            density: Density::default(),
            text_scale: TextScale::default(),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.sched.size = (width, height);
        self
    }

    pub fn with_density(mut self, scale: f32) -> Self {
        self.density = Density { scale };
        self
    }

    pub fn with_text_scale(mut self, scale: f32) -> Self {
        self.text_scale = TextScale(scale);
        self
    }

    /// Compose, lay out and paint one frame, advancing transitions by `dt`.
    pub fn frame(&mut self, dt: Duration) -> anyhow::Result<&Frame> {
        let dt_s = dt.as_secs_f32();
        let (density, text_scale) = (self.density, self.text_scale);
        let root = &mut self.root;
        let transitions = &mut self.transitions;
        let textfield_states = &self.textfield_states;
        let sched = &mut self.sched;
        let frame = with_text_scale(text_scale, || {
            with_density(density, || {
                sched.compose_frame(
                    |s| root(s),
                    |view, size| layout_and_paint(view, size, transitions, textfield_states, dt_s),
                )
            })
        })
        .context("composing frame")?;

        let live: HashSet<ViewId> = frame.inputs.iter().map(|i| i.state_key).collect();
        if let Some(f) = self.sched.focused
            && !live.contains(&f)
        {
            log::debug!("focused input {f} left the tree; clearing focus");
            self.sched.focused = None;
        }
        self.textfield_states.retain(|k, _| live.contains(k));

        Ok(self.frame_cache.insert(frame))
    }

    /// Frame with `dt` measured on the animation clock since the previous tick.
    pub fn tick(&mut self) -> anyhow::Result<&Frame> {
        let now = animation::now();
        let dt = self
            .last_tick
            .map(|t| now.saturating_duration_since(t))
            .unwrap_or_default();
        self.last_tick = Some(now);
        self.frame(dt)
    }

    /// Run frames of `dt` until no shared transition is moving. Returns the
    /// number of frames run.
    pub fn settle(&mut self, dt: Duration, max_frames: usize) -> anyhow::Result<usize> {
        for n in 1..=max_frames {
            self.frame(dt)?;
            if !self.transitions.is_animating() {
                return Ok(n);
            }
        }
        log::warn!("transitions still running after {max_frames} frames");
        Ok(max_frames)
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.frame_cache.as_ref()
    }

    pub fn focused(&self) -> Option<ViewId> {
        self.sched.focused
    }

    /// State keys of the inputs in the last frame, in focus order.
    pub fn input_keys(&self) -> Vec<ViewId> {
        self.frame_cache
            .as_ref()
            .map(|f| f.focus_chain.clone())
            .unwrap_or_default()
    }

    pub fn transitions(&self) -> &SharedTransitions {
        &self.transitions
    }

    pub fn is_animating(&self) -> bool {
        self.transitions.is_animating()
    }

    pub fn text_field_state(&self, key: ViewId) -> Option<&TextFieldState> {
        self.textfield_states.get(&key)
    }

    pub fn dispatch(&mut self, event: InputEvent) -> anyhow::Result<()> {
        self.ensure_frame()?;
        log::trace!("dispatch {event:?}");
        match event {
            InputEvent::Focus(key) => self.move_focus(Some(key)),
            InputEvent::Blur => self.move_focus(None),
            InputEvent::FocusNext => {
                let chain = self.input_keys();
                match focus::next_in_chain(&chain, self.sched.focused) {
                    Some(next) => self.move_focus(Some(next)),
                    None => Ok(()),
                }
            }
            InputEvent::Text(s) => self.edit(|st| st.insert_text(&s)),
            InputEvent::Backspace => self.edit(TextFieldState::delete_backward),
            InputEvent::Delete => self.edit(TextFieldState::delete_forward),
            InputEvent::Left { extend } => self.edit(|st| st.move_cursor(-1, extend)),
            InputEvent::Right { extend } => self.edit(|st| st.move_cursor(1, extend)),
        }
    }

    pub fn type_text(&mut self, text: &str) -> anyhow::Result<()> {
        self.dispatch(InputEvent::Text(text.to_string()))
    }

    fn ensure_frame(&mut self) -> anyhow::Result<()> {
        if self.frame_cache.is_none() {
            self.frame(Duration::ZERO)?;
        }
        Ok(())
    }

    fn move_focus(&mut self, next: Option<ViewId>) -> anyhow::Result<()> {
        let Some(frame) = self.frame_cache.as_ref() else {
            return Ok(());
        };
        if let Some(key) = next
            && frame.input(key).is_none()
        {
            return Err(UiError::UnknownInput(key).into());
        }
        let prev = self.sched.focused;
        if prev == next {
            return Ok(());
        }

        let callback = |key: ViewId| frame.input(key).and_then(|r| r.on_focus_change.clone());
        let blur = prev.and_then(&callback);
        let gain = next.and_then(&callback);
        if let Some(region) = next.and_then(|k| frame.input(k)) {
            self.textfield_states
                .entry(region.state_key)
                .or_insert_with(|| TextFieldState::with_text(region.value.clone()));
        }
        self.sched.focused = next;
        log::debug!("focus {prev:?} -> {next:?}");

        if let Some(cb) = blur {
            cb(false);
        }
        if let Some(cb) = gain {
            cb(true);
        }
        Ok(())
    }

    fn edit(&mut self, apply: impl FnOnce(&mut TextFieldState)) -> anyhow::Result<()> {
        self.sched.focused.ok_or(UiError::NoFocus)?;
        // Pick up writes made to the widget's value since the last frame.
        self.frame(Duration::ZERO)?;
        let key = self.sched.focused.ok_or(UiError::NoFocus)?;
        let region = self
            .frame_cache
            .as_mut()
            .and_then(|f| f.inputs.iter_mut().find(|i| i.state_key == key))
            .ok_or(UiError::UnknownInput(key))?;

        let state = self
            .textfield_states
            .entry(key)
            .or_insert_with(|| TextFieldState::with_text(region.value.clone()));
        if state.text != region.value {
            log::debug!("input {key} value replaced outside the host; caret to end");
            *state = TextFieldState::with_text(region.value.clone());
        }
        let before = state.text.clone();
        apply(state);
        if state.text == before {
            return Ok(());
        }

        region.value = state.text.clone();
        if let Some(cb) = region.on_change.clone() {
            cb(state.text.clone());
        }
        Ok(())
    }
}
