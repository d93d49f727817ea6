//! # Theming and locals
//!
//! Global UI parameters travel as thread-local "composition locals":
//!
//! - `Theme`: colors for surfaces, text and accents.
//! - `Typography`: the type scale widgets derive their text styles from.
//! - `Density`: dp→px scale factor.
//! - `TextScale`: user text scaling.
//!
//! Override any of them for a subtree:
//!
//! ```rust
//! use hintfield_core::*;
//!
//! let light = Theme {
//!     surface: Color::from_hex("#F5F5F5"),
//!     on_surface: Color::from_hex("#222222"),
//!     ..Theme::default()
//! };
//!
//! with_theme(light, || {
//!     assert_eq!(theme().on_surface, Color::from_hex("#222222"));
//! });
//! assert_eq!(theme().on_surface, Theme::default().on_surface);
//! ```
//!
//! Widgets in `hintfield-ui` read from `theme()` and `typography()` and avoid
//! hard-coding colors except where a design calls for a fixed accent.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::{Color, Typography};

thread_local! {
    static LOCALS_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = RefCell::new(Vec::new());
}

/// density-independent pixels (dp)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dp(pub f32);

impl Dp {
    /// Converts this dp value into physical pixels using the current Density.
    pub fn to_px(self) -> f32 {
        self.0 * density().scale
    }
}

/// Convenience: convert a raw dp scalar into px using current Density.
pub fn dp_to_px(dp: f32) -> f32 {
    Dp(dp).to_px()
}

/// Font sp → px with density and text scale applied.
pub fn sp_to_px(sp: f32) -> f32 {
    dp_to_px(sp) * text_scale().0
}

fn with_locals_frame<R>(f: impl FnOnce() -> R) -> R {
    // Pops even on unwind
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            LOCALS_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    LOCALS_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

fn set_local_boxed(t: TypeId, v: Box<dyn Any>) {
    LOCALS_STACK.with(|st| {
        if let Some(top) = st.borrow_mut().last_mut() {
            top.insert(t, v);
        } else {
            let mut m = HashMap::new();
            m.insert(t, v);
            st.borrow_mut().push(m);
        }
    });
}

fn provide<T: 'static, R>(value: T, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<T>(), Box::new(value));
        f()
    })
}

fn current<T: Copy + Default + 'static>() -> T {
    LOCALS_STACK.with(|st| {
        for frame in st.borrow().iter().rev() {
            if let Some(v) = frame.get(&TypeId::of::<T>())
                && let Some(t) = v.downcast_ref::<T>()
            {
                return *t;
            }
        }
        T::default()
    })
}

// Typed API

/// Semantic color theme used by widgets and paint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    /// Window background / app root.
    pub background: Color,
    /// Default container surface (text field boxes).
    pub surface: Color,
    /// Primary foreground color on top of `surface`/`background`.
    pub on_surface: Color,
    /// Accent color.
    pub primary: Color,
    /// Caret and focus indication.
    pub focus: Color,
    /// Accent for raised hint labels.
    pub hint_label: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::from_hex("#121212"),
            surface: Color::from_hex("#1E1E1E"),
            on_surface: Color::from_hex("#DDDDDD"),
            primary: Color::from_hex("#34AF82"),
            focus: Color::from_hex("#88CCFF"),
            hint_label: Color::GREEN,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Density {
    pub scale: f32, // dp→px multiplier
}
impl Default for Density {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextScale(pub f32);
impl Default for TextScale {
    fn default() -> Self {
        Self(1.0)
    }
}

pub fn with_theme<R>(theme: Theme, f: impl FnOnce() -> R) -> R {
    provide(theme, f)
}

pub fn with_typography<R>(typography: Typography, f: impl FnOnce() -> R) -> R {
    provide(typography, f)
}

pub fn with_density<R>(density: Density, f: impl FnOnce() -> R) -> R {
    provide(density, f)
}

pub fn with_text_scale<R>(ts: TextScale, f: impl FnOnce() -> R) -> R {
    provide(ts, f)
}

// Getters with defaults if not set

pub fn theme() -> Theme {
    current::<Theme>()
}

pub fn typography() -> Typography {
    current::<Typography>()
}

pub fn density() -> Density {
    current::<Density>()
}

pub fn text_scale() -> TextScale {
    current::<TextScale>()
}
