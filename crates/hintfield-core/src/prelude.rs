pub use crate::animation::{
    Clock, Interpolate, Spring, SpringSpec, SystemClock, TestClock, damping, set_clock, stiffness,
};
pub use crate::color::Color;
pub use crate::error::{UiError, UiResult};
pub use crate::geometry::{Rect, Vec2};
pub use crate::input::InputEvent;
pub use crate::locals::{
    Density, Dp, TextScale, Theme, density, dp_to_px, sp_to_px, text_scale, theme, typography,
    with_density, with_text_scale, with_theme, with_typography,
};
pub use crate::modifier::{Border, Modifier, PaddingValues, SharedElement, SharedKind};
pub use crate::runtime::{
    ComposeGuard, Frame, InputRegion, Painted, Scheduler, SemNode, SharedBounds,
    next_instance_id, remember, remember_state, remember_with_key,
};
pub use crate::semantics::{Role, Semantics};
pub use crate::signal::{Signal, WeakSignal, signal};
pub use crate::state::{Derived, derived_state_of};
pub use crate::typography::{FontWeight, TextStyle, Typography};
pub use crate::view::{Scene, SceneNode, View, ViewId, ViewKind};
pub use taffy::{AlignItems, JustifyContent};
