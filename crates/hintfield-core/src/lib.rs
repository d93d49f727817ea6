//! # State, derived state, and remembered slots
//!
//! Hintfield widgets are plain functions that return a `View` every frame.
//! State that must outlive a single frame lives in three places:
//!
//! - `Signal<T>`: observable, reactive value.
//! - `derived_state_of`: a read-only signal recomputed from other signals.
//! - `remember*`: composition-bound storage that survives between frames
//!   and is dropped when the call site stops being composed.
//!
//! ## Signals
//!
//! ```rust
//! use hintfield_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! Reads inside a derived computation are tracked; later writes recompute
//! the derived value synchronously:
//!
//! ```rust
//! use hintfield_core::*;
//!
//! let text = signal(String::new());
//! let focused = signal(false);
//! let above = derived_state_of({
//!     let (text, focused) = (text.clone(), focused.clone());
//!     move || focused.get() || !text.get().is_empty()
//! });
//!
//! assert!(!above.get());
//! text.set("a".into());
//! assert!(above.get());
//! ```
//!
//! ## Remembered state
//!
//! - `remember` is order-based: the Nth call in a frame always refers to the
//!   Nth stored value.
//! - `remember_with_key` is key-based and stable across conditional branches.
//!
//! Slots that are not reached during a frame are treated as unmounted and
//! dropped when the frame's `ComposeGuard` goes out of scope.

pub mod animation;
pub mod color;
pub mod error;
pub mod geometry;
pub mod input;
pub mod locals;
pub mod modifier;
pub mod prelude;
pub mod reactive;
pub mod runtime;
pub mod semantics;
pub mod signal;
pub mod state;
pub mod typography;
pub mod view;

pub use color::*;
pub use error::*;
pub use geometry::*;
pub use locals::*;
pub use modifier::*;
pub use prelude::*;
pub use runtime::*;
pub use semantics::*;
pub use signal::*;
pub use typography::*;
pub use view::*;
