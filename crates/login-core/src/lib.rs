//! # Views, state and composition slots
//!
//! A screen is a plain function `fn(&mut Scheduler) -> View` that is called
//! again on every frame. Nothing in the returned tree is retained; anything
//! that must outlive a single composition goes into a `remember*` slot.
//!
//! - `Signal<T>`: cloneable handle to an observable value.
//! - `remember` / `remember_with_key`: composition-bound storage.
//! - `Modifier`: layout, drawing and interaction parameters of a view.
//!
//! ## Signals
//!
//! ```rust
//! use login_core::*;
//!
//! let enabled = signal(false);
//! enabled.set(true);
//! enabled.update(|v| *v = !*v);
//! assert!(!enabled.get());
//! ```
//!
//! ## Remembered state
//!
//! `remember` is order-based: the Nth call during a composition always
//! returns the Nth stored value, so calls must not be made conditionally.
//! Use `remember_with_key` where a slot sits behind a branch.
//!
//! ```rust
//! use login_core::*;
//!
//! fn counter(_s: &mut Scheduler) -> View {
//!     let taps = remember(|| signal(0u32));
//!     let _ = taps.get();
//!     View::new(0, ViewKind::Box)
//! }
//! ```
//!
//! ## Composition locals
//!
//! Theme, density and text scale are read through `theme()`, `density()` and
//! `text_scale()` and can be overridden for a subtree with the matching
//! `with_*` helper. See [`locals`].

pub mod color;
pub mod error;
pub mod geometry;
pub mod input;
pub mod locals;
pub mod modifier;
pub mod prelude;
pub mod render_api;
pub mod runtime;
pub mod semantics;
pub mod signal;
pub mod tests;
pub mod view;

pub use color::*;
pub use error::*;
pub use geometry::*;
pub use input::*;
pub use locals::*;
pub use modifier::*;
pub use prelude::*;
pub use render_api::*;
pub use runtime::*;
pub use semantics::*;
pub use signal::*;
pub use view::*;
