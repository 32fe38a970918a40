//! # Theming and locals
//!
//! Thread-local "composition locals" carry parameters every widget needs but
//! nobody wants to thread through arguments:
//!
//! - `Theme`: colors for surfaces, text, accents and dividers.
//! - `Density`: dp→px scale factor.
//! - `TextScale`: user font scaling, applied on top of density for text.
//!
//! Override them for a subtree with `with_theme`, `with_density` and
//! `with_text_scale`:
//!
//! ```rust
//! use login_core::*;
//!
//! let brand = Theme {
//!     primary: Color::from_hex("#0095F6"),
//!     ..Theme::default()
//! };
//!
//! let px = with_density(Density { scale: 2.0 }, || {
//!     with_theme(brand, || {
//!         assert_eq!(theme().primary, Color::from_hex("#0095F6"));
//!         dp_to_px(8.0)
//!     })
//! });
//! assert_eq!(px, 16.0);
//! ```

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::Color;

thread_local! {
    static LOCALS_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = RefCell::new(Vec::new());
}

/// density‑independent pixels (dp)
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

/// Font size in sp → px: density and the user's text scale both apply.
pub fn sp_to_px(sp: f32) -> f32 {
    dp_to_px(sp) * text_scale().0
}

fn with_locals_frame<R>(f: impl FnOnce() -> R) -> R {
    // Pops the frame even if `f` unwinds.
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
        let mut st = st.borrow_mut();
        if let Some(top) = st.last_mut() {
            top.insert(t, v);
        } else {
            let mut m = HashMap::new();
            m.insert(t, v);
            st.push(m);
        }
    });
}

fn local<T: Copy + Default + 'static>() -> T {
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

/// Semantic color set read by widgets and layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    /// Window background / app root.
    pub background: Color,
    /// Container surface (text field fill, sheets).
    pub surface: Color,
    /// Default foreground on `surface`/`background`.
    pub on_surface: Color,
    /// Low-emphasis foreground (placeholders, secondary labels).
    pub on_surface_variant: Color,

    /// Accent for buttons, links and icons.
    pub primary: Color,
    /// Darker accent, used for "active" icon tints.
    pub primary_variant: Color,
    /// Foreground on top of `primary`.
    pub on_primary: Color,

    /// Divider and outline color.
    pub outline: Color,
    /// Focus rings and caret.
    pub focus: Color,
    /// Text selection highlight.
    pub selection: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            surface: Color::from_hex("#FAFAFA"),
            on_surface: Color::from_hex("#262626"),
            on_surface_variant: Color::GRAY,
            primary: Color::from_hex("#6200EE"),
            primary_variant: Color::from_hex("#3700B3"),
            on_primary: Color::WHITE,
            outline: Color(0, 0, 0, 31),
            focus: Color::from_hex("#6200EE"),
            selection: Color::from_hex("#6200EE44"),
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
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<Theme>(), Box::new(theme));
        f()
    })
}

pub fn with_density<R>(density: Density, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<Density>(), Box::new(density));
        f()
    })
}

pub fn with_text_scale<R>(ts: TextScale, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<TextScale>(), Box::new(ts));
        f()
    })
}

pub fn theme() -> Theme {
    local::<Theme>()
}

pub fn density() -> Density {
    local::<Density>()
}

pub fn text_scale() -> TextScale {
    local::<TextScale>()
}
