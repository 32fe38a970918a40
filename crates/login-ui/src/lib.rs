#![allow(non_snake_case)]
//! Widgets, layout and text fields.
//!
//! Widgets are plain constructor functions returning a `View`; styling that
//! only applies to one kind lives on extension traits (`TextStyle`,
//! `ButtonExt`, `TextFieldExt`).
//!
//! ```rust
//! use login_core::*;
//! use login_ui::*;
//!
//! let form = Column(Modifier::new().fill_max_width().padding(16.0)).child((
//!     Text("Sign in").size(18.0).weight(FontWeight::BOLD),
//!     Spacer(Modifier::new().height(8.0)),
//!     Button("Continue", || log::info!("continue")).enabled(false),
//! ));
//! assert_eq!(form.children.len(), 3);
//! ```

pub mod icons;
pub mod layout;
pub mod textfield;

use std::collections::HashSet;
use std::rc::Rc;

use login_core::*;

pub use icons::{Icon, paint_icon};
pub use layout::layout_and_paint;
pub use textfield::{TextField, TextFieldExt, TextFieldState};

/// Pointer state the runner feeds back into painting.
#[derive(Default)]
pub struct Interactions {
    pub hover: Option<u64>,
    pub pressed: HashSet<u64>,
}

pub fn Surface(modifier: Modifier, child: View) -> View {
    let modifier = if modifier.background.is_none() {
        modifier.background(theme().background)
    } else {
        modifier
    };
    let mut v = View::new(0, ViewKind::Surface).modifier(modifier);
    v.children = vec![child];
    v
}

pub fn Box(modifier: Modifier) -> View {
    View::new(0, ViewKind::Box).modifier(modifier)
}

pub fn Row(modifier: Modifier) -> View {
    View::new(0, ViewKind::Row).modifier(modifier)
}

pub fn Column(modifier: Modifier) -> View {
    View::new(0, ViewKind::Column).modifier(modifier)
}

/// Empty gap. Size it, or give it `weight` to take the leftover space.
pub fn Spacer(modifier: Modifier) -> View {
    Box(modifier)
}

pub fn Text(text: impl Into<String>) -> View {
    View::new(
        0,
        ViewKind::Text {
            text: text.into(),
            color: theme().on_surface,
            font_size: 14.0, // sp
            weight: FontWeight::NORMAL,
        },
    )
}

/// Filled button with a text label.
pub fn Button(text: impl Into<String>, on_click: impl Fn() + 'static) -> View {
    let th = theme();
    View::new(
        0,
        ViewKind::Button {
            text: text.into(),
            on_click: Some(Rc::new(on_click)),
            enabled: true,
            colors: ButtonColors {
                container: th.primary,
                content: th.on_primary,
                disabled_container: th.on_surface.copy_alpha(0.12),
                disabled_content: th.on_surface.copy_alpha(0.38),
            },
            font_size: 14.0,
        },
    )
    .semantics(Semantics::new(Role::Button))
}

/// Hairline separator; horizontal by default, give it `weight` inside a row.
pub fn Divider(modifier: Modifier) -> View {
    Box(modifier
        .height(1.0)
        .background(theme().on_surface.copy_alpha(0.12)))
}

/// 48dp touch target centering `icon`.
pub fn IconButton(icon: View, on_click: impl Fn() + 'static) -> View {
    let label = icon
        .semantics
        .as_ref()
        .and_then(|s| s.label.clone())
        .unwrap_or_default();
    Box(Modifier::new()
        .size(48.0, 48.0)
        .justify_content(JustifyContent::Center)
        .align_items(AlignItems::Center)
        .on_click(on_click)
        .semantics(Semantics::new(Role::Button).label(label)))
    .child(icon)
}

pub trait TextStyle {
    fn color(self, c: Color) -> View;
    /// Font size in sp.
    fn size(self, sp: f32) -> View;
    fn weight(self, w: FontWeight) -> View;
}

impl TextStyle for View {
    fn color(mut self, c: Color) -> View {
        if let ViewKind::Text { color, .. } = &mut self.kind {
            *color = c;
        }
        self
    }
    fn size(mut self, sp: f32) -> View {
        if let ViewKind::Text { font_size, .. } = &mut self.kind {
            *font_size = sp;
        }
        self
    }
    fn weight(mut self, w: FontWeight) -> View {
        if let ViewKind::Text { weight, .. } = &mut self.kind {
            *weight = w;
        }
        self
    }
}

pub trait ButtonExt {
    fn enabled(self, enabled: bool) -> View;
    fn colors(self, colors: ButtonColors) -> View;
    fn label_size(self, sp: f32) -> View;
}

impl ButtonExt for View {
    fn enabled(mut self, on: bool) -> View {
        if let ViewKind::Button { enabled, .. } = &mut self.kind {
            *enabled = on;
        }
        if let Some(s) = &mut self.semantics {
            s.enabled = on;
        }
        self
    }
    fn colors(mut self, c: ButtonColors) -> View {
        if let ViewKind::Button { colors, .. } = &mut self.kind {
            *colors = c;
        }
        self
    }
    fn label_size(mut self, sp: f32) -> View {
        if let ViewKind::Button { font_size, .. } = &mut self.kind {
            *font_size = sp;
        }
        self
    }
}

/// Extension trait for child building
pub trait ViewExt: Sized {
    fn child(self, children: impl IntoChildren) -> Self;
}

impl ViewExt for View {
    fn child(self, children: impl IntoChildren) -> Self {
        self.with_children(children.into_children())
    }
}

pub trait IntoChildren {
    fn into_children(self) -> Vec<View>;
}

impl IntoChildren for View {
    fn into_children(self) -> Vec<View> {
        vec![self]
    }
}

impl IntoChildren for Vec<View> {
    fn into_children(self) -> Vec<View> {
        self
    }
}

impl IntoChildren for Option<View> {
    fn into_children(self) -> Vec<View> {
        self.into_iter().collect()
    }
}

impl<const N: usize> IntoChildren for [View; N] {
    fn into_children(self) -> Vec<View> {
        self.into()
    }
}

macro_rules! impl_into_children_tuple {
    ($($idx:tt $t:ident),+) => {
        impl<$($t: IntoChildren),+> IntoChildren for ($($t,)+) {
            fn into_children(self) -> Vec<View> {
                let mut v = Vec::new();
                $(v.extend(self.$idx.into_children());)+
                v
            }
        }
    };
}

impl_into_children_tuple!(0 A, 1 B);
impl_into_children_tuple!(0 A, 1 B, 2 C);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widgets_read_theme_at_construction() {
        let brand = Theme {
            primary: Color::from_hex("#0095F6"),
            on_surface: Color::BLACK,
            ..Theme::default()
        };
        let (b, t) = with_theme(brand, || (Button("Log in", || {}), Text("hi")));
        let ViewKind::Button { colors, .. } = b.kind else {
            panic!("not a button");
        };
        assert_eq!(colors.container, brand.primary);
        let ViewKind::Text { color, .. } = t.kind else {
            panic!("not text");
        };
        assert_eq!(color, Color::BLACK);
    }

    #[test]
    fn enabled_updates_kind_and_semantics() {
        let b = Button("Log in", || {}).enabled(false);
        assert!(matches!(b.kind, ViewKind::Button { enabled: false, .. }));
        assert!(!b.semantics.unwrap().enabled);
    }

    #[test]
    fn icon_button_takes_icon_label() {
        let ib = IconButton(
            Icon(IconKind::VisibilityOff, "Hidden", Color::GRAY, Modifier::new()),
            || {},
        );
        let sem = ib.modifier.semantics.clone().unwrap();
        assert_eq!(sem.role, Role::Button);
        assert_eq!(sem.label.as_deref(), Some("Hidden"));
        assert!(ib.modifier.on_click.is_some());
    }

    #[test]
    fn icon_without_description_is_decorative() {
        let icon = Icon(IconKind::Facebook, "", Color::BLACK, Modifier::new());
        assert!(icon.semantics.is_none());
        let ib = IconButton(icon, || {});
        assert_eq!(ib.modifier.semantics.unwrap().label.as_deref(), Some(""));
    }

    #[test]
    fn spacer_keeps_its_modifier() {
        let fixed = Spacer(Modifier::new().height(16.0));
        assert_eq!(fixed.modifier.height, Some(16.0));
        assert_eq!(fixed.modifier.flex_grow, None);
        assert_eq!(Spacer(Modifier::new().weight(1.0)).modifier.flex_grow, Some(1.0));
    }

    #[test]
    fn style_ext_ignores_other_kinds() {
        let b = Box(Modifier::new()).color(Color::WHITE).enabled(false);
        assert!(matches!(b.kind, ViewKind::Box));
        assert!(b.semantics.is_none());
    }

    #[test]
    fn optional_children_are_skipped() {
        let col = Column(Modifier::new()).child((Text("a"), None::<View>, Some(Text("b"))));
        assert_eq!(col.children.len(), 2);
    }
}
