pub use crate::color::Color;
pub use crate::error::*;
pub use crate::geometry::{Rect, Size, Vec2};
pub use crate::input::*;
pub use crate::locals::{
    Density, Dp, TextScale, Theme, density, dp_to_px, sp_to_px, text_scale, theme, with_density,
    with_text_scale, with_theme,
};
pub use crate::modifier::{Modifier, PaddingValues};
pub use crate::render_api::RenderBackend;
pub use crate::runtime::{
    ComposeGuard, Frame, HitRegion, Scheduler, SemNode, remember, remember_state,
    remember_with_key,
};
pub use crate::semantics::{Role, Semantics};
pub use crate::signal::{Signal, signal};
pub use crate::view::{
    ButtonColors, FontWeight, IconKind, Scene, SceneNode, View, ViewId, ViewKind,
    VisualTransformation,
};
pub use taffy::{AlignItems, AlignSelf, JustifyContent};
