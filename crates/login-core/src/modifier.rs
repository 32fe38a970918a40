use std::rc::Rc;

use taffy::{AlignItems, AlignSelf, JustifyContent};

use crate::{Color, Size};

#[derive(Clone, Debug)]
pub struct Border {
    pub width: f32,
    pub color: Color,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PaddingValues {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PositionType {
    Relative,
    Absolute,
}

/// Layout, drawing and interaction parameters of a view. All lengths are dp.
#[derive(Clone, Default)]
pub struct Modifier {
    pub size: Option<Size>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub fill_max: bool,
    pub fill_max_w: bool,
    pub fill_max_h: bool,
    pub padding: Option<f32>,
    pub padding_values: Option<PaddingValues>,
    pub background: Option<Color>,
    pub border: Option<Border>,
    pub flex_grow: Option<f32>,
    pub align_self: Option<AlignSelf>,
    pub justify_content: Option<JustifyContent>,
    pub align_items_container: Option<AlignItems>,
    pub clip_rounded: Option<f32>,
    /// Works for hit-testing only, draw order is not changed.
    pub z_index: f32,
    pub on_click: Option<Rc<dyn Fn()>>,
    pub semantics: Option<crate::Semantics>,
    pub alpha: Option<f32>,
    pub position_type: Option<PositionType>,
    pub offset_left: Option<f32>,
    pub offset_right: Option<f32>,
    pub offset_top: Option<f32>,
    pub offset_bottom: Option<f32>,
}

impl std::fmt::Debug for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Modifier")
            .field("size", &self.size)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("fill_max", &self.fill_max)
            .field("fill_max_w", &self.fill_max_w)
            .field("fill_max_h", &self.fill_max_h)
            .field("padding", &self.padding)
            .field("padding_values", &self.padding_values)
            .field("background", &self.background)
            .field("border", &self.border)
            .field("flex_grow", &self.flex_grow)
            .field("align_self", &self.align_self)
            .field("justify_content", &self.justify_content)
            .field("align_items_container", &self.align_items_container)
            .field("clip_rounded", &self.clip_rounded)
            .field("z_index", &self.z_index)
            .field("on_click", &self.on_click.as_ref().map(|_| "..."))
            .field("semantics", &self.semantics)
            .field("alpha", &self.alpha)
            .field("position_type", &self.position_type)
            .finish()
    }
}

impl Modifier {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn size(mut self, w: f32, h: f32) -> Self {
        self.size = Some(Size {
            width: w,
            height: h,
        });
        self
    }
    pub fn width(mut self, w: f32) -> Self {
        self.width = Some(w);
        self
    }
    pub fn height(mut self, h: f32) -> Self {
        self.height = Some(h);
        self
    }
    pub fn fill_max_size(mut self) -> Self {
        self.fill_max = true;
        self
    }
    pub fn fill_max_width(mut self) -> Self {
        self.fill_max_w = true;
        self
    }
    pub fn fill_max_height(mut self) -> Self {
        self.fill_max_h = true;
        self
    }
    pub fn padding(mut self, v: f32) -> Self {
        self.padding = Some(v);
        self
    }
    pub fn padding_values(mut self, padding: PaddingValues) -> Self {
        self.padding_values = Some(padding);
        self
    }

    fn edit_padding(mut self, f: impl FnOnce(&mut PaddingValues)) -> Self {
        let base = self.padding.take().unwrap_or(0.0);
        let mut pv = self.padding_values.unwrap_or(PaddingValues {
            left: base,
            right: base,
            top: base,
            bottom: base,
        });
        f(&mut pv);
        self.padding_values = Some(pv);
        self
    }
    pub fn padding_horizontal(self, v: f32) -> Self {
        self.edit_padding(|p| {
            p.left = v;
            p.right = v;
        })
    }
    pub fn padding_vertical(self, v: f32) -> Self {
        self.edit_padding(|p| {
            p.top = v;
            p.bottom = v;
        })
    }
    pub fn padding_top(self, v: f32) -> Self {
        self.edit_padding(|p| p.top = v)
    }
    /// Leading edge; layout is left-to-right only.
    pub fn padding_start(self, v: f32) -> Self {
        self.edit_padding(|p| p.left = v)
    }
    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }
    pub fn border(mut self, width: f32, color: Color, radius: f32) -> Self {
        self.border = Some(Border {
            width,
            color,
            radius,
        });
        self
    }
    /// Share of the leftover main-axis space, like `flex-grow`.
    pub fn weight(mut self, w: f32) -> Self {
        self.flex_grow = Some(w);
        self
    }
    pub fn align_self(mut self, a: AlignSelf) -> Self {
        self.align_self = Some(a);
        self
    }
    pub fn align_self_center(mut self) -> Self {
        self.align_self = Some(AlignSelf::Center);
        self
    }
    pub fn justify_content(mut self, j: JustifyContent) -> Self {
        self.justify_content = Some(j);
        self
    }
    pub fn align_items(mut self, a: AlignItems) -> Self {
        self.align_items_container = Some(a);
        self
    }
    pub fn clip_rounded(mut self, radius: f32) -> Self {
        self.clip_rounded = Some(radius);
        self
    }
    pub fn z_index(mut self, z: f32) -> Self {
        self.z_index = z;
        self
    }
    pub fn on_click(mut self, f: impl Fn() + 'static) -> Self {
        self.on_click = Some(Rc::new(f));
        self
    }
    pub fn semantics(mut self, s: crate::Semantics) -> Self {
        self.semantics = Some(s);
        self
    }
    pub fn alpha(mut self, a: f32) -> Self {
        self.alpha = Some(a);
        self
    }
    pub fn absolute(mut self) -> Self {
        self.position_type = Some(PositionType::Absolute);
        self
    }
    pub fn offset(
        mut self,
        left: Option<f32>,
        top: Option<f32>,
        right: Option<f32>,
        bottom: Option<f32>,
    ) -> Self {
        self.offset_left = left;
        self.offset_top = top;
        self.offset_right = right;
        self.offset_bottom = bottom;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_padding_starts_from_uniform_padding() {
        let m = Modifier::new().padding(24.0).padding_top(8.0);
        assert_eq!(m.padding, None);
        assert_eq!(
            m.padding_values,
            Some(PaddingValues {
                left: 24.0,
                right: 24.0,
                top: 8.0,
                bottom: 24.0,
            })
        );
    }

    #[test]
    fn horizontal_padding_leaves_vertical_untouched() {
        let m = Modifier::new().padding_horizontal(16.0);
        let pv = m.padding_values.unwrap();
        assert_eq!((pv.left, pv.right, pv.top, pv.bottom), (16.0, 16.0, 0.0, 0.0));
    }
}
