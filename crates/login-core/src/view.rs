use crate::{Color, KeyboardType, Modifier, Rect};
use std::rc::Rc;

pub type ViewId = u64;

pub type Callback = Rc<dyn Fn()>;
pub type TextCallback = Rc<dyn Fn(String)>;

/// CSS-style font weight (100..=900).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const SEMIBOLD: FontWeight = FontWeight(600);
    pub const BOLD: FontWeight = FontWeight(700);
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Display-only rewrite of a text field's content. Editing always works on
/// the raw text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VisualTransformation {
    #[default]
    None,
    /// Every grapheme is painted as a bullet.
    Password,
}

/// Vector icons the painter knows how to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconKind {
    Visibility,
    VisibilityOff,
    Facebook,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButtonColors {
    pub container: Color,
    pub content: Color,
    pub disabled_container: Color,
    pub disabled_content: Color,
}

impl ButtonColors {
    pub fn resolve(&self, enabled: bool) -> (Color, Color) {
        if enabled {
            (self.container, self.content)
        } else {
            (self.disabled_container, self.disabled_content)
        }
    }
}

#[derive(Clone)]
pub enum ViewKind {
    Surface,
    Box,
    Row,
    Column,
    Text {
        text: String,
        color: Color,
        /// sp
        font_size: f32,
        weight: FontWeight,
    },
    Button {
        text: String,
        on_click: Option<Callback>,
        enabled: bool,
        colors: ButtonColors,
        font_size: f32,
    },
    /// Single-line editable text. Children, if any, are laid out as the
    /// trailing slot at the end of the field.
    TextField {
        state_key: ViewId,
        /// Controlled value; the editing state follows it between edits.
        value: String,
        hint: String,
        text_size: f32,
        text_color: Color,
        on_change: Option<TextCallback>,
        on_submit: Option<TextCallback>,
        visual: VisualTransformation,
        keyboard: KeyboardType,
    },
    Icon {
        icon: IconKind,
        tint: Color,
    },
}

impl std::fmt::Debug for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::Surface => write!(f, "Surface"),
            ViewKind::Box => write!(f, "Box"),
            ViewKind::Row => write!(f, "Row"),
            ViewKind::Column => write!(f, "Column"),
            ViewKind::Text {
                text,
                color,
                font_size,
                weight,
            } => f
                .debug_struct("Text")
                .field("text", text)
                .field("color", color)
                .field("font_size", font_size)
                .field("weight", weight)
                .finish(),
            ViewKind::Button { text, enabled, .. } => f
                .debug_struct("Button")
                .field("text", text)
                .field("enabled", enabled)
                .field("on_click", &"<callback>")
                .finish(),
            ViewKind::TextField {
                state_key,
                hint,
                visual,
                keyboard,
                ..
            } => f
                .debug_struct("TextField")
                .field("state_key", state_key)
                .field("hint", hint)
                .field("visual", visual)
                .field("keyboard", keyboard)
                .finish(),
            ViewKind::Icon { icon, tint } => f
                .debug_struct("Icon")
                .field("icon", icon)
                .field("tint", tint)
                .finish(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct View {
    pub id: ViewId,
    pub kind: ViewKind,
    pub modifier: Modifier,
    pub children: Vec<View>,
    pub semantics: Option<crate::semantics::Semantics>,
}

impl View {
    pub fn new(id: ViewId, kind: ViewKind) -> Self {
        View {
            id,
            kind,
            modifier: Modifier::default(),
            children: vec![],
            semantics: None,
        }
    }
    pub fn modifier(mut self, m: Modifier) -> Self {
        self.modifier = m;
        self
    }
    pub fn with_children(mut self, kids: Vec<View>) -> Self {
        self.children = kids;
        self
    }
    pub fn semantics(mut self, s: crate::semantics::Semantics) -> Self {
        self.semantics = Some(s);
        self
    }
}

/// Renderable scene
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub clear_color: Color,
    pub nodes: Vec<SceneNode>,
}

#[derive(Clone, Debug)]
pub enum SceneNode {
    Rect {
        rect: Rect,
        color: Color,
        radius: f32,
    },
    /// Rounded bar rotated by `angle` radians around its own center.
    Bar {
        rect: Rect,
        color: Color,
        angle: f32,
    },
    Border {
        rect: Rect,
        color: Color,
        width: f32,
        radius: f32,
    },
    Text {
        rect: Rect,
        text: String,
        color: Color,
        size: f32,
        weight: FontWeight,
    },
    PushClip {
        rect: Rect,
        radius: f32,
    },
    PopClip,
}
