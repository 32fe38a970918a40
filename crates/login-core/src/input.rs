/// Keyboard modifier state as last reported by the platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool, // Cmd on Mac, Win key on Windows
}

impl Modifiers {
    /// True when a shortcut modifier is held, i.e. key text should not be
    /// inserted into a text field.
    pub fn is_shortcut(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Soft keyboard / IME hint a text field asks the platform for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyboardType {
    #[default]
    Text,
    Email,
    Password,
}
