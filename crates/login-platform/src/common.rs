//! Platform-independent pieces of input routing.

/// Focus target after Tab (or Shift+Tab when `backwards`), wrapping around.
/// An id missing from the chain restarts at the first (or last) entry.
pub(crate) fn next_focus(chain: &[u64], current: Option<u64>, backwards: bool) -> Option<u64> {
    if chain.is_empty() {
        return None;
    }
    let n = chain.len();
    let idx = match current.and_then(|c| chain.iter().position(|&id| id == c)) {
        Some(i) if backwards => (i + n - 1) % n,
        Some(i) => (i + 1) % n,
        None if backwards => n - 1,
        None => 0,
    };
    Some(chain[idx])
}

/// Strips control characters and line breaks; fields are single-line.
pub(crate) fn printable(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}

#[cfg(any(feature = "desktop", feature = "android"))]
pub(crate) fn ime_purpose(keyboard: login_core::KeyboardType) -> winit::window::ImePurpose {
    use login_core::KeyboardType;
    use winit::window::ImePurpose;
    match keyboard {
        KeyboardType::Password => ImePurpose::Password,
        KeyboardType::Email | KeyboardType::Text => ImePurpose::Normal,
    }
}

/// System clipboard with an in-process fallback when none is available.
pub(crate) struct Clipboard {
    #[cfg(feature = "desktop")]
    system: Option<arboard::Clipboard>,
    local: String,
}

impl Clipboard {
    pub(crate) fn new() -> Self {
        Self {
            #[cfg(feature = "desktop")]
            system: arboard::Clipboard::new()
                .map_err(|e| log::warn!("system clipboard unavailable: {e}"))
                .ok(),
            local: String::new(),
        }
    }

    pub(crate) fn set(&mut self, text: String) {
        #[cfg(feature = "desktop")]
        if let Some(cb) = self.system.as_mut() {
            if let Err(e) = cb.set_text(text.clone()) {
                log::warn!("clipboard write failed: {e}");
            }
        }
        self.local = text;
    }

    pub(crate) fn get(&mut self) -> String {
        #[cfg(feature = "desktop")]
        if let Some(cb) = self.system.as_mut() {
            match cb.get_text() {
                Ok(t) => return t,
                Err(e) => log::debug!("clipboard read failed: {e}"),
            }
        }
        self.local.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_cycles_through_chain() {
        let chain = [3, 7, 9];
        assert_eq!(next_focus(&chain, None, false), Some(3));
        assert_eq!(next_focus(&chain, Some(3), false), Some(7));
        assert_eq!(next_focus(&chain, Some(9), false), Some(3));
    }

    #[test]
    fn shift_tab_goes_backwards() {
        let chain = [3, 7, 9];
        assert_eq!(next_focus(&chain, None, true), Some(9));
        assert_eq!(next_focus(&chain, Some(3), true), Some(9));
        assert_eq!(next_focus(&chain, Some(9), true), Some(7));
    }

    #[test]
    fn stale_focus_restarts_and_empty_chain_has_none() {
        assert_eq!(next_focus(&[1, 2], Some(42), false), Some(1));
        assert_eq!(next_focus(&[], Some(1), false), None);
    }

    #[test]
    fn printable_drops_newlines_and_controls() {
        assert_eq!(printable("a\tb\r\nc\u{7f}"), "abc");
        assert_eq!(printable("é✓"), "é✓");
    }

    #[cfg(any(feature = "desktop", feature = "android"))]
    #[test]
    fn password_fields_request_password_ime() {
        use login_core::KeyboardType;
        use winit::window::ImePurpose;
        assert_eq!(ime_purpose(KeyboardType::Password), ImePurpose::Password);
        assert_eq!(ime_purpose(KeyboardType::Email), ImePurpose::Normal);
    }

    #[cfg(not(feature = "desktop"))]
    #[test]
    fn local_clipboard_round_trips() {
        let mut cb = Clipboard::new();
        assert_eq!(cb.get(), "");
        cb.set("hello".into());
        assert_eq!(cb.get(), "hello");
    }
}
