use login_core::*;
use std::ops::Range;
use std::rc::Rc;
use std::time::{Duration, Instant};

use unicode_segmentation::UnicodeSegmentation;

/// Default text size in sp.
pub const TF_FONT_SP: f32 = 16.0;
/// Horizontal inset of the editable line inside the field.
pub const TF_PADDING_X_DP: f32 = 12.0;
/// Masking glyph used by `VisualTransformation::Password`.
pub const MASK_CHAR: char = '•';

pub use login_text::TextMetrics;

pub fn measure_text(text: &str, px: f32) -> TextMetrics {
    login_text::metrics_for_textfield(text, px)
}

/// Boundary index (into `m.positions`) for a byte offset.
pub fn byte_to_char_index(m: &TextMetrics, byte: usize) -> usize {
    match m.byte_offsets.binary_search(&byte) {
        Ok(i) | Err(i) => i,
    }
}

/// Nearest boundary to `x` (content coordinates), as a byte offset.
pub fn index_for_x_bytes(m: &TextMetrics, x: f32) -> usize {
    let mut best_i = 0usize;
    let mut best_d = f32::INFINITY;
    for (i, &p) in m.positions.iter().enumerate() {
        let d = (p - x).abs();
        if d < best_d {
            best_d = d;
            best_i = i;
        }
    }
    m.byte_offsets.get(best_i).copied().unwrap_or(0)
}

fn prev_grapheme_boundary(text: &str, byte: usize) -> usize {
    let mut last = 0usize;
    for (i, _) in text.grapheme_indices(true) {
        if i >= byte {
            break;
        }
        last = i;
    }
    last
}

fn next_grapheme_boundary(text: &str, byte: usize) -> usize {
    for (i, _) in text.grapheme_indices(true) {
        if i > byte {
            return i;
        }
    }
    text.len()
}

/// Text as painted: identical, or one bullet per grapheme.
pub fn display_text(visual: VisualTransformation, text: &str) -> String {
    match visual {
        VisualTransformation::None => text.to_string(),
        VisualTransformation::Password => text.graphemes(true).map(|_| MASK_CHAR).collect(),
    }
}

/// Raw byte offset -> byte offset in `display_text`.
pub fn raw_to_display(visual: VisualTransformation, text: &str, raw: usize) -> usize {
    match visual {
        VisualTransformation::None => raw,
        VisualTransformation::Password => {
            let raw = clamp_to_char_boundary(text, raw);
            text[..raw].graphemes(true).count() * MASK_CHAR.len_utf8()
        }
    }
}

/// Display byte offset -> raw byte offset (snapped to a grapheme boundary).
pub fn display_to_raw(visual: VisualTransformation, text: &str, display: usize) -> usize {
    match visual {
        VisualTransformation::None => display.min(text.len()),
        VisualTransformation::Password => {
            let n = display / MASK_CHAR.len_utf8();
            text.grapheme_indices(true)
                .nth(n)
                .map(|(i, _)| i)
                .unwrap_or(text.len())
        }
    }
}

/// Editing state of one text field, owned by the platform runner and keyed by
/// the field's state key. Offsets are byte indices into `text`.
#[derive(Clone, Debug)]
pub struct TextFieldState {
    pub text: String,
    pub selection: Range<usize>,
    pub composition: Option<Range<usize>>, // IME composition range
    pub scroll_offset: f32,
    pub drag_anchor: Option<usize>,
    pub blink_start: Instant,
    pub inner_width: f32,
    /// Window x of the editable line, refreshed by layout.
    pub inner_x: f32,
    pub font_px: f32,
    pub visual: VisualTransformation,
}

impl Default for TextFieldState {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFieldState {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            selection: 0..0,
            composition: None,
            scroll_offset: 0.0,
            drag_anchor: None,
            blink_start: Instant::now(),
            inner_width: 0.0,
            inner_x: 0.0,
            font_px: TF_FONT_SP,
            visual: VisualTransformation::None,
        }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.len();
        Self {
            text,
            selection: end..end,
            ..Self::new()
        }
    }

    /// Adopts the controlled value when it diverges from the edited text.
    /// Skipped while an IME composition is in flight.
    pub fn sync_value(&mut self, value: &str) -> bool {
        if self.composition.is_some() || self.text == value {
            return false;
        }
        self.text = value.to_string();
        let s = clamp_to_char_boundary(&self.text, self.selection.start);
        let e = clamp_to_char_boundary(&self.text, self.selection.end);
        self.selection = s..e;
        true
    }

    pub fn insert_text(&mut self, text: &str) {
        let start = self.selection.start.min(self.text.len());
        let end = self.selection.end.min(self.text.len());
        let (start, end) = (start.min(end), start.max(end));

        self.text.replace_range(start..end, text);
        let new_pos = start + text.len();
        self.selection = new_pos..new_pos;
        self.reset_caret_blink();
    }

    pub fn delete_backward(&mut self) {
        if self.selection.start == self.selection.end {
            let pos = self.selection.start.min(self.text.len());
            if pos > 0 {
                let prev = prev_grapheme_boundary(&self.text, pos);
                self.text.replace_range(prev..pos, "");
                self.selection = prev..prev;
            }
        } else {
            self.insert_text("");
        }
        self.reset_caret_blink();
    }

    pub fn delete_forward(&mut self) {
        if self.selection.start == self.selection.end {
            let pos = self.selection.start.min(self.text.len());
            if pos < self.text.len() {
                let next = next_grapheme_boundary(&self.text, pos);
                self.text.replace_range(pos..next, "");
            }
        } else {
            self.insert_text("");
        }
        self.reset_caret_blink();
    }

    pub fn move_cursor(&mut self, delta: isize, extend_selection: bool) {
        let mut pos = self.selection.end.min(self.text.len());
        if delta < 0 {
            for _ in 0..delta.unsigned_abs() {
                pos = prev_grapheme_boundary(&self.text, pos);
            }
        } else {
            for _ in 0..delta as usize {
                pos = next_grapheme_boundary(&self.text, pos);
            }
        }
        if extend_selection {
            self.selection.end = pos;
        } else {
            self.selection = pos..pos;
        }
        self.reset_caret_blink();
    }

    pub fn move_to_edge(&mut self, end: bool, extend_selection: bool) {
        let pos = if end { self.text.len() } else { 0 };
        if extend_selection {
            self.selection.end = pos;
        } else {
            self.selection = pos..pos;
        }
        self.reset_caret_blink();
    }

    pub fn select_all(&mut self) {
        self.selection = 0..self.text.len();
        self.reset_caret_blink();
    }

    /// Ordered selection range.
    pub fn selection_range(&self) -> Range<usize> {
        let a = self.selection.start.min(self.text.len());
        let b = self.selection.end.min(self.text.len());
        a.min(b)..a.max(b)
    }

    pub fn selected_text(&self) -> String {
        self.text[self.selection_range()].to_string()
    }

    /// Text the clipboard may receive. Masked fields never expose their
    /// content.
    pub fn copyable_text(&self) -> Option<String> {
        match self.visual {
            VisualTransformation::Password => None,
            VisualTransformation::None => {
                Some(self.selected_text()).filter(|s| !s.is_empty())
            }
        }
    }

    pub fn set_composition(&mut self, text: String, cursor: Option<(usize, usize)>) {
        if text.is_empty() {
            self.cancel_composition();
            return;
        }

        let anchor_start = if let Some(r) = self.composition.take() {
            let mut s = clamp_to_char_boundary(&self.text, r.start);
            let mut e = clamp_to_char_boundary(&self.text, r.end);
            if e < s {
                std::mem::swap(&mut s, &mut e);
            }
            self.text.replace_range(s..e, &text);
            s
        } else {
            let r = self.selection_range();
            self.text.replace_range(r.clone(), &text);
            r.start
        };

        self.composition = Some(anchor_start..(anchor_start + text.len()));

        // IME cursor is in chars of `text`
        if let Some((c0, c1)) = cursor {
            let b0 = char_to_byte(&text, c0);
            let b1 = char_to_byte(&text, c1);
            self.selection = (anchor_start + b0)..(anchor_start + b1);
        } else {
            let end = anchor_start + text.len();
            self.selection = end..end;
        }

        self.reset_caret_blink();
    }

    pub fn commit_composition(&mut self, text: String) {
        if let Some(r) = self.composition.take() {
            let s = clamp_to_char_boundary(&self.text, r.start);
            let e = clamp_to_char_boundary(&self.text, r.end);
            self.text.replace_range(s..e, &text);
            let new_pos = s + text.len();
            self.selection = new_pos..new_pos;
        } else {
            self.insert_text(&text);
        }
        self.reset_caret_blink();
    }

    pub fn cancel_composition(&mut self) {
        if let Some(r) = self.composition.take() {
            let s = clamp_to_char_boundary(&self.text, r.start);
            let e = clamp_to_char_boundary(&self.text, r.end);
            if s <= e {
                self.text.replace_range(s..e, "");
                self.selection = s..s;
            }
        }
        self.reset_caret_blink();
    }

    pub fn begin_drag(&mut self, idx_byte: usize, extend: bool) {
        let idx = idx_byte.min(self.text.len());
        if extend {
            let anchor = self.selection.start;
            self.selection = anchor..idx;
            self.drag_anchor = Some(anchor);
        } else {
            self.selection = idx..idx;
            self.drag_anchor = Some(idx);
        }
        self.reset_caret_blink();
    }

    pub fn drag_to(&mut self, idx_byte: usize) {
        if let Some(anchor) = self.drag_anchor {
            self.selection = anchor..idx_byte.min(self.text.len());
        }
        self.reset_caret_blink();
    }

    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    pub fn caret_index(&self) -> usize {
        self.selection.end
    }

    /// Painted text for the current visual transformation.
    pub fn display_text(&self) -> String {
        display_text(self.visual, &self.text)
    }

    pub fn display_metrics(&self) -> TextMetrics {
        measure_text(&self.display_text(), self.font_px)
    }

    /// Content x (before scrolling) of the boundary at raw byte `idx`.
    pub fn x_for_index(&self, m: &TextMetrics, idx: usize) -> f32 {
        let d = raw_to_display(self.visual, &self.text, idx);
        m.positions
            .get(byte_to_char_index(m, d))
            .copied()
            .unwrap_or(0.0)
    }

    /// Raw byte index nearest to window-space `x`.
    pub fn index_at_window_x(&self, x: f32) -> usize {
        let m = self.display_metrics();
        let content_x = x - self.inner_x + self.scroll_offset;
        let d = index_for_x_bytes(&m, content_x);
        display_to_raw(self.visual, &self.text, d)
    }

    // Keep caret visible inside inner content width
    pub fn ensure_caret_visible(&mut self, caret_x: f32, inner_width: f32) {
        let inset = 2.0;
        let left = self.scroll_offset + inset;
        let right = self.scroll_offset + inner_width - inset;
        if caret_x < left {
            self.scroll_offset = (caret_x - inset).max(0.0);
        } else if caret_x > right {
            self.scroll_offset = (caret_x - inner_width + inset).max(0.0);
        }
    }

    pub fn reset_caret_blink(&mut self) {
        self.blink_start = Instant::now();
    }

    pub fn caret_visible(&self) -> bool {
        const PERIOD: Duration = Duration::from_millis(500);
        (self.blink_start.elapsed().as_millis() / PERIOD.as_millis()) % 2 == 0
    }

    /// Time until the caret flips, for scheduling the next redraw.
    pub fn next_blink_in(&self) -> Duration {
        const PERIOD_MS: u128 = 500;
        let into = self.blink_start.elapsed().as_millis() % PERIOD_MS;
        Duration::from_millis((PERIOD_MS - into) as u64)
    }

    pub fn set_inner_width(&mut self, w: f32) {
        self.inner_width = w.max(0.0);
    }
}

/// Single-line text field controlled by `value`; every edit is reported
/// through `on_change` with the full new text.
pub fn TextField(
    value: impl Into<String>,
    hint: impl Into<String>,
    modifier: Modifier,
    on_change: impl Fn(String) + 'static,
) -> View {
    View::new(
        0,
        ViewKind::TextField {
            state_key: 0,
            value: value.into(),
            hint: hint.into(),
            text_size: TF_FONT_SP,
            text_color: theme().on_surface,
            on_change: Some(Rc::new(on_change)),
            on_submit: None,
            visual: VisualTransformation::None,
            keyboard: KeyboardType::Text,
        },
    )
    .modifier(modifier)
    .semantics(Semantics::new(Role::TextField))
}

pub trait TextFieldExt {
    fn text_size(self, sp: f32) -> View;
    fn visual_transformation(self, visual: VisualTransformation) -> View;
    fn keyboard_type(self, keyboard: KeyboardType) -> View;
    fn on_submit(self, f: impl Fn(String) + 'static) -> View;
    /// Stable key for the editing state, for fields whose tree position moves.
    fn state_key(self, key: ViewId) -> View;
    fn trailing(self, view: View) -> View;
}

impl TextFieldExt for View {
    fn text_size(mut self, sp: f32) -> View {
        if let ViewKind::TextField { text_size, .. } = &mut self.kind {
            *text_size = sp;
        }
        self
    }
    fn visual_transformation(mut self, v: VisualTransformation) -> View {
        if let ViewKind::TextField { visual, .. } = &mut self.kind {
            *visual = v;
        }
        self
    }
    fn keyboard_type(mut self, k: KeyboardType) -> View {
        if let ViewKind::TextField { keyboard, .. } = &mut self.kind {
            *keyboard = k;
        }
        self
    }
    fn on_submit(mut self, f: impl Fn(String) + 'static) -> View {
        if let ViewKind::TextField { on_submit, .. } = &mut self.kind {
            *on_submit = Some(Rc::new(f));
        }
        self
    }
    fn state_key(mut self, key: ViewId) -> View {
        if let ViewKind::TextField { state_key, .. } = &mut self.kind {
            *state_key = key;
        }
        self
    }
    fn trailing(mut self, view: View) -> View {
        if matches!(self.kind, ViewKind::TextField { .. }) {
            self.children = vec![view];
        }
        self
    }
}

fn clamp_to_char_boundary(s: &str, i: usize) -> usize {
    if i >= s.len() {
        return s.len();
    }
    let mut j = i;
    while j > 0 && !s.is_char_boundary(j) {
        j -= 1;
    }
    j
}

fn char_to_byte(s: &str, ci: usize) -> usize {
    s.char_indices().nth(ci).map(|(i, _)| i).unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textfield_insert() {
        let mut state = TextFieldState::new();
        state.insert_text("Hello");
        assert_eq!(state.text, "Hello");
        assert_eq!(state.selection, 5..5);
    }

    #[test]
    fn test_textfield_delete_backward() {
        let mut state = TextFieldState::new();
        state.insert_text("Hello");
        state.delete_backward();
        assert_eq!(state.text, "Hell");
        assert_eq!(state.selection, 4..4);
    }

    #[test]
    fn test_replace_selection() {
        let mut state = TextFieldState::with_text("user@mail.com");
        state.selection = 5..9;
        state.insert_text("example");
        assert_eq!(state.text, "user@example.com");
        assert_eq!(state.selection, 12..12);
    }

    #[test]
    fn test_backwards_selection_deletes_range() {
        let mut state = TextFieldState::with_text("abcdef");
        state.selection = 4..1;
        state.delete_forward();
        assert_eq!(state.text, "aef");
        assert_eq!(state.selection, 1..1);
    }

    #[test]
    fn test_textfield_ime_composition() {
        let mut state = TextFieldState::new();
        state.insert_text("Test ");
        state.set_composition("日本".to_string(), Some((0, 2)));
        assert_eq!(state.text, "Test 日本");
        assert!(state.composition.is_some());
        // composition blocks controlled-value sync
        assert!(!state.sync_value("Test "));

        state.commit_composition("日本語".to_string());
        assert_eq!(state.text, "Test 日本語");
        assert!(state.composition.is_none());
    }

    #[test]
    fn test_cancel_composition_restores_text() {
        let mut state = TextFieldState::with_text("ab");
        state.set_composition("ka".into(), None);
        assert_eq!(state.text, "abka");
        state.set_composition(String::new(), None);
        assert_eq!(state.text, "ab");
        assert_eq!(state.selection, 2..2);
    }

    #[test]
    fn test_textfield_cursor_movement() {
        let mut state = TextFieldState::new();
        state.insert_text("Hello");
        state.move_cursor(-2, false);
        assert_eq!(state.selection, 3..3);

        state.move_cursor(1, true);
        assert_eq!(state.selection, 3..4);

        state.move_to_edge(false, false);
        assert_eq!(state.selection, 0..0);
    }

    #[test]
    fn test_grapheme_delete_and_move() {
        let mut st = TextFieldState::new();
        st.insert_text("A👍🏽B");
        st.move_cursor(-1, false);
        assert_eq!(st.selection.end, "A👍🏽".len());
        st.delete_backward();
        assert_eq!(st.text, "AB");
        assert_eq!(st.selection, "A".len().."A".len());
    }

    #[test]
    fn test_sync_value_clamps_selection() {
        let mut st = TextFieldState::with_text("hello@site.com");
        assert!(st.sync_value("hi"));
        assert_eq!(st.text, "hi");
        assert_eq!(st.selection, 2..2);
        assert!(!st.sync_value("hi"));
    }

    #[test]
    fn test_password_mask_is_per_grapheme() {
        assert_eq!(
            display_text(VisualTransformation::Password, "a👍🏽c"),
            "•••"
        );
        assert_eq!(display_text(VisualTransformation::None, "abc"), "abc");
    }

    #[test]
    fn test_masked_offsets_round_trip_on_boundaries() {
        let raw = "x👍🏽y";
        let v = VisualTransformation::Password;
        let after_emoji = "x👍🏽".len();
        let d = raw_to_display(v, raw, after_emoji);
        assert_eq!(d, 2 * MASK_CHAR.len_utf8());
        assert_eq!(display_to_raw(v, raw, d), after_emoji);
        assert_eq!(display_to_raw(v, raw, 99), raw.len());
    }

    #[test]
    fn test_password_never_copies() {
        let mut st = TextFieldState::with_text("secret");
        st.select_all();
        assert_eq!(st.copyable_text().as_deref(), Some("secret"));
        st.visual = VisualTransformation::Password;
        assert_eq!(st.copyable_text(), None);
    }

    #[test]
    fn test_caret_scrolls_into_view() {
        let mut st = TextFieldState::new();
        st.ensure_caret_visible(150.0, 100.0);
        assert_eq!(st.scroll_offset, 52.0);
        st.ensure_caret_visible(10.0, 100.0);
        assert_eq!(st.scroll_offset, 8.0);
    }

    #[test]
    fn test_index_for_x_picks_nearest_boundary() {
        let m = TextMetrics {
            positions: vec![0.0, 10.0, 20.0],
            byte_offsets: vec![0, 1, 2],
        };
        assert_eq!(index_for_x_bytes(&m, 4.0), 0);
        assert_eq!(index_for_x_bytes(&m, 6.0), 1);
        assert_eq!(index_for_x_bytes(&m, 500.0), 2);
    }
}
