//! The winit application shared by the desktop and Android entry points.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use login_core::*;
use login_render_wgpu::WgpuBackend;
use login_ui::{Interactions, TextFieldState, layout_and_paint};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{
    ElementState, Ime, KeyEvent, MouseButton, StartCause, Touch, TouchPhase, WindowEvent,
};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::common::{self, Clipboard};
use crate::config::RunConfig;

pub(crate) type RootFn = Box<dyn FnMut(&mut Scheduler) -> View>;

pub(crate) struct Runner {
    root: RootFn,
    config: RunConfig,
    window: Option<Arc<Window>>,
    backend: Option<WgpuBackend>,
    sched: Scheduler,
    frame_cache: Option<Frame>,

    cursor: Vec2,
    modifiers: Modifiers,
    capture_id: Option<u64>,
    hover_id: Option<u64>,
    pressed_ids: HashSet<u64>,
    // Space/Enter held on a focused button
    key_pressed_active: Option<u64>,
    // first finger down; the rest are ignored
    touch_id: Option<u64>,

    textfield_states: HashMap<u64, Rc<RefCell<TextFieldState>>>,
    ime_preedit: bool,
    ime_area: Option<Rect>,
    clipboard: Clipboard,
}

impl Runner {
    pub(crate) fn new(root: RootFn, config: RunConfig) -> Self {
        Self {
            root,
            config,
            window: None,
            backend: None,
            sched: Scheduler::new(),
            frame_cache: None,
            cursor: Vec2::default(),
            modifiers: Modifiers::default(),
            capture_id: None,
            hover_id: None,
            pressed_ids: HashSet::new(),
            key_pressed_active: None,
            touch_id: None,
            textfield_states: HashMap::new(),
            ime_preedit: false,
            ime_area: None,
            clipboard: Clipboard::new(),
        }
    }

    fn request_redraw(&self) {
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn hit(&self, id: u64) -> Option<&HitRegion> {
        self.frame_cache
            .as_ref()?
            .hit_regions
            .iter()
            .find(|h| h.id == id)
    }

    fn field_state(&self, id: u64) -> Option<Rc<RefCell<TextFieldState>>> {
        let key = self.hit(id)?.tf_state_key?;
        self.textfield_states.get(&key).cloned()
    }

    fn focused_field(&self) -> Option<(u64, Rc<RefCell<TextFieldState>>)> {
        let id = self.sched.focused?;
        Some((id, self.field_state(id)?))
    }

    fn notify_text_change(&self, id: u64, text: String) {
        if let Some(cb) = self.hit(id).and_then(|h| h.on_text_change.clone()) {
            cb(text);
        }
    }

    fn set_focus(&mut self, id: Option<u64>) {
        if self.sched.focused == id {
            return;
        }
        // leaving a field drops its unfinished composition
        if let Some((fid, st)) = self.focused_field() {
            let cancelled = {
                let mut st = st.borrow_mut();
                st.end_drag();
                st.composition.is_some().then(|| {
                    st.cancel_composition();
                    st.text.clone()
                })
            };
            if let Some(text) = cancelled {
                self.notify_text_change(fid, text);
            }
        }
        self.ime_preedit = false;
        self.ime_area = None;
        self.sched.focused = id;

        let field = id
            .and_then(|id| self.hit(id))
            .and_then(|h| Some((h.tf_state_key?, h.keyboard)));
        match field {
            Some((key, keyboard)) => {
                self.textfield_states
                    .entry(key)
                    .or_insert_with(|| Rc::new(RefCell::new(TextFieldState::new())))
                    .borrow_mut()
                    .reset_caret_blink();
                if let Some(win) = &self.window {
                    win.set_ime_allowed(true);
                    win.set_ime_purpose(common::ime_purpose(keyboard));
                }
            }
            None => {
                if let Some(win) = &self.window {
                    win.set_ime_allowed(false);
                }
            }
        }
        log::debug!("focus -> {id:?}");
        self.request_redraw();
    }

    fn focus_step(&mut self, backwards: bool) {
        if let Some(active) = self.key_pressed_active.take() {
            self.pressed_ids.remove(&active);
        }
        let Some(frame) = &self.frame_cache else {
            return;
        };
        let next = common::next_focus(&frame.focus_chain, self.sched.focused, backwards);
        self.set_focus(next);
    }

    /// Runs `f` on the focused text field and reports the full new text if it
    /// changed.
    fn edit_focused(&mut self, f: impl FnOnce(&mut TextFieldState)) {
        let Some((id, st)) = self.focused_field() else {
            return;
        };
        let changed = {
            let mut st = st.borrow_mut();
            let before = st.text.clone();
            f(&mut st);
            st.reset_caret_blink();
            (st.text != before).then(|| st.text.clone())
        };
        if let Some(text) = changed {
            self.notify_text_change(id, text);
        }
        self.request_redraw();
    }

    fn submit_focused(&mut self) {
        let Some((id, st)) = self.focused_field() else {
            return;
        };
        if let Some(cb) = self.hit(id).and_then(|h| h.on_text_submit.clone()) {
            let text = st.borrow().text.clone();
            cb(text);
            self.request_redraw();
        }
    }

    fn copy(&mut self, cut: bool) {
        let Some((_, st)) = self.focused_field() else {
            return;
        };
        let Some(text) = st.borrow().copyable_text() else {
            return;
        };
        self.clipboard.set(text);
        if cut {
            self.edit_focused(|st| st.insert_text(""));
        }
    }

    fn paste(&mut self) {
        let text = common::printable(&self.clipboard.get());
        if !text.is_empty() {
            self.edit_focused(|st| st.insert_text(&text));
        }
    }

    fn pointer_down(&mut self, pos: Vec2) {
        let Some(frame) = &self.frame_cache else {
            return;
        };
        let Some(hit) = frame.hit_at(pos) else {
            self.set_focus(None);
            return;
        };
        let (id, focusable) = (hit.id, hit.focusable);
        self.capture_id = Some(id);
        self.pressed_ids.insert(id);
        if focusable {
            self.set_focus(Some(id));
        }
        if let Some(st) = self.field_state(id) {
            let mut st = st.borrow_mut();
            let idx = st.index_at_window_x(pos.x);
            st.begin_drag(idx, self.modifiers.shift);
        }
        self.request_redraw();
    }

    fn pointer_moved(&mut self, pos: Vec2) {
        let hover = self
            .frame_cache
            .as_ref()
            .and_then(|f| f.hit_at(pos))
            .map(|h| h.id);
        if hover != self.hover_id {
            self.hover_id = hover;
            self.request_redraw();
        }
        if let Some(cid) = self.capture_id
            && let Some(st) = self.field_state(cid)
        {
            let mut st = st.borrow_mut();
            if st.drag_anchor.is_some() {
                let idx = st.index_at_window_x(pos.x);
                st.drag_to(idx);
                self.request_redraw();
            }
        }
    }

    /// Ends a press; fires the click when `pos` is still over the pressed
    /// region. `pos == None` cancels.
    fn pointer_up(&mut self, pos: Option<Vec2>) {
        let Some(cid) = self.capture_id.take() else {
            return;
        };
        self.pressed_ids.remove(&cid);
        if let Some(st) = self.field_state(cid) {
            st.borrow_mut().end_drag();
        }
        let click = pos.and_then(|p| {
            self.hit(cid)
                .filter(|h| h.rect.contains(p))
                .and_then(|h| h.on_click.clone())
        });
        if let Some(cb) = click {
            cb();
        }
        self.request_redraw();
    }

    fn touch(&mut self, t: Touch) {
        let pos = Vec2 {
            x: t.location.x as f32,
            y: t.location.y as f32,
        };
        match t.phase {
            TouchPhase::Started if self.touch_id.is_none() => {
                self.touch_id = Some(t.id);
                self.pointer_down(pos);
            }
            TouchPhase::Moved if self.touch_id == Some(t.id) => self.pointer_moved(pos),
            TouchPhase::Ended | TouchPhase::Cancelled if self.touch_id == Some(t.id) => {
                self.touch_id = None;
                let up = (t.phase == TouchPhase::Ended).then_some(pos);
                self.pointer_up(up);
                // no hover without a pointer
                self.hover_id = None;
            }
            _ => {}
        }
    }

    fn keyboard_input(&mut self, ev: &KeyEvent) {
        let code = match ev.physical_key {
            PhysicalKey::Code(c) => Some(c),
            PhysicalKey::Unidentified(_) => None,
        };
        let activation_key = matches!(
            code,
            Some(KeyCode::Space | KeyCode::Enter | KeyCode::NumpadEnter)
        );

        if ev.state == ElementState::Released {
            if activation_key && let Some(id) = self.key_pressed_active.take() {
                self.pressed_ids.remove(&id);
                if let Some(cb) = self.hit(id).and_then(|h| h.on_click.clone()) {
                    cb();
                }
                self.request_redraw();
            }
            return;
        }

        if code == Some(KeyCode::Tab) {
            if !ev.repeat {
                self.focus_step(self.modifiers.shift);
            }
            return;
        }

        if self.focused_field().is_some() {
            self.field_key(code, ev.text.as_deref());
        } else if let Some(fid) = self.sched.focused
            && activation_key
            && !ev.repeat
        {
            self.pressed_ids.insert(fid);
            self.key_pressed_active = Some(fid);
            self.request_redraw();
        }
    }

    fn field_key(&mut self, code: Option<KeyCode>, text: Option<&str>) {
        let shift = self.modifiers.shift;
        let shortcut = self.modifiers.ctrl || self.modifiers.meta;
        match code {
            Some(KeyCode::Enter | KeyCode::NumpadEnter) => self.submit_focused(),
            Some(KeyCode::Backspace) => self.edit_focused(|st| st.delete_backward()),
            Some(KeyCode::Delete) => self.edit_focused(|st| st.delete_forward()),
            Some(KeyCode::ArrowLeft) => self.edit_focused(|st| st.move_cursor(-1, shift)),
            Some(KeyCode::ArrowRight) => self.edit_focused(|st| st.move_cursor(1, shift)),
            Some(KeyCode::Home) => self.edit_focused(|st| st.move_to_edge(false, shift)),
            Some(KeyCode::End) => self.edit_focused(|st| st.move_to_edge(true, shift)),
            Some(KeyCode::KeyA) if shortcut => self.edit_focused(|st| st.select_all()),
            Some(KeyCode::KeyC) if shortcut => self.copy(false),
            Some(KeyCode::KeyX) if shortcut => self.copy(true),
            Some(KeyCode::KeyV) if shortcut => self.paste(),
            _ => {
                if self.ime_preedit || self.modifiers.is_shortcut() {
                    return;
                }
                let text = text.map(common::printable).unwrap_or_default();
                if !text.is_empty() {
                    self.edit_focused(|st| st.insert_text(&text));
                }
            }
        }
    }

    fn ime(&mut self, ime: Ime) {
        match ime {
            Ime::Enabled => self.ime_preedit = false,
            Ime::Preedit(text, cursor) => {
                self.ime_preedit = !text.is_empty();
                self.edit_focused(|st| st.set_composition(text, cursor));
            }
            Ime::Commit(text) => {
                self.ime_preedit = false;
                self.edit_focused(|st| st.commit_composition(text));
            }
            Ime::Disabled => {
                self.ime_preedit = false;
                self.edit_focused(|st| {
                    if st.composition.is_some() {
                        st.cancel_composition();
                    }
                });
            }
        }
    }

    /// Keeps the IME candidate window next to the focused field.
    fn update_ime_area(&mut self) {
        let rect = self
            .sched
            .focused
            .and_then(|id| self.hit(id))
            .filter(|h| h.is_text_field())
            .map(|h| h.rect);
        if rect == self.ime_area {
            return;
        }
        self.ime_area = rect;
        if let (Some(r), Some(win)) = (rect, &self.window) {
            win.set_ime_cursor_area(
                PhysicalPosition::new(r.x as f64, r.y as f64),
                PhysicalSize::new(r.w as f64, r.h as f64),
            );
        }
    }

    fn redraw(&mut self) {
        let (Some(backend), Some(win)) = (self.backend.as_mut(), self.window.as_ref()) else {
            return;
        };
        let density = Density {
            scale: win.scale_factor() as f32,
        };
        let interactions = Interactions {
            hover: self.hover_id,
            pressed: self.pressed_ids.clone(),
        };
        let focused = self.sched.focused;
        let states = &self.textfield_states;
        let root = &mut self.root;
        let sched = &mut self.sched;

        let t0 = Instant::now();
        let result = with_density(density, || {
            sched.compose(root, |view, size| {
                layout_and_paint(view, size, states, &interactions, focused)
            })
        });
        match result {
            Ok(frame) => {
                log::trace!(
                    "frame: {} nodes, {} hit regions in {:?}",
                    frame.scene.nodes.len(),
                    frame.hit_regions.len(),
                    t0.elapsed()
                );
                backend.frame(&frame.scene);
                self.frame_cache = Some(frame);
            }
            Err(e) => {
                log::error!("layout failed, keeping previous frame: {e}");
                if let Some(prev) = &self.frame_cache {
                    backend.frame(&prev.scene);
                }
            }
        }
        self.update_ime_area();
    }
}

impl ApplicationHandler<()> for Runner {
    fn resumed(&mut self, el: &ActiveEventLoop) {
        if self.window.is_none() {
            let (w, h) = self.config.logical_size;
            let attrs = WindowAttributes::default()
                .with_title(self.config.title.clone())
                .with_inner_size(LogicalSize::new(w, h));
            match el.create_window(attrs) {
                Ok(win) => self.window = Some(Arc::new(win)),
                Err(e) => {
                    log::error!("failed to create window: {e:?}");
                    el.exit();
                    return;
                }
            }
        }
        // Android drops the surface on suspend; rebuild it on every resume.
        if self.backend.is_none()
            && let Some(win) = self.window.clone()
        {
            let size = win.inner_size();
            self.sched.size = (size.width, size.height);
            match WgpuBackend::new(win) {
                Ok(b) => {
                    self.backend = Some(b);
                    self.request_redraw();
                }
                Err(e) => {
                    log::error!("failed to create wgpu backend: {e:?}");
                    el.exit();
                }
            }
        }
    }

    fn suspended(&mut self, _el: &ActiveEventLoop) {
        log::info!("suspended; releasing surface");
        self.backend = None;
    }

    fn new_events(&mut self, _el: &ActiveEventLoop, cause: StartCause) {
        // caret blink tick
        if let StartCause::ResumeTimeReached { .. } = cause {
            self.request_redraw();
        }
    }

    fn about_to_wait(&mut self, el: &ActiveEventLoop) {
        match self.focused_field() {
            Some((_, st)) => {
                let next = st.borrow().next_blink_in();
                el.set_control_flow(ControlFlow::WaitUntil(Instant::now() + next));
            }
            None => el.set_control_flow(ControlFlow::Wait),
        }
    }

    fn window_event(&mut self, el: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                el.exit();
            }
            WindowEvent::Resized(size) => {
                self.sched.size = (size.width, size.height);
                if let Some(b) = &mut self.backend {
                    b.configure_surface(size.width, size.height);
                }
                self.request_redraw();
            }
            WindowEvent::ScaleFactorChanged { .. } => self.request_redraw(),
            WindowEvent::Focused(false) => self.modifiers = Modifiers::default(),
            WindowEvent::ModifiersChanged(m) => {
                let s = m.state();
                self.modifiers = Modifiers {
                    shift: s.shift_key(),
                    ctrl: s.control_key(),
                    alt: s.alt_key(),
                    meta: s.super_key(),
                };
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2 {
                    x: position.x as f32,
                    y: position.y as f32,
                };
                self.pointer_moved(self.cursor);
            }
            WindowEvent::CursorLeft { .. } => {
                if self.hover_id.take().is_some() {
                    self.request_redraw();
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let pos = self.cursor;
                match state {
                    ElementState::Pressed => self.pointer_down(pos),
                    ElementState::Released => self.pointer_up(Some(pos)),
                }
            }
            WindowEvent::Touch(t) => self.touch(t),
            WindowEvent::KeyboardInput { event, .. } => self.keyboard_input(&event),
            WindowEvent::Ime(ime) => self.ime(ime),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}
