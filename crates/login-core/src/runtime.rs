use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{KeyboardType, LayoutError, Rect, Scene, View, semantics::Role};

thread_local! {
    pub static COMPOSER: RefCell<Composer> = RefCell::new(Composer::default());
}

#[derive(Default)]
pub struct Composer {
    pub slots: Vec<Box<dyn Any>>,
    pub cursor: usize,
    pub keyed_slots: HashMap<String, Box<dyn Any>>,
}

/// Marks one composition pass; positional `remember` slots restart at zero.
pub struct ComposeGuard {
    _private: (),
}

impl ComposeGuard {
    pub fn begin() -> Self {
        COMPOSER.with(|c| c.borrow_mut().cursor = 0);
        ComposeGuard { _private: () }
    }
}

impl Drop for ComposeGuard {
    fn drop(&mut self) {
        COMPOSER.with(|c| {
            let c = c.borrow();
            if c.cursor < c.slots.len() {
                log::trace!(
                    "composition used {} of {} remember slots",
                    c.cursor,
                    c.slots.len()
                );
            }
        });
    }
}

/// Slot-based remember (sequential composition only)
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let cursor = c.cursor;
        c.cursor += 1;

        if cursor >= c.slots.len() {
            let rc: Rc<T> = Rc::new(init());
            c.slots.push(Box::new(rc.clone()));
            return rc;
        }

        if let Some(rc) = c.slots[cursor].downcast_ref::<Rc<T>>() {
            rc.clone()
        } else {
            log::warn!(
                "remember: slot {} type changed; replacing. \
                 If this is due to conditional composition, prefer remember_with_key.",
                cursor
            );
            let rc: Rc<T> = Rc::new(init());
            c.slots[cursor] = Box::new(rc.clone());
            rc
        }
    })
}

/// Key-based remember
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let key = key.into();

        if let Some(existing) = c.keyed_slots.get(&key) {
            if let Some(rc) = existing.downcast_ref::<Rc<T>>() {
                return rc.clone();
            }
            log::warn!(
                "remember_with_key: key '{}' reused with a different type; replacing.",
                key
            );
        }

        let rc: Rc<T> = Rc::new(init());
        c.keyed_slots.insert(key, Box::new(rc.clone()));
        rc
    })
}

pub fn remember_state<T: 'static>(init: impl FnOnce() -> T) -> Rc<RefCell<T>> {
    remember(|| RefCell::new(init()))
}

/// Output of one composition + layout pass.
pub struct Frame {
    pub scene: Scene,
    pub hit_regions: Vec<HitRegion>,
    pub semantics_nodes: Vec<SemNode>,
    pub focus_chain: Vec<u64>,
}

impl Frame {
    /// Topmost hit region under `p`, ties broken by paint order.
    pub fn hit_at(&self, p: crate::Vec2) -> Option<&HitRegion> {
        self.hit_regions
            .iter()
            .enumerate()
            .filter(|(_, h)| h.rect.contains(p))
            .max_by(|(ia, a), (ib, b)| {
                a.z_index
                    .partial_cmp(&b.z_index)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(ia.cmp(ib))
            })
            .map(|(_, h)| h)
    }

    pub fn semantics_by_label(&self, label: &str) -> Option<&SemNode> {
        self.semantics_nodes
            .iter()
            .find(|n| n.label.as_deref() == Some(label))
    }
}

#[derive(Clone)]
pub struct HitRegion {
    pub id: u64,
    pub rect: Rect,
    pub on_click: Option<Rc<dyn Fn()>>,
    pub focusable: bool,
    pub z_index: f32,
    pub on_text_change: Option<Rc<dyn Fn(String)>>,
    pub on_text_submit: Option<Rc<dyn Fn(String)>>,
    /// Key of the platform-managed `TextFieldState` when this region is a
    /// text field.
    pub tf_state_key: Option<u64>,
    pub keyboard: KeyboardType,
}

impl HitRegion {
    pub fn new(id: u64, rect: Rect) -> Self {
        Self {
            id,
            rect,
            on_click: None,
            focusable: false,
            z_index: 0.0,
            on_text_change: None,
            on_text_submit: None,
            tf_state_key: None,
            keyboard: KeyboardType::Text,
        }
    }

    pub fn is_text_field(&self) -> bool {
        self.tf_state_key.is_some()
    }
}

/// Flattened semantics node produced by `layout_and_paint`.
///
/// Carries the resolved screen rect, role, label and focus/enabled state, so
/// tests and accessibility bridges can inspect the screen without pixels.
#[derive(Clone, Debug)]
pub struct SemNode {
    /// Shared with the matching `HitRegion`.
    pub id: u64,
    pub role: Role,
    pub label: Option<String>,
    pub rect: Rect,
    pub focused: bool,
    pub enabled: bool,
}

pub struct Scheduler {
    pub focused: Option<u64>,
    /// Physical pixels.
    pub size: (u32, u32),
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            focused: None,
            size: (1080, 1920),
        }
    }

    /// Runs one composition of `build_root` and lays it out.
    pub fn compose<F>(
        &mut self,
        mut build_root: F,
        layout_paint: impl Fn(
            &View,
            (u32, u32),
        ) -> Result<(Scene, Vec<HitRegion>, Vec<SemNode>), LayoutError>,
    ) -> Result<Frame, LayoutError>
    where
        F: FnMut(&mut Scheduler) -> View,
    {
        let root = {
            let _guard = ComposeGuard::begin();
            build_root(self)
        };
        let (scene, hits, sem) = layout_paint(&root, self.size)?;

        let focus_chain: Vec<u64> = hits.iter().filter(|h| h.focusable).map(|h| h.id).collect();

        Ok(Frame {
            scene,
            hit_regions: hits,
            semantics_nodes: sem,
            focus_chain,
        })
    }
}
