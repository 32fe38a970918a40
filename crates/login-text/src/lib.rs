//! Single-line text services shared by layout (caret metrics) and the GPU
//! renderer (shaping + rasterization). One `FontSystem` lives behind a global
//! mutex; buffers are rebuilt per call.

use ahash::AHasher;
use cosmic_text::{
    Attrs, Buffer, CacheKey, FontSystem, Metrics, Shaping, SwashCache, SwashContent, Weight,
};
use once_cell::sync::OnceCell;
use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
    sync::{Mutex, MutexGuard},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlyphKey(pub u64);

pub struct ShapedGlyph {
    pub key: GlyphKey,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub bearing_x: f32,
    pub bearing_y: f32,
    pub advance: f32,
}

pub struct GlyphBitmap {
    pub key: GlyphKey,
    pub w: u32,
    pub h: u32,
    pub content: SwashContent,
    pub data: Vec<u8>, // Mask: A8; Color/Subpixel: RGBA8
}

struct Engine {
    fs: FontSystem,
    cache: SwashCache,
    // compact atlas key -> full cosmic_text CacheKey
    key_map: HashMap<GlyphKey, CacheKey>,
}

impl Engine {
    fn get_image(&mut self, key: CacheKey) -> Option<cosmic_text::SwashImage> {
        self.cache.get_image(&mut self.fs, key).clone()
    }

    fn shaped_buffer(&mut self, text: &str, px: f32, weight: u16) -> Buffer {
        let mut buf = Buffer::new(&mut self.fs, Metrics::new(px, px * 1.3));
        {
            let mut b = buf.borrow_with(&mut self.fs);
            b.set_size(None, None);
            b.set_text(
                text,
                &Attrs::new().weight(Weight(weight)),
                Shaping::Advanced,
                None,
            );
            b.shape_until_scroll(true);
        }
        buf
    }
}

static ENGINE: OnceCell<Mutex<Engine>> = OnceCell::new();

fn engine() -> MutexGuard<'static, Engine> {
    let m = ENGINE.get_or_init(|| {
        log::debug!("loading system fonts");
        Mutex::new(Engine {
            fs: FontSystem::new(),
            cache: SwashCache::new(),
            key_map: HashMap::new(),
        })
    });
    // Engine state is caches only; a poisoned lock is still usable.
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn key_from_cachekey(k: &CacheKey) -> GlyphKey {
    let mut h = AHasher::default();
    k.hash(&mut h);
    GlyphKey(h.finish())
}

/// Shapes one line (no wrapping). Glyph positions are relative to the top of
/// the line box; `y` is the baseline.
pub fn shape_line(text: &str, px: f32, weight: u16) -> Vec<ShapedGlyph> {
    let mut eng = engine();
    let buf = eng.shaped_buffer(text, px, weight);

    let mut out = Vec::new();
    for run in buf.layout_runs() {
        for g in run.glyphs {
            let phys = g.physical((0.0, run.line_y), 1.0);
            let key = key_from_cachekey(&phys.cache_key);
            eng.key_map.insert(key, phys.cache_key);

            let (w, h, left, top) = match eng.get_image(phys.cache_key) {
                Some(img) => (
                    img.placement.width as f32,
                    img.placement.height as f32,
                    img.placement.left as f32,
                    img.placement.top as f32,
                ),
                None => (0.0, 0.0, 0.0, 0.0),
            };

            out.push(ShapedGlyph {
                key,
                x: g.x + g.x_offset,
                y: run.line_y,
                w,
                h,
                bearing_x: left,
                bearing_y: top,
                advance: g.w,
            });
        }
    }
    out
}

/// Pixels of a glyph previously returned by `shape_line`.
pub fn rasterize(key: GlyphKey) -> Option<GlyphBitmap> {
    let mut eng = engine();
    let &ck = eng.key_map.get(&key)?;

    let img = eng.get_image(ck)?;
    Some(GlyphBitmap {
        key,
        w: img.placement.width,
        h: img.placement.height,
        content: img.content,
        data: img.data,
    })
}

/// Caret mapping for a text field line.
pub struct TextMetrics {
    /// Cumulative advance at each boundary (len == glyph count + 1).
    pub positions: Vec<f32>,
    /// Byte index at each boundary; the last entry is `text.len()`.
    pub byte_offsets: Vec<usize>,
}

pub fn metrics_for_textfield(text: &str, px: f32) -> TextMetrics {
    let mut eng = engine();
    let buf = eng.shaped_buffer(text, px, Weight::NORMAL.0);

    let mut positions = vec![0.0f32];
    let mut byte_offsets = vec![0usize];
    let mut x = 0.0f32;

    for run in buf.layout_runs() {
        for g in run.glyphs {
            x = g.x + g.w;
            positions.push(x);
            byte_offsets.push(g.end);
        }
    }
    if byte_offsets.last().copied().unwrap_or(0) != text.len() {
        positions.push(x);
        byte_offsets.push(text.len());
    }
    TextMetrics {
        positions,
        byte_offsets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_end_at_text_length() {
        let t = "me@example.com";
        let m = metrics_for_textfield(t, 16.0);
        assert_eq!(m.positions.len(), m.byte_offsets.len());
        assert_eq!(m.byte_offsets.first(), Some(&0));
        assert_eq!(m.byte_offsets.last(), Some(&t.len()));
        assert!(m.positions.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn empty_text_has_single_boundary() {
        let m = metrics_for_textfield("", 12.0);
        assert_eq!(m.byte_offsets, vec![0]);
        assert_eq!(m.positions, vec![0.0]);
    }
}
