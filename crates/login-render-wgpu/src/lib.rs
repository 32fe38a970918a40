//! wgpu backend for login scenes.
//!
//! Every primitive is an instanced quad: SDF rounded rects and outlines,
//! rotated bars, and glyphs sampled from a single A8 atlas. Draws are batched
//! per primitive kind in scene order and split at clip boundaries.

use std::borrow::Cow;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use login_core::{Rect, RenderBackend, Scene, SceneNode};
use login_text::GlyphKey;

const RING_BYTES: u64 = 1 << 20;
const ATLAS_START: u32 = 1024;
const ATLAS_MAX: u32 = 4096;

struct UploadRing {
    buf: wgpu::Buffer,
    cap: u64,
    head: u64,
}

impl UploadRing {
    fn new(device: &wgpu::Device, label: &str, cap: u64) -> Self {
        let buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: cap,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buf, cap, head: 0 }
    }

    fn reset(&mut self) {
        self.head = 0;
    }

    /// Returns the offset the bytes landed at.
    fn alloc_write(&mut self, queue: &wgpu::Queue, bytes: &[u8]) -> u64 {
        let len = bytes.len() as u64;
        let start = (self.head + 3) & !3; // vertex slice offsets are 4-aligned
        if start + len > self.cap {
            log::warn!("upload ring overflow ({} > {} bytes); wrapping", start + len, self.cap);
            let end = len.min(self.cap);
            queue.write_buffer(&self.buf, 0, &bytes[..end as usize]);
            self.head = end;
            0
        } else {
            queue.write_buffer(&self.buf, start, bytes);
            self.head = start + len;
            start
        }
    }
}

/// Row-based packer for the glyph atlas. One texel of padding between glyphs.
#[derive(Debug)]
struct Shelf {
    size: u32,
    next_x: u32,
    next_y: u32,
    row_h: u32,
}

impl Shelf {
    fn new(size: u32) -> Self {
        Self {
            size,
            next_x: 1,
            next_y: 1,
            row_h: 0,
        }
    }

    fn alloc(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if w + 2 > self.size {
            return None;
        }
        if self.next_x + w + 1 > self.size {
            self.next_x = 1;
            self.next_y += self.row_h + 1;
            self.row_h = 0;
        }
        if self.next_y + h + 1 > self.size {
            return None;
        }
        let at = (self.next_x, self.next_y);
        self.next_x += w + 1;
        self.row_h = self.row_h.max(h);
        Some(at)
    }
}

struct AtlasA8 {
    tex: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    shelf: Shelf,
    map: HashMap<GlyphKey, GlyphInfo>,
}

impl AtlasA8 {
    fn new(device: &wgpu::Device, size: u32) -> Self {
        let tex = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("glyph atlas A8"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("glyph sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        Self {
            tex,
            view,
            sampler,
            shelf: Shelf::new(size),
            map: HashMap::new(),
        }
    }

    fn size(&self) -> u32 {
        self.shelf.size
    }
}

#[derive(Clone, Copy)]
struct GlyphInfo {
    u0: f32,
    v0: f32,
    u1: f32,
    v1: f32,
    w: f32,
    h: f32,
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct RectInstance {
    // NDC, min corner first
    xywh: [f32; 4],
    // w_px, h_px, radius_px, unused
    size_radius: [f32; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct BorderInstance {
    xywh: [f32; 4],
    // w_px, h_px, radius_px, stroke_px
    size_radius_stroke: [f32; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct BarInstance {
    // NDC corners: top-left, top-right | bottom-left, bottom-right
    p01: [f32; 4],
    p23: [f32; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct GlyphInstance {
    xywh: [f32; 4],
    uv: [f32; 4],
    color: [f32; 4],
}

// All instance structs are three vec4s.
const INSTANCE_ATTRS: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x4, 2 => Float32x4];
const INSTANCE_STRIDE: u64 = 48;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Kind {
    Rect,
    Border,
    Bar,
    Glyph,
}

enum Cmd {
    PushClip(Rect),
    PopClip,
    Draw { kind: Kind, off: u64, cnt: u32 },
}

struct Rings {
    rect: UploadRing,
    border: UploadRing,
    bar: UploadRing,
    glyph: UploadRing,
}

impl Rings {
    fn get(&mut self, kind: Kind) -> &mut UploadRing {
        match kind {
            Kind::Rect => &mut self.rect,
            Kind::Border => &mut self.border,
            Kind::Bar => &mut self.bar,
            Kind::Glyph => &mut self.glyph,
        }
    }

    fn buf(&self, kind: Kind) -> &wgpu::Buffer {
        match kind {
            Kind::Rect => &self.rect.buf,
            Kind::Border => &self.border.buf,
            Kind::Bar => &self.bar.buf,
            Kind::Glyph => &self.glyph.buf,
        }
    }

    fn reset(&mut self) {
        self.rect.reset();
        self.border.reset();
        self.bar.reset();
        self.glyph.reset();
    }
}

/// Pending instances of one kind. Switching kinds flushes, so paint order
/// matches scene order.
struct Batch {
    kind: Option<Kind>,
    bytes: Vec<u8>,
    cnt: u32,
}

impl Batch {
    fn new() -> Self {
        Self {
            kind: None,
            bytes: Vec::new(),
            cnt: 0,
        }
    }

    fn push<T: bytemuck::Pod>(
        &mut self,
        kind: Kind,
        inst: T,
        rings: &mut Rings,
        queue: &wgpu::Queue,
        cmds: &mut Vec<Cmd>,
    ) {
        if self.kind != Some(kind) {
            self.flush(rings, queue, cmds);
            self.kind = Some(kind);
        }
        self.bytes.extend_from_slice(bytemuck::bytes_of(&inst));
        self.cnt += 1;
    }

    fn flush(&mut self, rings: &mut Rings, queue: &wgpu::Queue, cmds: &mut Vec<Cmd>) {
        if let Some(kind) = self.kind.take() {
            if self.cnt > 0 {
                let off = rings.get(kind).alloc_write(queue, &self.bytes);
                cmds.push(Cmd::Draw {
                    kind,
                    off,
                    cnt: self.cnt,
                });
            }
        }
        self.bytes.clear();
        self.cnt = 0;
    }
}

pub struct WgpuBackend {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    rect_pipeline: wgpu::RenderPipeline,
    border_pipeline: wgpu::RenderPipeline,
    bar_pipeline: wgpu::RenderPipeline,
    text_pipeline: wgpu::RenderPipeline,
    text_bind_layout: wgpu::BindGroupLayout,

    atlas: AtlasA8,
    // bumped whenever the atlas is rebuilt; cached UVs from before are stale
    atlas_generation: u64,
    rings: Rings,
}

fn instanced_pipeline(
    device: &wgpu::Device,
    label: &str,
    module: &wgpu::ShaderModule,
    (vs, fs): (&str, &str),
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some(vs),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: INSTANCE_STRIDE,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &INSTANCE_ATTRS,
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some(fs),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

impl WgpuBackend {
    pub fn new(window: Arc<winit::window::Window>) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::from_env_or_default());
        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(|e| anyhow::anyhow!("no suitable adapter: {e}"))?;
        log::info!("adapter: {:?}", adapter.get_info().name);

        let (device, queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
                label: Some("login device"),
                required_features: wgpu::Features::empty(),
                // GLES and older mobile GPUs
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            }))?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let rect_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("rect.wgsl"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shaders/rect.wgsl"))),
        });
        let border_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("border.wgsl"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shaders/border.wgsl"))),
        });
        let text_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("text.wgsl"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shaders/text.wgsl"))),
        });

        let plain_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("plain pipeline layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });
        let text_bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("text bind layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let text_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("text pipeline layout"),
            bind_group_layouts: &[&text_bind_layout],
            immediate_size: 0,
        });

        let rect_pipeline = instanced_pipeline(
            &device,
            "rect pipeline",
            &rect_shader,
            ("vs_main", "fs_main"),
            &plain_layout,
            format,
        );
        let bar_pipeline = instanced_pipeline(
            &device,
            "bar pipeline",
            &rect_shader,
            ("vs_bar", "fs_bar"),
            &plain_layout,
            format,
        );
        let border_pipeline = instanced_pipeline(
            &device,
            "border pipeline",
            &border_shader,
            ("vs_main", "fs_main"),
            &plain_layout,
            format,
        );
        let text_pipeline = instanced_pipeline(
            &device,
            "text pipeline",
            &text_shader,
            ("vs_main", "fs_main"),
            &text_layout,
            format,
        );

        let atlas = AtlasA8::new(&device, ATLAS_START);
        let rings = Rings {
            rect: UploadRing::new(&device, "ring rect", RING_BYTES),
            border: UploadRing::new(&device, "ring border", RING_BYTES),
            bar: UploadRing::new(&device, "ring bar", RING_BYTES / 16),
            glyph: UploadRing::new(&device, "ring glyph", RING_BYTES),
        };

        Ok(Self {
            surface,
            device,
            queue,
            config,
            rect_pipeline,
            border_pipeline,
            bar_pipeline,
            text_pipeline,
            text_bind_layout,
            atlas,
            atlas_generation: 0,
            rings,
        })
    }

    fn atlas_bind_group(&self) -> wgpu::BindGroup {
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("atlas bind"),
            layout: &self.text_bind_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&self.atlas.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.atlas.sampler),
                },
            ],
        })
    }

    fn upload_glyph(&mut self, key: GlyphKey) -> Option<GlyphInfo> {
        if let Some(info) = self.atlas.map.get(&key) {
            return Some(*info);
        }
        let gb = login_text::rasterize(key)?;
        if gb.w == 0 || gb.h == 0 || gb.data.is_empty() {
            return None; // whitespace
        }
        if !matches!(gb.content, cosmic_text::SwashContent::Mask) {
            log::debug!("skipping non-mask glyph {:?}", key);
            return None;
        }
        let (x, y) = match self.atlas.shelf.alloc(gb.w, gb.h) {
            Some(at) => at,
            None => {
                self.grow_atlas();
                self.atlas.shelf.alloc(gb.w, gb.h)?
            }
        };

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfoBase {
                texture: &self.atlas.tex,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            &gb.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(gb.w),
                rows_per_image: Some(gb.h),
            },
            wgpu::Extent3d {
                width: gb.w,
                height: gb.h,
                depth_or_array_layers: 1,
            },
        );

        let size = self.atlas.size() as f32;
        let info = GlyphInfo {
            u0: x as f32 / size,
            v0: y as f32 / size,
            u1: (x + gb.w) as f32 / size,
            v1: (y + gb.h) as f32 / size,
            w: gb.w as f32,
            h: gb.h as f32,
        };
        self.atlas.map.insert(key, info);
        Some(info)
    }

    fn grow_atlas(&mut self) {
        let new_size = (self.atlas.size() * 2).min(ATLAS_MAX);
        if new_size == self.atlas.size() {
            log::warn!("glyph atlas full at {new_size}px");
            return;
        }
        log::debug!("growing glyph atlas to {new_size}px");
        let keys: Vec<GlyphKey> = self.atlas.map.keys().copied().collect();
        self.atlas = AtlasA8::new(&self.device, new_size);
        self.atlas_generation += 1;
        for k in keys {
            let _ = self.upload_glyph(k);
        }
    }

    /// Turns the scene into ring uploads plus an ordered draw list.
    fn encode(&mut self, scene: &Scene) -> Vec<Cmd> {
        let fb_w = self.config.width as f32;
        let fb_h = self.config.height as f32;
        let mut cmds = Vec::with_capacity(scene.nodes.len());
        let mut batch = Batch::new();
        self.rings.reset();

        for node in &scene.nodes {
            match node {
                SceneNode::Rect {
                    rect,
                    color,
                    radius,
                } => {
                    let inst = RectInstance {
                        xywh: to_ndc(*rect, fb_w, fb_h),
                        size_radius: [rect.w, rect.h, *radius, 0.0],
                        color: color.to_linear(),
                    };
                    batch.push(Kind::Rect, inst, &mut self.rings, &self.queue, &mut cmds);
                }
                SceneNode::Border {
                    rect,
                    color,
                    width,
                    radius,
                } => {
                    let inst = BorderInstance {
                        xywh: to_ndc(*rect, fb_w, fb_h),
                        size_radius_stroke: [rect.w, rect.h, *radius, *width],
                        color: color.to_linear(),
                    };
                    batch.push(Kind::Border, inst, &mut self.rings, &self.queue, &mut cmds);
                }
                SceneNode::Bar { rect, color, angle } => {
                    let [tl, tr, bl, br] = bar_corners(*rect, *angle)
                        .map(|[x, y]| point_to_ndc(x, y, fb_w, fb_h));
                    let inst = BarInstance {
                        p01: [tl[0], tl[1], tr[0], tr[1]],
                        p23: [bl[0], bl[1], br[0], br[1]],
                        color: color.to_linear(),
                    };
                    batch.push(Kind::Bar, inst, &mut self.rings, &self.queue, &mut cmds);
                }
                SceneNode::Text {
                    rect,
                    text,
                    color,
                    size,
                    weight,
                } => {
                    let px = size.clamp(6.0, 160.0);
                    let tint = color.to_linear();
                    for sg in login_text::shape_line(text, px, weight.0) {
                        let Some(info) = self.upload_glyph(sg.key) else {
                            continue;
                        };
                        let x = rect.x + sg.x + sg.bearing_x;
                        let y = rect.y + sg.y - sg.bearing_y;
                        let glyph_rect = Rect {
                            x,
                            y,
                            w: info.w,
                            h: info.h,
                        };
                        let inst = GlyphInstance {
                            xywh: to_ndc(glyph_rect, fb_w, fb_h),
                            // NDC min corner is the glyph's bottom-left
                            uv: [info.u0, info.v1, info.u1, info.v0],
                            color: tint,
                        };
                        batch.push(Kind::Glyph, inst, &mut self.rings, &self.queue, &mut cmds);
                    }
                }
                SceneNode::PushClip { rect, .. } => {
                    batch.flush(&mut self.rings, &self.queue, &mut cmds);
                    cmds.push(Cmd::PushClip(*rect));
                }
                SceneNode::PopClip => {
                    batch.flush(&mut self.rings, &self.queue, &mut cmds);
                    cmds.push(Cmd::PopClip);
                }
            }
        }
        batch.flush(&mut self.rings, &self.queue, &mut cmds);
        cmds
    }
}

impl RenderBackend for WgpuBackend {
    fn configure_surface(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    fn frame(&mut self, scene: &Scene) {
        if self.config.width == 0 || self.config.height == 0 {
            return;
        }
        let frame = loop {
            match self.surface.get_current_texture() {
                Ok(f) => break f,
                Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                    log::warn!("surface lost or outdated; reconfiguring");
                    self.surface.configure(&self.device, &self.config);
                }
                Err(wgpu::SurfaceError::Timeout) => {
                    log::warn!("surface timeout; skipping frame");
                    return;
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("surface out of memory");
                    return;
                }
                Err(wgpu::SurfaceError::Other) => {
                    log::error!("surface error");
                    return;
                }
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let generation = self.atlas_generation;
        let mut cmds = self.encode(scene);
        if self.atlas_generation != generation {
            // glyph UVs written before the atlas grew point at the old layout
            cmds = self.encode(scene);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        {
            let [r, g, b, a] = scene.clear_color.to_linear();
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let (fb_w, fb_h) = (self.config.width, self.config.height);
            rpass.set_scissor_rect(0, 0, fb_w, fb_h);
            let bind = self.atlas_bind_group();
            let root_clip = Rect {
                x: 0.0,
                y: 0.0,
                w: fb_w as f32,
                h: fb_h as f32,
            };
            // None marks an empty clip
            let mut clip_stack: Vec<Option<Rect>> = Vec::with_capacity(8);

            for cmd in cmds {
                match cmd {
                    Cmd::PushClip(r) => {
                        let top = clip_stack.last().copied().unwrap_or(Some(root_clip));
                        let next = top.and_then(|t| t.intersect(&r));
                        clip_stack.push(next);
                        let (x, y, w, h) = to_scissor(next, fb_w, fb_h);
                        rpass.set_scissor_rect(x, y, w, h);
                    }
                    Cmd::PopClip => {
                        if clip_stack.pop().is_none() {
                            log::warn!("PopClip with empty stack");
                        }
                        let top = clip_stack.last().copied().unwrap_or(Some(root_clip));
                        let (x, y, w, h) = to_scissor(top, fb_w, fb_h);
                        rpass.set_scissor_rect(x, y, w, h);
                    }
                    Cmd::Draw { kind, off, cnt } => {
                        let pipeline = match kind {
                            Kind::Rect => &self.rect_pipeline,
                            Kind::Border => &self.border_pipeline,
                            Kind::Bar => &self.bar_pipeline,
                            Kind::Glyph => &self.text_pipeline,
                        };
                        rpass.set_pipeline(pipeline);
                        if kind == Kind::Glyph {
                            rpass.set_bind_group(0, &bind, &[]);
                        }
                        let bytes = cnt as u64 * INSTANCE_STRIDE;
                        rpass.set_vertex_buffer(0, self.rings.buf(kind).slice(off..off + bytes));
                        rpass.draw(0..6, 0..cnt);
                    }
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        if let Err(e) = catch_unwind(AssertUnwindSafe(|| frame.present())) {
            log::warn!("frame.present panicked: {:?}", e);
        }
    }
}

/// Pixel rect to `[min_x, min_y, w, h]` in NDC (y up).
fn to_ndc(r: Rect, fb_w: f32, fb_h: f32) -> [f32; 4] {
    let [x0, y0] = point_to_ndc(r.x, r.y, fb_w, fb_h);
    let [x1, y1] = point_to_ndc(r.x + r.w, r.y + r.h, fb_w, fb_h);
    [x0.min(x1), y0.min(y1), (x1 - x0).abs(), (y1 - y0).abs()]
}

fn point_to_ndc(x: f32, y: f32, fb_w: f32, fb_h: f32) -> [f32; 2] {
    [(x / fb_w) * 2.0 - 1.0, 1.0 - (y / fb_h) * 2.0]
}

/// Corners of `rect` rotated by `angle` radians about its center, in pixel
/// space: top-left, top-right, bottom-left, bottom-right.
fn bar_corners(rect: Rect, angle: f32) -> [[f32; 2]; 4] {
    let c = rect.center();
    let (s, co) = angle.sin_cos();
    let (hw, hh) = (rect.w * 0.5, rect.h * 0.5);
    [(-hw, -hh), (hw, -hh), (-hw, hh), (hw, hh)]
        .map(|(dx, dy)| [c.x + dx * co - dy * s, c.y + dx * s + dy * co])
}

fn to_scissor(r: Option<Rect>, fb_w: u32, fb_h: u32) -> (u32, u32, u32, u32) {
    let Some(r) = r else {
        return (0, 0, 0, 0);
    };
    let x0 = r.x.floor().max(0.0) as i64;
    let y0 = r.y.floor().max(0.0) as i64;
    let x1 = ((r.x + r.w).ceil() as i64).min(fb_w as i64);
    let y1 = ((r.y + r.h).ceil() as i64).min(fb_h as i64);
    if x1 <= x0 || y1 <= y0 {
        return (0, 0, 0, 0);
    }
    (x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect { x, y, w, h }
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn instance_layouts_match_stride() {
        assert_eq!(std::mem::size_of::<RectInstance>() as u64, INSTANCE_STRIDE);
        assert_eq!(std::mem::size_of::<BorderInstance>() as u64, INSTANCE_STRIDE);
        assert_eq!(std::mem::size_of::<BarInstance>() as u64, INSTANCE_STRIDE);
        assert_eq!(std::mem::size_of::<GlyphInstance>() as u64, INSTANCE_STRIDE);
    }

    #[test]
    fn full_framebuffer_maps_to_unit_square() {
        let n = to_ndc(rect(0.0, 0.0, 200.0, 100.0), 200.0, 100.0);
        assert_eq!(n, [-1.0, -1.0, 2.0, 2.0]);
        // top-left quadrant
        let q = to_ndc(rect(0.0, 0.0, 100.0, 50.0), 200.0, 100.0);
        assert_eq!(q, [-1.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn scissor_clamps_to_framebuffer() {
        assert_eq!(
            to_scissor(Some(rect(-10.0, 5.5, 50.0, 20.0)), 30, 100),
            (0, 5, 30, 21)
        );
        assert_eq!(to_scissor(Some(rect(40.0, 0.0, 5.0, 5.0)), 30, 30), (0, 0, 0, 0));
        assert_eq!(to_scissor(None, 30, 30), (0, 0, 0, 0));
    }

    #[test]
    fn bar_rotates_about_center() {
        let r = rect(0.0, 0.0, 10.0, 2.0);
        let flat = bar_corners(r, 0.0);
        assert_eq!(flat[0], [0.0, 0.0]);
        assert_eq!(flat[3], [10.0, 2.0]);

        let upright = bar_corners(r, FRAC_PI_2);
        // a 10x2 bar turned a quarter becomes 2x10 around (5, 1)
        let span = |i: usize| {
            let lo = upright.iter().map(|p| p[i]).fold(f32::MAX, f32::min);
            let hi = upright.iter().map(|p| p[i]).fold(f32::MIN, f32::max);
            (lo, hi)
        };
        let (min_x, max_x) = span(0);
        let (min_y, max_y) = span(1);
        assert!(close(max_x - min_x, 2.0));
        assert!(close(max_y - min_y, 10.0));
        assert!(close((min_x + max_x) * 0.5, 5.0));
        assert!(close((min_y + max_y) * 0.5, 1.0));
    }

    #[test]
    fn shelf_wraps_rows_and_reports_full() {
        let mut s = Shelf::new(16);
        assert_eq!(s.alloc(6, 4), Some((1, 1)));
        assert_eq!(s.alloc(6, 5), Some((8, 1)));
        // no room left on the first row
        assert_eq!(s.alloc(6, 3), Some((1, 7)));
        assert_eq!(s.alloc(6, 9), None);
        assert_eq!(s.alloc(20, 1), None);
    }
}
