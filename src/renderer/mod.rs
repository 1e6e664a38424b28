pub mod atlas;
pub mod pipeline;

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use atlas::{SheetGrid, TileSheet};
use pipeline::{SpritePipeline, SpriteVertex, create_sprite_pipeline, orthographic_projection};

use crate::engine::{Color, EngineError};

/// Handle of a tile sheet registered with the renderer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SheetId(pub usize);

impl SheetId {
    /// The 1×1 white sheet used for solid fills.
    pub const SOLID: SheetId = SheetId(0);
}

/// Consecutive quads drawn from the same sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    pub sheet: SheetId,
    pub vertices: Vec<SpriteVertex>,
}

/// Quads queued for one frame, in paint order.
///
/// Neighbouring quads that share a sheet are merged into one batch, so a
/// frame costs one draw call per run of same-sheet quads.
#[derive(Debug, Default)]
pub struct DrawQueue {
    batches: Vec<DrawBatch>,
}

impl DrawQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sheet: SheetId, quad: [SpriteVertex; 6]) {
        match self.batches.last_mut() {
            Some(batch) if batch.sheet == sheet => batch.vertices.extend_from_slice(&quad),
            _ => self.batches.push(DrawBatch { sheet, vertices: quad.to_vec() }),
        }
    }

    pub fn batches(&self) -> &[DrawBatch] {
        &self.batches
    }

    pub fn quad_count(&self) -> usize {
        self.batches.iter().map(|b| b.vertices.len() / 6).sum()
    }

    pub fn clear(&mut self) {
        self.batches.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

struct GpuSheet {
    sheet: TileSheet,
    bind_group: wgpu::BindGroup,
}

pub struct Renderer {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    sprite_pipeline: SpritePipeline,
    projection_buffer: wgpu::Buffer,
    projection_bind_group: wgpu::BindGroup,
    /// Index 0 is always the solid sheet.
    sheets: Vec<GpuSheet>,
    clear_color: Color,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, clear_color: Color) -> Result<Self, EngineError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(Arc::clone(&window))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await?;

        // Colors and sheets pass through unconverted, as authored.
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(EngineError::NoSurfaceFormat)?;
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

        let sprite_pipeline = create_sprite_pipeline(&device, format);

        let proj = orthographic_projection(config.width as f32, config.height as f32);
        let projection_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("projection_buffer"),
            contents: bytemuck::cast_slice(&proj),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("projection_bg"),
            layout: &sprite_pipeline.projection_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_buffer.as_entire_binding(),
            }],
        });

        log::info!(
            "renderer ready: {}x{} {:?} on {}",
            config.width,
            config.height,
            format,
            adapter.get_info().name
        );

        let mut renderer = Self {
            window,
            surface,
            device,
            queue,
            config,
            sprite_pipeline,
            projection_buffer,
            projection_bind_group,
            sheets: Vec::new(),
            clear_color,
        };
        let solid = TileSheet::solid(&renderer.device, &renderer.queue);
        renderer.register(solid);
        Ok(renderer)
    }

    /// Upload an image as a tile sheet of `tile_w × tile_h` tiles.
    pub fn add_sheet(&mut self, img: &image::RgbaImage, tile_w: u32, tile_h: u32, label: &str) -> SheetId {
        let sheet = TileSheet::from_image(&self.device, &self.queue, img, tile_w, tile_h, label);
        self.register(sheet)
    }

    fn register(&mut self, sheet: TileSheet) -> SheetId {
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sheet_bg"),
            layout: &self.sprite_pipeline.sheet_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&sheet.texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sheet.sampler),
                },
            ],
        });
        self.sheets.push(GpuSheet { sheet, bind_group });
        SheetId(self.sheets.len() - 1)
    }

    pub fn sheet_grid(&self, id: SheetId) -> Option<SheetGrid> {
        self.sheets.get(id.0).map(|s| s.sheet.grid)
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);

        let proj = orthographic_projection(new_size.width as f32, new_size.height as f32);
        self.queue
            .write_buffer(&self.projection_buffer, 0, bytemuck::cast_slice(&proj));
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Render one frame: clear, then every batch in order.
    pub fn render(&mut self, batches: &[DrawBatch]) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        let [r, g, b, a] = self.clear_color.0;
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
            pass.set_bind_group(0, &self.projection_bind_group, &[]);

            for batch in batches.iter().filter(|b| !b.vertices.is_empty()) {
                let Some(sheet) = self.sheets.get(batch.sheet.0) else { continue };
                let vbuf = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("sprite_vertex_buffer"),
                    contents: bytemuck::cast_slice(&batch.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                pass.set_bind_group(1, &sheet.bind_group, &[]);
                pass.set_vertex_buffer(0, vbuf.slice(..));
                pass.draw(0..batch.vertices.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
