use wgpu::util::DeviceExt;

use crate::data::TileCoord;

/// Layout of a tile sheet image: a grid of equally sized tiles addressed by
/// (column, row). Pure UV math, no GPU state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SheetGrid {
    pub width: u32,
    pub height: u32,
    pub tile_w: u32,
    pub tile_h: u32,
}

impl SheetGrid {
    /// A zero tile dimension means "the whole image".
    pub fn new(width: u32, height: u32, tile_w: u32, tile_h: u32) -> Self {
        let tile_w = if tile_w == 0 { width } else { tile_w };
        let tile_h = if tile_h == 0 { height } else { tile_h };
        Self { width, height, tile_w, tile_h }
    }

    pub fn cols(&self) -> u32 {
        if self.tile_w == 0 { 0 } else { self.width / self.tile_w }
    }

    pub fn rows(&self) -> u32 {
        if self.tile_h == 0 { 0 } else { self.height / self.tile_h }
    }

    pub fn contains(&self, tile: TileCoord) -> bool {
        tile.col >= 0 && tile.row >= 0 && (tile.col as u32) < self.cols() && (tile.row as u32) < self.rows()
    }

    /// Returns (uv_min, uv_max) of `tile`, or `None` outside the sheet.
    pub fn uv_for(&self, tile: TileCoord) -> Option<([f32; 2], [f32; 2])> {
        if !self.contains(tile) {
            return None;
        }
        let (col, row) = (tile.col as u32, tile.row as u32);
        let total_w = self.width as f32;
        let total_h = self.height as f32;

        let u_min = (col * self.tile_w) as f32 / total_w;
        let v_min = (row * self.tile_h) as f32 / total_h;
        let u_max = ((col + 1) * self.tile_w) as f32 / total_w;
        let v_max = ((row + 1) * self.tile_h) as f32 / total_h;

        Some(([u_min, v_min], [u_max, v_max]))
    }
}

/// A tile sheet uploaded to the GPU.
pub struct TileSheet {
    pub grid: SheetGrid,
    pub texture_view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TileSheet {
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::RgbaImage,
        tile_w: u32,
        tile_h: u32,
        label: &str,
    ) -> Self {
        let (img_w, img_h) = img.dimensions();

        let size = wgpu::Extent3d {
            width: img_w,
            height: img_h,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            img.as_raw(),
        );

        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self { grid: SheetGrid::new(img_w, img_h, tile_w, tile_h), texture_view, sampler }
    }

    /// A 1×1 opaque white sheet; tinted quads drawn from it are solid fills.
    pub fn solid(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        Self::from_image(device, queue, &img, 1, 1, "solid_sheet")
    }
}
