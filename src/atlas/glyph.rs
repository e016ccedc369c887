use crate::geometry::Vec2;

/// Per-glyph header stored in the `DATA` section, immediately followed by
/// `ceil(width * height / 8)` bytes of packed 1 bpp bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphHeader {
    pub width: u16,
    pub height: u16,
    pub x_offset: i16,
    pub y_offset: i16,

    /// Horizontal advance in font units
    pub device_width: i16,
}

impl GlyphHeader {
    pub const SIZE: usize = 10;

    /// Size in bytes of the bitmap following the header. Rows are not byte
    /// aligned.
    pub fn bitmap_len(&self) -> usize {
        (self.width as usize * self.height as usize).div_ceil(8)
    }
}

/// Normalized glyph geometry handed to the renderer.
///
/// Texture quantities are fractions of the atlas size; layout quantities are
/// fractions of the point size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphInfo {
    pub tex_coord: Vec2,
    pub tex_size: Vec2,
    pub offset: Vec2,
    pub size: Vec2,
    pub advance_width: f32,
}

impl GlyphInfo {
    /// Blank glyph returned when a font cannot be loaded
    pub const fn fallback() -> Self {
        Self {
            tex_coord: Vec2::zero(),
            tex_size: Vec2::zero(),
            offset: Vec2::zero(),
            size: Vec2::zero(),
            advance_width: 1.0,
        }
    }

    pub(super) fn new(
        header: &GlyphHeader,
        origin: (u32, u32),
        atlas_size: (u32, u32),
        point_size: u16,
    ) -> Self {
        let atlas_size = Vec2::new(atlas_size.0 as f32, atlas_size.1 as f32);
        let pixel_size = Vec2::new(f32::from(header.width), f32::from(header.height));
        let point_size = f32::from(point_size);

        Self {
            tex_coord: Vec2::new(origin.0 as f32, origin.1 as f32) / atlas_size,
            tex_size: pixel_size / atlas_size,
            offset: Vec2::new(f32::from(header.x_offset), f32::from(header.y_offset)) / point_size,
            size: pixel_size / point_size,
            advance_width: f32::from(header.device_width) / point_size,
        }
    }
}
