use std::io::Write;

use crate::error::{Pf2Error, Pf2Result};

/// 16384x16384, or 1 GiB of RGBA8
pub const MAX_ATLAS_PIXELS: u64 = 1 << 28;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `0x00RRGGBB` with the color premultiplied by alpha, the layout
    /// expected by framebuffer windows
    pub fn to_argb(self) -> u32 {
        let premultiply = |c: u8| u32::from(c) * u32::from(self.a) / 255;

        (premultiply(self.r) << 16) | (premultiply(self.g) << 8) | premultiply(self.b)
    }
}

/// Row-major RGBA8 texture atlas
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Atlas {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl Atlas {
    /// A fully transparent atlas. Fails without allocating when the area
    /// exceeds [`MAX_ATLAS_PIXELS`], and fails if the allocator refuses.
    pub fn new(width: u64, height: u64) -> Pf2Result<Self> {
        let too_large = Pf2Error::AtlasTooLarge { width, height };

        let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
            anyhow::bail!(too_large);
        };

        let len = match width.checked_mul(height) {
            Some(len) if len <= MAX_ATLAS_PIXELS => len as usize,
            _ => anyhow::bail!(too_large),
        };

        let mut pixels = Vec::new();
        if pixels.try_reserve_exact(len).is_err() {
            anyhow::bail!(too_large);
        }
        pixels.resize(len, Rgba8::TRANSPARENT);

        Ok(Self {
            width: w,
            height: h,
            pixels,
        })
    }

    /// The zero-sized atlas paired with the fallback glyph
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }

        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub(super) fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        if x >= self.width || y >= self.height {
            return;
        }

        let idx = y as usize * self.width as usize + x as usize;
        if let Some(pixel) = self.pixels.get_mut(idx) {
            *pixel = color;
        }
    }

    pub fn to_argb(&self) -> Vec<u32> {
        self.pixels.iter().map(|pixel| pixel.to_argb()).collect()
    }

    /// Encodes the atlas as an 8-bit RGBA PNG
    pub fn write_png(&self, w: impl Write) -> Pf2Result<()> {
        if self.is_empty() {
            anyhow::bail!("cannot encode an empty {}x{} atlas", self.width, self.height);
        }

        let mut encoder = png::Encoder::new(w, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(self.as_bytes())?;
        writer.finish()?;

        Ok(())
    }
}
