use std::collections::BTreeMap;

use bitvec::{order::Msb0, view::BitView};

use crate::{
    char_index::CharIndex,
    dispatch::FontMetadata,
    error::{Pf2Error, Pf2Result},
    parse::Pf2Parser,
};

mod glyph;
mod image;
mod layout;

pub use glyph::{GlyphHeader, GlyphInfo};
pub use image::{Atlas, Rgba8, MAX_ATLAS_PIXELS};
pub use layout::AtlasLayout;

pub type GlyphMap = BTreeMap<u32, GlyphInfo>;

/// Packs every indexed glyph into one grid atlas.
///
/// Glyph records are read at the absolute offsets stored in the character
/// index, so the builder works on the whole buffer rather than the `DATA`
/// payload alone.
pub struct AtlasBuilder<'p, 'a> {
    parser: &'p mut Pf2Parser<'a>,
    metadata: FontMetadata,
}

impl<'p, 'a> AtlasBuilder<'p, 'a> {
    pub fn new(parser: &'p mut Pf2Parser<'a>, metadata: FontMetadata) -> Self {
        Self { parser, metadata }
    }

    fn check_divisors(&self) -> Pf2Result<()> {
        let divisors = [
            ("PTSZ", self.metadata.point_size),
            ("MAXW", self.metadata.max_char_width),
            ("MAXH", self.metadata.max_char_height),
        ];

        for (field, value) in divisors {
            if value == 0 {
                anyhow::bail!(Pf2Error::DivideByZeroGuard { field });
            }
        }

        Ok(())
    }

    pub fn build(self, index: &CharIndex) -> Pf2Result<(Atlas, GlyphMap)> {
        self.check_divisors()?;

        let layout = AtlasLayout::new(
            index.len(),
            self.metadata.max_char_width,
            self.metadata.max_char_height,
        );

        let mut atlas = Atlas::new(layout.width(), layout.height())?;
        let mut glyphs = GlyphMap::new();

        for entry in index.entries() {
            self.parser.seek(entry.data_offset as usize);
            let header = self.parser.read_glyph_header();
            let bitmap = self.parser.read_bytes(header.bitmap_len());
            self.parser.check()?;

            let origin = layout.cell_origin(entry.slot_index);

            if u32::from(header.width) > layout.cell_width
                || u32::from(header.height) > layout.cell_height
            {
                log::warn!(
                    "PF2 font glyph for Unicode point {} is {}x{}, larger than its {}x{} cell; clipping",
                    entry.codepoint,
                    header.width,
                    header.height,
                    layout.cell_width,
                    layout.cell_height
                );
            }

            unpack_bitmap(&mut atlas, &layout, origin, &header, bitmap);

            glyphs.insert(
                entry.codepoint,
                GlyphInfo::new(
                    &header,
                    origin,
                    (atlas.width(), atlas.height()),
                    self.metadata.point_size,
                ),
            );
        }

        Ok((atlas, glyphs))
    }
}

/// Bit `i = y * width + x` of the glyph is bit `7 - i % 8` of byte `i / 8`.
/// Set bits become opaque white; clear bits are left untouched.
fn unpack_bitmap(
    atlas: &mut Atlas,
    layout: &AtlasLayout,
    (x0, y0): (u32, u32),
    header: &GlyphHeader,
    bitmap: &[u8],
) {
    let bits = bitmap.view_bits::<Msb0>();
    let glyph_width = usize::from(header.width);

    let width = u32::from(header.width).min(layout.cell_width);
    let height = u32::from(header.height).min(layout.cell_height);

    for y in 0..height {
        for x in 0..width {
            let i = y as usize * glyph_width + x as usize;
            if bits[i] {
                atlas.set_pixel(x0 + x, y0 + y, Rgba8::WHITE);
            }
        }
    }
}
