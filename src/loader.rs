use crate::{
    atlas::{Atlas, AtlasBuilder, GlyphInfo, GlyphMap},
    dispatch::{Dispatch, FontMetadata, SectionDispatcher},
    error::{Pf2Error, Pf2Result},
    section::{Section, SectionScanner},
};

/// Result of loading a PF2 font
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFont {
    pub atlas: Atlas,
    pub glyphs: GlyphMap,
    pub metadata: FontMetadata,
}

impl LoadedFont {
    /// One blank glyph for codepoint 0 with an empty atlas, so a renderer can
    /// always draw something
    pub fn fallback() -> Self {
        Self {
            atlas: Atlas::empty(),
            glyphs: GlyphMap::from([(0, GlyphInfo::fallback())]),
            metadata: FontMetadata::default(),
        }
    }

    pub fn into_parts(self) -> (Atlas, GlyphMap) {
        (self.atlas, self.glyphs)
    }
}

/// Loads a PF2 bitmap font into a texture atlas.
///
/// The loader borrows the font bytes and is consumed by loading, so each
/// load needs a fresh instance.
#[derive(Debug)]
pub struct Pf2FontLoader<'n, 'a> {
    name: &'n str,
    scanner: SectionScanner<'a>,
    dispatcher: SectionDispatcher<'n>,
}

impl<'n, 'a> Pf2FontLoader<'n, 'a> {
    /// `name` is only used in diagnostics
    pub fn new(name: &'n str, data: &'a [u8]) -> Self {
        Self {
            name,
            scanner: SectionScanner::new(data),
            dispatcher: SectionDispatcher::new(name),
        }
    }

    /// Never fails: any error is logged and [`LoadedFont::fallback`] is
    /// returned instead
    pub fn load(self) -> LoadedFont {
        let name = self.name;

        match self.try_load() {
            Ok(font) => font,
            Err(err) => {
                log::error!("PF2 font \"{}\": {}", name, err);
                LoadedFont::fallback()
            }
        }
    }

    pub fn try_load(mut self) -> Pf2Result<LoadedFont> {
        let Some(data) = self.scan()? else {
            anyhow::bail!(Pf2Error::NoDataSection);
        };

        log::trace!(
            "PF2 font \"{}\" glyph data: {} byte(s) at offset {}",
            self.name,
            data.payload_len(),
            data.payload_start
        );

        let (metadata, char_index) = self.dispatcher.into_parts();
        if char_index.is_empty() {
            anyhow::bail!(Pf2Error::EmptyCharIndex);
        }

        let (atlas, glyphs) =
            AtlasBuilder::new(self.scanner.parser_mut(), metadata).build(&char_index)?;

        log::debug!(
            "Loaded PF2 font \"{}\" ({} character(s), {} glyph(s), {}x{} generated texture)",
            self.name,
            glyphs.len(),
            char_index.len(),
            atlas.width(),
            atlas.height()
        );

        Ok(LoadedFont {
            atlas,
            glyphs,
            metadata,
        })
    }

    /// Dispatches sections until `DATA`, the end of the stream, or an error
    fn scan(&mut self) -> Pf2Result<Option<Section>> {
        while let Some(section) = self.scanner.next() {
            match self.dispatcher.dispatch(section, self.scanner.parser_mut())? {
                Dispatch::Continue => {}
                Dispatch::Data(data) => return Ok(Some(data)),
            }
        }

        self.dispatcher.terminate();
        self.scanner.parser().check()?;

        Ok(None)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        atlas::Rgba8,
        geometry::Vec2,
        test_util::{section, FontBuilder, TestGlyph},
    };

    fn load(buffer: &[u8]) -> LoadedFont {
        Pf2FontLoader::new("test", buffer).load()
    }

    fn load_error(buffer: &[u8]) -> Pf2Error {
        Pf2FontLoader::new("test", buffer)
            .try_load()
            .unwrap_err()
            .downcast::<Pf2Error>()
            .unwrap()
    }

    fn assert_fallback(font: &LoadedFont) {
        assert_eq!(font.glyphs.len(), 1);
        assert_eq!(
            font.glyphs[&0],
            GlyphInfo {
                tex_coord: Vec2::zero(),
                tex_size: Vec2::zero(),
                offset: Vec2::zero(),
                size: Vec2::zero(),
                advance_width: 1.0,
            }
        );
        assert_eq!(font.atlas.width() * font.atlas.height(), 0);
        assert!(font.atlas.pixels().is_empty());
    }

    fn ascii_font() -> FontBuilder {
        FontBuilder::new(16, 16, 16)
            .glyph(TestGlyph::solid(0x41, 8, 8))
            .glyph(TestGlyph::solid(0x42, 8, 12))
            .glyph(TestGlyph::solid(0x43, 16, 16))
    }

    #[test]
    fn loads_glyphs_and_metadata() {
        let font = load(&ascii_font().build());

        assert_eq!(font.glyphs.keys().copied().collect::<Vec<_>>(), [0x41, 0x42, 0x43]);
        assert_eq!(
            font.metadata,
            FontMetadata {
                point_size: 16,
                max_char_width: 16,
                max_char_height: 16,
                ascent: 12,
                descent: 4,
            }
        );
        // 3 glyphs: 2 columns, 2 rows
        assert_eq!((font.atlas.width(), font.atlas.height()), (32, 32));
    }

    #[test]
    fn geometry_is_normalized() {
        let font = load(&FontBuilder::new(16, 16, 16).glyph(TestGlyph::solid(0x41, 8, 8)).build());
        let glyph = font.glyphs[&0x41];
        let (width, height) = (font.atlas.width() as f32, font.atlas.height() as f32);

        assert_eq!(glyph.tex_size, Vec2::new(8.0 / width, 8.0 / height));
        assert_eq!(glyph.size, Vec2::new(0.5, 0.5));
        assert_eq!(glyph.advance_width, 0.5);
    }

    #[test]
    fn signed_offsets_are_normalized() {
        let mut glyph = TestGlyph::solid(0x67, 4, 4);
        glyph.x_offset = -2;
        glyph.y_offset = -4;
        glyph.device_width = 6;

        let font = load(&FontBuilder::new(8, 8, 8).glyph(glyph).build());
        let info = font.glyphs[&0x67];

        assert_eq!(info.offset, Vec2::new(-0.25, -0.5));
        assert_eq!(info.advance_width, 0.75);
    }

    #[test]
    fn bitmap_is_unpacked_into_atlas() {
        let font = load(
            &FontBuilder::new(8, 8, 8)
                .glyph(TestGlyph::with_bitmap(0x41, 8, 1, vec![0b1011_0000]))
                .build(),
        );

        let lit = (0..8)
            .filter(|&x| font.atlas.pixel(x, 0) == Some(Rgba8::WHITE))
            .collect::<Vec<_>>();
        assert_eq!(lit, [0, 2, 3]);
        assert!((1..8).all(|y| (0..8).all(|x| font.atlas.pixel(x, y) == Some(Rgba8::TRANSPARENT))));
    }

    #[test]
    fn unknown_sections_do_not_disturb_loading() {
        let buffer = ascii_font().section(b"XYZW", &[0xde, 0xad, 0xbe, 0xef]).build();

        assert_eq!(load(&buffer).glyphs.len(), 3);
    }

    #[test]
    fn loading_is_deterministic() {
        let buffer = ascii_font().build();

        let first = load(&buffer);
        let second = load(&buffer);

        assert_eq!(first, second);
        assert_eq!(first.atlas.as_bytes(), second.atlas.as_bytes());
    }

    #[test]
    fn atlas_dimensions_are_cell_multiples() {
        let mut builder = FontBuilder::new(13, 7, 13);
        for codepoint in 0x20..0x7f {
            builder = builder.glyph(TestGlyph::solid(codepoint, 7, 13));
        }

        let font = load(&builder.build());

        assert_eq!(font.glyphs.len(), 95);
        assert_eq!(font.atlas.width() % 7, 0);
        assert_eq!(font.atlas.height() % 13, 0);
    }

    #[test]
    fn missing_data_falls_back() {
        let mut builder = ascii_font();
        builder.include_data = false;
        let buffer = builder.build();

        assert_fallback(&load(&buffer));
        assert_eq!(load_error(&buffer), Pf2Error::NoDataSection);
    }

    #[test]
    fn empty_char_index_falls_back() {
        let buffer = FontBuilder::new(16, 16, 16).build();

        assert_fallback(&load(&buffer));
        assert_eq!(load_error(&buffer), Pf2Error::EmptyCharIndex);
    }

    #[test]
    fn bad_magic_falls_back() {
        let mut builder = ascii_font();
        builder.magic = *b"PFF1";
        let buffer = builder.build();

        assert_fallback(&load(&buffer));
        assert_eq!(load_error(&buffer), Pf2Error::InvalidFormat);
    }

    #[test]
    fn stream_without_file_section_falls_back() {
        let buffer = ascii_font().build();

        // drop the 12-byte FILE section
        assert_eq!(load_error(&buffer[12..]), Pf2Error::InvalidFormat);
        assert_fallback(&load(&buffer[12..]));
    }

    #[test]
    fn compressed_glyph_falls_back() {
        let mut compressed = TestGlyph::solid(0x42, 8, 8);
        compressed.storage_flags = 0b001;
        let buffer = FontBuilder::new(16, 16, 16)
            .glyph(TestGlyph::solid(0x41, 8, 8))
            .glyph(compressed)
            .build();

        assert_fallback(&load(&buffer));
        assert_eq!(
            load_error(&buffer),
            Pf2Error::UnsupportedCompression {
                codepoint: 0x42,
                flags: 0b001
            }
        );
    }

    #[test]
    fn zero_point_size_falls_back() {
        let buffer = FontBuilder::new(0, 16, 16)
            .glyph(TestGlyph::solid(0x41, 8, 8))
            .build();

        assert_fallback(&load(&buffer));
        assert_eq!(
            load_error(&buffer),
            Pf2Error::DivideByZeroGuard { field: "PTSZ" }
        );
    }

    #[test]
    fn oversized_cells_fall_back() {
        let buffer = FontBuilder::new(16, 65535, 65535)
            .glyph(TestGlyph::solid(0x41, 1, 1))
            .build();

        assert_fallback(&load(&buffer));
        assert_eq!(
            load_error(&buffer),
            Pf2Error::AtlasTooLarge {
                width: 65535,
                height: 65535
            }
        );
    }

    #[test]
    fn name_may_be_shorter_lived_than_data() {
        let buffer = ascii_font().build();

        let font = {
            let name = String::from("short lived");
            Pf2FontLoader::new(&name, &buffer).load()
        };

        assert_eq!(font.glyphs.len(), 3);
    }

    #[test]
    fn truncated_section_falls_back() {
        let mut buffer = section(b"FILE", b"PFF2");
        buffer.extend(section(b"NAME", b"Truncated Font\0"));
        buffer.truncate(buffer.len() - 4);

        assert_fallback(&load(&buffer));
        assert_eq!(
            load_error(&buffer),
            Pf2Error::MalformedSection { offset: 20 }
        );
    }

    #[test]
    fn truncated_glyph_bitmap_falls_back() {
        let mut buffer = ascii_font().build();
        buffer.pop();

        assert_fallback(&load(&buffer));
        assert!(matches!(
            load_error(&buffer),
            Pf2Error::MalformedSection { .. }
        ));
    }

    #[test]
    fn empty_buffer_falls_back() {
        assert_fallback(&load(&[]));
        assert_eq!(load_error(&[]), Pf2Error::NoDataSection);
    }

    #[test]
    fn sections_after_data_are_not_read() {
        let mut buffer = section(b"FILE", b"PFF2");
        buffer.extend(section(b"PTSZ", &8_u16.to_be_bytes()));
        buffer.extend(section(b"MAXW", &8_u16.to_be_bytes()));
        buffer.extend(section(b"MAXH", &8_u16.to_be_bytes()));

        // one glyph stored right after the CHIX section, inside a sized DATA
        let glyph_offset = buffer.len() + 8 + 9 + 8;
        let mut chix = 0x41_u32.to_be_bytes().to_vec();
        chix.push(0);
        chix.extend((glyph_offset as u32).to_be_bytes());
        buffer.extend(section(b"CHIX", &chix));
        buffer.extend(section(b"DATA", &[0, 1, 0, 1, 0, 0, 0, 0, 0, 8, 0x80]));
        buffer.extend(section(b"PTSZ", &16_u16.to_be_bytes()));

        let font = load(&buffer);

        assert_eq!(font.metadata.point_size, 8);
        assert_eq!(font.atlas.pixel(0, 0), Some(Rgba8::WHITE));
        assert_eq!(font.glyphs[&0x41].advance_width, 1.0);
    }

    #[test]
    fn fallback_round_trips_into_parts() {
        let (atlas, glyphs) = LoadedFont::fallback().into_parts();

        assert!(atlas.is_empty());
        assert_eq!(glyphs[&0].advance_width, 1.0);
    }
}
