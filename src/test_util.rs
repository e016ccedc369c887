//! Builders for synthetic PF2 streams

use crate::section::OPEN_ENDED_LENGTH;

pub(crate) fn section(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + payload.len());
    out.extend(tag);
    out.extend((payload.len() as u32).to_be_bytes());
    out.extend(payload);
    out
}

pub(crate) fn chix_record(codepoint: u32, flags: u8, offset: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(9);
    out.extend(codepoint.to_be_bytes());
    out.push(flags);
    out.extend(offset.to_be_bytes());
    out
}

#[derive(Debug, Clone)]
pub(crate) struct TestGlyph {
    pub codepoint: u32,
    pub width: u16,
    pub height: u16,
    pub x_offset: i16,
    pub y_offset: i16,
    pub device_width: i16,
    pub bitmap: Vec<u8>,
    pub storage_flags: u8,
}

impl TestGlyph {
    /// A glyph with every pixel set
    pub fn solid(codepoint: u32, width: u16, height: u16) -> Self {
        let bits = width as usize * height as usize;
        let mut bitmap = vec![0xff; bits.div_ceil(8)];
        if bits % 8 != 0 {
            if let Some(last) = bitmap.last_mut() {
                *last = 0xff << (8 - bits % 8);
            }
        }

        Self::with_bitmap(codepoint, width, height, bitmap)
    }

    pub fn with_bitmap(codepoint: u32, width: u16, height: u16, bitmap: Vec<u8>) -> Self {
        Self {
            codepoint,
            width,
            height,
            x_offset: 0,
            y_offset: 0,
            device_width: width as i16,
            bitmap,
            storage_flags: 0,
        }
    }
}

/// Assembles `FILE`, metadata, extra sections, `CHIX` and an open-ended
/// `DATA` section, computing absolute glyph offsets.
#[derive(Debug, Clone)]
pub(crate) struct FontBuilder {
    pub point_size: u16,
    pub max_char_width: u16,
    pub max_char_height: u16,
    pub magic: [u8; 4],
    pub extra_sections: Vec<Vec<u8>>,
    pub glyphs: Vec<TestGlyph>,
    pub include_data: bool,
}

impl FontBuilder {
    pub fn new(point_size: u16, max_char_width: u16, max_char_height: u16) -> Self {
        Self {
            point_size,
            max_char_width,
            max_char_height,
            magic: *b"PFF2",
            extra_sections: Vec::new(),
            glyphs: Vec::new(),
            include_data: true,
        }
    }

    pub fn glyph(mut self, glyph: TestGlyph) -> Self {
        self.glyphs.push(glyph);
        self
    }

    pub fn section(mut self, tag: &[u8; 4], payload: &[u8]) -> Self {
        self.extra_sections.push(section(tag, payload));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = section(b"FILE", &self.magic);
        out.extend(section(b"NAME", b"Test Regular 16\0"));
        out.extend(section(b"FAMI", b"Test\0"));
        out.extend(section(b"PTSZ", &self.point_size.to_be_bytes()));
        out.extend(section(b"MAXW", &self.max_char_width.to_be_bytes()));
        out.extend(section(b"MAXH", &self.max_char_height.to_be_bytes()));
        out.extend(section(b"ASCE", &(self.max_char_height / 4 * 3).to_be_bytes()));
        out.extend(section(b"DESC", &(self.max_char_height / 4).to_be_bytes()));
        for extra in &self.extra_sections {
            out.extend(extra);
        }

        let chix_len = self.glyphs.len() * 9;
        let data_start = out.len() + 8 + chix_len + 8;

        let mut chix = Vec::with_capacity(chix_len);
        let mut data = Vec::new();
        for glyph in &self.glyphs {
            chix.extend(chix_record(
                glyph.codepoint,
                glyph.storage_flags,
                (data_start + data.len()) as u32,
            ));
            data.extend(glyph.width.to_be_bytes());
            data.extend(glyph.height.to_be_bytes());
            data.extend(glyph.x_offset.to_be_bytes());
            data.extend(glyph.y_offset.to_be_bytes());
            data.extend(glyph.device_width.to_be_bytes());
            data.extend(&glyph.bitmap);
        }

        out.extend(section(b"CHIX", &chix));

        if self.include_data {
            out.extend(b"DATA");
            out.extend(OPEN_ENDED_LENGTH.to_be_bytes());
            out.extend(data);
        }

        out
    }
}
