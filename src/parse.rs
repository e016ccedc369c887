use std::fmt;

use crate::{
    atlas::GlyphHeader,
    char_index::{CharIndexRecord, StorageFlags},
    error::{Pf2Error, Pf2Result},
    section::{SectionHeader, SectionTag},
};

/// Big-endian read cursor over a borrowed font buffer.
///
/// Reads never panic. The first read that would run past the end of the
/// buffer records a [`Pf2Error::MalformedSection`]; from then on every read
/// is a no-op returning zero and the error stays set until the parser is
/// dropped. Callers poll [`Pf2Parser::has_error`] or [`Pf2Parser::check`].
pub struct Pf2Parser<'a> {
    buffer: &'a [u8],
    cursor: usize,
    error: Option<Pf2Error>,
}

impl fmt::Debug for Pf2Parser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pf2Parser")
            .field("cursor", &self.cursor)
            .field("buffer", &format!("[ {} bytes ]", self.buffer.len()))
            .field("error", &self.error)
            .finish()
    }
}

/// Base parsing
impl<'a> Pf2Parser<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            cursor: 0,
            error: None,
        }
    }

    pub fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor to an absolute offset. Seeking past the end is
    /// allowed; the next read will fail.
    pub fn seek(&mut self, offset: usize) {
        self.cursor = offset;
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.cursor)
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&Pf2Error> {
        self.error.as_ref()
    }

    /// Records `err` unless an earlier error is already set
    pub fn set_error(&mut self, err: Pf2Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    pub fn check(&self) -> Pf2Result<()> {
        match &self.error {
            Some(err) => Err(err.clone().into()),
            None => Ok(()),
        }
    }

    /// Borrows `length` bytes at the cursor and advances past them
    pub fn read_bytes(&mut self, length: usize) -> &'a [u8] {
        if self.error.is_some() {
            return &[];
        }

        let end = match self.cursor.checked_add(length) {
            Some(end) if end <= self.buffer.len() => end,
            Some(..) | None => {
                self.set_error(Pf2Error::MalformedSection {
                    offset: self.cursor,
                });
                return &[];
            }
        };

        let bytes = &self.buffer[self.cursor..end];
        self.cursor = end;
        bytes
    }

    fn read_array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0; N];
        let bytes = self.read_bytes(N);
        if bytes.len() == N {
            out.copy_from_slice(bytes);
        }
        out
    }

    pub fn read_u8(&mut self) -> u8 {
        self.read_array::<1>()[0]
    }

    pub fn read_u16(&mut self) -> u16 {
        u16::from_be_bytes(self.read_array())
    }

    pub fn read_i16(&mut self) -> i16 {
        i16::from_be_bytes(self.read_array())
    }

    pub fn read_u32(&mut self) -> u32 {
        u32::from_be_bytes(self.read_array())
    }

    pub fn read_tag(&mut self) -> SectionTag {
        SectionTag::new(self.read_array())
    }
}

/// Record parsing
impl<'a> Pf2Parser<'a> {
    /// ```text
    /// tag:    [u8; 4]
    /// length: u32
    /// ```
    pub fn read_section_header(&mut self) -> SectionHeader {
        let tag = self.read_tag();
        let length = self.read_u32();

        SectionHeader { tag, length }
    }

    /// ```text
    /// codepoint:     u32
    /// storage_flags: u8
    /// offset:        u32
    /// ```
    pub fn read_char_index_record(&mut self) -> CharIndexRecord {
        let codepoint = self.read_u32();
        let storage_flags = StorageFlags(self.read_u8());
        let offset = self.read_u32();

        CharIndexRecord {
            codepoint,
            storage_flags,
            offset,
        }
    }

    /// ```text
    /// width:        u16
    /// height:       u16
    /// x_offset:     i16
    /// y_offset:     i16
    /// device_width: i16
    /// ```
    pub fn read_glyph_header(&mut self) -> GlyphHeader {
        let width = self.read_u16();
        let height = self.read_u16();
        let x_offset = self.read_i16();
        let y_offset = self.read_i16();
        let device_width = self.read_i16();

        GlyphHeader {
            width,
            height,
            x_offset,
            y_offset,
            device_width,
        }
    }
}
