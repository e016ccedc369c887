use std::collections::HashSet;

use crate::{
    error::{Pf2Error, Pf2Result},
    parse::Pf2Parser,
    section::Section,
};

/// Per-character storage encoding. Only the low 3 bits describe compression;
/// the remaining bits are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageFlags(pub u8);

impl StorageFlags {
    const COMPRESSION_MASK: u8 = 0b111;

    pub fn is_compressed(self) -> bool {
        self.0 & Self::COMPRESSION_MASK != 0
    }
}

/// A raw 9-byte `CHIX` record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharIndexRecord {
    pub codepoint: u32,
    pub storage_flags: StorageFlags,

    /// Absolute offset of the glyph record within the whole buffer
    pub offset: u32,
}

impl CharIndexRecord {
    pub const SIZE: usize = 9;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharIndexEntry {
    pub codepoint: u32,
    pub data_offset: u32,

    /// Atlas grid cell this glyph is drawn into
    pub slot_index: usize,
}

/// Insertion-ordered character index. Codepoints are unique; the first
/// record for a codepoint wins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CharIndex {
    entries: Vec<CharIndexEntry>,
    codepoints: HashSet<u32>,
}

impl CharIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[CharIndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
        self.codepoints.reserve(additional);
    }

    /// Returns `false` if the codepoint was already indexed
    pub(crate) fn push(&mut self, codepoint: u32, data_offset: u32) -> bool {
        if !self.codepoints.insert(codepoint) {
            return false;
        }

        let slot_index = self.entries.len();
        self.entries.push(CharIndexEntry {
            codepoint,
            data_offset,
            slot_index,
        });

        true
    }
}

/// Decodes a `CHIX` section into a [`CharIndex`]
pub struct CharIndexParser<'p, 'a> {
    parser: &'p mut Pf2Parser<'a>,
    section: Section,
}

impl<'p, 'a> CharIndexParser<'p, 'a> {
    pub fn new(parser: &'p mut Pf2Parser<'a>, section: Section) -> Self {
        Self { parser, section }
    }

    /// Appends every record of the section to `index`, stopping at the first
    /// compressed character. Slots continue from the entries already present,
    /// so multiple `CHIX` sections never share a cell.
    pub fn parse_into(self, index: &mut CharIndex) -> Pf2Result<()> {
        let Self { parser, section } = self;

        parser.seek(section.payload_start);
        index.reserve(section.payload_len() / CharIndexRecord::SIZE);

        let mut records = 0_usize;
        let mut duplicates = 0_usize;

        while parser.position() < section.payload_end && !parser.has_error() {
            if section.payload_end - parser.position() < CharIndexRecord::SIZE {
                parser.set_error(Pf2Error::MalformedSection {
                    offset: parser.position(),
                });
                break;
            }

            let record = parser.read_char_index_record();
            if record.storage_flags.is_compressed() {
                parser.set_error(Pf2Error::UnsupportedCompression {
                    codepoint: record.codepoint,
                    flags: record.storage_flags.0,
                });
                break;
            }

            records += 1;
            if !index.push(record.codepoint, record.offset) {
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            log::warn!(
                "PF2 font character index lists {} duplicate Unicode code point(s); keeping the first of each",
                duplicates
            );
        }

        parser.check()?;

        log::trace!(
            "PF2 font character index has {} record(s) ({} unique glyph(s))",
            records,
            index.len()
        );

        Ok(())
    }
}
