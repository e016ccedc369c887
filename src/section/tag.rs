use std::fmt::{self, Write};

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionTag([u8; 4]);

impl SectionTag {
    pub const fn new(tag: [u8; 4]) -> Self {
        Self(tag)
    }

    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Debug for SectionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.0[0] as char)?;
        f.write_char(self.0[1] as char)?;
        f.write_char(self.0[2] as char)?;
        f.write_char(self.0[3] as char)?;

        Ok(())
    }
}

impl fmt::Display for SectionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Section tags with a meaning to the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionName {
    /// Leading section, payload is the `PFF2` magic
    File,

    /// Full font name
    Name,
    Family,
    Weight,
    Slant,

    PointSize,
    MaxCharWidth,
    MaxCharHeight,
    Ascent,
    Descent,

    /// Character index
    CharIndex,

    /// Glyph headers and bitmaps; always the last section read
    Data,
}

impl SectionName {
    pub const fn as_tag(self) -> SectionTag {
        SectionTag::new(match self {
            Self::File => *b"FILE",
            Self::Name => *b"NAME",
            Self::Family => *b"FAMI",
            Self::Weight => *b"WEIG",
            Self::Slant => *b"SLAN",
            Self::PointSize => *b"PTSZ",
            Self::MaxCharWidth => *b"MAXW",
            Self::MaxCharHeight => *b"MAXH",
            Self::Ascent => *b"ASCE",
            Self::Descent => *b"DESC",
            Self::CharIndex => *b"CHIX",
            Self::Data => *b"DATA",
        })
    }

    pub fn from_tag(tag: SectionTag) -> Option<Self> {
        Some(match tag.as_bytes() {
            b"FILE" => Self::File,
            b"NAME" => Self::Name,
            b"FAMI" => Self::Family,
            b"WEIG" => Self::Weight,
            b"SLAN" => Self::Slant,
            b"PTSZ" => Self::PointSize,
            b"MAXW" => Self::MaxCharWidth,
            b"MAXH" => Self::MaxCharHeight,
            b"ASCE" => Self::Ascent,
            b"DESC" => Self::Descent,
            b"CHIX" => Self::CharIndex,
            b"DATA" => Self::Data,
            _ => return None,
        })
    }
}
