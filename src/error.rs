use std::fmt;

pub type Pf2Result<T> = anyhow::Result<T>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pf2Error {
    /// The stream does not start with a `FILE` section containing `PFF2`
    InvalidFormat,

    /// A section or primitive read runs past the end of the buffer
    MalformedSection { offset: usize },

    /// A character uses a compressed storage encoding
    UnsupportedCompression { codepoint: u32, flags: u8 },

    /// The stream ended without a `DATA` section
    NoDataSection,

    /// `DATA` was reached but no characters were indexed
    EmptyCharIndex,

    /// A metric used as a divisor in atlas math is zero
    DivideByZeroGuard { field: &'static str },

    /// The atlas implied by the cell size and glyph count cannot be allocated
    AtlasTooLarge { width: u64, height: u64 },
}

impl fmt::Display for Pf2Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat => write!(f, "invalid file format"),
            Self::MalformedSection { offset } => {
                write!(f, "malformed section: read past end of buffer at offset {offset}")
            }
            Self::UnsupportedCompression { codepoint, flags } => write!(
                f,
                "character with Unicode point {codepoint} has compressed storage type {:#05b} which is not supported",
                flags & 0b111
            ),
            Self::NoDataSection => write!(f, "no \"DATA\" section"),
            Self::EmptyCharIndex => write!(f, "character index is empty"),
            Self::DivideByZeroGuard { field } => write!(f, "\"{field}\" is zero"),
            Self::AtlasTooLarge { width, height } => {
                write!(f, "{width}x{height} atlas is too large to allocate")
            }
        }
    }
}

impl std::error::Error for Pf2Error {}
