mod scanner;
mod tag;

pub use scanner::SectionScanner;
pub use tag::{SectionName, SectionTag};

/// Section length meaning "the payload runs to the end of the stream"
pub const OPEN_ENDED_LENGTH: u32 = 0xFFFF_FFFF;

/// The 8 bytes preceding every section payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHeader {
    pub tag: SectionTag,
    pub length: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub tag: SectionTag,

    /// Declared length, possibly [`OPEN_ENDED_LENGTH`]
    pub length: u32,

    /// Absolute offset of the first payload byte
    pub payload_start: usize,

    /// Absolute offset one past the last payload byte, already resolved for
    /// open-ended sections
    pub payload_end: usize,
}

impl Section {
    pub fn name(&self) -> Option<SectionName> {
        SectionName::from_tag(self.tag)
    }

    pub fn is_open_ended(&self) -> bool {
        self.length == OPEN_ENDED_LENGTH
    }

    pub fn payload_len(&self) -> usize {
        self.payload_end - self.payload_start
    }

    pub fn payload<'a>(&self, buffer: &'a [u8]) -> &'a [u8] {
        buffer
            .get(self.payload_start..self.payload_end)
            .unwrap_or(&[])
    }
}
