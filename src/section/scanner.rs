use crate::{error::Pf2Error, parse::Pf2Parser};

use super::{Section, OPEN_ENDED_LENGTH};

/// Walks the section chain of a PF2 stream.
///
/// Each call to [`Iterator::next`] jumps to the start of the following
/// section, regardless of how much of the previous payload was consumed, so
/// sections the loader does not understand are skipped implicitly.
#[derive(Debug)]
pub struct SectionScanner<'a> {
    parser: Pf2Parser<'a>,

    /// `None` once an open-ended section has been returned
    next_start: Option<usize>,
}

impl<'a> SectionScanner<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            parser: Pf2Parser::new(buffer),
            next_start: Some(0),
        }
    }

    pub fn parser(&self) -> &Pf2Parser<'a> {
        &self.parser
    }

    pub fn parser_mut(&mut self) -> &mut Pf2Parser<'a> {
        &mut self.parser
    }
}

impl Iterator for SectionScanner<'_> {
    type Item = Section;

    fn next(&mut self) -> Option<Section> {
        if self.parser.has_error() {
            return None;
        }

        let start = self.next_start.take()?;
        self.parser.seek(start);

        // too short for a tag is a clean end of stream, not an error
        if self.parser.remaining() < 4 {
            return None;
        }

        let header = self.parser.read_section_header();
        if self.parser.has_error() {
            return None;
        }

        let payload_start = self.parser.position();
        let buffer_len = self.parser.buffer().len();

        let payload_end = if header.length == OPEN_ENDED_LENGTH {
            buffer_len
        } else {
            match payload_start.checked_add(header.length as usize) {
                Some(end) if end <= buffer_len => {
                    self.next_start = Some(end);
                    end
                }
                Some(..) | None => {
                    self.parser.set_error(Pf2Error::MalformedSection {
                        offset: payload_start,
                    });
                    return None;
                }
            }
        };

        Some(Section {
            tag: header.tag,
            length: header.length,
            payload_start,
            payload_end,
        })
    }
}
