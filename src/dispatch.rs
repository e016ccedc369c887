use crate::{
    char_index::{CharIndex, CharIndexParser},
    error::{Pf2Error, Pf2Result},
    parse::Pf2Parser,
    section::{Section, SectionName},
};

const MAGIC: &[u8; 4] = b"PFF2";

/// Scalar font metrics gathered from the optional metric sections. Missing
/// sections leave their field at zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FontMetadata {
    pub point_size: u16,
    pub max_char_width: u16,
    pub max_char_height: u16,
    pub ascent: u16,
    pub descent: u16,
}

impl FontMetadata {
    fn field_mut(&mut self, name: SectionName) -> Option<&mut u16> {
        Some(match name {
            SectionName::PointSize => &mut self.point_size,
            SectionName::MaxCharWidth => &mut self.max_char_width,
            SectionName::MaxCharHeight => &mut self.max_char_height,
            SectionName::Ascent => &mut self.ascent,
            SectionName::Descent => &mut self.descent,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Waiting for the `FILE` section
    Unstarted,
    Started,

    /// `DATA` was reached, the stream ran out, or an error occurred
    Terminated,
}

/// What the scanning loop should do after a section has been dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Continue,

    /// Stop scanning and build the atlas from this `DATA` section
    Data(Section),
}

/// Routes each scanned section to the metadata fields or the character
/// index, validating the leading magic first.
#[derive(Debug)]
pub struct SectionDispatcher<'n> {
    name: &'n str,
    state: DispatchState,
    metadata: FontMetadata,
    char_index: CharIndex,
}

impl<'n> SectionDispatcher<'n> {
    pub fn new(name: &'n str) -> Self {
        Self {
            name,
            state: DispatchState::Unstarted,
            metadata: FontMetadata::default(),
            char_index: CharIndex::new(),
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn metadata(&self) -> &FontMetadata {
        &self.metadata
    }

    pub fn char_index(&self) -> &CharIndex {
        &self.char_index
    }

    pub fn terminate(&mut self) {
        self.state = DispatchState::Terminated;
    }

    pub fn into_parts(self) -> (FontMetadata, CharIndex) {
        (self.metadata, self.char_index)
    }

    pub fn dispatch(&mut self, section: Section, parser: &mut Pf2Parser) -> Pf2Result<Dispatch> {
        let result = match self.state {
            DispatchState::Unstarted => self.start(section, parser),
            DispatchState::Started => self.dispatch_started(section, parser),
            DispatchState::Terminated => {
                log::warn!(
                    "PF2 font \"{}\": ignoring section \"{}\" after parsing finished",
                    self.name,
                    section.tag
                );
                Ok(Dispatch::Continue)
            }
        };

        if matches!(result, Err(..) | Ok(Dispatch::Data(..))) {
            self.terminate();
        }

        result
    }

    fn start(&mut self, section: Section, parser: &mut Pf2Parser) -> Pf2Result<Dispatch> {
        if section.name() == Some(SectionName::File) && section.payload(parser.buffer()) == MAGIC
        {
            self.state = DispatchState::Started;
            log::trace!("PF2 font \"{}\"", self.name);
            return Ok(Dispatch::Continue);
        }

        parser.set_error(Pf2Error::InvalidFormat);
        parser.check()?;

        Ok(Dispatch::Continue)
    }

    fn dispatch_started(
        &mut self,
        section: Section,
        parser: &mut Pf2Parser,
    ) -> Pf2Result<Dispatch> {
        let name = match section.name() {
            Some(name) => name,
            None => {
                log::trace!(
                    "Skipping PF2 font section \"{}\" ({} byte(s))",
                    section.tag,
                    section.payload_len()
                );
                return Ok(Dispatch::Continue);
            }
        };

        match name {
            SectionName::Name | SectionName::Family | SectionName::Weight | SectionName::Slant => {
                if let Some(text) = Self::section_as_text(section, parser.buffer()) {
                    log::trace!("PF2 font {:?}: {}", name, text);
                }
            }
            SectionName::PointSize
            | SectionName::MaxCharWidth
            | SectionName::MaxCharHeight
            | SectionName::Ascent
            | SectionName::Descent => self.read_metric(name, section, parser)?,
            SectionName::CharIndex => {
                CharIndexParser::new(parser, section).parse_into(&mut self.char_index)?
            }
            SectionName::Data => return Ok(Dispatch::Data(section)),
            SectionName::File => {
                log::trace!("Skipping repeated PF2 font section \"{}\"", section.tag);
            }
        }

        Ok(Dispatch::Continue)
    }

    /// Text payloads end in a NUL terminator which is not part of the value
    fn section_as_text(section: Section, buffer: &[u8]) -> Option<String> {
        if section.payload_len() <= 1 {
            return None;
        }

        let payload = section.payload(buffer);
        Some(String::from_utf8_lossy(&payload[..payload.len() - 1]).into_owned())
    }

    fn read_metric(
        &mut self,
        name: SectionName,
        section: Section,
        parser: &mut Pf2Parser,
    ) -> Pf2Result<()> {
        if section.payload_len() != 2 {
            log::warn!(
                "PF2 font \"{}\": section \"{}\" has {} byte(s), expected 2; skipping",
                self.name,
                section.tag,
                section.payload_len()
            );
            return Ok(());
        }

        parser.seek(section.payload_start);
        let value = parser.read_u16();
        parser.check()?;

        if let Some(field) = self.metadata.field_mut(name) {
            *field = value;
        }

        log::trace!("PF2 font {:?}: {}", name, value);

        Ok(())
    }
}
