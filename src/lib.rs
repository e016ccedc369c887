//! Loader for PF2 bitmap fonts, the sectioned big-endian format produced by
//! `grub-mkfont`.
//!
//! Glyph bitmaps are unpacked into a single RGBA8 texture atlas laid out as a
//! grid of equally sized cells, and every character gets normalized
//! [`GlyphInfo`] metrics for rendering.
//!
//! ```ignore
//! let bytes = std::fs::read("DroidSans-32.pf2")?;
//! let font = pf2::Pf2FontLoader::new("DroidSans-32", &bytes).load();
//! let atlas = &font.atlas;
//! let glyph = font.glyphs.get(&('A' as u32));
//! ```

pub mod atlas;
pub mod char_index;
pub mod dispatch;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod parse;
pub mod section;

#[cfg(test)]
mod test_util;

pub use atlas::{Atlas, GlyphInfo, GlyphMap, Rgba8};
pub use dispatch::FontMetadata;
pub use error::{Pf2Error, Pf2Result};
pub use loader::{LoadedFont, Pf2FontLoader};
