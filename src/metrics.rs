//! Text measurement.
//!
//! Layout only ever asks three questions about a font: how wide is this
//! string, how tall is a line, and where does the baseline sit. Answering
//! them is the job of a [GlyphMetrics] provider. [FontBook] answers them from
//! real font files, [MonospaceMetrics] from a fixed advance per character.

use crate::font::Font;
use crate::{Mm, Pt};
use id_arena::{Arena, Id};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Average advance of a character, in ems, assumed for fonts we know nothing about
pub const FALLBACK_ADVANCE_EM: f32 = 0.5;
/// Line height, in ems, assumed for fonts we know nothing about
pub const FALLBACK_LINE_HEIGHT_EM: f32 = 1.2;
/// Share of the line height above the baseline for fonts we know nothing about
pub const FALLBACK_ASCENT_EM: f32 = 0.8;

/// Measures text for layout. Implementations must be pure: the same input
/// always measures the same, so pagination is deterministic.
pub trait GlyphMetrics: Send + Sync {
    /// Width of `text` set in `font` at `size`
    fn measure(&self, text: &str, font: &str, size: Pt) -> Mm;

    /// Vertical advance from one line of text to the next
    fn line_height(&self, font: &str, size: Pt) -> Mm;

    /// Distance from the top of a line box to its baseline
    fn ascent(&self, font: &str, size: Pt) -> Mm {
        Pt(size.0 * FALLBACK_ASCENT_EM).to_mm()
    }
}

/// A named collection of loaded fonts, used to measure text during layout.
///
/// Measuring with a font name that was never registered is not an error:
/// the book falls back to an average character width estimate and logs a
/// warning (once per name), trading layout accuracy for always producing
/// the document.
#[derive(Default)]
pub struct FontBook {
    fonts: Arena<Font>,
    names: HashMap<String, Id<Font>>,
    warned: Mutex<HashSet<String>>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("fonts", &self.names.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FontBook {
    pub fn new() -> FontBook {
        FontBook::default()
    }

    /// Register a font under `name`, replacing any font previously registered
    /// under the same name. Returns the id of the font within the book.
    pub fn add_font<S: Into<String>>(&mut self, name: S, font: Font) -> Id<Font> {
        let id = self.fonts.alloc(font);
        self.names.insert(name.into(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<&Font> {
        self.names.get(name).map(|&id| &self.fonts[id])
    }

    fn warn_unknown(&self, name: &str) {
        let mut warned = match self.warned.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if warned.insert(name.to_string()) {
            log::warn!(
                "font '{}' is not registered, estimating metrics at {}em per character",
                name,
                FALLBACK_ADVANCE_EM
            );
        }
    }
}

impl GlyphMetrics for FontBook {
    fn measure(&self, text: &str, font: &str, size: Pt) -> Mm {
        match self.get(font) {
            Some(f) => f.width_of_text(text, size),
            None => {
                self.warn_unknown(font);
                fallback_width(text, size)
            }
        }
    }

    fn line_height(&self, font: &str, size: Pt) -> Mm {
        match self.get(font) {
            Some(f) => f.line_height(size),
            None => {
                self.warn_unknown(font);
                Pt(size.0 * FALLBACK_LINE_HEIGHT_EM).to_mm()
            }
        }
    }

    fn ascent(&self, font: &str, size: Pt) -> Mm {
        match self.get(font) {
            Some(f) => f.ascent(size) + f.leading(size) / 2.0,
            None => Pt(size.0 * FALLBACK_ASCENT_EM).to_mm(),
        }
    }
}

fn fallback_width(text: &str, size: Pt) -> Mm {
    Pt(text.chars().count() as f32 * size.0 * FALLBACK_ADVANCE_EM).to_mm()
}

/// Metrics for an idealised monospaced font: every character advances by
/// the same fraction of an em regardless of the font name. Useful for
/// previews and for reasoning about layout without any font files.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MonospaceMetrics {
    pub advance_em: f32,
    pub line_height_em: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        MonospaceMetrics {
            advance_em: 0.6,
            line_height_em: FALLBACK_LINE_HEIGHT_EM,
        }
    }
}

impl GlyphMetrics for MonospaceMetrics {
    fn measure(&self, text: &str, _font: &str, size: Pt) -> Mm {
        Pt(text.chars().count() as f32 * size.0 * self.advance_em).to_mm()
    }

    fn line_height(&self, _font: &str, size: Pt) -> Mm {
        Pt(size.0 * self.line_height_em).to_mm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fonts_fall_back_to_an_estimate() {
        let book = FontBook::new();
        let width = book.measure("abcd", "NoSuchFont", Pt(10.0));
        // 4 chars * 10pt * 0.5em = 20pt
        assert!(width.approx_eq(Pt(20.0).to_mm(), 1e-4));

        let line = book.line_height("NoSuchFont", Pt(10.0));
        assert!(line.approx_eq(Pt(12.0).to_mm(), 1e-4));
    }

    #[test]
    fn warns_once_per_unknown_font() {
        let book = FontBook::new();
        book.measure("a", "Missing", Pt(10.0));
        book.measure("b", "Missing", Pt(10.0));
        book.line_height("Other", Pt(10.0));
        let warned = book.warned.lock().expect("not poisoned");
        assert_eq!(warned.len(), 2);
    }

    #[test]
    fn registered_fonts_measure_from_their_tables() {
        let bytes = include_bytes!("../tests/fonts/DejaVuSansMono.ttf").to_vec();
        let mut book = FontBook::new();
        book.add_font("Mono", Font::load(bytes).expect("font parses"));

        let one = book.measure("a", "Mono", Pt(10.0));
        // DejaVu Sans Mono advances 1233 of 2048 units per glyph
        assert!(one.approx_eq(Pt(10.0 * 1233.0 / 2048.0).to_mm(), 1e-3));
        assert!(book
            .measure("Wide", "Mono", Pt(10.0))
            .approx_eq(one * 4.0, 1e-3));

        let line = book.line_height("Mono", Pt(10.0));
        let ascent = book.ascent("Mono", Pt(10.0));
        assert!(line > Pt(10.0).to_mm());
        assert!(ascent > Mm::ZERO && ascent < line);
        assert!(book.warned.lock().expect("not poisoned").is_empty());
    }

    #[test]
    fn garbage_is_not_a_font() {
        assert!(Font::load(b"not a font".to_vec()).is_err());
    }

    #[test]
    fn monospace_measures_by_character_count() {
        let metrics = MonospaceMetrics {
            advance_em: 0.5,
            line_height_em: 1.0,
        };
        let a = metrics.measure("hello", "any", Pt(12.0));
        let b = metrics.measure("world", "other", Pt(12.0));
        assert_eq!(a, b);
        assert!(a.approx_eq(Pt(30.0).to_mm(), 1e-4));
        assert!(metrics
            .line_height("any", Pt(12.0))
            .approx_eq(Pt(12.0).to_mm(), 1e-4));
    }
}
