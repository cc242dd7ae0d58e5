use crate::{LayoutError, Mm, Pt};
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};

/// A parsed TrueType / OpenType font. Fonts are registered with a
/// [FontBook](crate::FontBook) under the name content blocks refer to, which
/// measures text with them during layout.
pub struct Font {
    pub face: OwnedFace,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("family", &self.family())
            .field("glyphs", &self.face.as_face_ref().number_of_glyphs())
            .finish()
    }
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, LayoutError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font { face })
    }

    /// Obtain the full name of the font, if it has one
    pub fn name(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FULL_NAME)
    }

    /// Obtain the family name of the font, if it has one
    pub fn family(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FAMILY)
    }

    fn name_entry(&self, id: u16) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    fn scaling(&self, size: Pt) -> f32 {
        size.0 / self.face.as_face_ref().units_per_em() as f32
    }

    /// Distance from the baseline to the top of the font at the given size
    pub fn ascent(&self, size: Pt) -> Mm {
        Pt(self.scaling(size) * self.face.as_face_ref().ascender() as f32).to_mm()
    }

    /// Distance from the baseline to the bottom of the font at the given size.
    /// Note: this is usually negative
    pub fn descent(&self, size: Pt) -> Mm {
        Pt(self.scaling(size) * self.face.as_face_ref().descender() as f32).to_mm()
    }

    /// Extra space between lines at the given size
    pub fn leading(&self, size: Pt) -> Mm {
        Pt(self.scaling(size) * self.face.as_face_ref().line_gap() as f32).to_mm()
    }

    /// How far to move down from one line of text to the next
    pub fn line_height(&self, size: Pt) -> Mm {
        self.leading(size) + self.ascent(size) - self.descent(size)
    }

    /// Width of a string at the given size. Characters the font has no glyph
    /// for are measured as the replacement glyph, matching what gets drawn.
    pub fn width_of_text(&self, text: &str, size: Pt) -> Mm {
        let scaling = self.scaling(size);
        let advance: f32 = text
            .chars()
            .filter_map(|ch| self.glyph_id(ch).or_else(|| self.replacement_glyph_id()))
            .map(|gid| {
                self.face
                    .as_face_ref()
                    .glyph_hor_advance(GlyphId(gid))
                    .unwrap_or_default() as f32
            })
            .sum();
        Pt(advance * scaling).to_mm()
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face.as_face_ref().glyph_index(ch).map(|i| i.0)
    }

    /// The glyph drawn for characters the font doesn't cover: U+FFFD if the
    /// font has it, otherwise '?'
    pub fn replacement_glyph_id(&self) -> Option<u16> {
        self.glyph_id('\u{FFFD}').or_else(|| self.glyph_id('?'))
    }
}
