//! Deterministic metrics for unit tests: widths are simple functions of the
//! text so expected positions can be worked out by hand.

use crate::metrics::GlyphMetrics;
use crate::{Mm, Pt};
use std::collections::HashMap;

/// Every character is `char_width` millimetres wide and every line
/// `line_height` millimetres tall, whatever the font or size
#[derive(Debug, Copy, Clone)]
pub(crate) struct UnitMetrics {
    pub char_width: f32,
    pub line_height: f32,
}

impl Default for UnitMetrics {
    fn default() -> Self {
        UnitMetrics {
            char_width: 1.0,
            line_height: 5.0,
        }
    }
}

impl GlyphMetrics for UnitMetrics {
    fn measure(&self, text: &str, _font: &str, _size: Pt) -> Mm {
        Mm(text.chars().count() as f32 * self.char_width)
    }

    fn line_height(&self, _font: &str, _size: Pt) -> Mm {
        Mm(self.line_height)
    }

    fn ascent(&self, _font: &str, _size: Pt) -> Mm {
        Mm(self.line_height * 0.8)
    }
}

/// Looks widths up in a table, falling back to [UnitMetrics] for anything
/// not listed
#[derive(Debug, Clone, Default)]
pub(crate) struct TableMetrics {
    widths: HashMap<String, f32>,
    fallback: UnitMetrics,
}

impl TableMetrics {
    pub fn new(widths: &[(&str, f32)]) -> TableMetrics {
        TableMetrics {
            widths: widths.iter().map(|&(w, mm)| (w.to_string(), mm)).collect(),
            fallback: UnitMetrics::default(),
        }
    }
}

impl GlyphMetrics for TableMetrics {
    fn measure(&self, text: &str, font: &str, size: Pt) -> Mm {
        match self.widths.get(text) {
            Some(&mm) => Mm(mm),
            None => self.fallback.measure(text, font, size),
        }
    }

    fn line_height(&self, font: &str, size: Pt) -> Mm {
        self.fallback.line_height(font, size)
    }
}
