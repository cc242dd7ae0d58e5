use crate::metrics::GlyphMetrics;
use crate::{Mm, Pt};

/// A word of a justified line and its offset from the start of the line
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedWord {
    pub text: String,
    pub x_offset: Mm,
}

/// Spreads `words` across `target_width` so the first word starts at 0 and
/// the last word ends at `target_width`. The width deficit is shared equally
/// by every gap between words.
///
/// Lines of fewer than two words have no gap to stretch and come back left
/// aligned. If the words are already wider than the target, the gaps are
/// clamped to zero rather than made to overlap.
pub fn justify(
    words: &[&str],
    font: &str,
    size: Pt,
    target_width: Mm,
    metrics: &dyn GlyphMetrics,
) -> Vec<PositionedWord> {
    let widths: Vec<Mm> = words
        .iter()
        .map(|word| metrics.measure(word, font, size))
        .collect();

    let gap = if words.len() < 2 {
        Mm::ZERO
    } else {
        let text_width: Mm = widths.iter().copied().sum();
        let spare = (target_width - text_width).max(Mm::ZERO);
        spare / (words.len() - 1) as f32
    };

    let mut x = Mm::ZERO;
    words
        .iter()
        .zip(widths)
        .map(|(word, width)| {
            let positioned = PositionedWord {
                text: word.to_string(),
                x_offset: x,
            };
            x += width + gap;
            positioned
        })
        .collect()
}
