use crate::metrics::GlyphMetrics;
use crate::{Mm, Pt};
use std::iter::Peekable;
use std::str::{Split, SplitWhitespace};

/// One wrapped line of a paragraph
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    /// Whether this is the final line of its paragraph (or of a hard line
    /// within it). Final lines are never justified.
    pub last: bool,
}

impl Line {
    pub fn words(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<Line> for String {
    fn from(line: Line) -> String {
        line.text
    }
}

/// Lazily breaks a paragraph into lines no wider than a maximum width.
///
/// Words are whitespace-delimited and accumulated greedily. A word that is
/// wider than the line on its own gets a line to itself rather than being
/// split. Newlines in the text force a break, and blank lines between text
/// come out as empty lines.
///
/// The iterator is cheap to clone, and a clone restarts from wherever the
/// original was, so wrapping can be re-run without re-measuring the input
/// up front.
#[derive(Clone)]
pub struct Lines<'a> {
    metrics: &'a dyn GlyphMetrics,
    font: &'a str,
    size: Pt,
    max_width: Mm,
    space_width: Mm,
    hard_lines: Option<Split<'a, char>>,
    words: Option<Peekable<SplitWhitespace<'a>>>,
}

/// Wrap `text` set in `font` at `size` so every line fits within `max_width`
pub fn wrap<'a>(
    text: &'a str,
    font: &'a str,
    size: Pt,
    max_width: Mm,
    metrics: &'a dyn GlyphMetrics,
) -> Lines<'a> {
    let text = text.trim();
    Lines {
        metrics,
        font,
        size,
        max_width,
        space_width: metrics.measure(" ", font, size),
        hard_lines: (!text.is_empty()).then(|| text.split('\n')),
        words: None,
    }
}

impl Iterator for Lines<'_> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        loop {
            if let Some(words) = self.words.as_mut() {
                if let Some(first) = words.next() {
                    let mut text = String::from(first);
                    let mut width = self.metrics.measure(first, self.font, self.size);

                    while let Some(&word) = words.peek() {
                        let word_width = self.metrics.measure(word, self.font, self.size);
                        if width + self.space_width + word_width > self.max_width {
                            break;
                        }
                        width += self.space_width + word_width;
                        text.push(' ');
                        text.push_str(word);
                        words.next();
                    }

                    let last = words.peek().is_none();
                    return Some(Line { text, last });
                }
                self.words = None;
                continue;
            }

            let hard_line = self.hard_lines.as_mut()?.next()?;
            if hard_line.trim().is_empty() {
                return Some(Line {
                    text: String::new(),
                    last: true,
                });
            }
            self.words = Some(hard_line.split_whitespace().peekable());
        }
    }
}
