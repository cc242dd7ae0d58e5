use crate::asset::ImageAsset;
use crate::layout::PositionedWord;
use crate::{Mm, Pt};

/// Which pass put an image on the page. Decorations are recognised by their
/// layer so the decorator pass can be re-run without stacking duplicates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Layer {
    Content,
    Watermark,
    Header,
    Footer,
}

/// A single positioned drawing operation. Coordinates are millimetres from
/// the top-left corner of the page; for text, `y` is the top of the line box.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    TextRun {
        x: Mm,
        y: Mm,
        text: String,
        font: String,
        size: Pt,
    },
    /// A justified line: every word carries its own offset from `x`
    JustifiedTextRun {
        x: Mm,
        y: Mm,
        words: Vec<PositionedWord>,
        font: String,
        size: Pt,
    },
    ImageDraw {
        x: Mm,
        y: Mm,
        w: Mm,
        h: Mm,
        asset: ImageAsset,
        layer: Layer,
    },
    /// A thin horizontal stroke, used for signature lines and table rules
    Rule { x: Mm, y: Mm, width: Mm },
}

impl DrawCommand {
    /// The top edge of whatever this command draws
    pub fn y(&self) -> Mm {
        match self {
            DrawCommand::TextRun { y, .. }
            | DrawCommand::JustifiedTextRun { y, .. }
            | DrawCommand::ImageDraw { y, .. }
            | DrawCommand::Rule { y, .. } => *y,
        }
    }

    /// Move whatever this command draws vertically so its top edge sits at `y`
    pub fn set_y(&mut self, new_y: Mm) {
        match self {
            DrawCommand::TextRun { y, .. }
            | DrawCommand::JustifiedTextRun { y, .. }
            | DrawCommand::ImageDraw { y, .. }
            | DrawCommand::Rule { y, .. } => *y = new_y,
        }
    }

    /// The decoration layer of an image, `None` for everything else
    pub fn layer(&self) -> Option<Layer> {
        match self {
            DrawCommand::ImageDraw { layer, .. } => Some(*layer),
            _ => None,
        }
    }

    pub fn is_decoration(&self) -> bool {
        !matches!(self.layer(), None | Some(Layer::Content))
    }

    /// The text this command draws, with justified words joined by spaces
    pub fn text(&self) -> Option<String> {
        match self {
            DrawCommand::TextRun { text, .. } => Some(text.clone()),
            DrawCommand::JustifiedTextRun { words, .. } => Some(
                words
                    .iter()
                    .map(|w| w.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            _ => None,
        }
    }
}

/// One page of output: its position in the document and the draw commands
/// on it, in paint order. Pages only grow while content is being flowed;
/// afterwards the decorator pass adds the watermark underneath and the
/// header / footer on top.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub index: usize,
    pub commands: Vec<DrawCommand>,
}

impl Page {
    pub fn new(index: usize) -> Page {
        Page {
            index,
            commands: Vec::default(),
        }
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn add_text(&mut self, x: Mm, y: Mm, text: String, font: &str, size: Pt) {
        self.commands.push(DrawCommand::TextRun {
            x,
            y,
            text,
            font: font.to_string(),
            size,
        });
    }

    /// Whether nothing but decorations has been drawn on the page
    pub fn is_blank(&self) -> bool {
        self.commands.iter().all(DrawCommand::is_decoration)
    }

    /// All text on the page, one entry per text command, in paint order
    pub fn texts(&self) -> Vec<String> {
        self.commands.iter().filter_map(DrawCommand::text).collect()
    }
}
