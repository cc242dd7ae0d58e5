use crate::asset::ImageAsset;
use crate::{LayoutError, Mm, Pt};
use serde::{Deserialize, Serialize};

/// Horizontal alignment of text within a table cell
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub text: String,
    pub align: Align,
}

impl TableCell {
    pub fn new<S: Into<String>>(text: S, align: Align) -> TableCell {
        TableCell {
            text: text.into(),
            align,
        }
    }

    pub fn left<S: Into<String>>(text: S) -> TableCell {
        TableCell::new(text, Align::Left)
    }

    pub fn right<S: Into<String>>(text: S) -> TableCell {
        TableCell::new(text, Align::Right)
    }

    pub fn center<S: Into<String>>(text: S) -> TableCell {
        TableCell::new(text, Align::Center)
    }
}

/// The vocabulary document drivers speak to the engine. A document is an
/// ordered list of blocks; the engine only ever reads them.
///
/// Prefer the constructor functions over building variants by hand: they
/// check the invariants the flow controller relies on (for instance that a
/// table row has one width per cell).
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Paragraph {
        text: String,
        font: String,
        size: Pt,
        justified: bool,
    },
    /// A heading that is kept on the same page as the content following it
    ClauseTitle {
        text: String,
        font: String,
        size: Pt,
    },
    /// One table row; never split across pages
    TableRow {
        cells: Vec<TableCell>,
        column_widths: Vec<Mm>,
        font: String,
        size: Pt,
    },
    Spacer {
        height: Mm,
    },
    ImageBlock {
        asset: ImageAsset,
        max_width: Mm,
        max_height: Mm,
    },
    /// Room for a signature, a rule to sign on and a label under it
    SignatureLine {
        label: String,
    },
    /// Start the following content on a new page
    PageBreak,
}

impl ContentBlock {
    pub fn paragraph<S: Into<String>, F: Into<String>>(
        text: S,
        font: F,
        size: Pt,
        justified: bool,
    ) -> ContentBlock {
        ContentBlock::Paragraph {
            text: text.into(),
            font: font.into(),
            size,
            justified,
        }
    }

    pub fn clause_title<S: Into<String>, F: Into<String>>(
        text: S,
        font: F,
        size: Pt,
    ) -> ContentBlock {
        ContentBlock::ClauseTitle {
            text: text.into(),
            font: font.into(),
            size,
        }
    }

    /// Build a table row, checking that there is exactly one positive column
    /// width per cell
    pub fn table_row<F: Into<String>>(
        cells: Vec<TableCell>,
        column_widths: Vec<Mm>,
        font: F,
        size: Pt,
    ) -> Result<ContentBlock, LayoutError> {
        check_table_shape(&cells, &column_widths)?;
        Ok(ContentBlock::TableRow {
            cells,
            column_widths,
            font: font.into(),
            size,
        })
    }

    /// Check the invariants the constructors enforce, for blocks that were
    /// built by hand
    pub fn validate(&self) -> Result<(), LayoutError> {
        match self {
            ContentBlock::TableRow {
                cells,
                column_widths,
                ..
            } => check_table_shape(cells, column_widths),
            _ => Ok(()),
        }
    }

    pub fn spacer(height: Mm) -> ContentBlock {
        ContentBlock::Spacer { height }
    }

    pub fn image(asset: ImageAsset, max_width: Mm, max_height: Mm) -> ContentBlock {
        ContentBlock::ImageBlock {
            asset,
            max_width,
            max_height,
        }
    }

    pub fn signature<S: Into<String>>(label: S) -> ContentBlock {
        ContentBlock::SignatureLine {
            label: label.into(),
        }
    }
}

fn check_table_shape(cells: &[TableCell], column_widths: &[Mm]) -> Result<(), LayoutError> {
    if cells.len() != column_widths.len() {
        return Err(LayoutError::TableShape {
            cells: cells.len(),
            columns: column_widths.len(),
        });
    }
    match column_widths
        .iter()
        .position(|w| !(w.0.is_finite() && w.0 > 0.0))
    {
        Some(index) => Err(LayoutError::InvalidColumn { index }),
        None => Ok(()),
    }
}
