use thiserror::Error;

/// All errors that the crate can generate.
///
/// Layout itself never fails on content: cosmetic problems (unknown fonts,
/// unusable decoration images, oversized units) degrade the output and are
/// reported as [LayoutWarning](crate::LayoutWarning)s instead.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("invalid page geometry: {0}")]
    /// The page geometry leaves no room to place anything
    InvalidGeometry(String),

    #[error("table row has {cells} cells but {columns} column widths")]
    /// A table row was built with a cell count that doesn't match its columns
    TableShape { cells: usize, columns: usize },

    #[error("table column {index} has a non-positive width")]
    /// A table column width was zero, negative or not a number
    InvalidColumn { index: usize },

    #[error("the flow controller has been finalized and accepts no further blocks")]
    /// A block was pushed after the document was finalized
    Finalized,

    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to decode the image
    Image(#[from] image::ImageError),

    #[error(transparent)]
    /// The render configuration could not be parsed
    Config(#[from] serde_json::Error),
}
