//! A paginating typesetting engine for business documents.
//!
//! Document drivers describe a document as a sequence of [ContentBlock]s;
//! a [Document] wraps and justifies the text, flows every block onto as
//! many pages as it needs without ever splitting a line or table row, then
//! composites running headers, footers and a watermark onto every page. The
//! resulting [Page]s are plain lists of positioned [DrawCommand]s, which
//! [write_pdf] turns into a PDF.
//!
//! ```
//! use docflow::{ContentBlock, Document, MonospaceMetrics, Pt};
//!
//! let metrics = MonospaceMetrics::default();
//! let document = Document::new(&metrics);
//! let rendered = document
//!     .render(&[
//!         ContentBlock::clause_title("1. Scope", "Helvetica-Bold", Pt(11.0)),
//!         ContentBlock::paragraph("The contractor delivers the work.", "Helvetica", Pt(10.0), true),
//!     ])
//!     .unwrap();
//! assert_eq!(rendered.page_count(), 1);
//! ```

mod asset;
pub use asset::*;

mod block;
pub use block::*;

mod config;
pub use config::*;

mod decorate;
pub use decorate::*;

mod document;
pub use document::*;

/// Reference drivers for contracts, proposals, invoices and audit logs
pub mod drivers;

mod error;
pub use error::*;

mod flow;
pub use flow::*;

mod font;
pub use font::*;

mod geometry;
pub use geometry::*;

mod info;
pub use info::*;

/// Utility functions and structures to layout text into lines
pub mod layout;

mod metrics;
pub use metrics::*;

mod page;
pub use page::*;

pub mod pagesize;

mod pdf;
pub use pdf::{base_font, write_pdf, BASE_FONTS};

pub(crate) mod refs;

mod units;
pub use units::*;

#[cfg(test)]
mod test_support;
