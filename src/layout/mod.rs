//! Line-level text layout: breaking paragraphs into lines and justifying them.
//!
//! Both functions work purely in terms of a [GlyphMetrics](crate::GlyphMetrics)
//! provider and know nothing about pages; the [FlowController](crate::FlowController)
//! decides where the resulting lines go.
//!
//! # Example
//!
//! ```
//! use docflow::layout::{justify, wrap};
//! use docflow::{MonospaceMetrics, Mm, Pt};
//!
//! let metrics = MonospaceMetrics::default();
//! let lines: Vec<_> = wrap("The quick brown fox jumps over the lazy dog", "Helvetica", Pt(10.0), Mm(40.0), &metrics).collect();
//! assert!(lines.len() > 1);
//!
//! let first = &lines[0];
//! let words = justify(&first.words(), "Helvetica", Pt(10.0), Mm(40.0), &metrics);
//! assert_eq!(words.len(), first.words().len());
//! ```

mod justify;
mod wrap;

pub use justify::*;
pub use wrap::*;
