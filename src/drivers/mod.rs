//! Reference document drivers.
//!
//! Each driver turns one kind of business record into a block sequence and
//! nothing more: every record type goes through the same flow controller and
//! decorator pass. Wording comes from the records themselves, so the same
//! drivers serve any language or house style.

use crate::geometry::PageGeometry;
use crate::{Mm, Pt};
use serde::{Deserialize, Serialize};

mod audit_log;
mod contract;
mod invoice;
mod proposal;

pub use audit_log::*;
pub use contract::*;
pub use invoice::*;
pub use proposal::*;

/// The fonts and sizes drivers set their blocks in. Font names are looked
/// up in whatever [GlyphMetrics](crate::GlyphMetrics) the document measures
/// with; the defaults are PDF base fonts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Typography {
    /// Document titles
    pub heading_font: String,
    pub heading_size: Pt,
    /// Clause titles and table header rows
    pub strong_font: String,
    pub strong_size: Pt,
    pub body_font: String,
    pub body_size: Pt,
    pub table_font: String,
    pub table_size: Pt,
    /// Justify body paragraphs
    pub justify: bool,
}

impl Default for Typography {
    fn default() -> Self {
        Typography {
            heading_font: "Helvetica-Bold".into(),
            heading_size: Pt(16.0),
            strong_font: "Helvetica-Bold".into(),
            strong_size: Pt(11.0),
            body_font: "Helvetica".into(),
            body_size: Pt(10.0),
            table_font: "Helvetica".into(),
            table_size: Pt(9.0),
            justify: true,
        }
    }
}

/// Split the content width of `geometry` into columns proportional to
/// `weights`
pub(crate) fn columns(geometry: &PageGeometry, weights: &[f32]) -> Vec<Mm> {
    let total: f32 = weights.iter().sum();
    let width = geometry.content_width();
    weights.iter().map(|w| width * (w / total)).collect()
}

/// Two decimal places, thousands separated by spaces
pub(crate) fn money(amount: f64, currency: &str) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    let number = format!("{sign}{grouped}.{:02}", cents % 100);
    if currency.is_empty() {
        number
    } else {
        format!("{number} {currency}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_money() {
        assert_eq!(money(0.0, ""), "0.00");
        assert_eq!(money(1234.5, "EUR"), "1 234.50 EUR");
        assert_eq!(money(-999.999, ""), "-1 000.00");
        assert_eq!(money(1_000_000.0, "USD"), "1 000 000.00 USD");
    }

    #[test]
    fn columns_fill_the_content_width() {
        let geometry = PageGeometry::a4();
        let widths = columns(&geometry, &[2.0, 1.0, 1.0]);
        assert!(widths[0].approx_eq(Mm(85.0), 1e-3));
        let total: Mm = widths.into_iter().sum();
        assert!(total.approx_eq(geometry.content_width(), 1e-3));
    }
}
