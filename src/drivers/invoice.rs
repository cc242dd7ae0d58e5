use super::{columns, money, Typography};
use crate::{
    Align, ContentBlock, DocumentDriver, Info, LayoutError, Mm, PageGeometry, TableCell,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl LineItem {
    pub fn amount(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub number: String,
    pub issued: String,
    #[serde(default)]
    pub due: Option<String>,
    pub seller: String,
    pub buyer: String,
    #[serde(default)]
    pub currency: String,
    pub items: Vec<LineItem>,
    /// Tax as a fraction of the subtotal, e.g. 0.2
    #[serde(default)]
    pub tax_rate: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl InvoiceRecord {
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(LineItem::amount).sum()
    }

    pub fn tax(&self) -> f64 {
        self.tax_rate.map_or(0.0, |rate| self.subtotal() * rate)
    }

    pub fn total(&self) -> f64 {
        self.subtotal() + self.tax()
    }
}

/// Column headings and labels of the invoice table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceLabels {
    pub title: String,
    pub issued: String,
    pub due: String,
    pub seller: String,
    pub buyer: String,
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub amount: String,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
}

impl Default for InvoiceLabels {
    fn default() -> Self {
        InvoiceLabels {
            title: "Invoice".into(),
            issued: "Issued".into(),
            due: "Due".into(),
            seller: "From".into(),
            buyer: "To".into(),
            description: "Description".into(),
            quantity: "Qty".into(),
            unit_price: "Unit price".into(),
            amount: "Amount".into(),
            subtotal: "Subtotal".into(),
            tax: "Tax".into(),
            total: "Total".into(),
        }
    }
}

/// Invoices: a header paragraph, one table row per line item, then the
/// totals
#[derive(Debug, Clone)]
pub struct InvoiceDriver {
    pub typography: Typography,
    pub labels: InvoiceLabels,
    column_widths: Vec<Mm>,
}

impl InvoiceDriver {
    /// The item table spans the content width of `geometry`
    pub fn new(typography: Typography, geometry: &PageGeometry) -> InvoiceDriver {
        InvoiceDriver {
            typography,
            labels: InvoiceLabels::default(),
            column_widths: columns(geometry, &[10.0, 2.0, 3.0, 3.0]),
        }
    }

    pub fn column_widths(&self) -> &[Mm] {
        &self.column_widths
    }

    fn row(&self, cells: Vec<TableCell>, strong: bool) -> Result<ContentBlock, LayoutError> {
        let t = &self.typography;
        let font = if strong { &t.strong_font } else { &t.table_font };
        ContentBlock::table_row(cells, self.column_widths.clone(), font.as_str(), t.table_size)
    }

    /// A row with a label spanning the first columns and a figure in the last
    fn total_row(&self, label: &str, amount: String) -> Result<ContentBlock, LayoutError> {
        let label_width: Mm = self.column_widths[..3].iter().copied().sum();
        let t = &self.typography;
        ContentBlock::table_row(
            vec![TableCell::right(label), TableCell::right(amount)],
            vec![label_width, self.column_widths[3]],
            t.strong_font.as_str(),
            t.table_size,
        )
    }
}

impl DocumentDriver for InvoiceDriver {
    type Record = InvoiceRecord;

    fn blocks(&self, record: &InvoiceRecord) -> Result<Vec<ContentBlock>, LayoutError> {
        let t = &self.typography;
        let l = &self.labels;
        let currency = record.currency.as_str();

        let mut header = format!(
            "{}: {}\n{}: {}\n{}: {}",
            l.seller, record.seller, l.buyer, record.buyer, l.issued, record.issued
        );
        if let Some(due) = &record.due {
            header.push_str(&format!("\n{}: {}", l.due, due));
        }

        let mut blocks = vec![
            ContentBlock::paragraph(
                format!("{} {}", l.title, record.number),
                t.heading_font.as_str(),
                t.heading_size,
                false,
            ),
            ContentBlock::paragraph(header, t.body_font.as_str(), t.body_size, false),
            ContentBlock::spacer(Mm(4.0)),
            self.row(
                vec![
                    TableCell::left(l.description.as_str()),
                    TableCell::right(l.quantity.as_str()),
                    TableCell::right(l.unit_price.as_str()),
                    TableCell::right(l.amount.as_str()),
                ],
                true,
            )?,
        ];

        for item in &record.items {
            blocks.push(self.row(
                vec![
                    TableCell::left(item.description.as_str()),
                    TableCell::new(format_quantity(item.quantity), Align::Right),
                    TableCell::right(money(item.unit_price, "")),
                    TableCell::right(money(item.amount(), "")),
                ],
                false,
            )?);
        }

        if record.tax_rate.is_some() {
            blocks.push(self.total_row(&l.subtotal, money(record.subtotal(), currency))?);
            blocks.push(self.total_row(&l.tax, money(record.tax(), currency))?);
        }
        blocks.push(self.total_row(&l.total, money(record.total(), currency))?);

        if let Some(notes) = &record.notes {
            blocks.push(ContentBlock::spacer(Mm(4.0)));
            blocks.push(ContentBlock::paragraph(
                notes.as_str(),
                t.body_font.as_str(),
                t.body_size,
                t.justify,
            ));
        }
        Ok(blocks)
    }

    fn info(&self, record: &InvoiceRecord) -> Option<Info> {
        let mut info = Info::new();
        info.title(format!("{} {}", self.labels.title, record.number))
            .author(&record.seller);
        Some(info)
    }
}

fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{quantity:.0}")
    } else {
        format!("{quantity}")
    }
}
