use super::{columns, money, Typography};
use crate::{ContentBlock, DocumentDriver, Info, LayoutError, Mm, PageGeometry, TableCell};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalSection {
    pub title: String,
    pub paragraphs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalItem {
    pub description: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub title: String,
    pub client: String,
    pub prepared_by: String,
    #[serde(default)]
    pub valid_until: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub sections: Vec<ProposalSection>,
    #[serde(default)]
    pub items: Vec<ProposalItem>,
    #[serde(default)]
    pub currency: String,
}

impl ProposalRecord {
    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.price).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposalLabels {
    pub client: String,
    pub prepared_by: String,
    pub valid_until: String,
    pub pricing: String,
    pub item: String,
    pub price: String,
    pub total: String,
    pub accepted_by: String,
}

impl Default for ProposalLabels {
    fn default() -> Self {
        ProposalLabels {
            client: "Prepared for".into(),
            prepared_by: "Prepared by".into(),
            valid_until: "Valid until".into(),
            pricing: "Pricing".into(),
            item: "Item".into(),
            price: "Price".into(),
            total: "Total".into(),
            accepted_by: "Accepted on behalf of".into(),
        }
    }
}

/// Proposals: an introduction, titled sections, a pricing table and an
/// acceptance signature for the client
#[derive(Debug, Clone)]
pub struct ProposalDriver {
    pub typography: Typography,
    pub labels: ProposalLabels,
    column_widths: Vec<Mm>,
}

impl ProposalDriver {
    pub fn new(typography: Typography, geometry: &PageGeometry) -> ProposalDriver {
        ProposalDriver {
            typography,
            labels: ProposalLabels::default(),
            column_widths: columns(geometry, &[4.0, 1.0]),
        }
    }

    fn row(&self, cells: Vec<TableCell>, strong: bool) -> Result<ContentBlock, LayoutError> {
        let t = &self.typography;
        let font = if strong { &t.strong_font } else { &t.table_font };
        ContentBlock::table_row(cells, self.column_widths.clone(), font.as_str(), t.table_size)
    }

    fn body(&self, text: &str) -> ContentBlock {
        let t = &self.typography;
        ContentBlock::paragraph(text, t.body_font.as_str(), t.body_size, t.justify)
    }

    fn title(&self, text: &str) -> ContentBlock {
        let t = &self.typography;
        ContentBlock::clause_title(text, t.strong_font.as_str(), t.strong_size)
    }
}

impl DocumentDriver for ProposalDriver {
    type Record = ProposalRecord;

    fn blocks(&self, record: &ProposalRecord) -> Result<Vec<ContentBlock>, LayoutError> {
        let t = &self.typography;
        let l = &self.labels;

        let mut header = format!(
            "{}: {}\n{}: {}",
            l.client, record.client, l.prepared_by, record.prepared_by
        );
        if let Some(valid_until) = &record.valid_until {
            header.push_str(&format!("\n{}: {}", l.valid_until, valid_until));
        }

        let mut blocks = vec![
            ContentBlock::paragraph(
                record.title.as_str(),
                t.heading_font.as_str(),
                t.heading_size,
                false,
            ),
            ContentBlock::paragraph(header, t.body_font.as_str(), t.body_size, false),
            ContentBlock::spacer(Mm(4.0)),
        ];
        if let Some(summary) = &record.summary {
            blocks.push(self.body(summary));
        }

        for section in &record.sections {
            blocks.push(self.title(&section.title));
            blocks.extend(section.paragraphs.iter().map(|p| self.body(p)));
        }

        if !record.items.is_empty() {
            blocks.push(self.title(&l.pricing));
            blocks.push(self.row(
                vec![TableCell::left(l.item.as_str()), TableCell::right(l.price.as_str())],
                true,
            )?);
            for item in &record.items {
                blocks.push(self.row(
                    vec![
                        TableCell::left(item.description.as_str()),
                        TableCell::right(money(item.price, "")),
                    ],
                    false,
                )?);
            }
            blocks.push(self.row(
                vec![
                    TableCell::right(l.total.as_str()),
                    TableCell::right(money(record.total(), &record.currency)),
                ],
                true,
            )?);
        }

        blocks.push(ContentBlock::spacer(Mm(6.0)));
        blocks.push(ContentBlock::signature(format!(
            "{} {}",
            l.accepted_by, record.client
        )));
        Ok(blocks)
    }

    fn info(&self, record: &ProposalRecord) -> Option<Info> {
        let mut info = Info::new();
        info.title(&record.title)
            .author(&record.prepared_by)
            .subject(format!("{} {}", self.labels.client, record.client));
        Some(info)
    }
}
