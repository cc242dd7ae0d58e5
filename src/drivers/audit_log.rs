use super::{columns, Typography};
use crate::{ContentBlock, DocumentDriver, Info, LayoutError, Mm, PageGeometry, TableCell};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: String,
    pub actor: String,
    pub action: String,
    #[serde(default)]
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogRecord {
    pub title: String,
    /// Free-form description of the period covered, e.g. "March 2024"
    pub period: String,
    pub entries: Vec<AuditEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditLogLabels {
    pub period: String,
    pub timestamp: String,
    pub actor: String,
    pub action: String,
    pub detail: String,
    /// Shown instead of the table when nothing happened in the period
    pub empty: String,
}

impl Default for AuditLogLabels {
    fn default() -> Self {
        AuditLogLabels {
            period: "Period".into(),
            timestamp: "Time".into(),
            actor: "User".into(),
            action: "Action".into(),
            detail: "Detail".into(),
            empty: "No activity was recorded in this period.".into(),
        }
    }
}

/// Audit logs and other period reports: a period header and one table row
/// per entry. Long logs run over as many pages as they need; rows are never
/// split.
#[derive(Debug, Clone)]
pub struct AuditLogDriver {
    pub typography: Typography,
    pub labels: AuditLogLabels,
    column_widths: Vec<Mm>,
}

impl AuditLogDriver {
    pub fn new(typography: Typography, geometry: &PageGeometry) -> AuditLogDriver {
        AuditLogDriver {
            typography,
            labels: AuditLogLabels::default(),
            column_widths: columns(geometry, &[3.0, 2.5, 2.5, 6.0]),
        }
    }

    fn row(&self, cells: [&str; 4], font: &str) -> Result<ContentBlock, LayoutError> {
        ContentBlock::table_row(
            cells.into_iter().map(TableCell::left).collect(),
            self.column_widths.clone(),
            font,
            self.typography.table_size,
        )
    }
}

impl DocumentDriver for AuditLogDriver {
    type Record = AuditLogRecord;

    fn blocks(&self, record: &AuditLogRecord) -> Result<Vec<ContentBlock>, LayoutError> {
        let t = &self.typography;
        let l = &self.labels;
        let mut blocks = vec![
            ContentBlock::paragraph(
                record.title.as_str(),
                t.heading_font.as_str(),
                t.heading_size,
                false,
            ),
            ContentBlock::paragraph(
                format!("{}: {}", l.period, record.period),
                t.body_font.as_str(),
                t.body_size,
                false,
            ),
            ContentBlock::spacer(Mm(4.0)),
        ];

        if record.entries.is_empty() {
            blocks.push(ContentBlock::paragraph(
                l.empty.as_str(),
                t.body_font.as_str(),
                t.body_size,
                false,
            ));
            return Ok(blocks);
        }

        blocks.push(self.row(
            [
                l.timestamp.as_str(),
                l.actor.as_str(),
                l.action.as_str(),
                l.detail.as_str(),
            ],
            &t.strong_font,
        )?);
        for entry in &record.entries {
            blocks.push(self.row(
                [
                    entry.timestamp.as_str(),
                    entry.actor.as_str(),
                    entry.action.as_str(),
                    entry.detail.as_str(),
                ],
                &t.table_font,
            )?);
        }
        Ok(blocks)
    }

    fn info(&self, record: &AuditLogRecord) -> Option<Info> {
        let mut info = Info::new();
        info.title(&record.title).subject(&record.period);
        Some(info)
    }
}
