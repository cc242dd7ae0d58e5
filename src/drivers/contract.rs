use super::Typography;
use crate::{ContentBlock, DocumentDriver, Info, LayoutError, Mm};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    /// The party's role in the agreement, e.g. "Client"
    pub role: String,
    pub name: String,
    /// Address, registration number and the like
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub title: String,
    /// One entry per paragraph
    pub paragraphs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub title: String,
    #[serde(default)]
    pub reference: Option<String>,
    pub parties: Vec<Party>,
    /// Opening sentence, followed by the list of parties
    #[serde(default)]
    pub intro: Option<String>,
    pub clauses: Vec<Clause>,
    /// Closing line above the signatures, e.g. place and date
    #[serde(default)]
    pub closing: Option<String>,
}

/// Contracts: a title, the parties, numbered clauses and a signature line
/// per party
#[derive(Debug, Clone, Default)]
pub struct ContractDriver {
    pub typography: Typography,
}

impl ContractDriver {
    pub fn new(typography: Typography) -> ContractDriver {
        ContractDriver { typography }
    }

    fn body(&self, text: &str) -> ContentBlock {
        let t = &self.typography;
        ContentBlock::paragraph(text, t.body_font.as_str(), t.body_size, t.justify)
    }
}

impl DocumentDriver for ContractDriver {
    type Record = ContractRecord;

    fn blocks(&self, record: &ContractRecord) -> Result<Vec<ContentBlock>, LayoutError> {
        let t = &self.typography;
        let mut blocks = vec![ContentBlock::paragraph(
            record.title.as_str(),
            t.heading_font.as_str(),
            t.heading_size,
            false,
        )];
        if let Some(reference) = &record.reference {
            blocks.push(ContentBlock::paragraph(
                reference.as_str(),
                t.body_font.as_str(),
                t.body_size,
                false,
            ));
        }
        blocks.push(ContentBlock::spacer(Mm(4.0)));

        if let Some(intro) = &record.intro {
            blocks.push(self.body(intro));
        }
        for party in &record.parties {
            let text = match &party.details {
                Some(details) => format!("{}, {} (the \"{}\")", party.name, details, party.role),
                None => format!("{} (the \"{}\")", party.name, party.role),
            };
            blocks.push(self.body(&text));
        }
        blocks.push(ContentBlock::spacer(Mm(2.0)));

        for (number, clause) in record.clauses.iter().enumerate() {
            blocks.push(ContentBlock::clause_title(
                format!("{}. {}", number + 1, clause.title),
                t.strong_font.as_str(),
                t.strong_size,
            ));
            blocks.extend(clause.paragraphs.iter().map(|p| self.body(p)));
        }

        if let Some(closing) = &record.closing {
            blocks.push(ContentBlock::spacer(Mm(4.0)));
            blocks.push(self.body(closing));
        }
        blocks.extend(
            record
                .parties
                .iter()
                .map(|party| ContentBlock::signature(format!("{} ({})", party.name, party.role))),
        );
        Ok(blocks)
    }

    fn info(&self, record: &ContractRecord) -> Option<Info> {
        let mut info = Info::new();
        info.title(&record.title);
        if let Some(reference) = &record.reference {
            info.subject(reference);
        }
        Some(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ContractRecord {
        serde_json::from_str(
            r#"{
                "title": "Service Agreement",
                "reference": "No. 2024/17",
                "intro": "This agreement is made between:",
                "parties": [
                    { "role": "Client", "name": "Acme Ltd", "details": "1 Main Street" },
                    { "role": "Contractor", "name": "Jane Roe" }
                ],
                "clauses": [
                    { "title": "Scope", "paragraphs": ["The contractor builds things.", "Carefully."] },
                    { "title": "Payment", "paragraphs": ["Monthly."] }
                ],
                "closing": "Signed in two copies."
            }"#,
        )
        .expect("valid record")
    }

    #[test]
    fn numbers_clauses_and_signs_for_every_party() {
        let blocks = ContractDriver::default().blocks(&record()).expect("blocks");

        let titles: Vec<&str> = blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ClauseTitle { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(titles, vec!["1. Scope", "2. Payment"]);

        let signatures: Vec<&str> = blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::SignatureLine { label } => Some(label.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(signatures, vec!["Acme Ltd (Client)", "Jane Roe (Contractor)"]);
        assert!(matches!(blocks.last(), Some(ContentBlock::SignatureLine { .. })));
    }

    #[test]
    fn describes_parties_from_the_record() {
        let blocks = ContractDriver::default().blocks(&record()).expect("blocks");
        let texts: Vec<&str> = blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Paragraph { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"Acme Ltd, 1 Main Street (the \"Client\")"));
        assert!(texts.contains(&"Jane Roe (the \"Contractor\")"));
    }

    #[test]
    fn titles_the_pdf_metadata() {
        let info = ContractDriver::default().info(&record()).expect("info");
        assert_eq!(info.title.as_deref(), Some("Service Agreement"));
        assert_eq!(info.subject.as_deref(), Some("No. 2024/17"));
    }
}
