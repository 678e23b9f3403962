use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::PatentDraft;
use crate::form::coerce_count;
use crate::scoring::BibliographicIndicators;

/// Failure while reading a patent CSV export.
#[derive(Debug, thiserror::Error)]
pub enum PatentImportError {
    #[error("failed to read patent export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid patent CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads bibliographic exports into patent drafts ready for scoring.
///
/// Expected headers: `Number`, `Title`, `Jurisdiction`, `Assignee`, `Tech Tag`,
/// `Forward Citations`, `Backward Citations`, `Independent Claims`,
/// `Dependent Claims`, `Family Size`, and optionally `Legal Events` (`;`-separated).
/// Count columns are coerced like form input, so blanks and stray text count as 0.
pub struct PatentCsvImporter;

impl PatentCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<PatentDraft>, PatentImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<PatentDraft>, PatentImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut drafts = Vec::new();

        for record in csv_reader.deserialize::<PatentRow>() {
            let row = record?;
            if row.number.trim().is_empty() {
                continue;
            }
            drafts.push(row.into_draft());
        }

        Ok(drafts)
    }
}

#[derive(Debug, Deserialize)]
struct PatentRow {
    #[serde(rename = "Number")]
    number: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Jurisdiction", default)]
    jurisdiction: String,
    #[serde(rename = "Assignee", default)]
    assignee: String,
    #[serde(rename = "Tech Tag", default)]
    tech_tag: String,
    #[serde(rename = "Forward Citations", default, deserialize_with = "count_cell")]
    citations_forward: u32,
    #[serde(rename = "Backward Citations", default, deserialize_with = "count_cell")]
    citations_backward: u32,
    #[serde(rename = "Independent Claims", default, deserialize_with = "count_cell")]
    claims_independent: u32,
    #[serde(rename = "Dependent Claims", default, deserialize_with = "count_cell")]
    claims_dependent: u32,
    #[serde(rename = "Family Size", default, deserialize_with = "count_cell")]
    family_size: u32,
    #[serde(rename = "Legal Events", default)]
    legal_events: Option<String>,
}

impl PatentRow {
    fn into_draft(self) -> PatentDraft {
        let legal_events = self
            .legal_events
            .as_deref()
            .map(|events| {
                events
                    .split(';')
                    .map(str::trim)
                    .filter(|event| !event.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        PatentDraft {
            number: self.number,
            title: self.title,
            jurisdiction: self.jurisdiction,
            assignee: self.assignee,
            tech_tag: self.tech_tag,
            workstream_id: None,
            indicators: BibliographicIndicators {
                citations_forward: self.citations_forward,
                citations_backward: self.citations_backward,
                claims_independent: self.claims_independent,
                claims_dependent: self.claims_dependent,
                family_size: self.family_size,
            },
            legal_events,
        }
    }
}

fn count_cell<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(coerce_count).unwrap_or(0))
}
