use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use patent_valuation::portfolio::{
    IntelligenceEntry, NewIntelligence, NewWorkstream, Patent, PatentDraft, PatentId,
    PortfolioRepository, PortfolioSeed, RepositoryError, SeedPatent, Workstream, WorkstreamId,
};
use patent_valuation::scoring::BibliographicIndicators;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct PortfolioTables {
    patents: BTreeMap<PatentId, Patent>,
    workstreams: Vec<Workstream>,
    intelligence: Vec<IntelligenceEntry>,
}

/// Process-local store; ids start at 1 like an auto-increment key.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPortfolioRepository {
    tables: Arc<Mutex<PortfolioTables>>,
    next_patent: Arc<AtomicU64>,
    next_workstream: Arc<AtomicU64>,
    next_intelligence: Arc<AtomicU64>,
}

impl InMemoryPortfolioRepository {
    fn tables(&self) -> Result<MutexGuard<'_, PortfolioTables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("portfolio store lock poisoned".to_string()))
    }
}

fn next_id(counter: &AtomicU64) -> u64 {
    counter.fetch_add(1, Ordering::Relaxed) + 1
}

impl PortfolioRepository for InMemoryPortfolioRepository {
    fn insert_patent(&self, mut patent: Patent) -> Result<Patent, RepositoryError> {
        let mut tables = self.tables()?;
        if tables
            .patents
            .values()
            .any(|existing| existing.number == patent.number)
        {
            return Err(RepositoryError::Conflict);
        }
        patent.id = PatentId(next_id(&self.next_patent));
        tables.patents.insert(patent.id, patent.clone());
        Ok(patent)
    }

    fn update_patent(&self, patent: Patent) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        match tables.patents.get_mut(&patent.id) {
            Some(slot) => {
                *slot = patent;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_patent(&self, id: PatentId) -> Result<Option<Patent>, RepositoryError> {
        Ok(self.tables()?.patents.get(&id).cloned())
    }

    fn list_patents(&self) -> Result<Vec<Patent>, RepositoryError> {
        Ok(self.tables()?.patents.values().cloned().collect())
    }

    fn insert_workstream(&self, workstream: NewWorkstream) -> Result<Workstream, RepositoryError> {
        let mut tables = self.tables()?;
        let stored = Workstream {
            id: WorkstreamId(next_id(&self.next_workstream)),
            name: workstream.name,
            stage: workstream.stage,
            progress: workstream.progress,
        };
        tables.workstreams.push(stored.clone());
        Ok(stored)
    }

    fn list_workstreams(&self) -> Result<Vec<Workstream>, RepositoryError> {
        Ok(self.tables()?.workstreams.clone())
    }

    fn append_intelligence(
        &self,
        entry: NewIntelligence,
    ) -> Result<IntelligenceEntry, RepositoryError> {
        let mut tables = self.tables()?;
        let stored = IntelligenceEntry {
            id: next_id(&self.next_intelligence),
            title: entry.title,
            detail: entry.detail,
            timestamp: entry.timestamp,
        };
        tables.intelligence.push(stored.clone());
        Ok(stored)
    }

    fn list_intelligence(&self) -> Result<Vec<IntelligenceEntry>, RepositoryError> {
        Ok(self.tables()?.intelligence.clone())
    }
}

/// Three workstreams, one patent per workstream, and a starter intelligence feed.
pub(crate) fn sample_portfolio() -> PortfolioSeed {
    let now = Utc::now();
    let workstream = |name: &str, stage: &str, progress: u8| NewWorkstream {
        name: name.to_string(),
        stage: stage.to_string(),
        progress,
    };
    let note = |title: &str, detail: &str| NewIntelligence {
        title: title.to_string(),
        detail: detail.to_string(),
        timestamp: now,
    };

    PortfolioSeed {
        workstreams: vec![
            workstream("Photonics portfolio", "In review", 74),
            workstream("Biopolymer claims", "Drafting", 52),
            workstream("Grid storage strategy", "Negotiation", 81),
        ],
        patents: vec![
            SeedPatent {
                workstream_index: Some(0),
                draft: sample_draft(
                    [
                        "US-11223344-B2",
                        "Quantum photonic routing device",
                        "US",
                        "Aurum Labs",
                        "Photonics",
                    ],
                    (18, 6, 4, 16, 7),
                    &["US allowance received", "EU search report favorable"],
                ),
            },
            SeedPatent {
                workstream_index: Some(1),
                draft: sample_draft(
                    [
                        "EP-99887766-A1",
                        "Biopolymer lattice for implant stability",
                        "EP",
                        "Helix Materials",
                        "Biopolymers",
                    ],
                    (8, 14, 2, 12, 4),
                    &["Office action issued", "Response submitted"],
                ),
            },
            SeedPatent {
                workstream_index: Some(2),
                draft: sample_draft(
                    [
                        "WO-2024-554433",
                        "Grid storage dispatch optimizer",
                        "WO",
                        "Voltage Dynamics",
                        "Energy storage",
                    ],
                    (12, 9, 3, 9, 5),
                    &["JP national phase entered"],
                ),
            },
        ],
        intelligence: vec![
            note(
                "New priority citation",
                "JP-2025-9981 linked to your core claim set.",
            ),
            note(
                "Competitor shift",
                "Zenith Labs increased filings by 18% in optics.",
            ),
            note(
                "Grant velocity",
                "Median review time dropped to 11.2 months.",
            ),
        ],
    }
}

/// `labels` is number, title, jurisdiction, assignee, tech tag; `counts` is
/// forward, backward, independent, dependent, family.
fn sample_draft(
    labels: [&str; 5],
    counts: (u32, u32, u32, u32, u32),
    legal_events: &[&str],
) -> PatentDraft {
    let [number, title, jurisdiction, assignee, tech_tag] = labels;
    let (citations_forward, citations_backward, claims_independent, claims_dependent, family_size) =
        counts;

    PatentDraft {
        number: number.to_string(),
        title: title.to_string(),
        jurisdiction: jurisdiction.to_string(),
        assignee: assignee.to_string(),
        tech_tag: tech_tag.to_string(),
        workstream_id: None,
        indicators: BibliographicIndicators {
            citations_forward,
            citations_backward,
            claims_independent,
            claims_dependent,
            family_size,
        },
        legal_events: legal_events.iter().map(|event| event.to_string()).collect(),
    }
}
