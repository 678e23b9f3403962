use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::portfolio::domain::{
    IntelligenceEntry, NewIntelligence, NewWorkstream, Patent, PatentDraft, PatentId, Workstream,
    WorkstreamId,
};
use crate::portfolio::repository::{PortfolioRepository, RepositoryError};
use crate::portfolio::{portfolio_router, PortfolioService};
use crate::scoring::BibliographicIndicators;

pub(super) fn strong_indicators() -> BibliographicIndicators {
    BibliographicIndicators {
        citations_forward: 18,
        citations_backward: 6,
        claims_independent: 4,
        claims_dependent: 16,
        family_size: 7,
    }
}

pub(super) fn weak_indicators() -> BibliographicIndicators {
    BibliographicIndicators {
        citations_forward: 0,
        citations_backward: 20,
        claims_independent: 1,
        claims_dependent: 2,
        family_size: 1,
    }
}

pub(super) fn draft(number: &str, indicators: BibliographicIndicators) -> PatentDraft {
    PatentDraft {
        number: number.to_string(),
        title: format!("Adaptive photonic router {number}"),
        jurisdiction: "US".to_string(),
        assignee: "Lumen Dynamics".to_string(),
        tech_tag: "Photonics".to_string(),
        workstream_id: None,
        indicators,
        legal_events: vec!["Allowance received".to_string()],
    }
}

pub(super) fn build_service() -> (PortfolioService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = PortfolioService::new(repository.clone());
    (service, repository)
}

pub(super) fn router_with_service(service: PortfolioService<MemoryRepository>) -> axum::Router {
    portfolio_router(Arc::new(service))
}

#[derive(Default)]
struct MemoryState {
    patents: BTreeMap<PatentId, Patent>,
    workstreams: Vec<Workstream>,
    intelligence: Vec<IntelligenceEntry>,
    next_patent: u64,
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryRepository {
    pub(super) fn intelligence_titles(&self) -> Vec<String> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        guard
            .intelligence
            .iter()
            .map(|entry| entry.title.clone())
            .collect()
    }
}

impl PortfolioRepository for MemoryRepository {
    fn insert_patent(&self, mut patent: Patent) -> Result<Patent, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        if guard
            .patents
            .values()
            .any(|existing| existing.number == patent.number)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.next_patent += 1;
        patent.id = PatentId(guard.next_patent);
        guard.patents.insert(patent.id, patent.clone());
        Ok(patent)
    }

    fn update_patent(&self, patent: Patent) -> Result<(), RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        match guard.patents.get_mut(&patent.id) {
            Some(slot) => {
                *slot = patent;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_patent(&self, id: PatentId) -> Result<Option<Patent>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.patents.get(&id).cloned())
    }

    fn list_patents(&self) -> Result<Vec<Patent>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.patents.values().cloned().collect())
    }

    fn insert_workstream(&self, workstream: NewWorkstream) -> Result<Workstream, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        let stored = Workstream {
            id: WorkstreamId(guard.workstreams.len() as u64 + 1),
            name: workstream.name,
            stage: workstream.stage,
            progress: workstream.progress,
        };
        guard.workstreams.push(stored.clone());
        Ok(stored)
    }

    fn list_workstreams(&self) -> Result<Vec<Workstream>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.workstreams.clone())
    }

    fn append_intelligence(
        &self,
        entry: NewIntelligence,
    ) -> Result<IntelligenceEntry, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        let stored = IntelligenceEntry {
            id: guard.intelligence.len() as u64 + 1,
            title: entry.title,
            detail: entry.detail,
            timestamp: entry.timestamp,
        };
        guard.intelligence.push(stored.clone());
        Ok(stored)
    }

    fn list_intelligence(&self) -> Result<Vec<IntelligenceEntry>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.intelligence.clone())
    }
}

/// In-memory store whose intelligence feed rejects every write.
#[derive(Default)]
pub(super) struct FeedOfflineRepository {
    pub(super) inner: MemoryRepository,
}

impl PortfolioRepository for FeedOfflineRepository {
    fn insert_patent(&self, patent: Patent) -> Result<Patent, RepositoryError> {
        self.inner.insert_patent(patent)
    }

    fn update_patent(&self, patent: Patent) -> Result<(), RepositoryError> {
        self.inner.update_patent(patent)
    }

    fn fetch_patent(&self, id: PatentId) -> Result<Option<Patent>, RepositoryError> {
        self.inner.fetch_patent(id)
    }

    fn list_patents(&self) -> Result<Vec<Patent>, RepositoryError> {
        self.inner.list_patents()
    }

    fn insert_workstream(&self, workstream: NewWorkstream) -> Result<Workstream, RepositoryError> {
        self.inner.insert_workstream(workstream)
    }

    fn list_workstreams(&self) -> Result<Vec<Workstream>, RepositoryError> {
        self.inner.list_workstreams()
    }

    fn append_intelligence(
        &self,
        _entry: NewIntelligence,
    ) -> Result<IntelligenceEntry, RepositoryError> {
        Err(RepositoryError::Unavailable("feed offline".to_string()))
    }

    fn list_intelligence(&self) -> Result<Vec<IntelligenceEntry>, RepositoryError> {
        self.inner.list_intelligence()
    }
}

pub(super) struct ConflictRepository;

impl PortfolioRepository for ConflictRepository {
    fn insert_patent(&self, _patent: Patent) -> Result<Patent, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update_patent(&self, _patent: Patent) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch_patent(&self, _id: PatentId) -> Result<Option<Patent>, RepositoryError> {
        Ok(None)
    }

    fn list_patents(&self) -> Result<Vec<Patent>, RepositoryError> {
        Ok(Vec::new())
    }

    fn insert_workstream(&self, _workstream: NewWorkstream) -> Result<Workstream, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn list_workstreams(&self) -> Result<Vec<Workstream>, RepositoryError> {
        Ok(Vec::new())
    }

    fn append_intelligence(
        &self,
        _entry: NewIntelligence,
    ) -> Result<IntelligenceEntry, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn list_intelligence(&self) -> Result<Vec<IntelligenceEntry>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl PortfolioRepository for UnavailableRepository {
    fn insert_patent(&self, _patent: Patent) -> Result<Patent, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_patent(&self, _patent: Patent) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_patent(&self, _id: PatentId) -> Result<Option<Patent>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_patents(&self) -> Result<Vec<Patent>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_workstream(&self, _workstream: NewWorkstream) -> Result<Workstream, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_workstreams(&self) -> Result<Vec<Workstream>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn append_intelligence(
        &self,
        _entry: NewIntelligence,
    ) -> Result<IntelligenceEntry, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_intelligence(&self) -> Result<Vec<IntelligenceEntry>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn intelligence(title: &str, day: u32) -> NewIntelligence {
    NewIntelligence {
        title: title.to_string(),
        detail: format!("{title} detail"),
        timestamp: Utc
            .with_ymd_and_hms(2024, 5, day, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
