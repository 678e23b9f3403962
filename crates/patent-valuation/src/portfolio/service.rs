use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::domain::{
    IntelligenceEntry, NewIntelligence, NewWorkstream, Patent, PatentDraft, PatentId,
    PortfolioMetrics, VaultFilter, Workstream,
};
use super::repository::{PortfolioRepository, RepositoryError};
use crate::scoring::{score_patent, BibliographicIndicators};

/// Service composing the scoring function with the portfolio store.
pub struct PortfolioService<R> {
    repository: Arc<R>,
}

/// Sample data loaded into an empty store.
#[derive(Debug, Clone, Default)]
pub struct PortfolioSeed {
    pub workstreams: Vec<NewWorkstream>,
    pub patents: Vec<SeedPatent>,
    pub intelligence: Vec<NewIntelligence>,
}

/// Seed patent linked to a seed workstream by its position in [`PortfolioSeed::workstreams`].
#[derive(Debug, Clone)]
pub struct SeedPatent {
    pub workstream_index: Option<usize>,
    pub draft: PatentDraft,
}

impl<R> PortfolioService<R>
where
    R: PortfolioRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Score a new patent, store it, and log the evaluation to the intelligence feed.
    ///
    /// The feed entry is written after the patent and only on a best-effort basis: once the
    /// patent is stored the call succeeds even if the feed write fails.
    pub fn register(&self, draft: PatentDraft) -> Result<Patent, PortfolioServiceError> {
        let score = score_patent(&draft.indicators);
        let now = Utc::now();
        let stored = self
            .repository
            .insert_patent(Patent::from_draft(draft, score, now))?;

        self.log_to_feed(NewIntelligence {
            title: "Patent evaluated".to_string(),
            detail: format!(
                "{} scored {} strength with {} risk.",
                stored.number, stored.score.strength_score, stored.score.risk_level
            ),
            timestamp: now,
        });

        info!(
            patent = %stored.number,
            strength = stored.score.strength_score,
            risk = %stored.score.risk_level,
            "patent registered"
        );
        Ok(stored)
    }

    /// Replace a patent's indicators and re-run scoring. The feed entry is best-effort,
    /// as in [`PortfolioService::register`].
    pub fn rescore(
        &self,
        id: PatentId,
        indicators: BibliographicIndicators,
    ) -> Result<Patent, PortfolioServiceError> {
        let mut patent = self
            .repository
            .fetch_patent(id)?
            .ok_or(RepositoryError::NotFound)?;

        let previous_strength = i16::from(patent.score.strength_score);
        let now = Utc::now();
        patent.indicators = indicators;
        patent.score = score_patent(&indicators);
        patent.updated_at = now;

        self.repository.update_patent(patent.clone())?;

        let delta = i16::from(patent.score.strength_score) - previous_strength;
        self.log_to_feed(NewIntelligence {
            title: "Evaluation updated".to_string(),
            detail: format!(
                "{} now scores {} strength ({delta:+}) with {} risk.",
                patent.number, patent.score.strength_score, patent.score.risk_level
            ),
            timestamp: now,
        });

        debug!(patent = %patent.number, delta, "patent rescored");
        Ok(patent)
    }

    fn log_to_feed(&self, entry: NewIntelligence) {
        if let Err(err) = self.repository.append_intelligence(entry) {
            warn!(error = %err, "failed to record intelligence entry");
        }
    }

    pub fn get(&self, id: PatentId) -> Result<Patent, PortfolioServiceError> {
        let patent = self
            .repository
            .fetch_patent(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(patent)
    }

    /// Patents matching the filter, strongest first, ties broken by number.
    pub fn vault(&self, filter: &VaultFilter) -> Result<Vec<Patent>, PortfolioServiceError> {
        let mut patents: Vec<Patent> = self
            .repository
            .list_patents()?
            .into_iter()
            .filter(|patent| filter.matches(patent))
            .collect();

        patents.sort_by(|left, right| {
            right
                .score
                .strength_score
                .cmp(&left.score.strength_score)
                .then_with(|| left.number.cmp(&right.number))
        });
        Ok(patents)
    }

    pub fn metrics(&self) -> Result<PortfolioMetrics, PortfolioServiceError> {
        let patents = self.repository.list_patents()?;
        Ok(PortfolioMetrics::from_patents(&patents))
    }

    pub fn workstreams(&self) -> Result<Vec<Workstream>, PortfolioServiceError> {
        Ok(self.repository.list_workstreams()?)
    }

    pub fn add_workstream(
        &self,
        workstream: NewWorkstream,
    ) -> Result<Workstream, PortfolioServiceError> {
        let workstream = NewWorkstream {
            progress: workstream.progress.min(100),
            ..workstream
        };
        Ok(self.repository.insert_workstream(workstream)?)
    }

    /// Most recent entries first.
    pub fn intelligence(
        &self,
        limit: usize,
    ) -> Result<Vec<IntelligenceEntry>, PortfolioServiceError> {
        let mut entries = self.repository.list_intelligence()?;
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }

    /// Load sample data when the store holds no patents. Returns whether anything was loaded.
    pub fn seed(&self, seed: PortfolioSeed) -> Result<bool, PortfolioServiceError> {
        if !self.repository.list_patents()?.is_empty() {
            debug!("portfolio already populated; skipping seed data");
            return Ok(false);
        }

        let mut workstream_ids = HashMap::new();
        for (index, workstream) in seed.workstreams.into_iter().enumerate() {
            let stored = self.add_workstream(workstream)?;
            workstream_ids.insert(index, stored.id);
        }

        let patent_count = seed.patents.len();
        for SeedPatent {
            workstream_index,
            mut draft,
        } in seed.patents
        {
            draft.workstream_id =
                workstream_index.and_then(|index| workstream_ids.get(&index).copied());
            let score = score_patent(&draft.indicators);
            self.repository
                .insert_patent(Patent::from_draft(draft, score, Utc::now()))?;
        }

        for entry in seed.intelligence {
            self.repository.append_intelligence(entry)?;
        }

        info!(
            workstreams = workstream_ids.len(),
            patents = patent_count,
            "seeded portfolio"
        );
        Ok(true)
    }
}

/// Error raised by the portfolio service.
#[derive(Debug, thiserror::Error)]
pub enum PortfolioServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
