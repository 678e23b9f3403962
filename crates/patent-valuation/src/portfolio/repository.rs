use super::domain::{
    IntelligenceEntry, NewIntelligence, NewWorkstream, Patent, PatentId, Workstream,
};

/// Storage abstraction so the portfolio service can be exercised in isolation.
///
/// Implementations assign identifiers: the `id` carried by a patent passed to
/// [`PortfolioRepository::insert_patent`] is ignored.
pub trait PortfolioRepository: Send + Sync {
    /// Store a new patent. Fails with [`RepositoryError::Conflict`] when the number is taken.
    fn insert_patent(&self, patent: Patent) -> Result<Patent, RepositoryError>;
    fn update_patent(&self, patent: Patent) -> Result<(), RepositoryError>;
    fn fetch_patent(&self, id: PatentId) -> Result<Option<Patent>, RepositoryError>;
    fn list_patents(&self) -> Result<Vec<Patent>, RepositoryError>;
    fn insert_workstream(&self, workstream: NewWorkstream) -> Result<Workstream, RepositoryError>;
    fn list_workstreams(&self) -> Result<Vec<Workstream>, RepositoryError>;
    fn append_intelligence(
        &self,
        entry: NewIntelligence,
    ) -> Result<IntelligenceEntry, RepositoryError>;
    /// Entries in insertion order, oldest first.
    fn list_intelligence(&self) -> Result<Vec<IntelligenceEntry>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
