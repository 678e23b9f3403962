//! Patent vault, workstreams, and the intelligence feed.
//!
//! Every patent entering the portfolio is scored on the way in, and rescoring
//! leaves a trail in the feed so the dashboard can show what moved.

pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    IntelligenceEntry, NewIntelligence, NewWorkstream, Patent, PatentDetail, PatentDraft,
    PatentId, PatentProfile, PortfolioMetrics, ProfileRating, VaultFilter, Workstream,
    WorkstreamId,
};
pub use import::{PatentCsvImporter, PatentImportError};
pub use repository::{PortfolioRepository, RepositoryError};
pub use router::portfolio_router;
pub use service::{PortfolioSeed, PortfolioService, PortfolioServiceError, SeedPatent};
