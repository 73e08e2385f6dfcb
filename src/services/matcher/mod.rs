//! Waste identification engine.
//!
//! Matches AI-produced candidate labels against the reference catalog, picks
//! one entry and decides its home/recycling categories, keeping an ordered
//! decision log of every step.
pub mod analysis;
pub mod models;
pub mod pipeline;
pub mod state;

pub use models::decision_log::{DecisionLog, DecisionRecord, Stage};
pub use models::types::{
    CandidateLabel, CatalogEntry, CategorizationResult, CategorySource, MatchField,
    WasteIdentification, NOT_FOUND_NAME,
};
pub use pipeline::identify::Identifier;
pub use pipeline::label_source::{JsonFileLabels, LabelSource, StaticLabels};
pub use state::cancel::CancelToken;
pub use state::catalog_store::{CatalogStore, SqliteCatalogStore};
pub use state::master_catalog::MemoryCatalog;
pub use state::search_cache::{shared_store, CachedCatalogStore};
pub use state::tables::MatchTables;
