pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod search;
pub mod services;

pub use config::Config;
pub use error::{Result, StorageError};
pub use models::{
    Discipline, IngestSummary, PlayerEntry, PlayerProfile, PlayerSnapshot, RankingEntry,
    RankingWeek, RosterEntry, SnapshotRow,
};
pub use repository::RankingStore;
pub use search::{SearchIndex, SearchResult};
pub use services::age_rank::{AgeGroupCohort, age_group_rank};
pub use services::history::{HistoryPoint, Metric, PlayerHistory, Since, windowed_history};
pub use services::team::{best_team_discipline, team_points};
