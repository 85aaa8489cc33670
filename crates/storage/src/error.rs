use thiserror::Error;

use crate::models::{Discipline, RankingWeek};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Ingest batch is empty")]
    EmptyBatch,

    #[error("Duplicate entry for player {player_id} in {discipline} within one batch")]
    DuplicateInBatch {
        player_id: String,
        discipline: Discipline,
    },

    #[error("Player {0} not found")]
    PlayerNotFound(String),

    #[error("Ranking week {0} not found")]
    WeekNotFound(RankingWeek),

    #[error("No ranking data available")]
    NoData,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::PlayerNotFound(_) | StorageError::WeekNotFound(_) | StorageError::NoData
        )
    }
}
