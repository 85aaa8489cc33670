mod discipline;
mod player;
mod week;

pub use discipline::Discipline;
pub use player::{
    IngestSummary, PlayerEntry, PlayerProfile, PlayerSnapshot, RankingEntry, RosterEntry,
    SnapshotRow,
};
pub use week::RankingWeek;
