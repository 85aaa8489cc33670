use serde::{Deserialize, Serialize};

use super::{Discipline, RankingWeek};

/// A competitor's profile as it stood in one snapshot week.
///
/// Profiles are stored per snapshot, never as a single mutable record:
/// clubs and age classes change over time and historical queries must
/// reproduce the roster as it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    /// Externally issued id like "01-150083". Opaque to the engine.
    pub player_id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birth_year: i32,
    /// Narrower age class, e.g. "U17". Cohort key for age-group ranks.
    pub age_class_1: String,
    /// Broader age class, e.g. "U19".
    pub age_class_2: String,
    pub club: String,
    pub district: String,
}

impl PlayerProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// "Last, First" form.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

/// One stored ranking value: the unique (player, week, discipline) triple
/// with its numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub player_id: String,
    pub week: RankingWeek,
    pub discipline: Discipline,
    pub rank: u32,
    pub federation_rank: u32,
    pub points: f64,
    pub tournaments: u32,
}

/// The input shape ingestion accepts from the file-decoding collaborator:
/// one spreadsheet row, already parsed and schema-checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub profile: PlayerProfile,
    pub discipline: Discipline,
    pub rank: u32,
    pub federation_rank: u32,
    pub points: f64,
    pub tournaments: u32,
}

/// A profile paired with one of its ranking entries, as returned by
/// discipline-scoped queries.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerEntry {
    pub profile: PlayerProfile,
    pub entry: RankingEntry,
}

/// Everything known about one player at one resolved week.
///
/// `entries` is empty when the player is known to the store but absent
/// from that week's snapshot; `profile` then carries their most recent
/// appearance.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
    pub profile: PlayerProfile,
    pub week: RankingWeek,
    pub entries: Vec<RankingEntry>,
}

/// One distinct player of a week's roster, carrying the single best
/// (numerically lowest) national rank they hold across disciplines.
#[derive(Debug, Clone, Serialize)]
pub struct RosterEntry {
    pub player_id: String,
    pub first_name: String,
    pub last_name: String,
    pub best_discipline: Discipline,
    pub best_rank: u32,
}

impl RosterEntry {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// What an ingest wrote: distinct players and total entries for the week.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IngestSummary {
    pub week: RankingWeek,
    pub players: usize,
    pub entries: usize,
}
