use crate::error::{Result, StorageError};
use crate::models::{Discipline, PlayerEntry, PlayerProfile, RankingEntry, RankingWeek};
use crate::repository::RankingStore;

/// A fetched and sorted (week, discipline, age class) cohort.
///
/// Fetch once, then answer `rank_of` for any number of its members; that
/// is the batching knob for callers deriving many ranks against the same
/// cohort.
pub struct AgeGroupCohort {
    week: RankingWeek,
    discipline: Discipline,
    age_class: String,
    entries: Vec<PlayerEntry>,
}

impl AgeGroupCohort {
    /// Members keyed on the narrower age class, ordered points descending
    /// with national rank breaking ties.
    pub async fn fetch(
        store: &RankingStore,
        week: RankingWeek,
        discipline: Discipline,
        age_class: &str,
    ) -> Result<Self> {
        let entries = store.cohort(week, discipline, age_class).await?;
        Ok(Self {
            week,
            discipline,
            age_class: age_class.to_string(),
            entries,
        })
    }

    /// 1-based position of a member, `None` for non-members.
    pub fn rank_of(&self, player_id: &str) -> Option<u32> {
        self.entries
            .iter()
            .position(|e| e.entry.player_id == player_id)
            .map(|idx| idx as u32 + 1)
    }

    pub fn week(&self) -> RankingWeek {
        self.week
    }

    pub fn discipline(&self) -> Discipline {
        self.discipline
    }

    pub fn age_class(&self) -> &str {
        &self.age_class
    }

    pub fn entries(&self) -> &[PlayerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A player's 1-based rank among peers of their narrower age class for the
/// entry's week and discipline. Recomputed on every call.
///
/// `PlayerNotFound` for an entry missing from its own cohort; that cannot
/// happen for entries read from the store and signals a consistency bug.
pub async fn age_group_rank(
    store: &RankingStore,
    entry: &RankingEntry,
    profile: &PlayerProfile,
) -> Result<u32> {
    let cohort =
        AgeGroupCohort::fetch(store, entry.week, entry.discipline, &profile.age_class_1).await?;
    cohort
        .rank_of(&entry.player_id)
        .ok_or_else(|| StorageError::PlayerNotFound(entry.player_id.clone()))
}
