#![allow(dead_code)]

use storage::{Discipline, PlayerProfile, RankingStore, SnapshotRow};

pub async fn store() -> RankingStore {
    RankingStore::in_memory().await.expect("in-memory store")
}

pub fn row(
    player_id: &str,
    first_name: &str,
    last_name: &str,
    discipline: Discipline,
    rank: u32,
    points: f64,
) -> SnapshotRow {
    row_with_age(
        player_id, first_name, last_name, discipline, rank, points, "U17", "U19",
    )
}

pub fn row_with_age(
    player_id: &str,
    first_name: &str,
    last_name: &str,
    discipline: Discipline,
    rank: u32,
    points: f64,
    age_class_1: &str,
    age_class_2: &str,
) -> SnapshotRow {
    SnapshotRow {
        profile: PlayerProfile {
            player_id: player_id.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            gender: "m".to_string(),
            birth_year: 2008,
            age_class_1: age_class_1.to_string(),
            age_class_2: age_class_2.to_string(),
            club: "SV Musterstadt".to_string(),
            district: "Bezirk 1".to_string(),
        },
        discipline,
        rank,
        federation_rank: rank,
        points,
        tournaments: 5,
    }
}
