use std::collections::BTreeMap;

use crate::models::{Discipline, RankingEntry};

/// Combined points per doubles discipline where both players hold an
/// entry. A singles `discipline` argument yields an empty map.
pub fn team_points(
    player1: &[RankingEntry],
    player2: &[RankingEntry],
    discipline: Option<Discipline>,
) -> BTreeMap<Discipline, f64> {
    let candidates: Vec<Discipline> = match discipline {
        Some(d) if d.is_doubles() => vec![d],
        Some(_) => return BTreeMap::new(),
        None => Discipline::ALL
            .into_iter()
            .filter(Discipline::is_doubles)
            .collect(),
    };

    let mut totals = BTreeMap::new();
    for candidate in candidates {
        let p1 = player1.iter().find(|e| e.discipline == candidate);
        let p2 = player2.iter().find(|e| e.discipline == candidate);
        if let (Some(p1), Some(p2)) = (p1, p2) {
            totals.insert(candidate, p1.points + p2.points);
        }
    }
    totals
}

/// The doubles discipline where the pair's combined points are highest.
pub fn best_team_discipline(
    player1: &[RankingEntry],
    player2: &[RankingEntry],
) -> Option<(Discipline, f64)> {
    team_points(player1, player2, None)
        .into_iter()
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
}
