use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::Result;
use crate::models::{Discipline, RankingWeek, RosterEntry};
use crate::repository::RankingStore;

/// Results scoring below this are dropped rather than returned, so an
/// empty result list reliably means "no match".
const SCORE_CUTOFF: f64 = 50.0;

/// A scored match from the latest roster, carrying the player's best
/// national rank for display and tie-breaking.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub player_id: String,
    pub first_name: String,
    pub last_name: String,
    /// Match confidence in [0, 100].
    pub score: f64,
    pub best_discipline: Discipline,
    pub best_rank: u32,
}

impl SearchResult {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Approximate name matching over the latest snapshot's roster.
pub struct SearchIndex {
    week: RankingWeek,
    roster: Vec<(String, RosterEntry)>,
}

impl SearchIndex {
    /// Snapshot the latest week's roster. `NoData` when the store is
    /// empty.
    pub async fn build(store: &RankingStore) -> Result<Self> {
        let week = store.latest_week().await?;
        let roster = store
            .roster(Some(week))
            .await?
            .into_iter()
            .map(|entry| (normalize(&entry.full_name()), entry))
            .collect();
        Ok(Self { week, roster })
    }

    pub fn week(&self) -> RankingWeek {
        self.week
    }

    /// The `limit` best matches for `query`, score descending, ties broken
    /// by best national rank then player id. Empty for an empty query or
    /// when nothing clears the relevance floor; never an error.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        let query = normalize(query);
        if query.split_whitespace().next().is_none() {
            return Vec::new();
        }

        let mut results: Vec<SearchResult> = self
            .roster
            .iter()
            .filter_map(|(name, entry)| {
                let score = weighted_ratio(&query, name);
                (score >= SCORE_CUTOFF).then(|| SearchResult {
                    player_id: entry.player_id.clone(),
                    first_name: entry.first_name.clone(),
                    last_name: entry.last_name.clone(),
                    score,
                    best_discipline: entry.best_discipline,
                    best_rank: entry.best_rank,
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.best_rank.cmp(&b.best_rank))
                .then_with(|| a.player_id.cmp(&b.player_id))
        });
        results.truncate(limit);
        results
    }
}

/// Case-fold and flatten the diacritics common in the roster (German
/// umlauts and eszett expand to their digraphs, so "Müller" matches
/// "Mueller").
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        for lower in c.to_lowercase() {
            match lower {
                'ä' => out.push_str("ae"),
                'ö' => out.push_str("oe"),
                'ü' => out.push_str("ue"),
                'ß' => out.push_str("ss"),
                'á' | 'à' | 'â' | 'ã' | 'å' => out.push('a'),
                'é' | 'è' | 'ê' | 'ë' => out.push('e'),
                'í' | 'ì' | 'î' | 'ï' => out.push('i'),
                'ó' | 'ò' | 'ô' | 'õ' => out.push('o'),
                'ú' | 'ù' | 'û' => out.push('u'),
                'ç' => out.push('c'),
                'ñ' => out.push('n'),
                other => out.push(other),
            }
        }
    }
    out
}

/// Longest common subsequence length, two-row DP.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Indel-based similarity in [0, 100]: insertions and deletions are the
/// only edits, so this equals 200 * LCS / (|a| + |b|).
fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(&a, &b) as f64 / total as f64
}

/// `ratio` over whitespace tokens sorted into a canonical order, which
/// makes the measure insensitive to first/last name order.
fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn sorted_tokens(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Token-set comparison: shared tokens score against each full side, so a
/// query that is a subset of the name (a lone surname, say) still scores
/// near the top.
fn token_set_ratio(a: &str, b: &str) -> f64 {
    let set_a: BTreeSet<&str> = a.split_whitespace().collect();
    let set_b: BTreeSet<&str> = b.split_whitespace().collect();

    let common: Vec<&str> = set_a.intersection(&set_b).copied().collect();
    let only_a: Vec<&str> = set_a.difference(&set_b).copied().collect();
    let only_b: Vec<&str> = set_b.difference(&set_a).copied().collect();

    let common = common.join(" ");
    let combined_a = join_parts(&common, &only_a.join(" "));
    let combined_b = join_parts(&common, &only_b.join(" "));

    ratio(&common, &combined_a)
        .max(ratio(&common, &combined_b))
        .max(ratio(&combined_a, &combined_b))
}

fn join_parts(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}

/// The search measure: the best of the plain, token-sort, and token-set
/// ratios. Inputs must already be normalized.
fn weighted_ratio(query: &str, choice: &str) -> f64 {
    ratio(query, choice)
        .max(token_sort_ratio(query, choice))
        .max(token_set_ratio(query, choice))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_100() {
        assert_eq!(weighted_ratio("max mustermann", "max mustermann"), 100.0);
    }

    #[test]
    fn token_order_does_not_matter() {
        let forward = weighted_ratio("max mustermann", "max mustermann");
        let reversed = weighted_ratio("mustermann max", "max mustermann");
        assert!((forward - reversed).abs() < 1.0);
    }

    #[test]
    fn partial_query_clears_the_floor() {
        assert!(weighted_ratio("musterman", "max mustermann") >= SCORE_CUTOFF);
        assert!(weighted_ratio("mustermann", "max mustermann") >= 99.0);
    }

    #[test]
    fn unrelated_names_score_low() {
        assert!(weighted_ratio("qqq xyz", "max mustermann") < SCORE_CUTOFF);
    }

    #[test]
    fn umlauts_fold_to_digraphs() {
        assert_eq!(normalize("Müller"), "mueller");
        assert_eq!(normalize("Größe"), "groesse");
        assert_eq!(weighted_ratio(&normalize("Mueller"), &normalize("Müller")), 100.0);
    }

    #[test]
    fn empty_against_empty_is_full_score() {
        assert_eq!(ratio("", ""), 100.0);
        assert_eq!(ratio("", "abc"), 0.0);
    }
}
