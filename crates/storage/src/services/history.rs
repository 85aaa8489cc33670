use chrono::{Months, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};
use crate::models::{Discipline, RankingWeek};
use crate::repository::RankingStore;

/// Which snapshot value a history series carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Rank,
    Points,
}

/// A relative look-back window, resolved against the latest snapshot week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Since {
    Months(u32),
    Weeks(u32),
}

impl Since {
    /// Parse durations like "1 year", "6 months", "2 weeks" and the
    /// shorthands "1y", "6m", "12w".
    pub fn parse(text: &str) -> Result<Self> {
        let cleaned = text.trim().to_lowercase();
        let invalid = || StorageError::InvalidArgument(format!("cannot parse duration '{text}'"));

        let digits_end = cleaned
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (number, unit) = cleaned.split_at(digits_end);
        let number: u32 = number.parse().map_err(|_| invalid())?;
        if number == 0 {
            return Err(invalid());
        }

        match unit.trim() {
            "y" | "yr" | "year" | "years" => Ok(Self::Months(number * 12)),
            "m" | "mo" | "month" | "months" => Ok(Self::Months(number)),
            "w" | "wk" | "week" | "weeks" => Ok(Self::Weeks(number)),
            _ => Err(invalid()),
        }
    }

    /// The cutoff date this window reaches back to from `anchor`.
    pub fn cutoff_from(&self, anchor: NaiveDate) -> Result<NaiveDate> {
        let cutoff = match self {
            Self::Months(months) => anchor.checked_sub_months(Months::new(*months)),
            Self::Weeks(weeks) => anchor.checked_sub_signed(TimeDelta::weeks(*weeks as i64)),
        };
        cutoff.ok_or_else(|| StorageError::InvalidArgument("duration out of range".to_string()))
    }
}

/// One point of a history series.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryPoint {
    pub week: RankingWeek,
    pub label: String,
    pub value: f64,
}

/// One player's series. `series` is empty (never omitted) when the player
/// has no entries for the chosen discipline inside the window; `discipline`
/// reports which one was charted, `None` when the player has no ranked
/// discipline at all.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerHistory {
    pub player_id: String,
    pub discipline: Option<Discipline>,
    pub series: Vec<HistoryPoint>,
}

/// Time-bounded metric series for the given players, in the given order.
///
/// `since` resolves against the Monday of `now` (defaulting to the latest
/// snapshot week); the week containing the cutoff date is included. `None`
/// means all available history. Without an explicit `discipline`, each
/// player's own best (lowest-rank) discipline is charted independently.
pub async fn windowed_history(
    store: &RankingStore,
    player_ids: &[String],
    discipline: Option<Discipline>,
    metric: Metric,
    since: Option<Since>,
    now: Option<RankingWeek>,
) -> Result<Vec<PlayerHistory>> {
    let latest = match now {
        Some(week) => week,
        None => store.latest_week().await?,
    };

    let from = match since {
        Some(since) => {
            let anchor = latest.monday().ok_or_else(|| {
                StorageError::InvalidArgument(format!("{latest} is not a valid ISO week"))
            })?;
            RankingWeek::from_date(since.cutoff_from(anchor)?)
        }
        // all history; week keys are strictly positive
        None => RankingWeek::new(0, 1),
    };

    tracing::debug!(from = %from, to = %latest, "resolved history window");

    let mut histories = Vec::with_capacity(player_ids.len());
    for player_id in player_ids {
        let charted = match discipline {
            Some(d) => Some(d),
            None => store.best_discipline(player_id).await?,
        };

        let series = match charted {
            Some(charted) => store
                .entries_in_window(std::slice::from_ref(player_id), Some(charted), from, latest)
                .await?
                .into_iter()
                .map(|entry| HistoryPoint {
                    week: entry.week,
                    label: entry.week.label(),
                    value: match metric {
                        Metric::Rank => entry.rank as f64,
                        Metric::Points => entry.points,
                    },
                })
                .collect(),
            None => Vec::new(),
        };

        histories.push(PlayerHistory {
            player_id: player_id.clone(),
            discipline: charted,
            series,
        });
    }

    Ok(histories)
}
