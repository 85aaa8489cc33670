use std::collections::HashSet;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{FromRow, QueryBuilder};

use crate::error::{Result, StorageError};
use crate::models::{
    Discipline, IngestSummary, PlayerEntry, PlayerProfile, PlayerSnapshot, RankingEntry,
    RankingWeek, RosterEntry, SnapshotRow,
};

/// Column list shared by every entry query. Must stay in sync with
/// [`EntryRow`].
const ENTRY_COLUMNS: &str = "e.player_id, e.discipline, e.rank, e.federation_rank, \
     e.first_name, e.last_name, e.gender, e.birth_year, e.age_class_1, e.age_class_2, \
     e.points, e.tournaments, e.club, e.district, w.year, w.week";

#[derive(FromRow)]
struct EntryRow {
    player_id: String,
    discipline: String,
    rank: i64,
    federation_rank: i64,
    first_name: String,
    last_name: String,
    gender: String,
    birth_year: i64,
    age_class_1: String,
    age_class_2: String,
    points: f64,
    tournaments: i64,
    club: String,
    district: String,
    year: i64,
    week: i64,
}

impl EntryRow {
    fn discipline(&self) -> Result<Discipline> {
        Discipline::from_code(&self.discipline).ok_or_else(|| {
            StorageError::InvalidArgument(format!(
                "unknown discipline code '{}' in stored row",
                self.discipline
            ))
        })
    }

    fn week(&self) -> RankingWeek {
        RankingWeek::new(self.year as i32, self.week as u32)
    }

    fn into_player_entry(self) -> Result<PlayerEntry> {
        let discipline = self.discipline()?;
        let week = self.week();
        Ok(PlayerEntry {
            entry: RankingEntry {
                player_id: self.player_id.clone(),
                week,
                discipline,
                rank: self.rank as u32,
                federation_rank: self.federation_rank as u32,
                points: self.points,
                tournaments: self.tournaments as u32,
            },
            profile: PlayerProfile {
                player_id: self.player_id,
                first_name: self.first_name,
                last_name: self.last_name,
                gender: self.gender,
                birth_year: self.birth_year as i32,
                age_class_1: self.age_class_1,
                age_class_2: self.age_class_2,
                club: self.club,
                district: self.district,
            },
        })
    }
}

/// Durable, indexed storage of weekly ranking snapshots.
///
/// Single writer, many readers: `ingest` is the only mutating operation and
/// runs inside one transaction, so readers never observe a partially
/// written snapshot. Every value returned is an owned copy.
pub struct RankingStore {
    pool: SqlitePool,
}

impl RankingStore {
    /// Open (creating if missing) a database at `url`, e.g.
    /// "sqlite://rankings.db". WAL mode keeps readers off the writer's
    /// back during ingest.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::from_pool(pool).await
    }

    /// An isolated in-memory store. Single connection, since each new
    /// `:memory:` connection would otherwise see a fresh database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Ingest one week's snapshot. Replaces any prior data for that exact
    /// week wholesale; re-ingesting identical rows is a no-op observably.
    ///
    /// Fails with `EmptyBatch` or `DuplicateInBatch` before touching the
    /// database; any later failure rolls the transaction back, leaving
    /// prior state intact.
    pub async fn ingest(&self, week: RankingWeek, rows: &[SnapshotRow]) -> Result<IngestSummary> {
        if rows.is_empty() {
            return Err(StorageError::EmptyBatch);
        }

        let mut seen: HashSet<(&str, Discipline)> = HashSet::with_capacity(rows.len());
        let mut players: HashSet<&str> = HashSet::new();
        for row in rows {
            if !seen.insert((row.profile.player_id.as_str(), row.discipline)) {
                return Err(StorageError::DuplicateInBatch {
                    player_id: row.profile.player_id.clone(),
                    discipline: row.discipline,
                });
            }
            players.insert(row.profile.player_id.as_str());
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM ranking_entries WHERE week_id IN \
             (SELECT week_id FROM ranking_weeks WHERE year = ? AND week = ?)",
        )
        .bind(week.year)
        .bind(week.week as i64)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM ranking_weeks WHERE year = ? AND week = ?")
            .bind(week.year)
            .bind(week.week as i64)
            .execute(&mut *tx)
            .await?;

        let week_id: i64 =
            sqlx::query_scalar("INSERT INTO ranking_weeks (year, week) VALUES (?, ?) RETURNING week_id")
                .bind(week.year)
                .bind(week.week as i64)
                .fetch_one(&mut *tx)
                .await?;

        for row in rows {
            sqlx::query(
                "INSERT INTO ranking_entries (week_id, player_id, discipline, rank, \
                 federation_rank, first_name, last_name, gender, birth_year, age_class_1, \
                 age_class_2, points, tournaments, club, district) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(week_id)
            .bind(&row.profile.player_id)
            .bind(row.discipline.as_code())
            .bind(row.rank as i64)
            .bind(row.federation_rank as i64)
            .bind(&row.profile.first_name)
            .bind(&row.profile.last_name)
            .bind(&row.profile.gender)
            .bind(row.profile.birth_year)
            .bind(&row.profile.age_class_1)
            .bind(&row.profile.age_class_2)
            .bind(row.points)
            .bind(row.tournaments as i64)
            .bind(&row.profile.club)
            .bind(&row.profile.district)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let summary = IngestSummary {
            week,
            players: players.len(),
            entries: rows.len(),
        };
        tracing::info!(
            year = week.year,
            week = week.week,
            players = summary.players,
            entries = summary.entries,
            "snapshot ingested"
        );
        Ok(summary)
    }

    /// All snapshot weeks on record, most recent first.
    pub async fn list_weeks(&self) -> Result<Vec<RankingWeek>> {
        let rows: Vec<(i64, i64)> =
            sqlx::query_as("SELECT year, week FROM ranking_weeks ORDER BY year DESC, week DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(year, week)| RankingWeek::new(year as i32, week as u32))
            .collect())
    }

    /// The most recent snapshot week, or `NoData` when the store is empty.
    pub async fn latest_week(&self) -> Result<RankingWeek> {
        let row: Option<(i64, i64)> = sqlx::query_as(
            "SELECT year, week FROM ranking_weeks ORDER BY year DESC, week DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        row.map(|(year, week)| RankingWeek::new(year as i32, week as u32))
            .ok_or(StorageError::NoData)
    }

    /// Resolve an optional explicit week to its row id. `None` means the
    /// latest week on record.
    async fn resolve_week(&self, week: Option<RankingWeek>) -> Result<(i64, RankingWeek)> {
        match week {
            Some(week) => {
                let id: Option<i64> =
                    sqlx::query_scalar("SELECT week_id FROM ranking_weeks WHERE year = ? AND week = ?")
                        .bind(week.year)
                        .bind(week.week as i64)
                        .fetch_optional(&self.pool)
                        .await?;
                id.map(|id| (id, week))
                    .ok_or(StorageError::WeekNotFound(week))
            }
            None => {
                let row: Option<(i64, i64, i64)> = sqlx::query_as(
                    "SELECT week_id, year, week FROM ranking_weeks \
                     ORDER BY year DESC, week DESC LIMIT 1",
                )
                .fetch_optional(&self.pool)
                .await?;
                row.map(|(id, year, week)| (id, RankingWeek::new(year as i32, week as u32)))
                    .ok_or(StorageError::NoData)
            }
        }
    }

    /// A player's profile and all their entries at the resolved week.
    ///
    /// `PlayerNotFound` only when the id appears in no snapshot at all; a
    /// player missing from just this week comes back with empty entries
    /// and their most recent profile.
    pub async fn get_player(
        &self,
        player_id: &str,
        week: Option<RankingWeek>,
    ) -> Result<PlayerSnapshot> {
        let (week_id, week) = self.resolve_week(week).await?;

        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM ranking_entries e \
             JOIN ranking_weeks w ON e.week_id = w.week_id \
             WHERE e.week_id = ? AND e.player_id = ? ORDER BY e.discipline"
        );
        let rows: Vec<EntryRow> = sqlx::query_as(&sql)
            .bind(week_id)
            .bind(player_id)
            .fetch_all(&self.pool)
            .await?;

        if rows.is_empty() {
            let latest_sql = format!(
                "SELECT {ENTRY_COLUMNS} FROM ranking_entries e \
                 JOIN ranking_weeks w ON e.week_id = w.week_id \
                 WHERE e.player_id = ? ORDER BY w.year DESC, w.week DESC LIMIT 1"
            );
            let last: Option<EntryRow> = sqlx::query_as(&latest_sql)
                .bind(player_id)
                .fetch_optional(&self.pool)
                .await?;
            let row = last.ok_or_else(|| StorageError::PlayerNotFound(player_id.to_string()))?;
            return Ok(PlayerSnapshot {
                profile: row.into_player_entry()?.profile,
                week,
                entries: Vec::new(),
            });
        }

        let mut profile = None;
        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let player_entry = row.into_player_entry()?;
            profile.get_or_insert(player_entry.profile);
            entries.push(player_entry.entry);
        }
        // rows was non-empty, so profile is set
        let profile = profile.ok_or_else(|| StorageError::PlayerNotFound(player_id.to_string()))?;

        Ok(PlayerSnapshot {
            profile,
            week,
            entries,
        })
    }

    /// Top entries for one discipline at the resolved week, points
    /// descending with national rank breaking ties.
    pub async fn top_by_discipline(
        &self,
        discipline: Discipline,
        week: Option<RankingWeek>,
        limit: u32,
    ) -> Result<Vec<PlayerEntry>> {
        if limit == 0 {
            return Err(StorageError::InvalidArgument(
                "limit must be positive".to_string(),
            ));
        }
        let (week_id, _) = self.resolve_week(week).await?;

        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM ranking_entries e \
             JOIN ranking_weeks w ON e.week_id = w.week_id \
             WHERE e.week_id = ? AND e.discipline = ? \
             ORDER BY e.points DESC, e.rank ASC LIMIT ?"
        );
        let rows: Vec<EntryRow> = sqlx::query_as(&sql)
            .bind(week_id)
            .bind(discipline.as_code())
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(EntryRow::into_player_entry).collect()
    }

    /// All entries for the given players within [from, to] inclusive,
    /// ordered week ascending. Any discipline unless one is given.
    pub async fn entries_in_window(
        &self,
        player_ids: &[String],
        discipline: Option<Discipline>,
        from: RankingWeek,
        to: RankingWeek,
    ) -> Result<Vec<RankingEntry>> {
        if player_ids.is_empty() {
            return Ok(Vec::new());
        }

        // week numbers stay below 100, so year*100+week orders correctly
        let from_key = from.year as i64 * 100 + from.week as i64;
        let to_key = to.year as i64 * 100 + to.week as i64;

        let mut query = QueryBuilder::new(format!(
            "SELECT {ENTRY_COLUMNS} FROM ranking_entries e \
             JOIN ranking_weeks w ON e.week_id = w.week_id \
             WHERE (w.year * 100 + w.week) BETWEEN "
        ));
        query.push_bind(from_key);
        query.push(" AND ");
        query.push_bind(to_key);

        query.push(" AND e.player_id IN (");
        {
            let mut ids = query.separated(", ");
            for id in player_ids {
                ids.push_bind(id.as_str());
            }
        }
        query.push(")");

        if let Some(discipline) = discipline {
            query.push(" AND e.discipline = ");
            query.push_bind(discipline.as_code());
        }

        query.push(" ORDER BY w.year ASC, w.week ASC, e.player_id ASC, e.discipline ASC");

        let rows: Vec<EntryRow> = query.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|row| Ok(row.into_player_entry()?.entry))
            .collect()
    }

    /// The comparison base for age-group ranks: all entries of one (week,
    /// discipline, narrower age class), points descending, rank ascending.
    pub async fn cohort(
        &self,
        week: RankingWeek,
        discipline: Discipline,
        age_class: &str,
    ) -> Result<Vec<PlayerEntry>> {
        let (week_id, _) = self.resolve_week(Some(week)).await?;

        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM ranking_entries e \
             JOIN ranking_weeks w ON e.week_id = w.week_id \
             WHERE e.week_id = ? AND e.discipline = ? AND e.age_class_1 = ? \
             ORDER BY e.points DESC, e.rank ASC"
        );
        let rows: Vec<EntryRow> = sqlx::query_as(&sql)
            .bind(week_id)
            .bind(discipline.as_code())
            .bind(age_class)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(EntryRow::into_player_entry).collect()
    }

    /// One row per distinct player at the resolved week, carrying their
    /// single best (lowest) national rank across disciplines. Feeds the
    /// fuzzy search index.
    pub async fn roster(&self, week: Option<RankingWeek>) -> Result<Vec<RosterEntry>> {
        let (week_id, _) = self.resolve_week(week).await?;

        let rows: Vec<(String, String, String, String, i64)> = sqlx::query_as(
            "SELECT player_id, first_name, last_name, discipline, rank \
             FROM ranking_entries WHERE week_id = ? ORDER BY rank ASC, discipline ASC",
        )
        .bind(week_id)
        .fetch_all(&self.pool)
        .await?;

        let mut seen: HashSet<String> = HashSet::new();
        let mut roster = Vec::new();
        for (player_id, first_name, last_name, discipline, rank) in rows {
            if !seen.insert(player_id.clone()) {
                continue;
            }
            let best_discipline = Discipline::from_code(&discipline).ok_or_else(|| {
                StorageError::InvalidArgument(format!(
                    "unknown discipline code '{discipline}' in stored row"
                ))
            })?;
            roster.push(RosterEntry {
                player_id,
                first_name,
                last_name,
                best_discipline,
                best_rank: rank as u32,
            });
        }
        Ok(roster)
    }

    /// The discipline holding a player's lowest national rank across all
    /// history, or `None` for an unknown player.
    pub async fn best_discipline(&self, player_id: &str) -> Result<Option<Discipline>> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT discipline FROM ranking_entries WHERE player_id = ? \
             GROUP BY discipline ORDER BY MIN(rank) ASC LIMIT 1",
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.and_then(|(code,)| Discipline::from_code(&code)))
    }

    /// Administrative full reset.
    pub async fn clear(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM ranking_entries")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM ranking_weeks")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
