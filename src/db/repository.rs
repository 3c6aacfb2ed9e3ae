//! Repository trait definitions for the engine's collaborators.
//!
//! The engine consumes three interfaces: a standings provider, a prize
//! configuration loader, and a distribution store. Trait-based
//! abstractions keep the allocation logic testable with in-memory
//! implementations while production wires up the Postgres versions below.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;

use crate::distribution::DistributionResult;
use crate::prizes::{AwardedPrize, DistributionRecord, PrizeKind};
use crate::standings::{StandingEntry, TournamentId};

/// Supplies final standings per tournament, with scores and tiebreakers
/// already computed upstream.
#[async_trait]
pub trait StandingsProvider: Send + Sync {
    /// All standings for a tournament across sections, or `None` when the
    /// tournament does not exist.
    async fn get_standings(
        &self,
        tournament_id: TournamentId,
    ) -> DistributionResult<Option<Vec<StandingEntry>>>;
}

/// Loads the tournament's raw prize settings.
#[async_trait]
pub trait PrizeConfigLoader: Send + Sync {
    /// The opaque settings structure, or `None` when nothing is
    /// configured.
    async fn get_prize_config(
        &self,
        tournament_id: TournamentId,
    ) -> DistributionResult<Option<serde_json::Value>>;
}

/// Persists distribution output with replace-all semantics.
#[async_trait]
pub trait DistributionStore: Send + Sync {
    /// Atomically replace all distribution records for one
    /// `(tournament, section)` pair.
    async fn replace_section_distributions(
        &self,
        tournament_id: TournamentId,
        section: &str,
        records: &[DistributionRecord],
    ) -> DistributionResult<()>;

    /// Atomically replace the tournament's dictionary of prize
    /// definitions actually used.
    async fn replace_prize_definitions(
        &self,
        tournament_id: TournamentId,
        prizes: &[AwardedPrize],
    ) -> DistributionResult<()>;

    /// Read back the stored records for one section.
    async fn get_section_distributions(
        &self,
        tournament_id: TournamentId,
        section: &str,
    ) -> DistributionResult<Vec<DistributionRecord>>;
}

/// PostgreSQL implementation of `StandingsProvider`
pub struct PgStandingsProvider {
    pool: PgPool,
}

impl PgStandingsProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StandingsProvider for PgStandingsProvider {
    async fn get_standings(
        &self,
        tournament_id: TournamentId,
    ) -> DistributionResult<Option<Vec<StandingEntry>>> {
        let exists = sqlx::query("SELECT id FROM tournaments WHERE id = $1")
            .bind(tournament_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let rows = sqlx::query(
            r#"
            SELECT player_id, name, rating, section, total_points, tiebreakers
            FROM section_standings
            WHERE tournament_id = $1
            ORDER BY section, total_points DESC, player_id
            "#,
        )
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await?;

        let entries = rows
            .into_iter()
            .map(|row| {
                let tiebreakers: HashMap<String, f64> = row
                    .get::<Option<serde_json::Value>, _>("tiebreakers")
                    .and_then(|value| serde_json::from_value(value).ok())
                    .unwrap_or_default();
                StandingEntry {
                    player_id: row.get("player_id"),
                    name: row.get("name"),
                    rating: row
                        .get::<Option<i32>, _>("rating")
                        .and_then(|rating| u32::try_from(rating).ok()),
                    section: row.get("section"),
                    total_points: row.get("total_points"),
                    tiebreakers,
                }
            })
            .collect();

        Ok(Some(entries))
    }
}

/// PostgreSQL implementation of `PrizeConfigLoader`
pub struct PgPrizeConfigLoader {
    pool: PgPool,
}

impl PgPrizeConfigLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrizeConfigLoader for PgPrizeConfigLoader {
    async fn get_prize_config(
        &self,
        tournament_id: TournamentId,
    ) -> DistributionResult<Option<serde_json::Value>> {
        let row = sqlx::query("SELECT prize_settings FROM tournaments WHERE id = $1")
            .bind(tournament_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.and_then(|r| r.get::<Option<serde_json::Value>, _>("prize_settings")))
    }
}

/// PostgreSQL implementation of `DistributionStore`
pub struct PgDistributionStore {
    pool: PgPool,
}

impl PgDistributionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DistributionStore for PgDistributionStore {
    async fn replace_section_distributions(
        &self,
        tournament_id: TournamentId,
        section: &str,
        records: &[DistributionRecord],
    ) -> DistributionResult<()> {
        // Delete and insert inside one transaction so a failure never
        // leaves a partially replaced section visible
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM prize_distributions WHERE tournament_id = $1 AND section = $2")
            .bind(tournament_id)
            .bind(section)
            .execute(&mut *tx)
            .await?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO prize_distributions
                    (tournament_id, player_id, section, prize_name, prize_kind,
                     amount_cents, position, tie_group)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(tournament_id)
            .bind(record.player_id)
            .bind(&record.section)
            .bind(&record.prize_name)
            .bind(record.prize_kind.to_string())
            .bind(record.amount)
            .bind(record.position.map(|p| p as i32))
            .bind(record.tie_group.map(|p| p as i32))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn replace_prize_definitions(
        &self,
        tournament_id: TournamentId,
        prizes: &[AwardedPrize],
    ) -> DistributionResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM prize_definitions WHERE tournament_id = $1")
            .bind(tournament_id)
            .execute(&mut *tx)
            .await?;

        for prize in prizes {
            sqlx::query(
                r#"
                INSERT INTO prize_definitions
                    (tournament_id, section, name, kind, position, rating_category, amount_cents)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(tournament_id)
            .bind(&prize.section)
            .bind(&prize.definition.name)
            .bind(prize.definition.kind.to_string())
            .bind(prize.definition.position.map(|p| p as i32))
            .bind(prize.definition.rating_category.map(|c| c.to_string()))
            .bind(prize.definition.amount)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get_section_distributions(
        &self,
        tournament_id: TournamentId,
        section: &str,
    ) -> DistributionResult<Vec<DistributionRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT player_id, section, prize_name, prize_kind, amount_cents, position, tie_group
            FROM prize_distributions
            WHERE tournament_id = $1 AND section = $2
            ORDER BY position NULLS LAST, player_id
            "#,
        )
        .bind(tournament_id)
        .bind(section)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| DistributionRecord {
                player_id: row.get("player_id"),
                section: row.get("section"),
                prize_name: row.get("prize_name"),
                prize_kind: PrizeKind::from(row.get::<String, _>("prize_kind")),
                amount: row.get("amount_cents"),
                position: row
                    .get::<Option<i32>, _>("position")
                    .and_then(|p| u32::try_from(p).ok()),
                tie_group: row
                    .get::<Option<i32>, _>("tie_group")
                    .and_then(|p| u32::try_from(p).ok()),
            })
            .collect())
    }
}
