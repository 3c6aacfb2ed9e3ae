//! The distribution engine: per-section assembly and the two public
//! operations (compute, compute-and-persist).

use super::AllocationState;
use super::cash::pool_cash_prizes;
use super::errors::{DistributionError, DistributionResult};
use super::general::allocate_general_prizes;
use super::grouping::group_by_score;
use super::rating::allocate_rating_prizes;
use crate::db::repository::{DistributionStore, PrizeConfigLoader, StandingsProvider};
use crate::prizes::{
    AwardedPrize, DistributionRecord, PrizeDefinition, SectionPrizeConfig, canonicalize_config,
};
use crate::standings::{StandingEntry, TournamentId, normalize_section_name};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Engine settings. The tiebreak order names the precomputed tiebreaker
/// fields consulted, in order, when ranking players within equal scores
/// for rating-category and non-cash prizes. Cash pooling never uses them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionSettings {
    pub tiebreak_order: Vec<String>,
}

impl Default for DistributionSettings {
    fn default() -> Self {
        Self {
            tiebreak_order: vec!["buchholz".to_string(), "sonneborn_berger".to_string()],
        }
    }
}

/// How a distribution run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionStatus {
    /// All sections processed
    Completed,
    /// The tournament does not exist
    TournamentNotFound,
    /// The tournament has no standings
    NoPlayers,
}

/// Full result of one distribution run over a tournament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionOutcome {
    pub status: DistributionStatus,
    /// All prize records across sections
    pub records: Vec<DistributionRecord>,
    /// Distinct prize definitions actually awarded, deduplicated by
    /// `(name, kind, section, position, rating_category)`
    pub prizes_used: Vec<AwardedPrize>,
    /// Sections processed, in standings order; persistence replaces each
    /// of these even when a section produced zero records
    pub sections: Vec<String>,
    /// Configured sections that matched no standings section
    pub ignored_sections: Vec<String>,
    /// When this distribution was computed
    pub computed_at: DateTime<Utc>,
}

impl DistributionOutcome {
    fn empty(status: DistributionStatus) -> Self {
        Self {
            status,
            records: Vec::new(),
            prizes_used: Vec::new(),
            sections: Vec::new(),
            ignored_sections: Vec::new(),
            computed_at: Utc::now(),
        }
    }
}

/// One section's computed distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionDistribution {
    pub records: Vec<DistributionRecord>,
    /// Prize definitions that produced at least one record
    pub prizes_used: Vec<PrizeDefinition>,
}

/// Compute one section's distribution. Pure and synchronous: standings in,
/// records out, no I/O.
///
/// Runs the allocators in priority order (cash pooling, then
/// rating-category prizes, then general awards), each respecting the
/// winners marked by the previous one, and verifies the
/// one-cash-prize-per-player invariant before returning.
pub fn distribute_section(
    standings: &[StandingEntry],
    config: &SectionPrizeConfig,
    settings: &DistributionSettings,
) -> DistributionResult<SectionDistribution> {
    let section = config.section_name.as_str();
    let mut state = AllocationState::new();

    let position_cash: Vec<PrizeDefinition> = config
        .prizes
        .iter()
        .filter(|prize| prize.is_position_cash())
        .cloned()
        .collect();
    let groups = group_by_score(standings);
    pool_cash_prizes(&groups, &position_cash, section, &mut state);

    let rating_prizes: Vec<PrizeDefinition> = config
        .prizes
        .iter()
        .filter(|prize| prize.rating_category.is_some())
        .cloned()
        .collect();
    allocate_rating_prizes(standings, &rating_prizes, section, settings, &mut state);

    let general_prizes: Vec<PrizeDefinition> = config
        .prizes
        .iter()
        .filter(|prize| !prize.is_cash() && prize.rating_category.is_none())
        .cloned()
        .collect();
    allocate_general_prizes(standings, &general_prizes, section, settings, &mut state);

    // One cash record per player per section; a violation here means a
    // pooling bug, so the whole run fails
    let mut cash_seen = HashSet::new();
    for record in state.records.iter().filter(|r| r.prize_kind.is_cash()) {
        if !cash_seen.insert(record.player_id) {
            return Err(DistributionError::DuplicateCashAward {
                player_id: record.player_id,
                section: section.to_string(),
            });
        }
    }

    Ok(SectionDistribution {
        records: state.records,
        prizes_used: state.used,
    })
}

/// The prize distribution engine.
///
/// Stateless across runs: re-running for the same tournament fully
/// recomputes and replaces prior output. Sections share no mutable state;
/// concurrent runs for the same tournament must be serialized by the
/// caller because the replace-all persistence step does not merge
/// concurrent writers.
#[derive(Clone)]
pub struct DistributionEngine {
    standings: Arc<dyn StandingsProvider>,
    config: Arc<dyn PrizeConfigLoader>,
    store: Arc<dyn DistributionStore>,
    settings: DistributionSettings,
}

impl DistributionEngine {
    /// Create a new engine over the three collaborators.
    pub fn new(
        standings: Arc<dyn StandingsProvider>,
        config: Arc<dyn PrizeConfigLoader>,
        store: Arc<dyn DistributionStore>,
    ) -> Self {
        Self {
            standings,
            config,
            store,
            settings: DistributionSettings::default(),
        }
    }

    /// Replace the default settings.
    pub fn with_settings(mut self, settings: DistributionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Fetch standings and configuration, compute the full cross-section
    /// distribution, and return it without persisting anything.
    pub async fn compute_distribution(
        &self,
        tournament_id: TournamentId,
    ) -> DistributionResult<DistributionOutcome> {
        let Some(standings) = self.standings.get_standings(tournament_id).await? else {
            log::info!("Tournament {tournament_id} not found, nothing to distribute");
            return Ok(DistributionOutcome::empty(
                DistributionStatus::TournamentNotFound,
            ));
        };
        if standings.is_empty() {
            log::info!("Tournament {tournament_id} has no standings, nothing to distribute");
            return Ok(DistributionOutcome::empty(DistributionStatus::NoPlayers));
        }

        let raw = self.config.get_prize_config(tournament_id).await?;
        let outcome = self.compute_from_inputs(&standings, raw.as_ref())?;
        if !outcome.ignored_sections.is_empty() {
            log::warn!(
                "Tournament {tournament_id}: ignored configured sections with no standings: {:?}",
                outcome.ignored_sections
            );
        }
        log::info!(
            "Tournament {tournament_id}: {} prize records across {} sections",
            outcome.records.len(),
            outcome.sections.len()
        );
        Ok(outcome)
    }

    /// As [`compute_distribution`](Self::compute_distribution), then
    /// replace the persisted distribution: one atomic
    /// replace-all-for-section write per section plus the deduplicated
    /// dictionary of prize definitions actually used. Idempotent given
    /// identical inputs.
    pub async fn compute_and_persist_distribution(
        &self,
        tournament_id: TournamentId,
    ) -> DistributionResult<DistributionOutcome> {
        let outcome = self.compute_distribution(tournament_id).await?;
        if outcome.status != DistributionStatus::Completed {
            return Ok(outcome);
        }

        for section in &outcome.sections {
            let records: Vec<DistributionRecord> = outcome
                .records
                .iter()
                .filter(|record| record.section == *section)
                .cloned()
                .collect();
            self.store
                .replace_section_distributions(tournament_id, section, &records)
                .await?;
        }
        self.store
            .replace_prize_definitions(tournament_id, &outcome.prizes_used)
            .await?;

        Ok(outcome)
    }

    /// Run canonicalization and every section's allocation over in-memory
    /// inputs.
    fn compute_from_inputs(
        &self,
        standings: &[StandingEntry],
        raw_config: Option<&serde_json::Value>,
    ) -> DistributionResult<DistributionOutcome> {
        let canonical = canonicalize_config(raw_config, standings);

        let mut by_section: Vec<(String, Vec<StandingEntry>)> = Vec::new();
        for entry in standings {
            let key = normalize_section_name(&entry.section);
            match by_section.iter_mut().find(|(name, _)| *name == key) {
                Some((_, list)) => list.push(entry.clone()),
                None => by_section.push((key, vec![entry.clone()])),
            }
        }

        let mut records = Vec::new();
        let mut prizes_used = Vec::new();
        let mut sections = Vec::new();
        for config in &canonical.sections {
            let Some((_, section_standings)) = by_section
                .iter()
                .find(|(name, _)| *name == config.section_name)
            else {
                continue;
            };
            let section = distribute_section(section_standings, config, &self.settings)?;
            records.extend(section.records);
            prizes_used.extend(section.prizes_used.into_iter().map(|definition| {
                AwardedPrize {
                    section: config.section_name.clone(),
                    definition,
                }
            }));
            sections.push(config.section_name.clone());
        }

        Ok(DistributionOutcome {
            status: DistributionStatus::Completed,
            records,
            prizes_used: dedup_awarded(prizes_used),
            sections,
            ignored_sections: canonical.ignored_sections,
            computed_at: Utc::now(),
        })
    }
}

/// Deduplicate awarded prizes by their persistence key, keeping first
/// occurrences in order.
fn dedup_awarded(prizes: Vec<AwardedPrize>) -> Vec<AwardedPrize> {
    let mut seen = HashSet::new();
    prizes
        .into_iter()
        .filter(|prize| seen.insert(prize.dedup_key()))
        .collect()
}
