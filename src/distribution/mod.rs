//! The distribution engine: score grouping, the three allocators, and the
//! per-section assembler.
//!
//! Data flows one way: standings -> score grouping -> cash pooling ->
//! rating-category prizes -> general prizes -> assembled records. Each
//! allocator respects the winners marked by the previous one, and the
//! whole computation is pure and synchronous; only the engine's fetch and
//! persist stages are async.

pub mod cash;
pub mod engine;
pub mod errors;
pub mod general;
pub mod grouping;
pub mod rating;

pub use engine::{
    DistributionEngine, DistributionOutcome, DistributionSettings, DistributionStatus,
    SectionDistribution, distribute_section,
};
pub use errors::{DistributionError, DistributionResult};
pub use grouping::{ScoreGroup, group_by_score};

use crate::prizes::{DistributionRecord, PrizeDefinition};
use crate::standings::PlayerId;
use std::collections::HashSet;

/// Mutable state threaded through one section's allocation pass: who has
/// won what so far, the records emitted, and the prize definitions that
/// were actually used.
#[derive(Debug, Default)]
pub(crate) struct AllocationState {
    /// Players holding a cash record in this section
    pub(crate) cash_winners: HashSet<PlayerId>,
    /// Players holding any non-cash award in this section
    pub(crate) prize_holders: HashSet<PlayerId>,
    pub(crate) records: Vec<DistributionRecord>,
    pub(crate) used: Vec<PrizeDefinition>,
}

impl AllocationState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether the player holds any award at all in this section.
    pub(crate) fn holds_anything(&self, player_id: PlayerId) -> bool {
        self.cash_winners.contains(&player_id) || self.prize_holders.contains(&player_id)
    }
}
