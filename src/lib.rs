//! # Chess Prizes
//!
//! A prize distribution engine for chess tournaments: given the final
//! standings of a tournament section and the tournament's prize
//! configuration, compute which players win which prizes and how much cash
//! each receives.
//!
//! The engine implements the equitable-pooling rules used by tournament
//! directors:
//!
//! - Cash prizes for tied positions are pooled and split evenly, with no
//!   player receiving more than the largest prize they would have won
//!   outright.
//! - A player receives at most one cash prize per section.
//! - Rating-restricted prizes ("Under 1400", "1600-1799", "2200+", ...) go
//!   to the best-placed eligible player not already holding cash.
//! - Indivisible awards (trophies, medals, plaques) go one per player in
//!   rank order.
//!
//! All money is handled as integer cents, and remainder cents from uneven
//! splits are assigned deterministically, so two runs over the same inputs
//! always produce the same distribution.
//!
//! ## Core Modules
//!
//! - [`standings`]: Section standings as supplied by the standings provider
//! - [`prizes`]: Prize configuration, rating categories, and output records
//! - [`distribution`]: Score grouping, the three allocators, and the engine
//! - [`db`]: Postgres-backed collaborators and the connection pool
//!
//! ## Example
//!
//! ```no_run
//! use chess_prizes::db::{Database, DatabaseConfig};
//! use chess_prizes::db::repository::{
//!     PgDistributionStore, PgPrizeConfigLoader, PgStandingsProvider,
//! };
//! use chess_prizes::DistributionEngine;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&DatabaseConfig::from_env()).await?;
//!     let pool = db.pool().clone();
//!     let engine = DistributionEngine::new(
//!         Arc::new(PgStandingsProvider::new(pool.clone())),
//!         Arc::new(PgPrizeConfigLoader::new(pool.clone())),
//!         Arc::new(PgDistributionStore::new(pool)),
//!     );
//!
//!     let outcome = engine.compute_and_persist_distribution(42).await?;
//!     println!("persisted {} prize records", outcome.records.len());
//!     Ok(())
//! }
//! ```

/// Database collaborators: pool wrapper, configuration, and repositories.
pub mod db;

/// Score grouping, prize allocators, and the distribution engine.
pub mod distribution;

/// Prize configuration model and distribution output records.
pub mod prizes;

/// Standings entries supplied by the standings provider.
pub mod standings;

pub use distribution::{
    DistributionEngine, DistributionError, DistributionOutcome, DistributionResult,
    DistributionSettings, DistributionStatus, ScoreGroup, SectionDistribution, distribute_section,
    group_by_score,
};
pub use prizes::{
    AwardedPrize, Cents, DistributionRecord, PrizeDefinition, PrizeKind, RatingCategory,
    SectionPrizeConfig, cents_from_amount, format_cents,
};
pub use standings::{PlayerId, StandingEntry, TournamentId, normalize_section_name};
