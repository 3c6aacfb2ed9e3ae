//! Standings supplied by the external standings provider.
//!
//! The engine never computes scores or tiebreakers itself: every
//! [`StandingEntry`] arrives with its cumulative score and a map of
//! precomputed tiebreaker values (Buchholz, Sonneborn-Berger, ...), and is
//! immutable for the duration of one distribution run.

pub mod models;

pub use models::{
    PlayerId, StandingEntry, TournamentId, compare_rating_desc, normalize_section_name,
    rank_ordering,
};
