//! Standing entry model and section-name normalization.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Player ID type
pub type PlayerId = i64;

/// Tournament ID type
pub type TournamentId = i64;

/// One player's section-scoped result, as supplied by the standings
/// provider. Scores and tiebreakers are precomputed upstream; the engine
/// only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingEntry {
    /// Player ID (owned by the standings provider)
    pub player_id: PlayerId,
    /// Player name
    pub name: String,
    /// USCF rating; `None` or 0 means unrated
    pub rating: Option<u32>,
    /// Section name as stored upstream (normalized for matching)
    pub section: String,
    /// Cumulative score, a non-negative multiple of 0.5
    pub total_points: f64,
    /// Precomputed tiebreaker values by name (e.g. "buchholz")
    #[serde(default)]
    pub tiebreakers: HashMap<String, f64>,
}

impl StandingEntry {
    /// Score in half-point units. Grouping and ordering compare scores in
    /// this integer form so float noise can never split a tie group.
    pub fn half_points(&self) -> i64 {
        (self.total_points * 2.0).round() as i64
    }

    /// Tiebreaker value by name, 0 when the provider did not supply it.
    pub fn tiebreaker(&self, name: &str) -> f64 {
        self.tiebreakers.get(name).copied().unwrap_or(0.0)
    }

    /// Rating with the "0 means unrated" convention folded into `None`.
    pub fn effective_rating(&self) -> Option<u32> {
        match self.rating {
            None | Some(0) => None,
            rating => rating,
        }
    }
}

/// Normalize a section name for matching: trim, collapse internal
/// whitespace, lowercase, and strip a trailing "section" word. "OPEN
/// Section" and "open" refer to the same section.
pub fn normalize_section_name(raw: &str) -> String {
    let mut words: Vec<&str> = raw.split_whitespace().collect();
    if words.len() > 1
        && words
            .last()
            .is_some_and(|last| last.eq_ignore_ascii_case("section"))
    {
        words.pop();
    }
    words.join(" ").to_lowercase()
}

/// Rating comparison, highest first, unrated players last.
pub fn compare_rating_desc(a: &StandingEntry, b: &StandingEntry) -> Ordering {
    match (a.effective_rating(), b.effective_rating()) {
        (Some(ra), Some(rb)) => rb.cmp(&ra),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Full rank ordering for a section: score descending, then the configured
/// tiebreakers in order, then rating descending, then name. Used by the
/// rating-category and general allocators; cash pooling deliberately
/// ignores everything past the score.
pub fn rank_ordering(a: &StandingEntry, b: &StandingEntry, tiebreak_order: &[String]) -> Ordering {
    b.half_points()
        .cmp(&a.half_points())
        .then_with(|| {
            for name in tiebreak_order {
                let ord = b
                    .tiebreaker(name)
                    .partial_cmp(&a.tiebreaker(name))
                    .unwrap_or(Ordering::Equal);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        })
        .then_with(|| compare_rating_desc(a, b))
        .then_with(|| a.name.cmp(&b.name))
}
