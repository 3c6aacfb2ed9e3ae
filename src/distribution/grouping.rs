//! Score grouping: partition a section's standings into tie groups.

use crate::standings::StandingEntry;

/// A maximal run of players sharing the same score, annotated with the
/// inclusive 1-based position range they occupy.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreGroup {
    /// First position the group occupies (1 = highest score)
    pub start_position: u32,
    pub players: Vec<StandingEntry>,
}

impl ScoreGroup {
    /// Last position the group occupies.
    pub fn end_position(&self) -> u32 {
        self.start_position + self.players.len() as u32 - 1
    }

    /// Whether the given finishing position falls inside this group.
    pub fn covers(&self, position: u32) -> bool {
        position >= self.start_position && position <= self.end_position()
    }
}

/// Partition standings into score groups in descending score order.
///
/// Grouping is score-only: tiebreakers never decide who is "tied" for
/// cash-pooling purposes, because the sum of the prizes for the tied
/// positions is split equally regardless of nominal order. The sort is
/// stable, so callers may pre-order players within equal scores.
pub fn group_by_score(standings: &[StandingEntry]) -> Vec<ScoreGroup> {
    let mut sorted = standings.to_vec();
    sorted.sort_by_key(|entry| std::cmp::Reverse(entry.half_points()));

    let mut groups: Vec<ScoreGroup> = Vec::new();
    let mut position = 1u32;
    for entry in sorted {
        match groups.last_mut() {
            Some(group) if group.players[0].half_points() == entry.half_points() => {
                group.players.push(entry);
            }
            _ => groups.push(ScoreGroup {
                start_position: position,
                players: vec![entry],
            }),
        }
        position += 1;
    }
    groups
}
