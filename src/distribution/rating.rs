//! Rating-category prizes: rating-bounded cash ladders and awards.

use super::AllocationState;
use super::cash::pool_cash_prizes;
use super::engine::DistributionSettings;
use super::grouping::group_by_score;
use crate::prizes::{DistributionRecord, PrizeDefinition, RatingCategory};
use crate::standings::{StandingEntry, rank_ordering};

/// Allocate all rating-category prizes for one section.
///
/// Cash prizes of one category form a positioned ladder (1st Under 1400,
/// 2nd Under 1400, ...) over the category's eligible sub-standings and run
/// through the same pooling routine as open position prizes, so tie
/// handling is identical in both paths. Winners become cash-holders for
/// the rest of the section.
///
/// Non-cash rating prizes go to the player at the prize's place within the
/// category; the winner then counts as holding an award and is skipped by
/// later non-cash prizes.
pub(crate) fn allocate_rating_prizes(
    standings: &[StandingEntry],
    prizes: &[PrizeDefinition],
    section: &str,
    settings: &DistributionSettings,
    state: &mut AllocationState,
) {
    allocate_cash_ladders(standings, prizes, section, settings, state);

    for prize in prizes.iter().filter(|prize| !prize.is_cash()) {
        let Some(category) = prize.rating_category else {
            continue;
        };
        award_non_cash(standings, prize, category, section, settings, state);
    }
}

/// Group the cash rating prizes by category (first-appearance order) and
/// run each category's ladder through the pooling allocator.
fn allocate_cash_ladders(
    standings: &[StandingEntry],
    prizes: &[PrizeDefinition],
    section: &str,
    settings: &DistributionSettings,
    state: &mut AllocationState,
) {
    let mut ladders: Vec<(RatingCategory, Vec<PrizeDefinition>)> = Vec::new();
    for prize in prizes.iter().filter(|prize| prize.is_cash()) {
        let Some(category) = prize.rating_category else {
            continue;
        };
        // Definitions are kept as configured; the pooling allocator treats
        // a missing position as 1st place within the category
        match ladders.iter_mut().find(|(c, _)| *c == category) {
            Some((_, ladder)) => ladder.push(prize.clone()),
            None => ladders.push((category, vec![prize.clone()])),
        }
    }

    for (category, ladder) in ladders {
        let mut eligible: Vec<StandingEntry> = standings
            .iter()
            .filter(|player| {
                category.matches(player.effective_rating())
                    && !state.cash_winners.contains(&player.player_id)
            })
            .cloned()
            .collect();
        if eligible.is_empty() {
            log::debug!("No eligible players for '{category}' cash in section '{section}'");
            continue;
        }
        eligible.sort_by(|a, b| rank_ordering(a, b, &settings.tiebreak_order));

        // Regroup by score within the category; grouping is stable, so the
        // rank order above survives within groups
        let groups = group_by_score(&eligible);
        let before = state.records.len();
        pool_cash_prizes(&groups, &ladder, section, state);

        // A rating cash prize also blocks later non-cash reuse
        let new_winners: Vec<_> = state.records[before..]
            .iter()
            .map(|record| record.player_id)
            .collect();
        state.prize_holders.extend(new_winners);
    }
}

/// Award one non-cash rating prize to the player at its place within the
/// category's eligible, tiebreak-ordered sub-standings.
fn award_non_cash(
    standings: &[StandingEntry],
    prize: &PrizeDefinition,
    category: RatingCategory,
    section: &str,
    settings: &DistributionSettings,
    state: &mut AllocationState,
) {
    let mut eligible: Vec<&StandingEntry> = standings
        .iter()
        .filter(|player| {
            category.matches(player.effective_rating()) && !state.holds_anything(player.player_id)
        })
        .collect();
    eligible.sort_by(|a, b| rank_ordering(a, b, &settings.tiebreak_order));

    let place = prize.position.unwrap_or(1);
    let Some(winner) = place
        .checked_sub(1)
        .and_then(|index| eligible.get(index as usize))
    else {
        log::debug!(
            "No eligible player for '{}' in section '{section}'",
            prize.name
        );
        return;
    };

    state.records.push(DistributionRecord {
        player_id: winner.player_id,
        section: section.to_string(),
        prize_name: prize.name.clone(),
        prize_kind: prize.kind.clone(),
        amount: None,
        position: Some(place),
        tie_group: None,
    });
    state.prize_holders.insert(winner.player_id);
    state.used.push(prize.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prizes::{Cents, PrizeKind};
    use std::collections::HashMap;

    fn entry(id: i64, name: &str, rating: Option<u32>, points: f64) -> StandingEntry {
        StandingEntry {
            player_id: id,
            name: name.to_string(),
            rating,
            section: "open".to_string(),
            total_points: points,
            tiebreakers: HashMap::new(),
        }
    }

    fn rating_cash(name: &str, category: &str, cents: Cents) -> PrizeDefinition {
        PrizeDefinition {
            name: name.to_string(),
            kind: PrizeKind::Cash,
            position: None,
            rating_category: Some(category.parse().unwrap()),
            amount: Some(cents),
        }
    }

    fn settings() -> DistributionSettings {
        DistributionSettings::default()
    }

    fn run(standings: &[StandingEntry], prizes: &[PrizeDefinition]) -> AllocationState {
        let mut state = AllocationState::new();
        allocate_rating_prizes(standings, prizes, "open", &settings(), &mut state);
        state
    }

    #[test]
    fn test_best_eligible_player_wins() {
        let standings = vec![
            entry(1, "Strong", Some(1900), 4.0),
            entry(2, "Eligible", Some(1350), 3.0),
            entry(3, "Weaker", Some(1200), 2.5),
        ];
        let prizes = vec![rating_cash("Under 1400", "Under 1400", 5000)];
        let state = run(&standings, &prizes);

        assert_eq!(state.records.len(), 1);
        assert_eq!(state.records[0].player_id, 2);
        assert_eq!(state.records[0].amount, Some(5000));
    }

    #[test]
    fn test_no_eligible_player_awards_nothing() {
        // "Under 1200" with all standings at or above 1200
        let standings = vec![
            entry(1, "A", Some(1500), 4.0),
            entry(2, "B", Some(1200), 3.0),
        ];
        let prizes = vec![rating_cash("Under 1200", "Under 1200", 5000)];
        let state = run(&standings, &prizes);

        assert!(state.records.is_empty(), "no records and no error");
    }

    #[test]
    fn test_cash_winner_excluded_from_rating_pool() {
        let mut state = AllocationState::new();
        state.cash_winners.insert(2); // already won a position prize
        let standings = vec![
            entry(2, "TopU1600", Some(1550), 4.0),
            entry(3, "NextU1600", Some(1500), 3.0),
        ];
        let prizes = vec![rating_cash("Under 1600", "Under 1600", 5000)];
        allocate_rating_prizes(&standings, &prizes, "open", &settings(), &mut state);

        assert_eq!(state.records.len(), 1);
        assert_eq!(
            state.records[0].player_id, 3,
            "pool recomputes over remaining eligible players"
        );
    }

    #[test]
    fn test_tied_category_leaders_split_prize() {
        let standings = vec![
            entry(1, "A", Some(1390), 3.0),
            entry(2, "B", Some(1380), 3.0),
        ];
        let prizes = vec![rating_cash("Under 1400", "Under 1400", 5001)];
        let state = run(&standings, &prizes);

        assert_eq!(state.records.len(), 2);
        let by_id: HashMap<i64, Cents> = state
            .records
            .iter()
            .map(|r| (r.player_id, r.amount.unwrap()))
            .collect();
        assert_eq!(by_id[&1], 2501, "higher rating takes the odd cent");
        assert_eq!(by_id[&2], 2500);
        assert!(state.records.iter().all(|r| r.tie_group.is_some()));
    }

    #[test]
    fn test_category_ladder_pays_two_places() {
        let standings = vec![
            entry(1, "First", Some(1390), 3.5),
            entry(2, "Second", Some(1380), 3.0),
            entry(3, "Third", Some(1370), 2.0),
        ];
        let mut second = rating_cash("2nd Under 1400", "Under 1400", 3000);
        second.position = Some(2);
        let prizes = vec![rating_cash("1st Under 1400", "Under 1400", 5000), second];
        let state = run(&standings, &prizes);

        let by_id: HashMap<i64, Cents> = state
            .records
            .iter()
            .map(|r| (r.player_id, r.amount.unwrap()))
            .collect();
        assert_eq!(by_id[&1], 5000);
        assert_eq!(by_id[&2], 3000);
        assert!(!by_id.contains_key(&3));
    }

    #[test]
    fn test_unrated_prize_matches_missing_and_zero_ratings() {
        let standings = vec![
            entry(1, "Rated", Some(900), 4.0),
            entry(2, "NoRating", None, 3.0),
            entry(3, "ZeroRating", Some(0), 3.5),
        ];
        let prizes = vec![rating_cash("Unrated", "Unrated", 4000)];
        let state = run(&standings, &prizes);

        assert_eq!(state.records.len(), 1);
        assert_eq!(state.records[0].player_id, 3, "best-placed unrated wins");
    }

    #[test]
    fn test_used_definitions_keep_configured_position() {
        let standings = vec![
            entry(1, "A", Some(1300), 3.0),
            entry(2, "B", Some(1250), 2.0),
        ];
        let mut second = rating_cash("2nd Under 1400", "Under 1400", 3000);
        second.position = Some(2);
        let prizes = vec![rating_cash("Under 1400", "Under 1400", 5000), second];
        let state = run(&standings, &prizes);

        assert_eq!(state.records.len(), 2);
        let positions: Vec<Option<u32>> = state.used.iter().map(|p| p.position).collect();
        assert_eq!(
            positions,
            vec![None, Some(2)],
            "definitions stay as configured"
        );
    }

    #[test]
    fn test_non_cash_rating_prize_blocks_later_awards() {
        let standings = vec![
            entry(1, "A", Some(1300), 3.0),
            entry(2, "B", Some(1250), 2.5),
        ];
        let trophy = PrizeDefinition {
            name: "U1400 Trophy".to_string(),
            kind: PrizeKind::Trophy,
            position: None,
            rating_category: Some("Under 1400".parse().unwrap()),
            amount: None,
        };
        let medal = PrizeDefinition {
            name: "U1400 Medal".to_string(),
            kind: PrizeKind::Medal,
            position: None,
            rating_category: Some("Under 1400".parse().unwrap()),
            amount: None,
        };
        let state = run(&standings, &[trophy, medal]);

        assert_eq!(state.records.len(), 2);
        assert_eq!(state.records[0].player_id, 1);
        assert_eq!(
            state.records[1].player_id, 2,
            "trophy holder is skipped for the medal"
        );
        assert!(state.cash_winners.is_empty(), "non-cash never blocks cash");
    }
}
