//! General non-cash prizes: trophies, medals, plaques.

use super::AllocationState;
use super::engine::DistributionSettings;
use crate::prizes::{DistributionRecord, PrizeDefinition};
use crate::standings::{StandingEntry, rank_ordering};

/// Allocate the section's non-cash, non-rating prizes in configuration
/// order.
///
/// A prize with a position goes to the player at that rank in the full
/// section ordering regardless of cash already won; a 1st-place trophy
/// stacks with 1st-place money. A prize without a position goes to the
/// next ranked player who holds no award of any kind. Stops when prizes or
/// players run out.
pub(crate) fn allocate_general_prizes(
    standings: &[StandingEntry],
    prizes: &[PrizeDefinition],
    section: &str,
    settings: &DistributionSettings,
    state: &mut AllocationState,
) {
    let mut ranked: Vec<&StandingEntry> = standings.iter().collect();
    ranked.sort_by(|a, b| rank_ordering(a, b, &settings.tiebreak_order));

    for prize in prizes {
        let winner = match prize.position {
            Some(place) => place
                .checked_sub(1)
                .and_then(|index| ranked.get(index as usize))
                .copied(),
            None => ranked
                .iter()
                .find(|player| !state.holds_anything(player.player_id))
                .copied(),
        };
        let Some(winner) = winner else {
            log::debug!(
                "No remaining player for '{}' in section '{section}'",
                prize.name
            );
            continue;
        };

        state.records.push(DistributionRecord {
            player_id: winner.player_id,
            section: section.to_string(),
            prize_name: prize.name.clone(),
            prize_kind: prize.kind.clone(),
            amount: None,
            position: prize.position,
            tie_group: None,
        });
        state.prize_holders.insert(winner.player_id);
        state.used.push(prize.clone());
    }
}
