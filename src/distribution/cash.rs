//! Cash pooling: equitable split of tied position prizes.

use super::AllocationState;
use super::grouping::ScoreGroup;
use crate::prizes::{Cents, DistributionRecord, PrizeDefinition, PrizeKind};
use crate::standings::{StandingEntry, compare_rating_desc};

/// Pool position-based cash prizes over each score group and split them.
///
/// For every group, the cash prizes whose position falls inside the
/// group's range form one pool. Players already holding cash in this
/// section are excluded (one cash prize per player); the pool then splits
/// evenly among the rest, capped so nobody receives more than the largest
/// single prize in the pool. Capped surplus is foregone, not
/// redistributed. Splits are exact: the floor share goes to everyone and
/// the remainder cents go one each to the highest-rated players first.
///
/// Also used for rating-restricted cash ladders: the caller passes the
/// category's eligible sub-standings regrouped by score, and positions are
/// places within the category. A prize without a position counts as first
/// place.
pub(crate) fn pool_cash_prizes(
    groups: &[ScoreGroup],
    prizes: &[PrizeDefinition],
    section: &str,
    state: &mut AllocationState,
) {
    for group in groups {
        let pooled: Vec<&PrizeDefinition> = prizes
            .iter()
            .filter(|prize| group.covers(prize.position.unwrap_or(1)))
            .collect();
        if pooled.is_empty() {
            continue;
        }

        let mut eligible: Vec<&StandingEntry> = group
            .players
            .iter()
            .filter(|player| !state.cash_winners.contains(&player.player_id))
            .collect();
        if eligible.is_empty() {
            // Everyone in range already holds cash; the pool is forfeited
            log::debug!(
                "Cash pool for positions {}-{} in section '{section}' has no eligible players",
                group.start_position,
                group.end_position()
            );
            continue;
        }
        // Remainder cents go to the highest-rated players first, then by
        // name, so reruns are byte-identical
        eligible.sort_by(|a, b| compare_rating_desc(a, b).then_with(|| a.name.cmp(&b.name)));

        let total: Cents = pooled.iter().map(|prize| prize.amount_cents()).sum();
        let max_prize: Cents = pooled
            .iter()
            .map(|prize| prize.amount_cents())
            .max()
            .unwrap_or(0);
        let n = eligible.len() as Cents;

        // Nobody may receive more than the largest prize they could have
        // won outright (Rule 32B3); the excess is foregone
        let distributable = total.min(max_prize * n);
        let base = distributable / n;
        let remainder = (distributable - base * n) as usize;

        let prize_name = pooled_prize_name(&pooled);
        let tie_group = (eligible.len() > 1).then_some(group.start_position);

        for (index, player) in eligible.iter().enumerate() {
            let amount = base + Cents::from(index < remainder);
            state.records.push(DistributionRecord {
                player_id: player.player_id,
                section: section.to_string(),
                prize_name: prize_name.clone(),
                prize_kind: PrizeKind::Cash,
                amount: Some(amount),
                position: Some(group.start_position),
                tie_group,
            });
            state.cash_winners.insert(player.player_id);
        }
        for prize in pooled {
            state.used.push(prize.clone());
        }
    }
}

/// "1st" for a single prize, "Tied 1st + 2nd" for a pooled pair.
fn pooled_prize_name(pooled: &[&PrizeDefinition]) -> String {
    if pooled.len() == 1 {
        pooled[0].name.clone()
    } else {
        let names: Vec<&str> = pooled.iter().map(|prize| prize.name.as_str()).collect();
        format!("Tied {}", names.join(" + "))
    }
}
