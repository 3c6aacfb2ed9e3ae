//! Canonicalization of raw prize settings.
//!
//! Tournament settings arrive as an opaque JSON structure (the same shape
//! the settings table stores). This module turns them into per-section
//! canonical prize lists, synthesizing a default template when nothing is
//! configured and dropping malformed prizes with a warning instead of
//! failing the run.

use super::category::RatingCategory;
use super::models::{Cents, PrizeDefinition, PrizeKind, SectionPrizeConfig, cents_from_amount};
use crate::standings::{StandingEntry, normalize_section_name};
use serde::Deserialize;
use serde_json::Value;

/// Default template shares of the prize fund for places 1-3.
const DEFAULT_CASH_SHARES: [(u32, f64); 3] = [(1, 0.40), (2, 0.25), (3, 0.15)];

/// Raw settings object as stored upstream. Every field is optional; any
/// shape mismatch degrades to the default template.
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    #[serde(default)]
    prize_fund: Option<f64>,
    #[serde(default)]
    sections: Vec<RawSection>,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    name: String,
    #[serde(default)]
    prizes: Vec<RawPrize>,
}

#[derive(Debug, Deserialize)]
struct RawPrize {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    position: Option<u32>,
    #[serde(default)]
    rating_category: Option<String>,
    #[serde(default)]
    amount: Option<f64>,
}

/// Result of canonicalizing raw settings against observed standings.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalConfig {
    /// One entry per section that will be distributed, in observed order
    pub sections: Vec<SectionPrizeConfig>,
    /// Configured sections that matched no standings section and were
    /// dropped
    pub ignored_sections: Vec<String>,
}

/// Canonicalize raw settings into per-section prize lists.
///
/// Configured sections are matched to standings sections by normalized
/// name; unmatched ones are reported in `ignored_sections`. When no
/// sections are configured at all, each observed section gets the default
/// template: cash for places 1-3 at 40/25/15% of the prize fund plus
/// trophies for places 1-3.
pub fn canonicalize_config(raw: Option<&Value>, standings: &[StandingEntry]) -> CanonicalConfig {
    let observed = observed_sections(standings);

    let settings = match raw {
        Some(value) => match serde_json::from_value::<RawSettings>(value.clone()) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Unreadable prize settings, using default template: {err}");
                RawSettings::default()
            }
        },
        None => RawSettings::default(),
    };

    let fund_cents = settings
        .prize_fund
        .and_then(cents_from_amount)
        .unwrap_or(0);

    if settings.sections.is_empty() {
        let sections = observed
            .iter()
            .map(|name| default_template(name, fund_cents))
            .collect();
        return CanonicalConfig {
            sections,
            ignored_sections: Vec::new(),
        };
    }

    let mut sections = Vec::new();
    let mut ignored_sections = Vec::new();
    for raw_section in settings.sections {
        let normalized = normalize_section_name(&raw_section.name);
        if !observed.contains(&normalized) {
            log::warn!(
                "Configured section '{}' matches no standings section, ignoring",
                raw_section.name
            );
            ignored_sections.push(raw_section.name);
            continue;
        }

        let prizes: Vec<PrizeDefinition> = raw_section
            .prizes
            .into_iter()
            .filter_map(|prize| build_prize(prize, &normalized))
            .collect();
        // Two configured spellings of one section ("Open", "Open Section")
        // merge into a single prize list, so the section runs once and the
        // one-cash-per-player rule sees every prize
        match sections
            .iter_mut()
            .find(|existing: &&mut SectionPrizeConfig| existing.section_name == normalized)
        {
            Some(existing) => existing.prizes.extend(prizes),
            None => sections.push(SectionPrizeConfig {
                section_name: normalized,
                prizes,
            }),
        }
    }

    CanonicalConfig {
        sections,
        ignored_sections,
    }
}

/// Distinct normalized section names in standings order.
fn observed_sections(standings: &[StandingEntry]) -> Vec<String> {
    let mut observed: Vec<String> = Vec::new();
    for entry in standings {
        let name = normalize_section_name(&entry.section);
        if !observed.contains(&name) {
            observed.push(name);
        }
    }
    observed
}

/// Default prize template for a section with no configured prizes.
fn default_template(section_name: &str, fund_cents: Cents) -> SectionPrizeConfig {
    let mut prizes = Vec::new();
    for (place, share) in DEFAULT_CASH_SHARES {
        let amount = (fund_cents as f64 * share).round() as Cents;
        // A zero prize fund leaves only the trophies
        if amount > 0 {
            prizes.push(PrizeDefinition {
                name: ordinal(place),
                kind: PrizeKind::Cash,
                position: Some(place),
                rating_category: None,
                amount: Some(amount),
            });
        }
    }
    for place in 1..=3 {
        prizes.push(PrizeDefinition {
            name: format!("{} Place Trophy", ordinal(place)),
            kind: PrizeKind::Trophy,
            position: Some(place),
            rating_category: None,
            amount: None,
        });
    }
    SectionPrizeConfig {
        section_name: section_name.to_string(),
        prizes,
    }
}

/// Validate one raw prize, returning `None` (with a warning) when it is
/// malformed. Configuration errors are never fatal.
fn build_prize(raw: RawPrize, section: &str) -> Option<PrizeDefinition> {
    if raw.position == Some(0) {
        log::warn!(
            "Dropping prize {:?} in section '{section}': position must be at least 1",
            raw.name
        );
        return None;
    }

    let kind = match raw.kind {
        Some(kind) => PrizeKind::from(kind),
        None if raw.amount.is_some() => PrizeKind::Cash,
        None => PrizeKind::Trophy,
    };

    let rating_category = match raw.rating_category {
        Some(ref text) => match text.parse::<RatingCategory>() {
            Ok(category) => Some(category),
            Err(err) => {
                log::warn!("Dropping prize in section '{section}': {err}");
                return None;
            }
        },
        None => None,
    };

    let amount = if kind.is_cash() {
        let cents = raw.amount.and_then(cents_from_amount);
        match cents {
            Some(cents) if cents > 0 => Some(cents),
            _ => {
                log::warn!(
                    "Dropping cash prize {:?} in section '{section}': amount must be a positive number",
                    raw.name
                );
                return None;
            }
        }
    } else {
        // Amounts only exist on cash prizes
        None
    };

    if kind.is_cash() && raw.position.is_none() && rating_category.is_none() {
        log::warn!(
            "Dropping cash prize {:?} in section '{section}': needs a position or rating category",
            raw.name
        );
        return None;
    }

    let name = raw.name.unwrap_or_else(|| match (&rating_category, raw.position) {
        (Some(category), _) => category.to_string(),
        (None, Some(place)) => ordinal(place),
        (None, None) => kind.to_string(),
    });

    Some(PrizeDefinition {
        name,
        kind,
        position: raw.position,
        rating_category,
        amount,
    })
}

/// 1 -> "1st", 2 -> "2nd", ...
pub(crate) fn ordinal(place: u32) -> String {
    let suffix = match place % 100 {
        11..=13 => "th",
        _ => match place % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    };
    format!("{place}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn player(section: &str) -> StandingEntry {
        StandingEntry {
            player_id: 1,
            name: "Player".to_string(),
            rating: Some(1500),
            section: section.to_string(),
            total_points: 3.0,
            tiebreakers: HashMap::new(),
        }
    }

    #[test]
    fn test_default_template_splits_fund() {
        let standings = vec![player("Open")];
        let raw = json!({ "prize_fund": 1000.0 });
        let config = canonicalize_config(Some(&raw), &standings);

        assert_eq!(config.sections.len(), 1);
        let prizes = &config.sections[0].prizes;
        let cash: Vec<_> = prizes.iter().filter(|p| p.is_cash()).collect();
        assert_eq!(cash.len(), 3);
        assert_eq!(cash[0].amount, Some(40000)); // 40% of 1000.00
        assert_eq!(cash[1].amount, Some(25000));
        assert_eq!(cash[2].amount, Some(15000));
        assert_eq!(
            prizes.iter().filter(|p| p.kind == PrizeKind::Trophy).count(),
            3
        );
    }

    #[test]
    fn test_default_template_without_fund_has_only_trophies() {
        let standings = vec![player("Open")];
        let config = canonicalize_config(None, &standings);

        assert_eq!(config.sections.len(), 1);
        assert!(config.sections[0].prizes.iter().all(|p| !p.is_cash()));
        assert_eq!(config.sections[0].prizes.len(), 3);
    }

    #[test]
    fn test_default_template_per_observed_section() {
        let standings = vec![player("Open"), player("Reserve"), player("open SECTION")];
        let config = canonicalize_config(None, &standings);

        let names: Vec<_> = config
            .sections
            .iter()
            .map(|s| s.section_name.as_str())
            .collect();
        assert_eq!(names, vec!["open", "reserve"]);
    }

    #[test]
    fn test_configured_section_matches_by_normalized_name() {
        let standings = vec![player("OPEN Section")];
        let raw = json!({
            "sections": [{
                "name": "Open",
                "prizes": [{ "name": "1st", "kind": "cash", "position": 1, "amount": 100.0 }]
            }]
        });
        let config = canonicalize_config(Some(&raw), &standings);

        assert_eq!(config.sections.len(), 1);
        assert_eq!(config.sections[0].section_name, "open");
        assert_eq!(config.sections[0].prizes[0].amount, Some(10000));
        assert!(config.ignored_sections.is_empty());
    }

    #[test]
    fn test_unmatched_configured_section_is_reported() {
        let standings = vec![player("Open")];
        let raw = json!({
            "sections": [
                { "name": "Open", "prizes": [] },
                { "name": "Scholastic", "prizes": [] }
            ]
        });
        let config = canonicalize_config(Some(&raw), &standings);

        assert_eq!(config.sections.len(), 1);
        assert_eq!(config.ignored_sections, vec!["Scholastic".to_string()]);
    }

    #[test]
    fn test_malformed_cash_amount_drops_prize() {
        let standings = vec![player("Open")];
        let raw = json!({
            "sections": [{
                "name": "Open",
                "prizes": [
                    { "name": "1st", "kind": "cash", "position": 1, "amount": -5.0 },
                    { "name": "2nd", "kind": "cash", "position": 2 },
                    { "name": "3rd", "kind": "cash", "position": 3, "amount": 40.0 }
                ]
            }]
        });
        let config = canonicalize_config(Some(&raw), &standings);

        let prizes = &config.sections[0].prizes;
        assert_eq!(prizes.len(), 1, "only the valid cash prize survives");
        assert_eq!(prizes[0].name, "3rd");
    }

    #[test]
    fn test_position_zero_drops_prize() {
        let standings = vec![player("Open")];
        let raw = json!({
            "sections": [{
                "name": "Open",
                "prizes": [
                    { "name": "Phantom", "kind": "trophy", "position": 0 },
                    { "name": "Zeroth", "kind": "cash", "position": 0, "amount": 25.0 },
                    { "name": "1st", "kind": "cash", "position": 1, "amount": 50.0 }
                ]
            }]
        });
        let config = canonicalize_config(Some(&raw), &standings);

        let prizes = &config.sections[0].prizes;
        assert_eq!(prizes.len(), 1, "positions start at 1");
        assert_eq!(prizes[0].name, "1st");
    }

    #[test]
    fn test_sections_normalizing_to_same_name_merge() {
        let standings = vec![player("Open")];
        let raw = json!({
            "sections": [
                {
                    "name": "Open",
                    "prizes": [{ "name": "1st", "kind": "cash", "position": 1, "amount": 100.0 }]
                },
                {
                    "name": "Open Section",
                    "prizes": [{ "name": "1st Place Trophy", "kind": "trophy", "position": 1 }]
                }
            ]
        });
        let config = canonicalize_config(Some(&raw), &standings);

        assert_eq!(config.sections.len(), 1, "one section despite two spellings");
        assert_eq!(config.sections[0].section_name, "open");
        assert_eq!(config.sections[0].prizes.len(), 2);
        assert!(config.ignored_sections.is_empty());
    }

    #[test]
    fn test_unparsable_rating_category_drops_prize() {
        let standings = vec![player("Open")];
        let raw = json!({
            "sections": [{
                "name": "Open",
                "prizes": [
                    { "kind": "cash", "rating_category": "Best Dressed", "amount": 25.0 },
                    { "kind": "cash", "rating_category": "Under 1400", "amount": 25.0 }
                ]
            }]
        });
        let config = canonicalize_config(Some(&raw), &standings);

        let prizes = &config.sections[0].prizes;
        assert_eq!(prizes.len(), 1);
        assert_eq!(
            prizes[0].rating_category,
            Some(RatingCategory::Under(1400))
        );
        assert_eq!(prizes[0].name, "Under 1400");
    }

    #[test]
    fn test_non_cash_prize_never_keeps_amount() {
        let standings = vec![player("Open")];
        let raw = json!({
            "sections": [{
                "name": "Open",
                "prizes": [{ "name": "Top Trophy", "kind": "trophy", "position": 1, "amount": 10.0 }]
            }]
        });
        let config = canonicalize_config(Some(&raw), &standings);
        assert_eq!(config.sections[0].prizes[0].amount, None);
    }

    #[test]
    fn test_garbage_settings_degrade_to_default_template() {
        let standings = vec![player("Open")];
        let raw = json!({ "sections": "oops" });
        let config = canonicalize_config(Some(&raw), &standings);

        assert_eq!(config.sections.len(), 1);
        assert_eq!(config.sections[0].prizes.len(), 3); // trophies only
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(21), "21st");
    }
}
