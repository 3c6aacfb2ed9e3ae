//! Prize definitions and distribution records.

use super::category::RatingCategory;
use crate::standings::PlayerId;
use serde::{Deserialize, Serialize};

/// Currency amount in integer cents. All prize math happens in cents so
/// splits and remainders are exact.
pub type Cents = i64;

/// Convert a raw currency amount to cents, rejecting non-finite and
/// negative values. Rounds to the nearest cent.
pub fn cents_from_amount(amount: f64) -> Option<Cents> {
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }
    Some((amount * 100.0).round() as Cents)
}

/// Format cents as a currency string, e.g. `6666` -> `"66.66"`.
pub fn format_cents(cents: Cents) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}

/// Prize kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PrizeKind {
    Cash,
    Trophy,
    Medal,
    Plaque,
    /// Any other non-cash award kind, kept verbatim
    Other(String),
}

impl PrizeKind {
    pub fn is_cash(&self) -> bool {
        *self == PrizeKind::Cash
    }
}

impl From<String> for PrizeKind {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "cash" => PrizeKind::Cash,
            "trophy" => PrizeKind::Trophy,
            "medal" => PrizeKind::Medal,
            "plaque" => PrizeKind::Plaque,
            _ => PrizeKind::Other(raw.trim().to_string()),
        }
    }
}

impl From<PrizeKind> for String {
    fn from(kind: PrizeKind) -> Self {
        kind.to_string()
    }
}

impl std::fmt::Display for PrizeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrizeKind::Cash => write!(f, "cash"),
            PrizeKind::Trophy => write!(f, "trophy"),
            PrizeKind::Medal => write!(f, "medal"),
            PrizeKind::Plaque => write!(f, "plaque"),
            PrizeKind::Other(other) => write!(f, "{other}"),
        }
    }
}

/// One configured prize within a section.
///
/// Exactly one of three shapes:
/// - position-based: `position` set, no `rating_category`
/// - rating-category: `rating_category` set; `position` is the place
///   within the category (1st Under 1400, 2nd Under 1400, ...)
/// - general: neither set (non-cash only)
///
/// Cash prizes always carry `amount > 0`; non-cash prizes never carry an
/// amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeDefinition {
    pub name: String,
    pub kind: PrizeKind,
    pub position: Option<u32>,
    pub rating_category: Option<RatingCategory>,
    pub amount: Option<Cents>,
}

impl PrizeDefinition {
    pub fn is_cash(&self) -> bool {
        self.kind.is_cash()
    }

    /// Cash prize tied to an overall finishing position.
    pub fn is_position_cash(&self) -> bool {
        self.is_cash() && self.position.is_some() && self.rating_category.is_none()
    }

    /// Amount in cents, 0 for non-cash prizes.
    pub fn amount_cents(&self) -> Cents {
        self.amount.unwrap_or(0)
    }
}

/// `PrizeDefinition` with the section it was awarded in; the unit the
/// persistence collaborator deduplicates into its prize dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardedPrize {
    pub section: String,
    pub definition: PrizeDefinition,
}

impl AwardedPrize {
    /// Deduplication key: `(name, kind, section, position, rating_category)`.
    pub fn dedup_key(&self) -> (String, String, String, Option<u32>, Option<String>) {
        (
            self.definition.name.clone(),
            self.definition.kind.to_string(),
            self.section.clone(),
            self.definition.position,
            self.definition.rating_category.map(|c| c.to_string()),
        )
    }
}

/// A section's canonical prize list, built once per run from raw settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionPrizeConfig {
    pub section_name: String,
    pub prizes: Vec<PrizeDefinition>,
}

/// One output unit: a player winning a prize (or a share of pooled
/// prizes) in a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionRecord {
    pub player_id: PlayerId,
    pub section: String,
    /// Prize name; a composite label like "Tied 1st + 2nd" when several
    /// cash prizes were pooled over a tie group
    pub prize_name: String,
    pub prize_kind: PrizeKind,
    /// Payout in cents; present only for cash
    pub amount: Option<Cents>,
    /// Lowest position in the covered range, for display and sorting
    pub position: Option<u32>,
    /// First position of the shared range when two or more players split
    /// the payout
    pub tie_group: Option<u32>,
}
