//! Rating-category eligibility bands.
//!
//! Configured category strings ("Under 1400", "1600-1799", "2200+",
//! "Unrated", USCF class names) are parsed once into a closed union at
//! configuration time; eligibility checks never touch strings again.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Unrecognized rating-category string. Makes the prize unawardable, not
/// the run a failure.
#[derive(Debug, Clone, Error)]
#[error("unrecognized rating category '{0}'")]
pub struct ParseRatingCategoryError(String);

/// A parsed rating eligibility band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RatingCategory {
    /// No rating (null or 0)
    Unrated,
    /// Rating strictly below the bound
    Under(u32),
    /// Inclusive rating range
    Range(u32, u32),
    /// Rating at or above the bound
    Plus(u32),
}

impl RatingCategory {
    /// Whether a player with the given effective rating (`None` =
    /// unrated) is eligible for this band.
    pub fn matches(&self, rating: Option<u32>) -> bool {
        match self {
            RatingCategory::Unrated => rating.is_none(),
            RatingCategory::Under(bound) => rating.is_some_and(|r| r < *bound),
            RatingCategory::Range(lo, hi) => rating.is_some_and(|r| r >= *lo && r <= *hi),
            RatingCategory::Plus(bound) => rating.is_some_and(|r| r >= *bound),
        }
    }

    /// USCF class aliases mapped to their standard bands.
    fn from_class_alias(lower: &str) -> Option<Self> {
        match lower {
            "class e" => Some(RatingCategory::Range(1000, 1199)),
            "class d" => Some(RatingCategory::Range(1200, 1399)),
            "class c" => Some(RatingCategory::Range(1400, 1599)),
            "class b" => Some(RatingCategory::Range(1600, 1799)),
            "class a" => Some(RatingCategory::Range(1800, 1999)),
            "expert" => Some(RatingCategory::Range(2000, 2199)),
            "master" => Some(RatingCategory::Plus(2200)),
            _ => None,
        }
    }
}

impl FromStr for RatingCategory {
    type Err = ParseRatingCategoryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lower = raw.trim().to_lowercase();
        let err = || ParseRatingCategoryError(raw.trim().to_string());

        if lower == "unrated" {
            return Ok(RatingCategory::Unrated);
        }
        if let Some(class) = Self::from_class_alias(&lower) {
            return Ok(class);
        }
        // "Under 1400"
        if let Some(rest) = lower.strip_prefix("under ") {
            return rest.trim().parse().map(RatingCategory::Under).map_err(|_| err());
        }
        // "U1400"
        if let Some(rest) = lower.strip_prefix('u') {
            if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
                return rest.parse().map(RatingCategory::Under).map_err(|_| err());
            }
        }
        // "2200+"
        if let Some(rest) = lower.strip_suffix('+') {
            return rest.trim().parse().map(RatingCategory::Plus).map_err(|_| err());
        }
        // "1600-1799"
        if let Some((lo, hi)) = lower.split_once('-') {
            let lo: u32 = lo.trim().parse().map_err(|_| err())?;
            let hi: u32 = hi.trim().parse().map_err(|_| err())?;
            if lo <= hi {
                return Ok(RatingCategory::Range(lo, hi));
            }
        }
        Err(err())
    }
}

impl TryFrom<String> for RatingCategory {
    type Error = ParseRatingCategoryError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<RatingCategory> for String {
    fn from(category: RatingCategory) -> Self {
        category.to_string()
    }
}

impl std::fmt::Display for RatingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatingCategory::Unrated => write!(f, "Unrated"),
            RatingCategory::Under(bound) => write!(f, "Under {bound}"),
            RatingCategory::Range(lo, hi) => write!(f, "{lo}-{hi}"),
            RatingCategory::Plus(bound) => write!(f, "{bound}+"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_under_forms() {
        assert_eq!(
            "Under 1400".parse::<RatingCategory>().unwrap(),
            RatingCategory::Under(1400)
        );
        assert_eq!(
            "U1200".parse::<RatingCategory>().unwrap(),
            RatingCategory::Under(1200)
        );
    }

    #[test]
    fn test_parse_range_and_plus() {
        assert_eq!(
            "1600-1799".parse::<RatingCategory>().unwrap(),
            RatingCategory::Range(1600, 1799)
        );
        assert_eq!(
            "2200+".parse::<RatingCategory>().unwrap(),
            RatingCategory::Plus(2200)
        );
    }

    #[test]
    fn test_parse_unrated() {
        assert_eq!(
            " unrated ".parse::<RatingCategory>().unwrap(),
            RatingCategory::Unrated
        );
    }

    #[test]
    fn test_parse_class_aliases() {
        assert_eq!(
            "Class B".parse::<RatingCategory>().unwrap(),
            RatingCategory::Range(1600, 1799)
        );
        assert_eq!(
            "Expert".parse::<RatingCategory>().unwrap(),
            RatingCategory::Range(2000, 2199)
        );
        assert_eq!(
            "Master".parse::<RatingCategory>().unwrap(),
            RatingCategory::Plus(2200)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("Best Game".parse::<RatingCategory>().is_err());
        assert!("1800-1600".parse::<RatingCategory>().is_err());
        assert!("Under".parse::<RatingCategory>().is_err());
    }

    #[test]
    fn test_matches_under() {
        let cat = RatingCategory::Under(1400);
        assert!(cat.matches(Some(1399)));
        assert!(!cat.matches(Some(1400)));
        assert!(!cat.matches(None), "unrated is not under-N eligible");
    }

    #[test]
    fn test_matches_range_is_inclusive() {
        let cat = RatingCategory::Range(1600, 1799);
        assert!(cat.matches(Some(1600)));
        assert!(cat.matches(Some(1799)));
        assert!(!cat.matches(Some(1800)));
        assert!(!cat.matches(Some(1599)));
    }

    #[test]
    fn test_matches_unrated_and_plus() {
        assert!(RatingCategory::Unrated.matches(None));
        assert!(!RatingCategory::Unrated.matches(Some(900)));
        assert!(RatingCategory::Plus(2200).matches(Some(2200)));
        assert!(!RatingCategory::Plus(2200).matches(None));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let cats = vec![
            RatingCategory::Unrated,
            RatingCategory::Under(1400),
            RatingCategory::Range(1600, 1799),
            RatingCategory::Plus(2200),
        ];
        for cat in cats {
            let parsed: RatingCategory = cat.to_string().parse().unwrap();
            assert_eq!(cat, parsed);
        }
    }
}
