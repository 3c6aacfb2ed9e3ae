//! Prize configuration model and distribution output records.
//!
//! Raw tournament settings arrive as an opaque JSON structure and are
//! canonicalized once per run into per-section prize lists
//! ([`SectionPrizeConfig`]); rating restrictions are parsed once into the
//! closed [`RatingCategory`] union instead of being re-matched as strings
//! per call.

pub mod category;
pub mod config;
pub mod models;

pub use category::{ParseRatingCategoryError, RatingCategory};
pub use config::{CanonicalConfig, canonicalize_config};
pub use models::{
    AwardedPrize, Cents, DistributionRecord, PrizeDefinition, PrizeKind, SectionPrizeConfig,
    cents_from_amount, format_cents,
};
