//! Recommendation scoring core
//!
//! Pure, synchronous functions over catalog and interaction snapshots. Nothing
//! here performs I/O or keeps state between calls; the normalizer is fitted
//! from scratch on every scoring pass.

use thiserror::Error;

use crate::models::{Listing, ListingId};

pub mod collaborative;
pub mod content;
pub mod hybrid;
pub mod normalizer;
pub mod similarity;

pub use collaborative::{CollaborativeScorer, InteractionMatrix};
pub use content::ContentScorer;
pub use hybrid::{blend, Recommendation, RecommendationSource};
pub use normalizer::{Feature, FeatureNormalizer, FeatureVector};

/// Structural problems in the data handed to the scoring core
#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("listing {listing_id}: {field} must be a finite number")]
    NonFiniteFeature {
        listing_id: ListingId,
        field: &'static str,
    },
    #[error("n must be non-negative, got {0}")]
    NegativeCount(i64),
}

/// Validates a caller-supplied result size
pub fn result_count(n: i64) -> Result<usize, ScoringError> {
    usize::try_from(n).map_err(|_| ScoringError::NegativeCount(n))
}

/// A catalog listing together with the score a stage assigned it
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredListing<'a> {
    pub listing: &'a Listing,
    pub score: f64,
}
