use std::collections::HashSet;

use serde::Serialize;

use crate::models::Listing;

use super::ScoredListing;

/// Scoring stage that produced a recommendation
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    Content,
    Collaborative,
}

/// A recommended listing
///
/// `score` is stage-specific: cosine similarity for content hits, neighbour
/// interaction count for collaborative hits. Scores of different sources are
/// not comparable.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub listing: Listing,
    pub source: RecommendationSource,
    pub score: f64,
}

/// Merges content and collaborative results into at most `n` recommendations
///
/// Content hits come first in their similarity order, followed by
/// collaborative hits in their frequency order. A listing present in both
/// keeps its content position. Nothing is re-ranked.
pub fn blend(
    content: Vec<ScoredListing<'_>>,
    collaborative: Vec<ScoredListing<'_>>,
    n: usize,
) -> Vec<Recommendation> {
    let tagged = content
        .into_iter()
        .map(|s| (s, RecommendationSource::Content))
        .chain(
            collaborative
                .into_iter()
                .map(|s| (s, RecommendationSource::Collaborative)),
        );

    let mut seen = HashSet::new();
    tagged
        .filter(|(scored, _)| seen.insert(scored.listing.id))
        .take(n)
        .map(|(scored, source)| Recommendation {
            listing: scored.listing.clone(),
            source,
            score: scored.score,
        })
        .collect()
}
