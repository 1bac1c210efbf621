use crate::models::{Listing, PreferenceProfile, ResolvedPreferences, UserId};

use super::{
    normalizer::{FeatureNormalizer, FeatureVector, FEATURE_COUNT},
    similarity::cosine_similarity,
    ScoredListing, ScoringError,
};

/// Ranks listings by how closely their attributes match stated preferences
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentScorer;

impl ContentScorer {
    pub fn new() -> Self {
        Self
    }

    /// Returns at most `n` approved listings ranked by preference similarity
    ///
    /// Similarity is the cosine between the standardized preference vector and
    /// each standardized listing. A preferred type or province acts as a hard
    /// filter. Equal scores keep catalog order.
    pub fn recommend<'a>(
        &self,
        user_id: UserId,
        profile: Option<&PreferenceProfile>,
        catalog: &'a [Listing],
        n: usize,
    ) -> Result<Vec<ScoredListing<'a>>, ScoringError> {
        let catalog: Vec<&Listing> = catalog.iter().filter(|l| l.is_approved()).collect();
        if catalog.is_empty() || n == 0 {
            return Ok(Vec::new());
        }

        let preferences = ResolvedPreferences::resolve(profile);

        let (normalizer, rows) = FeatureNormalizer::fit_transform(catalog.iter().copied())?;
        let target = normalizer.transform(&preference_vector(&preferences));

        let mut scored: Vec<ScoredListing<'a>> = catalog
            .into_iter()
            .zip(&rows)
            .map(|(listing, row)| ScoredListing {
                listing,
                score: cosine_similarity(&target, row),
            })
            .filter(|scored| matches_filters(scored.listing, &preferences))
            .collect();

        // sort_by is stable, which keeps catalog order among ties
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(n);

        tracing::debug!(
            user_id,
            candidates = scored.len(),
            top_score = scored.first().map(|s| s.score),
            "Content scoring completed"
        );

        Ok(scored)
    }
}

/// Raw preference vector in feature space
///
/// Only price and bedrooms carry a preference; bathroom and area slots are
/// always zero. Unstated values are zero as well.
fn preference_vector(preferences: &ResolvedPreferences) -> FeatureVector {
    let mut vector = [0.0; FEATURE_COUNT];
    vector[0] = preferences.max_price.unwrap_or(0.0);
    vector[1] = preferences.min_bedrooms.map(f64::from).unwrap_or(0.0);
    vector
}

fn matches_filters(listing: &Listing, preferences: &ResolvedPreferences) -> bool {
    if let Some(kind) = preferences.property_type {
        if listing.property_type != kind {
            return false;
        }
    }
    if let Some(province) = &preferences.province {
        if &listing.location.province != province {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApprovalStatus, PropertyType};
    use crate::services::scoring::fixtures::listing;

    fn open_profile(max_price: f64, min_bedrooms: i32) -> PreferenceProfile {
        PreferenceProfile {
            property_type: None,
            province: None,
            max_price: Some(max_price),
            min_bedrooms: Some(min_bedrooms),
        }
    }

    fn ids(scored: &[ScoredListing<'_>]) -> Vec<i64> {
        scored.iter().map(|s| s.listing.id).collect()
    }

    #[test]
    fn test_identical_listings_tie_at_top_in_catalog_order() {
        let catalog = vec![listing(1, 10.0, 2), listing(2, 50.0, 4), listing(3, 10.0, 2)];
        let profile = open_profile(10.0, 2);

        let ranked = ContentScorer::new()
            .recommend(1, Some(&profile), &catalog, 3)
            .unwrap();

        assert_eq!(ids(&ranked), vec![1, 3, 2]);
        assert_eq!(ranked[0].score, ranked[1].score);
        assert!(ranked[2].score < ranked[1].score);
    }

    #[test]
    fn test_type_filter_keeps_only_matching_listings() {
        let mut apartment = listing(2, 30.0, 2);
        apartment.property_type = PropertyType::Apartment;
        let catalog = vec![listing(1, 10.0, 1), apartment, listing(3, 20.0, 3)];
        let profile = PreferenceProfile {
            property_type: Some(PropertyType::Apartment),
            ..open_profile(25.0, 2)
        };

        let ranked = ContentScorer::new()
            .recommend(1, Some(&profile), &catalog, 10)
            .unwrap();

        assert_eq!(ids(&ranked), vec![2]);
        assert!(ranked
            .iter()
            .all(|s| s.listing.property_type == PropertyType::Apartment));
    }

    #[test]
    fn test_filters_that_match_nothing_yield_empty() {
        let catalog = vec![listing(1, 10.0, 1), listing(2, 20.0, 2)];
        let profile = PreferenceProfile {
            province: Some("Benguela".to_string()),
            ..open_profile(10.0, 1)
        };

        let ranked = ContentScorer::new()
            .recommend(1, Some(&profile), &catalog, 10)
            .unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_missing_profile_applies_default_filters() {
        let mut elsewhere = listing(2, 20.0, 2);
        elsewhere.location.province = "Huambo".to_string();
        let mut land = listing(3, 20.0, 2);
        land.property_type = PropertyType::Land;
        let catalog = vec![listing(1, 10.0, 1), elsewhere, land];

        let ranked = ContentScorer::new().recommend(1, None, &catalog, 10).unwrap();
        assert_eq!(ids(&ranked), vec![1]);
    }

    #[test]
    fn test_result_is_truncated_to_n() {
        let catalog: Vec<Listing> = (1..=6).map(|id| listing(id, id as f64 * 10.0, 2)).collect();
        let ranked = ContentScorer::new()
            .recommend(1, Some(&open_profile(30.0, 2)), &catalog, 2)
            .unwrap();
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_unapproved_and_empty_catalogs() {
        let mut pending = listing(1, 10.0, 1);
        pending.status = ApprovalStatus::Pending;

        let scorer = ContentScorer::new();
        assert!(scorer.recommend(1, None, &[pending], 5).unwrap().is_empty());
        assert!(scorer.recommend(1, None, &[], 5).unwrap().is_empty());
    }

    #[test]
    fn test_preference_vector_ignores_bathrooms_and_area() {
        let preferences = ResolvedPreferences::resolve(Some(&open_profile(99.0, 3)));
        assert_eq!(preference_vector(&preferences), [99.0, 3.0, 0.0, 0.0]);
    }

    #[test]
    fn test_stored_profile_without_price_prefers_cheapest() {
        let catalog = vec![listing(1, 10.0, 2), listing(2, 50.0, 2), listing(3, 30.0, 4)];
        let profile = PreferenceProfile {
            max_price: None,
            ..open_profile(0.0, 2)
        };

        let preferences = ResolvedPreferences::resolve(Some(&profile));
        assert_eq!(preference_vector(&preferences)[0], 0.0);

        let ranked = ContentScorer::new()
            .recommend(1, Some(&profile), &catalog, 3)
            .unwrap();
        assert_eq!(ids(&ranked), vec![1, 3, 2]);
    }

    #[test]
    fn test_extreme_max_price_scores_stay_finite() {
        let catalog = vec![listing(1, 1.0, 2), listing(2, 2.0, 2)];

        let ranked = ContentScorer::new()
            .recommend(1, Some(&open_profile(1e308, 2)), &catalog, 2)
            .unwrap();

        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|s| s.score.is_finite()));
        assert_eq!(ids(&ranked), vec![1, 2]);
    }
}
