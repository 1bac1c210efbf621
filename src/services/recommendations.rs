use std::sync::Arc;
use std::time::Instant;

use chrono::{Duration, Utc};

use crate::{
    config::Config,
    db::ListingStore,
    error::AppResult,
    models::UserId,
    services::scoring::{blend, CollaborativeScorer, ContentScorer, Recommendation},
};

/// Tunables of the hybrid recommender
#[derive(Debug, Clone)]
pub struct RecommenderSettings {
    pub max_neighbors: usize,
    /// Only interactions newer than this feed collaborative scoring
    pub interaction_window: Option<Duration>,
}

impl Default for RecommenderSettings {
    fn default() -> Self {
        Self {
            max_neighbors: crate::services::scoring::collaborative::DEFAULT_MAX_NEIGHBORS,
            interaction_window: None,
        }
    }
}

impl From<&Config> for RecommenderSettings {
    fn from(config: &Config) -> Self {
        Self {
            max_neighbors: config.max_neighbors,
            interaction_window: config.interaction_window(),
        }
    }
}

/// Generates personalized listing recommendations
///
/// Each call reads fresh catalog, preference and interaction snapshots from
/// the store and runs content scoring, collaborative scoring and the hybrid
/// blend over them. No fitted state survives between calls.
pub struct Recommender {
    store: Arc<dyn ListingStore>,
    content: ContentScorer,
    collaborative: CollaborativeScorer,
    interaction_window: Option<Duration>,
}

impl Recommender {
    pub fn new(store: Arc<dyn ListingStore>, settings: RecommenderSettings) -> Self {
        Self {
            store,
            content: ContentScorer::new(),
            collaborative: CollaborativeScorer::new(settings.max_neighbors),
            interaction_window: settings.interaction_window,
        }
    }

    /// Returns at most `n` recommendations for `user_id` without duplicates
    pub async fn recommend(&self, user_id: UserId, n: usize) -> AppResult<Vec<Recommendation>> {
        let start = Instant::now();
        // A window reaching past the earliest representable time covers the whole log
        let since = self
            .interaction_window
            .and_then(|window| Utc::now().checked_sub_signed(window));

        let (catalog, preferences, interactions) = tokio::try_join!(
            self.store.fetch_approved_catalog(),
            self.store.fetch_preferences(user_id),
            self.store.fetch_interactions(since),
        )?;

        tracing::debug!(
            user_id,
            catalog = catalog.len(),
            interactions = interactions.len(),
            has_preferences = preferences.is_some(),
            "Snapshots loaded"
        );

        let content = self
            .content
            .recommend(user_id, preferences.as_ref(), &catalog, n)?;
        let collaborative = self
            .collaborative
            .recommend(user_id, &interactions, &catalog, n);

        let content_count = content.len();
        let collaborative_count = collaborative.len();
        let recommendations = blend(content, collaborative, n);

        tracing::info!(
            user_id,
            n,
            content = content_count,
            collaborative = collaborative_count,
            returned = recommendations.len(),
            processing_time_ms = start.elapsed().as_millis() as u64,
            "Recommendations generated"
        );

        Ok(recommendations)
    }
}
