use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{
        Favorite, Interaction, InteractionKind, Listing, ListingId, PreferenceProfile, UserId,
    },
};

use super::ListingStore;

/// Store kept entirely in process memory
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<InMemoryStoreInner>>,
}

#[derive(Default)]
struct InMemoryStoreInner {
    users: HashSet<UserId>,
    listings: BTreeMap<ListingId, Listing>,
    preferences: HashMap<UserId, PreferenceProfile>,
    interactions: Vec<Interaction>,
    favorites: Vec<Favorite>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with registered users and listings of any approval state
    pub fn seeded(
        users: impl IntoIterator<Item = UserId>,
        listings: impl IntoIterator<Item = Listing>,
    ) -> Self {
        let inner = InMemoryStoreInner {
            users: users.into_iter().collect(),
            listings: listings.into_iter().map(|l| (l.id, l)).collect(),
            ..Default::default()
        };
        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    pub async fn register_user(&self, user_id: UserId) {
        let mut inner = self.inner.write().await;
        inner.users.insert(user_id);
    }

    /// Inserts or replaces a listing
    pub async fn upsert_listing(&self, listing: Listing) {
        let mut inner = self.inner.write().await;
        inner.listings.insert(listing.id, listing);
    }

    /// Appends a pre-built interaction, keeping its timestamp
    pub async fn push_interaction(&self, interaction: Interaction) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.ensure_user(interaction.user_id)?;
        inner.ensure_listing(interaction.listing_id)?;
        inner.interactions.push(interaction);
        Ok(())
    }
}

impl InMemoryStoreInner {
    fn ensure_user(&self, user_id: UserId) -> AppResult<()> {
        if self.users.contains(&user_id) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("user {}", user_id)))
        }
    }

    fn ensure_listing(&self, listing_id: ListingId) -> AppResult<()> {
        if self.listings.contains_key(&listing_id) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("listing {}", listing_id)))
        }
    }
}

#[async_trait::async_trait]
impl ListingStore for InMemoryStore {
    async fn fetch_approved_catalog(&self) -> AppResult<Vec<Listing>> {
        let inner = self.inner.read().await;
        Ok(inner
            .listings
            .values()
            .filter(|l| l.is_approved())
            .cloned()
            .collect())
    }

    async fn fetch_preferences(&self, user_id: UserId) -> AppResult<Option<PreferenceProfile>> {
        let inner = self.inner.read().await;
        Ok(inner.preferences.get(&user_id).cloned())
    }

    async fn fetch_interactions(&self, since: Option<DateTime<Utc>>) -> AppResult<Vec<Interaction>> {
        let inner = self.inner.read().await;
        Ok(inner
            .interactions
            .iter()
            .filter(|i| since.map_or(true, |cutoff| i.created_at >= cutoff))
            .cloned()
            .collect())
    }

    async fn save_preferences(&self, user_id: UserId, profile: &PreferenceProfile) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.ensure_user(user_id)?;
        inner.preferences.insert(user_id, profile.clone());
        Ok(())
    }

    async fn record_interaction(
        &self,
        user_id: UserId,
        listing_id: ListingId,
        kind: InteractionKind,
    ) -> AppResult<()> {
        self.push_interaction(Interaction::new(user_id, listing_id, kind))
            .await
    }

    async fn add_favorite(&self, user_id: UserId, listing_id: ListingId) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        inner.ensure_user(user_id)?;
        inner.ensure_listing(listing_id)?;

        let exists = inner
            .favorites
            .iter()
            .any(|f| f.user_id == user_id && f.listing_id == listing_id);
        if exists {
            return Ok(false);
        }

        inner.favorites.push(Favorite {
            user_id,
            listing_id,
            created_at: Utc::now(),
        });
        Ok(true)
    }

    async fn remove_favorite(&self, user_id: UserId, listing_id: ListingId) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.favorites.len();
        inner
            .favorites
            .retain(|f| !(f.user_id == user_id && f.listing_id == listing_id));
        Ok(inner.favorites.len() != before)
    }

    async fn list_favorites(&self, user_id: UserId) -> AppResult<Vec<Listing>> {
        let inner = self.inner.read().await;
        Ok(inner
            .favorites
            .iter()
            .rev()
            .filter(|f| f.user_id == user_id)
            .filter_map(|f| inner.listings.get(&f.listing_id).cloned())
            .collect())
    }
}
