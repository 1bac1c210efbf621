//! Storage collaborators of the recommender
//!
//! The scoring core only ever sees snapshots returned by a [`ListingStore`].
//! Two implementations are provided: PostgreSQL for deployments and an
//! in-process store for development and tests.

use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::{Interaction, InteractionKind, Listing, ListingId, PreferenceProfile, UserId},
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::{create_pool, PgListingStore};

/// Read and write surface of the marketplace data the recommender relies on
///
/// Implementations own referential integrity; callers never validate that an
/// interaction points at an existing user or listing. Writes naming either one
/// that does not exist fail with `NotFound`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ListingStore: Send + Sync {
    /// All approved listings, ordered by id
    async fn fetch_approved_catalog(&self) -> AppResult<Vec<Listing>>;

    /// Stored preference record of a user, if any
    async fn fetch_preferences(&self, user_id: UserId) -> AppResult<Option<PreferenceProfile>>;

    /// Interaction log in insertion order, optionally limited to rows at or after `since`
    async fn fetch_interactions(&self, since: Option<DateTime<Utc>>) -> AppResult<Vec<Interaction>>;

    /// Replaces the stored preference record of a user. Fails with `NotFound`
    /// for unknown users.
    async fn save_preferences(&self, user_id: UserId, profile: &PreferenceProfile) -> AppResult<()>;

    /// Appends an interaction. Fails with `NotFound` for unknown users or listings.
    async fn record_interaction(
        &self,
        user_id: UserId,
        listing_id: ListingId,
        kind: InteractionKind,
    ) -> AppResult<()>;

    /// Returns `true` if the favourite was newly added
    async fn add_favorite(&self, user_id: UserId, listing_id: ListingId) -> AppResult<bool>;

    /// Returns `true` if a favourite was removed
    async fn remove_favorite(&self, user_id: UserId, listing_id: ListingId) -> AppResult<bool>;

    /// Listings favourited by a user, most recent first
    async fn list_favorites(&self, user_id: UserId) -> AppResult<Vec<Listing>>;
}
