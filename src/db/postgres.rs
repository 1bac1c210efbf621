use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgPool};

use crate::{
    error::{AppError, AppResult},
    models::{
        ApprovalStatus, Interaction, InteractionKind, Listing, ListingId, Location,
        PreferenceProfile, PropertyType, UserId,
    },
};

use super::ListingStore;

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

const LISTING_COLUMNS: &str = "l.id, l.title, l.description, l.property_type, l.province, \
     l.municipality, l.neighborhood, l.price, l.bedrooms, l.bathrooms, l.area, l.status, \
     l.owner_id, l.created_at";

/// Listing as read from the database, before validation
#[derive(Debug, FromRow)]
struct ListingRow {
    id: i64,
    title: String,
    description: Option<String>,
    property_type: String,
    province: String,
    municipality: String,
    neighborhood: Option<String>,
    price: Option<f64>,
    bedrooms: Option<i32>,
    bathrooms: Option<i32>,
    area: Option<f64>,
    status: String,
    owner_id: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<ListingRow> for Listing {
    type Error = AppError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        let invalid = |field: &str, reason: String| {
            AppError::InvalidInput(format!("listing {}: {}: {}", row.id, field, reason))
        };

        let price = row
            .price
            .ok_or_else(|| invalid("price", "missing".to_string()))?;
        let property_type = row
            .property_type
            .parse::<PropertyType>()
            .map_err(|e| invalid("property_type", e))?;
        let status = row
            .status
            .parse::<ApprovalStatus>()
            .map_err(|e| invalid("status", e))?;

        Ok(Listing {
            id: row.id,
            title: row.title,
            description: row.description,
            property_type,
            location: Location {
                province: row.province,
                municipality: row.municipality,
                neighborhood: row.neighborhood,
            },
            price,
            bedrooms: row.bedrooms,
            bathrooms: row.bathrooms,
            area: row.area,
            status,
            owner_id: row.owner_id,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct InteractionRow {
    user_id: i64,
    listing_id: i64,
    kind: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<InteractionRow> for Interaction {
    type Error = AppError;

    fn try_from(row: InteractionRow) -> Result<Self, Self::Error> {
        let kind = row.kind.parse::<InteractionKind>().map_err(|e| {
            AppError::InvalidInput(format!(
                "interaction of user {} on listing {}: kind: {}",
                row.user_id, row.listing_id, e
            ))
        })?;

        Ok(Interaction {
            user_id: row.user_id,
            listing_id: row.listing_id,
            kind,
            created_at: row.created_at,
        })
    }
}

/// Maps a foreign-key violation on a write to `NotFound` for the missing row
fn missing_reference(error: sqlx::Error, user_id: UserId, listing_id: ListingId) -> AppError {
    if let sqlx::Error::Database(db) = &error {
        if db.is_foreign_key_violation() {
            return match db.constraint() {
                Some(constraint) if constraint.ends_with("listing_id_fkey") => {
                    AppError::NotFound(format!("listing {}", listing_id))
                }
                _ => AppError::NotFound(format!("user {}", user_id)),
            };
        }
    }
    error.into()
}

fn into_listings(rows: Vec<ListingRow>) -> AppResult<Vec<Listing>> {
    rows.into_iter().map(Listing::try_from).collect()
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgListingStore {
    pool: PgPool,
}

impl PgListingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn listing_exists(&self, listing_id: ListingId) -> AppResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM listings WHERE id = $1)")
                .bind(listing_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

#[async_trait::async_trait]
impl ListingStore for PgListingStore {
    async fn fetch_approved_catalog(&self) -> AppResult<Vec<Listing>> {
        let sql = format!(
            "SELECT {} FROM listings l WHERE l.status = 'approved' ORDER BY l.id",
            LISTING_COLUMNS
        );
        let rows = sqlx::query_as::<_, ListingRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        into_listings(rows)
    }

    async fn fetch_preferences(&self, user_id: UserId) -> AppResult<Option<PreferenceProfile>> {
        let stored = sqlx::query_scalar::<_, Option<Json<PreferenceProfile>>>(
            "SELECT preferences FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(stored.flatten().map(|Json(profile)| profile))
    }

    async fn fetch_interactions(&self, since: Option<DateTime<Utc>>) -> AppResult<Vec<Interaction>> {
        let rows = sqlx::query_as::<_, InteractionRow>(
            r#"
            SELECT user_id, listing_id, kind, created_at
            FROM interactions
            WHERE $1::timestamptz IS NULL OR created_at >= $1
            ORDER BY id
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Interaction::try_from).collect()
    }

    async fn save_preferences(&self, user_id: UserId, profile: &PreferenceProfile) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET preferences = $2 WHERE id = $1")
            .bind(user_id)
            .bind(Json(profile))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user {}", user_id)));
        }
        Ok(())
    }

    async fn record_interaction(
        &self,
        user_id: UserId,
        listing_id: ListingId,
        kind: InteractionKind,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO interactions (user_id, listing_id, kind)
            SELECT $1, $2, $3
            WHERE EXISTS (SELECT 1 FROM listings WHERE id = $2)
            "#,
        )
        .bind(user_id)
        .bind(listing_id)
        .bind(kind.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| missing_reference(e, user_id, listing_id))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("listing {}", listing_id)));
        }
        Ok(())
    }

    async fn add_favorite(&self, user_id: UserId, listing_id: ListingId) -> AppResult<bool> {
        if !self.listing_exists(listing_id).await? {
            return Err(AppError::NotFound(format!("listing {}", listing_id)));
        }

        let result = sqlx::query(
            "INSERT INTO favorites (user_id, listing_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(listing_id)
        .execute(&self.pool)
        .await
        .map_err(|e| missing_reference(e, user_id, listing_id))?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove_favorite(&self, user_id: UserId, listing_id: ListingId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND listing_id = $2")
            .bind(user_id)
            .bind(listing_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_favorites(&self, user_id: UserId) -> AppResult<Vec<Listing>> {
        let sql = format!(
            "SELECT {} FROM favorites f JOIN listings l ON l.id = f.listing_id \
             WHERE f.user_id = $1 ORDER BY f.created_at DESC",
            LISTING_COLUMNS
        );
        let rows = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        into_listings(rows)
    }
}
