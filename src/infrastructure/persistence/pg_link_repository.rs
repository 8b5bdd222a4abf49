//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Row shape shared by every `short_links` query.
#[derive(sqlx::FromRow)]
struct ShortLinkRow {
    slug: String,
    long_url: String,
    created_by: Option<String>,
    created_at: DateTime<Utc>,
    visits: i64,
}

impl From<ShortLinkRow> for ShortLink {
    fn from(row: ShortLinkRow) -> Self {
        ShortLink {
            slug: row.slug,
            long_url: row.long_url,
            created_by: row.created_by,
            created_at: row.created_at,
            visits: row.visits,
        }
    }
}

/// PostgreSQL repository for short link storage.
///
/// The primary key on `slug` is the serialization point for creation races;
/// the visit counter is incremented inside the store so concurrent redirects
/// never lose counts.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        // A unique violation here maps to Conflict via From<sqlx::Error>.
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            INSERT INTO short_links (slug, long_url, created_by)
            VALUES ($1, $2, $3)
            RETURNING slug, long_url, created_by, created_at, visits
            "#,
        )
        .bind(&new_link.slug)
        .bind(&new_link.long_url)
        .bind(&new_link.created_by)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            SELECT slug, long_url, created_by, created_at, visits
            FROM short_links
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn increment_visits_returning(&self, slug: &str) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            UPDATE short_links
            SET visits = visits + 1
            WHERE slug = $1
            RETURNING slug, long_url, created_by, created_at, visits
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM short_links WHERE slug = $1")
            .bind(slug)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>, AppError> {
        let rows = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            SELECT slug, long_url, created_by, created_at, visits
            FROM short_links
            WHERE created_by = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
