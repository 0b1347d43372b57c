//! App catalog service
//!
//! Public listing of referable apps plus admin-only management.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::models::{App, AppCategory};

/// Filters for the public catalog listing
#[derive(Debug, Deserialize, Default)]
pub struct ListAppsQuery {
    pub category: Option<AppCategory>,
    pub featured: Option<bool>,
    pub limit: Option<i64>,
}

/// Admin request to add a catalog entry
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
    pub category: AppCategory,
    #[validate(range(min = 1))]
    pub bonus_amount: i64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub commission_rate: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub my_commission_rate: Option<f64>,
    pub payout_time: Option<String>,
    pub task_description: Option<String>,
    #[validate(url)]
    pub referral_link: String,
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub sort_order: i32,
}

/// Admin request to update a catalog entry; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<AppCategory>,
    #[validate(range(min = 1))]
    pub bonus_amount: Option<i64>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub commission_rate: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub my_commission_rate: Option<f64>,
    pub payout_time: Option<String>,
    pub task_description: Option<String>,
    #[validate(url)]
    pub referral_link: Option<String>,
    pub is_featured: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Catalog service
pub struct AppService {
    db_pool: PgPool,
}

impl AppService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// List catalog entries with optional filters, ordered by sort_order
    pub async fn list_apps(&self, query: ListAppsQuery) -> Result<Vec<App>> {
        let limit = query.limit.unwrap_or(20).clamp(1, 100);

        let mut builder: sqlx::QueryBuilder<sqlx::Postgres> =
            sqlx::QueryBuilder::new("SELECT * FROM apps WHERE 1=1");

        if let Some(category) = query.category {
            builder.push(" AND category = ");
            builder.push_bind(category);
        }
        if let Some(featured) = query.featured {
            builder.push(" AND is_featured = ");
            builder.push_bind(featured);
        }

        builder.push(" ORDER BY sort_order, name LIMIT ");
        builder.push_bind(limit);

        let apps = builder
            .build_query_as::<App>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(apps)
    }

    /// Fetch a single catalog entry
    pub async fn get_app(&self, id: Uuid) -> Result<Option<App>> {
        let app = sqlx::query_as::<_, App>("SELECT * FROM apps WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(app)
    }

    /// Create a catalog entry
    pub async fn create_app(&self, request: CreateAppRequest) -> Result<App> {
        let now = Utc::now();
        let app: App = sqlx::query_as(
            r#"
            INSERT INTO apps (
                id, name, description, category, bonus_amount,
                commission_rate, my_commission_rate, payout_time,
                task_description, referral_link, image_url,
                is_featured, sort_order, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.category)
        .bind(request.bonus_amount)
        .bind(request.commission_rate)
        .bind(request.my_commission_rate)
        .bind(&request.payout_time)
        .bind(&request.task_description)
        .bind(&request.referral_link)
        .bind(&request.image_url)
        .bind(request.is_featured)
        .bind(request.sort_order)
        .bind(now)
        .bind(now)
        .fetch_one(&self.db_pool)
        .await
        .context("Failed to insert app")?;

        tracing::info!(app_id = %app.id, name = %app.name, "App created");

        Ok(app)
    }

    /// Update a catalog entry; returns None for an unknown id
    pub async fn update_app(&self, id: Uuid, request: UpdateAppRequest) -> Result<Option<App>> {
        let app: Option<App> = sqlx::query_as(
            r#"
            UPDATE apps SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                bonus_amount = COALESCE($5, bonus_amount),
                commission_rate = COALESCE($6, commission_rate),
                my_commission_rate = COALESCE($7, my_commission_rate),
                payout_time = COALESCE($8, payout_time),
                task_description = COALESCE($9, task_description),
                referral_link = COALESCE($10, referral_link),
                is_featured = COALESCE($11, is_featured),
                sort_order = COALESCE($12, sort_order),
                updated_at = $13
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.category)
        .bind(request.bonus_amount)
        .bind(request.commission_rate)
        .bind(request.my_commission_rate)
        .bind(&request.payout_time)
        .bind(&request.task_description)
        .bind(&request.referral_link)
        .bind(request.is_featured)
        .bind(request.sort_order)
        .bind(Utc::now())
        .fetch_optional(&self.db_pool)
        .await
        .context("Failed to update app")?;

        Ok(app)
    }

    /// Delete a catalog entry; returns whether a row was removed
    pub async fn delete_app(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM apps WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
