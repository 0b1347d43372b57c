//! Authentication and role checks
//!
//! Token verification plus the role-assignment store lookup used by the
//! admin-only endpoints.

mod jwt;

pub use jwt::{get_user_id_from_claims, verify_token, Claims, JwtError};

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Auth service backed by the shared signing secret and the user_roles table
pub struct AuthService {
    db_pool: PgPool,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(db_pool: PgPool, jwt_secret: String) -> Self {
        Self {
            db_pool,
            jwt_secret,
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Check the role-assignment store for an admin grant
    pub async fn is_admin(&self, user_id: Uuid) -> Result<bool> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            "SELECT user_id FROM user_roles WHERE user_id = $1 AND role = 'admin'",
        )
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(row.is_some())
    }
}
