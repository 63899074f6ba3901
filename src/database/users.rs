use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::user::User;

/// Lookup of the accounts that own rows
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: i32) -> Result<Option<User>, DatabaseError>;

    /// Cheap connectivity probe used by the health endpoint
    async fn ping(&self) -> Result<(), DatabaseError>;
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_user(&self, id: i32) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, hashed_password, is_active, is_superuser, full_name
             FROM \"user\"
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
