use async_trait::async_trait;
use sqlx::PgPool;
use std::marker::PhantomData;

use crate::database::manager::DatabaseError;
use crate::database::query_builder::{bind_param_query_as, ColumnValues, QueryBuilder};
use crate::database::record::{Record, Resource};

/// Persistence operations shared by every owned table
#[async_trait]
pub trait RecordStore<R: Resource>: Send + Sync {
    async fn insert(&self, owner_id: i32, fields: R) -> Result<Record<R>, DatabaseError>;

    async fn find(&self, id: i32) -> Result<Option<Record<R>>, DatabaseError>;

    async fn list_by_owner(&self, owner_id: i32, skip: i64, limit: i64) -> Result<Vec<Record<R>>, DatabaseError>;

    /// Write every field of `record` back; fails with `NotFound` if the row is gone
    async fn update(&self, record: &Record<R>) -> Result<Record<R>, DatabaseError>;

    async fn delete(&self, id: i32) -> Result<(), DatabaseError>;
}

pub struct Repository<R> {
    pool: PgPool,
    _phantom: PhantomData<fn() -> R>,
}

impl<R: Resource> Repository<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: PhantomData,
        }
    }

    fn query_builder(&self) -> Result<QueryBuilder, DatabaseError> {
        QueryBuilder::new(R::TABLE)
    }
}

#[async_trait]
impl<R: Resource> RecordStore<R> for Repository<R> {
    async fn insert(&self, owner_id: i32, fields: R) -> Result<Record<R>, DatabaseError> {
        let cv = ColumnValues::from_entity(&fields)?;
        let sql = self.query_builder()?.insert(&cv.columns);

        let mut q = sqlx::query_as::<_, Record<R>>(&sql).bind(owner_id);
        for v in cv.values.iter() {
            q = bind_param_query_as(q, v);
        }
        let row = q.fetch_one(&self.pool).await?;
        Ok(row)
    }

    async fn find(&self, id: i32) -> Result<Option<Record<R>>, DatabaseError> {
        let sql = self.query_builder()?.select_by_id();
        let row = sqlx::query_as::<_, Record<R>>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_by_owner(&self, owner_id: i32, skip: i64, limit: i64) -> Result<Vec<Record<R>>, DatabaseError> {
        let sql = self.query_builder()?.select_by_owner();
        let rows = sqlx::query_as::<_, Record<R>>(&sql)
            .bind(owner_id)
            .bind(skip)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update(&self, record: &Record<R>) -> Result<Record<R>, DatabaseError> {
        let cv = ColumnValues::from_entity(&record.fields)?;
        let sql = self.query_builder()?.update_by_id(&cv.columns);

        let mut q = sqlx::query_as::<_, Record<R>>(&sql).bind(record.id);
        for v in cv.values.iter() {
            q = bind_param_query_as(q, v);
        }
        q.fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} {}", R::TABLE, record.id)))
    }

    async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        let sql = self.query_builder()?.delete_by_id();
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("{} {}", R::TABLE, id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::education::{Education, EducationUpdate};
    use crate::database::models::tag::Tag;
    use crate::database::MIGRATOR;

    async fn seed_user(pool: &PgPool, email: &str) -> anyhow::Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO \"user\" (email, hashed_password) VALUES ($1, '') RETURNING id",
        )
        .bind(email)
        .fetch_one(pool)
        .await?;
        Ok(id)
    }

    fn posgraduate() -> Education {
        Education {
            title: "Posgraduate".into(),
            description: None,
            location: "Canada, Toronto".into(),
            school: "Lambton College".into(),
            month_start: 9,
            year_start: 2023,
            month_end: 6,
            year_end: 2025,
            percentage: 0.95,
        }
    }

    #[sqlx::test(migrator = "MIGRATOR")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn education_round_trip(pool: PgPool) -> anyhow::Result<()> {
        let owner = seed_user(&pool, "owner@example.com").await?;
        let repo = Repository::<Education>::new(pool);

        let created = repo.insert(owner, posgraduate()).await?;
        assert_eq!(created.owner_id, owner);
        assert_eq!(created.fields, posgraduate());

        let mut row = repo.find(created.id).await?.expect("row exists");
        row.fields.apply(serde_json::from_str::<EducationUpdate>(r#"{"year_end": 2026}"#)?);
        let updated = repo.update(&row).await?;
        assert_eq!(updated.fields.year_end, 2026);
        assert_eq!(updated.fields.school, "Lambton College");

        assert_eq!(repo.list_by_owner(owner, 0, 100).await?.len(), 1);
        assert!(repo.list_by_owner(0, 0, 100).await?.is_empty());

        repo.delete(created.id).await?;
        assert!(matches!(repo.delete(created.id).await, Err(DatabaseError::NotFound(_))));
        Ok(())
    }

    #[sqlx::test(migrator = "MIGRATOR")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn tags_live_in_renamed_table(pool: PgPool) -> anyhow::Result<()> {
        let owner = seed_user(&pool, "tags@example.com").await?;
        let repo = Repository::<Tag>::new(pool.clone());

        let created = repo.insert(owner, Tag { name: "Backend".into() }).await?;
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tag WHERE id = $1")
            .bind(created.id)
            .fetch_one(&pool)
            .await?;
        assert_eq!(count, 1);
        Ok(())
    }
}
