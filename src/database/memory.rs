use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::user::User;
use crate::database::record::{Record, Resource};
use crate::database::repository::RecordStore;
use crate::database::users::UserStore;

/// In-memory table for tests and local experiments. Ids are handed out from 1 upward
/// and never reused, like a Postgres sequence.
pub struct MemoryRepository<R> {
    table: Arc<RwLock<MemoryTable<R>>>,
}

struct MemoryTable<R> {
    next_id: i32,
    rows: BTreeMap<i32, Record<R>>,
}

impl<R> MemoryRepository<R> {
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(MemoryTable {
                next_id: 1,
                rows: BTreeMap::new(),
            })),
        }
    }
}

impl<R> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Resource> RecordStore<R> for MemoryRepository<R> {
    async fn insert(&self, owner_id: i32, fields: R) -> Result<Record<R>, DatabaseError> {
        let mut table = self.table.write().await;
        let id = table.next_id;
        table.next_id += 1;

        let record = Record { id, owner_id, fields };
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn find(&self, id: i32) -> Result<Option<Record<R>>, DatabaseError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_id: i32, skip: i64, limit: i64) -> Result<Vec<Record<R>>, DatabaseError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|r| r.owner_id == owner_id)
            .skip(usize::try_from(skip).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn update(&self, record: &Record<R>) -> Result<Record<R>, DatabaseError> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&record.id) {
            Some(row) => {
                // Owner is not writable
                row.fields = record.fields.clone();
                Ok(row.clone())
            }
            None => Err(DatabaseError::NotFound(format!("{} {}", R::TABLE, record.id))),
        }
    }

    async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        match self.table.write().await.rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DatabaseError::NotFound(format!("{} {}", R::TABLE, id))),
        }
    }
}

/// In-memory user directory
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<i32, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_user(&self, id: i32) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::skill::Skill;

    fn skill(name: &str) -> Skill {
        Skill { name: name.to_string() }
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = MemoryRepository::<Skill>::new();
        let first = repo.insert(1, skill("Rust")).await.unwrap();
        repo.delete(first.id).await.unwrap();
        let second = repo.insert(1, skill("Python")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn list_filters_by_owner_and_pages() {
        let repo = MemoryRepository::<Skill>::new();
        for name in ["a", "b", "c"] {
            repo.insert(1, skill(name)).await.unwrap();
        }
        repo.insert(2, skill("other")).await.unwrap();

        let page = repo.list_by_owner(1, 1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].fields.name, "b");
        assert_eq!(repo.list_by_owner(2, 0, 100).await.unwrap().len(), 1);
        assert!(repo.list_by_owner(0, 0, 100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_keeps_owner() {
        let repo = MemoryRepository::<Skill>::new();
        let mut row = repo.insert(1, skill("Rust")).await.unwrap();
        row.owner_id = 2;
        row.fields.name = "Go".into();
        let updated = repo.update(&row).await.unwrap();
        assert_eq!(updated.owner_id, 1);
        assert_eq!(updated.fields.name, "Go");
    }

    #[tokio::test]
    async fn missing_rows_report_not_found() {
        let repo = MemoryRepository::<Skill>::new();
        assert!(repo.find(42).await.unwrap().is_none());
        assert!(matches!(repo.delete(42).await, Err(DatabaseError::NotFound(_))));
    }
}
