use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Collection, Record, UserStore, DUPLICATE_EMAIL_MESSAGE};
use crate::error::AppError;
use crate::models::User;

/// In-memory user accounts (useful for testing)
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: User) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        // Check and push under the same write lock
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string()));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn count(&self) -> Result<usize, AppError> {
        Ok(self.users.read().await.len())
    }
}

/// In-memory record list, kept in insertion order
pub struct MemoryCollection<T> {
    records: RwLock<Vec<T>>,
}

impl<T> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl<T: Record> Collection<T> for MemoryCollection<T> {
    async fn find_by_id(&self, id: &str) -> Result<Option<T>, AppError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<T>, AppError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.owner_id() == owner_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, record: T) -> Result<T, AppError> {
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: T) -> Result<bool, AppError> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => {
                *slot = record;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        Ok(records.len() < before)
    }

    async fn count(&self) -> Result<usize, AppError> {
        Ok(self.records.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, User};
    use chrono::Utc;

    fn user(id: &str, email: &str) -> User {
        User {
            id: id.into(),
            name: "Test".into(),
            email: email.into(),
            password_hash: "hash".into(),
            created_at: Utc::now(),
        }
    }

    fn course(id: &str, owner: &str) -> Course {
        Course {
            id: id.into(),
            user_id: owner.into(),
            name: format!("Course {id}"),
            color: "#3b82f6".into(),
            description: String::new(),
            progress: 0,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict_regardless_of_case() {
        let store = MemoryUserStore::default();
        store.insert(user("1", "ada@example.com")).await.unwrap();

        let err = store.insert(user("2", "ADA@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn owner_listing_keeps_insertion_order() {
        let store = MemoryCollection::<Course>::default();
        for (id, owner) in [("a", "u1"), ("b", "u2"), ("c", "u1")] {
            store.insert(course(id, owner)).await.unwrap();
        }

        let ids: Vec<_> = store
            .find_by_owner("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_records() {
        let store = MemoryCollection::<Course>::default();
        assert!(!store.update(course("x", "u1")).await.unwrap());
        assert!(!store.delete("x").await.unwrap());

        store.insert(course("x", "u1")).await.unwrap();
        let mut renamed = course("x", "u1");
        renamed.name = "Renamed".into();
        assert!(store.update(renamed).await.unwrap());
        assert_eq!(store.find_by_id("x").await.unwrap().unwrap().name, "Renamed");
        assert!(store.delete("x").await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
