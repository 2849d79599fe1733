//! # SQLite 저장소
//!
//! ## 테이블 구조 (`migrations/0001_init.sql`)
//! - `users`: 사용자 계정. `email`은 `UNIQUE COLLATE NOCASE`
//! - `records`: 모든 소유 레코드를 `(kind, id, owner_id, body)`로 저장.
//!   `body`는 레코드 전체의 JSON이고, `seq`(AUTOINCREMENT)가 삽입 순서를 보존합니다.
//!
//! 레코드를 JSON 본문으로 저장하기 때문에 `SqliteCollection<T>` 하나로
//! 마감일, 과목, 공부 세션을 모두 처리합니다.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{Collection, Record, UserStore, DUPLICATE_EMAIL_MESSAGE};
use crate::error::AppError;
use crate::models::User;

pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn insert(&self, user: User) -> Result<User, AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // UNIQUE 제약 위반 = 이미 가입된 이메일
            if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn count(&self) -> Result<usize, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }
}

/// `records` 테이블에서 `T::KIND` 종류의 레코드만 다루는 컬렉션
pub struct SqliteCollection<T> {
    pool: SqlitePool,
    // T를 소유하지 않으므로 fn() -> T로 표시 (Send/Sync에 영향 없음)
    _record: PhantomData<fn() -> T>,
}

impl<T> SqliteCollection<T> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<T: Record> Collection<T> for SqliteCollection<T> {
    async fn find_by_id(&self, id: &str) -> Result<Option<T>, AppError> {
        let body: Option<String> =
            sqlx::query_scalar("SELECT body FROM records WHERE kind = ? AND id = ?")
                .bind(T::KIND)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        body.map(|b| serde_json::from_str(&b))
            .transpose()
            .map_err(AppError::from)
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<T>, AppError> {
        let bodies: Vec<String> = sqlx::query_scalar(
            "SELECT body FROM records WHERE kind = ? AND owner_id = ? ORDER BY seq",
        )
        .bind(T::KIND)
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        bodies
            .iter()
            .map(|b| serde_json::from_str(b).map_err(AppError::from))
            .collect()
    }

    async fn insert(&self, record: T) -> Result<T, AppError> {
        let body = serde_json::to_string(&record)?;
        sqlx::query("INSERT INTO records (kind, id, owner_id, body) VALUES (?, ?, ?, ?)")
            .bind(T::KIND)
            .bind(record.id())
            .bind(record.owner_id())
            .bind(body)
            .execute(&self.pool)
            .await?;

        Ok(record)
    }

    async fn update(&self, record: T) -> Result<bool, AppError> {
        let body = serde_json::to_string(&record)?;
        let result = sqlx::query("UPDATE records SET body = ? WHERE kind = ? AND id = ?")
            .bind(body)
            .bind(T::KIND)
            .bind(record.id())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM records WHERE kind = ? AND id = ?")
            .bind(T::KIND)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<usize, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM records WHERE kind = ?")
            .bind(T::KIND)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }
}
