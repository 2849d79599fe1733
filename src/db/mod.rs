//! # 저장소 계층 (Storage Layer)
//!
//! 라우트 핸들러는 구체적인 저장소를 모르고, 이 모듈의 트레이트만 사용합니다.
//! 서버 시작 시 `DATABASE_URL` 유무에 따라 구현체를 고릅니다.
//!
//! - `UserStore`: 사용자 계정 (이메일 유일성 보장)
//! - `Collection<T>`: 사용자 소유 레코드 (마감일, 과목, 공부 세션)
//! - `OwnedCollection<T>`: `(id, 소유자)` 매칭과 404 처리를 한곳에 모은 래퍼
//!
//! 구현체:
//! - `memory`: 프로세스 메모리 (기본값, 테스트용). 재시작하면 데이터가 사라집니다.
//! - `sqlite`: sqlx + SQLite

pub mod memory;
pub mod owned;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{Course, Deadline, StudySession, User};

pub use memory::{MemoryCollection, MemoryUserStore};
pub use owned::OwnedCollection;
pub use sqlite::{SqliteCollection, SqliteUserStore};

/// 한 명의 사용자가 소유하는 레코드
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// 저장소 안에서 레코드 종류를 구분하는 이름
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn owner_id(&self) -> &str;
}

impl Record for Deadline {
    const KIND: &'static str = "deadline";

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

impl Record for Course {
    const KIND: &'static str = "course";

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

impl Record for StudySession {
    const KIND: &'static str = "study_session";

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

/// 사용자 계정 저장소
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 새 사용자를 추가합니다.
    ///
    /// 같은 이메일(대소문자 무시)이 이미 있으면 `AppError::Conflict`.
    /// 검사와 추가가 한 번에 이뤄지므로 동시에 들어온 가입 요청 중 하나만 성공합니다.
    async fn insert(&self, user: User) -> Result<User, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;

    /// `email`은 호출자가 정규화(trim + 소문자)해서 넘깁니다.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn count(&self) -> Result<usize, AppError>;
}

/// 소유자가 있는 레코드 컬렉션
///
/// 소유권 검사는 하지 않습니다. 핸들러는 반드시 `OwnedCollection`을 통해 접근합니다.
#[async_trait]
pub trait Collection<T: Record>: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<T>, AppError>;

    /// 삽입 순서대로 반환합니다.
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<T>, AppError>;

    async fn insert(&self, record: T) -> Result<T, AppError>;

    /// 같은 id의 레코드를 교체합니다. 없으면 `false`.
    async fn update(&self, record: T) -> Result<bool, AppError>;

    /// 없으면 `false`.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    async fn count(&self) -> Result<usize, AppError>;
}

/// 이메일 중복 시 반환하는 메시지
pub const DUPLICATE_EMAIL_MESSAGE: &str = "An account with this email already exists";

/// 핸들러가 공유하는 저장소 묶음. clone해도 내부 저장소는 `Arc`로 공유됩니다.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserStore>,
    pub deadlines: OwnedCollection<Deadline>,
    pub courses: OwnedCollection<Course>,
    pub study_sessions: OwnedCollection<StudySession>,
}

/// `GET /api/health`에 노출하는 레코드 수
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCounts {
    pub users: usize,
    pub deadlines: usize,
    pub courses: usize,
    pub study_sessions: usize,
}

impl Store {
    /// 프로세스 메모리 저장소
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryUserStore::default()),
            deadlines: OwnedCollection::new(
                Arc::new(MemoryCollection::<Deadline>::default()),
                "Deadline not found",
            ),
            courses: OwnedCollection::new(
                Arc::new(MemoryCollection::<Course>::default()),
                "Course not found",
            ),
            study_sessions: OwnedCollection::new(
                Arc::new(MemoryCollection::<StudySession>::default()),
                "Study session not found",
            ),
        }
    }

    /// SQLite 저장소. 아직 실행되지 않은 마이그레이션을 먼저 실행합니다.
    pub async fn sqlite(pool: SqlitePool) -> Result<Self, AppError> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::Database(e.into()))?;

        Ok(Self {
            users: Arc::new(SqliteUserStore::new(pool.clone())),
            deadlines: OwnedCollection::new(
                Arc::new(SqliteCollection::<Deadline>::new(pool.clone())),
                "Deadline not found",
            ),
            courses: OwnedCollection::new(
                Arc::new(SqliteCollection::<Course>::new(pool.clone())),
                "Course not found",
            ),
            study_sessions: OwnedCollection::new(
                Arc::new(SqliteCollection::<StudySession>::new(pool)),
                "Study session not found",
            ),
        })
    }

    pub async fn counts(&self) -> Result<StoreCounts, AppError> {
        Ok(StoreCounts {
            users: self.users.count().await?,
            deadlines: self.deadlines.count().await?,
            courses: self.courses.count().await?,
            study_sessions: self.study_sessions.count().await?,
        })
    }
}
