//! # 소유 레코드 컬렉션
//!
//! 모든 리소스 핸들러는 이 래퍼를 통해서만 레코드에 접근합니다.
//! `(id, 소유자)`가 둘 다 일치해야 레코드를 찾은 것으로 보고,
//! 레코드가 없는 경우와 다른 사용자의 레코드인 경우 모두 같은 `NotFound`를 반환합니다.

use std::sync::Arc;

use super::{Collection, Record};
use crate::error::AppError;

pub struct OwnedCollection<T: Record> {
    inner: Arc<dyn Collection<T>>,
    not_found: &'static str,
}

impl<T: Record> Clone for OwnedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            not_found: self.not_found,
        }
    }
}

impl<T: Record> OwnedCollection<T> {
    /// `not_found`: 404 응답 메시지 (예: "Deadline not found")
    pub fn new(inner: Arc<dyn Collection<T>>, not_found: &'static str) -> Self {
        Self { inner, not_found }
    }

    fn not_found(&self) -> AppError {
        AppError::NotFound(self.not_found.to_string())
    }

    /// 소유자의 레코드 전체 (삽입 순서)
    pub async fn list(&self, owner_id: &str) -> Result<Vec<T>, AppError> {
        self.inner.find_by_owner(owner_id).await
    }

    /// 핸들러가 id, 소유자, 타임스탬프를 채운 레코드를 추가합니다.
    pub async fn create(&self, record: T) -> Result<T, AppError> {
        self.inner.insert(record).await
    }

    pub async fn get(&self, id: &str, owner_id: &str) -> Result<T, AppError> {
        self.inner
            .find_by_id(id)
            .await?
            .filter(|record| record.owner_id() == owner_id)
            .ok_or_else(|| self.not_found())
    }

    /// 레코드를 읽어 `patch`를 적용한 뒤 저장합니다.
    ///
    /// 읽기와 쓰기 사이에 다른 요청이 같은 레코드를 수정하면 나중에 저장한 쪽이 이깁니다.
    /// `patch`가 에러를 반환하면 아무것도 저장하지 않습니다.
    pub async fn update<F>(&self, id: &str, owner_id: &str, patch: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut T) -> Result<(), AppError> + Send,
    {
        let mut record = self.get(id, owner_id).await?;
        patch(&mut record)?;

        // 그 사이에 삭제되었으면 404
        if !self.inner.update(record.clone()).await? {
            return Err(self.not_found());
        }
        Ok(record)
    }

    pub async fn delete(&self, id: &str, owner_id: &str) -> Result<(), AppError> {
        let record = self.get(id, owner_id).await?;
        if !self.inner.delete(record.id()).await? {
            return Err(self.not_found());
        }
        Ok(())
    }

    /// 모든 사용자의 레코드 수
    pub async fn count(&self) -> Result<usize, AppError> {
        self.inner.count().await
    }
}
