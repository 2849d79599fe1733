//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! 라우터 조립은 `crate::router()`에서 합니다.
//!
//! 각 하위 모듈:
//! - `auth`: 회원가입, 로그인, 내 정보
//! - `deadlines`: 마감일 CRUD
//! - `courses`: 과목 CRUD
//! - `study_sessions`: 공부 세션 기록
//! - `study_data`: 집계 통계
//! - `health`: 서버 상태 확인, 연결 테스트

pub mod auth;
pub mod courses;
pub mod deadlines;
pub mod health;
pub mod study_data;
pub mod study_sessions;

use axum::{extract::FromRequest, http::Uri};

use crate::{db::Store, error::AppError, services::password::PasswordService};

/// 모든 핸들러가 공유하는 애플리케이션 상태
///
/// `Store`와 `PasswordService`는 clone해도 내부 저장소를 공유합니다.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub jwt_secret: String,
    pub passwords: PasswordService,
    /// `GET /api/health`에 표시하는 포트
    pub port: u16,
}

/// `axum::Json`과 같지만, 본문 파싱 실패를 `{ "error": ... }` 400 응답으로 바꿉니다.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// 경로나 메서드가 어떤 라우트에도 매칭되지 않은 요청 → 404 `{ "error": "Route not found" }`
pub async fn route_not_found(uri: Uri) -> AppError {
    tracing::warn!("No route for {}", uri);
    AppError::NotFound("Route not found".to_string())
}
