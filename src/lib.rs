//! # StudyHive 백엔드
//!
//! 학생용 학습 관리 서비스의 REST API 서버와, 같은 API를 쓰는 클라이언트 상태 계층입니다.
//!
//! - 서버: `router()`가 모든 라우트와 미들웨어를 조립합니다. 실행은 `main.rs`.
//! - 클라이언트: `client` 모듈 (API 클라이언트, 로컬 상태, 뽀모도로 타이머)

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::INTERNAL_ERROR_MESSAGE,
    routes::{auth, courses, deadlines, health, study_data, study_sessions, AppState},
};

/// 요청 본문 최대 크기 (10 MiB)
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// 전체 애플리케이션 라우터를 만듭니다.
///
/// `allowed_origins`: 자격 증명을 허용할 CORS 출처. 헤더 값으로 쓸 수 없는 항목은 건너뜁니다.
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me));

    let api_routes = Router::new()
        .merge(auth_routes)
        .route("/health", get(health::health_check))
        .route("/test", get(health::test_endpoint))
        .route(
            "/deadlines",
            get(deadlines::list_deadlines).post(deadlines::create_deadline),
        )
        .route(
            "/deadlines/{id}",
            put(deadlines::update_deadline).delete(deadlines::delete_deadline),
        )
        .route("/courses", get(courses::list_courses).post(courses::create_course))
        .route(
            "/courses/{id}",
            put(courses::update_course).delete(courses::delete_course),
        )
        .route(
            "/study-sessions",
            get(study_sessions::list_study_sessions).post(study_sessions::create_study_session),
        )
        .route("/study-data", get(study_data::get_study_data))
        .method_not_allowed_fallback(routes::route_not_found);

    Router::new()
        .nest("/api", api_routes)
        .fallback(routes::route_not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {:?}", origin);
                None
            }
        })
        .collect();

    // credentials를 허용하면 와일드카드(Any)를 쓸 수 없으므로 전부 명시합니다.
    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// 핸들러 패닉 → 500 `{ "error": "Internal server error" }`
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
    )
        .into_response()
}
