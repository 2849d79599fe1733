//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/health` → 상태, 현재 시각, 레코드 수, 포트
//! - `GET /api/test` → 프론트엔드 연결 확인용 고정 메시지
//!
//! 두 엔드포인트 모두 인증이 필요 없습니다.

use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::{error::AppError, routes::AppState};

/// `GET /api/health`
///
/// ```json
/// { "status": "OK", "timestamp": "...", "users": 2, "deadlines": 5,
///   "courses": 3, "studySessions": 7, "port": 3001 }
/// ```
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let counts = state.store.counts().await?;

    Ok(Json(json!({
        "status": "OK",
        "timestamp": Utc::now(),
        "users": counts.users,
        "deadlines": counts.deadlines,
        "courses": counts.courses,
        "studySessions": counts.study_sessions,
        "port": state.port,
    })))
}

/// `GET /api/test`
pub async fn test_endpoint() -> Json<Value> {
    Json(json!({
        "message": "Server is working!",
        "timestamp": Utc::now(),
    }))
}
