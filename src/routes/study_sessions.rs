//! # 공부 세션 API 라우트 핸들러
//!
//! - `GET /api/study-sessions`: 내 세션 목록
//! - `POST /api/study-sessions`: 세션 기록. XP는 서버가 계산합니다.
//!
//! 세션은 기록 후 수정/삭제할 수 없습니다.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::{
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::{ApiJson, AppState},
    services::stats::session_xp,
};

pub async fn list_study_sessions(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<StudySession>>, AppError> {
    let sessions = state.store.study_sessions.list(&auth_user.user_id).await?;
    Ok(Json(sessions))
}

pub async fn create_study_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiJson(req): ApiJson<CreateStudySessionRequest>,
) -> Result<(StatusCode, Json<StudySession>), AppError> {
    let course_id = req.course_id.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let (Some(course_id), Some(duration)) = (course_id, req.duration_minutes()) else {
        return Err(AppError::BadRequest("Course and duration are required".to_string()));
    };

    let session = StudySession {
        id: uuid::Uuid::now_v7().to_string(),
        user_id: auth_user.user_id,
        course_id: course_id.to_string(),
        duration,
        notes: req.notes.as_deref().map(str::trim).unwrap_or_default().to_string(),
        xp_earned: session_xp(duration),
        date: req.date.unwrap_or_else(Utc::now),
    };

    let session = state.store.study_sessions.create(session).await?;
    tracing::debug!(
        "Study session {} recorded: {} min, {} XP",
        session.id,
        session.duration,
        session.xp_earned
    );

    Ok((StatusCode::CREATED, Json(session)))
}
