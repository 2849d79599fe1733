//! # 마감일 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/deadlines | `list_deadlines` | 내 마감일 목록 |
//! | POST | /api/deadlines | `create_deadline` | 새 마감일 |
//! | PUT | /api/deadlines/{id} | `update_deadline` | 부분 수정 |
//! | DELETE | /api/deadlines/{id} | `delete_deadline` | 삭제 (204) |
//!
//! 모든 핸들러는 `AuthUser`로 호출자를 확인하고,
//! `OwnedCollection`을 통해서만 레코드에 접근합니다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::{ApiJson, AppState},
};

pub async fn list_deadlines(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Deadline>>, AppError> {
    let deadlines = state.store.deadlines.list(&auth_user.user_id).await?;
    Ok(Json(deadlines))
}

/// `POST /api/deadlines` + `{ "title", "dueDate", "description"?, "courseId"?, "priority"? }`
///
/// `completed`는 항상 `false`로 시작합니다.
pub async fn create_deadline(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiJson(req): ApiJson<CreateDeadlineRequest>,
) -> Result<(StatusCode, Json<Deadline>), AppError> {
    let title = req.title.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let due_date = req.due_date.as_deref().map(str::trim).filter(|d| !d.is_empty());
    let (Some(title), Some(due_date)) = (title, due_date) else {
        return Err(AppError::BadRequest("Title and due date are required".to_string()));
    };
    let due_date =
        parse_due_date(due_date).ok_or_else(|| AppError::BadRequest("Invalid due date".to_string()))?;

    let deadline = Deadline {
        id: uuid::Uuid::now_v7().to_string(),
        user_id: auth_user.user_id,
        title: title.to_string(),
        description: req.description.as_deref().map(str::trim).unwrap_or_default().to_string(),
        // 빈 문자열은 과목 없음으로 취급
        course_id: req.course_id.filter(|c| !c.is_empty()),
        due_date,
        priority: req.priority.unwrap_or_default(),
        completed: false,
        created_at: Utc::now(),
        updated_at: None,
    };

    let deadline = state.store.deadlines.create(deadline).await?;
    Ok((StatusCode::CREATED, Json(deadline)))
}

/// `PUT /api/deadlines/{id}`
///
/// 요청에 있는 필드만 바뀝니다. 다른 사용자의 마감일이면 404.
pub async fn update_deadline(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateDeadlineRequest>,
) -> Result<Json<Deadline>, AppError> {
    let deadline = state
        .store
        .deadlines
        .update(&id, &auth_user.user_id, |deadline| deadline.apply(&req, Utc::now()))
        .await?;

    Ok(Json(deadline))
}

pub async fn delete_deadline(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store.deadlines.delete(&id, &auth_user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
