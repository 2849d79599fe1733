//! # 과목 API 라우트 핸들러
//!
//! | 메서드 | 경로 | 핸들러 |
//! |--------|------|--------|
//! | GET | /api/courses | `list_courses` |
//! | POST | /api/courses | `create_course` |
//! | PUT | /api/courses/{id} | `update_course` |
//! | DELETE | /api/courses/{id} | `delete_course` |

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

pub async fn list_courses(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = state.store.courses.list(&auth_user.user_id).await?;
    Ok(Json(courses))
}

pub async fn create_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiJson(req): ApiJson<CreateCourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::BadRequest("Course name is required".to_string()))?;

    let course = Course {
        id: uuid::Uuid::now_v7().to_string(),
        user_id: auth_user.user_id,
        name: name.to_string(),
        color: req
            .color
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COURSE_COLOR.to_string()),
        description: req.description.as_deref().map(str::trim).unwrap_or_default().to_string(),
        // 진행률은 항상 0에서 시작하고 PUT으로만 바뀝니다.
        progress: 0,
        created_at: Utc::now(),
        updated_at: None,
    };

    let course = state.store.courses.create(course).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

pub async fn update_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    let course = state
        .store
        .courses
        .update(&id, &auth_user.user_id, |course| course.apply(&req, Utc::now()))
        .await?;

    Ok(Json(course))
}

pub async fn delete_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store.courses.delete(&id, &auth_user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
