use axum::{extract::State, Json};
use chrono::Utc;

use crate::{
    error::AppError, middleware::auth::AuthUser, models::StudyData, routes::AppState,
    services::stats::summarize,
};

/// `GET /api/study-data`: recomputed from the caller's sessions and deadlines on every call.
pub async fn get_study_data(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<StudyData>, AppError> {
    let (sessions, deadlines) = tokio::try_join!(
        state.store.study_sessions.list(&auth_user.user_id),
        state.store.deadlines.list(&auth_user.user_id),
    )?;

    Ok(Json(summarize(&sessions, &deadlines, Utc::now())))
}
