use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// 새 과목에 색을 지정하지 않았을 때 쓰는 색상
pub const DEFAULT_COURSE_COLOR: &str = "#3b82f6";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub description: String,
    /// 진행률(%). 서버는 0~100 범위를 강제하지 않습니다.
    #[serde(default)]
    pub progress: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<i64>,
}

impl Course {
    pub fn apply(&mut self, patch: &UpdateCourseRequest, now: DateTime<Utc>) -> Result<(), AppError> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(AppError::BadRequest("Course name is required".to_string()));
            }
            self.name = name.trim().to_string();
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(progress) = patch.progress {
            self.progress = progress;
        }
        self.updated_at = Some(now);
        Ok(())
    }
}
