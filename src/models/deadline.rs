//! # 마감일(Deadline) 모델 정의
//!
//! 사용자가 추적하는 과제/시험 마감일 구조체들입니다.
//!
//! ## 구조체 역할
//! - `Deadline`: 저장된 마감일 (응답용)
//! - `CreateDeadlineRequest`: `POST /api/deadlines` 요청 본문
//! - `UpdateDeadlineRequest`: `PUT /api/deadlines/{id}` 요청 본문 (부분 업데이트)

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// 마감일 중요도. JSON에서는 소문자 문자열(`"low"`, `"medium"`, `"high"`)입니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// 마감일 엔티티
///
/// `course_id`는 약한 참조입니다. 해당 과목이 실제로 존재하는지 검사하지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deadline {
    /// 고유 식별자 (UUIDv7)
    pub id: String,
    /// 소유자 ID. 생성 후 바뀌지 않습니다.
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub course_id: Option<String>,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    /// 첫 수정 전까지는 None (JSON에서 생략)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// 마감일 생성 요청
///
/// 필수 필드도 Option으로 받아서, 누락 시 JSON 파싱 에러 대신
/// "Title and due date are required" 메시지를 돌려줍니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeadlineRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    /// RFC 3339 또는 `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

/// 마감일 수정 요청. 보낸 필드만 덮어씁니다.
///
/// `course_id`만 `Option<Option<_>>`입니다:
/// None = 필드 누락 (변경 안 함), Some(None) = null (과목 연결 해제), Some(Some(id)) = 과목 지정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeadlineRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub course_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl Deadline {
    /// 수정 요청을 현재 레코드 위에 병합합니다.
    ///
    /// id와 user_id는 요청에 존재하지 않으므로 바뀔 수 없습니다.
    /// 성공하면 `updated_at`을 `now`로 기록합니다.
    pub fn apply(&mut self, patch: &UpdateDeadlineRequest, now: DateTime<Utc>) -> Result<(), AppError> {
        // 검증을 먼저 끝내서, 실패 시 레코드가 일부만 바뀌는 일이 없게 합니다.
        let due_date = match patch.due_date.as_deref() {
            Some(raw) => Some(
                parse_due_date(raw).ok_or_else(|| AppError::BadRequest("Invalid due date".to_string()))?,
            ),
            None => None,
        };
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(AppError::BadRequest("Title cannot be empty".to_string()));
            }
            self.title = title.trim().to_string();
        }
        if let Some(description) = &patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(course_id) = &patch.course_id {
            self.course_id = course_id.clone();
        }
        if let Some(due_date) = due_date {
            self.due_date = due_date;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        self.updated_at = Some(now);
        Ok(())
    }
}

/// 마감일 문자열을 UTC 시각으로 변환합니다.
///
/// 허용 형식:
/// - RFC 3339 (`2025-12-15T09:00:00Z`, `2025-12-15T09:00:00+09:00`)
/// - 시간대 없는 날짜+시각 (`2025-12-15T09:00`, `2025-12-15T09:00:00`) → UTC로 간주
/// - 날짜만 (`2025-12-15`) → 해당 날짜 00:00 UTC
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// 필드가 있으면(null 포함) Some으로 감쌉니다. 필드 누락은 `#[serde(default)]`가 None으로 처리합니다.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Deadline {
        Deadline {
            id: "d1".into(),
            user_id: "u1".into(),
            title: "Physics Lab Report".into(),
            description: String::new(),
            course_id: Some("c1".into()),
            due_date: Utc.with_ymd_and_hms(2025, 11, 20, 0, 0, 0).unwrap(),
            priority: Priority::Medium,
            completed: false,
            created_at: Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn parses_supported_due_date_formats() {
        let midnight = Utc.with_ymd_and_hms(2025, 12, 15, 0, 0, 0).unwrap();
        assert_eq!(parse_due_date("2025-12-15"), Some(midnight));
        assert_eq!(parse_due_date("2025-12-15T00:00"), Some(midnight));
        assert_eq!(parse_due_date("2025-12-15T09:00:00+09:00"), Some(midnight));
        assert_eq!(parse_due_date("next tuesday"), None);
    }

    #[test]
    fn null_course_id_clears_while_missing_keeps() {
        let clear: UpdateDeadlineRequest = serde_json::from_str(r#"{"courseId": null}"#).unwrap();
        assert_eq!(clear.course_id, Some(None));

        let keep: UpdateDeadlineRequest = serde_json::from_str(r#"{"completed": true}"#).unwrap();
        assert_eq!(keep.course_id, None);

        let mut deadline = sample();
        deadline.apply(&keep, Utc::now()).unwrap();
        assert_eq!(deadline.course_id.as_deref(), Some("c1"));
        assert!(deadline.completed);

        deadline.apply(&clear, Utc::now()).unwrap();
        assert_eq!(deadline.course_id, None);
    }

    #[test]
    fn invalid_patch_leaves_record_untouched() {
        let mut deadline = sample();
        let patch = UpdateDeadlineRequest {
            title: Some("Renamed".into()),
            due_date: Some("soon".into()),
            ..Default::default()
        };

        let err = deadline.apply(&patch, Utc::now()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid due date");
        assert_eq!(deadline, sample());
    }

    #[test]
    fn serializes_camel_case_without_pending_update_stamp() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["priority"], "medium");
        assert!(json.get("updatedAt").is_none());
    }
}
