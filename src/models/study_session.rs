//! # 공부 세션 모델 정의
//!
//! 과목별 공부 시간을 기록하는 세션과, 세션/마감일에서 파생되는 통계 구조체입니다.
//!
//! 세션은 생성 후 수정·삭제되지 않습니다.
//! XP는 저장 시점에 `services::stats::session_xp`로 계산되어 함께 저장됩니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub user_id: String,
    /// 약한 참조 (과목 존재 여부를 검사하지 않음)
    pub course_id: String,
    /// 공부 시간 (분)
    pub duration: u32,
    #[serde(default)]
    pub notes: String,
    pub xp_earned: u32,
    /// 세션 날짜. 최근 7일 스트릭 계산에 사용됩니다.
    pub date: DateTime<Utc>,
}

/// 세션 생성 요청: `POST /api/study-sessions`의 요청 본문
///
/// `duration`은 숫자(`25`)와 숫자 문자열(`"25"`)을 모두 받기 때문에
/// `serde_json::Value`로 받아서 `duration_minutes()`로 해석합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudySessionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// 생략하면 서버가 현재 시각을 사용합니다.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl CreateStudySessionRequest {
    pub fn new(course_id: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            course_id: Some(course_id.into()),
            duration: Some(Value::from(duration_minutes)),
            ..Default::default()
        }
    }

    /// 양의 정수 분 단위로 해석합니다. 0, 음수, 소수, 숫자가 아닌 문자열은 None.
    pub fn duration_minutes(&self) -> Option<u32> {
        let minutes = match self.duration.as_ref()? {
            Value::Number(n) => n.as_u64()?,
            Value::String(s) => s.trim().parse::<u64>().ok()?,
            _ => return None,
        };
        u32::try_from(minutes).ok().filter(|m| *m > 0)
    }
}

/// `GET /api/study-data` 응답. 요청마다 새로 계산되며 저장되지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyData {
    #[serde(rename = "totalXP")]
    pub total_xp: u64,
    pub study_streak: u32,
    /// 소수점 한 자리 문자열 (예: "6.5")
    pub hours_studied: String,
    pub goals_completed: u32,
}
