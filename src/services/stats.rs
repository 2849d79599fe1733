//! # 공부 통계 계산
//!
//! 서버의 `GET /api/study-data`와 클라이언트 상태 계층이 같은 함수로 통계를 계산합니다.
//! 통계는 저장하지 않고 요청마다 세션/마감일 목록을 훑어 새로 만듭니다.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Deadline, StudyData, StudySession};

/// 스트릭 집계 기간 (일)
pub const STREAK_WINDOW_DAYS: i64 = 7;

/// 스트릭 상한
pub const MAX_STREAK: u32 = 7;

/// 공부 세션 XP: 10분 단위로 내림한 분 수 (25분 → 20 XP, 9분 → 0 XP)
///
/// 뽀모도로 완료 보상(`client::pomodoro::pomodoro_xp`)과는 다른 규칙입니다.
pub fn session_xp(duration_minutes: u32) -> u32 {
    duration_minutes / 10 * 10
}

/// 분 → 시간, 소수점 한 자리 문자열 (0분 → "0.0")
///
/// 0.05 단위 경계는 올림합니다 (15분 → "0.3"). 부동소수점 포맷은 짝수 쪽으로 반올림하므로 정수로 계산합니다.
pub fn format_hours(total_minutes: u64) -> String {
    let tenths = (total_minutes + 3) / 6;
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// 세션과 마감일 목록에서 통계를 계산합니다.
///
/// - `total_xp`: 세션 XP 합계
/// - `hours_studied`: 총 공부 시간
/// - `study_streak`: `now` 기준 최근 7일 안의 세션 수, 최대 7
/// - `goals_completed`: 완료된 마감일 수
pub fn summarize(sessions: &[StudySession], deadlines: &[Deadline], now: DateTime<Utc>) -> StudyData {
    let window_start = now - Duration::days(STREAK_WINDOW_DAYS);

    let total_xp = sessions.iter().map(|s| u64::from(s.xp_earned)).sum();
    let total_minutes = sessions.iter().map(|s| u64::from(s.duration)).sum();
    let recent = sessions.iter().filter(|s| s.date > window_start).count();
    let goals_completed = deadlines.iter().filter(|d| d.completed).count();

    StudyData {
        total_xp,
        study_streak: recent.min(MAX_STREAK as usize) as u32,
        hours_studied: format_hours(total_minutes),
        goals_completed: goals_completed as u32,
    }
}
