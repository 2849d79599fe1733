//! # 클라이언트 계층
//!
//! 프론트엔드가 하던 일을 Rust로 옮긴 모듈입니다. 서버 코드는 이 모듈을 쓰지 않습니다.
//!
//! - `api`: REST API용 reqwest 클라이언트 (토큰 보관 포함)
//! - `state`: 과목/마감일/세션의 로컬 사본과 낙관적 업데이트
//! - `pomodoro`: 뽀모도로 타이머 상태 기계

pub mod api;
pub mod pomodoro;
pub mod state;

use thiserror::Error;

use crate::error::AppError;

pub use api::ApiClient;
pub use pomodoro::{pomodoro_xp, PomodoroTimer, TimerState};
pub use state::{StudyBackend, StudyState};

#[derive(Debug, Error)]
pub enum ClientError {
    /// 연결 실패, 응답 본문 파싱 실패 등
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 서버가 `{ "error": ... }`로 거절한 요청
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },

    /// 로그인 전에 보호된 API를 호출함
    #[error("Not authenticated")]
    NotAuthenticated,

    /// 서버에 보내기 전에 로컬 검증에서 걸린 요청
    #[error("{0}")]
    Invalid(String),
}

/// 로컬에서 모델 검증(`Deadline::apply` 등)에 실패한 경우
impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        ClientError::Invalid(err.to_string())
    }
}
