//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 `{ "error": "..." }` 형태의 HTTP 응답으로 자동 변환
//!
//! | variant | 상태 코드 |
//! |---------|-----------|
//! | `BadRequest` | 400 |
//! | `Conflict` | 400 (이메일 중복 등, 클라이언트는 검증 실패와 같은 방식으로 처리) |
//! | `Unauthorized` | 401 |
//! | `NotFound` | 404 |
//! | `Internal`, `Database`, `Serialization` | 500 |

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 클라이언트에 내부 에러 대신 보여줄 고정 메시지
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 리소스가 없거나, 있어도 요청한 사용자의 소유가 아님 (HTTP 404)
    ///
    /// 두 경우를 구분하지 않아야 다른 사용자의 레코드 존재 여부가 노출되지 않습니다.
    #[error("{0}")]
    NotFound(String),

    /// 입력값 누락/형식 오류 (HTTP 400)
    #[error("{0}")]
    BadRequest(String),

    /// 인증 실패: 잘못된 자격 증명 (HTTP 401)
    #[error("{0}")]
    Unauthorized(String),

    /// 리소스 충돌: 이미 가입된 이메일 (HTTP 400)
    #[error("{0}")]
    Conflict(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx 함수에서 `?`를 쓰면 자동으로 AppError::Database로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 저장된 레코드 본문(JSON) 변환 오류 (HTTP 500)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// 응답 상태 코드
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) | AppError::Database(_) | AppError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// 요청 본문 JSON 파싱 실패(문법 오류, 타입 불일치, Content-Type 누락)를 400으로 변환합니다.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    /// 내부 에러(Database, Serialization, Internal)는 실제 내용을 로그에만 기록하고,
    /// 클라이언트에는 고정된 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Conflict(msg) => msg,
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            AppError::Serialization(ref e) => {
                tracing::error!("Serialization error: {}", e);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
