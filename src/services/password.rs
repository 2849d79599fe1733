//! # 비밀번호 정책과 해싱 서비스
//!
//! - `validate_password()`: 다섯 가지 규칙을 순서대로 검사하고, 처음 실패한 규칙의 메시지를 반환
//! - `is_valid_email()`: 이메일 형식 검사
//! - `PasswordService`: Argon2id 해싱/검증. 비용(메모리, 반복 횟수)은 설정에서 조정합니다.
//!
//! 해싱은 CPU를 오래 쓰는 작업이므로 `spawn_blocking`으로 블로킹 스레드 풀에서 실행합니다.
//! 그렇지 않으면 해싱 중에 같은 워커 스레드의 다른 요청이 멈춥니다.

use std::sync::LazyLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use regex::Regex;

use crate::error::AppError;

/// 특수문자 규칙에서 인정하는 문자 집합
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// 최소 길이 (문자 수)
pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// `local@domain.tld` 형태인지 검사합니다.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// 비밀번호 정책 검사
///
/// 규칙을 아래 순서대로 검사하고 처음 실패한 규칙의 메시지만 반환합니다.
/// 1. 8자 이상
/// 2. 대문자 포함
/// 3. 소문자 포함
/// 4. 숫자 포함
/// 5. `SPECIAL_CHARACTERS` 중 하나 포함
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    let rules: [(fn(&str) -> bool, &'static str); 5] = [
        (
            |p| p.chars().count() >= MIN_PASSWORD_LENGTH,
            "Password must be at least 8 characters long",
        ),
        (
            |p| p.chars().any(|c| c.is_ascii_uppercase()),
            "Password must contain at least one uppercase letter",
        ),
        (
            |p| p.chars().any(|c| c.is_ascii_lowercase()),
            "Password must contain at least one lowercase letter",
        ),
        (
            |p| p.chars().any(|c| c.is_ascii_digit()),
            "Password must contain at least one number",
        ),
        (
            |p| p.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
            "Password must contain at least one special character",
        ),
    ];

    match rules.iter().find(|(passes, _)| !passes(password)) {
        Some((_, message)) => Err(*message),
        None => Ok(()),
    }
}

/// Argon2id 비밀번호 해싱 서비스
///
/// `Params`만 들고 있고, 해싱할 때마다 `Argon2` 인스턴스를 만듭니다.
/// `dummy_hash`는 없는 이메일로 로그인할 때 검증 비용을 맞추는 데 씁니다.
#[derive(Debug, Clone)]
pub struct PasswordService {
    params: Params,
    dummy_hash: String,
}

impl PasswordService {
    /// `memory_kib`: 메모리 비용(KiB), `iterations`: 반복 횟수. 병렬도는 1로 고정합니다.
    pub fn new(memory_kib: u32, iterations: u32) -> Result<Self, AppError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| AppError::Internal(format!("Invalid Argon2 parameters: {}", e)))?;
        let dummy_hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone())
            .hash_password(b"studyhive-dummy-password", &SaltString::generate(&mut OsRng))
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
            .to_string();
        Ok(Self { params, dummy_hash })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// PHC 문자열(`$argon2id$v=19$m=...`)을 반환합니다. 솔트는 매번 새로 생성합니다.
    pub async fn hash(&self, password: String) -> Result<String, AppError> {
        let argon2 = self.argon2();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
        })
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
    }

    /// 비밀번호가 해시와 일치하는지 검사합니다.
    ///
    /// 해시 문자열에 기록된 파라미터로 검증하므로, 설정 비용이 바뀌어도 기존 해시는 계속 검증됩니다.
    pub async fn verify(&self, password: String, hash: String) -> Result<bool, AppError> {
        let argon2 = self.argon2();
        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&hash)
                .map_err(|e| AppError::Internal(format!("Password hash parse error: {}", e)))?;
            Ok(argon2.verify_password(password.as_bytes(), &parsed).is_ok())
        })
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?
    }

    /// 사용자가 없을 때 실제 검증과 같은 비용으로 더미 해시를 검증합니다. 결과는 버립니다.
    pub async fn verify_dummy(&self, password: String) -> Result<(), AppError> {
        self.verify(password, self.dummy_hash.clone()).await?;
        Ok(())
    }
}
