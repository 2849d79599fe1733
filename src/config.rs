//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `JWT_SECRET`: JWT 토큰 서명에 사용할 비밀키 (필수)
//! - `HOST`, `PORT`: 서버 바인딩 주소 (기본값 `0.0.0.0:3001`)
//! - `DATABASE_URL`: SQLite 경로. 없으면 메모리 저장소를 사용합니다.
//! - `CORS_ORIGINS`: 쉼표로 구분한 허용 출처 목록
//! - `ARGON2_MEMORY_KIB`, `ARGON2_ITERATIONS`: 비밀번호 해싱 비용

use std::env;

use argon2::Params;

/// 개발 서버(Vite, CRA)의 기본 출처
pub const DEFAULT_CORS_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "http://localhost:3000",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:3000",
];

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// JWT 토큰 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// SQLite 데이터베이스 URL (예: "sqlite:data/studyhive.db?mode=rwc")
    /// None이면 프로세스 메모리에만 저장합니다.
    pub database_url: Option<String>,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3001)
    pub port: u16,
    /// 자격 증명(credentials)을 허용할 CORS 출처 목록
    pub cors_origins: Vec<String>,
    /// Argon2 메모리 비용 (KiB)
    pub argon2_memory_kib: u32,
    /// Argon2 반복 횟수
    pub argon2_iterations: u32,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `JWT_SECRET`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            jwt_secret: env::var("JWT_SECRET")?,
            // 빈 문자열도 "설정 안 됨"으로 취급합니다.
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .unwrap_or(3001),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect()),
            argon2_memory_kib: env::var("ARGON2_MEMORY_KIB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(Params::DEFAULT_M_COST),
            argon2_iterations: env::var("ARGON2_ITERATIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(Params::DEFAULT_T_COST),
        })
    }

    /// `host:port` 형태의 바인딩 주소
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// "a, b,,c" → ["a", "b", "c"]
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }
}
