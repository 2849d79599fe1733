//! # 서비스 모듈
//!
//! HTTP와 저장소에 의존하지 않는 순수한 도메인 로직입니다.
//! - `password`: 비밀번호 정책, 이메일 형식 검사, Argon2id 해싱
//! - `stats`: XP 계산과 공부 통계 집계

pub mod password;
pub mod stats;
