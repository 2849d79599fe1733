//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 서버 핸들러와 `client` 모듈이 같은 구조체를 공유합니다.
//! - `course`: 과목(Course)
//! - `deadline`: 마감일(Deadline)
//! - `study_session`: 공부 세션과 파생 통계(StudyData)
//! - `user`: 사용자(User)와 인증 요청/응답

pub mod course;
pub mod deadline;
pub mod study_session;
pub mod user;

pub use course::*;
pub use deadline::*;
pub use study_session::*;
pub use user::*;
