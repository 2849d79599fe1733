//! # 클라이언트 학습 상태
//!
//! 서버 데이터의 로컬 사본(과목, 마감일, 공부 세션)과 파생 통계를 관리합니다.
//!
//! 모든 변경은 낙관적으로 먼저 로컬에 반영한 뒤 서버에 보냅니다.
//! - 성공: 서버가 돌려준 레코드로 로컬 레코드를 교체 (id, 타임스탬프 확정)
//! - 실패: 로컬 변경을 되돌리고 에러를 반환
//!
//! 정렬 규칙: 마감일은 `due_date` 오름차순, 새 과목/세션은 목록 맨 앞에 추가합니다.

use async_trait::async_trait;
use chrono::Utc;

use super::{ApiClient, ClientError};
use crate::{
    db::Record,
    models::*,
    services::stats::{session_xp, summarize},
};

/// 상태 계층이 사용하는 서버 API. `ApiClient`가 구현하고, 테스트는 가짜 구현을 씁니다.
#[async_trait]
pub trait StudyBackend: Send + Sync {
    async fn list_courses(&self) -> Result<Vec<Course>, ClientError>;
    async fn create_course(&self, req: &CreateCourseRequest) -> Result<Course, ClientError>;
    async fn update_course(&self, id: &str, req: &UpdateCourseRequest) -> Result<Course, ClientError>;
    async fn delete_course(&self, id: &str) -> Result<(), ClientError>;

    async fn list_deadlines(&self) -> Result<Vec<Deadline>, ClientError>;
    async fn create_deadline(&self, req: &CreateDeadlineRequest) -> Result<Deadline, ClientError>;
    async fn update_deadline(
        &self,
        id: &str,
        req: &UpdateDeadlineRequest,
    ) -> Result<Deadline, ClientError>;
    async fn delete_deadline(&self, id: &str) -> Result<(), ClientError>;

    async fn list_study_sessions(&self) -> Result<Vec<StudySession>, ClientError>;
    async fn create_study_session(
        &self,
        req: &CreateStudySessionRequest,
    ) -> Result<StudySession, ClientError>;
}

#[async_trait]
impl StudyBackend for ApiClient {
    async fn list_courses(&self) -> Result<Vec<Course>, ClientError> {
        ApiClient::list_courses(self).await
    }

    async fn create_course(&self, req: &CreateCourseRequest) -> Result<Course, ClientError> {
        ApiClient::create_course(self, req).await
    }

    async fn update_course(&self, id: &str, req: &UpdateCourseRequest) -> Result<Course, ClientError> {
        ApiClient::update_course(self, id, req).await
    }

    async fn delete_course(&self, id: &str) -> Result<(), ClientError> {
        ApiClient::delete_course(self, id).await
    }

    async fn list_deadlines(&self) -> Result<Vec<Deadline>, ClientError> {
        ApiClient::list_deadlines(self).await
    }

    async fn create_deadline(&self, req: &CreateDeadlineRequest) -> Result<Deadline, ClientError> {
        ApiClient::create_deadline(self, req).await
    }

    async fn update_deadline(
        &self,
        id: &str,
        req: &UpdateDeadlineRequest,
    ) -> Result<Deadline, ClientError> {
        ApiClient::update_deadline(self, id, req).await
    }

    async fn delete_deadline(&self, id: &str) -> Result<(), ClientError> {
        ApiClient::delete_deadline(self, id).await
    }

    async fn list_study_sessions(&self) -> Result<Vec<StudySession>, ClientError> {
        ApiClient::list_study_sessions(self).await
    }

    async fn create_study_session(
        &self,
        req: &CreateStudySessionRequest,
    ) -> Result<StudySession, ClientError> {
        ApiClient::create_study_session(self, req).await
    }
}

/// 서버 응답을 기다리는 동안 쓰는 임시 id
fn pending_id() -> String {
    format!("pending-{}", uuid::Uuid::now_v7())
}

fn position<T: Record>(items: &[T], id: &str) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

fn sort_by_due_date(deadlines: &mut [Deadline]) {
    deadlines.sort_by_key(|d| d.due_date);
}

pub struct StudyState<B> {
    backend: B,
    courses: Vec<Course>,
    deadlines: Vec<Deadline>,
    study_sessions: Vec<StudySession>,
    /// 뽀모도로 보상. 서버에 저장되지 않고 표시용 합계에만 더해집니다.
    bonus_xp: u64,
}

impl<B: StudyBackend> StudyState<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            courses: Vec::new(),
            deadlines: Vec::new(),
            study_sessions: Vec::new(),
            bonus_xp: 0,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn deadlines(&self) -> &[Deadline] {
        &self.deadlines
    }

    pub fn study_sessions(&self) -> &[StudySession] {
        &self.study_sessions
    }

    /// 로컬 사본 기준 통계. 서버의 `GET /api/study-data`와 같은 계산에 뽀모도로 보상을 더합니다.
    pub fn stats(&self) -> StudyData {
        let mut data = summarize(&self.study_sessions, &self.deadlines, Utc::now());
        data.total_xp += self.bonus_xp;
        data
    }

    pub fn award_bonus_xp(&mut self, xp: u32) {
        self.bonus_xp += u64::from(xp);
    }

    /// 로그아웃: 로컬 데이터를 모두 버립니다.
    pub fn clear(&mut self) {
        self.courses.clear();
        self.deadlines.clear();
        self.study_sessions.clear();
        self.bonus_xp = 0;
    }

    /// 세 컬렉션을 동시에 다시 읽습니다. 하나라도 실패하면 기존 사본을 그대로 둡니다.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let (courses, mut deadlines, study_sessions) = tokio::try_join!(
            self.backend.list_courses(),
            self.backend.list_deadlines(),
            self.backend.list_study_sessions(),
        )?;
        sort_by_due_date(&mut deadlines);

        self.courses = courses;
        self.deadlines = deadlines;
        self.study_sessions = study_sessions;
        Ok(())
    }

    // ── 과목 ──

    pub async fn add_course(&mut self, req: CreateCourseRequest) -> Result<Course, ClientError> {
        let name = req
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ClientError::Invalid("Course name is required".to_string()))?;

        let placeholder = Course {
            id: pending_id(),
            user_id: String::new(),
            name: name.to_string(),
            color: req.color.clone().unwrap_or_else(|| DEFAULT_COURSE_COLOR.to_string()),
            description: req.description.clone().unwrap_or_default(),
            progress: 0,
            created_at: Utc::now(),
            updated_at: None,
        };
        let pending = placeholder.id.clone();
        self.courses.insert(0, placeholder);

        let result = self.backend.create_course(&req).await;
        let index = position(&self.courses, &pending);
        match (result, index) {
            (Ok(course), Some(i)) => {
                self.courses[i] = course.clone();
                Ok(course)
            }
            (Ok(course), None) => {
                self.courses.insert(0, course.clone());
                Ok(course)
            }
            (Err(e), index) => {
                if let Some(i) = index {
                    self.courses.remove(i);
                }
                Err(e)
            }
        }
    }

    pub async fn update_course(
        &mut self,
        id: &str,
        req: UpdateCourseRequest,
    ) -> Result<Course, ClientError> {
        let index = position(&self.courses, id)
            .ok_or_else(|| ClientError::Invalid("Course not found".to_string()))?;
        let previous = self.courses[index].clone();
        self.courses[index].apply(&req, Utc::now())?;

        match self.backend.update_course(id, &req).await {
            Ok(course) => {
                if let Some(i) = position(&self.courses, id) {
                    self.courses[i] = course.clone();
                }
                Ok(course)
            }
            Err(e) => {
                if let Some(i) = position(&self.courses, id) {
                    self.courses[i] = previous;
                }
                Err(e)
            }
        }
    }

    pub async fn delete_course(&mut self, id: &str) -> Result<(), ClientError> {
        let index = position(&self.courses, id)
            .ok_or_else(|| ClientError::Invalid("Course not found".to_string()))?;
        let removed = self.courses.remove(index);

        if let Err(e) = self.backend.delete_course(id).await {
            let index = index.min(self.courses.len());
            self.courses.insert(index, removed);
            return Err(e);
        }
        Ok(())
    }

    // ── 마감일 ──

    pub async fn add_deadline(&mut self, req: CreateDeadlineRequest) -> Result<Deadline, ClientError> {
        let title = req.title.as_deref().map(str::trim).filter(|t| !t.is_empty());
        let due_date = req.due_date.as_deref().map(str::trim).filter(|d| !d.is_empty());
        let (Some(title), Some(due_date)) = (title, due_date) else {
            return Err(ClientError::Invalid("Title and due date are required".to_string()));
        };
        let due_date = parse_due_date(due_date)
            .ok_or_else(|| ClientError::Invalid("Invalid due date".to_string()))?;

        let placeholder = Deadline {
            id: pending_id(),
            user_id: String::new(),
            title: title.to_string(),
            description: req.description.clone().unwrap_or_default(),
            course_id: req.course_id.clone().filter(|c| !c.is_empty()),
            due_date,
            priority: req.priority.unwrap_or_default(),
            completed: false,
            created_at: Utc::now(),
            updated_at: None,
        };
        let pending = placeholder.id.clone();
        self.deadlines.push(placeholder);
        sort_by_due_date(&mut self.deadlines);

        let result = self.backend.create_deadline(&req).await;
        if let Some(i) = position(&self.deadlines, &pending) {
            self.deadlines.remove(i);
        }
        let deadline = result?;
        self.deadlines.push(deadline.clone());
        sort_by_due_date(&mut self.deadlines);
        Ok(deadline)
    }

    pub async fn update_deadline(
        &mut self,
        id: &str,
        req: UpdateDeadlineRequest,
    ) -> Result<Deadline, ClientError> {
        let index = position(&self.deadlines, id)
            .ok_or_else(|| ClientError::Invalid("Deadline not found".to_string()))?;
        let previous = self.deadlines[index].clone();
        self.deadlines[index].apply(&req, Utc::now())?;
        sort_by_due_date(&mut self.deadlines);

        let result = self.backend.update_deadline(id, &req).await;
        let replacement = match &result {
            Ok(deadline) => deadline.clone(),
            Err(_) => previous,
        };
        if let Some(i) = position(&self.deadlines, id) {
            self.deadlines[i] = replacement;
        }
        sort_by_due_date(&mut self.deadlines);
        result
    }

    pub async fn delete_deadline(&mut self, id: &str) -> Result<(), ClientError> {
        let index = position(&self.deadlines, id)
            .ok_or_else(|| ClientError::Invalid("Deadline not found".to_string()))?;
        let removed = self.deadlines.remove(index);

        if let Err(e) = self.backend.delete_deadline(id).await {
            self.deadlines.push(removed);
            sort_by_due_date(&mut self.deadlines);
            return Err(e);
        }
        Ok(())
    }

    // ── 공부 세션 ──

    pub async fn add_study_session(
        &mut self,
        req: CreateStudySessionRequest,
    ) -> Result<StudySession, ClientError> {
        let course_id = req.course_id.as_deref().map(str::trim).filter(|c| !c.is_empty());
        let (Some(course_id), Some(duration)) = (course_id, req.duration_minutes()) else {
            return Err(ClientError::Invalid("Course and duration are required".to_string()));
        };

        let placeholder = StudySession {
            id: pending_id(),
            user_id: String::new(),
            course_id: course_id.to_string(),
            duration,
            notes: req.notes.clone().unwrap_or_default(),
            xp_earned: session_xp(duration),
            date: req.date.unwrap_or_else(Utc::now),
        };
        let pending = placeholder.id.clone();
        self.study_sessions.insert(0, placeholder);

        let result = self.backend.create_study_session(&req).await;
        let index = position(&self.study_sessions, &pending);
        match (result, index) {
            (Ok(session), Some(i)) => {
                self.study_sessions[i] = session.clone();
                Ok(session)
            }
            (Ok(session), None) => {
                self.study_sessions.insert(0, session.clone());
                Ok(session)
            }
            (Err(e), index) => {
                if let Some(i) = index {
                    self.study_sessions.remove(i);
                }
                Err(e)
            }
        }
    }
}
