//! # 뽀모도로 타이머
//!
//! 외부에서 1초마다 `tick()`을 호출하는 순수 상태 기계입니다. 시계나 스레드를 직접 쓰지 않습니다.
//!
//! ```text
//! Idle ──start──▶ Running ◀──start/pause──▶ Paused
//!                    │
//!                 tick (0초)
//!                    ▼
//!                Completed ──reset──▶ Idle
//! ```
//!
//! 완료 보상은 타이머 한 번에 정확히 한 번만 지급되고, 서버에 저장되지 않습니다.
//! (`StudyState::award_bonus_xp`로 화면의 XP 합계에만 더합니다.)

/// 기본 집중 시간: 25분
pub const DEFAULT_DURATION_SECS: u32 = 25 * 60;

/// 완료 보상 최솟값
pub const MIN_AWARD_XP: u32 = 10;

/// 뽀모도로 완료 보상: 설정 시간의 분 수, 최소 10 XP (25분 → 25 XP, 5분 → 10 XP)
///
/// 공부 세션 XP(`services::stats::session_xp`)와는 다른 규칙입니다.
pub fn pomodoro_xp(duration_secs: u32) -> u32 {
    (duration_secs / 60).max(MIN_AWARD_XP)
}

/// `mm:ss`
pub fn format_remaining(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
}

#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    duration_secs: u32,
    remaining_secs: u32,
    state: TimerState,
    /// 보상이 이미 지급되었는지. `reset`/`set_duration`에서만 지워집니다.
    awarded: bool,
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_SECS)
    }
}

impl PomodoroTimer {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            state: TimerState::Idle,
            awarded: false,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Idle/Paused → Running. 완료된 타이머는 `reset` 전까지 다시 시작되지 않습니다.
    pub fn start(&mut self) {
        if matches!(self.state, TimerState::Idle | TimerState::Paused) {
            self.state = TimerState::Running;
        }
    }

    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }

    /// 재생/일시정지 버튼
    pub fn toggle(&mut self) {
        match self.state {
            TimerState::Running => self.pause(),
            _ => self.start(),
        }
    }

    /// 1초 경과. 이번 tick에서 타이머가 끝났으면 보상 XP를 반환합니다.
    pub fn tick(&mut self) -> Option<u32> {
        if self.state != TimerState::Running {
            return None;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }

        self.state = TimerState::Completed;
        if self.awarded {
            return None;
        }
        self.awarded = true;
        Some(pomodoro_xp(self.duration_secs))
    }

    /// 같은 시간으로 처음부터. 진행 중이던 타이머는 보상 없이 버립니다.
    pub fn reset(&mut self) {
        *self = Self::new(self.duration_secs);
    }

    /// 시간을 바꾸고 처음부터 (5분/15분/25분 프리셋)
    pub fn set_duration(&mut self, duration_secs: u32) {
        *self = Self::new(duration_secs);
    }
}
