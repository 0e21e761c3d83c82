pub mod edit;

use tracing::{debug, info, warn};

pub use edit::{CommitReport, EditError, EditField};

/// Length of a pomodoro session when nothing else is configured
pub const DEFAULT_SESSION_SECS: u32 = 25 * 60;

/// Coarse state derived from the running and editing flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum TimerStatus {
    Idle,
    Running,
    Editing,
}

/// What a single tick did to the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, or frozen by an edit in progress
    Ignored,
    Counted { remaining: u32 },
    SessionCompleted { sessions: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub remaining_secs: u32,
    pub default_secs: u32,
    pub is_running: bool,
    pub sessions_completed: u32,
    pub is_editing: bool,
    pub edit_minutes: String,
    pub edit_seconds: String,
    pub task_label: String,
}

impl TimerState {
    pub fn new(default_secs: u32) -> Self {
        let (edit_minutes, edit_seconds) = edit::stage(default_secs);
        Self {
            remaining_secs: default_secs,
            default_secs,
            is_running: false,
            sessions_completed: 0,
            is_editing: false,
            edit_minutes,
            edit_seconds,
            task_label: String::new(),
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_SECS)
    }
}

/// Sole owner of the countdown state. Every mutation goes through one of the
/// intent methods below; time only advances through `tick`.
#[derive(Debug, Clone, Default)]
pub struct TimerController {
    state: TimerState,
}

impl TimerController {
    pub fn new(default_secs: u32) -> Self {
        Self {
            state: TimerState::new(default_secs),
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn remaining_secs(&self) -> u32 {
        self.state.remaining_secs
    }

    pub fn default_secs(&self) -> u32 {
        self.state.default_secs
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn is_editing(&self) -> bool {
        self.state.is_editing
    }

    pub fn sessions_completed(&self) -> u32 {
        self.state.sessions_completed
    }

    pub fn task_label(&self) -> &str {
        &self.state.task_label
    }

    pub fn edit_buffer(&self, field: EditField) -> &str {
        match field {
            EditField::Minutes => &self.state.edit_minutes,
            EditField::Seconds => &self.state.edit_seconds,
        }
    }

    pub fn status(&self) -> TimerStatus {
        if self.state.is_editing {
            TimerStatus::Editing
        } else if self.state.is_running {
            TimerStatus::Running
        } else {
            TimerStatus::Idle
        }
    }

    /// Whether a host scheduler should currently be delivering ticks
    pub fn wants_ticks(&self) -> bool {
        self.status() == TimerStatus::Running
    }

    pub fn toggle_run(&mut self) {
        self.state.is_running = !self.state.is_running;
        debug!(
            running = self.state.is_running,
            remaining = self.state.remaining_secs,
            "toggled timer"
        );
    }

    pub fn reset(&mut self) {
        self.state.is_running = false;
        self.state.remaining_secs = self.state.default_secs;
        debug!(remaining = self.state.remaining_secs, "reset timer");
    }

    /// Advance one second. Reaching zero and completing the session are two
    /// separate ticks: the tick that finds zero is the one that completes.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.wants_ticks() {
            return TickOutcome::Ignored;
        }

        if self.state.remaining_secs > 0 {
            self.state.remaining_secs -= 1;
            return TickOutcome::Counted {
                remaining: self.state.remaining_secs,
            };
        }

        self.state.is_running = false;
        self.state.sessions_completed = self.state.sessions_completed.saturating_add(1);
        self.state.remaining_secs = self.state.default_secs;
        info!(
            sessions = self.state.sessions_completed,
            task = %self.state.task_label,
            "session completed"
        );

        TickOutcome::SessionCompleted {
            sessions: self.state.sessions_completed,
        }
    }

    /// Enter edit mode with the current value staged. Does not pause.
    pub fn begin_edit(&mut self) {
        let (minutes, seconds) = edit::stage(self.state.remaining_secs);
        self.state.edit_minutes = minutes;
        self.state.edit_seconds = seconds;
        self.state.is_editing = true;
        debug!(
            minutes = %self.state.edit_minutes,
            seconds = %self.state.edit_seconds,
            "began edit"
        );
    }

    pub fn update_edit_buffer(&mut self, field: EditField, raw: &str) {
        let buffer = self.edit_buffer_mut(field);
        buffer.clear();
        buffer.push_str(raw);
    }

    pub fn push_edit_char(&mut self, field: EditField, c: char) {
        let mut next = self.edit_buffer(field).to_string();
        next.push(c);
        self.update_edit_buffer(field, &next);
    }

    pub fn pop_edit_char(&mut self, field: EditField) {
        let mut next = self.edit_buffer(field).to_string();
        next.pop();
        self.update_edit_buffer(field, &next);
    }

    /// Replace the countdown with the staged buffers. Unparsable fields count
    /// as zero and are listed in the report rather than failing the commit.
    pub fn commit_edit(&mut self) -> CommitReport {
        if !self.state.is_editing {
            return CommitReport {
                remaining_secs: self.state.remaining_secs,
                fallbacks: Vec::new(),
            };
        }

        let mut fallbacks = Vec::new();
        let mut parse = |field: EditField, raw: &str| {
            edit::parse_field(field, raw).unwrap_or_else(|err| {
                warn!(%err, "edit buffer fallback");
                fallbacks.push(err);
                0
            })
        };
        let minutes = parse(EditField::Minutes, &self.state.edit_minutes);
        let seconds = parse(EditField::Seconds, &self.state.edit_seconds);

        self.state.remaining_secs = edit::total_secs(minutes, seconds);
        self.state.is_editing = false;
        debug!(
            remaining = self.state.remaining_secs,
            running = self.state.is_running,
            "committed edit"
        );

        CommitReport {
            remaining_secs: self.state.remaining_secs,
            fallbacks,
        }
    }

    /// Leave edit mode keeping the current countdown
    pub fn cancel_edit(&mut self) {
        if self.state.is_editing {
            self.state.is_editing = false;
            debug!("cancelled edit");
        }
    }

    pub fn set_task_label(&mut self, text: impl Into<String>) {
        self.state.task_label = text.into();
    }

    pub fn push_task_char(&mut self, c: char) {
        let mut label = self.state.task_label.clone();
        label.push(c);
        self.set_task_label(label);
    }

    pub fn pop_task_char(&mut self) {
        let mut label = self.state.task_label.clone();
        label.pop();
        self.set_task_label(label);
    }

    fn edit_buffer_mut(&mut self, field: EditField) -> &mut String {
        match field {
            EditField::Minutes => &mut self.state.edit_minutes,
            EditField::Seconds => &mut self.state.edit_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn running_at(remaining: u32) -> TimerController {
        let mut timer = TimerController::default();
        timer.begin_edit();
        timer.update_edit_buffer(EditField::Minutes, &(remaining / 60).to_string());
        timer.update_edit_buffer(EditField::Seconds, &(remaining % 60).to_string());
        timer.commit_edit();
        timer.toggle_run();
        timer
    }

    #[test]
    fn test_new_timer_defaults() {
        let timer = TimerController::default();

        assert_eq!(timer.remaining_secs(), 1500);
        assert_eq!(timer.default_secs(), DEFAULT_SESSION_SECS);
        assert!(!timer.is_running());
        assert!(!timer.is_editing());
        assert_eq!(timer.sessions_completed(), 0);
        assert_eq!(timer.task_label(), "");
        assert_eq!(timer.status(), TimerStatus::Idle);
    }

    #[test]
    fn test_toggle_run_is_an_involution() {
        let mut timer = TimerController::default();

        timer.toggle_run();
        assert!(timer.is_running());
        assert_eq!(timer.status(), TimerStatus::Running);

        timer.toggle_run();
        assert!(!timer.is_running());
        assert_eq!(timer.status(), TimerStatus::Idle);
    }

    #[test]
    fn test_tick_ignored_when_idle() {
        let mut timer = TimerController::default();

        assert_eq!(timer.tick(), TickOutcome::Ignored);
        assert_eq!(timer.remaining_secs(), 1500);
    }

    #[test]
    fn test_tick_decrements_while_running() {
        let mut timer = TimerController::default();
        timer.toggle_run();

        assert_eq!(timer.tick(), TickOutcome::Counted { remaining: 1499 });
        assert_eq!(timer.tick(), TickOutcome::Counted { remaining: 1498 });
    }

    #[test]
    fn test_completion_happens_on_tick_after_zero() {
        let mut timer = running_at(1);

        assert_eq!(timer.tick(), TickOutcome::Counted { remaining: 0 });
        assert!(timer.is_running());
        assert_eq!(timer.sessions_completed(), 0);

        assert_eq!(timer.tick(), TickOutcome::SessionCompleted { sessions: 1 });
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_secs(), 1500);
        assert_eq!(timer.sessions_completed(), 1);
    }

    #[test]
    fn test_full_session_scenario() {
        let mut timer = TimerController::default();
        timer.toggle_run();

        for _ in 0..1500 {
            timer.tick();
        }
        assert_eq!(timer.remaining_secs(), 0);
        assert!(timer.is_running());
        assert_eq!(timer.sessions_completed(), 0);

        timer.tick();
        assert_eq!(timer.remaining_secs(), 1500);
        assert!(!timer.is_running());
        assert_eq!(timer.sessions_completed(), 1);
    }

    #[test]
    fn test_toggle_at_zero_completes_on_next_tick() {
        let mut timer = TimerController::default();
        timer.begin_edit();
        timer.update_edit_buffer(EditField::Minutes, "0");
        timer.update_edit_buffer(EditField::Seconds, "0");
        timer.commit_edit();
        assert_eq!(timer.remaining_secs(), 0);

        timer.toggle_run();
        assert_matches!(timer.tick(), TickOutcome::SessionCompleted { sessions: 1 });
    }

    #[test]
    fn test_reset_is_idempotent_and_keeps_sessions() {
        let mut timer = running_at(0);
        timer.tick();
        timer.toggle_run();
        timer.tick();

        timer.reset();
        let once = timer.state().clone();
        timer.reset();

        assert_eq!(timer.state(), &once);
        assert_eq!(timer.remaining_secs(), 1500);
        assert!(!timer.is_running());
        assert_eq!(timer.sessions_completed(), 1);
    }

    #[test]
    fn test_begin_edit_stages_padded_buffers() {
        let mut timer = TimerController::default();
        timer.update_edit_buffer(EditField::Minutes, "x");
        timer.begin_edit();

        assert!(timer.is_editing());
        assert_eq!(timer.edit_buffer(EditField::Minutes), "25");
        assert_eq!(timer.edit_buffer(EditField::Seconds), "00");
    }

    #[test]
    fn test_begin_edit_keeps_running_flag() {
        let mut timer = TimerController::default();
        timer.toggle_run();
        timer.begin_edit();

        assert!(timer.is_running());
        assert_eq!(timer.status(), TimerStatus::Editing);
        assert!(!timer.wants_ticks());
    }

    #[test]
    fn test_ticks_frozen_while_editing() {
        let mut timer = TimerController::default();
        timer.toggle_run();
        timer.tick();
        timer.begin_edit();

        for _ in 0..100 {
            assert_eq!(timer.tick(), TickOutcome::Ignored);
        }
        assert_eq!(timer.remaining_secs(), 1499);
    }

    #[test]
    fn test_commit_unmodified_buffers_round_trips() {
        for remaining in [0, 1, 59, 60, 125, 1499, 1500, 6000] {
            let mut timer = running_at(remaining);
            timer.begin_edit();
            let report = timer.commit_edit();

            assert!(report.is_clean());
            assert_eq!(timer.remaining_secs(), remaining);
        }
    }

    #[test]
    fn test_commit_edited_minutes() {
        let mut timer = running_at(125);
        timer.toggle_run();
        timer.begin_edit();
        assert_eq!(timer.edit_buffer(EditField::Minutes), "02");
        assert_eq!(timer.edit_buffer(EditField::Seconds), "05");

        timer.update_edit_buffer(EditField::Minutes, "10");
        let report = timer.commit_edit();

        assert_eq!(report.remaining_secs, 605);
        assert_eq!(timer.remaining_secs(), 605);
        assert!(!timer.is_editing());
    }

    #[test]
    fn test_commit_non_numeric_falls_back_to_zero() {
        let mut timer = TimerController::default();
        timer.begin_edit();
        timer.update_edit_buffer(EditField::Minutes, "abc");
        timer.update_edit_buffer(EditField::Seconds, "00");

        let report = timer.commit_edit();

        assert_eq!(timer.remaining_secs(), 0);
        assert_eq!(
            report.fallbacks,
            vec![EditError::NotANumber {
                field: EditField::Minutes,
                raw: "abc".into()
            }]
        );
    }

    #[test]
    fn test_commit_does_not_clamp_fields() {
        let mut timer = TimerController::default();
        timer.begin_edit();
        timer.update_edit_buffer(EditField::Minutes, "90");
        timer.update_edit_buffer(EditField::Seconds, "75");
        timer.commit_edit();

        assert_eq!(timer.remaining_secs(), 90 * 60 + 75);
    }

    #[test]
    fn test_commit_negative_total_clamps_to_zero() {
        let mut timer = TimerController::default();
        timer.begin_edit();
        timer.update_edit_buffer(EditField::Minutes, "-3");
        timer.commit_edit();

        assert_eq!(timer.remaining_secs(), 0);
    }

    #[test]
    fn test_commit_while_running_resumes_ticking() {
        let mut timer = TimerController::default();
        timer.toggle_run();
        timer.begin_edit();
        timer.update_edit_buffer(EditField::Seconds, "30");
        timer.commit_edit();

        assert_eq!(timer.status(), TimerStatus::Running);
        assert_eq!(timer.tick(), TickOutcome::Counted { remaining: 1529 });
    }

    #[test]
    fn test_commit_outside_edit_is_noop() {
        let mut timer = TimerController::default();
        timer.update_edit_buffer(EditField::Minutes, "1");

        let report = timer.commit_edit();

        assert_eq!(report.remaining_secs, 1500);
        assert!(report.is_clean());
        assert_eq!(timer.remaining_secs(), 1500);
    }

    #[test]
    fn test_cancel_edit_keeps_remaining() {
        let mut timer = TimerController::default();
        timer.begin_edit();
        timer.update_edit_buffer(EditField::Minutes, "1");
        timer.cancel_edit();

        assert!(!timer.is_editing());
        assert_eq!(timer.remaining_secs(), 1500);
    }

    #[test]
    fn test_edit_char_helpers() {
        let mut timer = TimerController::default();
        timer.begin_edit();
        timer.pop_edit_char(EditField::Minutes);
        timer.pop_edit_char(EditField::Minutes);
        timer.pop_edit_char(EditField::Minutes);
        timer.push_edit_char(EditField::Minutes, '7');

        assert_eq!(timer.edit_buffer(EditField::Minutes), "7");
    }

    #[test]
    fn test_task_label() {
        let mut timer = TimerController::default();
        timer.set_task_label("write report");
        timer.push_task_char('!');
        assert_eq!(timer.task_label(), "write report!");

        timer.pop_task_char();
        timer.pop_task_char();
        assert_eq!(timer.task_label(), "write repor");
    }

    #[test]
    fn test_custom_default_duration() {
        let mut timer = TimerController::new(90);
        timer.toggle_run();
        timer.tick();
        timer.reset();

        assert_eq!(timer.remaining_secs(), 90);
        assert_eq!(timer.state().edit_minutes, "01");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(TimerStatus::Idle.to_string(), "Idle");
        assert_eq!(TimerStatus::Editing.to_string(), "Editing");
    }
}
