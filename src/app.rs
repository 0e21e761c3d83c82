use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::quotes::Quote;
use crate::timer::{EditField, TickOutcome, TimerController};

/// Which part of the screen receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Controls,
    TaskLabel,
    Edit(EditField),
}

/// What the event loop should do after a key was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
}

/// Presentation-side state: the timer plus what is only needed to draw it
#[derive(Debug)]
pub struct App {
    pub timer: TimerController,
    pub focus: Focus,
    pub quote: Option<Quote>,
}

impl App {
    pub fn new(timer: TimerController, quote: Option<Quote>) -> Self {
        Self {
            timer,
            focus: Focus::Controls,
            quote,
        }
    }

    pub fn on_tick(&mut self) -> TickOutcome {
        self.timer.tick()
    }

    pub fn on_key(&mut self, key: KeyEvent) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match self.focus {
            Focus::Controls => return self.on_controls_key(key),
            Focus::TaskLabel => self.on_task_key(key),
            Focus::Edit(field) => self.on_edit_key(field, key),
        }
        KeyAction::Continue
    }

    fn on_controls_key(&mut self, key: KeyEvent) -> KeyAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return KeyAction::Quit,
            KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Enter => self.timer.toggle_run(),
            KeyCode::Char('r') => self.timer.reset(),
            KeyCode::Char('e') => {
                self.timer.begin_edit();
                self.focus = Focus::Edit(EditField::Minutes);
            }
            KeyCode::Char('t') => self.focus = Focus::TaskLabel,
            _ => {}
        }
        KeyAction::Continue
    }

    fn on_task_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.focus = Focus::Controls,
            KeyCode::Backspace => self.timer.pop_task_char(),
            KeyCode::Char(c) => self.timer.push_task_char(c),
            _ => {}
        }
    }

    fn on_edit_key(&mut self, field: EditField, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let report = self.timer.commit_edit();
                if !report.is_clean() {
                    debug!(fallbacks = report.fallbacks.len(), "edit committed with fallbacks");
                }
                self.focus = Focus::Controls;
            }
            KeyCode::Esc => {
                self.timer.cancel_edit();
                self.focus = Focus::Controls;
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.focus = Focus::Edit(field.other());
            }
            KeyCode::Backspace => self.timer.pop_edit_char(field),
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                self.timer.push_edit_char(field, c);
            }
            _ => {}
        }
    }
}
