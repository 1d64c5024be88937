//! Per-frame input state machine for [`TextInput`].
//!
//! Each state is evaluated against the frame's input sample and yields the
//! next state plus whether that state must be evaluated again in the same
//! frame. Priority per evaluation: a typed character, then the first held
//! command key (see [`KEY_COMMANDS`]), then a primary click inside the widget.
//!
//! Holding a command key executes it once, waits `repeat_delay`, then repeats
//! every `repeat_interval` until the key is released. At most one command runs
//! per frame; missed intervals are not caught up.

use quill_core::{Duration, Expiry, InputSource, Key, MouseButton};

use super::TextInput;
use super::edit::{Command, KEY_COMMANDS};

/// Upper bound on same-frame re-evaluations. The longest legitimate chain is
/// `CommandHeld -> Idle -> CommandHeld` (a repeat firing), plus one hop when
/// the held key changes.
pub const MAX_IMMEDIATE_TRANSITIONS: usize = 8;

#[derive(Clone, Debug)]
pub enum InputSession {
    /// Waiting for input. `fresh` is false only right after a repeat timer
    /// fired, so a still-held key continues at the repeat interval instead of
    /// the initial delay.
    Idle { fresh: bool },
    CharacterTyped(char),
    CommandHeld {
        command: Command,
        key: Key,
        delay: Duration,
        /// `None` until the command has run for this press or repeat.
        expiry: Option<Expiry>,
    },
}

impl Default for InputSession {
    fn default() -> Self {
        InputSession::Idle { fresh: true }
    }
}

impl InputSession {
    pub fn is_idle(&self) -> bool {
        matches!(self, InputSession::Idle { .. })
    }
}

impl TextInput {
    pub(super) fn run_session(&mut self, input: &dyn InputSource) {
        self.run_session_bounded(input, MAX_IMMEDIATE_TRANSITIONS);
    }

    /// Evaluates the session until it settles or `limit` steps have run.
    /// Returns false when it was cut short.
    fn run_session_bounded(&mut self, input: &dyn InputSource, limit: usize) -> bool {
        let mut session = std::mem::take(&mut self.session);
        for _ in 0..limit {
            let (next, rerun) = self.step(session, input);
            session = next;
            if !rerun {
                self.session = session;
                return true;
            }
        }
        log::warn!(
            "text input: state machine still transitioning after {limit} steps; resuming next frame in {session:?}"
        );
        self.session = session;
        false
    }

    fn step(&mut self, session: InputSession, input: &dyn InputSource) -> (InputSession, bool) {
        let (next, rerun) = match session {
            InputSession::Idle { fresh } => self.idle(fresh, input),

            InputSession::CharacterTyped(c) => {
                self.do_insert(c);
                self.caret.reset_blinking();
                (InputSession::Idle { fresh: true }, false)
            }

            InputSession::CommandHeld {
                command,
                key,
                delay,
                expiry,
            } => {
                let held = input.key_pressed(key);
                match expiry {
                    _ if !held => (InputSession::Idle { fresh: true }, true),
                    Some(e) if e.is_expired() => (InputSession::Idle { fresh: false }, true),
                    Some(e) => (
                        InputSession::CommandHeld {
                            command,
                            key,
                            delay,
                            expiry: Some(e),
                        },
                        false,
                    ),
                    None => {
                        self.execute(command);
                        let expiry = self.timers.arm(delay);
                        (
                            InputSession::CommandHeld {
                                command,
                                key,
                                delay,
                                expiry: Some(expiry),
                            },
                            false,
                        )
                    }
                }
            }
        };
        if rerun {
            log::trace!("text input: -> {next:?}");
        }
        (next, rerun)
    }

    fn idle(&mut self, fresh: bool, input: &dyn InputSource) -> (InputSession, bool) {
        let delay = if fresh {
            self.repeat_delay
        } else {
            self.repeat_interval
        };

        // Only the first character of the frame is consumed.
        if let Some(&c) = input.typed_chars().first() {
            return (InputSession::CharacterTyped(c), true);
        }

        for (key, command) in KEY_COMMANDS {
            if input.key_pressed(key) {
                return (
                    InputSession::CommandHeld {
                        command,
                        key,
                        delay,
                        expiry: None,
                    },
                    true,
                );
            }
        }

        if self.widget.just_pressed_inside(input, MouseButton::Primary) {
            self.do_go_xy(input.cursor_position());
        }

        (InputSession::Idle { fresh: true }, false)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use quill_core::{Clock, FrameInput, ManualTimers, Rect, TestClock};
    use quill_text::FixedAdvanceFace;

    use super::*;
    use crate::TextInputOptions;

    fn field(clock: Arc<TestClock>) -> TextInput {
        let clock: Arc<dyn Clock> = clock;
        let mut field = TextInput::new(
            TextInputOptions::new(Arc::new(FixedAdvanceFace::new(10.0, 16.0)))
                .clock(clock.clone())
                .timers(Arc::new(ManualTimers::new(clock))),
        );
        field.set_location(Rect::new(0, 0, 100, 20));
        field.set_text("abc");
        field.set_cursor(3);
        field
    }

    fn fired() -> Expiry {
        let e = Expiry::new();
        e.fire();
        e
    }

    fn held_backspace(expiry: Expiry) -> InputSession {
        InputSession::CommandHeld {
            command: Command::Backspace,
            key: Key::Backspace,
            delay: Duration::from_millis(300),
            expiry: Some(expiry),
        }
    }

    #[test]
    fn fired_repeat_runs_one_command_and_rearms() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut field = field(Arc::new(TestClock::default()));
        let mut input = FrameInput::new();
        input.press_key(Key::Backspace);

        field.session = held_backspace(fired());
        assert!(field.run_session_bounded(&input, MAX_IMMEDIATE_TRANSITIONS));

        assert_eq!(field.text(), "ab");
        match &field.session {
            InputSession::CommandHeld {
                key: Key::Backspace,
                delay,
                expiry: Some(e),
                ..
            } => {
                assert_eq!(*delay, field.repeat_interval);
                assert!(!e.is_expired());
            }
            other => panic!("unexpected session {other:?}"),
        }
    }

    #[test]
    fn step_limit_parks_session_until_next_frame() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut field = field(Arc::new(TestClock::default()));
        let mut input = FrameInput::new();
        input.press_key(Key::Backspace);

        field.session = held_backspace(fired());
        assert!(!field.run_session_bounded(&input, 1));
        assert!(matches!(field.session, InputSession::Idle { fresh: false }));
        assert_eq!(field.text(), "abc");

        // Not fresh, so the next frame repeats at the interval.
        field.run_session(&input);
        assert_eq!(field.text(), "ab");
        assert!(matches!(
            &field.session,
            InputSession::CommandHeld { delay, .. } if *delay == field.repeat_interval
        ));
    }

    #[test]
    fn released_key_settles_within_limit() {
        let mut field = field(Arc::new(TestClock::default()));
        let input = FrameInput::new();

        field.session = held_backspace(fired());
        assert!(field.run_session_bounded(&input, MAX_IMMEDIATE_TRANSITIONS));
        assert!(matches!(field.session, InputSession::Idle { fresh: true }));
        assert_eq!(field.text(), "abc");
    }
}
