//! Keyboard input: held-key state and discrete game events.
//!
//! [`KeyTracker`] stamps every key with the frame it was last pressed or
//! repeated on, and [`KeyTracker::held`] turns those stamps into an
//! [`InputState`] for the frame. Movement and fire are read from that state,
//! so several keys work together. Esc, Q and R become [`GameEvent`]s
//! straight away instead.
//!
//! A key stays held until its `Release` event arrives. A terminal that never
//! sends releases only repeats `Press` while the key is down, so a key with no
//! press for more than `HOLD_WINDOW` frames is treated as released.

use std::collections::HashMap;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Frames a press or repeat keeps its key held. About 133 ms at 30 FPS,
/// longer than the gap between OS key repeats.
pub const HOLD_WINDOW: u64 = 4;

/// Directional and fire keys held during a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
}

/// Discrete events delivered to the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// Window/terminal close request (Esc, Ctrl-C). Honoured in every state.
    Close,
    /// Quit from an end screen (Q).
    Quit,
    /// Restart from an end screen (R).
    Restart,
    /// Periodic meteor timer fired.
    SpawnMeteor,
}

#[derive(Debug, Default)]
pub struct KeyTracker {
    key_frame: HashMap<KeyCode, u64>,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one terminal event seen during `frame`. Returns the discrete
    /// event it maps to, if any.
    pub fn record(&mut self, event: &Event, frame: u64) -> Option<GameEvent> {
        let Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        }) = event
        else {
            return None;
        };
        let code = normalize(*code);
        match kind {
            KeyEventKind::Press => {
                self.key_frame.insert(code, frame);
                match code {
                    KeyCode::Esc => Some(GameEvent::Close),
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        Some(GameEvent::Close)
                    }
                    KeyCode::Char('q') => Some(GameEvent::Quit),
                    KeyCode::Char('r') => Some(GameEvent::Restart),
                    _ => None,
                }
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(code, frame);
                None
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&code);
                None
            }
        }
    }

    fn is_held(&self, key: KeyCode, frame: u64) -> bool {
        self.key_frame
            .get(&key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    /// Keys considered held at `frame`.
    pub fn held(&self, frame: u64) -> InputState {
        let any = |keys: &[KeyCode]| keys.iter().any(|k| self.is_held(*k, frame));
        InputState {
            up: any(&[KeyCode::Up, KeyCode::Char('w')]),
            down: any(&[KeyCode::Down, KeyCode::Char('s')]),
            left: any(&[KeyCode::Left, KeyCode::Char('a')]),
            right: any(&[KeyCode::Right, KeyCode::Char('d')]),
            shoot: self.is_held(KeyCode::Char(' '), frame),
        }
    }
}

/// Fold letter case so `A` and `a` share one entry.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind))
    }

    #[test]
    fn press_is_held_until_window_expires() {
        let mut t = KeyTracker::new();
        t.record(&key(KeyCode::Left, KeyEventKind::Press), 10);
        assert!(t.held(10).left);
        assert!(t.held(10 + HOLD_WINDOW).left);
        assert!(!t.held(11 + HOLD_WINDOW).left);
    }

    #[test]
    fn release_drops_key_immediately() {
        let mut t = KeyTracker::new();
        t.record(&key(KeyCode::Char(' '), KeyEventKind::Press), 1);
        t.record(&key(KeyCode::Char(' '), KeyEventKind::Release), 1);
        assert!(!t.held(1).shoot);
    }

    #[test]
    fn upper_case_letters_move_too() {
        let mut t = KeyTracker::new();
        t.record(&key(KeyCode::Char('D'), KeyEventKind::Press), 3);
        t.record(&key(KeyCode::Char('w'), KeyEventKind::Repeat), 3);
        let held = t.held(3);
        assert!(held.right && held.up);
        assert!(!held.left && !held.down);
    }

    #[test]
    fn edge_keys_map_to_events() {
        let mut t = KeyTracker::new();
        assert_eq!(
            t.record(&key(KeyCode::Char('R'), KeyEventKind::Press), 0),
            Some(GameEvent::Restart)
        );
        assert_eq!(
            t.record(&key(KeyCode::Char('q'), KeyEventKind::Press), 0),
            Some(GameEvent::Quit)
        );
        assert_eq!(
            t.record(&key(KeyCode::Esc, KeyEventKind::Press), 0),
            Some(GameEvent::Close)
        );
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(t.record(&ctrl_c, 0), Some(GameEvent::Close));
        assert_eq!(t.record(&key(KeyCode::Char('q'), KeyEventKind::Repeat), 0), None);
        assert_eq!(t.record(&Event::FocusLost, 0), None);
    }
}
