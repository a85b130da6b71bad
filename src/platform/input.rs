//! Keyboard polling
//!
//! Key presses are drained once per tick without blocking. The LCD game reads
//! the same keyboard as if it were the serial terminal, with the arrow keys
//! standing in for the joystick and `[`/`]` for the speed knob.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::GameError;
use crate::settings::Variant;
use crate::sim::{Command, Direction};

/// What a key press means to the frame driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Command(Command),
    ThrottleUp,
    ThrottleDown,
}

/// Answer to the game-over prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Restart,
    Quit,
}

/// Analog speed knob emulated in tenths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throttle(f32);

impl Throttle {
    const STEP: f32 = 0.1;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn up(&mut self) {
        *self = Self::new(((self.0 + Self::STEP) * 10.0).round() / 10.0);
    }

    pub fn down(&mut self) {
        *self = Self::new(((self.0 - Self::STEP) * 10.0).round() / 10.0);
    }
}

/// Translate a key event for the given variant
pub fn translate(key: KeyEvent, variant: Variant) -> Option<KeyAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let quit = KeyAction::Command(Command::Quit);
    match key.code {
        KeyCode::Esc => Some(quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(quit),
        KeyCode::Up => Some(KeyAction::Command(Command::Move(Direction::Up))),
        KeyCode::Down => Some(KeyAction::Command(Command::Move(Direction::Down))),
        KeyCode::Left => Some(KeyAction::Command(Command::Move(Direction::Left))),
        KeyCode::Right => Some(KeyAction::Command(Command::Move(Direction::Right))),
        KeyCode::Char(ch) => match variant {
            Variant::Terminal => Command::from_key(ch).map(KeyAction::Command),
            Variant::Embedded => match ch {
                '[' => Some(KeyAction::ThrottleDown),
                ']' => Some(KeyAction::ThrottleUp),
                'r' => Some(KeyAction::Command(Command::Restart)),
                _ => Command::from_serial(ch).map(KeyAction::Command),
            },
        },
        _ => None,
    }
}

/// Drain every pending key press without blocking
pub fn poll_actions(variant: Variant) -> Result<Vec<KeyAction>, GameError> {
    let mut actions = Vec::new();
    while event::poll(Duration::from_millis(0))? {
        if let Event::Key(key) = event::read()? {
            actions.extend(translate(key, variant));
        }
    }
    Ok(actions)
}

/// Block until the player answers the game-over prompt
pub fn wait_for_confirmation() -> Result<Confirmation, GameError> {
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('r') => return Ok(Confirmation::Restart),
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Confirmation::Quit),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_terminal_keys() {
        let term = Variant::Terminal;
        assert_eq!(
            translate(press(KeyCode::Char('d')), term),
            Some(KeyAction::Command(Command::Move(Direction::Right)))
        );
        assert_eq!(
            translate(press(KeyCode::Up), term),
            Some(KeyAction::Command(Command::Move(Direction::Up)))
        );
        assert_eq!(
            translate(press(KeyCode::Char('m')), term),
            Some(KeyAction::Command(Command::PlaceTrap))
        );
        assert_eq!(
            translate(press(KeyCode::Esc), term),
            Some(KeyAction::Command(Command::Quit))
        );
        assert_eq!(translate(press(KeyCode::Char(']')), term), None);
    }

    #[test]
    fn test_embedded_keys() {
        let lcd = Variant::Embedded;
        assert_eq!(
            translate(press(KeyCode::Char('i')), lcd),
            Some(KeyAction::Command(Command::Status))
        );
        assert_eq!(translate(press(KeyCode::Char('z')), lcd), None);
        assert_eq!(translate(press(KeyCode::Char('[')), lcd), Some(KeyAction::ThrottleDown));
    }

    #[test]
    fn test_ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            translate(key, Variant::Terminal),
            Some(KeyAction::Command(Command::Quit))
        );
    }

    #[test]
    fn test_release_events_ignored() {
        let mut key = press(KeyCode::Char('w'));
        key.kind = KeyEventKind::Release;
        assert_eq!(translate(key, Variant::Terminal), None);
    }

    #[test]
    fn test_throttle_steps_and_clamps() {
        let mut throttle = Throttle::new(0.9);
        throttle.up();
        throttle.up();
        assert_eq!(throttle.value(), 1.0);

        let mut throttle = Throttle::new(0.1);
        throttle.down();
        throttle.down();
        assert_eq!(throttle.value(), 0.0);

        let mut throttle = Throttle::new(0.5);
        throttle.down();
        assert!((throttle.value() - 0.4).abs() < 1e-6);
    }
}
