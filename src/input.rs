//! Directional input state
//!
//! Each direction is an independent "currently held" flag driven by key
//! transitions. Arrow keys and WASD are interchangeable.

use log::{debug, info};

use crate::platform::{Key, PlatformEvent};

/// Direction a key controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Up | Key::Char('w') => Some(Direction::Up),
            Key::Down | Key::Char('s') => Some(Direction::Down),
            Key::Left | Key::Char('a') => Some(Direction::Left),
            Key::Right | Key::Char('d') => Some(Direction::Right),
            _ => None,
        }
    }
}

/// What the caller should do after an event was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSignal {
    Continue,
    Quit,
}

/// Held state of the four directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }

    /// Apply one platform event
    pub fn apply(&mut self, event: &PlatformEvent) -> InputSignal {
        match *event {
            PlatformEvent::Quit => {
                info!("quit requested");
                InputSignal::Quit
            }
            PlatformEvent::KeyDown(Key::Escape) => {
                info!("escape pressed");
                InputSignal::Quit
            }
            PlatformEvent::KeyDown(Key::Space) => {
                debug!("space pressed");
                InputSignal::Continue
            }
            PlatformEvent::KeyDown(key) => {
                if let Some(direction) = Direction::from_key(key) {
                    self.set(direction, true);
                }
                InputSignal::Continue
            }
            PlatformEvent::KeyUp(key) => {
                if let Some(direction) = Direction::from_key(key) {
                    self.set(direction, false);
                }
                InputSignal::Continue
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_and_wasd_are_equivalent() {
        let pairs = [
            (Key::Up, Key::Char('w'), Direction::Up),
            (Key::Down, Key::Char('s'), Direction::Down),
            (Key::Left, Key::Char('a'), Direction::Left),
            (Key::Right, Key::Char('d'), Direction::Right),
        ];
        for (arrow, letter, direction) in pairs {
            assert_eq!(Direction::from_key(arrow), Some(direction));
            assert_eq!(Direction::from_key(letter), Some(direction));
        }
        assert_eq!(Direction::from_key(Key::Char('q')), None);
        assert_eq!(Direction::from_key(Key::Other), None);
    }

    #[test]
    fn test_press_and_release() {
        let mut input = InputState::new();
        input.apply(&PlatformEvent::KeyDown(Key::Left));
        assert!(input.left);
        assert!(!input.right);

        input.apply(&PlatformEvent::KeyUp(Key::Left));
        assert!(!input.left);
    }

    #[test]
    fn test_directions_are_independent() {
        let mut input = InputState::new();
        input.apply(&PlatformEvent::KeyDown(Key::Char('a')));
        input.apply(&PlatformEvent::KeyDown(Key::Right));
        input.apply(&PlatformEvent::KeyDown(Key::Up));
        assert_eq!(
            input,
            InputState {
                up: true,
                down: false,
                left: true,
                right: true
            }
        );

        input.apply(&PlatformEvent::KeyUp(Key::Char('d')));
        assert!(!input.is_held(Direction::Right));
        assert!(input.is_held(Direction::Left) && input.is_held(Direction::Up));
        assert!(!input.is_held(Direction::Down));
    }

    #[test]
    fn test_repeat_events_are_idempotent() {
        let mut input = InputState::new();
        for _ in 0..5 {
            input.apply(&PlatformEvent::KeyDown(Key::Right));
        }
        assert!(input.right);
        input.apply(&PlatformEvent::KeyUp(Key::Right));
        input.apply(&PlatformEvent::KeyUp(Key::Right));
        assert!(!input.right);
    }

    #[test]
    fn test_quit_signals() {
        let mut input = InputState::new();
        assert_eq!(input.apply(&PlatformEvent::Quit), InputSignal::Quit);
        assert_eq!(
            input.apply(&PlatformEvent::KeyDown(Key::Escape)),
            InputSignal::Quit
        );
        // Releasing escape is not a quit request
        assert_eq!(
            input.apply(&PlatformEvent::KeyUp(Key::Escape)),
            InputSignal::Continue
        );
        assert_eq!(
            input.apply(&PlatformEvent::KeyDown(Key::Space)),
            InputSignal::Continue
        );
        assert_eq!(input, InputState::default());
    }
}
