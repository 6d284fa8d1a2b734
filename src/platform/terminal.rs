//! Terminal event source built on crossterm
//!
//! Terminals that support the keyboard enhancement protocol report key
//! releases directly. Elsewhere only presses (and OS key repeats) arrive, so a
//! key counts as released once no press or repeat was seen for a hold window.
//! The first window after a press spans the OS repeat delay; later ones only
//! the gap between repeats.

use std::collections::{HashMap, VecDeque};
use std::io::{self, stdout};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal};
use log::info;

use super::{EventSource, Key, PlatformEvent};

/// Map a crossterm key code to a game key
pub fn map_key_code(code: KeyCode) -> Key {
    match code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Esc => Key::Escape,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c.to_ascii_lowercase()),
        _ => Key::Other,
    }
}

/// Translate a terminal event into a platform event, if it is one we use
pub fn translate(event: &Event) -> Option<PlatformEvent> {
    let Event::Key(key) = event else {
        return None;
    };

    // Raw mode swallows SIGINT, so Ctrl+C arrives as a key
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return (key.kind != KeyEventKind::Release).then_some(PlatformEvent::Quit);
    }

    let mapped = map_key_code(key.code);
    match key.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => Some(PlatformEvent::KeyDown(mapped)),
        KeyEventKind::Release => Some(PlatformEvent::KeyUp(mapped)),
    }
}

/// Last sighting of a held key
#[derive(Debug, Clone, Copy)]
struct Hold {
    seen: Instant,
    repeating: bool,
}

/// Synthesizes releases for terminals that never send them
#[derive(Debug, Clone)]
pub struct HoldTracker {
    /// Hold after the initial press, before OS repeats start
    first_window: Duration,
    /// Hold after each repeat
    repeat_window: Duration,
    held: HashMap<Key, Hold>,
}

impl HoldTracker {
    pub fn new(first_window: Duration, repeat_window: Duration) -> Self {
        Self {
            first_window,
            repeat_window,
            held: HashMap::new(),
        }
    }

    /// Record a press or repeat, refreshing the hold
    pub fn press(&mut self, key: Key, now: Instant) {
        let repeating = self.held.contains_key(&key);
        self.held.insert(
            key,
            Hold {
                seen: now,
                repeating,
            },
        );
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Keys whose hold window ran out; they are forgotten
    pub fn expire(&mut self, now: Instant) -> Vec<Key> {
        let expired: Vec<Key> = self
            .held
            .iter()
            .filter(|(_, hold)| {
                let window = if hold.repeating {
                    self.repeat_window
                } else {
                    self.first_window
                };
                now.saturating_duration_since(hold.seen) > window
            })
            .map(|(key, _)| *key)
            .collect();
        for key in &expired {
            self.held.remove(key);
        }
        expired
    }
}

/// Non-blocking crossterm event queue
pub struct TerminalEvents {
    pending: VecDeque<PlatformEvent>,
    /// `None` when the terminal reports key releases itself
    holds: Option<HoldTracker>,
    enhanced: bool,
}

impl TerminalEvents {
    /// Start reading terminal input, requesting key release reporting
    ///
    /// Call after raw mode is enabled.
    pub fn open(first_window: Duration, repeat_window: Duration) -> io::Result<Self> {
        let enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true));
        if enhanced {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            info!("terminal reports key releases");
        } else {
            info!(
                "terminal lacks key release events, releasing keys after {} ms ({} ms between repeats)",
                first_window.as_millis(),
                repeat_window.as_millis()
            );
        }

        Ok(Self {
            pending: VecDeque::new(),
            holds: (!enhanced).then(|| HoldTracker::new(first_window, repeat_window)),
            enhanced,
        })
    }

    /// Restore the keyboard mode changed by [`TerminalEvents::open`]
    pub fn close(&mut self) -> io::Result<()> {
        if self.enhanced {
            execute!(stdout(), PopKeyboardEnhancementFlags)?;
            self.enhanced = false;
        }
        Ok(())
    }

    fn fill(&mut self) -> io::Result<()> {
        let now = Instant::now();
        while event::poll(Duration::ZERO)? {
            let Some(platform_event) = translate(&event::read()?) else {
                continue;
            };
            if let Some(holds) = &mut self.holds {
                match platform_event {
                    PlatformEvent::KeyDown(key) => holds.press(key, now),
                    PlatformEvent::KeyUp(key) => holds.release(key),
                    PlatformEvent::Quit => {}
                }
            }
            self.pending.push_back(platform_event);
        }

        if let Some(holds) = &mut self.holds {
            self.pending
                .extend(holds.expire(now).into_iter().map(PlatformEvent::KeyUp));
        }
        Ok(())
    }
}

impl EventSource for TerminalEvents {
    fn poll_event(&mut self) -> io::Result<Option<PlatformEvent>> {
        if self.pending.is_empty() {
            self.fill()?;
        }
        Ok(self.pending.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind))
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key_code(KeyCode::Left), Key::Left);
        assert_eq!(map_key_code(KeyCode::Right), Key::Right);
        assert_eq!(map_key_code(KeyCode::Up), Key::Up);
        assert_eq!(map_key_code(KeyCode::Down), Key::Down);
        assert_eq!(map_key_code(KeyCode::Esc), Key::Escape);
        assert_eq!(map_key_code(KeyCode::Char(' ')), Key::Space);
        assert_eq!(map_key_code(KeyCode::Char('A')), Key::Char('a'));
        assert_eq!(map_key_code(KeyCode::Char('d')), Key::Char('d'));
        assert_eq!(map_key_code(KeyCode::F(1)), Key::Other);
    }

    #[test]
    fn test_press_repeat_release() {
        assert_eq!(
            translate(&key(KeyCode::Left, KeyEventKind::Press)),
            Some(PlatformEvent::KeyDown(Key::Left))
        );
        assert_eq!(
            translate(&key(KeyCode::Left, KeyEventKind::Repeat)),
            Some(PlatformEvent::KeyDown(Key::Left))
        );
        assert_eq!(
            translate(&key(KeyCode::Left, KeyEventKind::Release)),
            Some(PlatformEvent::KeyUp(Key::Left))
        );
    }

    #[test]
    fn test_ctrl_c_quits() {
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(translate(&ctrl_c), Some(PlatformEvent::Quit));
        assert_eq!(
            translate(&key(KeyCode::Char('c'), KeyEventKind::Press)),
            Some(PlatformEvent::KeyDown(Key::Char('c')))
        );
    }

    #[test]
    fn test_non_key_events_ignored() {
        assert_eq!(translate(&Event::Resize(80, 24)), None);
        assert_eq!(translate(&Event::FocusLost), None);
    }

    fn tracker() -> HoldTracker {
        HoldTracker::new(Duration::from_millis(500), Duration::from_millis(200))
    }

    #[test]
    fn test_hold_tracker_expires_after_window() {
        let start = Instant::now();
        let mut holds = tracker();
        holds.press(Key::Left, start);

        assert!(holds.expire(start + Duration::from_millis(500)).is_empty());
        assert_eq!(
            holds.expire(start + Duration::from_millis(501)),
            vec![Key::Left]
        );
        // Already released
        assert!(holds.expire(start + Duration::from_secs(2)).is_empty());
    }

    #[test]
    fn test_hold_tracker_survives_repeat_delay() {
        let start = Instant::now();
        let mut holds = tracker();
        holds.press(Key::Right, start);

        // Typical OS delay before the first repeat
        assert!(holds.expire(start + Duration::from_millis(400)).is_empty());
        holds.press(Key::Right, start + Duration::from_millis(400));

        // Repeats keep the key alive with the shorter window
        assert!(holds.expire(start + Duration::from_millis(600)).is_empty());
        assert_eq!(
            holds.expire(start + Duration::from_millis(601)),
            vec![Key::Right]
        );
    }

    #[test]
    fn test_hold_tracker_zero_window_keeps_key_for_the_press_poll() {
        let start = Instant::now();
        let mut holds = HoldTracker::new(Duration::ZERO, Duration::ZERO);
        holds.press(Key::Left, start);
        assert!(holds.expire(start).is_empty());
    }

    #[test]
    fn test_hold_tracker_real_release_wins() {
        let start = Instant::now();
        let mut holds = tracker();
        holds.press(Key::Up, start);
        holds.release(Key::Up);
        assert!(holds.expire(start + Duration::from_secs(1)).is_empty());
    }
}
