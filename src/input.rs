use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};

/// How long a key stays held after its last press when the terminal does not
/// report releases. Short enough that a tap is a single move, and longer than
/// the gap between auto-repeat presses.
///
/// The OS repeat delay before the first auto-repeat (usually 250 to 600 ms)
/// is longer than this, so a held key drops out once and comes back as a
/// fresh press: one move, a pause, one more move, then steady repeats. A
/// timeout above the repeat delay would keep the hold but turn taps into
/// several moves. Use [`HeldKeys::with_release_timeout`] to pick the other
/// side of that trade.
pub const RELEASE_TIMEOUT: Duration = Duration::from_millis(80);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    SoftDrop,
    Confirm,
    Cancel,
    Quit,
}

pub fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Key::SoftDrop),
        KeyCode::Enter => Some(Key::Confirm),
        KeyCode::Esc => Some(Key::Cancel),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Key::Quit),
        _ => None,
    }
}

pub trait KeySource {
    fn is_pressed(&self, key: Key) -> bool;
}

// ============================================================================
// Held Keys
// ============================================================================

/// Tracks which keys are down, fed from terminal key events.
#[derive(Debug)]
pub struct HeldKeys {
    held: HashMap<Key, Instant>,
    reports_release: bool,
    release_timeout: Duration,
}

impl HeldKeys {
    /// `reports_release` says whether the terminal sends release events. When
    /// it does not, keys expire [`RELEASE_TIMEOUT`] after their last press.
    pub fn new(reports_release: bool) -> Self {
        Self::with_release_timeout(reports_release, RELEASE_TIMEOUT)
    }

    pub fn with_release_timeout(reports_release: bool, release_timeout: Duration) -> Self {
        Self {
            held: HashMap::new(),
            reports_release,
            release_timeout,
        }
    }

    pub fn apply(&mut self, event: &KeyEvent, now: Instant) {
        let Some(key) = map_key(event.code) else {
            return;
        };
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.press(key, now),
            KeyEventKind::Release => self.release(key),
        }
    }

    pub fn press(&mut self, key: Key, now: Instant) {
        self.held.insert(key, now);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn expire(&mut self, now: Instant) {
        if self.reports_release {
            return;
        }
        let timeout = self.release_timeout;
        self.held
            .retain(|_, last| now.saturating_duration_since(*last) < timeout);
    }
}

impl KeySource for HeldKeys {
    fn is_pressed(&self, key: Key) -> bool {
        self.held.contains_key(&key)
    }
}

// ============================================================================
// Pointer
// ============================================================================

/// Mouse position in terminal cells and left button state.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct PointerState {
    pub column: u16,
    pub row: u16,
    pub left_down: bool,
}

impl PointerState {
    pub fn apply(&mut self, event: &MouseEvent) {
        self.column = event.column;
        self.row = event.row;
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
                self.left_down = true;
            }
            MouseEventKind::Up(MouseButton::Left) => self.left_down = false,
            _ => {}
        }
    }
}

// ============================================================================
// Frame Input
// ============================================================================

/// The inputs the playfield reads once per frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct FrameInput {
    pub cancel: bool,
    pub soft_drop: bool,
    pub left: bool,
    pub right: bool,
}

impl FrameInput {
    pub fn poll(keys: &impl KeySource) -> Self {
        Self {
            cancel: keys.is_pressed(Key::Cancel),
            soft_drop: keys.is_pressed(Key::SoftDrop) || keys.is_pressed(Key::Down),
            left: keys.is_pressed(Key::Left),
            right: keys.is_pressed(Key::Right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn key_event(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn press_and_release_are_tracked() {
        let now = Instant::now();
        let mut keys = HeldKeys::new(true);

        keys.apply(&key_event(KeyCode::Left, KeyEventKind::Press), now);
        assert!(keys.is_pressed(Key::Left));
        assert!(!keys.is_pressed(Key::Right));

        keys.apply(&key_event(KeyCode::Left, KeyEventKind::Release), now);
        assert!(!keys.is_pressed(Key::Left));
    }

    #[test]
    fn keys_expire_without_release_reports() {
        let start = Instant::now();
        let mut keys = HeldKeys::new(false);
        keys.apply(&key_event(KeyCode::Char('d'), KeyEventKind::Press), start);

        keys.expire(start + RELEASE_TIMEOUT / 2);
        assert!(keys.is_pressed(Key::Right));

        keys.expire(start + RELEASE_TIMEOUT);
        assert!(!keys.is_pressed(Key::Right));
    }

    #[test]
    fn longer_timeout_bridges_the_repeat_delay() {
        let start = Instant::now();
        let mut keys = HeldKeys::with_release_timeout(false, Duration::from_millis(650));
        keys.press(Key::Left, start);

        // First auto-repeat arrives after a typical OS delay.
        keys.expire(start + Duration::from_millis(500));
        assert!(keys.is_pressed(Key::Left));
        keys.press(Key::Left, start + Duration::from_millis(500));

        keys.expire(start + Duration::from_millis(1100));
        assert!(keys.is_pressed(Key::Left));
        keys.expire(start + Duration::from_millis(1150));
        assert!(!keys.is_pressed(Key::Left));
    }

    #[test]
    fn keys_do_not_expire_when_releases_are_reported() {
        let start = Instant::now();
        let mut keys = HeldKeys::new(true);
        keys.press(Key::SoftDrop, start);

        keys.expire(start + RELEASE_TIMEOUT * 10);
        assert!(keys.is_pressed(Key::SoftDrop));
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut keys = HeldKeys::new(true);
        keys.apply(&key_event(KeyCode::Char('z'), KeyEventKind::Press), Instant::now());
        assert_eq!(keys.held.len(), 0);
    }

    #[test]
    fn frame_input_reads_either_soft_drop_key() {
        let now = Instant::now();
        let mut keys = HeldKeys::new(true);
        keys.press(Key::Down, now);

        let input = FrameInput::poll(&keys);
        assert!(input.soft_drop);
        assert!(!input.cancel);
    }

    #[test]
    fn pointer_tracks_left_button() {
        let mut pointer = PointerState::default();
        pointer.apply(&MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 7,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!((pointer.column, pointer.row, pointer.left_down), (4, 7, true));

        pointer.apply(&MouseEvent {
            kind: MouseEventKind::Up(MouseButton::Left),
            column: 5,
            row: 7,
            modifiers: KeyModifiers::NONE,
        });
        assert!(!pointer.left_down);
        assert_eq!(pointer.column, 5);
    }
}
