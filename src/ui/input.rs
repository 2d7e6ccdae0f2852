/// Keyboard tracker.
///
/// Everything in the game is driven by discrete actions, so the tracker
/// turns raw key events into `Action`s once per frame:
///   - a fresh press always yields its action
///   - held arrows keep yielding on the terminal's auto-repeat, so the
///     bucket and the cursor keep moving while a key is down
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

/// Semantic input shared by the keyboard and the gamepad.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Back,
    Hint,
    Check,
    Reset,
    Settings,
}

impl Action {
    fn is_direction(self) -> bool {
        matches!(self, Action::Up | Action::Down | Action::Left | Action::Right)
    }
}

pub fn action_for(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Action::Up,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Action::Down,
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Action::Left,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Action::Right,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Confirm,
        KeyCode::Esc | KeyCode::Backspace => Action::Back,
        KeyCode::Char('h') | KeyCode::Char('H') => Action::Hint,
        KeyCode::Char('c') | KeyCode::Char('C') => Action::Check,
        KeyCode::Char('r') | KeyCode::Char('R') => Action::Reset,
        KeyCode::Tab | KeyCode::Char('o') | KeyCode::Char('O') => Action::Settings,
        _ => return None,
    };
    Some(action)
}

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Actions collected during the most recent drain_events() call.
    actions: Vec<Action>,

    /// Raw key events collected during drain, for meta-key handling.
    pub raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            actions: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before simulation tick.
    pub fn drain_events(&mut self) {
        self.actions.clear();
        self.raw_events.clear();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key);
            }
        }

        // Expire keys that have timed out (fallback for terminals without Release)
        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn record(&mut self, key: KeyEvent) {
        self.raw_events.push(key);
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {}
            kind => {
                let was_held = self.is_held(key.code);
                self.last_active.insert(key.code, Instant::now());
                let Some(action) = action_for(key.code) else {
                    return;
                };
                let repeat = was_held || kind == KeyEventKind::Repeat;
                if !repeat || action.is_direction() {
                    self.actions.push(action);
                }
            }
        }
    }

    /// Actions for this frame, in arrival order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    /// Was `q` pressed this frame (without modifiers)?
    pub fn quit_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.kind != KeyEventKind::Release
                && k.modifiers.is_empty()
                && matches!(k.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        })
    }

    fn is_held(&self, code: KeyCode) -> bool {
        self.last_active
            .get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind)
    }

    #[test]
    fn press_yields_action_once() {
        let mut input = InputState::new();
        input.record(key(KeyCode::Enter, KeyEventKind::Press));
        input.record(key(KeyCode::Enter, KeyEventKind::Repeat));
        assert_eq!(input.actions(), &[Action::Confirm]);
    }

    #[test]
    fn held_arrows_repeat() {
        let mut input = InputState::new();
        input.record(key(KeyCode::Left, KeyEventKind::Press));
        input.record(key(KeyCode::Left, KeyEventKind::Repeat));
        assert_eq!(input.actions(), &[Action::Left, Action::Left]);
    }

    #[test]
    fn release_is_honored_only_when_enabled() {
        let mut input = InputState::new();
        input.record(key(KeyCode::Char('h'), KeyEventKind::Press));
        input.record(key(KeyCode::Char('h'), KeyEventKind::Release));
        assert!(input.is_held(KeyCode::Char('h')));

        input.honor_release = true;
        input.record(key(KeyCode::Char('h'), KeyEventKind::Release));
        assert!(!input.is_held(KeyCode::Char('h')));
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        assert_eq!(action_for(KeyCode::F(5)), None);
        assert_eq!(action_for(KeyCode::Char('c')), Some(Action::Check));
    }

    #[test]
    fn ctrl_c_is_detected() {
        let mut input = InputState::new();
        input.record(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(input.ctrl_c_pressed());
        assert!(!input.quit_pressed());
    }
}
