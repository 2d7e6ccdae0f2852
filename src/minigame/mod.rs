/// Minigames: one per hub slot, all behind the `Minigame` trait.
///
/// A minigame only reports what happened (`Won`, `Lost`, `BackRequested`).
/// It never touches the level registry, lives, saves, or scenes; the hub
/// decides what a signal means.
///
/// ## Slot table
///
///   0  А  assemble (legs + crossbar)
///   1  Б  spotter  (cycling alphabet tiles)
///   2  В  connect  (dot pattern)
///   3  Г  balance  (ball on a wobbling platform)  can lose
///   4  Д  catch    (falling letters)              can lose
///   5  Е  timed    (Е among Ё, against the clock) can lose
///   6  Ж  assemble (two slashes + vertical)
///
/// Slot i always plays level i. Level 6 is Ё, so the Ж board sits on it.

pub mod assemble;
pub mod balance;
pub mod catch;
pub mod connect;
pub mod flicker;
pub mod spotter;
pub mod timed;

use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::domain::letter::LetterId;

pub type GameRng = Pcg32;

/// Discrete input forwarded by the hub while a slot is interactive.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MiniInput {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Back,
    Hint,
    Check,
    Reset,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MinigameSignal {
    Won,
    Lost,
    BackRequested,
}

/// Colour role of a glyph. The renderer owns the actual colours.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tone {
    Normal,
    Dim,
    Accent,
    Good,
    Bad,
    Hint,
    /// One of the block palette colours, index taken modulo palette size.
    Palette(u8),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Glyph {
    pub x: u16,
    pub y: u16,
    pub ch: char,
    pub tone: Tone,
    /// Draw inverted (cursor / selection).
    pub selected: bool,
}

impl Glyph {
    pub fn new(x: u16, y: u16, ch: char, tone: Tone) -> Self {
        Glyph { x, y, ch, tone, selected: false }
    }

    pub fn selected(mut self, on: bool) -> Self {
        self.selected = on;
        self
    }
}

/// Everything the renderer needs to draw a minigame board.
#[derive(Clone, Debug, Default)]
pub struct MiniView {
    pub width: u16,
    pub height: u16,
    pub glyphs: Vec<Glyph>,
    pub status: String,
    pub help: &'static str,
    /// Horizontal board offset for shake feedback.
    pub shake: i16,
}

pub trait Minigame {
    fn title(&self) -> &str;
    fn letter(&self) -> LetterId;

    /// Whether this mode can ever emit `Lost`.
    fn can_lose(&self) -> bool {
        false
    }

    /// Enable or disable. Activating an inactive game starts a fresh
    /// session; repeating the current state is a no-op.
    fn set_active(&mut self, active: bool, rng: &mut GameRng);
    fn is_active(&self) -> bool;

    fn handle(&mut self, input: MiniInput, rng: &mut GameRng) -> Vec<MinigameSignal>;
    fn tick(&mut self, rng: &mut GameRng) -> Vec<MinigameSignal>;
    fn view(&self) -> MiniView;
}

/// Seconds of game time per tick.
pub fn tick_secs(config: &GameConfig) -> f32 {
    config.speed.tick_rate_ms as f32 / 1000.0
}

/// The hub's minigame table, in letter order.
pub fn build_slots(config: &GameConfig) -> Vec<Box<dyn Minigame>> {
    let dt = tick_secs(config);
    vec![
        Box::new(assemble::AssembleGame::letter_a()),
        Box::new(spotter::SpotterGame::new(dt)),
        Box::new(connect::ConnectGame::new(connect::DotBoard::letter_ve(), dt)),
        Box::new(balance::BalanceGame::new(dt)),
        Box::new(catch::CatchGame::new(dt)),
        Box::new(timed::TimedGame::new(dt)),
        Box::new(assemble::AssembleGame::letter_zhe()),
    ]
}

/// Slots whose loss signal the hub listens to.
pub fn losing_slots(slots: &[Box<dyn Minigame>]) -> Vec<usize> {
    slots
        .iter()
        .enumerate()
        .filter(|(_, g)| g.can_lose())
        .map(|(i, _)| i)
        .collect()
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn slot_table_follows_letter_order() {
        let slots = build_slots(&GameConfig::default());
        assert_eq!(slots.len(), 7);
        for (i, game) in slots.iter().take(6).enumerate() {
            assert_eq!(game.letter().index(), i, "{}", game.title());
        }
        // Slot 6 holds level Ё by position but its board builds Ж
        assert_eq!(slots[6].letter().glyph(), 'Ж');
    }

    #[test]
    fn only_three_slots_can_lose() {
        let slots = build_slots(&GameConfig::default());
        assert_eq!(losing_slots(&slots), vec![3, 4, 5]);
    }

    #[test]
    fn every_mode_requests_back() {
        let mut rng = rng();
        for mut game in build_slots(&GameConfig::default()) {
            game.set_active(true, &mut rng);
            let signals = game.handle(MiniInput::Back, &mut rng);
            assert_eq!(signals, vec![MinigameSignal::BackRequested], "{}", game.title());
        }
    }

    #[test]
    fn set_active_is_idempotent() {
        let mut rng = rng();
        for mut game in build_slots(&GameConfig::default()) {
            assert!(!game.is_active());
            game.set_active(true, &mut rng);
            game.set_active(true, &mut rng);
            assert!(game.is_active());
            game.set_active(false, &mut rng);
            game.set_active(false, &mut rng);
            assert!(!game.is_active());
        }
    }

    #[test]
    fn inactive_games_stay_quiet() {
        let mut rng = rng();
        for mut game in build_slots(&GameConfig::default()) {
            assert!(run(game.as_mut(), &mut rng, 2000).is_empty(), "{}", game.title());
        }
    }
}
