/// Е: find the plain Е among the Ё flies before time runs out.
///
///   60 tiles, each showing Ё (86%) or Е, re-rolled every 0.07 s
///   25 s on the clock, each wrong pick costs 2.5 s
///   two hints: targets on screen light up for 0.8 s
///   clock at zero → lost

use super::flicker::{move_cursor, FlickerTile, Pick};
use super::{GameRng, Glyph, MiniInput, MiniView, Minigame, MinigameSignal, Tone};
use crate::domain::letter::LetterId;

const TILE_COUNT: usize = 60;
const COLS: usize = 10;
const CELL_W: u16 = 4;
const CELL_H: u16 = 2;
const CHANGE_INTERVAL: f32 = 0.07;
const PAUSE_ON_TARGET: f32 = 0.9;
const DECOY: char = 'Ё';
const TARGET: char = 'Е';
const DECOY_PROBABILITY: f32 = 0.86;
const TIME_LIMIT: f32 = 25.0;
const WRONG_PENALTY: f32 = 2.5;
const HINTS: u32 = 2;
const HINT_FLASH: f32 = 0.8;
const MISS_SECS: f32 = 0.25;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Outcome {
    Playing,
    Won,
    TimeUp,
}

pub struct TimedGame {
    dt: f32,
    pick: Pick,
    tiles: Vec<FlickerTile>,
    cursor: usize,
    time_left: f32,
    hints_left: u32,
    active: bool,
    outcome: Outcome,
    winner: Option<usize>,
}

impl TimedGame {
    pub fn new(dt: f32) -> Self {
        TimedGame {
            dt,
            pick: Pick::Weighted { decoy: DECOY, target: TARGET, p_decoy: DECOY_PROBABILITY },
            tiles: Vec::new(),
            cursor: 0,
            time_left: TIME_LIMIT,
            hints_left: HINTS,
            active: false,
            outcome: Outcome::Playing,
            winner: None,
        }
    }

    fn reset(&mut self, rng: &mut GameRng) {
        self.tiles = (0..TILE_COUNT)
            .map(|_| FlickerTile::new(&self.pick, CHANGE_INTERVAL, rng))
            .collect();
        self.cursor = 0;
        self.time_left = TIME_LIMIT;
        self.hints_left = HINTS;
        self.outcome = Outcome::Playing;
        self.winner = None;
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = outcome;
        for t in &mut self.tiles {
            t.stop();
        }
    }

    fn pick_tile(&mut self) -> Vec<MinigameSignal> {
        let Some(tile) = self.tiles.get_mut(self.cursor) else {
            return Vec::new();
        };
        if tile.current == TARGET {
            self.winner = Some(self.cursor);
            self.finish(Outcome::Won);
            log::info!("timed spotter won with {:.1}s left", self.time_left);
            return vec![MinigameSignal::Won];
        }
        tile.shake = MISS_SECS;
        self.time_left = (self.time_left - WRONG_PENALTY).max(0.0);
        Vec::new()
    }

    fn use_hint(&mut self) {
        if self.hints_left == 0 {
            return;
        }
        self.hints_left -= 1;
        for t in self.tiles.iter_mut().filter(|t| t.current == TARGET) {
            t.hint = HINT_FLASH;
        }
    }

    /// Whole seconds shown on the clock.
    pub fn clock(&self) -> u32 {
        self.time_left.max(0.0).ceil() as u32
    }
}

impl Minigame for TimedGame {
    fn title(&self) -> &str {
        "Е среди Ё"
    }

    fn letter(&self) -> LetterId {
        LetterId::from_glyph(TARGET).unwrap_or_else(LetterId::first)
    }

    fn can_lose(&self) -> bool {
        true
    }

    fn set_active(&mut self, active: bool, rng: &mut GameRng) {
        if active == self.active {
            return;
        }
        self.active = active;
        if active {
            self.reset(rng);
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn handle(&mut self, input: MiniInput, _rng: &mut GameRng) -> Vec<MinigameSignal> {
        if input == MiniInput::Back {
            return vec![MinigameSignal::BackRequested];
        }
        if !self.active || self.outcome != Outcome::Playing {
            return Vec::new();
        }
        let n = self.tiles.len();
        match input {
            MiniInput::Left => self.cursor = move_cursor(self.cursor, COLS, n, -1, 0),
            MiniInput::Right => self.cursor = move_cursor(self.cursor, COLS, n, 1, 0),
            MiniInput::Up => self.cursor = move_cursor(self.cursor, COLS, n, 0, -1),
            MiniInput::Down => self.cursor = move_cursor(self.cursor, COLS, n, 0, 1),
            MiniInput::Confirm => return self.pick_tile(),
            MiniInput::Hint => self.use_hint(),
            _ => {}
        }
        // A penalty can empty the clock; the loss is reported on the next tick
        Vec::new()
    }

    fn tick(&mut self, rng: &mut GameRng) -> Vec<MinigameSignal> {
        if !self.active {
            return Vec::new();
        }
        for tile in &mut self.tiles {
            tile.step(self.dt, &self.pick, TARGET, PAUSE_ON_TARGET, rng);
        }
        if self.outcome != Outcome::Playing {
            return Vec::new();
        }
        self.time_left -= self.dt;
        if self.time_left <= 0.0 {
            self.time_left = 0.0;
            self.finish(Outcome::TimeUp);
            log::info!("timed spotter: time is up");
            return vec![MinigameSignal::Lost];
        }
        Vec::new()
    }

    fn view(&self) -> MiniView {
        let rows = TILE_COUNT.div_ceil(COLS) as u16;
        let glyphs = self
            .tiles
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let x = (i % COLS) as u16 * CELL_W + 1 + if t.shake > 0.0 { 1 } else { 0 };
                let y = (i / COLS) as u16 * CELL_H;
                let tone = if self.winner == Some(i) {
                    Tone::Good
                } else if t.hint > 0.0 {
                    Tone::Hint
                } else if t.shake > 0.0 {
                    Tone::Bad
                } else {
                    Tone::Normal
                };
                let selected = i == self.cursor && self.outcome == Outcome::Playing;
                Glyph::new(x, y, t.current, tone).selected(selected)
            })
            .collect();

        let status = match self.outcome {
            Outcome::Playing => format!("Время: {}   Подсказки: {}", self.clock(), self.hints_left),
            Outcome::Won => "Победа!".into(),
            Outcome::TimeUp => "Время вышло!".into(),
        };

        MiniView {
            width: COLS as u16 * CELL_W,
            height: rows * CELL_H,
            glyphs,
            status,
            help: "←↑↓→ выбор  Enter взять  H подсказка  Esc назад",
            shake: 0,
        }
    }
}
