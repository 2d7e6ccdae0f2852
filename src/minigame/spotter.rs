/// Б: spot the letter.
///
/// Fifty tiles cycle through the alphabet, each at its own speed, and
/// linger on `Б`. Picking a tile while it shows `Б` wins; any other pick
/// shakes the tile. There is no way to lose.

use rand::Rng;

use super::flicker::{move_cursor, FlickerTile, Pick};
use super::{GameRng, Glyph, MiniInput, MiniView, Minigame, MinigameSignal, Tone};
use crate::domain::letter::{LetterId, GLYPHS};

const TILE_COUNT: usize = 50;
const COLS: usize = 10;
const CELL_W: u16 = 4;
const CELL_H: u16 = 2;
const CHANGE_INTERVAL: f32 = 0.08;
const PAUSE_ON_TARGET: f32 = 1.0;
const SHAKE_SECS: f32 = 0.2;
const TARGET: char = 'Б';

pub struct SpotterGame {
    dt: f32,
    pick: Pick,
    tiles: Vec<FlickerTile>,
    cursor: usize,
    active: bool,
    finished: bool,
    winner: Option<usize>,
    shake: f32,
}

impl SpotterGame {
    pub fn new(dt: f32) -> Self {
        let mut alphabet: Vec<char> = GLYPHS.chars().collect();
        if !alphabet.contains(&TARGET) {
            alphabet.insert(1, TARGET);
        }
        SpotterGame {
            dt,
            pick: Pick::Cycle(alphabet),
            tiles: Vec::new(),
            cursor: 0,
            active: false,
            finished: false,
            winner: None,
            shake: 0.0,
        }
    }

    fn reset(&mut self, rng: &mut GameRng) {
        self.tiles = (0..TILE_COUNT)
            .map(|_| {
                // Spread the tiles so they never tick in lockstep
                let interval = CHANGE_INTERVAL * rng.random_range(0.8..1.6);
                FlickerTile::new(&self.pick, interval, rng)
            })
            .collect();
        self.cursor = 0;
        self.finished = false;
        self.winner = None;
        self.shake = 0.0;
    }

    fn pick_tile(&mut self) -> Vec<MinigameSignal> {
        let Some(tile) = self.tiles.get_mut(self.cursor) else {
            return Vec::new();
        };
        if tile.current == TARGET {
            self.finished = true;
            self.winner = Some(self.cursor);
            self.shake = 0.6;
            for t in &mut self.tiles {
                t.stop();
            }
            log::info!("spotter won on tile {}", self.cursor);
            vec![MinigameSignal::Won]
        } else {
            tile.shake = SHAKE_SECS;
            Vec::new()
        }
    }

    #[cfg(test)]
    fn tile_chars(&self) -> Vec<char> {
        self.tiles.iter().map(|t| t.current).collect()
    }
}

impl Minigame for SpotterGame {
    fn title(&self) -> &str {
        "Найди Б"
    }

    fn letter(&self) -> LetterId {
        LetterId::from_glyph(TARGET).unwrap_or_else(LetterId::first)
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
        if !self.active || self.finished {
            return Vec::new();
        }
        let n = self.tiles.len();
        match input {
            MiniInput::Left => self.cursor = move_cursor(self.cursor, COLS, n, -1, 0),
            MiniInput::Right => self.cursor = move_cursor(self.cursor, COLS, n, 1, 0),
            MiniInput::Up => self.cursor = move_cursor(self.cursor, COLS, n, 0, -1),
            MiniInput::Down => self.cursor = move_cursor(self.cursor, COLS, n, 0, 1),
            MiniInput::Confirm => return self.pick_tile(),
            _ => {}
        }
        Vec::new()
    }

    fn tick(&mut self, rng: &mut GameRng) -> Vec<MinigameSignal> {
        if !self.active {
            return Vec::new();
        }
        self.shake = (self.shake - self.dt).max(0.0);
        for tile in &mut self.tiles {
            tile.step(self.dt, &self.pick, TARGET, PAUSE_ON_TARGET, rng);
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
                } else if t.shake > 0.0 {
                    Tone::Bad
                } else {
                    Tone::Normal
                };
                Glyph::new(x, y, t.current, tone).selected(i == self.cursor && !self.finished)
            })
            .collect();

        MiniView {
            width: COLS as u16 * CELL_W,
            height: rows * CELL_H,
            glyphs,
            status: if self.finished { "Нашёл!".into() } else { "Поймай букву Б".into() },
            help: "←↑↓→ выбор  Enter взять  Esc назад",
            shake: if self.shake > 0.0 { 1 } else { 0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minigame::testing::{rng, run};

    fn active_game(rng: &mut GameRng) -> SpotterGame {
        let mut g = SpotterGame::new(0.033);
        g.set_active(true, rng);
        g
    }

    /// Tick until some tile shows the target, then park the cursor on it.
    fn aim_at_target(g: &mut SpotterGame, rng: &mut GameRng) -> bool {
        for _ in 0..500 {
            if let Some(i) = g.tile_chars().iter().position(|&c| c == TARGET) {
                g.cursor = i;
                return true;
            }
            g.tick(rng);
        }
        false
    }

    #[test]
    fn picking_the_target_wins_once() {
        let mut rng = rng();
        let mut g = active_game(&mut rng);
        assert!(aim_at_target(&mut g, &mut rng));
        assert_eq!(g.handle(MiniInput::Confirm, &mut rng), vec![MinigameSignal::Won]);
        assert!(g.handle(MiniInput::Confirm, &mut rng).is_empty());
        assert!(run(&mut g, &mut rng, 100).is_empty());
    }

    #[test]
    fn wrong_pick_shakes_tile() {
        let mut rng = rng();
        let mut g = active_game(&mut rng);
        let i = g.tile_chars().iter().position(|&c| c != TARGET).unwrap();
        g.cursor = i;
        assert!(g.handle(MiniInput::Confirm, &mut rng).is_empty());
        assert!(g.tiles[i].shake > 0.0);
        assert!(!g.finished);
    }

    #[test]
    fn reactivation_starts_fresh() {
        let mut rng = rng();
        let mut g = active_game(&mut rng);
        assert!(aim_at_target(&mut g, &mut rng));
        g.handle(MiniInput::Confirm, &mut rng);
        assert!(g.finished);
        g.set_active(false, &mut rng);
        g.set_active(true, &mut rng);
        assert!(!g.finished);
        assert_eq!(g.cursor, 0);
        assert_eq!(g.tiles.len(), TILE_COUNT);
    }

    #[test]
    fn view_has_one_glyph_per_tile() {
        let mut rng = rng();
        let g = active_game(&mut rng);
        assert_eq!(g.view().glyphs.len(), TILE_COUNT);
    }
}
