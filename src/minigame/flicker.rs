/// Flickering letter tiles shared by the two spotter games.
///
/// A tile swaps its glyph every `interval` seconds and holds for
/// `pause_on_target` seconds whenever it lands on the target glyph.

use rand::Rng;

use super::GameRng;

/// How a tile picks its next glyph.
#[derive(Clone, Debug)]
pub enum Pick {
    /// Walk the alphabet in order from a random start.
    Cycle(Vec<char>),
    /// Decoy with probability `p_decoy`, otherwise target.
    Weighted { decoy: char, target: char, p_decoy: f32 },
}

#[derive(Clone, Debug)]
pub struct FlickerTile {
    pub current: char,
    index: usize,
    interval: f32,
    timer: f32,
    pause_left: f32,
    /// Seconds of miss feedback left.
    pub shake: f32,
    /// Seconds of hint highlight left.
    pub hint: f32,
    running: bool,
}

impl FlickerTile {
    /// New tile with a random start glyph and a random phase.
    pub fn new(pick: &Pick, interval: f32, rng: &mut GameRng) -> Self {
        let mut tile = FlickerTile {
            current: ' ',
            index: 0,
            interval: interval.max(0.001),
            timer: 0.0,
            pause_left: 0.0,
            shake: 0.0,
            hint: 0.0,
            running: true,
        };
        match pick {
            Pick::Cycle(chars) if !chars.is_empty() => {
                tile.index = rng.random_range(0..chars.len());
                tile.current = chars[tile.index];
            }
            _ => tile.roll(pick, rng),
        }
        tile.timer = rng.random_range(0.0..tile.interval);
        tile
    }

    fn roll(&mut self, pick: &Pick, rng: &mut GameRng) {
        match pick {
            Pick::Cycle(chars) => {
                if !chars.is_empty() {
                    self.index = (self.index + 1) % chars.len();
                    self.current = chars[self.index];
                }
            }
            Pick::Weighted { decoy, target, p_decoy } => {
                self.current = if rng.random::<f32>() < *p_decoy { *decoy } else { *target };
            }
        }
    }

    pub fn step(&mut self, dt: f32, pick: &Pick, target: char, pause_on_target: f32, rng: &mut GameRng) {
        self.shake = (self.shake - dt).max(0.0);
        self.hint = (self.hint - dt).max(0.0);
        if !self.running {
            return;
        }
        if self.pause_left > 0.0 {
            self.pause_left -= dt;
            return;
        }
        self.timer += dt;
        if self.timer >= self.interval {
            self.timer -= self.interval;
            self.roll(pick, rng);
            if self.current == target {
                self.pause_left = pause_on_target;
            }
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }
}

/// Move a grid cursor one step, clamped to the grid.
pub fn move_cursor(cursor: usize, cols: usize, count: usize, dx: i32, dy: i32) -> usize {
    if count == 0 || cols == 0 {
        return 0;
    }
    let rows = count.div_ceil(cols);
    let col = (cursor % cols) as i32 + dx;
    let row = (cursor / cols) as i32 + dy;
    let col = col.clamp(0, cols as i32 - 1) as usize;
    let row = row.clamp(0, rows as i32 - 1) as usize;
    (row * cols + col).min(count - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minigame::testing::rng;

    #[test]
    fn cycle_walks_the_alphabet_and_pauses_on_target() {
        let mut rng = rng();
        let pick = Pick::Cycle(vec!['А', 'Б', 'В']);
        let mut tile = FlickerTile::new(&pick, 0.1, &mut rng);
        let mut seen_target = false;
        for _ in 0..200 {
            let prev = tile.current;
            tile.step(0.05, &pick, 'Б', 1.0, &mut rng);
            if tile.current == 'Б' && prev != 'Б' {
                seen_target = true;
                // Holds for the pause
                for _ in 0..10 {
                    tile.step(0.05, &pick, 'Б', 1.0, &mut rng);
                    assert_eq!(tile.current, 'Б');
                }
                break;
            }
        }
        assert!(seen_target);
    }

    #[test]
    fn stopped_tile_keeps_its_glyph() {
        let mut rng = rng();
        let pick = Pick::Cycle("АБВГД".chars().collect());
        let mut tile = FlickerTile::new(&pick, 0.01, &mut rng);
        tile.stop();
        let before = tile.current;
        for _ in 0..100 {
            tile.step(0.05, &pick, 'Я', 0.0, &mut rng);
        }
        assert_eq!(tile.current, before);
    }

    #[test]
    fn weighted_only_yields_decoy_or_target() {
        let mut rng = rng();
        let pick = Pick::Weighted { decoy: 'Ё', target: 'Е', p_decoy: 0.86 };
        let mut tile = FlickerTile::new(&pick, 0.05, &mut rng);
        for _ in 0..500 {
            tile.step(0.05, &pick, 'Е', 0.0, &mut rng);
            assert!(tile.current == 'Ё' || tile.current == 'Е');
        }
    }

    #[test]
    fn cursor_is_clamped() {
        assert_eq!(move_cursor(0, 10, 50, -1, 0), 0);
        assert_eq!(move_cursor(9, 10, 50, 1, 0), 9);
        assert_eq!(move_cursor(5, 10, 50, 0, 1), 15);
        assert_eq!(move_cursor(45, 10, 50, 0, 1), 45);
        assert_eq!(move_cursor(44, 10, 45, 1, 0), 44);
    }
}
