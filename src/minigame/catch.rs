/// Д: catch the falling Д, dodge everything else.
///
/// Letters fall from the top; the bucket slides along the bottom row.
/// Catch ten Д to win. Catching any other letter loses the round.
/// Letters that reach the floor are simply recycled.

use rand::Rng;

use super::{GameRng, Glyph, MiniInput, MiniView, Minigame, MinigameSignal, Tone};
use crate::domain::letter::LetterId;

const NEED: u32 = 10;
const CORRECT_CHANCE: f64 = 0.45;
const BAITS: &str = "БЛРАОПГЖ";
const TARGET: char = 'Д';
const SPAWN_EVERY: f32 = 0.9;
const PREWARM: usize = 20;
const FALL_SPEED: (f32, f32) = (3.5, 5.5);

const VIEW_W: u16 = 25;
const VIEW_H: u16 = 14;
const BUCKET_ROW: u16 = VIEW_H - 1;
const BUCKET_HALF: i32 = 1;
const BUCKET_STEP: i32 = 2;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Outcome {
    Playing,
    Won,
    Lost,
}

#[derive(Clone, Copy, Debug)]
struct Faller {
    ch: char,
    col: u16,
    y: f32,
    speed: f32,
    live: bool,
}

impl Faller {
    const IDLE: Faller = Faller { ch: ' ', col: 0, y: 0.0, speed: 0.0, live: false };
}

pub struct CatchGame {
    dt: f32,
    active: bool,
    outcome: Outcome,
    have: u32,
    bucket: i32,
    spawn_timer: f32,
    /// Recycled slots; `live == false` means free.
    pool: Vec<Faller>,
    baits: Vec<char>,
}

impl CatchGame {
    pub fn new(dt: f32) -> Self {
        CatchGame {
            dt,
            active: false,
            outcome: Outcome::Playing,
            have: 0,
            bucket: (VIEW_W / 2) as i32,
            spawn_timer: 0.0,
            pool: vec![Faller::IDLE; PREWARM],
            baits: BAITS.chars().collect(),
        }
    }

    fn reset(&mut self) {
        self.outcome = Outcome::Playing;
        self.have = 0;
        self.bucket = (VIEW_W / 2) as i32;
        self.spawn_timer = 0.0;
        for f in &mut self.pool {
            f.live = false;
        }
    }

    fn launch(&mut self, ch: char, col: u16, speed: f32) {
        let item = Faller { ch, col, y: 0.0, speed, live: true };
        match self.pool.iter_mut().find(|f| !f.live) {
            Some(slot) => *slot = item,
            None => self.pool.push(item),
        }
    }

    fn spawn(&mut self, rng: &mut GameRng) {
        let ch = if rng.random_bool(CORRECT_CHANCE) || self.baits.is_empty() {
            TARGET
        } else {
            self.baits[rng.random_range(0..self.baits.len())]
        };
        let col = rng.random_range(1..VIEW_W - 1);
        let speed = rng.random_range(FALL_SPEED.0..FALL_SPEED.1);
        self.launch(ch, col, speed);
    }

    fn in_bucket(&self, col: u16) -> bool {
        (col as i32 - self.bucket).abs() <= BUCKET_HALF
    }

    fn finish(&mut self, outcome: Outcome) -> MinigameSignal {
        self.outcome = outcome;
        for f in &mut self.pool {
            f.live = false;
        }
        match outcome {
            Outcome::Won => {
                log::info!("catch: collected {}", self.have);
                MinigameSignal::Won
            }
            _ => {
                log::info!("catch: caught a bait at {}/{}", self.have, NEED);
                MinigameSignal::Lost
            }
        }
    }

    fn live_count(&self) -> usize {
        self.pool.iter().filter(|f| f.live).count()
    }
}

impl Minigame for CatchGame {
    fn title(&self) -> &str {
        "Поймай Д"
    }

    fn letter(&self) -> LetterId {
        LetterId::from_glyph(TARGET).unwrap_or_else(LetterId::first)
    }

    fn can_lose(&self) -> bool {
        true
    }

    fn set_active(&mut self, active: bool, _rng: &mut GameRng) {
        if active == self.active {
            return;
        }
        self.active = active;
        if active {
            self.reset();
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
        let max = VIEW_W as i32 - 1 - BUCKET_HALF;
        match input {
            MiniInput::Left => self.bucket = (self.bucket - BUCKET_STEP).max(BUCKET_HALF),
            MiniInput::Right => self.bucket = (self.bucket + BUCKET_STEP).min(max),
            _ => {}
        }
        Vec::new()
    }

    fn tick(&mut self, rng: &mut GameRng) -> Vec<MinigameSignal> {
        if !self.active || self.outcome != Outcome::Playing {
            return Vec::new();
        }

        self.spawn_timer -= self.dt;
        if self.spawn_timer <= 0.0 {
            self.spawn_timer += SPAWN_EVERY;
            self.spawn(rng);
        }

        let floor = BUCKET_ROW as f32;
        let mut landed = Vec::new();
        for (i, f) in self.pool.iter_mut().enumerate().filter(|(_, f)| f.live) {
            f.y += f.speed * self.dt;
            if f.y >= floor {
                landed.push(i);
            }
        }

        for i in landed {
            let Faller { ch, col, .. } = self.pool[i];
            self.pool[i].live = false;
            if !self.in_bucket(col) {
                continue;
            }
            if ch != TARGET {
                return vec![self.finish(Outcome::Lost)];
            }
            self.have += 1;
            if self.have >= NEED {
                return vec![self.finish(Outcome::Won)];
            }
        }
        Vec::new()
    }

    fn view(&self) -> MiniView {
        let mut glyphs: Vec<Glyph> = self
            .pool
            .iter()
            .filter(|f| f.live)
            .map(|f| {
                let tone = if f.ch == TARGET { Tone::Accent } else { Tone::Normal };
                Glyph::new(f.col, (f.y as u16).min(BUCKET_ROW - 1), f.ch, tone)
            })
            .collect();

        let tone = match self.outcome {
            Outcome::Playing => Tone::Hint,
            Outcome::Won => Tone::Good,
            Outcome::Lost => Tone::Bad,
        };
        for dx in -BUCKET_HALF..=BUCKET_HALF {
            let ch = match dx {
                d if d < 0 => '╰',
                d if d > 0 => '╯',
                _ => '─',
            };
            glyphs.push(Glyph::new((self.bucket + dx) as u16, BUCKET_ROW, ch, tone));
        }

        let status = match self.outcome {
            Outcome::Playing => format!("Д: {}/{}", self.have, NEED),
            Outcome::Won => "Все Д собраны!".into(),
            Outcome::Lost => "Это не Д!".into(),
        };

        MiniView {
            width: VIEW_W,
            height: VIEW_H,
            glyphs,
            status,
            help: "← → корзина  Esc назад",
            shake: if self.outcome == Outcome::Lost { 1 } else { 0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minigame::testing::{rng, run};

    fn active_game(rng: &mut GameRng) -> CatchGame {
        let mut g = CatchGame::new(0.1);
        g.set_active(true, rng);
        // Hold off random spawns so only launched letters fall
        g.spawn_timer = 1000.0;
        g
    }

    fn drop_into_bucket(g: &mut CatchGame, ch: char, rng: &mut GameRng) -> Vec<MinigameSignal> {
        let col = g.bucket as u16;
        g.launch(ch, col, 10.0);
        run(g, rng, 20)
    }

    #[test]
    fn pool_is_prewarmed() {
        let g = CatchGame::new(0.1);
        assert_eq!(g.pool.len(), PREWARM);
        assert_eq!(g.live_count(), 0);
    }

    #[test]
    fn ten_catches_win() {
        let mut rng = rng();
        let mut g = active_game(&mut rng);
        for n in 1..NEED {
            assert!(drop_into_bucket(&mut g, TARGET, &mut rng).is_empty());
            assert_eq!(g.have, n);
        }
        assert_eq!(drop_into_bucket(&mut g, TARGET, &mut rng), vec![MinigameSignal::Won]);
        assert_eq!(g.outcome, Outcome::Won);
    }

    #[test]
    fn catching_bait_loses() {
        let mut rng = rng();
        let mut g = active_game(&mut rng);
        assert_eq!(drop_into_bucket(&mut g, 'Б', &mut rng), vec![MinigameSignal::Lost]);
        // Finished: no more spawns
        g.spawn_timer = 0.0;
        assert!(run(&mut g, &mut rng, 100).is_empty());
        assert_eq!(g.live_count(), 0);
    }

    #[test]
    fn misses_are_recycled() {
        let mut rng = rng();
        let mut g = active_game(&mut rng);
        g.bucket = BUCKET_HALF;
        g.launch('Б', VIEW_W - 2, 10.0);
        g.launch(TARGET, VIEW_W - 2, 10.0);
        assert!(run(&mut g, &mut rng, 20).is_empty());
        assert_eq!(g.have, 0);
        assert_eq!(g.live_count(), 0);
        assert_eq!(g.pool.len(), PREWARM);
    }

    #[test]
    fn bucket_stays_on_board() {
        let mut rng = rng();
        let mut g = active_game(&mut rng);
        for _ in 0..50 {
            g.handle(MiniInput::Left, &mut rng);
        }
        assert_eq!(g.bucket, BUCKET_HALF);
        for _ in 0..50 {
            g.handle(MiniInput::Right, &mut rng);
        }
        assert_eq!(g.bucket, VIEW_W as i32 - 1 - BUCKET_HALF);
    }

    #[test]
    fn spawns_only_target_or_baits() {
        let mut rng = rng();
        let mut g = CatchGame::new(0.1);
        g.set_active(true, &mut rng);
        g.bucket = -10; // nothing gets caught
        for _ in 0..200 {
            g.tick(&mut rng);
            for f in g.pool.iter().filter(|f| f.live) {
                assert!(f.ch == TARGET || BAITS.contains(f.ch));
            }
        }
    }

    #[test]
    fn reactivation_resets_counter() {
        let mut rng = rng();
        let mut g = active_game(&mut rng);
        drop_into_bucket(&mut g, TARGET, &mut rng);
        g.set_active(false, &mut rng);
        g.set_active(true, &mut rng);
        assert_eq!(g.have, 0);
        assert_eq!(g.outcome, Outcome::Playing);
    }
}
