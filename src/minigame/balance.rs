/// Г: keep the ball on the wobbling platform.
///
/// The ball drops onto a platform that keeps tilting to random angles.
/// Random nudges push the ball sideways; the player steers back with
/// left/right. While the ball rests on the platform the fill bar grows at
/// 7.5%/s. A full bar wins, rolling off either edge loses. After a loss
/// the board restarts on its own once the "try again" notice has shown.

use rand::Rng;

use super::{GameRng, Glyph, MiniInput, MiniView, Minigame, MinigameSignal, Tone};
use crate::domain::letter::LetterId;

const FILL_PER_SEC: f32 = 0.075;
const NUDGE_INTERVAL: (f32, f32) = (0.6, 1.4);
const NUDGE_IMPULSE: (f32, f32) = (0.45, 1.25);
/// Platform half-width is 1.0; impulses are scaled into that space.
const NUDGE_SCALE: f32 = 0.3;
const STEER: f32 = 0.22;
const GRAVITY: f32 = 2.2;
const DAMPING: f32 = 0.9;
const DROP_GRAVITY: f32 = 6.0;
const MAX_TILT_DEG: f32 = 10.0;
const WOBBLE_SECS: f32 = 0.8;
const LOSE_NOTICE_SECS: f32 = 1.5;
const TUTORIAL_SECS: f32 = 2.5;

const VIEW_W: u16 = 41;
const VIEW_H: u16 = 12;
const PLATFORM_ROW: u16 = 9;
const PLATFORM_HALF_COLS: f32 = 15.0;

#[derive(Clone, Copy, PartialEq, Debug)]
enum Phase {
    Dropping,
    Rolling,
    Fallen { notice_left: f32 },
    Won,
}

pub struct BalanceGame {
    dt: f32,
    active: bool,
    phase: Phase,
    ball_x: f32,
    ball_vx: f32,
    ball_y: f32,
    ball_vy: f32,
    progress: f32,
    tilt: f32,
    tilt_from: f32,
    tilt_to: f32,
    wobble_t: f32,
    next_nudge: f32,
    tutorial_shown: bool,
    tutorial_left: f32,
}

fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

impl BalanceGame {
    pub fn new(dt: f32) -> Self {
        BalanceGame {
            dt,
            active: false,
            phase: Phase::Dropping,
            ball_x: 0.0,
            ball_vx: 0.0,
            ball_y: 1.0,
            ball_vy: 0.0,
            progress: 0.0,
            tilt: 0.0,
            tilt_from: 0.0,
            tilt_to: 0.0,
            wobble_t: 0.0,
            next_nudge: 0.0,
            tutorial_shown: false,
            tutorial_left: 0.0,
        }
    }

    fn restart(&mut self) {
        self.phase = Phase::Dropping;
        self.ball_x = 0.0;
        self.ball_vx = 0.0;
        self.ball_y = 1.0;
        self.ball_vy = 0.0;
        self.progress = 0.0;
        self.tilt = 0.0;
        self.tilt_from = 0.0;
        self.tilt_to = 0.0;
        self.wobble_t = 0.0;
        self.next_nudge = 0.0;
    }

    fn schedule_nudge(&mut self, rng: &mut GameRng) {
        self.next_nudge = rng.random_range(NUDGE_INTERVAL.0..NUDGE_INTERVAL.1);
    }

    fn nudge(&mut self, rng: &mut GameRng) {
        let dir = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
        let mag = rng.random_range(NUDGE_IMPULSE.0..NUDGE_IMPULSE.1);
        self.ball_vx += dir * mag * NUDGE_SCALE;
    }

    fn wobble(&mut self, rng: &mut GameRng) {
        self.wobble_t += self.dt;
        let k = smoothstep(self.wobble_t / WOBBLE_SECS);
        self.tilt = self.tilt_from + (self.tilt_to - self.tilt_from) * k;
        if self.wobble_t >= WOBBLE_SECS {
            self.wobble_t = 0.0;
            self.tilt_from = self.tilt;
            self.tilt_to = rng.random_range(-MAX_TILT_DEG..MAX_TILT_DEG);
        }
    }

    fn roll(&mut self, rng: &mut GameRng) -> Vec<MinigameSignal> {
        self.wobble(rng);

        self.next_nudge -= self.dt;
        if self.next_nudge <= 0.0 {
            self.nudge(rng);
            self.schedule_nudge(rng);
        }

        let slope = self.tilt.to_radians().sin();
        self.ball_vx += GRAVITY * slope * self.dt;
        self.ball_vx *= 1.0 - DAMPING * self.dt;
        self.ball_x += self.ball_vx * self.dt;

        if self.ball_x.abs() > 1.0 {
            self.phase = Phase::Fallen { notice_left: LOSE_NOTICE_SECS };
            log::info!("balance: ball fell at {:.0}%", self.progress * 100.0);
            return vec![MinigameSignal::Lost];
        }

        self.progress = (self.progress + FILL_PER_SEC * self.dt).min(1.0);
        if self.progress >= 1.0 {
            self.phase = Phase::Won;
            return vec![MinigameSignal::Won];
        }
        Vec::new()
    }

    pub fn percent(&self) -> u32 {
        (self.progress * 100.0).round().clamp(0.0, 100.0) as u32
    }
}

impl Minigame for BalanceGame {
    fn title(&self) -> &str {
        "Удержи шар"
    }

    fn letter(&self) -> LetterId {
        LetterId::from_glyph('Г').unwrap_or_else(LetterId::first)
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
            self.restart();
            if !self.tutorial_shown {
                self.tutorial_shown = true;
                self.tutorial_left = TUTORIAL_SECS;
            }
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn handle(&mut self, input: MiniInput, _rng: &mut GameRng) -> Vec<MinigameSignal> {
        if input == MiniInput::Back {
            return vec![MinigameSignal::BackRequested];
        }
        if !self.active || !matches!(self.phase, Phase::Dropping | Phase::Rolling) {
            return Vec::new();
        }
        match input {
            MiniInput::Left => self.ball_vx -= STEER,
            MiniInput::Right => self.ball_vx += STEER,
            _ => {}
        }
        Vec::new()
    }

    fn tick(&mut self, rng: &mut GameRng) -> Vec<MinigameSignal> {
        if !self.active {
            return Vec::new();
        }
        self.tutorial_left = (self.tutorial_left - self.dt).max(0.0);

        match self.phase {
            Phase::Dropping => {
                self.ball_vy += DROP_GRAVITY * self.dt;
                self.ball_y -= self.ball_vy * self.dt;
                if self.ball_y <= 0.0 {
                    self.ball_y = 0.0;
                    self.ball_vy = 0.0;
                    self.phase = Phase::Rolling;
                    self.schedule_nudge(rng);
                }
                Vec::new()
            }
            Phase::Rolling => self.roll(rng),
            Phase::Fallen { notice_left } => {
                let left = notice_left - self.dt;
                if left <= 0.0 {
                    self.restart();
                } else {
                    self.phase = Phase::Fallen { notice_left: left };
                }
                Vec::new()
            }
            Phase::Won => Vec::new(),
        }
    }

    fn view(&self) -> MiniView {
        let mut glyphs = Vec::new();
        let center = (VIEW_W / 2) as f32;
        let slope = self.tilt.to_radians().tan();

        // Platform, tilted: each column shifts up or down with the slope
        let half = PLATFORM_HALF_COLS as i32;
        for dx in -half..=half {
            let lift = (dx as f32 * slope * 0.5).round() as i32;
            let y = (PLATFORM_ROW as i32 - lift).clamp(0, VIEW_H as i32 - 1) as u16;
            let x = (center as i32 + dx) as u16;
            let filled = (dx + half) as f32 / (2 * half) as f32 <= self.progress;
            let tone = if filled { Tone::Good } else { Tone::Dim };
            glyphs.push(Glyph::new(x, y, '▀', tone));
        }

        // Ball
        let bx = (center + self.ball_x * PLATFORM_HALF_COLS).round();
        if bx >= 0.0 && bx < VIEW_W as f32 {
            let dx = bx as i32 - center as i32;
            let lift = (dx as f32 * slope * 0.5).round() as i32;
            let rest = PLATFORM_ROW as i32 - 1 - lift;
            let by = match self.phase {
                Phase::Dropping => (rest as f32 * (1.0 - self.ball_y)).round() as i32,
                Phase::Fallen { .. } => VIEW_H as i32 - 1,
                _ => rest,
            };
            let tone = if matches!(self.phase, Phase::Fallen { .. }) { Tone::Bad } else { Tone::Accent };
            glyphs.push(Glyph::new(bx as u16, by.clamp(0, VIEW_H as i32 - 1) as u16, '●', tone));
        }

        let status = match self.phase {
            Phase::Fallen { .. } => "Нужно попробовать еще раз".to_string(),
            Phase::Won => "Победа!".to_string(),
            _ if self.tutorial_left > 0.0 => "Держи шар на платформе: ← →".to_string(),
            _ => format!("{}%", self.percent()),
        };

        MiniView {
            width: VIEW_W,
            height: VIEW_H,
            glyphs,
            status,
            help: "← → толкать шар  Esc назад",
            shake: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minigame::testing::{rng, run};

    fn landed(rng: &mut GameRng) -> BalanceGame {
        let mut g = BalanceGame::new(0.05);
        g.set_active(true, rng);
        for _ in 0..100 {
            if g.phase == Phase::Rolling {
                break;
            }
            g.tick(rng);
        }
        assert_eq!(g.phase, Phase::Rolling);
        g
    }

    #[test]
    fn ball_lands_before_filling() {
        let mut rng = rng();
        let g = landed(&mut rng);
        assert_eq!(g.progress, 0.0);
    }

    #[test]
    fn held_ball_fills_to_a_win() {
        let mut rng = rng();
        let mut g = landed(&mut rng);
        let mut signals = Vec::new();
        for _ in 0..400 {
            g.ball_x = 0.0;
            g.ball_vx = 0.0;
            signals.extend(g.tick(&mut rng));
        }
        assert_eq!(signals, vec![MinigameSignal::Won]);
        assert_eq!(g.percent(), 100);
    }

    #[test]
    fn rolling_off_loses_then_restarts() {
        let mut rng = rng();
        let mut g = landed(&mut rng);
        g.ball_x = 0.99;
        g.ball_vx = 5.0;
        assert_eq!(g.tick(&mut rng), vec![MinigameSignal::Lost]);
        assert!(matches!(g.phase, Phase::Fallen { .. }));
        // Input is ignored while the notice shows
        g.handle(MiniInput::Left, &mut rng);
        assert!(run(&mut g, &mut rng, 40).is_empty());
        assert_eq!(g.phase, Phase::Dropping);
        assert_eq!(g.progress, 0.0);
    }

    #[test]
    fn steering_changes_velocity() {
        let mut rng = rng();
        let mut g = landed(&mut rng);
        let before = g.ball_vx;
        g.handle(MiniInput::Right, &mut rng);
        assert!(g.ball_vx > before);
    }

    #[test]
    fn tutorial_only_on_first_activation() {
        let mut rng = rng();
        let mut g = BalanceGame::new(0.05);
        g.set_active(true, &mut rng);
        assert!(g.tutorial_left > 0.0);
        run(&mut g, &mut rng, 100);
        g.set_active(false, &mut rng);
        g.set_active(true, &mut rng);
        assert_eq!(g.tutorial_left, 0.0);
        assert_eq!(g.phase, Phase::Dropping);
    }
}
