/// В: connect the dots.
///
/// Pick a dot, pick another, and a line is drawn between them; both ends
/// get marked. `C` checks the drawing: every marked dot must belong to the
/// letter pattern and every pattern dot must be marked. `R` wipes it.

use std::collections::BTreeSet;

use super::{GameRng, Glyph, MiniInput, MiniView, Minigame, MinigameSignal, Tone};
use crate::domain::letter::LetterId;

const DOT_DX: u16 = 6;
const DOT_DY: u16 = 3;
const FEEDBACK_SECS: f32 = 0.4;

/// The dot grid and the set of dots that spell the letter.
#[derive(Clone, Debug)]
pub struct DotBoard {
    pub cols: u8,
    pub rows: u8,
    pub pattern: BTreeSet<(u8, u8)>,
    /// Only allow lines between neighbouring dots.
    pub require_adjacent: bool,
}

impl DotBoard {
    /// 5x5 grid, pattern is a В drawn in the left four columns.
    pub fn letter_ve() -> Self {
        const SHAPE: [&str; 5] = [
            "###..",
            "#..#.",
            "###..",
            "#..#.",
            "###..",
        ];
        let pattern = SHAPE
            .iter()
            .enumerate()
            .flat_map(|(row, line)| {
                line.bytes()
                    .enumerate()
                    .filter(|(_, b)| *b == b'#')
                    .map(move |(col, _)| (col as u8, row as u8))
            })
            .collect();
        DotBoard { cols: 5, rows: 5, pattern, require_adjacent: true }
    }

    fn contains(&self, dot: (u8, u8)) -> bool {
        dot.0 < self.cols && dot.1 < self.rows
    }
}

fn adjacent(a: (u8, u8), b: (u8, u8)) -> bool {
    let dx = (a.0 as i16 - b.0 as i16).abs();
    let dy = (a.1 as i16 - b.1 as i16).abs();
    dx <= 1 && dy <= 1 && (dx + dy) > 0
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Feedback {
    None,
    Fail(f32),
    Reject(f32),
}

pub struct ConnectGame {
    dt: f32,
    board: DotBoard,
    cursor: (u8, u8),
    drag_start: Option<(u8, u8)>,
    lines: Vec<((u8, u8), (u8, u8))>,
    marked: BTreeSet<(u8, u8)>,
    feedback: Feedback,
    active: bool,
    finished: bool,
}

impl ConnectGame {
    pub fn new(board: DotBoard, dt: f32) -> Self {
        ConnectGame {
            dt,
            board,
            cursor: (0, 0),
            drag_start: None,
            lines: Vec::new(),
            marked: BTreeSet::new(),
            feedback: Feedback::None,
            active: false,
            finished: false,
        }
    }

    fn reset_lines(&mut self) {
        self.lines.clear();
        self.marked.clear();
        self.drag_start = None;
    }

    /// Enter on the cursor dot: start a drag, or finish it.
    fn press_dot(&mut self) {
        let here = self.cursor;
        match self.drag_start.take() {
            None => self.drag_start = Some(here),
            Some(start) if start == here => {}
            Some(start) => self.try_commit(start, here),
        }
    }

    fn try_commit(&mut self, a: (u8, u8), b: (u8, u8)) {
        if !self.board.contains(a) || !self.board.contains(b) {
            return;
        }
        if self.board.require_adjacent && !adjacent(a, b) {
            self.feedback = Feedback::Reject(FEEDBACK_SECS);
            return;
        }
        self.lines.push((a, b));
        self.marked.insert(a);
        self.marked.insert(b);
    }

    fn check_result(&mut self) -> Vec<MinigameSignal> {
        let ok = self.marked.is_subset(&self.board.pattern)
            && self.board.pattern.is_subset(&self.marked);
        if ok {
            self.finished = true;
            self.drag_start = None;
            log::info!("connect: pattern complete with {} lines", self.lines.len());
            vec![MinigameSignal::Won]
        } else {
            self.feedback = Feedback::Fail(FEEDBACK_SECS);
            Vec::new()
        }
    }

    fn dot_pos(dot: (u8, u8)) -> (u16, u16) {
        (dot.0 as u16 * DOT_DX, dot.1 as u16 * DOT_DY)
    }

    fn line_glyphs(&self, out: &mut Vec<Glyph>) {
        for &(a, b) in &self.lines {
            let (ax, ay) = Self::dot_pos(a);
            let (bx, by) = Self::dot_pos(b);
            let dx = bx as i32 - ax as i32;
            let dy = by as i32 - ay as i32;
            let ch = match (dx.signum(), dy.signum()) {
                (_, 0) => '─',
                (0, _) => '│',
                (sx, sy) if sx == sy => '╲',
                _ => '╱',
            };
            let steps = dx.abs().max(dy.abs());
            for s in 1..steps {
                let x = ax as i32 + dx * s / steps;
                let y = ay as i32 + dy * s / steps;
                out.push(Glyph::new(x as u16, y as u16, ch, Tone::Accent));
            }
        }
    }
}

impl Minigame for ConnectGame {
    fn title(&self) -> &str {
        "Соедини точки"
    }

    fn letter(&self) -> LetterId {
        LetterId::from_glyph('В').unwrap_or_else(LetterId::first)
    }

    fn set_active(&mut self, active: bool, _rng: &mut GameRng) {
        if active == self.active {
            return;
        }
        self.active = active;
        if active {
            self.reset_lines();
            self.cursor = (0, 0);
            self.feedback = Feedback::None;
            self.finished = false;
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
        let (cx, cy) = self.cursor;
        match input {
            MiniInput::Left => self.cursor.0 = cx.saturating_sub(1),
            MiniInput::Right => self.cursor.0 = (cx + 1).min(self.board.cols.saturating_sub(1)),
            MiniInput::Up => self.cursor.1 = cy.saturating_sub(1),
            MiniInput::Down => self.cursor.1 = (cy + 1).min(self.board.rows.saturating_sub(1)),
            MiniInput::Confirm => self.press_dot(),
            MiniInput::Check => return self.check_result(),
            MiniInput::Reset => self.reset_lines(),
            _ => {}
        }
        Vec::new()
    }

    fn tick(&mut self, _rng: &mut GameRng) -> Vec<MinigameSignal> {
        if !self.active {
            return Vec::new();
        }
        self.feedback = match self.feedback {
            Feedback::Fail(t) if t > self.dt => Feedback::Fail(t - self.dt),
            Feedback::Reject(t) if t > self.dt => Feedback::Reject(t - self.dt),
            _ => Feedback::None,
        };
        Vec::new()
    }

    fn view(&self) -> MiniView {
        let mut glyphs = Vec::new();
        self.line_glyphs(&mut glyphs);

        for row in 0..self.board.rows {
            for col in 0..self.board.cols {
                let dot = (col, row);
                let (x, y) = Self::dot_pos(dot);
                let marked = self.marked.contains(&dot);
                let (ch, tone) = if self.finished && marked {
                    ('●', Tone::Good)
                } else if self.drag_start == Some(dot) {
                    ('◉', Tone::Hint)
                } else if marked {
                    let tone = if matches!(self.feedback, Feedback::Fail(_)) { Tone::Bad } else { Tone::Accent };
                    ('●', tone)
                } else {
                    ('·', Tone::Dim)
                };
                glyphs.push(Glyph::new(x, y, ch, tone).selected(dot == self.cursor && !self.finished));
            }
        }

        let status = match self.feedback {
            _ if self.finished => "Это В!".to_string(),
            Feedback::Fail(_) => "Не похоже на В".to_string(),
            Feedback::Reject(_) => "Только соседние точки".to_string(),
            Feedback::None if self.drag_start.is_some() => "Выбери вторую точку".to_string(),
            Feedback::None => format!("Линий: {}", self.lines.len()),
        };

        MiniView {
            width: (self.board.cols.max(1) as u16 - 1) * DOT_DX + 1,
            height: (self.board.rows.max(1) as u16 - 1) * DOT_DY + 1,
            glyphs,
            status,
            help: "←↑↓→ точка  Enter соединить  C проверить  R сброс  Esc назад",
            shake: if matches!(self.feedback, Feedback::Reject(_) | Feedback::Fail(_)) { 1 } else { 0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minigame::testing::rng;

    fn game() -> (ConnectGame, GameRng) {
        let mut rng = rng();
        let mut g = ConnectGame::new(DotBoard::letter_ve(), 0.033);
        g.set_active(true, &mut rng);
        (g, rng)
    }

    fn connect(g: &mut ConnectGame, a: (u8, u8), b: (u8, u8), rng: &mut GameRng) {
        g.cursor = a;
        g.handle(MiniInput::Confirm, rng);
        g.cursor = b;
        g.handle(MiniInput::Confirm, rng);
    }

    /// Trace the В outline with neighbour-only lines.
    fn draw_ve(g: &mut ConnectGame, rng: &mut GameRng) {
        let path = [
            (0, 0), (1, 0), (2, 0), (3, 1), (2, 2), (3, 3), (2, 4), (1, 4), (0, 4),
            (0, 3), (0, 2), (0, 1), (0, 0),
        ];
        for w in path.windows(2) {
            connect(g, w[0], w[1], rng);
        }
        connect(g, (0, 2), (1, 2), rng);
    }

    #[test]
    fn pattern_has_thirteen_dots() {
        assert_eq!(DotBoard::letter_ve().pattern.len(), 13);
    }

    #[test]
    fn full_pattern_wins() {
        let (mut g, mut rng) = game();
        draw_ve(&mut g, &mut rng);
        assert_eq!(g.marked, g.board.pattern);
        assert_eq!(g.handle(MiniInput::Check, &mut rng), vec![MinigameSignal::Won]);
        assert!(g.handle(MiniInput::Check, &mut rng).is_empty());
    }

    #[test]
    fn extra_dot_fails() {
        let (mut g, mut rng) = game();
        draw_ve(&mut g, &mut rng);
        connect(&mut g, (3, 3), (4, 4), &mut rng);
        assert!(g.handle(MiniInput::Check, &mut rng).is_empty());
        assert!(matches!(g.feedback, Feedback::Fail(_)));
    }

    #[test]
    fn missing_dot_fails() {
        let (mut g, mut rng) = game();
        connect(&mut g, (0, 0), (1, 0), &mut rng);
        assert!(g.handle(MiniInput::Check, &mut rng).is_empty());
    }

    #[test]
    fn far_dots_are_rejected() {
        let (mut g, mut rng) = game();
        connect(&mut g, (0, 0), (3, 3), &mut rng);
        assert!(g.lines.is_empty());
        assert!(g.marked.is_empty());
        assert!(matches!(g.feedback, Feedback::Reject(_)));
    }

    #[test]
    fn same_dot_cancels_drag() {
        let (mut g, mut rng) = game();
        connect(&mut g, (1, 1), (1, 1), &mut rng);
        assert!(g.drag_start.is_none());
        assert!(g.lines.is_empty());
    }

    #[test]
    fn reset_clears_lines_and_marks() {
        let (mut g, mut rng) = game();
        connect(&mut g, (0, 0), (0, 1), &mut rng);
        g.handle(MiniInput::Reset, &mut rng);
        assert!(g.lines.is_empty() && g.marked.is_empty());
    }

    #[test]
    fn reactivation_clears_board() {
        let (mut g, mut rng) = game();
        draw_ve(&mut g, &mut rng);
        g.handle(MiniInput::Check, &mut rng);
        g.set_active(false, &mut rng);
        g.set_active(true, &mut rng);
        assert!(!g.finished);
        assert!(g.lines.is_empty());
    }
}
