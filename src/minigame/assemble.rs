/// А and Ж: build the letter out of loose blocks.
///
/// Blocks lie scattered on the board together with a few decoys. Move the
/// cursor onto a block, `Enter` grabs it, arrows drag it, `Enter` drops
/// it. Blocks never overlap or leave the board. Two blocks touch when any
/// of their cells are 8-neighbours.
///
///   А  two legs `/` `\` and a crossbar `=`; the crossbar must touch both legs
///   Ж  two slashes and a vertical `|`; both slashes touch the vertical,
///      one on each side of it

use rand::Rng;

use super::{GameRng, Glyph, MiniInput, MiniView, Minigame, MinigameSignal, Tone};
use crate::domain::letter::LetterId;

const BOARD_W: i16 = 36;
const BOARD_H: i16 = 14;
const LAYOUT_TRIES: usize = 15;
const PLACE_TRIES: usize = 50;
const DECOYS: usize = 4;
const DECOY_GLYPHS: &str = "#%@&*+~o";
const PALETTE: u8 = 6;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Part {
    LegLeft,
    LegRight,
    Crossbar,
    SlashLeft,
    SlashRight,
    Vertical,
    Decoy,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Layout {
    A,
    Zhe,
}

impl Layout {
    fn parts(self) -> &'static [Part] {
        match self {
            Layout::A => &[Part::LegLeft, Part::LegRight, Part::Crossbar],
            Layout::Zhe => &[Part::SlashLeft, Part::SlashRight, Part::Vertical],
        }
    }

    fn glyph(self) -> char {
        match self {
            Layout::A => 'А',
            Layout::Zhe => 'Ж',
        }
    }
}

type Shape = Vec<(i16, i16, char)>;

fn diagonal(len: i16, ch: char, rising: bool) -> Shape {
    (0..len)
        .map(|i| if rising { (len - 1 - i, i, ch) } else { (i, i, ch) })
        .collect()
}

fn shape_of(part: Part) -> Shape {
    match part {
        Part::LegLeft => diagonal(5, '/', true),
        Part::LegRight => diagonal(5, '\\', false),
        Part::Crossbar => (0..3).map(|i| (i, 0, '=')).collect(),
        Part::SlashLeft => diagonal(4, '\\', false),
        Part::SlashRight => diagonal(4, '/', true),
        Part::Vertical => (0..5).map(|i| (0, i, '|')).collect(),
        Part::Decoy => Vec::new(),
    }
}

#[derive(Clone, Debug)]
struct Block {
    part: Part,
    shape: Shape,
    x: i16,
    y: i16,
    tone: Tone,
}

impl Block {
    fn cells(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.shape.iter().map(|&(dx, dy, _)| (self.x + dx, self.y + dy))
    }

    fn covers(&self, x: i16, y: i16) -> bool {
        self.cells().any(|c| c == (x, y))
    }

    fn touches(&self, other: &Block) -> bool {
        self.cells().any(|(ax, ay)| {
            other
                .cells()
                .any(|(bx, by)| (ax - bx).abs().max((ay - by).abs()) <= 1)
        })
    }

    fn center_x(&self) -> f32 {
        let n = self.shape.len().max(1) as f32;
        self.cells().map(|(x, _)| x as f32).sum::<f32>() / n
    }
}

fn in_bounds(shape: &Shape, x: i16, y: i16) -> bool {
    shape.iter().all(|&(dx, dy, _)| {
        let (cx, cy) = (x + dx, y + dy);
        (0..BOARD_W).contains(&cx) && (0..BOARD_H).contains(&cy)
    })
}

pub struct AssembleGame {
    layout: Layout,
    blocks: Vec<Block>,
    cursor: (i16, i16),
    held: Option<usize>,
    active: bool,
    finished: bool,
}

impl AssembleGame {
    fn new(layout: Layout) -> Self {
        AssembleGame {
            layout,
            blocks: Vec::new(),
            cursor: (BOARD_W / 2, BOARD_H / 2),
            held: None,
            active: false,
            finished: false,
        }
    }

    pub fn letter_a() -> Self {
        Self::new(Layout::A)
    }

    pub fn letter_zhe() -> Self {
        Self::new(Layout::Zhe)
    }

    /// Free for `shape` at (x, y), ignoring block `skip`.
    fn fits(&self, shape: &Shape, x: i16, y: i16, skip: Option<usize>) -> bool {
        if !in_bounds(shape, x, y) {
            return false;
        }
        self.blocks
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .all(|(_, b)| shape.iter().all(|&(dx, dy, _)| !b.covers(x + dx, y + dy)))
    }

    fn find_spot(&self, shape: &Shape, rng: &mut GameRng) -> Option<(i16, i16)> {
        for _ in 0..PLACE_TRIES {
            let x = rng.random_range(0..BOARD_W);
            let y = rng.random_range(0..BOARD_H);
            if self.fits(shape, x, y, None) {
                return Some((x, y));
            }
        }
        (0..BOARD_H)
            .flat_map(|y| (0..BOARD_W).map(move |x| (x, y)))
            .find(|&(x, y)| self.fits(shape, x, y, None))
    }

    fn scatter(&mut self, rng: &mut GameRng) {
        self.blocks.clear();
        for (i, &part) in self.layout.parts().iter().enumerate() {
            let shape = shape_of(part);
            if let Some((x, y)) = self.find_spot(&shape, rng) {
                let tone = Tone::Palette(i as u8 % PALETTE);
                self.blocks.push(Block { part, shape, x, y, tone });
            }
        }
        let glyphs: Vec<char> = DECOY_GLYPHS.chars().collect();
        for _ in 0..DECOYS {
            let ch = glyphs[rng.random_range(0..glyphs.len())];
            let len = rng.random_range(1..=3);
            let shape: Shape = (0..len).map(|i| (i, 0, ch)).collect();
            if let Some((x, y)) = self.find_spot(&shape, rng) {
                let tone = Tone::Palette(rng.random_range(0..PALETTE));
                self.blocks.push(Block { part: Part::Decoy, shape, x, y, tone });
            }
        }
    }

    fn reset(&mut self, rng: &mut GameRng) {
        for _ in 0..LAYOUT_TRIES {
            self.scatter(rng);
            if !self.is_assembled() {
                break;
            }
        }
        self.cursor = (BOARD_W / 2, BOARD_H / 2);
        self.held = None;
        self.finished = false;
    }

    fn part(&self, part: Part) -> Option<&Block> {
        self.blocks.iter().find(|b| b.part == part)
    }

    fn is_assembled(&self) -> bool {
        let touch = |a: &Block, b: &Block| a.touches(b) && b.touches(a);
        match self.layout {
            Layout::A => {
                let (Some(l), Some(r), Some(bar)) =
                    (self.part(Part::LegLeft), self.part(Part::LegRight), self.part(Part::Crossbar))
                else {
                    return false;
                };
                touch(bar, l) && touch(bar, r)
            }
            Layout::Zhe => {
                let (Some(l), Some(r), Some(v)) =
                    (self.part(Part::SlashLeft), self.part(Part::SlashRight), self.part(Part::Vertical))
                else {
                    return false;
                };
                let vx = v.center_x();
                let sides = (l.center_x() - vx) * (r.center_x() - vx);
                touch(l, v) && touch(r, v) && sides < 0.0
            }
        }
    }

    fn check(&mut self) -> Vec<MinigameSignal> {
        if self.finished || !self.is_assembled() {
            return Vec::new();
        }
        self.finished = true;
        self.held = None;
        log::info!("assemble: {} built", self.layout.glyph());
        vec![MinigameSignal::Won]
    }

    fn step(&mut self, dx: i16, dy: i16) -> Vec<MinigameSignal> {
        let Some(i) = self.held else {
            self.cursor.0 = (self.cursor.0 + dx).clamp(0, BOARD_W - 1);
            self.cursor.1 = (self.cursor.1 + dy).clamp(0, BOARD_H - 1);
            return Vec::new();
        };
        let (nx, ny) = (self.blocks[i].x + dx, self.blocks[i].y + dy);
        if !self.fits(&self.blocks[i].shape, nx, ny, Some(i)) {
            return Vec::new();
        }
        self.blocks[i].x = nx;
        self.blocks[i].y = ny;
        self.cursor = (self.cursor.0 + dx, self.cursor.1 + dy);
        self.check()
    }

    fn grab_or_drop(&mut self) -> Vec<MinigameSignal> {
        if self.held.take().is_some() {
            return self.check();
        }
        let (cx, cy) = self.cursor;
        self.held = self.blocks.iter().position(|b| b.covers(cx, cy));
        Vec::new()
    }
}

impl Minigame for AssembleGame {
    fn title(&self) -> &str {
        match self.layout {
            Layout::A => "Собери А",
            Layout::Zhe => "Собери Ж",
        }
    }

    fn letter(&self) -> LetterId {
        LetterId::from_glyph(self.layout.glyph()).unwrap_or_else(LetterId::first)
    }

    fn set_active(&mut self, active: bool, rng: &mut GameRng) {
        if active == self.active {
            return;
        }
        self.active = active;
        if active {
            self.reset(rng);
        } else {
            self.held = None;
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
        match input {
            MiniInput::Left => self.step(-1, 0),
            MiniInput::Right => self.step(1, 0),
            MiniInput::Up => self.step(0, -1),
            MiniInput::Down => self.step(0, 1),
            MiniInput::Confirm => self.grab_or_drop(),
            _ => Vec::new(),
        }
    }

    fn tick(&mut self, _rng: &mut GameRng) -> Vec<MinigameSignal> {
        Vec::new()
    }

    fn view(&self) -> MiniView {
        let mut glyphs = Vec::new();
        for (i, b) in self.blocks.iter().enumerate() {
            let tone = if self.finished && b.part != Part::Decoy { Tone::Good } else { b.tone };
            let held = self.held == Some(i);
            for &(dx, dy, ch) in &b.shape {
                glyphs.push(Glyph::new((b.x + dx) as u16, (b.y + dy) as u16, ch, tone).selected(held));
            }
        }
        if !self.finished && self.held.is_none() {
            let (cx, cy) = self.cursor;
            match glyphs.iter_mut().find(|g| (g.x, g.y) == (cx as u16, cy as u16)) {
                Some(g) => g.selected = true,
                None => glyphs.push(Glyph::new(cx as u16, cy as u16, '·', Tone::Dim).selected(true)),
            }
        }

        let status = if self.finished {
            format!("Это {}!", self.layout.glyph())
        } else if self.held.is_some() {
            "Тащи блок стрелками, Enter отпустить".to_string()
        } else {
            format!("Собери букву {}", self.layout.glyph())
        };

        MiniView {
            width: BOARD_W as u16,
            height: BOARD_H as u16,
            glyphs,
            status,
            help: "←↑↓→ курсор  Enter взять/отпустить  Esc назад",
            shake: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minigame::testing::rng;

    fn block(part: Part, x: i16, y: i16) -> Block {
        Block { part, shape: shape_of(part), x, y, tone: Tone::Normal }
    }

    fn staged(layout: Layout, blocks: Vec<Block>) -> (AssembleGame, GameRng) {
        let mut rng = rng();
        let mut g = AssembleGame::new(layout);
        g.set_active(true, &mut rng);
        g.blocks = blocks;
        (g, rng)
    }

    #[test]
    fn scattered_layout_is_not_already_won() {
        let mut rng = rng();
        for mut g in [AssembleGame::letter_a(), AssembleGame::letter_zhe()] {
            g.set_active(true, &mut rng);
            assert_eq!(g.blocks.len(), 3 + DECOYS);
            assert!(!g.is_assembled());
            for (i, b) in g.blocks.iter().enumerate() {
                assert!(in_bounds(&b.shape, b.x, b.y));
                assert!(g.fits(&b.shape, b.x, b.y, Some(i)));
            }
        }
    }

    #[test]
    fn dragging_crossbar_between_legs_wins() {
        let (mut g, mut rng) = staged(
            Layout::A,
            vec![
                block(Part::LegLeft, 10, 5),
                block(Part::LegRight, 15, 5),
                block(Part::Crossbar, 13, 10),
            ],
        );
        g.cursor = (13, 10);
        assert!(g.handle(MiniInput::Confirm, &mut rng).is_empty());
        assert_eq!(g.held, Some(2));
        assert!(g.handle(MiniInput::Up, &mut rng).is_empty());
        assert!(g.handle(MiniInput::Up, &mut rng).is_empty());
        assert_eq!(g.handle(MiniInput::Up, &mut rng), vec![MinigameSignal::Won]);
        assert!(g.handle(MiniInput::Up, &mut rng).is_empty());
    }

    #[test]
    fn crossbar_touching_one_leg_is_not_enough() {
        let (g, _) = staged(
            Layout::A,
            vec![
                block(Part::LegLeft, 10, 5),
                block(Part::LegRight, 20, 5),
                block(Part::Crossbar, 13, 7),
            ],
        );
        assert!(!g.is_assembled());
    }

    #[test]
    fn blocks_cannot_overlap_or_leave_board() {
        let (mut g, mut rng) = staged(
            Layout::A,
            vec![block(Part::Crossbar, 0, 0), block(Part::Vertical, 4, 0)],
        );
        g.cursor = (0, 0);
        g.handle(MiniInput::Confirm, &mut rng);
        g.handle(MiniInput::Left, &mut rng);
        g.handle(MiniInput::Up, &mut rng);
        assert_eq!((g.blocks[0].x, g.blocks[0].y), (0, 0));
        g.handle(MiniInput::Right, &mut rng);
        g.handle(MiniInput::Right, &mut rng);
        assert_eq!(g.blocks[0].x, 1);
    }

    #[test]
    fn zhe_needs_slashes_on_both_sides() {
        let both = vec![
            block(Part::SlashLeft, 6, 0),
            block(Part::Vertical, 10, 0),
            block(Part::SlashRight, 11, 0),
        ];
        let (g, _) = staged(Layout::Zhe, both);
        assert!(g.is_assembled());

        let same_side = vec![
            block(Part::Vertical, 10, 0),
            block(Part::SlashLeft, 11, 0),
            block(Part::SlashRight, 11, 5),
        ];
        let (g, _) = staged(Layout::Zhe, same_side);
        assert!(!g.is_assembled());
    }

    #[test]
    fn drop_without_win_keeps_playing() {
        let (mut g, mut rng) = staged(
            Layout::A,
            vec![block(Part::LegLeft, 0, 0), block(Part::LegRight, 20, 0), block(Part::Crossbar, 10, 10)],
        );
        g.cursor = (10, 10);
        g.handle(MiniInput::Confirm, &mut rng);
        assert!(g.handle(MiniInput::Confirm, &mut rng).is_empty());
        assert!(g.held.is_none());
        assert!(!g.finished);
    }

    #[test]
    fn reactivation_rescatters() {
        let (mut g, mut rng) = staged(
            Layout::A,
            vec![block(Part::LegLeft, 10, 5), block(Part::LegRight, 15, 5), block(Part::Crossbar, 13, 7)],
        );
        assert!(g.is_assembled());
        g.set_active(false, &mut rng);
        g.set_active(true, &mut rng);
        assert!(!g.finished);
        assert_eq!(g.blocks.len(), 3 + DECOYS);
    }
}
