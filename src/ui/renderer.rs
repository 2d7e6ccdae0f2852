/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Fades are drawn by blending a colour toward the background, so a
/// half-faded hub is simply a dimmer hub.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::letter::LetterId;
use crate::minigame::{Glyph, MiniView, Minigame, Tone};
use crate::sim::eyes::{FILL, LID};
use crate::sim::hub::{Hub, Terminal, BUTTON_COLS};
use crate::sim::menu::{linear_to_db, percent_text, MainMenu, Slider, MENU_ITEMS};
use crate::sim::popup::GamePopup;

/// What the main loop wants on screen this frame.
pub enum Screen<'a> {
    Menu(&'a MainMenu),
    Hub(&'a Hub),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum SceneKind {
    Menu,
    Hub,
}

// ── Colours ──

type Rgb = (u8, u8, u8);

const BG: Rgb = (22, 22, 35);
const WHITE: Rgb = (230, 230, 230);
const DIM: Rgb = (110, 110, 130);
const ACCENT: Rgb = (255, 200, 50);
const GOOD: Rgb = (80, 255, 80);
const BAD: Rgb = (255, 80, 80);
const HINT: Rgb = (100, 200, 255);
const PANEL: Rgb = (40, 40, 60);
const PALETTE: [Rgb; 6] = [
    (255, 140, 60),
    (120, 200, 255),
    (200, 120, 255),
    (255, 220, 90),
    (90, 230, 170),
    (255, 110, 160),
];

/// Eye glow swings between these two.
const GLOW_WARM: Rgb = (255, 213, 128);
const GLOW_PALE: Rgb = (255, 250, 224);
/// Columns between the two eyes.
const EYE_GAP: usize = 2;

/// Glyphs that stand in for a locked letter; they churn every few frames.
const NOISE: [char; 6] = ['░', '▒', '▓', '#', '%', '?'];

fn tone_rgb(tone: Tone) -> Rgb {
    match tone {
        Tone::Normal => WHITE,
        Tone::Dim => DIM,
        Tone::Accent => ACCENT,
        Tone::Good => GOOD,
        Tone::Bad => BAD,
        Tone::Hint => HINT,
        Tone::Palette(i) => PALETTE[i as usize % PALETTE.len()],
    }
}

/// Mix `c` toward the background; `alpha` 0 is invisible, 1 is full.
fn blend(c: Rgb, alpha: f32) -> Color {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |fg: u8, bg: u8| (bg as f32 + (fg as f32 - bg as f32) * a).round() as u8;
    Color::Rgb { r: mix(c.0, BG.0), g: mix(c.1, BG.1), b: mix(c.2, BG.2) }
}

fn rgb(c: Rgb) -> Color {
    blend(c, 1.0)
}

fn lerp_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Minigame header. Names the level when the board builds another letter.
fn slot_title(level: Option<LetterId>, game: &dyn Minigame) -> String {
    match level {
        Some(id) if id != game.letter() => format!("{}  ·  {}", id.glyph(), game.title()),
        _ => format!("{}  ·  {}", game.letter().glyph(), game.title()),
    }
}

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: [u8; 4],
    ch_len: u8,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for every cell, also used for `Clear`,
    /// so terminals that paint inter-row gaps with the clear colour show
    /// no seams.
    const BASE_BG: Color = Color::Rgb { r: BG.0, g: BG.1, b: BG.2 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0, 0, 0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
    };

    /// Normalize bg: Color::Reset → BASE_BG so that every cell gets an
    /// explicit background colour (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        cell.ch_len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or(" ")
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colours. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width {
                break;
            }
            self.set(x + i, y, Cell::from_char(ch, fg, bg));
        }
    }

    /// `put_str` centred on the buffer width.
    fn put_centered(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        let x = self.width.saturating_sub(s.chars().count()) / 2;
        self.put_str(x, y, s, fg, bg);
    }

    fn fill(&mut self, x: usize, y: usize, w: usize, h: usize, bg: Color) {
        for row in y..y + h {
            for col in x..x + w {
                self.set(col, row, Cell::from_char(' ', Color::White, bg));
            }
        }
    }

    /// Single-line box outline.
    fn frame(&mut self, x: usize, y: usize, w: usize, h: usize, fg: Color, bg: Color) {
        if w < 2 || h < 2 {
            return;
        }
        for col in x + 1..x + w - 1 {
            self.set(col, y, Cell::from_char('─', fg, bg));
            self.set(col, y + h - 1, Cell::from_char('─', fg, bg));
        }
        for row in y + 1..y + h - 1 {
            self.set(x, row, Cell::from_char('│', fg, bg));
            self.set(x + w - 1, row, Cell::from_char('│', fg, bg));
        }
        self.set(x, y, Cell::from_char('┌', fg, bg));
        self.set(x + w - 1, y, Cell::from_char('┐', fg, bg));
        self.set(x, y + h - 1, Cell::from_char('└', fg, bg));
        self.set(x + w - 1, y + h - 1, Cell::from_char('┘', fg, bg));
    }
}

// ── Renderer ──

const HUD_ROW: usize = 0;
const BOARD_ROW: usize = 3;
/// Terminal columns per level button.
const BUTTON_W: usize = 5;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_scene: Option<SceneKind>,
    frame: u64,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_scene: None,
            frame: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, screen: Screen) -> io::Result<()> {
        self.frame = self.frame.wrapping_add(1);

        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Scene change → clear for a clean switch
        let kind = match screen {
            Screen::Menu(_) => SceneKind::Menu,
            Screen::Hub(_) => SceneKind::Hub,
        };
        if self.last_scene != Some(kind) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_scene = Some(kind);
        }

        self.front.clear();
        match screen {
            Screen::Menu(menu) => self.compose_menu(menu),
            Screen::Hub(hub) => self.compose_hub(hub),
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colours; ResetColor would fall back to the
        // terminal's own default and leave seams.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ══════════════════════════════════════════════════════════
    // Main menu
    // ══════════════════════════════════════════════════════════

    fn compose_menu(&mut self, menu: &MainMenu) {
        let title = [
            "╔═══════════════════════╗",
            "║   Б  У  К  В  А  Р Ь  ║",
            "╚═══════════════════════╝",
        ];
        for (i, line) in title.iter().enumerate() {
            self.front.put_centered(2 + i, line, rgb(ACCENT), Color::Reset);
        }

        // Letters drift under the title
        let wave: String = "АБВГДЕЁЖ"
            .chars()
            .enumerate()
            .map(|(i, c)| if (menu.anim_tick as usize / 6 + i) % 4 == 0 { c } else { '·' })
            .collect();
        self.front.put_centered(6, &wave, rgb(HINT), Color::Reset);

        for (i, item) in MENU_ITEMS.iter().enumerate() {
            let selected = i == menu.cursor;
            let label = if selected {
                format!("▸ {} ◂", item.label())
            } else {
                format!("  {}  ", item.label())
            };
            let fg = if selected { rgb(GOOD) } else { rgb(WHITE) };
            self.front.put_centered(9 + i * 2, &label, fg, Color::Reset);
        }

        let help = "↑↓ выбор   Enter подтвердить   Tab настройки   Esc выход";
        let row = self.front.height.saturating_sub(2);
        self.front.put_centered(row, help, rgb(DIM), Color::Reset);

        if menu.settings.is_active() {
            self.compose_settings(menu);
        }
    }

    fn compose_settings(&mut self, menu: &MainMenu) {
        let panel = &menu.settings;
        let scale = panel.scale().clamp(0.0, 1.2);
        let full_w = 44.min(self.front.width);
        let full_h = 9.min(self.front.height);
        let w = ((full_w as f32 * scale) as usize).clamp(2, full_w.max(2));
        let h = ((full_h as f32 * scale) as usize).clamp(2, full_h.max(2));
        let x = self.front.width.saturating_sub(w) / 2;
        let y = self.front.height.saturating_sub(h) / 2;

        self.front.fill(x, y, w, h, rgb(PANEL));
        self.front.frame(x, y, w, h, rgb(ACCENT), rgb(PANEL));
        // Contents only once the panel is big enough to hold them
        if panel.is_animating() && scale < 0.9 {
            return;
        }

        self.front.put_str(x + 2, y + 1, "Настройки", rgb(ACCENT), rgb(PANEL));
        let values = panel.values();
        for (row, slider, label, value) in [
            (y + 3, Slider::Music, "Музыка", values.music_volume),
            (y + 5, Slider::Sfx, "Звуки ", values.sfx_volume),
        ] {
            let focused = panel.focus() == slider;
            let fg = if focused { rgb(GOOD) } else { rgb(WHITE) };
            let filled = (value * 10.0).round() as usize;
            let bar: String = (0..10).map(|i| if i < filled { '█' } else { '░' }).collect();
            let line = format!(
                "{}{} {} {:>4} {:>6.1} dB",
                if focused { "▸" } else { " " },
                label,
                bar,
                percent_text(value),
                linear_to_db(value),
            );
            self.front.put_str(x + 2, row, &line, fg, rgb(PANEL));
        }
        self.front.put_str(x + 2, y + h - 2, "←→ громкость  ↑↓ ползунок  Esc", rgb(DIM), rgb(PANEL));
    }

    // ══════════════════════════════════════════════════════════
    // Hub
    // ══════════════════════════════════════════════════════════

    fn compose_hub(&mut self, hub: &Hub) {
        self.compose_hud(hub);

        let board = hub.board();
        if board.visible {
            self.compose_buttons(hub, board.alpha, board.interactive);
            self.compose_eyes(hub, board.alpha);
        }

        if let Some((game, fade)) = hub.open_slot() {
            if fade.visible {
                let title = slot_title(hub.open_level(), game);
                self.compose_minigame(&title, &game.view(), fade.alpha);
            }
        }

        if hub.intro().is_shown() {
            self.compose_intro(hub);
        }

        for popup in hub.popups() {
            if popup.is_active() {
                self.compose_popup(popup, hub.terminal());
            }
        }
    }

    fn compose_hud(&mut self, hub: &Hub) {
        let hearts: String = (0..hub.lives()).map(|_| '♥').collect();
        self.front.put_str(2, HUD_ROW, &format!("Жизни: {hearts}"), rgb(BAD), Color::Reset);

        // Progress bar with animated fill
        let bar_w = 20;
        let filled = (hub.progress_fill().clamp(0.0, 1.0) * bar_w as f32).round() as usize;
        let bar: String = (0..bar_w).map(|i| if i < filled { '█' } else { '░' }).collect();
        let text = format!(
            "{}  {}/{}  {}",
            bar,
            hub.completed_count(),
            hub.registry().len(),
            hub.percent_text(),
        );
        let x = self.front.width.saturating_sub(text.chars().count() + 2);
        self.front.put_str(x, HUD_ROW, &text, rgb(GOOD), Color::Reset);

        if hub.session().transitioning {
            self.front.put_str(2, HUD_ROW + 1, "…", rgb(DIM), Color::Reset);
        }
    }

    fn compose_buttons(&mut self, hub: &Hub, alpha: f32, interactive: bool) {
        let grid_w = BUTTON_COLS * BUTTON_W;
        let x0 = self.front.width.saturating_sub(grid_w) / 2;
        let churn = (self.frame / 6) as usize;

        for (i, button) in hub.buttons().iter().enumerate() {
            let col = x0 + (i % BUTTON_COLS) * BUTTON_W;
            let row = BOARD_ROW + (i / BUTTON_COLS) * 2;
            let selected = interactive && i == hub.cursor();

            let (ch, color) = if !button.interactive {
                (NOISE[(churn + i * 7) % NOISE.len()], DIM)
            } else if button.completed {
                (button.id.glyph(), GOOD)
            } else if hub.has_slot(button.id) {
                (button.id.glyph(), WHITE)
            } else {
                (button.id.glyph(), DIM)
            };

            let (fg, bg) = if selected {
                (rgb(BG), blend(ACCENT, alpha))
            } else {
                (blend(color, alpha), Color::Reset)
            };
            self.front.put_str(col, row, &format!("[{ch}]"), fg, bg);
        }

        let help_row = BOARD_ROW + hub.buttons().len().div_ceil(BUTTON_COLS) * 2 + 1;
        self.front.put_centered(
            help_row,
            "←→↑↓ выбор буквы   Enter играть   q выход",
            blend(DIM, alpha),
            Color::Reset,
        );
    }

    /// Two eyes under the board help line.
    fn compose_eyes(&mut self, hub: &Hub, alpha: f32) {
        let eyes = hub.eyes();
        let w = eyes.width() * 2 + EYE_GAP;
        let x0 = self.front.width.saturating_sub(w) / 2;
        let y0 = BOARD_ROW + hub.buttons().len().div_ceil(BUTTON_COLS) * 2 + 3;
        let glow = blend(lerp_rgb(GLOW_WARM, GLOW_PALE, hub.eye_glow()), alpha);
        let lid = blend(DIM, alpha);

        for (dy, row) in eyes.rows().iter().enumerate() {
            for (dx, ch) in row.chars().enumerate() {
                let fg = match ch {
                    FILL => glow,
                    LID => lid,
                    _ => continue,
                };
                let cell = Cell::from_char(ch, fg, Color::Reset);
                self.front.set(x0 + dx, y0 + dy, cell);
                self.front.set(x0 + eyes.width() + EYE_GAP + dx, y0 + dy, cell);
            }
        }
    }

    fn compose_minigame(&mut self, title: &str, view: &MiniView, alpha: f32) {
        let w = view.width as usize + 2;
        let h = view.height as usize + 2;
        let base_x = self.front.width.saturating_sub(w) / 2;
        let x0 = (base_x as i64 + view.shake as i64).max(0) as usize;
        let y0 = BOARD_ROW;

        self.front.fill(base_x.saturating_sub(2), y0 - 1, w + 4, h + 4, Cell::BASE_BG);
        self.front.put_centered(y0 - 1, title, blend(ACCENT, alpha), Color::Reset);
        self.front.frame(x0, y0, w, h, blend(DIM, alpha), Color::Reset);

        for glyph in &view.glyphs {
            self.put_glyph(x0 + 1, y0 + 1, glyph, alpha);
        }

        self.front.put_centered(y0 + h, &view.status, blend(WHITE, alpha), Color::Reset);
        self.front.put_centered(y0 + h + 1, view.help, blend(DIM, alpha), Color::Reset);
    }

    fn put_glyph(&mut self, x0: usize, y0: usize, g: &Glyph, alpha: f32) {
        let color = tone_rgb(g.tone);
        let (fg, bg) = if g.selected {
            (rgb(BG), blend(color, alpha))
        } else {
            (blend(color, alpha), Color::Reset)
        };
        self.front.set(x0 + g.x as usize, y0 + g.y as usize, Cell::from_char(g.ch, fg, bg));
    }

    fn compose_intro(&mut self, hub: &Hub) {
        let intro = hub.intro();
        let h = 5;
        let w = 60.min(self.front.width);
        let rest_y = self.front.height.saturating_sub(h + 1);
        // offset 1.0 puts the panel fully below the screen
        let y = rest_y + (intro.offset().max(0.0) * (h + 1) as f32) as usize;
        let x = self.front.width.saturating_sub(w) / 2;

        self.front.fill(x, y, w, h, rgb(PANEL));
        self.front.frame(x, y, w, h, rgb(HINT), rgb(PANEL));
        self.front.put_str(x + 2, y + 2, &intro.visible_text(), rgb(WHITE), rgb(PANEL));
        if !intro.is_typing() && !intro.visible_text().is_empty() {
            let blink = (self.frame / 10) % 2 == 0;
            if blink {
                self.front.put_str(x + w - 4, y + h - 2, "▼", rgb(HINT), rgb(PANEL));
            }
        }
    }

    fn compose_popup(&mut self, popup: &GamePopup, terminal: Option<Terminal>) {
        let alpha = popup.alpha();
        let text = popup.text();
        let w = (text.chars().count() + 8).max(30).min(self.front.width);
        let h = 7.min(self.front.height);
        let x = self.front.width.saturating_sub(w) / 2;
        let y = self.front.height.saturating_sub(h) / 2;

        let accent = match terminal {
            Some(Terminal::Lost) => BAD,
            _ => GOOD,
        };
        let panel = blend(PANEL, alpha);
        self.front.fill(x, y, w, h, panel);
        self.front.frame(x, y, w, h, blend(accent, alpha), panel);

        let tx = x + w.saturating_sub(text.chars().count()) / 2;
        self.front.put_str(tx, y + 2, text, blend(accent, alpha), panel);
        if popup.is_interactive() {
            let prompt = "Enter: продолжить";
            let px = x + w.saturating_sub(prompt.chars().count()) / 2;
            self.front.put_str(px, y + 4, prompt, rgb(DIM), panel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minigame::assemble::AssembleGame;

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(WHITE, 0.0), Cell::BASE_BG);
        assert_eq!(blend(WHITE, 1.0), Color::Rgb { r: 230, g: 230, b: 230 });
        // Out-of-range alpha is clamped
        assert_eq!(blend(GOOD, 3.0), blend(GOOD, 1.0));
    }

    #[test]
    fn palette_index_wraps() {
        assert_eq!(tone_rgb(Tone::Palette(0)), tone_rgb(Tone::Palette(PALETTE.len() as u8)));
    }

    #[test]
    fn cyrillic_cells_round_trip_text() {
        let cell = Cell::from_char('Ж', Color::White, Color::Reset);
        assert_eq!(cell.as_str(), "Ж");
        assert_eq!(cell.bg, Cell::BASE_BG);
    }

    #[test]
    fn put_str_clips_at_edge() {
        let mut buf = FrameBuffer::new(4, 1);
        buf.put_str(2, 0, "АБВ", Color::White, Color::Reset);
        assert_eq!(buf.get(2, 0).as_str(), "А");
        assert_eq!(buf.get(3, 0).as_str(), "Б");
        assert_eq!(buf.get(5, 0).as_str(), " ");
    }

    #[test]
    fn glow_lerp_hits_both_ends() {
        assert_eq!(lerp_rgb(GLOW_WARM, GLOW_PALE, 0.0), GLOW_WARM);
        assert_eq!(lerp_rgb(GLOW_WARM, GLOW_PALE, 1.0), GLOW_PALE);
        assert_eq!(lerp_rgb(GLOW_WARM, GLOW_PALE, -2.0), GLOW_WARM);
    }

    #[test]
    fn slot_title_names_the_bound_level() {
        let zhe = AssembleGame::letter_zhe();
        let yo = LetterId::from_glyph('Ё').unwrap();
        assert_eq!(slot_title(Some(yo), &zhe), "Ё  ·  Собери Ж");
        let a = AssembleGame::letter_a();
        assert_eq!(slot_title(Some(LetterId::first()), &a), "А  ·  Собери А");
        assert_eq!(slot_title(None, &a), "А  ·  Собери А");
    }

    #[test]
    fn frame_draws_corners() {
        let mut buf = FrameBuffer::new(5, 3);
        buf.frame(0, 0, 5, 3, Color::White, Color::Reset);
        assert_eq!(buf.get(0, 0).as_str(), "┌");
        assert_eq!(buf.get(4, 2).as_str(), "┘");
        assert_eq!(buf.get(2, 1).as_str(), " ");
    }
}
