/// Hub: the letter board that owns level progress, lives and the
/// minigame slots.
///
/// ## States
///
///   Closed   hub visible, every slot hidden
///   Open(i)  hub hidden, slot i visible
///   Won/Lost terminal popup on screen, everything else inert
///
/// Moving between Closed and Open is a two-step cross-fade driven by the
/// tween scheduler. `transitioning` is held for the whole chain and any
/// open/close request arriving meanwhile is dropped. `force_close_now`
/// is the only thing allowed to cut a chain short; it kills the running
/// fades first so no stale continuation can fire afterwards.
///
/// ## Signals
///
/// Minigames only return `MinigameSignal`s. The hub routes them through
/// `Subscriptions`: win and back for every slot, lose only for the slots
/// whose mode can lose. `teardown` empties the table and every later
/// signal is ignored.
///
/// ## Persistence
///
/// Every registry mutation is saved at once. Store failures are logged by
/// the save layer and never reach the hub.
///
/// ## Eyes
///
/// The progress eyes catch up with the registry when the fill bar settles.
/// Their blink and glow loop on their own tweens until teardown.

use std::collections::BTreeSet;

use rand::Rng;

use super::eyes::Eyes;
use super::intro::{Intro, IntroEvent};
use super::popup::{GamePopup, PopupEvent};
use super::save::{levels, player, player::PlayerProfile};
use super::store::Store;
use super::tween::{Ease, Tweens, VisualId};
use crate::config::GameConfig;
use crate::domain::letter::{LetterId, LETTER_COUNT};
use crate::domain::level::LevelRegistry;
use crate::minigame::flicker::move_cursor;
use crate::minigame::{losing_slots, tick_secs, GameRng, MiniInput, Minigame, MinigameSignal};

/// Level buttons per row on the hub board.
pub const BUTTON_COLS: usize = 11;

const WIN_POPUP: u8 = 0;
const LOSE_POPUP: u8 = 1;
const WIN_TEXT: &str = "Все буквы собраны!";
const LOSE_TEXT: &str = "Жизни закончились";

const BLINK_SECS: f32 = 0.12;
const REOPEN_SECS: f32 = 0.144;
const BLINK_GAP_SECS: (f32, f32) = (2.5, 6.0);
const GLOW_SECS: f32 = 2.4;

// ══════════════════════════════════════════════════════════════
// Events and input
// ══════════════════════════════════════════════════════════════

/// What happened during a hub call. The app shell plays sounds and
/// switches scenes from these.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HubEvent {
    SlotOpened(usize),
    SlotClosed(usize),
    LevelCompleted(LetterId),
    LevelUnlocked(LetterId),
    LifeLost { lives_left: u32 },
    Won,
    Lost,
    LoadEntryScene,
    IntroBlip,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HubInput {
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

impl HubInput {
    fn to_mini(self) -> MiniInput {
        match self {
            HubInput::Up => MiniInput::Up,
            HubInput::Down => MiniInput::Down,
            HubInput::Left => MiniInput::Left,
            HubInput::Right => MiniInput::Right,
            HubInput::Confirm => MiniInput::Confirm,
            HubInput::Back => MiniInput::Back,
            HubInput::Hint => MiniInput::Hint,
            HubInput::Check => MiniInput::Check,
            HubInput::Reset => MiniInput::Reset,
        }
    }
}

// ══════════════════════════════════════════════════════════════
// State pieces
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Terminal {
    Won,
    Lost,
}

/// Per-session counters. Never persisted.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SessionState {
    pub lives: u32,
    pub current_open: Option<usize>,
    pub transitioning: bool,
}

/// A faded element: the hub board or one minigame slot.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Fade {
    pub alpha: f32,
    pub visible: bool,
    pub interactive: bool,
}

impl Fade {
    fn shown() -> Self {
        Fade { alpha: 1.0, visible: true, interactive: true }
    }

    fn hidden() -> Self {
        Fade { alpha: 0.0, visible: false, interactive: false }
    }
}

/// One button on the hub board.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LevelButton {
    pub id: LetterId,
    pub interactive: bool,
    pub completed: bool,
}

/// Which signal sources the hub currently listens to.
#[derive(Clone, Debug, Default)]
pub struct Subscriptions {
    pub intro: bool,
    pub terminal: bool,
    pub win: BTreeSet<usize>,
    pub lose: BTreeSet<usize>,
    pub back: BTreeSet<usize>,
}

impl Subscriptions {
    fn clear(&mut self) {
        *self = Subscriptions::default();
    }
}

struct SlotHost {
    game: Box<dyn Minigame>,
    fade: Fade,
}

/// Continuations of the hub's fades.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Step {
    HubFadedOut(usize),
    SlotFadedIn(usize),
    SlotFadedOut(usize),
    HubFadedIn,
    HubRevealed,
    FillSettled,
    BlinkDue,
    EyesShut,
    EyesOpened,
    GlowTurned { rising: bool },
}

/// Eye animation lengths in ticks.
#[derive(Clone, Copy, Debug)]
struct EyeTiming {
    shut: u32,
    reopen: u32,
    gap: (u32, u32),
    glow: u32,
}

impl EyeTiming {
    fn from_config(config: &GameConfig) -> Self {
        let dt = tick_secs(config);
        let ticks = |secs: f32| if dt > 0.0 { (secs / dt).round().max(1.0) as u32 } else { 1 };
        EyeTiming {
            shut: ticks(BLINK_SECS),
            reopen: ticks(REOPEN_SECS),
            gap: (ticks(BLINK_GAP_SECS.0), ticks(BLINK_GAP_SECS.1)),
            glow: ticks(GLOW_SECS),
        }
    }
}

/// Bind buttons to letters. An explicit key or glyph from the config wins,
/// otherwise the button takes its position. A letter is bound once.
fn bind_buttons(explicit: &[String]) -> Vec<LevelButton> {
    let mut seen = BTreeSet::new();
    let mut buttons = Vec::with_capacity(LETTER_COUNT);
    for pos in 0..LETTER_COUNT {
        let bound = explicit.get(pos).and_then(|s| {
            let s = s.trim();
            LetterId::from_key(s).or_else(|| {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => LetterId::from_glyph(c),
                    _ => None,
                }
            })
        });
        let Some(id) = bound.or_else(|| LetterId::from_index(pos)) else {
            continue;
        };
        if !seen.insert(id) {
            log::debug!("button {pos}: {id} already bound, skipped");
            continue;
        }
        buttons.push(LevelButton { id, interactive: false, completed: false });
    }
    buttons
}

// ══════════════════════════════════════════════════════════════
// Hub
// ══════════════════════════════════════════════════════════════

pub struct Hub {
    fade_ticks: u32,
    fill_ticks: u32,
    starting_lives: u32,

    profile: PlayerProfile,
    registry: LevelRegistry,
    session: SessionState,
    terminal: Option<Terminal>,

    board: Fade,
    buttons: Vec<LevelButton>,
    cursor: usize,
    fill: f32,
    slots: Vec<SlotHost>,
    eyes: Eyes,
    eye_timing: EyeTiming,
    glow: f32,

    intro: Intro,
    win_popup: GamePopup,
    lose_popup: GamePopup,

    subs: Subscriptions,
    tweens: Tweens<Step>,
    events: Vec<HubEvent>,
}

impl Hub {
    /// Build the hub and run the startup sequence.
    pub fn start(config: &GameConfig, store: &mut dyn Store, slots: Vec<Box<dyn Minigame>>, rng: &mut GameRng) -> Self {
        let fade_ticks = config.speed.fade_ticks;
        let mut hub = Hub {
            fade_ticks,
            fill_ticks: config.speed.progress_fill_ticks,
            starting_lives: config.hub.starting_lives,
            profile: PlayerProfile::default(),
            registry: LevelRegistry::new(),
            session: SessionState { lives: 0, current_open: None, transitioning: false },
            terminal: None,
            board: Fade::shown(),
            buttons: Vec::new(),
            cursor: 0,
            fill: 0.0,
            slots: Vec::new(),
            eyes: Eyes::new(),
            eye_timing: EyeTiming::from_config(config),
            glow: 0.0,
            intro: Intro::new(&config.intro),
            win_popup: GamePopup::new(WIN_POPUP, WIN_TEXT, fade_ticks),
            lose_popup: GamePopup::new(LOSE_POPUP, LOSE_TEXT, fade_ticks),
            subs: Subscriptions::default(),
            tweens: Tweens::new(),
            events: Vec::new(),
        };

        // Profile and intro
        hub.profile = player::load_or_default(store);
        if hub.profile.intro_completed {
            hub.board = Fade::shown();
        } else {
            hub.board = Fade::hidden();
            hub.intro.show();
            hub.subs.intro = true;
        }

        // Level records
        hub.registry = levels::load_or_create_complete_set(store);
        levels::ensure_first_unlocked(store, &mut hub.registry);

        // Buttons
        hub.buttons = bind_buttons(&config.hub.button_letters);
        hub.refresh_visuals();
        hub.fill = hub.registry.completion_fraction();
        hub.eyes.set_progress(hub.registry.completed_count(), hub.registry.len());
        hub.schedule_blink(rng);
        hub.tweens.start(VisualId::EyeGlow, 0.0, 1.0, hub.eye_timing.glow, Ease::InOutSine, Step::GlowTurned { rising: false });

        // Lives
        hub.session.lives = hub.starting_lives;

        // Slots
        let mut slots = slots;
        for game in &mut slots {
            game.set_active(false, rng);
        }
        hub.subs.lose = losing_slots(&slots).into_iter().collect();
        hub.slots = slots
            .into_iter()
            .map(|game| SlotHost { game, fade: Fade::hidden() })
            .collect();
        hub.subs.win = (0..hub.slots.len()).collect();
        hub.subs.back = (0..hub.slots.len()).collect();

        // Terminal popups
        hub.subs.terminal = true;

        log::info!(
            "hub started: {} slots, {}/{} complete, intro {}",
            hub.slots.len(),
            hub.registry.completed_count(),
            hub.registry.len(),
            if hub.profile.intro_completed { "done" } else { "pending" },
        );
        hub
    }

    /// Drop every subscription. Signals arriving afterwards do nothing.
    pub fn teardown(&mut self) {
        self.subs.clear();
        self.tweens.kill_all();
        log::debug!("hub torn down");
    }

    // ── Intro ──

    pub fn on_intro_finished(&mut self, store: &mut dyn Store) {
        if !self.subs.intro {
            return;
        }
        self.subs.intro = false;
        self.profile.intro_completed = true;
        player::save(store, &self.profile);
        self.board.visible = true;
        self.tweens.start(VisualId::Hub, self.board.alpha, 1.0, self.fade_ticks, Ease::Linear, Step::HubRevealed);
    }

    // ── Open / close ──

    pub fn request_open(&mut self, id: LetterId) {
        let i = id.index();
        if self.terminal.is_some()
            || self.session.transitioning
            || self.session.current_open.is_some()
            || !self.registry.is_unlocked(id)
            || i >= self.slots.len()
        {
            log::debug!("open {id} ignored");
            return;
        }
        self.session.transitioning = true;
        self.board.interactive = false;
        self.tweens.start(VisualId::Hub, self.board.alpha, 0.0, self.fade_ticks, Ease::Linear, Step::HubFadedOut(i));
    }

    pub fn request_close(&mut self, i: usize) {
        if self.terminal.is_some() || self.session.transitioning || self.session.current_open != Some(i) {
            return;
        }
        let Some(slot) = self.slots.get_mut(i) else {
            return;
        };
        self.session.transitioning = true;
        slot.fade.interactive = false;
        let from = slot.fade.alpha;
        self.tweens.start(VisualId::Slot(i), from, 0.0, self.fade_ticks, Ease::Linear, Step::SlotFadedOut(i));
    }

    /// Snap slot `i` shut and the hub back, cancelling any running fade.
    pub fn force_close_now(&mut self, i: usize, rng: &mut GameRng) {
        self.tweens.kill(VisualId::Slot(i));
        self.tweens.kill(VisualId::Hub);
        if let Some(slot) = self.slots.get_mut(i) {
            slot.game.set_active(false, rng);
            slot.fade = Fade::hidden();
        }
        self.board = Fade::shown();
        if self.session.current_open.take().is_some() {
            self.events.push(HubEvent::SlotClosed(i));
        }
        self.session.transitioning = false;
    }

    // ── Outcomes ──

    pub fn on_game_won(&mut self, i: usize, store: &mut dyn Store) {
        if self.terminal.is_some() {
            return;
        }
        let Some(id) = self.registry.at(i).map(|r| r.id) else {
            return;
        };
        let outcome = self.registry.complete(i);
        levels::save(store, &self.registry);
        if outcome.completed_now {
            log::info!("level {id} completed");
            self.events.push(HubEvent::LevelCompleted(id));
        }
        if let Some(next) = outcome.unlocked_next {
            log::info!("level {next} unlocked");
            self.events.push(HubEvent::LevelUnlocked(next));
        }

        self.refresh_visuals();

        if self.session.current_open == Some(i) {
            self.request_close(i);
        }

        let target = self.registry.completion_fraction();
        self.tweens.start(VisualId::ProgressFill, self.fill, target, self.fill_ticks, Ease::OutSine, Step::FillSettled);

        if self.registry.all_completed() {
            self.enter_terminal(Terminal::Won);
        }
    }

    pub fn on_game_lost(&mut self, i: usize, rng: &mut GameRng) {
        if self.terminal.is_some() {
            return;
        }
        self.session.lives = self.session.lives.saturating_sub(1);
        self.events.push(HubEvent::LifeLost { lives_left: self.session.lives });
        log::info!("slot {i} lost, {} lives left", self.session.lives);

        let open_here = self.session.current_open == Some(i);
        if self.session.lives == 0 {
            if open_here {
                self.force_close_now(i, rng);
            }
            self.enter_terminal(Terminal::Lost);
        } else if open_here {
            self.request_close(i);
        }
    }

    fn enter_terminal(&mut self, kind: Terminal) {
        if self.terminal.is_some() {
            return;
        }
        self.terminal = Some(kind);
        self.board.interactive = false;
        match kind {
            Terminal::Won => {
                self.events.push(HubEvent::Won);
                self.win_popup.show(None, None);
            }
            Terminal::Lost => {
                self.events.push(HubEvent::Lost);
                self.lose_popup.show(None, None);
            }
        }
        log::info!("hub entered {kind:?}");
    }

    /// Dismiss the terminal popup once it is fully shown.
    pub fn acknowledge_terminal(&mut self) {
        match self.terminal {
            Some(Terminal::Won) if self.win_popup.is_interactive() => self.win_popup.hide(),
            Some(Terminal::Lost) if self.lose_popup.is_interactive() => self.lose_popup.hide(),
            _ => {}
        }
    }

    fn resolve_terminal(&mut self, kind: Terminal, store: &mut dyn Store) {
        if !self.subs.terminal || self.terminal != Some(kind) {
            return;
        }
        if kind == Terminal::Lost {
            player::delete_all(store);
            levels::delete_all(store);
            log::info!("progress wiped");
        }
        self.events.push(HubEvent::LoadEntryScene);
    }

    // ── Visuals ──

    /// Mirror the registry onto the level buttons.
    pub fn refresh_visuals(&mut self) {
        for b in &mut self.buttons {
            let rec = self.registry.get(b.id);
            b.interactive = rec.unlocked;
            b.completed = rec.is_completed();
        }
    }

    // ── Frame ──

    pub fn tick(&mut self, store: &mut dyn Store, rng: &mut GameRng) -> Vec<HubEvent> {
        let frame = self.tweens.advance();
        for (visual, v) in frame.values {
            match visual {
                VisualId::Hub => self.board.alpha = v,
                VisualId::Slot(i) => {
                    if let Some(s) = self.slots.get_mut(i) {
                        s.fade.alpha = v;
                    }
                }
                VisualId::ProgressFill => self.fill = v,
                VisualId::EyeBlink => self.eyes.set_blink(v),
                VisualId::EyeGlow => self.glow = v,
                _ => {}
            }
        }
        for step in frame.done {
            self.run_step(step, rng);
        }

        for ev in self.intro.tick() {
            if !self.subs.intro {
                continue;
            }
            match ev {
                IntroEvent::Blip => self.events.push(HubEvent::IntroBlip),
                IntroEvent::Finished => self.on_intro_finished(store),
            }
        }

        let won_hidden = self.win_popup.tick().contains(&PopupEvent::Hidden);
        let lost_hidden = self.lose_popup.tick().contains(&PopupEvent::Hidden);
        if won_hidden {
            self.resolve_terminal(Terminal::Won, store);
        }
        if lost_hidden {
            self.resolve_terminal(Terminal::Lost, store);
        }

        if let Some(i) = self.session.current_open {
            let signals = match self.slots.get_mut(i) {
                Some(slot) if slot.game.is_active() => slot.game.tick(rng),
                _ => Vec::new(),
            };
            for sig in signals {
                self.route(i, sig, store, rng);
            }
        }

        std::mem::take(&mut self.events)
    }

    fn run_step(&mut self, step: Step, rng: &mut GameRng) {
        match step {
            Step::HubFadedOut(i) => {
                self.board.visible = false;
                let Some(slot) = self.slots.get_mut(i) else {
                    self.session.transitioning = false;
                    return;
                };
                slot.game.set_active(true, rng);
                slot.fade = Fade { alpha: 0.0, visible: true, interactive: false };
                self.session.current_open = Some(i);
                self.events.push(HubEvent::SlotOpened(i));
                self.tweens.start(VisualId::Slot(i), 0.0, 1.0, self.fade_ticks, Ease::Linear, Step::SlotFadedIn(i));
            }
            Step::SlotFadedIn(i) => {
                if let Some(slot) = self.slots.get_mut(i) {
                    slot.fade.interactive = true;
                }
                self.session.transitioning = false;
            }
            Step::SlotFadedOut(i) => {
                if let Some(slot) = self.slots.get_mut(i) {
                    slot.game.set_active(false, rng);
                    slot.fade = Fade::hidden();
                }
                self.session.current_open = None;
                self.events.push(HubEvent::SlotClosed(i));
                self.board.visible = true;
                self.tweens.start(VisualId::Hub, self.board.alpha, 1.0, self.fade_ticks, Ease::Linear, Step::HubFadedIn);
            }
            Step::HubFadedIn => {
                self.board.interactive = self.terminal.is_none();
                self.session.transitioning = false;
            }
            Step::HubRevealed => self.board.interactive = self.terminal.is_none(),
            Step::FillSettled => {
                self.eyes.set_progress(self.registry.completed_count(), self.registry.len());
                log::debug!("eyes at {}/{}", self.eyes.revealed(), self.eyes.cell_count());
            }
            Step::BlinkDue => {
                let t = self.eye_timing.shut;
                self.tweens.start(VisualId::EyeBlink, 0.0, 1.0, t, Ease::InQuad, Step::EyesShut);
            }
            Step::EyesShut => {
                let t = self.eye_timing.reopen;
                self.tweens.start(VisualId::EyeBlink, 1.0, 0.0, t, Ease::OutQuad, Step::EyesOpened);
            }
            Step::EyesOpened => self.schedule_blink(rng),
            Step::GlowTurned { rising } => {
                let (from, to) = if rising { (0.0, 1.0) } else { (1.0, 0.0) };
                let next = Step::GlowTurned { rising: !rising };
                self.tweens.start(VisualId::EyeGlow, from, to, self.eye_timing.glow, Ease::InOutSine, next);
            }
        }
    }

    /// Wait a random gap, then blink. A blink already under way is left alone.
    fn schedule_blink(&mut self, rng: &mut GameRng) {
        if self.tweens.is_running(VisualId::EyeBlink) {
            return;
        }
        let (lo, hi) = self.eye_timing.gap;
        let wait = rng.random_range(lo..=hi.max(lo));
        self.tweens.start(VisualId::EyeBlink, 0.0, 0.0, wait, Ease::Linear, Step::BlinkDue);
    }

    fn route(&mut self, i: usize, signal: MinigameSignal, store: &mut dyn Store, rng: &mut GameRng) {
        match signal {
            MinigameSignal::Won if self.subs.win.contains(&i) => self.on_game_won(i, store),
            MinigameSignal::Lost if self.subs.lose.contains(&i) => self.on_game_lost(i, rng),
            MinigameSignal::BackRequested if self.subs.back.contains(&i) => self.request_close(i),
            _ => {}
        }
    }

    pub fn handle(&mut self, input: HubInput, store: &mut dyn Store, rng: &mut GameRng) -> Vec<HubEvent> {
        if self.terminal.is_some() {
            if matches!(input, HubInput::Confirm | HubInput::Back) {
                self.acknowledge_terminal();
            }
        } else if self.intro.is_shown() {
            if input == HubInput::Confirm {
                self.intro.confirm();
            }
        } else if let Some(i) = self.session.current_open {
            let signals = match self.slots.get_mut(i) {
                Some(slot) if slot.fade.interactive => slot.game.handle(input.to_mini(), rng),
                _ => Vec::new(),
            };
            for sig in signals {
                self.route(i, sig, store, rng);
            }
        } else if self.board.interactive {
            let n = self.buttons.len();
            match input {
                HubInput::Left => self.cursor = move_cursor(self.cursor, BUTTON_COLS, n, -1, 0),
                HubInput::Right => self.cursor = move_cursor(self.cursor, BUTTON_COLS, n, 1, 0),
                HubInput::Up => self.cursor = move_cursor(self.cursor, BUTTON_COLS, n, 0, -1),
                HubInput::Down => self.cursor = move_cursor(self.cursor, BUTTON_COLS, n, 0, 1),
                HubInput::Confirm => {
                    if let Some(b) = self.buttons.get(self.cursor).filter(|b| b.interactive) {
                        let id = b.id;
                        self.request_open(id);
                    }
                }
                _ => {}
            }
        }
        std::mem::take(&mut self.events)
    }

    // ── Leaving ──

    /// Whether the player may walk out to the menu. A terminal popup has
    /// to be acknowledged first so its resolution runs.
    pub fn can_leave(&self) -> bool {
        self.terminal.is_none()
    }

    /// The board has focus and nothing is on top of it.
    pub fn at_rest(&self) -> bool {
        self.can_leave()
            && self.session.current_open.is_none()
            && !self.intro.is_shown()
            && self.board.interactive
    }

    // ── Read access for the renderer ──

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn lives(&self) -> u32 {
        self.session.lives
    }

    pub fn terminal(&self) -> Option<Terminal> {
        self.terminal
    }

    pub fn registry(&self) -> &LevelRegistry {
        &self.registry
    }

    pub fn board(&self) -> Fade {
        self.board
    }

    pub fn buttons(&self) -> &[LevelButton] {
        &self.buttons
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether button `id` opens a playable slot.
    pub fn has_slot(&self, id: LetterId) -> bool {
        id.index() < self.slots.len()
    }

    /// The slot on screen, if any, with its fade.
    pub fn open_slot(&self) -> Option<(&dyn Minigame, Fade)> {
        let i = self.session.current_open?;
        self.slots.get(i).map(|s| (s.game.as_ref(), s.fade))
    }

    /// Level bound to the open slot. Slot i plays level i, which is not
    /// always the letter the game itself builds.
    pub fn open_level(&self) -> Option<LetterId> {
        let i = self.session.current_open?;
        self.registry.at(i).map(|r| r.id)
    }

    pub fn eyes(&self) -> &Eyes {
        &self.eyes
    }

    /// Eye colour pulse, 0..1.
    pub fn eye_glow(&self) -> f32 {
        self.glow
    }

    pub fn intro(&self) -> &Intro {
        &self.intro
    }

    pub fn popups(&self) -> [&GamePopup; 2] {
        [&self.win_popup, &self.lose_popup]
    }

    pub fn completed_count(&self) -> usize {
        self.registry.completed_count()
    }

    /// Animated fill of the overall progress bar, 0..1.
    pub fn progress_fill(&self) -> f32 {
        self.fill
    }

    pub fn percent_text(&self) -> String {
        format!("{}%", (self.registry.completion_fraction() * 100.0).round() as u32)
    }

    #[cfg(test)]
    fn subscriptions(&self) -> &Subscriptions {
        &self.subs
    }
}
