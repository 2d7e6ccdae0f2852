/// Entry scene: main menu and the settings panel.
///
/// The settings panel scales open/closed and edits two volume sliders.
/// Every slider change is written to the `settings` document right away.

use super::save::settings::{self, Settings};
use super::store::Store;
use super::tween::{Ease, Tweens, VisualId};

const SLIDER_STEP: f32 = 0.1;
const PANEL_TICKS: u32 = 8;
const MIN_DB: f32 = -80.0;

/// Linear 0..1 volume to decibels, floored at -80 dB.
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0001 {
        MIN_DB
    } else {
        (linear.clamp(0.0001, 1.0).log10() * 20.0).max(MIN_DB)
    }
}

pub fn percent_text(linear: f32) -> String {
    format!("{}%", (linear * 100.0).round() as i32)
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MenuInput {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Back,
    Settings,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum MenuCommand {
    Play,
    Quit,
    VolumeChanged(Settings),
}

// ══════════════════════════════════════════════════════════════
// Settings panel
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Slider {
    Music,
    Sfx,
}

#[derive(Clone, Copy, Debug)]
enum PanelStep {
    Opened,
    Closed,
}

pub struct SettingsPanel {
    active: bool,
    scale: f32,
    animating: bool,
    focus: Slider,
    values: Settings,
    tweens: Tweens<PanelStep>,
}

impl SettingsPanel {
    pub fn new(values: Settings) -> Self {
        SettingsPanel {
            active: false,
            scale: 0.0,
            animating: false,
            focus: Slider::Music,
            values: values.clamped(),
            tweens: Tweens::new(),
        }
    }

    pub fn open(&mut self) {
        if self.active && self.scale > 0.99 {
            return;
        }
        self.active = true;
        self.scale = 0.0;
        self.animating = true;
        self.tweens.start(VisualId::Settings, 0.0, 1.0, PANEL_TICKS, Ease::OutBack, PanelStep::Opened);
    }

    /// Ignored while the open/close animation is still running.
    pub fn close(&mut self) {
        if self.animating || !self.active {
            return;
        }
        self.animating = true;
        self.tweens.start(VisualId::Settings, self.scale, 0.0, PANEL_TICKS, Ease::InOutSine, PanelStep::Closed);
    }

    pub fn tick(&mut self) {
        let frame = self.tweens.advance();
        for (_, v) in frame.values {
            self.scale = v;
        }
        for step in frame.done {
            self.animating = false;
            if let PanelStep::Closed = step {
                self.active = false;
            }
        }
    }

    /// Move the focused slider by `steps` and persist.
    pub fn nudge(&mut self, steps: i32, store: &mut dyn Store) -> Settings {
        let step = |v: f32| ((v + steps as f32 * SLIDER_STEP) * 10.0).round() / 10.0;
        match self.focus {
            Slider::Music => self.values.music_volume = step(self.values.music_volume),
            Slider::Sfx => self.values.sfx_volume = step(self.values.sfx_volume),
        }
        self.values = self.values.clamped();
        settings::save(store, &self.values);
        log::debug!(
            "volume music={} ({:.1} dB) sfx={} ({:.1} dB)",
            percent_text(self.values.music_volume),
            linear_to_db(self.values.music_volume),
            percent_text(self.values.sfx_volume),
            linear_to_db(self.values.sfx_volume),
        );
        self.values
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Slider::Music => Slider::Sfx,
            Slider::Sfx => Slider::Music,
        };
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn focus(&self) -> Slider {
        self.focus
    }

    pub fn values(&self) -> Settings {
        self.values
    }
}

// ══════════════════════════════════════════════════════════════
// Main menu
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MenuItem {
    Play,
    Settings,
    Quit,
}

pub const MENU_ITEMS: [MenuItem; 3] = [MenuItem::Play, MenuItem::Settings, MenuItem::Quit];

impl MenuItem {
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Play => "Играть",
            MenuItem::Settings => "Настройки",
            MenuItem::Quit => "Выход",
        }
    }
}

pub struct MainMenu {
    pub cursor: usize,
    pub settings: SettingsPanel,
    pub anim_tick: u32,
}

impl MainMenu {
    pub fn new(store: &dyn Store) -> Self {
        MainMenu {
            cursor: 0,
            settings: SettingsPanel::new(settings::load_or_default(store)),
            anim_tick: 0,
        }
    }

    pub fn tick(&mut self) {
        self.anim_tick = self.anim_tick.wrapping_add(1);
        self.settings.tick();
    }

    pub fn handle(&mut self, input: MenuInput, store: &mut dyn Store) -> Option<MenuCommand> {
        if self.settings.is_active() {
            return match input {
                MenuInput::Left => Some(MenuCommand::VolumeChanged(self.settings.nudge(-1, store))),
                MenuInput::Right => Some(MenuCommand::VolumeChanged(self.settings.nudge(1, store))),
                MenuInput::Up | MenuInput::Down => {
                    self.settings.toggle_focus();
                    None
                }
                MenuInput::Back | MenuInput::Confirm | MenuInput::Settings => {
                    self.settings.close();
                    None
                }
            };
        }

        match input {
            MenuInput::Up => {
                self.cursor = (self.cursor + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
                None
            }
            MenuInput::Down => {
                self.cursor = (self.cursor + 1) % MENU_ITEMS.len();
                None
            }
            MenuInput::Settings => {
                self.settings.open();
                None
            }
            MenuInput::Back => Some(MenuCommand::Quit),
            MenuInput::Confirm => match MENU_ITEMS[self.cursor] {
                MenuItem::Play => Some(MenuCommand::Play),
                MenuItem::Settings => {
                    self.settings.open();
                    None
                }
                MenuItem::Quit => Some(MenuCommand::Quit),
            },
            MenuInput::Left | MenuInput::Right => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::save::SETTINGS_KEY;
    use crate::sim::store::MemoryStore;

    fn settle(menu: &mut MainMenu) {
        for _ in 0..PANEL_TICKS + 2 {
            menu.tick();
        }
    }

    #[test]
    fn db_conversion_has_floor() {
        assert_eq!(linear_to_db(0.0), -80.0);
        assert_eq!(linear_to_db(1.0), 0.0);
        assert!((linear_to_db(0.5) + 6.0206).abs() < 0.01);
        assert_eq!(percent_text(0.7), "70%");
    }

    #[test]
    fn play_from_first_item() {
        let mut store = MemoryStore::new();
        let mut menu = MainMenu::new(&store);
        assert_eq!(menu.handle(MenuInput::Confirm, &mut store), Some(MenuCommand::Play));
    }

    #[test]
    fn cursor_wraps() {
        let mut store = MemoryStore::new();
        let mut menu = MainMenu::new(&store);
        menu.handle(MenuInput::Up, &mut store);
        assert_eq!(MENU_ITEMS[menu.cursor], MenuItem::Quit);
        assert_eq!(menu.handle(MenuInput::Confirm, &mut store), Some(MenuCommand::Quit));
    }

    #[test]
    fn slider_changes_are_persisted() {
        let mut store = MemoryStore::new();
        let mut menu = MainMenu::new(&store);
        menu.handle(MenuInput::Settings, &mut store);
        settle(&mut menu);
        menu.handle(MenuInput::Left, &mut store);
        menu.handle(MenuInput::Left, &mut store);
        menu.handle(MenuInput::Down, &mut store);
        let cmd = menu.handle(MenuInput::Left, &mut store);
        let expected = Settings { music_volume: 0.8, sfx_volume: 0.9 };
        assert_eq!(cmd, Some(MenuCommand::VolumeChanged(expected)));
        assert_eq!(settings::load_or_default(&store), expected);
        assert!(store.contains(SETTINGS_KEY));
    }

    #[test]
    fn slider_clamps_at_full() {
        let mut store = MemoryStore::new();
        let mut panel = SettingsPanel::new(Settings::default());
        let v = panel.nudge(3, &mut store);
        assert_eq!(v.music_volume, 1.0);
    }

    #[test]
    fn close_is_ignored_while_opening() {
        let mut store = MemoryStore::new();
        let mut menu = MainMenu::new(&store);
        menu.handle(MenuInput::Settings, &mut store);
        menu.tick();
        assert!(menu.settings.is_animating());
        menu.handle(MenuInput::Back, &mut store);
        settle(&mut menu);
        assert!(menu.settings.is_active());

        menu.handle(MenuInput::Back, &mut store);
        settle(&mut menu);
        assert!(!menu.settings.is_active());
    }

    #[test]
    fn saved_volumes_load_into_panel() {
        let mut store = MemoryStore::new();
        settings::save(&mut store, &Settings { music_volume: 0.3, sfx_volume: 0.6 });
        let menu = MainMenu::new(&store);
        assert_eq!(menu.settings.values().music_volume, 0.3);
    }
}
