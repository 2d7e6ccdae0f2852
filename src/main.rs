/// Entry point and game loop.
///
/// Two scenes: the main menu and the hub. The hub drives the minigames
/// itself; this file only turns key presses into scene input, turns hub
/// events into sounds and swaps scenes.

mod config;
mod domain;
mod minigame;
mod sim;
mod ui;

use std::fs::File;
use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags};
use crossterm::{execute, terminal};
use rand::SeedableRng;

use config::GameConfig;
use minigame::{build_slots, GameRng};
use sim::hub::{Hub, HubEvent, HubInput};
use sim::menu::{MainMenu, MenuCommand, MenuInput};
use sim::store::{resolve_save_dir, FileStore, Store};
use ui::gamepad::GamepadState;
use ui::input::{Action, InputState};
use ui::renderer::{Renderer, Screen};
use ui::sound::{Sfx, SoundEngine};

const FRAME_SLEEP: Duration = Duration::from_millis(5);

enum Scene {
    MainMenu(MainMenu),
    Hub(Box<Hub>),
}

/// Result of feeding one frame to the current scene.
enum Flow {
    Stay,
    Play,
    ToMenu,
    Quit,
}

fn main() {
    let config = GameConfig::load();
    let save_dir = resolve_save_dir(config.save_dir.as_deref());
    init_logging(&save_dir, &config.log_file);
    log::info!("save directory: {}", save_dir.display());

    let mut store = FileStore::new(save_dir);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    // Release events make held-key tracking exact where supported
    let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && execute!(
            io::stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .is_ok();

    let mut sound = SoundEngine::new();

    let result = game_loop(&mut renderer, sound.as_mut(), &mut store, &config, enhanced);

    if enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("game loop failed: {e}");
        eprintln!("Game error: {e}");
    }
}

/// Logs go to a file next to the saves; the terminal belongs to the game.
fn init_logging(save_dir: &std::path::Path, file_name: &str) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if std::fs::create_dir_all(save_dir).is_ok() {
        if let Ok(file) = File::create(save_dir.join(file_name)) {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            builder.init();
            return;
        }
    }
    // No log file: stay quiet rather than draw over the screen
    builder.filter_level(log::LevelFilter::Off).init();
}

fn seeded_rng() -> GameRng {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed);
    GameRng::seed_from_u64(seed)
}

fn game_loop(
    renderer: &mut Renderer,
    mut sound: Option<&mut SoundEngine>,
    store: &mut dyn Store,
    config: &GameConfig,
    enhanced: bool,
) -> io::Result<()> {
    let mut kb = InputState::new();
    kb.honor_release = enhanced;
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let mut rng = seeded_rng();

    let mut scene = Scene::MainMenu(MainMenu::new(store));
    if let (Some(engine), Scene::MainMenu(menu)) = (sound.as_deref_mut(), &scene) {
        let values = menu.settings.values();
        engine.set_volume(values.sfx_volume);
        engine.set_music_volume(values.music_volume);
    }

    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }

        let mut actions: Vec<Action> = kb.actions().to_vec();
        actions.extend(gp.actions());

        let mut flow = Flow::Stay;
        let mut events = Vec::new();

        match &mut scene {
            Scene::MainMenu(menu) => {
                if kb.quit_pressed() && !menu.settings.is_active() {
                    break;
                }
                for action in actions {
                    let Some(command) = menu_input(action).and_then(|input| menu.handle(input, store)) else {
                        continue;
                    };
                    play(sound.as_deref(), Sfx::Click);
                    match command {
                        MenuCommand::Play => flow = Flow::Play,
                        MenuCommand::Quit => flow = Flow::Quit,
                        MenuCommand::VolumeChanged(values) => {
                            if let Some(engine) = sound.as_deref_mut() {
                                engine.set_volume(values.sfx_volume);
                                engine.set_music_volume(values.music_volume);
                            }
                        }
                    }
                }
            }
            Scene::Hub(hub) => {
                // A terminal popup must resolve before leaving
                if kb.quit_pressed() {
                    if hub.can_leave() {
                        flow = Flow::ToMenu;
                    } else {
                        hub.acknowledge_terminal();
                    }
                }
                for action in actions {
                    if action == Action::Back && hub.at_rest() {
                        flow = Flow::ToMenu;
                        break;
                    }
                    if let Some(input) = hub_input(action) {
                        events.extend(hub.handle(input, store, &mut rng));
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            match &mut scene {
                Scene::MainMenu(menu) => menu.tick(),
                Scene::Hub(hub) => events.extend(hub.tick(store, &mut rng)),
            }
            last_tick = Instant::now();
        }

        for event in &events {
            if *event == HubEvent::LoadEntryScene {
                flow = Flow::ToMenu;
            }
            play_hub_event(sound.as_deref(), event);
        }

        match flow {
            Flow::Stay => {}
            Flow::Quit => break,
            Flow::Play => {
                log::info!("entering hub");
                let hub = Hub::start(config, store, build_slots(config), &mut rng);
                scene = Scene::Hub(Box::new(hub));
            }
            Flow::ToMenu => {
                if let Scene::Hub(hub) = &mut scene {
                    hub.teardown();
                }
                log::info!("back to main menu");
                scene = Scene::MainMenu(MainMenu::new(store));
            }
        }

        let screen = match &scene {
            Scene::MainMenu(menu) => Screen::Menu(menu),
            Scene::Hub(hub) => Screen::Hub(hub.as_ref()),
        };
        renderer.render(screen)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn menu_input(action: Action) -> Option<MenuInput> {
    let input = match action {
        Action::Up => MenuInput::Up,
        Action::Down => MenuInput::Down,
        Action::Left => MenuInput::Left,
        Action::Right => MenuInput::Right,
        Action::Confirm => MenuInput::Confirm,
        Action::Back => MenuInput::Back,
        Action::Settings => MenuInput::Settings,
        Action::Hint | Action::Check | Action::Reset => return None,
    };
    Some(input)
}

fn hub_input(action: Action) -> Option<HubInput> {
    let input = match action {
        Action::Up => HubInput::Up,
        Action::Down => HubInput::Down,
        Action::Left => HubInput::Left,
        Action::Right => HubInput::Right,
        Action::Confirm => HubInput::Confirm,
        Action::Back => HubInput::Back,
        Action::Hint => HubInput::Hint,
        Action::Check => HubInput::Check,
        Action::Reset => HubInput::Reset,
        Action::Settings => return None,
    };
    Some(input)
}

fn play(sound: Option<&SoundEngine>, sfx: Sfx) {
    if let Some(engine) = sound {
        engine.play(sfx);
    }
}

fn play_hub_event(sound: Option<&SoundEngine>, event: &HubEvent) {
    let sfx = match *event {
        HubEvent::SlotOpened(i) => {
            log::debug!("slot {i} opened");
            Sfx::Open
        }
        HubEvent::SlotClosed(i) => {
            log::debug!("slot {i} closed");
            Sfx::Close
        }
        HubEvent::LevelCompleted(id) => {
            log::info!("level {} completed", id.glyph());
            Sfx::LevelWon
        }
        HubEvent::LevelUnlocked(id) => {
            log::info!("level {} unlocked", id.glyph());
            Sfx::Unlock
        }
        HubEvent::LifeLost { lives_left } => {
            log::info!("life lost, {lives_left} left");
            Sfx::LifeLost
        }
        HubEvent::Won => Sfx::GameWon,
        HubEvent::Lost => Sfx::GameLost,
        HubEvent::IntroBlip => {
            if let Some(engine) = sound {
                engine.play_blip(rand::random_range(0..5));
            }
            return;
        }
        HubEvent::LoadEntryScene => return,
    };
    play(sound, sfx);
}
