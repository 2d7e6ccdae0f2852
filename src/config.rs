/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to defaults if the file is missing, incomplete, or broken.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub hub: HubConfig,
    pub intro: IntroConfig,
    pub gamepad: GamepadConfig,
    pub save_dir: Option<PathBuf>,
    pub log_file: String,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
    pub fade_ticks: u32,          // hub <-> minigame cross-fade, each half
    pub progress_fill_ticks: u32,
}

#[derive(Clone, Debug)]
pub struct HubConfig {
    pub starting_lives: u32,
    /// Letter keys for the hub buttons, in display order. Empty = all letters.
    pub button_letters: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct IntroConfig {
    pub char_delay_ticks: u32,
    pub fast_factor: f32,
    pub after_line_pause_ticks: u32,
    pub slide_ticks: u32,
    pub lines: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub hint: Vec<String>,
    pub check: Vec<String>,
    pub settings: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    hub: TomlHub,
    #[serde(default)]
    intro: TomlIntro,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_fade_ticks")]
    fade_ticks: u32,
    #[serde(default = "default_fill_ticks")]
    progress_fill_ticks: u32,
}

#[derive(Deserialize, Debug)]
struct TomlHub {
    #[serde(default = "default_lives")]
    starting_lives: u32,
    #[serde(default)]
    button_letters: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlIntro {
    #[serde(default = "default_char_delay")]
    char_delay_ticks: u32,
    #[serde(default = "default_fast_factor")]
    fast_factor: f32,
    #[serde(default = "default_line_pause")]
    after_line_pause_ticks: u32,
    #[serde(default = "default_slide")]
    slide_ticks: u32,
    #[serde(default = "default_intro_lines")]
    lines: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_hint")]
    hint: Vec<String>,
    #[serde(default = "default_check")]
    check: Vec<String>,
    #[serde(default = "default_settings")]
    settings: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    save_dir: Option<String>,
    #[serde(default = "default_log_file")]
    log_file: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 33 }
fn default_fade_ticks() -> u32 { 9 }      // ~0.3s
fn default_fill_ticks() -> u32 { 18 }
fn default_lives() -> u32 { 3 }
fn default_char_delay() -> u32 { 2 }
fn default_fast_factor() -> f32 { 0.15 }
fn default_line_pause() -> u32 { 10 }
fn default_slide() -> u32 { 18 }          // ~0.6s

fn default_intro_lines() -> Vec<String> {
    vec![
        "Я забыл".into(),
        "Я забыл их всех".into(),
        "Помню только".into(),
        "Щ".into(),
    ]
}

fn default_confirm() -> Vec<String> { vec!["A".into(), "Start".into()] }
fn default_cancel() -> Vec<String> { vec!["B".into(), "Select".into()] }
fn default_hint() -> Vec<String> { vec!["Y".into()] }
fn default_check() -> Vec<String> { vec!["X".into()] }
fn default_settings() -> Vec<String> { vec!["R1".into()] }
fn default_log_file() -> String { "bukvar.log".into() }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
            fade_ticks: default_fade_ticks(),
            progress_fill_ticks: default_fill_ticks(),
        }
    }
}

impl Default for TomlHub {
    fn default() -> Self {
        TomlHub { starting_lives: default_lives(), button_letters: Vec::new() }
    }
}

impl Default for TomlIntro {
    fn default() -> Self {
        TomlIntro {
            char_delay_ticks: default_char_delay(),
            fast_factor: default_fast_factor(),
            after_line_pause_ticks: default_line_pause(),
            slide_ticks: default_slide(),
            lines: default_intro_lines(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            cancel: default_cancel(),
            hint: default_hint(),
            check: default_check(),
            settings: default_settings(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { save_dir: None, log_file: default_log_file() }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: exe directory, current working directory, data dirs.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        Self::from_toml(toml_cfg)
    }

    /// Parse config text directly. Parse errors give the defaults.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn from_toml_str(text: &str) -> Self {
        let toml_cfg = toml::from_str::<TomlConfig>(text).unwrap_or_else(|e| {
            log::warn!("config parse error, using defaults: {e}");
            TomlConfig::default()
        });
        Self::from_toml(toml_cfg)
    }

    fn from_toml(t: TomlConfig) -> Self {
        let intro_lines = if t.intro.lines.is_empty() {
            default_intro_lines()
        } else {
            t.intro.lines
        };

        GameConfig {
            speed: SpeedConfig {
                tick_rate_ms: t.speed.tick_rate_ms.max(1),
                fade_ticks: t.speed.fade_ticks,
                progress_fill_ticks: t.speed.progress_fill_ticks,
            },
            hub: HubConfig {
                starting_lives: t.hub.starting_lives.max(1),
                button_letters: t.hub.button_letters,
            },
            intro: IntroConfig {
                char_delay_ticks: t.intro.char_delay_ticks,
                fast_factor: t.intro.fast_factor.clamp(0.01, 1.0),
                after_line_pause_ticks: t.intro.after_line_pause_ticks,
                slide_ticks: t.intro.slide_ticks,
                lines: intro_lines,
            },
            gamepad: GamepadConfig {
                confirm: t.gamepad.confirm,
                cancel: t.gamepad.cancel,
                hint: t.gamepad.hint,
                check: t.gamepad.check,
                settings: t.gamepad.settings,
            },
            save_dir: t.general.save_dir.map(PathBuf::from),
            log_file: t.general.log_file,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default())
    }
}

/// Candidate directories to search: exe dir + CWD + data paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds its config
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/bukvar)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/bukvar");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/bukvar");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => {
                        log::info!("config loaded from {}", path.display());
                        return cfg;
                    }
                    Err(e) => {
                        log::warn!("config.toml parse error, using defaults: {e}");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    log::warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_toml_str("");
        assert_eq!(cfg.speed.tick_rate_ms, 33);
        assert_eq!(cfg.hub.starting_lives, 3);
        assert_eq!(cfg.intro.lines.len(), 4);
        assert_eq!(cfg.intro.lines[3], "Щ");
        assert!(cfg.save_dir.is_none());
        assert_eq!(cfg.log_file, "bukvar.log");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str(
            "[hub]\nstarting_lives = 5\n[speed]\nfade_ticks = 4\n",
        );
        assert_eq!(cfg.hub.starting_lives, 5);
        assert_eq!(cfg.speed.fade_ticks, 4);
        assert_eq!(cfg.speed.progress_fill_ticks, 18);
        assert_eq!(cfg.gamepad.confirm, vec!["A".to_string(), "Start".to_string()]);
    }

    #[test]
    fn broken_file_gives_defaults() {
        let cfg = GameConfig::from_toml_str("[hub\nstarting_lives = ");
        assert_eq!(cfg.hub.starting_lives, 3);
    }

    #[test]
    fn zero_lives_is_raised_to_one() {
        let cfg = GameConfig::from_toml_str("[hub]\nstarting_lives = 0\n");
        assert_eq!(cfg.hub.starting_lives, 1);
    }

    #[test]
    fn save_dir_override() {
        let cfg = GameConfig::from_toml_str("[general]\nsave_dir = \"/tmp/bukvar\"\n");
        assert_eq!(cfg.save_dir, Some(PathBuf::from("/tmp/bukvar")));
    }
}
