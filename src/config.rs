/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
///
/// ```toml
/// [scoring]
/// base_mine_value = 25
/// level_bonus = 10
///
/// [mines]
/// min = 1
/// max = 4
///
/// [proximity]
/// burning = 5
/// hot = 10
/// warm = 20
///
/// [input]
/// blocking = true
/// frame_ms = 50
/// splash = true
///
/// [sound]
/// enabled = true
///
/// [gamepad]
/// fire = ["A", "R1"]
///
/// [log]
/// level = "info"
/// ```

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub scoring: ScoringConfig,
    pub mines: MinesConfig,
    pub proximity: ProximityConfig,
    pub input: InputConfig,
    pub sound: SoundConfig,
    pub gamepad: GamepadConfig,
    pub log: LogConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScoringConfig {
    pub base_mine_value: f64,
    pub level_bonus: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinesConfig {
    pub min: usize,
    pub max: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProximityConfig {
    pub burning: i32,
    pub hot: i32,
    pub warm: i32,
}

#[derive(Clone, Debug)]
pub struct InputConfig {
    /// Wait for a key every frame (true) or poll once per `frame_ms`.
    pub blocking: bool,
    pub frame_ms: u64,
    pub splash: bool,
}

#[derive(Clone, Debug)]
pub struct SoundConfig {
    pub enabled: bool,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub fire: Vec<String>,
    pub cheat: Vec<String>,
    pub reset: Vec<String>,
    pub quit: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub level: String,
    /// Overrides the per-user log directory.
    pub dir: Option<PathBuf>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    scoring: TomlScoring,
    #[serde(default)]
    mines: TomlMines,
    #[serde(default)]
    proximity: TomlProximity,
    #[serde(default)]
    input: TomlInput,
    #[serde(default)]
    sound: TomlSound,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlScoring {
    #[serde(default = "default_base_mine_value")]
    base_mine_value: f64,
    #[serde(default = "default_level_bonus")]
    level_bonus: f64,
}

#[derive(Deserialize, Debug)]
struct TomlMines {
    #[serde(default = "default_min_mines")]
    min: usize,
    #[serde(default = "default_max_mines")]
    max: usize,
}

#[derive(Deserialize, Debug)]
struct TomlProximity {
    #[serde(default = "default_burning")]
    burning: i32,
    #[serde(default = "default_hot")]
    hot: i32,
    #[serde(default = "default_warm")]
    warm: i32,
}

#[derive(Deserialize, Debug)]
struct TomlInput {
    #[serde(default = "default_blocking")]
    blocking: bool,
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
    #[serde(default = "default_splash")]
    splash: bool,
}

#[derive(Deserialize, Debug)]
struct TomlSound {
    #[serde(default = "default_sound_enabled")]
    enabled: bool,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pad_fire")]
    fire: Vec<String>,
    #[serde(default = "default_pad_cheat")]
    cheat: Vec<String>,
    #[serde(default = "default_pad_reset")]
    reset: Vec<String>,
    #[serde(default = "default_pad_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_level")]
    level: String,
    #[serde(default)]
    dir: Option<String>,
}

// ── Defaults ──

fn default_base_mine_value() -> f64 { 25.0 }
fn default_level_bonus() -> f64 { 10.0 }
fn default_min_mines() -> usize { 1 }
fn default_max_mines() -> usize { 4 }
fn default_burning() -> i32 { 5 }
fn default_hot() -> i32 { 10 }
fn default_warm() -> i32 { 20 }
fn default_blocking() -> bool { true }
fn default_frame_ms() -> u64 { 50 }
fn default_splash() -> bool { true }
fn default_sound_enabled() -> bool { true }

fn default_pad_fire() -> Vec<String> { vec!["A".into(), "R1".into()] }
fn default_pad_cheat() -> Vec<String> { vec!["Y".into()] }
fn default_pad_reset() -> Vec<String> { vec!["X".into(), "Start".into()] }
fn default_pad_quit() -> Vec<String> { vec!["Select".into()] }
fn default_log_level() -> String { "info".into() }

impl Default for TomlScoring {
    fn default() -> Self {
        TomlScoring {
            base_mine_value: default_base_mine_value(),
            level_bonus: default_level_bonus(),
        }
    }
}

impl Default for TomlMines {
    fn default() -> Self {
        TomlMines {
            min: default_min_mines(),
            max: default_max_mines(),
        }
    }
}

impl Default for TomlProximity {
    fn default() -> Self {
        TomlProximity {
            burning: default_burning(),
            hot: default_hot(),
            warm: default_warm(),
        }
    }
}

impl Default for TomlInput {
    fn default() -> Self {
        TomlInput {
            blocking: default_blocking(),
            frame_ms: default_frame_ms(),
            splash: default_splash(),
        }
    }
}

impl Default for TomlSound {
    fn default() -> Self {
        TomlSound { enabled: default_sound_enabled() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            fire: default_pad_fire(),
            cheat: default_pad_cheat(),
            reset: default_pad_reset(),
            quit: default_pad_quit(),
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog { level: default_log_level(), dir: None }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) `~/.local/share/mines`.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        Self::from_toml(load_toml(&search_dirs))
    }

    /// Parse config text directly (no file search).
    #[cfg(test)]
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(Self::from_toml)
    }

    fn from_toml(toml_cfg: TomlConfig) -> Self {
        let mut mines = MinesConfig {
            min: toml_cfg.mines.min,
            max: toml_cfg.mines.max,
        };
        if mines.min == 0 {
            eprintln!("Warning: [mines] min must be at least 1, using 1.");
            mines.min = 1;
        }
        if mines.max < mines.min {
            eprintln!("Warning: [mines] max < min, using max = {}.", mines.min);
            mines.max = mines.min;
        }

        GameConfig {
            scoring: ScoringConfig {
                base_mine_value: toml_cfg.scoring.base_mine_value,
                level_bonus: toml_cfg.scoring.level_bonus,
            },
            mines,
            proximity: ProximityConfig {
                burning: toml_cfg.proximity.burning,
                hot: toml_cfg.proximity.hot,
                warm: toml_cfg.proximity.warm,
            },
            input: InputConfig {
                blocking: toml_cfg.input.blocking,
                frame_ms: toml_cfg.input.frame_ms.max(1),
                splash: toml_cfg.input.splash,
            },
            sound: SoundConfig { enabled: toml_cfg.sound.enabled },
            gamepad: GamepadConfig {
                fire: toml_cfg.gamepad.fire,
                cheat: toml_cfg.gamepad.cheat,
                reset: toml_cfg.gamepad.reset,
                quit: toml_cfg.gamepad.quit,
            },
            log: LogConfig {
                level: toml_cfg.log.level,
                dir: toml_cfg.log.dir.map(PathBuf::from),
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default())
    }
}

/// Candidate directories to search: exe dir + CWD + user data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
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

    // 3. XDG data home (~/.local/share/mines)
    if let Some(data) = data_dir() {
        if data.is_dir() && !dirs.iter().any(|d| d == &data) {
            dirs.push(data);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// `~/.local/share/mines`, if HOME is set.
pub fn data_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".local/share/mines"))
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
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
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!(cfg.scoring, ScoringConfig { base_mine_value: 25.0, level_bonus: 10.0 });
        assert_eq!(cfg.mines, MinesConfig { min: 1, max: 4 });
        assert_eq!(cfg.proximity, ProximityConfig { burning: 5, hot: 10, warm: 20 });
        assert!(cfg.input.blocking);
        assert_eq!(cfg.input.frame_ms, 50);
        assert!(cfg.sound.enabled);
        assert_eq!(cfg.log.level, "info");
        assert!(cfg.log.dir.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::parse(
            "[scoring]\nlevel_bonus = 4\n\n[proximity]\nwarm = 30\n",
        )
        .unwrap();
        assert_eq!(cfg.scoring.base_mine_value, 25.0);
        assert_eq!(cfg.scoring.level_bonus, 4.0);
        assert_eq!(cfg.proximity.burning, 5);
        assert_eq!(cfg.proximity.warm, 30);
    }

    #[test]
    fn mine_bounds_are_repaired() {
        let cfg = GameConfig::parse("[mines]\nmin = 0\nmax = 0\n").unwrap();
        assert_eq!(cfg.mines, MinesConfig { min: 1, max: 1 });

        let cfg = GameConfig::parse("[mines]\nmin = 3\nmax = 2\n").unwrap();
        assert_eq!(cfg.mines, MinesConfig { min: 3, max: 3 });
    }

    #[test]
    fn input_and_log_sections() {
        let cfg = GameConfig::parse(
            "[input]\nblocking = false\nframe_ms = 0\nsplash = false\n\n[log]\nlevel = \"debug\"\ndir = \"/tmp/mines\"\n",
        )
        .unwrap();
        assert!(!cfg.input.blocking);
        assert_eq!(cfg.input.frame_ms, 1);
        assert!(!cfg.input.splash);
        assert_eq!(cfg.log.level, "debug");
        assert_eq!(cfg.log.dir, Some(PathBuf::from("/tmp/mines")));
    }

    #[test]
    fn gamepad_lists_override() {
        let cfg = GameConfig::parse("[gamepad]\nfire = [\"B\"]\n").unwrap();
        assert_eq!(cfg.gamepad.fire, vec!["B".to_string()]);
        assert_eq!(cfg.gamepad.quit, vec!["Select".to_string()]);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(GameConfig::parse("[scoring\n").is_err());
    }
}
