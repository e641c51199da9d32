/// Entry point and game loop.

mod config;
mod domain;
mod logging;
mod sim;
mod ui;

use anyhow::{Context, Result};
use tracing::{error, info};

use config::GameConfig;
use domain::proximity::ProximityTable;
use domain::seed::WallClock;
use sim::engine::GameEngine;
use sim::event::GameEvent;
use ui::display::Display;
use ui::renderer::TerminalDisplay;
use ui::sound::SoundEngine;
use ui::{splash, view};

fn main() {
    let config = GameConfig::load();

    let _log_guard = match logging::init(&config.log) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            None
        }
    };

    let table = match ProximityTable::from_config(&config.proximity) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Invalid [proximity] settings: {e}");
            return;
        }
    };

    let mut display = TerminalDisplay::new(&config.input, &config.gamepad);
    if let Err(e) = display.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = if config.sound.enabled { SoundEngine::new() } else { None };

    let result = play(&mut display, sound.as_ref(), table, &config);

    if let Err(e) = display.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    match result {
        Ok(score) => {
            info!(score, "game over");
            println!("Thanks for playing, your score was: {score}");
        }
        Err(e) => {
            error!("{e:#}");
            eprintln!("Game error: {e:#}");
        }
    }
}

/// Splash, then levels until the player quits. Returns the final score.
fn play(
    display: &mut TerminalDisplay,
    sound: Option<&SoundEngine>,
    table: ProximityTable,
    config: &GameConfig,
) -> Result<u64> {
    if config.input.splash {
        splash::play(display, splash::STEP_DELAY, |step, total| {
            if let Some(sfx) = sound {
                sfx.play_splash_tick(step, total);
            }
        })
        .context("splash screen")?;
    }

    let (cols, rows) = display.size();
    let width = cols.saturating_sub(view::CHROME_COLS) as i32;
    let height = rows.saturating_sub(view::CHROME_ROWS) as i32;
    let mut engine = GameEngine::new(width, height, table, config, Box::new(WallClock))
        .with_context(|| format!("terminal {cols}x{rows} is too small for a mine field"))?;

    engine.start(display)?;
    while !engine.is_finished() {
        let events = engine.run_frame(display, config.input.blocking)?;
        process_sound_events(sound, &events);
    }
    engine.finish(display);

    Ok(engine.score())
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let Some(sfx) = sound else { return };
    for event in events {
        match event {
            GameEvent::MineDefused { .. } => sfx.play_defuse(),
            GameEvent::FieldCleared { .. } => sfx.play_clear(),
            GameEvent::MoveBlocked => sfx.play_bump(),
            GameEvent::MinesRevealed { .. } => sfx.play_reveal(),
            GameEvent::LevelStarted { .. }
            | GameEvent::PlayerMoved { .. }
            | GameEvent::PlayerReset
            | GameEvent::Quit => {}
        }
    }
}
