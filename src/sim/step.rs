/// The step function: advances the game by one frame of input.
///
/// Processing order:
///   1. Command application (move / fire / cheat / reset / quit)
///   2. Proximity recomputation (trail update)
///   3. Score update (only after an accepted move or a hit)
///   4. Win check
///
/// A frame with no command still runs 2 and 4. Level transitions are not
/// done here; `Cleared` is left for the engine to pick up next frame.

use tracing::{debug, info};

use crate::domain::entity::Command;
use super::engine::{GameEngine, Phase};
use super::event::GameEvent;

pub fn step(engine: &mut GameEngine, cmd: Option<Command>) -> Vec<GameEvent> {
    if engine.phase != Phase::Playing {
        return vec![];
    }

    let mut events: Vec<GameEvent> = Vec::new();
    let scored = match cmd {
        Some(cmd) => apply_command(engine, cmd, &mut events),
        None => false,
    };
    if engine.phase == Phase::Quit {
        return events;
    }

    engine.field.update(&engine.table);

    if scored {
        let (defused, total) = engine.field.status();
        engine.tracker.update_mines(defused, total);
        engine.tracker.update_points();
    }

    resolve_win(engine, &mut events);
    events
}

/// Returns true when the score needs recomputing.
fn apply_command(engine: &mut GameEngine, cmd: Command, events: &mut Vec<GameEvent>) -> bool {
    match cmd {
        Command::Move(dir) => {
            if engine.field.move_player(dir, &engine.table) {
                engine.tracker.steps += 1;
                let p = engine.field.player();
                events.push(GameEvent::PlayerMoved { x: p.x, y: p.y });
                true
            } else {
                debug!(?dir, "move blocked by border");
                events.push(GameEvent::MoveBlocked);
                false
            }
        }
        Command::Fire => {
            let hit = engine.field.fire(events);
            if hit {
                let (defused, total) = engine.field.status();
                info!(defused, total, "mine defused");
            }
            hit
        }
        Command::ToggleCheat => {
            let visible = engine.field.toggle_mines();
            debug!(visible, "mine visibility toggled");
            events.push(GameEvent::MinesRevealed { visible });
            false
        }
        Command::Reset => {
            engine.field.reset_player(&engine.table);
            events.push(GameEvent::PlayerReset);
            false
        }
        Command::Quit => {
            engine.phase = Phase::Quit;
            events.push(GameEvent::Quit);
            false
        }
    }
}

fn resolve_win(engine: &mut GameEngine, events: &mut Vec<GameEvent>) {
    if !engine.field.is_clear() {
        return;
    }
    let level = engine.tracker.level;
    info!(level, score = engine.tracker.display_score(), "field cleared");
    engine.phase = Phase::Cleared;
    events.push(GameEvent::FieldCleared { level });
}
