/// Gamepad input via gilrs, translated into the same `Key`s the keyboard
/// produces so the engine never knows which device a command came from.
///
/// Default mapping (buttons are configurable under `[gamepad]`):
///   D-pad / Left Stick    →  Move
///   A / R1                →  Fire
///   Y                     →  Toggle mines
///   X / Start             →  Reset
///   Select                →  Quit
///
/// Only press edges produce keys; holding a direction moves one cell.

use std::collections::VecDeque;

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};
#[cfg(feature = "gamepad")]
use tracing::{debug, warn};

use crate::config::GamepadConfig;
use super::display::Key;

const STICK_DEADZONE: f32 = 0.5;

/// Physical face/shoulder buttons, named the way the config file names them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,
    B,
    X,
    Y,
    L1,
    R1,
    L2,
    R2,
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.trim().to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" => Some(Btn::L1),
            "R1" | "RB" => Some(Btn::R1),
            "L2" | "LT" => Some(Btn::L2),
            "R2" | "RT" => Some(Btn::R2),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::LeftTrigger2 => Some(Btn::L2),
            Button::RightTrigger2 => Some(Btn::R2),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Which buttons trigger which game action.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ActionMap {
    quit: Vec<Btn>,
    fire: Vec<Btn>,
    cheat: Vec<Btn>,
    reset: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            quit: vec![Btn::Select],
            fire: vec![Btn::A, Btn::R1],
            cheat: vec![Btn::Y],
            reset: vec![Btn::X, Btn::Start],
        }
    }
}

impl ActionMap {
    /// Unknown names are skipped; an action left with no buttons keeps its default.
    fn from_config(cfg: &GamepadConfig) -> Self {
        fn parse_list(names: &[String], fallback: Vec<Btn>) -> Vec<Btn> {
            let parsed: Vec<Btn> = names.iter().filter_map(|s| Btn::from_name(s)).collect();
            if parsed.is_empty() { fallback } else { parsed }
        }
        let d = ActionMap::default();
        ActionMap {
            quit: parse_list(&cfg.quit, d.quit),
            fire: parse_list(&cfg.fire, d.fire),
            cheat: parse_list(&cfg.cheat, d.cheat),
            reset: parse_list(&cfg.reset, d.reset),
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    /// Keyboard key equivalent of a button press. Quit wins over the rest
    /// when a button is bound twice.
    fn key_for(&self, btn: Btn) -> Option<Key> {
        if self.quit.contains(&btn) {
            Some(Key::Char('q'))
        } else if self.fire.contains(&btn) {
            Some(Key::Char('f'))
        } else if self.cheat.contains(&btn) {
            Some(Key::Char('c'))
        } else if self.reset.contains(&btn) {
            Some(Key::Char('r'))
        } else {
            None
        }
    }
}

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
/// Direction the stick points, if past the deadzone. The dominant axis
/// wins on diagonals. gilrs reports +Y as up.
fn stick_direction(x: f32, y: f32) -> Option<Key> {
    if x.abs() < STICK_DEADZONE && y.abs() < STICK_DEADZONE {
        return None;
    }
    let key = if x.abs() >= y.abs() {
        if x < 0.0 { Key::Left } else { Key::Right }
    } else if y > 0.0 {
        Key::Up
    } else {
        Key::Down
    };
    Some(key)
}

pub struct GamepadInput {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,
    actions: ActionMap,
    pending: VecDeque<Key>,
    stick_x: f32,
    stick_y: f32,
    stick_dir: Option<Key>,
}

impl GamepadInput {
    pub fn new(cfg: &GamepadConfig) -> Self {
        #[cfg(feature = "gamepad")]
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                debug!(pads = g.gamepads().count(), "gamepad backend ready");
                Some(g)
            }
            Err(e) => {
                warn!("gamepad backend unavailable: {e}");
                None
            }
        };

        GamepadInput {
            #[cfg(feature = "gamepad")]
            gilrs,
            actions: ActionMap::from_config(cfg),
            pending: VecDeque::new(),
            stick_x: 0.0,
            stick_y: 0.0,
            stick_dir: None,
        }
    }

    /// Next queued key, draining the backend first.
    pub fn next_key(&mut self) -> Option<Key> {
        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
        self.pending.pop_front()
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let Some(gilrs) = self.gilrs.as_mut() else { return };
        let events: Vec<EventType> = std::iter::from_fn(|| gilrs.next_event()).map(|e| e.event).collect();

        for event in events {
            match event {
                EventType::ButtonPressed(btn, _) => self.press(btn),
                EventType::AxisChanged(Axis::LeftStickX, v, _) => self.move_stick(v, self.stick_y),
                EventType::AxisChanged(Axis::LeftStickY, v, _) => self.move_stick(self.stick_x, v),
                EventType::Disconnected => {
                    self.stick_x = 0.0;
                    self.stick_y = 0.0;
                    self.stick_dir = None;
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn press(&mut self, btn: Button) {
        let key = match btn {
            Button::DPadUp => Some(Key::Up),
            Button::DPadDown => Some(Key::Down),
            Button::DPadLeft => Some(Key::Left),
            Button::DPadRight => Some(Key::Right),
            other => Btn::from_gilrs(other).and_then(|b| self.actions.key_for(b)),
        };
        if let Some(k) = key {
            self.pending.push_back(k);
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    /// Queue a move when the stick enters a new direction.
    fn move_stick(&mut self, x: f32, y: f32) {
        self.stick_x = x;
        self.stick_y = y;
        let dir = stick_direction(x, y);
        if dir != self.stick_dir {
            if let Some(k) = dir {
                self.pending.push_back(k);
            }
            self.stick_dir = dir;
        }
    }
}
