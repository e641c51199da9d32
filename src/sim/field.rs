/// MineField: one level's grid, its mines and the player.
///
/// ## Coordinates
///
/// `width` x `height` is the whole field surface including its 1-cell
/// border. Mines and the player only ever occupy interior cells
/// `[1, width-2] x [1, height-2]`.
///
/// ## Tracks
///
/// Every cell the player walks off keeps the trail attribute the player
/// had when leaving it, so the path reads as a heat map. Tracks are plain
/// state here; drawing them is the renderer's job. `reset_player()` wipes
/// them along with any revealed mine markers.

use thiserror::Error;

use crate::domain::entity::{Mine, MoveDir, Player};
use crate::domain::proximity::{Attr, ProximityTable, Signal};
use crate::domain::rules::{self, MIN_FIELD_SIDE};
use super::event::GameEvent;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("field {width}x{height} is too small (need at least {min}x{min})")]
    TooSmall { width: i32, height: i32, min: i32 },
    #[error("mine at ({x}, {y}) is outside the field interior")]
    MineOutOfBounds { x: i32, y: i32 },
}

#[derive(Clone, Debug)]
pub struct MineField {
    width: i32,
    height: i32,
    show_mines: bool,
    mines: Vec<Mine>,
    defused: usize,
    player: Player,
    tracks: Vec<Option<Attr>>,
}

impl MineField {
    /// Build a field around an already placed set of mines.
    /// The player starts at the centre with proximity already resolved.
    pub fn new(
        width: i32,
        height: i32,
        mines: Vec<Mine>,
        table: &ProximityTable,
    ) -> Result<Self, FieldError> {
        if width < MIN_FIELD_SIDE || height < MIN_FIELD_SIDE {
            return Err(FieldError::TooSmall { width, height, min: MIN_FIELD_SIDE });
        }
        if let Some(m) = mines.iter().find(|m| !rules::is_interior(m.x, m.y, width, height)) {
            return Err(FieldError::MineOutOfBounds { x: m.x, y: m.y });
        }

        let mut field = MineField {
            width,
            height,
            show_mines: false,
            defused: mines.iter().filter(|m| m.is_defused()).count(),
            mines,
            player: Player::new(width / 2, height / 2, table.resting()),
            tracks: vec![None; (width * height) as usize],
        };
        field.update(table);
        Ok(field)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn area(&self) -> u32 {
        (self.width * self.height) as u32
    }

    pub fn center(&self) -> (i32, i32) {
        (self.width / 2, self.height / 2)
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn mines(&self) -> &[Mine] {
        &self.mines
    }

    pub fn mines_visible(&self) -> bool {
        self.show_mines
    }

    /// `(defused, total)` for this level.
    pub fn status(&self) -> (usize, usize) {
        (self.defused, self.mines.len())
    }

    pub fn is_clear(&self) -> bool {
        self.defused == self.mines.len()
    }

    /// Trail left on `(x, y)`, if the player has walked off it.
    pub fn track_at(&self, x: i32, y: i32) -> Option<Attr> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.tracks[(y * self.width + x) as usize]
    }

    /// OR of every live mine's signal at the player's position.
    pub fn proximity(&self, table: &ProximityTable) -> Signal {
        self.mines
            .iter()
            .fold(Signal::empty(), |acc, m| acc | m.classify(self.player.x, self.player.y, table))
    }

    /// Recompute proximity and the player's trail.
    pub fn update(&mut self, table: &ProximityTable) {
        let mask = self.proximity(table);
        self.player.late_update(mask, table);
    }

    /// Step the player one cell. Border moves are rejected with no change.
    pub fn move_player(&mut self, dir: MoveDir, table: &ProximityTable) -> bool {
        let (x, y) = (self.player.x, self.player.y);
        let Some((nx, ny)) = rules::can_move(x, y, dir, self.width, self.height) else {
            return false;
        };

        self.tracks[(y * self.width + x) as usize] = Some(self.player.trail);
        self.player.set_position(nx, ny);
        self.update(table);
        true
    }

    /// Defuse every live mine under the player. One `MineDefused` event
    /// (one flash) per newly defused mine.
    pub fn fire(&mut self, events: &mut Vec<GameEvent>) -> bool {
        let (px, py) = (self.player.x, self.player.y);
        let mut hit = false;
        for mine in &mut self.mines {
            if mine.try_defuse(px, py) {
                self.defused += 1;
                hit = true;
                events.push(GameEvent::MineDefused { x: mine.x, y: mine.y });
            }
        }
        hit
    }

    /// Flip mine visibility. Returns the new state.
    pub fn toggle_mines(&mut self) -> bool {
        self.show_mines = !self.show_mines;
        self.show_mines
    }

    /// Re-centre the player, wipe tracks and hide revealed mines. Mines and
    /// counters stay.
    pub fn reset_player(&mut self, table: &ProximityTable) {
        let (cx, cy) = self.center();
        self.player.set_position(cx, cy);
        self.player.trail = table.resting();
        self.tracks.fill(None);
        self.show_mines = false;
        self.update(table);
    }
}
