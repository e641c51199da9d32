/// Entities: Mine and Player, plus the commands that drive them.
/// Neither entity knows the field size; bounds live in `rules`.

use super::proximity::{Attr, ProximityTable, Signal};

/// Movement direction, one cell per accepted move.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDir {
    /// `(dx, dy)` with y growing downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            MoveDir::Up => (0, -1),
            MoveDir::Down => (0, 1),
            MoveDir::Left => (-1, 0),
            MoveDir::Right => (1, 0),
        }
    }
}

/// One decoded input event.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move(MoveDir),
    Fire,
    ToggleCheat,
    Reset,
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mine {
    pub x: i32,
    pub y: i32,
    defused: bool,
}

impl Mine {
    pub fn new(x: i32, y: i32) -> Self {
        Mine { x, y, defused: false }
    }

    pub fn is_defused(&self) -> bool {
        self.defused
    }

    /// Proximity signal this mine emits for a player at `(px, py)`.
    /// Defused mines are silent.
    pub fn classify(&self, px: i32, py: i32, table: &ProximityTable) -> Signal {
        if self.defused {
            return Signal::empty();
        }
        table.classify(px - self.x, py - self.y)
    }

    /// Defuse on exact overlap. Returns true only on the transition,
    /// so a mine is never counted twice.
    pub fn try_defuse(&mut self, px: i32, py: i32) -> bool {
        if self.defused || px != self.x || py != self.y {
            return false;
        }
        self.defused = true;
        true
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub x: i32,
    pub y: i32,
    /// Attribute of the closest proximity band seen on the last update.
    pub trail: Attr,
}

impl Player {
    pub fn new(x: i32, y: i32, trail: Attr) -> Self {
        Player { x, y, trail }
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Switch the trail to the highest-priority band in `mask`.
    /// An empty mask (no live mines) keeps the current trail.
    pub fn late_update(&mut self, mask: Signal, table: &ProximityTable) {
        if let Some(attr) = table.select(mask) {
            self.trail = attr;
        }
    }
}
