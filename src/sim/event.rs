/// Events emitted during a simulation step.
/// The presentation layer consumes these for flashes and sound.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    LevelStarted { level: u32, mines: usize },
    PlayerMoved { x: i32, y: i32 },
    MoveBlocked,
    MineDefused { x: i32, y: i32 },
    MinesRevealed { visible: bool },
    PlayerReset,
    FieldCleared { level: u32 },
    Quit,
}
