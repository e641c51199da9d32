/// Level generation and the score banner.
///
/// ## Generation
///
/// One seed per level. The mine count is drawn first, then each mine is
/// placed from the evolving seed (see `domain::seed`). The same seed on the
/// same field size always yields the same layout.
///
/// ## Banner
///
/// `LevelTracker` carries the run's score across levels:
///   - `score`  : banked points from every finished level
///   - `points` : pending points of the level in progress
///
/// Pending points are banked (and reset) exactly when a new level begins,
/// so an abandoned level never adds to the final score.

use tracing::debug;

use crate::config::{MinesConfig, ScoringConfig};
use crate::domain::entity::Mine;
use crate::domain::proximity::ProximityTable;
use crate::domain::rules;
use crate::domain::seed;
use super::field::{FieldError, MineField};

/// Build a fresh field for one level from `level_seed`.
pub fn generate_field(
    width: i32,
    height: i32,
    level_seed: u64,
    mines_cfg: &MinesConfig,
    table: &ProximityTable,
) -> Result<MineField, FieldError> {
    let (count, mut next) = seed::mine_count(level_seed, mines_cfg.min, mines_cfg.max);

    let mut mines = Vec::with_capacity(count);
    for _ in 0..count {
        let p = seed::place(next, width, height);
        debug!(x = p.x, y = p.y, "mine placed");
        mines.push(Mine::new(p.x, p.y));
        next = p.next_seed;
    }

    MineField::new(width, height, mines, table)
}

#[derive(Clone, Debug)]
pub struct LevelTracker {
    pub score: f64,
    pub points: f64,
    pub field_area: u32,
    pub steps: u32,
    pub mines_defused: usize,
    pub total_mines: usize,
    pub level: u32,
    scoring: ScoringConfig,
}

impl LevelTracker {
    pub fn new(field_area: u32, scoring: ScoringConfig) -> Self {
        LevelTracker {
            score: 0.0,
            points: 0.0,
            field_area,
            steps: 0,
            mines_defused: 0,
            total_mines: 0,
            level: 0,
            scoring,
        }
    }

    /// Enter `level`: bank pending points, zero the per-level counters.
    pub fn new_level(&mut self, level: u32, total_mines: usize) {
        self.level = level;
        self.total_mines = total_mines;
        self.steps = 0;
        self.mines_defused = 0;
        self.update_score();
    }

    pub fn update_mines(&mut self, defused: usize, total: usize) {
        self.mines_defused = defused;
        self.total_mines = total;
    }

    /// Recompute pending points from the current counters.
    pub fn update_points(&mut self) {
        self.points = rules::pending_points(
            &self.scoring,
            self.field_area,
            self.steps,
            self.mines_defused,
            self.level,
        );
    }

    /// Bank pending points.
    pub fn update_score(&mut self) {
        self.score += self.points;
        self.points = 0.0;
    }

    /// Score as shown this frame: banked plus pending, floored.
    pub fn display_score(&self) -> u64 {
        (self.score + self.points).floor() as u64
    }

    pub fn as_text(&self) -> String {
        format!(
            "score[{}] mines[{}:{}] steps[{}] lvl[{}]",
            self.display_score(),
            self.mines_defused,
            self.total_mines,
            self.steps,
            self.level,
        )
    }
}
