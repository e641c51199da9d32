/// Movement and scoring rules: pure functions, no side effects.
/// These encode "what is legal" and "what it is worth" without
/// performing anything.
///
/// ## Movement Truth Table
///
/// The field is a `width` x `height` rectangle whose outermost ring is the
/// border. The player may only occupy interior cells.
///
/// ┌──────────────────────┬───────────────┐
/// │ Destination           │ Allow?        │
/// ├──────────────────────┼───────────────┤
/// │ x <= 0                │ DENY (left)   │
/// │ x >= width - 1        │ DENY (right)  │
/// │ y <= 0                │ DENY (top)    │
/// │ y >= height - 1       │ DENY (bottom) │
/// │ Otherwise             │ ALLOW         │
/// └──────────────────────┴───────────────┘
///
/// ## Scoring
///
/// ```text
/// steps == 0  →  pending = 0
/// ratio       =  area / steps
/// per_mine    =  base_mine_value + level_bonus * level
/// pending     =  defused * per_mine * ratio
/// ```
///
/// `ratio` shrinks as steps grow, so the fewer steps a level takes the
/// more each mine is worth. One step on a large field is a legitimately
/// huge score.

use super::entity::MoveDir;
use crate::config::ScoringConfig;

/// Smallest field side: border + 3 interior cells + border.
pub const MIN_FIELD_SIDE: i32 = 5;

/// Is `(x, y)` an interior (non-border) cell?
pub fn is_interior(x: i32, y: i32, width: i32, height: i32) -> bool {
    x > 0 && x < width - 1 && y > 0 && y < height - 1
}

/// Destination of a move, or None if it would touch the border.
pub fn can_move(x: i32, y: i32, dir: MoveDir, width: i32, height: i32) -> Option<(i32, i32)> {
    let (dx, dy) = dir.delta();
    let (nx, ny) = (x + dx, y + dy);
    is_interior(nx, ny, width, height).then_some((nx, ny))
}

/// Points a single mine is worth on `level`.
pub fn points_per_mine(scoring: &ScoringConfig, level: u32) -> f64 {
    scoring.base_mine_value + scoring.level_bonus * f64::from(level)
}

/// Pending (not yet banked) points for the current level.
pub fn pending_points(
    scoring: &ScoringConfig,
    field_area: u32,
    steps: u32,
    defused: usize,
    level: u32,
) -> f64 {
    if steps == 0 {
        return 0.0;
    }
    let ratio = f64::from(field_area) / f64::from(steps);
    defused as f64 * points_per_mine(scoring, level) * ratio
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoring() -> ScoringConfig {
        ScoringConfig { base_mine_value: 25.0, level_bonus: 10.0 }
    }

    // ── Movement ──

    #[test]
    fn move_inside_allowed() {
        assert_eq!(can_move(2, 2, MoveDir::Up, 5, 5), Some((2, 1)));
        assert_eq!(can_move(2, 2, MoveDir::Down, 5, 5), Some((2, 3)));
        assert_eq!(can_move(2, 2, MoveDir::Left, 5, 5), Some((1, 2)));
        assert_eq!(can_move(2, 2, MoveDir::Right, 5, 5), Some((3, 2)));
    }

    #[test]
    fn move_onto_border_denied() {
        assert_eq!(can_move(1, 2, MoveDir::Left, 5, 5), None);
        assert_eq!(can_move(3, 2, MoveDir::Right, 5, 5), None);
        assert_eq!(can_move(2, 1, MoveDir::Up, 5, 5), None);
        assert_eq!(can_move(2, 3, MoveDir::Down, 5, 5), None);
    }

    #[test]
    fn interior_excludes_ring() {
        let (w, h) = (6, 7);
        for y in 0..h {
            for x in 0..w {
                let ring = x == 0 || y == 0 || x == w - 1 || y == h - 1;
                assert_eq!(is_interior(x, y, w, h), !ring, "({x},{y})");
            }
        }
    }

    // ── Scoring ──

    #[test]
    fn zero_steps_scores_nothing() {
        assert_eq!(pending_points(&scoring(), 100, 0, 3, 2), 0.0);
    }

    #[test]
    fn reference_example() {
        // area 100, 10 steps, 2 mines, level 0 → 25 * 2 * 10
        assert_eq!(pending_points(&scoring(), 100, 10, 2, 0), 500.0);
    }

    #[test]
    fn level_weights_each_mine() {
        assert_eq!(points_per_mine(&scoring(), 0), 25.0);
        assert_eq!(points_per_mine(&scoring(), 3), 55.0);
        assert_eq!(pending_points(&scoring(), 100, 10, 1, 3), 550.0);
    }

    #[test]
    fn fewer_steps_pay_more() {
        let fast = pending_points(&scoring(), 1000, 20, 1, 0);
        let slow = pending_points(&scoring(), 1000, 200, 1, 0);
        assert!(fast > slow);
    }

    #[test]
    fn one_step_on_large_field_is_valid() {
        let p = pending_points(&scoring(), 300 * 100, 1, 4, 9);
        assert_eq!(p, 4.0 * 115.0 * 30_000.0);
        assert!(p.is_finite());
    }

    #[test]
    fn nothing_defused_scores_nothing() {
        assert_eq!(pending_points(&scoring(), 100, 7, 0, 5), 0.0);
    }
}
