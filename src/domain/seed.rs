/// Seeded placement: every random decision of a level is derived from one
/// explicit `u64` seed that is threaded through the calls and handed back,
/// never from hidden global state.
///
/// A level draws its seed once (wall clock in the game, fixed values in
/// tests), picks its mine count from it, then chains mine placements:
///
///   seed ─count→ seed·count ─place→ seed·x₁·y₁ ─place→ ...

use std::time::{SystemTime, UNIX_EPOCH};

/// Result of placing one mine.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    /// Seed for the next placement in the same level.
    pub next_seed: u64,
}

/// Source of level seeds.
pub trait SeedSource {
    fn next_seed(&mut self) -> u64;
}

/// Seeds from the wall clock, one per level start.
pub struct WallClock;

impl SeedSource for WallClock {
    fn next_seed(&mut self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    }
}

/// splitmix64 finalizer: spreads small or sequential seeds over the full range.
fn scramble(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Pick an interior cell of a `width` x `height` bordered field.
///
/// `x ∈ [1, width-2]`, `y ∈ [1, height-2]`. Same inputs, same output.
pub fn place(seed: u64, width: i32, height: i32) -> Placement {
    let span_x = (width - 2).max(1) as u64;
    let span_y = (height - 2).max(1) as u64;

    let rx = scramble(seed);
    let ry = scramble(rx);
    let x = 1 + (rx % span_x) as i32;
    let y = 1 + (ry % span_y) as i32;

    Placement {
        x,
        y,
        next_seed: seed.wrapping_mul(x as u64).wrapping_mul(y as u64),
    }
}

/// Number of mines for a level in `[min, max]`, plus the chained seed
/// (`seed * count`) to start placements from.
pub fn mine_count(seed: u64, min: usize, max: usize) -> (usize, u64) {
    let max = max.max(min);
    let span = (max - min + 1) as u64;
    let count = min + (scramble(seed) % span) as usize;
    (count, seed.wrapping_mul(count as u64))
}
