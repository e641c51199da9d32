/// Proximity bands: how close the player is to the nearest live mine.
///
/// The table is ordered closest-first with a zero-distance catch-all last,
/// and is evaluated first-match-wins:
///
/// ┌─────────┬──────────┬───────────┐
/// │ Signal   │ Attr     │ Threshold │
/// ├─────────┼──────────┼───────────┤
/// │ BURNING  │ Blink    │ 5         │
/// │ HOT      │ Standout │ 10        │
/// │ WARM     │ Bold     │ 20        │
/// │ COLD     │ Normal   │ 0 (any)   │
/// └─────────┴──────────┴───────────┘
///
/// A band matches when both `dx <= threshold` and `dy <= threshold`
/// (a square around the mine, not a circle).
///
/// Multiple mines are combined by OR-ing their signals into one mask; the
/// union does not depend on mine order, and `select()` then picks the single
/// highest-priority bit. Never sum or average bands.

use bitflags::bitflags;
use thiserror::Error;

use crate::config::ProximityConfig;

bitflags! {
    /// One bit per proximity band.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Signal: u8 {
        const COLD    = 1 << 0;
        const BURNING = 1 << 1;
        const HOT     = 1 << 2;
        const WARM    = 1 << 3;
    }
}

/// Visual attribute of a rendered glyph.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Attr {
    #[default]
    Normal,
    Bold,
    Standout,
    Blink,
    Dim,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ProximityBand {
    pub signal: Signal,
    pub attr: Attr,
    /// 0 = catch-all.
    pub distance: i32,
}

impl ProximityBand {
    pub fn matches(&self, dx: i32, dy: i32) -> bool {
        self.distance == 0 || (dx <= self.distance && dy <= self.distance)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProximityError {
    #[error("proximity distance for {band} must be positive")]
    ZeroDistance { band: &'static str },
    #[error("proximity distances must grow outward: burning={burning} hot={hot} warm={warm}")]
    NotAscending { burning: i32, hot: i32, warm: i32 },
}

#[derive(Clone, Debug)]
pub struct ProximityTable {
    bands: Vec<ProximityBand>,
}

impl ProximityTable {
    pub fn new(burning: i32, hot: i32, warm: i32) -> Result<Self, ProximityError> {
        for (band, d) in [("burning", burning), ("hot", hot), ("warm", warm)] {
            if d <= 0 {
                return Err(ProximityError::ZeroDistance { band });
            }
        }
        if !(burning < hot && hot < warm) {
            return Err(ProximityError::NotAscending { burning, hot, warm });
        }

        Ok(Self::with_distances(burning, hot, warm))
    }

    fn with_distances(burning: i32, hot: i32, warm: i32) -> Self {
        ProximityTable {
            bands: vec![
                ProximityBand { signal: Signal::BURNING, attr: Attr::Blink, distance: burning },
                ProximityBand { signal: Signal::HOT, attr: Attr::Standout, distance: hot },
                ProximityBand { signal: Signal::WARM, attr: Attr::Bold, distance: warm },
                ProximityBand { signal: Signal::COLD, attr: Attr::Normal, distance: 0 },
            ],
        }
    }

    pub fn from_config(cfg: &ProximityConfig) -> Result<Self, ProximityError> {
        Self::new(cfg.burning, cfg.hot, cfg.warm)
    }

    pub fn bands(&self) -> &[ProximityBand] {
        &self.bands
    }

    /// Signal of the first band matching the offset `(dx, dy)`.
    pub fn classify(&self, dx: i32, dy: i32) -> Signal {
        let (dx, dy) = (dx.abs(), dy.abs());
        self.bands
            .iter()
            .find(|b| b.matches(dx, dy))
            .map(|b| b.signal)
            .unwrap_or_default()
    }

    /// Attribute of the highest-priority band present in `mask`.
    pub fn select(&self, mask: Signal) -> Option<Attr> {
        self.bands
            .iter()
            .find(|b| mask.contains(b.signal))
            .map(|b| b.attr)
    }

    /// Attribute of the catch-all band (resting trail).
    pub fn resting(&self) -> Attr {
        self.bands.last().map(|b| b.attr).unwrap_or_default()
    }
}

impl Default for ProximityTable {
    fn default() -> Self {
        Self::with_distances(5, 10, 20)
    }
}
