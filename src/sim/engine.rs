/// GameEngine: the complete state of a running game and its frame driver.
///
/// ## Phases
///
/// ```text
///   Splash ──start──▶ Playing ──last mine──▶ Cleared ──key──▶ Playing (level+1)
///                        │                                        │
///                        └────────────── q / Esc ─────────────────┴──▶ Quit
/// ```
///
/// ## Frame
///
/// `run_frame` reads at most one key from the `Display`, hands the decoded
/// command to `step`, then renders. A `Cleared` field is picked up on the
/// following frame: the "field clear" box blocks for one key, the next
/// level is generated and play resumes.

use std::io;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{GameConfig, MinesConfig};
use crate::domain::proximity::ProximityTable;
use crate::domain::seed::SeedSource;
use crate::ui::display::Display;
use crate::ui::input;
use crate::ui::view::{self, Layout};
use super::event::GameEvent;
use super::field::{FieldError, MineField};
use super::level::{self, LevelTracker};
use super::step;

const CLEAR_MESSAGE: &str = "field clear";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Splash,
    Playing,
    Cleared,
    Quit,
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("display error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Field(#[from] FieldError),
}

pub struct GameEngine {
    pub phase: Phase,
    pub field: MineField,
    pub tracker: LevelTracker,
    pub table: ProximityTable,
    mines_cfg: MinesConfig,
    seeds: Box<dyn SeedSource>,
    layout: Option<Layout>,
}

impl GameEngine {
    /// Generate level 0 on a `width` x `height` field. Nothing is drawn
    /// until the first frame.
    pub fn new(
        width: i32,
        height: i32,
        table: ProximityTable,
        config: &GameConfig,
        mut seeds: Box<dyn SeedSource>,
    ) -> Result<Self, GameError> {
        let field = level::generate_field(width, height, seeds.next_seed(), &config.mines, &table)?;
        let mut tracker = LevelTracker::new(field.area(), config.scoring.clone());
        tracker.new_level(0, field.mines().len());
        debug!(bands = ?table.bands(), "proximity table");
        info!(width, height, mines = field.mines().len(), "level 0 generated");

        Ok(GameEngine {
            phase: Phase::Splash,
            field,
            tracker,
            table,
            mines_cfg: config.mines.clone(),
            seeds,
            layout: None,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Quit
    }

    /// Score as shown on the banner.
    pub fn score(&self) -> u64 {
        self.tracker.display_score()
    }

    /// Open the game screen and enter `Playing`.
    pub fn start(&mut self, display: &mut dyn Display) -> Result<(), GameError> {
        let layout = self.layout(display)?;
        self.phase = Phase::Playing;
        view::render(display, &layout, &self.field, &self.tracker, &[])?;
        Ok(())
    }

    /// Run one frame. Returns the events it produced for sound and logging.
    pub fn run_frame(
        &mut self,
        display: &mut dyn Display,
        blocking: bool,
    ) -> Result<Vec<GameEvent>, GameError> {
        match self.phase {
            Phase::Quit => return Ok(vec![]),
            Phase::Splash => self.start(display)?,
            Phase::Cleared => return self.advance_level(display),
            Phase::Playing => {}
        }

        let cmd = display.read_input(blocking)?.and_then(input::decode);
        let events = step::step(self, cmd);
        if self.phase != Phase::Quit {
            let layout = self.layout(display)?;
            view::render(display, &layout, &self.field, &self.tracker, &events)?;
        }
        Ok(events)
    }

    /// Fresh field from a new seed. The level index only advances when
    /// the current field was cleared.
    pub fn new_level(&mut self) -> Result<GameEvent, GameError> {
        let level = if self.phase == Phase::Cleared {
            self.tracker.level + 1
        } else {
            self.tracker.level
        };
        self.field = level::generate_field(
            self.field.width(),
            self.field.height(),
            self.seeds.next_seed(),
            &self.mines_cfg,
            &self.table,
        )?;
        let mines = self.field.mines().len();
        self.tracker.new_level(level, mines);
        self.phase = Phase::Playing;
        info!(level, mines, score = self.tracker.display_score(), "level started");
        Ok(GameEvent::LevelStarted { level, mines })
    }

    /// Close every surface the engine opened.
    pub fn finish(&mut self, display: &mut dyn Display) {
        if let Some(layout) = self.layout.take() {
            layout.close(display);
        }
    }

    fn advance_level(&mut self, display: &mut dyn Display) -> Result<Vec<GameEvent>, GameError> {
        let layout = self.layout(display)?;
        view::message_box(display, &layout, CLEAR_MESSAGE)?;
        let started = self.new_level()?;
        view::draw_chrome(display, &layout);
        view::render(display, &layout, &self.field, &self.tracker, &[])?;
        Ok(vec![started])
    }

    fn layout(&mut self, display: &mut dyn Display) -> io::Result<Layout> {
        if let Some(layout) = self.layout {
            return Ok(layout);
        }
        let layout = Layout::open(display, self.field.width() as u16, self.field.height() as u16)?;
        view::draw_chrome(display, &layout);
        self.layout = Some(layout);
        Ok(layout)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{engine_with_mines, Counter};
    use super::*;
    use crate::ui::display::testing::Recorder;
    use crate::ui::display::Key;

    fn recorder_for(e: &GameEngine) -> Recorder {
        Recorder::new(e.field.width() as u16 + 2, e.field.height() as u16 + 4)
    }

    #[test]
    fn new_engine_waits_at_splash() {
        let e = GameEngine::new(40, 12, ProximityTable::default(), &GameConfig::default(), Box::new(Counter(7)))
            .unwrap();
        assert_eq!(e.phase, Phase::Splash);
        assert_eq!(e.tracker.level, 0);
        assert_eq!(e.tracker.steps, 0);
        assert_eq!(e.tracker.field_area, 480);
        assert!((1..=4).contains(&e.tracker.total_mines));
        assert_eq!(e.field.status().0, 0);
    }

    #[test]
    fn tiny_terminal_is_rejected() {
        let err = GameEngine::new(4, 4, ProximityTable::default(), &GameConfig::default(), Box::new(Counter(0)));
        assert!(matches!(err, Err(GameError::Field(FieldError::TooSmall { .. }))));
    }

    #[test]
    fn first_frame_opens_screen() {
        let mut e = GameEngine::new(50, 10, ProximityTable::default(), &GameConfig::default(), Box::new(Counter(1)))
            .unwrap();
        let mut rec = recorder_for(&e);
        let events = e.run_frame(&mut rec, false).unwrap();
        assert!(events.is_empty());
        assert_eq!(e.phase, Phase::Playing);
        assert_eq!(rec.open_count(), 4);
        assert!(rec.row_text(0).contains(":|mines|:"));
        assert!(rec.row_text(1).contains("lvl[0]"));
    }

    #[test]
    fn blocking_flag_reaches_display() {
        let mut e = engine_with_mines(20, 10, &[(1, 1)]);
        let mut rec = recorder_for(&e);
        rec.push_keys("d");
        e.run_frame(&mut rec, true).unwrap();
        assert_eq!(rec.blocking_reads, 1);
        assert_eq!(e.tracker.steps, 1);
    }

    #[test]
    fn unknown_key_is_noop_frame() {
        let mut e = engine_with_mines(20, 10, &[(1, 1)]);
        let mut rec = recorder_for(&e);
        rec.push_keys("x");
        rec.push_key(Key::Other);
        assert!(e.run_frame(&mut rec, false).unwrap().is_empty());
        assert!(e.run_frame(&mut rec, false).unwrap().is_empty());
        assert_eq!((e.field.player().x, e.field.player().y), (10, 5));
        assert_eq!(e.tracker.steps, 0);
    }

    #[test]
    fn defusal_flashes_once() {
        let mut e = engine_with_mines(20, 10, &[(11, 5), (1, 1)]);
        let mut rec = recorder_for(&e);
        rec.push_keys("dff");
        for _ in 0..3 {
            e.run_frame(&mut rec, false).unwrap();
        }
        assert_eq!(rec.flashes, 1);
        assert_eq!(e.field.status(), (1, 2));
        assert_eq!(e.phase, Phase::Playing);
    }

    #[test]
    fn cleared_field_moves_to_next_level_on_next_frame() {
        let mut e = engine_with_mines(50, 10, &[(26, 5)]);
        let mut rec = recorder_for(&e);
        rec.push_keys("df");
        e.run_frame(&mut rec, false).unwrap();
        let events = e.run_frame(&mut rec, false).unwrap();
        assert_eq!(events.last(), Some(&GameEvent::FieldCleared { level: 0 }));
        assert_eq!(e.phase, Phase::Cleared);
        assert_eq!(e.score(), 12500);

        rec.push_keys(" ");
        let events = e.run_frame(&mut rec, false).unwrap();
        let mines = e.field.mines().len();
        assert_eq!(events, vec![GameEvent::LevelStarted { level: 1, mines }]);
        assert_eq!(rec.blocking_reads, 1);
        assert_eq!(rec.pending_keys(), 0);
        assert_eq!(e.phase, Phase::Playing);
        assert_eq!(e.tracker.level, 1);
        assert_eq!(e.tracker.steps, 0);
        assert_eq!(e.tracker.mines_defused, 0);
        assert_eq!(e.tracker.total_mines, mines);
        assert_eq!(e.field.status(), (0, mines));
        assert_eq!(e.tracker.score, 12500.0);
        assert_eq!(e.tracker.points, 0.0);
        assert_eq!(rec.row_text(1).trim_start(), e.tracker.as_text());
        assert!(rec.row_text(1).ends_with("lvl[1]"));
    }

    #[test]
    fn new_level_without_clear_keeps_index() {
        let mut e = engine_with_mines(20, 10, &[(1, 1)]);
        e.tracker.level = 3;
        let ev = e.new_level().unwrap();
        assert!(matches!(ev, GameEvent::LevelStarted { level: 3, .. }));
        assert_eq!(e.tracker.level, 3);
    }

    #[test]
    fn quit_ends_the_loop() {
        let mut e = engine_with_mines(20, 10, &[(1, 1)]);
        let mut rec = recorder_for(&e);
        rec.push_keys("q");
        assert_eq!(e.run_frame(&mut rec, false).unwrap(), vec![GameEvent::Quit]);
        assert!(e.is_finished());
        rec.push_keys("d");
        assert!(e.run_frame(&mut rec, false).unwrap().is_empty());
        assert_eq!(rec.pending_keys(), 1);
        e.finish(&mut rec);
        assert_eq!(rec.open_count(), 0);
    }

    #[test]
    fn banner_tracks_steps() {
        let mut e = engine_with_mines(50, 10, &[(1, 1)]);
        let mut rec = recorder_for(&e);
        rec.push_keys("wwa");
        for _ in 0..3 {
            e.run_frame(&mut rec, false).unwrap();
        }
        assert!(rec.row_text(1).contains("steps[3]"));
    }
}
