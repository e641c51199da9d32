/// Render phase: turns engine state into `Display` calls.
///
/// Nothing in here mutates game state. The screen is laid out as in the
/// classic curses version:
///
/// ```text
///   row 0          ┌──── :|mines|: ─────┐   outer frame + title
///   row 1          │score[..] mines[..] │   banner
///   rows 2..h+1    │┌──────────────────┐│   mine field (own border)
///                  ││   X              ││
///                  │└──────────────────┘│
///   row h+2        │[wasd] move | ...   │   help
///   row h+3        └────────────────────┘
/// ```

use std::io;

use crate::domain::proximity::Attr;
use crate::sim::event::GameEvent;
use crate::sim::field::MineField;
use crate::sim::level::LevelTracker;
use super::display::{Display, Surface};

pub const PLAYER_GLYPH: char = 'X';
pub const TRACK_GLYPH: char = '█';
pub const MINE_GLYPH: char = '◆';
pub const DEFUSED_GLYPH: char = '◇';

const TITLE: &str = ":|mines|:";
const HELP: &str = "[wasd] move | [f]ire | [q]uit | [r]eset | [c]heat";

/// Rows the layout needs around the field: frame top, banner, help, frame bottom.
pub const CHROME_ROWS: u16 = 4;
/// Columns the layout needs around the field: frame left and right.
pub const CHROME_COLS: u16 = 2;

/// Surfaces making up the game screen.
#[derive(Clone, Copy, Debug)]
pub struct Layout {
    pub screen: Surface,
    pub banner: Surface,
    pub field: Surface,
    pub help: Surface,
    cols: u16,
    rows: u16,
}

impl Layout {
    /// Open every surface for a `field_w` x `field_h` field.
    pub fn open(display: &mut dyn Display, field_w: u16, field_h: u16) -> io::Result<Self> {
        let cols = field_w + CHROME_COLS;
        let rows = field_h + CHROME_ROWS;
        Ok(Layout {
            screen: display.open_surface(cols, rows, 0, 0)?,
            banner: display.open_surface(field_w, 1, 1, 1)?,
            field: display.open_surface(field_w, field_h, 2, 1)?,
            help: display.open_surface(field_w, 1, rows - 2, 1)?,
            cols,
            rows,
        })
    }

    pub fn close(self, display: &mut dyn Display) {
        for s in [self.help, self.field, self.banner, self.screen] {
            display.close_surface(s);
        }
    }
}

/// Outer frame, title and help line. Drawn once per game.
pub fn draw_chrome(display: &mut dyn Display, layout: &Layout) {
    display.clear_surface(layout.screen);
    display.draw_border(layout.screen);
    let title_col = layout.cols.saturating_sub(TITLE.len() as u16) / 2;
    display.draw_text(layout.screen, 0, title_col, TITLE, Attr::Bold);
    display.clear_surface(layout.help);
    display.draw_text(layout.help, 0, 0, HELP, Attr::Dim);
}

/// Draw one frame. Each `MineDefused` event fires one flash first.
pub fn render(
    display: &mut dyn Display,
    layout: &Layout,
    field: &MineField,
    tracker: &LevelTracker,
    events: &[GameEvent],
) -> io::Result<()> {
    for event in events {
        if let GameEvent::MineDefused { .. } = event {
            display.flash()?;
        }
    }

    display.clear_surface(layout.banner);
    display.draw_text(layout.banner, 0, 0, &tracker.as_text(), Attr::Normal);

    draw_field(display, layout.field, field);

    display.present()
}

fn draw_field(display: &mut dyn Display, surface: Surface, field: &MineField) {
    display.clear_surface(surface);
    display.draw_border(surface);

    for y in 1..field.height() - 1 {
        for x in 1..field.width() - 1 {
            if let Some(attr) = field.track_at(x, y) {
                display.draw_glyph(surface, y as u16, x as u16, TRACK_GLYPH, attr);
            }
        }
    }

    if field.mines_visible() {
        for mine in field.mines() {
            let glyph = if mine.is_defused() { DEFUSED_GLYPH } else { MINE_GLYPH };
            display.draw_glyph(surface, mine.y as u16, mine.x as u16, glyph, Attr::Dim);
        }
    }

    let p = field.player();
    display.draw_glyph(surface, p.y as u16, p.x as u16, PLAYER_GLYPH, p.trail);
    display.move_cursor(surface, p.y as u16, p.x as u16);
}

/// Centred boxed message, cut to the screen width. Blocks until a key
/// arrives.
pub fn message_box(display: &mut dyn Display, layout: &Layout, msg: &str) -> io::Result<()> {
    let width = (msg.chars().count() as u16 + 2).min(layout.cols);
    let height = 3;
    let row = (layout.rows / 2).saturating_sub(height / 2);
    let col = (layout.cols / 2).saturating_sub(width / 2);

    let surface = display.open_surface(width, height, row, col)?;
    display.clear_surface(surface);
    display.draw_border(surface);
    let text: String = msg.chars().take(width.saturating_sub(2) as usize).collect();
    display.draw_text(surface, 1, 1, &text, Attr::Bold);
    display.present()?;
    display.read_input(true)?;
    display.close_surface(surface);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::domain::entity::{Mine, MoveDir};
    use crate::domain::proximity::ProximityTable;
    use crate::ui::display::testing::Recorder;

    fn setup(w: i32, h: i32, mines: &[(i32, i32)]) -> (Recorder, Layout, MineField, LevelTracker) {
        let mut rec = Recorder::new(w as u16 + CHROME_COLS, h as u16 + CHROME_ROWS);
        let layout = Layout::open(&mut rec, w as u16, h as u16).unwrap();
        let mines = mines.iter().map(|&(x, y)| Mine::new(x, y)).collect();
        let field = MineField::new(w, h, mines, &ProximityTable::default()).unwrap();
        let mut tracker = LevelTracker::new(field.area(), ScoringConfig { base_mine_value: 25.0, level_bonus: 10.0 });
        tracker.new_level(0, field.mines().len());
        (rec, layout, field, tracker)
    }

    #[test]
    fn chrome_has_title_and_help() {
        let (mut rec, layout, _, _) = setup(40, 10, &[(1, 1)]);
        draw_chrome(&mut rec, &layout);
        assert!(rec.row_text(0).contains(":|mines|:"));
        assert!(rec.row_text(12).contains("[wasd] move"));
    }

    #[test]
    fn player_drawn_with_trail() {
        let (mut rec, layout, field, tracker) = setup(40, 10, &[(21, 5)]);
        render(&mut rec, &layout, &field, &tracker, &[]).unwrap();
        // field origin (2,1); player at (20,5)
        assert_eq!(rec.cell(2 + 5, 1 + 20), Some((PLAYER_GLYPH, Attr::Blink)));
        assert_eq!(rec.cursor, Some((7, 21)));
        assert_eq!(rec.row_text(1).trim_start(), "score[0] mines[0:1] steps[0] lvl[0]");
        assert_eq!(rec.presents, 1);
    }

    #[test]
    fn mines_hidden_until_revealed() {
        let (mut rec, layout, mut field, tracker) = setup(40, 10, &[(3, 3)]);
        render(&mut rec, &layout, &field, &tracker, &[]).unwrap();
        assert_eq!(rec.cell(2 + 3, 1 + 3), None);

        field.toggle_mines();
        render(&mut rec, &layout, &field, &tracker, &[]).unwrap();
        assert_eq!(rec.cell(2 + 3, 1 + 3), Some((MINE_GLYPH, Attr::Dim)));
    }

    #[test]
    fn reset_clears_revealed_mines_and_tracks() {
        let (mut rec, layout, mut field, tracker) = setup(40, 10, &[(3, 3)]);
        let t = ProximityTable::default();
        field.toggle_mines();
        field.move_player(MoveDir::Left, &t);
        render(&mut rec, &layout, &field, &tracker, &[]).unwrap();
        assert_eq!(rec.cell(2 + 3, 1 + 3), Some((MINE_GLYPH, Attr::Dim)));
        assert_eq!(rec.cell(2 + 5, 1 + 20).map(|(ch, _)| ch), Some(TRACK_GLYPH));

        field.reset_player(&t);
        render(&mut rec, &layout, &field, &tracker, &[]).unwrap();
        assert_eq!(rec.cell(2 + 3, 1 + 3), None);
        assert_eq!(rec.cell(2 + 5, 1 + 20), Some((PLAYER_GLYPH, field.player().trail)));
        assert_eq!(rec.cell(2 + 5, 1 + 19), None);
    }

    #[test]
    fn tracks_are_drawn() {
        let (mut rec, layout, mut field, tracker) = setup(40, 10, &[(38, 8)]);
        let t = ProximityTable::default();
        field.move_player(MoveDir::Left, &t);
        render(&mut rec, &layout, &field, &tracker, &[]).unwrap();
        let trail = rec.cell(2 + 5, 1 + 20).map(|(ch, _)| ch);
        assert_eq!(trail, Some(TRACK_GLYPH));
    }

    #[test]
    fn one_flash_per_defused_mine() {
        let (mut rec, layout, field, tracker) = setup(20, 8, &[(1, 1)]);
        let events = [
            GameEvent::MineDefused { x: 10, y: 4 },
            GameEvent::MineDefused { x: 10, y: 4 },
            GameEvent::PlayerMoved { x: 1, y: 1 },
        ];
        render(&mut rec, &layout, &field, &tracker, &events).unwrap();
        assert_eq!(rec.flashes, 2);
    }

    #[test]
    fn message_box_blocks_and_closes() {
        let (mut rec, layout, _, _) = setup(40, 10, &[(1, 1)]);
        let before = rec.open_count();
        rec.push_keys("x");
        message_box(&mut rec, &layout, "field clear").unwrap();
        assert_eq!(rec.blocking_reads, 1);
        assert_eq!(rec.pending_keys(), 0);
        assert_eq!(rec.open_count(), before);
        assert!(rec.row_text(7).contains("field clear"));
    }

    #[test]
    fn message_box_fits_narrowest_field() {
        let (mut rec, layout, _, _) = setup(5, 5, &[(1, 1)]);
        rec.push_keys("x");
        message_box(&mut rec, &layout, "field clear").unwrap();
        assert_eq!(rec.blocking_reads, 1);
        assert_eq!(rec.open_count(), 4);
        assert_eq!(rec.row_text(4), "|field|");
    }
}
