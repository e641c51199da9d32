/// The drawing surface the game engine talks to.
///
/// The engine never touches the terminal itself. Everything it needs goes
/// through `Display`: rectangular surfaces placed on the screen, single
/// styled glyphs, text runs, borders, a flash, and one key per frame.
///
/// Surface coordinates are `(row, col)` relative to the surface origin.
/// Drawing outside a surface is clipped silently.

use std::io;

use crate::domain::proximity::Attr;

/// Handle to a surface opened with `Display::open_surface`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Surface(pub usize);

/// A key event as seen by the game, independent of the backend.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Esc,
    /// Ctrl+C under raw mode.
    Interrupt,
    Other,
}

pub trait Display {
    /// Screen size as `(cols, rows)`.
    fn size(&self) -> (u16, u16);

    fn open_surface(&mut self, width: u16, height: u16, row: u16, col: u16) -> io::Result<Surface>;
    fn close_surface(&mut self, surface: Surface);

    fn draw_glyph(&mut self, surface: Surface, row: u16, col: u16, ch: char, attr: Attr);
    fn draw_text(&mut self, surface: Surface, row: u16, col: u16, text: &str, attr: Attr);
    fn draw_border(&mut self, surface: Surface);
    fn clear_surface(&mut self, surface: Surface);
    fn move_cursor(&mut self, surface: Surface, row: u16, col: u16);

    /// Flush everything drawn since the last call to the screen.
    fn present(&mut self) -> io::Result<()>;

    /// One key, or None when non-blocking and nothing arrived this frame.
    fn read_input(&mut self, blocking: bool) -> io::Result<Option<Key>>;

    /// One-shot visual/audible alert.
    fn flash(&mut self) -> io::Result<()>;
}
