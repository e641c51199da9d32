/// Terminal backend for `Display`: double-buffered, diff-based crossterm
/// renderer.
///
/// How it works:
///   1. Surface draw calls write into the `front` buffer (array of Cell)
///   2. `present()` compares each cell with `back` (what is on screen)
///   3. Only cells that changed emit terminal commands
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. `back` takes a copy of `front`; `front` is retained, so a surface
///      keeps its content until it is cleared or redrawn
///
/// Surfaces are plain rectangles on that one buffer. Closing a surface
/// forgets its rectangle; what it drew stays until overdrawn.

use std::io::{self, BufWriter, Write};
use std::time::Duration;

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::config::{GamepadConfig, InputConfig};
use crate::domain::proximity::Attr;
use super::display::{Display, Key, Surface};
use super::gamepad::GamepadInput;
use super::input;

// ── Cell: the unit of the buffers ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    attr: Attr,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', attr: Attr::Normal };

    /// Never drawn; forces a repaint of every position it fills.
    const INVALID: Cell = Cell { ch: '\0', attr: Attr::Normal };
}

/// Terminal styling for one attribute.
fn style(attr: Attr) -> (Attribute, Color) {
    match attr {
        Attr::Normal => (Attribute::Reset, Color::Grey),
        Attr::Bold => (Attribute::Bold, Color::White),
        Attr::Standout => (Attribute::Reverse, Color::Yellow),
        Attr::Blink => (Attribute::SlowBlink, Color::Red),
        Attr::Dim => (Attribute::Dim, Color::DarkGrey),
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Rect {
    width: u16,
    height: u16,
    row: u16,
    col: u16,
}

impl Rect {
    /// Absolute `(x, y)` of a surface-relative `(row, col)`, clipped.
    fn to_screen(self, row: u16, col: u16) -> Option<(usize, usize)> {
        if row < self.height && col < self.width {
            Some(((self.col + col) as usize, (self.row + row) as usize))
        } else {
            None
        }
    }
}

// ── Border glyphs ──

const TOP_LEFT: char = '┌';
const TOP_RIGHT: char = '┐';
const BOTTOM_LEFT: char = '└';
const BOTTOM_RIGHT: char = '┘';
const HORIZONTAL: char = '─';
const VERTICAL: char = '│';

// ── TerminalDisplay ──

pub struct TerminalDisplay {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: u16,
    term_h: u16,
    surfaces: Vec<Option<Rect>>,
    cursor: Option<(u16, u16)>,
    frame: Duration,
    gamepad: GamepadInput,
}

impl TerminalDisplay {
    pub fn new(input_cfg: &InputConfig, gamepad_cfg: &GamepadConfig) -> Self {
        TerminalDisplay {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            surfaces: vec![],
            cursor: None,
            frame: Duration::from_millis(input_cfg.frame_ms),
            gamepad: GamepadInput::new(gamepad_cfg),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size()?;
        self.term_w = tw;
        self.term_h = th;
        self.front = FrameBuffer::new(tw as usize, th as usize);
        self.back = FrameBuffer::new(tw as usize, th as usize);
        // Force full repaint on first present.
        self.back.cells.fill(Cell::INVALID);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            SetAttribute(Attribute::Reset),
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    fn rect(&self, s: Surface) -> Option<Rect> {
        self.surfaces.get(s.0).copied().flatten()
    }

    fn put(&mut self, s: Surface, row: u16, col: u16, ch: char, attr: Attr) {
        if let Some((x, y)) = self.rect(s).and_then(|r| r.to_screen(row, col)) {
            self.front.set(x, y, Cell { ch, attr });
        }
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_attr: Option<Attr> = None;
        let mut last_pos: Option<(usize, usize)> = None;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if last_pos != Some((x.wrapping_sub(1), y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if last_attr != Some(cell.attr) {
                    let (attribute, color) = style(cell.attr);
                    // Reset first: terminal attributes are additive.
                    queue!(
                        self.writer,
                        SetAttribute(Attribute::Reset),
                        SetAttribute(attribute),
                        SetForegroundColor(color)
                    )?;
                    last_attr = Some(cell.attr);
                }

                queue!(self.writer, Print(cell.ch))?;
                last_pos = Some((x, y));
            }
        }

        if let Some((row, col)) = self.cursor {
            queue!(self.writer, MoveTo(col, row))?;
        }
        self.writer.flush()
    }
}

impl Display for TerminalDisplay {
    fn size(&self) -> (u16, u16) {
        (self.term_w, self.term_h)
    }

    fn open_surface(&mut self, width: u16, height: u16, row: u16, col: u16) -> io::Result<Surface> {
        let fits = col as u32 + width as u32 <= self.term_w as u32
            && row as u32 + height as u32 <= self.term_h as u32;
        if !fits {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "surface {width}x{height} at ({row}, {col}) exceeds terminal {}x{}",
                    self.term_w, self.term_h
                ),
            ));
        }

        let rect = Some(Rect { width, height, row, col });
        let slot = match self.surfaces.iter().position(Option::is_none) {
            Some(i) => {
                self.surfaces[i] = rect;
                i
            }
            None => {
                self.surfaces.push(rect);
                self.surfaces.len() - 1
            }
        };
        Ok(Surface(slot))
    }

    fn close_surface(&mut self, surface: Surface) {
        if let Some(slot) = self.surfaces.get_mut(surface.0) {
            *slot = None;
        }
    }

    fn draw_glyph(&mut self, surface: Surface, row: u16, col: u16, ch: char, attr: Attr) {
        self.put(surface, row, col, ch, attr);
    }

    fn draw_text(&mut self, surface: Surface, row: u16, col: u16, text: &str, attr: Attr) {
        for (i, ch) in text.chars().enumerate() {
            self.put(surface, row, col.saturating_add(i as u16), ch, attr);
        }
    }

    fn draw_border(&mut self, surface: Surface) {
        let Some(r) = self.rect(surface) else { return };
        if r.width < 2 || r.height < 2 {
            return;
        }
        let (right, bottom) = (r.width - 1, r.height - 1);
        for c in 1..right {
            self.put(surface, 0, c, HORIZONTAL, Attr::Normal);
            self.put(surface, bottom, c, HORIZONTAL, Attr::Normal);
        }
        for row in 1..bottom {
            self.put(surface, row, 0, VERTICAL, Attr::Normal);
            self.put(surface, row, right, VERTICAL, Attr::Normal);
        }
        self.put(surface, 0, 0, TOP_LEFT, Attr::Normal);
        self.put(surface, 0, right, TOP_RIGHT, Attr::Normal);
        self.put(surface, bottom, 0, BOTTOM_LEFT, Attr::Normal);
        self.put(surface, bottom, right, BOTTOM_RIGHT, Attr::Normal);
    }

    fn clear_surface(&mut self, surface: Surface) {
        let Some(r) = self.rect(surface) else { return };
        for row in 0..r.height {
            for col in 0..r.width {
                self.put(surface, row, col, ' ', Attr::Normal);
            }
        }
    }

    fn move_cursor(&mut self, surface: Surface, row: u16, col: u16) {
        if let Some((x, y)) = self.rect(surface).and_then(|r| r.to_screen(row, col)) {
            self.cursor = Some((y as u16, x as u16));
        }
    }

    fn present(&mut self) -> io::Result<()> {
        self.flush_diff()?;
        self.back.cells.copy_from_slice(&self.front.cells);
        Ok(())
    }

    fn read_input(&mut self, blocking: bool) -> io::Result<Option<Key>> {
        loop {
            if let Some(key) = self.gamepad.next_key() {
                return Ok(Some(key));
            }
            if let Some(key) = input::poll_key(self.frame)? {
                return Ok(Some(key));
            }
            if !blocking {
                return Ok(None);
            }
        }
    }

    fn flash(&mut self) -> io::Result<()> {
        execute!(self.writer, Print('\u{7}'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_clips_to_surface() {
        let r = Rect { width: 4, height: 2, row: 3, col: 5 };
        assert_eq!(r.to_screen(0, 0), Some((5, 3)));
        assert_eq!(r.to_screen(1, 3), Some((8, 4)));
        assert_eq!(r.to_screen(2, 0), None);
        assert_eq!(r.to_screen(0, 4), None);
    }

    #[test]
    fn every_attr_has_a_distinct_color() {
        let attrs = [Attr::Normal, Attr::Bold, Attr::Standout, Attr::Blink, Attr::Dim];
        for (i, a) in attrs.iter().enumerate() {
            for b in &attrs[i + 1..] {
                assert_ne!(style(*a).1, style(*b).1);
            }
        }
    }

    #[test]
    fn invalid_differs_from_blank() {
        assert!(Cell::INVALID != Cell::BLANK);
        let mut fb = FrameBuffer::new(3, 2);
        fb.set(2, 1, Cell { ch: 'X', attr: Attr::Blink });
        fb.set(3, 1, Cell { ch: 'Y', attr: Attr::Blink });
        assert_eq!(fb.get(2, 1).ch, 'X');
        assert!(fb.get(3, 1) == Cell::BLANK);
    }
}
