/// Intro splash: the logo is drawn in from both ends at once, one glyph
/// pair per step, then the screen waits for any key.

use std::io;
use std::thread;
use std::time::Duration;

use crate::domain::proximity::Attr;
use super::display::Display;

const LOGO: [&str; 3] = [
    r"  //| //||  ||  ||\\  |  ||---||",
    r" // |// ||  ||  || \\ |  ||-||  ",
    r"//      ||  ||  ||  \\|  ||---||",
];
const LOGO_W: u16 = 32;
const LOGO_H: u16 = LOGO.len() as u16;

pub const STEP_DELAY: Duration = Duration::from_millis(50);

/// Play the splash. `on_step(step, total)` runs after every drawn pair.
/// A terminal too small for the logo skips straight past it.
pub fn play(
    display: &mut dyn Display,
    delay: Duration,
    mut on_step: impl FnMut(usize, usize),
) -> io::Result<()> {
    let (cols, rows) = display.size();
    if cols < LOGO_W || rows < LOGO_H {
        return Ok(());
    }
    let row = (rows / 3).saturating_sub(LOGO_H / 2);
    let col = (cols / 2).saturating_sub(LOGO_W / 2);
    let surface = display.open_surface(LOGO_W, LOGO_H, row, col)?;

    let glyphs: Vec<char> = LOGO.concat().chars().collect();
    let at = |i: usize| ((i / LOGO_W as usize) as u16, (i % LOGO_W as usize) as u16);
    let steps = glyphs.len().div_ceil(2);

    for i in 0..steps {
        let j = glyphs.len() - 1 - i;
        for k in [i, j] {
            let (r, c) = at(k);
            display.draw_glyph(surface, r, c, glyphs[k], Attr::Bold);
        }
        display.present()?;
        on_step(i, steps);
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    display.read_input(true)?;
    display.clear_surface(surface);
    display.close_surface(surface);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::display::testing::Recorder;

    #[test]
    fn logo_rows_are_even() {
        for line in LOGO {
            assert_eq!(line.chars().count(), LOGO_W as usize);
        }
    }

    #[test]
    fn draws_whole_logo_then_waits() {
        let mut rec = Recorder::new(80, 24);
        rec.push_keys(" ");
        let mut ticks = vec![];
        play(&mut rec, Duration::ZERO, |i, n| ticks.push((i, n))).unwrap();

        assert_eq!(ticks.len(), 48);
        assert_eq!(ticks.last(), Some(&(47, 48)));
        assert_eq!(rec.presents, 48);
        assert_eq!(rec.blocking_reads, 1);
        assert_eq!(rec.open_count(), 0);
    }

    #[test]
    fn tiny_terminal_skips() {
        let mut rec = Recorder::new(20, 2);
        play(&mut rec, Duration::ZERO, |_, _| panic!("no steps expected")).unwrap();
        assert_eq!(rec.blocking_reads, 0);
        assert_eq!(rec.presents, 0);
    }
}
