/// Keyboard input: crossterm events → `Key` → `Command`.
///
/// The command table is fixed:
///
///   w/a/s/d (or arrows)  move
///   f                    fire
///   c                    toggle mine visibility
///   r                    reset player + tracks
///   q, Esc, Ctrl+C       quit
///
/// Anything else decodes to None and the frame is a no-op.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::{Command, MoveDir};
use super::display::Key;

// ── Key Constants ──

const KEYS_LEFT: &[Key] = &[Key::Left, Key::Char('a'), Key::Char('A')];
const KEYS_RIGHT: &[Key] = &[Key::Right, Key::Char('d'), Key::Char('D')];
const KEYS_UP: &[Key] = &[Key::Up, Key::Char('w'), Key::Char('W')];
const KEYS_DOWN: &[Key] = &[Key::Down, Key::Char('s'), Key::Char('S')];
const KEYS_FIRE: &[Key] = &[Key::Char('f'), Key::Char('F')];
const KEYS_CHEAT: &[Key] = &[Key::Char('c'), Key::Char('C')];
const KEYS_RESET: &[Key] = &[Key::Char('r'), Key::Char('R')];
const KEYS_QUIT: &[Key] = &[Key::Char('q'), Key::Char('Q'), Key::Esc, Key::Interrupt];

/// Map one key to a game command.
pub fn decode(key: Key) -> Option<Command> {
    let cmd = if KEYS_UP.contains(&key) {
        Command::Move(MoveDir::Up)
    } else if KEYS_DOWN.contains(&key) {
        Command::Move(MoveDir::Down)
    } else if KEYS_LEFT.contains(&key) {
        Command::Move(MoveDir::Left)
    } else if KEYS_RIGHT.contains(&key) {
        Command::Move(MoveDir::Right)
    } else if KEYS_FIRE.contains(&key) {
        Command::Fire
    } else if KEYS_CHEAT.contains(&key) {
        Command::ToggleCheat
    } else if KEYS_RESET.contains(&key) {
        Command::Reset
    } else if KEYS_QUIT.contains(&key) {
        Command::Quit
    } else {
        return None;
    };
    Some(cmd)
}

/// Translate a crossterm key event. Release events are dropped.
pub fn key_from_event(key: KeyEvent) -> Option<Key> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let k = match key.code {
        KeyCode::Char('c') | KeyCode::Char('C') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Key::Interrupt
        }
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Esc => Key::Esc,
        _ => Key::Other,
    };
    Some(k)
}

/// Wait up to `timeout` for one key press. Non-key events (resize, mouse,
/// focus) are consumed and ignored.
pub fn poll_key(timeout: Duration) -> io::Result<Option<Key>> {
    while event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            if let Some(k) = key_from_event(key) {
                return Ok(Some(k));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_moves() {
        assert_eq!(decode(Key::Char('w')), Some(Command::Move(MoveDir::Up)));
        assert_eq!(decode(Key::Char('a')), Some(Command::Move(MoveDir::Left)));
        assert_eq!(decode(Key::Char('s')), Some(Command::Move(MoveDir::Down)));
        assert_eq!(decode(Key::Char('d')), Some(Command::Move(MoveDir::Right)));
        assert_eq!(decode(Key::Up), Some(Command::Move(MoveDir::Up)));
        assert_eq!(decode(Key::Char('D')), Some(Command::Move(MoveDir::Right)));
    }

    #[test]
    fn action_keys() {
        assert_eq!(decode(Key::Char('f')), Some(Command::Fire));
        assert_eq!(decode(Key::Char('c')), Some(Command::ToggleCheat));
        assert_eq!(decode(Key::Char('r')), Some(Command::Reset));
        assert_eq!(decode(Key::Char('q')), Some(Command::Quit));
        assert_eq!(decode(Key::Esc), Some(Command::Quit));
        assert_eq!(decode(Key::Interrupt), Some(Command::Quit));
    }

    #[test]
    fn unknown_keys_are_noops() {
        for k in [Key::Char('x'), Key::Char(' '), Key::Char('1'), Key::Other] {
            assert_eq!(decode(k), None);
        }
    }

    #[test]
    fn ctrl_c_is_interrupt() {
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_from_event(ev), Some(Key::Interrupt));
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert_eq!(key_from_event(ev), Some(Key::Char('c')));
    }

    #[test]
    fn release_is_dropped() {
        let mut ev = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::NONE);
        ev.kind = KeyEventKind::Release;
        assert_eq!(key_from_event(ev), None);
    }

    #[test]
    fn special_keys() {
        assert_eq!(key_from_event(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE)), Some(Key::Left));
        assert_eq!(key_from_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)), Some(Key::Esc));
        assert_eq!(key_from_event(KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE)), Some(Key::Other));
    }
}
