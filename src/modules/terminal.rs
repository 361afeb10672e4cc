//! Raw mode keyboard input for the training modes.

use std::{
    io::{stdout, Write},
    time::Duration,
};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    /// Esc or Ctrl+C.
    Stop,
}

/// Keeps the terminal in raw mode while alive.
pub struct RawMode;

impl RawMode {
    pub fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Prints a line. Raw mode does not translate `\n`, so lines end with `\r\n`.
pub fn line(text: impl AsRef<str>) {
    let mut stdout = stdout();
    let _ = write!(stdout, "{}\r\n", text.as_ref());
    let _ = stdout.flush();
}

/// Blocks until a character or stop key is pressed.
pub fn read_key() -> Result<Key> {
    loop {
        if let Event::Key(key) = event::read()? {
            if let Some(key) = map_key(key) {
                return Ok(key);
            }
        }
    }
}

/// Waits up to `timeout` for a key.
pub fn poll_key(timeout: Duration) -> Result<Option<Key>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    Ok(match event::read()? {
        Event::Key(key) => map_key(key),
        _ => None,
    })
}

/// Drops keys typed before the prompt.
pub fn flush_pending() -> Result<()> {
    while event::poll(Duration::ZERO)? {
        event::read()?;
    }
    Ok(())
}

fn map_key(key: KeyEvent) -> Option<Key> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    match key.code {
        KeyCode::Esc => Some(Key::Stop),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Key::Stop),
        KeyCode::Char(c) if !c.is_whitespace() => Some(Key::Char(c.to_ascii_uppercase())),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_map_key() {
        let key = |code, modifiers| map_key(KeyEvent::new(code, modifiers));
        assert_eq!(key(KeyCode::Char('e'), KeyModifiers::NONE), Some(Key::Char('E')));
        assert_eq!(key(KeyCode::Char('?'), KeyModifiers::SHIFT), Some(Key::Char('?')));
        assert_eq!(key(KeyCode::Char('c'), KeyModifiers::CONTROL), Some(Key::Stop));
        assert_eq!(key(KeyCode::Esc, KeyModifiers::NONE), Some(Key::Stop));
        assert_eq!(key(KeyCode::Char(' '), KeyModifiers::NONE), None);
        assert_eq!(key(KeyCode::Enter, KeyModifiers::NONE), None);
    }
}
