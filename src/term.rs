//! Raw-mode alternate screen with mouse capture, restored on drop.

use std::io::stdout;

use crossterm::{
    cursor,
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, terminal,
};

use crate::error::Result;

pub struct Terminal {
    /// Key releases are reported (kitty keyboard protocol)
    pub key_releases: bool,
    pub cols: u16,
    pub rows: u16,
}

impl Terminal {
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        // From here on, dropping restores the terminal.
        let mut term = Terminal {
            key_releases: false,
            cols: 0,
            rows: 0,
        };

        let mut out = stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            EnableMouseCapture,
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            term.key_releases = true;
        }
        log::debug!("key release reporting: {}", term.key_releases);

        (term.cols, term.rows) = terminal::size()?;
        Ok(term)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let mut out = stdout();
        if self.key_releases {
            let _ = execute!(out, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(
            out,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        let _ = terminal::disable_raw_mode();
    }
}
