//! Crossterm presenter
//!
//! Owns the terminal for the life of the game: raw mode, alternate screen and
//! a hidden cursor are set up on creation and restored on drop, including when
//! the game loop bails out with an error.

use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};

use crate::consts::TERMINAL_DEFAULT_SIZE;
use crate::error::GameError;

/// Terminal size in cells, falling back to 80x24 when it cannot be queried
pub fn screen_size() -> (i32, i32) {
    match terminal::size() {
        Ok((w, h)) if w > 0 && h > 0 => (i32::from(w), i32::from(h)),
        Ok(_) => TERMINAL_DEFAULT_SIZE,
        Err(e) => {
            log::warn!("Could not read terminal size: {e}");
            TERMINAL_DEFAULT_SIZE
        }
    }
}

pub struct TerminalPresenter {
    out: Stdout,
}

impl TerminalPresenter {
    /// Take over the terminal
    pub fn new() -> Result<Self, GameError> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        out.execute(EnterAlternateScreen)?;
        out.execute(Hide)?;
        out.execute(Clear(ClearType::All))?;
        Ok(Self { out })
    }

    /// Draw a full frame, one string per row
    pub fn present(&mut self, lines: &[String]) -> Result<(), GameError> {
        for (row, line) in lines.iter().enumerate() {
            let Ok(row) = u16::try_from(row) else {
                break;
            };
            self.out.queue(MoveTo(0, row))?;
            self.out.queue(Print(line))?;
            self.out.queue(Clear(ClearType::UntilNewLine))?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Wipe the screen before a frame of a different shape
    pub fn clear(&mut self) -> Result<(), GameError> {
        self.out.execute(Clear(ClearType::All))?;
        Ok(())
    }
}

impl Drop for TerminalPresenter {
    fn drop(&mut self) {
        // Best effort: the terminal must come back even if one step fails
        let _ = self.out.execute(Show);
        let _ = self.out.execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
