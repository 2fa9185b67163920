//! Raw mode, alternate screen and mouse capture, restored on drop.

use std::io::{self, Stdout};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::TuiError;

pub(crate) type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Owns the terminal while the UI runs.
///
/// Dropping the guard puts the terminal back the way it was, also when the event loop
/// bails out with an error.
pub(crate) struct TerminalGuard {
    terminal: CrosstermTerminal,
}

impl TerminalGuard {
    pub(crate) fn enter() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            abandon();
            return Err(err.into());
        }
        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                abandon();
                Err(err.into())
            }
        }
    }

    pub(crate) fn terminal(&mut self) -> &mut CrosstermTerminal {
        &mut self.terminal
    }

    fn restore(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

/// Best-effort undo of a half-finished `enter`, before a guard exists to do it.
fn abandon() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
    let _ = disable_raw_mode();
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            tracing::warn!(%err, "failed to restore terminal");
        }
    }
}
