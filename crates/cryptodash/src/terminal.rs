//! Terminal management
//!
//! Raw mode and the alternate screen are entered once at startup and left
//! exactly once, whichever comes first of a normal return, an early error or a
//! panic.

use std::{
    io::{self, Stdout},
    panic,
    sync::atomic::{AtomicBool, Ordering},
};

use anyhow::{Context, Result};
use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use cryptodash_core::{Dimensions, Error, Screen, View};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::render;

/// Set while the terminal is in raw mode on the alternate screen.
static TERMINAL_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Setup terminal for TUI rendering
///
/// # Errors
/// Returns error if terminal setup fails
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()
        .map_err(|e| Error::Initialization(format!("raw mode unavailable: {e}")))
        .context("Failed to enable raw mode")?;
    TERMINAL_ACTIVE.store(true, Ordering::SeqCst);

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)
        .map_err(|e| Error::Initialization(format!("alternate screen unavailable: {e}")))
        .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
        .map_err(|e| Error::Initialization(e.to_string()))
        .context("Failed to create terminal")
}

/// Leave the alternate screen and raw mode. Only the first call does anything.
///
/// # Errors
/// Returns error if the terminal refuses to leave raw mode
pub fn restore_terminal() -> io::Result<()> {
    if !TERMINAL_ACTIVE.swap(false, Ordering::SeqCst) {
        return Ok(());
    }
    let left = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
    disable_raw_mode()?;
    left
}

/// Restore the terminal before the panic message prints.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        previous(info);
    }));
}

/// The dashboard's screen: a ratatui terminal on stdout.
///
/// Dropping it restores the terminal.
pub struct TerminalScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalScreen {
    /// # Errors
    /// Returns error if the terminal cannot enter raw mode or the alternate
    /// screen
    pub fn open() -> Result<Self> {
        install_panic_hook();
        let terminal = setup_terminal().inspect_err(|_| {
            let _ = restore_terminal();
        })?;
        Ok(Self { terminal })
    }
}

impl Screen for TerminalScreen {
    fn size(&mut self) -> cryptodash_core::Result<Dimensions> {
        let (cols, rows) = crossterm::terminal::size()?;
        Ok(Dimensions::new(rows, cols))
    }

    fn draw(&mut self, view: &View) -> cryptodash_core::Result<()> {
        self.terminal.draw(|f| render::draw(f, view))?;
        Ok(())
    }
}

impl Drop for TerminalScreen {
    fn drop(&mut self) {
        if let Err(e) = restore_terminal() {
            tracing::warn!(error = %e, "Failed to restore terminal");
        }
    }
}
