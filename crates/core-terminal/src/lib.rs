//! Terminal host for the editor view.
//!
//! Provides everything `core-render` expects from a host widget, backed by a
//! crossterm terminal: a raw-mode backend with an RAII guard, a cell grid
//! [`surface::CellSurface`] that maps view pixels onto terminal cells, the
//! [`host::TerminalHost`] text widget (layout, caret, editing, scrolling), a
//! constant-deceleration fling animator, and input translation.
//!
//! Cell metrics: one terminal cell stands for [`CELL_WIDTH`] x [`CELL_HEIGHT`]
//! view pixels. Layout snaps padding to whole cells so line boxes never
//! straddle two terminal rows.

use anyhow::Result;
use crossterm::{
    cursor::Hide,
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::io::stdout;

pub mod capabilities;
pub mod host;
pub mod input;
pub mod scroller;
pub mod surface;

pub use capabilities::TerminalCapabilities;
pub use host::TerminalHost;
pub use scroller::FrictionScroller;
pub use surface::CellSurface;

/// Width of one terminal cell in view pixels.
pub const CELL_WIDTH: i32 = 8;
/// Height of one terminal cell in view pixels.
pub const CELL_HEIGHT: i32 = 16;
/// Baseline distance from the top of a cell.
pub const BASELINE_OFFSET: i32 = 12;

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
}

pub struct CrosstermBackend {
    entered: bool,
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a> {
    backend: &'a mut CrosstermBackend,
    active: bool,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self { entered: false }
    }

    /// Enter and return a guard that will leave on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        self.enter()?;
        Ok(TerminalGuard {
            backend: self,
            active: true,
        })
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, EnableMouseCapture, Hide)?;
            self.entered = true;
            tracing::debug!(target: "terminal", "entered_alternate_screen");
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, Show)?;
            disable_raw_mode()?;
            self.entered = false;
            tracing::debug!(target: "terminal", "left_alternate_screen");
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl<'a> Drop for TerminalGuard<'a> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.backend.leave();
        }
    }
}
