//! Terminal setup for segbar.
//!
//! A [`Session`] holds the terminal in raw mode on the alternate screen for
//! as long as it lives. Mouse capture is on by default so clicks and wheel
//! reports reach the input task.

use anyhow::Result;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
};
use std::io::stdout;

pub trait TerminalBackend {
    /// Switch into full-screen mode. Calling it again is a no-op.
    fn enter(&mut self) -> Result<()>;
    /// Restore the terminal. A no-op unless entered.
    fn leave(&mut self) -> Result<()>;
    /// (columns, rows)
    fn size(&self) -> Result<(u16, u16)>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenOptions {
    pub title: Option<String>,
    pub mouse: bool,
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            title: None,
            mouse: true,
        }
    }
}

impl ScreenOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

pub struct CrosstermBackend {
    options: ScreenOptions,
    active: bool,
}

impl CrosstermBackend {
    pub fn new(options: ScreenOptions) -> Self {
        Self {
            options,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if self.active {
            return Ok(());
        }
        enable_raw_mode()?;
        let mut out = stdout();
        execute!(out, EnterAlternateScreen, Hide)?;
        if self.options.mouse {
            execute!(out, EnableMouseCapture)?;
        }
        if let Some(title) = &self.options.title {
            execute!(out, SetTitle(title))?;
        }
        self.active = true;
        tracing::debug!(target: "runtime", mouse = self.options.mouse, "terminal_entered");
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        let mut out = stdout();
        if self.options.mouse {
            execute!(out, DisableMouseCapture)?;
        }
        execute!(out, Show, LeaveAlternateScreen)?;
        disable_raw_mode()?;
        self.active = false;
        tracing::debug!(target: "runtime", "terminal_left");
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        Ok(crossterm::terminal::size()?)
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

/// Entered terminal. Leaves on [`Session::close`], or on drop when the
/// runtime unwinds or returns early.
pub struct Session<'a, B: TerminalBackend> {
    backend: &'a mut B,
    open: bool,
}

impl<'a, B: TerminalBackend> Session<'a, B> {
    pub fn enter(backend: &'a mut B) -> Result<Self> {
        backend.enter()?;
        Ok(Self {
            backend,
            open: true,
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        self.backend.size()
    }

    /// Leave and report the error drop would have swallowed.
    pub fn close(mut self) -> Result<()> {
        self.open = false;
        self.backend.leave()
    }
}

impl<B: TerminalBackend> Drop for Session<'_, B> {
    fn drop(&mut self) {
        if self.open {
            let _ = self.backend.leave();
        }
    }
}
