//! Terminal writer.
//!
//! Collects primitive terminal operations for one frame and emits them in a
//! single flush. Consecutive prints in the same style are batched into one
//! `Print` command.
//!
//! Invariants:
//! * Commands preserve ordering; nothing is written before `flush_to`.
//! * Positions are absolute with a (0,0) origin; the caller ensures bounds.
//! * A style change always precedes the first print that needs it, and
//!   `flush_to` resets attributes at the end so later output starts plain.

use crate::CellStyle;
use crate::style::to_crossterm;
use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{Write, stdout};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    ClearLine,
    ClearAll,
    Style(CellStyle),
    Print(String),
}

/// Emission counters for one flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub print_commands: u64,
    pub style_changes: u64,
    pub bytes: u64,
}

#[derive(Default)]
pub struct Writer {
    cmds: Vec<Command>,
    pending: String,
    style: Option<CellStyle>,
    stats: WriteStats,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let s = std::mem::take(&mut self.pending);
        self.cmds.push(Command::Print(s));
        self.stats.print_commands += 1;
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.flush_pending();
        self.cmds.push(Command::MoveTo(x, y));
    }

    pub fn clear_line(&mut self) {
        self.flush_pending();
        self.cmds.push(Command::ClearLine);
    }

    pub fn clear_all(&mut self) {
        self.flush_pending();
        self.cmds.push(Command::ClearAll);
    }

    /// Switch style; no-op when already active.
    pub fn set_style(&mut self, style: CellStyle) {
        if self.style == Some(style) {
            return;
        }
        self.flush_pending();
        self.cmds.push(Command::Style(style));
        self.style = Some(style);
        self.stats.style_changes += 1;
    }

    pub fn print(&mut self, s: &str) {
        self.pending.push_str(s);
    }

    pub fn commands(&mut self) -> &[Command] {
        self.flush_pending();
        &self.cmds
    }

    /// Emit everything into `out`.
    pub fn flush_to<W: Write>(mut self, out: &mut W) -> Result<WriteStats> {
        self.flush_pending();
        for c in self.cmds {
            match c {
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::ClearLine => queue!(out, Clear(ClearType::CurrentLine))?,
                Command::ClearAll => queue!(out, Clear(ClearType::All))?,
                Command::Style(style) => {
                    queue!(
                        out,
                        SetAttribute(Attribute::Reset),
                        SetForegroundColor(style.fg.map(to_crossterm).unwrap_or(Color::Reset)),
                        SetBackgroundColor(style.bg.map(to_crossterm).unwrap_or(Color::Reset))
                    )?;
                    if style.bold {
                        queue!(out, SetAttribute(Attribute::Bold))?;
                    }
                }
                Command::Print(s) => {
                    self.stats.bytes += s.len() as u64;
                    queue!(out, Print(s))?;
                }
            }
        }
        if self.style.is_some() {
            queue!(out, SetAttribute(Attribute::Reset))?;
        }
        out.flush()?;
        Ok(self.stats)
    }

    pub fn flush(self) -> Result<WriteStats> {
        self.flush_to(&mut stdout())
    }
}
