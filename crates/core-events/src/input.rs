//! Terminal input, independent of the backend that produced it.

use std::time::Instant;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ModMask: u8 {
        const CTRL = 1;
        const ALT = 1 << 1;
        const SHIFT = 1 << 2;
        const META = 1 << 3;
        const SUPER = 1 << 4;
    }
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    KeyPress(KeyPress),
    Mouse(MouseEvent),
    /// New terminal size in (columns, rows).
    Resize(u16, u16),
    /// Quits from any state, so it never goes through key bindings.
    CtrlC,
    FocusGained,
    FocusLost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub token: KeyToken,
    /// Auto-repeat from a held key.
    pub repeat: bool,
    /// When the input task saw the key.
    pub at: Instant,
}

impl KeyPress {
    pub fn new(token: KeyToken, repeat: bool) -> Self {
        Self {
            token,
            repeat,
            at: Instant::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Enter,
    Esc,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

/// A key with its modifiers. `Chord` only exists when a modifier is held, so
/// `Char('c')` and Ctrl+`c` compare unequal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyToken {
    Char(char),
    Named(NamedKey),
    Chord { base: Box<KeyToken>, mods: ModMask },
}

impl KeyToken {
    pub fn chord(base: KeyToken, mods: ModMask) -> Self {
        if mods.is_empty() {
            return base;
        }
        KeyToken::Chord {
            base: Box::new(base),
            mods,
        }
    }

    /// The token without modifiers.
    pub fn base(&self) -> &KeyToken {
        match self {
            KeyToken::Chord { base, .. } => base.base(),
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
}

/// Mouse report in 0-based terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub column: u16,
    pub row: u16,
    pub mods: ModMask,
}
