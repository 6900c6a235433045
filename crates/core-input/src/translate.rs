//! crossterm -> `core_events` translation.
//!
//! Only what the segment bar binds survives: key presses and repeats, mouse
//! buttons and wheel, resize and focus. Releases, pointer motion and pastes
//! translate to `None`.

use core_events::{
    InputEvent, KeyPress, KeyToken, ModMask, MouseButton, MouseEvent, MouseEventKind, NamedKey,
};
use crossterm::event::{
    Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton as CButton,
    MouseEvent as CMouseEvent, MouseEventKind as CMouseKind,
};

pub fn mod_mask(mods: KeyModifiers) -> ModMask {
    [
        (KeyModifiers::CONTROL, ModMask::CTRL),
        (KeyModifiers::ALT, ModMask::ALT),
        (KeyModifiers::SHIFT, ModMask::SHIFT),
        (KeyModifiers::SUPER, ModMask::SUPER),
        (KeyModifiers::META, ModMask::META),
    ]
    .into_iter()
    .filter(|(c, _)| mods.contains(*c))
    .fold(ModMask::empty(), |acc, (_, m)| acc | m)
}

/// Base token for a key code, `None` for keys nothing binds (editing keys,
/// media, locks).
pub fn key_token(code: KeyCode) -> Option<KeyToken> {
    let named = match code {
        KeyCode::Char(c) => return Some(KeyToken::Char(c)),
        KeyCode::F(n) => NamedKey::F(n),
        KeyCode::Enter => NamedKey::Enter,
        KeyCode::Esc => NamedKey::Esc,
        KeyCode::Tab => NamedKey::Tab,
        KeyCode::BackTab => NamedKey::BackTab,
        KeyCode::Up => NamedKey::Up,
        KeyCode::Down => NamedKey::Down,
        KeyCode::Left => NamedKey::Left,
        KeyCode::Right => NamedKey::Right,
        KeyCode::Home => NamedKey::Home,
        KeyCode::End => NamedKey::End,
        KeyCode::PageUp => NamedKey::PageUp,
        KeyCode::PageDown => NamedKey::PageDown,
        _ => return None,
    };
    Some(KeyToken::Named(named))
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Key press or repeat as an input event. Modifiers fold into a chord.
pub fn translate_key(key: &KeyEvent) -> Option<InputEvent> {
    let repeat = match key.kind {
        KeyEventKind::Press => false,
        KeyEventKind::Repeat => true,
        KeyEventKind::Release => return None,
    };
    if is_ctrl_c(key) {
        return Some(InputEvent::CtrlC);
    }
    let token = KeyToken::chord(key_token(key.code)?, mod_mask(key.modifiers));
    Some(InputEvent::KeyPress(KeyPress::new(token, repeat)))
}

fn button(b: CButton) -> MouseButton {
    match b {
        CButton::Left => MouseButton::Left,
        CButton::Middle => MouseButton::Middle,
        CButton::Right => MouseButton::Right,
    }
}

/// Mouse report in 0-based cells. Motion without a button is dropped.
pub fn translate_mouse(m: &CMouseEvent) -> Option<MouseEvent> {
    let kind = match m.kind {
        CMouseKind::Moved => return None,
        CMouseKind::Down(b) => MouseEventKind::Down(button(b)),
        CMouseKind::Up(b) => MouseEventKind::Up(button(b)),
        CMouseKind::Drag(b) => MouseEventKind::Drag(button(b)),
        CMouseKind::ScrollUp => MouseEventKind::ScrollUp,
        CMouseKind::ScrollDown => MouseEventKind::ScrollDown,
        CMouseKind::ScrollLeft => MouseEventKind::ScrollLeft,
        CMouseKind::ScrollRight => MouseEventKind::ScrollRight,
    };
    Some(MouseEvent {
        kind,
        column: m.column,
        row: m.row,
        mods: mod_mask(m.modifiers),
    })
}

pub fn translate(event: &CEvent) -> Option<InputEvent> {
    match event {
        CEvent::Key(key) => translate_key(key),
        CEvent::Mouse(m) => translate_mouse(m).map(InputEvent::Mouse),
        CEvent::Resize(w, h) => Some(InputEvent::Resize(*w, *h)),
        CEvent::FocusGained => Some(InputEvent::FocusGained),
        CEvent::FocusLost => Some(InputEvent::FocusLost),
        // Bracketed paste is never enabled.
        CEvent::Paste(_) => None,
    }
}
