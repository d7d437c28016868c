//! Keymap - key notations and the renderer's built-in bindings.
//!
//! Notations accept both a plain form and a bracketed form:
//!
//! | Plain | Bracketed |
//! |---|---|
//! | `Esc` | `<Esc>` |
//! | `Shift+Tab` | `<S-Tab>` |
//! | `Ctrl+l` | `<C-l>` |
//!
//! Bindings match [`crossterm`] key events. `Shift+Tab` and `BackTab` are the
//! same key, and shift is ignored for character keys (the character already
//! carries the case).

use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::KeyParseError;

// =============================================================================
// KEY BINDING
// =============================================================================

/// A single key plus modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    code: KeyCode,
    modifiers: KeyModifiers,
}

fn normalize(code: KeyCode, modifiers: KeyModifiers) -> (KeyCode, KeyModifiers) {
    match code {
        KeyCode::Tab if modifiers.contains(KeyModifiers::SHIFT) => {
            (KeyCode::BackTab, modifiers - KeyModifiers::SHIFT)
        }
        KeyCode::BackTab | KeyCode::Char(_) => (code, modifiers - KeyModifiers::SHIFT),
        _ => (code, modifiers),
    }
}

fn parse_modifier(name: &str) -> Result<KeyModifiers, KeyParseError> {
    match name.to_ascii_lowercase().as_str() {
        "c" | "ctrl" | "control" => Ok(KeyModifiers::CONTROL),
        "s" | "shift" => Ok(KeyModifiers::SHIFT),
        "a" | "m" | "alt" | "meta" | "option" => Ok(KeyModifiers::ALT),
        "d" | "super" | "cmd" => Ok(KeyModifiers::SUPER),
        _ => Err(KeyParseError::UnknownModifier(name.to_string())),
    }
}

fn parse_code(name: &str) -> Result<KeyCode, KeyParseError> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    let lower = name.to_ascii_lowercase();
    let code = match lower.as_str() {
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "enter" | "cr" | "return" => KeyCode::Enter,
        "space" => KeyCode::Char(' '),
        "bs" | "backspace" => KeyCode::Backspace,
        "del" | "delete" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "lt" => KeyCode::Char('<'),
        _ => match lower.strip_prefix('f').map(str::parse::<u8>) {
            Some(Ok(n)) if (1..=12).contains(&n) => KeyCode::F(n),
            _ => return Err(KeyParseError::UnknownKey(name.to_string())),
        },
    };
    Ok(code)
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        let (code, modifiers) = normalize(code, modifiers);
        Self { code, modifiers }
    }

    /// Parse a notation such as `"Esc"`, `"Shift+Tab"` or `"<C-l>"`.
    pub fn parse(notation: &str) -> Result<Self, KeyParseError> {
        let trimmed = notation.trim();
        if trimmed.is_empty() {
            return Err(KeyParseError::Empty);
        }

        let (body, separator) = match trimmed
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
        {
            Some(inner) if !inner.is_empty() => (inner, '-'),
            _ => (trimmed, '+'),
        };

        // The last segment is the key; a trailing separator means the separator itself
        let (prefix, key) = match body.rsplit_once(separator) {
            Some((prefix, "")) => (
                prefix.strip_suffix(separator).unwrap_or(prefix),
                separator.to_string(),
            ),
            Some((prefix, key)) => (prefix, key.to_string()),
            None => ("", body.to_string()),
        };

        let mut modifiers = KeyModifiers::NONE;
        if !prefix.is_empty() {
            for name in prefix.split(separator) {
                modifiers |= parse_modifier(name.trim())?;
            }
        }
        let code = parse_code(key.trim())?;
        Ok(Self::new(code, modifiers))
    }

    pub fn code(&self) -> KeyCode {
        self.code
    }

    pub fn modifiers(&self) -> KeyModifiers {
        self.modifiers
    }

    /// Whether `event` is a press (or repeat) of this binding.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if event.kind == KeyEventKind::Release {
            return false;
        }
        normalize(event.code, event.modifiers) == (self.code, self.modifiers)
    }
}

impl FromStr for KeyBinding {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut modifiers = self.modifiers;
        if self.code == KeyCode::BackTab {
            modifiers |= KeyModifiers::SHIFT;
        }
        for (flag, name) in [
            (KeyModifiers::CONTROL, "Ctrl"),
            (KeyModifiers::ALT, "Alt"),
            (KeyModifiers::SUPER, "Super"),
            (KeyModifiers::SHIFT, "Shift"),
        ] {
            if modifiers.contains(flag) {
                write!(f, "{name}+")?;
            }
        }
        match self.code {
            KeyCode::BackTab | KeyCode::Tab => write!(f, "Tab"),
            KeyCode::Char(' ') => write!(f, "Space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "F{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

// =============================================================================
// KEYMAP
// =============================================================================

/// Keys for the renderer's built-in mappings.
///
/// Directional bindings are only installed when set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    pub close: Option<KeyBinding>,
    pub focus_next: Option<KeyBinding>,
    pub focus_prev: Option<KeyBinding>,
    pub focus_left: Option<KeyBinding>,
    pub focus_right: Option<KeyBinding>,
    pub focus_up: Option<KeyBinding>,
    pub focus_down: Option<KeyBinding>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            close: Some(KeyBinding::new(KeyCode::Esc, KeyModifiers::NONE)),
            focus_next: Some(KeyBinding::new(KeyCode::Tab, KeyModifiers::NONE)),
            focus_prev: Some(KeyBinding::new(KeyCode::BackTab, KeyModifiers::NONE)),
            focus_left: None,
            focus_right: None,
            focus_up: None,
            focus_down: None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
