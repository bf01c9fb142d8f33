//! Abstract key events consumed by the prompt engine.

/// Modifier flags carried with a key press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        meta: false,
        shift: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        meta: false,
        shift: false,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Return,
    Escape,
    Tab,
    Backspace,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Space,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl Key {
    #[must_use]
    pub fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    #[must_use]
    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifiers::CTRL)
    }

    /// `Ctrl+C` aborts a prompt the same way `Escape` does.
    #[must_use]
    pub fn is_interrupt(&self) -> bool {
        self.modifiers.ctrl && matches!(self.code, KeyCode::Char('c' | 'C'))
    }

    /// The character this key would insert into a text field, if any.
    #[must_use]
    pub fn printable(&self) -> Option<char> {
        if self.modifiers.ctrl || self.modifiers.meta {
            return None;
        }
        match self.code {
            KeyCode::Char(c) if !c.is_control() => Some(c),
            KeyCode::Space => Some(' '),
            _ => None,
        }
    }
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        Self::new(code, Modifiers::NONE)
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        if c == ' ' {
            KeyCode::Space.into()
        } else {
            KeyCode::Char(c).into()
        }
    }
}

/// Converts a string into the key presses that would type it.
pub fn keys_for(text: &str) -> Vec<Key> {
    text.chars().map(Key::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable() {
        assert_eq!(Key::from('a').printable(), Some('a'));
        assert_eq!(Key::from(' ').printable(), Some(' '));
        assert_eq!(Key::from(KeyCode::Up).printable(), None);
        assert_eq!(Key::ctrl('a').printable(), None);
    }

    #[test]
    fn test_interrupt() {
        assert!(Key::ctrl('c').is_interrupt());
        assert!(!Key::from('c').is_interrupt());
    }

    #[test]
    fn test_keys_for_maps_space() {
        let keys = keys_for("a b");
        assert_eq!(keys[1].code, KeyCode::Space);
        assert_eq!(keys.len(), 3);
    }
}
