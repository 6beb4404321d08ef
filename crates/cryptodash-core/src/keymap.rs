//! Key mapping
//!
//! Raw keys arrive from the terminal backend as [`Key`] values. A [`KeyMap`]
//! turns them into semantic [`Action`]s from a single declarative binding
//! table, validated once at startup. Keys with no binding are handed to the
//! list-navigation driver untouched.

use std::{collections::HashMap, fmt};

use crate::{sort::SortKey, Error, Result};

/// Backend-independent key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Char(char),
    /// A character typed with Ctrl held.
    Ctrl(char),
    /// Function key F1..=F12.
    F(u8),
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Esc,
    Tab,
    Backspace,
}

/// What a key means to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    First,
    Last,
    /// Toggle the row mark and open the coin page when newly marked.
    Select,
    Sort(SortKey),
    ToggleHelp,
    Refresh,
    Quit,
    /// Esc: leaves the help overlay, otherwise quits.
    Back,
    /// Show or hide the global market summary panel.
    ToggleSummary,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(' ') => f.write_str("Space"),
            Self::Char(c) => write!(f, "{c}"),
            Self::Ctrl(c) => write!(f, "Ctrl-{}", c.to_ascii_uppercase()),
            Self::F(n) => write!(f, "F{n}"),
            Self::Up => f.write_str("Up"),
            Self::Down => f.write_str("Down"),
            Self::Left => f.write_str("Left"),
            Self::Right => f.write_str("Right"),
            Self::PageUp => f.write_str("PgUp"),
            Self::PageDown => f.write_str("PgDn"),
            Self::Home => f.write_str("Home"),
            Self::End => f.write_str("End"),
            Self::Enter => f.write_str("Enter"),
            Self::Esc => f.write_str("Esc"),
            Self::Tab => f.write_str("Tab"),
            Self::Backspace => f.write_str("Bksp"),
        }
    }
}

/// Default binding table. Sort keys follow the column order and keep the
/// F1..F12 aliases.
pub const DEFAULT_BINDINGS: &[(Key, Action)] = &[
    (Key::Up, Action::MoveUp),
    (Key::Char('k'), Action::MoveUp),
    (Key::Down, Action::MoveDown),
    (Key::Char('j'), Action::MoveDown),
    (Key::PageUp, Action::PageUp),
    (Key::Ctrl('b'), Action::PageUp),
    (Key::PageDown, Action::PageDown),
    (Key::Ctrl('f'), Action::PageDown),
    (Key::Char('g'), Action::First),
    (Key::Char('G'), Action::Last),
    (Key::Enter, Action::Select),
    (Key::Char(' '), Action::Select),
    (Key::Char('r'), Action::Sort(SortKey::Rank)),
    (Key::F(1), Action::Sort(SortKey::Rank)),
    (Key::Char('n'), Action::Sort(SortKey::Name)),
    (Key::F(2), Action::Sort(SortKey::Name)),
    (Key::Char('s'), Action::Sort(SortKey::Symbol)),
    (Key::F(3), Action::Sort(SortKey::Symbol)),
    (Key::Char('p'), Action::Sort(SortKey::Price)),
    (Key::F(4), Action::Sort(SortKey::Price)),
    (Key::Char('m'), Action::Sort(SortKey::MarketCap)),
    (Key::F(5), Action::Sort(SortKey::MarketCap)),
    (Key::Char('v'), Action::Sort(SortKey::Volume24h)),
    (Key::F(6), Action::Sort(SortKey::Volume24h)),
    (Key::Char('1'), Action::Sort(SortKey::Change1h)),
    (Key::F(7), Action::Sort(SortKey::Change1h)),
    (Key::Char('2'), Action::Sort(SortKey::Change24h)),
    (Key::F(8), Action::Sort(SortKey::Change24h)),
    (Key::Char('7'), Action::Sort(SortKey::Change7d)),
    (Key::F(9), Action::Sort(SortKey::Change7d)),
    (Key::Char('t'), Action::Sort(SortKey::TotalSupply)),
    (Key::F(10), Action::Sort(SortKey::TotalSupply)),
    (Key::Char('a'), Action::Sort(SortKey::AvailableSupply)),
    (Key::F(11), Action::Sort(SortKey::AvailableSupply)),
    (Key::Char('u'), Action::Sort(SortKey::LastUpdated)),
    (Key::F(12), Action::Sort(SortKey::LastUpdated)),
    (Key::Char('h'), Action::ToggleHelp),
    (Key::Char('?'), Action::ToggleHelp),
    (Key::Char('R'), Action::Refresh),
    (Key::Char('M'), Action::ToggleSummary),
    (Key::Char('q'), Action::Quit),
    (Key::Ctrl('c'), Action::Quit),
    (Key::Esc, Action::Back),
];

/// Validated key-to-action lookup.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<Key, Action>,
}

impl KeyMap {
    /// Build a keymap from a binding table.
    ///
    /// Binding the same key twice to the same action is harmless; binding it
    /// to two different actions is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the conflicting key.
    pub fn new(table: &[(Key, Action)]) -> Result<Self> {
        table
            .iter()
            .try_fold(HashMap::with_capacity(table.len()), |mut acc, &(key, action)| {
                match acc.insert(key, action) {
                    Some(previous) if previous != action => Err(Error::invalid_config(format!(
                        "key {key:?} bound to both {previous:?} and {action:?}"
                    ))),
                    _ => Ok(acc),
                }
            })
            .map(|bindings| Self { bindings })
    }

    /// The standard dashboard bindings.
    ///
    /// # Errors
    ///
    /// Returns an error only if [`DEFAULT_BINDINGS`] contains a conflict.
    pub fn standard() -> Result<Self> {
        Self::new(DEFAULT_BINDINGS)
    }

    /// Action bound to `key`, or `None` when the key is unmapped.
    pub fn resolve(&self, key: Key) -> Option<Action> {
        self.bindings.get(&key).copied()
    }

    /// All keys bound to `action` in a stable order, for help text.
    pub fn keys_for(&self, action: Action) -> Vec<Key> {
        let mut keys: Vec<Key> = self
            .bindings
            .iter()
            .filter(|(_, bound)| **bound == action)
            .map(|(key, _)| *key)
            .collect();
        keys.sort_unstable();
        keys
    }
}
