use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::action::Action;

/// Physical keys the rig can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    A,
    S,
    D,
    Q,
    E,
}

impl Key {
    pub const ALL: [Key; 10] = [
        Key::ArrowUp,
        Key::ArrowDown,
        Key::ArrowLeft,
        Key::ArrowRight,
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Q,
        Key::E,
    ];

    /// Lowercase name, as used in keymap files.
    pub fn name(self) -> &'static str {
        match self {
            Key::ArrowUp => "arrow_up",
            Key::ArrowDown => "arrow_down",
            Key::ArrowLeft => "arrow_left",
            Key::ArrowRight => "arrow_right",
            Key::W => "w",
            Key::A => "a",
            Key::S => "s",
            Key::D => "d",
            Key::Q => "q",
            Key::E => "e",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown key '{0}'")]
pub struct UnknownKey(pub String);

impl FromStr for Key {
    type Err = UnknownKey;

    /// Accepts keymap names plus the short arrow aliases `up`, `down`,
    /// `left` and `right`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let alias = match lower.as_str() {
            "up" => Some(Key::ArrowUp),
            "down" => Some(Key::ArrowDown),
            "left" => Some(Key::ArrowLeft),
            "right" => Some(Key::ArrowRight),
            _ => None,
        };
        alias
            .or_else(|| Key::ALL.into_iter().find(|k| k.name() == lower))
            .ok_or_else(|| UnknownKey(s.to_string()))
    }
}

/// Key → action bindings.
///
/// Several keys may map to the same action; a key maps to at most one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keymap {
    bindings: BTreeMap<Key, Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_pairs([
            (Key::ArrowUp, Action::MoveForward),
            (Key::ArrowDown, Action::MoveBack),
            (Key::ArrowLeft, Action::MoveLeft),
            (Key::ArrowRight, Action::MoveRight),
            (Key::A, Action::RotateLeft),
            (Key::D, Action::RotateRight),
        ])
    }
}

impl Keymap {
    /// A keymap with no bindings.
    pub fn empty() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (Key, Action)>) -> Self {
        Self {
            bindings: pairs.into_iter().collect(),
        }
    }

    /// Bind a key, replacing any previous binding. Returns the old action.
    pub fn bind(&mut self, key: Key, action: Action) -> Option<Action> {
        self.bindings.insert(key, action)
    }

    pub fn unbind(&mut self, key: Key) -> Option<Action> {
        self.bindings.remove(&key)
    }

    pub fn action_for(&self, key: Key) -> Option<Action> {
        self.bindings.get(&key).copied()
    }

    /// All keys bound to `action`, in key order.
    pub fn keys_for(&self, action: Action) -> impl Iterator<Item = Key> + '_ {
        self.bindings
            .iter()
            .filter(move |(_, a)| **a == action)
            .map(|(k, _)| *k)
    }
}
