//! Input: keyboard-style keys mapped to discrete rig actions.
//!
//! # Invariants
//! - Consumers read actions, never raw keys.
//! - "Pressed" holds for exactly one frame; "held" until release.

pub mod action;
pub mod keymap;
pub mod state;

pub use action::{Action, RotateDirection};
pub use keymap::{Key, Keymap, UnknownKey};
pub use state::{InputSource, KeyState};
