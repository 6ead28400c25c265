use std::str::FromStr;

use anyhow::Context;
use diorama_input::{Key, KeyState};

/// A key tap scheduled on a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedPress {
    pub tick: u64,
    pub key: Key,
}

impl FromStr for ScriptedPress {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tick, key) = s
            .split_once(':')
            .with_context(|| format!("expected TICK:KEY, got '{s}'"))?;
        Ok(Self {
            tick: tick.trim().parse().with_context(|| format!("bad tick in '{s}'"))?,
            key: key.parse()?,
        })
    }
}

/// Keys held for a whole run plus one-tick taps, replayed into a [`KeyState`].
#[derive(Debug, Clone, Default)]
pub struct KeyScript {
    hold: Vec<Key>,
    press: Vec<ScriptedPress>,
}

impl KeyScript {
    pub fn new(hold: Vec<Key>, press: Vec<ScriptedPress>) -> Self {
        Self { hold, press }
    }

    /// Put every held key down. Call once before the first tick.
    pub fn start(&self, keys: &mut KeyState) {
        for key in &self.hold {
            keys.key_down(*key);
        }
    }

    /// Press this tick's taps. A tap on a held key releases it first so the
    /// press still registers.
    pub fn begin_tick(&self, keys: &mut KeyState, tick: u64) {
        for tap in self.taps(tick) {
            if self.hold.contains(&tap) {
                keys.key_up(tap);
            }
            keys.key_down(tap);
        }
    }

    /// Release this tick's taps, leaving held keys down, and close the frame.
    pub fn end_tick(&self, keys: &mut KeyState, tick: u64) {
        for tap in self.taps(tick).filter(|k| !self.hold.contains(k)) {
            keys.key_up(tap);
        }
        keys.end_frame();
    }

    fn taps(&self, tick: u64) -> impl Iterator<Item = Key> + '_ {
        self.press.iter().filter(move |p| p.tick == tick).map(|p| p.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diorama_input::{Action, InputSource, Keymap};

    fn keys() -> KeyState {
        KeyState::new(Keymap::default())
    }

    #[test]
    fn parses_tick_and_key() {
        let press: ScriptedPress = "3:left".parse().unwrap();
        assert_eq!(
            press,
            ScriptedPress {
                tick: 3,
                key: Key::ArrowLeft
            }
        );
        assert!("left".parse::<ScriptedPress>().is_err());
        assert!("x:left".parse::<ScriptedPress>().is_err());
    }

    #[test]
    fn tap_is_pressed_on_its_tick_only() {
        let script = KeyScript::new(Vec::new(), vec!["1:a".parse().unwrap()]);
        let mut keys = keys();
        script.start(&mut keys);

        script.begin_tick(&mut keys, 0);
        assert!(!keys.was_pressed(Action::RotateLeft));
        script.end_tick(&mut keys, 0);

        script.begin_tick(&mut keys, 1);
        assert!(keys.was_pressed(Action::RotateLeft));
        script.end_tick(&mut keys, 1);
        assert!(!keys.is_held(Action::RotateLeft));
    }

    #[test]
    fn tap_of_a_held_key_registers_and_stays_held() {
        let script = KeyScript::new(vec![Key::A], vec!["2:a".parse().unwrap()]);
        let mut keys = keys();
        script.start(&mut keys);
        script.begin_tick(&mut keys, 0);
        script.end_tick(&mut keys, 0);

        script.begin_tick(&mut keys, 2);
        assert!(keys.was_pressed(Action::RotateLeft));
        script.end_tick(&mut keys, 2);

        assert!(keys.is_held(Action::RotateLeft));
        assert!(!keys.was_pressed(Action::RotateLeft));
    }
}
