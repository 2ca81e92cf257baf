use log::trace;

use crate::machine::config::KEY_COUNT;

/// Hex keypad latch. Written by the input side through [`Keypad::set_key`],
/// read by the key opcodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    /// Keys outside 0x0..=0xF are ignored.
    pub fn set_key(&mut self, key: usize, is_pressed: bool) {
        let Some(slot) = self.keys.get_mut(key) else {
            trace!("ignoring update for unknown key {key}");
            return;
        };
        *slot = is_pressed;
    }

    pub fn is_pressed(&self, key: usize) -> bool {
        self.keys.get(key).copied().unwrap_or(false)
    }

    /// Lowest-numbered key currently held.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys
            .iter()
            .position(|pressed| *pressed)
            .map(|index| index as u8)
    }

    pub fn release_all(&mut self) {
        self.keys = [false; KEY_COUNT];
    }
}
