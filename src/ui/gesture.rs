//! Press / Hold / Release → short or long key actions.
//!
//! A long action fires on Hold. A short action fires on Release, but only
//! if that press did not already produce a long action, so holding a key
//! never triggers both.

use crate::keypad::{ButtonEvent, ButtonEventKind, ButtonId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    Short,
    Long,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyAction {
    pub button: ButtonId,
    pub gesture: Gesture,
}

impl KeyAction {
    pub const fn short(button: ButtonId) -> Self {
        Self {
            button,
            gesture: Gesture::Short,
        }
    }

    pub const fn long(button: ButtonId) -> Self {
        Self {
            button,
            gesture: Gesture::Long,
        }
    }

    /// Digit value of a short digit key.
    pub fn digit(&self) -> Option<u8> {
        match self.gesture {
            Gesture::Short => self.button.digit(),
            Gesture::Long => None,
        }
    }

    pub fn is_short(&self, button: ButtonId) -> bool {
        self.button == button && self.gesture == Gesture::Short
    }

    pub fn is_long(&self, button: ButtonId) -> bool {
        self.button == button && self.gesture == Gesture::Long
    }
}

#[derive(Default)]
pub struct GestureDecoder {
    held: [bool; ButtonId::COUNT],
}

impl GestureDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode(&mut self, event: ButtonEvent) -> Option<KeyAction> {
        let held = &mut self.held[event.button.index()];
        match event.kind {
            ButtonEventKind::Press => {
                *held = false;
                None
            }
            ButtonEventKind::Hold => {
                *held = true;
                Some(KeyAction::long(event.button))
            }
            ButtonEventKind::Release => {
                if core::mem::take(held) {
                    None
                } else {
                    Some(KeyAction::short(event.button))
                }
            }
        }
    }
}
