//! Keypad subsystem - 4×4 matrix to semantic button events.
//!
//! The firmware calls [`KeyInputEngine::scan`] on a fixed period. Each
//! scan samples every matrix position through a [`ContactSampler`], runs
//! the per-button debounce / hold state machine and queues the resulting
//! [`ButtonEvent`]s. The UI poll drains them through [`EventSource`].
//!
//! ## Components
//!
//! - **Matrix**: row/column → [`ButtonId`] mapping table
//! - **Debounce**: one [`KeyState`] machine per button
//! - **Queue**: bounded FIFO between scan and UI poll

pub mod debounce;
pub mod engine;
pub mod matrix;
pub mod queue;

use core::ops::BitOr;

pub use debounce::{KeyState, KeyTiming};
pub use engine::{ImmediateHandler, KeyInputEngine};
pub use matrix::{ContactSampler, KeyMatrix, DEFAULT_KEYMAP};
pub use queue::{EventQueue, QueuePolicy};

/// Logical key identities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ButtonId {
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    Back,
    Erase,
    Enter,
    Up,
    Down,
    Left,
    Right,
}

impl ButtonId {
    /// Number of logical identities.
    pub const COUNT: usize = 17;

    /// Every identity, ordered by index.
    pub const ALL: [ButtonId; Self::COUNT] = [
        ButtonId::Digit0,
        ButtonId::Digit1,
        ButtonId::Digit2,
        ButtonId::Digit3,
        ButtonId::Digit4,
        ButtonId::Digit5,
        ButtonId::Digit6,
        ButtonId::Digit7,
        ButtonId::Digit8,
        ButtonId::Digit9,
        ButtonId::Back,
        ButtonId::Erase,
        ButtonId::Enter,
        ButtonId::Up,
        ButtonId::Down,
        ButtonId::Left,
        ButtonId::Right,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Map a raw index (e.g. from a keymap table) back to an identity.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Digit value for `Digit0..=Digit9`.
    pub fn digit(self) -> Option<u8> {
        let i = self.index();
        if i <= 9 {
            Some(i as u8)
        } else {
            None
        }
    }

    /// Identity for a digit value `0..=9`.
    pub fn from_digit(d: u8) -> Option<Self> {
        if d <= 9 {
            Self::from_index(d as usize)
        } else {
            None
        }
    }
}

/// Kind of key transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEventKind {
    /// Debounced contact close.
    Press,
    /// Key held past the hold threshold (once per press).
    Hold,
    /// Debounced contact open.
    Release,
}

/// A single key event, consumed exactly once by the UI loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    pub button: ButtonId,
    pub kind: ButtonEventKind,
}

impl ButtonEvent {
    pub const fn new(button: ButtonId, kind: ButtonEventKind) -> Self {
        Self { button, kind }
    }
}

/// Set of event kinds a button reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventMask(u8);

impl EventMask {
    pub const NONE: Self = Self(0);
    pub const PRESS: Self = Self(1 << 0);
    pub const HOLD: Self = Self(1 << 1);
    pub const RELEASE: Self = Self(1 << 2);
    pub const ALL: Self = Self(0b111);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, kind: ButtonEventKind) -> bool {
        let bit = match kind {
            ButtonEventKind::Press => Self::PRESS,
            ButtonEventKind::Hold => Self::HOLD,
            ButtonEventKind::Release => Self::RELEASE,
        };
        self.0 & bit.0 != 0
    }
}

impl Default for EventMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for EventMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Anything the UI poll can drain key events from.
pub trait EventSource {
    /// Non-blocking dequeue; `None` means "no data", not an error.
    fn next_event(&mut self) -> Option<ButtonEvent>;
}
