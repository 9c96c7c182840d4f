//! Per-button debounce and hold detection.
//!
//! Each button runs an independent state machine advanced once per scan:
//!
//! ```text
//!            closed                 stable >= debounce [Press]
//!   Idle ───────────> DebouncingPress ───────────────────────> Pressed
//!    ^                      │ open (bounce)                     │  │ held >= hold [Hold, once]
//!    └──────────────────────┘                                   │  └──┐
//!    │                                                     open │ <───┘
//!    │   stable open >= debounce [Release]                      v
//!    └──────────────────────────────────────────────── DebouncingRelease
//!                                                  closed (bounce) ──> Pressed
//! ```
//!
//! Bounces shorter than the debounce window never produce events, and a
//! release bounce does not restart the hold timer.

use super::ButtonEventKind;
use crate::Millis;

/// Debounce / hold timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyTiming {
    /// Minimum stable-contact time (ms).
    pub debounce_ms: Millis,
    /// Press duration before Hold fires (ms).
    pub hold_ms: Millis,
}

impl KeyTiming {
    pub const fn new(debounce_ms: Millis, hold_ms: Millis) -> Self {
        Self {
            debounce_ms,
            hold_ms,
        }
    }
}

impl Default for KeyTiming {
    fn default() -> Self {
        Self::new(crate::config::DEBOUNCE_MS, crate::config::HOLD_MS)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyState {
    #[default]
    Idle,
    /// Contact closed at `since`, not yet stable.
    DebouncingPress { since: Millis },
    /// Press accepted at `since`.
    Pressed { since: Millis, hold_sent: bool },
    /// Contact opened at `since` while pressed since `pressed_since`.
    DebouncingRelease {
        since: Millis,
        pressed_since: Millis,
        hold_sent: bool,
    },
}

impl KeyState {
    /// Advance with one raw contact sample taken at `now`.
    ///
    /// Returns the event produced by this transition, if any.
    pub fn step(&mut self, closed: bool, now: Millis, timing: &KeyTiming) -> Option<ButtonEventKind> {
        let (next, event) = match *self {
            KeyState::Idle => {
                if closed {
                    (KeyState::DebouncingPress { since: now }, None)
                } else {
                    (KeyState::Idle, None)
                }
            }
            KeyState::DebouncingPress { since } => {
                if !closed {
                    (KeyState::Idle, None)
                } else if now.saturating_sub(since) >= timing.debounce_ms {
                    (
                        KeyState::Pressed {
                            since: now,
                            hold_sent: false,
                        },
                        Some(ButtonEventKind::Press),
                    )
                } else {
                    (*self, None)
                }
            }
            KeyState::Pressed { since, hold_sent } => {
                if !closed {
                    (
                        KeyState::DebouncingRelease {
                            since: now,
                            pressed_since: since,
                            hold_sent,
                        },
                        None,
                    )
                } else if !hold_sent && now.saturating_sub(since) >= timing.hold_ms {
                    (
                        KeyState::Pressed {
                            since,
                            hold_sent: true,
                        },
                        Some(ButtonEventKind::Hold),
                    )
                } else {
                    (*self, None)
                }
            }
            KeyState::DebouncingRelease {
                since,
                pressed_since,
                hold_sent,
            } => {
                if closed {
                    (
                        KeyState::Pressed {
                            since: pressed_since,
                            hold_sent,
                        },
                        None,
                    )
                } else if now.saturating_sub(since) >= timing.debounce_ms {
                    (KeyState::Idle, Some(ButtonEventKind::Release))
                } else {
                    (*self, None)
                }
            }
        };
        *self = next;
        event
    }

    /// How long the key has been logically pressed, if it is.
    pub fn pressed_for(&self, now: Millis) -> Option<Millis> {
        match *self {
            KeyState::Pressed { since, .. } => Some(now.saturating_sub(since)),
            KeyState::DebouncingRelease { pressed_since, .. } => {
                Some(now.saturating_sub(pressed_since))
            }
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, KeyState::Idle)
    }
}
