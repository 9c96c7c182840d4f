//! Application-wide constants and runtime HMI policy.
//!
//! Timing parameters, capacities and default edit limits live here so they
//! can be tuned in one place. Everything that a deployment may want to
//! change without touching the state machine is also carried by
//! [`HmiConfig`].

use crate::Millis;

// Keypad

/// Period of the keypad scan call (ms).
pub const SCAN_PERIOD_MS: u64 = 10;

/// Minimum stable-contact time before a press or release is accepted (ms).
pub const DEBOUNCE_MS: u64 = 30;

/// Time a key must stay pressed before a Hold event fires (ms).
pub const HOLD_MS: u64 = 1_000;

/// Capacity of the key event queue.
pub const EVENT_QUEUE_CAPACITY: usize = 16;

/// Number of rows / columns of the key matrix.
pub const MATRIX_ROWS: usize = 4;
pub const MATRIX_COLS: usize = 4;

// UI

/// Period of the UI poll call (ms).
pub const UI_POLL_MS: u64 = 50;

/// Dashboard page auto-rotation interval (ms).
pub const DASHBOARD_ROTATE_MS: u64 = 5_000;

/// Menu inactivity timeout (ms).
pub const MENU_TIMEOUT_MS: u64 = 30_000;

/// How long a transient notice stays on screen (ms).
pub const NOTICE_MS: u64 = 1_500;

/// Maximum number of digits in a numeric entry.
pub const INPUT_MAX_DIGITS: usize = 5;

/// Character display geometry.
pub const DISPLAY_COLS: usize = 16;
pub const DISPLAY_ROWS: usize = 2;

// System configuration model

/// Maximum number of actuators of all kinds.
pub const MAX_ACTUATORS: usize = 8;

/// Maximum number of sensors the dashboard rotates through.
pub const MAX_SENSORS: u8 = 8;

/// Default absolute limits for the global thresholds.
pub const TEMP_LIMIT_MIN_C: u16 = 0;
pub const TEMP_LIMIT_MAX_C: u16 = 50;
pub const HUM_LIMIT_MIN_PCT: u16 = 0;
pub const HUM_LIMIT_MAX_PCT: u16 = 100;

/// Default limits for actuator on/off cycle durations (seconds).
pub const CYCLE_LIMIT_MIN_SECS: u32 = 1;
pub const CYCLE_LIMIT_MAX_SECS: u32 = 24 * 3600;

// Flash storage
//
// Config record lives in the last pages of the nRF52840 flash, below the
// bootloader settings page.

/// Flash page index where config storage starts (4 KB per page on nRF52840).
pub const STORAGE_FLASH_PAGE_START: u32 = 240;

/// Number of flash pages reserved for config storage.
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 4;

/// What happens to pending menu edits when the inactivity timeout fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeoutPolicy {
    /// Drop the working copy and reload it from the store.
    Discard,
    /// Run the save sequence; fall back to discarding if it fails.
    AutoSave,
}

/// Inclusive `[min, max]` bounds for one edited quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Bounds {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Constraint between the second and the first field of an edit pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Relation {
    /// Second must be strictly greater than first.
    Ascending,
    /// Only the bounds apply.
    Independent,
}

/// Absolute limits applied by the edit screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EditLimits {
    /// Temperature thresholds (°C).
    pub temperature: Bounds,
    /// Humidity thresholds (%RH).
    pub humidity: Bounds,
    /// Actuator on/off durations (seconds).
    pub cycle: Bounds,
    /// Off duration relative to on duration.
    pub cycle_relation: Relation,
}

impl Default for EditLimits {
    fn default() -> Self {
        Self {
            temperature: Bounds::new(TEMP_LIMIT_MIN_C as u32, TEMP_LIMIT_MAX_C as u32),
            humidity: Bounds::new(HUM_LIMIT_MIN_PCT as u32, HUM_LIMIT_MAX_PCT as u32),
            cycle: Bounds::new(CYCLE_LIMIT_MIN_SECS, CYCLE_LIMIT_MAX_SECS),
            cycle_relation: Relation::Ascending,
        }
    }
}

/// Runtime HMI policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HmiConfig {
    pub debounce_ms: Millis,
    pub hold_ms: Millis,
    pub rotate_ms: Millis,
    pub timeout_ms: Millis,
    pub notice_ms: Millis,
    pub timeout_policy: TimeoutPolicy,
    pub limits: EditLimits,
}

impl Default for HmiConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEBOUNCE_MS,
            hold_ms: HOLD_MS,
            rotate_ms: DASHBOARD_ROTATE_MS,
            timeout_ms: MENU_TIMEOUT_MS,
            notice_ms: NOTICE_MS,
            timeout_policy: TimeoutPolicy::Discard,
            limits: EditLimits::default(),
        }
    }
}
