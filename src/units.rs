//! Duration display units.
//!
//! Actuator cycle durations are always stored in seconds. The unit is a
//! per-field display choice: typed values are interpreted in it and stored
//! values are rendered in it, but the stored value itself never changes
//! when the unit does.

use core::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeUnit {
    #[default]
    Seconds,
    Minutes,
    Hours,
}

impl TimeUnit {
    /// Seconds per unit.
    pub const fn factor(self) -> u32 {
        match self {
            TimeUnit::Seconds => 1,
            TimeUnit::Minutes => 60,
            TimeUnit::Hours => 3600,
        }
    }

    /// Next unit in the toggle cycle s → min → h → s.
    pub const fn next(self) -> Self {
        match self {
            TimeUnit::Seconds => TimeUnit::Minutes,
            TimeUnit::Minutes => TimeUnit::Hours,
            TimeUnit::Hours => TimeUnit::Seconds,
        }
    }

    /// Next smaller unit, `None` for seconds.
    pub const fn finer(self) -> Option<Self> {
        match self {
            TimeUnit::Seconds => None,
            TimeUnit::Minutes => Some(TimeUnit::Seconds),
            TimeUnit::Hours => Some(TimeUnit::Minutes),
        }
    }

    pub const fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "m",
            TimeUnit::Hours => "h",
        }
    }

    /// Convert a value typed in this unit to seconds; `None` on overflow.
    pub fn to_seconds(self, value: u32) -> Option<u32> {
        value.checked_mul(self.factor())
    }

    /// Largest unit that represents `secs` exactly.
    pub fn best_fit(secs: u32) -> Self {
        if secs != 0 && secs % TimeUnit::Hours.factor() == 0 {
            TimeUnit::Hours
        } else if secs != 0 && secs % TimeUnit::Minutes.factor() == 0 {
            TimeUnit::Minutes
        } else {
            TimeUnit::Seconds
        }
    }
}

/// Formats a canonical second count in a display unit.
///
/// Whole values print bare (`90s`, `2m`), exact tenths get one decimal
/// (`1.5m`). Anything else is shown in the next finer unit, so the text
/// always equals the stored value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayDuration {
    pub secs: u32,
    pub unit: TimeUnit,
}

impl DisplayDuration {
    pub const fn new(secs: u32, unit: TimeUnit) -> Self {
        Self { secs, unit }
    }
}

impl fmt::Display for DisplayDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let factor = self.unit.factor();
        let whole = self.secs / factor;
        let rem = self.secs % factor;
        if rem == 0 {
            return write!(f, "{}{}", whole, self.unit.suffix());
        }
        if rem * 10 % factor == 0 {
            return write!(f, "{}.{}{}", whole, rem * 10 / factor, self.unit.suffix());
        }
        match self.unit.finer() {
            Some(finer) => fmt::Display::fmt(&DisplayDuration::new(self.secs, finer), f),
            None => write!(f, "{}{}", self.secs, self.unit.suffix()),
        }
    }
}
