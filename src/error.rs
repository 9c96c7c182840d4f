//! Error types for the HMI core.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for efficient
//! on-target logging.

/// Top-level error type used across the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Caller / parameter errors
    /// Button index outside the known identities.
    InvalidButton,

    /// Sensor index outside `0..sensor_count`.
    InvalidSensor,

    /// Display row outside `0..DISPLAY_ROWS`.
    InvalidRow,

    // Output device
    /// Display write failed.
    Display,

    // External config store
    /// The config store rejected or failed an operation.
    Store(StoreError),

    // Generic
    /// Buffer too small for the requested operation.
    BufferOverflow,
}

/// Failures reported by the external configuration store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// `validate_config` rejected the working copy.
    Invalid,
    /// Applying the configuration to the running system failed.
    Apply,
    /// Writing the configuration to non-volatile memory failed.
    Persist,
    /// Stored record could not be decoded.
    Corrupt,
}

impl StoreError {
    /// Short label for the display (fits in one line with a prefix).
    pub fn label(&self) -> &'static str {
        match self {
            StoreError::Invalid => "invalid cfg",
            StoreError::Apply => "apply failed",
            StoreError::Persist => "flash failed",
            StoreError::Corrupt => "corrupt cfg",
        }
    }
}

/// Transient user-input errors. Shown as a notice, never fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// Enter pressed with nothing typed.
    Empty,
    /// Value outside the absolute limits.
    OutOfRange,
    /// Second field not greater than the first.
    NotAscending,
    /// Off duration not longer than the on duration.
    OffNotLonger,
    /// Light on-time equals off-time.
    SameTime,
    /// Hour or minute outside the clock range.
    BadTime,
    /// Numeric buffer is full.
    Full,
    /// Value does not fit the numeric type after unit conversion.
    Overflow,
}

impl InputError {
    /// Short label for the display.
    pub fn label(&self) -> &'static str {
        match self {
            InputError::Empty => "Enter a value",
            InputError::OutOfRange => "Out of range",
            InputError::NotAscending => "Max must be >min",
            InputError::OffNotLonger => "Off must be >On",
            InputError::SameTime => "On = Off time",
            InputError::BadTime => "Invalid time",
            InputError::Full => "Too many digits",
            InputError::Overflow => "Value too large",
        }
    }
}

// Convenience conversions

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Error::Store(e)
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
