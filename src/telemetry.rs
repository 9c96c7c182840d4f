//! Read-only sensor / actuator data shown on the dashboard.
//!
//! Acquisition and averaging happen elsewhere; the HMI only reads the
//! latest values through [`Telemetry`].

use crate::error::Result;

/// Humidity channel of a sensor.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Humidity {
    /// Relative humidity (%).
    Percent(f32),
    /// Sensor has no humidity channel.
    Unsupported,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorReading {
    /// Temperature (°C).
    pub temperature: f32,
    pub humidity: Humidity,
}

/// Aggregate on/off state per actuator family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorFlags {
    pub heater: bool,
    pub humidifier: bool,
    pub fan: bool,
    pub light: bool,
}

/// Controller operating mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemMode {
    #[default]
    Auto,
    Manual,
    Off,
}

impl SystemMode {
    pub const fn label(self) -> &'static str {
        match self {
            SystemMode::Auto => "Auto",
            SystemMode::Manual => "Manual",
            SystemMode::Off => "Off",
        }
    }
}

/// Wall-clock time of day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

pub trait Telemetry {
    /// Mean temperature over all sensors, `None` if no sensor reports.
    fn average_temperature(&self) -> Option<f32>;

    /// Mean humidity over sensors with a humidity channel.
    fn average_humidity(&self) -> Option<f32>;

    /// Number of configured sensors.
    fn sensor_count(&self) -> u8;

    /// Latest reading of sensor `index`; [`crate::Error::InvalidSensor`]
    /// when out of range.
    fn sensor(&self, index: u8) -> Result<SensorReading>;

    fn actuator_flags(&self) -> ActuatorFlags;

    fn mode(&self) -> SystemMode;

    fn clock(&self) -> ClockTime;
}
