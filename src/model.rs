//! System configuration model shared with the control loops.
//!
//! The HMI edits a copy of [`SystemConfig`]; the control loops own the
//! live one behind [`crate::store::ConfigStore`].
//!
//! Flash record layout (little-endian):
//! ```text
//! Byte 0      : record version (1)
//! Byte 1-4    : temperature min, max (u16 each, °C)
//! Byte 5-8    : humidity min, max (u16 each, %RH)
//! Byte 9-12   : light on hour, on minute, off hour, off minute
//! Byte 13     : actuator count
//! Byte 14..   : per actuator [kind u8][manual u8][on_secs u32][off_secs u32]
//! ```

use crate::config::{EditLimits, MAX_ACTUATORS};
use crate::error::StoreError;
use heapless::Vec;

const RECORD_VERSION: u8 = 1;
const HEADER_SIZE: usize = 14;
const ACTUATOR_RECORD_SIZE: usize = 10;

/// Largest serialized size of a [`SystemConfig`].
pub const MAX_RECORD_SIZE: usize = HEADER_SIZE + MAX_ACTUATORS * ACTUATOR_RECORD_SIZE;

/// Actuator families the controller drives on timed cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorKind {
    Heater,
    Humidifier,
    Fan,
}

impl ActuatorKind {
    pub const ALL: [ActuatorKind; 3] = [
        ActuatorKind::Heater,
        ActuatorKind::Humidifier,
        ActuatorKind::Fan,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ActuatorKind::Heater => "Heater",
            ActuatorKind::Humidifier => "Humidifier",
            ActuatorKind::Fan => "Fan",
        }
    }

    /// Four-character tag for cramped lines.
    pub const fn tag(self) -> &'static str {
        match self {
            ActuatorKind::Heater => "Heat",
            ActuatorKind::Humidifier => "Humi",
            ActuatorKind::Fan => "Fan",
        }
    }

    const fn code(self) -> u8 {
        match self {
            ActuatorKind::Heater => 0,
            ActuatorKind::Humidifier => 1,
            ActuatorKind::Fan => 2,
        }
    }

    fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ActuatorKind::Heater),
            1 => Some(ActuatorKind::Humidifier),
            2 => Some(ActuatorKind::Fan),
            _ => None,
        }
    }
}

/// `[min, max]` regulation band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Thresholds {
    pub min: u16,
    pub max: u16,
}

impl Thresholds {
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorConfig {
    pub kind: ActuatorKind,
    /// Timed on/off cycle enabled; `false` = automatic (threshold) control.
    pub manual: bool,
    pub on_secs: u32,
    pub off_secs: u32,
}

impl ActuatorConfig {
    pub const fn new(kind: ActuatorKind, on_secs: u32, off_secs: u32) -> Self {
        Self {
            kind,
            manual: false,
            on_secs,
            off_secs,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    pub fn is_valid(&self) -> bool {
        self.hour < 24 && self.minute < 60
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightSchedule {
    pub on: TimeOfDay,
    pub off: TimeOfDay,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemConfig {
    /// Temperature band (°C).
    pub temperature: Thresholds,
    /// Humidity band (%RH).
    pub humidity: Thresholds,
    pub actuators: Vec<ActuatorConfig, MAX_ACTUATORS>,
    pub light: LightSchedule,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut actuators = Vec::new();
        for a in [
            ActuatorConfig::new(ActuatorKind::Heater, 300, 600),
            ActuatorConfig::new(ActuatorKind::Humidifier, 60, 300),
            ActuatorConfig::new(ActuatorKind::Fan, 900, 900),
            ActuatorConfig::new(ActuatorKind::Fan, 900, 900),
        ] {
            let _ = actuators.push(a);
        }
        Self {
            temperature: Thresholds::new(18, 26),
            humidity: Thresholds::new(40, 70),
            actuators,
            light: LightSchedule {
                on: TimeOfDay::new(6, 0),
                off: TimeOfDay::new(22, 0),
            },
        }
    }
}

impl SystemConfig {
    /// Number of actuators of `kind`.
    pub fn count_of(&self, kind: ActuatorKind) -> usize {
        self.actuators.iter().filter(|a| a.kind == kind).count()
    }

    /// The `instance`-th (0-based) actuator of `kind`.
    pub fn actuator(&self, kind: ActuatorKind, instance: usize) -> Option<&ActuatorConfig> {
        self.actuators.iter().filter(|a| a.kind == kind).nth(instance)
    }

    pub fn actuator_mut(&mut self, kind: ActuatorKind, instance: usize) -> Option<&mut ActuatorConfig> {
        self.actuators
            .iter_mut()
            .filter(|a| a.kind == kind)
            .nth(instance)
    }

    /// Whole-config consistency check against absolute limits.
    ///
    /// Used by store implementations as their `validate_config`.
    pub fn check(&self, limits: &EditLimits) -> Result<(), StoreError> {
        for (band, bounds) in [
            (self.temperature, limits.temperature),
            (self.humidity, limits.humidity),
        ] {
            if !bounds.contains(band.min as u32)
                || !bounds.contains(band.max as u32)
                || band.min >= band.max
            {
                return Err(StoreError::Invalid);
            }
        }

        for a in self.actuators.iter().filter(|a| a.manual) {
            if !limits.cycle.contains(a.on_secs) || !limits.cycle.contains(a.off_secs) {
                return Err(StoreError::Invalid);
            }
        }

        let light = &self.light;
        if !light.on.is_valid() || !light.off.is_valid() || light.on == light.off {
            return Err(StoreError::Invalid);
        }

        Ok(())
    }

    /// Serialize into `buf`; returns bytes written, 0 if `buf` is too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        let total = HEADER_SIZE + self.actuators.len() * ACTUATOR_RECORD_SIZE;
        if buf.len() < total {
            return 0;
        }

        buf[0] = RECORD_VERSION;
        buf[1..3].copy_from_slice(&self.temperature.min.to_le_bytes());
        buf[3..5].copy_from_slice(&self.temperature.max.to_le_bytes());
        buf[5..7].copy_from_slice(&self.humidity.min.to_le_bytes());
        buf[7..9].copy_from_slice(&self.humidity.max.to_le_bytes());
        buf[9] = self.light.on.hour;
        buf[10] = self.light.on.minute;
        buf[11] = self.light.off.hour;
        buf[12] = self.light.off.minute;
        buf[13] = self.actuators.len() as u8;

        let mut offset = HEADER_SIZE;
        for a in &self.actuators {
            let rec = &mut buf[offset..offset + ACTUATOR_RECORD_SIZE];
            rec[0] = a.kind.code();
            rec[1] = a.manual as u8;
            rec[2..6].copy_from_slice(&a.on_secs.to_le_bytes());
            rec[6..10].copy_from_slice(&a.off_secs.to_le_bytes());
            offset += ACTUATOR_RECORD_SIZE;
        }
        total
    }

    /// Decode a record written by [`SystemConfig::serialize`].
    pub fn deserialize(data: &[u8]) -> Result<Self, StoreError> {
        if data.len() < HEADER_SIZE || data[0] != RECORD_VERSION {
            return Err(StoreError::Corrupt);
        }

        let u16_at = |i: usize| u16::from_le_bytes([data[i], data[i + 1]]);
        let count = data[13] as usize;
        if count > MAX_ACTUATORS || data.len() < HEADER_SIZE + count * ACTUATOR_RECORD_SIZE {
            return Err(StoreError::Corrupt);
        }

        let mut actuators = Vec::new();
        for rec in data[HEADER_SIZE..HEADER_SIZE + count * ACTUATOR_RECORD_SIZE].chunks_exact(ACTUATOR_RECORD_SIZE) {
            let kind = ActuatorKind::from_code(rec[0]).ok_or(StoreError::Corrupt)?;
            let actuator = ActuatorConfig {
                kind,
                manual: rec[1] != 0,
                on_secs: u32::from_le_bytes([rec[2], rec[3], rec[4], rec[5]]),
                off_secs: u32::from_le_bytes([rec[6], rec[7], rec[8], rec[9]]),
            };
            actuators.push(actuator).map_err(|_| StoreError::Corrupt)?;
        }

        Ok(Self {
            temperature: Thresholds::new(u16_at(1), u16_at(3)),
            humidity: Thresholds::new(u16_at(5), u16_at(7)),
            actuators,
            light: LightSchedule {
                on: TimeOfDay::new(data[9], data[10]),
                off: TimeOfDay::new(data[11], data[12]),
            },
        })
    }
}
