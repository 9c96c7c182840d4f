//! Telemetry snapshot shared between the control loops and the HMI.
//!
//! Writers replace fields through [`SharedTelemetry::update`]; the HMI
//! reads through the [`Telemetry`] impl on `&SharedTelemetry`. Both sides
//! hold the critical section only for a copy.

use climate_hmi::config::MAX_SENSORS;
use climate_hmi::error::{Error, Result};
use climate_hmi::telemetry::{
    ActuatorFlags, ClockTime, Humidity, SensorReading, SystemMode, Telemetry,
};
use core::cell::RefCell;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

pub struct Snapshot {
    pub sensors: Vec<SensorReading, { MAX_SENSORS as usize }>,
    pub flags: ActuatorFlags,
    pub mode: SystemMode,
    pub clock: ClockTime,
}

impl Snapshot {
    const fn new() -> Self {
        Self {
            sensors: Vec::new(),
            flags: ActuatorFlags {
                heater: false,
                humidifier: false,
                fan: false,
                light: false,
            },
            mode: SystemMode::Auto,
            clock: ClockTime {
                hour: 0,
                minute: 0,
                second: 0,
            },
        }
    }
}

pub struct SharedTelemetry {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Snapshot>>,
}

impl SharedTelemetry {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Snapshot::new())),
        }
    }

    /// Modify the snapshot in place.
    pub fn update(&self, f: impl FnOnce(&mut Snapshot)) {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()));
    }

    fn read<R>(&self, f: impl FnOnce(&Snapshot) -> R) -> R {
        self.inner.lock(|cell| f(&cell.borrow()))
    }
}

impl Telemetry for &SharedTelemetry {
    fn average_temperature(&self) -> Option<f32> {
        self.read(|s| {
            if s.sensors.is_empty() {
                return None;
            }
            let sum: f32 = s.sensors.iter().map(|r| r.temperature).sum();
            Some(sum / s.sensors.len() as f32)
        })
    }

    fn average_humidity(&self) -> Option<f32> {
        self.read(|s| {
            let (sum, n) = s
                .sensors
                .iter()
                .filter_map(|r| match r.humidity {
                    Humidity::Percent(h) => Some(h),
                    Humidity::Unsupported => None,
                })
                .fold((0.0f32, 0u32), |(sum, n), h| (sum + h, n + 1));
            (n > 0).then(|| sum / n as f32)
        })
    }

    fn sensor_count(&self) -> u8 {
        self.read(|s| s.sensors.len() as u8)
    }

    fn sensor(&self, index: u8) -> Result<SensorReading> {
        self.read(|s| s.sensors.get(index as usize).copied().ok_or(Error::InvalidSensor))
    }

    fn actuator_flags(&self) -> ActuatorFlags {
        self.read(|s| s.flags)
    }

    fn mode(&self) -> SystemMode {
        self.read(|s| s.mode)
    }

    fn clock(&self) -> ClockTime {
        self.read(|s| s.clock)
    }
}
