//! Dashboard pages: averages, one page per sensor, actuators, status.

use super::controller::UiContext;
use super::display::Frame;
use super::gesture::{Gesture, KeyAction};
use super::UiState;
use crate::config::MAX_SENSORS;
use crate::keypad::ButtonId;
use crate::telemetry::{Humidity, Telemetry};
use crate::Millis;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DashboardPage {
    #[default]
    Averages,
    /// 0-based sensor index.
    Sensor(u8),
    Actuators,
    Status,
}

impl DashboardPage {
    /// Following page given `sensors` configured sensors.
    pub fn next(self, sensors: u8) -> Self {
        let sensors = sensors.min(MAX_SENSORS);
        match self {
            DashboardPage::Averages if sensors > 0 => DashboardPage::Sensor(0),
            DashboardPage::Averages => DashboardPage::Actuators,
            DashboardPage::Sensor(i) if i + 1 < sensors => DashboardPage::Sensor(i + 1),
            DashboardPage::Sensor(_) => DashboardPage::Actuators,
            DashboardPage::Actuators => DashboardPage::Status,
            DashboardPage::Status => DashboardPage::Averages,
        }
    }

    pub fn prev(self, sensors: u8) -> Self {
        let sensors = sensors.min(MAX_SENSORS);
        match self {
            DashboardPage::Averages => DashboardPage::Status,
            DashboardPage::Sensor(0) => DashboardPage::Averages,
            DashboardPage::Sensor(i) => DashboardPage::Sensor((i - 1).min(sensors.saturating_sub(1))),
            DashboardPage::Actuators if sensors > 0 => DashboardPage::Sensor(sensors - 1),
            DashboardPage::Actuators => DashboardPage::Averages,
            DashboardPage::Status => DashboardPage::Actuators,
        }
    }
}

/// Short Left/Right flip pages, long Enter opens the menu.
pub fn handle(ctx: &mut UiContext, action: KeyAction, now: Millis) -> Option<UiState> {
    match (action.button, action.gesture) {
        (ButtonId::Enter, Gesture::Long) => Some(UiState::MenuRoot),
        (ButtonId::Left, Gesture::Short) => {
            ctx.page = ctx.page.prev(ctx.sensors);
            ctx.last_display_update = now;
            None
        }
        (ButtonId::Right, Gesture::Short) => {
            ctx.page = ctx.page.next(ctx.sensors);
            ctx.last_display_update = now;
            None
        }
        _ => None,
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "ON"
    } else {
        "off"
    }
}

pub fn render<T: Telemetry + ?Sized>(page: DashboardPage, telemetry: &T) -> Frame {
    let mut frame = Frame::new();
    match page {
        DashboardPage::Averages => {
            match telemetry.average_temperature() {
                Some(t) => frame.write(0, format_args!("Avg T: {:.1}C", t)),
                None => frame.set(0, "Avg T: --.-C"),
            }
            match telemetry.average_humidity() {
                Some(h) => frame.write(1, format_args!("Avg H: {:.1}%", h)),
                None => frame.set(1, "Avg H: --.-%"),
            }
        }
        DashboardPage::Sensor(i) => {
            let n = i + 1;
            match telemetry.sensor(i) {
                Ok(reading) => {
                    frame.write(0, format_args!("S{} T: {:.1}C", n, reading.temperature));
                    match reading.humidity {
                        Humidity::Percent(h) => frame.write(1, format_args!("S{} H: {:.1}%", n, h)),
                        Humidity::Unsupported => frame.write(1, format_args!("S{} H: n/a", n)),
                    }
                }
                Err(_) => {
                    frame.write(0, format_args!("S{} T: err", n));
                    frame.write(1, format_args!("S{} H: err", n));
                }
            }
        }
        DashboardPage::Actuators => {
            let flags = telemetry.actuator_flags();
            frame.write(0, format_args!("Heat:{} Hum:{}", on_off(flags.heater), on_off(flags.humidifier)));
            frame.write(1, format_args!("Fan:{} Lgt:{}", on_off(flags.fan), on_off(flags.light)));
        }
        DashboardPage::Status => {
            let clock = telemetry.clock();
            frame.write(0, format_args!("Mode: {}", telemetry.mode().label()));
            frame.write(
                1,
                format_args!("Time {:02}:{:02}:{:02}", clock.hour, clock.minute, clock.second),
            );
        }
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_visits_every_sensor() {
        let mut page = DashboardPage::Averages;
        let mut seen = heapless::Vec::<DashboardPage, 8>::new();
        for _ in 0..6 {
            page = page.next(2);
            seen.push(page).unwrap();
        }
        assert_eq!(
            seen.as_slice(),
            &[
                DashboardPage::Sensor(0),
                DashboardPage::Sensor(1),
                DashboardPage::Actuators,
                DashboardPage::Status,
                DashboardPage::Averages,
                DashboardPage::Sensor(0),
            ]
        );
    }

    #[test]
    fn no_sensors_skips_sensor_pages() {
        assert_eq!(DashboardPage::Averages.next(0), DashboardPage::Actuators);
        assert_eq!(DashboardPage::Actuators.prev(0), DashboardPage::Averages);
    }

    #[test]
    fn prev_is_inverse_of_next() {
        let mut page = DashboardPage::Status;
        for _ in 0..10 {
            assert_eq!(page.next(3).prev(3), page);
            page = page.next(3);
        }
    }
}
