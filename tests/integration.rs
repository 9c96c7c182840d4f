//! End-to-end tests: raw contact samples through the key engine into the
//! UI state machine, with scan and poll running at their real periods.

use climate_hmi::config::{HmiConfig, SCAN_PERIOD_MS, UI_POLL_MS};
use climate_hmi::error::Result;
use climate_hmi::keypad::{KeyInputEngine, KeyTiming, DEFAULT_KEYMAP};
use climate_hmi::model::SystemConfig;
use climate_hmi::store::ConfigStore;
use climate_hmi::telemetry::{ActuatorFlags, ClockTime, SensorReading, SystemMode, Telemetry};
use climate_hmi::ui::display::DisplayPort;
use climate_hmi::ui::UiController;
use climate_hmi::{Error, Millis, StoreError, UiState};

#[derive(Default)]
struct Store {
    live: SystemConfig,
    persisted: Option<SystemConfig>,
}

impl ConfigStore for Store {
    fn get_config(&self) -> SystemConfig {
        self.live.clone()
    }

    fn validate_config(&self, config: &SystemConfig) -> core::result::Result<(), StoreError> {
        config.check(&Default::default())
    }

    fn apply_config_runtime(&mut self, config: &SystemConfig) -> core::result::Result<(), StoreError> {
        self.live = config.clone();
        Ok(())
    }

    fn persist_config(&mut self) -> core::result::Result<(), StoreError> {
        self.persisted = Some(self.live.clone());
        Ok(())
    }
}

/// No sensors fitted.
struct Idle;

impl Telemetry for Idle {
    fn average_temperature(&self) -> Option<f32> {
        None
    }

    fn average_humidity(&self) -> Option<f32> {
        None
    }

    fn sensor_count(&self) -> u8 {
        0
    }

    fn sensor(&self, _index: u8) -> Result<SensorReading> {
        Err(Error::InvalidSensor)
    }

    fn actuator_flags(&self) -> ActuatorFlags {
        ActuatorFlags::default()
    }

    fn mode(&self) -> SystemMode {
        SystemMode::Off
    }

    fn clock(&self) -> ClockTime {
        ClockTime::default()
    }
}

#[derive(Default)]
struct Screen {
    rows: [String; 2],
    writes: usize,
}

impl DisplayPort for Screen {
    fn clear(&mut self) -> Result<()> {
        self.rows = Default::default();
        Ok(())
    }

    fn write_line(&mut self, row: usize, text: &str) -> Result<()> {
        let slot = self.rows.get_mut(row).ok_or(Error::InvalidRow)?;
        *slot = text.trim_end().to_string();
        self.writes += 1;
        Ok(())
    }
}

type Contacts = [[bool; 4]; 4];

// Matrix positions in the default keymap.
const KEY_1: (usize, usize) = (0, 0);
const KEY_2: (usize, usize) = (0, 1);
const KEY_3: (usize, usize) = (0, 2);
const KEY_5: (usize, usize) = (1, 1);
const KEY_0: (usize, usize) = (3, 1);
const KEY_ENTER: (usize, usize) = (2, 3);
const KEY_BACK: (usize, usize) = (3, 3);

struct Bench {
    keys: KeyInputEngine<Contacts>,
    ui: UiController<Store, Idle, Screen>,
    now: Millis,
}

impl Bench {
    fn new() -> Self {
        let config = HmiConfig::default();
        let mut keys = KeyInputEngine::new(
            [[false; 4]; 4],
            DEFAULT_KEYMAP,
            KeyTiming::new(config.debounce_ms, config.hold_ms),
        );
        keys.init();
        let mut ui = UiController::new(config, Store::default(), Idle, Screen::default(), 0);
        ui.init(0).unwrap();
        Self { keys, ui, now: 0 }
    }

    /// Advance time, scanning every 10 ms and polling every 50 ms.
    fn run(&mut self, ms: Millis) {
        for _ in 0..ms / SCAN_PERIOD_MS {
            self.now += SCAN_PERIOD_MS;
            self.keys.scan(self.now);
            if self.now % UI_POLL_MS == 0 {
                self.ui.poll(&mut self.keys, self.now).unwrap();
            }
        }
    }

    fn set(&mut self, (row, col): (usize, usize), closed: bool) {
        self.keys.sampler_mut()[row][col] = closed;
    }

    fn press_for(&mut self, key: (usize, usize), ms: Millis) {
        self.set(key, true);
        self.run(ms);
        self.set(key, false);
        self.run(100);
    }

    fn tap(&mut self, key: (usize, usize)) {
        self.press_for(key, 100);
    }

    fn hold(&mut self, key: (usize, usize)) {
        self.press_for(key, 1_200);
    }

    fn line(&self, row: usize) -> &str {
        self.ui.display().rows[row].as_str()
    }
}

#[test]
fn edit_thresholds_and_save_from_the_keypad() {
    let mut bench = Bench::new();
    assert_eq!(bench.line(0), "Avg T: --.-C");

    bench.hold(KEY_ENTER);
    assert_eq!(bench.ui.state(), UiState::MenuRoot);

    bench.tap(KEY_1);
    assert_eq!(bench.ui.state(), UiState::EditGlobalTemp);
    bench.tap(KEY_2);
    bench.tap(KEY_5);
    assert_eq!(bench.line(1), "New: 25_");
    bench.tap(KEY_ENTER);
    assert_eq!(bench.ui.session().working().temperature.min, 25);

    bench.tap(KEY_3);
    bench.tap(KEY_0);
    bench.tap(KEY_ENTER);
    assert_eq!(bench.ui.state(), UiState::MenuRoot);

    bench.tap(KEY_5);
    assert_eq!(bench.ui.state(), UiState::SaveAndExit);
    bench.tap(KEY_ENTER);
    assert_eq!(bench.ui.state(), UiState::Dashboard);

    let saved = bench.ui.store().persisted.clone().unwrap();
    assert_eq!(saved.temperature.min, 25);
    assert_eq!(saved.temperature.max, 30);
    assert_eq!(bench.keys.dropped_count(), 0);
}

#[test]
fn contact_bounce_types_a_single_digit() {
    let mut bench = Bench::new();
    bench.hold(KEY_ENTER);
    bench.tap(KEY_1);

    // Chatter shorter than the debounce window, then a clean press.
    for _ in 0..3 {
        bench.set(KEY_5, true);
        bench.run(10);
        bench.set(KEY_5, false);
        bench.run(10);
    }
    bench.tap(KEY_5);

    assert_eq!(bench.ui.context().input.as_str(), "5");
}

#[test]
fn hold_is_not_a_short_press() {
    let mut bench = Bench::new();
    bench.hold(KEY_ENTER);
    bench.tap(KEY_1);
    bench.tap(KEY_2);

    // Long Back cancels instead of erasing.
    bench.hold(KEY_BACK);
    assert_eq!(bench.ui.state(), UiState::MenuRoot);
    assert_eq!(bench.ui.session().working().temperature.min, 18);
}

#[test]
fn idle_menu_times_out_to_dashboard() {
    let mut bench = Bench::new();
    bench.hold(KEY_ENTER);
    bench.tap(KEY_2);
    assert_eq!(bench.ui.state(), UiState::EditGlobalHum);

    bench.run(29_000);
    assert_eq!(bench.ui.state(), UiState::EditGlobalHum);
    bench.run(1_000);
    assert_eq!(bench.ui.state(), UiState::Dashboard);
}

#[test]
fn idle_dashboard_is_not_redrawn() {
    let mut bench = Bench::new();
    let writes = bench.ui.display().writes;
    bench.run(2_000);
    assert_eq!(bench.ui.display().writes, writes);
}
