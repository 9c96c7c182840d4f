//! climate-hmi firmware for nRF52840.
//!
//! One Embassy task drives the whole HMI: every `SCAN_PERIOD_MS` the key
//! matrix is scanned, every `UI_POLL_MS` the UI drains the key queue and
//! redraws. Sensor acquisition and actuator control run elsewhere and only
//! meet the HMI through the shared telemetry snapshot and the config store.
//!
//! Pin map (nRF52840-DK header):
//!
//! | Signal | Pins |
//! |---|---|
//! | Matrix rows (out) | P0.03, P0.04, P0.28, P0.29 |
//! | Matrix columns (in, pull-up) | P0.30, P0.31, P1.01, P1.02 |
//! | OLED I²C SDA / SCL | P0.26 / P0.27 |

#![no_std]
#![no_main]

mod board;

use board::display::OledText;
use board::matrix::GpioMatrix;
use board::storage::FlashConfigStore;
use board::telemetry::SharedTelemetry;
use climate_hmi::config::{HmiConfig, SCAN_PERIOD_MS, UI_POLL_MS};
use climate_hmi::keypad::{KeyInputEngine, KeyTiming, DEFAULT_KEYMAP};
use climate_hmi::telemetry::ClockTime;
use climate_hmi::ui::UiController;
use climate_hmi::Millis;
use defmt::{error, info, warn};
use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{AnyPin, Input, Level, Output, OutputDrive, Pin as _, Pull};
use embassy_nrf::nvmc::Nvmc;
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_time::{Duration, Instant, Ticker};
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

/// Written by the control loops, read by the dashboard.
static TELEMETRY: SharedTelemetry = SharedTelemetry::new();

fn now_ms() -> Millis {
    Instant::now().as_millis()
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("climate-hmi starting");

    let config = HmiConfig::default();

    // - Key matrix ------------------------------------------
    let row = |pin: AnyPin| Output::new(pin, Level::High, OutputDrive::Standard);
    let col = |pin: AnyPin| Input::new(pin, Pull::Up);
    let matrix = GpioMatrix::new(
        [row(p.P0_03.degrade()), row(p.P0_04.degrade()), row(p.P0_28.degrade()), row(p.P0_29.degrade())],
        [col(p.P0_30.degrade()), col(p.P0_31.degrade()), col(p.P1_01.degrade()), col(p.P1_02.degrade())],
    );
    let timing = KeyTiming::new(config.debounce_ms, config.hold_ms);
    let mut keypad: KeyInputEngine<GpioMatrix> = KeyInputEngine::new(matrix, DEFAULT_KEYMAP, timing);
    keypad.init();

    // - Display ---------------------------------------------
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let display = match OledText::new(i2c) {
        Ok(d) => d,
        Err(e) => {
            error!("Display init failed: {:?}", e);
            return;
        }
    };

    // - Config store ----------------------------------------
    let flash = BlockingAsync::new(Nvmc::new(p.NVMC));
    let store = FlashConfigStore::load(flash, config.limits);

    let mut ui = UiController::new(config, store, &TELEMETRY, display, now_ms());
    if let Err(e) = ui.init(now_ms()) {
        warn!("UI init: {:?}", e);
    }

    let mut ticker = Ticker::every(Duration::from_millis(SCAN_PERIOD_MS));
    let mut next_poll = now_ms();
    loop {
        ticker.next().await;
        let now = now_ms();
        keypad.scan(now);

        if now >= next_poll {
            next_poll = now + UI_POLL_MS;
            TELEMETRY.update(|s| s.clock = uptime_clock(now));
            if let Err(e) = ui.poll(&mut keypad, now) {
                warn!("UI poll: {:?}", e);
            }
        }
    }
}

/// Wall clock derived from uptime until an RTC source sets it.
fn uptime_clock(now: Millis) -> ClockTime {
    let secs = now / 1000;
    ClockTime {
        hour: ((secs / 3600) % 24) as u8,
        minute: ((secs / 60) % 60) as u8,
        second: (secs % 60) as u8,
    }
}
