//! nRF52840 adapters for the HMI ports.
//!
//! | Port | Adapter | Hardware |
//! |---|---|---|
//! | `ContactSampler` | [`matrix::GpioMatrix`] | 4 row outputs, 4 pulled-up column inputs |
//! | `DisplayPort` | [`display::OledText`] | SSD1306 128×64 over TWIM0 |
//! | `ConfigStore` | [`storage::FlashConfigStore`] | last NVMC pages via `sequential-storage` |
//! | `Telemetry` | [`telemetry::SharedTelemetry`] | snapshot written by the control loops |

pub mod display;
pub mod matrix;
pub mod storage;
pub mod telemetry;
