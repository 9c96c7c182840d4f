//! HMI core for a keypad + character-display climate controller.
//!
//! Everything in this library is hardware independent and runs on the host
//! for testing; the firmware binary (`main.rs`, feature `embedded`) wires it
//! to the nRF52840 GPIO matrix, the OLED and the flash store.
//!
//! Usage: `cargo test` (host) or
//! `cargo run --release --features embedded --target thumbv7em-none-eabihf`.
//!
//! ## Pipeline
//!
//! ```text
//! scan(now) ─> KeyInputEngine ─> EventQueue ─> UiController::poll(now)
//!                                                 │
//!                       UiState handler <─────────┘
//!                          │            │
//!              ConfigEditSession    FrameCache ─> DisplayPort
//! ```
//!
//! Time is passed in as millisecond ticks ([`Millis`]); nothing in the core
//! sleeps or allocates.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module.
mod fmt;

pub mod config;
pub mod error;
pub mod keypad;
pub mod model;
pub mod store;
pub mod telemetry;
pub mod ui;
pub mod units;

/// Monotonic millisecond tick supplied by the caller.
pub type Millis = u64;

pub use error::{Error, InputError, StoreError};
pub use keypad::{ButtonEvent, ButtonEventKind, ButtonId, EventSource, KeyInputEngine};
pub use ui::{UiController, UiState};
