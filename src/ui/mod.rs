//! User interface subsystem - character display + key matrix.
//!
//! [`UiController`] owns the state machine. Each poll it drains queued key
//! events, decodes them into short/long gestures, hands them to the
//! handler of the active [`UiState`], then renders the state's screen (or
//! an active notice) through the diff-aware frame cache.
//!
//! ## Screens
//!
//! ```text
//! Dashboard ──long Enter──> MenuRoot ─1─> EditGlobalTemp
//!     ^                        │  ─2─> EditGlobalHum
//!     └──────short Back────────┤  ─3─> ActuatorSelectType ─> ActuatorSelectId
//!                              │                              └> ActuatorMode ─> ActuatorManualEdit
//!                              │  ─4─> LightEdit
//!                              │  ─5─> SaveAndExit
//!                              └ 6/7─> NotImplemented
//! ```

pub mod controller;
pub mod dashboard;
pub mod display;
pub mod edit;
pub mod gesture;
pub mod input_logic;
pub mod menu;
pub mod session;


pub use controller::{UiContext, UiController};
pub use dashboard::DashboardPage;
pub use display::{DisplayPort, Frame, FrameCache};
pub use gesture::{Gesture, GestureDecoder, KeyAction};
pub use session::ConfigEditSession;

/// Menu entries that have no screen yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Placeholder {
    Network,
    Calibration,
}

impl Placeholder {
    pub const fn label(self) -> &'static str {
        match self {
            Placeholder::Network => "Network",
            Placeholder::Calibration => "Calibration",
        }
    }
}

/// Screens the UI can be in. Exactly one is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiState {
    /// Rotating sensor / actuator overview.
    #[default]
    Dashboard,
    MenuRoot,
    EditGlobalTemp,
    EditGlobalHum,
    ActuatorSelectType,
    ActuatorSelectId,
    ActuatorMode,
    ActuatorManualEdit,
    LightEdit,
    SaveAndExit,
    NotImplemented(Placeholder),
}
