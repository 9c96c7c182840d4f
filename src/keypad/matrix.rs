//! Key matrix mapping - physical row/column to logical [`ButtonId`].
//!
//! Default front-panel layout:
//!
//! ```text
//!        C0     C1     C2     C3
//! R0     1      2      3      Up
//! R1     4      5      6      Down
//! R2     7      8      9      Enter
//! R3     Left   0      Right  Back
//! ```
//!
//! The table stores raw identity indices so it can be patched for other
//! front panels; entries that do not name a valid identity are skipped.

use super::ButtonId;
use crate::config::{MATRIX_COLS, MATRIX_ROWS};

/// Table value for a position with no key fitted.
pub const UNMAPPED: u8 = 0xFF;

/// Raw contact access for one matrix position.
///
/// Implementations hide the row drive / column read sequencing.
pub trait ContactSampler {
    /// `true` when the switch at (`row`, `col`) is closed.
    fn is_closed(&mut self, row: usize, col: usize) -> bool;
}

/// Sampler over a fixed contact snapshot, `true` = closed.
impl ContactSampler for [[bool; MATRIX_COLS]; MATRIX_ROWS] {
    fn is_closed(&mut self, row: usize, col: usize) -> bool {
        self[row][col]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyMatrix {
    table: [[u8; MATRIX_COLS]; MATRIX_ROWS],
}

/// Default 4×4 front-panel layout.
pub const DEFAULT_KEYMAP: KeyMatrix = KeyMatrix::new([
    [
        ButtonId::Digit1 as u8,
        ButtonId::Digit2 as u8,
        ButtonId::Digit3 as u8,
        ButtonId::Up as u8,
    ],
    [
        ButtonId::Digit4 as u8,
        ButtonId::Digit5 as u8,
        ButtonId::Digit6 as u8,
        ButtonId::Down as u8,
    ],
    [
        ButtonId::Digit7 as u8,
        ButtonId::Digit8 as u8,
        ButtonId::Digit9 as u8,
        ButtonId::Enter as u8,
    ],
    [
        ButtonId::Left as u8,
        ButtonId::Digit0 as u8,
        ButtonId::Right as u8,
        ButtonId::Back as u8,
    ],
]);

impl KeyMatrix {
    pub const fn new(table: [[u8; MATRIX_COLS]; MATRIX_ROWS]) -> Self {
        Self { table }
    }

    /// Identity at a matrix position, `None` if unmapped or invalid.
    pub fn button_at(&self, row: usize, col: usize) -> Option<ButtonId> {
        let raw = *self.table.get(row)?.get(col)?;
        ButtonId::from_index(raw as usize)
    }

    /// Sample every position and fold the contacts into per-identity flags.
    ///
    /// Two positions mapped to the same identity are OR-ed together.
    pub fn sample<S: ContactSampler>(&self, sampler: &mut S, closed: &mut [bool; ButtonId::COUNT]) {
        closed.fill(false);
        for row in 0..MATRIX_ROWS {
            for col in 0..MATRIX_COLS {
                let Some(button) = self.button_at(row, col) else {
                    continue;
                };
                if sampler.is_closed(row, col) {
                    closed[button.index()] = true;
                }
            }
        }
    }

    /// Number of table entries that do not name a valid identity.
    pub fn invalid_entries(&self) -> usize {
        self.table
            .iter()
            .flatten()
            .filter(|&&raw| raw != UNMAPPED && ButtonId::from_index(raw as usize).is_none())
            .count()
    }
}

impl Default for KeyMatrix {
    fn default() -> Self {
        DEFAULT_KEYMAP
    }
}
