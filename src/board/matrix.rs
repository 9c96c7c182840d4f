//! GPIO key matrix sampler.
//!
//! Rows are driven low one at a time; columns are inputs with internal
//! pull-ups, so a closed contact reads low on its column while its row is
//! active.

use climate_hmi::config::{MATRIX_COLS, MATRIX_ROWS};
use climate_hmi::keypad::ContactSampler;
use embassy_nrf::gpio::{Input, Output};

/// CPU cycles to let a freshly driven row settle (~2 µs at 64 MHz).
const ROW_SETTLE_CYCLES: u32 = 128;

pub struct GpioMatrix {
    rows: [Output<'static>; MATRIX_ROWS],
    cols: [Input<'static>; MATRIX_COLS],
    active: Option<usize>,
}

impl GpioMatrix {
    /// Rows must be created high (idle), columns with `Pull::Up`.
    pub fn new(rows: [Output<'static>; MATRIX_ROWS], cols: [Input<'static>; MATRIX_COLS]) -> Self {
        Self {
            rows,
            cols,
            active: None,
        }
    }

    fn select_row(&mut self, row: usize) {
        if self.active == Some(row) {
            return;
        }
        if let Some(prev) = self.active.and_then(|r| self.rows.get_mut(r)) {
            prev.set_high();
        }
        if let Some(pin) = self.rows.get_mut(row) {
            pin.set_low();
            cortex_m::asm::delay(ROW_SETTLE_CYCLES);
            self.active = Some(row);
        } else {
            self.active = None;
        }
    }
}

impl ContactSampler for GpioMatrix {
    fn is_closed(&mut self, row: usize, col: usize) -> bool {
        if row >= MATRIX_ROWS || col >= MATRIX_COLS {
            return false;
        }
        self.select_row(row);
        self.cols[col].is_low()
    }
}
