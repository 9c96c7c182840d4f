//! Numeric entry buffer and cursor helpers shared by the menu screens.

use crate::error::InputError;
use heapless::String;

/// Move selection cursor one item up.
pub fn select_prev(selected: usize) -> usize {
    selected.saturating_sub(1)
}

/// Move selection cursor one item down if another item exists.
pub fn select_next(selected: usize, item_count: usize) -> usize {
    if selected + 1 < item_count {
        selected + 1
    } else {
        selected
    }
}

/// Previous item, wrapping from the first to the last.
pub fn cycle_prev(selected: usize, item_count: usize) -> usize {
    if item_count == 0 {
        0
    } else if selected == 0 {
        item_count - 1
    } else {
        (selected - 1).min(item_count - 1)
    }
}

/// Next item, wrapping from the last to the first.
pub fn cycle_next(selected: usize, item_count: usize) -> usize {
    if item_count == 0 {
        0
    } else {
        (selected + 1) % item_count
    }
}

/// Bounded buffer of typed ASCII digits.
///
/// Holds at most `M` digits; appends past that are refused rather than
/// overwriting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NumericInput<const M: usize> {
    digits: String<M>,
}

impl<const M: usize> NumericInput<M> {
    pub const fn new() -> Self {
        Self {
            digits: String::new(),
        }
    }

    /// Append digit `d` (0..=9).
    pub fn push_digit(&mut self, d: u8) -> Result<(), InputError> {
        if d > 9 {
            return Err(InputError::OutOfRange);
        }
        self.digits
            .push(char::from(b'0' + d))
            .map_err(|_| InputError::Full)
    }

    /// Remove the last digit; `false` if the buffer was already empty.
    pub fn erase(&mut self) -> bool {
        self.digits.pop().is_some()
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn as_str(&self) -> &str {
        self.digits.as_str()
    }

    /// Parsed value; [`InputError::Empty`] when nothing was typed.
    pub fn value(&self) -> Result<u32, InputError> {
        if self.digits.is_empty() {
            return Err(InputError::Empty);
        }
        self.digits.bytes().try_fold(0u32, |acc, b| {
            acc.checked_mul(10)
                .and_then(|v| v.checked_add((b - b'0') as u32))
                .ok_or(InputError::Overflow)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_boundaries() {
        assert_eq!(select_prev(0), 0);
        assert_eq!(select_prev(3), 2);
        assert_eq!(select_next(0, 1), 0);
        assert_eq!(select_next(0, 3), 1);
        assert_eq!(select_next(2, 3), 2);
    }

    #[test]
    fn cycling_wraps_both_ways() {
        assert_eq!(cycle_next(2, 3), 0);
        assert_eq!(cycle_next(0, 3), 1);
        assert_eq!(cycle_prev(0, 3), 2);
        assert_eq!(cycle_prev(2, 3), 1);
        assert_eq!(cycle_next(0, 0), 0);
        assert_eq!(cycle_prev(0, 0), 0);
    }

    #[test]
    fn buffer_is_bounded() {
        let mut input: NumericInput<3> = NumericInput::new();
        for d in [1, 2, 3] {
            input.push_digit(d).unwrap();
        }
        assert_eq!(input.push_digit(4), Err(InputError::Full));
        assert_eq!(input.as_str(), "123");
        assert_eq!(input.value(), Ok(123));
    }

    #[test]
    fn erase_and_empty_value() {
        let mut input: NumericInput<5> = NumericInput::new();
        assert_eq!(input.value(), Err(InputError::Empty));
        assert!(!input.erase());
        input.push_digit(2).unwrap();
        input.push_digit(5).unwrap();
        assert!(input.erase());
        assert_eq!(input.value(), Ok(2));
        assert_eq!(input.push_digit(10), Err(InputError::OutOfRange));
    }

    #[test]
    fn leading_zeros_parse() {
        let mut input: NumericInput<5> = NumericInput::new();
        for d in [0, 0, 7] {
            input.push_digit(d).unwrap();
        }
        assert_eq!(input.value(), Ok(7));
    }

    #[test]
    fn value_overflow_is_reported() {
        let mut input: NumericInput<12> = NumericInput::new();
        for _ in 0..11 {
            input.push_digit(9).unwrap();
        }
        assert_eq!(input.value(), Err(InputError::Overflow));
    }
}
