//! Key input engine - owns the matrix sampler, the per-button state
//! machines and the event queue.

use super::debounce::{KeyState, KeyTiming};
use super::matrix::{ContactSampler, KeyMatrix};
use super::queue::{EventQueue, QueuePolicy};
use super::{ButtonEvent, ButtonId, EventMask, EventSource};
use crate::config::EVENT_QUEUE_CAPACITY;
use crate::error::{Error, Result};
use crate::Millis;

/// Immediate-dispatch observer invoked from inside [`KeyInputEngine::scan`].
///
/// The function runs synchronously in the scan context, once per emitted
/// event. It must complete in bounded time: no blocking, no waiting on the
/// UI poll, no flash or display I/O. Typical uses are a buzzer click or a
/// backlight wake flag.
#[derive(Clone, Copy)]
pub struct ImmediateHandler(fn(ButtonEvent));

impl ImmediateHandler {
    pub const fn new(f: fn(ButtonEvent)) -> Self {
        Self(f)
    }

    fn call(&self, event: ButtonEvent) {
        (self.0)(event)
    }
}

pub struct KeyInputEngine<S, const N: usize = EVENT_QUEUE_CAPACITY> {
    sampler: S,
    keymap: KeyMatrix,
    timing: KeyTiming,
    keys: [KeyState; ButtonId::COUNT],
    masks: [EventMask; ButtonId::COUNT],
    queue: EventQueue<N>,
    handler: Option<ImmediateHandler>,
}

impl<S: ContactSampler, const N: usize> KeyInputEngine<S, N> {
    pub fn new(sampler: S, keymap: KeyMatrix, timing: KeyTiming) -> Self {
        let invalid = keymap.invalid_entries();
        if invalid > 0 {
            warn!("Keypad: {} invalid keymap entries ignored", invalid);
        }
        Self {
            sampler,
            keymap,
            timing,
            keys: [KeyState::Idle; ButtonId::COUNT],
            masks: [EventMask::ALL; ButtonId::COUNT],
            queue: EventQueue::new(QueuePolicy::DropNewest),
            handler: None,
        }
    }

    /// Use a different full-queue policy.
    pub fn with_queue_policy(mut self, policy: QueuePolicy) -> Self {
        self.queue = EventQueue::new(policy);
        self
    }

    /// Reset every key to Idle and empty the queue. Safe to call repeatedly.
    pub fn init(&mut self) {
        self.keys = [KeyState::Idle; ButtonId::COUNT];
        self.queue.clear();
    }

    /// Sample the matrix and advance every key. Call on a fixed period.
    pub fn scan(&mut self, now: Millis) {
        let mut closed = [false; ButtonId::COUNT];
        self.keymap.sample(&mut self.sampler, &mut closed);

        for button in ButtonId::ALL {
            let i = button.index();
            let Some(kind) = self.keys[i].step(closed[i], now, &self.timing) else {
                continue;
            };
            if !self.masks[i].contains(kind) {
                continue;
            }

            let event = ButtonEvent::new(button, kind);
            trace!("Keypad: {:?}", event);
            if self.queue.push(event).is_err() {
                warn!("Keypad: queue full, {} events dropped", self.queue.dropped());
            }
            if let Some(handler) = self.handler {
                handler.call(event);
            }
        }
    }

    /// Non-blocking dequeue; `None` when nothing is queued.
    pub fn get_event(&mut self) -> Option<ButtonEvent> {
        self.queue.pop()
    }

    /// Replace (or clear with `None`) the immediate-dispatch handler.
    pub fn register_handler(&mut self, handler: Option<ImmediateHandler>) {
        self.handler = handler;
    }

    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    /// Events lost to a full queue since the last `init`.
    pub fn dropped_count(&self) -> u32 {
        self.queue.dropped()
    }

    /// Choose which transitions a button reports, by raw identity index.
    pub fn set_event_mask(&mut self, index: usize, mask: EventMask) -> Result<()> {
        let slot = self.masks.get_mut(index).ok_or(Error::InvalidButton)?;
        *slot = mask;
        Ok(())
    }

    pub fn event_mask(&self, button: ButtonId) -> EventMask {
        self.masks[button.index()]
    }

    pub fn key_state(&self, button: ButtonId) -> KeyState {
        self.keys[button.index()]
    }

    pub fn timing(&self) -> KeyTiming {
        self.timing
    }

    pub fn sampler_mut(&mut self) -> &mut S {
        &mut self.sampler
    }
}

impl<S: ContactSampler, const N: usize> EventSource for KeyInputEngine<S, N> {
    fn next_event(&mut self) -> Option<ButtonEvent> {
        self.get_event()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MATRIX_COLS, MATRIX_ROWS};
    use crate::keypad::{ButtonEventKind, DEFAULT_KEYMAP};
    use core::sync::atomic::{AtomicUsize, Ordering};

    type Contacts = [[bool; MATRIX_COLS]; MATRIX_ROWS];

    const TIMING: KeyTiming = KeyTiming::new(30, 1_000);

    fn engine<const N: usize>() -> KeyInputEngine<Contacts, N> {
        KeyInputEngine::new([[false; MATRIX_COLS]; MATRIX_ROWS], DEFAULT_KEYMAP, TIMING)
    }

    fn set(engine: &mut KeyInputEngine<Contacts, 16>, row: usize, col: usize, closed: bool) {
        engine.sampler_mut()[row][col] = closed;
    }

    fn scan_until(engine: &mut KeyInputEngine<Contacts, 16>, from: Millis, to: Millis) {
        let mut t = from;
        while t < to {
            engine.scan(t);
            t += 10;
        }
    }

    #[test]
    fn tap_produces_press_then_release() {
        let mut e = engine::<16>();
        set(&mut e, 2, 3, true); // Enter
        scan_until(&mut e, 0, 100);
        set(&mut e, 2, 3, false);
        scan_until(&mut e, 100, 200);

        assert_eq!(e.queued_count(), 2);
        assert_eq!(
            e.get_event(),
            Some(ButtonEvent::new(ButtonId::Enter, ButtonEventKind::Press))
        );
        assert_eq!(
            e.get_event(),
            Some(ButtonEvent::new(ButtonId::Enter, ButtonEventKind::Release))
        );
        assert_eq!(e.get_event(), None);
    }

    #[test]
    fn masked_kinds_are_not_queued() {
        let mut e = engine::<16>();
        e.set_event_mask(ButtonId::Up.index(), EventMask::HOLD).unwrap();
        set(&mut e, 0, 3, true);
        scan_until(&mut e, 0, 1_200);
        set(&mut e, 0, 3, false);
        scan_until(&mut e, 1_200, 1_300);

        assert_eq!(
            e.get_event(),
            Some(ButtonEvent::new(ButtonId::Up, ButtonEventKind::Hold))
        );
        assert_eq!(e.get_event(), None);
        assert!(e.key_state(ButtonId::Up).is_idle());
    }

    #[test]
    fn out_of_range_mask_index_is_rejected() {
        let mut e = engine::<16>();
        assert_eq!(
            e.set_event_mask(ButtonId::COUNT, EventMask::NONE),
            Err(Error::InvalidButton)
        );
    }

    #[test]
    fn full_queue_drops_and_counts() {
        let mut e = engine::<2>();
        // Three keys pressed together, queue holds two.
        e.sampler_mut()[0][0] = true;
        e.sampler_mut()[0][1] = true;
        e.sampler_mut()[0][2] = true;
        for t in (0..100).step_by(10) {
            e.scan(t);
        }
        assert_eq!(e.queued_count(), 2);
        assert_eq!(e.dropped_count(), 1);
        assert_eq!(e.get_event().map(|ev| ev.button), Some(ButtonId::Digit1));
        assert_eq!(e.get_event().map(|ev| ev.button), Some(ButtonId::Digit2));
    }

    #[test]
    fn init_is_idempotent_and_clears_queue() {
        let mut e = engine::<16>();
        set(&mut e, 3, 3, true);
        scan_until(&mut e, 0, 100);
        assert_eq!(e.queued_count(), 1);
        e.init();
        e.init();
        assert_eq!(e.queued_count(), 0);
        assert!(e.key_state(ButtonId::Back).is_idle());
    }

    static CALLS: AtomicUsize = AtomicUsize::new(0);

    fn count_call(_event: ButtonEvent) {
        CALLS.fetch_add(1, Ordering::Relaxed);
    }

    #[test]
    fn immediate_handler_sees_every_emitted_event() {
        let mut e = engine::<16>();
        e.register_handler(Some(ImmediateHandler::new(count_call)));
        set(&mut e, 1, 1, true);
        scan_until(&mut e, 0, 100);
        set(&mut e, 1, 1, false);
        scan_until(&mut e, 100, 200);
        assert_eq!(CALLS.load(Ordering::Relaxed), 2);

        e.register_handler(None);
        set(&mut e, 1, 1, true);
        scan_until(&mut e, 200, 300);
        assert_eq!(CALLS.load(Ordering::Relaxed), 2);
        assert_eq!(e.queued_count(), 3);
    }
}
