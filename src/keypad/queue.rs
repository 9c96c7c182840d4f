//! Bounded FIFO of key events between the scan call and the UI poll.
//!
//! Backed by `heapless::Deque`, so capacity is fixed at compile time and
//! nothing is allocated. When full, the default policy drops the incoming
//! event so intent that is already queued keeps its order.

use super::{ButtonEvent, EventSource};
use heapless::Deque;

/// What to do with a new event when the queue is full.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QueuePolicy {
    /// Reject the incoming event.
    #[default]
    DropNewest,
    /// Evict the oldest queued event to make room.
    DropOldest,
}

pub struct EventQueue<const N: usize> {
    items: Deque<ButtonEvent, N>,
    policy: QueuePolicy,
    dropped: u32,
}

impl<const N: usize> EventQueue<N> {
    pub const fn new(policy: QueuePolicy) -> Self {
        Self {
            items: Deque::new(),
            policy,
            dropped: 0,
        }
    }

    /// Enqueue an event.
    ///
    /// Returns the event that was discarded when the queue was full: the
    /// incoming one under [`QueuePolicy::DropNewest`], the oldest queued one
    /// under [`QueuePolicy::DropOldest`].
    pub fn push(&mut self, event: ButtonEvent) -> Result<(), ButtonEvent> {
        match self.items.push_back(event) {
            Ok(()) => Ok(()),
            Err(rejected) => {
                self.dropped = self.dropped.saturating_add(1);
                match self.policy {
                    QueuePolicy::DropNewest => Err(rejected),
                    QueuePolicy::DropOldest => {
                        let evicted = self.items.pop_front();
                        // Room was just made, this cannot fail.
                        let _ = self.items.push_back(rejected);
                        Err(evicted.unwrap_or(rejected))
                    }
                }
            }
        }
    }

    pub fn pop(&mut self) -> Option<ButtonEvent> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Total events discarded because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Empty the queue and reset the drop counter.
    pub fn clear(&mut self) {
        self.items.clear();
        self.dropped = 0;
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new(QueuePolicy::default())
    }
}

impl<const N: usize> EventSource for EventQueue<N> {
    fn next_event(&mut self) -> Option<ButtonEvent> {
        self.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypad::{ButtonEventKind, ButtonId};

    fn press(b: ButtonId) -> ButtonEvent {
        ButtonEvent::new(b, ButtonEventKind::Press)
    }

    #[test]
    fn pops_in_arrival_order() {
        let mut q: EventQueue<4> = EventQueue::default();
        q.push(press(ButtonId::Digit1)).unwrap();
        q.push(press(ButtonId::Digit2)).unwrap();
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop(), Some(press(ButtonId::Digit1)));
        assert_eq!(q.pop(), Some(press(ButtonId::Digit2)));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn full_queue_drops_newest_and_keeps_order() {
        let mut q: EventQueue<3> = EventQueue::default();
        for b in [ButtonId::Digit1, ButtonId::Digit2, ButtonId::Digit3] {
            q.push(press(b)).unwrap();
        }
        assert!(q.is_full());
        assert_eq!(q.push(press(ButtonId::Digit4)), Err(press(ButtonId::Digit4)));
        assert_eq!(q.len(), 3);
        assert_eq!(q.dropped(), 1);

        let drained: heapless::Vec<ButtonEvent, 3> = core::iter::from_fn(|| q.pop()).collect();
        assert_eq!(
            drained.as_slice(),
            &[
                press(ButtonId::Digit1),
                press(ButtonId::Digit2),
                press(ButtonId::Digit3)
            ]
        );
    }

    #[test]
    fn drop_oldest_policy_evicts_head() {
        let mut q: EventQueue<2> = EventQueue::new(QueuePolicy::DropOldest);
        q.push(press(ButtonId::Digit1)).unwrap();
        q.push(press(ButtonId::Digit2)).unwrap();
        assert_eq!(q.push(press(ButtonId::Digit3)), Err(press(ButtonId::Digit1)));
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop(), Some(press(ButtonId::Digit2)));
        assert_eq!(q.pop(), Some(press(ButtonId::Digit3)));
    }

    #[test]
    fn clear_resets_counter() {
        let mut q: EventQueue<1> = EventQueue::default();
        q.push(press(ButtonId::Up)).unwrap();
        let _ = q.push(press(ButtonId::Down));
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.dropped(), 0);
        assert_eq!(q.capacity(), 1);
    }
}
