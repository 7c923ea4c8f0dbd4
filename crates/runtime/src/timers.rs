//! Deterministic timer queue driven by the virtual clock.
//!
//! Key properties:
//! - Total ordering on `(due, id)`: timers due at the same instant fire in
//!   scheduling order.
//! - Keyed timers are debounced: scheduling a key that is already pending
//!   replaces the pending timer (last write wins).
//! - Cancellation does not perturb the order of remaining timers.
//!
//! Vec-backed; the number of pending timers in a UI session is tiny.

use foundation::ids::{Id, IdAllocator};
use foundation::time::Millis;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub Id);

#[derive(Debug)]
struct Timer<K, T> {
    id: TimerId,
    due: Millis,
    key: Option<K>,
    payload: T,
}

#[derive(Debug)]
pub struct TimerQueue<K, T> {
    ids: IdAllocator,
    timers: Vec<Timer<K, T>>,
}

impl<K, T> Default for TimerQueue<K, T> {
    fn default() -> Self {
        Self {
            ids: IdAllocator::new(),
            timers: Vec::new(),
        }
    }
}

impl<K: PartialEq, T> TimerQueue<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Schedules an anonymous one-shot timer.
    pub fn schedule(&mut self, due: Millis, payload: T) -> TimerId {
        self.push(due, None, payload)
    }

    /// Schedules a timer under `key`, replacing any pending timer with the same key.
    pub fn schedule_keyed(&mut self, key: K, due: Millis, payload: T) -> TimerId {
        self.cancel_key(&key);
        self.push(due, Some(key), payload)
    }

    fn push(&mut self, due: Millis, key: Option<K>, payload: T) -> TimerId {
        let id = TimerId(self.ids.alloc());
        self.timers.push(Timer {
            id,
            due,
            key,
            payload,
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn cancel_key(&mut self, key: &K) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.key.as_ref() != Some(key));
        self.timers.len() != before
    }

    pub fn is_pending_key(&self, key: &K) -> bool {
        self.timers.iter().any(|t| t.key.as_ref() == Some(key))
    }

    /// Drops every pending timer and returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let n = self.timers.len();
        self.timers.clear();
        n
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.timers.iter().map(|t| t.due).min()
    }

    /// Pops the earliest timer whose due time is `<= now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<(TimerId, T)> {
        let mut best_idx: Option<usize> = None;
        for (idx, timer) in self.timers.iter().enumerate() {
            if timer.due > now {
                continue;
            }
            match best_idx {
                None => best_idx = Some(idx),
                Some(best) => {
                    let b = &self.timers[best];
                    if (timer.due, timer.id) < (b.due, b.id) {
                        best_idx = Some(idx);
                    }
                }
            }
        }

        let idx = best_idx?;
        // `remove` keeps the relative order of the remaining timers.
        let timer = self.timers.remove(idx);
        Some((timer.id, timer.payload))
    }
}

#[cfg(test)]
mod tests {
    use super::TimerQueue;
    use foundation::time::Millis;

    #[test]
    fn fires_in_due_then_insertion_order() {
        let mut q: TimerQueue<(), &str> = TimerQueue::new();
        q.schedule(Millis(20), "late");
        q.schedule(Millis(10), "a");
        q.schedule(Millis(10), "b");

        let got: Vec<_> = std::iter::from_fn(|| q.pop_due(Millis(100)).map(|(_, p)| p)).collect();
        assert_eq!(got, vec!["a", "b", "late"]);
    }

    #[test]
    fn nothing_fires_before_due() {
        let mut q: TimerQueue<(), u32> = TimerQueue::new();
        q.schedule(Millis(50), 1);
        assert!(q.pop_due(Millis(49)).is_none());
        assert_eq!(q.next_due(), Some(Millis(50)));
        assert_eq!(q.pop_due(Millis(50)).map(|(_, p)| p), Some(1));
        assert!(q.is_empty());
    }

    #[test]
    fn keyed_schedule_replaces_pending() {
        let mut q = TimerQueue::new();
        q.schedule_keyed("resize", Millis(150), 1);
        q.schedule_keyed("resize", Millis(200), 2);
        assert_eq!(q.len(), 1);
        assert!(q.pop_due(Millis(150)).is_none());
        assert_eq!(q.pop_due(Millis(200)).map(|(_, p)| p), Some(2));
    }

    #[test]
    fn cancel_by_id_and_key() {
        let mut q = TimerQueue::new();
        let a = q.schedule(Millis(10), "a");
        q.schedule_keyed("k", Millis(10), "b");
        q.schedule(Millis(10), "c");

        assert!(q.cancel(a));
        assert!(!q.cancel(a));
        assert!(q.cancel_key(&"k"));
        assert!(!q.is_pending_key(&"k"));

        assert_eq!(q.pop_due(Millis(10)).map(|(_, p)| p), Some("c"));
        assert!(q.pop_due(Millis(10)).is_none());
    }

    #[test]
    fn clear_reports_dropped_count() {
        let mut q: TimerQueue<(), u8> = TimerQueue::new();
        q.schedule(Millis(1), 0);
        q.schedule(Millis(2), 0);
        assert_eq!(q.clear(), 2);
        assert_eq!(q.next_due(), None);
    }
}
