//! Poll-driven timers
//!
//! Both timers are advanced by the host passing the current time, so the
//! animation-frame loop, the native demo and the tests all drive them the
//! same way.

/// Repeating countdown ticker.
///
/// At most one deadline is armed. A poll fires at most one tick; if the host
/// fell more than an interval behind (background tab, long frame) the next
/// deadline is re-based on `now` instead of replaying the missed ticks.
#[derive(Debug, Clone)]
pub struct Countdown {
    interval_ms: f64,
    next_at: Option<f64>,
}

impl Countdown {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            next_at: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.next_at.is_some()
    }

    /// Arm the ticker with the first deadline one interval after `now`.
    /// Already-armed tickers are left alone.
    pub fn arm(&mut self, now: f64) {
        if self.next_at.is_none() {
            self.next_at = Some(now + self.interval_ms);
        }
    }

    pub fn cancel(&mut self) {
        self.next_at = None;
    }

    /// Milliseconds until the next tick (None if not armed)
    pub fn remaining_ms(&self, now: f64) -> Option<f64> {
        self.next_at.map(|at| (at - now).max(0.0))
    }

    /// Returns true if a tick is due at `now`
    pub fn poll(&mut self, now: f64) -> bool {
        let Some(due) = self.next_at else {
            return false;
        };
        if now < due {
            return false;
        }

        let mut next = due + self.interval_ms;
        if next <= now {
            next = now + self.interval_ms;
        }
        self.next_at = Some(next);
        true
    }
}

/// Keyed one-shot timers.
///
/// Scheduling a key that is already pending replaces it, so each key has a
/// single live timer. While frozen nothing fires and, on thaw, every
/// deadline moves later by the frozen duration.
#[derive(Debug, Clone)]
pub struct DeferredQueue<K> {
    entries: Vec<(K, f64)>,
    frozen_at: Option<f64>,
}

impl<K> Default for DeferredQueue<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            frozen_at: None,
        }
    }
}

impl<K: Copy + PartialEq> DeferredQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, key: K, now: f64, delay_ms: f64) {
        self.cancel(key);
        // Scheduled while frozen: the delay starts counting at thaw
        let base = self.frozen_at.unwrap_or(now);
        self.entries.push((key, base + delay_ms));
    }

    pub fn cancel(&mut self, key: K) {
        self.entries.retain(|(k, _)| *k != key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_at.is_some()
    }

    pub fn freeze(&mut self, now: f64) {
        if self.frozen_at.is_none() {
            self.frozen_at = Some(now);
        }
    }

    pub fn thaw(&mut self, now: f64) {
        if let Some(at) = self.frozen_at.take() {
            let delta = (now - at).max(0.0);
            for (_, due) in &mut self.entries {
                *due += delta;
            }
        }
    }

    /// Remove and return every key due at `now`, earliest first
    pub fn poll(&mut self, now: f64) -> Vec<K> {
        if self.frozen_at.is_some() {
            return Vec::new();
        }

        let mut due: Vec<(K, f64)> = Vec::new();
        self.entries.retain(|&(key, at)| {
            if at <= now {
                due.push((key, at));
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        due.into_iter().map(|(key, _)| key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_ticks_once_per_interval() {
        let mut countdown = Countdown::new(1000.0);
        assert!(!countdown.poll(5_000.0));

        countdown.arm(0.0);
        assert!(!countdown.poll(999.0));
        assert!(countdown.poll(1_000.0));
        assert!(!countdown.poll(1_500.0));
        assert!(countdown.poll(2_010.0));
        // Keeps the original cadence despite the late poll
        assert_eq!(countdown.remaining_ms(2_010.0), Some(990.0));
    }

    #[test]
    fn test_countdown_no_burst_after_stall() {
        let mut countdown = Countdown::new(1000.0);
        countdown.arm(0.0);
        assert!(countdown.poll(10_000.0));
        // The nine missed ticks are not replayed
        assert!(!countdown.poll(10_001.0));
        assert!(countdown.poll(11_000.0));
    }

    #[test]
    fn test_countdown_rearm_is_idempotent() {
        let mut countdown = Countdown::new(1000.0);
        countdown.arm(0.0);
        countdown.arm(700.0);
        assert!(countdown.poll(1_000.0));

        countdown.cancel();
        assert!(!countdown.is_armed());
        countdown.arm(5_300.0);
        assert!(!countdown.poll(6_000.0));
        assert!(countdown.poll(6_300.0));
    }

    #[test]
    fn test_deferred_fires_in_order() {
        let mut queue = DeferredQueue::new();
        queue.schedule('b', 0.0, 2_000.0);
        queue.schedule('a', 0.0, 1_000.0);
        assert!(queue.poll(999.0).is_empty());
        assert_eq!(queue.poll(5_000.0), vec!['a', 'b']);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_deferred_reschedule_replaces() {
        let mut queue = DeferredQueue::new();
        queue.schedule('f', 0.0, 1_000.0);
        queue.schedule('f', 800.0, 1_000.0);
        assert_eq!(queue.len(), 1);
        assert!(queue.poll(1_000.0).is_empty());
        assert_eq!(queue.poll(1_800.0), vec!['f']);
    }

    #[test]
    fn test_deferred_freeze_shifts_deadlines() {
        let mut queue = DeferredQueue::new();
        queue.schedule(1u8, 0.0, 1_000.0);
        queue.freeze(400.0);
        assert!(queue.poll(5_000.0).is_empty());
        queue.thaw(10_400.0);
        assert!(queue.poll(10_999.0).is_empty());
        assert_eq!(queue.poll(11_000.0), vec![1]);
    }

    #[test]
    fn test_deferred_schedule_while_frozen() {
        let mut queue = DeferredQueue::new();
        queue.freeze(100.0);
        queue.schedule(1u8, 3_000.0, 1_000.0);
        queue.thaw(3_000.0);
        assert!(queue.poll(3_999.0).is_empty());
        assert_eq!(queue.poll(4_000.0), vec![1]);
    }

    #[test]
    fn test_deferred_cancel() {
        let mut queue = DeferredQueue::new();
        queue.schedule(1u8, 0.0, 10.0);
        queue.schedule(2u8, 0.0, 10.0);
        queue.cancel(1);
        assert!(!queue.is_pending(1));
        assert_eq!(queue.poll(10.0), vec![2]);
    }
}
