//! One-shot deferred actions.
//!
//! Timed reverts and next-step re-enables are scheduled here instead of
//! blocking the tick. Each key has at most one pending action: scheduling a
//! key again supersedes the earlier one.

/// When a scheduled action becomes due.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Delay {
    /// After this much simulated time.
    Seconds(f64),
    /// After this many calls to [`Scheduler::advance`].
    Steps(u32),
}

/// Tolerance for accumulated float time when checking deadlines.
const DUE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
struct Pending<K> {
    key: K,
    remaining: Delay,
}

#[derive(Debug, Clone)]
pub struct Scheduler<K> {
    pending: Vec<Pending<K>>,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<K: Copy + PartialEq> Scheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key`. Returns true if a pending action for the same key was replaced.
    pub fn schedule(&mut self, key: K, delay: Delay) -> bool {
        let superseded = self.cancel(key);
        self.pending.push(Pending {
            key,
            remaining: delay,
        });
        superseded
    }

    /// Drop the pending action for `key`. Returns true if there was one.
    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.key != key);
        self.pending.len() != before
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.pending.iter().any(|p| p.key == key)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advance by one step of `dt` seconds and return the keys that became due,
    /// in the order they were scheduled.
    pub fn advance(&mut self, dt: f64) -> Vec<K> {
        let mut due = Vec::new();
        self.pending.retain_mut(|p| {
            let fired = match &mut p.remaining {
                Delay::Seconds(secs) => {
                    *secs -= dt;
                    *secs <= DUE_EPSILON
                }
                Delay::Steps(steps) => {
                    *steps = steps.saturating_sub(1);
                    *steps == 0
                }
            };
            if fired {
                due.push(p.key);
            }
            !fired
        });
        due
    }
}
