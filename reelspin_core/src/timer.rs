//! Virtual-clock timer queue.
//!
//! Single-threaded replacement for fire-and-forget browser timers. Time only moves when the
//! owner advances the clock, so a spin can be replayed deterministically in tests and driven
//! by a real interval in the terminal front end. Every timer belongs to a generation; dropping
//! a whole generation makes its pending callbacks unreachable.

use std::time::Duration;

/// Smallest period a repeating timer may have.
const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId {
    generation: u64,
    seq: u64,
}

impl TimerId {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A timer that came due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    pub id: TimerId,
    pub at: Duration,
    pub payload: T,
}

#[derive(Debug, Clone)]
struct Timer<T> {
    id: TimerId,
    due: Duration,
    period: Option<Duration>,
    payload: T,
}

#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    now: Duration,
    next_seq: u64,
    timers: Vec<Timer<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            timers: Vec::new(),
        }
    }
}

impl<T: Clone> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn schedule_once(&mut self, generation: u64, delay: Duration, payload: T) -> TimerId {
        self.insert(generation, delay, None, payload)
    }

    /// First fires one `period` from now, then every `period` until cancelled.
    pub fn schedule_repeating(
        &mut self,
        generation: u64,
        period: Duration,
        payload: T,
    ) -> TimerId {
        let period = period.max(MIN_PERIOD);
        self.insert(generation, period, Some(period), payload)
    }

    fn insert(
        &mut self,
        generation: u64,
        delay: Duration,
        period: Option<Duration>,
        payload: T,
    ) -> TimerId {
        let id = TimerId {
            generation,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.timers.push(Timer {
            id,
            due: self.now.saturating_add(delay),
            period,
            payload,
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn cancel_generation(&mut self, generation: u64) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.id.generation != generation);
        before - self.timers.len()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Fire the earliest timer due at or before `deadline`, moving the clock to its due time.
    /// Ties fire in scheduling order. Repeating timers are re-armed before returning.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<Fired<T>> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= deadline)
            .min_by_key(|(_, t)| (t.due, t.id.seq))
            .map(|(i, _)| i)?;

        let fired_at = self.timers[idx].due;
        self.now = self.now.max(fired_at);
        // a repeating timer at the end of the clock cannot be re-armed
        let fired = match self.timers[idx].period {
            Some(period) if fired_at < Duration::MAX => {
                let timer = &mut self.timers[idx];
                timer.due = timer.due.saturating_add(period);
                Fired {
                    id: timer.id,
                    at: fired_at,
                    payload: timer.payload.clone(),
                }
            }
            _ => {
                let timer = self.timers.swap_remove(idx);
                Fired {
                    id: timer.id,
                    at: fired_at,
                    payload: timer.payload,
                }
            }
        };
        Some(fired)
    }

    /// Move the clock forward without firing anything. Never moves backwards.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance by `elapsed`, returning everything that fired in order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Fired<T>> {
        let deadline = self.now.saturating_add(elapsed);
        let mut fired = Vec::new();
        while let Some(f) = self.pop_due(deadline) {
            fired.push(f);
        }
        self.set_now(deadline);
        fired
    }
}
