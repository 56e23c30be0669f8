//! Staggered reel stops and the scrolling illusion while reels spin.
//!
//! Every spin opens a new generation. Stop and scroll timers are scheduled under that
//! generation and anything fired for an older one is dropped, so a restart or a new spin
//! can never be touched by a late callback.

use crate::config::{self, GameConfig};
use crate::reels::{NUM_REELS, REEL_LENGTH, VISIBLE_ROWS};
use crate::timer::{TimerId, TimerQueue};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Raw strip indices currently displayed by a reel, top to bottom.
pub type VisibleWindow = [usize; VISIBLE_ROWS];

/// Where every reel rests after it stops.
pub const RESTING_WINDOW: VisibleWindow = [0, 1, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReelTimer {
    Scroll(usize),
    Stop(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Ready,
    Spinning,
    /// Only the last reel is still turning.
    Settling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerEvent {
    Scrolled { reel: usize },
    Stopped { reel: usize },
    /// Every reel of `generation` has stopped. Emitted once per spin.
    Settled { generation: u64 },
}

#[derive(Debug, Clone)]
pub struct SpinScheduler {
    tick: Duration,
    stop_stagger_ticks: u32,
    timers: TimerQueue<ReelTimer>,
    generation: u64,
    spinning: [bool; NUM_REELS],
    windows: [VisibleWindow; NUM_REELS],
    scroll_timers: [Option<TimerId>; NUM_REELS],
    settled: bool,
}

impl SpinScheduler {
    pub fn new(tick: Duration, stop_stagger_ticks: u32) -> Self {
        Self {
            tick,
            stop_stagger_ticks,
            timers: TimerQueue::new(),
            generation: 0,
            spinning: [false; NUM_REELS],
            windows: [RESTING_WINDOW; NUM_REELS],
            scroll_timers: [None; NUM_REELS],
            settled: true,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.tick, config.stop_stagger_ticks)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning.iter().any(|s| *s)
    }

    pub fn spinning(&self) -> &[bool; NUM_REELS] {
        &self.spinning
    }

    pub fn windows(&self) -> &[VisibleWindow; NUM_REELS] {
        &self.windows
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn phase(&self) -> Phase {
        match self.spinning.iter().filter(|s| **s).count() {
            0 => Phase::Ready,
            1 => Phase::Settling,
            _ => Phase::Spinning,
        }
    }

    /// Saturates for timings a validated config never produces.
    fn stop_delay(&self, reel: usize) -> Duration {
        config::stop_delay(self.tick, self.stop_stagger_ticks, reel).unwrap_or(Duration::MAX)
    }

    /// Set every reel spinning under a fresh generation and schedule the staggered stops.
    /// Stops are scheduled ahead of scroll timers so a stop wins a tie with its own scroll.
    pub fn start(&mut self) -> u64 {
        self.timers.clear();
        self.generation += 1;
        let generation = self.generation;
        self.spinning = [true; NUM_REELS];
        self.settled = false;

        for reel in 0..NUM_REELS {
            let delay = self.stop_delay(reel);
            self.timers.schedule_once(generation, delay, ReelTimer::Stop(reel));
        }
        for reel in 0..NUM_REELS {
            self.scroll_timers[reel] = Some(self.timers.schedule_repeating(
                generation,
                self.tick,
                ReelTimer::Scroll(reel),
            ));
        }
        debug!(generation, "reels spinning");
        generation
    }

    /// Stop one reel and snap it to the resting window. Returns the generation when this
    /// was the last reel still turning; that happens at most once per spin.
    pub fn stop_reel(&mut self, reel: usize) -> Option<u64> {
        if reel >= NUM_REELS || !self.spinning[reel] {
            return None;
        }
        self.spinning[reel] = false;
        if let Some(id) = self.scroll_timers[reel].take() {
            self.timers.cancel(id);
        }
        self.windows[reel] = RESTING_WINDOW;
        debug!(generation = self.generation, reel, "reel stopped");

        if self.settled || self.is_spinning() {
            return None;
        }
        self.settled = true;
        self.timers.cancel_generation(self.generation);
        Some(self.generation)
    }

    /// Run the clock forward, firing due stop and scroll timers in order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<SchedulerEvent> {
        let deadline = self.timers.now().saturating_add(elapsed);
        let mut events = Vec::new();
        while let Some(fired) = self.timers.pop_due(deadline) {
            if fired.id.generation() != self.generation {
                continue;
            }
            match fired.payload {
                ReelTimer::Scroll(reel) => {
                    if !self.spinning[reel] {
                        continue;
                    }
                    self.windows[reel] = self.windows[reel].map(|i| (i + 1) % REEL_LENGTH);
                    events.push(SchedulerEvent::Scrolled { reel });
                }
                ReelTimer::Stop(reel) => {
                    if !self.spinning[reel] {
                        continue;
                    }
                    let settled = self.stop_reel(reel);
                    events.push(SchedulerEvent::Stopped { reel });
                    if let Some(generation) = settled {
                        events.push(SchedulerEvent::Settled { generation });
                    }
                }
            }
        }
        self.timers.set_now(deadline);
        events
    }

    /// Drop every timer and return all reels to rest. Callbacks of the abandoned spin
    /// become inert because the generation moves on.
    pub fn reset(&mut self) {
        self.timers.clear();
        self.generation += 1;
        self.spinning = [false; NUM_REELS];
        self.windows = [RESTING_WINDOW; NUM_REELS];
        self.scroll_timers = [None; NUM_REELS];
        self.settled = true;
    }
}
