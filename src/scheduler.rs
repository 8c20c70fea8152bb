//! Cooperative timer facility.
//!
//! `Scheduler` holds repeating and one-shot timers keyed by `TimerId`. It never
//! sleeps or spawns: the owner asks `due(now)` for the tasks whose deadline has
//! passed and runs them on its own thread, which keeps all state mutation on a
//! single writer. Time is always passed in, so tests drive it with synthetic
//! `Instant`s.
//!
//! Repeating timers fire one period after arming, then every period. A timer
//! that falls behind by more than one period fires once and re-anchors on
//! `now` rather than replaying the missed ticks.

use std::time::{Duration, Instant};

/// Handle to a scheduled timer. Stale handles are ignored by every method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Timer<T> {
    id: TimerId,
    period: Duration,
    next_due: Instant,
    repeating: bool,
    enabled: bool,
    task: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    timers: Vec<Timer<T>>,
    next_id: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `task` every `period`, first at `now + period`.
    pub fn every(&mut self, now: Instant, period: Duration, task: T) -> TimerId {
        self.insert(now, period, true, task)
    }

    /// Runs `task` once at `now + delay`.
    pub fn once(&mut self, now: Instant, delay: Duration, task: T) -> TimerId {
        self.insert(now, delay, false, task)
    }

    /// Resumes a disabled timer; its next run is one period from `now`.
    /// Returns `false` for unknown ids.
    pub fn enable(&mut self, id: TimerId, now: Instant) -> bool {
        let Some(timer) = self.find_mut(id) else {
            return false;
        };
        if !timer.enabled {
            timer.enabled = true;
            timer.next_due = now + timer.period;
        }
        true
    }

    /// Stops dispatch of a timer without forgetting it. Takes effect
    /// immediately, including for tasks already returned by `due` that the
    /// caller re-checks with `is_active`.
    pub fn disable(&mut self, id: TimerId) -> bool {
        match self.find_mut(id) {
            Some(timer) => {
                timer.enabled = false;
                true
            }
            None => false,
        }
    }

    /// Removes a timer for good.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// True when `id` exists and is enabled.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id && t.enabled)
    }

    /// Collects every enabled timer whose deadline is at or before `now`,
    /// in arming order. Repeating timers are rescheduled, one-shots removed.
    pub fn due(&mut self, now: Instant) -> Vec<(TimerId, T)> {
        let mut fired = Vec::new();
        for timer in self.timers.iter_mut() {
            if !timer.enabled || timer.next_due > now {
                continue;
            }
            fired.push((timer.id, timer.task.clone()));
            if timer.repeating {
                timer.next_due += timer.period;
                if timer.next_due <= now {
                    timer.next_due = now + timer.period;
                }
            }
        }

        let fired_once: Vec<TimerId> = self
            .timers
            .iter()
            .filter(|t| !t.repeating && fired.iter().any(|(id, _)| *id == t.id))
            .map(|t| t.id)
            .collect();
        self.timers.retain(|t| !fired_once.contains(&t.id));

        fired
    }

    /// Earliest deadline among enabled timers.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers
            .iter()
            .filter(|t| t.enabled)
            .map(|t| t.next_due)
            .min()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    fn insert(&mut self, now: Instant, period: Duration, repeating: bool, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            period,
            next_due: now + period,
            repeating,
            enabled: true,
            task,
        });
        id
    }

    fn find_mut(&mut self, id: TimerId) -> Option<&mut Timer<T>> {
        self.timers.iter_mut().find(|t| t.id == id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
