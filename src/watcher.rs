//! Periodic bridge from "apps waiting to be hooked" to live windows.
//!
//! `ProcessWatcher` owns one repeating scheduler timer. Each tick takes a
//! single window snapshot (only when something is `Waiting`) and runs
//! `HookCoordinator::hook` for every waiting app against it. Disabling the
//! watcher disables the timer in place; enabling it again reuses the same
//! timer identity.

use std::time::{Duration, Instant};

use crate::engine::Task;
use crate::hook::{HookAttempt, HookCoordinator};
use crate::platform::NativeOverlay;
use crate::registry::{AppRegistry, HookStatus};
use crate::scheduler::{Scheduler, TimerId};

#[derive(Debug)]
pub struct ProcessWatcher {
    period: Duration,
    timer: Option<TimerId>,
    enabled: bool,
}

impl ProcessWatcher {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            timer: None,
            enabled: false,
        }
    }

    /// Starts (or resumes) polling. The first tick runs one period from `now`.
    pub fn enable(&mut self, scheduler: &mut Scheduler<Task>, now: Instant) {
        match self.timer {
            Some(id) if scheduler.enable(id, now) => {}
            _ => {
                self.timer = Some(scheduler.every(now, self.period, Task::InjectPoll));
            }
        }
        self.enabled = true;
        log::info!("watcher: injection polling enabled every {:?}", self.period);
    }

    /// Stops polling immediately. In-flight exit watches are unaffected.
    pub fn disable(&mut self, scheduler: &mut Scheduler<Task>) {
        if let Some(id) = self.timer {
            scheduler.disable(id);
        }
        self.enabled = false;
        log::info!("watcher: injection polling disabled");
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// One poll. Returns the outcome for every waiting app, in registration
    /// order. Window enumeration failures skip the tick.
    pub fn tick(
        &self,
        registry: &mut AppRegistry,
        coordinator: &mut HookCoordinator,
        native: &dyn NativeOverlay,
    ) -> Vec<(String, HookAttempt)> {
        if !self.enabled {
            return Vec::new();
        }

        let waiting: Vec<String> = registry
            .find_by_status(HookStatus::Waiting)
            .into_iter()
            .map(|app| app.id.clone())
            .collect();
        if waiting.is_empty() {
            return Vec::new();
        }

        let windows = match native.top_windows() {
            Ok(windows) => windows,
            Err(e) => {
                log::warn!("watcher: window enumeration failed, retrying next tick: {e}");
                return Vec::new();
            }
        };
        log::debug!(
            "watcher: {} waiting app(s) against {} window(s)",
            waiting.len(),
            windows.len()
        );

        waiting
            .into_iter()
            .map(|id| {
                let attempt = coordinator.hook(registry, native, &windows, &id);
                (id, attempt)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
