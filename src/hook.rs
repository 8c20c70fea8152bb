//! Hook lifecycle state machine.
//!
//! `HookCoordinator` drives each `HookApp` through
//! `Waiting -> Injecting -> Injected -> Waiting`:
//!
//! 1. `hook()` matches a window title, binds the pid, marks the app
//!    `Injecting` and asks the native layer to inject.
//! 2. A one-shot waiter is armed for that pid, then a hook-acquired signal is
//!    published for it. Signals are queued and resolved by `drain_signals`, so
//!    `Injecting` is observable between the two steps. The native `game.hook`
//!    event publishes the same signal.
//! 3. The first signal for a pid consumes its waiter and marks the app the
//!    waiter was armed for `Injected`, then arms an exit watch.
//! 4. The exit watch polls the process table every period and calls
//!    `on_game_exit` on the first miss, which returns the watched app to
//!    `Waiting` and cancels the watch.
//!
//! Waiters and exit watches remember the app id, not just the pid. A
//! `Waiting` app keeps the pid of a process that exited and Windows reuses
//! pids, so resolving by pid alone could move the wrong app. A pid that
//! another app is injecting or injected into is never bound a second time.
//!
//! Unregistering an app leaves its exit watch armed. The watch finds no
//! entry for the pid when the process goes away and cancels itself then.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::engine::Task;
use crate::platform::{Command, NativeOverlay, ProcessProbe, TopWindow};
use crate::registry::{AppChanges, AppKey, AppRegistry, HookStatus};
use crate::scheduler::{Scheduler, TimerId};

// ---------------------------------------------------------------------------
// Policy and outcomes
// ---------------------------------------------------------------------------

/// What a failed injection (`inject_succeed == false` or a native error) does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectFailurePolicy {
    /// Treat the result as informational: arm the waiter and publish the
    /// hook-acquired signal exactly as on success.
    #[default]
    Optimistic,
    /// Return the app to `Waiting` with pid 0 so the next poll retries.
    Retry,
}

/// Result of one `hook()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookAttempt {
    UnknownApp,
    AlreadyInjected,
    /// No window title contained the app's window name.
    NoMatch,
    /// The matching window belongs to a process another app is bound to.
    PidTaken { pid: u32 },
    /// Injection was requested; the app is `Injecting` on `pid`.
    Requested { pid: u32, inject_succeed: bool },
    /// Injection failed under `InjectFailurePolicy::Retry`; the app is back
    /// to `Waiting`.
    Reverted { pid: u32 },
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct HookCoordinator {
    policy: InjectFailurePolicy,
    exit_poll: Duration,
    /// pid -> id of the app the waiter was armed for.
    waiters: HashMap<u32, String>,
    /// Hook-acquired signals not yet delivered to waiters.
    signals: VecDeque<u32>,
    exit_watches: HashMap<u32, ExitWatch>,
}

#[derive(Debug)]
struct ExitWatch {
    timer: TimerId,
    app_id: String,
}

impl HookCoordinator {
    pub fn new(policy: InjectFailurePolicy, exit_poll: Duration) -> Self {
        Self {
            policy,
            exit_poll,
            waiters: HashMap::new(),
            signals: VecDeque::new(),
            exit_watches: HashMap::new(),
        }
    }

    /// Attempts injection of `app_id` against one window snapshot.
    ///
    /// No-op for unknown or already injected apps, and when no title contains
    /// the window name (case-insensitive). The first match in snapshot order
    /// wins. A match whose pid is held by another `Injecting` or `Injected`
    /// app is skipped.
    pub fn hook(
        &mut self,
        registry: &mut AppRegistry,
        native: &dyn NativeOverlay,
        windows: &[TopWindow],
        app_id: &str,
    ) -> HookAttempt {
        let Some(app) = registry.find_by_id(app_id) else {
            log::debug!("hook: {app_id} is not registered");
            return HookAttempt::UnknownApp;
        };
        if app.status == HookStatus::Injected {
            return HookAttempt::AlreadyInjected;
        }

        let needle = app.window_name.to_lowercase();
        let Some(window) = windows
            .iter()
            .find(|w| w.title.to_lowercase().contains(&needle))
        else {
            return HookAttempt::NoMatch;
        };

        let pid = window.process_id;
        if pid == 0 {
            log::warn!("hook: window \"{}\" reports pid 0, skipping", window.title);
            return HookAttempt::NoMatch;
        }
        if let Some(owner) = registry
            .find_by_pid(pid)
            .filter(|owner| owner.id != app_id && owner.status != HookStatus::Waiting)
        {
            log::debug!(
                "hook: \"{}\" matches {app_id} but pid {pid} belongs to {}",
                window.title,
                owner.id
            );
            return HookAttempt::PidTaken { pid };
        }
        registry.mutate(
            AppKey::Id(app_id),
            AppChanges::bind(pid, HookStatus::Injecting),
        );
        log::info!("hook: injecting {app_id} into pid {pid} (\"{}\")", window.title);

        let inject_succeed = match native.inject(window) {
            Ok(result) => result.inject_succeed,
            Err(e) => {
                log::warn!("hook: inject call for {app_id} failed: {e}");
                false
            }
        };
        if inject_succeed {
            log::info!("hook: native layer accepted injection of pid {pid}");
        } else {
            log::warn!("hook: native layer reported injection failure for pid {pid}");
            if self.policy == InjectFailurePolicy::Retry {
                registry.mutate(AppKey::Id(app_id), AppChanges::bind(0, HookStatus::Waiting));
                return HookAttempt::Reverted { pid };
            }
        }

        self.waiters.insert(pid, app_id.to_string());
        self.publish_hook_acquired(pid);
        HookAttempt::Requested {
            pid,
            inject_succeed,
        }
    }

    /// Queues a hook-acquired signal for `pid`.
    pub fn publish_hook_acquired(&mut self, pid: u32) {
        self.signals.push_back(pid);
    }

    /// Delivers queued signals. Each waiter fires at most once: the first
    /// signal for its pid removes it. Signals without a waiter are dropped.
    ///
    /// Returns the number of waiters resolved.
    pub fn drain_signals(
        &mut self,
        registry: &mut AppRegistry,
        scheduler: &mut Scheduler<Task>,
        now: Instant,
    ) -> usize {
        let mut resolved = 0;
        while let Some(pid) = self.signals.pop_front() {
            match self.waiters.remove(&pid) {
                Some(app_id) => {
                    log::debug!("hook: hook acquired for {app_id} (pid {pid})");
                    self.mark_injected(registry, scheduler, now, &app_id, pid);
                    resolved += 1;
                }
                None => log::debug!("hook: no waiter for pid {pid}"),
            }
        }
        resolved
    }

    /// Marks the app on `pid` as injected and starts watching for its exit.
    ///
    /// Idempotent: an app already `Injected` is left alone and no second
    /// watch is armed. Returns `true` when the app transitioned.
    pub fn on_game_hook(
        &mut self,
        registry: &mut AppRegistry,
        scheduler: &mut Scheduler<Task>,
        now: Instant,
        pid: u32,
    ) -> bool {
        let Some(app_id) = registry.find_by_pid(pid).map(|app| app.id.clone()) else {
            log::debug!("hook: no app for hooked pid {pid}");
            return false;
        };
        self.mark_injected(registry, scheduler, now, &app_id, pid)
    }

    fn mark_injected(
        &mut self,
        registry: &mut AppRegistry,
        scheduler: &mut Scheduler<Task>,
        now: Instant,
        app_id: &str,
        pid: u32,
    ) -> bool {
        let Some(app) = registry.find_by_id(app_id) else {
            log::debug!("hook: {app_id} was unregistered before its hook landed");
            return false;
        };
        if app.pid != pid {
            log::debug!("hook: {app_id} moved from pid {pid} to {}", app.pid);
            return false;
        }
        if app.status == HookStatus::Injected {
            log::debug!("hook: {app_id} already injected");
            return false;
        }

        registry.mutate(AppKey::Id(app_id), AppChanges::status(HookStatus::Injected));
        log::info!("hook: {app_id} injected into pid {pid}, watching for exit");

        if let Some(old) = self.exit_watches.remove(&pid) {
            scheduler.cancel(old.timer);
        }
        let timer = scheduler.every(now, self.exit_poll, Task::ExitWatch { pid });
        self.exit_watches.insert(
            pid,
            ExitWatch {
                timer,
                app_id: app_id.to_string(),
            },
        );
        true
    }

    /// Exit-watch tick: if `pid` is gone from the process table, runs
    /// `on_game_exit`. Returns `true` when the exit was observed.
    pub fn check_exit(
        &mut self,
        registry: &mut AppRegistry,
        scheduler: &mut Scheduler<Task>,
        probe: &dyn ProcessProbe,
        pid: u32,
    ) -> bool {
        if probe.is_running(pid) {
            return false;
        }
        log::info!("hook: pid {pid} is no longer running");
        self.on_game_exit(registry, scheduler, pid);
        true
    }

    /// Returns the app on `pid` to `Waiting` and cancels its exit watch.
    ///
    /// With a watch armed, only the app it was armed for is touched, and only
    /// while that app is still on `pid`. The pid is left in place; the next
    /// window match overwrites it. Unknown pids and already waiting apps are
    /// harmless. Returns `true` when an app matched.
    pub fn on_game_exit(
        &mut self,
        registry: &mut AppRegistry,
        scheduler: &mut Scheduler<Task>,
        pid: u32,
    ) -> bool {
        let watched = self.exit_watches.remove(&pid).map(|watch| {
            scheduler.cancel(watch.timer);
            watch.app_id
        });
        let exited = match watched {
            Some(app_id) => {
                let still_bound = registry.find_by_id(&app_id).is_some_and(|app| app.pid == pid);
                if still_bound {
                    registry.mutate(AppKey::Id(&app_id), AppChanges::status(HookStatus::Waiting))
                } else {
                    None
                }
            }
            None => registry.mutate(AppKey::Pid(pid), AppChanges::status(HookStatus::Waiting)),
        };
        match exited {
            Some(app) => {
                log::info!("hook: {} exited, waiting for it again", app.id);
                true
            }
            None => {
                log::debug!("hook: exit of untracked pid {pid}");
                false
            }
        }
    }

    /// Native confirmed the hooked module runs in `pid`: push the app's
    /// in-game menu key, if it has one. Returns `true` when a command was sent.
    pub fn on_process(&self, registry: &AppRegistry, native: &dyn NativeOverlay, pid: u32) -> bool {
        let Some(app) = registry.find_by_pid(pid) else {
            log::debug!("hook: process event for untracked pid {pid}");
            return false;
        };
        let Some(key_code) = app.ingamemenu_key.filter(|&k| k != 0) else {
            return false;
        };

        let command = Command::InGameMenuKey { key_code };
        if let Err(e) = native.send_command(&command) {
            log::warn!("hook: failed to send in-game menu key for {}: {e}", app.id);
            return false;
        }
        log::info!("hook: in-game menu key {key_code:#04x} set for {}", app.id);
        true
    }

    pub fn has_waiter(&self, pid: u32) -> bool {
        self.waiters.contains_key(&pid)
    }

    pub fn is_watching(&self, pid: u32) -> bool {
        self.exit_watches.contains_key(&pid)
    }

    pub fn policy(&self) -> InjectFailurePolicy {
        self.policy
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{window, MockNative, MockProbe};

    const POLL: Duration = Duration::from_millis(5000);

    struct Fixture {
        registry: AppRegistry,
        scheduler: Scheduler<Task>,
        coordinator: HookCoordinator,
        native: MockNative,
        t0: Instant,
    }

    fn fixture(policy: InjectFailurePolicy) -> Fixture {
        let mut registry = AppRegistry::new();
        registry.register("fhw", "FPSHomework", Some(0x1B));
        Fixture {
            registry,
            scheduler: Scheduler::new(),
            coordinator: HookCoordinator::new(policy, POLL),
            native: MockNative::new(),
            t0: Instant::now(),
        }
    }

    fn status(f: &Fixture) -> (u32, HookStatus) {
        let app = f.registry.find_by_id("fhw").unwrap();
        (app.pid, app.status)
    }

    #[test]
    fn match_moves_waiting_to_injecting() {
        let mut f = fixture(InjectFailurePolicy::Optimistic);
        let windows = [window(11, "Desktop"), window(4242, "fpshomework - v1.2")];

        let attempt = f.coordinator.hook(&mut f.registry, &f.native, &windows, "fhw");
        assert_eq!(attempt, HookAttempt::Requested { pid: 4242, inject_succeed: true });
        assert_eq!(status(&f), (4242, HookStatus::Injecting));
        assert_eq!(f.native.injected_pids(), [4242]);
    }

    #[test]
    fn no_match_leaves_app_untouched() {
        let mut f = fixture(InjectFailurePolicy::Optimistic);
        let before = f.registry.find_by_id("fhw").cloned();

        let attempt = f
            .coordinator
            .hook(&mut f.registry, &f.native, &[window(1, "Notepad")], "fhw");
        assert_eq!(attempt, HookAttempt::NoMatch);
        assert_eq!(f.registry.find_by_id("fhw").cloned(), before);
        assert!(f.native.injected_pids().is_empty());

        let attempt = f.coordinator.hook(&mut f.registry, &f.native, &[], "fhw");
        assert_eq!(attempt, HookAttempt::NoMatch);
    }

    #[test]
    fn first_match_in_snapshot_order_wins() {
        let mut f = fixture(InjectFailurePolicy::Optimistic);
        let windows = [window(1, "FPSHomework Launcher"), window(2, "FPSHomework")];
        f.coordinator.hook(&mut f.registry, &f.native, &windows, "fhw");
        assert_eq!(status(&f).0, 1);
    }

    #[test]
    fn signal_resolves_waiter_and_arms_exit_watch() {
        let mut f = fixture(InjectFailurePolicy::Optimistic);
        f.coordinator
            .hook(&mut f.registry, &f.native, &[window(7, "FPSHomework")], "fhw");
        assert!(f.coordinator.has_waiter(7));

        let resolved = f.coordinator.drain_signals(&mut f.registry, &mut f.scheduler, f.t0);
        assert_eq!(resolved, 1);
        assert!(!f.coordinator.has_waiter(7));
        assert_eq!(status(&f), (7, HookStatus::Injected));
        assert!(f.coordinator.is_watching(7));
        assert_eq!(f.scheduler.next_deadline(), Some(f.t0 + POLL));
    }

    #[test]
    fn waiter_fires_only_once() {
        let mut f = fixture(InjectFailurePolicy::Optimistic);
        f.coordinator
            .hook(&mut f.registry, &f.native, &[window(7, "FPSHomework")], "fhw");
        f.coordinator.publish_hook_acquired(7);

        let resolved = f.coordinator.drain_signals(&mut f.registry, &mut f.scheduler, f.t0);
        assert_eq!(resolved, 1);
        assert_eq!(f.scheduler.len(), 1);
    }

    #[test]
    fn hook_on_injected_app_changes_nothing() {
        let mut f = fixture(InjectFailurePolicy::Optimistic);
        f.coordinator
            .hook(&mut f.registry, &f.native, &[window(7, "FPSHomework")], "fhw");
        f.coordinator.drain_signals(&mut f.registry, &mut f.scheduler, f.t0);

        let attempt = f
            .coordinator
            .hook(&mut f.registry, &f.native, &[window(8, "FPSHomework")], "fhw");
        assert_eq!(attempt, HookAttempt::AlreadyInjected);
        assert_eq!(status(&f), (7, HookStatus::Injected));
        assert_eq!(f.native.injected_pids(), [7]);
    }

    #[test]
    fn on_game_hook_is_idempotent() {
        let mut f = fixture(InjectFailurePolicy::Optimistic);
        f.coordinator
            .hook(&mut f.registry, &f.native, &[window(7, "FPSHomework")], "fhw");
        f.coordinator.drain_signals(&mut f.registry, &mut f.scheduler, f.t0);

        assert!(!f.coordinator.on_game_hook(&mut f.registry, &mut f.scheduler, f.t0, 7));
        assert_eq!(f.scheduler.len(), 1);
    }

    #[test]
    fn on_game_hook_for_unknown_pid_is_noop() {
        let mut f = fixture(InjectFailurePolicy::Optimistic);
        assert!(!f.coordinator.on_game_hook(&mut f.registry, &mut f.scheduler, f.t0, 99));
        assert!(f.scheduler.is_empty());
        assert_eq!(status(&f), (0, HookStatus::Waiting));
    }

    #[test]
    fn exit_watch_returns_app_to_waiting_and_cancels() {
        let mut f = fixture(InjectFailurePolicy::Optimistic);
        let probe = MockProbe::new();
        probe.set_running(7, true);
        f.coordinator
            .hook(&mut f.registry, &f.native, &[window(7, "FPSHomework")], "fhw");
        f.coordinator.drain_signals(&mut f.registry, &mut f.scheduler, f.t0);

        assert!(!f.coordinator.check_exit(&mut f.registry, &mut f.scheduler, &probe, 7));
        assert_eq!(status(&f).1, HookStatus::Injected);

        probe.set_running(7, false);
        assert!(f.coordinator.check_exit(&mut f.registry, &mut f.scheduler, &probe, 7));
        assert_eq!(status(&f), (7, HookStatus::Waiting));
        assert!(!f.coordinator.is_watching(7));
        assert!(f.scheduler.is_empty());
    }

    #[test]
    fn on_game_exit_is_idempotent_and_ignores_unknown_pid() {
        let mut f = fixture(InjectFailurePolicy::Optimistic);
        let before = f.registry.find_by_id("fhw").cloned();
        assert!(!f.coordinator.on_game_exit(&mut f.registry, &mut f.scheduler, 1234));
        assert_eq!(f.registry.find_by_id("fhw").cloned(), before);

        f.coordinator
            .hook(&mut f.registry, &f.native, &[window(7, "FPSHomework")], "fhw");
        f.coordinator.drain_signals(&mut f.registry, &mut f.scheduler, f.t0);
        assert!(f.coordinator.on_game_exit(&mut f.registry, &mut f.scheduler, 7));
        assert!(f.coordinator.on_game_exit(&mut f.registry, &mut f.scheduler, 7));
        assert_eq!(status(&f), (7, HookStatus::Waiting));
    }

    #[test]
    fn rehook_after_exit_rebinds_pid() {
        let mut f = fixture(InjectFailurePolicy::Optimistic);
        f.coordinator
            .hook(&mut f.registry, &f.native, &[window(7, "FPSHomework")], "fhw");
        f.coordinator.drain_signals(&mut f.registry, &mut f.scheduler, f.t0);
        f.coordinator.on_game_exit(&mut f.registry, &mut f.scheduler, 7);

        f.coordinator
            .hook(&mut f.registry, &f.native, &[window(9, "FPSHomework")], "fhw");
        assert_eq!(status(&f), (9, HookStatus::Injecting));
    }

    #[test]
    fn reused_pid_injects_the_new_app_not_the_stale_one() {
        let mut f = fixture(InjectFailurePolicy::Optimistic);
        f.registry.register("a", "GameA", None);
        f.registry.register("b", "GameB", None);
        f.coordinator
            .hook(&mut f.registry, &f.native, &[window(7, "GameA")], "a");
        f.coordinator.drain_signals(&mut f.registry, &mut f.scheduler, f.t0);
        f.coordinator.on_game_exit(&mut f.registry, &mut f.scheduler, 7);

        // GameB starts and gets the pid GameA had.
        let attempt = f
            .coordinator
            .hook(&mut f.registry, &f.native, &[window(7, "GameB")], "b");
        assert_eq!(attempt, HookAttempt::Requested { pid: 7, inject_succeed: true });
        f.coordinator.drain_signals(&mut f.registry, &mut f.scheduler, f.t0);

        let state = |f: &Fixture, id: &str| {
            let app = f.registry.find_by_id(id).unwrap();
            (app.pid, app.status)
        };
        assert_eq!(state(&f, "a"), (7, HookStatus::Waiting));
        assert_eq!(state(&f, "b"), (7, HookStatus::Injected));

        assert!(f.coordinator.on_game_exit(&mut f.registry, &mut f.scheduler, 7));
        assert_eq!(state(&f, "a"), (7, HookStatus::Waiting));
        assert_eq!(state(&f, "b"), (7, HookStatus::Waiting));
        assert!(f.scheduler.is_empty());
    }

    #[test]
    fn overlapping_window_names_bind_a_pid_once() {
        let mut f = fixture(InjectFailurePolicy::Optimistic);
        f.registry.register("cs", "Counter-Strike", None);
        f.registry.register("cs2", "Counter-Strike 2", None);
        let windows = [window(7, "Counter-Strike 2")];

        let first = f.coordinator.hook(&mut f.registry, &f.native, &windows, "cs");
        assert_eq!(first, HookAttempt::Requested { pid: 7, inject_succeed: true });
        let second = f.coordinator.hook(&mut f.registry, &f.native, &windows, "cs2");
        assert_eq!(second, HookAttempt::PidTaken { pid: 7 });
        assert_eq!(f.native.injected_pids(), [7]);

        f.coordinator.drain_signals(&mut f.registry, &mut f.scheduler, f.t0);
        f.coordinator.on_game_exit(&mut f.registry, &mut f.scheduler, 7);

        let statuses: Vec<_> = f
            .registry
            .iter()
            .filter(|app| app.id.starts_with("cs"))
            .map(|app| (app.id.as_str(), app.status))
            .collect();
        assert_eq!(statuses, [("cs", HookStatus::Waiting), ("cs2", HookStatus::Waiting)]);
        assert_eq!(f.registry.find_by_id("cs2").map(|a| a.pid), Some(0));
    }

    #[test]
    fn failed_injection_is_optimistic_by_default() {
        let mut f = fixture(InjectFailurePolicy::Optimistic);
        f.native.set_inject_succeed(false);

        let attempt = f
            .coordinator
            .hook(&mut f.registry, &f.native, &[window(7, "FPSHomework")], "fhw");
        assert_eq!(attempt, HookAttempt::Requested { pid: 7, inject_succeed: false });
        assert!(f.coordinator.has_waiter(7));

        // The failed injection is still treated as hooked.
        f.coordinator.drain_signals(&mut f.registry, &mut f.scheduler, f.t0);
        assert_eq!(status(&f), (7, HookStatus::Injected));
    }

    #[test]
    fn failed_injection_reverts_under_retry_policy() {
        let mut f = fixture(InjectFailurePolicy::Retry);
        f.native.set_inject_succeed(false);

        let attempt = f
            .coordinator
            .hook(&mut f.registry, &f.native, &[window(7, "FPSHomework")], "fhw");
        assert_eq!(attempt, HookAttempt::Reverted { pid: 7 });
        assert_eq!(status(&f), (0, HookStatus::Waiting));
        assert!(!f.coordinator.has_waiter(7));
        assert_eq!(f.coordinator.drain_signals(&mut f.registry, &mut f.scheduler, f.t0), 0);
    }

    #[test]
    fn inject_error_counts_as_failure() {
        let mut f = fixture(InjectFailurePolicy::Retry);
        f.native.fail_inject();
        let attempt = f
            .coordinator
            .hook(&mut f.registry, &f.native, &[window(7, "FPSHomework")], "fhw");
        assert_eq!(attempt, HookAttempt::Reverted { pid: 7 });
    }

    #[test]
    fn unregistered_app_leaves_harmless_exit_watch() {
        let mut f = fixture(InjectFailurePolicy::Optimistic);
        let probe = MockProbe::new();
        f.coordinator
            .hook(&mut f.registry, &f.native, &[window(7, "FPSHomework")], "fhw");
        f.coordinator.drain_signals(&mut f.registry, &mut f.scheduler, f.t0);
        f.registry.unregister("fhw");

        assert!(f.coordinator.is_watching(7));
        assert!(f.coordinator.check_exit(&mut f.registry, &mut f.scheduler, &probe, 7));
        assert!(!f.coordinator.is_watching(7));
        assert!(f.registry.is_empty());
    }

    #[test]
    fn process_event_pushes_ingamemenu_key() {
        let mut f = fixture(InjectFailurePolicy::Optimistic);
        f.coordinator
            .hook(&mut f.registry, &f.native, &[window(7, "FPSHomework")], "fhw");

        assert!(f.coordinator.on_process(&f.registry, &f.native, 7));
        assert_eq!(f.native.commands(), [Command::InGameMenuKey { key_code: 0x1B }]);
        assert!(!f.coordinator.on_process(&f.registry, &f.native, 8));
    }

    #[test]
    fn process_event_without_menu_key_sends_nothing() {
        let mut f = fixture(InjectFailurePolicy::Optimistic);
        f.registry.register("plain", "Gunfighters", Some(0));
        f.coordinator
            .hook(&mut f.registry, &f.native, &[window(3, "Gunfighters")], "plain");
        assert!(!f.coordinator.on_process(&f.registry, &f.native, 3));
        assert!(f.native.commands().is_empty());
    }
}
