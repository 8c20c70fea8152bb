//! In-memory registry of hook targets and their per-process state.
//!
//! One `HookApp` per registered game. Entries keep registration order, which
//! is the order `find_by_status` reports and therefore the order the watcher
//! attempts injection in. Lookup misses are never errors: every accessor
//! returns `Option` and mutations of unknown entries are no-ops.
//!
//! The registry is owned by the `Engine` and handed by reference to the
//! watcher and coordinator; there is no global instance.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Hook lifecycle: `Waiting -> Injecting -> Injected -> Waiting`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookStatus {
    #[default]
    Waiting,
    Injecting,
    Injected,
}

/// A hook definition as supplied by configuration or the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hook {
    pub id: String,
    /// Case-insensitive substring matched against live window titles.
    pub window_name: String,
    #[serde(default)]
    pub ingamemenu_key: Option<u32>,
}

/// A tracked target process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookApp {
    pub id: String,
    pub window_name: String,
    /// 0 until a window match binds the app to a process.
    pub pid: u32,
    pub status: HookStatus,
    pub ingamemenu_key: Option<u32>,
}

/// Partial update applied by `AppRegistry::mutate`. `None` fields are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppChanges {
    pub pid: Option<u32>,
    pub status: Option<HookStatus>,
}

impl AppChanges {
    pub fn status(status: HookStatus) -> Self {
        Self {
            pid: None,
            status: Some(status),
        }
    }

    pub fn bind(pid: u32, status: HookStatus) -> Self {
        Self {
            pid: Some(pid),
            status: Some(status),
        }
    }
}

/// Selects an entry by id or by bound process id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppKey<'a> {
    Id(&'a str),
    Pid(u32),
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppRegistry {
    apps: Vec<HookApp>,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook target. Idempotent: an existing `id` is returned
    /// unchanged, whatever `window_name`/`ingamemenu_key` say this time.
    pub fn register(
        &mut self,
        id: &str,
        window_name: &str,
        ingamemenu_key: Option<u32>,
    ) -> &HookApp {
        let index = match self.position(id) {
            Some(i) => i,
            None => {
                log::info!("registry: registered {id} (window \"{window_name}\")");
                self.apps.push(HookApp {
                    id: id.to_string(),
                    window_name: window_name.to_string(),
                    pid: 0,
                    status: HookStatus::Waiting,
                    ingamemenu_key,
                });
                self.apps.len() - 1
            }
        };
        &self.apps[index]
    }

    pub fn find_by_id(&self, id: &str) -> Option<&HookApp> {
        self.apps.iter().find(|app| app.id == id)
    }

    /// Entries in `status`, in registration order.
    pub fn find_by_status(&self, status: HookStatus) -> Vec<&HookApp> {
        self.apps.iter().filter(|app| app.status == status).collect()
    }

    /// Entry bound to `pid`. Pid 0 means "unbound" and never matches.
    ///
    /// A `Waiting` entry may still hold the pid of a process that exited, and
    /// Windows reuses pids, so an `Injecting`/`Injected` entry on the same pid
    /// wins over it. Otherwise the first in registration order.
    pub fn find_by_pid(&self, pid: u32) -> Option<&HookApp> {
        self.pid_position(pid).map(|i| &self.apps[i])
    }

    /// Applies a partial update. Unknown keys return `None`.
    ///
    /// A status other than `Waiting` is refused while the resulting pid is 0;
    /// the rest of the update still applies.
    pub fn mutate(&mut self, key: AppKey<'_>, changes: AppChanges) -> Option<&HookApp> {
        let index = match key {
            AppKey::Id(id) => self.position(id),
            AppKey::Pid(pid) => self.pid_position(pid),
        };
        let Some(index) = index else {
            log::debug!("registry: no entry for {key:?}");
            return None;
        };

        let app = &mut self.apps[index];
        if let Some(pid) = changes.pid {
            app.pid = pid;
        }
        if let Some(status) = changes.status {
            if status != HookStatus::Waiting && app.pid == 0 {
                log::warn!("registry: {} cannot become {status:?} without a pid", app.id);
            } else {
                app.status = status;
            }
        }
        Some(&self.apps[index])
    }

    /// Removes an entry at any status. Returns the removed entry.
    pub fn unregister(&mut self, id: &str) -> Option<HookApp> {
        let index = self.position(id)?;
        let app = self.apps.remove(index);
        log::info!("registry: unregistered {} ({:?})", app.id, app.status);
        Some(app)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HookApp> {
        self.apps.iter()
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.apps.iter().position(|app| app.id == id)
    }

    fn pid_position(&self, pid: u32) -> Option<usize> {
        if pid == 0 {
            return None;
        }
        self.apps
            .iter()
            .position(|app| app.pid == pid && app.status != HookStatus::Waiting)
            .or_else(|| self.apps.iter().position(|app| app.pid == pid))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_creates_waiting_unbound_entry() {
        let mut registry = AppRegistry::new();
        let app = registry.register("fhw", "FPSHomework", Some(0x1B)).clone();
        assert_eq!(app.status, HookStatus::Waiting);
        assert_eq!(app.pid, 0);
        assert_eq!(app.ingamemenu_key, Some(0x1B));
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = AppRegistry::new();
        let first = registry.register("fhw", "FPSHomework", None).clone();
        registry.mutate(AppKey::Id("fhw"), AppChanges::bind(42, HookStatus::Injecting));
        let before = registry.find_by_id("fhw").cloned();

        let second = registry.register("fhw", "Something Else", Some(1)).clone();
        assert_eq!(Some(second.clone()), before);
        assert_eq!(second.window_name, first.window_name);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn find_by_status_keeps_registration_order() {
        let mut registry = AppRegistry::new();
        registry.register("c", "C", None);
        registry.register("a", "A", None);
        registry.register("b", "B", None);
        registry.mutate(AppKey::Id("a"), AppChanges::bind(1, HookStatus::Injected));

        let ids: Vec<_> = registry
            .find_by_status(HookStatus::Waiting)
            .iter()
            .map(|app| app.id.as_str())
            .collect();
        assert_eq!(ids, ["c", "b"]);
    }

    #[test]
    fn find_by_pid_ignores_unbound_entries() {
        let mut registry = AppRegistry::new();
        registry.register("a", "A", None);
        assert!(registry.find_by_pid(0).is_none());

        registry.mutate(AppKey::Id("a"), AppChanges::bind(7, HookStatus::Injecting));
        assert_eq!(registry.find_by_pid(7).map(|a| a.id.as_str()), Some("a"));
    }

    #[test]
    fn live_binding_wins_over_stale_pid() {
        let mut registry = AppRegistry::new();
        registry.register("old", "Old", None);
        registry.register("new", "New", None);
        registry.mutate(AppKey::Id("old"), AppChanges::bind(7, HookStatus::Waiting));
        registry.mutate(AppKey::Id("new"), AppChanges::bind(7, HookStatus::Injecting));

        assert_eq!(registry.find_by_pid(7).map(|a| a.id.as_str()), Some("new"));
        let app = registry
            .mutate(AppKey::Pid(7), AppChanges::status(HookStatus::Injected))
            .cloned();
        assert_eq!(app.map(|a| a.id), Some("new".to_string()));
        assert_eq!(registry.find_by_id("old").map(|a| a.status), Some(HookStatus::Waiting));
    }

    #[test]
    fn mutate_unknown_is_noop() {
        let mut registry = AppRegistry::new();
        registry.register("a", "A", None);
        assert!(registry
            .mutate(AppKey::Id("zzz"), AppChanges::status(HookStatus::Injected))
            .is_none());
        assert!(registry
            .mutate(AppKey::Pid(99), AppChanges::status(HookStatus::Waiting))
            .is_none());
        assert_eq!(registry.find_by_id("a").map(|a| a.status), Some(HookStatus::Waiting));
    }

    #[test]
    fn mutate_by_pid_updates_status_only() {
        let mut registry = AppRegistry::new();
        registry.register("a", "A", None);
        registry.mutate(AppKey::Id("a"), AppChanges::bind(5, HookStatus::Injected));

        let app = registry
            .mutate(AppKey::Pid(5), AppChanges::status(HookStatus::Waiting))
            .cloned();
        assert_eq!(app.map(|a| (a.pid, a.status)), Some((5, HookStatus::Waiting)));
    }

    #[test]
    fn active_status_requires_pid() {
        let mut registry = AppRegistry::new();
        registry.register("a", "A", None);
        let app = registry
            .mutate(AppKey::Id("a"), AppChanges::status(HookStatus::Injecting))
            .cloned();
        assert_eq!(app.map(|a| a.status), Some(HookStatus::Waiting));
    }

    #[test]
    fn unregister_works_at_any_status() {
        let mut registry = AppRegistry::new();
        registry.register("a", "A", None);
        registry.mutate(AppKey::Id("a"), AppChanges::bind(3, HookStatus::Injecting));

        let removed = registry.unregister("a");
        assert_eq!(removed.map(|a| a.status), Some(HookStatus::Injecting));
        assert!(registry.is_empty());
        assert!(registry.unregister("a").is_none());
    }
}
