//! The single writer.
//!
//! `Engine` owns every piece of mutable state (registry, scheduler, hook
//! coordinator, overlay windows, remap and mouse configuration) together with
//! the native session. Native callbacks and UI requests reach it through the
//! `EventBus`; timers fire from `tick`. Nothing else mutates this state, so
//! none of it is locked.

use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;
use serde_json::Value;

use crate::config::Config;
use crate::event_bus::{ControlRequest, EngineMsg, EventBus};
use crate::hook::{HookAttempt, HookCoordinator};
use crate::input::{InputTranslator, KeyListener};
use crate::keycodes::VkCode;
use crate::mouse::{MouseController, MouseSettings};
use crate::overlay::OverlayWindows;
use crate::platform::{
    Command, DisplayScale, FpsPosition, HotkeyInfo, InputSink, NativeEvent, NativeOverlay,
    OverlayWindowDetails, PlatformError, ProcessProbe, Rect,
};
use crate::registry::{AppRegistry, Hook, HookStatus};
use crate::remap::{ApplySummary, InterceptMode, KeyRemapState, KeyboardRemapEngine};
use crate::scheduler::Scheduler;
use crate::settings::UserSettings;
use crate::watcher::ProcessWatcher;

/// Work items carried by scheduler timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Injection poll of the process watcher.
    InjectPoll,
    /// Exit watch for an injected process.
    ExitWatch { pid: u32 },
    /// Key-up half of a synthetic key press.
    KeyRelease { key_code: VkCode, modifiers: u32 },
}

pub struct Engine {
    native: Box<dyn NativeOverlay + Send>,
    probe: Box<dyn ProcessProbe + Send>,
    scale: Box<dyn DisplayScale + Send>,
    sink: Box<dyn InputSink + Send>,

    registry: AppRegistry,
    scheduler: Scheduler<Task>,
    watcher: ProcessWatcher,
    coordinator: HookCoordinator,
    windows: OverlayWindows,
    translator: InputTranslator,
    remap: KeyboardRemapEngine,
    mouse: MouseController,

    release_delay: Duration,
    graphics_size: Option<(u32, u32)>,
    started: bool,
}

impl Engine {
    /// Builds an engine and registers the hooks listed in `config`. Nothing
    /// talks to the native layer until `start`.
    pub fn new(
        config: &Config,
        native: Box<dyn NativeOverlay + Send>,
        probe: Box<dyn ProcessProbe + Send>,
        scale: Box<dyn DisplayScale + Send>,
        sink: Box<dyn InputSink + Send>,
    ) -> Self {
        let mut registry = AppRegistry::new();
        for hook in &config.hooks {
            registry.register(&hook.id, &hook.window_name, hook.ingamemenu_key);
        }

        Self {
            native,
            probe,
            scale,
            sink,
            registry,
            scheduler: Scheduler::new(),
            watcher: ProcessWatcher::new(config.watcher.period()),
            coordinator: HookCoordinator::new(
                config.injection.on_failure,
                config.exit_watch.period(),
            ),
            windows: OverlayWindows::new(),
            translator: InputTranslator::new(),
            remap: KeyboardRemapEngine::new(),
            mouse: MouseController::new(),
            release_delay: config.keyboard.release_delay(),
            graphics_size: None,
            started: false,
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Opens the native session and starts injection polling.
    pub fn start(&mut self, now: Instant) -> Result<(), PlatformError> {
        if self.started {
            return Ok(());
        }
        self.native.start()?;
        self.started = true;
        log::info!("engine: native session open, {} hook(s) registered", self.registry.len());
        self.watcher.enable(&mut self.scheduler, now);
        Ok(())
    }

    /// Stops polling, closes every overlay window and then the native
    /// session. Safe to call twice.
    pub fn shutdown(&mut self) -> Result<(), PlatformError> {
        if !self.started {
            return Ok(());
        }
        self.watcher.disable(&mut self.scheduler);
        self.started = false;
        let closed = self.windows.close_all(self.native.as_ref());
        if closed > 0 {
            log::info!("engine: closed {closed} overlay window(s)");
        }
        self.native.stop()?;
        log::info!("engine: native session closed");
        Ok(())
    }

    /// Registers hook definitions. Already known ids keep their state; one
    /// that is already injected gets its hook transition replayed, which
    /// leaves it unchanged.
    pub fn add_hooks(&mut self, hooks: &[Hook], now: Instant) {
        for hook in hooks {
            let app = self
                .registry
                .register(&hook.id, &hook.window_name, hook.ingamemenu_key);
            log::info!("engine: hook {} registered ({:?})", app.id, app.status);
            if app.status == HookStatus::Injected && app.pid != 0 {
                let pid = app.pid;
                self.coordinator
                    .on_game_hook(&mut self.registry, &mut self.scheduler, now, pid);
            }
        }
    }

    pub fn remove_hooks(&mut self, ids: &[String]) {
        for id in ids {
            match self.registry.unregister(id) {
                Some(app) => log::info!("engine: hook {id} removed ({:?})", app.status),
                None => log::debug!("engine: remove of unknown hook {id}"),
            }
        }
    }

    pub fn enable_injection(&mut self, now: Instant) {
        self.watcher.enable(&mut self.scheduler, now);
    }

    pub fn disable_injection(&mut self) {
        self.watcher.disable(&mut self.scheduler);
    }

    // -----------------------------------------------------------------------
    // Event intake
    // -----------------------------------------------------------------------

    /// Decodes and handles one native callback. Events missing a required
    /// field are dropped.
    pub fn handle_native(&mut self, tag: &str, payload: &Value, now: Instant) {
        match NativeEvent::from_raw(tag, payload) {
            Some(event) => self.handle_event(event, now),
            None => log::debug!("engine: dropping {tag} event with incomplete payload"),
        }
    }

    pub fn handle_event(&mut self, event: NativeEvent, now: Instant) {
        match event {
            NativeEvent::Process { pid } => {
                self.coordinator
                    .on_process(&self.registry, self.native.as_ref(), pid);
            }
            NativeEvent::Hook { pid } => {
                self.coordinator.publish_hook_acquired(pid);
                self.coordinator
                    .drain_signals(&mut self.registry, &mut self.scheduler, now);
            }
            NativeEvent::Exit { pid } => {
                self.coordinator
                    .on_game_exit(&mut self.registry, &mut self.scheduler, pid);
            }
            NativeEvent::Input(raw) => {
                self.translator.forward(
                    &self.windows,
                    self.scale.as_ref(),
                    self.sink.as_ref(),
                    &raw,
                );
            }
            NativeEvent::Key { channel, event } => {
                self.translator.publish_key(channel, &event);
            }
            NativeEvent::WindowFocus { focus_window_id } => {
                log::debug!("engine: focus moved to window {focus_window_id}");
            }
            NativeEvent::GraphicsWindow { width, height } => {
                log::info!("engine: game graphics window {width}x{height}");
                self.graphics_size = Some((width, height));
            }
            NativeEvent::WindowResize { width, height } => {
                if self.graphics_size != Some((width, height)) {
                    log::info!("engine: game window resized to {width}x{height}");
                    self.graphics_size = Some((width, height));
                }
            }
            NativeEvent::Fps { fps } => log::trace!("engine: fps {fps:?}"),
            NativeEvent::FrameBuffer { width, height } => {
                log::trace!("engine: frame buffer {width}x{height}");
            }
            NativeEvent::Log { message } => log::info!("native: {message}"),
            NativeEvent::GameLog { message } => log::info!("game: {message}"),
            NativeEvent::Unknown { tag, .. } => log::debug!("engine: unhandled event {tag}"),
        }
    }

    /// Applies one UI request.
    pub fn handle_request(&mut self, request: ControlRequest, now: Instant) {
        match request {
            ControlRequest::AddHooks(hooks) => self.add_hooks(&hooks, now),
            ControlRequest::RemoveHooks(ids) => self.remove_hooks(&ids),
            ControlRequest::EnableInjection => self.enable_injection(now),
            ControlRequest::DisableInjection => self.disable_injection(),
            ControlRequest::ApplyUserSettings(settings) => {
                self.apply_user_settings(&settings);
            }
            ControlRequest::SetKeyMapping { src, dst } => self.set_key_mapping(src, dst),
            ControlRequest::RemoveKeyMapping { src } => self.remove_key_mapping(src),
            ControlRequest::ClearKeyMappings => self.clear_key_mappings(),
            ControlRequest::SetBlockedKeys { keys, blocked } => {
                self.set_blocked_keys(&keys, blocked);
            }
            ControlRequest::SetInterceptMode(mode) => self.set_intercept_mode(mode),
            ControlRequest::StartIntercept => self.start_intercept(),
            ControlRequest::StopIntercept => self.stop_intercept(),
            ControlRequest::SetCursor(cursor) => self.set_cursor(&cursor),
            ControlRequest::SetFps { show, position } => self.set_fps(show, position),
            ControlRequest::SetHotkeys(hotkeys) => self.set_hotkeys(hotkeys),
            ControlRequest::SendKey {
                key_code,
                modifiers,
            } => self.send_key(key_code, modifiers, now),
            ControlRequest::AddOverlayWindow { id, details } => {
                if let Err(e) = self.add_overlay_window(id, details) {
                    log::warn!("engine: adding overlay window {id} failed: {e}");
                }
            }
            ControlRequest::CloseOverlayWindow { id } => {
                self.close_overlay_window(id);
            }
            ControlRequest::ChangeWindowSize {
                id,
                width,
                height,
                x,
                y,
            } => {
                self.change_window_size(id, width, height, x, y);
            }
        }
    }

    /// Runs every timer due at `now`. Returns the number of tasks run.
    ///
    /// The watcher's enabled flag and the exit-watch table are re-checked
    /// before each task, so a timer disabled earlier in the same batch does
    /// not run.
    pub fn tick(&mut self, now: Instant) -> usize {
        let mut ran = 0;
        for (_, task) in self.scheduler.due(now) {
            match task {
                Task::InjectPoll => {
                    if !self.watcher.is_enabled() {
                        continue;
                    }
                    let outcomes = self.watcher.tick(
                        &mut self.registry,
                        &mut self.coordinator,
                        self.native.as_ref(),
                    );
                    for (id, attempt) in outcomes {
                        if attempt != HookAttempt::NoMatch {
                            log::debug!("engine: poll of {id}: {attempt:?}");
                        }
                    }
                }
                Task::ExitWatch { pid } => {
                    if !self.coordinator.is_watching(pid) {
                        continue;
                    }
                    self.coordinator.check_exit(
                        &mut self.registry,
                        &mut self.scheduler,
                        self.probe.as_ref(),
                        pid,
                    );
                }
                Task::KeyRelease {
                    key_code,
                    modifiers,
                } => self.send(Command::KeyboardInject {
                    key_code,
                    modifiers,
                    is_down: false,
                }),
            }
            self.coordinator
                .drain_signals(&mut self.registry, &mut self.scheduler, now);
            ran += 1;
        }
        ran
    }

    /// Drains the bus and fires timers until a shutdown message arrives or
    /// every sink is dropped, then shuts down.
    pub fn run(&mut self, bus: EventBus) -> Result<(), PlatformError> {
        let rx = bus.into_receiver();
        loop {
            self.tick(Instant::now());

            let received = match self.scheduler.next_deadline() {
                Some(deadline) => rx.recv_deadline(deadline),
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(EngineMsg::Native { tag, payload }) => {
                    self.handle_native(&tag, &payload, Instant::now());
                }
                Ok(EngineMsg::Control(request)) => self.handle_request(request, Instant::now()),
                Ok(EngineMsg::Shutdown) => {
                    log::info!("engine: shutdown requested");
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    log::info!("engine: every event sink dropped");
                    break;
                }
            }
        }
        self.shutdown()
    }

    // -----------------------------------------------------------------------
    // Keyboard and mouse configuration
    // -----------------------------------------------------------------------

    /// Replaces keyboard rows and mouse settings from the UI document.
    pub fn apply_user_settings(&mut self, settings: &UserSettings) -> ApplySummary {
        let summary = self
            .remap
            .apply_user_settings(self.native.as_ref(), &settings.keyboard);
        self.mouse.apply(self.native.as_ref(), settings.mouse);
        summary
    }

    pub fn apply_mouse_settings(&mut self, settings: MouseSettings) {
        self.mouse.apply(self.native.as_ref(), settings);
    }

    pub fn set_key_mapping(&mut self, src: VkCode, dst: VkCode) {
        self.remap.set_mapping(self.native.as_ref(), src, dst);
    }

    pub fn remove_key_mapping(&mut self, src: VkCode) {
        self.remap.remove_mapping(self.native.as_ref(), src);
    }

    pub fn clear_key_mappings(&mut self) {
        self.remap.clear_mappings(self.native.as_ref());
    }

    pub fn set_blocked_keys(&mut self, keys: &[VkCode], blocked: bool) {
        self.remap.set_blocked(self.native.as_ref(), keys, blocked);
    }

    pub fn set_intercept_mode(&mut self, mode: InterceptMode) {
        self.remap.set_mode(self.native.as_ref(), mode);
    }

    // -----------------------------------------------------------------------
    // Native commands
    // -----------------------------------------------------------------------

    pub fn start_intercept(&mut self) {
        self.send(Command::InputIntercept { intercept: true });
    }

    pub fn stop_intercept(&mut self) {
        self.send(Command::InputIntercept { intercept: false });
    }

    pub fn set_cursor(&mut self, cursor: &str) {
        self.send(Command::Cursor {
            cursor: cursor.to_string(),
        });
    }

    pub fn set_fps(&mut self, show: bool, position: FpsPosition) {
        self.send(Command::Fps {
            showfps: show,
            position,
        });
    }

    pub fn set_hotkeys(&mut self, hotkeys: Vec<HotkeyInfo>) {
        self.send(Command::HotkeyInfo { hotkeys });
    }

    /// Presses `key_code` in the game: key-down now, key-up after the
    /// configured release delay.
    pub fn send_key(&mut self, key_code: VkCode, modifiers: u32, now: Instant) {
        self.send(Command::KeyboardInject {
            key_code,
            modifiers,
            is_down: true,
        });
        self.scheduler.once(
            now,
            self.release_delay,
            Task::KeyRelease {
                key_code,
                modifiers,
            },
        );
    }

    fn send(&self, command: Command) {
        if let Err(e) = self.native.send_command(&command) {
            log::warn!("engine: {} failed: {e}", command.tag());
        }
    }

    // -----------------------------------------------------------------------
    // Overlay windows and key listeners
    // -----------------------------------------------------------------------

    pub fn add_overlay_window(
        &mut self,
        id: u32,
        details: OverlayWindowDetails,
    ) -> Result<(), PlatformError> {
        self.windows.add(self.native.as_ref(), id, details)
    }

    pub fn close_overlay_window(&mut self, id: u32) -> bool {
        self.windows.close(self.native.as_ref(), id)
    }

    pub fn change_window_size(
        &mut self,
        id: u32,
        width: u32,
        height: u32,
        x: i32,
        y: i32,
    ) -> Option<Rect> {
        self.windows
            .change_size(self.native.as_ref(), id, width, height, x, y)
    }

    pub fn on_key_down(&mut self, listener: KeyListener) {
        self.translator.on_key_down(listener);
    }

    pub fn on_key_up(&mut self, listener: KeyListener) {
        self.translator.on_key_up(listener);
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    pub fn registry(&self) -> &AppRegistry {
        &self.registry
    }

    pub fn remap_state(&self) -> &KeyRemapState {
        self.remap.state()
    }

    pub fn mouse_settings(&self) -> &MouseSettings {
        self.mouse.current()
    }

    pub fn overlay_windows(&self) -> &OverlayWindows {
        &self.windows
    }

    pub fn graphics_size(&self) -> Option<(u32, u32)> {
        self.graphics_size
    }

    pub fn is_injection_enabled(&self) -> bool {
        self.watcher.is_enabled()
    }

    pub fn is_watching_exit(&self, pid: u32) -> bool {
        self.coordinator.is_watching(pid)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
