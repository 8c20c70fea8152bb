//! Recording doubles for the native boundary, shared by the unit tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::input::OverlayInput;
use crate::platform::{
    Command, DisplayScale, InjectResult, InputSink, NativeOverlay, OverlayWindowDetails,
    PlatformError, ProcessProbe, Rect, TopWindow,
};

pub(crate) fn window(pid: u32, title: &str) -> TopWindow {
    TopWindow {
        window_id: pid + 1000,
        process_id: pid,
        thread_id: 0,
        title: title.to_string(),
    }
}

pub(crate) fn details(name: &str, native_handle: u32) -> OverlayWindowDetails {
    OverlayWindowDetails {
        name: name.to_string(),
        transparent: true,
        resizable: true,
        max_width: 3840,
        max_height: 2160,
        min_width: 100,
        min_height: 100,
        rect: Rect {
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
        },
        native_handle,
        drag_border_width: 0,
        caption: None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WindowCall {
    Add(u32),
    Close(u32),
    Bounds(u32, Rect),
}

// ---------------------------------------------------------------------------
// Native overlay
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct NativeState {
    windows: Vec<TopWindow>,
    enumerations: usize,
    fail_enumeration: bool,
    inject_succeed: bool,
    fail_inject: bool,
    injected: Vec<u32>,
    commands: Vec<Command>,
    failing_commands: HashSet<String>,
    window_calls: Vec<WindowCall>,
    fail_window_calls: bool,
    starts: usize,
    stops: usize,
}

/// Records every call. Failed calls are not recorded.
#[derive(Debug)]
pub(crate) struct MockNative {
    state: Mutex<NativeState>,
}

impl MockNative {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(NativeState {
                windows: Vec::new(),
                enumerations: 0,
                fail_enumeration: false,
                inject_succeed: true,
                fail_inject: false,
                injected: Vec::new(),
                commands: Vec::new(),
                failing_commands: HashSet::new(),
                window_calls: Vec::new(),
                fail_window_calls: false,
                starts: 0,
                stops: 0,
            }),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut NativeState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub(crate) fn set_windows(&self, windows: Vec<TopWindow>) {
        self.with(|s| s.windows = windows);
    }

    pub(crate) fn fail_enumeration(&self) {
        self.with(|s| s.fail_enumeration = true);
    }

    pub(crate) fn enumerations(&self) -> usize {
        self.with(|s| s.enumerations)
    }

    pub(crate) fn set_inject_succeed(&self, succeed: bool) {
        self.with(|s| s.inject_succeed = succeed);
    }

    pub(crate) fn fail_inject(&self) {
        self.with(|s| s.fail_inject = true);
    }

    pub(crate) fn injected_pids(&self) -> Vec<u32> {
        self.with(|s| s.injected.clone())
    }

    /// Makes every command with this wire tag fail.
    pub(crate) fn fail_command(&self, tag: &str) {
        self.with(|s| {
            s.failing_commands.insert(tag.to_string());
        });
    }

    pub(crate) fn commands(&self) -> Vec<Command> {
        self.with(|s| s.commands.clone())
    }

    pub(crate) fn take_commands(&self) -> Vec<Command> {
        self.with(|s| std::mem::take(&mut s.commands))
    }

    pub(crate) fn fail_window_calls(&self) {
        self.with(|s| s.fail_window_calls = true);
    }

    pub(crate) fn window_calls(&self) -> Vec<WindowCall> {
        self.with(|s| s.window_calls.clone())
    }

    pub(crate) fn starts(&self) -> usize {
        self.with(|s| s.starts)
    }

    pub(crate) fn stops(&self) -> usize {
        self.with(|s| s.stops)
    }

    fn window_call(&self, call: WindowCall) -> Result<(), PlatformError> {
        self.with(|s| {
            if s.fail_window_calls {
                return Err(PlatformError::Native("window call rejected".into()));
            }
            s.window_calls.push(call);
            Ok(())
        })
    }
}

impl NativeOverlay for MockNative {
    fn start(&self) -> Result<(), PlatformError> {
        self.with(|s| s.starts += 1);
        Ok(())
    }

    fn stop(&self) -> Result<(), PlatformError> {
        self.with(|s| s.stops += 1);
        Ok(())
    }

    fn top_windows(&self) -> Result<Vec<TopWindow>, PlatformError> {
        self.with(|s| {
            if s.fail_enumeration {
                return Err(PlatformError::Native("enumeration failed".into()));
            }
            s.enumerations += 1;
            Ok(s.windows.clone())
        })
    }

    fn inject(&self, window: &TopWindow) -> Result<InjectResult, PlatformError> {
        self.with(|s| {
            if s.fail_inject {
                return Err(PlatformError::Native("inject failed".into()));
            }
            s.injected.push(window.process_id);
            Ok(InjectResult {
                inject_succeed: s.inject_succeed,
            })
        })
    }

    fn send_command(&self, command: &Command) -> Result<(), PlatformError> {
        self.with(|s| {
            if s.failing_commands.contains(command.tag()) {
                return Err(PlatformError::Native(format!("{} rejected", command.tag())));
            }
            s.commands.push(command.clone());
            Ok(())
        })
    }

    fn add_window(&self, window_id: u32, _: &OverlayWindowDetails) -> Result<(), PlatformError> {
        self.window_call(WindowCall::Add(window_id))
    }

    fn close_window(&self, window_id: u32) -> Result<(), PlatformError> {
        self.window_call(WindowCall::Close(window_id))
    }

    fn send_window_bounds(&self, window_id: u32, rect: Rect) -> Result<(), PlatformError> {
        self.window_call(WindowCall::Bounds(window_id, rect))
    }
}

/// Lets a test keep a handle on the mock while the engine owns a box of it.
impl NativeOverlay for Arc<MockNative> {
    fn start(&self) -> Result<(), PlatformError> {
        (**self).start()
    }

    fn stop(&self) -> Result<(), PlatformError> {
        (**self).stop()
    }

    fn top_windows(&self) -> Result<Vec<TopWindow>, PlatformError> {
        (**self).top_windows()
    }

    fn inject(&self, window: &TopWindow) -> Result<InjectResult, PlatformError> {
        (**self).inject(window)
    }

    fn send_command(&self, command: &Command) -> Result<(), PlatformError> {
        (**self).send_command(command)
    }

    fn add_window(&self, window_id: u32, details: &OverlayWindowDetails) -> Result<(), PlatformError> {
        (**self).add_window(window_id, details)
    }

    fn close_window(&self, window_id: u32) -> Result<(), PlatformError> {
        (**self).close_window(window_id)
    }

    fn send_window_bounds(&self, window_id: u32, rect: Rect) -> Result<(), PlatformError> {
        (**self).send_window_bounds(window_id, rect)
    }
}

// ---------------------------------------------------------------------------
// Probe, scale, sink
// ---------------------------------------------------------------------------

/// Nothing is running until told otherwise.
#[derive(Debug, Default)]
pub(crate) struct MockProbe {
    running: Mutex<HashSet<u32>>,
}

impl MockProbe {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_running(&self, pid: u32, running: bool) {
        let mut set = self.running.lock().unwrap();
        if running {
            set.insert(pid);
        } else {
            set.remove(&pid);
        }
    }
}

impl ProcessProbe for MockProbe {
    fn is_running(&self, pid: u32) -> bool {
        self.running.lock().unwrap().contains(&pid)
    }
}

impl ProcessProbe for Arc<MockProbe> {
    fn is_running(&self, pid: u32) -> bool {
        (**self).is_running(pid)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FixedScale(pub f64);

impl DisplayScale for FixedScale {
    fn scale_factor(&self, _: u32) -> f64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    inputs: Mutex<Vec<(u32, OverlayInput)>>,
}

impl RecordingSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn inputs(&self) -> Vec<(u32, OverlayInput)> {
        self.inputs.lock().unwrap().clone()
    }
}

impl InputSink for RecordingSink {
    fn dispatch(&self, native_handle: u32, input: OverlayInput) {
        self.inputs.lock().unwrap().push((native_handle, input));
    }
}

impl InputSink for Arc<RecordingSink> {
    fn dispatch(&self, native_handle: u32, input: OverlayInput) {
        (**self).dispatch(native_handle, input);
    }
}
