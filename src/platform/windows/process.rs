//! Process liveness via the Win32 process API.
//!
//! A process that exists but denies `PROCESS_QUERY_LIMITED_INFORMATION`
//! (anti-cheat protected games do this) is reported as running; only a failed
//! open for any other reason, or an exit code other than `STILL_ACTIVE`, counts
//! as gone.

use windows_sys::Win32::Foundation::{CloseHandle, GetLastError, ERROR_ACCESS_DENIED, STILL_ACTIVE};
use windows_sys::Win32::System::Threading::{
    GetExitCodeProcess, OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION,
};

use crate::platform::ProcessProbe;

pub struct WindowsProcessProbe;

impl WindowsProcessProbe {
    pub fn new() -> Self {
        WindowsProcessProbe
    }
}

impl ProcessProbe for WindowsProcessProbe {
    fn is_running(&self, pid: u32) -> bool {
        if pid == 0 {
            return false;
        }

        // SAFETY: plain Win32 calls; the handle is closed in this scope.
        unsafe {
            let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, 0, pid);
            if handle.is_null() {
                let err = GetLastError();
                log::debug!("probe: OpenProcess({pid}) failed with {err}");
                return err == ERROR_ACCESS_DENIED;
            }

            let mut exit_code: u32 = 0;
            let ok = GetExitCodeProcess(handle, &mut exit_code);
            CloseHandle(handle);

            // If the exit code cannot be read, assume alive; the next poll retries.
            ok == 0 || exit_code == STILL_ACTIVE as u32
        }
    }
}
