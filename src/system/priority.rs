//! Process priority hints
//!
//! Requests a lower OS scheduling priority for the current process while the
//! window is in the background. Best effort on every platform.

use crate::system::CapabilityError;

#[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
use std::process::Command;

/// Lower the current process's scheduling priority (best effort)
pub fn lower_process_priority() -> Result<(), CapabilityError> {
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    {
        return lower_priority_unix();
    }

    #[cfg(target_os = "windows")]
    {
        return lower_priority_windows();
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        Err(CapabilityError::Unsupported)
    }
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn lower_priority_unix() -> Result<(), CapabilityError> {
    let pid = std::process::id().to_string();
    let output = Command::new("renice")
        .args(["-n", "10", "-p", &pid])
        .output()
        .map_err(|e| CapabilityError::Failed(e.to_string()))?;

    if output.status.success() {
        tracing::debug!("Lowered process priority (renice +10)");
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(CapabilityError::Failed(stderr))
    }
}

#[cfg(target_os = "windows")]
fn lower_priority_windows() -> Result<(), CapabilityError> {
    let pid = std::process::id().to_string();
    // BelowNormal priority class
    let script = format!(
        "(Get-Process -Id {}).PriorityClass = 'BelowNormal'",
        pid
    );
    let output = Command::new("powershell")
        .args(["-NoProfile", "-Command", &script])
        .output()
        .map_err(|e| CapabilityError::Failed(e.to_string()))?;

    if output.status.success() {
        tracing::debug!("Lowered process priority (BelowNormal)");
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(CapabilityError::Failed(stderr))
    }
}
