//! Opens coin pages with the platform's URL handler.

use std::{
    io,
    process::{Command, Stdio},
    thread,
};

use cryptodash_core::{Error, Launcher, Result};
use tracing::{debug, warn};

/// Program and leading arguments that open a URL on `os`.
pub fn opener_for(os: &str) -> (&'static str, &'static [&'static str]) {
    match os {
        "macos" => ("open", &[]),
        "windows" => ("cmd", &["/C", "start", ""]),
        _ => ("xdg-open", &[]),
    }
}

/// Start `command` and wait for it on a background thread, so a finished
/// opener never lingers as a zombie. Returns the child's pid.
fn spawn_reaped(command: &mut Command) -> io::Result<u32> {
    let mut child = command.spawn()?;
    let pid = child.id();
    thread::Builder::new()
        .name("opener-reaper".to_string())
        .spawn(move || match child.wait() {
            Ok(status) => debug!(pid, %status, "Opener exited"),
            Err(e) => warn!(pid, error = %e, "Failed to reap opener"),
        })?;
    Ok(pid)
}

/// Spawns the platform opener without blocking the dashboard on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open(&mut self, target: &str) -> Result<()> {
        let (program, args) = opener_for(std::env::consts::OS);
        let path = which::which(program)
            .map_err(|e| Error::launch(target, format!("{program} not found: {e}")))?;

        let pid = spawn_reaped(
            Command::new(path)
                .args(args)
                .arg(target)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null()),
        )
        .map_err(|e| Error::launch(target, format!("failed to run {program}: {e}")))?;

        debug!(pid, program, url = target, "Opened coin page");
        Ok(())
    }
}
