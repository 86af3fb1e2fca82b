//! Process spawning and reaping (spec.md, supplemented features).
//!
//! Grounded on `examples/original_source/wm.c`'s `spawn_program` and
//! `run_autolaunch` (fork, `setsid`, `execvp`, with the child detached from
//! the window manager's own process group) and on penrose's `util::spawn`
//! for the `std::process::Command` plumbing around it — `Command::spawn`
//! already forks and execs on Unix, so the only gap to close by hand is the
//! `setsid` call, done via a `pre_exec` hook.
//!
//! The original never reaps the children it spawns; this window manager
//! installs an explicit non-blocking `SIGCHLD` handler instead of leaving
//! zombies to accumulate for the life of the process.

use crate::config;
use crate::{Error, Result};
use nix::sys::signal::{self, SigHandler, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag};
use nix::unistd::Pid;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};
use tracing::{info, warn};

/// Spawn `cmd` (whitespace-split into a program and its arguments) detached
/// into its own session, with stdout/stderr discarded.
pub fn spawn(cmd: &str) -> Result<()> {
    let mut parts = cmd.split_whitespace();
    let program = parts.next().ok_or_else(|| Error::SpawnFailed {
        cmd: cmd.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
    })?;
    spawn_with_args(program, &parts.collect::<Vec<_>>())
}

/// Spawn `program` with `args`, detached into its own session.
pub fn spawn_with_args(program: &str, args: &[&str]) -> Result<()> {
    info!(program, ?args, "spawning");
    let result = unsafe {
        Command::new(program)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .pre_exec(|| {
                nix::unistd::setsid().ok();
                Ok(())
            })
            .spawn()
    };

    match result {
        Ok(_) => Ok(()),
        Err(source) => Err(Error::SpawnFailed {
            cmd: program.to_string(),
            source,
        }),
    }
}

/// Run `$HOME/<config::AUTOLAUNCH_SCRIPT>` once at startup if it exists and
/// is executable. Silently does nothing if `$HOME` is unset or the script
/// is absent, mirroring `run_autolaunch`'s `access(path, X_OK)` check.
pub fn run_autolaunch() {
    let Some(home) = std::env::var_os("HOME") else {
        return;
    };
    let path = std::path::Path::new(&home).join(config::AUTOLAUNCH_SCRIPT);
    if !is_executable(&path) {
        return;
    }
    if let Err(e) = spawn_with_args(&path.to_string_lossy(), &[]) {
        warn!(error = %e, "autolaunch script failed to start");
    }
}

#[cfg(unix)]
fn is_executable(path: &std::path::Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Install a `SIGCHLD` handler that reaps every exited child immediately,
/// non-blocking, so spawned programs never accumulate as zombies.
pub fn install_sigchld_reaper() -> Result<()> {
    unsafe {
        signal::signal(Signal::SIGCHLD, SigHandler::Handler(reap_all))
            .map_err(|e| Error::SpawnFailed {
                cmd: "<sigaction SIGCHLD>".to_string(),
                source: std::io::Error::from(e),
            })?;
    }
    Ok(())
}

extern "C" fn reap_all(_signum: i32) {
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(status) if status.pid().is_some() => continue,
            _ => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawning_an_empty_command_fails_cleanly() {
        assert!(spawn("").is_err());
    }

    #[test]
    fn spawns_a_real_short_lived_process() {
        spawn_with_args("true", &[]).unwrap();
    }
}
