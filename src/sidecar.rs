//! Status sidecar files under `$HOME/.wm/`, written for external status
//! bars to poll (spec.md, supplemented features).
//!
//! Grounded directly on `examples/original_source/wm.c`'s
//! `ensure_wm_dir`/`write_focused_workspace_file`/
//! `write_occupied_workspace_file`: workspace tags are written 1-based,
//! each file is truncated and rewritten on every call, and a missing
//! `$HOME` silently disables the whole feature rather than erroring.

use crate::config::STATUS_DIR;
use crate::registry::Registry;
use std::io::Write;
use std::path::PathBuf;
use tracing::warn;

fn status_dir() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(STATUS_DIR))
}

fn ensure_status_dir() -> Option<PathBuf> {
    let dir = status_dir()?;
    if !dir.exists() {
        if let Err(e) = std::fs::create_dir(&dir) {
            warn!(error = %e, ?dir, "could not create status directory");
            return None;
        }
    }
    Some(dir)
}

fn write_file(dir: &std::path::Path, name: &str, contents: &str) {
    let path = dir.join(name);
    match std::fs::File::create(&path).and_then(|mut f| f.write_all(contents.as_bytes())) {
        Ok(()) => {}
        Err(e) => warn!(error = %e, ?path, "failed to write status file"),
    }
}

/// Rewrite `focused.workspace` with the 1-based tag of `workspace`.
pub fn write_focused_workspace(workspace: usize) {
    let Some(dir) = ensure_status_dir() else {
        return;
    };
    write_file(&dir, "focused.workspace", &format!("{}\n", workspace + 1));
}

/// Rewrite `occupied.workspace` with the comma-separated, 1-based, sorted,
/// deduplicated list of tags that have at least one managed client.
pub fn write_occupied_workspaces(registry: &Registry, workspace_count: usize) {
    let Some(dir) = ensure_status_dir() else {
        return;
    };

    let mut occupied: Vec<usize> = (0..workspace_count)
        .filter(|&tag| {
            registry
                .iter()
                .any(|id| registry.get(id).workspace == tag as i8)
        })
        .collect();
    occupied.sort_unstable();

    let body = occupied
        .iter()
        .map(|tag| (tag + 1).to_string())
        .collect::<Vec<_>>()
        .join(",");
    write_file(&dir, "occupied.workspace", &format!("{body}\n"));
}
