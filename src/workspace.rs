//! Per-workspace mode/layout state (spec.md 3 "Workspace state", 4.6).

use strum_macros::{AsRefStr, EnumIter};

/// Whether a workspace's clients are floating (user-positioned) or tiled
/// (layout-engine-positioned).
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum Mode {
    /// The layout engine is inactive; clients keep whatever geometry they
    /// were given (manage-time placement or interactive drag/resize).
    Floating,
    /// The layout engine recomputes every client's geometry on any
    /// membership-changing event.
    Tiling,
}

impl Mode {
    /// Flip floating <-> tiling.
    pub fn toggled(self) -> Self {
        match self {
            Mode::Floating => Mode::Tiling,
            Mode::Tiling => Mode::Floating,
        }
    }
}

/// Which tiling algorithm a workspace uses while in [`Mode::Tiling`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, AsRefStr)]
pub enum Layout {
    /// One fixed-fraction master column plus a vertical stack.
    Master,
    /// Recursive spiral, alternating split orientation at each depth.
    Dwindle,
}

/// Mode and layout for a single workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkspaceState {
    /// Floating or tiling.
    pub mode: Mode,
    /// Master/stack or dwindle, consulted only while tiling.
    pub layout: Layout,
}

impl Default for WorkspaceState {
    fn default() -> Self {
        Self {
            mode: crate::config::DEFAULT_MODE,
            layout: crate::config::DEFAULT_LAYOUT,
        }
    }
}

/// The fixed-size array of per-workspace state, indexed `0..WORKSPACE_COUNT`.
#[derive(Debug, Clone)]
pub struct Workspaces {
    tags: [WorkspaceState; crate::config::WORKSPACE_COUNT],
}

impl Default for Workspaces {
    fn default() -> Self {
        Self {
            tags: [WorkspaceState::default(); crate::config::WORKSPACE_COUNT],
        }
    }
}

impl Workspaces {
    /// State for `tag`. Panics on an out-of-range tag; callers only ever
    /// pass tags already validated against [`crate::config::WORKSPACE_COUNT`].
    pub fn get(&self, tag: usize) -> WorkspaceState {
        self.tags[tag]
    }

    /// Mutably borrow the state for `tag`.
    pub fn get_mut(&mut self, tag: usize) -> &mut WorkspaceState {
        &mut self.tags[tag]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_workspaces_use_config_defaults() {
        let ws = Workspaces::default();
        for tag in 0..crate::config::WORKSPACE_COUNT {
            assert_eq!(ws.get(tag).mode, crate::config::DEFAULT_MODE);
            assert_eq!(ws.get(tag).layout, crate::config::DEFAULT_LAYOUT);
        }
    }

    #[test]
    fn mode_toggled_is_involution() {
        assert_eq!(Mode::Floating.toggled(), Mode::Tiling);
        assert_eq!(Mode::Tiling.toggled().toggled(), Mode::Tiling);
    }
}
