//! Compile-time configuration.
//!
//! All tunables live here as constants. There is no runtime config file and
//! no CLI: rebuild to change a binding, a color, or a gap (spec.md 6, Open
//! Question (c)).

use crate::workspace::{Layout, Mode};

/// Number of virtual workspaces (tags). Fixed at compile time.
pub const WORKSPACE_COUNT: usize = 9;

/// Border width, in pixels, for the focused client.
pub const BORDER_PX_FOCUSED: u16 = 2;

/// Border width, in pixels, for an unfocused client.
pub const BORDER_PX_UNFOCUSED: u16 = 1;

/// Named X color for the focused border.
pub const BORDER_COLOR_FOCUSED: &str = "dodgerblue";

/// Named X color for unfocused borders.
pub const BORDER_COLOR_UNFOCUSED: &str = "black";

/// Border width reserved by the tiler's gap math: the widest a border ever
/// gets, so a client's cell never visually overflows when it gains focus.
pub fn max_border_px() -> u32 {
    BORDER_PX_FOCUSED.max(BORDER_PX_UNFOCUSED) as u32
}

/// The main modifier mask accepted for bindings. Alt (Mod1) is always
/// accepted in addition to this one (spec.md 4.8).
pub fn main_modifier() -> u16 {
    u16::from(x11rb::protocol::xproto::ModMask::M4)
}

/// Default mode newly-created workspaces start in.
pub const DEFAULT_MODE: Mode = Mode::Floating;

/// Default layout newly-created workspaces start in when tiling.
pub const DEFAULT_LAYOUT: Layout = Layout::Dwindle;

/// Master column width as a percentage of the available width.
pub const MASTER_FACTOR_PERCENT: u32 = 60;

/// Outer gap, in pixels, between the screen edge and the outermost windows.
pub const GAP_OUTER: u32 = 24;

/// Inner gap, in pixels, between adjacent tiled windows.
pub const GAP_INNER: u32 = 8;

/// Minimum width any placed window is ever given.
pub const MIN_WINDOW_W: u32 = 100;

/// Minimum height any placed window is ever given.
pub const MIN_WINDOW_H: u32 = 60;

/// Program spawned on `Return`.
pub const TERMINAL: &str = "xterm";

/// Program spawned on `D`.
pub const LAUNCHER: &str = "dmenu_run";

/// Sidecar status directory, relative to `$HOME`.
pub const STATUS_DIR: &str = ".wm";

/// Autolaunch script, relative to `$HOME`.
pub const AUTOLAUNCH_SCRIPT: &str = ".local/bin/autolaunch.sh";
