//! Crate-wide error type and result alias.

use thiserror::Error;

/// Everything that can go wrong while running the window manager.
///
/// Per the error handling design: fatal startup errors abort the process,
/// everything else is logged by the caller and the event loop continues.
#[derive(Debug, Error)]
pub enum Error {
    /// Unable to open the X display (fatal at startup).
    #[error("unable to open X display")]
    CannotOpenDisplay,

    /// Another window manager already holds SubstructureRedirect on the
    /// root window (fatal at startup).
    #[error("another window manager is already running")]
    OtherWmRunning,

    /// A request to the X server failed.
    #[error("X11 connection error: {0}")]
    Connection(#[from] x11rb::errors::ConnectionError),

    /// A reply to a request could not be parsed or the request itself was
    /// rejected by the server.
    #[error("X11 reply error: {0}")]
    ReplyOrId(#[from] x11rb::errors::ReplyOrIdError),

    /// A property reply failed to parse.
    #[error("X11 reply error: {0}")]
    Reply(#[from] x11rb::errors::ReplyError),

    /// An atom name failed to intern or resolve.
    #[error("unknown atom: {0}")]
    UnknownAtom(String),

    /// A configured key binding's keysym has no keycode in the current
    /// keyboard mapping.
    #[error("no keycode for keysym {0:#x}")]
    NoSuchKeysym(u32),

    /// A client window is not present in the registry.
    #[error("no managed client for window {0}")]
    ClientNotFound(u32),

    /// Spawning a child process failed.
    #[error("failed to spawn {cmd}: {source}")]
    SpawnFailed {
        /// The command that was attempted.
        cmd: String,
        /// The underlying OS error.
        source: std::io::Error,
    },

    /// Failure writing a sidecar status file.
    #[error("sidecar I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
