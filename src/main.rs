//! vela-wm :: a reparenting-free, single-process X11 window manager
//!
//! There is no runtime configuration: rebuild after editing `config.rs` or
//! `bindings.rs` to change gaps, colors, or key bindings (spec.md 6, Open
//! Question (c)).
//!
//! Logging is controlled by `RUST_LOG` (`tracing-subscriber`'s
//! `EnvFilter`), defaulting to `info` when unset.

use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;
use vela_wm::xserver::x11rb::X11rbConn;
use vela_wm::{events, process, wm::Wm};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = process::install_sigchld_reaper() {
        error!(error = %e, "failed to install SIGCHLD reaper");
        return ExitCode::FAILURE;
    }

    let conn = match X11rbConn::connect() {
        Ok(conn) => conn,
        Err(e) => {
            error!(error = %e, "failed to connect to X server");
            return ExitCode::FAILURE;
        }
    };

    let mut wm = match Wm::new(conn) {
        Ok(wm) => wm,
        Err(e) => {
            error!(error = %e, "failed to initialize window manager");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = wm.scan_existing() {
        error!(error = %e, "failed to scan pre-existing windows");
        return ExitCode::FAILURE;
    }

    wm.autolaunch();

    match events::run(&mut wm) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "window manager exited with an error");
            ExitCode::FAILURE
        }
    }
}
