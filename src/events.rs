//! The blocking event loop (spec.md 4.7).
//!
//! Grounded on `examples/original_source/wm.c`'s `run_loop` (an unbounded
//! `XNextEvent` loop dispatching on event type) and on penrose's
//! manager-level event loop shape, which keeps the dispatch table itself on
//! the manager struct and leaves the loop as a thin driver. All of the
//! actual per-event-type logic lives on [`crate::wm::Wm`]; this module only
//! drives it and decides what's fatal.

use crate::wm::Wm;
use crate::xserver::XConn;
use crate::Result;
use tracing::{error, info};

/// Run the event loop until `Action::Quit` is handled or the connection to
/// the X server is lost. A single event that fails to process (a request
/// rejected by the server, a transient property-read error) is logged and
/// the loop continues; a connection-level error is propagated and ends the
/// process, mirroring `run_loop`'s treatment of `XNextEvent` itself
/// failing versus a single handler call failing.
pub fn run<C: XConn>(wm: &mut Wm<C>) -> Result<()> {
    info!("entering event loop");
    loop {
        match wm.tick() {
            Ok(true) => continue,
            Ok(false) => {
                info!("quit requested, exiting event loop");
                return Ok(());
            }
            Err(e) => {
                error!(error = %e, "fatal error in event loop");
                return Err(e);
            }
        }
    }
}
