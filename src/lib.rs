//! A reparenting-free, single-process X11 window manager: library crate
//! backing the `vela-wm` binary.
//!
//! Module map mirrors the spec's own breakdown (spec.md 3-4): `registry`
//! is the client arena, `workspace`/`tiling`/`navigate` are the pure
//! layout/navigation logic, `dock` handles EWMH strut accounting, `focus`
//! and `colors` drive border/focus bookkeeping, `xserver` is the seam to
//! the display (real in `xserver::x11rb`, fake in `xserver::mock`), and
//! `wm` ties all of it together behind the dispatcher in `events`.

pub mod bindings;
pub mod colors;
pub mod config;
pub mod dock;
pub mod error;
pub mod events;
pub mod focus;
pub mod geometry;
pub mod navigate;
pub mod process;
pub mod registry;
pub mod sidecar;
pub mod tiling;
pub mod wm;
pub mod workspace;
pub mod xserver;

pub use error::{Error, Result};
