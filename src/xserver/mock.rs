//! A display-less `XConn` for tests, grounded on penrose's `x::mock::MockXConn`
//! pattern: record every call the window manager makes so tests can assert
//! on it, and let the test drive the event stream it feeds back.

use super::{Atom, KeyCode, WindowAttrs, XConn, XEvent};
use crate::geometry::{Point, Rect};
use crate::registry::Xid;
use crate::{Error, Result};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

/// One call the window manager made against the stub, in the order made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `map_window`
    Map(Xid),
    /// `unmap_window`
    Unmap(Xid),
    /// `raise_window`
    Raise(Xid),
    /// `configure_window`
    Configure(Xid, Rect, u16),
    /// `set_border_color`
    BorderColor(Xid, String),
    /// `set_input_focus`
    Focus(Xid),
    /// `set_wm_state_above`
    SetAbove(Xid),
    /// `send_wm_delete`
    SendDelete(Xid),
    /// `kill_client`
    Kill(Xid),
}

/// A per-window fixture the stub reports back to the window manager when
/// asked about a window it doesn't otherwise track state for.
#[derive(Debug, Clone, Default)]
pub struct WindowFixture {
    /// What `window_attrs` should report.
    pub attrs: WindowAttrs,
    /// What `window_type_is_dock` should report.
    pub is_dock: bool,
    /// What `strut_partial` should report.
    pub strut: Option<[u32; 12]>,
    /// Whether `send_wm_delete` should report the client as
    /// `WM_DELETE_WINDOW`-aware.
    pub supports_delete: bool,
}

/// A stub [`XConn`] with no real display behind it. Tests seed
/// [`StubXConn::push_event`] and [`StubXConn::fixtures`] before driving
/// [`crate::wm::Wm`], then inspect [`StubXConn::calls`] afterward.
pub struct StubXConn {
    root: Xid,
    screen_rect: Rect,
    events: RefCell<VecDeque<XEvent>>,
    calls: RefCell<Vec<Call>>,
    fixtures: RefCell<HashMap<Xid, WindowFixture>>,
    pointer: RefCell<Point>,
    tree: RefCell<Vec<Xid>>,
}

impl StubXConn {
    /// Build a stub for a `screen_rect`-sized screen with no queued events.
    pub fn new(screen_rect: Rect) -> Self {
        Self {
            root: Xid(1),
            screen_rect,
            events: RefCell::new(VecDeque::new()),
            calls: RefCell::new(Vec::new()),
            fixtures: RefCell::new(HashMap::new()),
            pointer: RefCell::new(Point::default()),
            tree: RefCell::new(Vec::new()),
        }
    }

    /// Queue an event for a future `next_event` call to return.
    pub fn push_event(&self, event: XEvent) {
        self.events.borrow_mut().push_back(event);
    }

    /// Install the attribute/dock/strut fixture reported for `window`.
    pub fn set_fixture(&self, window: Xid, fixture: WindowFixture) {
        self.fixtures.borrow_mut().insert(window, fixture);
    }

    /// Seed the windows `query_tree` reports as pre-existing top-level
    /// children of the root (the startup-scan scenario).
    pub fn set_tree(&self, windows: Vec<Xid>) {
        *self.tree.borrow_mut() = windows;
    }

    /// The calls made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn fixture(&self, window: Xid) -> WindowFixture {
        self.fixtures.borrow().get(&window).cloned().unwrap_or_default()
    }
}

impl XConn for StubXConn {
    fn root(&self) -> Xid {
        self.root
    }

    fn screen_rect(&self) -> Rect {
        self.screen_rect
    }

    fn atom(&self, atom: Atom) -> u32 {
        // Deterministic, distinct per variant; good enough for tests that
        // only compare atoms for equality rather than caring about wire
        // values.
        atom as u32 + 100
    }

    fn select_root_events(&self) -> Result<()> {
        Ok(())
    }

    fn select_window_events(&self, _window: Xid) -> Result<()> {
        Ok(())
    }

    fn grab_keys(&self, _codes: &[KeyCode]) -> Result<()> {
        Ok(())
    }

    fn grab_button_combo(&self, _button: u8, _modmask: u16) -> Result<()> {
        Ok(())
    }

    fn keycode_for_keysym(&self, keysym: u32) -> Result<u8> {
        // Deterministic fake mapping: low byte of the keysym. Good enough
        // for tests that only check which binding fired, not real X
        // keyboard semantics.
        Ok((keysym & 0xff) as u8)
    }

    fn grab_pointer_for_drag(&self) -> Result<()> {
        Ok(())
    }

    fn ungrab_pointer(&self) -> Result<()> {
        Ok(())
    }

    fn grab_server(&self) -> Result<()> {
        Ok(())
    }

    fn ungrab_server(&self) -> Result<()> {
        Ok(())
    }

    fn next_event(&self) -> Result<XEvent> {
        self.events
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| Error::ClientNotFound(0))
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn query_pointer(&self) -> Result<Point> {
        Ok(*self.pointer.borrow())
    }

    fn query_tree(&self) -> Result<Vec<Xid>> {
        Ok(self.tree.borrow().clone())
    }

    fn window_attrs(&self, window: Xid) -> Result<WindowAttrs> {
        Ok(self.fixture(window).attrs)
    }

    fn window_type_is_dock(&self, window: Xid) -> Result<bool> {
        Ok(self.fixture(window).is_dock)
    }

    fn strut_partial(&self, window: Xid) -> Result<Option<[u32; 12]>> {
        Ok(self.fixture(window).strut)
    }

    fn map_window(&self, window: Xid) -> Result<()> {
        self.calls.borrow_mut().push(Call::Map(window));
        Ok(())
    }

    fn unmap_window(&self, window: Xid) -> Result<()> {
        self.calls.borrow_mut().push(Call::Unmap(window));
        Ok(())
    }

    fn raise_window(&self, window: Xid) -> Result<()> {
        self.calls.borrow_mut().push(Call::Raise(window));
        Ok(())
    }

    fn configure_window(&self, window: Xid, rect: Rect, border: u16) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(Call::Configure(window, rect, border));
        Ok(())
    }

    fn set_border_color(&self, window: Xid, color_name: &str) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(Call::BorderColor(window, color_name.to_string()));
        Ok(())
    }

    fn set_input_focus(&self, window: Xid) -> Result<()> {
        self.calls.borrow_mut().push(Call::Focus(window));
        Ok(())
    }

    fn set_wm_state_above(&self, window: Xid) -> Result<()> {
        self.calls.borrow_mut().push(Call::SetAbove(window));
        Ok(())
    }

    fn send_wm_delete(&self, window: Xid) -> Result<bool> {
        self.calls.borrow_mut().push(Call::SendDelete(window));
        Ok(self.fixture(window).supports_delete)
    }

    fn kill_client(&self, window: Xid) -> Result<()> {
        self.calls.borrow_mut().push(Call::Kill(window));
        Ok(())
    }
}
