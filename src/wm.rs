//! The window manager context: every piece of mutable state in one place,
//! plus the orchestration methods the event dispatcher calls.
//!
//! Grounded on `examples/original_source/wm.c`'s `manage`/`unmanage`/
//! `switch_workspace`/`move_focused_to_workspace`/`toggle_fullscreen`, and
//! on the Design Notes' choice (spec.md §9) to keep the client registry as
//! a flat arena rather than a tree of owned windows — `Wm` itself is the
//! single owner everything else borrows from for the length of one event.

use crate::bindings::{Action, Bindings, CycleDirection};
use crate::colors;
use crate::config;
use crate::dock;
use crate::focus::{self, CycleState};
use crate::geometry::{clamp_floating_dim, Rect};
use crate::navigate::{self, Direction};
use crate::process;
use crate::registry::{ClientId, Registry, Xid, DOCK_WORKSPACE};
use crate::sidecar;
use crate::tiling;
use crate::workspace::{Layout, Mode, Workspaces};
use crate::xserver::{Atom, XConn, XEvent};
use crate::{config as cfg, Result};
use tracing::{info, warn};

/// What an in-progress interactive drag is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragMode {
    Move,
    Resize,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    client: ClientId,
    mode: DragMode,
    start_root: crate::geometry::Point,
    start_rect: Rect,
}

/// Everything the window manager knows, generic over the `XConn`
/// implementation so the same orchestration logic drives a real display in
/// production and [`crate::xserver::mock::StubXConn`] in tests.
pub struct Wm<C: XConn> {
    conn: C,
    registry: Registry,
    workspaces: Workspaces,
    reserved: dock::Margins,
    focused: Option<ClientId>,
    current_workspace: i8,
    cycle: CycleState,
    bindings: Bindings,
    drag: Option<Drag>,
}

impl<C: XConn> Wm<C> {
    /// Build a window manager over an already-connected `conn`: resolve and
    /// grab the key bindings, grab the move/resize mouse combos, and leave
    /// the registry empty for the caller to populate with `scan_existing`.
    pub fn new(conn: C) -> Result<Self> {
        let bindings = Bindings::resolve(&conn)?;
        bindings.grab(&conn)?;
        conn.grab_button_combo(1, config::main_modifier())?; // Button1: move
        conn.grab_button_combo(3, config::main_modifier())?; // Button3: resize

        Ok(Self {
            conn,
            registry: Registry::new(),
            workspaces: Workspaces::default(),
            reserved: dock::Margins::default(),
            focused: None,
            current_workspace: 0,
            cycle: CycleState::default(),
            bindings,
            drag: None,
        })
    }

    /// Manage every pre-existing top-level window (startup scan).
    pub fn scan_existing(&mut self) -> Result<()> {
        for window in self.conn.query_tree()? {
            if let Err(e) = self.manage(window) {
                warn!(?window, error = %e, "failed to manage pre-existing window");
            }
        }
        Ok(())
    }

    /// Run `config::AUTOLAUNCH_SCRIPT` once, if present.
    pub fn autolaunch(&self) {
        process::run_autolaunch();
    }

    /// Block for and dispatch the next event. Returns `Ok(false)` once
    /// `Action::Quit` has been handled, signalling the caller to exit. A
    /// failure to read the next event (e.g. the connection dropped) is
    /// fatal and propagated; a failure handling one event is logged and
    /// the loop continues, so a single misbehaving client can't take down
    /// the whole window manager.
    pub fn tick(&mut self) -> Result<bool> {
        let event = self.conn.next_event()?;
        match self.dispatch(event) {
            Ok(cont) => Ok(cont),
            Err(e) => {
                warn!(error = %e, "event handler failed, continuing");
                Ok(true)
            }
        }
    }

    fn dispatch(&mut self, event: XEvent) -> Result<bool> {
        match event {
            XEvent::MapRequest(window) => self.manage(window)?,
            XEvent::DestroyNotify(window) => self.unmanage(window)?,
            XEvent::UnmapNotify(_) => {}
            XEvent::ConfigureRequest { window, rect } => self.on_configure_request(window, rect)?,
            XEvent::EnterNotify { window } => self.on_enter(window)?,
            XEvent::ButtonPress {
                window,
                detail,
                state,
                root,
            } => self.on_button_press(window, detail, state, root)?,
            XEvent::MotionNotify { root } => self.on_motion(root)?,
            XEvent::ButtonRelease => self.end_drag()?,
            XEvent::KeyPress(code) => {
                if let Some(action) = self.bindings.action_for(code) {
                    return self.run_action(action);
                }
            }
            XEvent::KeyRelease(_) => self.cycle.stop(),
            XEvent::ClientMessage { .. } => {}
            XEvent::PropertyNotify { window, atom } => self.on_property_notify(window, atom)?,
        }
        Ok(true)
    }

    fn run_action(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::SpawnTerminal => {
                if let Err(e) = process::spawn(config::TERMINAL) {
                    warn!(error = %e, "failed to spawn terminal");
                }
            }
            Action::SpawnLauncher => {
                if let Err(e) = process::spawn(config::LAUNCHER) {
                    warn!(error = %e, "failed to spawn launcher");
                }
            }
            Action::CloseFocused => self.close_focused()?,
            Action::ToggleMode => self.toggle_mode()?,
            Action::ToggleModeAllWorkspaces => self.toggle_mode_all_workspaces()?,
            Action::ToggleFullscreen => self.toggle_fullscreen()?,
            Action::SwitchWorkspace(tag) => self.switch_workspace(tag)?,
            Action::MoveFocusedToWorkspace(tag) => self.move_focused_to_workspace(tag)?,
            Action::FocusDirection(dir) => self.focus_direction(dir)?,
            Action::SwapDirection(dir) => self.swap_keep_focus(dir)?,
            Action::CycleNext(direction) => self.cycle_next(direction)?,
            Action::Quit => return Ok(false),
        }
        Ok(true)
    }

    // ---- manage / unmanage ----------------------------------------------

    /// Classify and take over a newly mapped (or pre-existing) window.
    pub fn manage(&mut self, window: Xid) -> Result<()> {
        if window == self.conn.root() {
            return Ok(());
        }
        let attrs = self.conn.window_attrs(window)?;
        if attrs.override_redirect {
            return Ok(());
        }
        if self.registry.find(window).is_some() {
            return Ok(());
        }

        let window_type_dock = self.conn.window_type_is_dock(window)?;
        let strut = self
            .conn
            .strut_partial(window)?
            .map(|c| dock::StrutInfo::from_cardinals(&c))
            .unwrap_or_default();
        let is_dock = window_type_dock || strut.implies_dock();

        self.conn.select_window_events(window)?;

        if is_dock {
            self.manage_dock(window, strut)
        } else {
            self.manage_client(window, attrs)
        }
    }

    fn manage_dock(&mut self, window: Xid, strut: dock::StrutInfo) -> Result<()> {
        let id = self.registry.insert(window, DOCK_WORKSPACE);
        {
            let client = self.registry.get_mut(id);
            client.is_dock = true;
            client.strut = Some(strut);
        }

        self.recompute_reserved();
        let rect = dock::dock_rect(&strut, self.conn.screen_rect(), self.reserved);
        self.registry.get_mut(id).rect = rect;

        self.conn.configure_window(window, rect, 0)?;
        self.conn.map_window(window)?;
        self.conn.set_wm_state_above(window)?;

        self.retile_all_tiling_workspaces()?;
        Ok(())
    }

    fn manage_client(&mut self, window: Xid, attrs: crate::xserver::WindowAttrs) -> Result<()> {
        let screen = self.conn.screen_rect();
        let w = clamp_floating_dim(attrs.w.max(1), config::MIN_WINDOW_W, screen.w);
        let h = clamp_floating_dim(attrs.h.max(1), config::MIN_WINDOW_H, screen.h);
        let x = screen.x + screen.w.saturating_sub(w) / 2;
        let y = screen.y + screen.h.saturating_sub(h) / 2;

        let id = self.registry.insert(window, self.current_workspace);
        self.registry.get_mut(id).rect = Rect::new(x, y, w, h);

        if self.current_mode() == Mode::Tiling {
            self.retile(self.current_workspace)?;
        }
        if self.registry.get(id).workspace == self.current_workspace {
            self.conn.map_window(window)?;
        }

        self.focused = Some(id);
        focus::raise_and_focus(&self.conn, &self.registry, self.current_workspace, id)?;
        focus::apply_borders(&self.conn, &self.registry, self.current_workspace, self.focused)?;
        self.write_sidecar();
        Ok(())
    }

    /// Stop managing `window` (it was destroyed or withdrawn).
    pub fn unmanage(&mut self, window: Xid) -> Result<()> {
        let Some(id) = self.registry.find(window) else {
            return Ok(());
        };
        let was_dock = self.registry.get(id).is_dock;
        self.registry.remove(id);

        if was_dock {
            self.recompute_reserved();
            self.retile_all_tiling_workspaces()?;
            self.write_sidecar();
            return Ok(());
        }

        if self.focused == Some(id) {
            self.focused = focus::fallback_focus(&self.registry, self.current_workspace);
            if let Some(next) = self.focused {
                focus::raise_and_focus(&self.conn, &self.registry, self.current_workspace, next)?;
            }
        }
        if self.current_mode() == Mode::Tiling {
            self.retile(self.current_workspace)?;
        }
        focus::apply_borders(&self.conn, &self.registry, self.current_workspace, self.focused)?;
        self.write_sidecar();
        Ok(())
    }

    fn recompute_reserved(&mut self) {
        let struts = self
            .registry
            .iter()
            .filter_map(|id| self.registry.get(id).strut.as_ref());
        self.reserved = dock::compute_margins(struts);
    }

    // ---- workspaces -------------------------------------------------------

    /// Switch the visible workspace.
    pub fn switch_workspace(&mut self, tag: usize) -> Result<()> {
        let tag = tag as i8;
        if tag == self.current_workspace || tag as usize >= config::WORKSPACE_COUNT {
            return Ok(());
        }
        self.current_workspace = tag;

        for id in self.registry.iter().collect::<Vec<_>>() {
            let client = self.registry.get(id);
            if client.is_dock {
                continue;
            }
            if client.workspace == tag {
                self.conn.map_window(client.window)?;
            } else {
                self.conn.unmap_window(client.window)?;
            }
        }

        self.focused = focus::fallback_focus(&self.registry, tag);
        if let Some(id) = self.focused {
            focus::raise_and_focus(&self.conn, &self.registry, tag, id)?;
        }
        if self.current_mode() == Mode::Tiling {
            self.retile(tag)?;
        }
        focus::apply_borders(&self.conn, &self.registry, tag, self.focused)?;
        self.write_sidecar();
        Ok(())
    }

    /// Move the focused client to workspace `tag` and follow it there.
    pub fn move_focused_to_workspace(&mut self, tag: usize) -> Result<()> {
        let Some(id) = self.focused else { return Ok(()) };
        let tag = tag as i8;
        if tag as usize >= config::WORKSPACE_COUNT || tag == self.registry.get(id).workspace {
            return Ok(());
        }

        let old_tag = self.registry.get(id).workspace;
        self.registry.get_mut(id).workspace = tag;

        if tag != self.current_workspace {
            self.conn.unmap_window(self.registry.get(id).window)?;
            self.focused = focus::fallback_focus(&self.registry, self.current_workspace);
            if let Some(next) = self.focused {
                focus::raise_and_focus(&self.conn, &self.registry, self.current_workspace, next)?;
            }
        }

        if self.workspaces.get(old_tag as usize).mode == Mode::Tiling {
            self.retile(old_tag)?;
        }
        if self.workspaces.get(tag as usize).mode == Mode::Tiling {
            self.retile(tag)?;
        }
        focus::apply_borders(&self.conn, &self.registry, self.current_workspace, self.focused)?;
        self.write_sidecar();
        Ok(())
    }

    fn current_mode(&self) -> Mode {
        self.workspaces.get(self.current_workspace as usize).mode
    }

    /// Flip the current workspace between floating and tiling.
    pub fn toggle_mode(&mut self) -> Result<()> {
        let tag = self.current_workspace as usize;
        let new_mode = self.workspaces.get(tag).mode.toggled();
        self.workspaces.get_mut(tag).mode = new_mode;
        if new_mode == Mode::Tiling {
            self.retile(self.current_workspace)?;
        }
        focus::apply_borders(&self.conn, &self.registry, self.current_workspace, self.focused)
    }

    /// Flip every workspace's mode between floating and tiling
    /// (`Shift+T`, spec.md 4.8 "toggle workspace mode (Shift: all
    /// workspaces)").
    pub fn toggle_mode_all_workspaces(&mut self) -> Result<()> {
        for tag in 0..cfg::WORKSPACE_COUNT {
            let new_mode = self.workspaces.get(tag).mode.toggled();
            self.workspaces.get_mut(tag).mode = new_mode;
        }
        self.retile_all_tiling_workspaces()?;
        focus::apply_borders(&self.conn, &self.registry, self.current_workspace, self.focused)
    }

    /// Set the current workspace's tiling layout directly. Layout is a
    /// compile-time tunable (spec.md 1 Non-goals, §4.8 "maximum workspaces"
    /// list) with no bound key or runtime action; this exists so tests can
    /// exercise a layout other than [`crate::config::DEFAULT_LAYOUT`]
    /// without a live X display.
    #[doc(hidden)]
    pub fn set_layout_for_testing(&mut self, layout: Layout) -> Result<()> {
        let tag = self.current_workspace as usize;
        self.workspaces.get_mut(tag).layout = layout;
        if self.current_mode() == Mode::Tiling {
            self.retile(self.current_workspace)?;
        }
        Ok(())
    }

    fn retile(&mut self, tag: i8) -> Result<()> {
        if self.workspaces.get(tag as usize).mode != Mode::Tiling {
            return Ok(());
        }
        let layout = self.workspaces.get(tag as usize).layout;
        let clients = self.registry.collect(tag);
        let avail = tiling::available_rect(self.conn.screen_rect(), config::max_border_px(), self.reserved);
        let placed = tiling::tile(layout, &clients, avail, config::max_border_px());
        for (id, rect) in placed {
            self.registry.get_mut(id).rect = rect;
        }
        focus::apply_borders(&self.conn, &self.registry, self.current_workspace, self.focused)
    }

    fn retile_all_tiling_workspaces(&mut self) -> Result<()> {
        for tag in 0..cfg::WORKSPACE_COUNT as i8 {
            self.retile(tag)?;
        }
        Ok(())
    }

    // ---- focus / navigation ------------------------------------------------

    fn workspace_candidates(&self, exclude: Option<ClientId>) -> Vec<(ClientId, Rect)> {
        self.registry
            .collect(self.current_workspace)
            .into_iter()
            .filter(|&id| Some(id) != exclude)
            .map(|id| (id, self.registry.get(id).rect))
            .collect()
    }

    /// Move focus to the neighbor of the focused client in `direction`.
    pub fn focus_direction(&mut self, direction: Direction) -> Result<()> {
        let target = match self.focused {
            Some(id) => {
                let current_rect = self.registry.get(id).rect;
                let candidates = self.workspace_candidates(Some(id));
                navigate::best_neighbor(current_rect, &candidates, direction)
            }
            None => navigate::extremum(&self.workspace_candidates(None), direction),
        };
        let Some(target) = target else { return Ok(()) };
        self.focused = Some(target);
        focus::raise_and_focus(&self.conn, &self.registry, self.current_workspace, target)?;
        focus::apply_borders(&self.conn, &self.registry, self.current_workspace, self.focused)?;
        self.write_sidecar();
        Ok(())
    }

    /// Swap the focused client with its neighbor in `direction`, keeping
    /// focus on the same client.
    pub fn swap_keep_focus(&mut self, direction: Direction) -> Result<()> {
        let Some(id) = self.focused else { return Ok(()) };
        let current_rect = self.registry.get(id).rect;
        let candidates = self.workspace_candidates(Some(id));
        let Some(other) = navigate::best_neighbor(current_rect, &candidates, direction) else {
            return Ok(());
        };

        self.conn.grab_server()?;
        self.registry.swap(id, other);
        if self.current_mode() == Mode::Tiling {
            self.retile(self.current_workspace)?;
        } else {
            let other_rect = self.registry.get(other).rect;
            self.registry.get_mut(id).rect = other_rect;
            self.registry.get_mut(other).rect = current_rect;
            focus::apply_borders(&self.conn, &self.registry, self.current_workspace, self.focused)?;
        }
        self.conn.ungrab_server()?;
        Ok(())
    }

    /// Advance the Alt-Tab cycle by one step in `direction`, starting a new
    /// cycle if one isn't already active.
    pub fn cycle_next(&mut self, direction: CycleDirection) -> Result<()> {
        if !self.cycle.is_active() {
            self.cycle.start(self.focused);
        }
        let Some(next) =
            CycleState::advance(&self.registry, self.current_workspace, self.focused, direction)
        else {
            return Ok(());
        };
        self.focused = Some(next);
        focus::raise_and_focus(&self.conn, &self.registry, self.current_workspace, next)?;
        focus::apply_borders(&self.conn, &self.registry, self.current_workspace, self.focused)?;
        self.write_sidecar();
        Ok(())
    }

    fn on_enter(&mut self, window: Xid) -> Result<()> {
        let Some(id) = self.registry.find(window) else {
            return Ok(());
        };
        if self.registry.get(id).workspace != self.current_workspace || Some(id) == self.focused {
            return Ok(());
        }
        self.focused = Some(id);
        focus::raise_and_focus(&self.conn, &self.registry, self.current_workspace, id)?;
        focus::apply_borders(&self.conn, &self.registry, self.current_workspace, self.focused)?;
        self.write_sidecar();
        Ok(())
    }

    // ---- fullscreen ---------------------------------------------------------

    /// Toggle the focused client's fullscreen geometry override.
    pub fn toggle_fullscreen(&mut self) -> Result<()> {
        let Some(id) = self.focused else { return Ok(()) };
        let client = self.registry.get_mut(id);
        if let Some(prev) = client.pre_fullscreen_rect.take() {
            client.rect = prev;
        } else {
            client.pre_fullscreen_rect = Some(client.rect);
            client.rect = self.conn.screen_rect();
        }
        focus::apply_borders(&self.conn, &self.registry, self.current_workspace, self.focused)
    }

    // ---- close --------------------------------------------------------------

    /// Ask the focused client to close, falling back to `XKillClient` if it
    /// doesn't advertise `WM_DELETE_WINDOW` support.
    pub fn close_focused(&mut self) -> Result<()> {
        let Some(id) = self.focused else { return Ok(()) };
        let window = self.registry.get(id).window;
        if !self.conn.send_wm_delete(window)? {
            info!(?window, "client has no WM_DELETE_WINDOW support, killing");
            self.conn.kill_client(window)?;
        }
        Ok(())
    }

    // ---- configure requests / property updates ------------------------------

    fn on_configure_request(&mut self, window: Xid, requested: Rect) -> Result<()> {
        let Some(id) = self.registry.find(window) else {
            // Not a managed window yet (or a dock): honor the request
            // verbatim so clients can size themselves before we classify
            // them on MapRequest.
            self.conn.configure_window(window, requested, 0)?;
            return Ok(());
        };
        let client = self.registry.get(id);
        if client.is_dock || self.workspaces.get(client.workspace.max(0) as usize).mode == Mode::Tiling {
            // Tiled clients (and docks, whose geometry is strut-derived)
            // don't get to reposition themselves; re-assert our geometry.
            self.conn.configure_window(window, client.rect, 0)?;
        } else {
            self.registry.get_mut(id).rect = requested;
            self.conn.configure_window(window, requested, 0)?;
        }
        Ok(())
    }

    fn on_property_notify(&mut self, window: Xid, atom: Option<Atom>) -> Result<()> {
        let Some(Atom::NetWmStrutPartial) = atom else {
            return Ok(());
        };
        let Some(id) = self.registry.find(window) else {
            return Ok(());
        };
        if !self.registry.get(id).is_dock {
            return Ok(());
        }
        let strut = self
            .conn
            .strut_partial(window)?
            .map(|c| dock::StrutInfo::from_cardinals(&c))
            .unwrap_or_default();
        self.registry.get_mut(id).strut = Some(strut);
        self.recompute_reserved();
        let rect = dock::dock_rect(&strut, self.conn.screen_rect(), self.reserved);
        self.registry.get_mut(id).rect = rect;
        self.conn.configure_window(window, rect, 0)?;
        self.retile_all_tiling_workspaces()
    }

    // ---- interactive move / resize ------------------------------------------

    fn on_button_press(
        &mut self,
        window: Xid,
        detail: u8,
        state: u16,
        root: crate::geometry::Point,
    ) -> Result<()> {
        let Some(id) = self.registry.find(window) else {
            return Ok(());
        };
        if self.registry.get(id).is_dock {
            return Ok(());
        }

        self.focused = Some(id);
        focus::raise_and_focus(&self.conn, &self.registry, self.current_workspace, id)?;
        focus::apply_borders(&self.conn, &self.registry, self.current_workspace, self.focused)?;

        if state & config::main_modifier() == 0 || self.current_mode() != Mode::Floating {
            return Ok(());
        }
        let mode = match detail {
            1 => DragMode::Move,
            3 => DragMode::Resize,
            _ => return Ok(()),
        };
        self.drag = Some(Drag {
            client: id,
            mode,
            start_root: root,
            start_rect: self.registry.get(id).rect,
        });
        self.conn.grab_pointer_for_drag()
    }

    fn on_motion(&mut self, root: crate::geometry::Point) -> Result<()> {
        let Some(drag) = self.drag else { return Ok(()) };
        let dx = root.x as i64 - drag.start_root.x as i64;
        let dy = root.y as i64 - drag.start_root.y as i64;

        let rect = match drag.mode {
            DragMode::Move => Rect::new(
                (drag.start_rect.x as i64 + dx).max(0) as u32,
                (drag.start_rect.y as i64 + dy).max(0) as u32,
                drag.start_rect.w,
                drag.start_rect.h,
            ),
            DragMode::Resize => {
                let screen = self.conn.screen_rect();
                let w = clamp_floating_dim(
                    (drag.start_rect.w as i64 + dx).max(1) as u32,
                    config::MIN_WINDOW_W,
                    screen.w,
                );
                let h = clamp_floating_dim(
                    (drag.start_rect.h as i64 + dy).max(1) as u32,
                    config::MIN_WINDOW_H,
                    screen.h,
                );
                Rect::new(drag.start_rect.x, drag.start_rect.y, w, h)
            }
        };

        self.registry.get_mut(drag.client).rect = rect;
        let style = colors::style_for(true, true);
        self.conn.configure_window(self.registry.get(drag.client).window, rect, style.width)
    }

    fn end_drag(&mut self) -> Result<()> {
        if self.drag.take().is_some() {
            self.conn.ungrab_pointer()?;
        }
        Ok(())
    }

    fn write_sidecar(&self) {
        sidecar::write_focused_workspace(self.current_workspace.max(0) as usize);
        sidecar::write_occupied_workspaces(&self.registry, config::WORKSPACE_COUNT);
    }

    /// The currently focused client's window, if any.
    pub fn focused_window(&self) -> Option<Xid> {
        self.focused.map(|id| self.registry.get(id).window)
    }

    /// The currently visible workspace tag.
    pub fn current_workspace(&self) -> i8 {
        self.current_workspace
    }

    /// Borrow the underlying connection, primarily so tests can inspect a
    /// [`crate::xserver::mock::StubXConn`]'s recorded calls.
    pub fn conn(&self) -> &C {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::xserver::mock::StubXConn;

    fn wm_for_tests() -> Wm<StubXConn> {
        let stub = StubXConn::new(Rect::new(0, 0, 1000, 800));
        Wm::new(stub).unwrap()
    }

    #[test]
    fn managing_a_window_focuses_and_maps_it() {
        let mut wm = wm_for_tests();
        wm.manage(Xid(10)).unwrap();
        assert_eq!(wm.focused, wm.registry.find(Xid(10)));
        assert!(wm.conn.calls().contains(&crate::xserver::mock::Call::Map(Xid(10))));
    }

    #[test]
    fn unmanaging_the_focused_window_falls_back() {
        let mut wm = wm_for_tests();
        wm.manage(Xid(1)).unwrap();
        wm.manage(Xid(2)).unwrap();
        let focused_before = wm.focused;
        wm.unmanage(Xid(2)).unwrap();
        assert_ne!(wm.focused, focused_before);
        assert_eq!(wm.focused, wm.registry.find(Xid(1)));
    }

    #[test]
    fn dock_window_is_not_focused() {
        let mut wm = wm_for_tests();
        wm.conn.set_fixture(
            Xid(5),
            crate::xserver::mock::WindowFixture {
                is_dock: true,
                ..Default::default()
            },
        );
        wm.manage(Xid(5)).unwrap();
        assert_eq!(wm.focused, None);
        assert_eq!(wm.registry.collect(0), Vec::new());
    }

    #[test]
    fn switching_workspace_unmaps_old_and_maps_new() {
        let mut wm = wm_for_tests();
        wm.manage(Xid(1)).unwrap();
        wm.switch_workspace(1).unwrap();
        assert!(wm.conn.calls().contains(&crate::xserver::mock::Call::Unmap(Xid(1))));
        assert_eq!(wm.focused, None);
    }

    #[test]
    fn key_release_stops_an_active_cycle() {
        let mut wm = wm_for_tests();
        wm.manage(Xid(1)).unwrap();
        wm.manage(Xid(2)).unwrap();
        wm.cycle_next(CycleDirection::Forward).unwrap();
        assert!(wm.cycle.is_active());
        wm.dispatch(XEvent::KeyRelease(crate::xserver::KeyCode { code: 0, mask: 0 }))
            .unwrap();
        assert!(!wm.cycle.is_active());
    }

    #[test]
    fn toggle_mode_all_workspaces_flips_every_tag() {
        let mut wm = wm_for_tests();
        wm.toggle_mode_all_workspaces().unwrap();
        for tag in 0..cfg::WORKSPACE_COUNT {
            assert_eq!(wm.workspaces.get(tag).mode, Mode::Tiling);
        }
    }

    #[test]
    fn toggle_fullscreen_is_an_involution() {
        let mut wm = wm_for_tests();
        wm.manage(Xid(1)).unwrap();
        let before = wm.registry.get(wm.focused.unwrap()).rect;
        wm.toggle_fullscreen().unwrap();
        let full = wm.registry.get(wm.focused.unwrap()).rect;
        assert_eq!(full, wm.conn.screen_rect());
        wm.toggle_fullscreen().unwrap();
        let after = wm.registry.get(wm.focused.unwrap()).rect;
        assert_eq!(before, after);
    }
}
