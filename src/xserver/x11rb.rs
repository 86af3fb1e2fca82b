//! The real `XConn`, backed by `x11rb`'s pure-Rust connection.
//!
//! Grounded on penrose's `x11rb::xconn::X11rbConn` for the general shape
//! (own the connection, cache interned atoms, translate wire events into
//! the crate's own `XEvent`) and on `examples/original_source/wm.c`'s
//! `xerror_handler`/`alloc_color` for the two behaviors x11rb doesn't do
//! for you: non-fatal error logging and named-color resolution.

use super::{Atom, KeyCode, WindowAttrs, XConn, XEvent};
use crate::geometry::{Point, Rect};
use crate::registry::Xid;
use crate::xserver::atoms::Atoms;
use crate::{Error, Result};
use tracing::{debug, warn};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    Atom as XAtom, ChangeWindowAttributesAux, ClientMessageEvent, ConfigureWindowAux,
    ConnectionExt, EventMask, GrabMode, InputFocus, ModMask, Screen, Window,
};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;
use x11rb::CURRENT_TIME;

/// `GRAB_ANY`'s replacement in this x11rb version: the wire value meaning
/// "any key"/"any keycode" for `ungrab_key`.
const GRAB_ANY: u8 = 0;

/// Ignored lock-mask bits combined with every real grab so Caps/Num lock
/// being held doesn't swallow a binding. `Mod2` is the conventional NumLock
/// mask on most keyboard layouts; there is no portable way to query it
/// without `xmodmap`, so, like most minimal window managers, we hardcode it.
fn lock_masks() -> [u16; 4] {
    [
        0,
        u16::from(ModMask::LOCK),
        u16::from(ModMask::M2),
        u16::from(ModMask::LOCK | ModMask::M2),
    ]
}

/// A live connection to an X display plus the bits of server state the
/// window manager needs cached: the managed screen and the interned atoms.
pub struct X11rbConn {
    conn: RustConnection,
    root: Window,
    screen_rect: Rect,
    atoms: Atoms,
}

impl X11rbConn {
    /// Connect to the display named by `$DISPLAY` and select
    /// `SubstructureRedirect` on its root window. Returns
    /// [`Error::OtherWmRunning`] if another window manager already holds it.
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) =
            x11rb::connect(None).map_err(|_| Error::CannotOpenDisplay)?;
        let screen = conn.setup().roots[screen_num].clone();
        let root = screen.root;
        let atoms = Atoms::new(&conn)?;

        let this = Self {
            conn,
            root,
            screen_rect: screen_rect_of(&screen),
            atoms,
        };
        this.select_root_events()?;
        Ok(this)
    }

    fn screen(&self) -> Rect {
        self.screen_rect
    }

    fn grab_one(&self, code: u8, mask: u16, is_key: bool) -> Result<()> {
        for lock in lock_masks() {
            let full_mask = mask | lock;
            if is_key {
                self.conn
                    .grab_key(
                        true,
                        self.root,
                        ModMask::from(full_mask),
                        code,
                        GrabMode::ASYNC,
                        GrabMode::ASYNC,
                    )?
                    .check()
                    .ok();
            } else {
                self.conn
                    .grab_button(
                        true,
                        self.root,
                        EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE | EventMask::POINTER_MOTION,
                        GrabMode::ASYNC,
                        GrabMode::ASYNC,
                        x11rb::NONE,
                        x11rb::NONE,
                        code.into(),
                        ModMask::from(full_mask),
                    )?
                    .check()
                    .ok();
            }
        }
        Ok(())
    }

    fn convert_event(&self, event: Event) -> Option<XEvent> {
        match event {
            Event::MapRequest(e) => Some(XEvent::MapRequest(Xid(e.window))),
            Event::DestroyNotify(e) => Some(XEvent::DestroyNotify(Xid(e.window))),
            Event::UnmapNotify(e) => Some(XEvent::UnmapNotify(Xid(e.window))),
            Event::ConfigureRequest(e) => Some(XEvent::ConfigureRequest {
                window: Xid(e.window),
                rect: Rect::new(e.x.max(0) as u32, e.y.max(0) as u32, e.width as u32, e.height as u32),
            }),
            Event::EnterNotify(e) => Some(XEvent::EnterNotify { window: Xid(e.event) }),
            Event::ButtonPress(e) => Some(XEvent::ButtonPress {
                window: Xid(e.event),
                detail: e.detail,
                state: u16::from(e.state) & !ignore_mask(),
                root: Point::new(e.root_x.max(0) as u32, e.root_y.max(0) as u32),
            }),
            Event::MotionNotify(e) => Some(XEvent::MotionNotify {
                root: Point::new(e.root_x.max(0) as u32, e.root_y.max(0) as u32),
            }),
            Event::ButtonRelease(_) => Some(XEvent::ButtonRelease),
            Event::KeyPress(e) => Some(XEvent::KeyPress(KeyCode {
                code: e.detail,
                mask: u16::from(e.state) & !ignore_mask(),
            })),
            Event::KeyRelease(e) => Some(XEvent::KeyRelease(KeyCode {
                code: e.detail,
                mask: u16::from(e.state) & !ignore_mask(),
            })),
            Event::ClientMessage(e) => Some(XEvent::ClientMessage {
                window: Xid(e.window),
                kind: self.atoms.name_of(e.type_),
                data: {
                    let d = e.data.as_data32();
                    [d[0], d[1], d[2], d[3], d[4]]
                },
            }),
            Event::PropertyNotify(e) => Some(XEvent::PropertyNotify {
                window: Xid(e.window),
                atom: self.atoms.name_of(e.atom),
            }),
            Event::Error(err) => {
                log_x_error(&err);
                None
            }
            _ => None,
        }
    }
}

fn ignore_mask() -> u16 {
    u16::from(ModMask::LOCK | ModMask::M2)
}

fn screen_rect_of(screen: &Screen) -> Rect {
    Rect::new(0, 0, screen.width_in_pixels as u32, screen.height_in_pixels as u32)
}

fn log_x_error(err: &x11rb::x11_utils::X11Error) {
    warn!(
        error_code = err.error_code,
        request = err.major_opcode,
        minor = err.minor_opcode,
        resource = err.bad_value,
        "X server reported a protocol error"
    );
}

impl XConn for X11rbConn {
    fn root(&self) -> Xid {
        Xid(self.root)
    }

    fn screen_rect(&self) -> Rect {
        self.screen()
    }

    fn atom(&self, atom: Atom) -> u32 {
        self.atoms.get(atom)
    }

    fn select_root_events(&self) -> Result<()> {
        let aux = ChangeWindowAttributesAux::new().event_mask(
            EventMask::SUBSTRUCTURE_REDIRECT
                | EventMask::SUBSTRUCTURE_NOTIFY
                | EventMask::BUTTON_PRESS
                | EventMask::ENTER_WINDOW
                | EventMask::POINTER_MOTION
                | EventMask::KEY_RELEASE,
        );
        let result = self.conn.change_window_attributes(self.root, &aux)?.check();
        match result {
            Ok(()) => {
                self.conn.flush()?;
                Ok(())
            }
            Err(x11rb::errors::ReplyError::X11Error(e))
                if e.error_kind == x11rb::protocol::ErrorKind::Access =>
            {
                Err(Error::OtherWmRunning)
            }
            Err(e) => Err(Error::Reply(e)),
        }
    }

    fn select_window_events(&self, window: Xid) -> Result<()> {
        let aux = ChangeWindowAttributesAux::new().event_mask(
            EventMask::ENTER_WINDOW | EventMask::PROPERTY_CHANGE | EventMask::STRUCTURE_NOTIFY,
        );
        self.conn.change_window_attributes(window.0, &aux)?;
        Ok(())
    }

    fn grab_keys(&self, codes: &[KeyCode]) -> Result<()> {
        self.conn.ungrab_key(GRAB_ANY, self.root, ModMask::ANY.into())?;
        for kc in codes {
            self.grab_one(kc.code, kc.mask, true)?;
        }
        self.conn.flush()?;
        Ok(())
    }

    fn grab_button_combo(&self, button: u8, modmask: u16) -> Result<()> {
        self.grab_one(button, modmask, false)?;
        self.conn.flush()?;
        Ok(())
    }

    fn keycode_for_keysym(&self, keysym: u32) -> Result<u8> {
        let setup = self.conn.setup();
        let min = setup.min_keycode;
        let max = setup.max_keycode;
        let mapping = self
            .conn
            .get_keyboard_mapping(min, max - min + 1)?
            .reply()?;
        let per = mapping.keysyms_per_keycode as usize;
        for (i, chunk) in mapping.keysyms.chunks(per).enumerate() {
            if chunk.contains(&keysym) {
                return Ok(min + i as u8);
            }
        }
        Err(Error::NoSuchKeysym(keysym))
    }

    fn grab_pointer_for_drag(&self) -> Result<()> {
        self.conn
            .grab_pointer(
                false,
                self.root,
                EventMask::BUTTON_RELEASE | EventMask::POINTER_MOTION,
                GrabMode::ASYNC,
                GrabMode::ASYNC,
                x11rb::NONE,
                x11rb::NONE,
                CURRENT_TIME,
            )?
            .reply()?;
        Ok(())
    }

    fn ungrab_pointer(&self) -> Result<()> {
        self.conn.ungrab_pointer(CURRENT_TIME)?;
        self.conn.flush()?;
        Ok(())
    }

    fn grab_server(&self) -> Result<()> {
        self.conn.grab_server()?;
        Ok(())
    }

    fn ungrab_server(&self) -> Result<()> {
        self.conn.ungrab_server()?;
        self.conn.flush()?;
        Ok(())
    }

    fn next_event(&self) -> Result<XEvent> {
        loop {
            let event = self.conn.wait_for_event()?;
            debug!(?event, "x event");
            if let Some(converted) = self.convert_event(event) {
                return Ok(converted);
            }
        }
    }

    fn flush(&self) -> Result<()> {
        self.conn.flush()?;
        Ok(())
    }

    fn query_pointer(&self) -> Result<Point> {
        let reply = self.conn.query_pointer(self.root)?.reply()?;
        Ok(Point::new(reply.root_x.max(0) as u32, reply.root_y.max(0) as u32))
    }

    fn query_tree(&self) -> Result<Vec<Xid>> {
        let reply = self.conn.query_tree(self.root)?.reply()?;
        Ok(reply.children.into_iter().map(Xid).collect())
    }

    fn window_attrs(&self, window: Xid) -> Result<WindowAttrs> {
        let attrs = self.conn.get_window_attributes(window.0)?.reply()?;
        let geom = self.conn.get_geometry(window.0)?.reply()?;
        Ok(WindowAttrs {
            override_redirect: attrs.override_redirect,
            w: geom.width as u32,
            h: geom.height as u32,
        })
    }

    fn window_type_is_dock(&self, window: Xid) -> Result<bool> {
        let type_atom = self.atoms.get(Atom::NetWmWindowType);
        let dock_atom = self.atoms.get(Atom::NetWmWindowTypeDock);
        let reply = self
            .conn
            .get_property(false, window.0, type_atom, x11rb::protocol::xproto::AtomEnum::ATOM, 0, 32)?
            .reply()?;
        let values: Vec<XAtom> = reply
            .value32()
            .map(|it| it.collect())
            .unwrap_or_default();
        Ok(values.contains(&dock_atom))
    }

    fn strut_partial(&self, window: Xid) -> Result<Option<[u32; 12]>> {
        let strut_atom = self.atoms.get(Atom::NetWmStrutPartial);
        let reply = self
            .conn
            .get_property(
                false,
                window.0,
                strut_atom,
                x11rb::protocol::xproto::AtomEnum::CARDINAL,
                0,
                12,
            )?
            .reply()?;
        let values: Vec<u32> = reply.value32().map(|it| it.collect()).unwrap_or_default();
        if values.len() != 12 {
            return Ok(None);
        }
        let mut out = [0u32; 12];
        out.copy_from_slice(&values);
        Ok(Some(out))
    }

    fn map_window(&self, window: Xid) -> Result<()> {
        self.conn.map_window(window.0)?;
        Ok(())
    }

    fn unmap_window(&self, window: Xid) -> Result<()> {
        self.conn.unmap_window(window.0)?;
        Ok(())
    }

    fn raise_window(&self, window: Xid) -> Result<()> {
        let aux = ConfigureWindowAux::new().stack_mode(x11rb::protocol::xproto::StackMode::ABOVE);
        self.conn.configure_window(window.0, &aux)?;
        Ok(())
    }

    fn configure_window(&self, window: Xid, rect: Rect, border: u16) -> Result<()> {
        let aux = ConfigureWindowAux::new()
            .x(rect.x as i32)
            .y(rect.y as i32)
            .width(rect.w)
            .height(rect.h)
            .border_width(border as u32);
        self.conn.configure_window(window.0, &aux)?;
        Ok(())
    }

    fn set_border_color(&self, window: Xid, color_name: &str) -> Result<()> {
        let screen = &self.conn.setup().roots[0];
        let pixel = alloc_named_color(&self.conn, screen, color_name)
            .unwrap_or(screen.black_pixel);
        let aux = ChangeWindowAttributesAux::new().border_pixel(pixel);
        self.conn.change_window_attributes(window.0, &aux)?;
        Ok(())
    }

    fn set_input_focus(&self, window: Xid) -> Result<()> {
        self.conn
            .set_input_focus(InputFocus::POINTER_ROOT, window.0, CURRENT_TIME)?;
        Ok(())
    }

    fn set_wm_state_above(&self, window: Xid) -> Result<()> {
        let state_atom = self.atoms.get(Atom::NetWmState);
        let above_atom = self.atoms.get(Atom::NetWmStateAbove);
        self.conn.change_property32(
            x11rb::protocol::xproto::PropMode::REPLACE,
            window.0,
            state_atom,
            x11rb::protocol::xproto::AtomEnum::ATOM,
            &[above_atom],
        )?;
        Ok(())
    }

    fn send_wm_delete(&self, window: Xid) -> Result<bool> {
        let protocols_atom = self.atoms.get(Atom::WmProtocols);
        let delete_atom = self.atoms.get(Atom::WmDeleteWindow);
        let reply = self
            .conn
            .get_property(
                false,
                window.0,
                protocols_atom,
                x11rb::protocol::xproto::AtomEnum::ATOM,
                0,
                32,
            )?
            .reply()?;
        let supports = reply
            .value32()
            .map(|mut it| it.any(|a| a == delete_atom))
            .unwrap_or(false);
        if !supports {
            return Ok(false);
        }

        let event = ClientMessageEvent::new(
            32,
            window.0,
            protocols_atom,
            [delete_atom, CURRENT_TIME, 0, 0, 0],
        );
        self.conn
            .send_event(false, window.0, EventMask::NO_EVENT, event)?;
        self.conn.flush()?;
        Ok(true)
    }

    fn kill_client(&self, window: Xid) -> Result<()> {
        self.conn.kill_client(window.0)?;
        self.conn.flush()?;
        Ok(())
    }
}

/// Resolve `name` via the default colormap. Mirrors `alloc_color` in
/// `examples/original_source/wm.c`: on any failure the caller falls back to
/// the screen's black pixel rather than treating this as fatal.
fn alloc_named_color(conn: &RustConnection, screen: &Screen, name: &str) -> Option<u32> {
    let reply = conn
        .alloc_named_color(screen.default_colormap, name.as_bytes())
        .ok()?
        .reply()
        .ok()?;
    Some(reply.pixel)
}
