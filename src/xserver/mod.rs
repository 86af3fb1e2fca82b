//! The `XConn` seam: everything the rest of the window manager knows about
//! talking to an X server, kept behind a trait so [`crate::wm::Wm`] can be
//! driven by a real connection in production and by [`mock::StubXConn`] in
//! tests. Mirrors the shape of penrose's `x::XConn` trait and `x::event`'s
//! `XEvent`, generalized to the wire-level operations this spec needs
//! (spec.md 4.7, 6).

pub mod atoms;
pub mod mock;
pub mod x11rb;

use crate::geometry::{Point, Rect};
use crate::registry::Xid;
use crate::Result;
use strum_macros::{AsRefStr, EnumIter};

/// Atoms interned once at startup and looked up by name everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr)]
pub enum Atom {
    /// `WM_PROTOCOLS`
    #[strum(serialize = "WM_PROTOCOLS")]
    WmProtocols,
    /// `WM_DELETE_WINDOW`
    #[strum(serialize = "WM_DELETE_WINDOW")]
    WmDeleteWindow,
    /// `_NET_SUPPORTED`
    #[strum(serialize = "_NET_SUPPORTED")]
    NetSupported,
    /// `_NET_WM_WINDOW_TYPE`
    #[strum(serialize = "_NET_WM_WINDOW_TYPE")]
    NetWmWindowType,
    /// `_NET_WM_WINDOW_TYPE_DOCK`
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_DOCK")]
    NetWmWindowTypeDock,
    /// `_NET_WM_STRUT_PARTIAL`
    #[strum(serialize = "_NET_WM_STRUT_PARTIAL")]
    NetWmStrutPartial,
    /// `_NET_WM_STATE`
    #[strum(serialize = "_NET_WM_STATE")]
    NetWmState,
    /// `_NET_WM_STATE_ABOVE`
    #[strum(serialize = "_NET_WM_STATE_ABOVE")]
    NetWmStateAbove,
}

/// The handful of window attributes the manage path cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowAttrs {
    /// True for windows that asked the server to skip window-manager
    /// involvement entirely (menus, tooltips, override-redirect popups).
    pub override_redirect: bool,
    /// Requested width.
    pub w: u32,
    /// Requested height.
    pub h: u32,
}

/// A key press, normalized to a raw keycode plus the modifier bits that were
/// held. Lock-mask variants (NumLock, CapsLock) are expanded into separate
/// grabs by [`crate::bindings`], not represented here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode {
    /// Raw X keycode.
    pub code: u8,
    /// Modifier mask with lock bits already masked off.
    pub mask: u16,
}

/// Events the dispatcher loop consumes, generalizing penrose's `x::XEvent`
/// down to the variants this window manager reacts to (spec.md 4.7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XEvent {
    /// A client asked to be mapped.
    MapRequest(Xid),
    /// A managed window was destroyed.
    DestroyNotify(Xid),
    /// A managed window unmapped itself.
    UnmapNotify(Xid),
    /// A client asked to change its own geometry or stacking.
    ConfigureRequest {
        /// The requesting window.
        window: Xid,
        /// Requested geometry, honored verbatim for floating clients and
        /// ignored (recomputed by the tiler) for tiled ones.
        rect: Rect,
    },
    /// The pointer entered a managed window (focus-follows-mouse).
    EnterNotify {
        /// The window the pointer entered.
        window: Xid,
    },
    /// A grabbed mouse button went down on a managed window.
    ButtonPress {
        /// The window under the pointer.
        window: Xid,
        /// Raw button number.
        detail: u8,
        /// Modifier state at press time.
        state: u16,
        /// Pointer position in root coordinates at press time.
        root: Point,
    },
    /// The pointer moved while a drag/resize grab was active.
    MotionNotify {
        /// Pointer position in root coordinates.
        root: Point,
    },
    /// A grabbed mouse button was released, ending any active drag/resize.
    ButtonRelease,
    /// A grabbed key combination went down.
    KeyPress(KeyCode),
    /// A grabbed key combination was released. Ends an in-progress Alt-Tab
    /// cycle (`wm.c`'s `stop_cycle`, spec.md 4.4, 4.7 KeyRelease row).
    KeyRelease(KeyCode),
    /// A client sent a `ClientMessage`, e.g. `_NET_*` requests.
    ClientMessage {
        /// The target window.
        window: Xid,
        /// The message type atom, if it was one we know about.
        kind: Option<Atom>,
        /// The first five raw 32-bit data words.
        data: [u32; 5],
    },
    /// A window property changed; used to pick up `_NET_WM_STRUT_PARTIAL`
    /// and `_NET_WM_WINDOW_TYPE` changes after manage time.
    PropertyNotify {
        /// The window whose property changed.
        window: Xid,
        /// The property atom, if it was one we know about.
        atom: Option<Atom>,
    },
}

/// Everything [`crate::wm::Wm`] needs from an X connection. A real
/// implementation lives in [`x11rb::X11rbConn`]; [`mock::StubXConn`] drives
/// the same trait in tests without a display.
pub trait XConn {
    /// The root window of the managed screen.
    fn root(&self) -> Xid;

    /// The managed screen's geometry, in root coordinates.
    fn screen_rect(&self) -> Rect;

    /// Look up an interned atom by name. Panics if `startup` did not
    /// succeed in interning every [`Atom`] variant, which would itself be a
    /// fatal startup error surfaced earlier.
    fn atom(&self, atom: Atom) -> u32;

    /// Select `SubstructureRedirect | SubstructureNotify` on the root
    /// window. Returns [`crate::Error::OtherWmRunning`] if another window
    /// manager already holds the redirect.
    fn select_root_events(&self) -> Result<()>;

    /// Select the per-window event mask appropriate for a managed client:
    /// `EnterWindow | PropertyChange | StructureNotify`.
    fn select_window_events(&self, window: Xid) -> Result<()>;

    /// Grab every key binding's combination on the root window, including
    /// the NumLock/CapsLock/both cross product.
    fn grab_keys(&self, codes: &[KeyCode]) -> Result<()>;

    /// Grab `button` with `modmask` (and its lock-mask cross product) on
    /// the root window for window dragging/resizing.
    fn grab_button_combo(&self, button: u8, modmask: u16) -> Result<()>;

    /// Resolve a keysym (e.g. `x11_keysyms::XK_Return`) to the physical
    /// keycode the current keyboard mapping assigns it.
    fn keycode_for_keysym(&self, keysym: u32) -> Result<u8>;

    /// Grab the pointer for the duration of an interactive drag/resize.
    fn grab_pointer_for_drag(&self) -> Result<()>;

    /// Release a pointer grab taken by `grab_pointer_for_drag`.
    fn ungrab_pointer(&self) -> Result<()>;

    /// Freeze other clients' requests while we restack/reparent nothing in
    /// particular but want an atomic view (used by `swap_keep_focus`).
    fn grab_server(&self) -> Result<()>;

    /// Release a server grab taken by `grab_server`.
    fn ungrab_server(&self) -> Result<()>;

    /// Block for and return the next event.
    fn next_event(&self) -> Result<XEvent>;

    /// Flush buffered requests to the server.
    fn flush(&self) -> Result<()>;

    /// Current pointer position in root coordinates.
    fn query_pointer(&self) -> Result<Point>;

    /// Top-level children of the root window, in stacking order, for the
    /// startup scan of pre-existing windows.
    fn query_tree(&self) -> Result<Vec<Xid>>;

    /// Attributes relevant to the manage decision.
    fn window_attrs(&self, window: Xid) -> Result<WindowAttrs>;

    /// True if `_NET_WM_WINDOW_TYPE` includes `_NET_WM_WINDOW_TYPE_DOCK`.
    fn window_type_is_dock(&self, window: Xid) -> Result<bool>;

    /// The raw `_NET_WM_STRUT_PARTIAL` cardinals, if the property is set.
    fn strut_partial(&self, window: Xid) -> Result<Option<[u32; 12]>>;

    /// Map a window.
    fn map_window(&self, window: Xid) -> Result<()>;

    /// Unmap a window.
    fn unmap_window(&self, window: Xid) -> Result<()>;

    /// Raise a window to the top of the stacking order.
    fn raise_window(&self, window: Xid) -> Result<()>;

    /// Set a window's geometry and border width in one request.
    fn configure_window(&self, window: Xid, rect: Rect, border: u16) -> Result<()>;

    /// Resolve `color_name` via the default colormap and paint it as
    /// `window`'s border pixel, falling back to the black pixel on failure
    /// (spec.md, supplemented color allocation contract).
    fn set_border_color(&self, window: Xid, color_name: &str) -> Result<()>;

    /// Set the input focus to `window`.
    fn set_input_focus(&self, window: Xid) -> Result<()>;

    /// Set `_NET_WM_STATE_ABOVE` so docks re-assert themselves over tiled
    /// clients after a restack.
    fn set_wm_state_above(&self, window: Xid) -> Result<()>;

    /// Send a `WM_DELETE_WINDOW` client message if `window` advertises
    /// support for it via `WM_PROTOCOLS`; returns whether it was sent.
    fn send_wm_delete(&self, window: Xid) -> Result<bool>;

    /// Forcibly terminate a client that did not respond to
    /// `WM_DELETE_WINDOW` (`XKillClient`).
    fn kill_client(&self, window: Xid) -> Result<()>;
}
