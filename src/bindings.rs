//! The input binding table (spec.md 4.8): keysym/button + modifier to
//! [`Action`], built once at startup and consulted by the event dispatcher.
//!
//! Grounded on penrose's `core::bindings::{KeyCode, ModifierKey, MouseButton}`
//! shapes, generalized from a user-supplied `HashMap<KeyCode, Handler>` (this
//! window manager has no runtime config, so the table is a fixed match
//! instead) to the fixed action set this spec defines.

use crate::config::main_modifier;
use crate::navigate::Direction;
use crate::xserver::{KeyCode, XConn};
use crate::Result;
use x11rb::protocol::xproto::ModMask;

/// Alt (`Mod1`) is accepted alongside [`main_modifier()`] for every binding
/// (spec.md 4.8).
fn alt_modifier() -> u16 {
    u16::from(ModMask::M1)
}

/// Added to [`main_modifier()`]`|`[`alt_modifier()`] for the "and move/swap"
/// variant of a binding (workspace move, directional swap).
fn shift_modifier() -> u16 {
    u16::from(ModMask::SHIFT)
}

/// What a key combination does once pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Launch [`crate::config::TERMINAL`].
    SpawnTerminal,
    /// Launch [`crate::config::LAUNCHER`].
    SpawnLauncher,
    /// Ask the focused client to close (`WM_DELETE_WINDOW`, else kill).
    CloseFocused,
    /// Flip the current workspace's mode between floating and tiling.
    ToggleMode,
    /// Flip every workspace's mode between floating and tiling.
    ToggleModeAllWorkspaces,
    /// Toggle the focused client's fullscreen geometry override.
    ToggleFullscreen,
    /// Switch the visible workspace to `0`-based tag `n`.
    SwitchWorkspace(usize),
    /// Move the focused client to `0`-based tag `n` and follow it.
    MoveFocusedToWorkspace(usize),
    /// Move focus to the neighbor in `Direction`.
    FocusDirection(Direction),
    /// Swap the focused client with its neighbor in `Direction`, keeping
    /// focus on the same client.
    SwapDirection(Direction),
    /// Advance the Alt-Tab cycle by one step (forward, or backward when
    /// Shift is held).
    CycleNext(CycleDirection),
    /// Quit the window manager.
    Quit,
}

/// Which way an Alt-Tab step moves through the workspace's client ring
/// (spec.md 4.4 "next (or previous, if Shift is held)").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    /// Tab: advance to the next client.
    Forward,
    /// Shift+Tab: step back to the previous client.
    Backward,
}

/// One binding: keysym to resolve at startup, the extra modifier bits on
/// top of whichever base (`main_modifier()` or `alt_modifier()`) the grab is
/// registered under, and the action it triggers. [`Bindings::resolve`]
/// expands each of these into two table entries, one per base, since
/// spec.md 4.8 accepts either modifier rather than requiring both.
struct Binding {
    keysym: u32,
    extra_mask: u16,
    action: Action,
}

/// Top-row digits `1`..`9`, indexed by workspace tag `0..WORKSPACE_COUNT`.
fn workspace_keysyms_qwerty() -> [u32; 9] {
    [
        x11_keysyms::XK_1,
        x11_keysyms::XK_2,
        x11_keysyms::XK_3,
        x11_keysyms::XK_4,
        x11_keysyms::XK_5,
        x11_keysyms::XK_6,
        x11_keysyms::XK_7,
        x11_keysyms::XK_8,
        x11_keysyms::XK_9,
    ]
}

/// The French AZERTY top row's alternates for the same nine tags
/// (spec.md 4.8 "covers both top-row digits and the French AZERTY top
/// row"), bound alongside the QWERTY digits rather than instead of them.
fn workspace_keysyms_azerty() -> [u32; 9] {
    [
        x11_keysyms::XK_ampersand,
        x11_keysyms::XK_eacute,
        x11_keysyms::XK_quotedbl,
        x11_keysyms::XK_apostrophe,
        x11_keysyms::XK_parenleft,
        x11_keysyms::XK_minus,
        x11_keysyms::XK_egrave,
        x11_keysyms::XK_underscore,
        x11_keysyms::XK_ccedilla,
    ]
}

fn key_table() -> Vec<Binding> {
    let plain = |keysym, action| Binding { keysym, extra_mask: 0, action };
    let shifted = |keysym, action| Binding { keysym, extra_mask: shift_modifier(), action };

    let mut v = vec![
        plain(x11_keysyms::XK_Return, Action::SpawnTerminal),
        plain(x11_keysyms::XK_d, Action::SpawnLauncher),
        plain(x11_keysyms::XK_q, Action::CloseFocused),
        plain(x11_keysyms::XK_a, Action::CloseFocused),
        plain(x11_keysyms::XK_t, Action::ToggleMode),
        shifted(x11_keysyms::XK_t, Action::ToggleModeAllWorkspaces),
        plain(x11_keysyms::XK_f, Action::ToggleFullscreen),
        plain(x11_keysyms::XK_Tab, Action::CycleNext(CycleDirection::Forward)),
        shifted(x11_keysyms::XK_Tab, Action::CycleNext(CycleDirection::Backward)),
        shifted(x11_keysyms::XK_e, Action::Quit),
        plain(x11_keysyms::XK_h, Action::FocusDirection(Direction::Left)),
        plain(x11_keysyms::XK_j, Action::FocusDirection(Direction::Down)),
        plain(x11_keysyms::XK_k, Action::FocusDirection(Direction::Up)),
        plain(x11_keysyms::XK_l, Action::FocusDirection(Direction::Right)),
        shifted(x11_keysyms::XK_h, Action::SwapDirection(Direction::Left)),
        shifted(x11_keysyms::XK_j, Action::SwapDirection(Direction::Down)),
        shifted(x11_keysyms::XK_k, Action::SwapDirection(Direction::Up)),
        shifted(x11_keysyms::XK_l, Action::SwapDirection(Direction::Right)),
    ];
    for (tag, &keysym) in workspace_keysyms_qwerty().iter().enumerate() {
        v.push(plain(keysym, Action::SwitchWorkspace(tag)));
        v.push(shifted(keysym, Action::MoveFocusedToWorkspace(tag)));
    }
    for (tag, &keysym) in workspace_keysyms_azerty().iter().enumerate() {
        v.push(plain(keysym, Action::SwitchWorkspace(tag)));
        v.push(shifted(keysym, Action::MoveFocusedToWorkspace(tag)));
    }
    v
}

/// A resolved key binding table: concrete [`KeyCode`]s mapped to their
/// [`Action`], ready to grab and to dispatch `KeyPress` events against.
pub struct Bindings {
    table: Vec<(KeyCode, Action)>,
}

impl Bindings {
    /// Resolve every keysym in the fixed table against the current keyboard
    /// mapping. Each entry is registered under both accepted modifier bases
    /// (spec.md 4.8: "the configured main modifier and Alt" are both
    /// accepted, not required together), so a single keysym resolution
    /// yields two table rows. Skips (and logs) bindings whose keysym has no
    /// keycode rather than failing startup outright.
    pub fn resolve(conn: &impl XConn) -> Result<Self> {
        let mut table = Vec::new();
        for binding in key_table() {
            match conn.keycode_for_keysym(binding.keysym) {
                Ok(code) => {
                    for base in [main_modifier(), alt_modifier()] {
                        table.push((
                            KeyCode { code, mask: base | binding.extra_mask },
                            binding.action,
                        ));
                    }
                }
                Err(e) => tracing::warn!(keysym = binding.keysym, error = %e, "skipping unbindable key"),
            }
        }
        Ok(Self { table })
    }

    /// Grab every resolved binding on the root window.
    pub fn grab(&self, conn: &impl XConn) -> Result<()> {
        let codes: Vec<KeyCode> = self.table.iter().map(|(c, _)| *c).collect();
        conn.grab_keys(&codes)
    }

    /// Look up the action for an observed key press, ignoring lock-mask
    /// bits the caller has already stripped.
    pub fn action_for(&self, pressed: KeyCode) -> Option<Action> {
        self.table
            .iter()
            .find(|(c, _)| *c == pressed)
            .map(|(_, a)| *a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xserver::mock::StubXConn;
    use crate::geometry::Rect;

    #[test]
    fn either_modifier_base_resolves_the_same_binding() {
        let stub = StubXConn::new(Rect::new(0, 0, 1000, 800));
        let bindings = Bindings::resolve(&stub).unwrap();
        let code = (x11_keysyms::XK_Return & 0xff) as u8;

        let via_main = KeyCode { code, mask: main_modifier() };
        let via_alt = KeyCode { code, mask: alt_modifier() };
        assert_eq!(bindings.action_for(via_main), Some(Action::SpawnTerminal));
        assert_eq!(bindings.action_for(via_alt), Some(Action::SpawnTerminal));
    }

    #[test]
    fn both_modifiers_held_together_is_not_a_registered_combination() {
        let stub = StubXConn::new(Rect::new(0, 0, 1000, 800));
        let bindings = Bindings::resolve(&stub).unwrap();
        let code = KeyCode {
            code: (x11_keysyms::XK_Return & 0xff) as u8,
            mask: main_modifier() | alt_modifier(),
        };
        assert_eq!(bindings.action_for(code), None);
    }

    #[test]
    fn unknown_combination_has_no_action() {
        let stub = StubXConn::new(Rect::new(0, 0, 1000, 800));
        let bindings = Bindings::resolve(&stub).unwrap();
        let code = KeyCode { code: 250, mask: 0 };
        assert_eq!(bindings.action_for(code), None);
    }

    #[test]
    fn close_is_bound_to_both_q_and_a() {
        let stub = StubXConn::new(Rect::new(0, 0, 1000, 800));
        let bindings = Bindings::resolve(&stub).unwrap();
        let q = KeyCode { code: (x11_keysyms::XK_q & 0xff) as u8, mask: main_modifier() };
        let a = KeyCode { code: (x11_keysyms::XK_a & 0xff) as u8, mask: main_modifier() };
        assert_eq!(bindings.action_for(q), Some(Action::CloseFocused));
        assert_eq!(bindings.action_for(a), Some(Action::CloseFocused));
    }

    #[test]
    fn quit_requires_shift_e_not_plain_c() {
        let stub = StubXConn::new(Rect::new(0, 0, 1000, 800));
        let bindings = Bindings::resolve(&stub).unwrap();
        let shift_e = KeyCode {
            code: (x11_keysyms::XK_e & 0xff) as u8,
            mask: main_modifier() | shift_modifier(),
        };
        let plain_c = KeyCode { code: (x11_keysyms::XK_c & 0xff) as u8, mask: main_modifier() };
        assert_eq!(bindings.action_for(shift_e), Some(Action::Quit));
        assert_eq!(bindings.action_for(plain_c), None);
    }

    #[test]
    fn workspace_switch_accepts_qwerty_and_azerty_alternates() {
        let stub = StubXConn::new(Rect::new(0, 0, 1000, 800));
        let bindings = Bindings::resolve(&stub).unwrap();
        let digit_1 = KeyCode { code: (x11_keysyms::XK_1 & 0xff) as u8, mask: main_modifier() };
        let ampersand = KeyCode {
            code: (x11_keysyms::XK_ampersand & 0xff) as u8,
            mask: main_modifier(),
        };
        assert_eq!(bindings.action_for(digit_1), Some(Action::SwitchWorkspace(0)));
        assert_eq!(bindings.action_for(ampersand), Some(Action::SwitchWorkspace(0)));
    }

    #[test]
    fn shift_tab_cycles_backward() {
        let stub = StubXConn::new(Rect::new(0, 0, 1000, 800));
        let bindings = Bindings::resolve(&stub).unwrap();
        let tab = KeyCode { code: (x11_keysyms::XK_Tab & 0xff) as u8, mask: main_modifier() };
        let shift_tab = KeyCode {
            code: (x11_keysyms::XK_Tab & 0xff) as u8,
            mask: main_modifier() | shift_modifier(),
        };
        assert_eq!(bindings.action_for(tab), Some(Action::CycleNext(CycleDirection::Forward)));
        assert_eq!(
            bindings.action_for(shift_tab),
            Some(Action::CycleNext(CycleDirection::Backward))
        );
    }
}
