//! End-to-end scenarios (spec.md 8 "End-to-end scenarios"), driven through
//! [`vela_wm::wm::Wm`] against a [`StubXConn`] rather than a live display.

use vela_wm::bindings::CycleDirection;
use vela_wm::dock::Margins;
use vela_wm::geometry::Rect;
use vela_wm::registry::{Registry, Xid};
use vela_wm::tiling;
use vela_wm::wm::Wm;
use vela_wm::workspace::Layout;
use vela_wm::xserver::mock::{Call, StubXConn, WindowFixture};

fn wm_on_screen(w: u32, h: u32) -> Wm<StubXConn> {
    let stub = StubXConn::new(Rect::new(0, 0, w, h));
    Wm::new(stub).unwrap()
}

fn last_configure(calls: &[Call], window: Xid) -> Option<(Rect, u16)> {
    calls.iter().rev().find_map(|c| match c {
        Call::Configure(w, rect, border) if *w == window => Some((*rect, *border)),
        _ => None,
    })
}

/// Scenario 1: manage two clients in master/stack tiling. Cross-checks the
/// geometry `Wm` actually applies against an independent `tiling::tile`
/// call on a shadow registry built in the same insertion order, rather
/// than hardcoding expected numbers twice. (spec.md's own worked example
/// uses illustrative numbers that don't reduce from its documented
/// formula; DESIGN.md's Open Question (a) resolves that in favor of the
/// formula, which is what both `Wm` and this test exercise.)
#[test]
fn scenario_1_manage_then_tile_master() {
    let mut wm = wm_on_screen(1000, 800);
    wm.toggle_mode().unwrap(); // Floating -> Tiling
    wm.set_layout_for_testing(Layout::Master).unwrap();

    wm.manage(Xid(1)).unwrap();
    wm.manage(Xid(2)).unwrap();

    let border = vela_wm::config::max_border_px();
    let avail = tiling::available_rect(Rect::new(0, 0, 1000, 800), border, Margins::default());

    let mut shadow = Registry::new();
    shadow.insert(Xid(1), 0);
    shadow.insert(Xid(2), 0);
    let placed = tiling::tile(Layout::Master, &shadow.collect(0), avail, border);
    let expected_master = placed[0].1; // shadow head = Xid(2), managed last
    let expected_stack = placed[1].1; // Xid(1)

    let calls = wm.conn().calls();
    let (master_rect, _) = last_configure(&calls, Xid(2)).unwrap();
    let (stack_rect, _) = last_configure(&calls, Xid(1)).unwrap();

    assert_eq!(master_rect, expected_master);
    assert_eq!(stack_rect, expected_stack);
    assert!(master_rect.x < stack_rect.x, "master sits left of stack");
    assert!(!master_rect.overlaps(&stack_rect));
}

/// Scenario 2: switch workspace, focus falls back, sidecar files reflect it.
#[test]
fn scenario_2_switch_workspace_moves_client_and_refocuses() {
    use std::sync::Mutex;
    static HOME_LOCK: Mutex<()> = Mutex::new(());
    let _guard = HOME_LOCK.lock().unwrap();

    let tmp = std::env::temp_dir().join(format!("vela-wm-scenario2-{}", std::process::id()));
    std::fs::create_dir_all(&tmp).unwrap();
    let prev = std::env::var_os("HOME");
    std::env::set_var("HOME", &tmp);

    let mut wm = wm_on_screen(1000, 800);
    wm.manage(Xid(1)).unwrap(); // A
    wm.manage(Xid(2)).unwrap(); // B, now focused (head)

    wm.move_focused_to_workspace(1).unwrap();

    assert!(wm.conn().calls().contains(&Call::Unmap(Xid(2))));
    assert_eq!(wm.focused_window(), Some(Xid(1)));

    let focused_contents = std::fs::read_to_string(tmp.join(".wm/focused.workspace")).unwrap();
    assert_eq!(focused_contents, "1\n");
    let occupied_contents = std::fs::read_to_string(tmp.join(".wm/occupied.workspace")).unwrap();
    assert_eq!(occupied_contents, "1,2\n");

    match prev {
        Some(h) => std::env::set_var("HOME", h),
        None => std::env::remove_var("HOME"),
    }
    std::fs::remove_dir_all(&tmp).ok();
}

/// Scenario 3: directional swap keeps focus on the same client while
/// splicing it to the other tiling slot.
#[test]
fn scenario_3_directional_swap_keeps_focus() {
    let mut wm = wm_on_screen(1000, 800);
    wm.toggle_mode().unwrap(); // Tiling
    wm.set_layout_for_testing(Layout::Master).unwrap();

    wm.manage(Xid(2)).unwrap(); // B managed first -> stack
    wm.manage(Xid(1)).unwrap(); // A managed second -> head/master, focused

    assert_eq!(wm.focused_window(), Some(Xid(1)));
    let calls_before = wm.conn().calls();
    let (a_rect, _) = last_configure(&calls_before, Xid(1)).unwrap();
    let (b_rect, _) = last_configure(&calls_before, Xid(2)).unwrap();
    assert!(a_rect.x < b_rect.x, "A starts on the left (master)");

    wm.swap_keep_focus(vela_wm::navigate::Direction::Right).unwrap();

    // Focus is unchanged...
    assert_eq!(wm.focused_window(), Some(Xid(1)));
    // ...but A is now on the right (stack) and B on the left (master).
    let calls_after = wm.conn().calls();
    let (a_rect, _) = last_configure(&calls_after, Xid(1)).unwrap();
    let (b_rect, _) = last_configure(&calls_after, Xid(2)).unwrap();
    assert!(b_rect.x < a_rect.x, "B is now the master (left)");
}

/// Scenario 4: a dock's strut reserves screen area that the tiler respects.
#[test]
fn scenario_4_dock_reserves_area() {
    let mut wm = wm_on_screen(1000, 800);
    wm.toggle_mode().unwrap(); // Tiling

    let mut strut = [0u32; 12];
    strut[2] = 30; // top
    strut[9] = 999; // top_end_x
    wm.conn().set_fixture(
        Xid(5),
        WindowFixture {
            is_dock: true,
            strut: Some(strut),
            ..Default::default()
        },
    );
    wm.manage(Xid(5)).unwrap();

    let calls = wm.conn().calls();
    let (dock_rect, _) = last_configure(&calls, Xid(5)).unwrap();
    assert_eq!(dock_rect, Rect::new(0, 0, 1000, 30));

    wm.manage(Xid(1)).unwrap();
    let calls = wm.conn().calls();
    let (client_rect, _) = last_configure(&calls, Xid(1)).unwrap();
    let border = vela_wm::config::max_border_px();
    assert_eq!(client_rect.y, 30 + vela_wm::config::GAP_OUTER + border);
}

/// Scenario 5: Alt-Tab cycling wraps back to the list head.
#[test]
fn scenario_5_alt_tab_wraps() {
    let mut wm = wm_on_screen(1000, 800);
    wm.manage(Xid(1)).unwrap(); // registry order after all inserts: 3, 2, 1
    wm.manage(Xid(2)).unwrap();
    wm.manage(Xid(3)).unwrap(); // focused

    assert_eq!(wm.focused_window(), Some(Xid(3)));
    wm.cycle_next(CycleDirection::Forward).unwrap();
    assert_eq!(wm.focused_window(), Some(Xid(2)));
    wm.cycle_next(CycleDirection::Forward).unwrap();
    assert_eq!(wm.focused_window(), Some(Xid(1)));
    wm.cycle_next(CycleDirection::Forward).unwrap();
    assert_eq!(wm.focused_window(), Some(Xid(3)), "wraps back to the head");

    wm.cycle_next(CycleDirection::Backward).unwrap();
    assert_eq!(wm.focused_window(), Some(Xid(1)), "shift+tab steps back");
}

/// Scenario 6: closing the focused client sends WM_DELETE_WINDOW; the
/// resulting DestroyNotify unmanages it and refocuses the next client.
#[test]
fn scenario_6_close_focused_then_destroy_unmanages() {
    let mut wm = wm_on_screen(1000, 800);
    wm.manage(Xid(1)).unwrap();
    wm.manage(Xid(2)).unwrap(); // focused

    wm.conn().set_fixture(
        Xid(2),
        WindowFixture {
            supports_delete: true,
            ..Default::default()
        },
    );

    wm.close_focused().unwrap();
    assert!(wm.conn().calls().contains(&Call::SendDelete(Xid(2))));
    assert!(!wm.conn().calls().contains(&Call::Kill(Xid(2))));

    wm.unmanage(Xid(2)).unwrap();
    assert_eq!(wm.focused_window(), Some(Xid(1)));
}
