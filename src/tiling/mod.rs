//! The layout engine: master/stack and dwindle tilers (spec.md 4.3).
//!
//! Both algorithms are pure functions from an ordered list of client ids and
//! an available rectangle to a list of placements; nothing here touches the
//! registry or the X server directly, mirroring penrose's `builtin::layout`
//! functions that take a `Stack<Xid>` and a `Rect` and hand back
//! `Vec<(Xid, Rect)>`.

pub mod dwindle;
pub mod master;

use crate::config;
use crate::dock::Margins;
use crate::geometry::{clamp_dim, Rect};
use crate::registry::ClientId;
use crate::workspace::Layout;

/// Compute the available rectangle for tiling: the screen rect shrunk by
/// outer gap + border on every side and by the reserved dock margins.
pub fn available_rect(screen: Rect, border: u32, reserved: Margins) -> Rect {
    let outer = config::GAP_OUTER + border;
    let x = outer + reserved.left;
    let y = outer + reserved.top;
    let w = screen
        .w
        .saturating_sub(2 * outer + reserved.left + reserved.right);
    let h = screen
        .h
        .saturating_sub(2 * outer + reserved.top + reserved.bottom);

    Rect::new(
        x,
        y,
        clamp_dim(w, config::MIN_WINDOW_W, w),
        clamp_dim(h, config::MIN_WINDOW_H, h),
    )
}

/// Shrink a placed cell by `2 * border` so the border itself fits inside the
/// cell the window is reported to occupy.
fn inset_for_border(rect: Rect, border: u32) -> Rect {
    Rect::new(
        rect.x,
        rect.y,
        rect.w.saturating_sub(2 * border),
        rect.h.saturating_sub(2 * border),
    )
}

/// Tile `clients` (already filtered to one workspace, in registry order)
/// into `avail` using `layout`. Registry order determines master-vs-stack
/// assignment and dwindle placement order.
pub fn tile(
    layout: Layout,
    clients: &[ClientId],
    avail: Rect,
    border: u32,
) -> Vec<(ClientId, Rect)> {
    if clients.is_empty() {
        return Vec::new();
    }

    if clients.len() == 1 {
        return vec![(clients[0], inset_for_border(avail, border))];
    }

    let raw = match layout {
        Layout::Master => master::layout(clients, avail),
        Layout::Dwindle => dwindle::layout(clients, avail),
    };

    raw.into_iter()
        .map(|(id, r)| (id, inset_for_border(r, border)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Registry, Xid};

    fn ids(reg: &mut Registry, n: u32) -> Vec<ClientId> {
        (0..n).map(|i| reg.insert(Xid(i), 0)).collect()
    }

    #[test]
    fn single_client_fills_available_rect() {
        let mut reg = Registry::new();
        let cs = ids(&mut reg, 1);
        let avail = Rect::new(36, 36, 928, 728);
        let placed = tile(Layout::Master, &cs, avail, 12);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].1, Rect::new(36, 36, 928 - 24, 728 - 24));
    }

    #[test]
    fn every_tile_property_no_overlap_and_contained() {
        for n in 1u32..6 {
            for layout in [Layout::Master, Layout::Dwindle] {
                let mut reg = Registry::new();
                let cs = ids(&mut reg, n);
                let avail = Rect::new(36, 36, 928, 728);
                let placed = tile(layout, &cs, avail, 12);
                assert_eq!(placed.len(), n as usize);
                for (_, r) in &placed {
                    let outer = Rect::new(r.x, r.y, r.w + 24, r.h + 24);
                    assert!(
                        outer.contained_in(&avail),
                        "{layout:?} n={n}: {outer:?} not in {avail:?}"
                    );
                }
                for i in 0..placed.len() {
                    for j in (i + 1)..placed.len() {
                        assert!(
                            !placed[i].1.overlaps(&placed[j].1),
                            "{layout:?} n={n}: overlap between {:?} and {:?}",
                            placed[i].1,
                            placed[j].1
                        );
                    }
                }
            }
        }
    }
}

/// Property tests (spec.md 8 "Invariants (property tests)"): no-overlap and
/// containment hold for arbitrary client counts and screen dimensions, not
/// just the fixed fixture sizes exercised above.
#[cfg(test)]
mod quickcheck_tests {
    use super::*;
    use crate::registry::{Registry, Xid};
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn no_overlap_and_contained_for_any_count_and_screen(
        n: u8,
        master: bool,
        w: u32,
        h: u32,
        border: u8,
    ) -> bool {
        let n = (n % 12) as u32 + 1;
        let w = 400 + (w % 1600);
        let h = 300 + (h % 1200);
        let border = (border % 8) as u32;
        let layout = if master { Layout::Master } else { Layout::Dwindle };

        let mut reg = Registry::new();
        let cs: Vec<ClientId> = (0..n).map(|i| reg.insert(Xid(i), 0)).collect();
        let avail = available_rect(Rect::new(0, 0, w, h), border, Margins::default());
        let placed = tile(layout, &cs, avail, border);

        if placed.len() != cs.len() {
            return false;
        }
        for (_, r) in &placed {
            let outer = Rect::new(r.x, r.y, r.w + 2 * border, r.h + 2 * border);
            if !outer.contained_in(&avail) {
                return false;
            }
        }
        for i in 0..placed.len() {
            for j in (i + 1)..placed.len() {
                if placed[i].1.overlaps(&placed[j].1) {
                    return false;
                }
            }
        }
        true
    }
}
