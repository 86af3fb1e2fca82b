//! Master/stack layout: one fixed-fraction master column plus a vertical
//! stack for the remainder (spec.md 4.3).

use crate::config;
use crate::geometry::{clamp_dim, Rect};
use crate::registry::ClientId;

/// Place `clients` (head is master, remainder is stack) into `avail`.
/// Requires `clients.len() >= 2`; the single-client case is handled by the
/// caller in `tiling::tile`.
pub fn layout(clients: &[ClientId], avail: Rect) -> Vec<(ClientId, Rect)> {
    debug_assert!(clients.len() >= 2);

    let gi = config::GAP_INNER;
    let master_w = clamp_dim(
        avail.w * config::MASTER_FACTOR_PERCENT / 100,
        config::MIN_WINDOW_W,
        avail.w,
    );
    let stack_w = clamp_dim(
        avail.w.saturating_sub(master_w + gi),
        config::MIN_WINDOW_W,
        avail.w,
    );

    let mut placed = Vec::with_capacity(clients.len());
    placed.push((clients[0], Rect::new(avail.x, avail.y, master_w, avail.h)));

    let stack = &clients[1..];
    let n = stack.len() as u32;
    let stack_x = avail.x + master_w + gi;
    let each_h = (avail.h.saturating_sub((n - 1) * gi)) / n;
    let mut y = avail.y;

    for (i, &id) in stack.iter().enumerate() {
        let is_last = i as u32 == n - 1;
        let h = if is_last {
            // absorb rounding loss so the last stack client's bottom edge
            // lands exactly on available_bottom
            avail.bottom() - y
        } else {
            each_h
        };
        placed.push((id, Rect::new(stack_x, y, stack_w, h)));
        y += h + gi;
    }

    placed
}
