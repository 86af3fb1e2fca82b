//! Dwindle layout: recursive spiral tiling, alternating split orientation
//! at each depth (spec.md 4.3).

use crate::config;
use crate::geometry::Rect;
use crate::registry::ClientId;

/// Place `clients` (registry order = placement order) into `avail`,
/// spiraling with an initial vertical split. Requires `clients.len() >= 2`.
pub fn layout(clients: &[ClientId], avail: Rect) -> Vec<(ClientId, Rect)> {
    debug_assert!(clients.len() >= 2);
    let mut placed = Vec::with_capacity(clients.len());
    recurse(clients, avail, false, &mut placed);
    placed
}

fn recurse(clients: &[ClientId], rect: Rect, horiz: bool, out: &mut Vec<(ClientId, Rect)>) {
    if clients.is_empty() {
        return;
    }
    if clients.len() == 1 {
        out.push((clients[0], rect));
        return;
    }

    let gi = config::GAP_INNER;

    if !horiz {
        // vertical split: placed client takes the left `amount` columns
        let amount = split_amount(rect.w, config::MIN_WINDOW_W, gi);
        out.push((clients[0], Rect::new(rect.x, rect.y, amount, rect.h)));

        let remainder = Rect::new(
            rect.x + amount + gi,
            rect.y,
            rect.w.saturating_sub(amount + gi),
            rect.h,
        );
        recurse(&clients[1..], remainder, true, out);
    } else {
        // horizontal split: placed client takes the top `amount` rows
        let amount = split_amount(rect.h, config::MIN_WINDOW_H, gi);
        out.push((clients[0], Rect::new(rect.x, rect.y, rect.w, amount)));

        let remainder = Rect::new(
            rect.x,
            rect.y + amount + gi,
            rect.w,
            rect.h.saturating_sub(amount + gi),
        );
        recurse(&clients[1..], remainder, false, out);
    }
}

/// `floor(dim * factor / 100)` clamped to `[min_dim, dim - min_dim - gap]`.
fn split_amount(dim: u32, min_dim: u32, gap: u32) -> u32 {
    let raw = dim * config::MASTER_FACTOR_PERCENT / 100;
    let hi = dim.saturating_sub(min_dim + gap);
    if hi <= min_dim {
        hi
    } else {
        raw.clamp(min_dim, hi)
    }
}
