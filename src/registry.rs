//! The client registry: an arena-backed doubly-linked list of managed
//! top-level windows.
//!
//! Per the Design Notes, the list is represented as an arena of records
//! indexed by a stable id with `prev`/`next` fields as `Option<ClientId>`
//! rather than as owning pointers, so the whole thing stays free of
//! `Rc`/`RefCell` cycles (mirrors the index-based collections penrose's
//! `pure` module favours over raw linked structures).

use crate::dock::StrutInfo;
use crate::geometry::Rect;

/// An X11 window id.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Xid(pub u32);

impl From<u32> for Xid {
    fn from(w: u32) -> Self {
        Xid(w)
    }
}

/// A stable handle into the [`Registry`] arena. Indices are reused once a
/// client is removed, so a `ClientId` is only valid until the next
/// `remove` call for the slot it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(usize);

/// Workspace tag meaning "global / dock": visible on every workspace and
/// excluded from tiling and focus.
pub const DOCK_WORKSPACE: i8 = -1;

/// One managed top-level window.
#[derive(Debug, Clone)]
pub struct Client {
    /// The X window this record tracks.
    pub window: Xid,
    /// Current geometry in root coordinates.
    pub rect: Rect,
    /// Geometry saved before entering fullscreen, restored on the next
    /// toggle (supplemented feature; see SPEC_FULL.md).
    pub pre_fullscreen_rect: Option<Rect>,
    /// Workspace tag, or [`DOCK_WORKSPACE`] for docks.
    pub workspace: i8,
    /// True if this client was classified as a dock/panel.
    pub is_dock: bool,
    /// Strut reservation, present only for docks.
    pub strut: Option<StrutInfo>,
    prev: Option<ClientId>,
    next: Option<ClientId>,
}

impl Client {
    fn new(window: Xid, workspace: i8) -> Self {
        Self {
            window,
            rect: Rect::default(),
            pre_fullscreen_rect: None,
            workspace,
            is_dock: false,
            strut: None,
            prev: None,
            next: None,
        }
    }
}

enum Slot {
    Occupied(Client),
    Free,
}

/// The client registry. Insertion order is the single source of truth for
/// tiling order and Alt-Tab order: new clients are prepended (inserted at
/// head).
#[derive(Debug, Default)]
pub struct Registry {
    arena: Vec<Slot>,
    head: Option<ClientId>,
    free: Vec<usize>,
}

impl std::fmt::Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Occupied(c) => write!(f, "Occupied({:?})", c.window),
            Slot::Free => write!(f, "Free"),
        }
    }
}

impl Registry {
    /// Build an empty registry.
    pub fn new() -> Self {
        Self {
            arena: Vec::new(),
            head: None,
            free: Vec::new(),
        }
    }

    /// Prepend a new client for `window` on `workspace`, returning its id.
    pub fn insert(&mut self, window: Xid, workspace: i8) -> ClientId {
        let mut client = Client::new(window, workspace);
        client.next = self.head;

        let id = if let Some(idx) = self.free.pop() {
            self.arena[idx] = Slot::Occupied(client);
            ClientId(idx)
        } else {
            self.arena.push(Slot::Occupied(client));
            ClientId(self.arena.len() - 1)
        };

        if let Some(old_head) = self.head {
            self.slot_mut(old_head).prev = Some(id);
        }
        self.head = Some(id);
        id
    }

    /// Unlink and free `id`. No-op if `id` does not name a live client.
    pub fn remove(&mut self, id: ClientId) {
        let (prev, next) = match self.arena.get(id.0) {
            Some(Slot::Occupied(c)) => (c.prev, c.next),
            _ => return,
        };

        if let Some(p) = prev {
            self.slot_mut(p).next = next;
        }
        if let Some(n) = next {
            self.slot_mut(n).prev = prev;
        }
        if self.head == Some(id) {
            self.head = next;
        }

        self.arena[id.0] = Slot::Free;
        self.free.push(id.0);
    }

    /// Linear scan for the client managing `window`.
    pub fn find(&self, window: Xid) -> Option<ClientId> {
        self.iter().find(|&id| self.get(id).window == window)
    }

    /// Borrow a client record. Panics if `id` is stale; callers only ever
    /// hold ids returned from `insert`/`find`/iteration on this registry.
    pub fn get(&self, id: ClientId) -> &Client {
        match &self.arena[id.0] {
            Slot::Occupied(c) => c,
            Slot::Free => panic!("stale ClientId"),
        }
    }

    /// Mutably borrow a client record.
    pub fn get_mut(&mut self, id: ClientId) -> &mut Client {
        self.slot_mut(id)
    }

    fn slot_mut(&mut self, id: ClientId) -> &mut Client {
        match &mut self.arena[id.0] {
            Slot::Occupied(c) => c,
            Slot::Free => panic!("stale ClientId"),
        }
    }

    /// The head of the registry (most recently inserted live client), or
    /// `None` if empty.
    pub fn head(&self) -> Option<ClientId> {
        self.head
    }

    /// The client immediately after `id` in registry order.
    pub fn next_of(&self, id: ClientId) -> Option<ClientId> {
        self.get(id).next
    }

    /// The client immediately before `id` in registry order.
    pub fn prev_of(&self, id: ClientId) -> Option<ClientId> {
        self.get(id).prev
    }

    /// Iterate all live clients in registry order (head to tail).
    pub fn iter(&self) -> RegistryIter<'_> {
        RegistryIter {
            registry: self,
            next: self.head,
        }
    }

    /// The ordered subsequence of clients tagged with `workspace`.
    pub fn collect(&self, workspace: i8) -> Vec<ClientId> {
        self.iter()
            .filter(|&id| self.get(id).workspace == workspace)
            .collect()
    }

    /// Splice two registry nodes so that their positions are exchanged,
    /// preserving every other node's relative order. Handles the adjacent
    /// (either direction) and non-adjacent cases. Does not touch focus.
    pub fn swap(&mut self, a: ClientId, b: ClientId) {
        if a == b {
            return;
        }

        let a_prev = self.get(a).prev;
        let a_next = self.get(a).next;
        let b_prev = self.get(b).prev;
        let b_next = self.get(b).next;

        if a_next == Some(b) {
            // a immediately precedes b: [a_prev] a b [b_next]
            self.link(a_prev, Some(b));
            self.link(Some(b), Some(a));
            self.link(Some(a), b_next);
        } else if b_next == Some(a) {
            // b immediately precedes a: [b_prev] b a [a_next]
            self.link(b_prev, Some(a));
            self.link(Some(a), Some(b));
            self.link(Some(b), a_next);
        } else {
            // non-adjacent: swap each in place
            self.link(a_prev, Some(b));
            self.link(Some(b), a_next);
            self.link(b_prev, Some(a));
            self.link(Some(a), b_next);
        }

        if self.head == Some(a) {
            self.head = Some(b);
        } else if self.head == Some(b) {
            self.head = Some(a);
        }
    }

    /// Link `from -> to` (and `to.prev = from` when `from` is `Some`),
    /// updating only the ends that exist.
    fn link(&mut self, from: Option<ClientId>, to: Option<ClientId>) {
        if let Some(f) = from {
            self.slot_mut(f).next = to;
        }
        if let Some(t) = to {
            self.slot_mut(t).prev = from;
        }
    }

    /// True iff every prev/next pointer is reciprocal and there is exactly
    /// one head. Used by the property tests in spec.md 8.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> bool {
        let mut heads = 0;
        for id in self.iter() {
            if self.get(id).prev.is_none() {
                heads += 1;
            }
            if let Some(p) = self.get(id).prev {
                if self.get(p).next != Some(id) {
                    return false;
                }
            }
            if let Some(n) = self.get(id).next {
                if self.get(n).prev != Some(id) {
                    return false;
                }
            }
        }
        heads <= 1 && (heads == 1) == self.head.is_some()
    }
}

/// Forward iterator over a [`Registry`] in insertion/tiling order.
pub struct RegistryIter<'a> {
    registry: &'a Registry,
    next: Option<ClientId>,
}

impl Iterator for RegistryIter<'_> {
    type Item = ClientId;

    fn next(&mut self) -> Option<ClientId> {
        let current = self.next?;
        self.next = self.registry.get(current).next;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg_with(n: u32) -> (Registry, Vec<ClientId>) {
        let mut reg = Registry::new();
        let ids: Vec<_> = (0..n).map(|i| reg.insert(Xid(i), 0)).collect();
        (reg, ids)
    }

    #[test]
    fn insert_prepends_at_head() {
        let (reg, ids) = reg_with(3);
        // ids[0] inserted first, ids[2] last -> head is ids[2]
        assert_eq!(reg.head(), Some(ids[2]));
        assert!(reg.check_invariants());
    }

    #[test]
    fn remove_updates_head_and_links() {
        let (mut reg, ids) = reg_with(3);
        reg.remove(ids[2]); // remove current head
        assert_eq!(reg.head(), Some(ids[1]));
        assert!(reg.check_invariants());
        let order: Vec<_> = reg.iter().collect();
        assert_eq!(order, vec![ids[1], ids[0]]);
    }

    #[test]
    fn find_locates_by_window() {
        let (reg, ids) = reg_with(3);
        assert_eq!(reg.find(Xid(1)), Some(ids[1]));
        assert_eq!(reg.find(Xid(99)), None);
    }

    #[test]
    fn swap_adjacent_preserves_rest() {
        let (mut reg, ids) = reg_with(4); // head .. tail = ids[3, 2, 1, 0]
        reg.swap(ids[3], ids[2]); // head and its immediate successor
        assert!(reg.check_invariants());
        let order: Vec<_> = reg.iter().collect();
        assert_eq!(order, vec![ids[2], ids[3], ids[1], ids[0]]);
    }

    #[test]
    fn swap_non_adjacent() {
        let (mut reg, ids) = reg_with(4);
        reg.swap(ids[3], ids[0]); // head and tail
        assert!(reg.check_invariants());
        let order: Vec<_> = reg.iter().collect();
        assert_eq!(order, vec![ids[0], ids[2], ids[1], ids[3]]);
    }

    #[test]
    fn swap_idempotent_pair() {
        let (mut reg, ids) = reg_with(4);
        let before: Vec<_> = reg.iter().collect();
        reg.swap(ids[3], ids[1]);
        reg.swap(ids[3], ids[1]);
        let after: Vec<_> = reg.iter().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn collect_filters_by_workspace() {
        let mut reg = Registry::new();
        let a = reg.insert(Xid(0), 0);
        let _b = reg.insert(Xid(1), 1);
        let c = reg.insert(Xid(2), 0);
        assert_eq!(reg.collect(0), vec![c, a]);
    }
}

/// Property tests (spec.md 8 "Invariants (property tests)"): the prev/next
/// links stay reciprocal and single-headed under any sequence of
/// insert/remove/swap operations, not just the hand-picked cases above.
#[cfg(test)]
mod quickcheck_tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[derive(Clone, Debug)]
    enum Op {
        Insert(u32),
        Remove(u8),
        Swap(u8, u8),
    }

    impl quickcheck::Arbitrary for Op {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            match u8::arbitrary(g) % 3 {
                0 => Op::Insert(u32::arbitrary(g)),
                1 => Op::Remove(u8::arbitrary(g)),
                _ => Op::Swap(u8::arbitrary(g), u8::arbitrary(g)),
            }
        }
    }

    #[quickcheck]
    fn invariants_hold_after_any_op_sequence(ops: Vec<Op>) -> bool {
        let mut reg = Registry::new();
        let mut live: Vec<ClientId> = Vec::new();

        for op in ops {
            match op {
                Op::Insert(w) => live.push(reg.insert(Xid(w), 0)),
                Op::Remove(i) => {
                    if !live.is_empty() {
                        let idx = i as usize % live.len();
                        reg.remove(live.remove(idx));
                    }
                }
                Op::Swap(i, j) => {
                    if live.len() >= 2 {
                        let i = i as usize % live.len();
                        let j = j as usize % live.len();
                        reg.swap(live[i], live[j]);
                    }
                }
            }
            if !reg.check_invariants() {
                return false;
            }
        }
        true
    }
}
