//! Atom interning, batched into one round trip.
//!
//! Grounded directly on penrose's `x11rb::atom::Atoms`: fire every
//! `InternAtom` request first, then collect the replies, rather than doing
//! one blocking round trip per atom.

use super::Atom;
use crate::Result;
use std::collections::HashMap;
use strum::IntoEnumIterator;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::ConnectionExt;

/// The full set of interned atoms this window manager needs, keyed by the
/// logical [`Atom`] and resolvable back to it by raw value.
#[derive(Debug)]
pub struct Atoms {
    by_atom: HashMap<Atom, u32>,
}

impl Atoms {
    /// Intern every [`Atom`] variant against `conn` in a single batch.
    pub fn new(conn: &impl Connection) -> Result<Self> {
        let requests = Atom::iter()
            .map(|atom| {
                let cookie = conn.intern_atom(false, atom.as_ref().as_bytes())?;
                Ok((atom, cookie))
            })
            .collect::<Result<Vec<_>>>()?;

        let by_atom = requests
            .into_iter()
            .map(|(atom, cookie)| Ok((atom, cookie.reply()?.atom)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self { by_atom })
    }

    /// Raw value for `atom`. Panics if `new` did not intern it, which can
    /// only happen for a variant added to the enum without a matching
    /// `strum(serialize = ..)` the server rejected.
    pub fn get(&self, atom: Atom) -> u32 {
        self.by_atom[&atom]
    }

    /// Reverse lookup: the logical atom for a raw value, if it is one we
    /// interned (used to classify `PropertyNotify`/`ClientMessage` events).
    pub fn name_of(&self, raw: u32) -> Option<Atom> {
        self.by_atom
            .iter()
            .find(|&(_, &v)| v == raw)
            .map(|(&k, _)| k)
    }
}
