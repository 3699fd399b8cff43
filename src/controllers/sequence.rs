//! Request sequencing
//!
//! Every request a controller issues is tagged with a monotonically
//! increasing sequence number. Only the response to the most recently
//! issued request may update controller state; anything older is stale and
//! gets dropped. This is what keeps a slow first search from overwriting the
//! result of a later one.

use serde::{Deserialize, Serialize};

/// Identity of one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Seq(u64);

impl Seq {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Issues sequence numbers and tracks whether the latest one is unresolved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequencer {
    latest: u64,
    in_flight: bool,
}

impl Sequencer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: 0,
            in_flight: false,
        }
    }

    /// Issue the next sequence number; it becomes the only current one
    pub const fn issue(&mut self) -> Seq {
        self.latest += 1;
        self.in_flight = true;
        Seq(self.latest)
    }

    /// Resolve `seq`
    ///
    /// Returns `true` if `seq` is the latest outstanding request, in which
    /// case the caller must apply its response. Stale or already-resolved
    /// sequence numbers return `false` and leave the state untouched.
    pub const fn resolve(&mut self, seq: Seq) -> bool {
        if seq.0 == self.latest && self.in_flight {
            self.in_flight = false;
            true
        } else {
            false
        }
    }

    /// Make every outstanding request stale without issuing a new one
    pub const fn invalidate(&mut self) {
        self.latest += 1;
        self.in_flight = false;
    }

    /// Whether the latest issued request is still unresolved
    #[must_use]
    pub const fn in_flight(&self) -> bool {
        self.in_flight
    }
}
