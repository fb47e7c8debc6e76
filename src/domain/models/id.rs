//! Canonical identifier type.
//!
//! Every entity and every transaction carries an `Id`, compared by strict
//! equality — no cross-type or string/number coercion anywhere. For
//! transactions the id doubles as the chronological replay key, so the
//! generator must be strictly increasing even when two entries are created
//! within the same clock millisecond.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Identifier for accounts, ledger groups, ledgers and transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(u64);

impl Id {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Monotonic id source, seeded from wall-clock milliseconds.
///
/// Yields `max(now_millis, last + 1)`: ids stay time-flavored (sortable
/// against entries created by older data) but never collide or go
/// backwards within one book.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    /// Generator that will never emit anything at or below `max_seen`.
    /// Used when rehydrating a book from a snapshot.
    pub fn starting_after(max_seen: u64) -> Self {
        Self { last: max_seen }
    }

    pub fn next_id(&mut self) -> Id {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        self.last = now.max(self.last + 1);
        Id(self.last)
    }
}
