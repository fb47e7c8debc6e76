//! Domain models for ledger groups and ledgers.
//!
//! A ledger is a named bucket under a group. Groups come in two kinds:
//! *rolling* groups whose ledgers track a running balance (IOU-style
//! counters), and plain categorization groups (recurring income/expense
//! labels) whose ledgers never accumulate anything. One rolling group is
//! conventionally flagged `payable` — outward obligations such as
//! tithe/zakat — which inverts how its ledgers' balance signs read, but
//! never how they are stored.

use serde::{Deserialize, Serialize};

use super::id::Id;

/// Classification bucket for ledgers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerGroup {
    pub id: Id,
    pub name: String,
    /// Ledgers in this group carry a running balance.
    pub rolling: bool,
    /// Sign-to-label mapping is inverted for this group (outward
    /// obligations). Meaningful only when `rolling` is set.
    pub payable: bool,
    pub enabled: bool,
}

impl LedgerGroup {
    pub fn new(id: Id, name: String, rolling: bool, payable: bool) -> Self {
        Self {
            id,
            name,
            rolling,
            payable,
            enabled: true,
        }
    }
}

/// A named bucket under a [`LedgerGroup`].
///
/// `balance` is meaningful only while the group is rolling; for plain
/// category ledgers it stays at its initial value and is never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Id,
    pub name: String,
    pub group_id: Id,
    pub opening_balance: f64,
    pub balance: f64,
    pub enabled: bool,
}

impl Ledger {
    pub fn new(id: Id, name: String, group_id: Id, opening_balance: f64) -> Self {
        Self {
            id,
            name,
            group_id,
            opening_balance,
            balance: opening_balance,
            enabled: true,
        }
    }

    /// Display-sign convention: how this ledger's stored balance reads.
    ///
    /// For a payable-flavored group, balance >= 0 means "I owe them";
    /// for any other rolling group it means "they owe me". The stored
    /// number and the accumulation formula are identical either way —
    /// only the label flips.
    pub fn position(&self, payable_flavor: bool) -> LedgerPosition {
        let negative = self.balance < 0.0;
        let i_owe = if payable_flavor { !negative } else { negative };
        if i_owe {
            LedgerPosition::Payable
        } else {
            LedgerPosition::Receivable
        }
    }
}

/// How a rolling ledger's balance reads from the user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerPosition {
    /// They owe me.
    Receivable,
    /// I owe them.
    Payable,
}
