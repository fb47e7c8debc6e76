//! Domain model for a cash/bank account.

use serde::{Deserialize, Serialize};

use super::id::Id;

/// A cash or bank holding. Always balance-bearing: every transaction leg
/// that references an account moves its balance.
///
/// `balance` is derived state — `opening_balance` plus the ordered effect
/// of every transaction referencing this account — and is what a full
/// recompute resets and replays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Id,
    pub name: String,
    pub opening_balance: f64,
    pub balance: f64,
    pub enabled: bool,
}

impl Account {
    pub fn new(id: Id, name: String, opening_balance: f64) -> Self {
        Self {
            id,
            name,
            opening_balance,
            balance: opening_balance,
            enabled: true,
        }
    }
}
