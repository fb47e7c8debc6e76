//! The book: entity registry + transaction log.
//!
//! `Book` is an explicit state struct — one instance per opened book, no
//! process-wide singleton — and forms a single mutual-exclusion domain
//! together with the balances derived into it. Callers that need
//! concurrency wrap the whole book in one lock (see `book_service`); a
//! single transaction mutates several entities and must never be observed
//! half-applied.

use serde::{Deserialize, Serialize};

use super::models::{Account, Id, IdGenerator, Ledger, LedgerGroup, Transaction};

/// The durable shape of a book: exactly what the snapshot store
/// loads and saves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub accounts: Vec<Account>,
    pub ledger_groups: Vec<LedgerGroup>,
    pub ledgers: Vec<Ledger>,
    pub transactions: Vec<Transaction>,
}

/// In-memory registry and transaction log.
#[derive(Debug, Clone, Default)]
pub struct Book {
    pub(crate) accounts: Vec<Account>,
    pub(crate) ledger_groups: Vec<LedgerGroup>,
    pub(crate) ledgers: Vec<Ledger>,
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) id_gen: IdGenerator,
}

/// A balance-bearing entity a contra leg resolved to.
#[derive(Debug, Clone, Copy)]
pub enum Party<'a> {
    Account(&'a Account),
    Ledger(&'a Ledger),
}

impl<'a> Party<'a> {
    pub fn balance(&self) -> f64 {
        match self {
            Party::Account(a) => a.balance,
            Party::Ledger(l) => l.balance,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            Party::Account(a) => &a.name,
            Party::Ledger(l) => &l.name,
        }
    }
}

impl Book {
    /// Rehydrate a book from its durable form. The id generator is seeded
    /// past every id already present so new entries keep the strictly
    /// increasing order.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let max_seen = snapshot
            .accounts
            .iter()
            .map(|a| a.id.raw())
            .chain(snapshot.ledger_groups.iter().map(|g| g.id.raw()))
            .chain(snapshot.ledgers.iter().map(|l| l.id.raw()))
            .chain(snapshot.transactions.iter().map(|t| t.id.raw()))
            .max()
            .unwrap_or(0);
        Self {
            accounts: snapshot.accounts,
            ledger_groups: snapshot.ledger_groups,
            ledgers: snapshot.ledgers,
            transactions: snapshot.transactions,
            id_gen: IdGenerator::starting_after(max_seen),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            accounts: self.accounts.clone(),
            ledger_groups: self.ledger_groups.clone(),
            ledgers: self.ledgers.clone(),
            transactions: self.transactions.clone(),
        }
    }

    pub(crate) fn next_id(&mut self) -> Id {
        self.id_gen.next_id()
    }

    // --- registry lookups ---

    pub fn account(&self, id: Id) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub(crate) fn account_mut(&mut self, id: Id) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id == id)
    }

    pub fn ledger(&self, id: Id) -> Option<&Ledger> {
        self.ledgers.iter().find(|l| l.id == id)
    }

    pub(crate) fn ledger_mut(&mut self, id: Id) -> Option<&mut Ledger> {
        self.ledgers.iter_mut().find(|l| l.id == id)
    }

    pub fn ledger_group(&self, id: Id) -> Option<&LedgerGroup> {
        self.ledger_groups.iter().find(|g| g.id == id)
    }

    pub(crate) fn ledger_group_mut(&mut self, id: Id) -> Option<&mut LedgerGroup> {
        self.ledger_groups.iter_mut().find(|g| g.id == id)
    }

    pub fn transaction(&self, id: Id) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn ledgers(&self) -> &[Ledger] {
        &self.ledgers
    }

    pub fn ledger_groups(&self) -> &[LedgerGroup] {
        &self.ledger_groups
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    // --- classification helpers ---

    /// Whether this ledger's group tracks running balances. A ledger whose
    /// group no longer exists is treated as non-rolling, so its legs are
    /// skipped rather than rejected.
    pub fn ledger_is_rolling(&self, ledger: &Ledger) -> bool {
        self.ledger_group(ledger.group_id)
            .map(|g| g.rolling)
            .unwrap_or(false)
    }

    pub(crate) fn is_rolling_ledger_id(&self, id: Id) -> bool {
        self.ledger(id)
            .map(|l| self.ledger_is_rolling(l))
            .unwrap_or(false)
    }

    /// Whether this ledger belongs to the payable-flavored group.
    pub fn ledger_is_payable(&self, ledger: &Ledger) -> bool {
        self.ledger_group(ledger.group_id)
            .map(|g| g.rolling && g.payable)
            .unwrap_or(false)
    }

    /// Resolve a contra leg: accounts first, else ledgers. `None` means a
    /// dangling reference — tolerated, never an error.
    pub fn resolve_party(&self, id: Id) -> Option<Party<'_>> {
        if let Some(account) = self.account(id) {
            return Some(Party::Account(account));
        }
        self.ledger(id).map(Party::Ledger)
    }

    /// The transaction log in canonical replay order (ascending id).
    pub(crate) fn transactions_by_id(&self) -> Vec<&Transaction> {
        let mut txs: Vec<&Transaction> = self.transactions.iter().collect();
        txs.sort_by_key(|t| t.id);
        txs
    }
}
