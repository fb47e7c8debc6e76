//! Balance engine: the single place balances move.
//!
//! Every mutation of the transaction log goes through `apply`/`reverse`,
//! and `recompute` replays the whole log from opening balances. The two
//! paths must agree bit-for-bit: `reverse` is `apply` with the amount
//! negated, so apply-then-reverse restores every touched balance exactly,
//! and because each effect is plain addition the final balances do not
//! depend on the order distinct transactions are applied in.
//!
//! Effect table (Δ = amount):
//!
//! | type    | source leg                  | target leg                         |
//! |---------|-----------------------------|------------------------------------|
//! | expense | account.balance -= Δ        | rolling ledger.balance += Δ        |
//! | income  | account.balance += Δ        | rolling ledger.balance -= Δ        |
//! | contra  | resolved(source) -= Δ       | resolved(target) += Δ              |
//!
//! Contra legs resolve against accounts first, else rolling ledgers. Any
//! leg that fails to resolve (the referenced entity was deleted) is
//! skipped; the rest of the transaction still applies.

use log::debug;

use super::book::Book;
use super::models::{Id, Transaction, TransactionType};

/// Apply a transaction's effect to the balances it references.
pub(crate) fn apply(book: &mut Book, tx: &Transaction) {
    shift(book, tx, tx.amount);
}

/// Undo a previously applied transaction. Exact inverse of [`apply`].
pub(crate) fn reverse(book: &mut Book, tx: &Transaction) {
    shift(book, tx, -tx.amount);
}

fn shift(book: &mut Book, tx: &Transaction, delta: f64) {
    match tx.kind {
        TransactionType::Expense => {
            if let Some(account) = book.account_mut(tx.account_id) {
                account.balance -= delta;
            }
            if let Some(ledger_id) = tx.ledger_id {
                shift_rolling_ledger(book, ledger_id, delta);
            }
        }
        TransactionType::Income => {
            if let Some(account) = book.account_mut(tx.account_id) {
                account.balance += delta;
            }
            if let Some(ledger_id) = tx.ledger_id {
                shift_rolling_ledger(book, ledger_id, -delta);
            }
        }
        TransactionType::Contra => {
            shift_party(book, tx.account_id, -delta);
            if let Some(to_id) = tx.to_id {
                shift_party(book, to_id, delta);
            }
        }
    }
}

fn shift_rolling_ledger(book: &mut Book, ledger_id: Id, delta: f64) {
    if book.is_rolling_ledger_id(ledger_id) {
        if let Some(ledger) = book.ledger_mut(ledger_id) {
            ledger.balance += delta;
        }
    }
}

fn shift_party(book: &mut Book, id: Id, delta: f64) {
    if let Some(account) = book.account_mut(id) {
        account.balance += delta;
        return;
    }
    shift_rolling_ledger(book, id, delta);
}

/// Rebuild every balance from scratch: reset accounts and rolling ledgers
/// to their opening balances (non-rolling ledgers untouched), then replay
/// the full log in ascending id order.
///
/// This is the authoritative recovery path — run on startup and after any
/// opening-balance or group edit — and it is idempotent.
pub(crate) fn recompute(book: &mut Book) {
    let rolling_ids: Vec<Id> = book
        .ledgers
        .iter()
        .filter(|l| book.ledger_is_rolling(l))
        .map(|l| l.id)
        .collect();

    for account in &mut book.accounts {
        account.balance = account.opening_balance;
    }
    for ledger in &mut book.ledgers {
        if rolling_ids.contains(&ledger.id) {
            ledger.balance = ledger.opening_balance;
        }
    }

    let replay: Vec<Transaction> = book.transactions_by_id().into_iter().cloned().collect();
    let count = replay.len();
    for tx in &replay {
        apply(book, tx);
    }
    debug!("recomputed balances from {} transactions", count);
}
