//! Net worth aggregator: one running total across the whole book.
//!
//! The tracked universe is every account plus every rolling ledger —
//! money the user either holds or is owed/owes. The trail seeds at the
//! sum of their opening balances and replays the log in id order; each
//! entry contributes the net amount it moves across the universe
//! boundary. A transfer between two tracked entities nets to zero and is
//! omitted from the trail entirely; an expense posted against a plain
//! category is money leaving the universe and shows up as a loss.

use chrono::NaiveDate;
use serde::Serialize;

use super::book::{Book, Party};
use super::models::{Id, Transaction, TransactionType};

/// Impacts smaller than this are treated as zero and dropped.
pub(crate) const BALANCE_EPSILON: f64 = 1e-4;

/// One nonzero-impact entry in the net worth trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetWorthRow {
    pub tx_id: Id,
    pub date: NaiveDate,
    pub kind: TransactionType,
    pub remark: Option<String>,
    pub out_amount: Option<f64>,
    pub in_amount: Option<f64>,
    /// Net position after this entry.
    pub net_position: f64,
}

/// Lazily evaluated net worth trail. `rows()` restarts the fold each
/// call.
pub struct NetWorthStatement<'a> {
    book: &'a Book,
    opening: f64,
    entries: Vec<&'a Transaction>,
}

impl<'a> NetWorthStatement<'a> {
    pub fn build(book: &'a Book) -> NetWorthStatement<'a> {
        let opening = book
            .accounts()
            .iter()
            .map(|a| a.opening_balance)
            .sum::<f64>()
            + book
                .ledgers()
                .iter()
                .filter(|l| book.ledger_is_rolling(l))
                .map(|l| l.opening_balance)
                .sum::<f64>();
        NetWorthStatement {
            book,
            opening,
            entries: book.transactions_by_id(),
        }
    }

    /// Sum of opening balances across the tracked universe.
    pub fn opening_position(&self) -> f64 {
        self.opening
    }

    /// Nonzero-impact entries, oldest first, with the running total
    /// after each.
    pub fn rows(&self) -> impl Iterator<Item = NetWorthRow> + '_ {
        self.entries
            .iter()
            .scan(self.opening, move |position, tx| {
                let impact = self.impact(tx);
                if impact.abs() <= BALANCE_EPSILON {
                    return Some(None);
                }
                *position += impact;
                Some(Some(NetWorthRow {
                    tx_id: tx.id,
                    date: tx.date,
                    kind: tx.kind,
                    remark: tx.remark.clone(),
                    out_amount: (impact < 0.0).then_some(-impact),
                    in_amount: (impact > 0.0).then_some(impact),
                    net_position: *position,
                }))
            })
            .flatten()
    }

    /// Net position after the whole trail.
    pub fn closing_position(&self) -> f64 {
        self.rows()
            .last()
            .map(|row| row.net_position)
            .unwrap_or(self.opening)
    }

    /// Total value gained and total value lost across the trail.
    pub fn totals(&self) -> (f64, f64) {
        self.rows().fold((0.0, 0.0), |(gain, loss), row| {
            (
                gain + row.in_amount.unwrap_or(0.0),
                loss + row.out_amount.unwrap_or(0.0),
            )
        })
    }

    /// Net amount this entry moves into (+) or out of (-) the tracked
    /// universe. Legs on untracked or missing entities contribute
    /// nothing.
    fn impact(&self, tx: &Transaction) -> f64 {
        let mut impact = 0.0;
        match tx.kind {
            TransactionType::Expense => {
                if self.book.account(tx.account_id).is_some() {
                    impact -= tx.amount;
                }
                if tx.ledger_id.is_some_and(|id| self.book.is_rolling_ledger_id(id)) {
                    impact += tx.amount;
                }
            }
            TransactionType::Income => {
                if self.book.account(tx.account_id).is_some() {
                    impact += tx.amount;
                }
                if tx.ledger_id.is_some_and(|id| self.book.is_rolling_ledger_id(id)) {
                    impact -= tx.amount;
                }
            }
            TransactionType::Contra => {
                if self.tracked(tx.account_id) {
                    impact -= tx.amount;
                }
                if tx.to_id.is_some_and(|id| self.tracked(id)) {
                    impact += tx.amount;
                }
            }
        }
        impact
    }

    fn tracked(&self, id: Id) -> bool {
        match self.book.resolve_party(id) {
            Some(Party::Account(_)) => true,
            Some(Party::Ledger(l)) => self.book.ledger_is_rolling(l),
            None => false,
        }
    }
}
