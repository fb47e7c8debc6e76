//! Statement builder: the per-entity audit trail.
//!
//! Reconstructs, for one account or ledger, the ordered running-balance
//! history the statement view and exports consume. Pure read: filter the
//! log to entries the entity participates in, sort by id, fold a running
//! balance seeded at the opening balance.
//!
//! The signed delta folded per row is exactly the delta the balance
//! engine applies for that leg — sign flips for rolling ledgers included,
//! zero for non-rolling ledger legs — so the final row always reconciles
//! with the entity's live balance. That reconciliation is the regression
//! check tying this read path to the authoritative engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::book::Book;
use super::models::{Id, Transaction, TransactionType};

/// Which registry a statement subject lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Account,
    Ledger,
}

/// One line of a statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementRow {
    pub tx_id: Id,
    pub date: NaiveDate,
    /// The other side of the entry: the category for expense/income,
    /// "Transfer: …" for contra.
    pub counterparty: String,
    pub remark: Option<String>,
    pub out_amount: Option<f64>,
    pub in_amount: Option<f64>,
    /// Running balance after this row, seeded at the opening balance.
    pub running_balance: f64,
}

/// A lazily evaluated statement over one entity. `rows()` can be called
/// any number of times; each call restarts the fold from the opening
/// balance.
pub struct Statement<'a> {
    book: &'a Book,
    kind: EntityKind,
    entity_id: Id,
    entity_name: &'a str,
    opening_balance: f64,
    /// Rolling classification, fixed at build time. Always false for
    /// accounts (they use the plain account fold).
    ledger_is_rolling: bool,
    entries: Vec<&'a Transaction>,
}

/// In/out classification of one entry from the statement subject's
/// perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    In,
    Out,
}

impl<'a> Statement<'a> {
    /// Build the statement for an entity. `None` if the entity does not
    /// exist (a deleted entity has no statement, even though its old
    /// transactions survive).
    pub fn build(book: &'a Book, kind: EntityKind, entity_id: Id) -> Option<Statement<'a>> {
        let (entity_name, opening_balance, ledger_is_rolling) = match kind {
            EntityKind::Account => {
                let account = book.account(entity_id)?;
                (account.name.as_str(), account.opening_balance, false)
            }
            EntityKind::Ledger => {
                let ledger = book.ledger(entity_id)?;
                (
                    ledger.name.as_str(),
                    ledger.opening_balance,
                    book.ledger_is_rolling(ledger),
                )
            }
        };

        let mut entries: Vec<&Transaction> = book
            .transactions()
            .iter()
            .filter(|tx| participates(kind, entity_id, tx))
            .collect();
        entries.sort_by_key(|tx| tx.id);

        Some(Statement {
            book,
            kind,
            entity_id,
            entity_name,
            opening_balance,
            ledger_is_rolling,
            entries,
        })
    }

    pub fn entity_name(&self) -> &str {
        self.entity_name
    }

    pub fn opening_balance(&self) -> f64 {
        self.opening_balance
    }

    /// The running-balance trail, oldest first.
    pub fn rows(&self) -> impl Iterator<Item = StatementRow> + '_ {
        self.entries
            .iter()
            .scan(self.opening_balance, move |balance, tx| {
                let direction = self.classify(tx);
                *balance += self.delta(tx, direction);
                Some(StatementRow {
                    tx_id: tx.id,
                    date: tx.date,
                    counterparty: self.counterparty(tx),
                    remark: tx.remark.clone(),
                    out_amount: (direction == Direction::Out).then_some(tx.amount),
                    in_amount: (direction == Direction::In).then_some(tx.amount),
                    running_balance: *balance,
                })
            })
    }

    /// Running balance after the last row; equals the opening balance for
    /// an empty statement. Must match the entity's live balance.
    pub fn closing_balance(&self) -> f64 {
        self.rows()
            .last()
            .map(|row| row.running_balance)
            .unwrap_or(self.opening_balance)
    }

    /// Sum of all out amounts and all in amounts.
    pub fn totals(&self) -> (f64, f64) {
        self.rows().fold((0.0, 0.0), |(out, inn), row| {
            (
                out + row.out_amount.unwrap_or(0.0),
                inn + row.in_amount.unwrap_or(0.0),
            )
        })
    }

    fn classify(&self, tx: &Transaction) -> Direction {
        let id = self.entity_id;
        match self.kind {
            EntityKind::Account => match tx.kind {
                TransactionType::Expense => Direction::Out,
                TransactionType::Income => Direction::In,
                // A contra touching this account is out when we are the
                // source, in when we are the target.
                TransactionType::Contra => {
                    if tx.account_id == id {
                        Direction::Out
                    } else {
                        Direction::In
                    }
                }
            },
            // Ledger perspective stays the user's: out = paid to them,
            // in = received from them.
            EntityKind::Ledger => match tx.kind {
                TransactionType::Expense => Direction::Out,
                TransactionType::Income => Direction::In,
                TransactionType::Contra => {
                    if tx.to_id == Some(id) {
                        Direction::Out
                    } else {
                        Direction::In
                    }
                }
            },
        }
    }

    /// The signed delta the balance engine applies for this entity's leg.
    fn delta(&self, tx: &Transaction, direction: Direction) -> f64 {
        match self.kind {
            EntityKind::Account => match direction {
                Direction::In => tx.amount,
                Direction::Out => -tx.amount,
            },
            EntityKind::Ledger => {
                // Non-rolling ledgers never accumulate: zero delta keeps
                // the trail reconciled with the untouched live balance.
                if !self.ledger_is_rolling {
                    return 0.0;
                }
                match direction {
                    Direction::In => -tx.amount,
                    Direction::Out => tx.amount,
                }
            }
        }
    }

    fn counterparty(&self, tx: &Transaction) -> String {
        if tx.kind == TransactionType::Contra {
            let other_id = if tx.account_id == self.entity_id {
                tx.to_id
            } else {
                Some(tx.account_id)
            };
            return match other_id.and_then(|id| self.book.resolve_party(id)) {
                Some(party) => format!("Transfer: {}", party.name()),
                None => "Transfer".to_string(),
            };
        }
        let related = match self.kind {
            EntityKind::Account => tx.ledger_id.and_then(|id| self.book.ledger(id)).map(|l| l.name.clone()),
            EntityKind::Ledger => self.book.account(tx.account_id).map(|a| a.name.clone()),
        };
        related.unwrap_or_else(|| "-".to_string())
    }
}

fn participates(kind: EntityKind, id: Id, tx: &Transaction) -> bool {
    match kind {
        EntityKind::Account => tx.account_id == id || tx.to_id == Some(id),
        EntityKind::Ledger => {
            tx.ledger_id == Some(id) || tx.account_id == id || tx.to_id == Some(id)
        }
    }
}
