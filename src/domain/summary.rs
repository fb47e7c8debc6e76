//! Point-in-time financial summary: what is held, owed, and owing.

use serde::Serialize;

use super::book::Book;
use super::models::LedgerPosition;
use super::net_worth::BALANCE_EPSILON;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryLine {
    pub name: String,
    pub balance: f64,
}

/// Snapshot of all live positions. Receivable/payable classification
/// follows each ledger's sign and its group's flavor; near-zero
/// balances are settled and left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub accounts: Vec<SummaryLine>,
    pub receivables: Vec<SummaryLine>,
    pub payables: Vec<SummaryLine>,
    pub total_accounts: f64,
    pub total_receivables: f64,
    pub total_payables: f64,
    pub net_worth: f64,
}

pub fn financial_summary(book: &Book) -> FinancialSummary {
    let accounts: Vec<SummaryLine> = book
        .accounts()
        .iter()
        .map(|a| SummaryLine {
            name: a.name.clone(),
            balance: a.balance,
        })
        .collect();

    let mut receivables = Vec::new();
    let mut payables = Vec::new();
    for ledger in book.ledgers() {
        if !book.ledger_is_rolling(ledger) || ledger.balance.abs() <= BALANCE_EPSILON {
            continue;
        }
        let payable_flavor = book.ledger_is_payable(ledger);
        let line = SummaryLine {
            name: ledger.name.clone(),
            balance: ledger.balance.abs(),
        };
        match ledger.position(payable_flavor) {
            LedgerPosition::Receivable => receivables.push(line),
            LedgerPosition::Payable => payables.push(line),
        }
    }

    let total_accounts: f64 = accounts.iter().map(|l| l.balance).sum();
    let total_receivables: f64 = receivables.iter().map(|l| l.balance).sum();
    let total_payables: f64 = payables.iter().map(|l| l.balance).sum();

    FinancialSummary {
        accounts,
        receivables,
        payables,
        total_accounts,
        total_receivables,
        total_payables,
        net_worth: total_accounts + total_receivables - total_payables,
    }
}
