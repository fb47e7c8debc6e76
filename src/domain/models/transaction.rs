//! Domain model for a transaction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::id::Id;

/// What a transaction does to the entities it references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money leaves an account, posted against a ledger category.
    Expense,
    /// Money enters an account, posted against a ledger category.
    Income,
    /// Internal transfer between two balance-bearing entities.
    Contra,
}

/// One entry in the transaction log.
///
/// The id is unique and strictly increasing across the log, and doubles
/// as the canonical replay order. For expense/income, `account_id` names
/// the account and `ledger_id` the category. For contra, `account_id` is
/// the **source** and `to_id` the **target**, each resolved first against
/// accounts, else against ledgers.
///
/// References are not integrity-checked: deleting an entity leaves old
/// transactions pointing at a missing id, and such legs are simply
/// skipped wherever effects are computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Id,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub account_id: Id,
    pub ledger_id: Option<Id>,
    pub to_id: Option<Id>,
    pub amount: f64,
    pub remark: Option<String>,
}
