//! Transfer validator: settlement-safety checks for contra transactions.
//!
//! Runs against live balances before a contra entry is committed (create
//! or edit); on rejection nothing has been mutated. Three rules:
//!
//! 1. Source and target must be different entities.
//! 2. A rolling-ledger source must not be settled past its outstanding
//!    balance. When validating an edit whose original entry drew from the
//!    same source, the original amount is added back to the available
//!    capacity first — the edit may reuse what it already consumed.
//! 3. A transfer landing on a rolling ledger from another ledger-type
//!    entity must stay within one sign class: net-receivable to
//!    net-payable (or vice versa) is blocked.

use super::book::{Book, Party};
use super::models::{Id, Transaction};
use crate::error::ValidationError;

/// Float slack when comparing an amount against an outstanding balance.
const SETTLEMENT_TOLERANCE: f64 = 0.001;

/// Check a contra draft against the live book. `original` is the entry
/// being edited, if any.
pub(crate) fn validate_contra(
    book: &Book,
    source_id: Id,
    target_id: Id,
    amount: f64,
    original: Option<&Transaction>,
) -> Result<(), ValidationError> {
    if source_id == target_id {
        return Err(ValidationError::SelfTransfer);
    }

    let source = book.resolve_party(source_id);
    let target = book.resolve_party(target_id);

    // No over-settlement of a rolling-ledger source.
    if let Some(Party::Ledger(ledger)) = source {
        if book.ledger_is_rolling(ledger) {
            let mut available = ledger.balance.abs();
            if let Some(original) = original {
                if original.account_id == source_id {
                    available += original.amount;
                }
            }
            if amount > available + SETTLEMENT_TOLERANCE {
                return Err(ValidationError::OverSettlement);
            }
        }
    }

    // No ledger-to-ledger transfer across sign classes.
    if let (Some(Party::Ledger(from)), Some(Party::Ledger(to))) = (source, target) {
        if book.ledger_is_rolling(to) {
            let same_sign = (from.balance >= 0.0 && to.balance >= 0.0)
                || (from.balance <= 0.0 && to.balance <= 0.0);
            if !same_sign {
                return Err(ValidationError::CrossCategoryTransfer);
            }
        }
    }

    Ok(())
}
