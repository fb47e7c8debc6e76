//! Typed rejection reasons for mutations.
//!
//! Every variant is raised *before* any balance is touched; a failed
//! validation never leaves partial state behind. Dangling entity
//! references are deliberately not an error anywhere in the engine —
//! affected legs are skipped instead (see `balance_engine`).

use thiserror::Error;

/// Reason a transaction mutation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A field the transaction type requires was not supplied.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Amounts must be strictly positive.
    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    /// Contra source and target refer to the same entity.
    #[error("source and target cannot be the same")]
    SelfTransfer,

    /// Contra amount exceeds the outstanding balance of its source ledger.
    #[error("amount exceeds outstanding balance")]
    OverSettlement,

    /// Contra between a net-payable and a net-receivable ledger.
    #[error("cannot transfer between payable and receivable")]
    CrossCategoryTransfer,
}
