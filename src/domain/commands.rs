//! Domain-level command types.
//!
//! These structs are the inputs [`BookService`](super::book_service::BookService)
//! methods take. A frontend maps whatever its forms produce into these
//! before calling the service.

pub mod registry {
    use crate::domain::models::Id;

    /// Input for creating an account.
    #[derive(Debug, Clone)]
    pub struct CreateAccountCommand {
        pub name: String,
        pub opening_balance: f64,
    }

    /// Input for renaming an account or restating its opening balance.
    /// `None` fields are left untouched.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateAccountCommand {
        pub name: Option<String>,
        pub opening_balance: Option<f64>,
    }

    /// Input for creating a ledger group.
    #[derive(Debug, Clone)]
    pub struct CreateLedgerGroupCommand {
        pub name: String,
        pub rolling: bool,
        pub payable: bool,
    }

    /// Input for updating a ledger group.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateLedgerGroupCommand {
        pub name: Option<String>,
        pub rolling: Option<bool>,
        pub payable: Option<bool>,
    }

    /// Input for creating a ledger under a group.
    #[derive(Debug, Clone)]
    pub struct CreateLedgerCommand {
        pub name: String,
        pub group_id: Id,
        pub opening_balance: f64,
    }

    /// Input for updating a ledger.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateLedgerCommand {
        pub name: Option<String>,
        pub group_id: Option<Id>,
        pub opening_balance: Option<f64>,
    }

    /// Which registry an id refers to, for operations shared across
    /// all three.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum RegistryKind {
        Account,
        LedgerGroup,
        Ledger,
    }
}

pub mod transactions {
    use chrono::NaiveDate;

    use crate::domain::models::{Id, TransactionType};

    /// Input for recording a new transaction. `to_id` is required for
    /// transfers and ignored otherwise; `ledger_id` is the
    /// categorization leg of an expense or income.
    #[derive(Debug, Clone)]
    pub struct CreateTransactionCommand {
        pub date: NaiveDate,
        pub kind: TransactionType,
        pub account_id: Id,
        pub ledger_id: Option<Id>,
        pub to_id: Option<Id>,
        pub amount: f64,
        pub remark: Option<String>,
    }

    /// Input for rewriting an existing transaction. Every field is
    /// replaced; the entry keeps its id and position in the log.
    #[derive(Debug, Clone)]
    pub struct UpdateTransactionCommand {
        pub date: NaiveDate,
        pub kind: TransactionType,
        pub account_id: Id,
        pub ledger_id: Option<Id>,
        pub to_id: Option<Id>,
        pub amount: f64,
        pub remark: Option<String>,
    }
}
