//! Domain models: the entities balances attach to, and the transactions
//! that move them.

pub mod account;
pub mod id;
pub mod ledger;
pub mod transaction;

pub use account::Account;
pub use id::{Id, IdGenerator};
pub use ledger::{Ledger, LedgerGroup, LedgerPosition};
pub use transaction::{Transaction, TransactionType};
