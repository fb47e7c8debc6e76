//! # ledgerbook
//!
//! Core engine of a personal bookkeeping tool.
//!
//! The crate keeps a registry of cash/bank **accounts** and categorized
//! **ledgers** (some of which behave like running IOUs), derives their
//! balances from a mutable transaction history, and keeps incremental
//! updates, edits, deletions and full recomputation mutually consistent.
//! Rendering, authentication and cloud sync live outside this crate; the
//! only collaborator contract is the snapshot store in [`storage`].
//!
//! Entry point for hosts is [`BookService`]: open it over a store, then
//! drive it with the command structs in [`domain::commands`].

pub mod domain;
pub mod error;
pub mod storage;

pub use domain::book::{Book, Snapshot};
pub use domain::book_service::BookService;
pub use domain::models::id::Id;
pub use error::ValidationError;
