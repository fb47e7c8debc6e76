//! # Domain Module
//!
//! All business logic of the bookkeeping core. Everything in here is
//! UI-agnostic and storage-agnostic: the only way data leaves the domain
//! is through the read-only report builders, and the only way it is made
//! durable is the snapshot handed to the storage layer.
//!
//! ## Module organization
//!
//! - **models**: accounts, ledger groups, ledgers, transactions, ids
//! - **book**: the registry + transaction log state struct
//! - **balance_engine**: apply/reverse one transaction, recompute all
//! - **transfer_validator**: settlement-safety checks for contra entries
//! - **statement_builder**: per-entity running-balance trails
//! - **net_worth**: the global running-total trail
//! - **summary**: net-position snapshot (receivables / payables)
//! - **book_service**: the public surface consumed by presentation hosts

pub mod balance_engine;
pub mod book;
pub mod book_service;
pub mod commands;
pub mod models;
pub mod net_worth;
pub mod statement_builder;
pub mod summary;
pub mod transfer_validator;
