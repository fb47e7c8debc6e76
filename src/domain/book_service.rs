//! The public surface of the crate. `BookService` owns the whole book
//! behind one lock, runs validation and the balance engine on every
//! mutation, and hands snapshots to the background persister. Callers
//! get owned report structs back, never references into the locked
//! state.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use log::info;

use crate::domain::balance_engine::{apply, recompute, reverse};
use crate::domain::book::Book;
use crate::domain::book::Snapshot;
use crate::domain::commands::registry::{
    CreateAccountCommand, CreateLedgerCommand, CreateLedgerGroupCommand, RegistryKind,
    UpdateAccountCommand, UpdateLedgerCommand, UpdateLedgerGroupCommand,
};
use crate::domain::commands::transactions::{CreateTransactionCommand, UpdateTransactionCommand};
use crate::domain::models::{
    Account, Id, Ledger, LedgerGroup, Transaction, TransactionType,
};
use crate::domain::net_worth::{NetWorthRow, NetWorthStatement};
use crate::domain::statement_builder::{EntityKind, Statement, StatementRow};
use crate::domain::summary::{financial_summary, FinancialSummary};
use crate::domain::transfer_validator::validate_contra;
use crate::error::ValidationError;
use crate::storage::{Persister, SnapshotStore};

/// Owned form of a per-entity statement, safe to hand across the lock.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementReport {
    pub entity_name: String,
    pub opening_balance: f64,
    pub closing_balance: f64,
    pub total_out: f64,
    pub total_in: f64,
    pub rows: Vec<StatementRow>,
}

/// Owned form of the net worth trail.
#[derive(Debug, Clone, PartialEq)]
pub struct NetWorthReport {
    pub opening_position: f64,
    pub closing_position: f64,
    pub total_gain: f64,
    pub total_loss: f64,
    pub rows: Vec<NetWorthRow>,
}

pub struct BookService {
    book: Mutex<Book>,
    persister: Persister,
}

impl BookService {
    /// Load the book from the store (an absent snapshot means a fresh
    /// empty book) and recompute every balance. Recomputing on open is
    /// the recovery path: whatever balances the snapshot carried, the
    /// log is authoritative.
    pub fn open(store: Arc<dyn SnapshotStore>) -> Result<Self> {
        let snapshot = store.load()?.unwrap_or_default();
        let mut book = Book::from_snapshot(snapshot);
        recompute(&mut book);
        info!(
            "book opened: {} accounts, {} ledgers, {} transactions",
            book.accounts().len(),
            book.ledgers().len(),
            book.transactions().len()
        );
        Ok(Self {
            book: Mutex::new(book),
            persister: Persister::new(store),
        })
    }

    // --- accounts ---

    pub fn create_account(&self, cmd: CreateAccountCommand) -> Result<Account> {
        require_name(&cmd.name)?;
        let mut book = self.book.lock().unwrap();
        let id = book.next_id();
        let account = Account::new(id, cmd.name, cmd.opening_balance);
        info!("creating account '{}' ({})", account.name, account.id);
        book.accounts.push(account.clone());
        self.persist(&book);
        Ok(account)
    }

    pub fn update_account(&self, id: Id, cmd: UpdateAccountCommand) -> Result<Account> {
        let mut book = self.book.lock().unwrap();
        let account = book
            .account_mut(id)
            .ok_or_else(|| anyhow!("no account with id {id}"))?;
        if let Some(name) = cmd.name {
            require_name(&name)?;
            account.name = name;
        }
        let opening_changed = match cmd.opening_balance {
            Some(opening) if opening != account.opening_balance => {
                account.opening_balance = opening;
                true
            }
            _ => false,
        };
        if opening_changed {
            recompute(&mut book);
        }
        let account = book
            .account(id)
            .cloned()
            .ok_or_else(|| anyhow!("no account with id {id}"))?;
        self.persist(&book);
        Ok(account)
    }

    pub fn delete_account(&self, id: Id) -> Result<()> {
        let mut book = self.book.lock().unwrap();
        let before = book.accounts.len();
        book.accounts.retain(|a| a.id != id);
        if book.accounts.len() == before {
            return Err(anyhow!("no account with id {id}"));
        }
        // Transactions that referenced it stay in the log; their legs
        // are skipped from now on.
        info!("deleted account {id}");
        self.persist(&book);
        Ok(())
    }

    // --- ledger groups ---

    pub fn create_ledger_group(&self, cmd: CreateLedgerGroupCommand) -> Result<LedgerGroup> {
        require_name(&cmd.name)?;
        let mut book = self.book.lock().unwrap();
        let id = book.next_id();
        let group = LedgerGroup::new(id, cmd.name, cmd.rolling, cmd.payable);
        info!("creating ledger group '{}' ({})", group.name, group.id);
        book.ledger_groups.push(group.clone());
        self.persist(&book);
        Ok(group)
    }

    pub fn update_ledger_group(&self, id: Id, cmd: UpdateLedgerGroupCommand) -> Result<LedgerGroup> {
        let mut book = self.book.lock().unwrap();
        let group = book
            .ledger_group_mut(id)
            .ok_or_else(|| anyhow!("no ledger group with id {id}"))?;
        if let Some(name) = cmd.name {
            require_name(&name)?;
            group.name = name;
        }
        let mut classification_changed = false;
        if let Some(rolling) = cmd.rolling {
            classification_changed |= group.rolling != rolling;
            group.rolling = rolling;
        }
        if let Some(payable) = cmd.payable {
            group.payable = payable;
        }
        // Flipping `rolling` reclassifies every ledger under the group.
        if classification_changed {
            recompute(&mut book);
        }
        let group = book
            .ledger_group(id)
            .cloned()
            .ok_or_else(|| anyhow!("no ledger group with id {id}"))?;
        self.persist(&book);
        Ok(group)
    }

    pub fn delete_ledger_group(&self, id: Id) -> Result<()> {
        let mut book = self.book.lock().unwrap();
        let before = book.ledger_groups.len();
        book.ledger_groups.retain(|g| g.id != id);
        if book.ledger_groups.len() == before {
            return Err(anyhow!("no ledger group with id {id}"));
        }
        // Its ledgers survive but are non-rolling from now on.
        recompute(&mut book);
        info!("deleted ledger group {id}");
        self.persist(&book);
        Ok(())
    }

    // --- ledgers ---

    pub fn create_ledger(&self, cmd: CreateLedgerCommand) -> Result<Ledger> {
        require_name(&cmd.name)?;
        let mut book = self.book.lock().unwrap();
        if book.ledger_group(cmd.group_id).is_none() {
            return Err(anyhow!("no ledger group with id {}", cmd.group_id));
        }
        let id = book.next_id();
        let ledger = Ledger::new(id, cmd.name, cmd.group_id, cmd.opening_balance);
        info!("creating ledger '{}' ({})", ledger.name, ledger.id);
        book.ledgers.push(ledger.clone());
        self.persist(&book);
        Ok(ledger)
    }

    pub fn update_ledger(&self, id: Id, cmd: UpdateLedgerCommand) -> Result<Ledger> {
        let mut book = self.book.lock().unwrap();
        if let Some(group_id) = cmd.group_id {
            if book.ledger_group(group_id).is_none() {
                return Err(anyhow!("no ledger group with id {group_id}"));
            }
        }
        let ledger = book
            .ledger_mut(id)
            .ok_or_else(|| anyhow!("no ledger with id {id}"))?;
        if let Some(name) = cmd.name {
            require_name(&name)?;
            ledger.name = name;
        }
        let mut needs_recompute = false;
        if let Some(group_id) = cmd.group_id {
            // Moving between groups can flip the rolling classification.
            needs_recompute |= ledger.group_id != group_id;
            ledger.group_id = group_id;
        }
        if let Some(opening) = cmd.opening_balance {
            needs_recompute |= ledger.opening_balance != opening;
            ledger.opening_balance = opening;
        }
        if needs_recompute {
            recompute(&mut book);
        }
        let ledger = book
            .ledger(id)
            .cloned()
            .ok_or_else(|| anyhow!("no ledger with id {id}"))?;
        self.persist(&book);
        Ok(ledger)
    }

    pub fn delete_ledger(&self, id: Id) -> Result<()> {
        let mut book = self.book.lock().unwrap();
        let before = book.ledgers.len();
        book.ledgers.retain(|l| l.id != id);
        if book.ledgers.len() == before {
            return Err(anyhow!("no ledger with id {id}"));
        }
        info!("deleted ledger {id}");
        self.persist(&book);
        Ok(())
    }

    /// Flip an entity's enabled flag; returns the new state. Disabled
    /// entities keep their balances and history, they are only hidden
    /// from pickers.
    pub fn toggle_enabled(&self, kind: RegistryKind, id: Id) -> Result<bool> {
        let mut book = self.book.lock().unwrap();
        let enabled = match kind {
            RegistryKind::Account => {
                let account = book
                    .account_mut(id)
                    .ok_or_else(|| anyhow!("no account with id {id}"))?;
                account.enabled = !account.enabled;
                account.enabled
            }
            RegistryKind::LedgerGroup => {
                let group = book
                    .ledger_group_mut(id)
                    .ok_or_else(|| anyhow!("no ledger group with id {id}"))?;
                group.enabled = !group.enabled;
                group.enabled
            }
            RegistryKind::Ledger => {
                let ledger = book
                    .ledger_mut(id)
                    .ok_or_else(|| anyhow!("no ledger with id {id}"))?;
                ledger.enabled = !ledger.enabled;
                ledger.enabled
            }
        };
        self.persist(&book);
        Ok(enabled)
    }

    // --- transactions ---

    pub fn create_transaction(&self, cmd: CreateTransactionCommand) -> Result<Transaction> {
        let mut book = self.book.lock().unwrap();
        validate_transaction_fields(
            &book,
            cmd.kind,
            cmd.ledger_id,
            cmd.to_id,
            cmd.account_id,
            cmd.amount,
            None,
        )?;
        let tx = Transaction {
            id: book.next_id(),
            date: cmd.date,
            kind: cmd.kind,
            account_id: cmd.account_id,
            ledger_id: cmd.ledger_id,
            to_id: cmd.to_id,
            amount: cmd.amount,
            remark: cmd.remark,
        };
        info!("recording {:?} transaction {} for {}", tx.kind, tx.id, tx.amount);
        apply(&mut book, &tx);
        book.transactions.push(tx.clone());
        self.persist(&book);
        Ok(tx)
    }

    /// Rewrite a transaction in place. Validation runs first, against
    /// pre-reversal balances (the settlement check credits the original
    /// amount back itself); only then is the old effect reversed and
    /// the new one applied.
    pub fn update_transaction(&self, id: Id, cmd: UpdateTransactionCommand) -> Result<Transaction> {
        let mut book = self.book.lock().unwrap();
        let original = book
            .transaction(id)
            .cloned()
            .ok_or_else(|| anyhow!("no transaction with id {id}"))?;
        validate_transaction_fields(
            &book,
            cmd.kind,
            cmd.ledger_id,
            cmd.to_id,
            cmd.account_id,
            cmd.amount,
            Some(&original),
        )?;
        let updated = Transaction {
            id,
            date: cmd.date,
            kind: cmd.kind,
            account_id: cmd.account_id,
            ledger_id: cmd.ledger_id,
            to_id: cmd.to_id,
            amount: cmd.amount,
            remark: cmd.remark,
        };
        reverse(&mut book, &original);
        apply(&mut book, &updated);
        if let Some(slot) = book.transactions.iter_mut().find(|t| t.id == id) {
            *slot = updated.clone();
        }
        info!("updated transaction {id}");
        self.persist(&book);
        Ok(updated)
    }

    pub fn delete_transaction(&self, id: Id) -> Result<()> {
        let mut book = self.book.lock().unwrap();
        let tx = book
            .transaction(id)
            .cloned()
            .ok_or_else(|| anyhow!("no transaction with id {id}"))?;
        reverse(&mut book, &tx);
        book.transactions.retain(|t| t.id != id);
        info!("deleted transaction {id}");
        self.persist(&book);
        Ok(())
    }

    /// Rebuild every balance from openings plus the full log.
    pub fn recompute_all(&self) -> Result<()> {
        let mut book = self.book.lock().unwrap();
        recompute(&mut book);
        self.persist(&book);
        Ok(())
    }

    // --- reports ---

    /// Running-balance statement for one entity; `None` if it does not
    /// exist.
    pub fn statement_for(&self, kind: EntityKind, id: Id) -> Option<StatementReport> {
        let book = self.book.lock().unwrap();
        let statement = Statement::build(&book, kind, id)?;
        let (total_out, total_in) = statement.totals();
        Some(StatementReport {
            entity_name: statement.entity_name().to_string(),
            opening_balance: statement.opening_balance(),
            closing_balance: statement.closing_balance(),
            total_out,
            total_in,
            rows: statement.rows().collect(),
        })
    }

    pub fn net_worth_statement(&self) -> NetWorthReport {
        let book = self.book.lock().unwrap();
        let statement = NetWorthStatement::build(&book);
        let (total_gain, total_loss) = statement.totals();
        NetWorthReport {
            opening_position: statement.opening_position(),
            closing_position: statement.closing_position(),
            total_gain,
            total_loss,
            rows: statement.rows().collect(),
        }
    }

    pub fn summary(&self) -> FinancialSummary {
        let book = self.book.lock().unwrap();
        financial_summary(&book)
    }

    /// A point-in-time copy of the whole book.
    pub fn snapshot(&self) -> Snapshot {
        self.book.lock().unwrap().snapshot()
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.book.lock().unwrap().accounts().to_vec()
    }

    pub fn ledger_groups(&self) -> Vec<LedgerGroup> {
        self.book.lock().unwrap().ledger_groups().to_vec()
    }

    pub fn ledgers(&self) -> Vec<Ledger> {
        self.book.lock().unwrap().ledgers().to_vec()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.book.lock().unwrap().transactions().to_vec()
    }

    /// Whether the most recent attempted save failed.
    pub fn last_save_failed(&self) -> bool {
        self.persister.last_save_failed()
    }

    /// Wait for every queued save to hit the store.
    pub fn flush(&self) {
        self.persister.flush();
    }

    fn persist(&self, book: &Book) {
        self.persister.request_save(book.snapshot());
    }
}

fn require_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingField("name"));
    }
    Ok(())
}

/// Shared pre-commit checks for transaction create and edit. Nothing is
/// mutated on failure. Only field presence and the contra rules are
/// checked — whether the referenced entities still exist is not: a
/// dangling leg is skipped at apply time, never grounds for rejection,
/// so history stays editable after its entities are deleted.
fn validate_transaction_fields(
    book: &Book,
    kind: TransactionType,
    ledger_id: Option<Id>,
    to_id: Option<Id>,
    source_id: Id,
    amount: f64,
    original: Option<&Transaction>,
) -> Result<()> {
    if amount <= 0.0 {
        return Err(ValidationError::NonPositiveAmount.into());
    }
    match kind {
        TransactionType::Expense | TransactionType::Income => {
            ledger_id.ok_or(ValidationError::MissingField("ledger"))?;
        }
        TransactionType::Contra => {
            let target = to_id.ok_or(ValidationError::MissingField("to"))?;
            validate_contra(book, source_id, target, amount, original)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStore;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    const EPS: f64 = 1e-9;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    struct Fixture {
        service: BookService,
        store: Arc<JsonStore>,
        _dir: TempDir,
        kfh: Id,
        nbk: Id,
        groceries: Id,
        hamad: Id,
    }

    /// Fresh book with two accounts, a plain expense category and a
    /// receivable-style rolling ledger, all created through the public
    /// surface.
    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(JsonStore::new(dir.path().join("book.json")).unwrap());
        let service = BookService::open(store.clone()).unwrap();

        let kfh = service
            .create_account(CreateAccountCommand {
                name: "KFH".to_string(),
                opening_balance: 500.0,
            })
            .unwrap()
            .id;
        let nbk = service
            .create_account(CreateAccountCommand {
                name: "NBK".to_string(),
                opening_balance: 1200.0,
            })
            .unwrap()
            .id;
        let expense_group = service
            .create_ledger_group(CreateLedgerGroupCommand {
                name: "Indirect Expense".to_string(),
                rolling: false,
                payable: false,
            })
            .unwrap()
            .id;
        let investments = service
            .create_ledger_group(CreateLedgerGroupCommand {
                name: "Investments".to_string(),
                rolling: true,
                payable: false,
            })
            .unwrap()
            .id;
        let groceries = service
            .create_ledger(CreateLedgerCommand {
                name: "Groceries".to_string(),
                group_id: expense_group,
                opening_balance: 0.0,
            })
            .unwrap()
            .id;
        let hamad = service
            .create_ledger(CreateLedgerCommand {
                name: "Hamad".to_string(),
                group_id: investments,
                opening_balance: 0.0,
            })
            .unwrap()
            .id;

        Fixture {
            service,
            store,
            _dir: dir,
            kfh,
            nbk,
            groceries,
            hamad,
        }
    }

    fn balance_of_account(service: &BookService, id: Id) -> f64 {
        service
            .accounts()
            .into_iter()
            .find(|a| a.id == id)
            .unwrap()
            .balance
    }

    fn balance_of_ledger(service: &BookService, id: Id) -> f64 {
        service
            .ledgers()
            .into_iter()
            .find(|l| l.id == id)
            .unwrap()
            .balance
    }

    fn expense(f: &Fixture, ledger: Id, amount: f64) -> Transaction {
        f.service
            .create_transaction(CreateTransactionCommand {
                date: date(),
                kind: TransactionType::Expense,
                account_id: f.kfh,
                ledger_id: Some(ledger),
                to_id: None,
                amount,
                remark: None,
            })
            .unwrap()
    }

    #[test]
    fn expense_moves_balances_and_persists() {
        let f = fixture();
        expense(&f, f.groceries, 40.0);

        assert!((balance_of_account(&f.service, f.kfh) - 460.0).abs() < EPS);
        assert!((balance_of_ledger(&f.service, f.groceries)).abs() < EPS);

        f.service.flush();
        assert!(!f.service.last_save_failed());
        let stored = f.store.load().unwrap().unwrap();
        assert_eq!(stored.transactions.len(), 1);
        assert!((stored.accounts[0].balance - 460.0).abs() < EPS);
    }

    #[test]
    fn lending_raises_the_receivable() {
        let f = fixture();
        expense(&f, f.hamad, 80.0);

        assert!((balance_of_account(&f.service, f.kfh) - 420.0).abs() < EPS);
        assert!((balance_of_ledger(&f.service, f.hamad) - 80.0).abs() < EPS);
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        let f = fixture();
        let err = f
            .service
            .create_transaction(CreateTransactionCommand {
                date: date(),
                kind: TransactionType::Expense,
                account_id: f.kfh,
                ledger_id: Some(f.groceries),
                to_id: None,
                amount: 0.0,
                remark: None,
            })
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::NonPositiveAmount)
        ));
        assert!(f.service.transactions().is_empty());
    }

    #[test]
    fn contra_without_target_is_rejected() {
        let f = fixture();
        let err = f
            .service
            .create_transaction(CreateTransactionCommand {
                date: date(),
                kind: TransactionType::Contra,
                account_id: f.kfh,
                ledger_id: None,
                to_id: None,
                amount: 10.0,
                remark: None,
            })
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::MissingField("to"))
        ));
    }

    #[test]
    fn expense_without_ledger_is_rejected() {
        let f = fixture();
        let err = f
            .service
            .create_transaction(CreateTransactionCommand {
                date: date(),
                kind: TransactionType::Expense,
                account_id: f.kfh,
                ledger_id: None,
                to_id: None,
                amount: 40.0,
                remark: None,
            })
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::MissingField("ledger"))
        ));
        assert!(f.service.transactions().is_empty());
    }

    #[test]
    fn history_stays_editable_after_its_account_is_deleted() {
        let f = fixture();
        let tx = expense(&f, f.groceries, 40.0);
        f.service.delete_account(f.kfh).unwrap();

        // A remark-only fix to the orphaned entry must merge; the
        // dangling account leg is skipped, not grounds for rejection.
        let updated = f
            .service
            .update_transaction(
                tx.id,
                UpdateTransactionCommand {
                    date: tx.date,
                    kind: tx.kind,
                    account_id: tx.account_id,
                    ledger_id: tx.ledger_id,
                    to_id: None,
                    amount: tx.amount,
                    remark: Some("receipt found".to_string()),
                },
            )
            .unwrap();
        assert_eq!(updated.remark.as_deref(), Some("receipt found"));
        assert!((balance_of_account(&f.service, f.nbk) - 1200.0).abs() < EPS);
    }

    #[test]
    fn contra_tolerates_a_dangling_counterparty() {
        let f = fixture();
        expense(&f, f.hamad, 80.0);
        f.service.delete_ledger(f.hamad).unwrap();

        // Settling against the deleted ledger still records; only the
        // surviving leg moves a balance.
        f.service
            .create_transaction(CreateTransactionCommand {
                date: date(),
                kind: TransactionType::Contra,
                account_id: f.hamad,
                ledger_id: None,
                to_id: Some(f.kfh),
                amount: 30.0,
                remark: None,
            })
            .unwrap();
        assert!((balance_of_account(&f.service, f.kfh) - 450.0).abs() < EPS);
    }

    #[test]
    fn full_settlement_reaches_exact_zero_and_over_settlement_is_refused() {
        let f = fixture();
        expense(&f, f.hamad, 100.0);

        let over = f.service.create_transaction(CreateTransactionCommand {
            date: date(),
            kind: TransactionType::Contra,
            account_id: f.hamad,
            ledger_id: None,
            to_id: Some(f.kfh),
            amount: 150.0,
            remark: None,
        });
        assert!(matches!(
            over.unwrap_err().downcast_ref::<ValidationError>(),
            Some(ValidationError::OverSettlement)
        ));
        // Refusal leaves every balance untouched.
        assert!((balance_of_ledger(&f.service, f.hamad) - 100.0).abs() < EPS);

        f.service
            .create_transaction(CreateTransactionCommand {
                date: date(),
                kind: TransactionType::Contra,
                account_id: f.hamad,
                ledger_id: None,
                to_id: Some(f.kfh),
                amount: 100.0,
                remark: Some("settled in full".to_string()),
            })
            .unwrap();
        assert!((balance_of_ledger(&f.service, f.hamad)).abs() < EPS);
        assert!((balance_of_account(&f.service, f.kfh) - 500.0).abs() < EPS);
    }

    #[test]
    fn self_transfer_is_rejected() {
        let f = fixture();
        let err = f
            .service
            .create_transaction(CreateTransactionCommand {
                date: date(),
                kind: TransactionType::Contra,
                account_id: f.kfh,
                ledger_id: None,
                to_id: Some(f.kfh),
                amount: 10.0,
                remark: None,
            })
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::SelfTransfer)
        ));
    }

    #[test]
    fn edit_keeps_the_id_and_lands_on_recomputed_balances() {
        let f = fixture();
        let tx = expense(&f, f.groceries, 40.0);

        let updated = f
            .service
            .update_transaction(
                tx.id,
                UpdateTransactionCommand {
                    date: date(),
                    kind: TransactionType::Expense,
                    account_id: f.nbk,
                    ledger_id: Some(f.groceries),
                    to_id: None,
                    amount: 55.0,
                    remark: None,
                },
            )
            .unwrap();

        assert_eq!(updated.id, tx.id);
        assert!((balance_of_account(&f.service, f.kfh) - 500.0).abs() < EPS);
        assert!((balance_of_account(&f.service, f.nbk) - 1145.0).abs() < EPS);

        // Incremental result matches a full replay.
        f.service.recompute_all().unwrap();
        assert!((balance_of_account(&f.service, f.nbk) - 1145.0).abs() < EPS);
    }

    #[test]
    fn edit_of_a_full_settlement_can_reuse_its_own_amount() {
        let f = fixture();
        expense(&f, f.hamad, 100.0);
        let settle = f
            .service
            .create_transaction(CreateTransactionCommand {
                date: date(),
                kind: TransactionType::Contra,
                account_id: f.hamad,
                ledger_id: None,
                to_id: Some(f.kfh),
                amount: 100.0,
                remark: None,
            })
            .unwrap();

        // Balance is 0, but re-settling 60 of the original 100 is fine.
        f.service
            .update_transaction(
                settle.id,
                UpdateTransactionCommand {
                    date: date(),
                    kind: TransactionType::Contra,
                    account_id: f.hamad,
                    ledger_id: None,
                    to_id: Some(f.kfh),
                    amount: 60.0,
                    remark: None,
                },
            )
            .unwrap();
        assert!((balance_of_ledger(&f.service, f.hamad) - 40.0).abs() < EPS);
    }

    #[test]
    fn delete_restores_prior_balances() {
        let f = fixture();
        let tx = expense(&f, f.groceries, 40.0);
        f.service.delete_transaction(tx.id).unwrap();

        assert!((balance_of_account(&f.service, f.kfh) - 500.0).abs() < EPS);
        assert!(f.service.transactions().is_empty());
        assert!(f.service.delete_transaction(tx.id).is_err());
    }

    #[test]
    fn restating_an_opening_balance_recomputes() {
        let f = fixture();
        expense(&f, f.groceries, 40.0);

        f.service
            .update_account(
                f.kfh,
                UpdateAccountCommand {
                    name: None,
                    opening_balance: Some(800.0),
                },
            )
            .unwrap();
        assert!((balance_of_account(&f.service, f.kfh) - 760.0).abs() < EPS);
    }

    #[test]
    fn moving_a_ledger_between_groups_recomputes() {
        let f = fixture();
        expense(&f, f.groceries, 40.0);
        assert!((balance_of_ledger(&f.service, f.groceries)).abs() < EPS);

        let investments = f
            .service
            .ledger_groups()
            .into_iter()
            .find(|g| g.rolling)
            .unwrap()
            .id;
        f.service
            .update_ledger(
                f.groceries,
                UpdateLedgerCommand {
                    group_id: Some(investments),
                    ..UpdateLedgerCommand::default()
                },
            )
            .unwrap();
        // Now rolling: the replay credits the old expense to it.
        assert!((balance_of_ledger(&f.service, f.groceries) - 40.0).abs() < EPS);
    }

    #[test]
    fn toggle_enabled_flips_and_unknown_ids_error() {
        let f = fixture();
        assert!(!f.service.toggle_enabled(RegistryKind::Account, f.kfh).unwrap());
        assert!(f.service.toggle_enabled(RegistryKind::Account, f.kfh).unwrap());
        assert!(f
            .service
            .toggle_enabled(RegistryKind::Ledger, Id::new(424242))
            .is_err());
    }

    #[test]
    fn opening_a_stale_snapshot_recomputes_from_the_log() {
        let f = fixture();
        let tx = expense(&f, f.groceries, 40.0);
        f.service.flush();

        // Corrupt the derived balances on disk; the log survives.
        let mut stored = f.store.load().unwrap().unwrap();
        for account in &mut stored.accounts {
            account.balance = -1.0;
        }
        f.store.save(&stored).unwrap();

        let reopened = BookService::open(f.store.clone()).unwrap();
        assert!((balance_of_account(&reopened, f.kfh) - 460.0).abs() < EPS);
        assert!(reopened.transactions().iter().any(|t| t.id == tx.id));
    }

    #[test]
    fn statement_report_reconciles_with_live_balance() {
        let f = fixture();
        expense(&f, f.groceries, 40.0);
        expense(&f, f.hamad, 80.0);

        let report = f
            .service
            .statement_for(EntityKind::Account, f.kfh)
            .unwrap();
        assert_eq!(report.entity_name, "KFH");
        assert_eq!(report.rows.len(), 2);
        assert!((report.total_out - 120.0).abs() < EPS);
        assert!(
            (report.closing_balance - balance_of_account(&f.service, f.kfh)).abs() < EPS
        );

        assert!(f
            .service
            .statement_for(EntityKind::Ledger, Id::new(424242))
            .is_none());
    }

    #[test]
    fn net_worth_and_summary_agree_after_mixed_activity() {
        let f = fixture();
        expense(&f, f.groceries, 40.0);
        expense(&f, f.hamad, 80.0);

        let net_worth = f.service.net_worth_statement();
        assert!((net_worth.opening_position - 1700.0).abs() < EPS);
        // Only the groceries spend left the tracked universe.
        assert_eq!(net_worth.rows.len(), 1);
        assert!((net_worth.closing_position - 1660.0).abs() < EPS);

        let summary = f.service.summary();
        assert!((summary.total_accounts - 1580.0).abs() < EPS);
        assert!((summary.total_receivables - 80.0).abs() < EPS);
        assert!((summary.net_worth - 1660.0).abs() < EPS);
    }

    #[test]
    fn blank_names_are_rejected() {
        let f = fixture();
        let err = f
            .service
            .create_account(CreateAccountCommand {
                name: "  ".to_string(),
                opening_balance: 0.0,
            })
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::MissingField("name"))
        ));
    }
}
