//! Background persister. Mutations hand a snapshot to a worker thread
//! and return immediately; the worker writes snapshots in order, logs
//! failures, and never retries or rolls anything back. `flush` waits
//! for the queue to drain, which tests and shutdown paths use.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, error};

use crate::domain::book::Snapshot;
use crate::storage::traits::SnapshotStore;

enum Message {
    Save(Snapshot),
    Flush(mpsc::Sender<()>),
    Shutdown,
}

pub struct Persister {
    sender: mpsc::Sender<Message>,
    last_save_failed: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl Persister {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        let (sender, receiver) = mpsc::channel::<Message>();
        let last_save_failed = Arc::new(AtomicBool::new(false));
        let failed = last_save_failed.clone();
        let worker = thread::Builder::new()
            .name("book-persister".to_string())
            .spawn(move || {
                while let Ok(message) = receiver.recv() {
                    match message {
                        Message::Save(snapshot) => match store.save(&snapshot) {
                            Ok(()) => {
                                failed.store(false, Ordering::Relaxed);
                                debug!("book persisted");
                            }
                            Err(e) => {
                                failed.store(true, Ordering::Relaxed);
                                error!("failed to persist book: {e:#}");
                            }
                        },
                        Message::Flush(done) => {
                            let _ = done.send(());
                        }
                        Message::Shutdown => break,
                    }
                }
            })
            .expect("failed to spawn persister thread");
        Self {
            sender,
            last_save_failed,
            worker: Some(worker),
        }
    }

    /// Queue a snapshot for writing. Never blocks on IO.
    pub fn request_save(&self, snapshot: Snapshot) {
        if self.sender.send(Message::Save(snapshot)).is_err() {
            error!("persister thread is gone, snapshot dropped");
            self.last_save_failed.store(true, Ordering::Relaxed);
        }
    }

    /// Whether the most recent attempted save failed.
    pub fn last_save_failed(&self) -> bool {
        self.last_save_failed.load(Ordering::Relaxed)
    }

    /// Block until every save queued so far has been attempted.
    pub fn flush(&self) {
        let (done, ack) = mpsc::channel();
        if self.sender.send(Message::Flush(done)).is_ok() {
            let _ = ack.recv();
        }
    }
}

impl Drop for Persister {
    fn drop(&mut self) {
        let _ = self.sender.send(Message::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Account, Id};
    use crate::storage::json_store::JsonStore;
    use anyhow::Result;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[test]
    fn queued_saves_land_on_disk_after_flush() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(JsonStore::new(dir.path().join("book.json")).unwrap());
        let persister = Persister::new(store.clone());

        let snapshot = Snapshot {
            accounts: vec![Account::new(Id::new(1), "NBK".to_string(), 1200.0)],
            ..Snapshot::default()
        };
        persister.request_save(snapshot.clone());
        persister.flush();

        assert!(!persister.last_save_failed());
        assert_eq!(store.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn later_saves_win() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(JsonStore::new(dir.path().join("book.json")).unwrap());
        let persister = Persister::new(store.clone());

        for balance in [1.0, 2.0, 3.0] {
            persister.request_save(Snapshot {
                accounts: vec![Account::new(Id::new(1), "KFH".to_string(), balance)],
                ..Snapshot::default()
            });
        }
        persister.flush();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.accounts[0].opening_balance, 3.0);
    }

    struct FailingStore {
        attempts: Mutex<u32>,
    }

    impl SnapshotStore for FailingStore {
        fn load(&self) -> Result<Option<Snapshot>> {
            Ok(None)
        }

        fn save(&self, _snapshot: &Snapshot) -> Result<()> {
            *self.attempts.lock().unwrap() += 1;
            anyhow::bail!("disk full")
        }
    }

    #[test]
    fn save_failures_set_the_flag_and_keep_the_worker_alive() {
        let store = Arc::new(FailingStore {
            attempts: Mutex::new(0),
        });
        let persister = Persister::new(store.clone());

        persister.request_save(Snapshot::default());
        persister.request_save(Snapshot::default());
        persister.flush();

        assert_eq!(*store.attempts.lock().unwrap(), 2);
        assert!(persister.last_save_failed());
    }
}
