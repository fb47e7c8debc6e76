//! Storage abstraction for the book snapshot.

use anyhow::Result;

use crate::domain::book::Snapshot;

/// A place a whole-book snapshot can be loaded from and saved to.
/// Implementations replace the stored state wholesale on every save.
pub trait SnapshotStore: Send + Sync {
    /// Load the last saved snapshot, or `None` if nothing has been
    /// saved yet.
    fn load(&self) -> Result<Option<Snapshot>>;

    /// Persist the snapshot, replacing whatever was stored before.
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}
