//! Persistence layer: snapshot store trait, JSON file backend, and the
//! background persister that decouples saves from mutations.

pub mod json_store;
pub mod persister;
pub mod traits;

pub use json_store::JsonStore;
pub use persister::Persister;
pub use traits::SnapshotStore;
