pub mod state;

pub use state::{Snapshot, SnapshotUpdate, StateStore, recent_transactions};
