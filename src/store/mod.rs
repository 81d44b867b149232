//! Storage: the in-memory roster store and its JSON snapshot file.

pub mod persist;
mod roster;

pub use persist::PersistError;
pub use roster::{describe_match, Access, Change, RosterStore, Snapshot, StoreError};
