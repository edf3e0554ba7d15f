// Remote coupling store and the delete-all/recreate sync protocol

pub mod coordinator;
pub mod error;
pub mod http;
pub mod memory;
pub mod store;

pub use coordinator::{SyncCoordinator, SyncPhase, SyncReport};
pub use error::{StoreError, SyncError};
pub use http::HttpConstraintStore;
pub use memory::{InMemoryConstraintStore, StoreRequest};
pub use store::{ConstraintSnapshot, ConstraintStore};
