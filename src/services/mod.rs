//! Service layer modules for the model's collaborators.
//!
//! Contains the key-value store, the repository built on it, and the id and
//! clock sources injected into the model.

pub mod clock;
pub mod ids;
pub mod repository;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ids::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use repository::Repository;
pub use store::{JsonFileStore, MemoryStore, Store, StoreError, StoreExt, StoreResult};
