//! Durable object storage abstraction.
//!
//! The core layer reads the mapping table and historical series from a
//! bucket/key object store. Backends live in other crates; this module only
//! defines the contract and an in-memory implementation.

pub mod errors;
pub mod memory;
pub mod traits;

pub use errors::StorageError;
pub use memory::InMemoryObjectStore;
pub use traits::ObjectStore;
