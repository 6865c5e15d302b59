//! Key-value storage shims.
//!
//! Stand-ins for browser session/local storage: a JSON-file-backed store
//! for the app and an in-memory store for tests and throwaway sessions.

pub mod file_store;
pub mod memory;

pub use file_store::FileKvStore;
pub use memory::MemoryKvStore;
