//! Key-value persistence backends.
//!
//! The survey persists two independent values: the active session and
//! the response archive, each under its own fixed key. Backends only
//! need string get/put/remove; everything above them works with JSON
//! payloads.

pub mod file;
pub mod memory;

/// Trait for local key-value storage backends.
///
/// All operations are synchronous; the survey runs single-threaded and
/// every mutation completes its write before returning to the caller.
pub trait KeyValueStore {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write `value` under `key`, replacing any previous value.
    fn put(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove the value under `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), Self::Error>;
}

pub use file::FileStore;
pub use memory::InMemoryStore;
