//! Error types for the `chain-hashmap` crate.

/// Errors returned by checked insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum InsertError {
    /// The key is already present and the table does not allow duplicates.
    #[error("key already present in table")]
    DuplicateKey,
}
