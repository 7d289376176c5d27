use thiserror::Error;

/// Returned by lookups for a key that is not in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("key not found")]
pub struct KeyError;
