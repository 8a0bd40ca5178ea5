/// All errors that can be returned by a PriceStore implementation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No cafe with the given id.
    #[error("cafe not found: {cafe_id}")]
    CafeNotFound { cafe_id: String },

    /// A cafe with this id is already registered.
    #[error("cafe already exists: {cafe_id}")]
    CafeAlreadyExists { cafe_id: String },

    /// Price entry text that does not describe a valid order, so it has no
    /// meaningful price key.
    #[error("invalid price key '{text}': missing {}", .missing.join(", "))]
    InvalidPriceKey { text: String, missing: Vec<String> },

    /// A backend-specific storage error (lock poisoning, connection, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),
}
