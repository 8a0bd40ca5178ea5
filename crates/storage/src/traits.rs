use async_trait::async_trait;

use crate::error::StorageError;
use crate::record::{CafeRecord, PriceRecord};

/// The storage trait for cafe price lists.
///
/// A `PriceStore` maps (cafe id, price key) to an amount. Keys are compared
/// exactly; widening a miss into a fuzzier key is the caller's job (see
/// [`resolve_price`](crate::resolve_price)).
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync + 'static` so one store can be
/// shared across async tasks.
#[async_trait]
pub trait PriceStore: Send + Sync + 'static {
    // ── Cafes ────────────────────────────────────────────────────────────────

    /// Register a cafe with an empty price list.
    ///
    /// Returns `Err(StorageError::CafeAlreadyExists)` if the id is taken.
    async fn add_cafe(&self, cafe: CafeRecord) -> Result<(), StorageError>;

    /// Returns `Err(StorageError::CafeNotFound)` if the cafe does not exist.
    async fn get_cafe(&self, cafe_id: &str) -> Result<CafeRecord, StorageError>;

    /// All cafes, ordered by id.
    async fn list_cafes(&self) -> Result<Vec<CafeRecord>, StorageError>;

    // ── Prices ───────────────────────────────────────────────────────────────

    /// Insert or replace a price. Returns the replaced record, if any.
    ///
    /// Returns `Err(StorageError::CafeNotFound)` if the cafe does not exist.
    async fn put_price(&self, record: PriceRecord) -> Result<Option<PriceRecord>, StorageError>;

    /// Exact-key lookup. `Ok(None)` means the cafe exists but has no such key.
    async fn get_price(
        &self,
        cafe_id: &str,
        price_key: &str,
    ) -> Result<Option<PriceRecord>, StorageError>;

    /// All prices of a cafe, ordered by price key.
    async fn list_prices(&self, cafe_id: &str) -> Result<Vec<PriceRecord>, StorageError>;
}
