mod error;
mod lookup;
mod memory;
mod record;
mod traits;

pub use error::StorageError;
pub use lookup::{price_entry, resolve_price, PriceMatch};
pub use memory::InMemoryPriceStore;
pub use record::{CafeRecord, PriceRecord};
pub use traits::PriceStore;
