//! Price resolution: walk an order's price keys against a store.

use cuppa_core::{FuzzLevel, Order, OrderParser};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::StorageError;
use crate::record::PriceRecord;
use crate::traits::PriceStore;

/// The first price-list entry that matched an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceMatch {
    pub price_key: String,
    pub amount: Decimal,
    /// How far the key had to be widened; 0 is an exact match.
    pub fuzz: u8,
}

/// Build a price record from free-text entry such as "Large Cap".
///
/// The text goes through the normal parser and is stored under its exact
/// price key, so "Large Cap" and "large cappuccino" land on the same entry.
pub fn price_entry(
    parser: &OrderParser,
    cafe_id: &str,
    text: &str,
    amount: Decimal,
) -> Result<PriceRecord, StorageError> {
    let order = parser.parse(text);
    let missing = parser.validation_errors(&order);
    if !missing.is_empty() {
        return Err(StorageError::InvalidPriceKey {
            text: text.to_owned(),
            missing: missing
                .iter()
                .map(|spec| spec.attribute.name().to_owned())
                .collect(),
        });
    }
    Ok(PriceRecord {
        cafe_id: cafe_id.to_owned(),
        price_key: order.price_key(FuzzLevel::Exact.fuzz_set()),
        amount,
    })
}

/// Try the order's four price keys in order and return the first hit.
///
/// `Ok(None)` means the cafe exists but nothing on its list matches even the
/// widest key.
pub async fn resolve_price<S>(
    store: &S,
    cafe_id: &str,
    order: &Order,
) -> Result<Option<PriceMatch>, StorageError>
where
    S: PriceStore + ?Sized,
{
    for level in FuzzLevel::ALL {
        let key = order.price_key(level.fuzz_set());
        tracing::debug!(cafe_id, price_key = %key, fuzz = level.index(), "probing price");
        if let Some(record) = store.get_price(cafe_id, &key).await? {
            return Ok(Some(PriceMatch {
                price_key: record.price_key,
                amount: record.amount,
                fuzz: level.index(),
            }));
        }
    }
    tracing::debug!(cafe_id, order = %order, "no price found");
    Ok(None)
}
