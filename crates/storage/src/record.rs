use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A cafe that publishes a price list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CafeRecord {
    pub id: String,
    pub name: String,
}

/// One entry of a cafe's price list.
///
/// `price_key` is always an exact (un-fuzzed) key as produced by
/// `Order::price_key(&[])`, e.g. "Large Soy Cappuccino".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub cafe_id: String,
    pub price_key: String,
    pub amount: Decimal,
}
