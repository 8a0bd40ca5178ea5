use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::StorageError;
use crate::record::{CafeRecord, PriceRecord};
use crate::traits::PriceStore;

#[derive(Debug)]
struct CafeEntry {
    name: String,
    prices: BTreeMap<String, Decimal>,
}

/// A `PriceStore` held entirely in memory. Used by the CLI (loaded from a
/// menu file) and by tests.
#[derive(Debug, Default)]
pub struct InMemoryPriceStore {
    cafes: RwLock<BTreeMap<String, CafeEntry>>,
}

impl InMemoryPriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, CafeEntry>>, StorageError> {
        self.cafes
            .read()
            .map_err(|e| StorageError::Backend(format!("price store lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, CafeEntry>>, StorageError> {
        self.cafes
            .write()
            .map_err(|e| StorageError::Backend(format!("price store lock poisoned: {}", e)))
    }
}

fn cafe_not_found(cafe_id: &str) -> StorageError {
    StorageError::CafeNotFound {
        cafe_id: cafe_id.to_owned(),
    }
}

#[async_trait]
impl PriceStore for InMemoryPriceStore {
    async fn add_cafe(&self, cafe: CafeRecord) -> Result<(), StorageError> {
        let mut cafes = self.write()?;
        if cafes.contains_key(&cafe.id) {
            return Err(StorageError::CafeAlreadyExists { cafe_id: cafe.id });
        }
        cafes.insert(
            cafe.id,
            CafeEntry {
                name: cafe.name,
                prices: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn get_cafe(&self, cafe_id: &str) -> Result<CafeRecord, StorageError> {
        let cafes = self.read()?;
        let entry = cafes.get(cafe_id).ok_or_else(|| cafe_not_found(cafe_id))?;
        Ok(CafeRecord {
            id: cafe_id.to_owned(),
            name: entry.name.clone(),
        })
    }

    async fn list_cafes(&self) -> Result<Vec<CafeRecord>, StorageError> {
        let cafes = self.read()?;
        Ok(cafes
            .iter()
            .map(|(id, entry)| CafeRecord {
                id: id.clone(),
                name: entry.name.clone(),
            })
            .collect())
    }

    async fn put_price(&self, record: PriceRecord) -> Result<Option<PriceRecord>, StorageError> {
        let mut cafes = self.write()?;
        let entry = cafes
            .get_mut(&record.cafe_id)
            .ok_or_else(|| cafe_not_found(&record.cafe_id))?;
        let previous = entry
            .prices
            .insert(record.price_key.clone(), record.amount)
            .map(|amount| PriceRecord {
                amount,
                ..record.clone()
            });
        Ok(previous)
    }

    async fn get_price(
        &self,
        cafe_id: &str,
        price_key: &str,
    ) -> Result<Option<PriceRecord>, StorageError> {
        let cafes = self.read()?;
        let entry = cafes.get(cafe_id).ok_or_else(|| cafe_not_found(cafe_id))?;
        Ok(entry.prices.get(price_key).map(|&amount| PriceRecord {
            cafe_id: cafe_id.to_owned(),
            price_key: price_key.to_owned(),
            amount,
        }))
    }

    async fn list_prices(&self, cafe_id: &str) -> Result<Vec<PriceRecord>, StorageError> {
        let cafes = self.read()?;
        let entry = cafes.get(cafe_id).ok_or_else(|| cafe_not_found(cafe_id))?;
        Ok(entry
            .prices
            .iter()
            .map(|(key, &amount)| PriceRecord {
                cafe_id: cafe_id.to_owned(),
                price_key: key.clone(),
                amount,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn cafe(id: &str) -> CafeRecord {
        CafeRecord {
            id: id.to_owned(),
            name: format!("Cafe {id}"),
        }
    }

    fn price(cafe_id: &str, key: &str, cents: i64) -> PriceRecord {
        PriceRecord {
            cafe_id: cafe_id.to_owned(),
            price_key: key.to_owned(),
            amount: Decimal::new(cents, 2),
        }
    }

    #[tokio::test]
    async fn add_cafe_twice_conflicts() {
        let store = InMemoryPriceStore::new();
        store.add_cafe(cafe("a")).await.unwrap();
        let err = store.add_cafe(cafe("a")).await.unwrap_err();
        assert!(matches!(err, StorageError::CafeAlreadyExists { .. }));
        assert_eq!(store.list_cafes().await.unwrap(), vec![cafe("a")]);
    }

    #[tokio::test]
    async fn put_and_get_price() {
        let store = InMemoryPriceStore::new();
        store.add_cafe(cafe("a")).await.unwrap();
        assert!(store
            .put_price(price("a", "Regular Cappuccino", 400))
            .await
            .unwrap()
            .is_none());

        let got = store.get_price("a", "Regular Cappuccino").await.unwrap();
        assert_eq!(got, Some(price("a", "Regular Cappuccino", 400)));
        assert_eq!(store.get_price("a", "Large Cappuccino").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_price_replaces_and_returns_previous() {
        let store = InMemoryPriceStore::new();
        store.add_cafe(cafe("a")).await.unwrap();
        store.put_price(price("a", "Small Latte", 350)).await.unwrap();
        let previous = store.put_price(price("a", "Small Latte", 380)).await.unwrap();
        assert_eq!(previous, Some(price("a", "Small Latte", 350)));
        assert_eq!(
            store.list_prices("a").await.unwrap(),
            vec![price("a", "Small Latte", 380)]
        );
    }

    #[tokio::test]
    async fn unknown_cafe_is_an_error() {
        let store = InMemoryPriceStore::new();
        assert!(matches!(
            store.get_price("nowhere", "Regular Latte").await,
            Err(StorageError::CafeNotFound { .. })
        ));
        assert!(matches!(
            store.put_price(price("nowhere", "Regular Latte", 1)).await,
            Err(StorageError::CafeNotFound { .. })
        ));
        assert!(matches!(
            store.get_cafe("nowhere").await,
            Err(StorageError::CafeNotFound { .. })
        ));
    }
}
