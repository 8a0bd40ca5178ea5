//! Menu file format for `cuppa price`, `cuppa prices` and `cuppa run`.
//!
//! The menu TOML lists cafes and their price lists. Price entries are free
//! text, normalized through the order parser when loaded.
//!
//! # Example
//!
//! ```toml
//! [cafes.bean-there]
//! name = "Bean There"
//!
//! [cafes.bean-there.prices]
//! "Regular Cappuccino" = "4.00"
//! "Large Cap" = "4.50"
//! "Soy Cap" = "4.50"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use cuppa_core::OrderParser;
use cuppa_storage::{price_entry, CafeRecord, InMemoryPriceStore, PriceStore};
use rust_decimal::Decimal;
use serde::Deserialize;

// ── Types ─────────────────────────────────────────────────────────────────────

/// Top-level menu file.
#[derive(Debug, Clone, Deserialize)]
pub struct Menu {
    /// Cafes keyed by id.
    #[serde(default)]
    pub cafes: BTreeMap<String, CafeConfig>,
}

/// `[cafes.<id>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CafeConfig {
    /// Display name; defaults to the id.
    pub name: Option<String>,
    /// Free-text price entry -> amount. Amounts are strings ("4.50").
    #[serde(default)]
    pub prices: BTreeMap<String, Decimal>,
}

// ── Functions ─────────────────────────────────────────────────────────────────

/// Read and parse a menu TOML file from `path`.
///
/// Returns a human-readable error string on failure.
pub fn read_menu(path: &Path) -> Result<Menu, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}

/// Load every cafe and price of `menu` into a fresh in-memory store.
///
/// Price entries that do not describe a valid order are rejected. When two
/// entries normalize to the same price key the later one wins.
pub async fn load_store(menu: &Menu, parser: &OrderParser) -> Result<InMemoryPriceStore, String> {
    let store = InMemoryPriceStore::new();
    for (cafe_id, cafe) in &menu.cafes {
        store
            .add_cafe(CafeRecord {
                id: cafe_id.clone(),
                name: cafe.name.clone().unwrap_or_else(|| cafe_id.clone()),
            })
            .await
            .map_err(|e| e.to_string())?;

        for (text, amount) in &cafe.prices {
            let record = price_entry(parser, cafe_id, text, *amount)
                .map_err(|e| format!("cafe '{}': {}", cafe_id, e))?;
            let key = record.price_key.clone();
            let replaced = store.put_price(record).await.map_err(|e| e.to_string())?;
            if let Some(previous) = replaced {
                tracing::warn!(
                    cafe_id = %cafe_id,
                    price_key = %key,
                    previous = %previous.amount,
                    entry = %text,
                    "price entry overrides an earlier one with the same key"
                );
            }
        }
    }
    Ok(store)
}
