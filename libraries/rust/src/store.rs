use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use mockall::automock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single symbol's price as the store knows it. Reads hand out clones,
/// never references into the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    pub symbol: String,
    pub price: Decimal,
    pub version: i64,
    pub last_updated_utc: DateTime<Utc>,
}

#[automock]
pub trait PriceStore: Send + Sync {
    /// Exact-match lookup on a normalized symbol.
    fn get(&self, symbol: &str) -> Option<PriceRecord>;

    /// Snapshot of every record, ordered by symbol ascending.
    fn get_all(&self) -> Vec<PriceRecord>;

    /// Create a record at version 1 or bump an existing one by exactly 1.
    /// Returns the post-mutation copy.
    fn upsert(&self, symbol: &str, price: Decimal) -> PriceRecord;
}

/// In-memory record table. One mutex covers the whole read-modify-write of
/// every operation, so snapshots never observe a half-written record and
/// concurrent upserts on the same symbol serialize without lost updates.
pub struct InMemoryPriceStore {
    records: Mutex<BTreeMap<String, PriceRecord>>,
}

impl InMemoryPriceStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
        }
    }

    /// The record set the server boots with.
    pub fn seeded() -> Self {
        let store = Self::new();
        store.upsert("BTC", Decimal::new(75_250_10, 2));
        store.upsert("ETH", Decimal::new(4_100_40, 2));
        store
    }
}

impl Default for InMemoryPriceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceStore for InMemoryPriceStore {
    fn get(&self, symbol: &str) -> Option<PriceRecord> {
        let records = self.records.lock().expect("price store mutex poisoned");
        records.get(symbol).cloned()
    }

    fn get_all(&self) -> Vec<PriceRecord> {
        let records = self.records.lock().expect("price store mutex poisoned");
        records.values().cloned().collect()
    }

    fn upsert(&self, symbol: &str, price: Decimal) -> PriceRecord {
        let mut records = self.records.lock().expect("price store mutex poisoned");
        let now = Utc::now();

        records
            .entry(symbol.to_string())
            .and_modify(|existing| {
                existing.price = price;
                existing.version += 1;
                existing.last_updated_utc = now;
            })
            .or_insert_with(|| PriceRecord {
                symbol: symbol.to_string(),
                price,
                version: 1,
                last_updated_utc: now,
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_upsert_creates_at_version_one() {
        let store = InMemoryPriceStore::new();

        let created = store.upsert("BTC", Decimal::new(100, 0));

        assert_eq!(created.symbol, "BTC");
        assert_eq!(created.price, Decimal::new(100, 0));
        assert_eq!(created.version, 1);
    }

    #[test]
    fn test_upsert_bumps_version_and_timestamp() {
        let store = InMemoryPriceStore::new();

        let first = store.upsert("BTC", Decimal::new(100, 0));
        let second = store.upsert("BTC", Decimal::new(200, 0));

        assert_eq!(second.version, 2);
        assert_eq!(second.price, Decimal::new(200, 0));
        assert!(second.last_updated_utc >= first.last_updated_utc);
    }

    #[test]
    fn test_get_returns_independent_copy() {
        let store = InMemoryPriceStore::new();
        store.upsert("BTC", Decimal::new(100, 0));

        let mut copy = store.get("BTC").unwrap();
        copy.price = Decimal::new(999, 0);
        copy.version = 42;

        let fresh = store.get("BTC").unwrap();
        assert_eq!(fresh.price, Decimal::new(100, 0));
        assert_eq!(fresh.version, 1);
    }

    #[test]
    fn test_get_missing_symbol_is_none() {
        let store = InMemoryPriceStore::new();

        assert!(store.get("DOGE").is_none());
    }

    #[test]
    fn test_get_all_is_ordered_by_symbol() {
        let store = InMemoryPriceStore::new();
        store.upsert("ETH", Decimal::new(2, 0));
        store.upsert("ADA", Decimal::new(3, 0));
        store.upsert("BTC", Decimal::new(1, 0));

        let symbols: Vec<String> = store
            .get_all()
            .into_iter()
            .map(|record| record.symbol)
            .collect();

        assert_eq!(symbols, vec!["ADA", "BTC", "ETH"]);
    }

    #[test]
    fn test_seeded_store_holds_btc_and_eth() {
        let store = InMemoryPriceStore::seeded();

        let btc = store.get("BTC").unwrap();
        let eth = store.get("ETH").unwrap();

        assert_eq!(btc.price, Decimal::new(75_250_10, 2));
        assert_eq!(btc.version, 1);
        assert_eq!(eth.price, Decimal::new(4_100_40, 2));
        assert_eq!(eth.version, 1);
    }

    #[test]
    fn test_price_record_wire_shape() {
        let record = PriceRecord {
            symbol: "BTC".to_string(),
            price: Decimal::new(75_250_10, 2),
            version: 3,
            last_updated_utc: Utc::now(),
        };

        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["symbol"], "BTC");
        assert_eq!(value["price"], "75250.10");
        assert_eq!(value["version"], 3);
        assert!(value.get("lastUpdatedUtc").is_some());

        let round_tripped: PriceRecord = serde_json::from_value(value).unwrap();
        assert_eq!(round_tripped, record);
    }

    #[test]
    fn test_concurrent_upserts_never_lose_an_update() {
        let store = Arc::new(InMemoryPriceStore::new());
        store.upsert("BTC", Decimal::new(100, 0));

        let writers = 16;
        let mut handles = Vec::with_capacity(writers);
        for _ in 0..writers {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                store.upsert("BTC", Decimal::new(200, 0)).version
            }));
        }

        let observed: BTreeSet<i64> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();

        // Every writer landed on a distinct version and none were skipped.
        assert_eq!(observed.len(), writers);
        assert_eq!(store.get("BTC").unwrap().version, 1 + writers as i64);
    }
}
