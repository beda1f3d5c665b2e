use std::time::Duration;

use moka::sync::Cache;

use crate::store::PriceRecord;

/// Read cache keyed by normalized symbol. Entries expire a fixed interval
/// after insertion; the capacity bound keeps the key space from growing
/// without limit.
pub struct PriceCache {
    entries: Cache<String, PriceRecord>,
}

const MAX_CAPACITY: u64 = 10_000;

impl PriceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(MAX_CAPACITY)
                .build(),
        }
    }

    pub fn set(&self, symbol: &str, record: PriceRecord) {
        self.entries.insert(symbol.to_string(), record);
    }

    pub fn get(&self, symbol: &str) -> Option<PriceRecord> {
        self.entries.get(symbol)
    }

    pub fn remove(&self, symbol: &str) {
        self.entries.invalidate(symbol);
    }
}
