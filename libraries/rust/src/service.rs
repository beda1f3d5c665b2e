use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::cache::PriceCache;
use crate::store::{PriceRecord, PriceStore};

/// How long a single-item read stays cached.
pub const READ_CACHE_TTL: Duration = Duration::from_secs(30);

/// Collection tag for an empty record set. Fixed, never hashed.
const EMPTY_COLLECTION_ETAG: &str = "\"empty\"";

/// Orchestrates the store and the read cache: normalizes symbol inputs,
/// derives entity tags, and invalidates cached reads on writes.
pub struct PriceQueryService {
    store: Arc<dyn PriceStore>,
    cache: PriceCache,
}

impl PriceQueryService {
    pub fn new(store: Arc<dyn PriceStore>) -> Self {
        Self {
            store,
            cache: PriceCache::new(READ_CACHE_TTL),
        }
    }

    /// Cached single-symbol lookup. Misses consult the store and fill the
    /// cache; absent symbols are never cached.
    pub fn get_price(&self, symbol: &str) -> Option<PriceRecord> {
        let normalized = normalize(symbol);

        if let Some(cached) = self.cache.get(&normalized) {
            debug!("read cache hit for {}", normalized);
            return Some(cached);
        }

        let record = self.store.get(&normalized)?;
        self.cache.set(&normalized, record.clone());
        Some(record)
    }

    /// Resolves a batch of symbols: blanks dropped, duplicates collapsed
    /// case-insensitively, absentees skipped, result ordered by symbol.
    pub fn get_prices(&self, symbols: &[String]) -> Vec<PriceRecord> {
        let normalized: BTreeSet<String> = symbols
            .iter()
            .filter(|symbol| !symbol.trim().is_empty())
            .map(|symbol| normalize(symbol))
            .collect();

        normalized
            .iter()
            .filter_map(|symbol| self.get_price(symbol))
            .collect()
    }

    /// Authoritative snapshot, bypassing the read cache.
    pub fn get_all_prices(&self) -> Vec<PriceRecord> {
        self.store.get_all()
    }

    /// Records whose last update is at or before `now - stale_after`,
    /// ordered by symbol. Non-positive windows yield nothing.
    pub fn get_stale_prices(&self, stale_after: chrono::Duration) -> Vec<PriceRecord> {
        if stale_after <= chrono::Duration::zero() {
            return Vec::new();
        }

        let threshold = Utc::now() - stale_after;
        self.store
            .get_all()
            .into_iter()
            .filter(|record| record.last_updated_utc <= threshold)
            .collect()
    }

    /// Writes through to the store, then drops the symbol's cached read so
    /// an immediately following read observes the new version.
    pub fn upsert_price(&self, symbol: &str, price: Decimal) -> PriceRecord {
        let normalized = normalize(symbol);
        let record = self.store.upsert(&normalized, price);
        self.invalidate(&normalized);
        record
    }

    /// Entity tag for one record, a pure function of `(symbol, version)`.
    pub fn build_etag(&self, record: &PriceRecord) -> String {
        format!("\"{}-{}\"", record.symbol, record.version)
    }

    /// Entity tag for a record set: the SHA-256 of the symbol-ordered
    /// `symbol:version` signature, as a quoted lower-hex digest. Input order
    /// does not matter.
    pub fn build_collection_etag(&self, records: &[PriceRecord]) -> String {
        let mut ordered: Vec<&PriceRecord> = records.iter().collect();
        ordered.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        let signature = ordered
            .iter()
            .map(|record| format!("{}:{}", record.symbol, record.version))
            .collect::<Vec<_>>()
            .join("|");

        if signature.is_empty() {
            return EMPTY_COLLECTION_ETAG.to_string();
        }

        let digest = Sha256::digest(signature.as_bytes());
        format!("\"{}\"", hex::encode(digest))
    }

    /// Drops the symbol's cache entry. No-op if absent.
    pub fn invalidate(&self, symbol: &str) {
        self.cache.remove(&normalize(symbol));
    }
}

fn normalize(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}
