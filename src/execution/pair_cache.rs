use crate::models::CandleSeries;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::OnceCell;
use tokio::time::{Duration, Instant};

/// What the cache remembers about a pair
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEntry {
    Series(CandleSeries),
    /// The last fetch returned nothing usable
    NoData,
}

impl CacheEntry {
    /// Usable series, if any; empty series count as no data
    pub fn series(&self) -> Option<&CandleSeries> {
        match self {
            CacheEntry::Series(series) if !series.is_empty() => Some(series),
            _ => None,
        }
    }
}

impl From<Option<CandleSeries>> for CacheEntry {
    fn from(series: Option<CandleSeries>) -> Self {
        match series {
            Some(series) => CacheEntry::Series(series),
            None => CacheEntry::NoData,
        }
    }
}

/// When stored entries stop being served
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Keep every entry for the lifetime of the process
    #[default]
    Never,
    /// Treat entries older than this as misses
    After(Duration),
}

#[derive(Debug)]
struct StoredEntry {
    entry: CacheEntry,
    stored_at: Instant,
}

type Slot = Arc<OnceCell<StoredEntry>>;

/// Memo of the last fetched candles per pair
///
/// Entries are written once per pair and, under `EvictionPolicy::Never`, never
/// refreshed. Concurrent first fetches of the same pair share a single request.
#[derive(Debug, Default)]
pub struct PairCache {
    slots: Mutex<HashMap<String, Slot>>,
    policy: EvictionPolicy,
}

impl PairCache {
    pub fn new(policy: EvictionPolicy) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            policy,
        }
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Cached entry for a pair, or `None` on a miss
    pub fn get(&self, pair: &str) -> Option<CacheEntry> {
        let slots = self.lock();
        let stored = slots.get(pair)?.get()?;

        if self.is_expired(stored) {
            return None;
        }
        Some(stored.entry.clone())
    }

    /// Store an entry, replacing anything already cached for the pair
    pub fn set(&self, pair: &str, entry: CacheEntry) {
        let stored = StoredEntry {
            entry,
            stored_at: Instant::now(),
        };
        self.lock()
            .insert(pair.to_string(), Arc::new(OnceCell::new_with(Some(stored))));
    }

    /// Return the cached entry, or run `fetch` and cache its result
    ///
    /// An `Err` from `fetch` is returned to the caller and nothing is cached, so
    /// the next call fetches again. Callers racing on the same pair wait for the
    /// first fetch instead of issuing their own.
    pub async fn get_or_fetch<F, Fut, E>(&self, pair: &str, fetch: F) -> Result<CacheEntry, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CacheEntry, E>>,
    {
        let slot = self.slot_for(pair);

        let stored = slot
            .get_or_try_init(|| async move {
                let entry = fetch().await?;
                tracing::debug!(pair = %pair, "Cached market data");
                Ok::<_, E>(StoredEntry {
                    entry,
                    stored_at: Instant::now(),
                })
            })
            .await?;

        Ok(stored.entry.clone())
    }

    /// Number of pairs `get` would currently serve
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter_map(|slot| slot.get())
            .filter(|stored| !self.is_expired(stored))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot for a pair, replacing it when its entry has expired
    fn slot_for(&self, pair: &str) -> Slot {
        let mut slots = self.lock();
        let slot = slots.entry(pair.to_string()).or_default();

        if slot.get().is_some_and(|stored| self.is_expired(stored)) {
            tracing::debug!(pair = %pair, "Cache entry expired");
            *slot = Slot::default();
        }

        Arc::clone(slot)
    }

    fn is_expired(&self, stored: &StoredEntry) -> bool {
        match self.policy {
            EvictionPolicy::Never => false,
            EvictionPolicy::After(ttl) => stored.stored_at.elapsed() >= ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        // Critical sections never panic mid-update, so a poisoned map is still consistent
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
