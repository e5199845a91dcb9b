extern crate chrono;
extern crate serde;
extern crate serde_json;

use crate::error::{storage_error, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
    time::Duration,
};

pub mod storage;

pub use storage::{FileStore, MemoryStore, Store};

/// Source of cache timestamps, in epoch milliseconds.
#[derive(Debug, Clone)]
pub enum Clock {
    System,
    Manual(Arc<AtomicI64>),
}
impl Clock {
    pub fn manual(start: i64) -> Self {
        Self::Manual(Arc::new(AtomicI64::new(start)))
    }
    pub fn now(&self) -> i64 {
        match self {
            Self::System => chrono::Utc::now().timestamp_millis(),
            Self::Manual(t) => t.load(Ordering::SeqCst),
        }
    }
    /// Moves a manual clock forward. No effect on the system clock.
    pub fn advance(&self, by: Duration) {
        if let Self::Manual(t) = self {
            t.fetch_add(by.as_millis() as i64, Ordering::SeqCst);
        }
    }
}
impl Default for Clock {
    fn default() -> Self {
        Self::System
    }
}

#[derive(Serialize, Deserialize)]
struct Entry<T> {
    timestamp: i64,
    payload: T,
}

#[derive(Debug, PartialEq)]
pub enum Lookup<T> {
    Hit(T),
    Expired,
    Absent,
}
impl<T> Lookup<T> {
    pub fn hit(self) -> Option<T> {
        match self {
            Self::Hit(v) => Some(v),
            Self::Expired | Self::Absent => None,
        }
    }
}

/// Timestamped entries on top of a [`Store`]. Expired entries stay in the
/// store until a later `put` overwrites them.
pub struct Cache {
    store: Box<dyn Store>,
    clock: Clock,
}
impl Cache {
    pub fn new<S: Store + 'static>(store: S) -> Self {
        Self::with_clock(store, Clock::System)
    }
    pub fn with_clock<S: Store + 'static>(store: S, clock: Clock) -> Self {
        Self {
            store: Box::new(store),
            clock,
        }
    }
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn put<T: Serialize>(&self, key: &str, payload: &T) -> Result<()> {
        let text = serde_json::to_string(&Entry {
            timestamp: self.clock.now(),
            payload,
        })
        .map_err(storage_error)?;
        self.store.put(key, text)
    }
    /// `ttl` of `None` keeps the entry valid until it is removed.
    pub fn get<T: DeserializeOwned>(&self, key: &str, ttl: Option<Duration>) -> Result<Lookup<T>> {
        let text = match self.store.get(key)? {
            Some(v) => v,
            None => return Ok(Lookup::Absent),
        };
        let entry: Entry<T> = serde_json::from_str(&text)
            .map_err(|e| storage_error(format!("entry {}: {}", key, e)))?;
        let age = self.clock.now().saturating_sub(entry.timestamp);
        match ttl {
            Some(ttl) if age > ttl.as_millis() as i64 => {
                Ok(Lookup::Expired)
            }
            _ => Ok(Lookup::Hit(entry.payload)),
        }
    }
    pub fn remove(&self, key: &str) -> Result<()> {
        self.store.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(3600);

    fn cache() -> Cache {
        Cache::with_clock(MemoryStore::new(), Clock::manual(1_700_000_000_000))
    }

    #[test]
    fn hit_within_ttl() {
        let cache = cache();
        cache.put("k", &vec![1, 2, 3]).unwrap();
        cache.clock().advance(TTL);
        assert_eq!(
            cache.get::<Vec<i32>>("k", Some(TTL)).unwrap(),
            Lookup::Hit(vec![1, 2, 3])
        );
    }

    #[test]
    fn expired_after_ttl_but_still_stored() {
        let cache = cache();
        cache.put("k", &"v").unwrap();
        cache.clock().advance(TTL + Duration::from_millis(1));
        assert_eq!(cache.get::<String>("k", Some(TTL)).unwrap(), Lookup::Expired);
        assert_eq!(
            cache.get::<String>("k", None).unwrap(),
            Lookup::Hit("v".to_string())
        );
    }

    #[test]
    fn absent_and_overwrite() {
        let cache = cache();
        assert_eq!(cache.get::<String>("k", Some(TTL)).unwrap(), Lookup::Absent);
        cache.put("k", &"old").unwrap();
        cache.clock().advance(TTL * 2);
        cache.put("k", &"new").unwrap();
        assert_eq!(
            cache.get::<String>("k", Some(TTL)).unwrap().hit().as_deref(),
            Some("new")
        );
    }

    #[test]
    fn remove_entry() {
        let cache = cache();
        cache.put("k", &1).unwrap();
        cache.remove("k").unwrap();
        assert_eq!(cache.get::<i32>("k", None).unwrap(), Lookup::Absent);
    }

    #[test]
    fn extreme_timestamp_is_expired() {
        let store = std::sync::Arc::new(MemoryStore::new());
        store
            .put(
                "k",
                format!(r#"{{"timestamp":{},"payload":1}}"#, i64::MIN),
            )
            .unwrap();
        let cache = Cache::with_clock(store, Clock::manual(1_700_000_000_000));
        assert_eq!(cache.get::<i32>("k", Some(TTL)).unwrap(), Lookup::Expired);
    }
}
