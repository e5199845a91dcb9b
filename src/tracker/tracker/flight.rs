extern crate futures;

use crate::error::Result;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

pub(crate) type Pending<T> = Shared<BoxFuture<'static, Result<T>>>;

struct Slot<K, T> {
    key: K,
    id: u64,
    future: Pending<T>,
}

/// Holds the one operation currently running. A caller asking for the same
/// key gets the running operation instead of a new one; a different key
/// replaces it.
pub(crate) struct Flight<K, T> {
    slot: Mutex<Option<Slot<K, T>>>,
    next: AtomicU64,
}

impl<K, T> Flight<K, T>
where
    K: PartialEq + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            slot: Mutex::new(None),
            next: AtomicU64::new(0),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Option<Slot<K, T>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `(started, operation)`. `start` runs only when nothing for
    /// `key` is pending.
    pub(crate) fn join_or_start<F>(self: &Arc<Self>, key: K, start: F) -> (bool, Pending<T>)
    where
        F: FnOnce() -> BoxFuture<'static, Result<T>>,
    {
        let mut slot = self.lock();
        if let Some(s) = slot.as_ref() {
            if s.key == key {
                return (false, s.future.clone());
            }
        }
        let id = self.next.fetch_add(1, Ordering::SeqCst);
        let this = Arc::clone(self);
        let operation = start();
        let future = async move {
            let ret = operation.await;
            this.finish(id);
            ret
        }
        .boxed()
        .shared();
        *slot = Some(Slot {
            key,
            id,
            future: future.clone(),
        });
        (true, future)
    }

    fn finish(&self, id: u64) {
        let mut slot = self.lock();
        if slot.as_ref().map_or(false, |s| s.id == id) {
            *slot = None;
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.lock().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Kind};
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn same_key_shares_one_run() {
        let flight: Arc<Flight<&'static str, u32>> = Flight::new();
        let runs = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = oneshot::channel::<u32>();
        let counter = runs.clone();
        let (first, a) = flight.join_or_start("k", move || {
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(rx.await.unwrap_or(0))
            }
            .boxed()
        });
        let (second, b) = flight.join_or_start("k", || unreachable!());
        assert!(first);
        assert!(!second);
        tx.send(7).unwrap();
        let (a, b) = futures::join!(a, b);
        assert_eq!((a.unwrap(), b.unwrap()), (7, 7));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!flight.is_running());
    }

    #[tokio::test]
    async fn finished_run_allows_new_one() {
        let flight: Arc<Flight<(), u32>> = Flight::new();
        let (_, a) = flight.join_or_start((), || async { Ok(1) }.boxed());
        assert_eq!(a.await.unwrap(), 1);
        let (started, b) = flight.join_or_start((), || {
            async { Err(Error::with_kind(Kind::Network)) }.boxed()
        });
        assert!(started);
        assert_eq!(b.await.unwrap_err().kind(), &Kind::Network);
    }

    #[tokio::test]
    async fn other_key_replaces_pending() {
        let flight: Arc<Flight<u8, u8>> = Flight::new();
        let (tx, rx) = oneshot::channel::<u8>();
        let (_, old) = flight.join_or_start(1, move || async move { Ok(rx.await.unwrap_or(0)) }.boxed());
        let (started, new) = flight.join_or_start(2, || async { Ok(2) }.boxed());
        assert!(started);
        assert_eq!(new.await.unwrap(), 2);
        assert!(!flight.is_running());
        tx.send(1).unwrap();
        assert_eq!(old.await.unwrap(), 1);
        assert!(!flight.is_running());
    }
}
