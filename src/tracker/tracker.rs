extern crate futures;

use crate::{
    cache::{Cache, FileStore, Lookup, MemoryStore},
    config::cache::{CATALOG_KEY, HANDLE_KEY, SOLVED_KEY, TAG_COUNTS_KEY, USER_INFO_KEY},
    error::{Error, Kind, Result},
    judge::{
        catalog::fetch_catalog, submission::fetch_all_submissions, user::fetch_user_info, Session,
        Transport,
    },
    metrics::{self, Metrics},
    options::Options,
    query::{tag_counts, TagCounts},
    reconcile::{attempted_unsolved, reconcile},
    types::{Attempt, Problem, ProblemKey, UserInfo, UserProgress},
};
use futures::future::FutureExt;
use log::{info, warn};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

mod flight;

use flight::Flight;

#[derive(Debug, Clone)]
pub enum Status {
    Idle,
    Fetching,
    Ready,
    Failed(Error),
}
impl Status {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
    pub fn is_fetching(&self) -> bool {
        matches!(self, Self::Fetching)
    }
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}
impl Default for Status {
    fn default() -> Self {
        Self::Idle
    }
}

#[derive(Debug, Default)]
pub struct Catalog {
    pub problems: Vec<Problem>,
    pub keys: HashSet<ProblemKey>,
    pub tags: TagCounts,
}
impl Catalog {
    pub fn new(problems: Vec<Problem>) -> Self {
        Self {
            keys: problems.iter().map(Problem::key).collect(),
            tags: tag_counts(&problems),
            problems,
        }
    }
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

#[derive(Default)]
struct State {
    catalog: Arc<Catalog>,
    catalog_status: Status,
    handle: Option<String>,
    generation: u64,
    progress: Arc<UserProgress>,
    attempted_unsolved: Arc<Vec<Attempt>>,
    progress_status: Status,
    user_info: Option<UserInfo>,
    info_status: Status,
    metrics: Metrics,
}
impl State {
    fn refresh_metrics(&mut self) {
        self.metrics = metrics::compute(
            &self.catalog.keys,
            &self.progress.solved,
            &self.attempted_unsolved,
        );
    }
}

/// Everything a view needs, copied out at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub catalog: Arc<Catalog>,
    pub catalog_status: Status,
    pub handle: Option<String>,
    pub progress: Arc<UserProgress>,
    pub attempted_unsolved: Arc<Vec<Attempt>>,
    pub progress_status: Status,
    pub user_info: Option<UserInfo>,
    pub info_status: Status,
    pub metrics: Metrics,
}

struct Inner {
    transport: Arc<dyn Transport>,
    cache: Cache,
    options: Options,
    state: Mutex<State>,
    catalog_flight: Arc<Flight<(), Arc<Catalog>>>,
    user_flight: Arc<Flight<(String, u64), ()>>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn store<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.cache.put(key, value) {
            warn!("Error caching {}: {}", key, e);
        }
    }
    fn load<T: DeserializeOwned>(&self, key: &str, ttl: Option<Duration>) -> Option<T> {
        match self.cache.get(key, ttl) {
            Ok(Lookup::Hit(v)) => Some(v),
            Ok(Lookup::Expired) => {
                info!("Cached {} expired", key);
                None
            }
            Ok(Lookup::Absent) => None,
            Err(e) => {
                warn!("Ignoring cached {}: {}", key, e);
                None
            }
        }
    }
    fn forget(&self, key: &str) {
        if let Err(e) = self.cache.remove(key) {
            warn!("Error removing {}: {}", key, e);
        }
    }

    fn install_catalog(&self, catalog: Arc<Catalog>) {
        let mut state = self.lock();
        state.catalog = catalog;
        state.catalog_status = Status::Ready;
        state.refresh_metrics();
    }

    async fn fetch_catalog(self: Arc<Self>) -> Result<Arc<Catalog>> {
        match fetch_catalog(self.transport.as_ref(), &self.options).await {
            Ok(problems) => {
                let catalog = Arc::new(Catalog::new(problems));
                self.store(CATALOG_KEY, &catalog.problems);
                self.store(TAG_COUNTS_KEY, &catalog.tags);
                self.install_catalog(catalog.clone());
                Ok(catalog)
            }
            Err(e) => {
                warn!("{}", e);
                self.lock().catalog_status = Status::Failed(e.clone());
                Err(e)
            }
        }
    }

    async fn refresh_catalog(self: &Arc<Self>) -> Result<Arc<Catalog>> {
        let (started, pending) = self
            .catalog_flight
            .join_or_start((), || self.clone().fetch_catalog().boxed());
        if started {
            self.lock().catalog_status = Status::Fetching;
        }
        pending.await
    }

    async fn catalog_once(self: &Arc<Self>) -> Result<()> {
        if !self.lock().catalog.is_empty() {
            return Ok(());
        }
        if !self.catalog_flight.is_running() {
            if let Some(problems) =
                self.load::<Vec<Problem>>(CATALOG_KEY, Some(self.options.catalog_ttl()))
            {
                if !problems.is_empty() {
                    info!("Using {} cached problems", problems.len());
                    self.install_catalog(Arc::new(Catalog::new(problems)));
                    return Ok(());
                }
            }
        }
        self.refresh_catalog().await.map(|_| ())
    }

    async fn fetch_user(self: Arc<Self>, handle: String, generation: u64) -> Result<()> {
        if let Err(e) = self.catalog_once().await {
            warn!("Loading {} without catalog: {}", handle, e);
        }
        let (submissions, info) = futures::join!(
            fetch_all_submissions(self.transport.as_ref(), &self.options, &handle),
            fetch_user_info(self.transport.as_ref(), &self.options, &handle)
        );

        let mut state = self.lock();
        if state.generation != generation {
            warn!("Discarding stale result for {}", handle);
            return Ok(());
        }
        let result = match submissions {
            Ok(list) => {
                let progress = reconcile(&list);
                state.attempted_unsolved = Arc::new(attempted_unsolved(&progress));
                state.progress = Arc::new(progress);
                state.progress_status = Status::Ready;
                state.refresh_metrics();
                info!(
                    "{}: {} solved, {} attempted unsolved",
                    handle,
                    state.progress.solved.len(),
                    state.attempted_unsolved.len()
                );
                Ok(())
            }
            Err(e) => {
                warn!("{}", e);
                state.progress_status = Status::Failed(e.clone());
                Err(e)
            }
        };
        match info {
            Ok(v) => {
                state.user_info = Some(v);
                state.info_status = Status::Ready;
            }
            Err(e) => {
                warn!("{}", e);
                state.info_status = Status::Failed(e);
            }
        }
        let solved: Option<Vec<ProblemKey>> = if result.is_ok() {
            let mut keys: Vec<ProblemKey> = state.progress.solved.iter().cloned().collect();
            keys.sort();
            Some(keys)
        } else {
            None
        };
        let user_info = state.user_info.clone();
        drop(state);

        if let Some(keys) = solved {
            self.store(SOLVED_KEY, &keys);
        }
        if let Some(v) = user_info {
            self.store(USER_INFO_KEY, &v);
        }
        result
    }
}

/// Owns the session state: catalog, current user and derived counts.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct Tracker {
    inner: Arc<Inner>,
}

impl Tracker {
    pub fn new<T: Transport + 'static>(transport: T, cache: Cache, options: Options) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport: Arc::new(transport),
                cache,
                options,
                state: Mutex::new(State::default()),
                catalog_flight: Flight::new(),
                user_flight: Flight::new(),
            }),
        }
    }
    /// Http session plus a file cache when `cache_path` is set, memory otherwise.
    pub fn from_options(options: Options) -> Result<Self> {
        let session = Session::with_proxy(options.proxy.clone())?;
        let cache = match &options.cache_path {
            Some(p) => {
                let store = FileStore::open(p)?;
                info!("Using cache file {}", store.path().display());
                Cache::new(store)
            }
            None => Cache::new(MemoryStore::new()),
        };
        Ok(Self::new(session, cache, options))
    }

    pub fn options(&self) -> &Options {
        &self.inner.options
    }

    /// Loads the catalog unless it is already loaded. Concurrent callers
    /// share one fetch; a fresh cached catalog avoids the network.
    pub async fn fetch_catalog_once(&self) -> Result<()> {
        self.inner.catalog_once().await
    }
    /// Fetches the catalog again even if one is loaded.
    pub async fn refresh_catalog(&self) -> Result<()> {
        self.inner.refresh_catalog().await.map(|_| ())
    }

    /// Makes `handle` the current user and rebuilds its progress from the
    /// full submission history. Calls for the handle already loading join
    /// that load.
    pub async fn load_user(&self, handle: &str) -> Result<()> {
        let handle = handle.trim().to_string();
        if handle.is_empty() {
            return Err(Error::with_description(
                Kind::SubmissionsUnavailable,
                "empty handle",
            ));
        }
        let generation = {
            let mut state = self.inner.lock();
            if state.handle.as_deref() != Some(handle.as_str()) {
                state.generation += 1;
                state.handle = Some(handle.clone());
                state.progress = Arc::default();
                state.attempted_unsolved = Arc::default();
                state.user_info = None;
                state.info_status = Status::Idle;
                state.refresh_metrics();
            }
            state.generation
        };
        self.inner.store(HANDLE_KEY, &handle);
        let key = (handle.clone(), generation);
        let (started, pending) = self.inner.user_flight.join_or_start(key, || {
            self.inner.clone().fetch_user(handle.clone(), generation).boxed()
        });
        if started {
            info!("Loading user {}", handle);
            self.inner.lock().progress_status = Status::Fetching;
        }
        pending.await
    }

    /// Forgets the current user, in memory and in the cache.
    pub fn clear_user(&self) {
        {
            let mut state = self.inner.lock();
            state.generation += 1;
            state.handle = None;
            state.progress = Arc::default();
            state.attempted_unsolved = Arc::default();
            state.progress_status = Status::Idle;
            state.user_info = None;
            state.info_status = Status::Idle;
            state.refresh_metrics();
        }
        for key in &[HANDLE_KEY, USER_INFO_KEY, SOLVED_KEY] {
            self.inner.forget(key);
        }
    }

    /// Picks up the user of an earlier session, if one was stored, and
    /// reloads it. The stored solved keys stand in for progress until the
    /// reload succeeds. Returns the restored handle.
    pub async fn resume(&self) -> Result<Option<String>> {
        let handle = match self.inner.load::<String>(HANDLE_KEY, None) {
            Some(h) => h,
            None => return Ok(None),
        };
        let user_info = self
            .inner
            .load::<UserInfo>(USER_INFO_KEY, None)
            .filter(|v| v.handle.eq_ignore_ascii_case(&handle));
        let solved = self.cached_solved();
        {
            let mut state = self.inner.lock();
            if state.handle.is_none() {
                state.generation += 1;
                state.handle = Some(handle.clone());
                state.user_info = user_info;
                if let Some(keys) = solved {
                    state.progress = Arc::new(UserProgress {
                        solved: keys.into_iter().collect(),
                        attempted: HashMap::new(),
                    });
                }
                state.refresh_metrics();
            }
        }
        self.load_user(&handle).await?;
        Ok(Some(handle))
    }

    /// Solved keys written by the last successful load, possibly from an
    /// earlier session.
    pub fn cached_solved(&self) -> Option<Vec<ProblemKey>> {
        self.inner.load(SOLVED_KEY, None)
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.inner.lock();
        Snapshot {
            catalog: state.catalog.clone(),
            catalog_status: state.catalog_status.clone(),
            handle: state.handle.clone(),
            progress: state.progress.clone(),
            attempted_unsolved: state.attempted_unsolved.clone(),
            progress_status: state.progress_status.clone(),
            user_info: state.user_info.clone(),
            info_status: state.info_status.clone(),
            metrics: state.metrics,
        }
    }
    pub fn catalog(&self) -> Arc<Catalog> {
        self.inner.lock().catalog.clone()
    }
    pub fn handle(&self) -> Option<String> {
        self.inner.lock().handle.clone()
    }
    pub fn progress(&self) -> Arc<UserProgress> {
        self.inner.lock().progress.clone()
    }
    pub fn attempted_unsolved(&self) -> Arc<Vec<Attempt>> {
        self.inner.lock().attempted_unsolved.clone()
    }
    pub fn metrics(&self) -> Metrics {
        self.inner.lock().metrics
    }
}
