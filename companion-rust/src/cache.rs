use clover_sdk::{ApiError, ApiResult};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::time::Instant;
use tracing::debug;

/// Outcome of a cached fetch. Both successes and failures are cached.
pub type CachedResult<T> = Result<Arc<T>, ApiError>;

type InFlight<T> = Shared<BoxFuture<'static, CachedResult<T>>>;

/// Freshness windows for cached results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub ttl: Duration,
    pub error_ttl: Duration,
}

impl CachePolicy {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            error_ttl: ttl,
        }
    }
}

struct CacheEntry<T> {
    result: CachedResult<T>,
    fetched_at: Instant,
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self, policy: CachePolicy, now: Instant) -> bool {
        let ttl = if self.result.is_ok() {
            policy.ttl
        } else {
            policy.error_ttl
        };
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

struct CacheState<T> {
    entries: HashMap<String, CacheEntry<T>>,
    in_flight: HashMap<String, (u64, InFlight<T>)>,
    next_generation: u64,
}

impl<T> Default for CacheState<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            in_flight: HashMap::new(),
            next_generation: 0,
        }
    }
}

/// In-memory read-through cache with a TTL per entry and one shared
/// in-flight request per key.
///
/// - A fresh entry (success or error) is returned without a request.
/// - A caller that misses while a request for the same key is pending joins
///   that request instead of starting another one.
/// - A request runs to completion on the tokio runtime even if every caller
///   waiting on it is dropped, and its result still lands in the cache.
/// - Whichever request for a key completes last overwrites the entry.
///
/// The state mutex is only held between awaits, never across one.
pub struct TtlCache<T> {
    policy: CachePolicy,
    state: Arc<Mutex<CacheState<T>>>,
}

impl<T> TtlCache<T>
where
    T: Send + Sync + 'static,
{
    #[must_use]
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            state: Arc::new(Mutex::new(CacheState::default())),
        }
    }

    #[must_use]
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Return the cached result for `key`, joining or starting a request
    /// when there is no fresh entry.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> CachedResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
    {
        let (request, started) = {
            let mut state = lock(&self.state);

            if let Some(entry) = state.entries.get(key) {
                if entry.is_fresh(self.policy, Instant::now()) {
                    debug!(key, "companion cache hit");
                    return entry.result.clone();
                }
            }

            if let Some((_, request)) = state.in_flight.get(key) {
                debug!(key, "companion cache joined in-flight request");
                (request.clone(), false)
            } else {
                debug!(key, "companion cache miss");
                let generation = state.next_generation;
                state.next_generation += 1;
                let request = complete(
                    Arc::clone(&self.state),
                    key.to_string(),
                    generation,
                    fetch(),
                )
                .boxed()
                .shared();
                state
                    .in_flight
                    .insert(key.to_string(), (generation, request.clone()));
                (request, true)
            }
        };

        if started {
            tokio::spawn(request.clone());
        }

        request.await
    }

    /// The cached result for `key` regardless of freshness.
    #[must_use]
    pub fn cached(&self, key: &str) -> Option<CachedResult<T>> {
        lock(&self.state)
            .entries
            .get(key)
            .map(|entry| entry.result.clone())
    }

    #[must_use]
    pub fn is_fresh(&self, key: &str) -> bool {
        lock(&self.state)
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_fresh(self.policy, Instant::now()))
    }

    #[must_use]
    pub fn is_in_flight(&self, key: &str) -> bool {
        lock(&self.state).in_flight.contains_key(key)
    }

    /// Drop the entry for `key` and forget its in-flight request, so the next
    /// read starts a new one. A forgotten request still stores its result
    /// when it completes.
    pub fn invalidate(&self, key: &str) {
        let mut state = lock(&self.state);
        state.entries.remove(key);
        state.in_flight.remove(key);
    }

    /// [`invalidate`](Self::invalidate) every key matching `predicate`.
    /// Returns the number of entries removed.
    pub fn invalidate_where<P>(&self, mut predicate: P) -> usize
    where
        P: FnMut(&str) -> bool,
    {
        let mut state = lock(&self.state);
        let before = state.entries.len();
        state.entries.retain(|key, _| !predicate(key));
        state.in_flight.retain(|key, _| !predicate(key));
        before - state.entries.len()
    }

    /// Replace the cached value of every successful entry whose key matches
    /// `predicate` with `update(value)`. Fetch timestamps are kept, so a
    /// patch never extends freshness. Returns the number of entries patched.
    pub fn patch<P, U>(&self, mut predicate: P, update: U) -> usize
    where
        P: FnMut(&str) -> bool,
        U: Fn(&T) -> T,
    {
        let mut state = lock(&self.state);
        let mut patched = 0;
        for (key, entry) in &mut state.entries {
            if !predicate(key) {
                continue;
            }
            if let Ok(value) = &entry.result {
                entry.result = Ok(Arc::new(update(value)));
                patched += 1;
            }
        }
        patched
    }

    /// Remove entries that are no longer fresh. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let policy = self.policy;
        let mut state = lock(&self.state);
        let before = state.entries.len();
        state.entries.retain(|_, entry| entry.is_fresh(policy, now));
        before - state.entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

async fn complete<T, Fut>(
    state: Arc<Mutex<CacheState<T>>>,
    key: String,
    generation: u64,
    fetch: Fut,
) -> CachedResult<T>
where
    Fut: Future<Output = ApiResult<T>>,
{
    let result = fetch.await.map(Arc::new);

    {
        let mut state = lock(&state);
        if state
            .in_flight
            .get(&key)
            .is_some_and(|(current, _)| *current == generation)
        {
            state.in_flight.remove(&key);
        }
        if let Err(error) = &result {
            debug!(key = %key, %error, "companion cache stored error");
        } else {
            debug!(key = %key, "companion cache stored response");
        }
        state.entries.insert(
            key,
            CacheEntry {
                result: result.clone(),
                fetched_at: Instant::now(),
            },
        );
    }

    result
}

fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
