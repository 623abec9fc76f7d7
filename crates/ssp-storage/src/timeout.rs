//! # Deadline-Bounded Store
//!
//! [`TimeoutStore`] runs each call against the wrapped backend on a worker
//! thread and waits at most `deadline` for the answer. A slow backend yields
//! [`StorageError::Timeout`] rather than blocking the caller.
//!
//! ## Writes After a Timeout
//!
//! A worker cannot be killed, so every call carries a commit gate. When the
//! deadline passes the caller tries to abandon the gate:
//!
//! - If the worker has not reached its commit point, the gate closes, the
//!   caller gets `Timeout`, and the staged write or delete is dropped
//!   ([`ContentStore::write_if`]). A write reported as failed never lands.
//! - If the worker is already committing, the outcome is decided; the
//!   caller waits for it and reports it. A backend without a staging step
//!   commits before it starts writing, so its writes are bounded by the
//!   backend rather than the deadline.
//!
//! ## Worker Limit
//!
//! Workers abandoned by a timeout keep running until the backend returns.
//! At most `max_in_flight` workers exist at once; beyond that a call fails
//! immediately with [`StorageError::Saturated`] instead of spawning.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use crate::{ContentStore, StorageError, StorageResult};

/// Default per-call deadline.
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default cap on concurrently running workers.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 64;

// ---------------------------------------------------------------------------
// Commit gate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Open,
    Committing,
    Abandoned,
}

/// Decides, exactly once, whether a call's effect may become visible.
#[derive(Debug)]
struct CommitGate {
    state: Mutex<GateState>,
}

impl CommitGate {
    fn new() -> Self {
        Self {
            state: Mutex::new(GateState::Open),
        }
    }

    /// Worker side: claim the right to commit.
    fn enter_commit(&self) -> bool {
        let mut state = self.state.lock();
        match *state {
            GateState::Open => {
                *state = GateState::Committing;
                true
            }
            GateState::Committing => true,
            GateState::Abandoned => false,
        }
    }

    /// Caller side: give up unless the worker is already committing.
    fn abandon(&self) -> bool {
        let mut state = self.state.lock();
        match *state {
            GateState::Open | GateState::Abandoned => {
                *state = GateState::Abandoned;
                true
            }
            GateState::Committing => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Worker slots
// ---------------------------------------------------------------------------

/// One unit of the in-flight budget, returned on drop.
struct WorkerSlot {
    in_flight: Arc<AtomicUsize>,
}

impl WorkerSlot {
    fn acquire(in_flight: &Arc<AtomicUsize>, limit: usize) -> Option<Self> {
        in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < limit).then_some(n + 1))
            .ok()
            .map(|_| Self {
                in_flight: Arc::clone(in_flight),
            })
    }
}

impl Drop for WorkerSlot {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

// ---------------------------------------------------------------------------
// TimeoutStore
// ---------------------------------------------------------------------------

/// Wraps a [`ContentStore`] with a per-call deadline.
#[derive(Debug)]
pub struct TimeoutStore<S: ?Sized> {
    inner: Arc<S>,
    deadline: Duration,
    max_in_flight: usize,
    in_flight: Arc<AtomicUsize>,
}

impl<S: ContentStore + ?Sized + 'static> TimeoutStore<S> {
    /// Wrap `inner` with the given deadline.
    pub fn new(inner: Arc<S>, deadline: Duration) -> Self {
        Self {
            inner,
            deadline,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Wrap `inner` with [`DEFAULT_STORAGE_TIMEOUT`].
    pub fn with_default_deadline(inner: Arc<S>) -> Self {
        Self::new(inner, DEFAULT_STORAGE_TIMEOUT)
    }

    /// Cap concurrently running workers at `limit` (at least 1).
    pub fn with_max_in_flight(mut self, limit: usize) -> Self {
        self.max_in_flight = limit.max(1);
        self
    }

    /// The configured deadline.
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// The configured worker cap.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Workers currently running, including ones abandoned by a timeout.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    fn run<T, F>(&self, key: &str, op: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&S, &CommitGate) -> StorageResult<T> + Send + 'static,
    {
        let slot = WorkerSlot::acquire(&self.in_flight, self.max_in_flight).ok_or_else(|| {
            tracing::warn!(key, limit = self.max_in_flight, "storage worker limit reached");
            StorageError::Saturated {
                key: key.to_string(),
                limit: self.max_in_flight,
            }
        })?;

        let gate = Arc::new(CommitGate::new());
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let worker_gate = Arc::clone(&gate);
        let spawned = thread::Builder::new()
            .name("ssp-storage-call".to_string())
            .spawn(move || {
                let _slot = slot;
                // The receiver may be gone after a timeout.
                let _ = tx.send(op(&inner, &worker_gate));
            });
        if let Err(source) = spawned {
            return Err(StorageError::Io {
                key: key.to_string(),
                source,
            });
        }

        match rx.recv_timeout(self.deadline) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) if gate.abandon() => {
                tracing::warn!(key, deadline_ms = self.deadline.as_millis() as u64, "storage call timed out");
                Err(self.timeout(key))
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::debug!(key, "deadline passed during commit; awaiting outcome");
                rx.recv().unwrap_or_else(|_| Err(self.timeout(key)))
            }
            Err(RecvTimeoutError::Disconnected) => Err(self.timeout(key)),
        }
    }

    fn timeout(&self, key: &str) -> StorageError {
        StorageError::Timeout {
            key: key.to_string(),
            after: self.deadline,
        }
    }
}

/// Result of a gated mutation the gate refused. Only the worker sees it:
/// the caller has already reported the timeout.
fn abandoned(key: &str) -> StorageError {
    StorageError::Timeout {
        key: key.to_string(),
        after: Duration::ZERO,
    }
}

impl<S: ContentStore + ?Sized + 'static> ContentStore for TimeoutStore<S> {
    fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        let owned = key.to_string();
        self.run(key, move |s, _| s.read(&owned))
    }

    fn write(&self, key: &str, bytes: &[u8]) -> StorageResult<()> {
        let owned = key.to_string();
        let bytes = bytes.to_vec();
        self.run(key, move |s, gate| {
            if s.write_if(&owned, &bytes, &|| gate.enter_commit())? {
                Ok(())
            } else {
                Err(abandoned(&owned))
            }
        })
    }

    fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let owned = prefix.to_string();
        self.run(prefix, move |s, _| s.list(&owned))
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let owned = key.to_string();
        self.run(key, move |s, gate| {
            if s.delete_if(&owned, &|| gate.enter_commit())? {
                Ok(())
            } else {
                Err(abandoned(&owned))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryContentStore;
    use std::time::Instant;

    /// Backend that sleeps before every read.
    struct SlowStore {
        delay: Duration,
        inner: MemoryContentStore,
    }

    impl ContentStore for SlowStore {
        fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
            thread::sleep(self.delay);
            self.inner.read(key)
        }
        fn write(&self, key: &str, bytes: &[u8]) -> StorageResult<()> {
            self.inner.write(key, bytes)
        }
        fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
            self.inner.list(prefix)
        }
        fn delete(&self, key: &str) -> StorageResult<()> {
            self.inner.delete(key)
        }
    }

    /// Backend that takes `delay` to stage a write, then publishes it only
    /// if the gate allows.
    struct SlowStaging {
        delay: Duration,
        inner: MemoryContentStore,
    }

    impl ContentStore for SlowStaging {
        fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
            self.inner.read(key)
        }
        fn write(&self, key: &str, bytes: &[u8]) -> StorageResult<()> {
            self.write_if(key, bytes, &|| true).map(|_| ())
        }
        fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
            self.inner.list(prefix)
        }
        fn delete(&self, key: &str) -> StorageResult<()> {
            self.inner.delete(key)
        }
        fn write_if(&self, key: &str, bytes: &[u8], commit: &dyn Fn() -> bool) -> StorageResult<bool> {
            thread::sleep(self.delay);
            if !commit() {
                return Ok(false);
            }
            self.inner.write(key, bytes).map(|()| true)
        }
    }

    /// Backend whose writes are slow and have no staging step.
    struct SlowWrites {
        delay: Duration,
        inner: MemoryContentStore,
    }

    impl ContentStore for SlowWrites {
        fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
            self.inner.read(key)
        }
        fn write(&self, key: &str, bytes: &[u8]) -> StorageResult<()> {
            thread::sleep(self.delay);
            self.inner.write(key, bytes)
        }
        fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
            self.inner.list(prefix)
        }
        fn delete(&self, key: &str) -> StorageResult<()> {
            self.inner.delete(key)
        }
    }

    fn wait_until_idle<S: ContentStore + ?Sized + 'static>(store: &TimeoutStore<S>) {
        let start = Instant::now();
        while store.in_flight() > 0 && start.elapsed() < Duration::from_secs(5) {
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(store.in_flight(), 0);
    }

    #[test]
    fn test_fast_calls_pass_through() {
        let store = TimeoutStore::with_default_deadline(Arc::new(MemoryContentStore::new()));
        store.write("documents/a.json", b"{}").unwrap();
        assert_eq!(store.read("documents/a.json").unwrap(), b"{}");
        assert_eq!(store.list("documents/").unwrap().len(), 1);
        store.delete("documents/a.json").unwrap();
        assert!(store.read("documents/a.json").unwrap_err().is_not_found());
        assert_eq!(store.deadline(), DEFAULT_STORAGE_TIMEOUT);
        assert_eq!(store.max_in_flight(), DEFAULT_MAX_IN_FLIGHT);
    }

    #[test]
    fn test_slow_read_times_out() {
        let slow = SlowStore {
            delay: Duration::from_millis(500),
            inner: MemoryContentStore::new(),
        };
        slow.write("k", b"v").unwrap();
        let store = TimeoutStore::new(Arc::new(slow), Duration::from_millis(20));
        match store.read("k") {
            Err(StorageError::Timeout { key, after }) => {
                assert_eq!(key, "k");
                assert_eq!(after, Duration::from_millis(20));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        // Calls the backend answers quickly still succeed.
        assert_eq!(store.list("").unwrap(), vec!["k".to_string()]);
    }

    #[test]
    fn test_timed_out_staged_write_never_lands() {
        let backend = Arc::new(SlowStaging {
            delay: Duration::from_millis(200),
            inner: MemoryContentStore::new(),
        });
        backend.inner.write("k", b"old").unwrap();
        let store = TimeoutStore::new(backend.clone(), Duration::from_millis(30));

        assert!(matches!(
            store.write("k", b"late"),
            Err(StorageError::Timeout { .. })
        ));
        wait_until_idle(&store);
        assert_eq!(backend.inner.read("k").unwrap(), b"old");
        assert_eq!(store.read("k").unwrap(), b"old");
    }

    #[test]
    fn test_unstaged_write_reports_its_real_outcome() {
        let backend = Arc::new(SlowWrites {
            delay: Duration::from_millis(150),
            inner: MemoryContentStore::new(),
        });
        let store = TimeoutStore::new(backend.clone(), Duration::from_millis(20));

        // No commit point to stop at: the write is waited for, not disowned.
        store.write("k", b"v").unwrap();
        assert_eq!(backend.inner.read("k").unwrap(), b"v");
    }

    #[test]
    fn test_worker_limit_fails_fast() {
        let slow = SlowStore {
            delay: Duration::from_millis(300),
            inner: MemoryContentStore::new(),
        };
        slow.write("k", b"v").unwrap();
        let store = TimeoutStore::new(Arc::new(slow), Duration::from_millis(20)).with_max_in_flight(2);

        for _ in 0..2 {
            assert!(matches!(store.read("k"), Err(StorageError::Timeout { .. })));
        }
        assert_eq!(store.in_flight(), 2);

        let started = Instant::now();
        match store.read("k") {
            Err(StorageError::Saturated { key, limit }) => {
                assert_eq!(key, "k");
                assert_eq!(limit, 2);
            }
            other => panic!("expected saturation, got {other:?}"),
        }
        assert!(started.elapsed() < Duration::from_millis(20));

        wait_until_idle(&store);
        assert_eq!(store.list("").unwrap(), vec!["k".to_string()]);
    }

    #[test]
    fn test_wraps_trait_objects() {
        let inner: Arc<dyn ContentStore> = Arc::new(MemoryContentStore::new());
        let store = TimeoutStore::new(inner, Duration::from_secs(1));
        store.write("k", b"v").unwrap();
        assert_eq!(store.read("k").unwrap(), b"v");
    }
}
