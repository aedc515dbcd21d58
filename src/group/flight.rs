//! Load Coalescing
//!
//! Suppresses duplicate concurrent loads of the same key.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::debug;

use crate::error::Result;

// == Call ==
#[derive(Clone)]
enum CallState<T> {
    Pending,
    Done(Result<T>),
    /// The leading caller was dropped before its load finished
    Abandoned,
}

/// One in-flight or finished load, shared by every caller of its key.
struct Call<T> {
    state: watch::Sender<CallState<T>>,
    /// Set when a second caller joined this call
    dup: AtomicBool,
}

impl<T: Clone> Call<T> {
    fn new() -> Self {
        let (state, _) = watch::channel(CallState::Pending);
        Self {
            state,
            dup: AtomicBool::new(false),
        }
    }

    fn is_complete(&self) -> bool {
        matches!(*self.state.borrow(), CallState::Done(_))
    }

    fn is_abandoned(&self) -> bool {
        matches!(*self.state.borrow(), CallState::Abandoned)
    }

    fn complete(&self, result: Result<T>) {
        self.state.send_replace(CallState::Done(result));
    }

    fn abandon(&self) {
        self.state.send_replace(CallState::Abandoned);
    }

    /// Waits for the leader. None means the leader went away without a result.
    async fn wait(&self) -> Option<Result<T>> {
        let mut rx = self.state.subscribe();
        let state = rx
            .wait_for(|state| !matches!(state, CallState::Pending))
            .await
            .map(|state| (*state).clone());
        match state {
            Ok(CallState::Done(result)) => Some(result),
            _ => None,
        }
    }
}

// == Flight ==
/// Per-key call table.
///
/// Among concurrent `run` calls for one key only the first executes its
/// load; the rest wait and receive a clone of the same result. If the
/// leading caller is dropped mid-load, one of the waiters takes over and
/// runs its own load, so waiters only ever see a result a loader produced.
///
/// A finished call is retired from the table by its leader only if another
/// caller joined it while it ran. Otherwise the record stays resident, and
/// the next caller for that key is treated as a duplicate: it receives the
/// stored result and retires the record, so the caller after it loads anew.
pub struct Flight<T> {
    calls: Mutex<HashMap<String, Arc<Call<T>>>>,
}

impl<T> Default for Flight<T> {
    fn default() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone> Flight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    // == Run ==
    /// Runs `load` for `key` unless a call for `key` already exists, in
    /// which case its result is awaited instead.
    ///
    /// The table lock is never held while `load` runs.
    pub async fn run<F, Fut>(&self, key: &str, load: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let call = loop {
            let (call, leading) = self.join(key);
            if leading {
                break call;
            }
            match call.wait().await {
                Some(result) => return result,
                None => debug!(key, "leading load was dropped, retrying"),
            }
        };

        let mut leader = Leader {
            flight: self,
            key,
            call: &call,
            finished: false,
        };
        let result = load().await;
        call.complete(result.clone());
        leader.finished = true;

        if call.dup.load(Ordering::Acquire) {
            self.retire(key, &call);
        }
        result
    }

    /// Number of call records currently in the table.
    pub fn in_flight(&self) -> usize {
        self.calls.lock().len()
    }

    /// Finds or creates the call for `key`; true if the caller leads it.
    fn join(&self, key: &str) -> (Arc<Call<T>>, bool) {
        let mut calls = self.calls.lock();
        let existing = calls.get(key).filter(|c| !c.is_abandoned()).map(Arc::clone);
        if let Some(existing) = existing {
            existing.dup.store(true, Ordering::Release);
            if existing.is_complete() {
                calls.remove(key);
            }
            return (existing, false);
        }

        let call = Arc::new(Call::new());
        calls.insert(key.to_string(), Arc::clone(&call));
        (call, true)
    }

    fn retire(&self, key: &str, call: &Arc<Call<T>>) {
        let mut calls = self.calls.lock();
        if calls.get(key).is_some_and(|c| Arc::ptr_eq(c, call)) {
            calls.remove(key);
        }
    }
}

/// Hands the call over to the waiters if the leading future is dropped
/// before its load finishes.
struct Leader<'a, T: Clone> {
    flight: &'a Flight<T>,
    key: &'a str,
    call: &'a Arc<Call<T>>,
    finished: bool,
}

impl<T: Clone> Drop for Leader<'_, T> {
    fn drop(&mut self) {
        if !self.finished {
            self.flight.retire(self.key, self.call);
            self.call.abandon();
        }
    }
}
