// SPDX-License-Identifier: MPL-2.0
//! Test utilities for driving asynchronous loaders by hand.
//!
//! A [`GatedLoader`] never completes on its own. Each invocation parks a
//! oneshot sender; the test decides when, and in which order, pending loads
//! finish.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::future::FutureExt;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::LoadError;
use crate::registry::{LocaleContent, Loader};

type LoadResult<C> = Result<Option<C>, LoadError>;

/// Loader whose completions are released manually.
pub struct GatedLoader<C> {
    pending: Arc<Mutex<VecDeque<oneshot::Sender<LoadResult<C>>>>>,
    calls: Arc<AtomicUsize>,
}

impl<C: LocaleContent> GatedLoader<C> {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Loader to register in a registry. Every call parks one load.
    pub fn loader(&self) -> Loader<C> {
        let pending = Arc::clone(&self.pending);
        let calls = Arc::clone(&self.calls);
        Arc::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            let (tx, rx) = oneshot::channel();
            pending.lock().push_back(tx);
            async move {
                rx.await
                    .unwrap_or_else(|_| Err(LoadError::failed("gate dropped")))
            }
            .boxed()
        })
    }

    /// Number of times the loader was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Completes the oldest parked load. Returns false if none is parked.
    pub fn complete(&self, result: LoadResult<C>) -> bool {
        match self.pending.lock().pop_front() {
            Some(tx) => tx.send(result).is_ok(),
            None => false,
        }
    }
}
