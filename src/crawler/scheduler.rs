//! Batch scheduler for fetch tasks
//!
//! This module handles:
//! - Bounding the number of pages open at once with a semaphore
//! - Spawning one task per URL in a batch
//! - Waiting for the whole batch and returning results in input order
//! - Isolating task panics so siblings are unaffected
//! - Aborting every task of a batch that is abandoned before it completes

use crate::crawler::fetcher::{fetch_page, FetchContext, FetchError, FetchOutcome};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::AbortHandle;

/// Runs batches of fetch tasks under a concurrency limit
///
/// A task holds its permit from before it opens a page until its pacing
/// delay has elapsed, so at most `max_concurrent` pages are ever open.
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    semaphore: Arc<Semaphore>,

    /// Shared state handed to every task
    context: Arc<FetchContext>,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `context` - Session, writer, and counters shared by all tasks
    /// * `max_concurrent` - Maximum number of fetch tasks in flight
    pub fn new(context: Arc<FetchContext>, max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);

        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            context,
        }
    }

    /// Fetches every URL of a batch and waits for all of them
    ///
    /// # Returns
    ///
    /// One outcome per input URL, in the same order. A task that panicked or
    /// was cancelled yields [`FetchError::TaskAborted`].
    ///
    /// Dropping the returned future (for example on interrupt) aborts every
    /// task of the batch, so no fetch outlives the caller.
    pub async fn run_batch(&self, urls: &[String]) -> Vec<FetchOutcome> {
        let handles: Vec<_> = urls
            .iter()
            .map(|url| {
                let semaphore = Arc::clone(&self.semaphore);
                let context = Arc::clone(&self.context);
                let url = url.clone();

                tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| FetchError::TaskAborted(e.to_string()))?;

                    fetch_page(&context, &url).await
                })
            })
            .collect();
        let _guard = AbortOnDrop(handles.iter().map(|h| h.abort_handle()).collect());

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| match joined {
                Ok(outcome) => outcome,
                Err(e) => Err(FetchError::TaskAborted(e.to_string())),
            })
            .collect()
    }
}

/// Aborts the tasks of a batch when dropped; a no-op for finished tasks
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}
