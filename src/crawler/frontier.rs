//! Breadth-first frontier with a visited set
//!
//! The frontier is owned by the crawl loop and only changes between batches:
//! [`Frontier::next_batch`] commits URLs as visited when they are selected,
//! and [`Frontier::absorb`] appends links discovered by a finished batch.

use std::collections::{HashSet, VecDeque};

/// FIFO queue of URLs to fetch plus the set of URLs already dispatched
#[derive(Debug)]
pub struct Frontier {
    /// URLs waiting to be fetched, oldest first
    queue: VecDeque<String>,

    /// Membership index for `queue`
    queued: HashSet<String>,

    /// Every URL ever selected into a batch
    visited: HashSet<String>,

    /// `visited` in dispatch order
    dispatch_order: Vec<String>,

    /// Largest batch ever handed out
    max_batch: usize,
}

impl Frontier {
    /// Creates a frontier holding only the seed
    ///
    /// # Arguments
    ///
    /// * `seed` - The first URL to fetch
    /// * `max_batch` - Upper bound on the size of any batch (the concurrency width)
    pub fn new(seed: impl Into<String>, max_batch: usize) -> Self {
        let seed = seed.into();

        let mut queue = VecDeque::new();
        let mut queued = HashSet::new();
        queued.insert(seed.clone());
        queue.push_back(seed);

        Self {
            queue,
            queued,
            visited: HashSet::new(),
            dispatch_order: Vec::new(),
            max_batch: max_batch.max(1),
        }
    }

    /// Selects the next batch of URLs to fetch
    ///
    /// Pops from the front of the queue until the batch holds
    /// `min(max_batch, remaining_budget)` URLs or the queue runs dry. URLs
    /// already visited are discarded. Each selected URL is marked visited
    /// immediately, before it is fetched.
    ///
    /// # Returns
    ///
    /// The batch, possibly empty when the queue is exhausted
    pub fn next_batch(&mut self, remaining_budget: usize) -> Vec<String> {
        let limit = self.max_batch.min(remaining_budget);
        let mut batch = Vec::with_capacity(limit);

        while batch.len() < limit {
            let Some(url) = self.queue.pop_front() else {
                break;
            };
            self.queued.remove(&url);

            if !self.visited.insert(url.clone()) {
                tracing::trace!("Skipping already visited {}", url);
                continue;
            }

            self.dispatch_order.push(url.clone());
            batch.push(url);
        }

        batch
    }

    /// Appends newly discovered links to the back of the queue
    ///
    /// Links already visited or already queued are ignored; the rest keep
    /// their discovery order.
    ///
    /// # Returns
    ///
    /// Number of links appended
    pub fn absorb<S: AsRef<str>>(&mut self, links: &[S]) -> usize {
        let mut added = 0;

        for link in links {
            let link = link.as_ref();
            if self.visited.contains(link) || self.queued.contains(link) {
                continue;
            }

            self.queued.insert(link.to_string());
            self.queue.push_back(link.to_string());
            added += 1;
        }

        added
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of URLs waiting in the queue
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Every dispatched URL, in dispatch order
    pub fn visited(&self) -> &[String] {
        &self.dispatch_order
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }
}
