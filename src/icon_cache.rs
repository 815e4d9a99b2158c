//! Bookkeeping for link icon downloads.
//!
//! Each URL is requested at most once per session. Widgets asking for an
//! icon that is still downloading are queued on the running request, and
//! URLs that failed are not retried.

use std::collections::{HashMap, HashSet};

/// Outcome of asking the cache for an icon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconLookup<T> {
    /// Already downloaded
    Ready(T),
    /// A request is running; the waiter was queued on it
    Queued,
    /// No request yet; the caller must start one and report it to `finish`
    Fetch,
    /// An earlier request failed
    Failed,
}

/// Downloaded icons of type `T`, with waiters of type `W` for running requests
#[derive(Debug)]
pub struct IconCache<T, W> {
    loaded: HashMap<String, T>,
    pending: HashMap<String, Vec<W>>,
    failed: HashSet<String>,
}

impl<T, W> Default for IconCache<T, W> {
    fn default() -> Self {
        Self {
            loaded: HashMap::new(),
            pending: HashMap::new(),
            failed: HashSet::new(),
        }
    }
}

impl<T: Clone, W> IconCache<T, W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&mut self, url: &str, waiter: W) -> IconLookup<T> {
        if let Some(icon) = self.loaded.get(url) {
            return IconLookup::Ready(icon.clone());
        }
        if self.failed.contains(url) {
            return IconLookup::Failed;
        }
        if let Some(waiters) = self.pending.get_mut(url) {
            waiters.push(waiter);
            return IconLookup::Queued;
        }

        self.pending.insert(url.to_string(), vec![waiter]);
        IconLookup::Fetch
    }

    /// Record the result of a request and hand back everyone waiting on it
    pub fn finish(&mut self, url: &str, icon: Option<T>) -> Vec<W> {
        match icon {
            Some(icon) => {
                self.loaded.insert(url.to_string(), icon);
            }
            None => {
                log::debug!("Not retrying icon {}", url);
                self.failed.insert(url.to_string());
            }
        }
        self.pending.remove(url).unwrap_or_default()
    }
}
