use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::Mutex;

/// What the crawl knows about one normalized URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    /// Reached at this many link hops from the seed (minimum observed).
    Reached(usize),
    /// Fetch failed or the response was rejected; excluded from output.
    /// Never flips back to `Reached`.
    Invalid,
}

/// Concurrency-safe record of every URL the crawl has seen.
///
/// Cloning is cheap and shares the underlying map; one registry is
/// constructed per crawl run and handed to every task. Entries are never
/// removed, only lowered in depth or invalidated.
#[derive(Clone, Default)]
pub struct Visited {
    pages: Arc<Mutex<HashMap<String, VisitState>>>,
}

impl Visited {
    pub fn new() -> Self {
        Self::default()
    }

    /// First discoverer wins: returns true (recording `depth`) iff `url` has
    /// never been seen. A losing claim still lowers the stored depth to the
    /// minimum observed, so the recorded depth is the shortest discovery
    /// path even though only the winner fetches.
    pub async fn claim(&self, url: &str, depth: usize) -> bool {
        let mut pages = self.pages.lock().await;
        match pages.entry(url.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(VisitState::Reached(depth));
                true
            }
            Entry::Occupied(mut slot) => {
                if let VisitState::Reached(existing) = slot.get_mut()
                    && depth < *existing
                {
                    *existing = depth;
                }
                false
            }
        }
    }

    /// Exclude a claimed URL from the final sitemap. The claim itself stays,
    /// so the URL is never fetched again.
    pub async fn invalidate(&self, url: &str) {
        self.pages
            .lock()
            .await
            .insert(url.to_string(), VisitState::Invalid);
    }

    /// All valid (url, depth) entries, unsorted. Only meaningful once every
    /// crawl task has finished.
    pub async fn snapshot(&self) -> Vec<(String, usize)> {
        self.pages
            .lock()
            .await
            .iter()
            .filter_map(|(url, state)| match state {
                VisitState::Reached(depth) => Some((url.clone(), *depth)),
                VisitState::Invalid => None,
            })
            .collect()
    }
}
