use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::info;

use crate::crawler::{self, CrawlContext};
use crate::error::{Result, SitemapError};
use crate::normalize::UrlNormalizer;
use crate::registry::Visited;
use crate::writer;

const USER_AGENT: &str = concat!("crawlmap/", env!("CARGO_PKG_VERSION"));
const MAX_IDLE_PER_HOST: usize = 20;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sitemap generation options and entry point.
///
/// ```no_run
/// use crawlmap::Sitemap;
///
/// # async fn run() -> Result<(), crawlmap::SitemapError> {
/// let mut out = Vec::new();
/// Sitemap::new()
///     .with_change_freq("monthly")
///     .generate(&mut out, "https://example.com")
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Sitemap {
    ignore_query: bool,
    ignore_fragment: bool,
    change_freq: Option<String>,
    last_mod: Option<DateTime<Utc>>,
    request_timeout: Duration,
}

impl Sitemap {
    pub fn new() -> Self {
        Self {
            ignore_query: true,
            ignore_fragment: true,
            change_freq: None,
            last_mod: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Strip query strings during normalization (default true).
    pub fn with_ignore_query(mut self, ignore: bool) -> Self {
        self.ignore_query = ignore;
        self
    }

    /// Strip fragments during normalization (default true).
    pub fn with_ignore_fragment(mut self, ignore: bool) -> Self {
        self.ignore_fragment = ignore;
        self
    }

    /// Emit `<changefreq>` with this value on every entry. An empty string
    /// behaves as unset.
    pub fn with_change_freq(mut self, freq: impl Into<String>) -> Self {
        self.change_freq = Some(freq.into());
        self
    }

    /// Fixed `<lastmod>` timestamp shared by every entry. Defaults to the
    /// time of writing.
    pub fn with_last_mod(mut self, last_mod: DateTime<Utc>) -> Self {
        self.last_mod = Some(last_mod);
        self
    }

    /// Per-request timeout for page fetches (default 10 seconds).
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Crawl the site at `seed` and write the sitemap XML to `sink`.
    ///
    /// Per-URL fetch and parse failures never fail the run; a dead seed
    /// yields an empty urlset. Errors out only on an unusable seed URL,
    /// HTTP client construction failure, or a sink write failure.
    pub async fn generate<W: Write>(&self, sink: &mut W, seed: &str) -> Result<()> {
        let normalizer = UrlNormalizer::from_seed(seed, self.ignore_query, self.ignore_fragment)
            .map_err(|source| SitemapError::InvalidSeed {
                url: seed.to_string(),
                source,
            })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.request_timeout)
            .pool_max_idle_per_host(MAX_IDLE_PER_HOST)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        info!("Starting crawl of {}", normalizer.base());

        let visited = Visited::new();
        let ctx = Arc::new(CrawlContext::new(client, normalizer, visited.clone()));
        crawler::crawl(ctx).await;

        let entries = visited.snapshot().await;
        info!("Crawl complete, {} pages reachable", entries.len());

        let last_mod = self.last_mod.unwrap_or_else(Utc::now);
        writer::write_sitemap(sink, entries, self.change_freq.as_deref(), last_mod)?;
        Ok(())
    }
}

impl Default for Sitemap {
    fn default() -> Self {
        Self::new()
    }
}
