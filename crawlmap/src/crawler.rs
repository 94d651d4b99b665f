use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use url::Url;

use crate::normalize::UrlNormalizer;
use crate::registry::Visited;

/// Shared, read-only state for one crawl run.
pub(crate) struct CrawlContext {
    client: Client,
    normalizer: UrlNormalizer,
    visited: Visited,
    anchors: Selector,
}

impl CrawlContext {
    pub(crate) fn new(client: Client, normalizer: UrlNormalizer, visited: Visited) -> Self {
        Self {
            client,
            normalizer,
            visited,
            anchors: Selector::parse("a[href]").unwrap(),
        }
    }
}

/// Crawl everything reachable from the base URL and block until every
/// spawned task has finished.
pub(crate) async fn crawl(ctx: Arc<CrawlContext>) {
    let seed = ctx.normalizer.base().clone();

    // Sender-drop wait group: every task owns a clone, the receiver yields
    // None once the last one is gone.
    let (done, mut all_done) = mpsc::channel::<()>(1);
    spawn_crawl(ctx, seed, 0, done);
    let _ = all_done.recv().await;
}

/// One task per discovered link, unbounded fan-out. Fan-out width equals the
/// branching factor of the pages being crawled; fine for small and medium
/// sites, a scalability limit for huge ones.
fn spawn_crawl(ctx: Arc<CrawlContext>, url: Url, depth: usize, done: mpsc::Sender<()>) {
    tokio::spawn(async move {
        crawl_page(&ctx, url, depth, &done).await;
    });
}

async fn crawl_page(ctx: &Arc<CrawlContext>, url: Url, depth: usize, done: &mpsc::Sender<()>) {
    if !ctx.visited.claim(url.as_str(), depth).await {
        debug!("Skipping {} (already visited)", url);
        return;
    }

    debug!("Crawling {} at depth {}", url, depth);

    let response = match ctx.client.get(fetch_target(&url)).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Fetch failed for {}: {}", url, e);
            ctx.visited.invalidate(url.as_str()).await;
            return;
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        debug!("Skipping {} (status {})", url, status);
        ctx.visited.invalidate(url.as_str()).await;
        return;
    }

    let is_html = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|content_type| content_type.starts_with("text/html"))
        .unwrap_or(false);
    if !is_html {
        debug!("Skipping {} (not text/html)", url);
        ctx.visited.invalidate(url.as_str()).await;
        return;
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!("Failed reading body of {}: {}", url, e);
            ctx.visited.invalidate(url.as_str()).await;
            return;
        }
    };

    // The page itself stays listed from here on, whatever its markup yields.
    for link in extract_links(ctx, &body, &url) {
        spawn_crawl(ctx.clone(), link, depth + 1, done.clone());
    }
}

/// Anchor hrefs in document order, normalized against the page they were
/// found on. Per-link failures are dropped, never fatal to the page.
fn extract_links(ctx: &CrawlContext, body: &str, page: &Url) -> Vec<Url> {
    let document = Html::parse_document(body);
    let mut links = Vec::new();

    for anchor in document.select(&ctx.anchors) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        match ctx.normalizer.normalize(href, page) {
            Ok(link) => links.push(link),
            Err(e) => debug!("Dropping link {:?} on {}: {}", href, page, e),
        }
    }

    links
}

/// The trailing slash on normalized URLs is a registry-key artifact; request
/// the unslashed path so `/about` style resources resolve directly.
fn fetch_target(url: &Url) -> Url {
    let path = url.path();
    if path != "/" && path.ends_with('/') {
        let mut target = url.clone();
        let trimmed = path[..path.len() - 1].to_string();
        target.set_path(&trimmed);
        target
    } else {
        url.clone()
    }
}
