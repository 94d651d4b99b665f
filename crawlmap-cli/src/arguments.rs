use clap::Parser;
use std::path::PathBuf;

/// Crawl a site and write its sitemap.xml.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub(crate) struct Args {
    /// Seed URL to start crawling from
    pub url: String,

    /// Write the sitemap to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keep query strings when canonicalizing URLs
    #[arg(long)]
    pub keep_query: bool,

    /// Keep fragments when canonicalizing URLs
    #[arg(long)]
    pub keep_fragment: bool,

    /// Value for the <changefreq> element (omitted when unset)
    #[arg(long)]
    pub change_freq: Option<String>,

    /// Fixed RFC 3339 timestamp for <lastmod> (defaults to now)
    #[arg(long)]
    pub last_mod: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Log crawl, skip, and error events
    #[arg(short, long)]
    pub verbose: bool,
}
