use thiserror::Error;

#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("invalid seed URL {url:?}: {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("write error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-link failure. Handled inside the crawl, never escalated.
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("malformed link: {0}")]
    Syntax(#[from] url::ParseError),

    #[error("cross-origin link: {0}")]
    CrossOrigin(String),
}

pub type Result<T> = std::result::Result<T, SitemapError>;
