pub mod error;
pub mod normalize;
pub mod registry;
pub mod sitemap;
pub mod writer;

mod crawler;

pub use error::{LinkError, SitemapError};
pub use normalize::UrlNormalizer;
pub use registry::Visited;
pub use sitemap::Sitemap;
