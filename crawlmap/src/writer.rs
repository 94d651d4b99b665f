use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

const SITEMAP_XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// One `<url>` entry, projected from the visited registry.
#[derive(Debug, Clone, Serialize)]
pub struct SitemapUrl {
    pub loc: String,
    pub depth: usize,
}

impl SitemapUrl {
    /// Depth 0 maps to 1.0, each hop costs 0.1, floored at 0.1.
    pub fn priority(&self) -> f64 {
        (1.0 - 0.1 * self.depth as f64).max(0.1)
    }
}

/// Serialize the crawl result to sitemap-protocol XML.
///
/// Entries are sorted by depth, then lexicographically by URL; this is the
/// canonical output order. No trailing newline after `</urlset>`. Write
/// failures abort immediately; anything already flushed stays flushed.
pub fn write_sitemap<W: Write>(
    sink: &mut W,
    entries: Vec<(String, usize)>,
    change_freq: Option<&str>,
    last_mod: DateTime<Utc>,
) -> std::io::Result<()> {
    let mut urls: Vec<SitemapUrl> = entries
        .into_iter()
        .map(|(loc, depth)| SitemapUrl { loc, depth })
        .collect();
    urls.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.loc.cmp(&b.loc)));

    writeln!(sink, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(sink, r#"<urlset xmlns="{SITEMAP_XMLNS}">"#)?;

    let last_mod = last_mod.to_rfc3339_opts(SecondsFormat::Secs, true);
    let change_freq = change_freq.filter(|freq| !freq.is_empty());

    for url in &urls {
        writeln!(sink, "  <url>")?;
        writeln!(sink, "    <loc>{}</loc>", url.loc)?;
        writeln!(sink, "    <lastmod>{last_mod}</lastmod>")?;
        writeln!(sink, "    <priority>{:.1}</priority>", url.priority())?;
        if let Some(freq) = change_freq {
            writeln!(sink, "    <changefreq>{freq}</changefreq>")?;
        }
        writeln!(sink, "  </url>")?;
    }

    write!(sink, "</urlset>")?;
    Ok(())
}
