mod arguments;

use std::fs::File;
use std::io::{self, Write};
use std::time::Duration;

use anyhow::Context;
use arguments::Args;
use chrono::{DateTime, Utc};
use clap::Parser;
use crawlmap::Sitemap;
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let mut sitemap = Sitemap::new()
        .with_ignore_query(!args.keep_query)
        .with_ignore_fragment(!args.keep_fragment)
        .with_request_timeout(Duration::from_secs(args.timeout));

    if let Some(freq) = args.change_freq {
        sitemap = sitemap.with_change_freq(freq);
    }
    if let Some(ref raw) = args.last_mod {
        let last_mod = DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("invalid --last-mod timestamp {raw:?}"))?
            .with_timezone(&Utc);
        sitemap = sitemap.with_last_mod(last_mod);
    }

    let mut sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    sitemap
        .generate(&mut sink, &args.url)
        .await
        .with_context(|| format!("generating sitemap for {}", args.url))?;
    sink.flush()?;

    Ok(())
}
