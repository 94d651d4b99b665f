use url::Url;

use crate::error::LinkError;

/// Canonicalizes raw link text into registry keys.
///
/// Two URLs point at the same page iff their normalized string forms are
/// equal. Paths are always forced to end in `/`, which conflates `/about`
/// and `/about/` into one page.
pub struct UrlNormalizer {
    base: Url,
    ignore_query: bool,
    ignore_fragment: bool,
}

impl UrlNormalizer {
    /// Establish the crawl base from the raw seed string.
    ///
    /// Input without a scheme gets `http://`; input that is empty or starts
    /// with `/` is treated as a path on `localhost`.
    pub fn from_seed(
        raw: &str,
        ignore_query: bool,
        ignore_fragment: bool,
    ) -> Result<Self, url::ParseError> {
        let raw = raw.trim();
        let candidate = if raw.contains("://") {
            raw.to_string()
        } else if raw.is_empty() || raw.starts_with('/') {
            format!("http://localhost{}", if raw.is_empty() { "/" } else { raw })
        } else {
            format!("http://{raw}")
        };

        let mut base = Url::parse(&candidate)?;
        if ignore_query {
            base.set_query(None);
        }
        if ignore_fragment {
            base.set_fragment(None);
        }
        force_trailing_slash(&mut base);

        Ok(Self {
            base,
            ignore_query,
            ignore_fragment,
        })
    }

    /// The normalized seed URL. Immutable for the duration of a crawl run.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve `raw` against `context` (the page the link was found on) and
    /// canonicalize it into a registry key.
    ///
    /// The resolved URL must stay on the base origin; anything else is
    /// rejected as [`LinkError::CrossOrigin`]. Non-http schemes (`mailto:`,
    /// `javascript:`) fall out the same way.
    pub fn normalize(&self, raw: &str, context: &Url) -> Result<Url, LinkError> {
        let mut url = context.join(raw.trim())?;

        if url.scheme() != self.base.scheme()
            || url.host_str() != self.base.host_str()
            || url.port() != self.base.port()
        {
            return Err(LinkError::CrossOrigin(url.to_string()));
        }

        if self.ignore_query {
            url.set_query(None);
        }
        if self.ignore_fragment {
            url.set_fragment(None);
        }
        force_trailing_slash(&mut url);

        Ok(url)
    }
}

fn force_trailing_slash(url: &mut Url) {
    let path = url.path();
    if !path.ends_with('/') {
        let slashed = format!("{path}/");
        url.set_path(&slashed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer(seed: &str) -> UrlNormalizer {
        UrlNormalizer::from_seed(seed, true, true).unwrap()
    }

    fn context(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn seed_defaults_scheme_and_trailing_slash() {
        let n = normalizer("example.com");
        assert_eq!(n.base().as_str(), "http://example.com/");
    }

    #[test]
    fn seed_defaults_host_for_bare_path() {
        let n = normalizer("/docs");
        assert_eq!(n.base().as_str(), "http://localhost/docs/");
    }

    #[test]
    fn seed_defaults_everything_for_empty_input() {
        let n = normalizer("");
        assert_eq!(n.base().as_str(), "http://localhost/");
    }

    #[test]
    fn seed_keeps_explicit_scheme_and_path() {
        let n = normalizer("https://example.com/a");
        assert_eq!(n.base().as_str(), "https://example.com/a/");
    }

    #[test]
    fn seed_strips_query_by_default() {
        let n = normalizer("http://example.com/?q=1");
        assert_eq!(n.base().as_str(), "http://example.com/");
    }

    #[test]
    fn seed_keeps_query_when_configured() {
        let n = UrlNormalizer::from_seed("http://example.com/?q=1", false, true).unwrap();
        assert_eq!(n.base().as_str(), "http://example.com/?q=1");
    }

    #[test]
    fn seed_rejects_malformed_input() {
        assert!(UrlNormalizer::from_seed("http://", true, true).is_err());
    }

    #[test]
    fn relative_link_resolves_against_context_not_seed() {
        let n = normalizer("http://example.com");
        let page = context("http://example.com/a/b/");
        let url = n.normalize("../x", &page).unwrap();
        assert_eq!(url.as_str(), "http://example.com/a/x/");
    }

    #[test]
    fn fragment_only_link_resolves_to_context_page() {
        let n = normalizer("http://example.com");
        let page = context("http://example.com/a/b/");
        let url = n.normalize("#section", &page).unwrap();
        assert_eq!(url.as_str(), "http://example.com/a/b/");
    }

    #[test]
    fn absolute_same_origin_link_accepted() {
        let n = normalizer("http://example.com");
        let page = context("http://example.com/");
        let url = n.normalize("http://example.com/about", &page).unwrap();
        assert_eq!(url.as_str(), "http://example.com/about/");
    }

    #[test]
    fn absolute_cross_origin_link_rejected() {
        let n = normalizer("http://example.com");
        let page = context("http://example.com/");
        let err = n.normalize("http://other.com/x", &page).unwrap_err();
        assert!(matches!(err, LinkError::CrossOrigin(_)));
    }

    #[test]
    fn protocol_relative_cross_origin_link_rejected() {
        let n = normalizer("http://example.com");
        let page = context("http://example.com/");
        let err = n.normalize("//other.com/x", &page).unwrap_err();
        assert!(matches!(err, LinkError::CrossOrigin(_)));
    }

    #[test]
    fn scheme_mismatch_rejected() {
        let n = normalizer("http://example.com");
        let page = context("http://example.com/");
        let err = n.normalize("https://example.com/x", &page).unwrap_err();
        assert!(matches!(err, LinkError::CrossOrigin(_)));
    }

    #[test]
    fn port_mismatch_rejected() {
        let n = normalizer("http://example.com");
        let page = context("http://example.com/");
        let err = n.normalize("http://example.com:8080/x", &page).unwrap_err();
        assert!(matches!(err, LinkError::CrossOrigin(_)));
    }

    #[test]
    fn explicit_default_port_is_same_origin() {
        let n = normalizer("http://example.com");
        let page = context("http://example.com/");
        let url = n.normalize("http://example.com:80/x", &page).unwrap();
        assert_eq!(url.as_str(), "http://example.com/x/");
    }

    #[test]
    fn mailto_link_rejected() {
        let n = normalizer("http://example.com");
        let page = context("http://example.com/");
        assert!(n.normalize("mailto:someone@example.com", &page).is_err());
    }

    #[test]
    fn malformed_link_is_a_syntax_error() {
        let n = normalizer("http://example.com");
        let page = context("http://example.com/");
        let err = n.normalize("http://[", &page).unwrap_err();
        assert!(matches!(err, LinkError::Syntax(_)));
    }

    #[test]
    fn strips_query_and_fragment_by_default() {
        let n = normalizer("http://example.com");
        let page = context("http://example.com/");
        let url = n.normalize("/p?q=1#frag", &page).unwrap();
        assert_eq!(url.as_str(), "http://example.com/p/");
    }

    #[test]
    fn keeps_query_when_configured() {
        let n = UrlNormalizer::from_seed("http://example.com", false, true).unwrap();
        let page = context("http://example.com/");
        let url = n.normalize("/p?q=1", &page).unwrap();
        assert_eq!(url.as_str(), "http://example.com/p/?q=1");
    }

    #[test]
    fn slash_and_slashless_paths_share_a_key() {
        let n = normalizer("http://example.com");
        let page = context("http://example.com/");
        let a = n.normalize("/about", &page).unwrap();
        let b = n.normalize("/about/", &page).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn normalize_is_idempotent() {
        let n = normalizer("http://example.com");
        let page = context("http://example.com/");
        let once = n.normalize("/about?x=1#top", &page).unwrap();
        let twice = n.normalize(once.as_str(), &once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn leading_and_trailing_whitespace_trimmed() {
        let n = normalizer("http://example.com");
        let page = context("http://example.com/");
        let url = n.normalize("  /about \n", &page).unwrap();
        assert_eq!(url.as_str(), "http://example.com/about/");
    }
}
