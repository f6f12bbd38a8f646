//! URL helpers shared by the extractor, the selection policies and config
//! validation.
//!
//! URLs travel through the crawler as opaque strings. Nothing here rewrites
//! them: two spellings of the same resource stay two distinct entries.

mod domain;

pub use domain::{extract_host, host_of};

/// Returns the lowercased scheme of `candidate`, if it has one
///
/// Only the text before the first `:` is examined. It must start with an
/// ASCII letter and continue with letters, digits, `+`, `-` or `.`. The
/// rest of the string is not looked at, so `https://bad host/` still has
/// the scheme `https`. Leading whitespace and control characters are
/// skipped.
///
/// # Examples
///
/// ```
/// use sumi_crawl::url::scheme_of;
///
/// assert_eq!(scheme_of("HTTPS://example.com"), Some("https".to_string()));
/// assert_eq!(scheme_of("mailto:a@b.c"), Some("mailto".to_string()));
/// assert_eq!(scheme_of("/relative:path"), None);
/// ```
pub fn scheme_of(candidate: &str) -> Option<String> {
    let trimmed = candidate.trim_start_matches(|c: char| c <= ' ');
    let (scheme, _) = trimmed.split_once(':')?;

    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic()
        || !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        return None;
    }

    Some(scheme.to_ascii_lowercase())
}

/// Returns true if `candidate` carries an `http` or `https` scheme
///
/// The remainder of the URL is not validated.
///
/// # Examples
///
/// ```
/// use sumi_crawl::url::has_web_scheme;
///
/// assert!(has_web_scheme("https://example.com/page"));
/// assert!(has_web_scheme("HTTP://EXAMPLE.COM"));
/// assert!(has_web_scheme("http://a.test:99999/"));
/// assert!(!has_web_scheme("/relative/path"));
/// assert!(!has_web_scheme("mailto:someone@example.com"));
/// ```
pub fn has_web_scheme(candidate: &str) -> bool {
    matches!(scheme_of(candidate).as_deref(), Some("http" | "https"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_and_https_are_web_urls() {
        assert!(has_web_scheme("http://example.com"));
        assert!(has_web_scheme("https://example.com/a?b=c#d"));
    }

    #[test]
    fn test_relative_is_not_web_url() {
        assert!(!has_web_scheme("/b"));
        assert!(!has_web_scheme("page.html"));
        assert!(!has_web_scheme(""));
    }

    #[test]
    fn test_other_schemes_are_not_web_urls() {
        assert!(!has_web_scheme("ftp://example.com/file"));
        assert!(!has_web_scheme("javascript:void(0)"));
        assert!(!has_web_scheme("tel:+1234567890"));
    }

    #[test]
    fn test_scheme_only_urls_count() {
        assert!(has_web_scheme("https://bad host/page"));
        assert!(has_web_scheme("http://a.test:99999/"));
        assert!(has_web_scheme("https:?q=1"));
        assert!(has_web_scheme("  https://example.com"));
    }

    #[test]
    fn test_scheme_of_rejects_invalid_prefixes() {
        assert_eq!(scheme_of("no-colon-here"), None);
        assert_eq!(scheme_of(":empty"), None);
        assert_eq!(scheme_of("1http://x"), None);
        assert_eq!(scheme_of("page?next=http://x"), None);
        assert_eq!(scheme_of("svn+SSH://x"), Some("svn+ssh".to_string()));
    }
}
