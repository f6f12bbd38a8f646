use url::Url;

/// Extracts the host from a parsed URL
///
/// The host is lowercased. URLs without a host (`mailto:`, `data:`) yield
/// `None`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_crawl::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Extracts the host from a raw URL string
///
/// Strings that do not parse, or parse without a host, yield `None`.
pub fn host_of(raw: &str) -> Option<String> {
    Url::parse(raw).ok().as_ref().and_then(extract_host)
}
