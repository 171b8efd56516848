//! Destination URL validation and normalization.
//!
//! Ensures only well-formed absolute HTTP(S) URLs are shortened and that
//! equivalent spellings are stored the same way.

use url::Url;

/// Errors that can occur while validating a destination URL.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("No URL to shorten")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,

    #[error("Failed to normalize URL: {0}")]
    NormalizationFailed(String),
}

/// A validated destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Normalized absolute URL.
    pub url: String,
    /// Lowercase host, without port.
    pub host: String,
}

/// Validates and normalizes a destination URL.
///
/// # Normalization Rules
///
/// 1. **Whitespace**: Leading and trailing whitespace is trimmed
/// 2. **Protocol**: Only HTTP and HTTPS are allowed
/// 3. **Hostname**: Required, converted to lowercase
/// 4. **Default ports**: Removed (80 for HTTP, 443 for HTTPS)
/// 5. **Fragments**: Removed
/// 6. **Path and query**: Preserved as-is
///
/// # Errors
///
/// Returns [`UrlNormalizationError::Empty`] for blank input,
/// [`UrlNormalizationError::InvalidFormat`] for relative or malformed URLs,
/// [`UrlNormalizationError::UnsupportedProtocol`] for non-HTTP(S) schemes.
///
/// # Examples
///
/// ```ignore
/// let dest = normalize_destination("HTTPS://EXAMPLE.COM:443/Path#top").unwrap();
/// assert_eq!(dest.url, "https://example.com/Path");
/// assert_eq!(dest.host, "example.com");
/// ```
pub fn normalize_destination(input: &str) -> Result<Destination, UrlNormalizationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }

    let mut url =
        Url::parse(input).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .map(str::to_ascii_lowercase)
        .ok_or(UrlNormalizationError::MissingHost)?;

    url.set_host(Some(&host)).map_err(|_| {
        UrlNormalizationError::NormalizationFailed("Failed to set normalized host".to_string())
    })?;

    url.set_fragment(None);

    let is_default_port = matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    );
    if is_default_port {
        url.set_port(None).map_err(|_| {
            UrlNormalizationError::NormalizationFailed("Failed to remove default port".to_string())
        })?;
    }

    Ok(Destination {
        url: url.to_string(),
        host,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_simple_http() {
        let dest = normalize_destination("http://example.com").unwrap();
        assert_eq!(dest.url, "http://example.com/");
        assert_eq!(dest.host, "example.com");
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        let dest = normalize_destination("  https://example.com/x \n").unwrap();
        assert_eq!(dest.url, "https://example.com/x");
    }

    #[test]
    fn test_normalize_uppercase_host() {
        let dest = normalize_destination("https://EXAMPLE.COM/Path").unwrap();
        assert_eq!(dest.url, "https://example.com/Path");
        assert_eq!(dest.host, "example.com");
    }

    #[test]
    fn test_normalize_remove_default_ports() {
        assert_eq!(
            normalize_destination("http://example.com:80/path").unwrap().url,
            "http://example.com/path"
        );
        assert_eq!(
            normalize_destination("https://example.com:443/path").unwrap().url,
            "https://example.com/path"
        );
    }

    #[test]
    fn test_normalize_keep_custom_port() {
        let dest = normalize_destination("http://example.com:8080/path").unwrap();
        assert_eq!(dest.url, "http://example.com:8080/path");
        assert_eq!(dest.host, "example.com");
    }

    #[test]
    fn test_normalize_remove_fragment_keep_query() {
        let dest = normalize_destination("https://example.com/page?key=value#section").unwrap();
        assert_eq!(dest.url, "https://example.com/page?key=value");
    }

    #[test]
    fn test_normalize_ip_address() {
        let dest = normalize_destination("http://192.168.1.1:8080/api").unwrap();
        assert_eq!(dest.host, "192.168.1.1");
    }

    #[test]
    fn test_normalize_empty_string() {
        assert_eq!(normalize_destination(""), Err(UrlNormalizationError::Empty));
        assert_eq!(normalize_destination("   "), Err(UrlNormalizationError::Empty));
    }

    #[test]
    fn test_normalize_relative_url() {
        let result = normalize_destination("example.com/path");
        assert!(matches!(result, Err(UrlNormalizationError::InvalidFormat(_))));
    }

    #[test]
    fn test_normalize_invalid_url() {
        let result = normalize_destination("not a valid url");
        assert!(matches!(result, Err(UrlNormalizationError::InvalidFormat(_))));
    }

    #[test]
    fn test_normalize_rejects_other_protocols() {
        for input in [
            "ftp://example.com/file.txt",
            "file:///home/user/document.txt",
            "javascript:alert('xss')",
            "mailto:test@example.com",
            "data:text/plain,Hello",
        ] {
            assert_eq!(
                normalize_destination(input),
                Err(UrlNormalizationError::UnsupportedProtocol),
                "{} should be rejected",
                input
            );
        }
    }
}
