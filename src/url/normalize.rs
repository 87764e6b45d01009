use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a URL according to Program-Scout's identity policy
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything that is not HTTP or HTTPS
/// 3. Reject URLs without a host
/// 4. Remove the fragment (everything after #)
///
/// Trailing slashes and query strings are left untouched.
///
/// # Examples
///
/// ```
/// use program_scout::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.edu/majors/#overview").unwrap();
/// assert_eq!(url.as_str(), "https://example.edu/majors/");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(strip_fragment(url))
}

/// Removes the fragment from an already-parsed URL
pub fn strip_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_fragment() {
        let url = normalize_url("https://example.edu/programs#top").unwrap();
        assert_eq!(url.as_str(), "https://example.edu/programs");
    }

    #[test]
    fn test_lowercases_host() {
        let url = normalize_url("https://Example.EDU/Programs").unwrap();
        assert_eq!(url.as_str(), "https://example.edu/Programs");
    }

    #[test]
    fn test_trailing_slash_is_significant() {
        let with_slash = normalize_url("https://example.edu/majors/").unwrap();
        let without_slash = normalize_url("https://example.edu/majors").unwrap();
        assert_ne!(with_slash, without_slash);
    }

    #[test]
    fn test_query_is_kept() {
        let url = normalize_url("https://example.edu/programs?level=ug&b=2").unwrap();
        assert_eq!(url.as_str(), "https://example.edu/programs?level=ug&b=2");
    }

    #[test]
    fn test_bare_host_gets_root_path() {
        let url = normalize_url("https://example.edu").unwrap();
        assert_eq!(url.as_str(), "https://example.edu/");
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(matches!(
            normalize_url("ftp://example.edu/file"),
            Err(UrlError::InvalidScheme(_))
        ));
        assert!(matches!(
            normalize_url("mailto:admissions@example.edu"),
            Err(UrlError::InvalidScheme(_))
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(normalize_url("not a url"), Err(UrlError::Parse(_))));
        assert!(matches!(normalize_url(""), Err(UrlError::Parse(_))));
    }
}
