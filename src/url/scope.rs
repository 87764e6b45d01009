use crate::url::normalize::normalize_url;
use crate::UrlResult;
use url::Url;

/// The crawl boundary: every accepted URL must be string-prefixed by the homepage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomepageScope {
    homepage: Url,
}

impl HomepageScope {
    /// Creates a scope from the raw homepage string
    ///
    /// The homepage is normalized first, so `https://example.edu` becomes
    /// the prefix `https://example.edu/`.
    pub fn new(homepage: &str) -> UrlResult<Self> {
        Ok(Self {
            homepage: normalize_url(homepage)?,
        })
    }

    /// The normalized homepage URL
    pub fn homepage(&self) -> &Url {
        &self.homepage
    }

    /// The prefix string every in-scope URL starts with
    pub fn prefix(&self) -> &str {
        self.homepage.as_str()
    }

    /// Returns true if `url` is an http(s) URL under the homepage prefix
    pub fn contains(&self, url: &Url) -> bool {
        (url.scheme() == "http" || url.scheme() == "https")
            && url.as_str().starts_with(self.prefix())
    }

    /// The part of `url` after the homepage prefix, without leading slashes
    ///
    /// Returns `None` for URLs outside the scope.
    pub fn relative_path(&self, url: &Url) -> Option<String> {
        relative_path(url.as_str(), self.prefix())
    }
}

/// Strips `homepage` from the front of `full_url` and trims leading slashes
///
/// # Examples
///
/// ```
/// use program_scout::url::relative_path;
///
/// let path = relative_path(
///     "https://example.edu/academics/majors/biology-bs",
///     "https://example.edu",
/// );
/// assert_eq!(path.as_deref(), Some("academics/majors/biology-bs"));
/// ```
pub fn relative_path(full_url: &str, homepage: &str) -> Option<String> {
    full_url
        .strip_prefix(homepage)
        .map(|rest| rest.trim_start_matches('/').to_string())
}
