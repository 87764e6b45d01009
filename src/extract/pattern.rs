//! URL pattern generalizer
//!
//! Collapses a page's relative path into a regular expression describing its
//! "family" of pages: the leading directories are kept literally and the final
//! segment is reduced to `.*` followed by whatever came after its last hyphen.

/// Generalizes a relative path into a regex pattern
///
/// Surrounding slashes, the query string and the fragment are ignored. Literal
/// parts are escaped, so the result always compiles and matches `/` followed by
/// the original path.
///
/// # Examples
///
/// ```
/// use program_scout::extract::generalize;
///
/// assert_eq!(generalize("majors/accounting-bs"), "/majors/.*bs");
/// assert_eq!(generalize("programs/overview"), "/programs/.*");
/// assert_eq!(generalize("biology-bs"), "/.*bs");
/// ```
pub fn generalize(relative_path: &str) -> String {
    let path = relative_path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path
        .trim_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    let Some((last, leading)) = segments.split_last() else {
        return "/.*".to_string();
    };

    let suffix = last.rsplit_once('-').map_or("", |(_, suffix)| suffix);

    let mut pattern = String::from("/");
    for segment in leading {
        pattern.push_str(&regex::escape(segment));
        pattern.push('/');
    }
    pattern.push_str(".*");
    pattern.push_str(&regex::escape(suffix));
    pattern
}
