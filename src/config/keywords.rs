//! Default keyword lists
//!
//! These are the single source of truth for the relevance filter and the
//! heading heuristic. A `[keywords]` table in the configuration replaces them.

/// Terms that mark a link as a likely academic program page
pub const DEFAULT_ALLOW_KEYWORDS: &[&str] = &[
    "program",
    "academic",
    "major",
    "minor",
    "undergrad",
    "graduate",
    "degree",
    "school-of",
    "college-of",
    "certificate",
    "concentration",
];

/// Terms that reject a link outright, even when an allow term also matches
pub const DEFAULT_DENY_KEYWORDS: &[&str] = &[
    "privacy",
    "contact",
    "career",
    "news",
    "login",
    "directory",
    "catalog",
    "faculty",
    "map",
    "terms",
    "event",
    "calendar",
    "donate",
];

/// Degree and level terms looked for in h1-h3 headings
pub const DEFAULT_DEGREE_KEYWORDS: &[&str] = &[
    "master",
    "phd",
    "ph.d",
    "doctor",
    "bachelor",
    "mba",
    "b.s.",
    "b.a.",
    "m.s.",
    "m.a.",
    "associate",
    "certificate",
];

/// Converts a static keyword list into owned strings
pub fn to_owned_list(keywords: &[&str]) -> Vec<String> {
    keywords.iter().map(|k| k.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_are_lowercase() {
        for list in [
            DEFAULT_ALLOW_KEYWORDS,
            DEFAULT_DENY_KEYWORDS,
            DEFAULT_DEGREE_KEYWORDS,
        ] {
            for keyword in list {
                assert_eq!(*keyword, keyword.to_lowercase());
            }
        }
    }

    #[test]
    fn test_allow_and_deny_do_not_overlap() {
        for keyword in DEFAULT_ALLOW_KEYWORDS {
            assert!(!DEFAULT_DENY_KEYWORDS.contains(keyword));
        }
    }
}
