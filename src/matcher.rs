//! Request path matching.
//!
//! Matches incoming request paths against registered endpoint paths. This is
//! equality and prefix matching only; no path parameters are extracted.

/// A registered path, compiled for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches the path itself, with or without a trailing slash
    Exact(String),
    /// Pattern ending in `/`: also matches every path below it
    Directory(String),
}

impl PathPattern {
    pub fn new(pattern: &str) -> Self {
        if pattern.ends_with('/') {
            PathPattern::Directory(pattern.to_string())
        } else {
            PathPattern::Exact(pattern.to_string())
        }
    }

    /// The registered path this pattern was compiled from.
    pub fn as_str(&self) -> &str {
        match self {
            PathPattern::Exact(p) | PathPattern::Directory(p) => p,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        let pattern = self.as_str();
        if pattern == path {
            return true;
        }
        if trim_trailing_slash(pattern) == trim_trailing_slash(path) {
            return true;
        }
        match self {
            PathPattern::Directory(prefix) => path.starts_with(prefix.as_str()),
            PathPattern::Exact(_) => false,
        }
    }
}

/// Whether `path` matches the registered `pattern`.
pub fn matches_pattern(pattern: &str, path: &str) -> bool {
    PathPattern::new(pattern).matches(path)
}

fn trim_trailing_slash(s: &str) -> &str {
    s.strip_suffix('/').unwrap_or(s)
}

/// First pattern in `patterns` matching `path`, in iteration order.
pub fn find_first<'a, I>(patterns: I, path: &str) -> Option<&'a PathPattern>
where
    I: IntoIterator<Item = &'a PathPattern>,
{
    patterns.into_iter().find(|p| p.matches(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_path_matching() {
        assert!(matches_pattern("/api/users", "/api/users"));
        assert!(!matches_pattern("/api/users", "/api/products"));
        assert!(!matches_pattern("/api/users", "/api/users/123"));
    }

    #[test]
    fn test_trailing_slash_equivalence() {
        assert!(matches_pattern("/api/users", "/api/users/"));
        assert!(matches_pattern("/api/users/", "/api/users"));
        assert!(matches_pattern("/", ""));
    }

    #[test]
    fn test_directory_prefix_matching() {
        assert!(matches_pattern("/api/", "/api/users/123"));
        assert!(matches_pattern("/api/", "/api/"));
        assert!(!matches_pattern("/api/", "/apix"));
        assert!(!matches_pattern("/api/", "/other"));
        assert!(matches_pattern("/", "/anything/at/all"));
    }

    #[test]
    fn test_pattern_kind() {
        assert_eq!(PathPattern::new("/api/"), PathPattern::Directory("/api/".into()));
        assert_eq!(PathPattern::new("/api"), PathPattern::Exact("/api".into()));
        assert_eq!(PathPattern::new("/api").as_str(), "/api");
    }

    #[test]
    fn test_first_match_wins() {
        let patterns = vec![PathPattern::new("/api/"), PathPattern::new("/api/users")];
        let found = find_first(&patterns, "/api/users").unwrap();
        assert_eq!(found.as_str(), "/api/");

        let reversed = vec![PathPattern::new("/api/users"), PathPattern::new("/api/")];
        let found = find_first(&reversed, "/api/users").unwrap();
        assert_eq!(found.as_str(), "/api/users");

        assert!(find_first(&patterns, "/nope").is_none());
    }
}
