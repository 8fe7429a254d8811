//! Normalized folder paths.
//!
//! Folder nesting is expressed through parent links on the records; a
//! [`FolderPath`] is the materialized view of such a chain, relative to
//! the assets root. Paths are pure values: stores materialize them and
//! the synchronizer only composes and compares them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A folder path relative to the assets root.
///
/// Always normalized: forward slashes, no leading or trailing
/// separator, no empty or `.` components. The empty path denotes the
/// assets root itself, which is not a folder and can never be created
/// or bound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderPath {
    inner: String,
}

impl FolderPath {
    /// The assets root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Create a path from any string, normalizing separators and
    /// dropping empty components. `"/"`, `""` and `"."` all collapse to
    /// the assets root.
    pub fn new(path: impl AsRef<str>) -> Self {
        let normalized = path.as_ref().replace('\\', "/");
        let inner = normalized
            .split('/')
            .filter(|c| !c.is_empty() && *c != ".")
            .collect::<Vec<_>>()
            .join("/");
        Self { inner }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Whether this is the assets root itself.
    pub fn is_root(&self) -> bool {
        self.inner.is_empty()
    }

    /// Append a component, or a nested relative path.
    pub fn join(&self, segment: impl AsRef<str>) -> Self {
        if self.inner.is_empty() {
            Self::new(segment)
        } else {
            Self::new(format!("{}/{}", self.inner, segment.as_ref()))
        }
    }

    /// Parent path. `None` when already at the assets root.
    pub fn parent(&self) -> Option<Self> {
        if self.inner.is_empty() {
            return None;
        }
        match self.inner.rfind('/') {
            Some(idx) => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            None => Some(Self::root()),
        }
    }

    /// Final path component. `None` at the assets root.
    pub fn name(&self) -> Option<&str> {
        if self.inner.is_empty() {
            None
        } else {
            self.inner.rsplit('/').next()
        }
    }

    /// Components from the root downwards.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|c| !c.is_empty())
    }

    /// Number of components; the assets root has depth zero.
    pub fn depth(&self) -> usize {
        self.components().count()
    }

    /// Whether `self` equals `prefix` or sits somewhere beneath it. The
    /// assets root is a prefix of every path.
    pub fn starts_with(&self, prefix: &Self) -> bool {
        if prefix.is_root() {
            return true;
        }
        self.inner == prefix.inner
            || self
                .inner
                .strip_prefix(&prefix.inner)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inner.is_empty() {
            write!(f, "/")
        } else {
            write!(f, "{}", self.inner)
        }
    }
}

impl From<&str> for FolderPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for FolderPath {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Articles/news", "Articles/news")]
    #[case("Articles//news", "Articles/news")]
    #[case("/Articles/news/", "Articles/news")]
    #[case("Articles\\news", "Articles/news")]
    #[case("./Articles/./news", "Articles/news")]
    #[case("", "")]
    #[case("/", "")]
    #[case("//", "")]
    #[case(".", "")]
    fn test_new_normalizes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(FolderPath::new(input).as_str(), expected);
    }

    #[test]
    fn test_root_is_root() {
        assert!(FolderPath::root().is_root());
        assert!(FolderPath::new("/").is_root());
        assert!(!FolderPath::new("Articles").is_root());
    }

    #[test]
    fn test_join_from_root() {
        let path = FolderPath::root().join("Articles").join("news");
        assert_eq!(path.as_str(), "Articles/news");
    }

    #[test]
    fn test_join_nested_segment() {
        let path = FolderPath::new("Articles").join("2024/news");
        assert_eq!(path.as_str(), "Articles/2024/news");
    }

    #[test]
    fn test_parent_and_name() {
        let path = FolderPath::new("Articles/news/local");
        assert_eq!(path.name(), Some("local"));
        assert_eq!(path.parent(), Some(FolderPath::new("Articles/news")));
        assert_eq!(FolderPath::new("Articles").parent(), Some(FolderPath::root()));
        assert_eq!(FolderPath::root().parent(), None);
        assert_eq!(FolderPath::root().name(), None);
    }

    #[test]
    fn test_components_and_depth() {
        let path = FolderPath::new("a/b/c");
        assert_eq!(path.components().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(path.depth(), 3);
        assert_eq!(FolderPath::root().depth(), 0);
    }

    #[rstest]
    #[case("Articles/news", "Articles", true)]
    #[case("Articles", "Articles", true)]
    #[case("Articles-2/news", "Articles", false)]
    #[case("Articles/news", "", true)]
    #[case("Articles", "Articles/news", false)]
    fn test_starts_with(#[case] path: &str, #[case] prefix: &str, #[case] expected: bool) {
        assert_eq!(
            FolderPath::new(path).starts_with(&FolderPath::new(prefix)),
            expected
        );
    }

    #[test]
    fn test_display_shows_root_as_slash() {
        assert_eq!(FolderPath::root().to_string(), "/");
        assert_eq!(FolderPath::new("Articles/news").to_string(), "Articles/news");
    }
}
