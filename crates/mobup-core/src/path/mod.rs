//! Slash-separated path model
//!
//! Build manifests, module names and workspace locations are all expressed as
//! `/`-separated strings. [`SlashPath`] keeps them as an ordered list of
//! non-empty name segments, so joining a Go module name such as
//! `github.com/acme/lib` onto a workspace directory never depends on the host
//! platform's separator rules.
//!
//! ```rust
//! use mobup_core::path::SlashPath;
//!
//! let p = SlashPath::from("a/b/c/../d");
//! assert_eq!(p.normalize().to_string(), "/a/b/d");
//!
//! let resolved = SlashPath::from("./libGo").resolve(&SlashPath::from("/home/dev/app"));
//! assert_eq!(resolved.to_string(), "/home/dev/app/libGo");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// A normalized view over a `/`-separated path.
///
/// `rooted` records whether the original text started with `/`; it only
/// matters to [`SlashPath::resolve`]. The string form always has exactly one
/// leading separator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlashPath {
    names: Vec<String>,
    rooted: bool,
}

impl SlashPath {
    /// The empty path, rendered as `/`
    pub fn root() -> Self {
        Self {
            names: Vec::new(),
            rooted: true,
        }
    }

    /// Concatenates all given paths into one rooted path
    pub fn concat<'a>(paths: impl IntoIterator<Item = &'a SlashPath>) -> Self {
        let names = paths
            .into_iter()
            .flat_map(|p| p.names.iter().cloned())
            .collect();
        Self {
            names,
            rooted: true,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name_count(&self) -> usize {
        self.names.len()
    }

    pub fn name_at(&self, idx: usize) -> Option<&str> {
        self.names.get(idx).map(String::as_str)
    }

    /// Last segment, or `""` for the empty path
    pub fn name(&self) -> &str {
        self.names.last().map(String::as_str).unwrap_or("")
    }

    pub fn is_rooted(&self) -> bool {
        self.rooted
    }

    pub fn parent(&self) -> Self {
        let mut names = self.names.clone();
        names.pop();
        Self {
            names,
            rooted: self.rooted,
        }
    }

    /// Appends `name`, which may itself contain separators
    pub fn child(&self, name: &str) -> Self {
        self.add(&SlashPath::from(name))
    }

    pub fn add(&self, other: &SlashPath) -> Self {
        Self::concat([self, other])
    }

    pub fn starts_with(&self, prefix: &SlashPath) -> bool {
        self.to_string().starts_with(&prefix.to_string())
    }

    pub fn ends_with(&self, suffix: &SlashPath) -> bool {
        self.to_string().ends_with(&suffix.to_string())
    }

    /// Strips `prefix` from the string form and re-roots the remainder
    pub fn trim_prefix(&self, prefix: &SlashPath) -> Self {
        let full = self.to_string();
        let prefix = prefix.to_string();
        let mut rest = SlashPath::from(full.strip_prefix(&prefix).unwrap_or(&full));
        rest.rooted = true;
        rest
    }

    /// Removes `.` segments and resolves `..` against the retained segments.
    ///
    /// Walking above the root is silently ignored.
    pub fn normalize(&self) -> Self {
        let mut names: Vec<String> = Vec::with_capacity(self.names.len());
        for name in &self.names {
            match name.as_str() {
                "." => {}
                ".." => {
                    names.pop();
                }
                _ => names.push(name.clone()),
            }
        }
        Self {
            names,
            rooted: true,
        }
    }

    /// Resolves this path against `base`.
    ///
    /// Rooted paths are only normalized; everything else is appended to
    /// `base` first.
    pub fn resolve(&self, base: &SlashPath) -> Self {
        if self.rooted {
            return self.normalize();
        }
        base.add(self).normalize()
    }

    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(self.to_string())
    }

    pub fn exists(&self) -> bool {
        self.to_path_buf().exists()
    }

    pub fn is_dir(&self) -> bool {
        self.to_path_buf().is_dir()
    }

    /// Accessible children; unreadable directories yield an empty list
    pub fn list(&self) -> Vec<SlashPath> {
        let Ok(entries) = std::fs::read_dir(self.to_path_buf()) else {
            return Vec::new();
        };
        let mut children: Vec<SlashPath> = entries
            .filter_map(|e| e.ok())
            .map(|e| self.child(&e.file_name().to_string_lossy()))
            .collect();
        children.sort();
        children
    }
}

impl From<&str> for SlashPath {
    fn from(value: &str) -> Self {
        let names = value
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            names,
            rooted: value.starts_with('/'),
        }
    }
}

impl From<String> for SlashPath {
    fn from(value: String) -> Self {
        SlashPath::from(value.as_str())
    }
}

impl From<&std::path::Path> for SlashPath {
    fn from(value: &std::path::Path) -> Self {
        SlashPath::from(value.to_string_lossy().as_ref())
    }
}

impl fmt::Display for SlashPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.names.join("/"))
    }
}

impl Serialize for SlashPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.rooted {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_str(&format!("./{}", self.names.join("/")))
        }
    }
}

impl<'de> Deserialize<'de> for SlashPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(SlashPath::from(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_path() {
        for raw in ["", "/"] {
            let p = SlashPath::from(raw);
            assert_eq!(p.name_count(), 0);
            assert!(p.names().is_empty());
            assert_eq!(p.parent().name_count(), 0);
            assert_eq!(p.to_string(), "/");
        }
    }

    #[test]
    fn test_single_segment() {
        for raw in ["a", "/a", "a/", "/a/"] {
            let p = SlashPath::from(raw);
            assert_eq!(p.name_count(), 1, "{raw}");
            assert_eq!(p.name_at(0), Some("a"));
            assert_eq!(p.parent().name_count(), 0);
            assert_eq!(p.to_string(), "/a");
        }
    }

    #[test]
    fn test_two_segments() {
        for raw in ["a/b", "/a/b", "/a/b/", "a//b"] {
            let p = SlashPath::from(raw);
            assert_eq!(p.name_count(), 2, "{raw}");
            assert_eq!(p.name_at(0), Some("a"));
            assert_eq!(p.name_at(1), Some("b"));
            assert_eq!(p.parent().to_string(), "/a");
            assert_eq!(p.to_string(), "/a/b");
        }
    }

    #[test]
    fn test_concat_child_and_trim() {
        let p = SlashPath::concat([&SlashPath::from("a/b/"), &SlashPath::from("/c")]);
        assert_eq!(p.to_string(), "/a/b/c");

        let p = p.child("d");
        assert_eq!(p.to_string(), "/a/b/c/d");

        let p = p.trim_prefix(&SlashPath::from("a/b/c"));
        assert_eq!(p.to_string(), "/d");

        let p = p.child("/x/y/z");
        assert_eq!(p.to_string(), "/d/x/y/z");

        let p = SlashPath::default().child("/a/b/c");
        assert_eq!(p.to_string(), "/a/b/c");
    }

    #[test]
    fn test_normalize() {
        let cases = [
            ("..", "/"),
            ("../../a", "/a"),
            ("a/b/c/..", "/a/b"),
            ("a/b/c/../d", "/a/b/d"),
            ("a/b/c/../d/./e", "/a/b/d/e"),
            ("./././", "/"),
        ];
        for (raw, expected) in cases {
            assert_eq!(SlashPath::from(raw).normalize().to_string(), expected, "{raw}");
        }
    }

    #[test]
    fn test_resolve() {
        let base = SlashPath::from("/some/thing");
        assert_eq!(SlashPath::from("/my/path").resolve(&base).to_string(), "/my/path");
        assert_eq!(
            SlashPath::from("./my/path").resolve(&base).to_string(),
            "/some/thing/my/path"
        );
        assert_eq!(
            SlashPath::from("my/path").resolve(&base).to_string(),
            "/some/thing/my/path"
        );
        assert_eq!(
            SlashPath::from("my/path/../../").resolve(&base).to_string(),
            "/some/thing"
        );
        assert_eq!(SlashPath::from("/a/../../b").resolve(&base).to_string(), "/b");
    }

    #[test]
    fn test_name() {
        assert_eq!(SlashPath::from("").name(), "");
        assert_eq!(SlashPath::from("/").name(), "");
        assert_eq!(SlashPath::from("/a").name(), "a");
        assert_eq!(SlashPath::from("/a/b").name(), "b");
    }

    #[test]
    fn test_starts_and_ends_with() {
        assert!(SlashPath::from("").starts_with(&SlashPath::from("")));
        assert!(SlashPath::from("a").starts_with(&SlashPath::from("/a")));
        assert!(SlashPath::from("a/b/c/d").starts_with(&SlashPath::from("/a")));

        assert!(SlashPath::from("").ends_with(&SlashPath::from("")));
        assert!(SlashPath::from("a").ends_with(&SlashPath::from("/a")));
        assert!(SlashPath::from("a/b/c/d").ends_with(&SlashPath::from("/d")));
    }

    #[test]
    fn test_serde_keeps_relative_form() {
        #[derive(Serialize, Deserialize)]
        struct Holder {
            out: SlashPath,
        }

        let parsed: Holder = toml::from_str(r#"out = "./out/lib.aar""#).unwrap();
        assert!(!parsed.out.is_rooted());
        assert_eq!(
            parsed.out.resolve(&SlashPath::from("/base")).to_string(),
            "/base/out/lib.aar"
        );

        let text = toml::to_string(&parsed).unwrap();
        assert!(text.contains("./out/lib.aar"));
    }

    #[test]
    fn test_list_missing_directory_is_empty() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = SlashPath::from(temp.path()).child("nope");
        assert!(missing.list().is_empty());
        assert!(!missing.exists());
    }
}
