//! Extension names and extension sets
//!
//! Extensions are stored dot-prefixed and compared exactly, byte for byte.
//! Case-sensitive matching is deliberate: on case-insensitive filesystems two
//! names differing only by case are still treated as distinct entries.

use crate::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// A validated, dot-prefixed file extension such as `".flac"`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Extension(String);

impl Extension {
    /// Create a new extension, normalizing a missing leading dot.
    ///
    /// Both `"flac"` and `".flac"` produce `".flac"`. An empty name (or a
    /// bare `"."`) is a configuration error.
    pub fn new<S: AsRef<str>>(raw: S) -> Result<Self> {
        let raw = raw.as_ref();
        let normalized = if let Some(rest) = raw.strip_prefix('.') {
            if rest.is_empty() {
                return Err(Error::config("extension must not be a bare '.'"));
            }
            raw.to_string()
        } else {
            if raw.is_empty() {
                return Err(Error::config("extension must not be empty"));
            }
            format!(".{raw}")
        };
        Ok(Self(normalized))
    }

    /// The dot-prefixed extension string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The extension without its leading dot, as `Path::with_extension` wants it
    pub fn without_dot(&self) -> &str {
        &self.0[1..]
    }

    /// Whether `path`'s final extension matches this one exactly.
    ///
    /// Matching is case-sensitive and only considers the suffix after the
    /// last dot of the final path component, so `"a.tar.gz"` matches `".gz"`
    /// but not `".tar.gz"`.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.without_dot())
    }

    /// Parse a comma-separated list of extensions
    pub fn parse_list(raw: &str) -> Result<Vec<Self>> {
        raw.split(',').map(Self::new).collect()
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered set of extensions used as an inclusion filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet(BTreeSet<Extension>);

impl ExtensionSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding a single extension
    pub fn single(ext: Extension) -> Self {
        Self(BTreeSet::from([ext]))
    }

    /// Parse a comma-separated list into a set
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(Extension::parse_list(raw)?.into_iter().collect())
    }

    /// Whether the set is empty.
    ///
    /// An empty set tracks nothing: planning against it short-circuits to an
    /// empty plan rather than treating every destination file as stale.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of extensions in the set
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether `path`'s final extension is a member of the set
    pub fn contains_path(&self, path: &Path) -> bool {
        self.0.iter().any(|ext| ext.matches(path))
    }

    /// Iterate over the extensions in ascending order
    pub fn iter(&self) -> impl Iterator<Item = &Extension> {
        self.0.iter()
    }
}

impl FromIterator<Extension> for ExtensionSet {
    fn from_iter<I: IntoIterator<Item = Extension>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("flac", ".flac")]
    #[case(".flac", ".flac")]
    #[case("tar.gz", ".tar.gz")]
    fn test_extension_normalization(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(Extension::new(raw).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    fn test_extension_rejects_empty(#[case] raw: &str) {
        assert!(Extension::new(raw).is_err());
    }

    #[test]
    fn test_extension_matching_is_case_sensitive() {
        let flac = Extension::new("flac").unwrap();
        assert!(flac.matches(Path::new("music/a.flac")));
        assert!(!flac.matches(Path::new("music/a.FLAC")));
        assert!(!flac.matches(Path::new("music/flac")));
    }

    #[test]
    fn test_extension_matches_final_suffix_only() {
        let gz = Extension::new("gz").unwrap();
        assert!(gz.matches(Path::new("backup/a.tar.gz")));

        let tar_gz = Extension::new("tar.gz").unwrap();
        assert!(!tar_gz.matches(Path::new("backup/a.tar.gz")));
    }

    #[test]
    fn test_dotfile_has_no_extension() {
        let hidden = Extension::new("hidden").unwrap();
        assert!(!hidden.matches(Path::new(".hidden")));
    }

    #[test]
    fn test_parse_list() {
        let exts = Extension::parse_list("flac,.wav,ape").unwrap();
        let names: Vec<_> = exts.iter().map(Extension::as_str).collect();
        assert_eq!(names, vec![".flac", ".wav", ".ape"]);

        assert!(Extension::parse_list("flac,,wav").is_err());
    }

    #[test]
    fn test_set_contains_path() {
        let set = ExtensionSet::parse("flac,wav").unwrap();
        assert!(set.contains_path(Path::new("a/b.flac")));
        assert!(set.contains_path(Path::new("b.wav")));
        assert!(!set.contains_path(Path::new("a/b.mp3")));
        assert!(!set.contains_path(Path::new("flac")));
    }

    #[test]
    fn test_set_deduplicates_and_orders() {
        let set = ExtensionSet::parse("wav,flac,wav").unwrap();
        assert_eq!(set.len(), 2);
        let names: Vec<_> = set.iter().map(Extension::as_str).collect();
        assert_eq!(names, vec![".flac", ".wav"]);
    }

    #[test]
    fn test_empty_set() {
        let set = ExtensionSet::new();
        assert!(set.is_empty());
        assert!(!set.contains_path(Path::new("a.flac")));
    }
}
