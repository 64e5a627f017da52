//! Dot-separated paths into a configuration tree.
//!
//! A path addresses exactly one node in a nested configuration document.
//! Segments are object keys only; there is no wildcard or array-index
//! syntax. The root of the document is addressed by the empty path, which
//! displays as the reserved sentinel `$`.

use serde::de::{Deserializer, Error as DeError};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A dot-separated key path into a configuration tree.
///
/// Paths are ordered sequences of object keys. The empty path addresses
/// the document root and serializes as `$` so it can key a change-record
/// map without colliding with a real key.
///
/// # Examples
///
/// ```
/// use canopy_state::Path;
///
/// let path: Path = "window.theme.accent".parse().unwrap();
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.to_string(), "window.theme.accent");
/// assert_eq!(path.parent().unwrap().to_string(), "window.theme");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path(Vec<String>);

impl Path {
    /// Create the empty (root) path.
    #[inline]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Create a path from a vector of key segments.
    #[inline]
    pub fn from_segments(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Append a key segment and return self (builder pattern).
    #[inline]
    pub fn key(mut self, k: impl Into<String>) -> Self {
        self.0.push(k.into());
        self
    }

    /// Return a new path with one extra trailing segment.
    #[inline]
    pub fn child(&self, k: impl Into<String>) -> Self {
        let mut p = self.clone();
        p.0.push(k.into());
        p
    }

    /// Push a key segment onto the path (mutating).
    #[inline]
    pub fn push(&mut self, k: impl Into<String>) {
        self.0.push(k.into());
    }

    /// Pop the last segment from the path.
    #[inline]
    pub fn pop(&mut self) -> Option<String> {
        self.0.pop()
    }

    /// The key segments of this path.
    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// True for the root path.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments in this path.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if this path has no segments (alias for [`Path::is_root`]).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The last segment, if any.
    #[inline]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// The parent path, or `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<Path> {
        if self.0.is_empty() {
            None
        } else {
            Some(Path(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Check if this path is a prefix of another path.
    ///
    /// A path is a prefix of itself. The root path is a prefix of every
    /// path.
    #[inline]
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Check if this path starts with another path.
    #[inline]
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Iterate over this path and each of its ancestors, most specific
    /// first, stopping before the root.
    ///
    /// Used for bottom-up listener propagation: a change at `a.b.c` must
    /// reach listeners registered at `a.b.c`, `a.b`, and `a`.
    ///
    /// # Examples
    ///
    /// ```
    /// use canopy_state::path;
    ///
    /// let chain: Vec<String> = path!("a", "b", "c")
    ///     .self_and_ancestors()
    ///     .map(|p| p.to_string())
    ///     .collect();
    /// assert_eq!(chain, ["a.b.c", "a.b", "a"]);
    /// ```
    pub fn self_and_ancestors(&self) -> impl Iterator<Item = Path> + '_ {
        (1..=self.0.len())
            .rev()
            .map(move |end| Path(self.0[..end].to_vec()))
    }

    /// Iterate over the segments.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "$")
        } else {
            write!(f, "{}", self.0.join("."))
        }
    }
}

impl FromStr for Path {
    type Err = Infallible;

    /// Parse a dot-separated path. `$` and the empty string parse to the
    /// root path; empty segments (from doubled or trailing dots) are
    /// skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "$" {
            return Ok(Path::root());
        }
        Ok(Path(
            s.split('.')
                .filter(|seg| !seg.is_empty())
                .map(str::to_owned)
                .collect(),
        ))
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl From<String> for Path {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl FromIterator<String> for Path {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Construct a [`Path`] from a sequence of key segments.
///
/// # Examples
///
/// ```
/// use canopy_state::path;
///
/// let p = path!("window", "theme", "accent");
/// assert_eq!(p.to_string(), "window.theme.accent");
/// assert_eq!(path!().to_string(), "$");
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($seg:expr),+ $(,)?) => {{
        let mut p = $crate::Path::root();
        $(
            p.push($seg);
        )+
        p
    }};
}
