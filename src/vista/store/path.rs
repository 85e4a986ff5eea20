use crate::error::{Result, VistaError};
use std::fmt;

/// Characters the realtime database refuses inside a key.
const FORBIDDEN: &[char] = &['.', '#', '$', '[', ']', '/'];

/// A validated, slash-separated location in the database tree.
///
/// The empty path addresses the root. Every segment is a non-empty key
/// without forbidden or control characters, so ids coming from the outside
/// (CLI arguments, stored foreign keys) can never escape their collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse `"projects/u1/p1"`. Leading and trailing slashes are ignored.
    pub fn parse(path: &str) -> Result<Self> {
        let mut parsed = Self::root();
        for segment in path.trim_matches('/').split('/') {
            if segment.is_empty() && path.trim_matches('/').is_empty() {
                break;
            }
            parsed = parsed.child(segment)?;
        }
        Ok(parsed)
    }

    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        segments
            .into_iter()
            .try_fold(Self::root(), |path, segment| path.child(segment.as_ref()))
    }

    pub fn child(&self, segment: &str) -> Result<Self> {
        validate_key(segment)?;
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn parent(&self) -> Option<NodePath> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(VistaError::InvalidPath("empty key".to_string()));
    }
    if let Some(c) = key
        .chars()
        .find(|c| FORBIDDEN.contains(c) || c.is_control())
    {
        return Err(VistaError::InvalidPath(format!(
            "key {:?} contains forbidden character {:?}",
            key, c
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_path() {
        let path = NodePath::parse("/projects/u1/p1/").unwrap();
        assert_eq!(path.segments(), &["projects", "u1", "p1"]);
        assert_eq!(path.to_string(), "projects/u1/p1");
        assert_eq!(path.last(), Some("p1"));
    }

    #[test]
    fn empty_string_is_root() {
        let path = NodePath::parse("").unwrap();
        assert!(path.is_root());
        assert!(path.parent().is_none());
        assert_eq!(NodePath::parse("/").unwrap(), NodePath::root());
    }

    #[test]
    fn rejects_forbidden_characters() {
        assert!(NodePath::root().child("a.b").is_err());
        assert!(NodePath::root().child("a#b").is_err());
        assert!(NodePath::root().child("a$b").is_err());
        assert!(NodePath::root().child("a[0]").is_err());
        assert!(NodePath::root().child("a/b").is_err());
        assert!(NodePath::root().child("").is_err());
        assert!(NodePath::parse("tasks//t1").is_err());
    }

    #[test]
    fn generated_keys_are_valid() {
        assert!(validate_key("-NqL3xY_z9AbC").is_ok());
    }

    #[test]
    fn parent_drops_last_segment() {
        let path = NodePath::from_segments(["publicrep", "r1", "comments", "c1"]).unwrap();
        assert_eq!(path.parent().unwrap().to_string(), "publicrep/r1/comments");
    }
}
