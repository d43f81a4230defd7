//! Facilities for working with locations within schemas and validated instances.
use std::{borrow::Cow, fmt, fmt::Write, slice::Iter};

use serde_json::Value;

/// JSON Pointer as a wrapper around individual path components.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct JsonPointer(Vec<PathChunk>);

impl JsonPointer {
    /// Return an iterator over the underlying vector of path components.
    pub fn iter(&self) -> Iter<'_, PathChunk> {
        self.0.iter()
    }
    /// Take the last pointer chunk.
    #[must_use]
    pub fn last(&self) -> Option<&PathChunk> {
        self.0.last()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn push(&mut self, chunk: impl Into<PathChunk>) {
        self.0.push(chunk.into());
    }

    /// The location formatted for human-readable messages: `root` stands for
    /// the whole document.
    pub(crate) fn format(&self) -> String {
        if self.0.is_empty() {
            "root".to_string()
        } else {
            format!("`{self}`")
        }
    }
}

impl serde::Serialize for JsonPointer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in &self.0 {
            f.write_char('/')?;
            match chunk {
                PathChunk::Property(value) => {
                    for ch in value.chars() {
                        match ch {
                            '/' => f.write_str("~1")?,
                            '~' => f.write_str("~0")?,
                            _ => f.write_char(ch)?,
                        }
                    }
                }
                PathChunk::Index(idx) => f.write_str(itoa::Buffer::new().format(*idx))?,
            }
        }
        Ok(())
    }
}

/// A key within a JSON object or an index within a JSON array.
///
/// A sequence of chunks is a valid path within a JSON value; keeping indexes
/// unconverted avoids number-to-string formatting during validation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathChunk {
    /// Property name within a JSON object.
    Property(Box<str>),
    /// Index within a JSON array.
    Index(usize),
}

impl From<String> for PathChunk {
    #[inline]
    fn from(value: String) -> Self {
        PathChunk::Property(value.into_boxed_str())
    }
}

impl From<&str> for PathChunk {
    #[inline]
    fn from(value: &str) -> Self {
        PathChunk::Property(value.into())
    }
}

impl From<usize> for PathChunk {
    #[inline]
    fn from(value: usize) -> Self {
        PathChunk::Index(value)
    }
}

impl From<&[PathChunk]> for JsonPointer {
    fn from(chunks: &[PathChunk]) -> Self {
        JsonPointer(chunks.to_vec())
    }
}

impl FromIterator<PathChunk> for JsonPointer {
    fn from_iter<T: IntoIterator<Item = PathChunk>>(iter: T) -> Self {
        JsonPointer(iter.into_iter().collect())
    }
}

/// Escape a single reference token per RFC 6901.
pub fn escape_token(token: &str) -> Cow<'_, str> {
    if token.contains(['~', '/']) {
        Cow::Owned(token.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(token)
    }
}

/// Unescape a single reference token per RFC 6901.
pub fn unescape_token(token: &str) -> Cow<'_, str> {
    if token.contains('~') {
        Cow::Owned(token.replace("~1", "/").replace("~0", "~"))
    } else {
        Cow::Borrowed(token)
    }
}

/// Apply an already-split JSON Pointer to a value.
///
/// Tokens are expected in unescaped form. Returns `None` when a key is
/// missing or an array index is out of range or malformed.
pub(crate) fn lookup<'v>(mut value: &'v Value, tokens: &[Cow<'_, str>]) -> Option<&'v Value> {
    for token in tokens {
        match value {
            Value::Object(map) => value = map.get(token.as_ref())?,
            Value::Array(items) => {
                if token.len() > 1 && token.starts_with('0') {
                    return None;
                }
                value = items.get(token.parse::<usize>().ok()?)?;
            }
            _ => return None,
        }
    }
    Some(value)
}

/// Split a pointer string (starting with `/`, or empty) into unescaped tokens.
pub(crate) fn split(pointer: &str) -> Option<Vec<Cow<'_, str>>> {
    if pointer.is_empty() {
        return Some(Vec::new());
    }
    let rest = pointer.strip_prefix('/')?;
    Some(rest.split('/').map(unescape_token).collect())
}

/// A node in a linked list representing a location under construction.
///
/// Locations are built on the stack while descending into the instance and
/// the schema, and only materialized into a [`JsonPointer`] when a result
/// unit is produced.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Location<'a> {
    Root,
    Property {
        parent: &'a Location<'a>,
        name: &'a str,
    },
    Index {
        parent: &'a Location<'a>,
        index: usize,
    },
}

impl<'a> Location<'a> {
    /// Extend this location with a property name or keyword.
    pub(crate) fn push(&'a self, name: &'a str) -> Location<'a> {
        Location::Property { parent: self, name }
    }

    /// Extend this location with an array index.
    pub(crate) fn push_index(&'a self, index: usize) -> Location<'a> {
        Location::Index {
            parent: self,
            index,
        }
    }

    /// Materialize the chain into an owned pointer.
    pub(crate) fn to_pointer(&self) -> JsonPointer {
        let mut depth = 0;
        let mut head = self;
        loop {
            match head {
                Location::Root => break,
                Location::Property { parent, .. } | Location::Index { parent, .. } => {
                    depth += 1;
                    head = parent;
                }
            }
        }
        let mut chunks = vec![PathChunk::Index(0); depth];
        let mut head = self;
        for slot in chunks.iter_mut().rev() {
            match head {
                Location::Root => unreachable!("chunk count matches depth"),
                Location::Property { parent, name } => {
                    *slot = PathChunk::Property((*name).into());
                    head = parent;
                }
                Location::Index { parent, index } => {
                    *slot = PathChunk::Index(*index);
                    head = parent;
                }
            }
        }
        JsonPointer(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::{escape_token, lookup, split, JsonPointer, Location, PathChunk};
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn pointer_display_escapes() {
        let pointer: JsonPointer = [PathChunk::from("/"), PathChunk::from("~")]
            .as_slice()
            .into();
        assert_eq!(pointer.to_string(), "/~1/~0");
        let data = json!({"/": {"~": 42}});
        assert_eq!(data.pointer(&pointer.to_string()), Some(&json!(42)));
    }

    #[test_case("a/b", "a~1b")]
    #[test_case("m~n", "m~0n")]
    #[test_case("plain", "plain")]
    fn token_escape_round_trip(raw: &str, escaped: &str) {
        assert_eq!(escape_token(raw), escaped);
        assert_eq!(super::unescape_token(escaped), raw);
    }

    #[test]
    fn location_chain_materializes_in_order() {
        let root = Location::Root;
        let a = root.push("items");
        let b = a.push_index(3);
        let c = b.push("name");
        assert_eq!(c.to_pointer().to_string(), "/items/3/name");
        assert_eq!(root.to_pointer().to_string(), "");
    }

    #[test]
    fn lookup_navigates_objects_and_arrays() {
        let data = json!({"a": [{"b": 1}]});
        let tokens = split("/a/0/b").expect("valid pointer");
        assert_eq!(lookup(&data, &tokens), Some(&json!(1)));
        assert_eq!(lookup(&data, &split("/a/1").expect("valid")), None);
        assert_eq!(lookup(&data, &split("/a/00").expect("valid")), None);
        assert_eq!(lookup(&data, &split("").expect("valid")), Some(&data));
    }

    #[test]
    fn formatted_locations_name_the_root() {
        assert_eq!(JsonPointer::default().format(), "root");
        let pointer: JsonPointer = [PathChunk::from("a")].as_slice().into();
        assert_eq!(pointer.format(), "`/a`");
    }
}
