use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::TagParseError;
use crate::parser;

/// Modifier that marks a value as skippable when empty.
pub const OMIT_EMPTY: &str = "omitempty";

/// Value that marks a field as excluded for a dialect.
pub const IGNORED: &str = "-";

/// A single parsed annotation segment, such as `json:"name,omitempty"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    key: String,
    value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifiers: Vec<String>,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>, modifiers: Vec<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            modifiers,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The first comma-separated piece of the tag content.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Everything after the first comma, trimmed, in source order.
    pub fn modifiers(&self) -> &[String] {
        &self.modifiers
    }

    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    /// Returns true if the modifiers contain `omitempty`.
    pub fn omit_empty(&self) -> bool {
        self.has_modifier(OMIT_EMPTY)
    }

    /// Shortcut for `value == "-"`.
    pub fn ignored(&self) -> bool {
        self.value == IGNORED
    }
}

/// Canonical `key:"value,mod1,mod2"` form. Source spacing is not kept.
impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:\"{}", self.key, escape(&self.value))?;
        for modifier in &self.modifiers {
            write!(f, ",{}", escape(modifier))?;
        }
        f.write_str("\"")
    }
}

impl FromStr for Tag {
    type Err = TagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::shared().parse_segment(s).ok_or_else(|| {
            log::trace!("rejected tag segment {s:?}");
            TagParseError::Malformed { input: s.to_string() }
        })
    }
}

fn escape(piece: &str) -> String {
    piece.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Ordered tags of one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(Vec<Tag>);

impl Tags {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// First tag with the given key.
    pub fn by_key(&self, key: &str) -> Option<&Tag> {
        self.0.iter().find(|tag| tag.key == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.by_key(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(Tag::key)
    }

    pub fn as_slice(&self) -> &[Tag] {
        &self.0
    }

}

impl Deref for Tags {
    type Target = [Tag];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Tag>> for Tags {
    fn from(tags: Vec<Tag>) -> Self {
        Self(tags)
    }
}

impl FromIterator<Tag> for Tags {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Tags {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// `[json:"a" sql:"a,pk"]`, or `[]` when empty.
impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{tag}")?;
        }
        f.write_str("]")
    }
}
