//! Ordered field collection and its query operations.
//!
//! Every query borrows the receiver and returns a fresh collection, so a
//! [`Fields`] value can be narrowed step by step without being modified:
//!
//! ```
//! use fieldtags::{Field, Fields, parse_annotation};
//!
//! let fields: Fields = vec![
//!     Field::new("id", "u64", parse_annotation(r#"json:"id" sql:"id,pk""#)),
//!     Field::new("cache", "Vec<u8>", parse_annotation(r#"json:"-""#)),
//!     Field::new("scratch", "String", parse_annotation("")),
//! ]
//! .into();
//!
//! let columns = fields.by_tag("sql").only("sql");
//! assert_eq!(columns[0].tag.modifiers(), &["pk"]);
//! assert_eq!(fields.remove_untagged().len(), 2);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::field::{Field, FieldTag};

/// Fields of one record in declaration order. Duplicate names are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(Vec<Field>);

impl Fields {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// First field with the given name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.0.iter().find(|field| field.name == name)
    }

    /// Fields carrying at least one tag with `key`.
    pub fn by_tag(&self, key: &str) -> Fields {
        self.filter(|field| field.has_tag(key))
    }

    /// Fields carrying at least one of `keys`. No keys, no fields.
    pub fn by_any_tag<I>(&self, keys: I) -> Fields
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let wanted = key_set(keys);
        if wanted.is_empty() {
            return Fields::new();
        }
        self.filter(|field| field.tags.keys().any(|key| wanted.contains(key)))
    }

    /// Fields carrying every one of `keys`; other tags may be present too.
    ///
    /// An empty key set yields an empty collection rather than every field.
    pub fn by_all_tags<I>(&self, keys: I) -> Fields
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let wanted = key_set(keys);
        if wanted.is_empty() {
            return Fields::new();
        }
        self.filter(|field| wanted.iter().all(|key| field.has_tag(key)))
    }

    pub fn filter<F>(&self, mut predicate: F) -> Fields
    where
        F: FnMut(&Field) -> bool,
    {
        self.0.iter().filter(|&field| predicate(field)).cloned().collect()
    }

    /// Drops fields that have no tags.
    pub fn remove_untagged(&self) -> Fields {
        self.filter(|field| !field.is_untagged())
    }

    /// Drops fields whose name is in `names`. Unknown names are ignored.
    pub fn remove<I>(&self, names: I) -> Fields
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let names = key_set(names);
        self.filter(|field| !names.contains(field.name.as_str()))
    }

    /// Pairs every field that has `key` with the first such tag.
    pub fn only(&self, key: &str) -> Vec<FieldTag> {
        self.0.iter().filter_map(|field| field.to_field_tag(key)).collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|field| field.name.as_str())
    }

    pub fn as_slice(&self) -> &[Field] {
        &self.0
    }
}

fn key_set<I>(keys: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    keys.into_iter().map(|key| key.as_ref().to_string()).collect()
}

impl Deref for Fields {
    type Target = [Field];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Field>> for Fields {
    fn from(fields: Vec<Field>) -> Self {
        Self(fields)
    }
}

impl FromIterator<Field> for Fields {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Fields {
    type Item = Field;
    type IntoIter = std::vec::IntoIter<Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One field per line.
impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}
