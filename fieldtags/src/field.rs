use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tag::{Tag, Tags};

/// One struct field together with its parsed tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    /// Stringified type, like `String` or `Option<Vec<u8>>`.
    #[serde(rename = "type")]
    pub ty: String,
    pub tags: Tags,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, tags: Tags) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            tags,
        }
    }

    /// First tag with the given key.
    pub fn tag(&self, key: &str) -> Option<&Tag> {
        self.tags.by_key(key)
    }

    pub fn has_tag(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    /// True when the field carried no recognized annotation.
    pub fn is_untagged(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn to_field_tag(&self, key: &str) -> Option<FieldTag> {
        self.tag(key).map(|tag| FieldTag {
            name: self.name.clone(),
            ty: self.ty.clone(),
            tag: tag.clone(),
        })
    }
}

/// `name(type):[tag1 tag2]`; a field without tags renders `name(type):[]`.
impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}):{}", self.name, self.ty, self.tags)
    }
}

/// A field narrowed down to a single tag, as produced by [`Fields::only`](crate::Fields::only).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTag {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub tag: Tag,
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}):{}", self.name, self.ty, self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_display() {
        let field = Field::new(
            "field",
            "string",
            vec![Tag::new("json", "name", vec![]), Tag::new("xml", "", vec!["pk".into()])].into(),
        );
        assert_eq!(field.to_string(), r#"field(string):[json:"name" xml:",pk"]"#);
    }

    #[test]
    fn untagged_field_renders_empty_brackets() {
        let field = Field::new("B", "Unit", Tags::new());
        assert!(field.is_untagged());
        assert_eq!(field.to_string(), "B(Unit):[]");
    }

    #[test]
    fn field_tag_display() {
        let field_tag = FieldTag {
            name: "field".into(),
            ty: "*[]int".into(),
            tag: Tag::new("sql", "-", vec!["omitempty".into()]),
        };
        assert_eq!(field_tag.to_string(), r#"field(*[]int):sql:"-,omitempty""#);
    }

    #[test]
    fn to_field_tag_takes_first_occurrence() {
        let field = Field::new(
            "id",
            "u64",
            vec![Tag::new("sql", "id", vec![]), Tag::new("sql", "legacy_id", vec![])].into(),
        );
        let projected = field.to_field_tag("sql").expect("has sql tag");
        assert_eq!(projected.tag.value(), "id");
        assert!(field.to_field_tag("json").is_none());
    }

    #[test]
    fn type_serializes_as_type() {
        let field = Field::new("id", "u64", Tags::new());
        let json = serde_json::to_value(&field).expect("serialize");
        assert_eq!(json, serde_json::json!({"name": "id", "type": "u64", "tags": []}));
    }
}
