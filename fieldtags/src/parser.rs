//! Annotation parser for the `key:"value,opt"` mini-language.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::tag::{Tag, Tags};

/// Process-wide parser shared by [`parse_annotation`] and extraction.
static PARSER: Lazy<TagParser> = Lazy::new(TagParser::new);

/// Returns the shared parser instance.
pub fn shared() -> &'static TagParser {
    &PARSER
}

/// Parses a raw annotation string with the shared parser.
///
/// ```
/// let tags = fieldtags::parse_annotation(r#"json:"id,omitempty" sql:"id""#);
/// assert_eq!(tags.len(), 2);
/// assert!(tags[0].omit_empty());
/// ```
pub fn parse_annotation(raw: &str) -> Tags {
    PARSER.parse(raw)
}

/// Compiled segment patterns. Read-only after construction.
#[derive(Debug, Clone)]
pub struct TagParser {
    segment: Regex,
    exact: Regex,
}

/// Key: an identifier, optionally with `-` or `.` after the first character.
const SEGMENT: &str = r#"\b([A-Za-z_][\w\-.]*):"((?:[^"\\]|\\.)*)""#;

impl TagParser {
    pub fn new() -> Self {
        Self {
            segment: Regex::new(SEGMENT).expect("segment pattern compiles"),
            exact: Regex::new(&format!(r"^\s*{SEGMENT}\s*$")).expect("segment pattern compiles"),
        }
    }

    /// Extracts every well-formed segment of `raw`, in source order.
    /// Text between segments is ignored.
    pub fn parse(&self, raw: &str) -> Tags {
        self.segment.captures_iter(raw).map(|caps| build_tag(&caps)).collect()
    }

    /// Parses input that must consist of exactly one segment.
    pub fn parse_segment(&self, segment: &str) -> Option<Tag> {
        self.exact.captures(segment).map(|caps| build_tag(&caps))
    }
}

impl Default for TagParser {
    fn default() -> Self {
        Self::new()
    }
}

fn build_tag(caps: &Captures<'_>) -> Tag {
    let key = &caps[1];
    let content = unescape(&caps[2]);

    let mut pieces = content.split(',').map(str::trim);
    // split always yields at least one piece
    let value = pieces.next().unwrap_or_default();

    Tag::new(key, value, pieces.map(str::to_string).collect())
}

/// Resolves `\"` and `\\`; any other escape is kept verbatim.
fn unescape(content: &str) -> String {
    if !content.contains('\\') {
        return content.to_string();
    }

    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next @ ('"' | '\\')) => out.push(next),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(key: &str, value: &str, modifiers: &[&str]) -> Tag {
        Tag::new(key, value, modifiers.iter().map(|m| m.to_string()).collect())
    }

    #[test]
    fn empty_input_yields_no_tags() {
        assert!(parse_annotation("").is_empty());
        assert!(parse_annotation("   ").is_empty());
    }

    #[test]
    fn single_segment() {
        let tags = parse_annotation(r#"json:"name,omitempty""#);
        assert_eq!(tags.as_slice(), &[tag("json", "name", &["omitempty"])]);
    }

    #[test]
    fn multiple_segments_keep_source_order() {
        let tags = parse_annotation(r#"json:"tag4" gorm:",pk" sql:"tag4, pk""#);
        assert_eq!(
            tags.as_slice(),
            &[
                tag("json", "tag4", &[]),
                tag("gorm", "", &["pk"]),
                tag("sql", "tag4", &["pk"]),
            ]
        );
    }

    #[test]
    fn whitespace_around_pieces_is_trimmed() {
        let tags = parse_annotation(r#"db:"  full name ,  pk ,  unique  ""#);
        assert_eq!(tags[0].value(), "full name");
        assert_eq!(tags[0].modifiers(), &["pk", "unique"]);
    }

    #[test]
    fn ignore_sentinel_is_preserved() {
        let tags = parse_annotation(r#"sql:"-, pk""#);
        assert_eq!(tags[0].value(), "-");
        assert!(tags[0].ignored());
    }

    #[test]
    fn duplicate_modifiers_are_kept() {
        let tags = parse_annotation(r#"x:"v,a,b,a""#);
        assert_eq!(tags[0].modifiers(), &["a", "b", "a"]);
    }

    #[test]
    fn free_text_between_segments_is_skipped() {
        let tags = parse_annotation(r#"see docs json:"a" note:unquoted   yaml:"b""#);
        let keys: Vec<_> = tags.keys().collect();
        assert_eq!(keys, vec!["json", "yaml"]);
    }

    #[test]
    fn punctuation_before_key_is_not_part_of_it() {
        for raw in [r#"(json:"a")"#, r#"see,json:"a""#, r#"x=json:"a""#, r#"-json:"a""#] {
            let keys: Vec<_> = parse_annotation(raw).keys().map(str::to_string).collect();
            assert_eq!(keys, vec!["json"], "input {raw}");
        }
    }

    #[test]
    fn dashed_and_dotted_keys_are_kept() {
        let tags = parse_annotation(r#"x-api:"v" mapstructure.v2:"w""#);
        let keys: Vec<_> = tags.keys().collect();
        assert_eq!(keys, vec!["x-api", "mapstructure.v2"]);
    }

    #[test]
    fn colon_inside_value_is_kept() {
        let tags = parse_annotation(r#"gorm:"type:varchar(64);not null""#);
        assert_eq!(tags[0].key(), "gorm");
        assert_eq!(tags[0].value(), "type:varchar(64);not null");
    }

    #[test]
    fn empty_content_gives_empty_value() {
        let tags = parse_annotation(r#"json:"""#);
        assert_eq!(tags.as_slice(), &[tag("json", "", &[])]);
    }

    #[test]
    fn escaped_quotes_are_unescaped() {
        let tags = parse_annotation(r#"validate:"regex=\"^a\\d$\"" json:"x""#);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].value(), r#"regex="^a\d$""#);
    }

    #[test]
    fn unterminated_segment_is_skipped() {
        assert!(parse_annotation(r#"json:"open"#).is_empty());
    }

    #[test]
    fn parse_segment_requires_exactly_one() {
        let parser = TagParser::new();
        assert_eq!(parser.parse_segment(r#"  json:"a,b"  "#), Some(tag("json", "a", &["b"])));
        assert_eq!(parser.parse_segment(r#"json:"a" sql:"b""#), None);
        assert_eq!(parser.parse_segment("json"), None);
    }
}
