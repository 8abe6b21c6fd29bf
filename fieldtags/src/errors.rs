use thiserror::Error;

/// Failure to read a string as exactly one `key:"value"` segment.
///
/// Only strict parsing through [`Tag::from_str`](crate::Tag) reports this;
/// [`parse_annotation`](crate::parse_annotation) skips malformed text instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagParseError {
    #[error("expected a single key:\"value\" segment, got {input:?}")]
    Malformed { input: String },
}
