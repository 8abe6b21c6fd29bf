//! Field annotation parsing and querying.
//!
//! Struct fields carry annotations in a small `key:"value,modifier"`
//! language, several segments per field separated by whitespace. This crate
//! parses them into [`Tag`]s, groups them per [`Field`] and exposes the
//! fields of a record as a [`Fields`] collection with lookup, filtering and
//! projection.
//!
//! ```
//! use fieldtags::{Tagged, extract_type};
//!
//! #[derive(Tagged)]
//! struct User {
//!     #[tags(json = "id", sql = "id,pk")]
//!     id: u64,
//!     #[tags(r#"json:"email,omitempty""#)]
//!     email: Option<String>,
//!     scratch: Vec<u8>,
//! }
//!
//! let fields = extract_type::<User>().expect("User is a record");
//! assert_eq!(fields.remove_untagged().len(), 2);
//! assert_eq!(fields.by_all_tags(["json", "sql"]).names().collect::<Vec<_>>(), ["id"]);
//! assert!(fields.field("email").and_then(|f| f.tag("json")).is_some_and(|t| t.omit_empty()));
//! ```

extern crate self as fieldtags;

pub mod collection;
pub mod errors;
pub mod extract;
pub mod field;
pub mod parser;
pub mod tag;
pub mod type_name;

pub use collection::Fields;
pub use errors::TagParseError;
pub use extract::{Describe, RawField, RecordDescriptor, TypeDescriptor, extract, extract_type, extract_value};
pub use field::{Field, FieldTag};
pub use fieldtags_macros::Tagged;
pub use parser::{TagParser, parse_annotation};
pub use tag::{Tag, Tags};
