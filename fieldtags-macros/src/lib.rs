use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, quote};
use syn::ext::IdentExt;
use syn::{
    Attribute, Data, DeriveInput, Error, Expr, ExprLit, Field, Fields, Generics, Ident, Lit, LitStr, Meta, Result,
    Token, parse::Parse, parse::ParseStream, parse_macro_input, punctuated::Punctuated, spanned::Spanned,
};

mod parsed;

use parsed::ParsedRecord;

/// Implement `fieldtags::Describe` for a struct.
///
/// Each field's annotation is taken from its `#[tags(...)]` attributes, which
/// accept raw annotation literals, `key = "content"` pairs, or a mix of both.
/// `#[tags = "..."]` is shorthand for a single raw literal. Repeated
/// attributes are concatenated in source order.
///
/// # Example
///
/// ```text
/// #[derive(Tagged)]
/// struct Account {
///     #[tags(json = "id", sql = "id,pk")]
///     id: u64,
///     #[tags = r#"json:"owner,omitempty" sql:"owner_id""#]
///     owner: Option<u64>,
///     cache: Vec<u8>,
/// }
///
/// // Generated describe() lists:
/// //   id     u64          json:"id" sql:"id,pk"
/// //   owner  Option<u64>  json:"owner,omitempty" sql:"owner_id"
/// //   cache  Vec<u8>      (empty)
/// ```
#[proc_macro_derive(Tagged, attributes(tags))]
pub fn derive_tagged(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ParsedRecord::from_input(&input) {
        Ok(parsed) => parsed.emit().into(),
        Err(err) => err.to_compile_error().into(),
    }
}
