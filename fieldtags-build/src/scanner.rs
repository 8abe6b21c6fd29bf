//! Source file scanner for discovering `#[derive(Tagged)]` structs.
//!
//! The scanner reads struct definitions straight from `.rs` files, so field
//! metadata is available to build scripts and tooling without compiling the
//! crate that declares the structs. It reads `#[tags]` attributes with the
//! same rules as the derive macro.

use anyhow::{Context, Result};
use fieldtags::{Field, Fields, parse_annotation, type_name};
use quote::ToTokens;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::{Attribute, Expr, ExprLit, Ident, Item, Lit, LitStr, Meta, Token};
use walkdir::WalkDir;

/// A tagged struct found in source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedRecord {
    /// The struct name (e.g., "Account")
    pub name: String,
    /// The module path where the struct is defined (e.g., "crate::billing")
    pub module_path: String,
    pub fields: Fields,
}

/// Scan a directory recursively for Rust files containing `Tagged` derives.
pub fn scan_directory(path: &Path, crate_name: &str) -> Result<Vec<ScannedRecord>> {
    let mut records = Vec::new();

    for entry in WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path().extension().is_some_and(|ext| ext == "rs")
                && !e.path().to_string_lossy().contains("/generated/")
                && !e.path().to_string_lossy().contains("/target/")
        })
    {
        let file_path = entry.path();
        match scan_file(file_path, path, crate_name) {
            Ok(found) => records.extend(found),
            Err(err) => log::warn!("skipping {}: {err:#}", file_path.display()),
        }
    }

    Ok(records)
}

/// Scan a single Rust file for `Tagged` derives.
pub fn scan_file(file_path: &Path, base_path: &Path, crate_name: &str) -> Result<Vec<ScannedRecord>> {
    let content =
        fs::read_to_string(file_path).with_context(|| format!("Failed to read {}", file_path.display()))?;

    let module_path = compute_module_path(file_path, base_path, crate_name);
    scan_source(&content, &module_path).with_context(|| format!("Failed to parse {}", file_path.display()))
}

/// Scan source text; `module_path` is the path of the file's own module.
pub fn scan_source(source: &str, module_path: &str) -> Result<Vec<ScannedRecord>> {
    let syntax = syn::parse_file(source)?;
    let mut records = Vec::new();
    collect_items(&syntax.items, module_path, &mut records)?;
    Ok(records)
}

/// Walks items, descending into inline `mod name { ... }` blocks.
fn collect_items(items: &[Item], module_path: &str, records: &mut Vec<ScannedRecord>) -> Result<()> {
    for item in items {
        match item {
            Item::Struct(item_struct) if has_tagged_derive(&item_struct.attrs) => {
                let record = extract_record(item_struct, module_path)?;
                log::debug!(
                    "found {}::{} with {} fields",
                    record.module_path,
                    record.name,
                    record.fields.len()
                );
                records.push(record);
            }
            Item::Mod(item_mod) => {
                if let Some((_, nested)) = &item_mod.content {
                    let nested_path = format!("{module_path}::{}", item_mod.ident.unraw());
                    collect_items(nested, &nested_path, records)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Check if a struct has `#[derive(Tagged)]` (or a path ending in `Tagged`).
fn has_tagged_derive(attrs: &[Attribute]) -> bool {
    for attr in attrs {
        if attr.path().is_ident("derive")
            && let Ok(nested) = attr.parse_args_with(
                syn::punctuated::Punctuated::<syn::Path, syn::Token![,]>::parse_terminated,
            )
        {
            for path in nested {
                if path.segments.last().is_some_and(|segment| segment.ident == "Tagged") {
                    return true;
                }
            }
        }
    }
    false
}

/// Build the field collection of a tagged struct.
fn extract_record(item: &syn::ItemStruct, module_path: &str) -> Result<ScannedRecord> {
    let mut fields = Vec::new();

    for (index, field) in item.fields.iter().enumerate() {
        let name = match &field.ident {
            Some(ident) => ident.unraw().to_string(),
            None => index.to_string(),
        };

        let mut pieces = Vec::new();
        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("tags")) {
            read_tags_attr(attr, &mut pieces)
                .with_context(|| format!("invalid #[tags] on {}.{}", item.ident, name))?;
        }

        let ty = type_name::tidy(&field.ty.to_token_stream().to_string());
        fields.push(Field::new(name, ty, parse_annotation(&pieces.join(" "))));
    }

    Ok(ScannedRecord {
        name: item.ident.unraw().to_string(),
        module_path: module_path.to_string(),
        fields: fields.into(),
    })
}

fn read_tags_attr(attr: &Attribute, pieces: &mut Vec<String>) -> syn::Result<()> {
    match &attr.meta {
        Meta::NameValue(meta) => match &meta.value {
            Expr::Lit(ExprLit { lit: Lit::Str(raw), .. }) => push_piece(pieces, raw.value().trim()),
            other => return Err(syn::Error::new_spanned(other, "#[tags = ...] expects a string literal")),
        },
        Meta::List(_) => {
            let args = attr.parse_args_with(syn::punctuated::Punctuated::<TagArg, Token![,]>::parse_terminated)?;
            for arg in args {
                push_piece(pieces, &arg.render());
            }
        }
        Meta::Path(path) => return Err(syn::Error::new_spanned(path, "#[tags] needs arguments")),
    }
    Ok(())
}

fn push_piece(pieces: &mut Vec<String>, piece: &str) {
    if !piece.is_empty() {
        pieces.push(piece.to_string());
    }
}

/// One argument inside `#[tags(...)]`: a raw literal or `key = "content"`.
///
/// Mirrors `TagArg` in `fieldtags-macros/src/parsed/field.rs`; a scanned
/// struct must yield the same annotation text as the derive.
enum TagArg {
    Raw(LitStr),
    Pair { key: String, value: LitStr },
}

impl Parse for TagArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            return Ok(TagArg::Raw(input.parse()?));
        }
        let key = Ident::parse_any(input)?;
        input.parse::<Token![=]>()?;
        Ok(TagArg::Pair {
            key: key.unraw().to_string(),
            value: input.parse()?,
        })
    }
}

impl TagArg {
    fn render(&self) -> String {
        match self {
            TagArg::Raw(raw) => raw.value().trim().to_string(),
            TagArg::Pair { key, value } => {
                let content = value.value().replace('\\', "\\\\").replace('"', "\\\"");
                format!("{key}:\"{content}\"")
            }
        }
    }
}

/// Compute the module path from a file path.
/// e.g., "src/billing/models/account.rs" -> "crate::billing::models::account"
fn compute_module_path(file_path: &Path, base_path: &Path, crate_name: &str) -> String {
    let relative = file_path.strip_prefix(base_path).unwrap_or(file_path);

    let without_extension = relative.with_extension("");
    let mut parts: Vec<&str> = without_extension
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();

    // Remove "mod", "lib" or "main" from the end if present
    if let Some(last) = parts.last()
        && (*last == "mod" || *last == "lib" || *last == "main")
    {
        parts.pop();
    }

    if parts.is_empty() {
        crate_name.to_string()
    } else {
        format!("{}::{}", crate_name, parts.join("::"))
    }
}
