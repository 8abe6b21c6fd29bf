use super::*;

pub(crate) struct ParsedField {
    name: String,
    ty: String,
    annotation: String,
}

impl ParsedField {
    /// Tuple fields have no ident and are named by position.
    pub(crate) fn from_field(index: usize, field: &Field) -> Result<Self> {
        let name = match &field.ident {
            Some(ident) => ident.unraw().to_string(),
            None => index.to_string(),
        };

        let mut pieces = Vec::new();
        for attr in &field.attrs {
            if attr.path().is_ident("tags") {
                Self::parse_tags_attr(attr, &mut pieces)?;
            }
        }

        Ok(Self {
            name,
            ty: field.ty.to_token_stream().to_string(),
            annotation: pieces.join(" "),
        })
    }

    fn parse_tags_attr(attr: &Attribute, pieces: &mut Vec<String>) -> Result<()> {
        match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                Expr::Lit(ExprLit { lit: Lit::Str(raw), .. }) => push_piece(pieces, raw.value().trim()),
                other => return Err(Error::new(other.span(), "#[tags = ...] expects a string literal")),
            },
            Meta::List(_) => {
                let args = attr.parse_args_with(Punctuated::<TagArg, Token![,]>::parse_terminated)?;
                for arg in args {
                    push_piece(pieces, &arg.render());
                }
            }
            Meta::Path(path) => {
                return Err(Error::new(
                    path.span(),
                    "expected #[tags(key = \"value\", ...)], #[tags(\"raw\")] or #[tags = \"raw\"]",
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn emit(&self) -> TokenStream2 {
        let name = &self.name;
        let ty = &self.ty;
        let annotation = &self.annotation;
        // tidied once per process
        quote! {
            {
                static TY: ::std::sync::OnceLock<::std::string::String> = ::std::sync::OnceLock::new();
                ::fieldtags::RawField::new(
                    #name,
                    TY.get_or_init(|| ::fieldtags::type_name::tidy(#ty)).as_str(),
                    #annotation,
                )
            }
        }
    }
}

fn push_piece(pieces: &mut Vec<String>, piece: &str) {
    if !piece.is_empty() {
        pieces.push(piece.to_string());
    }
}

/// One argument inside `#[tags(...)]`.
///
/// `fieldtags-build/src/scanner.rs` reads the same attribute from source and
/// must render it identically; keep the two in sync.
enum TagArg {
    /// Annotation text used as-is, e.g. `r#"json:"id""#`.
    Raw(LitStr),
    /// `json = "id,omitempty"`, rendered as `json:"id,omitempty"`.
    Pair { key: String, value: LitStr },
}

impl Parse for TagArg {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.peek(LitStr) {
            return Ok(TagArg::Raw(input.parse()?));
        }

        // parse_any so that keywords like `type` work as keys
        let key = Ident::parse_any(input)?;
        input.parse::<Token![=]>()?;
        let value: LitStr = input.parse()?;
        Ok(TagArg::Pair {
            key: key.unraw().to_string(),
            value,
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
