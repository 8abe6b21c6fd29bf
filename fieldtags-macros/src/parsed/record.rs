use super::*;

pub(crate) struct ParsedRecord {
    ident: Ident,
    generics: Generics,
    fields: Vec<ParsedField>,
}

impl ParsedRecord {
    pub(crate) fn from_input(input: &DeriveInput) -> Result<Self> {
        if let Some(attr) = input.attrs.iter().find(|attr| attr.path().is_ident("tags")) {
            return Err(Error::new(attr.span(), "#[tags] belongs on struct fields, not on the struct"));
        }

        let fields = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named
                    .named
                    .iter()
                    .enumerate()
                    .map(|(index, field)| ParsedField::from_field(index, field))
                    .collect::<Result<Vec<_>>>()?,
                Fields::Unnamed(unnamed) => unnamed
                    .unnamed
                    .iter()
                    .enumerate()
                    .map(|(index, field)| ParsedField::from_field(index, field))
                    .collect::<Result<Vec<_>>>()?,
                Fields::Unit => Vec::new(),
            },
            _ => return Err(Error::new(input.ident.span(), "Tagged can only be derived for structs")),
        };

        Ok(Self {
            ident: input.ident.clone(),
            generics: input.generics.clone(),
            fields,
        })
    }

    pub(crate) fn emit(&self) -> TokenStream2 {
        let ident = &self.ident;
        let name = ident.unraw().to_string();
        let fields = self.fields.iter().map(ParsedField::emit);
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        quote! {
            impl #impl_generics ::fieldtags::Describe for #ident #ty_generics #where_clause {
                fn describe() -> ::fieldtags::TypeDescriptor {
                    ::fieldtags::TypeDescriptor::Record(::fieldtags::RecordDescriptor::new(
                        #name,
                        ::std::vec![#(#fields),*],
                    ))
                }
            }
        }
    }
}
