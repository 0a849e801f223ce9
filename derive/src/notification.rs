use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Field, Fields, Ident, LitStr, Result, Type,
    ext::IdentExt,
    spanned::Spanned,
};

use crate::attribute::{items, labels};

pub(crate) fn expand_notification(input: &DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut notification_name = None;

    for item in items(&input.attrs, "notification")? {
        if item.name == "name" {
            notification_name = Some(item.string()?.clone());
        } else {
            Err(item.unsupported())?
        }
    }

    let name_method = notification_name.map(|notification_name| {
        quote! {
            fn name() -> ::sprocket::notify::NotificationName {
                ::sprocket::notify::NotificationName::new(#notification_name)
            }
        }
    });

    let (labelled, from_payload, to_payload) = match &input.data {
        Data::Enum(data) => {
            if data.variants.is_empty() {
                Err(Error::new(
                    input.span(),
                    "`Notification` may not be derived on enums without variants.",
                ))?
            }

            let labels = labels(data, "notification", "Notification")?;
            let to_label = labels.iter().map(|(variant, label)| {
                quote! { Self::#variant => #label, }
            });
            let from_label = labels.iter().map(|(variant, label)| {
                quote! { #label => ::core::option::Option::Some(Self::#variant), }
            });

            let labelled = quote! {
                impl #impl_generics ::sprocket::notify::Labelled for #name #ty_generics #where_clause {
                    fn label(&self) -> &'static str {
                        match self {
                            #(#to_label)*
                        }
                    }

                    fn from_label(label: &str) -> ::core::option::Option<Self> {
                        match label {
                            #(#from_label)*
                            _ => ::core::option::Option::None,
                        }
                    }
                }
            };

            (
                Some(labelled),
                quote! { ::sprocket::notify::from_labelled_payload(payload) },
                quote! { ::sprocket::notify::labelled_payload(self) },
            )
        }
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => {
                let fields = fields
                    .named
                    .iter()
                    .map(FieldMetadata::parse)
                    .collect::<Result<Vec<_>>>()?;

                let reads = fields.iter().map(|FieldMetadata { name, key, ty }| {
                    quote! { #name: payload.get::<#ty>(#key), }
                });
                let writes = fields.iter().map(|FieldMetadata { name, key, .. }| {
                    quote! { payload.insert(#key, ::core::clone::Clone::clone(&self.#name)); }
                });

                (
                    None,
                    quote! { Self { #(#reads)* } },
                    quote! {
                        let mut payload = ::sprocket::notify::Payload::new();
                        #(#writes)*
                        payload
                    },
                )
            }
            Fields::Unit => (
                None,
                quote! {
                    let _ = payload;
                    Self
                },
                quote! { ::sprocket::notify::Payload::new() },
            ),
            Fields::Unnamed(_) => Err(Error::new(
                input.span(),
                "`Notification` may not be derived on tuple structs.",
            ))?,
        },
        Data::Union(_) => Err(Error::new(
            input.span(),
            "`Notification` may only be derived on enums and structs.",
        ))?,
    };

    let expanded = quote! {
        #labelled

        impl #impl_generics ::sprocket::notify::Notification for #name #ty_generics #where_clause {
            #name_method

            fn from_payload(payload: &::sprocket::notify::Payload) -> Self {
                #from_payload
            }

            fn to_payload(&self) -> ::sprocket::notify::Payload {
                #to_payload
            }
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    key: LitStr,
    ty: Type,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Self> {
        let name = field.ident.clone().unwrap();

        let mut key = None;

        for item in items(&field.attrs, "notification")? {
            if item.name == "key" {
                key = Some(item.string()?.clone());
            } else {
                Err(item.unsupported())?
            }
        }

        let key = key.unwrap_or_else(|| LitStr::new(&name.unraw().to_string(), name.span()));

        Ok(Self {
            name,
            key,
            ty: field.ty.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    #[test]
    fn rejects_unsupported_shapes() {
        let input: DeriveInput = parse_quote! {
            struct PostsUpdated(usize);
        };
        let err = expand_notification(&input).err().unwrap();
        assert_eq!(
            err.to_string(),
            "`Notification` may not be derived on tuple structs."
        );

        let input: DeriveInput = parse_quote! {
            enum Never {}
        };
        let err = expand_notification(&input).err().unwrap();
        assert_eq!(
            err.to_string(),
            "`Notification` may not be derived on enums without variants."
        );
    }
}
