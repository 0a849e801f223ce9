use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Field, Fields, Ident, LitStr, Result,
    ext::IdentExt,
    spanned::Spanned,
};

use crate::attribute::{is_option, items};

pub(crate) fn expand_decodable(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new(
            input.span(),
            "`Decodable` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new(
            input.span(),
            "`Decodable` may only be derived on structs with named fields.",
        ))?
    };

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .collect::<Result<Vec<_>>>()?;

    let assignments = fields.iter().map(|field| {
        let FieldMetadata {
            name,
            key,
            strategy,
        } = field;

        let value = match strategy {
            Strategy::Strict => quote! {
                ::sprocket::decode::Fields::require(json, #key)?
            },
            Strategy::Optional => quote! {
                ::sprocket::decode::Fields::optional(json, #key)?
            },
            Strategy::Coerced { is_option: true } => quote! {
                ::sprocket::decode::Fields::coerced(json, #key)
            },
            Strategy::Coerced { is_option: false } => quote! {
                ::sprocket::decode::Fields::coerced(json, #key).unwrap_or_default()
            },
        };

        quote! { #name: #value }
    });

    let name = &input.ident;
    let context = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::sprocket::decode::Decodable for #name #ty_generics #where_clause {
            fn from_value(
                value: &::sprocket::decode::Value,
            ) -> ::sprocket::decode::Attempt<Self> {
                let json = ::sprocket::decode::as_container(value, #context)?;

                ::core::result::Result::Ok(::core::option::Option::Some(Self {
                    #(#assignments,)*
                }))
            }
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    key: LitStr,
    strategy: Strategy,
}

#[derive(Debug)]
enum Strategy {
    Strict,
    Optional,
    Coerced { is_option: bool },
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Self> {
        let name = field.ident.clone().unwrap();

        let mut key = None;
        let mut strategy = Strategy::Strict;

        for item in items(&field.attrs, "decode")? {
            let chosen = if item.name == "key" {
                key = Some(item.string()?.clone());
                continue;
            } else if item.name == "optional" {
                item.flag()?;

                if !is_option(&field.ty) {
                    Err(Error::new_spanned(
                        &field.ty,
                        "Optional field must have type `Option<T>`.",
                    ))?
                }

                Strategy::Optional
            } else if item.name == "coerced" {
                item.flag()?;
                Strategy::Coerced {
                    is_option: is_option(&field.ty),
                }
            } else {
                Err(item.unsupported())?
            };

            if !matches!(strategy, Strategy::Strict) {
                Err(Error::new_spanned(
                    &item.name,
                    "Field may be either `optional` or `coerced`, not both.",
                ))?
            }

            strategy = chosen;
        }

        let key = key.unwrap_or_else(|| LitStr::new(&name.unraw().to_string(), name.span()));

        Ok(Self {
            name,
            key,
            strategy,
        })
    }
}
