use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Result, spanned::Spanned};

use crate::attribute::labels;

pub(crate) fn expand_key_decodable(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Enum(data) = &input.data else {
        Err(Error::new(
            input.span(),
            "`KeyDecodable` may only be derived on enums.",
        ))?
    };

    let cases = labels(data, "decode", "KeyDecodable")?
        .into_iter()
        .map(|(variant, label)| {
            quote! { #label => ::core::result::Result::Ok(Self::#variant), }
        });

    let name = &input.ident;
    let context = format!("Unknown {name} label");
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::sprocket::decode::KeyDecodable for #name #ty_generics #where_clause {
            fn from_key(
                key: &str,
            ) -> ::core::result::Result<Self, ::sprocket::decode::DecodeError> {
                match key {
                    #(#cases)*
                    _ => ::core::result::Result::Err(::sprocket::decode::DecodeError::invalid(
                        #context,
                        &::sprocket::decode::Value::String(key.to_owned()),
                    )),
                }
            }
        }

        impl #impl_generics ::sprocket::decode::Decodable for #name #ty_generics #where_clause {
            fn from_value(
                value: &::sprocket::decode::Value,
            ) -> ::sprocket::decode::Attempt<Self> {
                ::sprocket::decode::decode_key_value(value)
            }
        }
    };

    Ok(expanded.into())
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    #[test]
    fn rejects_structs_and_duplicate_labels() {
        let input: DeriveInput = parse_quote! {
            struct GameObjective;
        };
        let err = expand_key_decodable(&input).err().unwrap();
        assert_eq!(err.to_string(), "`KeyDecodable` may only be derived on enums.");

        let input: DeriveInput = parse_quote! {
            enum GameObjective {
                War,
                #[decode(label = "war")]
                Raid,
            }
        };
        let err = expand_key_decodable(&input).err().unwrap();
        assert_eq!(err.to_string(), "Variant labels must be unique.");
    }
}
