use std::collections::HashSet;

use syn::{
    Attribute, DataEnum, Error, Fields, Ident, LitStr, Result, Token, Type,
    ext::IdentExt,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
};

/// A single item of a helper attribute: a flag (`optional`) or a string
/// setting (`key = "nickName"`).
#[derive(Debug)]
pub(crate) struct AttributeItem {
    pub(crate) name: Ident,
    pub(crate) value: Option<LitStr>,
}

impl AttributeItem {
    pub(crate) fn flag(&self) -> Result<()> {
        match &self.value {
            Some(value) => Err(Error::new_spanned(
                value,
                format!("`{}` does not take a value.", self.name),
            )),
            None => Ok(()),
        }
    }

    pub(crate) fn string(&self) -> Result<&LitStr> {
        self.value.as_ref().ok_or_else(|| {
            Error::new_spanned(
                &self.name,
                format!("`{}` requires a string value.", self.name),
            )
        })
    }

    pub(crate) fn unsupported(&self) -> Error {
        Error::new_spanned(
            &self.name,
            format!("Unsupported attribute `{}`.", self.name),
        )
    }
}

impl Parse for AttributeItem {
    fn parse(input: ParseStream) -> Result<Self> {
        let name = input.parse::<Ident>()?;

        let value = if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            Some(input.parse::<LitStr>()?)
        } else {
            None
        };

        Ok(Self { name, value })
    }
}

struct AttributeItems(Vec<AttributeItem>);

impl Parse for AttributeItems {
    fn parse(input: ParseStream) -> Result<Self> {
        let items = Punctuated::<AttributeItem, Token![,]>::parse_terminated(input)?;
        Ok(Self(items.into_iter().collect()))
    }
}

/// Collect the items of every helper attribute with a name.
pub(crate) fn items(attrs: &[Attribute], name: &str) -> Result<Vec<AttributeItem>> {
    let mut items = Vec::new();

    for attr in attrs.iter().filter(|a| a.path().is_ident(name)) {
        let AttributeItems(parsed) = attr.meta.require_list()?.parse_args()?;
        items.extend(parsed);
    }

    Ok(items)
}

/// Pair each variant of a fieldless enum with its label, taken from a
/// `label = "..."` item of the named helper attribute or derived from the
/// variant name.
pub(crate) fn labels(
    data: &DataEnum,
    attribute: &str,
    derive: &str,
) -> Result<Vec<(Ident, LitStr)>> {
    let mut seen = HashSet::new();
    let mut labels = Vec::new();

    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            Err(Error::new_spanned(
                variant,
                format!("`{derive}` may only be derived on enums without variant fields."),
            ))?
        }

        let mut label = None;

        for item in items(&variant.attrs, attribute)? {
            if item.name == "label" {
                label = Some(item.string()?.clone());
            } else {
                Err(item.unsupported())?
            }
        }

        let label = label.unwrap_or_else(|| {
            LitStr::new(&default_label(&variant.ident), variant.ident.span())
        });

        if !seen.insert(label.value()) {
            Err(Error::new_spanned(&label, "Variant labels must be unique."))?
        }

        labels.push((variant.ident.clone(), label));
    }

    Ok(labels)
}

/// The label of a variant: its name with the first letter lowercased.
pub(crate) fn default_label(variant: &Ident) -> String {
    let name = variant.unraw().to_string();
    let mut chars = name.chars();

    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => name,
    }
}

/// Whether a type is spelled as `Option<T>`.
pub(crate) fn is_option(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };

    path.path
        .segments
        .last()
        .is_some_and(|segment| segment.ident == "Option")
}
