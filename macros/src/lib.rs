use proc_macro::TokenStream;
use quote::quote;
use std::collections::{HashMap, HashSet};
use syn::{Attribute, Data, DeriveInput, Fields, Meta, Token, Type, parse_macro_input};

/// Helper enum for parsed attribute values
enum MetaValue {
    Str(syn::LitStr),
    Flag,
}

/// Derive `env_configs::Record` for a struct with named fields
///
/// Every field needs one of:
/// - `#[env(key = "TAG")]` for a value read from `PREFIX_TAG`
/// - `#[env(key = "TAG", nested)]` for a struct (or `Option` of one) that
///   also derives `Record`, whose fields are read from `PREFIX_TAG_...`
/// - `#[env(skip)]` to leave the field out entirely
#[proc_macro_derive(Record, attributes(env))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_record(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_record(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "derive(Record) does not support generic structs",
        ));
    }

    // Extract fields from the struct
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "derive(Record) only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "derive(Record) only supports structs",
            ));
        }
    };

    let mut layout_entries = Vec::new();
    let mut ref_entries = Vec::new();
    let mut mut_entries = Vec::new();
    let mut seen_keys = HashSet::new();

    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let field_type = &field.ty;

        let config = parse_field_config(field)?;
        let (key, nested) = match config {
            FieldConfig::Skip => continue,
            FieldConfig::Leaf(key) => (key, false),
            FieldConfig::Nested(key) => (key, true),
        };

        if !seen_keys.insert(key.value()) {
            return Err(syn::Error::new_spanned(
                &key,
                format!("key \"{}\" is already used by another field", key.value()),
            ));
        }

        if !nested {
            layout_entries.push(quote! {
                ::env_configs::FieldDef::leaf(#key, <#field_type as ::env_configs::Leaf>::KIND)
            });
            ref_entries.push(quote! {
                ::env_configs::FieldRef::Leaf(#key, &self.#field_name)
            });
            mut_entries.push(quote! {
                ::env_configs::FieldMut::Leaf(#key, &mut self.#field_name)
            });
            continue;
        }

        // Optional nested records are traversed only when allocated
        let (is_option, record_type) = extract_option_type(field_type);
        layout_entries.push(quote! {
            ::env_configs::FieldDef::branch(#key, <#record_type as ::env_configs::Record>::layout)
        });
        if is_option {
            ref_entries.push(quote! {
                ::env_configs::FieldRef::Branch(
                    #key,
                    self.#field_name.as_ref().map(|r| r as &dyn ::env_configs::Record),
                )
            });
            mut_entries.push(quote! {
                ::env_configs::FieldMut::Branch(
                    #key,
                    self.#field_name.as_mut().map(|r| r as &mut dyn ::env_configs::Record),
                )
            });
        } else {
            ref_entries.push(quote! {
                ::env_configs::FieldRef::Branch(
                    #key,
                    ::core::option::Option::Some(&self.#field_name as &dyn ::env_configs::Record),
                )
            });
            mut_entries.push(quote! {
                ::env_configs::FieldMut::Branch(
                    #key,
                    ::core::option::Option::Some(
                        &mut self.#field_name as &mut dyn ::env_configs::Record,
                    ),
                )
            });
        }
    }

    Ok(quote! {
        impl ::env_configs::Record for #struct_name {
            fn layout() -> &'static [::env_configs::FieldDef] {
                const FIELDS: &[::env_configs::FieldDef] = &[#(#layout_entries),*];
                FIELDS
            }

            fn fields(&self) -> ::std::vec::Vec<::env_configs::FieldRef<'_>> {
                ::std::vec![#(#ref_entries),*]
            }

            fn fields_mut(&mut self) -> ::std::vec::Vec<::env_configs::FieldMut<'_>> {
                ::std::vec![#(#mut_entries),*]
            }
        }
    })
}

#[derive(Debug)]
enum FieldConfig {
    Leaf(syn::LitStr),
    Nested(syn::LitStr),
    Skip,
}

/// Parse #[env(key = "X", nested)] syntax
fn parse_env_list(meta_list: &syn::MetaList) -> syn::Result<HashMap<String, MetaValue>> {
    let mut values = HashMap::new();

    meta_list.parse_nested_meta(|meta| {
        let key = meta
            .path
            .get_ident()
            .ok_or_else(|| meta.error("expected identifier"))?
            .to_string();

        match key.as_str() {
            "key" => {
                meta.input.parse::<Token![=]>()?;
                let value: syn::LitStr = meta.input.parse()?;
                values.insert(key, MetaValue::Str(value));
            }
            "nested" | "skip" => {
                values.insert(key, MetaValue::Flag);
            }
            _ => return Err(meta.error(format!("unknown env option `{}`", key))),
        }

        Ok(())
    })?;

    Ok(values)
}

fn parse_field_config(field: &syn::Field) -> syn::Result<FieldConfig> {
    // Find the #[env(...)] attribute
    let env_attr: &Attribute = field
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("env"))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                field,
                "field must have #[env(key = \"...\")], #[env(key = \"...\", nested)] or #[env(skip)]",
            )
        })?;

    // Parse it as a Meta::List
    let parsed = match &env_attr.meta {
        Meta::List(list) => parse_env_list(list)?,
        _ => {
            return Err(syn::Error::new_spanned(
                env_attr,
                "env attribute must be a list: #[env(key = \"...\")]",
            ));
        }
    };

    if parsed.contains_key("skip") {
        if parsed.len() > 1 {
            return Err(syn::Error::new_spanned(
                env_attr,
                "skip cannot be combined with other env options",
            ));
        }
        return Ok(FieldConfig::Skip);
    }

    let key = match parsed.get("key") {
        Some(MetaValue::Str(s)) => s.clone(),
        _ => {
            return Err(syn::Error::new_spanned(
                env_attr,
                "field must have key = \"TAG\"",
            ));
        }
    };

    if key.value().is_empty() {
        return Err(syn::Error::new_spanned(&key, "key must not be empty"));
    }

    if parsed.contains_key("nested") {
        Ok(FieldConfig::Nested(key))
    } else {
        Ok(FieldConfig::Leaf(key))
    }
}

/// Extract the inner type from Option<T>, returns (is_option, inner_type)
fn extract_option_type(ty: &Type) -> (bool, &Type) {
    if let Type::Path(type_path) = ty
        && let Some(segment) = type_path.path.segments.last()
        && segment.ident == "Option"
        && let syn::PathArguments::AngleBracketed(args) = &segment.arguments
        && let Some(syn::GenericArgument::Type(inner_ty)) = args.args.first()
    {
        return (true, inner_ty);
    }
    (false, ty)
}
