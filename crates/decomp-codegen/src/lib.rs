// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr, Visibility};

/// Per-member options collected from `#[record(...)]`.
#[derive(Default)]
struct MemberAttrs {
    /// Naming directive (`"key,omitempty,string"`).
    tag: Option<String>,
    /// Member is an embedded record whose fields are flattened into the parent.
    embed: bool,
}

/// `#[derive(Record)]` macro: generates the static `Shape` plus structural accessors
///
/// Every named field becomes a member. Visibility follows the field's
/// declaration: only `pub` fields take part in field tables.
///
/// Supported attributes:
/// - `#[record(tag = "key,omitempty,string")]`: naming directive
/// - `#[record(embed)]`: flatten the (record-typed) field into the parent
///
/// Example:
/// ```ignore
/// use decomp::Record;
///
/// #[derive(Record)]
/// struct Base {
///     pub id: u64,
/// }
///
/// #[derive(Record)]
/// struct User {
///     #[record(embed)]
///     pub base: Base,
///     #[record(tag = "name,omitempty")]
///     pub name: String,
///     secret: String, // not public, never compiled into a field
/// }
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;
    let type_name = name.to_string();

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(&input.generics, "Generic records are not supported")
            .to_compile_error()
            .into();
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(f) => &f.named,
            Fields::Unit => {
                return syn::Error::new_spanned(&input, "Unit structs have no members to describe")
                    .to_compile_error()
                    .into()
            }
            Fields::Unnamed(_) => {
                return syn::Error::new_spanned(&input, "Only named fields are supported")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(&input, "Only structs are supported")
                .to_compile_error()
                .into()
        }
    };

    let mut members = Vec::with_capacity(fields.len());
    let mut accessors = Vec::with_capacity(fields.len());

    for (index, field) in fields.iter().enumerate() {
        let Some(field_name) = field.ident.as_ref() else {
            return syn::Error::new_spanned(field, "Field must have a name")
                .to_compile_error()
                .into();
        };
        let field_type = &field.ty;

        let attrs = match parse_member_attrs(field) {
            Ok(attrs) => attrs,
            Err(err) => return err.to_compile_error().into(),
        };

        // Raw identifiers keep their `r#` prefix out of the member name.
        let ident = field_name.to_string();
        let ident = ident.strip_prefix("r#").unwrap_or(&ident).to_string();
        let public = matches!(field.vis, Visibility::Public(_));
        let declared = quote!(#field_type).to_string().replace(' ', "");

        let tag = match &attrs.tag {
            Some(tag) => quote! { .with_tag(#tag) },
            None => quote! {},
        };
        let embed = if attrs.embed {
            quote! { .with_embedded(<#field_type as ::decomp::Record>::shape) }
        } else {
            quote! {}
        };

        // The offset comes from offset_of! on the very field whose `Typed::KIND` is recorded.
        // The shape built from these members is keyed by the deriving struct's own TypeId.
        members.push(quote! {
            unsafe {
                ::decomp::Member::new(
                    #ident,
                    #public,
                    <#field_type as ::decomp::Typed>::KIND,
                    #declared,
                )
                .with_offset(::core::mem::offset_of!(#name, #field_name))
            }
            #tag
            #embed
        });

        accessors.push(quote! {
            #index => ::core::option::Option::Some(&self.#field_name as &dyn ::decomp::Reflect),
        });
    }

    let expanded = quote! {
        unsafe impl ::decomp::Typed for #name {
            const KIND: ::decomp::Kind = ::decomp::Kind::Record;
        }

        impl ::decomp::Reflect for #name {
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn reflect_kind(&self) -> ::decomp::Kind {
                ::decomp::Kind::Record
            }

            fn to_value(&self) -> ::decomp::Value {
                ::decomp::decompose(self, &::decomp::Options::default())
            }

            fn as_record(&self) -> ::core::option::Option<&dyn ::decomp::Record> {
                ::core::option::Option::Some(self)
            }
        }

        impl ::decomp::Record for #name {
            fn shape() -> &'static ::decomp::Shape {
                const MEMBERS: &[::decomp::Member] = &[#(#members),*];
                static SHAPE: ::decomp::Shape = unsafe {
                    ::decomp::Shape::new(#type_name, ::core::any::TypeId::of::<#name>, MEMBERS)
                };
                &SHAPE
            }

            fn record_shape(&self) -> &'static ::decomp::Shape {
                <Self as ::decomp::Record>::shape()
            }

            fn member(&self, index: usize) -> ::core::option::Option<&dyn ::decomp::Reflect> {
                match index {
                    #(#accessors)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Collect `#[record(...)]` options from one field.
fn parse_member_attrs(field: &syn::Field) -> syn::Result<MemberAttrs> {
    let mut attrs = MemberAttrs::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("embed") {
                attrs.embed = true;
                Ok(())
            } else if meta.path.is_ident("tag") {
                let lit: LitStr = meta.value()?.parse()?;
                attrs.tag = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unsupported record attribute, expected `tag = \"...\"` or `embed`"))
            }
        })?;
    }
    Ok(attrs)
}
