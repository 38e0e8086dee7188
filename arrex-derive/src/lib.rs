// MIT License
//
// Copyright (c) 2024 The arrex authors
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Derives [`arrex::Element`] on a `#[repr(C)]`, `bytemuck::Pod` struct of
//! plain numeric fields, given a layout string describing the same bytes.
//!
//! This crate used to generate a `const fn pack`/`unpack` pair straight
//! from a format string (see its git history). That made sense when the
//! only consumer was a compile-time tuple transform; now the consumer is
//! a runtime registry, so the macro's job shrank to exactly the part a
//! human shouldn't have to write by hand: `Element::to_value` /
//! `from_value` over the struct's fields, plus a `register()` that hands
//! the result to `arrex::registry`.
//!
//! ```ignore
//! #[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, arrex_derive::Dtype)]
//! #[repr(C)]
//! #[arrex(layout = "ii")]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let codec = Point::register().unwrap();
//! ```

extern crate proc_macro;

use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;

#[proc_macro_derive(Dtype, attributes(arrex))]
pub fn derive_dtype(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast: syn::DeriveInput = syn::parse_macro_input!(input as syn::DeriveInput);
    expand(&ast)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

const INT_TYPES: &[&str] = &["i8", "u8", "i16", "u16", "i32", "u32", "i64", "u64"];
const FLOAT_TYPES: &[&str] = &["f32", "f64"];

fn expand(ast: &syn::DeriveInput) -> syn::Result<TokenStream> {
    let name = &ast.ident;
    let layout = find_layout(ast)?;
    let fields = struct_fields(ast)?;

    let mut to_value_fields = Vec::with_capacity(fields.len());
    let mut from_value_fields = Vec::with_capacity(fields.len());

    for (index, field) in fields.iter().enumerate() {
        let ident = field.ident.as_ref().expect("named field");
        to_value_fields.push(quote_spanned!(field.span()=> arrex::Value::from(self.#ident)));
        from_value_fields.push(field_from_tuple_item(field, ident, index)?);
    }

    let field_count = fields.len();

    Ok(quote! {
        impl arrex::Element for #name {
            const LAYOUT: &'static str = #layout;

            fn to_value(&self) -> arrex::Value {
                arrex::Value::Tuple(vec![#(#to_value_fields),*])
            }

            fn from_value(v: &arrex::Value) -> arrex::Result<Self> {
                match v {
                    arrex::Value::Tuple(items) if items.len() == #field_count => {
                        Ok(#name { #(#from_value_fields),* })
                    }
                    _ => Err(arrex::ArrexError::Type(format!(
                        "expected a {}-tuple for {}",
                        #field_count,
                        stringify!(#name)
                    ))),
                }
            }
        }

        impl #name {
            /// Builds an extension codec for this type and declares it in
            /// the process-wide registry under its own type identity.
            pub fn register() -> arrex::Result<arrex::Codec> {
                let codec = arrex::Codec::extension::<#name>(None)?;
                let key = <#name as arrex::Element>::dtype_key();
                arrex::registry::declare(key, codec.clone());
                Ok(codec)
            }
        }
    })
}

/// Builds `field_name: <conversion from items[index]>` for one named field,
/// dispatching on the field's primitive type.
fn field_from_tuple_item(
    field: &syn::Field,
    ident: &syn::Ident,
    index: usize,
) -> syn::Result<TokenStream> {
    let ty = &field.ty;
    let type_name = match ty {
        syn::Type::Path(p) => p.path.segments.last().map(|s| s.ident.to_string()),
        _ => None,
    };

    match type_name.as_deref() {
        Some(t) if INT_TYPES.contains(&t) => Ok(quote_spanned!(field.span()=>
            #ident: items[#index].as_i64().ok_or_else(|| arrex::ArrexError::Type(
                format!("field `{}` expected an integer", stringify!(#ident))
            ))? as #ty
        )),
        Some(t) if FLOAT_TYPES.contains(&t) => Ok(quote_spanned!(field.span()=>
            #ident: items[#index].as_f64().ok_or_else(|| arrex::ArrexError::Type(
                format!("field `{}` expected a number", stringify!(#ident))
            ))? as #ty
        )),
        _ => Err(syn::Error::new(
            field.span(),
            "arrex_derive::Dtype only supports plain integer/float fields",
        )),
    }
}

fn find_layout(ast: &syn::DeriveInput) -> syn::Result<String> {
    for attr in &ast.attrs {
        if attr.path.is_ident("arrex") {
            if let syn::Meta::List(list) = attr.parse_meta()? {
                for nested in list.nested {
                    if let syn::NestedMeta::Meta(syn::Meta::NameValue(nv)) = nested {
                        if nv.path.is_ident("layout") {
                            if let syn::Lit::Str(s) = nv.lit {
                                return Ok(s.value());
                            }
                        }
                    }
                }
            }
        }
    }
    Err(syn::Error::new(
        ast.span(),
        "missing #[arrex(layout = \"...\")] attribute",
    ))
}

fn struct_fields(ast: &syn::DeriveInput) -> syn::Result<Vec<syn::Field>> {
    match &ast.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(named) => Ok(named.named.iter().cloned().collect()),
            _ => Err(syn::Error::new(
                ast.span(),
                "Dtype can only be derived for structs with named fields",
            )),
        },
        _ => Err(syn::Error::new(
            ast.span(),
            "Dtype can only be derived for structs",
        )),
    }
}
