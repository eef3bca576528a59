// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;
use syn::{Data, DeriveInput, Field};

use super::field_meta::{parse_and_validate_fields, plan_field, FieldPlan, NestedShape};
use crate::util::{source_fields, SourceField};

pub fn derive_message(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let fields = match &ast.data {
        Data::Struct(s) => &s.fields,
        Data::Enum(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "Message can only be derived for structs",
            ))
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(name, "Union is not supported"));
        }
    };

    let source_fields = source_fields(fields);
    let raw_fields: Vec<&Field> = source_fields.iter().map(|sf| sf.field).collect();
    let metas = parse_and_validate_fields(&raw_fields)?;

    let mut descriptors = Vec::with_capacity(source_fields.len());
    for (sf, (_, meta)) in source_fields.iter().zip(metas.iter()) {
        if meta.skip {
            continue;
        }
        // validated above: every encoded field has a tag
        let Some(tag) = meta.tag else { continue };
        let plan = plan_field(sf.field, meta)?;
        descriptors.push(gen_descriptor(sf, tag, plan));
    }

    Ok(quote! {
        impl #impl_generics tagwire_core::schema::Message for #name #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<tagwire_core::schema::FieldDescriptor<Self>> {
                ::std::vec![#(#descriptors),*]
            }
        }
    })
}

fn gen_descriptor(sf: &SourceField<'_>, tag: u32, plan: FieldPlan) -> TokenStream {
    let member = &sf.member;
    let field_name = &sf.field_name;
    match plan {
        FieldPlan::Scalar(kind) => {
            let ty = &sf.field.ty;
            let kind_ident = Ident::new(&format!("{:?}", kind), Span::call_site());
            quote! {
                tagwire_core::schema::FieldDescriptor::<Self>::scalar::<#ty>(
                    #tag,
                    tagwire_core::scalar::ScalarKind::#kind_ident,
                    #field_name,
                    |m| &m.#member,
                    |m| &mut m.#member,
                )
            }
        }
        FieldPlan::Message { shape, inner } => {
            let (get, put) = match shape {
                NestedShape::Plain => (
                    quote! { |m| ::std::option::Option::Some(&m.#member) },
                    quote! { |m, v| m.#member = v },
                ),
                NestedShape::Boxed => (
                    quote! { |m| ::std::option::Option::Some(&*m.#member) },
                    quote! { |m, v| m.#member = ::std::boxed::Box::new(v) },
                ),
                NestedShape::Optional => (
                    quote! { |m| m.#member.as_ref() },
                    quote! { |m, v| m.#member = ::std::option::Option::Some(v) },
                ),
                NestedShape::OptionalBoxed => (
                    quote! { |m| m.#member.as_deref() },
                    quote! {
                        |m, v| m.#member = ::std::option::Option::Some(::std::boxed::Box::new(v))
                    },
                ),
            };
            quote! {
                tagwire_core::schema::FieldDescriptor::<Self>::message::<#inner>(
                    #tag,
                    #field_name,
                    #get,
                    #put,
                )
            }
        }
    }
}
