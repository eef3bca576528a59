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

//! Field-level metadata parsing for `#[tagwire(...)]` attributes.
//!
//! - `tag = N`: field tag, required unless the field is skipped
//! - `kind = "..."`: scalar kind, inferred for common Rust types
//! - `message`: nested message field
//! - `skip`: field is not encoded

use std::collections::HashMap;
use std::str::FromStr;
use syn::{Field, GenericArgument, PathArguments, Type};
use tagwire_core::scalar::ScalarKind;
use tagwire_core::wire::MAX_TAG;

/// Parsed `#[tagwire(...)]` field attributes
#[derive(Debug, Clone, Default)]
pub struct TagwireFieldMeta {
    pub tag: Option<u32>,
    /// Explicit kind; None = infer from the field type
    pub kind: Option<ScalarKind>,
    pub message: bool,
    pub skip: bool,
}

/// How a nested message is held by its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestedShape {
    /// `M`, always written
    Plain,
    /// `Box<M>`, always written
    Boxed,
    /// `Option<M>`, written when present
    Optional,
    /// `Option<Box<M>>`, written when present
    OptionalBoxed,
}

/// What the derive emits for one field
#[derive(Clone)]
pub enum FieldPlan {
    Scalar(ScalarKind),
    Message { shape: NestedShape, inner: Type },
}

/// Parse `#[tagwire(...)]` attributes from a field
pub fn parse_field_meta(field: &Field) -> syn::Result<TagwireFieldMeta> {
    let mut meta = TagwireFieldMeta::default();

    for attr in &field.attrs {
        if !attr.path().is_ident("tagwire") {
            continue;
        }

        attr.parse_nested_meta(|nested| {
            if nested.path.is_ident("tag") {
                let lit: syn::LitInt = nested.value()?.parse()?;
                let tag: u32 = lit.base10_parse()?;
                if tag == 0 || tag > MAX_TAG {
                    return Err(syn::Error::new(
                        lit.span(),
                        format!("tag must be in 1..={}", MAX_TAG),
                    ));
                }
                meta.tag = Some(tag);
            } else if nested.path.is_ident("kind") {
                let lit: syn::LitStr = nested.value()?.parse()?;
                let kind = ScalarKind::from_str(&lit.value())
                    .map_err(|e| syn::Error::new(lit.span(), e.to_string()))?;
                meta.kind = Some(kind);
            } else if nested.path.is_ident("message") {
                meta.message = parse_bool_or_flag(&nested)?;
            } else if nested.path.is_ident("skip") {
                meta.skip = parse_bool_or_flag(&nested)?;
            } else {
                return Err(nested.error("expected `tag`, `kind`, `message` or `skip`"));
            }
            Ok(())
        })?;
    }

    if meta.message && meta.kind.is_some_and(|kind| kind != ScalarKind::Message) {
        return Err(syn::Error::new_spanned(
            field,
            "`message` fields cannot declare a scalar kind",
        ));
    }

    Ok(meta)
}

/// Parse a boolean value or treat standalone flag as true
fn parse_bool_or_flag(meta: &syn::meta::ParseNestedMeta) -> syn::Result<bool> {
    if meta.input.is_empty() || meta.input.peek(syn::Token![,]) {
        Ok(true)
    } else {
        let lit: syn::LitBool = meta.value()?.parse()?;
        Ok(lit.value)
    }
}

/// Validates that every encoded field has a tag and that tags are unique
pub fn validate_field_metas(fields_with_meta: &[(&Field, TagwireFieldMeta)]) -> syn::Result<()> {
    let mut tag_to_field: HashMap<u32, String> = HashMap::new();

    for (idx, (field, meta)) in fields_with_meta.iter().enumerate() {
        if meta.skip {
            continue;
        }
        let field_name = field_display_name(field, idx);
        let tag = meta.tag.ok_or_else(|| {
            syn::Error::new_spanned(
                field,
                format!(
                    "field `{}` needs #[tagwire(tag = N)] or #[tagwire(skip)]",
                    field_name
                ),
            )
        })?;
        if let Some(existing) = tag_to_field.get(&tag) {
            return Err(syn::Error::new_spanned(
                field,
                format!(
                    "duplicate tagwire tag={} on fields `{}` and `{}`",
                    tag, existing, field_name
                ),
            ));
        }
        tag_to_field.insert(tag, field_name);
    }

    Ok(())
}

fn field_display_name(field: &Field, idx: usize) -> String {
    match &field.ident {
        Some(ident) => ident.to_string(),
        None => idx.to_string(),
    }
}

/// Extract the outer type name from a type (e.g., "Option" from `Option<String>`)
fn extract_outer_type_name(ty: &Type) -> String {
    match ty {
        Type::Path(type_path) => {
            if let Some(seg) = type_path.path.segments.last() {
                seg.ident.to_string()
            } else {
                String::new()
            }
        }
        _ => String::new(),
    }
}

/// Extract `T` from `Wrapper<T>` when the last path segment is `wrapper`
fn extract_inner_type(ty: &Type, wrapper: &str) -> Option<Type> {
    if let Type::Path(type_path) = ty {
        if let Some(seg) = type_path.path.segments.last() {
            if seg.ident == wrapper {
                if let PathArguments::AngleBracketed(args) = &seg.arguments {
                    if let Some(GenericArgument::Type(inner_ty)) = args.args.first() {
                        return Some(inner_ty.clone());
                    }
                }
            }
        }
    }
    None
}

/// Default kind for the Rust types that have one
pub fn infer_kind(ty: &Type) -> Option<ScalarKind> {
    let kind = match extract_outer_type_name(ty).as_str() {
        "i32" => ScalarKind::Int32,
        "i64" => ScalarKind::Int64,
        "u32" => ScalarKind::UInt32,
        "u64" => ScalarKind::UInt64,
        "bool" => ScalarKind::Bool,
        "f32" => ScalarKind::Float,
        "f64" => ScalarKind::Double,
        "String" => ScalarKind::String,
        "Vec" => match extract_inner_type(ty, "Vec") {
            Some(inner) if extract_outer_type_name(&inner) == "u8" => ScalarKind::Bytes,
            _ => return None,
        },
        _ => return None,
    };
    Some(kind)
}

/// Classify a nested message field and extract the message type
pub fn nested_shape(ty: &Type) -> (NestedShape, Type) {
    if let Some(inner) = extract_inner_type(ty, "Option") {
        return match extract_inner_type(&inner, "Box") {
            Some(message) => (NestedShape::OptionalBoxed, message),
            None => (NestedShape::Optional, inner),
        };
    }
    match extract_inner_type(ty, "Box") {
        Some(message) => (NestedShape::Boxed, message),
        None => (NestedShape::Plain, ty.clone()),
    }
}

/// Decide how a non-skipped field is encoded
pub fn plan_field(field: &Field, meta: &TagwireFieldMeta) -> syn::Result<FieldPlan> {
    if meta.message || meta.kind == Some(ScalarKind::Message) {
        let (shape, inner) = nested_shape(&field.ty);
        return Ok(FieldPlan::Message { shape, inner });
    }
    match meta.kind.or_else(|| infer_kind(&field.ty)) {
        Some(kind) => Ok(FieldPlan::Scalar(kind)),
        None => Err(syn::Error::new_spanned(
            &field.ty,
            "cannot infer a tagwire kind for this type; add `kind = \"...\"` or `message`",
        )),
    }
}

/// Parse field metadata for all fields and validate
pub fn parse_and_validate_fields<'a>(
    fields: &[&'a Field],
) -> syn::Result<Vec<(&'a Field, TagwireFieldMeta)>> {
    let fields_with_meta: Vec<_> = fields
        .iter()
        .map(|f| {
            let meta = parse_field_meta(f)?;
            Ok((*f, meta))
        })
        .collect::<syn::Result<_>>()?;

    validate_field_metas(&fields_with_meta)?;

    Ok(fields_with_meta)
}
