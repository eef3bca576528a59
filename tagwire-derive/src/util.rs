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

use syn::{Field, Fields, Index, Member};

/// A struct field together with the member used to reach it.
///
/// Named fields are reached by identifier, tuple fields by position; the
/// position doubles as the field name.
#[derive(Clone)]
pub struct SourceField<'a> {
    pub field: &'a Field,
    pub member: Member,
    pub field_name: String,
}

/// Returns the fields of a struct in declaration order.
pub fn source_fields(fields: &Fields) -> Vec<SourceField<'_>> {
    fields
        .iter()
        .enumerate()
        .map(|(idx, field)| match &field.ident {
            Some(ident) => SourceField {
                field,
                member: Member::Named(ident.clone()),
                field_name: ident.to_string(),
            },
            None => SourceField {
                field,
                member: Member::Unnamed(Index::from(idx)),
                field_name: idx.to_string(),
            },
        })
        .collect()
}
