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

use std::sync::Arc;
use tagwire::{Message, TagWire};
use tagwire_core::error::Error;
use tagwire_core::registry::SchemaRegistry;
use tagwire_core::scalar::ScalarKind;
use tagwire_core::schema::FieldDescriptor;
use tests::Invoice;

/// Two fields claim tag 2.
#[derive(Default, Debug)]
struct Conflicting {
    code: String,
    label: String,
}

impl tagwire_core::schema::Message for Conflicting {
    fn fields() -> Vec<FieldDescriptor<Self>> {
        vec![
            FieldDescriptor::<Self>::scalar::<String>(
                2,
                ScalarKind::String,
                "code",
                |m| &m.code,
                |m| &mut m.code,
            ),
            FieldDescriptor::<Self>::scalar::<String>(
                2,
                ScalarKind::String,
                "label",
                |m| &m.label,
                |m| &mut m.label,
            ),
        ]
    }
}

#[derive(Message, Default, Debug)]
struct WrongKind {
    #[tagwire(tag = 1, kind = "string")]
    count: u32,
}

#[derive(Message, Default, Debug)]
struct Statement {
    #[tagwire(tag = 1, kind = "fixed64")]
    total: u64,
    #[tagwire(tag = 2, message)]
    invoice: Invoice,
}

#[test]
fn test_duplicate_tag_fails_at_registration() {
    let tagwire = TagWire::with_registry(Arc::new(SchemaRegistry::new()));
    let err = tagwire.register::<Conflicting>().unwrap_err();
    assert!(matches!(err, Error::SchemaError(_)));
    assert!(!err.is_parse_failure());
    let msg = err.to_string();
    assert!(msg.contains("duplicate tag 2"), "{}", msg);
    assert!(msg.contains("Conflicting"), "{}", msg);
}

#[test]
fn test_schema_error_blocks_every_message() {
    let tagwire = TagWire::with_registry(Arc::new(SchemaRegistry::new()));
    let first = tagwire.serialize(&Conflicting::default()).unwrap_err();
    // an empty input would otherwise decode to the default record
    let second = tagwire.deserialize::<Conflicting>(&[]).unwrap_err();
    assert_eq!(first, second);
    assert!(tagwire.registry().is_described::<Conflicting>());
    assert_eq!(tagwire.register::<Conflicting>().unwrap_err(), first);
}

#[test]
fn test_kind_must_fit_field_type() {
    let tagwire = TagWire::with_registry(Arc::new(SchemaRegistry::new()));
    let err = tagwire.register::<WrongKind>().unwrap_err();
    assert!(err.to_string().contains("cannot be encoded as string"));
    assert!(tagwire.serialize(&WrongKind { count: 3 }).is_err());
}

#[test]
fn test_valid_schema_registers_once() {
    let registry = Arc::new(SchemaRegistry::new());
    let tagwire = TagWire::with_registry(registry.clone());
    assert!(registry.is_empty());
    tagwire.register::<Invoice>().unwrap();
    tagwire.register::<Invoice>().unwrap();
    assert_eq!(registry.len(), 1);

    let schema = registry.describe::<Invoice>().unwrap();
    let tags: Vec<u32> = schema.fields().iter().map(|f| f.tag()).collect();
    assert_eq!(tags, vec![1, 2, 600, 601]);
    assert_eq!(schema.field(2).unwrap().kind(), ScalarKind::String);
    assert_eq!(schema.field(600).unwrap().name(), "total_amount");
}

#[test]
fn test_nested_schema_built_on_use() {
    let registry = Arc::new(SchemaRegistry::new());
    let tagwire = TagWire::with_registry(registry.clone());
    tagwire.register::<Statement>().unwrap();
    assert!(!registry.is_described::<Invoice>());

    let bytes = tagwire
        .serialize(&Statement {
            total: 1,
            invoice: Invoice::sample(),
        })
        .unwrap();
    assert!(registry.is_described::<Invoice>());
    let decoded: Statement = tagwire.deserialize(&bytes).unwrap();
    assert_eq!(decoded.invoice, Invoice::sample());
    assert_eq!(decoded.total, 1);
}

#[test]
fn test_registries_are_independent() {
    let a = TagWire::with_registry(Arc::new(SchemaRegistry::new()));
    let b = TagWire::with_registry(Arc::new(SchemaRegistry::new()));
    a.register::<Invoice>().unwrap();
    assert!(a.registry().is_described::<Invoice>());
    assert!(!b.registry().is_described::<Invoice>());
}
