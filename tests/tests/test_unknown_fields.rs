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

use tagwire::{Message, TagWire};
use tagwire_core::buffer::{Reader, Writer};
use tagwire_core::config::Utf8Policy;
use tagwire_core::scalar::{read_scalar, ScalarKind};
use tagwire_core::wire::{read_key, skip_value, MAX_TAG};
use tests::{init_tracing, write_extra, Extra, Invoice};

/// A later revision of `Invoice` with fields the original does not know.
#[derive(Message, Default, Debug, Clone, PartialEq)]
struct InvoiceV2 {
    #[tagwire(tag = 1)]
    id: i64,
    #[tagwire(tag = 2)]
    public_id: String,
    #[tagwire(tag = 3, kind = "sfixed64")]
    issued_at: i64,
    #[tagwire(tag = 4)]
    note: String,
    #[tagwire(tag = 5, kind = "fixed32")]
    region: u32,
    #[tagwire(tag = 6, kind = "sint64")]
    adjustment: i64,
    #[tagwire(tag = 7)]
    attachment: Vec<u8>,
    #[tagwire(tag = 600)]
    total_amount: i64,
    #[tagwire(tag = 601)]
    amount: i64,
    #[tagwire(tag = 700)]
    discount: f64,
}

fn sample_v2() -> InvoiceV2 {
    InvoiceV2 {
        id: 1001,
        public_id: "TEST".to_string(),
        issued_at: -1_700_000_000,
        note: "net 30".to_string(),
        region: 0xDEAD_BEEF,
        adjustment: -12_345_678_901,
        attachment: vec![7u8; 200],
        total_amount: 100,
        amount: 75,
        discount: 0.25,
    }
}

#[test]
fn test_older_schema_ignores_new_fields() {
    init_tracing();
    let tagwire = TagWire::default();
    let bytes = tagwire.serialize(&sample_v2()).unwrap();

    let mut reader = Reader::new(&bytes);
    let decoded: Invoice = tagwire.deserialize_from(&mut reader).unwrap();
    assert_eq!(decoded, Invoice::sample());
    assert!(reader.is_empty());
}

#[test]
fn test_skip_consumes_what_decode_consumes() {
    let bytes = TagWire::default().serialize(&sample_v2()).unwrap();
    let kinds = [
        (1, ScalarKind::Int64),
        (2, ScalarKind::String),
        (3, ScalarKind::SFixed64),
        (4, ScalarKind::String),
        (5, ScalarKind::Fixed32),
        (6, ScalarKind::SInt64),
        (7, ScalarKind::Bytes),
        (600, ScalarKind::Int64),
        (601, ScalarKind::Int64),
        (700, ScalarKind::Double),
    ];

    let mut skipping = Reader::new(&bytes);
    let mut decoding = Reader::new(&bytes);
    for (tag, kind) in kinds {
        let skipped_key = read_key(&mut skipping).unwrap();
        let decoded_key = read_key(&mut decoding).unwrap();
        assert_eq!(skipped_key, decoded_key);
        assert_eq!(skipped_key.tag, tag);

        skip_value(&mut skipping, skipped_key.wire_type).unwrap();
        read_scalar(
            &mut decoding,
            decoded_key.tag,
            kind,
            decoded_key.wire_type,
            Utf8Policy::Strict,
        )
        .unwrap();
        assert_eq!(skipping.position(), decoding.position(), "tag {}", tag);
    }
    assert!(skipping.is_empty());
    assert!(decoding.is_empty());
}

#[test]
fn test_newer_schema_reads_older_message() {
    let tagwire = TagWire::default();
    let bytes = tagwire.serialize(&Invoice::sample()).unwrap();
    let decoded: InvoiceV2 = tagwire.deserialize(&bytes).unwrap();
    assert_eq!(
        decoded,
        InvoiceV2 {
            id: 1001,
            public_id: "TEST".to_string(),
            total_amount: 100,
            amount: 75,
            ..InvoiceV2::default()
        }
    );
}

#[test]
fn test_malformed_unknown_field_fails() {
    let mut bytes = TagWire::default().serialize(&Invoice::sample()).unwrap();
    // unknown tag 9 declaring 100 bytes with 2 present
    bytes.extend_from_slice(&[0x4A, 0x64, 0x01, 0x02]);
    assert!(TagWire::default().deserialize::<Invoice>(&bytes).is_err());

    // unknown tag 9 with reserved wire type 3
    let mut bytes = TagWire::default().serialize(&Invoice::sample()).unwrap();
    bytes.push(0x4B);
    assert!(TagWire::default().deserialize::<Invoice>(&bytes).is_err());
}

#[test]
fn test_tags_outside_schema_range_are_skipped() {
    init_tracing();
    let tagwire = TagWire::default();
    let mut writer = Writer::default();
    write_extra(&mut writer, 0, &Extra::Varint(0));
    write_extra(&mut writer, MAX_TAG + 1, &Extra::Varint(0));
    writer.write_bytes(&tagwire.serialize(&Invoice::sample()).unwrap());
    write_extra(&mut writer, u32::MAX, &Extra::Bytes(b"trailer"));

    let decoded: Invoice = tagwire.deserialize(writer.as_slice()).unwrap();
    assert_eq!(decoded, Invoice::sample());
}
