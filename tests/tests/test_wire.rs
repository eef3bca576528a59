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

use tagwire_core::buffer::{Reader, Writer};
use tagwire_core::error::Error;
use tagwire_core::wire::{
    read_key, skip_all, skip_field, skip_value, write_key, Key, WireType, MAX_TAG,
};
use tests::{write_extra, Extra};

#[test]
fn test_wire_type_values() {
    assert_eq!(u8::from(WireType::Varint), 0);
    assert_eq!(u8::from(WireType::Fixed64), 1);
    assert_eq!(u8::from(WireType::LengthDelimited), 2);
    assert_eq!(u8::from(WireType::Fixed32), 5);
    for raw in [3u8, 4, 6, 7] {
        assert!(matches!(
            WireType::from_raw(raw),
            Err(Error::DecodeError(_))
        ));
    }
    assert_eq!(WireType::Fixed32.fixed_width(), Some(4));
    assert_eq!(WireType::Varint.fixed_width(), None);
}

#[test]
fn test_key_round_trip() {
    let keys = [
        Key::new(1, WireType::Varint),
        Key::new(15, WireType::Fixed64),
        Key::new(16, WireType::LengthDelimited),
        Key::new(998, WireType::Varint),
        Key::new(MAX_TAG, WireType::Fixed32),
    ];
    let mut writer = Writer::default();
    for key in keys {
        write_key(&mut writer, key.tag, key.wire_type);
    }
    let bytes = writer.into_bytes();
    let mut reader = Reader::new(&bytes);
    for key in keys {
        assert_eq!(read_key(&mut reader).unwrap(), key);
    }
    assert!(reader.is_empty());
}

#[test]
fn test_tag_above_max_decodes() {
    let mut writer = Writer::default();
    write_key(&mut writer, MAX_TAG + 1, WireType::Varint);
    write_key(&mut writer, u32::MAX, WireType::Fixed32);
    let bytes = writer.into_bytes();
    let mut reader = Reader::new(&bytes);
    assert_eq!(
        read_key(&mut reader).unwrap(),
        Key::new(MAX_TAG + 1, WireType::Varint)
    );
    assert_eq!(
        read_key(&mut reader).unwrap(),
        Key::new(u32::MAX, WireType::Fixed32)
    );
    assert!(reader.is_empty());
}

#[test]
fn test_tag_wider_than_u32_rejected() {
    let mut writer = Writer::default();
    writer.write_varuint64(1 << 35);
    let bytes = writer.into_bytes();
    let mut reader = Reader::new(&bytes);
    assert!(matches!(read_key(&mut reader), Err(Error::DecodeError(_))));
    assert_eq!(reader.position(), 0);
}

#[test]
fn test_skip_each_wire_type() {
    let payload = [9u8; 300];
    let fields = [
        (1, Extra::Varint(u64::MAX)),
        (2, Extra::Fixed64(7)),
        (3, Extra::Fixed32(7)),
        (4, Extra::Bytes(&payload)),
        (5, Extra::Bytes(&[])),
    ];
    for (tag, value) in &fields {
        let mut writer = Writer::default();
        write_extra(&mut writer, *tag, value);
        writer.write_u8(0x7F);
        let bytes = writer.into_bytes();

        let mut reader = Reader::new(&bytes);
        let key = read_key(&mut reader).unwrap();
        assert_eq!(key.tag, *tag);
        skip_value(&mut reader, key.wire_type).unwrap();
        // exactly one value consumed
        assert_eq!(reader.position(), bytes.len() - 1);
        assert_eq!(reader.read_u8().unwrap(), 0x7F);
    }
}

#[test]
fn test_skip_truncated_values() {
    let cases: [(&[u8], WireType); 4] = [
        (&[0x80], WireType::Varint),
        (&[1, 2, 3], WireType::Fixed32),
        (&[1, 2, 3, 4, 5, 6, 7], WireType::Fixed64),
        (&[0x05, 1, 2], WireType::LengthDelimited),
    ];
    for (data, wire_type) in cases {
        let mut reader = Reader::new(data);
        let err = skip_value(&mut reader, wire_type).unwrap_err();
        assert!(
            matches!(err, Error::Truncated { .. } | Error::LengthMismatch { .. }),
            "{:?}: {:?}",
            wire_type,
            err
        );
        assert_eq!(reader.position(), 0);
    }
}

#[test]
fn test_skip_field_and_all() {
    let mut writer = Writer::default();
    write_extra(&mut writer, 998, &Extra::Varint(0));
    write_extra(&mut writer, 3, &Extra::Bytes(b"abc"));
    write_extra(&mut writer, 999, &Extra::Fixed32(0));
    let bytes = writer.into_bytes();

    let mut reader = Reader::new(&bytes);
    assert_eq!(
        skip_field(&mut reader).unwrap(),
        Key::new(998, WireType::Varint)
    );
    assert_eq!(skip_all(&mut reader).unwrap(), 2);
    assert!(reader.is_empty());

    let mut broken = bytes.clone();
    broken.truncate(bytes.len() - 1);
    let mut reader = Reader::new(&broken);
    assert!(skip_all(&mut reader).is_err());
}
