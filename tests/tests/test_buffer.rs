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

use tagwire_core::buffer::{varint_len, Reader, Writer};
use tagwire_core::error::Error;
use tagwire_core::wire::read_length_delimited;

#[test]
fn test_varint_boundaries() {
    let values = [
        0u64,
        127,
        128,
        16_383,
        16_384,
        (1 << 21) - 1,
        1 << 21,
        1 << 63,
        u64::MAX,
    ];
    let mut writer = Writer::default();
    for v in values {
        writer.write_varuint64(v);
    }
    let bytes = writer.dump();
    let expected_len: usize = values.iter().map(|v| varint_len(*v)).sum();
    assert_eq!(bytes.len(), expected_len);

    let mut reader = Reader::new(&bytes);
    for v in values {
        assert_eq!(reader.read_varuint64().unwrap(), v);
    }
    assert!(reader.is_empty());
}

#[test]
fn test_varint_exact_bytes() {
    let cases: [(u64, &[u8]); 6] = [
        (0, &[0x00]),
        (127, &[0x7F]),
        (128, &[0x80, 0x01]),
        (300, &[0xAC, 0x02]),
        (16_384, &[0x80, 0x80, 0x01]),
        (
            u64::MAX,
            &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01],
        ),
    ];
    for (value, encoded) in cases {
        let mut writer = Writer::default();
        writer.write_varuint64(value);
        assert_eq!(writer.as_slice(), encoded, "value {}", value);
    }
}

#[test]
fn test_eleven_byte_varint_rejected() {
    let mut data = vec![0x80u8; 10];
    data.push(0x01);
    let mut reader = Reader::new(&data);
    assert!(matches!(
        reader.read_varuint64(),
        Err(Error::DecodeError(_))
    ));
    assert_eq!(reader.position(), 0);
}

#[test]
fn test_ten_byte_varint_overflow_rejected() {
    // the tenth group may only carry bit 63
    let mut data = vec![0xFFu8; 9];
    data.push(0x02);
    let mut reader = Reader::new(&data);
    assert!(matches!(
        reader.read_varuint64(),
        Err(Error::DecodeError(_))
    ));
}

#[test]
fn test_varint32_truncates() {
    let mut writer = Writer::default();
    writer.write_varuint64((1 << 32) | 5);
    let bytes = writer.into_bytes();
    let mut reader = Reader::new(&bytes);
    assert_eq!(reader.read_varuint32().unwrap(), 5);
}

#[test]
fn test_truncated_input() {
    let data = [0x01, 0x02, 0x03];
    let mut reader = Reader::new(&data);
    assert_eq!(
        reader.read_u64(),
        Err(Error::Truncated {
            needed: 8,
            remaining: 3
        })
    );
    assert_eq!(reader.position(), 0);
    assert_eq!(reader.read_u8().unwrap(), 0x01);
    assert_eq!(reader.as_slice(), &[0x02, 0x03]);
}

#[test]
fn test_sub_cursor_isolation() {
    let mut writer = Writer::default();
    // two sibling spans followed by a trailer
    writer.write_varuint64(3);
    writer.write_bytes(&[1, 2, 3]);
    writer.write_varuint64(2);
    writer.write_bytes(&[4, 5]);
    writer.write_u8(0xEE);
    let bytes = writer.into_bytes();

    let mut parent = Reader::new(&bytes);
    let mut first = read_length_delimited(&mut parent).unwrap();
    let mut second = read_length_delimited(&mut parent).unwrap();

    assert_eq!(first.get_slice(), &[1, 2, 3]);
    assert_eq!(first.read_bytes(3).unwrap(), &[1, 2, 3]);
    // the sibling's bytes follow in the backing buffer but are out of bounds
    assert!(matches!(first.read_u8(), Err(Error::Truncated { .. })));
    assert!(first.is_empty());

    assert!(second.read_bytes(3).is_err());
    assert_eq!(second.read_bytes(2).unwrap(), &[4, 5]);
    assert!(second.read_u8().is_err());

    assert_eq!(parent.read_u8().unwrap(), 0xEE);
    assert!(parent.is_empty());
}

#[test]
fn test_nested_sub_cursor_cannot_exceed_parent() {
    // outer span of 2 bytes declares an inner span of 4
    let data = [0x02, 0x04, 0xAA, 0xBB, 0xCC, 0xDD];
    let mut reader = Reader::new(&data);
    let mut outer = read_length_delimited(&mut reader).unwrap();
    assert_eq!(outer.remaining(), 1);
    assert!(matches!(
        read_length_delimited(&mut outer),
        Err(Error::LengthMismatch {
            declared: 4,
            remaining: 1
        })
    ));
}

#[test]
fn test_writer_reset() {
    let mut writer = Writer::with_capacity(64);
    assert_eq!(writer.write_bytes(&[0u8; 40]), 40);
    writer.reset();
    assert!(writer.is_empty());
    writer.write_i32(-1);
    writer.write_f64(1.5);
    assert_eq!(writer.len(), 12);
    let bytes = writer.into_bytes();
    let mut reader = Reader::new(&bytes);
    assert_eq!(reader.read_i32().unwrap(), -1);
    assert_eq!(reader.read_f64().unwrap(), 1.5);
}
