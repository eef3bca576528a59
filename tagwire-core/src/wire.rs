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

//! Wire-level framing: wire types, field keys, length-delimited spans and
//! value skipping.
//!
//! Every field on the wire is a key followed by a value:
//!
//! ```text
//! key   = varint(tag << 3 | wire_type)
//! value = varint                      (Varint)
//!       | 8 bytes little-endian       (Fixed64)
//!       | varint(len) + len bytes     (LengthDelimited)
//!       | 4 bytes little-endian       (Fixed32)
//! ```
//!
//! Wire types 3 and 4 (legacy group start/end) and the unassigned 6 and 7
//! are rejected when a key is decoded.

use crate::buffer::{Reader, Writer};
use crate::ensure;
use crate::error::Error;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Largest tag a key can carry (29 bits, as in protobuf).
pub const MAX_TAG: u32 = (1 << 29) - 1;

const WIRE_TYPE_BITS: u32 = 3;
const WIRE_TYPE_MASK: u64 = 0x7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    Fixed32 = 5,
}

impl WireType {
    /// Converts the low three bits of a key, rejecting reserved values.
    pub fn from_raw(raw: u8) -> Result<WireType, Error> {
        WireType::try_from(raw).map_err(|_| match raw {
            3 | 4 => Error::decode_error(format!(
                "group wire type {} is not supported",
                raw
            )),
            _ => Error::decode_error(format!("invalid wire type {}", raw)),
        })
    }

    /// Width of the value for fixed-width wire types.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            WireType::Fixed64 => Some(8),
            WireType::Fixed32 => Some(4),
            WireType::Varint | WireType::LengthDelimited => None,
        }
    }
}

/// A decoded field key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Key {
    pub tag: u32,
    pub wire_type: WireType,
}

impl Key {
    pub fn new(tag: u32, wire_type: WireType) -> Key {
        Key { tag, wire_type }
    }

    #[inline(always)]
    pub fn encode(self) -> u64 {
        ((self.tag as u64) << WIRE_TYPE_BITS) | (u8::from(self.wire_type) as u64)
    }
}

#[inline(always)]
pub fn write_key(writer: &mut Writer, tag: u32, wire_type: WireType) {
    writer.write_varuint64(Key::new(tag, wire_type).encode());
}

/// Reads one key. On failure the reader is left where it was.
///
/// Any tag that fits a `u32` is accepted, 0 and tags above [`MAX_TAG`]
/// included: such tags can never match a schema field and are skipped as
/// unknown by the message reader.
pub fn read_key(reader: &mut Reader) -> Result<Key, Error> {
    let mut ahead = *reader;
    let raw = ahead.read_varuint64()?;
    let wire_type = WireType::from_raw((raw & WIRE_TYPE_MASK) as u8)?;
    let tag = raw >> WIRE_TYPE_BITS;
    ensure!(
        tag <= u32::MAX as u64,
        "tag {} at offset {} does not fit in 32 bits",
        tag,
        reader.position()
    );
    *reader = ahead;
    Ok(Key::new(tag as u32, wire_type))
}

pub fn write_length_delimited(writer: &mut Writer, bytes: &[u8]) {
    writer.write_varuint64(bytes.len() as u64);
    writer.write_bytes(bytes);
}

/// Reads a length prefix and returns a reader bounded to exactly that many bytes.
pub fn read_length_delimited<'a>(reader: &mut Reader<'a>) -> Result<Reader<'a>, Error> {
    let mut ahead = *reader;
    let len = ahead.read_varuint64()?;
    let remaining = ahead.remaining();
    if len > remaining as u64 {
        return Err(Error::length_mismatch(len, remaining));
    }
    let sub = ahead.read_sub(len as usize)?;
    *reader = ahead;
    Ok(sub)
}

/// Consumes one value of `wire_type` without interpreting it.
pub fn skip_value(reader: &mut Reader, wire_type: WireType) -> Result<(), Error> {
    match wire_type {
        WireType::Varint => reader.read_varuint64().map(|_| ()),
        WireType::Fixed64 => reader.skip(8),
        WireType::Fixed32 => reader.skip(4),
        WireType::LengthDelimited => read_length_delimited(reader).map(|_| ()),
    }
}

/// Reads a key and skips its value, returning the key that was skipped.
pub fn skip_field(reader: &mut Reader) -> Result<Key, Error> {
    let key = read_key(reader)?;
    skip_value(reader, key.wire_type)?;
    Ok(key)
}

/// Skips every remaining field, checking that the framing is well formed.
/// Returns the number of fields skipped.
pub fn skip_all(reader: &mut Reader) -> Result<usize, Error> {
    let mut count = 0;
    while !reader.is_empty() {
        skip_field(reader)?;
        count += 1;
    }
    Ok(count)
}

#[inline(always)]
pub fn zigzag_encode32(v: i32) -> u32 {
    ((v << 1) ^ (v >> 31)) as u32
}

#[inline(always)]
pub fn zigzag_decode32(u: u32) -> i32 {
    ((u >> 1) as i32) ^ -((u & 1) as i32)
}

#[inline(always)]
pub fn zigzag_encode64(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

#[inline(always)]
pub fn zigzag_decode64(u: u64) -> i64 {
    ((u >> 1) as i64) ^ -((u & 1) as i64)
}
