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

//! Scalar kinds and their mapping onto the four wire types.
//!
//! | kind                              | wire type       | encoding                       |
//! |-----------------------------------|-----------------|--------------------------------|
//! | `int32`, `int64`, `uint32`, `uint64`, `enum` | Varint | two's complement, sign-extended to 64 bits |
//! | `sint32`, `sint64`                | Varint          | zigzag                         |
//! | `bool`                            | Varint          | 0 / 1, any non-zero reads true |
//! | `fixed64`, `sfixed64`, `double`   | Fixed64         | 8 bytes little-endian          |
//! | `fixed32`, `sfixed32`, `float`    | Fixed32         | 4 bytes little-endian          |
//! | `string`, `bytes`, `message`      | LengthDelimited | varint length + payload        |

use crate::buffer::{Reader, Writer};
use crate::config::Utf8Policy;
use crate::error::Error;
use crate::wire::{
    read_length_delimited, write_key, write_length_delimited, zigzag_decode32, zigzag_decode64,
    zigzag_encode32, zigzag_encode64, WireType,
};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int32,
    Int64,
    UInt32,
    UInt64,
    SInt32,
    SInt64,
    Bool,
    Enum,
    Fixed32,
    Fixed64,
    SFixed32,
    SFixed64,
    Float,
    Double,
    String,
    Bytes,
    Message,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 17] = [
        ScalarKind::Int32,
        ScalarKind::Int64,
        ScalarKind::UInt32,
        ScalarKind::UInt64,
        ScalarKind::SInt32,
        ScalarKind::SInt64,
        ScalarKind::Bool,
        ScalarKind::Enum,
        ScalarKind::Fixed32,
        ScalarKind::Fixed64,
        ScalarKind::SFixed32,
        ScalarKind::SFixed64,
        ScalarKind::Float,
        ScalarKind::Double,
        ScalarKind::String,
        ScalarKind::Bytes,
        ScalarKind::Message,
    ];

    /// The one wire type this kind is encoded with.
    pub const fn wire_type(self) -> WireType {
        match self {
            ScalarKind::Int32
            | ScalarKind::Int64
            | ScalarKind::UInt32
            | ScalarKind::UInt64
            | ScalarKind::SInt32
            | ScalarKind::SInt64
            | ScalarKind::Bool
            | ScalarKind::Enum => WireType::Varint,
            ScalarKind::Fixed64 | ScalarKind::SFixed64 | ScalarKind::Double => WireType::Fixed64,
            ScalarKind::Fixed32 | ScalarKind::SFixed32 | ScalarKind::Float => WireType::Fixed32,
            ScalarKind::String | ScalarKind::Bytes | ScalarKind::Message => {
                WireType::LengthDelimited
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ScalarKind::Int32 => "int32",
            ScalarKind::Int64 => "int64",
            ScalarKind::UInt32 => "uint32",
            ScalarKind::UInt64 => "uint64",
            ScalarKind::SInt32 => "sint32",
            ScalarKind::SInt64 => "sint64",
            ScalarKind::Bool => "bool",
            ScalarKind::Enum => "enum",
            ScalarKind::Fixed32 => "fixed32",
            ScalarKind::Fixed64 => "fixed64",
            ScalarKind::SFixed32 => "sfixed32",
            ScalarKind::SFixed64 => "sfixed64",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
            ScalarKind::String => "string",
            ScalarKind::Bytes => "bytes",
            ScalarKind::Message => "message",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScalarKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "float32" => ScalarKind::Float,
            "float64" => ScalarKind::Double,
            _ => ScalarKind::ALL
                .iter()
                .copied()
                .find(|kind| kind.name() == s)
                .ok_or_else(|| Error::schema_error(format!("unknown scalar kind `{}`", s)))?,
        };
        Ok(kind)
    }
}

/// A scalar payload on its way to or from the wire.
///
/// Decoded strings and bytes borrow from the input buffer.
#[derive(Clone, Debug, PartialEq)]
pub enum Value<'a> {
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    Bool(bool),
    F32(f32),
    F64(f64),
    Str(Cow<'a, str>),
    Bytes(Cow<'a, [u8]>),
}

impl Value<'_> {
    /// Whether this payload is the representation `kind` encodes.
    pub fn fits(&self, kind: ScalarKind) -> bool {
        use ScalarKind as K;
        matches!(
            (kind, self),
            (K::Int32 | K::SInt32 | K::SFixed32 | K::Enum, Value::I32(_))
                | (K::Int64 | K::SInt64 | K::SFixed64, Value::I64(_))
                | (K::UInt32 | K::Fixed32, Value::U32(_))
                | (K::UInt64 | K::Fixed64, Value::U64(_))
                | (K::Bool, Value::Bool(_))
                | (K::Float, Value::F32(_))
                | (K::Double, Value::F64(_))
                | (K::String, Value::Str(_))
                | (K::Bytes, Value::Bytes(_))
        )
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::Bool(_) => "bool",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
        }
    }
}

/// Writes the key for `tag` followed by `value` encoded as `kind`.
///
/// A value that does not fit `kind` is a [`Error::SchemaError`] and nothing
/// is written.
pub fn write_scalar(
    writer: &mut Writer,
    tag: u32,
    kind: ScalarKind,
    value: &Value<'_>,
) -> Result<(), Error> {
    let wire_type = kind.wire_type();
    match (kind, value) {
        (ScalarKind::Int32 | ScalarKind::Enum, Value::I32(v)) => {
            write_key(writer, tag, wire_type);
            writer.write_varuint64(*v as i64 as u64);
        }
        (ScalarKind::SInt32, Value::I32(v)) => {
            write_key(writer, tag, wire_type);
            writer.write_varuint32(zigzag_encode32(*v));
        }
        (ScalarKind::SFixed32, Value::I32(v)) => {
            write_key(writer, tag, wire_type);
            writer.write_i32(*v);
        }
        (ScalarKind::Int64, Value::I64(v)) => {
            write_key(writer, tag, wire_type);
            writer.write_varuint64(*v as u64);
        }
        (ScalarKind::SInt64, Value::I64(v)) => {
            write_key(writer, tag, wire_type);
            writer.write_varuint64(zigzag_encode64(*v));
        }
        (ScalarKind::SFixed64, Value::I64(v)) => {
            write_key(writer, tag, wire_type);
            writer.write_i64(*v);
        }
        (ScalarKind::UInt32, Value::U32(v)) => {
            write_key(writer, tag, wire_type);
            writer.write_varuint32(*v);
        }
        (ScalarKind::Fixed32, Value::U32(v)) => {
            write_key(writer, tag, wire_type);
            writer.write_u32(*v);
        }
        (ScalarKind::UInt64, Value::U64(v)) => {
            write_key(writer, tag, wire_type);
            writer.write_varuint64(*v);
        }
        (ScalarKind::Fixed64, Value::U64(v)) => {
            write_key(writer, tag, wire_type);
            writer.write_u64(*v);
        }
        (ScalarKind::Bool, Value::Bool(v)) => {
            write_key(writer, tag, wire_type);
            writer.write_u8(*v as u8);
        }
        (ScalarKind::Float, Value::F32(v)) => {
            write_key(writer, tag, wire_type);
            writer.write_f32(*v);
        }
        (ScalarKind::Double, Value::F64(v)) => {
            write_key(writer, tag, wire_type);
            writer.write_f64(*v);
        }
        (ScalarKind::String, Value::Str(s)) => {
            write_key(writer, tag, wire_type);
            write_length_delimited(writer, s.as_bytes());
        }
        (ScalarKind::Bytes, Value::Bytes(b)) => {
            write_key(writer, tag, wire_type);
            write_length_delimited(writer, b);
        }
        (kind, value) => {
            return Err(Error::schema_error(format!(
                "tag {}: a {} value cannot be written as {}",
                tag,
                value.variant_name(),
                kind
            )))
        }
    }
    Ok(())
}

/// Reads one value of `kind` whose key carried `observed`.
///
/// The wire type is checked before anything is consumed: a mismatch is
/// reported as [`Error::TypeMismatch`] and no conversion is attempted.
pub fn read_scalar<'a>(
    reader: &mut Reader<'a>,
    tag: u32,
    kind: ScalarKind,
    observed: WireType,
    utf8: Utf8Policy,
) -> Result<Value<'a>, Error> {
    let expected = kind.wire_type();
    if observed != expected {
        return Err(Error::type_mismatch(tag, expected, observed));
    }
    let value = match kind {
        ScalarKind::Int32 | ScalarKind::Enum => Value::I32(reader.read_varuint64()? as i32),
        ScalarKind::Int64 => Value::I64(reader.read_varuint64()? as i64),
        ScalarKind::UInt32 => Value::U32(reader.read_varuint32()?),
        ScalarKind::UInt64 => Value::U64(reader.read_varuint64()?),
        ScalarKind::SInt32 => Value::I32(zigzag_decode32(reader.read_varuint32()?)),
        ScalarKind::SInt64 => Value::I64(zigzag_decode64(reader.read_varuint64()?)),
        ScalarKind::Bool => Value::Bool(reader.read_varuint64()? != 0),
        ScalarKind::Fixed32 => Value::U32(reader.read_u32()?),
        ScalarKind::Fixed64 => Value::U64(reader.read_u64()?),
        ScalarKind::SFixed32 => Value::I32(reader.read_i32()?),
        ScalarKind::SFixed64 => Value::I64(reader.read_i64()?),
        ScalarKind::Float => Value::F32(reader.read_f32()?),
        ScalarKind::Double => Value::F64(reader.read_f64()?),
        ScalarKind::String => {
            let mut ahead = *reader;
            let bytes = read_length_delimited(&mut ahead)?.get_slice();
            let s = match utf8 {
                Utf8Policy::Strict => Cow::Borrowed(std::str::from_utf8(bytes).map_err(|e| {
                    Error::decode_error(format!("tag {}: invalid UTF-8 in string: {}", tag, e))
                })?),
                Utf8Policy::Lossy => String::from_utf8_lossy(bytes),
            };
            *reader = ahead;
            Value::Str(s)
        }
        ScalarKind::Bytes => {
            Value::Bytes(Cow::Borrowed(read_length_delimited(reader)?.get_slice()))
        }
        ScalarKind::Message => {
            return Err(Error::schema_error(format!(
                "tag {}: message fields are decoded by the message codec",
                tag
            )))
        }
    };
    Ok(value)
}

/// Bridge between a Rust field type and the [`Value`] representation.
pub trait ScalarField: Sized {
    /// Whether values of this type can be encoded as `kind`.
    fn supports(kind: ScalarKind) -> bool;

    fn to_value(&self) -> Value<'_>;

    fn from_value(value: Value<'_>) -> Result<Self, Error>;
}

fn unexpected_value<T>(value: &Value<'_>) -> Error {
    Error::schema_error(format!(
        "a {} value cannot be stored in a {} field",
        value.variant_name(),
        std::any::type_name::<T>()
    ))
}

macro_rules! impl_scalar_field {
    ($ty:ty, $variant:ident, [$($kind:ident),+ $(,)?]) => {
        impl ScalarField for $ty {
            #[inline(always)]
            fn supports(kind: ScalarKind) -> bool {
                matches!(kind, $(ScalarKind::$kind)|+)
            }

            #[inline(always)]
            fn to_value(&self) -> Value<'_> {
                Value::$variant(*self)
            }

            #[inline(always)]
            fn from_value(value: Value<'_>) -> Result<Self, Error> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(unexpected_value::<$ty>(&other)),
                }
            }
        }
    };
}

impl_scalar_field!(i32, I32, [Int32, SInt32, SFixed32, Enum]);
impl_scalar_field!(i64, I64, [Int64, SInt64, SFixed64]);
impl_scalar_field!(u32, U32, [UInt32, Fixed32]);
impl_scalar_field!(u64, U64, [UInt64, Fixed64]);
impl_scalar_field!(bool, Bool, [Bool]);
impl_scalar_field!(f32, F32, [Float]);
impl_scalar_field!(f64, F64, [Double]);

impl ScalarField for String {
    fn supports(kind: ScalarKind) -> bool {
        kind == ScalarKind::String
    }

    fn to_value(&self) -> Value<'_> {
        Value::Str(Cow::Borrowed(self.as_str()))
    }

    fn from_value(value: Value<'_>) -> Result<Self, Error> {
        match value {
            Value::Str(s) => Ok(s.into_owned()),
            other => Err(unexpected_value::<String>(&other)),
        }
    }
}

impl ScalarField for Vec<u8> {
    fn supports(kind: ScalarKind) -> bool {
        kind == ScalarKind::Bytes
    }

    fn to_value(&self) -> Value<'_> {
        Value::Bytes(Cow::Borrowed(self.as_slice()))
    }

    fn from_value(value: Value<'_>) -> Result<Self, Error> {
        match value {
            Value::Bytes(b) => Ok(b.into_owned()),
            other => Err(unexpected_value::<Vec<u8>>(&other)),
        }
    }
}
