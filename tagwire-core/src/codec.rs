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

//! Schema-driven message reader and writer.
//!
//! Writing emits every described field in ascending tag order. Reading
//! loops over keys until the reader is exhausted: a known tag is decoded
//! into its field (a later occurrence of the same tag overwrites an earlier
//! one), an unknown tag has its value skipped, and the first error aborts
//! the whole read.

use crate::buffer::{Reader, Writer};
use crate::config::Config;
use crate::error::Error;
use crate::registry::SchemaRegistry;
use crate::schema::{Message, Schema};
use crate::wire::{
    read_key, read_length_delimited, skip_value, write_key, write_length_delimited, WireType,
};

pub struct WriteContext<'a> {
    pub writer: Writer,
    registry: &'a SchemaRegistry,
    config: &'a Config,
    depth: u32,
}

impl<'a> WriteContext<'a> {
    pub fn new(
        registry: &'a SchemaRegistry,
        config: &'a Config,
        writer: Writer,
    ) -> WriteContext<'a> {
        WriteContext {
            writer,
            registry,
            config,
            depth: 0,
        }
    }

    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    pub fn config(&self) -> &'a Config {
        self.config
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn into_writer(self) -> Writer {
        self.writer
    }

    /// Writes `value` as a length-delimited sub-message under `tag`.
    ///
    /// The sub-message is encoded into a scratch writer first, since its
    /// length prefix precedes it on the wire.
    pub fn write_nested<M: Message>(&mut self, tag: u32, value: &M) -> Result<(), Error> {
        let depth = self.check_depth::<M>()?;
        let mut child = WriteContext {
            writer: Writer::default(),
            registry: self.registry,
            config: self.config,
            depth,
        };
        write_message(&mut child, value)?;
        write_key(&mut self.writer, tag, WireType::LengthDelimited);
        write_length_delimited(&mut self.writer, child.writer.as_slice());
        Ok(())
    }

    fn check_depth<M>(&self) -> Result<u32, Error> {
        next_depth::<M>(self.depth, self.config.max_depth())
    }
}

pub struct ReadContext<'a, 'bf> {
    pub reader: Reader<'bf>,
    registry: &'a SchemaRegistry,
    config: &'a Config,
    depth: u32,
}

impl<'a, 'bf> ReadContext<'a, 'bf> {
    pub fn new(
        registry: &'a SchemaRegistry,
        config: &'a Config,
        reader: Reader<'bf>,
    ) -> ReadContext<'a, 'bf> {
        ReadContext {
            reader,
            registry,
            config,
            depth: 0,
        }
    }

    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    pub fn config(&self) -> &'a Config {
        self.config
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Decodes the length-delimited sub-message following a `tag` key.
    ///
    /// The sub-message is read from a reader bounded to its declared length,
    /// so it can neither consume nor observe the bytes of its parent. On
    /// failure the parent reader does not advance.
    pub fn read_nested<M: Message>(
        &mut self,
        tag: u32,
        wire_type: WireType,
    ) -> Result<M, Error> {
        if wire_type != WireType::LengthDelimited {
            return Err(Error::type_mismatch(
                tag,
                WireType::LengthDelimited,
                wire_type,
            ));
        }
        let depth = next_depth::<M>(self.depth, self.config.max_depth())?;
        let mut ahead = self.reader;
        let sub = read_length_delimited(&mut ahead)?;
        let mut child = ReadContext {
            reader: sub,
            registry: self.registry,
            config: self.config,
            depth,
        };
        let value = read_message::<M>(&mut child)?;
        self.reader = ahead;
        Ok(value)
    }
}

fn next_depth<M>(depth: u32, max_depth: u32) -> Result<u32, Error> {
    let next = depth + 1;
    if next > max_depth {
        return Err(Error::depth_exceeded(format!(
            "nesting depth {} exceeds the limit of {} at {}",
            next,
            max_depth,
            std::any::type_name::<M>()
        )));
    }
    Ok(next)
}

/// Writes every field of `record` in ascending tag order.
pub fn write_message<T: Message>(ctx: &mut WriteContext<'_>, record: &T) -> Result<(), Error> {
    let schema = ctx.registry().describe::<T>()?;
    write_fields(&schema, record, ctx)
}

fn write_fields<T: Message>(
    schema: &Schema<T>,
    record: &T,
    ctx: &mut WriteContext<'_>,
) -> Result<(), Error> {
    for field in schema.fields() {
        field
            .access()
            .write(record, field.tag(), field.kind(), ctx)?;
    }
    Ok(())
}

/// Decodes a `T` from everything left in `ctx.reader`.
///
/// The record starts from `T::default()`; fields absent from the input keep
/// their default value. Nothing is returned unless the whole input decodes.
pub fn read_message<T: Message>(ctx: &mut ReadContext<'_, '_>) -> Result<T, Error> {
    let schema = ctx.registry().describe::<T>()?;
    let mut record = T::default();
    match read_fields(&schema, &mut record, ctx) {
        Ok(()) => Ok(record),
        Err(err) => {
            tracing::debug!(
                type_name = schema.type_name(),
                position = ctx.reader.position(),
                depth = ctx.depth(),
                error = %err,
                "failed to read message"
            );
            Err(err)
        }
    }
}

fn read_fields<T: Message>(
    schema: &Schema<T>,
    record: &mut T,
    ctx: &mut ReadContext<'_, '_>,
) -> Result<(), Error> {
    while !ctx.reader.is_empty() {
        let key = read_key(&mut ctx.reader)?;
        match schema.field(key.tag) {
            Some(field) => {
                field
                    .access()
                    .read(record, key.tag, field.kind(), key.wire_type, ctx)?;
            }
            None => {
                let start = ctx.reader.position();
                skip_value(&mut ctx.reader, key.wire_type)?;
                tracing::trace!(
                    type_name = schema.type_name(),
                    tag = key.tag,
                    wire_type = ?key.wire_type,
                    bytes = ctx.reader.position() - start,
                    "skipped unknown field"
                );
            }
        }
    }
    Ok(())
}

/// Encodes `record` into a fresh buffer sized by `config.initial_capacity`.
pub fn encode<T: Message>(
    registry: &SchemaRegistry,
    config: &Config,
    record: &T,
) -> Result<Vec<u8>, Error> {
    let writer = Writer::with_capacity(config.initial_capacity());
    let mut ctx = WriteContext::new(registry, config, writer);
    write_message(&mut ctx, record)?;
    Ok(ctx.into_writer().into_bytes())
}

/// Decodes a `T` that spans all of `bytes`.
pub fn decode<T: Message>(
    registry: &SchemaRegistry,
    config: &Config,
    bytes: &[u8],
) -> Result<T, Error> {
    let mut ctx = ReadContext::new(registry, config, Reader::new(bytes));
    read_message::<T>(&mut ctx)
}

/// Size of the encoding of `record`, in bytes.
pub fn encoded_len<T: Message>(
    registry: &SchemaRegistry,
    config: &Config,
    record: &T,
) -> Result<usize, Error> {
    let mut ctx = WriteContext::new(registry, config, Writer::default());
    write_message(&mut ctx, record)?;
    Ok(ctx.writer.len())
}
