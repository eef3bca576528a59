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

//! Field tables for message types.
//!
//! A message type lists its tagged fields once through [`Message::fields`].
//! Each [`FieldDescriptor`] couples a tag and a [`ScalarKind`] with a
//! [`FieldAccess`] object that knows how to move the field between the
//! record and the wire. [`Schema::build`] validates the table and indexes it
//! by tag; the registry caches the result per type.

use crate::bail;
use crate::codec::{ReadContext, WriteContext};
use crate::error::Error;
use crate::scalar::{read_scalar, write_scalar, ScalarField, ScalarKind};
use crate::wire::{WireType, MAX_TAG};
use std::collections::HashMap;
use std::fmt;

/// A record type that can be encoded as a Tagwire message.
///
/// Usually implemented with `#[derive(Message)]`:
///
/// ```rust, ignore
/// #[derive(Message, Default)]
/// struct Invoice {
///     #[tagwire(tag = 1)]
///     id: i64,
///     #[tagwire(tag = 2)]
///     code: String,
/// }
/// ```
///
/// Hand-written implementations build the same table:
///
/// ```rust
/// use tagwire_core::scalar::ScalarKind;
/// use tagwire_core::schema::{FieldDescriptor, Message};
///
/// #[derive(Default)]
/// struct Invoice {
///     id: i64,
///     code: String,
/// }
///
/// impl Message for Invoice {
///     fn fields() -> Vec<FieldDescriptor<Self>> {
///         vec![
///             FieldDescriptor::<Self>::scalar::<i64>(1, ScalarKind::Int64, "id", |m| &m.id, |m| &mut m.id),
///             FieldDescriptor::<Self>::scalar::<String>(2, ScalarKind::String, "code", |m| &m.code, |m| &mut m.code),
///         ]
///     }
/// }
/// ```
pub trait Message: Default + Send + Sync + 'static {
    fn fields() -> Vec<FieldDescriptor<Self>>;
}

/// Moves one field of `T` to and from the wire.
pub trait FieldAccess<T>: Send + Sync {
    /// Whether this accessor can encode its field as `kind`.
    fn accepts(&self, kind: ScalarKind) -> bool;

    /// Writes key and value for the field.
    fn write(
        &self,
        record: &T,
        tag: u32,
        kind: ScalarKind,
        ctx: &mut WriteContext<'_>,
    ) -> Result<(), Error>;

    /// Reads the value following a key already consumed from `ctx.reader`.
    fn read(
        &self,
        record: &mut T,
        tag: u32,
        kind: ScalarKind,
        wire_type: WireType,
        ctx: &mut ReadContext<'_, '_>,
    ) -> Result<(), Error>;
}

/// Accessor for a scalar field reached through a pair of projections.
pub struct Projection<T, F> {
    get: fn(&T) -> &F,
    get_mut: fn(&mut T) -> &mut F,
}

impl<T, F> Projection<T, F> {
    pub fn new(get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> Self {
        Projection { get, get_mut }
    }
}

impl<T, F: ScalarField> FieldAccess<T> for Projection<T, F> {
    fn accepts(&self, kind: ScalarKind) -> bool {
        F::supports(kind)
    }

    fn write(
        &self,
        record: &T,
        tag: u32,
        kind: ScalarKind,
        ctx: &mut WriteContext<'_>,
    ) -> Result<(), Error> {
        write_scalar(&mut ctx.writer, tag, kind, &(self.get)(record).to_value())
    }

    fn read(
        &self,
        record: &mut T,
        tag: u32,
        kind: ScalarKind,
        wire_type: WireType,
        ctx: &mut ReadContext<'_, '_>,
    ) -> Result<(), Error> {
        let utf8 = ctx.config().utf8_policy();
        let value = read_scalar(&mut ctx.reader, tag, kind, wire_type, utf8)?;
        *(self.get_mut)(record) = F::from_value(value)?;
        Ok(())
    }
}

/// Accessor for a nested message field.
///
/// `get` returns `None` when the field is absent, in which case nothing is
/// written. `put` stores a decoded sub-record, replacing any previous value.
pub struct NestedProjection<T, M> {
    get: fn(&T) -> Option<&M>,
    put: fn(&mut T, M),
}

impl<T, M> NestedProjection<T, M> {
    pub fn new(get: fn(&T) -> Option<&M>, put: fn(&mut T, M)) -> Self {
        NestedProjection { get, put }
    }
}

impl<T, M: Message> FieldAccess<T> for NestedProjection<T, M> {
    fn accepts(&self, kind: ScalarKind) -> bool {
        kind == ScalarKind::Message
    }

    fn write(
        &self,
        record: &T,
        tag: u32,
        _kind: ScalarKind,
        ctx: &mut WriteContext<'_>,
    ) -> Result<(), Error> {
        match (self.get)(record) {
            Some(child) => ctx.write_nested(tag, child),
            None => Ok(()),
        }
    }

    fn read(
        &self,
        record: &mut T,
        tag: u32,
        _kind: ScalarKind,
        wire_type: WireType,
        ctx: &mut ReadContext<'_, '_>,
    ) -> Result<(), Error> {
        let child = ctx.read_nested::<M>(tag, wire_type)?;
        (self.put)(record, child);
        Ok(())
    }
}

/// One tagged field of a message type.
pub struct FieldDescriptor<T> {
    tag: u32,
    kind: ScalarKind,
    name: &'static str,
    access: Box<dyn FieldAccess<T>>,
}

impl<T: 'static> FieldDescriptor<T> {
    pub fn new(
        tag: u32,
        kind: ScalarKind,
        name: &'static str,
        access: Box<dyn FieldAccess<T>>,
    ) -> Self {
        FieldDescriptor {
            tag,
            kind,
            name,
            access,
        }
    }

    /// A scalar field encoded as `kind`.
    pub fn scalar<F: ScalarField + 'static>(
        tag: u32,
        kind: ScalarKind,
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        Self::new(tag, kind, name, Box::new(Projection::new(get, get_mut)))
    }

    /// A nested message field.
    pub fn message<M: Message>(
        tag: u32,
        name: &'static str,
        get: fn(&T) -> Option<&M>,
        put: fn(&mut T, M),
    ) -> Self {
        Self::new(
            tag,
            ScalarKind::Message,
            name,
            Box::new(NestedProjection::new(get, put)),
        )
    }
}

impl<T> FieldDescriptor<T> {
    #[inline(always)]
    pub fn tag(&self) -> u32 {
        self.tag
    }

    #[inline(always)]
    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    pub fn access(&self) -> &dyn FieldAccess<T> {
        self.access.as_ref()
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .finish()
    }
}

/// Validated field table of one message type.
pub struct Schema<T> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
    by_tag: HashMap<u32, usize>,
}

impl<T: Message> Schema<T> {
    /// Builds the schema from [`Message::fields`].
    pub fn build() -> Result<Self, Error> {
        Self::from_fields(T::fields()).map_err(Error::enhance_schema_error::<T>)
    }
}

impl<T: 'static> Schema<T> {
    /// Validates `fields` and orders them by ascending tag.
    pub fn from_fields(mut fields: Vec<FieldDescriptor<T>>) -> Result<Self, Error> {
        for field in &fields {
            if field.tag == 0 || field.tag > MAX_TAG {
                bail!(
                    "field `{}` has tag {}, expected 1..={}",
                    field.name,
                    field.tag,
                    MAX_TAG
                );
            }
            if !field.access.accepts(field.kind) {
                bail!(
                    "field `{}` (tag {}) cannot be encoded as {}",
                    field.name,
                    field.tag,
                    field.kind
                );
            }
        }
        fields.sort_by_key(|f| f.tag);
        let mut by_tag = HashMap::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            if let Some(prev) = by_tag.insert(field.tag, index) {
                return Err(Error::schema_error(format!(
                    "duplicate tag {} on fields `{}` and `{}`",
                    field.tag, fields[prev].name, field.name
                )));
            }
        }
        Ok(Schema {
            type_name: std::any::type_name::<T>(),
            fields,
            by_tag,
        })
    }
}

impl<T> Schema<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Descriptors in ascending tag order.
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    #[inline(always)]
    pub fn field(&self, tag: u32) -> Option<&FieldDescriptor<T>> {
        self.by_tag.get(&tag).map(|&index| &self.fields[index])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish()
    }
}
