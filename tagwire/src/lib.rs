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

//! # Tagwire
//!
//! A compact binary encoding in the protobuf style: each field is written as
//! a key carrying its tag and wire type, followed by its value. Readers
//! decode the tags they know and skip the rest, so producers can add fields
//! without breaking older consumers.
//!
//! ## Defining messages
//!
//! ```rust
//! use tagwire::{Error, Message, TagWire};
//!
//! #[derive(Message, Default, Debug, PartialEq)]
//! struct Invoice {
//!     #[tagwire(tag = 1)]
//!     id: i64,
//!     #[tagwire(tag = 2)]
//!     code: String,
//!     #[tagwire(tag = 600)]
//!     amount: i64,
//!     #[tagwire(tag = 601)]
//!     tax: i64,
//! }
//!
//! # fn main() -> Result<(), Error> {
//! let tagwire = TagWire::default();
//! let invoice = Invoice { id: 1001, code: "TEST".into(), amount: 100, tax: 75 };
//! let bytes = tagwire.serialize(&invoice)?;
//! let decoded: Invoice = tagwire.deserialize(&bytes)?;
//! assert_eq!(invoice, decoded);
//! # Ok(())
//! # }
//! ```
//!
//! The derive expands to paths under `tagwire_core`, so a crate deriving
//! `Message` depends on `tagwire-core` alongside `tagwire`.
//!
//! ## Wire format
//!
//! | wire type | id | value |
//! |-----------|----|-------|
//! | Varint | 0 | base-128 varint, at most 10 bytes |
//! | Fixed64 | 1 | 8 bytes little-endian |
//! | LengthDelimited | 2 | varint length, then that many bytes |
//! | Fixed32 | 5 | 4 bytes little-endian |
//!
//! The key is `varint(tag << 3 | wire_type)`. Fields are written in
//! ascending tag order; on read, a repeated tag overwrites the earlier value.
//!
//! ## Schemas
//!
//! The derive generates a field table that a [`SchemaRegistry`] validates
//! and caches on first use. Duplicate tags, tags out of range and kinds that
//! do not fit the field's type are reported as [`Error::SchemaError`]; call
//! [`TagWire::register`] to surface them at start-up.
//!
//! ## Errors
//!
//! Every decode failure is an [`Error`]; unknown tags never are. A failed
//! read returns no partial record.

pub use tagwire_core::{
    buffer::Reader, buffer::Writer, config::Config, config::Utf8Policy, error::Error,
    registry::SchemaRegistry, scalar::ScalarKind, schema::FieldDescriptor, schema::Message,
    tagwire::TagWire, wire::WireType,
};
pub use tagwire_derive::Message;
