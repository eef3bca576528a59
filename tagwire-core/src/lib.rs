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

//! # Tagwire Core
//!
//! Building blocks of the Tagwire encoding: a protobuf-style binary format
//! where every field is a `(tag, wire type)` key followed by a value, and
//! where readers skip fields they do not know.
//!
//! ## Architecture
//!
//! - **`buffer`**: bounded [`Reader`](buffer::Reader) and growable [`Writer`](buffer::Writer)
//! - **`wire`**: wire types, keys, length-delimited spans and skipping
//! - **`scalar`**: the closed set of scalar kinds and their encodings
//! - **`schema`**: the [`Message`](schema::Message) trait and per-type field tables
//! - **`registry`**: per-type schema cache, built once per type
//! - **`codec`**: schema-driven message reading and writing
//! - **`tagwire`**: the [`TagWire`](tagwire::TagWire) entry point
//! - **`config`** and **`error`**
//!
//! ## Usage
//!
//! This crate is normally used through the `tagwire` crate, which adds
//! `#[derive(Message)]`. The pieces can also be driven directly:
//!
//! ```rust
//! use tagwire_core::buffer::{Reader, Writer};
//! use tagwire_core::wire::{read_key, skip_value, write_key, WireType};
//!
//! let mut writer = Writer::default();
//! write_key(&mut writer, 150, WireType::Varint);
//! writer.write_varuint64(300);
//! let bytes = writer.into_bytes();
//!
//! let mut reader = Reader::new(&bytes);
//! let key = read_key(&mut reader).unwrap();
//! assert_eq!(key.tag, 150);
//! skip_value(&mut reader, key.wire_type).unwrap();
//! assert!(reader.is_empty());
//! ```

pub mod buffer;
pub mod codec;
pub mod config;
pub mod error;
pub mod registry;
pub mod scalar;
pub mod schema;
pub mod tagwire;
pub mod wire;

pub use buffer::{Reader, Writer};
pub use config::{Config, Utf8Policy};
pub use error::Error;
pub use registry::SchemaRegistry;
pub use scalar::{ScalarField, ScalarKind, Value};
pub use schema::{FieldDescriptor, Message, Schema};
pub use tagwire::TagWire;
pub use wire::{Key, WireType};
