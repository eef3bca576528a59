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

//! # Tagwire Derive Macros
//!
//! `#[derive(Message)]` implements `tagwire_core::schema::Message` for a
//! struct by turning its `#[tagwire(...)]` field attributes into a field
//! table.
//!
//! ## Field attributes
//!
//! - `tag = N`: the field's tag, `1..=2^29-1`, unique within the struct. Required
//!   on every field that is not skipped.
//! - `kind = "..."`: the scalar kind (`int32`, `sint64`, `fixed32`, `string`, ...).
//!   Optional for `i32`, `i64`, `u32`, `u64`, `bool`, `f32`, `f64`, `String`
//!   and `Vec<u8>`, which default to `int32`, `int64`, `uint32`, `uint64`,
//!   `bool`, `float`, `double`, `string` and `bytes`.
//! - `message`: the field is a nested message. The field may be `M`,
//!   `Box<M>`, `Option<M>` or `Option<Box<M>>`; optional fields are only
//!   written when present.
//! - `skip`: the field is not encoded and keeps its default value on decode.
//!
//! ## Example
//!
//! ```rust
//! use tagwire_core::error::Error;
//! use tagwire_core::tagwire::TagWire;
//! use tagwire_derive::Message;
//!
//! #[derive(Message, Default, Debug, PartialEq)]
//! struct Customer {
//!     #[tagwire(tag = 1)]
//!     name: String,
//! }
//!
//! #[derive(Message, Default, Debug, PartialEq)]
//! struct Invoice {
//!     #[tagwire(tag = 1)]
//!     id: i64,
//!     #[tagwire(tag = 2)]
//!     code: String,
//!     #[tagwire(tag = 600, kind = "sint64")]
//!     amount: i64,
//!     #[tagwire(tag = 700, message)]
//!     customer: Option<Customer>,
//!     #[tagwire(skip)]
//!     cached_total: u64,
//! }
//!
//! # fn main() -> Result<(), Error> {
//! let tagwire = TagWire::default();
//! let invoice = Invoice {
//!     id: 7,
//!     code: "A-7".to_string(),
//!     amount: -250,
//!     customer: Some(Customer { name: "Acme".to_string() }),
//!     cached_total: 99,
//! };
//! let decoded: Invoice = tagwire.deserialize(&tagwire.serialize(&invoice)?)?;
//! assert_eq!(decoded.customer, invoice.customer);
//! assert_eq!(decoded.amount, -250);
//! assert_eq!(decoded.cached_total, 0);
//! # Ok(())
//! # }
//! ```
//!
//! Tags and kinds are checked while the macro expands: a missing tag, a tag
//! out of range, a repeated tag or an unknown kind is a compile error. Whether
//! a kind suits the field's Rust type is checked when the schema is built.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod object;
mod util;

/// Derives `tagwire_core::schema::Message` from `#[tagwire(...)]` field attributes.
#[proc_macro_derive(Message, attributes(tagwire))]
pub fn proc_macro_derive_message(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    object::derive_message(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
