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

use crate::buffer::{Reader, Writer};
use crate::codec::{read_message, write_message, ReadContext, WriteContext};
use crate::config::{Config, Utf8Policy};
use crate::error::Error;
use crate::registry::SchemaRegistry;
use crate::schema::Message;
use std::sync::Arc;

/// Entry point for encoding and decoding messages.
///
/// A `TagWire` pairs a [`Config`] with a schema registry. `TagWire::default()`
/// shares the process-wide registry; [`TagWire::with_registry`] takes an
/// isolated one. Instances are cheap to clone and safe to share across
/// threads.
///
/// ```rust
/// use tagwire_core::tagwire::TagWire;
/// use tagwire_core::config::Utf8Policy;
///
/// let tagwire = TagWire::default()
///     .initial_capacity(256)
///     .utf8_policy(Utf8Policy::Lossy)
///     .max_depth(8);
/// assert_eq!(tagwire.config().max_depth(), 8);
/// ```
#[derive(Clone, Debug)]
pub struct TagWire {
    config: Config,
    registry: Arc<SchemaRegistry>,
}

impl Default for TagWire {
    fn default() -> Self {
        TagWire {
            config: Config::default(),
            registry: SchemaRegistry::global(),
        }
    }
}

impl TagWire {
    pub fn with_registry(registry: Arc<SchemaRegistry>) -> Self {
        TagWire {
            config: Config::default(),
            registry,
        }
    }

    /// Bytes pre-allocated for each [`TagWire::serialize`] call.
    pub fn initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.config.initial_capacity = initial_capacity;
        self
    }

    pub fn utf8_policy(mut self, utf8: Utf8Policy) -> Self {
        self.config.utf8 = utf8;
        self
    }

    /// Maximum nesting of message fields, the top-level message excluded.
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Builds and validates the schema of `T` now instead of on first use.
    pub fn register<T: Message>(&self) -> Result<(), Error> {
        self.registry.describe::<T>().map(|_| ())
    }

    pub fn serialize<T: Message>(&self, record: &T) -> Result<Vec<u8>, Error> {
        let writer = Writer::with_capacity(self.config.initial_capacity());
        let mut context = WriteContext::new(&self.registry, &self.config, writer);
        write_message(&mut context, record)?;
        Ok(context.into_writer().into_bytes())
    }

    /// Appends the encoding of `record` to `buf` and returns the number of
    /// bytes appended. On failure `buf` is left as it was.
    pub fn serialize_to<T: Message>(
        &self,
        record: &T,
        buf: &mut Vec<u8>,
    ) -> Result<usize, Error> {
        let start = buf.len();
        let writer = Writer::from_vec(std::mem::take(buf));
        let mut context = WriteContext::new(&self.registry, &self.config, writer);
        let result = write_message(&mut context, record);
        *buf = context.into_writer().into_bytes();
        match result {
            Ok(()) => Ok(buf.len() - start),
            Err(err) => {
                buf.truncate(start);
                Err(err)
            }
        }
    }

    pub fn deserialize<T: Message>(&self, bf: &[u8]) -> Result<T, Error> {
        let mut context = ReadContext::new(&self.registry, &self.config, Reader::new(bf));
        read_message::<T>(&mut context)
    }

    /// Decodes a `T` from the rest of `reader`, which is advanced to its end
    /// on success and left untouched on failure.
    pub fn deserialize_from<T: Message>(&self, reader: &mut Reader) -> Result<T, Error> {
        let mut context = ReadContext::new(&self.registry, &self.config, *reader);
        let value = read_message::<T>(&mut context)?;
        *reader = context.reader;
        Ok(value)
    }

    /// Size of the encoding of `record`, in bytes.
    pub fn encoded_len<T: Message>(&self, record: &T) -> Result<usize, Error> {
        crate::codec::encoded_len(&self.registry, &self.config, record)
    }
}
