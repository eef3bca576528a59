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

use crate::error::Error;
use crate::schema::{Message, Schema};
use arc_swap::ArcSwap;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Holds a `Result<Arc<Schema<T>>, Error>` for the `T` it is keyed by.
type Entry = Arc<dyn Any + Send + Sync>;

static GLOBAL: OnceLock<Arc<SchemaRegistry>> = OnceLock::new();

/// Per-type schema cache.
///
/// Lookups are a lock-free load of the current map. The first lookup of a
/// type takes `build_lock`, checks again, builds the schema and publishes a
/// new map, so every type is built exactly once. Failed builds are cached
/// as well: a type whose field table is invalid keeps failing with the same
/// error.
pub struct SchemaRegistry {
    schemas: ArcSwap<HashMap<TypeId, Entry>>,
    build_lock: Mutex<()>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        SchemaRegistry {
            schemas: ArcSwap::from_pointee(HashMap::new()),
            build_lock: Mutex::new(()),
        }
    }
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> Arc<SchemaRegistry> {
        GLOBAL
            .get_or_init(|| Arc::new(SchemaRegistry::new()))
            .clone()
    }

    /// Returns the schema of `T`, building it on first use.
    pub fn describe<T: Message>(&self) -> Result<Arc<Schema<T>>, Error> {
        let id = TypeId::of::<T>();
        if let Some(entry) = self.schemas.load().get(&id) {
            return Self::downcast::<T>(entry);
        }

        let _guard = self
            .build_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let current = self.schemas.load_full();
        if let Some(entry) = current.get(&id) {
            return Self::downcast::<T>(entry);
        }

        let built = Schema::<T>::build().map(Arc::new);
        match &built {
            Ok(schema) => tracing::debug!(
                type_name = schema.type_name(),
                fields = schema.len(),
                "built message schema"
            ),
            Err(err) => tracing::warn!(
                type_name = std::any::type_name::<T>(),
                error = %err,
                "invalid message schema"
            ),
        }
        let mut next = HashMap::clone(&current);
        next.insert(id, Arc::new(built.clone()) as Entry);
        self.schemas.store(Arc::new(next));
        built
    }

    /// Whether `describe::<T>()` has already run, successfully or not.
    pub fn is_described<T: Message>(&self) -> bool {
        self.schemas.load().contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.schemas.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.load().is_empty()
    }

    fn downcast<T: Message>(entry: &Entry) -> Result<Arc<Schema<T>>, Error> {
        match entry.downcast_ref::<Result<Arc<Schema<T>>, Error>>() {
            Some(result) => result.clone(),
            None => Err(Error::schema_error(format!(
                "registry entry for {} holds another type",
                std::any::type_name::<T>()
            ))),
        }
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("schemas", &self.len())
            .finish()
    }
}
