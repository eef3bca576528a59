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

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;
use tagwire::{Message, TagWire};
use tagwire_core::registry::SchemaRegistry;
use tests::Invoice;

#[derive(Message, Default, Debug, Clone, PartialEq, Eq, Hash)]
struct Item {
    #[tagwire(tag = 1)]
    f1: i32,
    #[tagwire(tag = 2)]
    label: String,
}

#[test]
fn test_concurrent_first_describe() {
    let registry = Arc::new(SchemaRegistry::new());
    let threads = 16;
    let barrier = Arc::new(Barrier::new(threads));
    let mut handles = vec![];
    for _ in 0..threads {
        let registry = Arc::clone(&registry);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            registry.describe::<Invoice>().unwrap()
        }));
    }
    let schemas: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    // every thread got the single schema built for the type
    for schema in &schemas[1..] {
        assert!(Arc::ptr_eq(schema, &schemas[0]));
    }
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_struct_multi_thread() {
    let tagwire = Arc::new(TagWire::with_registry(Arc::new(SchemaRegistry::new())));
    let src: HashSet<_> = (40..48)
        .map(|f1| Item {
            f1,
            label: format!("item-{}", f1),
        })
        .collect();
    // serialize
    let mut handles = vec![];
    for item in &src {
        let tagwire_clone = Arc::clone(&tagwire);
        let item = item.clone();
        handles.push(thread::spawn(move || tagwire_clone.serialize(&item).unwrap()));
    }
    let serialized_data: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    // deserialize
    let mut handles = vec![];
    for bytes in serialized_data {
        let tagwire_clone = Arc::clone(&tagwire);
        handles.push(thread::spawn(move || {
            tagwire_clone.deserialize::<Item>(&bytes).unwrap()
        }));
    }
    let dest: HashSet<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    // verify
    assert_eq!(dest, src);
}

#[test]
fn test_global_registry_shared() {
    let a = TagWire::default();
    let b = TagWire::default();
    assert!(Arc::ptr_eq(a.registry(), b.registry()));
    let handle = thread::spawn(move || a.register::<Item>());
    handle.join().unwrap().unwrap();
    assert!(b.registry().is_described::<Item>());
}
