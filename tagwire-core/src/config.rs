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

/// How `string` fields treat bytes that are not valid UTF-8.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Utf8Policy {
    /// Fail the whole read with a decode error.
    #[default]
    Strict,
    /// Replace invalid sequences with U+FFFD.
    Lossy,
}

/// Configuration for Tagwire encoding and decoding.
///
/// Shared by the `TagWire` entry point and the per-call
/// `WriteContext`/`ReadContext`, so every field of every message in one
/// call is handled the same way.
#[derive(Clone, Debug)]
pub struct Config {
    /// Bytes pre-allocated for the output buffer of each encode call.
    pub initial_capacity: usize,
    /// Handling of invalid UTF-8 in `string` fields.
    pub utf8: Utf8Policy,
    /// Maximum nesting of `message` fields.
    pub max_depth: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            initial_capacity: 64,
            utf8: Utf8Policy::Strict,
            max_depth: 16,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    #[inline(always)]
    pub fn utf8_policy(&self) -> Utf8Policy {
        self.utf8
    }

    #[inline(always)]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}
