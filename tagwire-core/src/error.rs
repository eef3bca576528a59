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

//! Error type shared by every Tagwire operation.
//!
//! Error constructors are called from every primitive read. Changing their
//! attributes (`#[inline]`, `#[cold]`, `#[track_caller]`) changes how the
//! successful read paths around them are optimized.

use std::borrow::Cow;

use thiserror::Error;

use crate::wire::WireType;

/// Set `TAGWIRE_PANIC_ON_ERROR=1` at compile time to panic where an error is created.
pub const PANIC_ON_ERROR: bool = option_env!("TAGWIRE_PANIC_ON_ERROR").is_some();

#[inline(always)]
pub const fn should_panic_on_error() -> bool {
    PANIC_ON_ERROR
}

/// Error type for Tagwire encoding and decoding.
///
/// # Always use the constructor functions
///
/// Variants are never built with enum syntax; use [`Error::truncated`],
/// [`Error::decode_error`], [`Error::type_mismatch`],
/// [`Error::length_mismatch`], [`Error::schema_error`] or
/// [`Error::depth_exceeded`]. The constructors convert messages through
/// `Into<Cow<'static, str>>` and honour the `TAGWIRE_PANIC_ON_ERROR` debug switch:
///
/// ```bash
/// RUST_BACKTRACE=1 TAGWIRE_PANIC_ON_ERROR=1 cargo test
/// ```
///
/// ```rust
/// use tagwire_core::error::Error;
///
/// let err = Error::decode_error("varint exceeds 10 bytes");
/// assert!(err.is_parse_failure());
///
/// let err = Error::schema_error(format!("duplicate tag {}", 7));
/// assert!(!err.is_parse_failure());
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The input ran out in the middle of a primitive.
    #[error("Truncated input: needed {needed} byte(s), {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    /// Structurally invalid input: reserved wire type, oversized varint, bad tag, bad UTF-8.
    #[error("{0}")]
    DecodeError(Cow<'static, str>),

    /// A known tag arrived with a wire type other than the one its field declares.
    #[error("Type mismatch on tag {tag}: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        tag: u32,
        expected: WireType,
        actual: WireType,
    },

    /// A length-delimited span is longer than the bytes left in its cursor.
    #[error("Length mismatch: declared {declared} byte(s), {remaining} remaining")]
    LengthMismatch { declared: u64, remaining: usize },

    /// The field table of a message type is invalid. Detected once, when the schema is built.
    #[error("{0}")]
    SchemaError(Cow<'static, str>),

    /// Nested messages went deeper than the configured limit.
    #[error("{0}")]
    DepthExceeded(Cow<'static, str>),
}

impl Error {
    /// Creates a new [`Error::Truncated`].
    ///
    /// ```
    /// use tagwire_core::error::Error;
    ///
    /// let err = Error::truncated(8, 3);
    /// assert_eq!(err.to_string(), "Truncated input: needed 8 byte(s), 3 remaining");
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn truncated(needed: usize, remaining: usize) -> Self {
        let err = Error::Truncated { needed, remaining };
        if PANIC_ON_ERROR {
            panic!("TAGWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::DecodeError`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn decode_error<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::DecodeError(s.into());
        if PANIC_ON_ERROR {
            panic!("TAGWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::TypeMismatch`] for `tag`.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn type_mismatch(tag: u32, expected: WireType, actual: WireType) -> Self {
        let err = Error::TypeMismatch {
            tag,
            expected,
            actual,
        };
        if PANIC_ON_ERROR {
            panic!("TAGWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::LengthMismatch`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn length_mismatch(declared: u64, remaining: usize) -> Self {
        let err = Error::LengthMismatch {
            declared,
            remaining,
        };
        if PANIC_ON_ERROR {
            panic!("TAGWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::SchemaError`].
    ///
    /// ```
    /// use tagwire_core::error::Error;
    ///
    /// let err = Error::schema_error("duplicate tag 1");
    /// assert_eq!(err.to_string(), "duplicate tag 1");
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn schema_error<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::SchemaError(s.into());
        if PANIC_ON_ERROR {
            panic!("TAGWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::DepthExceeded`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn depth_exceeded<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::DepthExceeded(s.into());
        if PANIC_ON_ERROR {
            panic!("TAGWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Returns `true` for errors caused by the bytes being decoded, `false`
    /// for schema misconfiguration.
    pub fn is_parse_failure(&self) -> bool {
        !matches!(self, Error::SchemaError(_))
    }

    /// Appends the message type name to a [`Error::SchemaError`]; other errors pass through.
    #[inline(never)]
    pub fn enhance_schema_error<T: ?Sized + 'static>(err: Error) -> Error {
        if let Error::SchemaError(s) = err {
            let mut msg = s.to_string();
            msg.push_str(" (type: ");
            msg.push_str(std::any::type_name::<T>());
            msg.push(')');
            Error::schema_error(msg)
        } else {
            err
        }
    }
}

/// Returns early with a [`Error::DecodeError`] unless the condition holds.
///
/// ```
/// use tagwire_core::ensure;
/// use tagwire_core::error::Error;
///
/// fn check_tag(tag: u32) -> Result<(), Error> {
///     ensure!(tag > 0, "tag must be positive");
///     ensure!(tag < 100, "tag {} out of range", tag);
///     Ok(())
/// }
/// assert!(check_tag(0).is_err());
/// assert!(check_tag(5).is_ok());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::error::Error::decode_error($msg));
        }
    };
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::decode_error(format!($fmt, $($arg)*)));
        }
    };
}

/// Returns early with a [`Error::SchemaError`].
///
/// ```
/// use tagwire_core::bail;
/// use tagwire_core::error::Error;
///
/// fn reject(name: &str) -> Result<(), Error> {
///     bail!("field {} has no codec", name);
/// }
/// assert!(reject("total").is_err());
/// ```
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::error::Error::schema_error($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::schema_error(format!($fmt, $($arg)*)))
    };
}
