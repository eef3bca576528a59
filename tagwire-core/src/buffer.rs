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
use byteorder::{ByteOrder, LittleEndian};

/// Longest legal varint: ten 7-bit groups cover 64 bits.
pub const MAX_VARINT_LEN: usize = 10;

/// Number of bytes `value` occupies as a varint.
#[inline]
pub fn varint_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    (bits + 6) / 7
}

#[derive(Default, Debug, Clone)]
pub struct Writer {
    pub(crate) bf: Vec<u8>,
}

impl Writer {
    pub fn with_capacity(capacity: usize) -> Writer {
        Writer {
            bf: Vec::with_capacity(capacity),
        }
    }

    /// Appends to `bf` instead of starting from an empty buffer.
    pub fn from_vec(bf: Vec<u8>) -> Writer {
        Writer { bf }
    }

    pub fn reset(&mut self) {
        // keep capacity and reset len to 0
        self.bf.clear();
    }

    pub fn dump(&self) -> Vec<u8> {
        self.bf.clone()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bf
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bf
    }

    pub fn len(&self) -> usize {
        self.bf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bf.is_empty()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.bf.reserve(additional);
    }

    pub fn write_bytes(&mut self, v: &[u8]) -> usize {
        self.bf.extend_from_slice(v);
        v.len()
    }

    #[inline(always)]
    pub fn write_u8(&mut self, value: u8) {
        self.bf.push(value);
    }

    #[inline(always)]
    pub fn write_u32(&mut self, value: u32) {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, value);
        self.bf.extend_from_slice(&buf);
    }

    #[inline(always)]
    pub fn write_i32(&mut self, value: i32) {
        self.write_u32(value as u32);
    }

    #[inline(always)]
    pub fn write_f32(&mut self, value: f32) {
        self.write_u32(value.to_bits());
    }

    #[inline(always)]
    pub fn write_u64(&mut self, value: u64) {
        let mut buf = [0u8; 8];
        LittleEndian::write_u64(&mut buf, value);
        self.bf.extend_from_slice(&buf);
    }

    #[inline(always)]
    pub fn write_i64(&mut self, value: i64) {
        self.write_u64(value as u64);
    }

    #[inline(always)]
    pub fn write_f64(&mut self, value: f64) {
        self.write_u64(value.to_bits());
    }

    #[inline(always)]
    pub fn write_varuint32(&mut self, value: u32) {
        self.write_varuint64(value as u64)
    }

    pub fn write_varuint64(&mut self, mut value: u64) {
        if value < 0x80 {
            self.bf.push(value as u8);
            return;
        }
        while value >= 0x80 {
            self.bf.push(((value as u8) & 0x7F) | 0x80);
            value >>= 7;
        }
        self.bf.push(value as u8);
    }
}

/// Bounded, sequential view over a borrowed byte region.
///
/// `cursor` and `end` are absolute offsets into the backing slice. Every
/// bound check uses `end`, so a sub-reader carved out with
/// [`Reader::read_sub`] cannot see bytes past its own region even though
/// they are physically present. A failed read leaves the cursor untouched.
#[derive(Clone, Copy, Debug)]
pub struct Reader<'a> {
    bf: &'a [u8],
    start: usize,
    end: usize,
    cursor: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bf: &'a [u8]) -> Reader<'a> {
        Reader {
            bf,
            start: 0,
            end: bf.len(),
            cursor: 0,
        }
    }

    /// Absolute offset of the next unread byte.
    #[inline(always)]
    pub fn position(&self) -> usize {
        self.cursor
    }

    #[inline(always)]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline(always)]
    pub fn end(&self) -> usize {
        self.end
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.end - self.cursor
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.cursor >= self.end
    }

    /// The whole window `start..end`, read or not.
    pub fn get_slice(&self) -> &'a [u8] {
        &self.bf[self.start..self.end]
    }

    /// The unread part of the window.
    pub fn as_slice(&self) -> &'a [u8] {
        &self.bf[self.cursor..self.end]
    }

    #[inline(always)]
    fn check(&self, needed: usize) -> Result<(), Error> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(Error::truncated(needed, remaining));
        }
        Ok(())
    }

    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        self.check(1)?;
        let b = self.bf[self.cursor];
        self.cursor += 1;
        Ok(b)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], Error> {
        self.check(len)?;
        let s = &self.bf[self.cursor..self.cursor + len];
        self.cursor += len;
        Ok(s)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), Error> {
        self.check(len)?;
        self.cursor += len;
        Ok(())
    }

    /// Splits off a reader over the next `len` bytes and advances past them.
    ///
    /// The sub-reader borrows the same backing bytes; nothing is copied.
    pub fn read_sub(&mut self, len: usize) -> Result<Reader<'a>, Error> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(Error::length_mismatch(len as u64, remaining));
        }
        let sub = Reader {
            bf: self.bf,
            start: self.cursor,
            end: self.cursor + len,
            cursor: self.cursor,
        };
        self.cursor += len;
        Ok(sub)
    }

    #[inline(always)]
    pub fn read_u32(&mut self) -> Result<u32, Error> {
        self.check(4)?;
        let result = LittleEndian::read_u32(&self.bf[self.cursor..self.cursor + 4]);
        self.cursor += 4;
        Ok(result)
    }

    #[inline(always)]
    pub fn read_i32(&mut self) -> Result<i32, Error> {
        Ok(self.read_u32()? as i32)
    }

    #[inline(always)]
    pub fn read_f32(&mut self) -> Result<f32, Error> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    #[inline(always)]
    pub fn read_u64(&mut self) -> Result<u64, Error> {
        self.check(8)?;
        let result = LittleEndian::read_u64(&self.bf[self.cursor..self.cursor + 8]);
        self.cursor += 8;
        Ok(result)
    }

    #[inline(always)]
    pub fn read_i64(&mut self) -> Result<i64, Error> {
        Ok(self.read_u64()? as i64)
    }

    #[inline(always)]
    pub fn read_f64(&mut self) -> Result<f64, Error> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Reads a varint and keeps its low 32 bits, as protobuf does for 32-bit kinds.
    #[inline(always)]
    pub fn read_varuint32(&mut self) -> Result<u32, Error> {
        Ok(self.read_varuint64()? as u32)
    }

    pub fn read_varuint64(&mut self) -> Result<u64, Error> {
        let start = self.cursor;
        let b0 = match self.bf[..self.end].get(start) {
            Some(b) => *b,
            None => return Err(Error::truncated(1, 0)),
        };
        if b0 < 0x80 {
            self.cursor += 1;
            return Ok(b0 as u64);
        }

        let mut result = (b0 & 0x7F) as u64;
        let mut shift = 7;
        let mut pos = start + 1;
        loop {
            if pos >= self.end {
                return Err(Error::truncated(pos - start + 1, self.end - start));
            }
            let b = self.bf[pos];
            pos += 1;
            if pos - start == MAX_VARINT_LEN {
                // only bit 63 is left for the tenth group
                if b & 0x80 != 0 {
                    return Err(Error::decode_error(format!(
                        "varint at offset {} is longer than {} bytes",
                        start, MAX_VARINT_LEN
                    )));
                }
                if b > 1 {
                    return Err(Error::decode_error(format!(
                        "varint at offset {} overflows 64 bits",
                        start
                    )));
                }
            }
            result |= ((b & 0x7F) as u64) << shift;
            if b < 0x80 {
                self.cursor = pos;
                return Ok(result);
            }
            shift += 7;
        }
    }
}
