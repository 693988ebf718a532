// Copyright (C) 2025 Category Labs, Inc.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Payload containers held by pool slots.

use std::io;
use std::ops::Deref;

/// A container the pool can reset before handing it to a producer.
pub trait Payload {
    fn clear(&mut self);
}

impl Payload for Vec<u8> {
    fn clear(&mut self) {
        Vec::clear(self);
    }
}

impl<const S: usize> Payload for [u8; S] {
    fn clear(&mut self) {
        self.fill(0);
    }
}

/// Bounded byte buffer with capacity fixed at construction.
///
/// Bytes are appended at the back and consumed from the front. Writes past the
/// capacity are truncated; the buffer never reallocates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamBuffer {
    data: Box<[u8]>,
    len: usize,
}

impl StreamBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        StreamBuffer {
            data: vec![0; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn remaining(&self) -> usize {
        self.capacity() - self.len
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Appends as much of `bytes` as fits and returns how many were taken.
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(self.remaining());
        self.data[self.len..self.len + n].copy_from_slice(&bytes[..n]);
        self.len += n;
        n
    }

    /// Unfilled tail of the buffer, for writers that fill in place.
    ///
    /// Call [`commit`](Self::commit) with the number of bytes written.
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.len..]
    }

    /// Marks `n` bytes of the spare area as filled. Clamped to the capacity.
    pub fn commit(&mut self, n: usize) {
        self.len += n.min(self.remaining());
    }

    /// Drops `n` bytes from the front.
    pub fn consume(&mut self, n: usize) {
        let n = n.min(self.len);
        self.data.copy_within(n..self.len, 0);
        self.len -= n;
    }
}

impl Payload for StreamBuffer {
    fn clear(&mut self) {
        self.len = 0;
    }
}

impl Deref for StreamBuffer {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl io::Write for StreamBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.append(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Read for StreamBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.len);
        buf[..n].copy_from_slice(&self.data[..n]);
        self.consume(n);
        Ok(n)
    }
}
