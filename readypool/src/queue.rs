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

use crate::SlotId;

/// Circular FIFO of slot indices in the order they became ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReadyQueue<const N: usize> {
    entries: [SlotId; N],
    head: usize,
    tail: usize,
    len: usize,
}

impl<const N: usize> ReadyQueue<N> {
    pub(crate) const fn new() -> Self {
        ReadyQueue {
            entries: [0; N],
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    /// Appends at the tail. Returns `false` without touching the queue when full.
    #[inline(always)]
    pub(crate) fn push(&mut self, id: SlotId) -> bool {
        if self.len == N {
            return false;
        }
        self.entries[self.tail] = id;
        self.tail = (self.tail + 1) % N;
        self.len += 1;
        true
    }

    #[inline(always)]
    pub(crate) fn peek(&self) -> Option<SlotId> {
        if self.len == 0 {
            None
        } else {
            Some(self.entries[self.head])
        }
    }

    #[inline(always)]
    pub(crate) fn pop(&mut self) -> Option<SlotId> {
        let id = self.peek()?;
        self.head = (self.head + 1) % N;
        self.len -= 1;
        Some(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn head(&self) -> usize {
        self.head
    }

    pub(crate) fn tail(&self) -> usize {
        self.tail
    }

    /// Queued ids from head to tail.
    pub(crate) fn iter(&self) -> impl Iterator<Item = SlotId> + '_ {
        (0..self.len).map(move |i| self.entries[(self.head + i) % N])
    }
}
