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

//! Slot bookkeeping: the free mask, the ready mask and the ready queue, and
//! the transitions allowed between them.
//!
//! Every transition validates first and mutates second, so a rejected call
//! leaves the masks and the queue exactly as they were.

use crate::{
    common::{unlikely, Bitmask},
    queue::ReadyQueue,
    PoolError, SlotId,
};

/// Lifecycle state of a single slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Available for checkout.
    Free,
    /// Held by a producer, or by a consumer after dequeue.
    CheckedOut,
    /// Checked out and waiting in the ready queue.
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PoolState<M: Bitmask, const N: usize> {
    free: M,
    ready: M,
    queue: ReadyQueue<N>,
}

impl<M: Bitmask, const N: usize> PoolState<M, N> {
    const CAPACITY_FITS: () = assert!(
        N >= 1 && N <= M::BITS as usize,
        "pool capacity must be at least 1 and fit in the slot mask"
    );

    pub(crate) fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_FITS;
        PoolState {
            free: M::low_bits(N),
            ready: M::EMPTY,
            queue: ReadyQueue::new(),
        }
    }

    #[inline(always)]
    fn check_slot(id: SlotId) -> Result<(), PoolError> {
        if unlikely(id as usize >= N) {
            return Err(PoolError::InvalidSlot(id));
        }
        Ok(())
    }

    /// Takes the lowest-indexed free slot.
    pub(crate) fn checkout(&mut self) -> Result<SlotId, PoolError> {
        let id = self.free.lowest().ok_or(PoolError::NoBufferAvailable)?;
        self.free = self.free.without(id);
        Ok(id)
    }

    pub(crate) fn notify(&mut self, id: SlotId) -> Result<(), PoolError> {
        Self::check_slot(id)?;
        if unlikely(self.ready.contains(id)) {
            return Err(PoolError::DoubleNotify(id));
        }
        if unlikely(self.free.contains(id)) {
            return Err(PoolError::SpuriousNotify(id));
        }

        // Only checked-out, not-ready slots get here, so the queue has room.
        let queued = self.queue.push(id);
        debug_assert!(queued, "ready queue overflow");
        self.ready = self.ready.with(id);
        Ok(())
    }

    /// Slot that the next [`dequeue`](Self::dequeue) would hand out.
    pub(crate) fn peek_ready(&self) -> Result<SlotId, PoolError> {
        self.queue.peek().ok_or(PoolError::NoBufferAvailable)
    }

    pub(crate) fn dequeue(&mut self) -> Result<SlotId, PoolError> {
        let id = self.queue.pop().ok_or(PoolError::NoBufferAvailable)?;
        self.ready = self.ready.without(id);
        Ok(id)
    }

    /// Puts a checked-out, drained slot back into the free set.
    pub(crate) fn release(&mut self, id: SlotId) -> Result<(), PoolError> {
        Self::check_slot(id)?;
        if unlikely(self.ready.contains(id)) {
            return Err(PoolError::EarlyReturn(id));
        }
        if unlikely(self.free.contains(id)) {
            return Err(PoolError::InvalidReturn(id));
        }
        self.free = self.free.with(id);
        Ok(())
    }

    pub(crate) fn slot_state(&self, id: SlotId) -> Result<SlotState, PoolError> {
        Self::check_slot(id)?;
        Ok(if self.free.contains(id) {
            SlotState::Free
        } else if self.ready.contains(id) {
            SlotState::Ready
        } else {
            SlotState::CheckedOut
        })
    }

    pub(crate) fn free_mask(&self) -> M {
        self.free
    }

    pub(crate) fn ready_mask(&self) -> M {
        self.ready
    }

    pub(crate) fn snapshot(&self) -> Snapshot<M, N> {
        let mut order = [0; N];
        for (dst, id) in order.iter_mut().zip(self.queue.iter()) {
            *dst = id;
        }
        Snapshot {
            free: self.free,
            ready: self.ready,
            order,
            len: self.queue.len(),
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        assert!(!self.ready.intersects(self.free), "ready slot is free");
        assert_eq!(self.ready.count(), self.queue.len());
        assert!(self.queue.head() < N && self.queue.tail() < N);

        let mut seen = M::EMPTY;
        for id in self.queue.iter() {
            assert!(!seen.contains(id), "slot {id} queued twice");
            assert!(self.ready.contains(id), "queued slot {id} not ready");
            seen = seen.with(id);
        }
        assert_eq!(seen, self.ready);
        for bit in N..M::BITS as usize {
            assert!(!self.free.contains(bit as SlotId), "bit {bit} beyond capacity");
        }
    }
}

/// Point-in-time copy of the pool bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot<M: Bitmask, const N: usize> {
    free: M,
    ready: M,
    order: [SlotId; N],
    len: usize,
}

impl<M: Bitmask, const N: usize> Snapshot<M, N> {
    /// Bit `i` set means slot `i` is free.
    pub fn free_mask(&self) -> M {
        self.free
    }

    /// Bit `i` set means slot `i` is queued as ready.
    pub fn ready_mask(&self) -> M {
        self.ready
    }

    /// Ready slots in the order they will be dequeued.
    pub fn ready_order(&self) -> &[SlotId] {
        &self.order[..self.len]
    }
}
