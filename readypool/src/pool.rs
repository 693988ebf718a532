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

use std::cell::UnsafeCell;
use std::fmt;

use tracing::warn;

use crate::{
    common::{unlikely, Bitmask},
    config::{PoolConfig, DEFAULT_CAPACITY},
    hooks::{ExclusiveHooks, HookGuard, LockHooks, NoLock},
    payload::{Payload, StreamBuffer},
    slot::{Lease, Slot},
    state::{PoolState, SlotState, Snapshot},
    PoolError, SlotId,
};

/// Pool with the default capacity and [`StreamBuffer`] payloads.
pub type DefaultPool<L = NoLock> = StreamPool<StreamBuffer, DEFAULT_CAPACITY, L>;

/// Fixed set of `N` payload slots handed from producers to a consumer in the
/// order they were marked ready.
///
/// `M` is the bit set used for the slot masks and bounds `N`; a capacity that
/// does not fit is a compile error. `L` brackets every access to the
/// bookkeeping. The pool is `Sync` only when `L` implements
/// [`ExclusiveHooks`].
pub struct StreamPool<P, const N: usize, L: LockHooks = NoLock, M: Bitmask = u8> {
    hooks: L,
    state: UnsafeCell<PoolState<M, N>>,
    slots: [Slot<P>; N],
}

// SAFETY: the bookkeeping is only reached inside the hook bracket, which
// `ExclusiveHooks` promises is exclusive, and payloads are only reached
// through a lease, which the lease flag makes exclusive.
unsafe impl<P: Send, const N: usize, L: ExclusiveHooks, M: Bitmask> Sync for StreamPool<P, N, L, M> {}

impl<P, const N: usize, L: LockHooks, M: Bitmask> StreamPool<P, N, L, M> {
    /// Initialises the hooks and builds one payload per slot. All slots start free.
    pub fn new(hooks: L, mut payload: impl FnMut(SlotId) -> P) -> Result<Self, PoolError> {
        let state = PoolState::new();
        hooks.init().inspect_err(|e| warn!(error = %e, "pool lock init failed"))?;

        Ok(StreamPool {
            hooks,
            state: UnsafeCell::new(state),
            slots: std::array::from_fn(|i| Slot::new(payload(i as SlotId))),
        })
    }

    #[inline(always)]
    fn with_state<R>(&self, f: impl FnOnce(&mut PoolState<M, N>) -> R) -> R {
        let _guard = HookGuard::acquire(&self.hooks);
        // SAFETY: the state is only borrowed here, inside the hook bracket, and
        // `f` never calls back into the pool.
        f(unsafe { &mut *self.state.get() })
    }

    pub(crate) fn slot(&self, id: SlotId) -> &Slot<P> {
        &self.slots[id as usize]
    }

    pub fn capacity(&self) -> usize {
        N
    }

    pub fn hooks(&self) -> &L {
        &self.hooks
    }

    /// Marks a checked-out slot as ready. Ready slots are dequeued in the
    /// order of their notifications.
    ///
    /// Takes no lease and does not allocate, so it can run from interrupt or
    /// completion context once the producer has dropped its lease.
    pub fn notify_ready(&self, id: SlotId) -> Result<(), PoolError> {
        self.transition("notify", id, |state| state.notify(id))
    }

    /// Hands the oldest ready slot to the consumer.
    ///
    /// Fails with [`PoolError::SlotBusy`], and dequeues nothing, while a lease
    /// on that slot is still held.
    pub fn dequeue_ready(&self) -> Result<Lease<'_, P, N, L, M>, PoolError> {
        let id = self.with_state(|state| {
            let id = state.peek_ready()?;
            if unlikely(!self.slot(id).try_lease()) {
                return Err(PoolError::SlotBusy(id));
            }
            state.dequeue()
        })?;
        pool_trace!(slot = id, "dequeued ready slot");
        Ok(Lease::new(self, id))
    }

    /// Returns a drained slot to the free pool.
    pub fn return_slot(&self, id: SlotId) -> Result<(), PoolError> {
        self.transition("return", id, |state| {
            if state.slot_state(id)? == SlotState::CheckedOut && self.slot(id).is_leased() {
                return Err(PoolError::SlotBusy(id));
            }
            state.release(id)
        })
    }

    /// Leases the payload of a slot that is already checked out.
    pub fn lease(&self, id: SlotId) -> Result<Lease<'_, P, N, L, M>, PoolError> {
        self.with_state(|state| {
            if state.slot_state(id)? == SlotState::Free {
                return Err(PoolError::NotCheckedOut(id));
            }
            if unlikely(!self.slot(id).try_lease()) {
                return Err(PoolError::SlotBusy(id));
            }
            Ok(())
        })?;
        Ok(Lease::new(self, id))
    }

    pub(crate) fn notify_leased(&self, id: SlotId) -> Result<(), PoolError> {
        self.transition("notify", id, |state| {
            let result = state.notify(id);
            self.slot(id).end_lease();
            result
        })
    }

    pub(crate) fn return_leased(&self, id: SlotId) -> Result<(), PoolError> {
        self.transition("return", id, |state| {
            let result = state.release(id);
            self.slot(id).end_lease();
            result
        })
    }

    fn transition(
        &self,
        op: &'static str,
        id: SlotId,
        f: impl FnOnce(&mut PoolState<M, N>) -> Result<(), PoolError>,
    ) -> Result<(), PoolError> {
        let result = self.with_state(|state| {
            f(state).map_err(|err| (err, state.free_mask(), state.ready_mask()))
        });

        match result {
            Ok(()) => {
                pool_trace!(slot = id, op, "slot transition");
                Ok(())
            }
            Err((err @ (PoolError::SpuriousNotify(_) | PoolError::InvalidReturn(_)), free, ready)) => {
                warn!(
                    slot = id,
                    free_mask = format_args!("{free:#b}"),
                    ready_mask = format_args!("{ready:#b}"),
                    "{op} rejected: {err}"
                );
                Err(err)
            }
            Err((err, _, _)) => {
                pool_trace!(slot = id, op, error = %err, "slot transition rejected");
                Err(err)
            }
        }
    }

    /// Number of slots waiting to be dequeued.
    pub fn ready_count(&self) -> usize {
        self.with_state(|state| state.ready_mask().count())
    }

    pub fn any_ready(&self) -> bool {
        self.with_state(|state| !state.ready_mask().is_empty())
    }

    pub fn free_count(&self) -> usize {
        self.with_state(|state| state.free_mask().count())
    }

    pub fn slot_state(&self, id: SlotId) -> Result<SlotState, PoolError> {
        self.with_state(|state| state.slot_state(id))
    }

    pub fn snapshot(&self) -> Snapshot<M, N> {
        self.with_state(|state| state.snapshot())
    }
}

impl<P: Payload, const N: usize, L: LockHooks, M: Bitmask> StreamPool<P, N, L, M> {
    /// Checks out the lowest-indexed free slot with its payload cleared.
    pub fn checkout(&self) -> Result<Lease<'_, P, N, L, M>, PoolError> {
        let id = self.with_state(|state| {
            let id = state.checkout()?;
            // Free slots are never leased: returns and dequeues refuse leased slots.
            let claimed = self.slot(id).try_lease();
            debug_assert!(claimed, "free slot {id} was still leased");
            Ok::<_, PoolError>(id)
        })?;
        pool_trace!(slot = id, "checked out slot");

        let mut lease = Lease::new(self, id);
        lease.clear();
        Ok(lease)
    }

    /// Frees every slot and clears every payload.
    pub fn reset(&mut self) {
        *self.state.get_mut() = PoolState::new();
        for slot in &mut self.slots {
            slot.end_lease();
            slot.payload_mut().clear();
        }
    }
}

impl<const N: usize, L: LockHooks, M: Bitmask> StreamPool<StreamBuffer, N, L, M> {
    /// Builds a pool whose payloads are [`StreamBuffer`]s of the configured size.
    pub fn from_config(config: &PoolConfig, hooks: L) -> Result<Self, PoolError> {
        Self::new(hooks, |_| StreamBuffer::with_capacity(config.payload_size))
    }
}

impl<P, const N: usize, L: LockHooks, M: Bitmask> Drop for StreamPool<P, N, L, M> {
    fn drop(&mut self) {
        pool_trace!(capacity = N, "pool torn down");
        self.hooks.deinit();
    }
}

impl<P, const N: usize, L: LockHooks, M: Bitmask> fmt::Debug for StreamPool<P, N, L, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("StreamPool")
            .field("capacity", &N)
            .field("free_mask", &format_args!("{:#b}", snapshot.free_mask()))
            .field("ready_mask", &format_args!("{:#b}", snapshot.ready_mask()))
            .field("ready_order", &snapshot.ready_order())
            .finish()
    }
}
