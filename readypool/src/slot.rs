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
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};

use crate::{
    common::Bitmask,
    hooks::LockHooks,
    pool::StreamPool,
    sync::{AtomicBool, Ordering},
    PoolError, SlotId,
};

pub(crate) struct Slot<P> {
    leased: AtomicBool,
    payload: UnsafeCell<P>,
}

impl<P> Slot<P> {
    pub(crate) fn new(payload: P) -> Self {
        Slot {
            leased: AtomicBool::new(false),
            payload: UnsafeCell::new(payload),
        }
    }

    /// Claims exclusive access to the payload.
    #[inline(always)]
    pub(crate) fn try_lease(&self) -> bool {
        self.leased
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    #[inline(always)]
    pub(crate) fn is_leased(&self) -> bool {
        self.leased.load(Ordering::Acquire)
    }

    #[inline(always)]
    pub(crate) fn end_lease(&self) {
        self.leased.store(false, Ordering::Release);
    }

    pub(crate) fn payload_mut(&mut self) -> &mut P {
        self.payload.get_mut()
    }
}

/// Exclusive access to the payload of one checked-out slot.
///
/// Holding a lease does not change the slot's lifecycle state. Dropping it
/// gives up payload access and leaves the slot where it was; use
/// [`notify`](Lease::notify) or [`return_slot`](Lease::return_slot) to end
/// the lease and move the slot along in one step.
pub struct Lease<'a, P, const N: usize, L: LockHooks, M: Bitmask> {
    pool: &'a StreamPool<P, N, L, M>,
    id: SlotId,
    _payload: PhantomData<&'a mut P>,
}

impl<'a, P, const N: usize, L: LockHooks, M: Bitmask> Lease<'a, P, N, L, M> {
    /// The slot must already be claimed through [`Slot::try_lease`].
    pub(crate) fn new(pool: &'a StreamPool<P, N, L, M>, id: SlotId) -> Self {
        Lease {
            pool,
            id,
            _payload: PhantomData,
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Ends the lease and marks the slot ready for the consumer.
    pub fn notify(self) -> Result<(), PoolError> {
        let this = ManuallyDrop::new(self);
        this.pool.notify_leased(this.id)
    }

    /// Ends the lease and puts the slot back into the free pool.
    pub fn return_slot(self) -> Result<(), PoolError> {
        let this = ManuallyDrop::new(self);
        this.pool.return_leased(this.id)
    }
}

impl<'a, P, const N: usize, L: LockHooks, M: Bitmask> Deref for Lease<'a, P, N, L, M> {
    type Target = P;

    fn deref(&self) -> &Self::Target {
        // SAFETY: the slot's lease flag is held by this lease, so nothing else
        // touches the payload until it is dropped.
        unsafe { &*self.pool.slot(self.id).payload.get() }
    }
}

impl<'a, P, const N: usize, L: LockHooks, M: Bitmask> DerefMut for Lease<'a, P, N, L, M> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: as in `deref`, and `&mut self` rules out other borrows
        // through this lease.
        unsafe { &mut *self.pool.slot(self.id).payload.get() }
    }
}

impl<'a, P, const N: usize, L: LockHooks, M: Bitmask> Drop for Lease<'a, P, N, L, M> {
    fn drop(&mut self) {
        self.pool.slot(self.id).end_lease();
    }
}

impl<'a, P: std::fmt::Debug, const N: usize, L: LockHooks, M: Bitmask> std::fmt::Debug
    for Lease<'a, P, N, L, M>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lease")
            .field("id", &self.id)
            .field("payload", &**self)
            .finish()
    }
}
