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

//! Lock hooks bracketing every access to the pool bookkeeping.
//!
//! The pool calls [`LockHooks::init`] once from its constructor,
//! [`LockHooks::deinit`] once when dropped, and wraps every checkout,
//! notification, dequeue, return and query in an
//! [`acquire`](LockHooks::acquire)/[`release`](LockHooks::release) pair.

use crossbeam::utils::CachePadded;
use lock_api::RawMutex;

use crate::{error::LockError, sync::RawSpinlock};

pub trait LockHooks {
    fn init(&self) -> Result<(), LockError> {
        Ok(())
    }

    fn deinit(&self) {}

    fn acquire(&self);

    /// # Safety
    ///
    /// Must only be called to end a critical section opened by a preceding
    /// [`acquire`](LockHooks::acquire) in the same execution context.
    unsafe fn release(&self);
}

/// Hooks whose acquire/release pair excludes every other execution context.
///
/// A pool is `Sync` only when its hooks implement this trait.
///
/// # Safety
///
/// Between `acquire` returning and `release` being called, no other thread
/// or interrupt handler may return from `acquire` on the same hooks.
pub unsafe trait ExclusiveHooks: LockHooks + Sync {}

/// Hooks that do nothing. A pool using them stays on one execution context.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLock;

impl LockHooks for NoLock {
    #[inline(always)]
    fn acquire(&self) {}

    #[inline(always)]
    unsafe fn release(&self) {}
}

/// Hooks backed by any [`lock_api::RawMutex`].
pub struct RawMutexHooks<R: RawMutex> {
    raw: CachePadded<R>,
}

impl<R: RawMutex> RawMutexHooks<R> {
    pub fn new() -> Self {
        RawMutexHooks {
            raw: CachePadded::new(R::INIT),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.raw.is_locked()
    }
}

impl<R: RawMutex> Default for RawMutexHooks<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RawMutex> std::fmt::Debug for RawMutexHooks<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawMutexHooks")
            .field("locked", &self.is_locked())
            .finish()
    }
}

impl<R: RawMutex> LockHooks for RawMutexHooks<R> {
    #[inline(always)]
    fn acquire(&self) {
        self.raw.lock();
    }

    #[inline(always)]
    unsafe fn release(&self) {
        unsafe { self.raw.unlock() }
    }
}

unsafe impl<R: RawMutex + Sync> ExclusiveHooks for RawMutexHooks<R> {}

/// Spinlock hooks, usable from any thread.
pub type SpinHooks = RawMutexHooks<RawSpinlock>;

/// Releases the hooks when dropped.
pub(crate) struct HookGuard<'a, L: LockHooks> {
    hooks: &'a L,
}

impl<'a, L: LockHooks> HookGuard<'a, L> {
    #[inline(always)]
    pub(crate) fn acquire(hooks: &'a L) -> Self {
        hooks.acquire();
        HookGuard { hooks }
    }
}

impl<'a, L: LockHooks> Drop for HookGuard<'a, L> {
    #[inline(always)]
    fn drop(&mut self) {
        // SAFETY: a guard only exists after `acquire` returned on this context.
        unsafe { self.hooks.release() }
    }
}
