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

use thiserror::Error;

use crate::SlotId;

/// Status code for an operation that completed with nothing further to report.
pub const SUCCESS: i32 = 0;
/// Status code for a dequeue that handed out a ready buffer.
pub const DATA_AVAILABLE: i32 = 1;

pub const NULL_ARGUMENT: i32 = -60001;
pub const INVALID_RETURN: i32 = -60002;
pub const INVALID_SLOT: i32 = -60003;
pub const NO_BUFFER: i32 = -60004;
pub const LOCK_ERROR: i32 = -60005;
pub const EARLY_RETURN: i32 = -60006;
pub const DOUBLE_NOTIFY: i32 = -60007;
pub const SPURIOUS_NOTIFY: i32 = -60008;
pub const NOT_CHECKED_OUT: i32 = -60009;
pub const SLOT_BUSY: i32 = -60010;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("slot {0} is outside the pool")]
    InvalidSlot(SlotId),

    #[error("no buffer available")]
    NoBufferAvailable,

    #[error("slot {0} is already marked ready")]
    DoubleNotify(SlotId),

    #[error("slot {0} returned before the consumer dequeued it")]
    EarlyReturn(SlotId),

    #[error("slot {0} returned while not checked out")]
    InvalidReturn(SlotId),

    #[error("ready notification for slot {0}, which is not checked out")]
    SpuriousNotify(SlotId),

    #[error("slot {0} is not checked out")]
    NotCheckedOut(SlotId),

    #[error("payload of slot {0} is still leased")]
    SlotBusy(SlotId),

    #[error("lock hook initialisation failed: {0}")]
    LockInit(#[from] LockError),
}

impl PoolError {
    /// Numeric status code for embedders that forward results over C-style interfaces.
    pub fn code(&self) -> i32 {
        match self {
            PoolError::InvalidSlot(_) => INVALID_SLOT,
            PoolError::NoBufferAvailable => NO_BUFFER,
            PoolError::DoubleNotify(_) => DOUBLE_NOTIFY,
            PoolError::EarlyReturn(_) => EARLY_RETURN,
            PoolError::InvalidReturn(_) => INVALID_RETURN,
            PoolError::SpuriousNotify(_) => SPURIOUS_NOTIFY,
            PoolError::NotCheckedOut(_) => NOT_CHECKED_OUT,
            PoolError::SlotBusy(_) => SLOT_BUSY,
            PoolError::LockInit(_) => LOCK_ERROR,
        }
    }

    /// The slot the failed call was about, if any.
    pub fn slot(&self) -> Option<SlotId> {
        match self {
            PoolError::InvalidSlot(id)
            | PoolError::DoubleNotify(id)
            | PoolError::EarlyReturn(id)
            | PoolError::InvalidReturn(id)
            | PoolError::SpuriousNotify(id)
            | PoolError::NotCheckedOut(id)
            | PoolError::SlotBusy(id) => Some(*id),
            PoolError::NoBufferAvailable | PoolError::LockInit(_) => None,
        }
    }
}

/// Failure reported by [`LockHooks::init`](crate::LockHooks::init).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct LockError(pub String);
