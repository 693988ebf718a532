//! # readypool - Fixed-Capacity Buffer Pool with Ordered Ready Notification
//!
//! A fixed set of payload slots handed from producers to a consumer. A
//! producer checks out a free slot, fills it, and marks it ready; the consumer
//! dequeues ready slots strictly in the order they were marked ready, processes
//! them, and returns them to the free pool.
//!
//! All bookkeeping lives in two bit masks and a circular queue of slot ids.
//! No operation blocks or allocates after construction, so notification can
//! come from interrupt or completion context. Every access to the bookkeeping
//! is bracketed by pluggable [`LockHooks`]; the default [`NoLock`] does
//! nothing and keeps the pool on a single execution context.
//!
//! ## Creating a Pool
//!
//! ```rust
//! use readypool::{DefaultPool, NoLock, PoolConfig};
//!
//! let pool = DefaultPool::from_config(&PoolConfig::default(), NoLock)?;
//! assert_eq!(pool.capacity(), 3);
//! assert_eq!(pool.free_count(), 3);
//! # Ok::<(), readypool::PoolError>(())
//! ```
//!
//! Any payload type implementing [`Payload`] works, and the capacity is a
//! const parameter:
//!
//! ```rust
//! use readypool::{NoLock, StreamPool};
//!
//! let pool: StreamPool<Vec<u8>, 8> = StreamPool::new(NoLock, |_| Vec::with_capacity(64))?;
//! assert_eq!(pool.capacity(), 8);
//! # Ok::<(), readypool::PoolError>(())
//! ```
//!
//! Capacities above 8 need a wider slot mask:
//!
//! ```rust
//! use readypool::{NoLock, StreamPool};
//!
//! let pool: StreamPool<[u8; 16], 32, NoLock, u32> = StreamPool::new(NoLock, |_| [0; 16])?;
//! assert_eq!(pool.free_count(), 32);
//! # Ok::<(), readypool::PoolError>(())
//! ```
//!
//! ## Producer Operations
//!
//! ```rust
//! # use readypool::{DefaultPool, NoLock, PoolConfig};
//! # let pool = DefaultPool::from_config(&PoolConfig::default(), NoLock)?;
//! use std::io::Write;
//!
//! let mut lease = pool.checkout()?;
//! lease.write_all(b"sample")?;
//! lease.notify()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! A producer that hands the filling off elsewhere keeps only the slot id and
//! notifies by id, for example from a completion handler:
//!
//! ```rust
//! # use readypool::{DefaultPool, NoLock, PoolConfig};
//! # let pool = DefaultPool::from_config(&PoolConfig::default(), NoLock)?;
//! let id = pool.checkout()?.id();
//! // ... later ...
//! pool.lease(id)?.append(b"filled later");
//! pool.notify_ready(id)?;
//! assert_eq!(pool.ready_count(), 1);
//! # Ok::<(), readypool::PoolError>(())
//! ```
//!
//! ## Consumer Operations
//!
//! ```rust
//! # use readypool::{DefaultPool, NoLock, PoolConfig};
//! # let pool = DefaultPool::from_config(&PoolConfig::default(), NoLock)?;
//! # for _ in 0..2 { pool.checkout()?.notify()?; }
//! while let Ok(lease) = pool.dequeue_ready() {
//!     let data = lease.as_slice();
//!     // Process data...
//! #   let _ = data;
//!     lease.return_slot()?;
//! }
//! assert!(!pool.any_ready());
//! # Ok::<(), readypool::PoolError>(())
//! ```
//!
//! ## Sharing Across Threads
//!
//! With [`SpinHooks`] (or any [`RawMutexHooks`]) the pool is `Sync`:
//!
//! ```rust
//! use readypool::{DefaultPool, PoolConfig, SpinHooks};
//! use std::sync::Arc;
//!
//! let pool = Arc::new(DefaultPool::<SpinHooks>::from_config(&PoolConfig::default(), SpinHooks::new())?);
//! let producer = Arc::clone(&pool);
//! std::thread::spawn(move || {
//!     if let Ok(mut lease) = producer.checkout() {
//!         lease.append(b"from another thread");
//!         let _ = lease.notify();
//!     }
//! })
//! .join()
//! .unwrap();
//!
//! assert_eq!(pool.ready_count(), 1);
//! # Ok::<(), readypool::PoolError>(())
//! ```

#[macro_use]
mod trace_macro;

pub(crate) mod common;
pub mod config;
pub mod error;
pub mod hooks;
#[cfg(all(test, feature = "loom"))]
pub(crate) mod loom;
pub mod payload;
pub(crate) mod pool;
pub(crate) mod queue;
pub(crate) mod slot;
pub(crate) mod state;
pub(crate) mod sync;

pub use common::{Bitmask, SlotId};
pub use config::{PoolConfig, DEFAULT_CAPACITY, DEFAULT_PAYLOAD_SIZE};
pub use error::{LockError, PoolError};
pub use hooks::{ExclusiveHooks, LockHooks, NoLock, RawMutexHooks, SpinHooks};
pub use payload::{Payload, StreamBuffer};
pub use pool::{DefaultPool, StreamPool};
pub use slot::Lease;
pub use state::{SlotState, Snapshot};
