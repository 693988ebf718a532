#[cfg(all(test, feature = "loom"))]
mod tests {
    use crate::{
        hooks::{ExclusiveHooks, LockHooks},
        PoolError, StreamPool,
    };
    use loom::{
        model::Builder,
        sync::atomic::{AtomicBool, Ordering},
        thread,
    };
    use std::sync::Arc;

    struct LoomSpin {
        locked: AtomicBool,
    }

    impl LoomSpin {
        fn new() -> Self {
            LoomSpin {
                locked: AtomicBool::new(false),
            }
        }
    }

    impl LockHooks for LoomSpin {
        fn acquire(&self) {
            while self
                .locked
                .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_err()
            {
                thread::yield_now();
            }
        }

        unsafe fn release(&self) {
            self.locked.store(false, Ordering::Release);
        }
    }

    unsafe impl ExclusiveHooks for LoomSpin {}

    type Pool = StreamPool<Vec<u8>, 2, LoomSpin>;

    fn builder() -> Builder {
        let mut builder = Builder::new();
        if builder.preemption_bound.is_none() {
            builder.preemption_bound = Some(3);
        }
        builder
    }

    #[test]
    fn test_producer_consumer_handoff() {
        builder().check(|| {
            let pool = Arc::new(Pool::new(LoomSpin::new(), |_| Vec::new()).unwrap());
            let producer = Arc::clone(&pool);

            let handle = thread::spawn(move || {
                for i in 0..2u8 {
                    loop {
                        match producer.checkout() {
                            Ok(mut lease) => {
                                lease.push(i);
                                lease.notify().unwrap();
                                break;
                            }
                            Err(PoolError::NoBufferAvailable) => thread::yield_now(),
                            Err(e) => panic!("unexpected error: {e}"),
                        }
                    }
                }
            });

            let mut received = vec![];
            while received.len() < 2 {
                match pool.dequeue_ready() {
                    Ok(lease) => {
                        received.push(lease[0]);
                        lease.return_slot().unwrap();
                    }
                    Err(PoolError::NoBufferAvailable) => thread::yield_now(),
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }

            handle.join().unwrap();
            assert_eq!(received, vec![0, 1]);
            assert_eq!(pool.free_count(), 2);
        });
    }

    #[test]
    fn test_notify_races_return() {
        builder().check(|| {
            let pool = Arc::new(Pool::new(LoomSpin::new(), |_| Vec::new()).unwrap());
            let id = pool.checkout().unwrap().id();
            let notifier = Arc::clone(&pool);

            let handle = thread::spawn(move || notifier.notify_ready(id));
            let returned = pool.return_slot(id);
            let notified = handle.join().unwrap();

            match (notified, returned) {
                (Ok(()), Err(PoolError::EarlyReturn(_))) => {
                    assert_eq!(pool.snapshot().ready_order(), &[id]);
                    assert_eq!(pool.ready_count(), 1);
                }
                (Err(PoolError::SpuriousNotify(_)), Ok(())) => {
                    assert!(!pool.any_ready());
                    assert_eq!(pool.free_count(), 2);
                }
                other => panic!("unexpected outcome: {other:?}"),
            }
        });
    }
}
