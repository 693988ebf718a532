use readypool::{DefaultPool, NoLock, PoolConfig, PoolError, SlotId, SlotState, DEFAULT_CAPACITY};
use rstest::*;
use std::io::Write;

#[fixture]
fn pool() -> DefaultPool {
    DefaultPool::from_config(&PoolConfig::default(), NoLock).expect("pool init")
}

#[rstest]
fn test_initial_state(pool: DefaultPool) {
    let snapshot = pool.snapshot();
    assert_eq!(snapshot.free_mask(), (1 << DEFAULT_CAPACITY) - 1);
    assert_eq!(snapshot.ready_mask(), 0);
    assert!(snapshot.ready_order().is_empty());
    assert_eq!(pool.ready_count(), 0);
    assert!(!pool.any_ready());
}

#[rstest]
fn test_single_buffer_lifecycle(pool: DefaultPool) -> Result<(), Box<dyn std::error::Error>> {
    let mut lease = pool.checkout()?;
    let id = lease.id();
    assert!((id as usize) < DEFAULT_CAPACITY);
    assert_eq!(pool.snapshot().free_mask() & (1 << id), 0);
    lease.write_all(b"payload")?;

    lease.notify()?;
    assert_ne!(pool.snapshot().ready_mask() & (1 << id), 0);
    assert!(pool.any_ready());

    let ready = pool.dequeue_ready()?;
    assert_eq!(ready.id(), id);
    assert_eq!(ready.as_slice(), b"payload");
    assert_eq!(pool.snapshot().ready_mask() & (1 << id), 0);
    drop(ready);

    pool.return_slot(id)?;
    assert_ne!(pool.snapshot().free_mask() & (1 << id), 0);

    assert_eq!(pool.return_slot(id), Err(PoolError::InvalidReturn(id)));
    Ok(())
}

#[rstest]
fn test_exhaustion(pool: DefaultPool) -> Result<(), PoolError> {
    let mut seen = vec![];
    for _ in 0..DEFAULT_CAPACITY {
        let id = pool.checkout()?.id();
        assert!(!seen.contains(&id), "slot {id} handed out twice");
        seen.push(id);
    }
    assert_eq!(seen, vec![0, 1, 2]);

    let before = pool.snapshot();
    assert_eq!(pool.checkout().err(), Some(PoolError::NoBufferAvailable));
    assert_eq!(pool.snapshot(), before);
    Ok(())
}

#[rstest]
#[case::reverse_first(&[2, 0, 1])]
#[case::in_order(&[0, 1, 2])]
#[case::descending(&[2, 1, 0])]
fn test_fifo_ready_order(pool: DefaultPool, #[case] order: &[SlotId]) -> Result<(), PoolError> {
    for _ in 0..DEFAULT_CAPACITY {
        pool.checkout()?;
    }
    for &id in order {
        pool.notify_ready(id)?;
    }
    assert_eq!(pool.snapshot().ready_order(), order);
    assert_eq!(pool.ready_count(), order.len());

    for &expected in order {
        let lease = pool.dequeue_ready()?;
        assert_eq!(lease.id(), expected);
    }
    assert_eq!(pool.dequeue_ready().err(), Some(PoolError::NoBufferAvailable));
    Ok(())
}

#[rstest]
fn test_early_return(pool: DefaultPool) -> Result<(), PoolError> {
    let id = pool.checkout()?.id();
    pool.notify_ready(id)?;

    let before = pool.snapshot();
    assert_eq!(pool.return_slot(id), Err(PoolError::EarlyReturn(id)));
    assert_eq!(pool.snapshot(), before);
    assert_eq!(pool.slot_state(id)?, SlotState::Ready);
    Ok(())
}

#[rstest]
#[case(3)]
#[case(99)]
#[case(SlotId::MAX)]
fn test_invalid_slot(pool: DefaultPool, #[case] id: SlotId) -> Result<(), PoolError> {
    let held = pool.checkout()?.id();
    pool.notify_ready(held)?;

    let before = pool.snapshot();
    assert_eq!(pool.notify_ready(id), Err(PoolError::InvalidSlot(id)));
    assert_eq!(pool.return_slot(id), Err(PoolError::InvalidSlot(id)));
    assert_eq!(pool.snapshot(), before);
    Ok(())
}

#[rstest]
fn test_double_notify(pool: DefaultPool) -> Result<(), PoolError> {
    let id = pool.checkout()?.id();
    pool.notify_ready(id)?;

    let before = pool.snapshot();
    assert_eq!(pool.notify_ready(id), Err(PoolError::DoubleNotify(id)));
    assert_eq!(pool.snapshot(), before);
    Ok(())
}

#[rstest]
fn test_spurious_notify(pool: DefaultPool) {
    let before = pool.snapshot();
    assert_eq!(pool.notify_ready(1), Err(PoolError::SpuriousNotify(1)));
    assert_eq!(pool.snapshot(), before);
}

#[rstest]
fn test_cycle_restores_masks(pool: DefaultPool) -> Result<(), PoolError> {
    let other = pool.checkout()?.id();
    pool.notify_ready(other)?;
    let before = pool.snapshot();

    let lease = pool.checkout()?;
    let id = lease.id();
    lease.notify()?;
    assert_eq!(pool.dequeue_ready()?.id(), other);
    pool.notify_ready(other)?;
    assert_eq!(pool.dequeue_ready()?.id(), id);
    pool.return_slot(id)?;

    assert_eq!(pool.snapshot(), before);
    Ok(())
}

#[rstest]
fn test_repeated_patterns(pool: DefaultPool) -> Result<(), PoolError> {
    for _ in 0..512 {
        // two slots, retrieved in notification order
        let id1 = pool.checkout()?.id();
        let id2 = pool.checkout()?.id();
        pool.notify_ready(id1)?;
        pool.notify_ready(id2)?;

        let lease = pool.dequeue_ready()?;
        assert_eq!(lease.id(), id1);
        lease.return_slot()?;
        let lease = pool.dequeue_ready()?;
        assert_eq!(lease.id(), id2);
        lease.return_slot()?;

        // three slots, partial drain between notifications
        let id1 = pool.checkout()?.id();
        let id2 = pool.checkout()?.id();
        let id3 = pool.checkout()?.id();
        pool.notify_ready(id3)?;
        pool.notify_ready(id1)?;

        let lease = pool.dequeue_ready()?;
        assert_eq!(lease.id(), id3);
        lease.return_slot()?;

        pool.notify_ready(id2)?;
        assert_eq!(pool.dequeue_ready()?.id(), id1);
        assert_eq!(pool.dequeue_ready()?.id(), id2);
        pool.return_slot(id1)?;
        pool.return_slot(id2)?;

        assert_eq!(pool.free_count(), DEFAULT_CAPACITY);
        assert!(!pool.any_ready());
    }
    Ok(())
}

#[rstest]
fn test_reset_after_use(mut pool: DefaultPool) -> Result<(), PoolError> {
    for _ in 0..DEFAULT_CAPACITY {
        pool.checkout()?.notify()?;
    }
    pool.dequeue_ready()?;

    pool.reset();
    assert_eq!(pool.free_count(), DEFAULT_CAPACITY);
    assert_eq!(pool.ready_count(), 0);
    assert_eq!(pool.checkout()?.id(), 0);
    Ok(())
}
