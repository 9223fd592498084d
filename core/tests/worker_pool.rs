//! Worker pool tests.

use payreq_core::worker_pool::WorkerPool;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    mpsc, Arc,
};

#[test]
fn join_waits_for_every_job() {
    let pool = WorkerPool::new(4);
    assert_eq!(pool.size(), 4);

    let counter = Arc::new(AtomicUsize::new(0));
    for _ in 0..100 {
        let counter = Arc::clone(&counter);
        pool.submit(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    }
    pool.join().unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 100);
}

#[test]
fn zero_size_pool_still_has_one_worker() {
    let pool = WorkerPool::new(0);
    assert_eq!(pool.size(), 1);

    let (tx, rx) = mpsc::channel();
    for i in 0..5 {
        let tx = tx.clone();
        pool.submit(move || tx.send(i).unwrap()).unwrap();
    }
    drop(tx);
    pool.join().unwrap();
    // A single worker drains the queue in submission order.
    assert_eq!(rx.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn panicking_job_is_reported_on_join() {
    let pool = WorkerPool::new(2);
    pool.submit(|| panic!("job failed")).unwrap();
    assert!(pool.join().is_err());
}

#[test]
fn dropping_the_pool_finishes_queued_jobs() {
    let counter = Arc::new(AtomicUsize::new(0));
    {
        let pool = WorkerPool::new(2);
        for _ in 0..10 {
            let counter = Arc::clone(&counter);
            pool.submit(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
    }
    assert_eq!(counter.load(Ordering::SeqCst), 10);
}
