//! Fixed-size pool of worker threads draining one job queue.
//!
//! RULE: Jobs run in submission order per worker, in no guaranteed
//! order across workers. `join` waits for every submitted job.

use crate::error::{GenError, GenResult};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

type Job = Box<dyn FnOnce() + Send + 'static>;

pub struct WorkerPool {
    sender: Option<mpsc::Sender<Job>>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl WorkerPool {
    /// Start `size` workers (at least one).
    pub fn new(size: usize) -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..size.max(1))
            .map(|id| {
                let receiver = Arc::clone(&receiver);
                thread::spawn(move || loop {
                    let job = match receiver.lock() {
                        Ok(rx) => rx.recv(),
                        Err(_) => break,
                    };
                    match job {
                        Ok(job) => job(),
                        Err(_) => {
                            log::debug!("worker {id} stopping");
                            break;
                        }
                    }
                })
            })
            .collect();

        Self {
            sender: Some(sender),
            workers,
        }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    pub fn submit<F>(&self, job: F) -> GenResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| GenError::Other(anyhow::anyhow!("worker pool is shut down")))?;
        sender
            .send(Box::new(job))
            .map_err(|_| GenError::Other(anyhow::anyhow!("worker pool has no live workers")))
    }

    /// Close the queue and wait for the workers to finish it.
    pub fn join(mut self) -> GenResult<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> GenResult<()> {
        drop(self.sender.take());
        let mut panicked = 0;
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                panicked += 1;
            }
        }
        if panicked > 0 {
            return Err(GenError::Other(anyhow::anyhow!("{panicked} worker(s) panicked")));
        }
        Ok(())
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::warn!("worker pool shutdown: {e}");
        }
    }
}
