use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fixed number of background threads pulling jobs off one shared queue.
pub struct WorkerPool {
    job_sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Fails if any worker thread cannot be spawned. Threads already started
    /// exit on their own once the queue sender is dropped.
    pub fn new(size: usize) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let (job_sender, job_receiver) = channel::<Job>();
        let job_receiver = Arc::new(Mutex::new(job_receiver));

        let workers = (0..size.max(1))
            .map(|index| {
                let job_receiver = Arc::clone(&job_receiver);
                std::thread::Builder::new()
                    .name(format!("classify-worker-{}", index))
                    .spawn(move || worker_loop(job_receiver))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            job_sender: Some(job_sender),
            workers,
        })
    }

    #[allow(dead_code)]
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    pub fn submit<F>(&self, job: F) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self
            .job_sender
            .as_ref()
            .ok_or("worker pool is shut down")?;
        sender
            .send(Box::new(job))
            .map_err(|_| "worker pool queue closed")?;
        Ok(())
    }
}

fn worker_loop(job_receiver: Arc<Mutex<Receiver<Job>>>) {
    loop {
        let job = match job_receiver.lock() {
            Ok(receiver) => receiver.recv(),
            Err(_) => return,
        };

        match job {
            Ok(job) => job(),
            // Sender dropped, pool is shutting down
            Err(_) => return,
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.job_sender.take();

        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_runs_every_submitted_job() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pool = WorkerPool::new(3).unwrap();

        for _ in 0..10 {
            let counter = counter.clone();
            pool.submit(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }

        drop(pool);

        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_jobs_run_in_parallel() {
        let pool = WorkerPool::new(2).unwrap();
        let (tx, rx) = channel();
        let (release_tx, release_rx) = channel::<()>();
        let release_rx = Arc::new(Mutex::new(release_rx));

        // First job blocks until released; second must still complete.
        let blocked_release = release_rx.clone();
        let blocked_tx = tx.clone();
        pool.submit(move || {
            let _ = blocked_release.lock().unwrap().recv();
            blocked_tx.send("first").unwrap();
        })
        .unwrap();
        pool.submit(move || tx.send("second").unwrap()).unwrap();

        assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok("second"));
        release_tx.send(()).unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok("first"));
    }

    #[test]
    fn test_starts_every_requested_worker() {
        let pool = WorkerPool::new(4).unwrap();
        assert_eq!(pool.size(), 4);
    }

    #[test]
    fn test_size_is_at_least_one() {
        assert_eq!(WorkerPool::new(0).unwrap().size(), 1);
    }
}
