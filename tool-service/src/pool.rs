//! Bounded pool for blocking tool work.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::sync::Semaphore;

/// Runs blocking closures on tokio's blocking threads, at most `size` at once.
///
/// The service stays on a single cooperative scheduler; anything a tool
/// marks as blocking is moved here so it cannot stall other calls.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    closed: Arc<AtomicBool>,
    size: NonZeroUsize,
}

impl WorkerPool {
    /// Creates a pool with `size` workers.
    #[must_use]
    pub fn new(size: NonZeroUsize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(size.get())),
            closed: Arc::new(AtomicBool::new(false)),
            size,
        }
    }

    /// Returns the configured number of workers.
    #[must_use]
    pub const fn size(&self) -> NonZeroUsize {
        self.size
    }

    /// Returns `true` once the pool has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Closes the pool. Queued and future submissions fail with
    /// [`PoolError::Closed`]; running work is left to finish.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.semaphore.close();
    }

    /// Runs `work` on a blocking thread once a worker is free.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Closed`] if the pool is closed before a worker
    /// frees up, and [`PoolError::Panicked`] if `work` panics.
    pub async fn run<F, T>(&self, work: F) -> PoolResult<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        if self.is_closed() {
            return Err(PoolError::Closed);
        }

        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| PoolError::Closed)?;

        let handle = tokio::task::spawn_blocking(move || {
            let output = work();
            drop(permit);
            output
        });

        handle.await.map_err(|err| PoolError::Panicked {
            message: err.to_string(),
        })
    }
}

/// Errors produced by the worker pool.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// Pool is closed and will not accept new work.
    #[error("worker pool closed")]
    Closed,
    /// The submitted work panicked or was cancelled.
    #[error("worker failed: {message}")]
    Panicked {
        /// Join error description.
        message: String,
    },
}

/// Result alias for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[tokio::test]
    async fn respects_pool_size() {
        let pool = WorkerPool::new(NonZeroUsize::new(2).unwrap());
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let pool = pool.clone();
            let in_flight = Arc::clone(&in_flight);
            let max_seen = Arc::clone(&max_seen);
            handles.push(tokio::spawn(async move {
                pool.run(move || {
                    let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_seen.fetch_max(current, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(20));
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                })
                .await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert!(max_seen.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn close_rejects_new_work() {
        let pool = WorkerPool::new(NonZeroUsize::new(1).unwrap());
        pool.close();

        let result = pool.run(|| 1).await;
        assert_eq!(result.unwrap_err(), PoolError::Closed);
    }

    #[tokio::test]
    async fn panics_are_reported() {
        let pool = WorkerPool::new(NonZeroUsize::new(1).unwrap());
        let err = pool.run(|| -> i32 { panic!("boom") }).await.unwrap_err();
        assert!(matches!(err, PoolError::Panicked { .. }));

        assert_eq!(pool.run(|| 7).await.unwrap(), 7);
    }
}
