//! Bounded worker pool for app pipelines.
use rayon::prelude::*;

use crate::config::MAX_THREADS_CEILING;
use crate::error::UpdaterError;

/// A fixed-size pool of named worker threads.
///
/// At most [`size`](Self::size) jobs run at any moment; a job that blocks on
/// a child process keeps its worker busy until the process exits.
#[derive(Debug)]
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    size: usize,
}

impl WorkerPool {
    /// Build a pool with `size` workers named `app-worker-N`.
    ///
    /// `size` is clamped to `1..=MAX_THREADS_CEILING`.
    ///
    /// # Errors
    ///
    /// Returns [`UpdaterError::Pool`] if the threads cannot be spawned.
    pub fn new(size: usize) -> Result<Self, UpdaterError> {
        let size = size.clamp(1, MAX_THREADS_CEILING);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(|i| format!("app-worker-{i}"))
            .build()
            .map_err(|e| UpdaterError::Pool(e.to_string()))?;
        Ok(Self { pool, size })
    }

    /// Number of worker threads.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Run `job` once per item on the pool and wait for all of them.
    ///
    /// Results come back in input order. The call returns only after every
    /// job has finished.
    pub fn run_all<T, R, F>(&self, items: &[T], job: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        self.pool
            .install(|| items.par_iter().with_max_len(1).map(job).collect())
    }
}
