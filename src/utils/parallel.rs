use tracing::error;
use crate::models::ArchiveError;

/// Background executor for host requests
///
/// Each submitted job runs once on a Rayon worker; jobs share nothing but the
/// filesystem and are never queued behind one another beyond the pool size.
pub struct TaskRunner {
    pool: rayon::ThreadPool,
    thread_count: usize,
}

impl TaskRunner {
    /// Create a runner using all available CPU cores
    pub fn new() -> Result<Self, ArchiveError> {
        Self::with_threads(num_cpus::get())
    }

    /// Create a runner with a custom thread count (0 = all cores)
    pub fn with_threads(thread_count: usize) -> Result<Self, ArchiveError> {
        let thread_count = if thread_count == 0 { num_cpus::get() } else { thread_count };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(thread_count)
            .thread_name(|index| format!("ziparchive-worker-{}", index))
            .panic_handler(|_| error!("Archive task panicked"))
            .build()
            .map_err(|e| ArchiveError::Archive(
                format!("Failed to create thread pool: {}", e)
            ))?;

        Ok(Self { pool, thread_count })
    }

    /// Run `job` on a worker thread without waiting for it
    pub fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.pool.spawn(job);
    }

    /// Get configured thread count
    pub fn thread_count(&self) -> usize {
        self.thread_count
    }
}
