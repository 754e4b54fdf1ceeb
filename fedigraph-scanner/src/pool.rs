use crate::client::BlockSource;
use crate::error::Result;
use crate::instance::Instance;
use crate::outcome::FetchOutcome;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Reference worker count. Enough to keep a survey of a few thousand
/// instances moving while staying polite to the network.
pub const DEFAULT_WORKERS: usize = 16;

/// Invoked once per completed outcome with `(worker_id, instance_name)`.
/// Ordering across workers is best-effort only.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Fans a fixed instance set out across a bounded pool of workers.
///
/// Every worker loops pop -> fetch -> record against one shared queue until
/// it is drained; a slow or dead peer costs its own timeout and nothing else.
pub struct Surveyor<S> {
    source: Arc<S>,
    progress_callback: Option<ProgressCallback>,
}

impl<S: BlockSource + 'static> Surveyor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Query every instance exactly once and return one outcome per
    /// instance, in completion order.
    ///
    /// Returns only after every worker has exhausted the queue; callers
    /// never observe a partial result set. The only error is a worker task
    /// that panicked or was cancelled -- fetch failures come back as
    /// `FetchOutcome::Failure` entries.
    pub async fn run_all(&self, instances: &[Instance], workers: usize) -> Result<Vec<FetchOutcome>> {
        let workers = workers.max(1);
        info!(
            "Surveying {} instances with {} workers",
            instances.len(),
            workers
        );

        let queue: Arc<Mutex<VecDeque<String>>> = Arc::new(Mutex::new(
            instances.iter().map(|i| i.name.clone()).collect(),
        ));
        let results: Arc<Mutex<Vec<FetchOutcome>>> =
            Arc::new(Mutex::new(Vec::with_capacity(instances.len())));

        let mut handles = Vec::with_capacity(workers);

        for worker_id in 0..workers {
            let queue = queue.clone();
            let results = results.clone();
            let source = self.source.clone();
            let progress = self.progress_callback.clone();

            handles.push(tokio::spawn(async move {
                debug!("Worker {} started", worker_id);

                loop {
                    // Hold the queue lock only across the pop, never across
                    // network I/O.
                    let next = { queue.lock().await.pop_front() };
                    let Some(name) = next else { break };

                    let outcome = source.fetch_blocks(&name).await;
                    results.lock().await.push(outcome);

                    if let Some(ref callback) = progress {
                        callback(worker_id, name);
                    }
                }

                debug!("Worker {} finished", worker_id);
            }));
        }

        for joined in futures::future::join_all(handles).await {
            joined?;
        }

        let outcomes = std::mem::take(&mut *results.lock().await);
        info!(
            "Survey complete. {} of {} instances answered",
            outcomes.iter().filter(|o| o.is_success()).count(),
            outcomes.len()
        );
        Ok(outcomes)
    }
}
