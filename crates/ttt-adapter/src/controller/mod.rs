//! Reconcile controller
//!
//! Level-triggered trigger layer: anything that touches a game enqueues its
//! id, and workers run one full reconciliation pass per dequeue. A pass that
//! advanced the game enqueues it again, so a player's move is followed by
//! the computer's reply and the loop stops once a pass is idle.
//!
//! Passes run on the blocking pool because stores do synchronous IO.

pub mod work_queue;

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use shared::{ControllerConfig, RetryPolicy};
use ttt_domain::{GameId, GameRepository, SlotChooser};
use ttt_usecase::{ReconcileError, ReconcileGame, ReconcileOutcome};

pub use work_queue::WorkQueue;

/// One reconciliation pass, cloned per pass
pub trait Reconciler: Clone + Send + 'static {
    fn reconcile(&mut self, id: &GameId) -> Result<ReconcileOutcome, ReconcileError>;
}

impl<R, C> Reconciler for ReconcileGame<R, C>
where
    R: GameRepository + Clone + Send + 'static,
    C: SlotChooser + Clone + Send + 'static,
{
    fn reconcile(&mut self, id: &GameId) -> Result<ReconcileOutcome, ReconcileError> {
        self.execute(id)
    }
}

/// Result of a trigger after retries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    Done(ReconcileOutcome),
    Failed { error: String, retryable: bool },
}

/// Published once per dequeued id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub id: GameId,
    pub attempts: u32,
    pub outcome: PassOutcome,
}

impl ReconcileReport {
    pub fn is_advanced(&self) -> bool {
        matches!(&self.outcome, PassOutcome::Done(outcome) if outcome.is_advanced())
    }
}

#[derive(Debug, Clone)]
struct WorkerSettings {
    retry: RetryPolicy,
    requeue_on_change: bool,
}

pub struct Controller;

impl Controller {
    /// Start `config.workers` workers on the current runtime
    pub fn spawn<T: Reconciler>(reconciler: T, config: &ControllerConfig) -> ControllerHandle {
        let queue = Arc::new(WorkQueue::new());
        let (reports, _) = broadcast::channel(256);
        let settings = Arc::new(WorkerSettings {
            retry: config.retry.clone(),
            requeue_on_change: config.requeue_on_change,
        });

        let workers = config.workers.max(1);
        let handles = (0..workers)
            .map(|worker| {
                tokio::spawn(run_worker(
                    worker,
                    Arc::clone(&queue),
                    reconciler.clone(),
                    Arc::clone(&settings),
                    reports.clone(),
                ))
            })
            .collect();

        info!(workers, "controller started");
        ControllerHandle {
            queue,
            reports,
            workers: handles,
        }
    }
}

/// Owner-side handle to a running controller
pub struct ControllerHandle {
    queue: Arc<WorkQueue>,
    reports: broadcast::Sender<ReconcileReport>,
    workers: Vec<JoinHandle<()>>,
}

impl ControllerHandle {
    /// Request a pass for `id`
    pub fn enqueue(&self, id: GameId) {
        if !self.queue.enqueue(id.clone()) {
            debug!(game_id = %id, "controller stopped, trigger dropped");
        }
    }

    pub fn enqueue_all(&self, ids: impl IntoIterator<Item = GameId>) {
        for id in ids {
            self.enqueue(id);
        }
    }

    /// Enqueue every stored game
    pub fn resync<R: GameRepository>(&self, repository: &R) -> Result<usize, ReconcileError> {
        let ids = repository.list_ids().map_err(|source| ReconcileError::Store {
            id: "*".to_string(),
            source,
        })?;
        let count = ids.len();
        self.enqueue_all(ids);
        debug!(games = count, "resync enqueued");
        Ok(count)
    }

    /// Reports for passes finishing after this call
    pub fn subscribe(&self) -> broadcast::Receiver<ReconcileReport> {
        self.reports.subscribe()
    }

    /// Resolves when nothing is queued or in flight
    pub async fn wait_idle(&self) {
        self.queue.wait_idle().await;
    }

    /// Stop the workers; an in-flight pass finishes first
    pub async fn shutdown(self) {
        self.queue.close();
        for worker in self.workers {
            if let Err(e) = worker.await {
                warn!(error = %e, "worker ended abnormally");
            }
        }
        info!("controller stopped");
    }
}

async fn run_worker<T: Reconciler>(
    worker: usize,
    queue: Arc<WorkQueue>,
    reconciler: T,
    settings: Arc<WorkerSettings>,
    reports: broadcast::Sender<ReconcileReport>,
) {
    debug!(worker, "worker started");
    while let Some(id) = queue.next().await {
        let report = reconcile_with_retry(reconciler.clone(), &id, &settings.retry).await;
        log_report(worker, &report);

        // Enqueued while still in flight, so the queue never looks idle in between
        if settings.requeue_on_change && report.is_advanced() {
            queue.enqueue(id.clone());
        }
        let _ = reports.send(report);
        queue.complete(&id);
    }
    debug!(worker, "worker stopped");
}

/// Re-run the whole pass on retryable errors, with backoff
///
/// Owns its reconciler so the future stays `Send` for any `T: Send`.
async fn reconcile_with_retry<T: Reconciler>(
    reconciler: T,
    id: &GameId,
    policy: &RetryPolicy,
) -> ReconcileReport {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let mut pass = reconciler.clone();
        let pass_id = id.clone();
        let result = tokio::task::spawn_blocking(move || pass.reconcile(&pass_id)).await;

        let error = match result {
            Ok(Ok(outcome)) => {
                return ReconcileReport {
                    id: id.clone(),
                    attempts: attempt,
                    outcome: PassOutcome::Done(outcome),
                };
            }
            Ok(Err(e)) => e,
            Err(e) => {
                return ReconcileReport {
                    id: id.clone(),
                    attempts: attempt,
                    outcome: PassOutcome::Failed {
                        error: format!("reconcile pass panicked: {e}"),
                        retryable: false,
                    },
                };
            }
        };

        if !error.is_retryable() || attempt >= policy.max_attempts {
            return ReconcileReport {
                id: id.clone(),
                attempts: attempt,
                outcome: PassOutcome::Failed {
                    error: error.to_string(),
                    retryable: error.is_retryable(),
                },
            };
        }

        let delay = policy.delay_for(attempt);
        warn!(
            game_id = %id,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "reconcile failed, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

fn log_report(worker: usize, report: &ReconcileReport) {
    let id = &report.id;
    let attempts = report.attempts;
    match &report.outcome {
        PassOutcome::Done(ReconcileOutcome::Advanced { event, version }) => {
            debug!(worker, game_id = %id, attempts, version, %event, "pass advanced game");
        }
        PassOutcome::Done(ReconcileOutcome::Idle { reason }) => {
            debug!(worker, game_id = %id, attempts, %reason, "pass idle");
        }
        PassOutcome::Done(ReconcileOutcome::NotFound) => {
            debug!(worker, game_id = %id, attempts, "game gone");
        }
        PassOutcome::Failed {
            error: message,
            retryable: true,
        } => {
            warn!(worker, game_id = %id, attempts, error = %message, "giving up after retries");
        }
        PassOutcome::Failed {
            error: message,
            retryable: false,
        } => {
            error!(worker, game_id = %id, attempts, error = %message, "game cannot be reconciled");
        }
    }
}
