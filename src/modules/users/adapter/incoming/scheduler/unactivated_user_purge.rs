use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::interval;
use tracing::{error, info};

use crate::modules::users::application::use_cases::purge_unactivated_users::IPurgeUnactivatedUsersUseCase;

pub const DEFAULT_PURGE_INTERVAL_SECS: u64 = 300;

/// Background worker that deletes never-activated sign-ups on a fixed cadence.
///
/// The first tick fires immediately, so stale rows left over from a previous
/// run are purged at boot.
pub async fn unactivated_user_purge_worker(
    use_case: Arc<dyn IPurgeUnactivatedUsersUseCase>,
    every: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let mut purge_interval = interval(every);
    info!(interval_secs = every.as_secs(), "Unactivated user purge worker started");

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                info!("Unactivated user purge worker shutting down");
                break;
            }
            _ = purge_interval.tick() => {
                if let Err(e) = use_case.execute().await {
                    error!(error = %e, "Failed to purge unactivated users");
                }
            }
        }
    }

    info!("Unactivated user purge worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::application::ports::outgoing::UserRepositoryError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingPurge {
        runs: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl IPurgeUnactivatedUsersUseCase for CountingPurge {
        async fn execute(&self) -> Result<u64, UserRepositoryError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(UserRepositoryError::DatabaseError("connection refused".into()))
            } else {
                Ok(0)
            }
        }
    }

    async fn run_for(fail: bool, wait: Duration) -> usize {
        let purge = Arc::new(CountingPurge {
            runs: AtomicUsize::new(0),
            fail,
        });
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let handle = tokio::spawn(unactivated_user_purge_worker(
            purge.clone(),
            Duration::from_millis(20),
            shutdown_rx,
        ));

        tokio::time::sleep(wait).await;
        shutdown_tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("worker stops on shutdown")
            .unwrap();

        purge.runs.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn test_worker_purges_repeatedly_until_shutdown() {
        let runs = run_for(false, Duration::from_millis(90)).await;
        assert!(runs >= 2, "expected several runs, got {runs}");
    }

    #[tokio::test]
    async fn test_worker_keeps_running_after_failure() {
        let runs = run_for(true, Duration::from_millis(90)).await;
        assert!(runs >= 2, "expected retries after failure, got {runs}");
    }
}
