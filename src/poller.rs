use crate::errors::AppError;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

/// Runs `task` over and over, one call at a time.
///
/// The next call starts `delay` after the previous one finished, whether it
/// succeeded or not, so calls never overlap. Returns once `shutdown` is set.
pub async fn run_chained<F, Fut>(name: &str, delay: Duration, mut shutdown: watch::Receiver<bool>, mut task: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), AppError>>,
{
    info!(task = name, every = ?delay, "refresh loop started");
    loop {
        if *shutdown.borrow() {
            break;
        }

        if let Err(err) = task().await {
            warn!(task = name, "refresh failed: {err}");
        }

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    info!(task = name, "refresh loop stopped");
}
