use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info};

use crate::host::{FetchError, LogHost};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// One in-flight call to [`LogHost::get_plugin_logs`]. Dropping it discards a late answer.
pub struct FetchJob {
    rx: Receiver<Result<String, FetchError>>,
    done: bool,
    worker: JoinHandle<bool>,
}

impl FetchJob {
    /// Non-blocking; yields the outcome exactly once.
    pub fn poll(&mut self) -> Option<Result<String, FetchError>> {
        if self.done {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.done = true;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.done = true;
                Some(Err(FetchError::Disconnected))
            }
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Give up on the answer and keep only the worker. The worker's result is
    /// true when its answer reached the receiver before it was dropped.
    pub fn detach(self) -> JoinHandle<bool> {
        let FetchJob { rx, worker, .. } = self;
        drop(rx);
        worker
    }
}

pub struct JobRunner;

impl JobRunner {
    pub fn spawn_fetch(host: Arc<dyn LogHost>, timeout: Duration) -> FetchJob {
        let (tx, rx) = mpsc::channel();
        let worker = thread::spawn(move || {
            info!("fetching plugin logs");
            let rt = match tokio::runtime::Builder::new_current_thread().enable_time().build() {
                Ok(rt) => rt,
                Err(e) => {
                    return tx.send(Err(FetchError::Host(format!("failed to start fetch runtime: {e}")))).is_ok();
                }
            };
            let result = rt.block_on(async move {
                let call = tokio::task::spawn_blocking(move || host.get_plugin_logs());
                match tokio::time::timeout(timeout, call).await {
                    Ok(Ok(result)) => result,
                    Ok(Err(join)) => Err(FetchError::Host(format!("log host call aborted: {join}"))),
                    Err(_) => Err(FetchError::Timeout(timeout)),
                }
            });
            let delivered = tx.send(result).is_ok();
            if !delivered {
                debug!("log dialog closed before fetch finished; result dropped");
            }
            // a timed out host call may still be blocking; don't wait for it
            rt.shutdown_background();
            delivered
        });
        FetchJob { rx, done: false, worker }
    }
}
