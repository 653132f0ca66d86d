//! Background credit balance refresh.
//!
//! Polls the account service on a fixed interval and publishes the latest
//! balance through a `watch` channel. Runs until its cancellation token fires.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use atelier_core::services::{AccountService, ServiceError};

/// Default poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Handle to a running poller.
pub struct CreditsPoller {
    balance: watch::Receiver<Option<i64>>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl CreditsPoller {
    /// Spawn the poll loop. The first poll happens immediately.
    pub fn spawn(
        account: Arc<dyn AccountService>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        let (tx, rx) = watch::channel(None);
        let task = tokio::spawn(run(account, interval, tx, cancel.clone()));
        Self {
            balance: rx,
            cancel,
            task,
        }
    }

    /// Receiver for balance updates; `None` until the first successful poll.
    pub fn subscribe(&self) -> watch::Receiver<Option<i64>> {
        self.balance.clone()
    }

    pub fn latest(&self) -> Option<i64> {
        *self.balance.borrow()
    }

    /// Stop polling and wait for the loop to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Credits poller task ended abnormally");
        }
    }
}

async fn run(
    account: Arc<dyn AccountService>,
    interval: Duration,
    tx: watch::Sender<Option<i64>>,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = interval.as_secs(), "Credits poller started");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Credits poller stopping");
                break;
            }
            _ = ticker.tick() => {
                match account.fetch_credit_balance().await {
                    Ok(balance) => {
                        tx.send_if_modified(|current| {
                            let changed = *current != Some(balance);
                            *current = Some(balance);
                            changed
                        });
                        tracing::debug!(balance, "Credit balance polled");
                    }
                    Err(ServiceError::Status { status: 401, .. }) => {
                        tracing::warn!("Credits poller stopping: session expired");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Credit balance poll failed");
                    }
                }
            }
        }
    }
}
