//! The monitoring loop: one snapshot per tick, merged from the process
//! table and the per-tab estimate, with hysteresis on alerts.

pub mod aggregator;
pub mod alert;
pub mod feed;
pub mod snapshot;

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;

use crate::devtools::{DevtoolsError, TabMetric};
use crate::system::process::ProcessSample;

pub use aggregator::Monitor;
pub use alert::{Alert, AlertState, Thresholds};
pub use feed::{Publish, SnapshotFeed};
pub use snapshot::MonitorSnapshot;

pub trait ProcessSource {
    fn sample(&mut self) -> Vec<ProcessSample>;
}

pub trait TabSource {
    fn estimate(
        &self,
        interval: Duration,
    ) -> impl Future<Output = Result<Vec<TabMetric>, DevtoolsError>> + Send;
}

/// Cooperative stop request for the monitor loop.
#[derive(Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

pub struct StopHandle {
    tx: watch::Sender<bool>,
}

pub fn stop_signal() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx }, StopSignal { rx })
}

impl StopHandle {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

impl StopSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        stop_signal().1
    }

    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once a stop is requested. Pends forever if the handle is
    /// dropped without stopping.
    pub async fn stopped(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
