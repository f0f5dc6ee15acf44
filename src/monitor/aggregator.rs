use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tracing::{Instrument, debug, info, warn};

use super::alert::{AlertState, Thresholds};
use super::feed::{Publish, SnapshotFeed};
use super::snapshot::MonitorSnapshot;
use super::{ProcessSource, StopSignal, TabSource};
use crate::notify::Notifier;
use crate::system::process::aggregate;

/// Drives the tick cadence and owns the alert streak.
pub struct Monitor<P, T> {
    processes: P,
    tabs: T,
    notifier: Box<dyn Notifier>,
    thresholds: Thresholds,
    period: Duration,
    alerts: AlertState,
}

impl<P, T> Monitor<P, T>
where
    P: ProcessSource,
    T: TabSource,
{
    pub fn new(
        processes: P,
        tabs: T,
        notifier: Box<dyn Notifier>,
        thresholds: Thresholds,
        period: Duration,
    ) -> Self {
        Monitor {
            processes,
            tabs,
            notifier,
            thresholds,
            period,
            alerts: AlertState::new(),
        }
    }

    pub fn alert_hits(&self) -> u32 {
        self.alerts.hits()
    }

    /// Run one tick to completion.
    pub async fn tick(&mut self) -> MonitorSnapshot {
        let mut never = StopSignal::never();
        self.tick_until(&mut never)
            .await
            .unwrap_or_else(MonitorSnapshot::idle)
    }

    /// Run one tick, abandoning the tab estimate if `stop` fires first.
    async fn tick_until(&mut self, stop: &mut StopSignal) -> Option<MonitorSnapshot> {
        let span = tracing::debug_span!("monitor.tick");
        async {
            let samples = self.processes.sample();
            let Some((total_cpu, worst)) = aggregate(&samples) else {
                self.alerts.reset();
                return Some(MonitorSnapshot::idle());
            };

            let alert = self
                .alerts
                .evaluate(total_cpu, worst, &self.thresholds)
                .map(|alert| {
                    let body = alert.body();
                    warn!(
                        pid = alert.pid,
                        role = %alert.role,
                        worst_cpu = alert.worst_cpu,
                        total_cpu = alert.total_cpu,
                        "sustained CPU overload"
                    );
                    self.notifier.notify(alert.title(), &body);
                    body
                });

            let tabs = tokio::select! {
                result = self.tabs.estimate(self.period) => match result {
                    Ok(tabs) => tabs,
                    Err(e) => {
                        debug!(error = %e, "tab estimate unavailable");
                        Vec::new()
                    }
                },
                _ = stop.stopped() => return None,
            };

            Some(MonitorSnapshot {
                total_cpu,
                worst_cpu: worst.cpu_percent,
                worst_role: Some(worst.role),
                worst_pid: Some(worst.pid),
                cmd_preview: worst.cmd_preview.clone(),
                process_count: samples.len(),
                tab_count: tabs.len(),
                tabs,
                alert,
            })
        }
        .instrument(span)
        .await
    }

    /// Publish one snapshot per tick until stopped or the consumer goes away.
    pub async fn run(mut self, mut feed: SnapshotFeed, mut stop: StopSignal) {
        let mut ticker = time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(period_ms = self.period.as_millis() as u64, "monitor started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = stop.stopped() => break,
            }
            if stop.is_stopped() {
                break;
            }

            let Some(snapshot) = self.tick_until(&mut stop).await else {
                break;
            };
            if feed.publish(snapshot) == Publish::Closed {
                info!("snapshot consumer closed");
                break;
            }
        }

        info!(dropped = feed.dropped(), "monitor stopped");
    }
}
