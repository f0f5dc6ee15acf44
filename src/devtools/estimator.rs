use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, warn};

use super::DevtoolsError;
use super::session::{self, TaskDurationReadings};
use super::targets::{TargetDescriptor, fetch_page_targets};
use crate::config::DevtoolsConfig;
use crate::monitor::TabSource;

/// Bounded steps in one page session: connect, `Performance.enable`, two
/// `getMetrics` reads and close. Each may take up to the session timeout.
const SESSION_STEPS: u32 = 5;

/// Time a whole estimate may take before pending sessions are aborted.
fn estimate_deadline(interval: Duration, session_timeout: Duration) -> Duration {
    interval + session_timeout * SESSION_STEPS
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabMetric {
    pub title: String,
    pub url: String,
    pub cpu_percent: f64,
}

/// Work measured on one tab before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct TabWork {
    pub title: String,
    pub url: String,
    pub work: f64,
}

/// Non-negative `TaskDuration` growth between two readings.
///
/// Counters can reset (navigation, renderer swap), which shows up as a
/// negative delta; such a window counts as no work.
pub fn task_delta(readings: TaskDurationReadings) -> f64 {
    let delta = readings.second - readings.first;
    if delta.is_finite() { delta.max(0.0) } else { 0.0 }
}

/// Convert raw work into shares of 100. All-zero work yields all-zero shares.
pub fn normalize_shares(tabs: Vec<TabWork>) -> Vec<TabMetric> {
    let total: f64 = tabs.iter().map(|t| t.work.max(0.0)).sum();
    tabs.into_iter()
        .map(|t| {
            let cpu_percent = if total > 0.0 {
                100.0 * t.work.max(0.0) / total
            } else {
                0.0
            };
            TabMetric {
                title: t.title,
                url: t.url,
                cpu_percent,
            }
        })
        .collect()
}

pub struct TabEstimator {
    client: Client,
    endpoint: String,
    session_timeout: Duration,
    enabled: bool,
}

impl TabEstimator {
    pub fn new(config: &DevtoolsConfig) -> Result<Self, DevtoolsError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.list_timeout_ms))
            .build()?;
        Ok(TabEstimator {
            client,
            endpoint: config.endpoint.clone(),
            session_timeout: Duration::from_millis(config.session_timeout_ms),
            enabled: config.enabled,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Measure every open page for `interval` and return normalized shares.
    ///
    /// Fails only when the target list itself cannot be fetched; a failing
    /// page session just drops that page from the result.
    pub async fn estimate(&self, interval: Duration) -> Result<Vec<TabMetric>, DevtoolsError> {
        if !self.enabled {
            return Ok(Vec::new());
        }

        let span = tracing::debug_span!("devtools.estimate", endpoint = %self.endpoint);
        async move {
            let pages = fetch_page_targets(&self.client, &self.endpoint).await?;
            let measured = self.measure_pages(pages, interval).await;
            Ok::<_, DevtoolsError>(normalize_shares(measured))
        }
        .instrument(span)
        .await
    }

    async fn measure_pages(&self, pages: Vec<TargetDescriptor>, interval: Duration) -> Vec<TabWork> {
        let mut sessions = JoinSet::new();
        for (index, page) in pages.into_iter().enumerate() {
            let Some(ws_url) = page.session_url().map(str::to_string) else {
                continue;
            };
            let timeout = self.session_timeout;
            sessions.spawn(async move {
                let readings = session::measure(&ws_url, interval, timeout).await;
                (index, page, readings)
            });
        }

        let mut measured: Vec<(usize, TabWork)> = Vec::with_capacity(sessions.len());
        let deadline = estimate_deadline(interval, self.session_timeout);
        let collect = async {
            while let Some(joined) = sessions.join_next().await {
                let Ok((index, page, readings)) = joined else {
                    continue;
                };
                match readings {
                    Ok(readings) => measured.push((
                        index,
                        TabWork {
                            title: page.title,
                            url: page.url,
                            work: task_delta(readings),
                        },
                    )),
                    Err(e) => debug!(url = %page.url, error = %e, "tab session failed"),
                }
            }
        };
        if tokio::time::timeout(deadline, collect).await.is_err() {
            warn!(
                pending = sessions.len(),
                "tab sessions exceeded their deadline"
            );
            sessions.abort_all();
        }

        measured.sort_by_key(|(index, _)| *index);
        measured.into_iter().map(|(_, work)| work).collect()
    }
}

impl TabSource for TabEstimator {
    async fn estimate(&self, interval: Duration) -> Result<Vec<TabMetric>, DevtoolsError> {
        TabEstimator::estimate(self, interval).await
    }
}
