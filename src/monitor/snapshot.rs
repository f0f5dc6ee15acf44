use serde::Serialize;

use crate::devtools::TabMetric;
use crate::system::process::ProcessRole;

/// Everything the consumer sees for one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonitorSnapshot {
    pub total_cpu: f32,
    pub worst_cpu: f32,
    pub worst_role: Option<ProcessRole>,
    pub worst_pid: Option<u32>,
    pub cmd_preview: String,
    pub process_count: usize,
    pub tab_count: usize,
    pub tabs: Vec<TabMetric>,
    pub alert: Option<String>,
}

impl MonitorSnapshot {
    /// Snapshot published while the browser is not running.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.process_count == 0
    }

    pub fn tab_share_total(&self) -> f64 {
        self.tabs.iter().map(|t| t.cpu_percent).sum()
    }
}
