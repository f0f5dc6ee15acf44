//! Plain-text and JSON-lines rendering of snapshots for the terminal.

use std::fmt::Write;

use crate::devtools::TabMetric;
use crate::format::{format_percent, truncate_unicode};
use crate::monitor::MonitorSnapshot;

pub const TOP_TABS: usize = 5;
const TITLE_WIDTH: usize = 48;

/// Tabs ordered by share, highest first. Equal shares keep feed order.
pub fn top_tabs(tabs: &[TabMetric], limit: usize) -> Vec<&TabMetric> {
    let mut sorted: Vec<&TabMetric> = tabs.iter().collect();
    sorted.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
    sorted.truncate(limit);
    sorted
}

pub fn render_text(snapshot: &MonitorSnapshot) -> String {
    let mut out = String::new();

    if snapshot.is_idle() {
        let _ = writeln!(out, "browser not running");
        return out;
    }

    let role = snapshot
        .worst_role
        .map(|r| r.label())
        .unwrap_or("none");
    let pid = snapshot
        .worst_pid
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(
        out,
        "total {} | worst {} ({role}, pid {pid}) | procs {} | tabs {}",
        format_percent(f64::from(snapshot.total_cpu)),
        format_percent(f64::from(snapshot.worst_cpu)),
        snapshot.process_count,
        snapshot.tab_count,
    );

    for tab in top_tabs(&snapshot.tabs, TOP_TABS) {
        let title = if tab.title.is_empty() {
            &tab.url
        } else {
            &tab.title
        };
        let _ = writeln!(
            out,
            "  {}  {}",
            format_percent(tab.cpu_percent),
            truncate_unicode(title, TITLE_WIDTH)
        );
    }

    if let Some(alert) = &snapshot.alert {
        let _ = writeln!(out, "!! ALERT");
        for line in alert.lines() {
            let _ = writeln!(out, "!! {line}");
        }
    }

    out
}

pub fn render_json(snapshot: &MonitorSnapshot) -> serde_json::Result<String> {
    serde_json::to_string(snapshot)
}
