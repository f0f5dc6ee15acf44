use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::Deserialize;

use crate::monitor::Thresholds;
use crate::system::platform;

pub const ENV_CPU_TOTAL: &str = "CHROME_GUARD_CPU_TOTAL";
pub const ENV_CPU_SINGLE: &str = "CHROME_GUARD_CPU_SINGLE";
pub const ENV_POLL_INTERVAL: &str = "CHROME_GUARD_POLL_INTERVAL";
pub const ENV_SUSTAINED_HITS: &str = "CHROME_GUARD_SUSTAINED_HITS";
pub const ENV_DEVTOOLS_URL: &str = "CHROME_GUARD_DEVTOOLS_URL";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub monitor: MonitorConfig,
    pub browser: BrowserConfig,
    pub devtools: DevtoolsConfig,
    pub notify: NotifyConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub cpu_threshold_total: f32,
    pub cpu_threshold_single: f32,
    pub sustained_hits: u32,
    pub tick_ms: u64,
    pub feed_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            cpu_threshold_total: 200.0,
            cpu_threshold_single: 120.0,
            sustained_hits: 3,
            tick_ms: 3000,
            feed_capacity: 16,
        }
    }
}

impl MonitorConfig {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            total_cpu: self.cpu_threshold_total,
            single_cpu: self.cpu_threshold_single,
            sustained_hits: self.sustained_hits,
        }
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub process_names: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        BrowserConfig {
            process_names: platform::browser_process_names()
                .iter()
                .map(|n| n.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DevtoolsConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub list_timeout_ms: u64,
    pub session_timeout_ms: u64,
}

impl Default for DevtoolsConfig {
    fn default() -> Self {
        DevtoolsConfig {
            enabled: true,
            endpoint: "http://localhost:9222".to_string(),
            list_timeout_ms: 1000,
            session_timeout_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub enabled: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        NotifyConfig { enabled: true }
    }
}

impl Config {
    /// Apply `CHROME_GUARD_*` overrides. `lookup` is `std::env::var` in
    /// production and a map in tests.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_CPU_TOTAL) {
            self.monitor.cpu_threshold_total = parse_env(ENV_CPU_TOTAL, &v)?;
        }
        if let Some(v) = lookup(ENV_CPU_SINGLE) {
            self.monitor.cpu_threshold_single = parse_env(ENV_CPU_SINGLE, &v)?;
        }
        if let Some(v) = lookup(ENV_POLL_INTERVAL) {
            let secs: f64 = parse_env(ENV_POLL_INTERVAL, &v)?;
            if !secs.is_finite() || secs <= 0.0 {
                return Err(eyre!("{ENV_POLL_INTERVAL} must be a positive number of seconds, got {v:?}"));
            }
            self.monitor.tick_ms = (secs * 1000.0).round() as u64;
        }
        if let Some(v) = lookup(ENV_SUSTAINED_HITS) {
            self.monitor.sustained_hits = parse_env(ENV_SUSTAINED_HITS, &v)?;
        }
        if let Some(v) = lookup(ENV_DEVTOOLS_URL) {
            self.devtools.endpoint = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let m = &self.monitor;
        for (name, value) in [
            ("cpu_threshold_total", m.cpu_threshold_total),
            ("cpu_threshold_single", m.cpu_threshold_single),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(eyre!("monitor.{name} must be a positive number, got {value}"));
            }
        }
        if m.sustained_hits == 0 {
            return Err(eyre!("monitor.sustained_hits must be at least 1"));
        }
        if m.tick_ms == 0 {
            return Err(eyre!("monitor.tick_ms must be greater than 0"));
        }
        if m.feed_capacity == 0 {
            return Err(eyre!("monitor.feed_capacity must be greater than 0"));
        }
        if self.browser.process_names.iter().all(|n| n.trim().is_empty()) {
            return Err(eyre!("browser.process_names must name at least one executable"));
        }
        if self.devtools.enabled && !self.devtools.endpoint.starts_with("http") {
            return Err(eyre!(
                "devtools.endpoint must be an http(s) origin, got {:?}",
                self.devtools.endpoint
            ));
        }
        Ok(())
    }
}

fn parse_env<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .wrap_err_with(|| format!("invalid value {raw:?} for {name}"))
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("chrome-guard").join("config.toml"))
}

/// Load the default config file if present; otherwise use defaults.
pub fn load_config() -> Result<Config> {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Ok(Config::default()),
    }
}

pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("cannot read config {}", path.display()))?;
    toml::from_str(&contents).wrap_err_with(|| format!("malformed config {}", path.display()))
}
