use crate::system::process::{ProcessRole, ProcessSample};

pub const ALERT_TITLE: &str = "Chrome latency spike";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub total_cpu: f32,
    pub single_cpu: f32,
    pub sustained_hits: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            total_cpu: 200.0,
            single_cpu: 120.0,
            sustained_hits: 3,
        }
    }
}

impl Thresholds {
    pub fn exceeded(&self, total_cpu: f32, worst_cpu: f32) -> bool {
        total_cpu > self.total_cpu || worst_cpu > self.single_cpu
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub role: ProcessRole,
    pub worst_cpu: f32,
    pub total_cpu: f32,
    pub pid: u32,
    pub cmd_preview: String,
}

impl Alert {
    pub fn title(&self) -> &'static str {
        ALERT_TITLE
    }

    pub fn body(&self) -> String {
        format!(
            "Latency spike: {} process\nSingle CPU: {:.1}%   Total Chrome: {:.1}%\nPID: {}\nCmd: {}",
            self.role, self.worst_cpu, self.total_cpu, self.pid, self.cmd_preview
        )
    }
}

/// Consecutive over-threshold tick counter.
///
/// Any under-threshold tick clears the streak; reaching the sustained-hit
/// count emits one alert and starts a new streak from zero.
#[derive(Debug, Default)]
pub struct AlertState {
    hits: u32,
}

impl AlertState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn reset(&mut self) {
        self.hits = 0;
    }

    pub fn evaluate(
        &mut self,
        total_cpu: f32,
        worst: &ProcessSample,
        thresholds: &Thresholds,
    ) -> Option<Alert> {
        if !thresholds.exceeded(total_cpu, worst.cpu_percent) {
            self.hits = 0;
            return None;
        }

        self.hits += 1;
        if self.hits < thresholds.sustained_hits.max(1) {
            return None;
        }

        self.hits = 0;
        Some(Alert {
            role: worst.role,
            worst_cpu: worst.cpu_percent,
            total_cpu,
            pid: worst.pid,
            cmd_preview: worst.cmd_preview.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer(pid: u32, cpu: f32) -> ProcessSample {
        ProcessSample {
            pid,
            role: ProcessRole::TabRenderer,
            cpu_percent: cpu,
            cmd_preview: "chrome --type=renderer".to_string(),
        }
    }

    #[test]
    fn fires_on_third_sustained_tick_only_once() {
        let thresholds = Thresholds::default();
        let mut state = AlertState::new();
        let worst = renderer(42, 130.0);

        assert!(state.evaluate(220.0, &worst, &thresholds).is_none());
        assert_eq!(state.hits(), 1);
        assert!(state.evaluate(220.0, &worst, &thresholds).is_none());
        assert_eq!(state.hits(), 2);
        let alert = state.evaluate(220.0, &worst, &thresholds).unwrap();
        assert_eq!(alert.pid, 42);
        assert_eq!(state.hits(), 0);
        assert!(state.evaluate(220.0, &worst, &thresholds).is_none());
        assert_eq!(state.hits(), 1);
    }

    #[test]
    fn under_threshold_tick_clears_streak() {
        let thresholds = Thresholds::default();
        let mut state = AlertState::new();
        let hot = renderer(1, 150.0);
        let cool = renderer(1, 10.0);

        state.evaluate(150.0, &hot, &thresholds);
        state.evaluate(150.0, &hot, &thresholds);
        assert_eq!(state.hits(), 2);
        assert!(state.evaluate(10.0, &cool, &thresholds).is_none());
        assert_eq!(state.hits(), 0);
    }

    #[test]
    fn thresholds_are_strict() {
        let thresholds = Thresholds::default();
        assert!(!thresholds.exceeded(200.0, 120.0));
        assert!(thresholds.exceeded(200.1, 0.0));
        assert!(thresholds.exceeded(0.0, 120.1));
    }

    #[test]
    fn single_hit_threshold_fires_every_over_tick() {
        let thresholds = Thresholds {
            sustained_hits: 1,
            ..Thresholds::default()
        };
        let mut state = AlertState::new();
        let worst = renderer(7, 500.0);
        assert!(state.evaluate(500.0, &worst, &thresholds).is_some());
        assert!(state.evaluate(500.0, &worst, &thresholds).is_some());
    }

    #[test]
    fn alert_body_layout() {
        let alert = Alert {
            role: ProcessRole::Gpu,
            worst_cpu: 131.4,
            total_cpu: 240.0,
            pid: 4242,
            cmd_preview: "chrome --type=gpu-process".to_string(),
        };
        assert_eq!(alert.title(), "Chrome latency spike");
        assert_eq!(
            alert.body(),
            "Latency spike: gpu process\nSingle CPU: 131.4%   Total Chrome: 240.0%\nPID: 4242\nCmd: chrome --type=gpu-process"
        );
    }
}
