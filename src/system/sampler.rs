use std::collections::HashSet;
use std::time::Instant;

use sysinfo::{
    MINIMUM_CPU_UPDATE_INTERVAL, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind,
};
use tracing::debug;

use super::process::{CMD_PREVIEW_CHARS, ProcessSample, classify};
use crate::format::preview;
use crate::monitor::ProcessSource;

/// Samples CPU usage of the browser's process family.
///
/// CPU figures are deltas between consecutive refreshes of the same
/// `System`, so the sampler must be kept alive across ticks. The first
/// `sample` waits out the rest of `MINIMUM_CPU_UPDATE_INTERVAL` after
/// priming so it never reports a near-zero window.
pub struct Sampler {
    sys: System,
    names: HashSet<String>,
    primed_at: Option<Instant>,
}

impl Sampler {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sys = System::new();
        sys.refresh_cpu_all();
        sys.refresh_processes_specifics(ProcessesToUpdate::All, true, refresh_kind());
        Sampler {
            sys,
            names: names.into_iter().map(Into::into).collect(),
            primed_at: Some(Instant::now()),
        }
    }

    pub fn sample(&mut self) -> Vec<ProcessSample> {
        let _span = tracing::debug_span!("sampler.sample").entered();

        if let Some(primed_at) = self.primed_at.take() {
            let settle = MINIMUM_CPU_UPDATE_INTERVAL.saturating_sub(primed_at.elapsed());
            if !settle.is_zero() {
                std::thread::sleep(settle);
            }
        }

        self.sys.refresh_cpu_all();
        self.sys
            .refresh_processes_specifics(ProcessesToUpdate::All, true, refresh_kind());

        let mut samples = Vec::new();
        for (pid, process) in self.sys.processes() {
            // Threads show up as tasks carrying their process's name.
            if process.thread_kind().is_some() {
                continue;
            }
            let name = process.name().to_string_lossy();
            if !self.names.contains(&*name) {
                continue;
            }

            let command = process
                .cmd()
                .iter()
                .map(|s| s.to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join(" ");

            samples.push(ProcessSample {
                pid: pid.as_u32(),
                role: classify(&command),
                cpu_percent: process.cpu_usage().max(0.0),
                cmd_preview: preview(&command, CMD_PREVIEW_CHARS),
            });
        }

        samples.sort_by_key(|s| s.pid);
        debug!(matched = samples.len(), "sampled browser processes");
        samples
    }
}

impl ProcessSource for Sampler {
    fn sample(&mut self) -> Vec<ProcessSample> {
        Sampler::sample(self)
    }
}

fn refresh_kind() -> ProcessRefreshKind {
    ProcessRefreshKind::nothing()
        .with_cpu()
        .with_cmd(UpdateKind::OnlyIfNotSet)
        .without_tasks()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_match_nothing() {
        let mut sampler = Sampler::new(["definitely-not-a-browser-binary"]);
        assert!(sampler.sample().is_empty());
    }

    #[test]
    fn samples_are_sorted_and_bounded() {
        // The test binary itself is a convenient process to match.
        let exe = std::env::current_exe().unwrap();
        let name = exe.file_name().unwrap().to_string_lossy().to_string();
        let mut sampler = Sampler::new([name]);
        let samples = sampler.sample();
        assert!(samples.windows(2).all(|w| w[0].pid < w[1].pid));
        for s in &samples {
            assert!(s.cpu_percent >= 0.0);
            assert!(s.cmd_preview.chars().count() <= CMD_PREVIEW_CHARS);
        }
    }
}
