use std::fmt;

use serde::Serialize;

/// Upper bound on the command-line preview kept per sample, in characters.
pub const CMD_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessRole {
    BrowserMain,
    Gpu,
    TabRenderer,
    ExtensionRenderer,
    Utility,
    Zygote,
    Unknown,
}

impl ProcessRole {
    pub fn label(self) -> &'static str {
        match self {
            ProcessRole::BrowserMain => "browser or other",
            ProcessRole::Gpu => "gpu",
            ProcessRole::TabRenderer => "tab renderer",
            ProcessRole::ExtensionRenderer => "extension renderer",
            ProcessRole::Utility => "utility",
            ProcessRole::Zygote => "zygote",
            ProcessRole::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProcessRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessSample {
    pub pid: u32,
    pub role: ProcessRole,
    pub cpu_percent: f32,
    pub cmd_preview: String,
}

/// Classify a browser process from its joined command line.
///
/// Marker order matters: an extension process is also a renderer, so the
/// extension check runs before the plain renderer check.
pub fn classify(command: &str) -> ProcessRole {
    if command.trim().is_empty() {
        return ProcessRole::Unknown;
    }

    let is_renderer = command.contains("--type=renderer");
    if command.contains("--type=gpu-process") {
        ProcessRole::Gpu
    } else if is_renderer && command.contains("--extension-process") {
        ProcessRole::ExtensionRenderer
    } else if is_renderer {
        ProcessRole::TabRenderer
    } else if command.contains("--type=utility") {
        ProcessRole::Utility
    } else if command.contains("--type=zygote") {
        ProcessRole::Zygote
    } else {
        ProcessRole::BrowserMain
    }
}

/// Total CPU of all samples plus the sample with the highest CPU.
///
/// Ties keep the earliest sample, so callers get a deterministic winner as
/// long as the input order is stable.
pub fn aggregate(samples: &[ProcessSample]) -> Option<(f32, &ProcessSample)> {
    let mut iter = samples.iter();
    let mut worst = iter.next()?;
    let mut total = worst.cpu_percent;
    for sample in iter {
        total += sample.cpu_percent;
        if sample.cpu_percent > worst.cpu_percent {
            worst = sample;
        }
    }
    Some((total, worst))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(pid: u32, cpu: f32) -> ProcessSample {
        ProcessSample {
            pid,
            role: ProcessRole::TabRenderer,
            cpu_percent: cpu,
            cmd_preview: String::new(),
        }
    }

    #[test]
    fn classify_role_markers() {
        assert_eq!(
            classify("chrome --type=gpu-process --field-trial-handle=1"),
            ProcessRole::Gpu
        );
        assert_eq!(
            classify("chrome --type=renderer --extension-process --lang=en"),
            ProcessRole::ExtensionRenderer
        );
        assert_eq!(
            classify("chrome --type=renderer --lang=en"),
            ProcessRole::TabRenderer
        );
        assert_eq!(
            classify("chrome --type=utility --utility-sub-type=network.mojom.NetworkService"),
            ProcessRole::Utility
        );
        assert_eq!(classify("chrome --type=zygote"), ProcessRole::Zygote);
        assert_eq!(
            classify("/opt/google/chrome/chrome --remote-debugging-port=9222"),
            ProcessRole::BrowserMain
        );
        assert_eq!(classify(""), ProcessRole::Unknown);
    }

    #[test]
    fn extension_flag_without_renderer_is_not_extension() {
        assert_eq!(
            classify("chrome --extension-process"),
            ProcessRole::BrowserMain
        );
    }

    #[test]
    fn role_labels() {
        assert_eq!(ProcessRole::TabRenderer.to_string(), "tab renderer");
        assert_eq!(ProcessRole::BrowserMain.to_string(), "browser or other");
    }

    #[test]
    fn aggregate_sums_and_picks_first_maximum() {
        let samples = vec![sample(10, 40.0), sample(11, 90.0), sample(12, 90.0)];
        let (total, worst) = aggregate(&samples).unwrap();
        assert!((total - 220.0).abs() < f32::EPSILON);
        assert_eq!(worst.pid, 11);
    }

    #[test]
    fn aggregate_empty_is_none() {
        assert!(aggregate(&[]).is_none());
    }
}
