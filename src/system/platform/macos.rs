use std::process::Command;

use super::PlatformExtensions;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn browser_process_names() -> &'static [&'static str] {
        &[
            "Google Chrome",
            "Google Chrome Helper",
            "Google Chrome Helper (Renderer)",
            "Google Chrome Helper (GPU)",
            "Google Chrome Helper (Plugin)",
        ]
    }

    fn notification_command(title: &str, body: &str) -> Option<Command> {
        let script = format!(
            "display notification \"{}\" with title \"{}\"",
            escape_applescript(body),
            escape_applescript(title)
        );
        let mut cmd = Command::new("osascript");
        cmd.arg("-e").arg(script);
        Some(cmd)
    }
}

fn escape_applescript(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
